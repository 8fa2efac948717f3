//! Axum handlers for the chat-platform event webhook.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, info};

use crate::events::payload::{AnswerableMessage, ChatEvent, EventEnvelope};
use crate::slack_client::OutboundReply;
use crate::state::AppState;

const RETRY_HEADER: &str = "x-slack-retry-num";

/// Acknowledges redelivered events without processing them again.
///
/// The platform retries when an acknowledgement is slow; answering twice
/// would post duplicate replies.
pub async fn skip_retries(request: Request, next: Next) -> Response {
    let retry_num = request
        .headers()
        .get(RETRY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(0);

    if retry_num > 0 {
        debug!(retry_num, "Skipping redelivered event");
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

/// POST /events
pub async fn handle_event(
    State(state): State<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("Answering URL verification challenge");
            Json(json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            answer_event(&state, &event).await;
            StatusCode::OK.into_response()
        }
        EventEnvelope::Unsupported => {
            debug!("Ignoring unsupported envelope type");
            StatusCode::OK.into_response()
        }
    }
}

async fn answer_event(state: &AppState, event: &ChatEvent) {
    let message = match event.answerable() {
        Ok(message) => message,
        Err(reason) => {
            debug!(event_type = %event.event_type, ?reason, "Event skipped");
            return;
        }
    };

    let reply = build_reply(state, &message);
    if let Err(e) = state.replies.post_reply(&reply).await {
        // Still acknowledged: a retry would not fix a delivery failure.
        error!(channel = %reply.channel, "Failed to post reply: {e}");
    }
}

fn build_reply(state: &AppState, message: &AnswerableMessage<'_>) -> OutboundReply {
    let snapshot = state.models.current();
    let channels = state.matcher.recommend_channels(&snapshot.model, message.text);
    let jobs = state.matcher.recommend_jobs(&snapshot.model, message.text);

    info!(
        revision = %snapshot.info.revision,
        channels = channels.len(),
        jobs = jobs.len(),
        "Recommendations computed for message"
    );

    OutboundReply {
        channel: message.channel.to_string(),
        thread_ts: message.ts.map(str::to_string),
        text: state.template.render(&channels, &jobs),
    }
}
