use std::sync::Arc;

use crate::events::reply::ReplyTemplate;
use crate::matching::matcher::Matcher;
use crate::matching::store::ModelStore;
use crate::slack_client::ReplySink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Current model; handlers snapshot it once per request.
    pub models: Arc<ModelStore>,
    pub matcher: Arc<Matcher>,
    pub template: Arc<ReplyTemplate>,
    /// Pluggable reply delivery. Default: SlackClient, or LogSink without a token.
    pub replies: Arc<dyn ReplySink>,
}
