//! Inbound event envelopes posted by the chat platform.

use serde::Deserialize;
use serde_json::Value;

/// Top-level webhook body, dispatched on its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// One-time handshake when the webhook URL is registered.
    UrlVerification { challenge: String },
    EventCallback { event: ChatEvent },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bot_profile: Option<Value>,
}

/// Why an event produces no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAMessage,
    FromBot,
    InThread,
    NoText,
    NoChannel,
}

/// A message the assistant should answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerableMessage<'a> {
    pub channel: &'a str,
    pub ts: Option<&'a str>,
    pub text: &'a str,
}

impl ChatEvent {
    /// Top-level human messages only: bot posts and thread replies are ignored.
    pub fn answerable(&self) -> Result<AnswerableMessage<'_>, SkipReason> {
        if self.event_type != "message" {
            return Err(SkipReason::NotAMessage);
        }
        if self.bot_profile.is_some() {
            return Err(SkipReason::FromBot);
        }
        if self.thread_ts.is_some() {
            return Err(SkipReason::InThread);
        }
        let text = self.text.as_deref().ok_or(SkipReason::NoText)?;
        let channel = self.channel.as_deref().ok_or(SkipReason::NoChannel)?;
        Ok(AnswerableMessage {
            channel,
            ts: self.ts.as_deref(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> ChatEvent {
        match serde_json::from_str::<EventEnvelope>(json).unwrap() {
            EventEnvelope::EventCallback { event } => event,
            other => panic!("expected event_callback, got {other:?}"),
        }
    }

    #[test]
    fn test_url_verification_parses() {
        let envelope: EventEnvelope =
            serde_json::from_str(r#"{"type": "url_verification", "challenge": "abc", "token": "t"}"#)
                .unwrap();
        assert!(matches!(envelope, EventEnvelope::UrlVerification { ref challenge } if challenge == "abc"));
    }

    #[test]
    fn test_unknown_envelope_type_is_unsupported() {
        let envelope: EventEnvelope =
            serde_json::from_str(r#"{"type": "app_rate_limited", "minute_rate_limited": 1}"#).unwrap();
        assert!(matches!(envelope, EventEnvelope::Unsupported));
    }

    #[test]
    fn test_plain_message_is_answerable() {
        let e = event(
            r#"{"type": "event_callback", "event": {"type": "message", "channel": "C1", "ts": "1.2", "text": "I know Rust"}}"#,
        );
        assert_eq!(
            e.answerable(),
            Ok(AnswerableMessage {
                channel: "C1",
                ts: Some("1.2"),
                text: "I know Rust"
            })
        );
    }

    #[test]
    fn test_bot_thread_and_textless_messages_are_skipped() {
        let bot = event(
            r#"{"type": "event_callback", "event": {"type": "message", "channel": "C1", "text": "x", "bot_profile": {"id": "B1"}}}"#,
        );
        assert_eq!(bot.answerable(), Err(SkipReason::FromBot));

        let thread = event(
            r#"{"type": "event_callback", "event": {"type": "message", "channel": "C1", "text": "x", "thread_ts": "1.0"}}"#,
        );
        assert_eq!(thread.answerable(), Err(SkipReason::InThread));

        let textless = event(
            r#"{"type": "event_callback", "event": {"type": "message", "channel": "C1", "subtype": "channel_join"}}"#,
        );
        assert_eq!(textless.answerable(), Err(SkipReason::NoText));
    }

    #[test]
    fn test_non_message_events_are_skipped() {
        let join = event(r#"{"type": "event_callback", "event": {"type": "team_join", "user": {"id": "U1"}}}"#);
        assert_eq!(join.answerable(), Err(SkipReason::NotAMessage));
    }
}
