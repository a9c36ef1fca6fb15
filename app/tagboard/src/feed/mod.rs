//! Application feed: log streaming and tag notifications over WebSocket.
//!
//! The server pushes JSON messages tagged by `type`. Log lines belong to the
//! log that was subscribed (a job id or a named topic); tag updates replace
//! the tags of individual board images.

mod log_view;
mod socket;

use std::fmt;
use std::str::FromStr;

pub use log_view::{LogAppend, LogViewer, ScrollMetrics};
use serde::{Deserialize, Deserializer, Serialize};
pub use socket::{ConnectionState, FeedConnection};

use crate::board::{Board, TagUpdate};

/// Errors from the feed connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// The WebSocket handshake failed.
    #[error("Failed to connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },
    /// The connection is closed.
    #[error("Connection closed")]
    Closed,
    /// A frame could not be written.
    #[error("Failed to send message: {0}")]
    SendFailed(String),
}

// ============================================================================
// Messages
// ============================================================================

/// A server message the client understands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum FeedMessage {
    /// A chunk of log output.
    #[serde(rename = "log_update")]
    LogUpdate {
        #[serde(default, deserialize_with = "optional_id")]
        job_id: Option<String>,
        #[serde(default, deserialize_with = "optional_id")]
        topic: Option<String>,
        #[serde(default)]
        content: String,
    },
    /// The server could not stream a log.
    #[serde(rename = "log_error")]
    LogError {
        #[serde(default, deserialize_with = "optional_id")]
        job_id: Option<String>,
        #[serde(default, deserialize_with = "optional_id")]
        topic: Option<String>,
        #[serde(default)]
        error: String,
    },
    /// Tags of some images changed.
    #[serde(rename = "tagsUpdated")]
    TagsUpdated {
        #[serde(deserialize_with = "valid_tag_updates")]
        value: Vec<TagUpdate>,
    },
}

/// Message `type`s decoded into [`FeedMessage`].
const KNOWN_TYPES: [&str; 3] = ["log_update", "log_error", "tagsUpdated"];

impl FeedMessage {
    /// Parses one text frame.
    ///
    /// Returns `Ok(None)` for well-formed JSON of a shape the client does not
    /// handle (status snapshots and the like).
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `text` is not valid JSON.
    pub fn parse(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let known = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|kind| KNOWN_TYPES.contains(&kind));

        match serde_json::from_value(value) {
            Ok(message) => Ok(Some(message)),
            Err(err) if known => {
                tracing::warn!(error = %err, "dropping malformed feed message");
                Ok(None)
            }
            Err(err) => {
                tracing::trace!(error = %err, "ignoring unhandled feed message");
                Ok(None)
            }
        }
    }

    /// The log this message belongs to (`job_id`, else `topic`).
    #[must_use]
    pub fn log_id(&self) -> Option<&str> {
        match self {
            Self::LogUpdate { job_id, topic, .. } | Self::LogError { job_id, topic, .. } => {
                job_id.as_deref().or(topic.as_deref())
            }
            Self::TagsUpdated { .. } => None,
        }
    }
}

/// Accepts ids sent as strings or numbers.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

/// Decodes tag updates one by one, skipping malformed entries.
fn valid_tag_updates<'de, D>(deserializer: D) -> Result<Vec<TagUpdate>, D::Error>
where D: Deserializer<'de> {
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match TagUpdate::deserialize(&entry) {
            Ok(update) => Some(update),
            Err(err) => {
                tracing::warn!(error = %err, %entry, "skipping malformed tag update");
                None
            }
        })
        .collect())
}

/// Applies a `tagsUpdated` message to the board.
///
/// Returns the number of updated tiles, or `None` for other messages.
pub fn sync_tags(board: &mut Board, message: &FeedMessage) -> Option<usize> {
    match message {
        FeedMessage::TagsUpdated { value } => Some(board.apply_tag_updates(value)),
        _ => None,
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Which kind of log a subscription targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogKind {
    /// A job log, addressed by `job_id`.
    #[default]
    Job,
    /// Any other log stream (e.g. `consumer`), addressed by `topic`.
    Named(String),
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Log kind cannot be empty".to_string());
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(format!("Invalid log kind '{s}'"));
        }
        Ok(if s.eq_ignore_ascii_case("job") { Self::Job } else { Self::Named(s.to_string()) })
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job => f.write_str("job"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Client request to start streaming a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl SubscribeRequest {
    /// Builds the subscription for `log_id` of the given kind.
    #[must_use]
    pub fn new(log_id: &str, kind: &LogKind) -> Self {
        match kind {
            LogKind::Job => Self {
                kind: "subscribe_log".to_string(),
                job_id: Some(log_id.to_string()),
                topic: None,
            },
            LogKind::Named(name) => Self {
                kind: format!("subscribe_{name}_log"),
                job_id: None,
                topic: Some(log_id.to_string()),
            },
        }
    }

    /// Serializes the request as a text frame.
    #[must_use]
    pub fn to_json(&self) -> String { serde_json::to_string(self).unwrap_or_default() }
}
