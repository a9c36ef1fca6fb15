//! Thumbnail generation.
//!
//! The board asks the server to render one thumbnail at a time. The
//! [`ThumbnailService`] trait is the request seam; [`HttpThumbnailService`]
//! talks to the real endpoint and tests plug in their own.

mod client;
mod queue;

use std::future::Future;

pub use client::HttpThumbnailService;
pub use queue::{ThumbnailEvent, ThumbnailQueue, ThumbnailSummary, progress_percent};
use serde::{Deserialize, Serialize};

use crate::board::ThumbnailState;

/// Errors from a single thumbnail round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThumbnailError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
    /// The request did not complete (connection, timeout).
    #[error("Request failed: {0}")]
    Request(String),
    /// The response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Body returned by the thumbnail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub thumbnail_filename: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Error body of framework-level failures (e.g. 404, 422).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// A completed HTTP exchange with the thumbnail endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailReply {
    /// Whether the HTTP status was 2xx.
    pub ok: bool,
    pub status: u16,
    pub body: ThumbnailResponse,
}

impl ThumbnailReply {
    /// Classifies the reply.
    ///
    /// Only a 2xx reply flagged `success` with a non-empty URL is ready;
    /// everything else failed with the server's message, its `detail`, or
    /// `"Unknown error"`.
    #[must_use]
    pub fn outcome(self) -> ThumbnailOutcome {
        let ThumbnailResponse { success, message, thumbnail_url, detail, .. } = self.body;

        if self.ok
            && success
            && let Some(url) = thumbnail_url.filter(|url| !url.is_empty())
        {
            return ThumbnailOutcome::Ready { url };
        }

        let message = message
            .filter(|message| !message.is_empty())
            .or_else(|| detail.map(|detail| detail_text(&detail)))
            .unwrap_or_else(|| "Unknown error".to_string());

        ThumbnailOutcome::Failed { message }
    }
}

fn detail_text(detail: &serde_json::Value) -> String {
    detail.as_str().map_or_else(|| detail.to_string(), ToString::to_string)
}

/// Result of generating one thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ThumbnailOutcome {
    Ready { url: String },
    /// The server answered but did not produce a thumbnail.
    Failed { message: String },
    /// The request or its response could not be completed.
    NetworkError { reason: String },
}

impl ThumbnailOutcome {
    #[must_use]
    pub const fn is_ready(&self) -> bool { matches!(self, Self::Ready { .. }) }

    /// Short label shown on the tile placeholder.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "Ready",
            Self::Failed { .. } => "Error",
            Self::NetworkError { .. } => "Network Error",
        }
    }
}

impl From<&ThumbnailOutcome> for ThumbnailState {
    fn from(outcome: &ThumbnailOutcome) -> Self {
        match outcome {
            ThumbnailOutcome::Ready { url } => Self::Ready { url: url.clone() },
            ThumbnailOutcome::Failed { message } => Self::Failed { reason: message.clone() },
            ThumbnailOutcome::NetworkError { reason } => Self::Failed { reason: reason.clone() },
        }
    }
}

/// Generates one thumbnail on the server.
pub trait ThumbnailService {
    /// Requests a thumbnail for `original_filename` inside `folder_path`.
    ///
    /// Transport and decoding failures are errors; a server-side refusal is
    /// a successful reply whose outcome is `Failed`.
    fn generate(
        &self,
        folder_path: &str,
        original_filename: &str,
    ) -> impl Future<Output = Result<ThumbnailReply, ThumbnailError>> + Send;
}
