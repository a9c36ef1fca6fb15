//! Error types for Tagboard.
//!
//! Each concern has its own error enum; `TagboardError` is the crate-wide
//! error returned by CLI commands and serialized for host UIs.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::feed::FeedError;
use crate::grid::GridFitError;
use crate::thumbnails::ThumbnailError;

/// Errors that can occur during application execution.
///
/// Serializes as `{ "kind": "...", "message": "..." }` so host UIs can show
/// structured errors.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum TagboardError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Grid layout could not be computed.
    #[error("Layout error: {0}")]
    LayoutError(String),
    /// Thumbnail generation failed.
    #[error("Thumbnail error: {0}")]
    ThumbnailError(String),
    /// Feed connection or protocol error.
    #[error("Feed error: {0}")]
    FeedError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for TagboardError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for TagboardError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for TagboardError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<GridFitError> for TagboardError {
    fn from(err: GridFitError) -> Self { Self::LayoutError(err.to_string()) }
}

impl From<ThumbnailError> for TagboardError {
    fn from(err: ThumbnailError) -> Self { Self::ThumbnailError(err.to_string()) }
}

impl From<FeedError> for TagboardError {
    fn from(err: FeedError) -> Self { Self::FeedError(err.to_string()) }
}

impl From<String> for TagboardError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for TagboardError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = TagboardError::InvalidArguments("Folder does not exist: /nope".to_string());
        assert_eq!(err.to_string(), "Folder does not exist: /nope");
    }

    #[test]
    fn test_config_error_display() {
        let err = TagboardError::ConfigError("Invalid JSON".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("Invalid JSON"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: TagboardError = io_err.into();
        assert!(matches!(err, TagboardError::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_layout_error_from_grid() {
        let err: TagboardError =
            GridFitError::InvalidContainerDimensions { width: 0.0, height: 10.0 }.into();
        assert!(matches!(err, TagboardError::LayoutError(_)));
        assert!(err.to_string().contains("Layout error"));
    }

    #[test]
    fn test_thumbnail_error_from_conversion() {
        let err: TagboardError = ThumbnailError::Request("connection refused".to_string()).into();
        assert!(matches!(err, TagboardError::ThumbnailError(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_feed_error_from_conversion() {
        let err: TagboardError = FeedError::Closed.into();
        assert!(err.to_string().starts_with("Feed error"));
    }

    #[test]
    fn test_string_conversions() {
        let from_string: TagboardError = String::from("boom").into();
        let from_str: TagboardError = "boom".into();
        assert!(matches!(from_string, TagboardError::CommandError(ref m) if m == "boom"));
        assert_eq!(from_str.to_string(), "boom");
    }

    #[test]
    fn test_error_serializes_kind_and_message() {
        let err = TagboardError::FeedError("socket closed".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "FeedError");
        assert_eq!(json["message"], "socket closed");
    }

    #[test]
    fn test_error_is_debug() {
        let err = TagboardError::InvalidArguments("test".to_string());
        assert!(format!("{err:?}").contains("InvalidArguments"));
    }
}
