//! State of the log viewer panel.
//!
//! The viewer shows one log at a time. Hosts report scroll positions and
//! get back whether newly appended output should keep the view pinned to
//! the bottom.

use super::{FeedMessage, LogKind, SubscribeRequest};
use crate::constants::SCROLL_BOTTOM_TOLERANCE_PX;

/// Placeholder shown between opening a log and the subscription going out.
pub const LOADING_TEXT: &str = "Loading...";

/// Scroll geometry of the log content element, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_height: f64, scroll_top: f64, client_height: f64) -> Self {
        Self { scroll_height, scroll_top, client_height }
    }

    /// `true` when less than 10 px of content remain below the viewport.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_height - self.scroll_top - self.client_height < SCROLL_BOTTOM_TOLERANCE_PX
    }
}

/// What ingesting a message did to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAppend {
    /// The message was for another log, or not a log message.
    Ignored,
    /// Text was appended; the host should scroll to the bottom if requested.
    Appended { scroll_to_bottom: bool },
}

/// Log viewer model.
#[derive(Debug, Clone, Default)]
pub struct LogViewer {
    current: Option<String>,
    content: String,
    scroll: ScrollMetrics,
    jump_button_visible: bool,
}

impl LogViewer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn current_log_id(&self) -> Option<&str> { self.current.as_deref() }

    #[must_use]
    pub const fn is_open(&self) -> bool { self.current.is_some() }

    #[must_use]
    pub fn content(&self) -> &str { &self.content }

    #[must_use]
    pub const fn jump_button_visible(&self) -> bool { self.jump_button_visible }

    /// Starts viewing `log_id` and returns the subscription to send.
    ///
    /// The content shows a loading placeholder until [`Self::on_subscribed`].
    pub fn open(&mut self, log_id: &str, kind: &LogKind) -> SubscribeRequest {
        tracing::debug!(log_id, %kind, "opening log");
        self.current = Some(log_id.to_string());
        LOADING_TEXT.clone_into(&mut self.content);
        self.scroll = ScrollMetrics::default();
        self.jump_button_visible = false;
        SubscribeRequest::new(log_id, kind)
    }

    /// The subscription was sent; clears the placeholder.
    pub fn on_subscribed(&mut self) { self.content.clear(); }

    /// Stops viewing and clears everything.
    pub fn close(&mut self) {
        self.current = None;
        self.content.clear();
        self.jump_button_visible = false;
    }

    /// Feeds one server message to the viewer.
    pub fn ingest(&mut self, message: &FeedMessage) -> LogAppend {
        let Some(current) = self.current.as_deref() else {
            return LogAppend::Ignored;
        };
        if message.log_id() != Some(current) {
            return LogAppend::Ignored;
        }

        match message {
            FeedMessage::LogUpdate { content, .. } => self.append(content),
            FeedMessage::LogError { error, .. } => {
                self.append(&format!("\n[Error streaming log: {error}]"))
            }
            FeedMessage::TagsUpdated { .. } => LogAppend::Ignored,
        }
    }

    /// Records a new scroll position reported by the host.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.scroll = metrics;
        self.jump_button_visible = !metrics.is_at_bottom();
    }

    /// The user jumped to the bottom.
    pub fn jump_to_bottom(&mut self) {
        self.scroll.scroll_top = (self.scroll.scroll_height - self.scroll.client_height).max(0.0);
        self.jump_button_visible = false;
    }

    fn append(&mut self, text: &str) -> LogAppend {
        let was_at_bottom = self.scroll.is_at_bottom();
        self.content.push_str(text);
        LogAppend::Appended { scroll_to_bottom: was_at_bottom }
    }
}
