//! Relayout scheduling.
//!
//! The controller owns the grid surface and turns host events into
//! relayouts: delayed after mount, debounced on resize, immediate when the
//! board content is swapped, and after the thumbnail progress bar goes away.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{AspectRatio, GridSurface, Relayout, relayout};
use crate::config::TagboardConfig;
use crate::constants::{MOUNT_DELAY, PROGRESS_LINGER, RESIZE_SETTLE};
use crate::utils::Debouncer;

/// Host events that may change the grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutTrigger {
    /// The board was shown for the first time.
    Mounted,
    /// The container was resized.
    Resized,
    /// The board content was replaced (new folder, new tiles).
    ContentReplaced,
    /// The thumbnail queue finished and its progress bar is closing.
    ThumbnailsFinished,
}

/// Delays used by [`GridController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTiming {
    pub mount_delay: Duration,
    pub resize_settle: Duration,
    pub progress_linger: Duration,
}

impl Default for GridTiming {
    fn default() -> Self {
        Self {
            mount_delay: MOUNT_DELAY,
            resize_settle: RESIZE_SETTLE,
            progress_linger: PROGRESS_LINGER,
        }
    }
}

impl GridTiming {
    /// Reads the delays from the configuration.
    #[must_use]
    pub const fn from_config(config: &TagboardConfig) -> Self {
        Self {
            mount_delay: config.grid.mount_delay(),
            resize_settle: config.grid.resize_settle(),
            progress_linger: config.thumbnails.progress_linger(),
        }
    }
}

/// Schedules relayouts of one grid surface.
///
/// All scheduled triggers share a single debouncer: a newer trigger replaces
/// an older pending one. The surface lock is held for the whole
/// compute-and-apply step, so two relayouts never interleave.
pub struct GridController<S> {
    surface: Arc<Mutex<S>>,
    aspect_ratio: AspectRatio,
    timing: GridTiming,
    debouncer: Debouncer,
}

impl<S> GridController<S>
where S: GridSurface + Send + 'static
{
    /// Creates a controller owning `surface`.
    #[must_use]
    pub fn new(surface: S, aspect_ratio: AspectRatio, timing: GridTiming) -> Self {
        Self {
            surface: Arc::new(Mutex::new(surface)),
            aspect_ratio,
            timing,
            debouncer: Debouncer::new(),
        }
    }

    /// Shared handle to the surface.
    #[must_use]
    pub fn surface(&self) -> Arc<Mutex<S>> { Arc::clone(&self.surface) }

    #[must_use]
    pub const fn aspect_ratio(&self) -> AspectRatio { self.aspect_ratio }

    #[must_use]
    pub const fn timing(&self) -> GridTiming { self.timing }

    /// Returns `true` while a delayed relayout is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool { self.debouncer.is_pending() }

    /// Reacts to a host event. Must be called within a tokio runtime.
    pub fn trigger(&self, trigger: LayoutTrigger) {
        tracing::trace!(?trigger, "grid trigger");

        match trigger {
            LayoutTrigger::Mounted => self.schedule(self.timing.mount_delay),
            LayoutTrigger::Resized => self.schedule(self.timing.resize_settle),
            LayoutTrigger::ThumbnailsFinished => self.schedule(self.timing.progress_linger),
            LayoutTrigger::ContentReplaced => {
                self.debouncer.cancel();
                self.relayout_now();
            }
        }
    }

    /// Relayouts immediately.
    ///
    /// Returns `None` when the container had no usable size.
    pub fn relayout_now(&self) -> Option<Relayout> {
        run_relayout(&self.surface, self.aspect_ratio.get())
    }

    fn schedule(&self, delay: Duration) {
        let surface = Arc::clone(&self.surface);
        let aspect_ratio = self.aspect_ratio.get();

        self.debouncer.schedule(delay, move || {
            run_relayout(&surface, aspect_ratio);
        });
    }
}

fn run_relayout<S>(surface: &Mutex<S>, aspect_ratio: f64) -> Option<Relayout>
where S: GridSurface {
    let mut surface = surface.lock();

    match relayout(&mut *surface, aspect_ratio) {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            // Retried on the next trigger.
            tracing::debug!(%err, "grid relayout skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::surface::tests::RecordingSurface;
    use super::*;
    use crate::config::{GridConfig, ThumbnailsConfig};

    fn controller(surface: RecordingSurface) -> GridController<RecordingSurface> {
        GridController::new(surface, AspectRatio::default(), GridTiming::default())
    }

    fn applied(controller: &GridController<RecordingSurface>) -> usize {
        controller.surface().lock().applied
    }

    async fn advance(ms: u64) { tokio::time::sleep(Duration::from_millis(ms)).await; }

    #[tokio::test(start_paused = true)]
    async fn test_mount_relayouts_after_delay() {
        let ctrl = controller(RecordingSurface::new(1000.0, 500.0, "10px", 10));

        ctrl.trigger(LayoutTrigger::Mounted);
        advance(50).await;
        assert_eq!(applied(&ctrl), 0);

        advance(100).await;
        assert_eq!(applied(&ctrl), 1);
        assert_eq!(ctrl.surface().lock().tracks.map(|(columns, _)| columns), Some(5));
    }

    #[test]
    fn test_timing_from_config() {
        assert_eq!(GridTiming::from_config(&TagboardConfig::default()), GridTiming::default());

        let config = TagboardConfig {
            grid: GridConfig { mount_delay_ms: 400, resize_settle_ms: 50, ..GridConfig::default() },
            thumbnails: ThumbnailsConfig { progress_linger_ms: 0, ..ThumbnailsConfig::default() },
            ..TagboardConfig::default()
        };

        assert_eq!(GridTiming::from_config(&config), GridTiming {
            mount_delay: Duration::from_millis(400),
            resize_settle: Duration::from_millis(50),
            progress_linger: Duration::ZERO,
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_mount_delay_is_honored() {
        let config = TagboardConfig {
            grid: GridConfig { mount_delay_ms: 400, ..GridConfig::default() },
            ..TagboardConfig::default()
        };
        let ctrl = GridController::new(
            RecordingSurface::new(1000.0, 500.0, "10px", 10),
            AspectRatio::default(),
            GridTiming::from_config(&config),
        );

        ctrl.trigger(LayoutTrigger::Mounted);
        advance(300).await;
        assert_eq!(applied(&ctrl), 0);

        advance(150).await;
        assert_eq!(applied(&ctrl), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_burst_relayouts_once() {
        let ctrl = controller(RecordingSurface::new(1000.0, 500.0, "10px", 10));

        for _ in 0..5 {
            ctrl.trigger(LayoutTrigger::Resized);
            advance(50).await;
        }
        assert_eq!(applied(&ctrl), 0);
        assert!(ctrl.is_pending());

        advance(300).await;
        assert_eq!(applied(&ctrl), 1);
        assert!(!ctrl.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_replaced_is_immediate_and_cancels_pending() {
        let ctrl = controller(RecordingSurface::new(1000.0, 500.0, "10px", 10));

        ctrl.trigger(LayoutTrigger::Resized);
        ctrl.trigger(LayoutTrigger::ContentReplaced);
        assert_eq!(applied(&ctrl), 1);

        advance(500).await;
        assert_eq!(applied(&ctrl), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_thumbnails_finished_waits_for_linger() {
        let ctrl = controller(RecordingSurface::new(1000.0, 500.0, "10px", 10));

        ctrl.trigger(LayoutTrigger::ThumbnailsFinished);
        advance(1400).await;
        assert_eq!(applied(&ctrl), 0);

        advance(200).await;
        assert_eq!(applied(&ctrl), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_container_is_swallowed() {
        let ctrl = controller(RecordingSurface::new(0.0, 0.0, "10px", 10));

        ctrl.trigger(LayoutTrigger::ContentReplaced);
        assert_eq!(ctrl.relayout_now(), None);
        assert_eq!(applied(&ctrl), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_surface_changes_are_picked_up() {
        let ctrl = controller(RecordingSurface::new(1000.0, 500.0, "10px", 0));
        assert_eq!(ctrl.relayout_now(), Some(Relayout::Skipped));

        ctrl.surface().lock().tiles = 10;
        ctrl.trigger(LayoutTrigger::Resized);
        advance(300).await;
        assert_eq!(applied(&ctrl), 1);
    }

    #[test]
    fn test_timing_defaults() {
        let timing = GridTiming::default();
        assert_eq!(timing.mount_delay, Duration::from_millis(100));
        assert_eq!(timing.resize_settle, Duration::from_millis(250));
        assert_eq!(timing.progress_linger, Duration::from_millis(1500));
    }
}
