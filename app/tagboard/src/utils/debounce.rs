//! Cancellable delayed task.
//!
//! Each call to [`Debouncer::schedule`] replaces the previously pending job,
//! so a burst of events collapses into one run once the events settle.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Runs at most one pending job after a delay.
///
/// Requires a tokio runtime when scheduling. Dropping the debouncer cancels
/// whatever is still pending.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Creates a debouncer with nothing pending.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Schedules `job` to run after `delay`, aborting any pending job.
    pub fn schedule<F>(&self, delay: Duration, job: F)
    where F: FnOnce() + Send + 'static {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job();
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the pending job.
    ///
    /// Returns `true` if a job was still waiting to run.
    pub fn cancel(&self) -> bool {
        self.pending.lock().take().is_some_and(|handle| {
            let waiting = !handle.is_finished();
            handle.abort();
            waiting
        })
    }

    /// Returns `true` while a scheduled job has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
