//! Sequential thumbnail generation queue.
//!
//! Requests run strictly one after another with a short pause in between,
//! so the server never renders two thumbnails for the same board at once.
//! A failed item is logged and skipped; the queue always runs to the end.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ThumbnailOutcome, ThumbnailService};
use crate::board::Board;

/// Progress notifications emitted while the queue runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailEvent {
    /// Emitted once before the first request (only if there is work).
    Started { total: usize },
    /// A request for `filename` is about to be sent. `index` is 1-based.
    Generating { filename: String, index: usize, total: usize },
    /// A request finished.
    Finished {
        filename: String,
        outcome: ThumbnailOutcome,
        processed: usize,
        total: usize,
        percent: u8,
    },
    /// Emitted once after the last item.
    Completed { total: usize },
}

impl ThumbnailEvent {
    /// The progress status line for this event, if it changes the status.
    #[must_use]
    pub fn status_line(&self) -> Option<String> {
        match self {
            Self::Started { total } => Some(format!("Preparing to generate {total} thumbnail(s)...")),
            Self::Generating { filename, index, total } => {
                Some(format!("Generating thumbnail for {filename} ({index} of {total})..."))
            }
            Self::Completed { total } => Some(format!("All {total} thumbnails processed.")),
            Self::Finished { .. } => None,
        }
    }

    /// Records a finished request on the matching board tile.
    ///
    /// Returns `true` if a tile was updated.
    pub fn apply_to(&self, board: &mut Board) -> bool {
        match self {
            Self::Finished { filename, outcome, .. } => board.mark_thumbnail(filename, outcome.into()),
            _ => false,
        }
    }
}

/// Progress in whole percent, rounded to nearest.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = (processed.min(total) as f64 / total as f64) * 100.0;
    ratio.round() as u8
}

/// What a finished queue did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailSummary {
    pub total: usize,
    /// Outcome per filename, in processing order.
    pub results: Vec<(String, ThumbnailOutcome)>,
}

impl ThumbnailSummary {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|(_, outcome)| outcome.is_ready()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize { self.results.len() - self.succeeded() }
}

/// Generates thumbnails for a list of images, one at a time.
pub struct ThumbnailQueue<S> {
    service: S,
    folder_path: String,
    pending: VecDeque<String>,
    total: usize,
    pacing: Duration,
}

impl<S> ThumbnailQueue<S>
where S: ThumbnailService
{
    /// Creates a queue for `filenames` inside `folder_path`.
    pub fn new(
        service: S,
        folder_path: impl Into<String>,
        filenames: impl IntoIterator<Item = String>,
        pacing: Duration,
    ) -> Self {
        let pending: VecDeque<String> = filenames.into_iter().collect();
        Self {
            service,
            folder_path: folder_path.into(),
            total: pending.len(),
            pending,
            pacing,
        }
    }

    /// Total number of items the queue was created with.
    #[must_use]
    pub const fn total(&self) -> usize { self.total }

    /// Items not processed yet.
    #[must_use]
    pub fn remaining(&self) -> usize { self.pending.len() }

    /// Processes every item and reports progress on `progress`.
    ///
    /// A closed progress channel does not stop the queue.
    pub async fn run(mut self, progress: mpsc::Sender<ThumbnailEvent>) -> ThumbnailSummary {
        let total = self.total;
        let mut summary = ThumbnailSummary { total, results: Vec::with_capacity(total) };

        if total > 0 {
            tracing::info!(total, folder = %self.folder_path, "generating thumbnails");
            emit(&progress, ThumbnailEvent::Started { total }).await;
        }

        let mut processed = 0;
        while let Some(filename) = self.pending.pop_front() {
            emit(&progress, ThumbnailEvent::Generating {
                filename: filename.clone(),
                index: processed + 1,
                total,
            })
            .await;

            let outcome = match self.service.generate(&self.folder_path, &filename).await {
                Ok(reply) => reply.outcome(),
                Err(err) => ThumbnailOutcome::NetworkError { reason: err.to_string() },
            };

            match &outcome {
                ThumbnailOutcome::Ready { url } => {
                    tracing::debug!(%filename, %url, "thumbnail generated");
                }
                ThumbnailOutcome::Failed { message } => {
                    tracing::error!(%filename, %message, "failed to generate thumbnail");
                }
                ThumbnailOutcome::NetworkError { reason } => {
                    tracing::error!(%filename, %reason, "error fetching thumbnail");
                }
            }

            processed += 1;
            emit(&progress, ThumbnailEvent::Finished {
                filename: filename.clone(),
                outcome: outcome.clone(),
                processed,
                total,
                percent: progress_percent(processed, total),
            })
            .await;
            summary.results.push((filename, outcome));

            tokio::time::sleep(self.pacing).await;
        }

        emit(&progress, ThumbnailEvent::Completed { total }).await;
        tracing::info!(
            total,
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "thumbnail generation finished"
        );

        summary
    }
}

impl<S> ThumbnailQueue<S>
where S: ThumbnailService + Send + Sync + 'static
{
    /// Runs the queue as a background task.
    ///
    /// Returns the task handle and the progress receiver.
    #[must_use]
    pub fn spawn(
        self,
        capacity: usize,
    ) -> (JoinHandle<ThumbnailSummary>, mpsc::Receiver<ThumbnailEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tokio::spawn(self.run(tx)), rx)
    }
}

async fn emit(progress: &mpsc::Sender<ThumbnailEvent>, event: ThumbnailEvent) {
    if progress.send(event).await.is_err() {
        tracing::trace!("thumbnail progress receiver dropped");
    }
}
