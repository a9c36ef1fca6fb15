//! `tagboard thumbnails`: generate missing thumbnails of a dataset folder.

use clap::Args;
use colored::Colorize;

use super::runtime;
use crate::board::{Board, ThumbnailState};
use crate::cli::output;
use crate::config;
use crate::error::TagboardError;
use crate::thumbnails::{
    HttpThumbnailService, ThumbnailEvent, ThumbnailOutcome, ThumbnailQueue, ThumbnailSummary,
};
use crate::utils::path;

/// Width of the progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 30;

/// Arguments of the `thumbnails` command.
#[derive(Args, Debug)]
pub struct ThumbnailsArgs {
    /// Dataset folder containing the images.
    #[arg(value_name = "FOLDER")]
    pub folder: String,

    /// Thumbnail endpoint URL. Defaults to the configured server.
    #[arg(long, short, value_name = "URL", env = "TAGBOARD_THUMBNAIL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Regenerate every thumbnail, not just the missing ones.
    #[arg(long, short)]
    pub force: bool,
}

/// Runs the `thumbnails` command.
///
/// Individual failures are reported and skipped; only setup errors abort.
///
/// # Errors
///
/// Returns an error if the folder cannot be read, the HTTP client cannot be
/// built, or the queue task panics.
pub fn execute(args: &ThumbnailsArgs) -> Result<(), TagboardError> {
    let config = config::get_config();
    let mut board = Board::scan(&path::expand(&args.folder))?;

    let filenames: Vec<String> = if args.force {
        board.tiles().iter().map(|tile| tile.filename.clone()).collect()
    } else {
        board.missing_thumbnails()
    };

    if filenames.is_empty() {
        println!("{}", "All thumbnails are up to date.".green());
        return Ok(());
    }

    let service = match &args.endpoint {
        Some(endpoint) => HttpThumbnailService::new(endpoint, config.server.request_timeout())?,
        None => HttpThumbnailService::from_config(&config.server)?,
    };
    tracing::debug!(endpoint = service.endpoint(), "using thumbnail endpoint");

    let queue = ThumbnailQueue::new(
        service,
        path::to_form_value(board.folder_path()),
        filenames,
        config.thumbnails.pacing(),
    );

    let summary = runtime()?.block_on(async {
        let (handle, mut events) = queue.spawn(16);
        while let Some(event) = events.recv().await {
            event.apply_to(&mut board);
            print_event(&event);
        }
        handle.await
    });
    let summary = summary.map_err(|err| TagboardError::CommandError(err.to_string()))?;

    print_summary(&summary);
    print_unavailable(&board);
    Ok(())
}

fn print_event(event: &ThumbnailEvent) {
    if let ThumbnailEvent::Finished { filename, outcome, percent, .. } = event {
        let bar = output::progress_bar(*percent, PROGRESS_BAR_WIDTH);
        println!("{bar} {}", outcome_line(filename, outcome));
    } else if let Some(status) = event.status_line() {
        println!("{}", status.bold());
    }
}

fn outcome_line(filename: &str, outcome: &ThumbnailOutcome) -> String {
    match outcome {
        ThumbnailOutcome::Ready { .. } => format!("{} {filename}", "✓".green()),
        ThumbnailOutcome::Failed { message } => {
            format!("{} {filename}: {}", "✗".red(), message)
        }
        ThumbnailOutcome::NetworkError { reason } => {
            format!("{} {filename}: {} ({reason})", "✗".red(), outcome.label())
        }
    }
}

fn print_summary(summary: &ThumbnailSummary) {
    let failed = summary.failed();
    let line = format!("{} generated, {failed} failed.", summary.succeeded());
    if failed == 0 {
        println!("{}", line.green());
    } else {
        println!("{}", line.yellow());
    }
}

/// Tiles still without a thumbnail after the run.
fn unavailable_lines(board: &Board) -> Vec<String> {
    board
        .tiles()
        .iter()
        .filter_map(|tile| match &tile.thumbnail {
            ThumbnailState::Ready { .. } => None,
            ThumbnailState::Missing => Some(format!("{} (missing)", tile.filename)),
            ThumbnailState::Failed { reason } => Some(format!("{} ({reason})", tile.filename)),
        })
        .collect()
}

fn print_unavailable(board: &Board) {
    let lines = unavailable_lines(board);
    if lines.is_empty() {
        return;
    }
    println!("{}", format!("{} image(s) still without a thumbnail:", lines.len()).yellow());
    for line in lines {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Tile;

    #[test]
    fn test_unavailable_lines_follow_board_state() {
        let mut board =
            Board::new("/data", vec![Tile::new("a.png"), Tile::new("b.png"), Tile::new("c.png")]);
        let finished = |filename: &str, outcome| ThumbnailEvent::Finished {
            filename: filename.to_string(),
            outcome,
            processed: 1,
            total: 2,
            percent: 50,
        };

        finished("a.png", ThumbnailOutcome::Ready { url: "/t/a.png".to_string() })
            .apply_to(&mut board);
        finished("b.png", ThumbnailOutcome::Failed { message: "corrupt".to_string() })
            .apply_to(&mut board);

        assert_eq!(unavailable_lines(&board), ["b.png (corrupt)", "c.png (missing)"]);
    }

    #[test]
    fn test_outcome_line() {
        let ready = outcome_line("a.png", &ThumbnailOutcome::Ready { url: "/t/a.png".to_string() });
        assert!(ready.contains("a.png"));

        let failed = outcome_line(
            "b.png",
            &ThumbnailOutcome::Failed { message: "Unknown error".to_string() },
        );
        assert!(failed.contains("b.png: Unknown error"));

        let network = outcome_line(
            "c.png",
            &ThumbnailOutcome::NetworkError { reason: "refused".to_string() },
        );
        assert!(network.contains("Network Error (refused)"));
    }
}
