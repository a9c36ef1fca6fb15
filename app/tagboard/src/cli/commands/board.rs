//! `tagboard board` and `tagboard select`: inspect a dataset folder.

use clap::Args;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::runtime;
use crate::board::{Board, ThumbnailState};
use crate::cli::output;
use crate::config;
use crate::error::TagboardError;
use crate::feed::{ConnectionState, FeedConnection, FeedError, FeedMessage, sync_tags};
use crate::selection::Selection;
use crate::utils::path;

/// Maximum characters of the tags column.
const TAGS_COLUMN_WIDTH: usize = 60;

/// Arguments of the `board` command.
#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Dataset folder containing the images.
    #[arg(value_name = "FOLDER")]
    pub folder: String,

    /// Show tag usage counts instead of the tile list.
    #[arg(long, short)]
    pub tags: bool,

    /// Output as JSON.
    #[arg(long, short)]
    pub json: bool,

    /// After listing, keep running and print tag updates pushed by the server.
    #[arg(long, short)]
    pub watch: bool,

    /// Feed WebSocket URL used by `--watch`. Defaults to the configured feed.
    #[arg(long, value_name = "WS", env = "TAGBOARD_FEED_URL")]
    pub url: Option<String>,
}

/// Arguments of the `select` command.
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Dataset folder containing the images.
    #[arg(value_name = "FOLDER")]
    pub folder: String,

    /// Select the images carrying this tag.
    #[arg(long, short, required_unless_present = "all", conflicts_with = "all")]
    pub tag: Option<String>,

    /// Select every image.
    #[arg(long, short)]
    pub all: bool,
}

#[derive(Tabled)]
struct TileRow {
    #[tabled(rename = "Image")]
    filename: String,
    #[tabled(rename = "Thumbnail")]
    thumbnail: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Images")]
    count: usize,
}

fn load_board(folder: &str) -> Result<Board, TagboardError> { Board::scan(&path::expand(folder)) }

fn thumbnail_cell(state: &ThumbnailState) -> String {
    match state {
        ThumbnailState::Ready { .. } => output::format_bool(true),
        ThumbnailState::Missing => "missing".dimmed().to_string(),
        ThumbnailState::Failed { reason } => format!("{} {}", "error:".red(), reason),
    }
}

/// Runs the `board` command.
///
/// # Errors
///
/// Returns an error if the folder cannot be read.
pub fn execute(args: &BoardArgs) -> Result<(), TagboardError> {
    let board = load_board(&args.folder)?;
    print_board(&board, args);

    if args.watch {
        let url = args.url.clone().unwrap_or_else(|| config::get_config().server.feed_url.clone());
        watch(board, url)?;
    }

    Ok(())
}

fn print_board(board: &Board, args: &BoardArgs) {
    if args.tags {
        let counts = board.tag_counts();
        if args.json {
            output::print_json(&counts);
            return;
        }
        if counts.is_empty() {
            println!("{}", "No tags found.".dimmed());
            return;
        }

        let rows = counts.into_iter().map(|(tag, count)| TagRow { tag: tag.to_string(), count });
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Alignment::right()))
            .to_string();
        println!("{table}");
        return;
    }

    if args.json {
        output::print_json(board);
        return;
    }

    if board.is_empty() {
        println!("{}", "No images found.".dimmed());
        return;
    }

    let rows: Vec<TileRow> = board
        .tiles()
        .iter()
        .map(|tile| TileRow {
            filename: tile.filename.clone(),
            thumbnail: thumbnail_cell(&tile.thumbnail),
            tags: output::truncate(&tile.tags.join(", "), TAGS_COLUMN_WIDTH),
        })
        .collect();

    let missing = board.missing_thumbnails().len();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::center()))
        .to_string();

    println!("{}", format!("Images ({})", board.len()).bold());
    println!("{table}");
    if missing > 0 {
        println!("{missing} thumbnail(s) missing. Run 'tagboard thumbnails {}'.", args.folder);
    }
}

/// Applies tag updates from the feed to `board` until the feed closes.
fn watch(mut board: Board, url: String) -> Result<(), TagboardError> {
    let retry = config::get_config().logs.subscribe_retry();

    runtime()?.block_on(async move {
        let (connection, mut messages) = FeedConnection::connect(url, retry);
        eprintln!("{}", "Watching for tag updates...".dimmed());

        while let Some(message) = messages.recv().await {
            let FeedMessage::TagsUpdated { value } = &message else {
                continue;
            };
            let updated = sync_tags(&mut board, &message).unwrap_or_default();
            tracing::debug!(updated, "applied tag updates");

            for tile in value.iter().filter_map(|update| board.tile(&update.filename)) {
                println!("{} {}", tile.filename.bold(), tile.tags.join(", "));
            }
        }

        match connection.state() {
            ConnectionState::Failed(reason) => {
                Err(FeedError::ConnectionFailed { url: connection.url().to_string(), reason }.into())
            }
            _ => Ok(()),
        }
    })
}

/// Runs the `select` command: prints the hidden selection field value.
///
/// # Errors
///
/// Returns an error if the folder cannot be read.
pub fn execute_select(args: &SelectArgs) -> Result<(), TagboardError> {
    let board = load_board(&args.folder)?;
    let selection = select(&board, args.tag.as_deref(), args.all)?;

    tracing::debug!(selected = selection.len(), "selection computed");
    println!("{}", selection.to_input_value(&board));
    Ok(())
}

fn select(board: &Board, tag: Option<&str>, all: bool) -> Result<Selection, TagboardError> {
    let mut selection = Selection::new();

    if all {
        selection.toggle_all(board);
        return Ok(selection);
    }

    let tag = tag.unwrap_or_default();
    if selection.select_tagged(board, tag).is_none() {
        return Err(TagboardError::InvalidArguments("Tag cannot be empty".to_string()));
    }
    Ok(selection)
}
