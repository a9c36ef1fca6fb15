//! Command-line interface for Tagboard.
//!
//! Every library component has a command that drives it without a host UI:
//! grid fitting, board inspection, thumbnail generation and log streaming.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
pub use commands::fit::CssSurface;

use crate::error::TagboardError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), TagboardError> {
    let cli = Cli::parse();
    cli.execute()
}
