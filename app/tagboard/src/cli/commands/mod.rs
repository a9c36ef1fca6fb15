//! CLI command definitions using Clap.
//!
//! Commands are organized into submodules:
//!
//! - `board` - Board listing, tag counts and selection
//! - `config_cmd` - Configuration file management
//! - `fit` - Grid layout computation
//! - `logs` - Log streaming from the feed
//! - `thumbnails` - Sequential thumbnail generation

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::constants::APP_NAME;
use crate::error::TagboardError;
use crate::{config, schema};

pub mod board;
pub mod config_cmd;
pub mod fit;
pub mod logs;
pub mod thumbnails;

pub use board::{BoardArgs, SelectArgs};
pub use config_cmd::ConfigCommands;
pub use fit::FitArgs;
pub use logs::LogsArgs;
pub use thumbnails::ThumbnailsArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tagboard CLI - grid layout, thumbnails and logs for dataset folders.
#[derive(Parser, Debug)]
#[command(name = "tagboard")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH", env = "TAGBOARD_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Compute the best-fit tile grid for a container.
    #[command(after_long_help = r#"Examples:
  tagboard fit -n 24 -W 1280 -H 720             # Default aspect ratio, 0.3px gap
  tagboard fit -n 24 -W 1280 -H 720 --gap 8     # 8px gap
  tagboard fit -n 7 -W 900 -H 600 --aspect 16:9 --json"#)]
    Fit(FitArgs),

    /// List the images of a dataset folder with thumbnails and tags.
    Board(BoardArgs),

    /// Generate missing thumbnails, one request at a time.
    Thumbnails(ThumbnailsArgs),

    /// Stream a job or topic log to stdout.
    Logs(LogsArgs),

    /// Print the selection field value for a tag or for all images.
    Select(SelectArgs),

    /// Configuration file management commands.
    ///
    /// Initialize, locate, and inspect the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Tagboard configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(tagboard completions --shell zsh)"
    ///   tagboard completions --shell fish > ~/.config/fish/completions/tagboard.fish
    #[command(verbatim_doc_comment)]
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_deref().map(crate::utils::path::expand)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), TagboardError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(TagboardError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Fit(args) => fit::execute(args),
            Commands::Board(args) => board::execute(args),
            Commands::Thumbnails(args) => thumbnails::execute(args),
            Commands::Logs(args) => logs::execute(args),
            Commands::Select(args) => board::execute_select(args),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_NAME, &mut io::stdout());
    }
}

/// Builds the single-threaded runtime async commands run on.
///
/// # Errors
///
/// Returns an IO error if the runtime cannot be created.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, TagboardError> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::LogKind;

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["tagboard", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["tagboard", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_fit() {
        let cli = Cli::try_parse_from([
            "tagboard", "fit", "--items", "24", "--width", "1280", "--height", "720", "--gap",
            "8", "--aspect", "16:9",
        ])
        .unwrap();
        match cli.command {
            Commands::Fit(args) => {
                assert_eq!(args.items, 24);
                assert!((args.width - 1280.0).abs() < f64::EPSILON);
                assert_eq!(args.gap, Some(8.0));
                assert!((args.aspect.unwrap().get() - 16.0 / 9.0).abs() < f64::EPSILON);
                assert!(!args.json);
            }
            _ => panic!("Expected Fit command"),
        }
    }

    #[test]
    fn test_cli_fit_gap_and_gap_style_conflict() {
        let result = Cli::try_parse_from([
            "tagboard", "fit", "-n", "3", "-W", "100", "-H", "100", "--gap", "2", "--gap-style",
            "2px",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_fit_rejects_bad_aspect() {
        let result =
            Cli::try_parse_from(["tagboard", "fit", "-n", "3", "-W", "100", "-H", "100", "-a", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_board_json() {
        let cli = Cli::try_parse_from(["tagboard", "board", "~/data", "--json"]).unwrap();
        match cli.command {
            Commands::Board(args) => {
                assert_eq!(args.folder, "~/data");
                assert!(args.json);
                assert!(!args.watch);
            }
            _ => panic!("Expected Board command"),
        }
    }

    #[test]
    fn test_cli_parses_logs_kind() {
        let cli = Cli::try_parse_from(["tagboard", "logs", "7", "--kind", "consumer"]).unwrap();
        match cli.command {
            Commands::Logs(args) => {
                assert_eq!(args.id, "7");
                assert_eq!(args.kind, LogKind::Named("consumer".to_string()));
            }
            _ => panic!("Expected Logs command"),
        }
    }

    #[test]
    fn test_cli_parses_select_tag() {
        let cli = Cli::try_parse_from(["tagboard", "select", "/data", "--tag", "cat"]).unwrap();
        match cli.command {
            Commands::Select(args) => assert_eq!(args.tag.as_deref(), Some("cat")),
            _ => panic!("Expected Select command"),
        }
    }

    #[test]
    fn test_cli_parses_config_show() {
        let cli = Cli::try_parse_from(["tagboard", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    // ========================================================================
    // --config flag tests
    // ========================================================================

    #[test]
    fn test_cli_parses_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tagboard", "schema", "--config", "/path/to/config.jsonc"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/path/to/config.jsonc"));
    }

    #[test]
    fn test_cli_config_path_returns_pathbuf() {
        let cli = Cli::try_parse_from(["tagboard", "-c", "/path/to/config.jsonc", "schema"]).unwrap();
        assert_eq!(cli.config_path(), Some(std::path::PathBuf::from("/path/to/config.jsonc")));
    }

    #[test]
    fn test_execute_rejects_missing_config_file() {
        let cli =
            Cli::try_parse_from(["tagboard", "-c", "/definitely/missing.jsonc", "schema"]).unwrap();
        assert!(matches!(cli.execute(), Err(TagboardError::ConfigError(_))));
    }

    #[test]
    fn test_app_version_is_not_empty() {
        assert!(!APP_VERSION.is_empty());
    }
}
