//! Config CLI commands.
//!
//! Commands for managing the Tagboard configuration file.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, config_paths};
use crate::error::TagboardError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Every option is written commented out with its default value.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  tagboard config init              # Create config at default location
  tagboard config init --force      # Overwrite existing config
  tagboard config init --path ~/tagboard.jsonc  # Create at custom path
  tagboard config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses the first search path.
        #[arg(long, short, value_name = "PATH")]
        path: Option<String>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration file search paths.
    Path,

    /// Show the effective configuration as JSON.
    Show,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), TagboardError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                let path = path.as_deref().map(crate::utils::path::expand);
                init_config(*force, path).map(|_| ())
            }
        }
        ConfigCommands::Path => {
            show_config_paths();
            Ok(())
        }
        ConfigCommands::Show => {
            show_config();
            Ok(())
        }
    }
}

/// Writes the template, refusing to overwrite unless `force` is set.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<PathBuf, TagboardError> {
    let config_path = custom_path
        .or_else(|| config_paths().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("config.jsonc"));

    if config_path.exists() && !force {
        return Err(TagboardError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        TagboardError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");

    Ok(config_path)
}

fn show_config_paths() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)".green().to_string()
        } else if exists {
            " (exists)".to_string()
        } else {
            String::new()
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'tagboard config init' to create one.");
    }
}

fn show_config() {
    let config = config::get_config();
    match config::get_config_path() {
        Some(path) => eprintln!("{}", format!("# {}", path.display()).dimmed()),
        None => eprintln!("{}", "# defaults".dimmed()),
    }
    output::print_json(config);
}
