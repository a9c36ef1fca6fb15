#![allow(clippy::multiple_crate_versions)]

//! Tagboard CLI entry point.

use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "tagboard_lib=info";

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = tagboard_lib::cli::run() {
        eprintln!("tagboard: {err}");
        std::process::exit(1);
    }
}
