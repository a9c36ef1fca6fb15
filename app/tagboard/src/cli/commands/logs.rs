//! `tagboard logs`: stream a job or topic log from the feed.

use std::io::Write;

use clap::Args;
use colored::Colorize;

use super::runtime;
use crate::config;
use crate::error::TagboardError;
use crate::feed::{FeedConnection, LogAppend, LogKind, LogViewer};

/// Arguments of the `logs` command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Job id, or topic name for non-job logs.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Log kind: "job", or the name of another log stream (e.g. "consumer").
    #[arg(long, short, default_value = "job")]
    pub kind: LogKind,

    /// Feed WebSocket URL. Defaults to the configured feed.
    #[arg(long, short, value_name = "WS", env = "TAGBOARD_FEED_URL")]
    pub url: Option<String>,
}

/// Runs the `logs` command until the server closes the feed.
///
/// # Errors
///
/// Returns an error if the feed cannot be reached.
pub fn execute(args: &LogsArgs) -> Result<(), TagboardError> {
    let config = config::get_config();
    let url = args.url.clone().unwrap_or_else(|| config.server.feed_url.clone());
    let retry = config.logs.subscribe_retry();

    runtime()?.block_on(async move {
        let (connection, mut messages) = FeedConnection::connect(url, retry);
        let mut viewer = LogViewer::new();

        let request = viewer.open(&args.id, &args.kind);
        eprintln!("{}", viewer.content().dimmed());
        connection.subscribe(&request).await?;
        viewer.on_subscribed();

        let mut printed = 0;
        let mut stdout = std::io::stdout();

        while let Some(message) = messages.recv().await {
            if let LogAppend::Appended { .. } = viewer.ingest(&message) {
                let content = viewer.content();
                stdout.write_all(content[printed..].as_bytes())?;
                stdout.flush()?;
                printed = content.len();
            }
        }

        viewer.close();
        tracing::info!(state = ?connection.state(), "feed closed");
        Ok::<(), TagboardError>(())
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: LogsArgs,
    }

    #[test]
    fn test_kind_defaults_to_job() {
        let parsed = Wrapper::try_parse_from(["logs", "42"]).unwrap();
        assert_eq!(parsed.args.kind, LogKind::Job);
        assert_eq!(parsed.args.id, "42");
    }

    #[test]
    fn test_named_kind() {
        let parsed = Wrapper::try_parse_from(["logs", "main", "--kind", "consumer"]).unwrap();
        assert_eq!(parsed.args.kind, LogKind::Named("consumer".to_string()));
    }

    #[test]
    fn test_invalid_kind_is_rejected() {
        assert!(Wrapper::try_parse_from(["logs", "1", "--kind", "a b"]).is_err());
    }
}
