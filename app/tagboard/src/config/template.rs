//! Configuration template generation.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// Each option shows its default value.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Tagboard Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Schema: run `tagboard schema > tagboard.schema.json`

{
  // ============================================================================
  // Server
  // ============================================================================
  // "server": {
  //   // Base URL of the dataset tagger server
  //   "baseUrl": "http://127.0.0.1:8000",
  //
  //   // Thumbnail generation endpoint, relative to baseUrl
  //   "thumbnailPath": "/tools/dataset-tagger/generate-thumbnail",
  //
  //   // WebSocket URL streaming logs and tag updates
  //   "feedUrl": "ws://127.0.0.1:8000/ws/app_manager",
  //
  //   // Timeout for a single HTTP request, in seconds
  //   "requestTimeoutSecs": 30
  // },

  // ============================================================================
  // Tile Grid
  // ============================================================================
  // "grid": {
  //   // Tile width divided by tile height (2/3 = portrait)
  //   "aspectRatio": 0.6666666666666666,
  //
  //   // Delay before the first layout after the board is shown (ms)
  //   "mountDelayMs": 100,
  //
  //   // Quiet window after the last resize before relayout (ms)
  //   "resizeSettleMs": 250
  // },

  // ============================================================================
  // Thumbnail Generation
  // ============================================================================
  // "thumbnails": {
  //   // Pause between two thumbnail requests (ms)
  //   "pacingMs": 25,
  //
  //   // How long the finished progress bar stays visible (ms)
  //   "progressLingerMs": 1500
  // },

  // ============================================================================
  // Log Streaming
  // ============================================================================
  // "logs": {
  //   // Poll interval while waiting for the feed socket to open (ms)
  //   "subscribeRetryMs": 200
  // }
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TagboardConfig, parse_config};

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_config(&generate_config_template()).unwrap();
        assert_eq!(config, TagboardConfig::default());
    }

    #[test]
    fn test_template_contains_all_sections() {
        let template = generate_config_template();
        for section in ["\"server\"", "\"grid\"", "\"thumbnails\"", "\"logs\""] {
            assert!(template.contains(section), "missing {section}");
        }
    }

    fn is_option_line(rest: &str) -> bool {
        rest.starts_with('"')
            || rest.starts_with('}')
            || (rest.starts_with("  ") && !rest.trim_start().starts_with("//"))
    }

    #[test]
    fn test_uncommented_template_matches_defaults() {
        // Removing the leading `// ` from option lines yields the defaults.
        let uncommented: String = generate_config_template()
            .lines()
            .map(|line| match line.strip_prefix("  // ") {
                Some(rest) if is_option_line(rest) => format!("  {rest}"),
                _ => line.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");

        let config = parse_config(&uncommented).unwrap();
        assert_eq!(config, TagboardConfig::default());
    }

    #[test]
    fn test_create_config_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        create_config_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_config_template());
    }
}
