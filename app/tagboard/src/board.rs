//! The image board: one tile per image in a dataset folder.
//!
//! Tags live next to each image in `<stem>.txt` as a comma-separated list,
//! and generated thumbnails in the `.thumb` subdirectory under the image's
//! own filename.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{IMAGE_EXTENSIONS, THUMBNAIL_DIR_NAME};
use crate::error::TagboardError;

/// Thumbnail availability of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ThumbnailState {
    /// A thumbnail exists at `url`.
    Ready { url: String },
    /// No thumbnail yet.
    Missing,
    /// Generation was attempted and failed.
    Failed { reason: String },
}

impl ThumbnailState {
    #[must_use]
    pub const fn is_ready(&self) -> bool { matches!(self, Self::Ready { .. }) }
}

/// One image of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub filename: String,
    pub thumbnail: ThumbnailState,
    pub tags: Vec<String>,
}

impl Tile {
    /// Creates a tile without tags or thumbnail.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            thumbnail: ThumbnailState::Missing,
            tags: Vec::new(),
        }
    }

    /// Returns `true` if the tile carries `tag` (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool { self.tags.iter().any(|t| t == tag) }
}

/// Replacement tag list for one image, as pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    pub filename: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// All tiles of one dataset folder, ordered by filename.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    folder_path: PathBuf,
    tiles: Vec<Tile>,
}

impl Board {
    /// Builds a board from tiles, sorting them by filename.
    #[must_use]
    pub fn new(folder_path: impl Into<PathBuf>, mut tiles: Vec<Tile>) -> Self {
        tiles.sort_by(|a, b| a.filename.cmp(&b.filename));
        Self { folder_path: folder_path.into(), tiles }
    }

    /// Reads a dataset folder.
    ///
    /// # Errors
    ///
    /// Returns [`TagboardError::InvalidArguments`] if `folder` is not a
    /// directory, or an IO error if it cannot be listed.
    pub fn scan(folder: &Path) -> Result<Self, TagboardError> {
        if !folder.is_dir() {
            return Err(TagboardError::InvalidArguments(format!(
                "Folder not found: '{}'",
                folder.display()
            )));
        }

        let thumb_dir = folder.join(THUMBNAIL_DIR_NAME);
        let mut tiles = Vec::new();

        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if !path.is_file() || !is_image(&path) {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping image with non UTF-8 name");
                continue;
            };

            let thumbnail = if thumb_dir.join(filename).is_file() {
                ThumbnailState::Ready {
                    url: format!("{THUMBNAIL_DIR_NAME}/{filename}"),
                }
            } else {
                ThumbnailState::Missing
            };

            tiles.push(Tile {
                filename: filename.to_string(),
                thumbnail,
                tags: read_tags(&path.with_extension("txt")),
            });
        }

        if tiles.is_empty() {
            tracing::warn!(folder = %folder.display(), "no image files found in folder");
        }

        Ok(Self::new(folder, tiles))
    }

    #[must_use]
    pub fn folder_path(&self) -> &Path { &self.folder_path }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] { &self.tiles }

    #[must_use]
    pub const fn len(&self) -> usize { self.tiles.len() }

    #[must_use]
    pub const fn is_empty(&self) -> bool { self.tiles.is_empty() }

    /// Looks up a tile by filename.
    #[must_use]
    pub fn tile(&self, filename: &str) -> Option<&Tile> {
        self.index_of(filename).map(|idx| &self.tiles[idx])
    }

    #[must_use]
    pub fn contains(&self, filename: &str) -> bool { self.index_of(filename).is_some() }

    /// Filenames without a ready thumbnail, in board order.
    #[must_use]
    pub fn missing_thumbnails(&self) -> Vec<String> {
        self.tiles
            .iter()
            .filter(|tile| !tile.thumbnail.is_ready())
            .map(|tile| tile.filename.clone())
            .collect()
    }

    /// Replaces the tags of the named tiles.
    ///
    /// Unknown filenames are logged and skipped. Returns how many tiles were
    /// updated.
    pub fn apply_tag_updates(&mut self, updates: &[TagUpdate]) -> usize {
        let mut applied = 0;

        for update in updates {
            match self.index_of(&update.filename) {
                Some(idx) => {
                    self.tiles[idx].tags.clone_from(&update.tags);
                    applied += 1;
                }
                None => {
                    tracing::warn!(filename = %update.filename, "tag update for unknown image");
                }
            }
        }

        applied
    }

    /// Sets the thumbnail state of one tile. Returns `false` if unknown.
    pub fn mark_thumbnail(&mut self, filename: &str, state: ThumbnailState) -> bool {
        let Some(idx) = self.index_of(filename) else {
            return false;
        };
        self.tiles[idx].thumbnail = state;
        true
    }

    /// Number of tiles carrying each tag.
    #[must_use]
    pub fn tag_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for tag in self.tiles.iter().flat_map(|tile| &tile.tags) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
        counts
    }

    fn index_of(&self, filename: &str) -> Option<usize> {
        self.tiles.binary_search_by(|tile| tile.filename.as_str().cmp(filename)).ok()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Splits a tag file body on commas, trimming and dropping empties.
#[must_use]
pub fn parse_tags(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn read_tags(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_tags(&content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read tag file");
            Vec::new()
        }
    }
}
