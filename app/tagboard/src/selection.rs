//! Tile selection bookkeeping.
//!
//! The selection is a set of filenames; everything that renders it (the
//! hidden form value, listings) walks the board so output follows board
//! order.

use std::collections::HashSet;

use crate::board::Board;

/// Label of the toggle-all button while not every tile is selected.
pub const SELECT_ALL_LABEL: &str = "Select All Images";

/// Label of the toggle-all button once every tile is selected.
pub const DESELECT_ALL_LABEL: &str = "Deselect All Images";

/// Selected tiles of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn len(&self) -> usize { self.selected.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.selected.is_empty() }

    #[must_use]
    pub fn is_selected(&self, filename: &str) -> bool { self.selected.contains(filename) }

    /// Flips the selection of one tile and returns its new state.
    ///
    /// Filenames not on the board are ignored and report `false`.
    pub fn toggle(&mut self, board: &Board, filename: &str) -> bool {
        if !board.contains(filename) {
            tracing::debug!(filename, "ignoring selection of unknown image");
            return false;
        }

        if self.selected.remove(filename) {
            false
        } else {
            self.selected.insert(filename.to_string());
            true
        }
    }

    pub fn select_all(&mut self, board: &Board) {
        self.selected = board.tiles().iter().map(|tile| tile.filename.clone()).collect();
    }

    pub fn deselect_all(&mut self) { self.selected.clear(); }

    /// Deselects everything if every tile is selected, otherwise selects all.
    ///
    /// Returns the new label of the toggle button.
    pub fn toggle_all(&mut self, board: &Board) -> &'static str {
        let all_selected =
            !board.is_empty() && board.tiles().iter().all(|tile| self.is_selected(&tile.filename));

        if all_selected {
            self.deselect_all();
            SELECT_ALL_LABEL
        } else {
            self.select_all(board);
            DESELECT_ALL_LABEL
        }
    }

    /// Selects exactly the tiles carrying `tag` and deselects the rest.
    ///
    /// A blank tag leaves the selection unchanged and returns `None`;
    /// otherwise returns the number of selected tiles.
    pub fn select_tagged(&mut self, board: &Board, tag: &str) -> Option<usize> {
        let tag = tag.trim();
        if tag.is_empty() {
            tracing::warn!("no current tag to select by");
            return None;
        }

        self.selected = board
            .tiles()
            .iter()
            .filter(|tile| tile.has_tag(tag))
            .map(|tile| tile.filename.clone())
            .collect();

        Some(self.selected.len())
    }

    /// Drops selected filenames that are no longer on the board.
    pub fn retain_known(&mut self, board: &Board) {
        self.selected.retain(|filename| board.contains(filename));
    }

    /// Selected filenames in board order.
    #[must_use]
    pub fn selected_filenames<'a>(&self, board: &'a Board) -> Vec<&'a str> {
        board
            .tiles()
            .iter()
            .filter(|tile| self.is_selected(&tile.filename))
            .map(|tile| tile.filename.as_str())
            .collect()
    }

    /// The value of the hidden selection form field: filenames joined by `,`.
    #[must_use]
    pub fn to_input_value(&self, board: &Board) -> String { self.selected_filenames(board).join(",") }
}
