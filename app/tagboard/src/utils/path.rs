//! Folder argument expansion.

use std::path::PathBuf;

/// Expands `~` in a folder argument.
///
/// Absolute and relative paths are returned unchanged; an empty argument
/// becomes an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Renders a folder path the way the server expects it in form fields.
#[must_use]
pub fn to_form_value(path: &std::path::Path) -> String { path.to_string_lossy().into_owned() }
