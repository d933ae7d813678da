//! Canonical path keys.
//!
//! A key is root-relative, forward-slash separated and in Unicode NFC, so the
//! same logical file gets the same key on every platform and filesystem.

use std::path::{Path, MAIN_SEPARATOR};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a relative path string.
///
/// Applies, in order: platform separator to `/`, removal of a single leading
/// `./`, and NFC composition.
pub fn normalize_path(relative: &str) -> String {
    let slashed = if MAIN_SEPARATOR == '/' {
        relative.to_string()
    } else {
        relative.replace(MAIN_SEPARATOR, "/")
    };

    let trimmed = slashed.strip_prefix("./").unwrap_or(&slashed);

    trimmed.nfc().collect()
}

/// Compute the canonical key of `path` relative to `root`.
///
/// Returns `None` when `path` is not under `root` or is not valid UTF-8.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(normalize_path(relative.to_str()?))
}
