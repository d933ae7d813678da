//! Persistence of the representation as canonical JSON.

use crate::representation::Representation;
use crate::{IndexerError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the persisted representation, relative to the
/// working directory.
pub const DEFAULT_IR_PATH: &str = ".ai/ir.json";

fn resolve_path(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_IR_PATH)
    } else {
        path.to_path_buf()
    }
}

/// Serialize and write a representation.
///
/// An empty `path` selects [`DEFAULT_IR_PATH`]. Missing parent directories
/// are created. The file is written next to its target and renamed into
/// place.
pub fn save(representation: &Representation, path: &Path) -> Result<()> {
    let path = resolve_path(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let data = representation.to_json()?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("ir.json");
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));
    std::fs::write(&temp_path, &data)?;
    std::fs::rename(&temp_path, &path)?;

    debug!(path = ?path, size = data.len(), files = representation.file_count(), "Saved representation");

    Ok(())
}

/// Read and parse a persisted representation.
///
/// A missing file is [`IndexerError::NotFound`]; content that is not a
/// serialized representation is [`IndexerError::Serialization`]. Either way
/// the caller can discard it and regenerate.
pub fn load(path: &Path) -> Result<Representation> {
    let path = resolve_path(path);

    if !path.exists() {
        return Err(IndexerError::NotFound(path));
    }

    let data = std::fs::read(&path)?;
    let representation = Representation::from_json(&data)?;

    debug!(path = ?path, files = representation.file_count(), "Loaded representation");

    Ok(representation)
}
