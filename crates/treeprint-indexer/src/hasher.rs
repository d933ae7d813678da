//! SHA-256 content hashing and the root fingerprint.

use crate::representation::FileEntry;
use crate::Result;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Hash a byte slice, returned as 64 lowercase hex characters.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Hash the full contents of a file.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Fold every `(path, hash)` pair into one digest.
///
/// Paths are sorted ascending and rendered as `path:hash` lines joined by
/// `\n` with no trailing newline. An empty map hashes the empty string.
pub fn compute_root_hash(files: &HashMap<String, FileEntry>) -> String {
    let mut paths: Vec<&String> = files.keys().collect();
    paths.sort();

    let joined = paths
        .iter()
        .map(|path| format!("{}:{}", path, files[*path].hash))
        .collect::<Vec<_>>()
        .join("\n");

    hash_bytes(joined.as_bytes())
}
