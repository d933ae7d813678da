//! The repository representation and its canonical JSON form.
//!
//! In memory, files live in a `HashMap`. On the wire they are always emitted
//! in ascending key order, so the serialized bytes depend only on content.

use crate::scanner::FileStructure;
use crate::Result;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Schema version written to every representation.
pub const CURRENT_VERSION: u32 = 1;

/// Fingerprint and shallow structure of a whole source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    /// Schema version
    pub version: u32,

    /// Digest over every `(path, hash)` pair
    pub root_hash: String,

    /// Entries keyed by canonical relative path
    #[serde(default, serialize_with = "ordered_files")]
    pub files: HashMap<String, FileEntry>,
}

/// Per-file record: content hash plus four sorted symbol lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// SHA-256 of the raw file bytes, lowercase hex
    pub hash: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub exports: Vec<String>,
}

impl FileEntry {
    /// Build an entry from a content hash and an extracted structure.
    pub fn new(hash: String, structure: FileStructure) -> Self {
        Self {
            hash,
            imports: structure.imports,
            functions: structure.functions,
            classes: structure.classes,
            exports: structure.exports,
        }
    }
}

impl Representation {
    /// A representation with no files.
    ///
    /// Its root hash is the digest of the empty byte sequence.
    pub fn empty() -> Self {
        Self::from_files(HashMap::new())
    }

    /// Build a representation and compute its root hash.
    pub fn from_files(files: HashMap<String, FileEntry>) -> Self {
        let root_hash = crate::hasher::compute_root_hash(&files);
        Self {
            version: CURRENT_VERSION,
            root_hash,
            files,
        }
    }

    /// Number of file entries.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Canonical JSON bytes: fixed field order, sorted file keys, two-space
    /// indentation, no trailing newline.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parse canonical JSON bytes.
    ///
    /// Missing symbol lists and a missing `files` object default to empty.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Paths in ascending order.
    pub fn sorted_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.files.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

/// Render a representation to canonical bytes.
pub fn serialize(representation: &Representation) -> Result<Vec<u8>> {
    representation.to_json()
}

/// Parse canonical bytes back into a representation.
pub fn deserialize(data: &[u8]) -> Result<Representation> {
    Representation::from_json(data)
}

fn ordered_files<S>(
    files: &HashMap<String, FileEntry>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let ordered: BTreeMap<&String, &FileEntry> = files.iter().collect();
    ordered.serialize(serializer)
}
