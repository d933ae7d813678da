//! Treeprint Indexer
//!
//! Deterministic fingerprinting of JavaScript-family source trees:
//! - Directory walking with a fixed ignore set and symlink skipping
//! - Shallow regex extraction of imports, functions, classes and exports
//! - SHA-256 content hashes and a root fingerprint over the whole tree
//! - Incremental updates that reuse unchanged entries
//! - Canonical JSON persistence with sorted keys

mod error;
pub mod config;
pub mod generator;
pub mod hasher;
pub mod representation;
pub mod scanner;
pub mod storage;

pub use config::GeneratorConfig;
pub use error::{IndexerError, Result};
pub use generator::{GenerateStats, Generator};
pub use hasher::{compute_root_hash, hash_bytes, hash_file};
pub use representation::{FileEntry, Representation, CURRENT_VERSION};
pub use scanner::{
    detect_language, normalize_path, FileStructure, Language, Parser, SymbolExtractor,
};
pub use storage::{load, save, DEFAULT_IR_PATH};
