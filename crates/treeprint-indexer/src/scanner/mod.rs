//! File system scanner module.
//!
//! Provides the directory walker, language detection, canonical path keys
//! and the shallow symbol extractor.

mod language;
mod parser;
mod path;
mod walker;

pub use language::{detect_language, file_extension, Language};
pub use parser::{FileStructure, Parser, SymbolExtractor};
pub use path::{normalize_path, relative_key};
pub use walker::{DiscoveredFile, WalkOutput, Walker};
