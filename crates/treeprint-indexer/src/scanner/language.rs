//! Language detection for source files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source languages handled by the shallow extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    /// Google Apps Script (`.gs`), JavaScript syntax.
    AppsScript,
}

impl Language {
    /// Get the display name for this language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::AppsScript => "Apps Script",
        }
    }

    /// The file extension (with leading dot) that selects this language.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => ".js",
            Language::TypeScript => ".ts",
            Language::AppsScript => ".gs",
        }
    }

    /// Map an extension (with leading dot) to a language.
    ///
    /// Matching is exact and case-sensitive: `.JS` is not JavaScript.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            ".js" => Some(Language::JavaScript),
            ".ts" => Some(Language::TypeScript),
            ".gs" => Some(Language::AppsScript),
            _ => None,
        }
    }
}

/// Return the extension of the final path element, including the dot.
///
/// Everything from the last `.` of the file name onward counts, so a file
/// literally named `.js` has extension `.js`. Returns an empty string when
/// the name has no dot.
pub fn file_extension(path: &Path) -> &str {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return "",
    };
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Detect the language of a file based on its extension.
pub fn detect_language(path: &Path) -> Option<Language> {
    Language::from_extension(file_extension(path))
}
