//! Configuration for the generator.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".ai/config.yaml";

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory base names that are never descended into
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

fn default_ignored_dirs() -> Vec<String> {
    ["node_modules", "dist", ".git", ".cursor", ".vscode"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

impl GeneratorConfig {
    /// Configuration with a custom ignore list.
    pub fn with_ignored_dirs<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// The ignore list that will actually be used.
    ///
    /// An empty list means "use the defaults".
    pub fn effective_ignored_dirs(&self) -> Vec<String> {
        if self.ignored_dirs.is_empty() {
            default_ignored_dirs()
        } else {
            self.ignored_dirs.clone()
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load configuration from `path`, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }
}
