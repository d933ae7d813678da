//! Full and incremental generation of the repository representation.

use crate::config::GeneratorConfig;
use crate::hasher::hash_bytes;
use crate::representation::{FileEntry, Representation};
use crate::scanner::{file_extension, relative_key, Parser, SymbolExtractor, Walker};
use crate::{IndexerError, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters describing one generate or update run.
///
/// Never part of the serialized representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    /// Files hashed and freshly parsed
    pub files_indexed: usize,
    /// Files whose prior entry was carried over unchanged
    pub files_reused: usize,
    /// Entries left out because of an access or read error
    pub files_skipped: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Walks a source tree and builds its [`Representation`].
///
/// The ignore set is fixed at construction. Each call is independent and
/// runs to completion on the calling thread.
pub struct Generator {
    extractor: Box<dyn SymbolExtractor>,
    ignored_dirs: Arc<HashSet<String>>,
}

impl Generator {
    /// Create a generator using the JavaScript-family parser.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_extractor(config, Box::new(Parser::new()))
    }

    /// Create a generator with a custom extractor.
    pub fn with_extractor(config: GeneratorConfig, extractor: Box<dyn SymbolExtractor>) -> Self {
        let ignored_dirs = config.effective_ignored_dirs().into_iter().collect();
        Self {
            extractor,
            ignored_dirs: Arc::new(ignored_dirs),
        }
    }

    /// Ignored directory names, sorted.
    pub fn ignored_dirs(&self) -> Vec<&str> {
        let mut dirs: Vec<&str> = self.ignored_dirs.iter().map(String::as_str).collect();
        dirs.sort_unstable();
        dirs
    }

    /// Build a fresh representation of every supported file under `root`.
    pub fn generate(&self, root: &Path) -> Result<Representation> {
        self.generate_with_stats(root).map(|(representation, _)| representation)
    }

    /// Like [`Generator::generate`], also returning run counters.
    pub fn generate_with_stats(&self, root: &Path) -> Result<(Representation, GenerateStats)> {
        self.run(root, HashMap::new())
    }

    /// Rebuild the representation, carrying over every prior entry whose
    /// content hash still matches the file on disk.
    ///
    /// Entries for files that no longer exist are dropped.
    pub fn update(&self, prior: Representation, root: &Path) -> Result<Representation> {
        self.update_with_stats(prior, root)
            .map(|(representation, _)| representation)
    }

    /// Like [`Generator::update`], also returning run counters.
    pub fn update_with_stats(
        &self,
        prior: Representation,
        root: &Path,
    ) -> Result<(Representation, GenerateStats)> {
        self.run(root, prior.files)
    }

    fn run(
        &self,
        root: &Path,
        mut prior: HashMap<String, FileEntry>,
    ) -> Result<(Representation, GenerateStats)> {
        let start = Instant::now();
        let root = resolve_root(root)?;

        info!(path = ?root, prior_files = prior.len(), "Starting generation");

        let walked = Walker::new(&root, Arc::clone(&self.ignored_dirs)).walk();

        let mut stats = GenerateStats {
            files_skipped: walked.access_errors,
            ..Default::default()
        };
        let mut files: HashMap<String, FileEntry> = HashMap::new();

        for discovered in walked.files {
            let path = discovered.path;

            if !self.extractor.supports_extension(file_extension(&path)) {
                debug!(path = ?path, "Unsupported extension");
                continue;
            }

            let Some(key) = relative_key(&root, &path) else {
                warn!(path = ?path, "Failed to compute relative path");
                stats.files_skipped += 1;
                continue;
            };

            let content = match std::fs::read(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to read file");
                    stats.files_skipped += 1;
                    continue;
                }
            };

            let hash = hash_bytes(&content);

            let entry = match prior.remove(&key) {
                Some(previous) if previous.hash == hash => {
                    debug!(path = %key, "Unchanged, reusing entry");
                    stats.files_reused += 1;
                    previous
                }
                _ => {
                    debug!(path = %key, size = discovered.size, "Parsing");
                    stats.files_indexed += 1;
                    let source = String::from_utf8_lossy(&content);
                    FileEntry::new(hash, self.extractor.extract(&source))
                }
            };

            if files.insert(key.clone(), entry).is_some() {
                warn!(path = %key, "Multiple files normalize to the same path, keeping the last");
            }
        }

        let representation = Representation::from_files(files);
        stats.duration_ms = elapsed_ms(start);

        info!(
            files = representation.file_count(),
            indexed = stats.files_indexed,
            reused = stats.files_reused,
            skipped = stats.files_skipped,
            dropped = prior.len(),
            duration_ms = stats.duration_ms,
            "Generation complete"
        );

        Ok((representation, stats))
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

/// Resolve `root` to an absolute, lexically cleaned path.
///
/// Symlinks are not resolved. A symlinked root is accepted here and yields
/// an empty walk.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let absolute =
        std::path::absolute(root).map_err(|_| IndexerError::NotFound(root.to_path_buf()))?;
    let resolved = clean_path(&absolute);

    let metadata = std::fs::symlink_metadata(&resolved)
        .map_err(|_| IndexerError::NotFound(root.to_path_buf()))?;

    if !metadata.is_dir() && !metadata.file_type().is_symlink() {
        return Err(IndexerError::NotADirectory(resolved));
    }

    Ok(resolved)
}

/// Drop `.` components and fold `..` into its parent without touching the
/// filesystem. `..` at the root stays at the root.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
