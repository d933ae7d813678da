//! Depth-first file system walker with directory-name exclusion.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A regular file found during the walk.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Files found by a walk plus the number of entries that could not be read.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    /// Regular files, in walk order
    pub files: Vec<DiscoveredFile>,
    /// Entries skipped because of an access error
    pub access_errors: usize,
}

/// Sequential walker that never follows symlinks and skips any directory
/// whose base name is in the ignore set.
///
/// No `.gitignore`, hidden-file or other implicit filtering is applied.
pub struct Walker {
    root: PathBuf,
    ignored_dirs: Arc<HashSet<String>>,
}

impl Walker {
    /// Create a new walker for the given root directory.
    pub fn new(root: &Path, ignored_dirs: Arc<HashSet<String>>) -> Self {
        Self {
            root: root.to_path_buf(),
            ignored_dirs,
        }
    }

    /// Walk the directory tree.
    ///
    /// Access errors on individual entries are logged and counted; they
    /// never stop the walk.
    pub fn walk(&self) -> WalkOutput {
        if self.root_excluded() {
            return WalkOutput::default();
        }

        let ignored = Arc::clone(&self.ignored_dirs);

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                if !is_dir {
                    return true;
                }
                let skip = entry
                    .file_name()
                    .to_str()
                    .map(|name| ignored.contains(name))
                    .unwrap_or(false);
                if skip {
                    debug!(path = ?entry.path(), "Skipping ignored directory");
                }
                !skip
            })
            .build();

        let mut output = WalkOutput::default();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to access entry");
                    output.access_errors += 1;
                    continue;
                }
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_symlink() {
                debug!(path = ?entry.path(), "Skipping symlink");
                continue;
            }

            if !file_type.is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => output.files.push(DiscoveredFile {
                    path: entry.path().to_path_buf(),
                    size: metadata.len(),
                }),
                Err(e) => {
                    warn!(path = ?entry.path(), error = %e, "Failed to stat file");
                    output.access_errors += 1;
                }
            }
        }

        output
    }

    /// The root gets the same symlink and ignore checks as any other entry.
    fn root_excluded(&self) -> bool {
        match std::fs::symlink_metadata(&self.root) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                debug!(path = ?self.root, "Skipping symlinked root");
                return true;
            }
            Ok(_) => {}
            // The walk itself reports the access error
            Err(_) => return false,
        }

        let ignored = self
            .root
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.ignored_dirs.contains(name))
            .unwrap_or(false);
        if ignored {
            debug!(path = ?self.root, "Skipping ignored root directory");
        }
        ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn ignore_set(names: &[&str]) -> Arc<HashSet<String>> {
        Arc::new(names.iter().map(|n| n.to_string()).collect())
    }

    fn names(output: &WalkOutput) -> Vec<String> {
        output
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_walker_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));

        let output = walker.walk();
        assert!(output.files.is_empty());
        assert_eq!(output.access_errors, 0);
    }

    #[test]
    fn test_walker_handles_nested_directories() {
        let temp_dir = tempdir().unwrap();

        fs::create_dir_all(temp_dir.path().join("a/b/c")).unwrap();
        File::create(temp_dir.path().join("a/file1.js")).unwrap();
        File::create(temp_dir.path().join("a/b/file2.js")).unwrap();
        File::create(temp_dir.path().join("a/b/c/file3.js")).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));
        assert_eq!(walker.walk().files.len(), 3);
    }

    #[test]
    fn test_walker_skips_ignored_directory_names() {
        let temp_dir = tempdir().unwrap();

        fs::create_dir_all(temp_dir.path().join("node_modules/pkg")).unwrap();
        fs::create_dir_all(temp_dir.path().join("src/dist")).unwrap();
        File::create(temp_dir.path().join("node_modules/pkg/index.js")).unwrap();
        File::create(temp_dir.path().join("src/dist/bundle.js")).unwrap();
        File::create(temp_dir.path().join("src/app.js")).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&["node_modules", "dist"]));
        assert_eq!(names(&walker.walk()), vec!["app.js"]);
    }

    #[test]
    fn test_walker_ignore_applies_to_directories_only() {
        let temp_dir = tempdir().unwrap();

        File::create(temp_dir.path().join("dist")).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&["dist"]));
        assert_eq!(names(&walker.walk()), vec!["dist"]);
    }

    #[test]
    fn test_walker_includes_hidden_files() {
        let temp_dir = tempdir().unwrap();

        File::create(temp_dir.path().join("visible.js")).unwrap();
        File::create(temp_dir.path().join(".hidden.js")).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));
        let found = names(&walker.walk());
        assert!(found.contains(&"visible.js".to_string()));
        assert!(found.contains(&".hidden.js".to_string()));
    }

    #[test]
    fn test_walker_does_not_read_gitignore() {
        let temp_dir = tempdir().unwrap();

        fs::create_dir(temp_dir.path().join("build")).unwrap();
        fs::write(temp_dir.path().join(".gitignore"), "build/\n").unwrap();
        File::create(temp_dir.path().join("build/out.js")).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));
        assert!(names(&walker.walk()).contains(&"out.js".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_skips_symlinks() {
        let temp_dir = tempdir().unwrap();
        let outside = tempdir().unwrap();

        File::create(outside.path().join("linked.js")).unwrap();
        File::create(temp_dir.path().join("real.js")).unwrap();
        std::os::unix::fs::symlink(outside.path(), temp_dir.path().join("dirlink")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("real.js"),
            temp_dir.path().join("filelink.js"),
        )
        .unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));
        assert_eq!(names(&walker.walk()), vec!["real.js"]);
    }

    #[test]
    fn test_walker_file_entry_has_size() {
        let temp_dir = tempdir().unwrap();

        let content = "hello world";
        fs::write(temp_dir.path().join("test.js"), content).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));
        let output = walker.walk();

        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].size, content.len() as u64);
    }

    #[test]
    fn test_walker_results_are_sorted_within_directory() {
        let temp_dir = tempdir().unwrap();

        File::create(temp_dir.path().join("c.js")).unwrap();
        File::create(temp_dir.path().join("a.js")).unwrap();
        File::create(temp_dir.path().join("b.js")).unwrap();

        let walker = Walker::new(temp_dir.path(), ignore_set(&[]));
        assert_eq!(names(&walker.walk()), vec!["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_walker_ignored_root_yields_nothing() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("dist");
        fs::create_dir(&root).unwrap();
        File::create(root.join("a.js")).unwrap();

        let output = Walker::new(&root, ignore_set(&["dist"])).walk();
        assert!(output.files.is_empty());
        assert_eq!(output.access_errors, 0);

        let output = Walker::new(&root, ignore_set(&["build"])).walk();
        assert_eq!(names(&output), vec!["a.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_symlinked_root_yields_nothing() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("real");
        fs::create_dir(&target).unwrap();
        File::create(target.join("a.js")).unwrap();

        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(Walker::new(&link, ignore_set(&[])).walk().files.is_empty());
        assert_eq!(names(&Walker::new(&target, ignore_set(&[])).walk()), vec!["a.js"]);
    }
}
