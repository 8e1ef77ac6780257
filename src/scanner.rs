use crate::constants::SOURCE_EXTENSIONS;
use crate::error::{Result, SqueezeError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A file discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Extension as spelled on disk, without the leading dot.
    pub extension: String,
}

/// Recursively enumerates files under a root whose extension is in an accepted set.
#[derive(Debug, Clone)]
pub struct PathScanner {
    extensions: Vec<String>,
    /// Subtrees pruned from every walk.
    excluded: Vec<PathBuf>,
}

impl Default for PathScanner {
    fn default() -> Self {
        Self::new(SOURCE_EXTENSIONS.iter().copied())
    }
}

impl PathScanner {
    /// Extensions may be given with or without a leading dot, in any case.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            extensions,
            excluded: Vec::new(),
        }
    }

    /// Skips `dir` and everything below it, e.g. an output tree nested in the source.
    pub fn excluding(mut self, dir: impl AsRef<Path>) -> Self {
        self.excluded.push(normalize_path(dir.as_ref()));
        self
    }

    /// Strict extension comparison: `photo.jpg.bak` does not match `jpg`.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            })
            .unwrap_or(false)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|dir| path == dir)
    }

    /// Walks `root` depth-first in file-name order and returns every accepted file.
    ///
    /// Traversal is iterative, so tree depth is bounded only by the filesystem.
    /// Symlinked files and directories are followed; a link cycle fails the scan.
    /// Emitted paths are normalized (no repeated separators or `.` segments).
    pub fn scan(&self, root: &Path) -> Result<Vec<FileRecord>> {
        let root = normalize_path(root);
        let metadata = fs::metadata(&root).map_err(|e| SqueezeError::filesystem(&root, e))?;
        if !metadata.is_dir() {
            return Err(SqueezeError::filesystem(
                &root,
                std::io::Error::other("scan root is not a directory"),
            ));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.accepts(path) {
                continue;
            }

            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();
            files.push(FileRecord {
                path: normalize_path(path),
                extension,
            });
        }

        debug!("Scanned {} matching files under {}", files.len(), root.display());
        Ok(files)
    }
}

/// Rebuilds a path from its components, collapsing duplicate separators and `.` segments.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components().collect()
}
