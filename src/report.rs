use crate::config::ResolvedPaths;
use crate::error::{Result, SqueezeError};
use crate::utils::{calculate_saved_percent, format_file_size, format_percent};
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

/// File count and byte total for one directory subtree. Recomputed per report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeTally {
    pub files: u64,
    pub bytes: u64,
}

impl SizeTally {
    /// Sums the sizes of all regular files under `root`, following symlinks.
    pub fn measure(root: &Path) -> Result<Self> {
        Self::measure_excluding(root, None)
    }

    /// Like [`SizeTally::measure`], but leaves out the `excluded` subtree.
    pub fn measure_excluding(root: &Path, excluded: Option<&Path>) -> Result<Self> {
        if !root.exists() {
            return Err(SqueezeError::filesystem(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory does not exist"),
            ));
        }

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| excluded != Some(entry.path()));

        let mut tally = SizeTally::default();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                tally.files += 1;
                tally.bytes += entry.metadata()?.len();
            }
        }
        Ok(tally)
    }
}

/// Aggregate size comparison between the source and target trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub source: SizeTally,
    pub target: SizeTally,
}

impl SizeReport {
    pub fn new(source: SizeTally, target: SizeTally) -> Self {
        Self { source, target }
    }

    /// Tallies the active source and target subtrees of a run. An output tree
    /// nested inside the source is not counted as source bytes.
    pub fn measure(paths: &ResolvedPaths) -> Result<Self> {
        Ok(Self::new(
            SizeTally::measure_excluding(&paths.src_active, Some(paths.target_root.as_path()))?,
            SizeTally::measure(&paths.target_active)?,
        ))
    }

    /// `None` when the source tree holds no bytes.
    pub fn saved_percent(&self) -> Option<f64> {
        calculate_saved_percent(self.source.bytes, self.target.bytes)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.saved_percent() {
            Some(percent) => write!(
                f,
                "saved {} ({} -> {})",
                format_percent(percent),
                format_file_size(self.source.bytes),
                format_file_size(self.target.bytes)
            ),
            None => write!(f, "{} files, nothing to compare", self.source.files),
        }
    }
}
