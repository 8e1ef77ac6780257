//! Run configuration for a single `minify` invocation.

use crate::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_SRC_DIR, DEFAULT_TARGET_DIR, GITIGNORE_FILE,
};
use crate::error::{Result, SqueezeError};
use crate::formats::FormatOverride;
use crate::scanner::normalize_path;
use crate::validation::{
    ensure_disjoint, require_path, resolve_output_dir, resolve_source_dir, validate_active_path,
};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub src_folder: PathBuf,
    pub target_folder: PathBuf,
    /// Restricts the run to this subtree of both folders.
    pub active_path: Option<PathBuf>,
    /// `None` keeps each file's own format.
    pub format: Option<FormatOverride>,
    /// Accepted for compatibility; does not change encoder tuning yet.
    pub is_optimum: bool,
    /// Maximum number of encodes in flight.
    pub max_concurrency: usize,
}

impl ConversionConfig {
    pub fn new(src_folder: impl Into<PathBuf>, target_folder: impl Into<PathBuf>) -> Self {
        Self {
            src_folder: src_folder.into(),
            target_folder: target_folder.into(),
            active_path: None,
            format: None,
            is_optimum: false,
            max_concurrency: default_concurrency(),
        }
    }

    /// `./input` to `./output` relative to the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| SqueezeError::filesystem(".", e))?;
        Ok(Self::new(cwd.join(DEFAULT_SRC_DIR), cwd.join(DEFAULT_TARGET_DIR)))
    }

    pub fn with_active_path(mut self, active_path: impl Into<PathBuf>) -> Self {
        let active_path = active_path.into();
        self.active_path = if active_path.as_os_str().is_empty() {
            None
        } else {
            Some(active_path)
        };
        self
    }

    pub fn with_format(mut self, format: Option<FormatOverride>) -> Self {
        self.format = format;
        self
    }

    pub fn with_optimum(mut self, is_optimum: bool) -> Self {
        self.is_optimum = is_optimum;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Checks everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        require_path(&self.src_folder, "srcFolder")?;
        require_path(&self.target_folder, "targetFolder")?;

        if self.max_concurrency == 0 {
            return Err(SqueezeError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }

        if let Some(active_path) = &self.active_path {
            validate_active_path(active_path)?;
        }
        Ok(())
    }

    /// Validates and produces absolute roots. The source folder must exist.
    pub fn resolve(&self) -> Result<ResolvedPaths> {
        self.validate()?;

        let src_root = resolve_source_dir(&self.src_folder)?;
        let target_root = resolve_output_dir(&self.target_folder)?;
        let (src_active, target_active) = match &self.active_path {
            Some(active) => (src_root.join(active), target_root.join(active)),
            None => (src_root.clone(), target_root.clone()),
        };
        let src_active = normalize_path(&src_active);
        let target_active = resolve_output_dir(&target_active)?;

        // Fail before the destructive reset rather than at scan time.
        if !src_active.is_dir() {
            return Err(SqueezeError::filesystem(
                &src_active,
                std::io::Error::new(std::io::ErrorKind::NotFound, "active path does not exist"),
            ));
        }

        let real_src_active = src_active
            .canonicalize()
            .map_err(|e| SqueezeError::filesystem(&src_active, e))?;
        ensure_disjoint(&real_src_active, &target_active)?;

        Ok(ResolvedPaths {
            src_root,
            target_root,
            src_active,
            target_active,
        })
    }
}

/// Absolute directories a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub src_root: PathBuf,
    pub target_root: PathBuf,
    /// Scan root: `src_root/active_path`
    pub src_active: PathBuf,
    /// Reset and write root: `target_root/active_path`
    pub target_active: PathBuf,
}

impl ResolvedPaths {
    pub fn gitignore_path(&self) -> PathBuf {
        self.target_root.join(GITIGNORE_FILE)
    }
}

/// Fixed small pool, capped at the number of logical CPUs.
pub fn default_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY.min(num_cpus::get()).max(1)
}
