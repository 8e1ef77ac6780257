use crate::constants::TOOL_NAME;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of every failure the pipeline can produce.
///
/// `Config`, `Filesystem` and `Resource` abort a run; `Encode` is isolated to a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Filesystem,
    /// The host could not provide workers.
    Resource,
    Encode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Config => "config",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::Resource => "resource",
            ErrorKind::Encode => "encode",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum SqueezeError {
    #[error("no '{0}' provided !")]
    MissingOption(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("{path} is outside of the source root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("{0} has no file name to derive an output name from")]
    InvalidFileName(PathBuf),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

impl SqueezeError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SqueezeError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SqueezeError::MissingOption(_)
            | SqueezeError::InvalidConfig(_)
            | SqueezeError::UnsupportedFormat(_)
            | SqueezeError::OutsideRoot { .. } => ErrorKind::Config,
            SqueezeError::Filesystem { .. }
            | SqueezeError::WalkdirError(_)
            | SqueezeError::Io(_) => ErrorKind::Filesystem,
            SqueezeError::WorkerPool(_) => ErrorKind::Resource,
            SqueezeError::ImageProcessing(_)
            | SqueezeError::InvalidFileName(_)
            | SqueezeError::PngOptimization(_)
            | SqueezeError::Encode { .. } => ErrorKind::Encode,
        }
    }

    /// User-facing message, prefixed with the tool name.
    pub fn diagnostic(&self) -> String {
        format!("{}:: {}", TOOL_NAME, self)
    }
}

pub type Result<T> = std::result::Result<T, SqueezeError>;
