pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod mapping;
pub mod orchestrator;
pub mod processing;
pub mod report;
pub mod scanner;
pub mod utils;
pub mod validation;

pub use batch::{ConversionQueue, JobFailure, QueueReport};
pub use codec::{EncodeParams, Encoder, ImageEncoder};
pub use config::{ConversionConfig, ResolvedPaths};
pub use error::{ErrorKind, Result, SqueezeError};
pub use formats::{FormatOverride, OutputFormat};
pub use mapping::{output_dir, output_file_name};
pub use orchestrator::{minify, minify_with, RunSummary, Stage};
pub use processing::{dispatch, ConversionJob, JobOutcome};
pub use report::{SizeReport, SizeTally};
pub use scanner::{FileRecord, PathScanner};
