use crate::codec::{EncodeParams, Encoder};
use crate::error::{Result, SqueezeError};
use crate::formats::{FormatOverride, OutputFormat};
use crate::mapping::{output_dir, output_file_name};
use crate::scanner::FileRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One source-file-to-output-file encode task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub target_dir: PathBuf,
    /// `None` preserves the source's own format and extension.
    pub format: Option<FormatOverride>,
}

impl ConversionJob {
    pub fn new(source: PathBuf, target_dir: PathBuf, format: Option<FormatOverride>) -> Self {
        Self {
            source,
            target_dir,
            format,
        }
    }

    /// Builds the job for a scanned file, mirroring it from `src_root` into `target_root`.
    pub fn from_record(
        record: &FileRecord,
        src_root: &Path,
        target_root: &Path,
        format: Option<FormatOverride>,
    ) -> Result<Self> {
        let target_dir = output_dir(&record.path, src_root, target_root)?;
        Ok(Self::new(record.path.clone(), target_dir, format))
    }

    /// Resolves the encoder format and output extension, or `None` when the
    /// source format is kept and is not one we can encode.
    pub fn target_format(&self) -> Option<(OutputFormat, String)> {
        match self.format {
            Some(format) => Some((format.format(), format.extension().to_string())),
            None => {
                let format = OutputFormat::from_path(&self.source)?;
                let extension = self.source.extension()?.to_string_lossy().into_owned();
                Some((format, extension))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Written { source: PathBuf, target: PathBuf },
    /// No format override and the source extension has no encoder.
    Skipped { source: PathBuf, reason: String },
}

/// Runs one job: creates the target directory and invokes the encoder with the
/// tuning for the resolved output format.
///
/// Every failure is reported as [`SqueezeError::Encode`] naming the source, so the
/// caller can record it against the job without stopping its siblings.
pub fn dispatch<E: Encoder + ?Sized>(job: &ConversionJob, encoder: &E) -> Result<JobOutcome> {
    let Some((format, extension)) = job.target_format() else {
        return Ok(JobOutcome::Skipped {
            source: job.source.clone(),
            reason: "source extension has no encoder and no output format was given".to_string(),
        });
    };

    let encode_error = |reason: String| SqueezeError::Encode {
        path: job.source.clone(),
        reason,
    };

    fs::create_dir_all(&job.target_dir).map_err(|e| {
        encode_error(format!(
            "cannot create output directory {}: {}",
            job.target_dir.display(),
            e
        ))
    })?;

    let file_name = output_file_name(&job.source, &extension).map_err(|e| encode_error(e.to_string()))?;
    let target = job.target_dir.join(file_name);

    debug!("Encoding {} -> {} as {}", job.source.display(), target.display(), format);
    encoder
        .encode(&job.source, &target, &EncodeParams::for_format(format))
        .map_err(|e| encode_error(e.to_string()))?;

    Ok(JobOutcome::Written {
        source: job.source.clone(),
        target,
    })
}
