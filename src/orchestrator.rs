//! Drives one `minify` run through its stages:
//! `Validating -> Preparing -> Scanning -> Converting -> Reporting -> Done`.
//!
//! Any stage may fail, which ends the run with the error. The output reset in
//! `Preparing` finishes before the first worker starts, and nothing is kept between runs.

use crate::batch::{ConversionQueue, JobFailure, QueueReport};
use crate::codec::{Encoder, ImageEncoder};
use crate::config::{ConversionConfig, ResolvedPaths};
use crate::constants::GITIGNORE_CONTENTS;
use crate::error::{Result, SqueezeError};
use crate::processing::ConversionJob;
use crate::report::SizeReport;
use crate::scanner::PathScanner;
use indicatif::ProgressBar;
use std::fmt;
use std::fs;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Preparing,
    Scanning,
    Converting,
    Reporting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Preparing => "preparing",
            Stage::Scanning => "scanning",
            Stage::Converting => "converting",
            Stage::Reporting => "reporting",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub paths: ResolvedPaths,
    pub queue: QueueReport,
    pub report: SizeReport,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn failures(&self) -> &[JobFailure] {
        &self.queue.failures
    }

    /// True when every job either wrote its output or was skipped.
    pub fn is_clean(&self) -> bool {
        !self.queue.has_failures()
    }
}

/// Runs the pipeline with the production image encoder.
pub fn minify(config: &ConversionConfig, progress: &ProgressBar) -> Result<RunSummary> {
    minify_with(config, &ImageEncoder::new(), progress)
}

/// Runs the pipeline with a caller-supplied encoder.
pub fn minify_with<E: Encoder + ?Sized>(
    config: &ConversionConfig,
    encoder: &E,
    progress: &ProgressBar,
) -> Result<RunSummary> {
    let mut run = Run {
        config,
        encoder,
        progress,
        stage: Stage::Validating,
    };

    let result = run.execute();
    if let Err(e) = &result {
        error!(kind = %e.kind(), "Run failed while {}: {}", run.stage, e);
    }
    result
}

/// Deletes and recreates the active output directory, then writes the
/// `.gitignore` that keeps the whole target tree out of version control.
pub fn reset_output(paths: &ResolvedPaths) -> Result<()> {
    let target = &paths.target_active;

    if target.exists() {
        debug!("Removing {}", target.display());
        fs::remove_dir_all(target).map_err(|e| SqueezeError::filesystem(target, e))?;
    }
    fs::create_dir_all(target).map_err(|e| SqueezeError::filesystem(target, e))?;

    let gitignore = paths.gitignore_path();
    fs::write(&gitignore, GITIGNORE_CONTENTS).map_err(|e| SqueezeError::filesystem(&gitignore, e))?;
    Ok(())
}

struct Run<'a, E: ?Sized> {
    config: &'a ConversionConfig,
    encoder: &'a E,
    progress: &'a ProgressBar,
    stage: Stage,
}

impl<'a, E: Encoder + ?Sized> Run<'a, E> {
    fn enter(&mut self, stage: Stage) {
        debug!("Stage {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn execute(&mut self) -> Result<RunSummary> {
        let started = Instant::now();

        let paths = self.config.resolve()?;
        self.log_configuration(&paths);

        self.enter(Stage::Preparing);
        reset_output(&paths)?;

        self.enter(Stage::Scanning);
        let files = PathScanner::default()
            .excluding(&paths.target_root)
            .scan(&paths.src_active)?;
        info!("Found {} image files to process", files.len());

        self.enter(Stage::Converting);
        let jobs = files
            .iter()
            .map(|record| {
                ConversionJob::from_record(
                    record,
                    &paths.src_root,
                    &paths.target_root,
                    self.config.format,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let queue = ConversionQueue::new(self.config.max_concurrency)?;
        info!(
            "Converting {} files with up to {} workers",
            jobs.len(),
            queue.max_concurrency()
        );
        let queue = queue.run(jobs, self.encoder, self.progress)?;
        self.progress.finish();

        self.enter(Stage::Reporting);
        let report = SizeReport::measure(&paths)?;
        info!(
            "Converted {} of {} files ({} skipped, {} failed)",
            queue.written.len(),
            queue.submitted,
            queue.skipped.len(),
            queue.failures.len()
        );
        info!("{}", report);

        let elapsed = started.elapsed();
        info!("minify complete in {:.2?}", elapsed);
        self.enter(Stage::Done);

        Ok(RunSummary {
            paths,
            queue,
            report,
            elapsed,
        })
    }

    fn log_configuration(&self, paths: &ResolvedPaths) {
        info!("Source folder: {}", paths.src_root.display());
        info!("Target folder: {}", paths.target_root.display());
        info!("Active path: {}", paths.target_active.display());
        info!("Is optimum: {}", self.config.is_optimum);
        match self.config.format {
            Some(format) => info!("Output format: {}", format),
            None => warn!("no 'format' provided. uses the source file format dynamically"),
        }
    }
}
