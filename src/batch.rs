use crate::codec::Encoder;
use crate::error::{Result, SqueezeError};
use crate::processing::{dispatch, ConversionJob, JobOutcome};
use indicatif::ProgressBar;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// A job that settled with an error. Its siblings are unaffected.
#[derive(Debug)]
pub struct JobFailure {
    pub source: PathBuf,
    pub error: SqueezeError,
}

#[derive(Debug, Default)]
pub struct QueueReport {
    pub submitted: usize,
    /// Settled jobs, successful or not. Always equals `submitted` once `run` returns.
    pub completed: usize,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<JobFailure>,
}

impl QueueReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs one [`ConversionJob`] per file with at most `max_concurrency` encodes in flight.
///
/// Jobs are handed out strictly in submission order; completion order is not
/// guaranteed. There are no retries and a failing job never stops the others.
#[derive(Debug, Clone, Copy)]
pub struct ConversionQueue {
    max_concurrency: usize,
}

impl ConversionQueue {
    pub fn new(max_concurrency: usize) -> Result<Self> {
        if max_concurrency == 0 {
            return Err(SqueezeError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_concurrency })
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Blocks until every job has settled. `progress` receives the job count as
    /// its length and the completed count as its position.
    pub fn run<E: Encoder + ?Sized>(
        &self,
        jobs: Vec<ConversionJob>,
        encoder: &E,
        progress: &ProgressBar,
    ) -> Result<QueueReport> {
        let submitted = jobs.len();
        progress.set_length(submitted as u64);
        progress.set_position(0);

        if submitted == 0 {
            return Ok(QueueReport::default());
        }

        let workers = self.max_concurrency.min(submitted);
        debug!("Using {} workers for {} jobs", workers, submitted);

        // Each pool thread runs exactly one pull loop, so a nested rayon call inside
        // an encoder can never pick up a second job on the same thread.
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("squeezr-worker-{}", i))
            .build()?;

        let cursor = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);

        let per_worker: Vec<Vec<(usize, Result<JobOutcome>)>> = pool.broadcast(|_| {
            let mut settled = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                let Some(job) = jobs.get(index) else {
                    break;
                };

                let result = dispatch(job, encoder);
                if let Err(e) = &result {
                    warn!(kind = %e.kind(), "{}", e);
                }

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.set_position(done as u64);
                settled.push((index, result));
            }
            settled
        });

        let mut settled: Vec<_> = per_worker.into_iter().flatten().collect();
        settled.sort_by_key(|(index, _)| *index);

        let mut report = QueueReport {
            submitted,
            completed: completed.load(Ordering::SeqCst),
            ..QueueReport::default()
        };

        for (index, result) in settled {
            match result {
                Ok(JobOutcome::Written { target, .. }) => report.written.push(target),
                Ok(JobOutcome::Skipped { source, reason }) => {
                    warn!("Skipped {}: {}", source.display(), reason);
                    report.skipped.push(source);
                }
                Err(error) => report.failures.push(JobFailure {
                    source: jobs[index].source.clone(),
                    error,
                }),
            }
        }

        Ok(report)
    }
}
