//! Concurrent creation of uniquely named files sharing one content buffer.
//!
//! Every requested file is an independent unit of work on a rayon pool.
//! Units share the read-only [`FileJob`] and nothing else; the destination
//! folder namespace is synchronized by exclusive file creation, so no
//! in-process locking is involved. [`Materializer::materialize`] returns only
//! after every unit has reported its [`WorkerOutcome`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder, prelude::*};
use tracing::{debug, info};

use crate::content::ContentBuffer;
use crate::error::WorkerError;

pub mod naming;
mod worker;

pub use worker::MAX_NAME_ATTEMPTS;

/// Where and how to write the files of one run. Referenced, never copied, by workers.
#[derive(Debug, Clone)]
pub struct FileJob {
    pub destination_folder: PathBuf,
    pub extension: String,
    pub name_prefix: String,
    pub content: ContentBuffer,
}

impl FileJob {
    pub fn new(
        destination_folder: &Path,
        extension: &str,
        name_prefix: &str,
        content: ContentBuffer,
    ) -> Self {
        FileJob {
            destination_folder: destination_folder.to_path_buf(),
            extension: extension.to_string(),
            name_prefix: name_prefix.to_string(),
            content,
        }
    }
}

/// Result of a single file worker.
#[derive(Debug)]
pub enum WorkerOutcome {
    Created { path: PathBuf, bytes: usize },
    Failed(WorkerError),
}

/// Aggregate of all worker outcomes for one run.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub succeeded: usize,
    /// Bytes written across all created files
    pub bytes_written: u64,
    pub created: Vec<PathBuf>,
    pub failed: Vec<WorkerError>,
}

impl MaterializeReport {
    pub fn from_outcomes(outcomes: Vec<WorkerOutcome>) -> Self {
        let mut report = MaterializeReport::default();
        for outcome in outcomes {
            match outcome {
                WorkerOutcome::Created { path, bytes } => {
                    report.succeeded += 1;
                    report.bytes_written += bytes as u64;
                    report.created.push(path);
                }
                WorkerOutcome::Failed(err) => report.failed.push(err),
            }
        }
        report
    }

    /// True only if every worker succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs file workers, either on rayon's global pool or on a dedicated one.
pub struct Materializer {
    pool: Option<ThreadPool>,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Materializer {
    /// Uses rayon's global thread pool.
    pub fn new() -> Self {
        Materializer { pool: None }
    }

    /// Bounds concurrency to `threads` workers running at once.
    pub fn with_threads(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("dummyfile-worker-{}", index))
            .build()?;
        Ok(Materializer { pool: Some(pool) })
    }

    /// Creates `file_count` files for `job` and waits for all of them.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dummyfile::content::ContentBuffer;
    /// # use dummyfile::materialize::{FileJob, Materializer};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dir = std::env::temp_dir().join(format!("dummyfile-doc-{}", std::process::id()));
    /// std::fs::create_dir_all(&dir)?;
    /// let job = FileJob::new(&dir, "tmp", "doc_", ContentBuffer::from(b"hello".to_vec()));
    ///
    /// let report = Materializer::new().materialize(&job, 3);
    /// assert!(report.is_success());
    /// assert_eq!(report.succeeded, 3);
    /// # std::fs::remove_dir_all(&dir)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn materialize(&self, job: &FileJob, file_count: usize) -> MaterializeReport {
        self.materialize_into(job, file_count, &BufWriter::new)
    }

    /// Same as [`Materializer::materialize`], with every file written through `wrap`.
    pub(crate) fn materialize_into<F, W>(
        &self,
        job: &FileJob,
        file_count: usize,
        wrap: &F,
    ) -> MaterializeReport
    where
        F: Fn(File) -> W + Sync,
        W: Write,
    {
        info!(
            "MATERIALIZE | creating {} file(s) of {} bytes in {:?}",
            file_count,
            job.content.len(),
            job.destination_folder
        );

        // collecting every outcome is the barrier: nothing returns until all workers finish
        let run_all = || {
            (0..file_count)
                .into_par_iter()
                .map(|_| worker::write_file_into(job, &mut rand::rng(), wrap))
                .collect::<Vec<WorkerOutcome>>()
        };
        let outcomes = match &self.pool {
            Some(pool) => pool.install(run_all),
            None => run_all(),
        };

        let report = MaterializeReport::from_outcomes(outcomes);
        // failures reach the user through the report
        for err in &report.failed {
            debug!("MATERIALIZE | {}", err);
        }
        info!(
            "MATERIALIZE | {} succeeded, {} failed, {} bytes written",
            report.succeeded,
            report.failed.len(),
            report.bytes_written
        );
        report
    }
}

/// Creates `file_count` files for `job` on the global pool.
pub fn materialize(job: &FileJob, file_count: usize) -> MaterializeReport {
    Materializer::new().materialize(job, file_count)
}
