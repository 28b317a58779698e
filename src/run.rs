//! One generation run: validate, prepare content once, materialize all files.
//!
//! The two phases are timed separately since they run one after the other.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::config::RunConfig;
use crate::content::ContentGenerator;
use crate::error::{ConfigError, Error, Result};
use crate::materialize::{FileJob, MaterializeReport, Materializer};

/// Outcome of a completed run, successful or not.
#[derive(Debug)]
pub struct RunReport {
    pub materialize: MaterializeReport,
    /// Length of the shared content buffer, terminators included
    pub content_bytes: usize,
    pub seed: u64,
    pub preparation: Duration,
    pub materialization: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.materialize.is_success()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            files_created: self.materialize.succeeded,
            files_failed: self.materialize.failed.len(),
            content_bytes: self.content_bytes,
            bytes_written: self.materialize.bytes_written,
            seed: self.seed,
            preparation_secs: self.preparation.as_secs_f64(),
            materialization_secs: self.materialization.as_secs_f64(),
            created: self.materialize.created.clone(),
            failures: self
                .materialize
                .failed
                .iter()
                .map(|err| FailureSummary {
                    path: err.path().cloned(),
                    reason: err.to_string(),
                })
                .collect(),
        }
    }
}

/// Serializable view of a [`RunReport`].
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub files_created: usize,
    pub files_failed: usize,
    pub content_bytes: usize,
    /// Sum over all created files
    pub bytes_written: u64,
    pub seed: u64,
    pub preparation_secs: f64,
    pub materialization_secs: f64,
    pub created: Vec<PathBuf>,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub path: Option<PathBuf>,
    pub reason: String,
}

/// Validates `config`, generates the content and writes every file.
///
/// Configuration and content errors abort before anything is written.
/// Per-file failures do not abort the run; they are collected in the report.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    config.validate()?;

    let materializer = match config.threads {
        Some(threads) => Materializer::with_threads(threads)?,
        None => Materializer::new(),
    };

    info!("RUN | preparing file contents");
    let started = Instant::now();
    let mut generator = match config.seed {
        Some(seed) => ContentGenerator::with_seed(seed),
        None => ContentGenerator::from_time(),
    };
    let content = generator.generate(&config.generation_request())?;
    let preparation = started.elapsed();
    info!(
        "RUN | prepared {} bytes in {:.3}s",
        content.len(),
        preparation.as_secs_f64()
    );

    let content_bytes = content.len();
    let job = FileJob::new(
        &config.destination_folder,
        &config.file_extension,
        &config.file_prefix,
        content,
    );

    let started = Instant::now();
    let report = materializer.materialize(&job, config.file_count);
    let materialization = started.elapsed();
    info!(
        "RUN | created {} of {} file(s) in {:.3}s",
        report.succeeded,
        config.file_count,
        materialization.as_secs_f64()
    );

    Ok(RunReport {
        materialize: report,
        content_bytes,
        seed: generator.seed(),
        preparation,
        materialization,
    })
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppResult {
    /// Operation successful
    Success = 0,
    /// Logging or report output failed
    Failure = 1,
    /// Arguments missing or unparsable (clap's own usage exit code)
    Usage = 2,
    /// A supplied value is invalid
    InvalidParameterValue = 3,
    /// Folder doesn't exist
    FolderDoesNotExist = 4,
    /// The creation of the files' content failed
    ContentCreationFailed = 5,
    /// At least one file could not be created
    FileCreationFailed = 6,
}

impl AppResult {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_report(report: &RunReport) -> Self {
        if report.is_success() {
            AppResult::Success
        } else {
            AppResult::FileCreationFailed
        }
    }
}

impl From<&Error> for AppResult {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(ConfigError::FolderDoesNotExist { .. }) => AppResult::FolderDoesNotExist,
            Error::Config(_) | Error::ThreadPool(_) => AppResult::InvalidParameterValue,
            Error::Content(_) => AppResult::ContentCreationFailed,
            Error::Logging(_) | Error::Serialize(_) => AppResult::Failure,
        }
    }
}

impl From<AppResult> for ExitCode {
    fn from(result: AppResult) -> Self {
        ExitCode::from(result.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LineEnding;
    use crate::error::ContentError;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &std::path::Path) -> RunConfig {
        RunConfig {
            destination_folder: dir.to_path_buf(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_example_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            file_count: 3,
            target_bytes: 100,
            add_line_breaks: true,
            line_length: 80,
            ..config_in(temp_dir.path())
        };

        let report = run(&config).unwrap();

        assert!(report.is_success());
        assert_eq!(report.content_bytes, 102);
        assert_eq!(report.materialize.succeeded, 3);
        assert_eq!(report.materialize.bytes_written, 3 * 102);
        for path in &report.materialize.created {
            assert_eq!(fs::metadata(path).unwrap().len(), 102);
            assert_eq!(path.extension().unwrap(), "tmp");
        }
        assert_eq!(AppResult::from_report(&report), AppResult::Success);
    }

    #[test]
    fn test_run_with_seed_is_reproducible() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let make = |dir: &std::path::Path| RunConfig {
            target_bytes: 512,
            add_line_breaks: true,
            line_length: 50,
            line_ending: LineEnding::Lf,
            seed: Some(1234),
            ..config_in(dir)
        };

        let a = run(&make(first.path())).unwrap();
        let b = run(&make(second.path())).unwrap();

        assert_eq!(a.seed, 1234);
        let a_bytes = fs::read(&a.materialize.created[0]).unwrap();
        let b_bytes = fs::read(&b.materialize.created[0]).unwrap();
        assert_eq!(a_bytes, b_bytes);
        assert_eq!(a_bytes.len(), 512 + 10);
    }

    #[test]
    fn test_run_with_dedicated_pool() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            file_count: 20,
            target_bytes: 64,
            threads: Some(3),
            file_prefix: "pool_".to_string(),
            ..config_in(temp_dir.path())
        };

        let report = run(&config).unwrap();

        assert_eq!(report.materialize.succeeded, 20);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 20);
    }

    #[test]
    fn test_missing_folder_aborts_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir.path().join("missing"));

        let err = run(&config).unwrap_err();

        assert_eq!(AppResult::from(&err), AppResult::FolderDoesNotExist);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_oversized_content_is_content_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            target_bytes: u64::MAX,
            ..config_in(temp_dir.path())
        };

        let err = run(&config).unwrap_err();

        assert!(matches!(err, Error::Content(ContentError::OutOfRange { .. })));
        assert_eq!(AppResult::from(&err), AppResult::ContentCreationFailed);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_count_maps_to_invalid_value() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            file_count: 0,
            ..config_in(temp_dir.path())
        };

        let err = run(&config).unwrap_err();
        assert_eq!(AppResult::from(&err), AppResult::InvalidParameterValue);
    }

    #[test]
    fn test_summary_serializes() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            file_count: 2,
            target_bytes: 10,
            seed: Some(5),
            ..config_in(temp_dir.path())
        };

        let report = run(&config).unwrap();
        let json = serde_json::to_value(report.summary()).unwrap();

        assert_eq!(json["files_created"], 2);
        assert_eq!(json["files_failed"], 0);
        assert_eq!(json["content_bytes"], 10);
        assert_eq!(json["bytes_written"], 20);
        assert_eq!(json["seed"], 5);
        assert_eq!(json["created"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppResult::Success.code(), 0);
        assert_eq!(AppResult::InvalidParameterValue.code(), 3);
        assert_eq!(AppResult::FolderDoesNotExist.code(), 4);
        assert_eq!(AppResult::ContentCreationFailed.code(), 5);
        assert_eq!(AppResult::FileCreationFailed.code(), 6);

        let logging = Error::Logging("no subscriber".to_string());
        assert_eq!(AppResult::from(&logging), AppResult::Failure);
    }
}
