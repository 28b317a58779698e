//! Error types for content generation, file materialization and run setup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while building the content buffer. Both variants are fatal for a run.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The requested size (including line terminators) does not fit in memory addressing
    #[error("cannot generate {requested} bytes: size exceeds the addressable buffer length")]
    OutOfRange {
        /// Requested logical size in bytes
        requested: u64,
    },

    /// The allocator refused the buffer
    #[error("cannot allocate a buffer of {requested} bytes")]
    Allocation {
        /// Total buffer size that was requested
        requested: usize,
    },
}

/// Failure of a single file worker. Never aborts sibling workers.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Every candidate name was already taken
    #[error("no free file name after {attempts} attempts")]
    NameCollisionsExhausted {
        /// Number of candidate names tried
        attempts: usize,
    },

    /// The file could not be created
    #[error("{}: cannot create: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was created but writing or flushing failed
    #[error("{}: write failed: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkerError {
    /// Path the worker was operating on, if it got that far.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            WorkerError::NameCollisionsExhausted { .. } => None,
            WorkerError::Create { path, .. } | WorkerError::Write { path, .. } => Some(path),
        }
    }
}

/// Rejected run configuration. Raised before anything is written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid file count: {0} (must be at least 1)")]
    InvalidFileCount(u64),

    #[error("invalid file size: {0}")]
    InvalidSize(String),

    #[error("file size {value} {unit} overflows a 64-bit byte count")]
    SizeOverflow { value: u64, unit: &'static str },

    #[error("file extension must not be empty")]
    EmptyExtension,

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error("folder doesn't exist: {}", path.display())]
    FolderDoesNotExist { path: PathBuf },

    #[error("{}: cannot read config file: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: invalid config file: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level error for a generation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Content(#[from] ContentError),

    /// A dedicated worker pool could not be started
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Logging could not be initialised
    #[error("cannot initialise logging: {0}")]
    Logging(String),

    #[error("cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Specialized `Result` type for dummyfile operations.
pub type Result<T> = std::result::Result<T, Error>;
