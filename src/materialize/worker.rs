use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(test)]
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, warn};

use super::{FileJob, WorkerOutcome, naming};
use crate::error::WorkerError;

/// Candidate names a worker tries before giving up.
pub const MAX_NAME_ATTEMPTS: usize = 32;

/// Creates one uniquely named file for `job` and fills it with the shared content.
#[cfg(test)]
pub(super) fn write_file_with<R: Rng + ?Sized>(job: &FileJob, rng: &mut R) -> WorkerOutcome {
    write_file_into(job, rng, &BufWriter::new)
}

/// Creates one uniquely named file, writing through whatever `wrap` builds around it.
pub(super) fn write_file_into<R, F, W>(job: &FileJob, rng: &mut R, wrap: &F) -> WorkerOutcome
where
    R: Rng + ?Sized,
    F: Fn(File) -> W,
    W: Write,
{
    let (path, file) = match create_unique(job, rng) {
        Ok(created) => created,
        Err(err) => return WorkerOutcome::Failed(err),
    };

    let content = job.content.as_bytes();
    let mut writer = wrap(file);
    let written = writer.write_all(content).and_then(|_| writer.flush());
    // close before any cleanup
    drop(writer);

    if let Err(source) = written {
        remove_partial(&path);
        return WorkerOutcome::Failed(WorkerError::Write { path, source });
    }

    debug!("WORKER | wrote {} bytes to {:?}", content.len(), path);
    WorkerOutcome::Created {
        path,
        bytes: content.len(),
    }
}

/// Claims a fresh name with exclusive create, retrying on collisions.
fn create_unique<R: Rng + ?Sized>(
    job: &FileJob,
    rng: &mut R,
) -> Result<(PathBuf, File), WorkerError> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let path = naming::candidate_path(job, rng);

        if path.exists() {
            warn!("WORKER | {:?} already exists (attempt {})", path, attempt);
            continue;
        }

        // create_new closes the window between the check above and the create
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                warn!("WORKER | lost race for {:?} (attempt {})", path, attempt);
            }
            Err(source) => return Err(WorkerError::Create { path, source }),
        }
    }

    Err(WorkerError::NameCollisionsExhausted {
        attempts: MAX_NAME_ATTEMPTS,
    })
}

fn remove_partial(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!("WORKER | could not remove partial file {:?}: {}", path, err);
    }
}
