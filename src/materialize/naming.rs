//! File names of the form `<prefix><token>.<extension>`.

use std::path::PathBuf;

use rand::Rng;

/// Characters in a random token.
pub const TOKEN_LEN: usize = 11;

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A random lowercase alphanumeric token. Distinct, not secret.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// # Examples
///
/// ```
/// # use dummyfile::materialize::naming::file_name;
/// assert_eq!(file_name("tmp_", "abc123", "txt"), "tmp_abc123.txt");
/// assert_eq!(file_name("", "abc123", "tmp"), "abc123.tmp");
/// ```
pub fn file_name(prefix: &str, token: &str, extension: &str) -> String {
    format!("{}{}.{}", prefix, token, extension)
}

/// Next candidate path for a job, drawing a fresh token from `rng`.
pub fn candidate_path<R: Rng + ?Sized>(job: &super::FileJob, rng: &mut R) -> PathBuf {
    let token = random_token(rng);
    job.destination_folder.join(file_name(&job.name_prefix, &token, &job.extension))
}
