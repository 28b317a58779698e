//! Random pseudo-text content for dummy files.
//!
//! The generator produces a byte buffer of an exact logical size drawn from the
//! printable band `'0'..='z'` (ASCII 48-122). In line-wrap mode the stream is
//! broken into fixed-length lines, each followed by a line terminator, so the
//! buffer grows by the terminator overhead on top of the requested size.

use std::{fmt, ops::Deref, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

mod generate;
mod tests;

pub use generate::{CHAR_HIGH, CHAR_LOW, ContentGenerator, ContentLayout, generate};

/// Line terminator written after every full line in wrap mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Crlf => b"\r\n",
            LineEnding::Lf => b"\n",
        }
    }

    pub fn byte_len(self) -> usize {
        self.as_bytes().len()
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Crlf => f.write_str("crlf"),
            LineEnding::Lf => f.write_str("lf"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crlf" => Ok(LineEnding::Crlf),
            "lf" => Ok(LineEnding::Lf),
            other => Err(format!("unknown line ending '{}' (expected crlf or lf)", other)),
        }
    }
}

/// What to generate: the logical size and the optional line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub target_bytes: u64,
    pub wrap_lines: bool,
    pub line_length: u64,
    pub line_ending: LineEnding,
}

impl GenerationRequest {
    /// Creates a request with the default CRLF terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dummyfile::content::GenerationRequest;
    /// let request = GenerationRequest::new(100, true, 0);
    /// // a zero line length silently disables wrapping
    /// assert_eq!(request.wrap_width(), None);
    /// assert_eq!(GenerationRequest::new(100, true, 80).wrap_width(), Some(80));
    /// ```
    pub fn new(target_bytes: u64, wrap_lines: bool, line_length: u64) -> Self {
        GenerationRequest {
            target_bytes,
            wrap_lines,
            line_length,
            line_ending: LineEnding::default(),
        }
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Line length to wrap at, or `None` when the content is a single block.
    pub fn wrap_width(&self) -> Option<u64> {
        if self.wrap_lines && self.line_length > 0 {
            Some(self.line_length)
        } else {
            None
        }
    }
}

/// Immutable generated content, shared read-only by every file worker.
///
/// Cloning only bumps a reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBuffer {
    bytes: Arc<Vec<u8>>,
}

impl ContentBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ContentBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        ContentBuffer {
            bytes: Arc::new(bytes),
        }
    }
}

impl Deref for ContentBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for ContentBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
