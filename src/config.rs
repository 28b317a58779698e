use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::content::{GenerationRequest, LineEnding};
use crate::error::ConfigError;

/// Extension used when none (or an empty one) is given.
pub const DEFAULT_EXTENSION: &str = "tmp";
/// Line length used when line breaks are requested without one.
pub const DEFAULT_LINE_LENGTH: u64 = 80;

/// Fully validated input for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub file_count: usize,
    pub target_bytes: u64,
    pub add_line_breaks: bool,
    pub line_length: u64,
    pub line_ending: LineEnding,
    pub destination_folder: PathBuf,
    pub file_extension: String,
    pub file_prefix: String,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Dedicated worker pool size; `None` uses rayon's global pool
    pub threads: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            file_count: 1,
            target_bytes: 0,
            add_line_breaks: false,
            line_length: 0,
            line_ending: LineEnding::default(),
            destination_folder: PathBuf::from("."),
            file_extension: DEFAULT_EXTENSION.to_string(),
            file_prefix: String::new(),
            seed: None,
            threads: None,
        }
    }
}

impl RunConfig {
    /// Checks everything that must hold before any content is generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_count < 1 {
            return Err(ConfigError::InvalidFileCount(self.file_count as u64));
        }
        if self.file_extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreadCount);
        }
        if !self.destination_folder.is_dir() {
            return Err(ConfigError::FolderDoesNotExist {
                path: self.destination_folder.clone(),
            });
        }
        Ok(())
    }

    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.target_bytes, self.add_line_breaks, self.line_length)
            .with_line_ending(self.line_ending)
    }
}

/// Optional defaults read from a TOML file. Command-line values take precedence.
///
/// ```toml
/// extension = "txt"
/// prefix = "tmp_"
/// line_length = 72
/// line_ending = "lf"
/// threads = 8
/// folder = "/tmp/dummy"
/// ```
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub extension: Option<String>,
    pub prefix: Option<String>,
    pub line_length: Option<u64>,
    pub line_ending: Option<LineEnding>,
    pub threads: Option<usize>,
    pub folder: Option<PathBuf>,
}

impl Defaults {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&config_str).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Unit suffix accepted by [`parse_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
}

impl SizeUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            SizeUnit::Byte => 1,
            SizeUnit::Kilobyte => 1024,
            SizeUnit::Megabyte => 1024 * 1024,
            SizeUnit::Gigabyte => 1024 * 1024 * 1024,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeUnit::Byte => "BYTE",
            SizeUnit::Kilobyte => "KB",
            SizeUnit::Megabyte => "MB",
            SizeUnit::Gigabyte => "GB",
        }
    }
}

/// A parsed size: what the user typed and what it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSize {
    pub value: u64,
    pub unit: SizeUnit,
    pub bytes: u64,
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.label())
    }
}

/// Parses `100`, `100b`, `12kb`, `12MB`, `1gb` (case-insensitive, 1 KB = 1024 bytes).
pub fn parse_size(size_str: &str) -> Result<ByteSize, ConfigError> {
    let size_str = size_str.trim().to_lowercase();

    let (number, unit) = if let Some(stripped) = size_str.strip_suffix("gb") {
        (stripped, SizeUnit::Gigabyte)
    } else if let Some(stripped) = size_str.strip_suffix("mb") {
        (stripped, SizeUnit::Megabyte)
    } else if let Some(stripped) = size_str.strip_suffix("kb") {
        (stripped, SizeUnit::Kilobyte)
    } else if let Some(stripped) = size_str.strip_suffix('b') {
        (stripped, SizeUnit::Byte)
    } else {
        // assume its given in bytes already
        (size_str.as_str(), SizeUnit::Byte)
    };

    let number = number.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::InvalidSize(size_str.clone()));
    }
    let value: u64 = number
        .parse()
        .map_err(|_| ConfigError::SizeOverflow {
            value: u64::MAX,
            unit: unit.label(),
        })?;
    let bytes = value
        .checked_mul(unit.multiplier())
        .ok_or(ConfigError::SizeOverflow {
            value,
            unit: unit.label(),
        })?;

    Ok(ByteSize { value, unit, bytes })
}

/// Trims whitespace and strips double quotes from a path-like argument.
pub fn clean_arg(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// Cleans an extension argument, falling back to [`DEFAULT_EXTENSION`] when empty.
pub fn clean_extension(raw: &str) -> String {
    let cleaned = clean_arg(raw);
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        cleaned.to_string()
    }
}
