use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{ContentBuffer, GenerationRequest};
use crate::error::ContentError;

/// Lowest byte value emitted (`'0'`).
pub const CHAR_LOW: u8 = 48;
/// Highest byte value emitted (`'z'`).
pub const CHAR_HIGH: u8 = 122;

/// Byte-exact shape of the buffer a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLayout {
    /// Number of full, terminated lines
    pub rows: usize,
    /// Characters per full line
    pub line_length: usize,
    /// Trailing unterminated characters after the last full line
    pub remainder: usize,
    pub terminator: &'static [u8],
    /// Total buffer length, terminators included
    pub total: usize,
}

impl ContentLayout {
    /// Works out rows, remainder and total length for a request.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dummyfile::content::{ContentLayout, GenerationRequest};
    /// let layout = ContentLayout::plan(&GenerationRequest::new(100, true, 80)).unwrap();
    /// assert_eq!(layout.rows, 1);
    /// assert_eq!(layout.remainder, 20);
    /// assert_eq!(layout.total, 102);
    /// ```
    pub fn plan(request: &GenerationRequest) -> Result<Self, ContentError> {
        let out_of_range = || ContentError::OutOfRange {
            requested: request.target_bytes,
        };
        let target = usize::try_from(request.target_bytes).map_err(|_| out_of_range())?;
        let terminator = request.line_ending.as_bytes();

        let (rows, line_length) = match request.wrap_width() {
            Some(width) => {
                let rows = request.target_bytes / width;
                if rows == 0 {
                    // the whole content is a single unterminated line
                    (0, 0)
                } else {
                    // width <= target here, so both fit in usize
                    (
                        usize::try_from(rows).map_err(|_| out_of_range())?,
                        usize::try_from(width).map_err(|_| out_of_range())?,
                    )
                }
            }
            None => (0, 0),
        };

        let remainder = target - rows * line_length;
        let total = rows
            .checked_mul(terminator.len())
            .and_then(|overhead| target.checked_add(overhead))
            .filter(|total| *total <= isize::MAX as usize)
            .ok_or_else(out_of_range)?;

        Ok(ContentLayout {
            rows,
            line_length,
            remainder,
            terminator,
            total,
        })
    }
}

/// Owns the random source for one generation run.
///
/// The RNG is seeded once when the generator is built and then shared by
/// every line it produces.
pub struct ContentGenerator {
    rng: StdRng,
    seed: u64,
}

impl ContentGenerator {
    /// Seeds from the current time at microsecond granularity.
    pub fn from_time() -> Self {
        Self::with_seed(Utc::now().timestamp_micros() as u64)
    }

    /// Seeds from a fixed value, for reproducible content.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dummyfile::content::{ContentGenerator, GenerationRequest};
    /// let request = GenerationRequest::new(64, false, 0);
    /// let a = ContentGenerator::with_seed(7).generate(&request).unwrap();
    /// let b = ContentGenerator::with_seed(7).generate(&request).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.len(), 64);
    /// ```
    pub fn with_seed(seed: u64) -> Self {
        ContentGenerator {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&mut self, request: &GenerationRequest) -> Result<ContentBuffer, ContentError> {
        let layout = ContentLayout::plan(request)?;
        debug!(
            "CONTENT | {} rows x {} chars, remainder {}, total {} bytes (seed {})",
            layout.rows, layout.line_length, layout.remainder, layout.total, self.seed
        );

        let mut buffer: Vec<u8> = Vec::new();
        buffer
            .try_reserve_exact(layout.total)
            .map_err(|_| ContentError::Allocation {
                requested: layout.total,
            })?;

        for _ in 0..layout.rows {
            self.fill(&mut buffer, layout.line_length);
            buffer.extend_from_slice(layout.terminator);
        }
        if layout.remainder > 0 {
            self.fill(&mut buffer, layout.remainder);
        }

        debug_assert_eq!(buffer.len(), layout.total);
        Ok(ContentBuffer::from(buffer))
    }

    fn fill(&mut self, buffer: &mut Vec<u8>, count: usize) {
        let rng = &mut self.rng;
        buffer.extend((0..count).map(|_| rng.random_range(CHAR_LOW..=CHAR_HIGH)));
    }
}

/// Generates content for `request` with a freshly time-seeded generator.
pub fn generate(request: &GenerationRequest) -> Result<ContentBuffer, ContentError> {
    ContentGenerator::from_time().generate(request)
}
