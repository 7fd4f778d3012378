// Errors raised while decoding a SCEL byte source.

use thiserror::Error;

/// Error type for SCEL decoding.
///
/// Only failures that make the rest of the file unreadable are reported.
/// Irregular but tolerated input (unused index fields, odd length prefixes,
/// palette references past the end of the palette) never produces an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source ended before a mandatory field could be read in full.
    #[error("truncated read at offset {offset:#x}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// The underlying byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Whether this error reports a short source rather than an I/O failure.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
