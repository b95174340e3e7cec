//! Error type for quantized recurrences.
//!
//! The only runtime failure a cell reports is a missing scratch buffer. It is
//! detected before any arithmetic runs, so a failed call never leaves a
//! partially updated hidden state behind. Dimension mismatches and malformed
//! scale tables are caller contract violations and are not checked here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names one scratch buffer of a cell buffer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScratchBuffer {
    /// First hidden-sized pre-computation buffer (projection sum, candidate).
    PreComp1,
    /// Second hidden-sized pre-computation buffer (recurrent projection, gate).
    PreComp2,
    /// Third hidden-sized pre-computation buffer (gated hidden state).
    PreComp3,
    /// Input-side low-rank intermediate, `W1 · x`.
    TempLrW,
    /// Hidden-side low-rank intermediate, `U1 · h`.
    TempLrU,
    /// Input-sized buffer holding the (optionally normalized) features.
    NormFeatures,
}

impl fmt::Display for ScratchBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScratchBuffer::PreComp1 => "pre_comp1",
            ScratchBuffer::PreComp2 => "pre_comp2",
            ScratchBuffer::PreComp3 => "pre_comp3",
            ScratchBuffer::TempLrW => "temp_lrw",
            ScratchBuffer::TempLrU => "temp_lru",
            ScratchBuffer::NormFeatures => "norm_features",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`QuantizedCell::advance`](crate::cells::QuantizedCell::advance)
/// and [`RnnPool::forward`](crate::rnn::RnnPool::forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A required scratch buffer was left unset.
    #[error("scratch buffer `{0}` is not initialized")]
    BufferNotInitialized(ScratchBuffer),
}

impl Error {
    /// Integer status code for callers that speak in status codes.
    ///
    /// Success is `0`; every buffer has its own negative code.
    pub fn code(&self) -> i32 {
        match self {
            Error::BufferNotInitialized(buffer) => match buffer {
                ScratchBuffer::PreComp1 => -1,
                ScratchBuffer::PreComp2 => -2,
                ScratchBuffer::PreComp3 => -3,
                ScratchBuffer::TempLrW => -4,
                ScratchBuffer::TempLrU => -5,
                ScratchBuffer::NormFeatures => -6,
            },
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Status code for a finished call: `0` on success, [`Error::code`] otherwise.
pub fn status_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}
