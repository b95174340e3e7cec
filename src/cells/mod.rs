//! # Quantized Recurrent Cells
//!
//! This module provides the fixed-point FastGRNN cells. A cell advances a
//! caller-owned hidden state through a whole input sequence in one call, using
//! caller-owned scratch buffers; it never allocates inside the step loop.
//!
//! ## Cell Types
//!
//! | Cell | Projections | Scratch buffers |
//! |------|-------------|-----------------|
//! | [`FastGrnnCell`] | `W · x`, `U · h` | 3 hidden-sized + features |
//! | [`FastGrnnLrCell`] | `W2 · (W1 · x)`, `U2 · (U1 · h)` | 3 hidden-sized + 2 rank-sized + features |
//!
//! Both implement [`QuantizedCell`], which is all the pooling layer in
//! [`crate::rnn`] depends on.
//!
//! ## Update Rule
//!
//! ```text
//! pre = W · x + U · h
//! z   = sigmoid(pre + b_g)
//! c   = tanh(pre + b_h)
//! h'  = z ⊙ h + (ζ · (1 - z) + ν) ⊙ c
//! ```
//!
//! The mixing term is evaluated as a fixed chain of sub-steps, each with its
//! own scale (see [`GateScales`](crate::scales::GateScales)). Rounding depends
//! on that order, so it is kept even where the algebra could be simplified.
//!
//! ## Sequence Layout
//!
//! | Argument | Length | Description |
//! |----------|--------|-------------|
//! | `hidden` | `hidden_dim` | Hidden state, updated in place |
//! | `input` | `steps * input_dim` | Row-major sequence, one row per step |
//!
//! [`Direction::Backward`] visits the rows last to first without copying or
//! reversing the input. Normalization tables are indexed by the same
//! time-step offset as the input row.
//!
//! ## Example
//!
//! ```ignore
//! use rnnpool::prelude::*;
//!
//! let cell = FastGrnnCell::new(params, scales);
//! let mut buffers = cell.buffers();
//! let mut hidden = vec![0; cell.hidden_dim()];
//!
//! // input: [steps * input_dim]
//! cell.advance(&mut hidden, &input, &mut buffers, Direction::Forward, false)?;
//! ```

pub mod fastgrnn_cell;
pub mod fastgrnn_lr_cell;
mod step;

pub use fastgrnn_cell::{FastGrnnBuffers, FastGrnnCell, FastGrnnParams};
pub use fastgrnn_lr_cell::{FastGrnnLrBuffers, FastGrnnLrCell, FastGrnnLrParams};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quantized::QInt;

/// Order in which a cell visits the time-steps of its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Steps `0, 1, .., steps - 1`
    #[default]
    Forward,
    /// Steps `steps - 1, .., 1, 0`
    Backward,
}

impl Direction {
    /// Row of the input read at iteration `t` of a `steps`-long sequence.
    #[inline]
    pub fn offset(self, t: usize, steps: usize) -> usize {
        match self {
            Direction::Forward => t,
            Direction::Backward => steps - 1 - t,
        }
    }
}

/// Gate biases and the two gate-mixing constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateParams {
    /// Bias added before the sigmoid (update gate `z`)
    pub bias_gate: Vec<QInt>,
    /// Bias added before the tanh (candidate `c`)
    pub bias_update: Vec<QInt>,
    /// ζ, scales `1 - z` in the mixing term
    pub zeta: QInt,
    /// ν, offset of the mixing term
    pub nu: QInt,
}

impl GateParams {
    pub fn zeros(hidden_dim: usize) -> Self {
        Self {
            bias_gate: vec![0; hidden_dim],
            bias_update: vec![0; hidden_dim],
            zeta: 0,
            nu: 0,
        }
    }
}

/// Per-step feature normalization tables.
///
/// Both tables are row-major `[steps, input_dim]`. The standard deviation is
/// stored inverted so normalization is a subtract followed by a multiply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalization {
    pub mean: Vec<QInt>,
    pub inv_std_dev: Vec<QInt>,
}

impl Normalization {
    pub fn new(mean: Vec<QInt>, inv_std_dev: Vec<QInt>) -> Self {
        debug_assert_eq!(mean.len(), inv_std_dev.len());
        Self { mean, inv_std_dev }
    }

    /// Mean and inverse standard deviation rows for one time-step.
    fn row(&self, offset: usize, input_dim: usize) -> (&[QInt], &[QInt]) {
        let range = offset * input_dim..(offset + 1) * input_dim;
        (&self.mean[range.clone()], &self.inv_std_dev[range])
    }
}

/// A quantized recurrent cell that can advance a hidden state over a sequence.
///
/// Implementations must check every scratch buffer before touching `hidden`,
/// so an `Err` always leaves the hidden state as it was.
pub trait QuantizedCell {
    /// Scratch buffer set used by [`advance`](QuantizedCell::advance).
    type Buffers;

    /// Length of one input vector
    fn input_dim(&self) -> usize;

    /// Length of the hidden state
    fn hidden_dim(&self) -> usize;

    /// Allocates a buffer set sized for this cell.
    fn buffers(&self) -> Self::Buffers;

    /// Advances `hidden` through every step of `input`.
    ///
    /// # Arguments
    /// * `hidden` - Hidden state of length `hidden_dim`, updated in place
    /// * `input` - Row-major sequence of `input_dim`-long vectors
    /// * `buffers` - Scratch storage, reused across steps
    /// * `direction` - Visit order of the input rows
    /// * `normalize` - Whether to normalize each input row first
    ///
    /// # Errors
    /// [`Error::BufferNotInitialized`](crate::Error::BufferNotInitialized)
    /// naming the first unset buffer.
    fn advance(
        &self,
        hidden: &mut [QInt],
        input: &[QInt],
        buffers: &mut Self::Buffers,
        direction: Direction,
        normalize: bool,
    ) -> Result<()>;
}

impl<C: QuantizedCell + ?Sized> QuantizedCell for &C {
    type Buffers = C::Buffers;

    fn input_dim(&self) -> usize {
        (**self).input_dim()
    }

    fn hidden_dim(&self) -> usize {
        (**self).hidden_dim()
    }

    fn buffers(&self) -> Self::Buffers {
        (**self).buffers()
    }

    fn advance(
        &self,
        hidden: &mut [QInt],
        input: &[QInt],
        buffers: &mut Self::Buffers,
        direction: Direction,
        normalize: bool,
    ) -> Result<()> {
        (**self).advance(hidden, input, buffers, direction, normalize)
    }
}
