//! # rnnpool - Fixed-Point FastGRNN and RNNPool
//!
//! Integer-only inference for FastGRNN recurrent cells and the RNNPool
//! spatial pooling operator, for targets without floating point and with a
//! fixed memory budget.
//!
//! ## Features
//!
//! - **FastGRNN**: full-rank quantized cell, one call per sequence
//! - **FastGRNN-LR**: low-rank variant with factored projections
//! - **RNNPool**: four-direction pooling of a square patch with two cells
//! - **Explicit scales**: one scale descriptor per arithmetic sub-step
//! - **Caller-owned memory**: hidden state, scratch and outputs are passed in
//!
//! ## Quick Start
//!
//! ```rust
//! use rnnpool::prelude::*;
//!
//! // Hard sigmoid at 12 fractional bits: 0.0 -> 0.5, 1.0 -> 0.75, -2.0 -> 0.0
//! let mut v = [0i16, 4096, -8192];
//! v.q_sigmoid(&SigmoidParams::hard(12));
//! assert_eq!(v, [2048, 3072, 0]);
//! ```
//!
//! ## Cell-level Usage
//!
//! ```ignore
//! use rnnpool::prelude::*;
//!
//! let cell = FastGrnnCell::new(params, scales);
//! let mut buffers = cell.buffers();
//! let mut hidden = vec![0; cell.hidden_dim()];
//! cell.advance(&mut hidden, &sequence, &mut buffers, Direction::Backward, false)?;
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (buffer-check failures at `debug`,
//! pooling phases at `trace`) and installs no subscriber.

pub mod activation;
pub mod cells;
pub mod error;
pub mod quantized;
pub mod rnn;
pub mod scales;

pub use error::{Error, Result, ScratchBuffer};

pub mod prelude {
    pub use crate::activation::{QuantizedActivation, SigmoidParams, TanhParams};
    pub use crate::cells::{
        Direction, FastGrnnBuffers, FastGrnnCell, FastGrnnLrBuffers, FastGrnnLrCell,
        FastGrnnLrParams, FastGrnnParams, GateParams, Normalization, QuantizedCell,
    };
    pub use crate::error::{Error, ScratchBuffer};
    pub use crate::quantized::QInt;
    pub use crate::rnn::RnnPool;
    pub use crate::scales::{
        AddScales, FastGrnnLrScales, FastGrnnScales, GateScales, MatVecScales, MulScales,
        NormScales,
    };
}
