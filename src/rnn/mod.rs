//! # Recurrent Pooling Layers
//!
//! This module provides [`RnnPool`], which turns a square patch of feature
//! vectors into a fixed-length descriptor by running quantized cells over it
//! in four scan orders. It works with any pair of [`QuantizedCell`]
//! implementations, so the inner and outer cells may be of different variants
//! and hidden sizes.
//!
//! ## Passes
//!
//! | Phase | Cell | Input | Writes |
//! |-------|------|-------|--------|
//! | row pass | inner | each patch row, forward | row summary `r` |
//! | row mixing | outer | row summaries, forward / backward | segments 0 / 1 |
//! | column pass | inner | each patch column, one step per call | column summary `c` |
//! | column mixing | outer | column summaries, forward / backward | segments 2 / 3 |
//!
//! The summary scratch is zeroed before each of the two inner passes; each
//! summary starts from a zero hidden state.
//!
//! ## Buffer Sizes
//!
//! | Buffer | Length |
//! |--------|--------|
//! | `patch` | `((patch_dim - 1) * stride + patch_dim) * input_dim` at least |
//! | `output` | `4 * outer.hidden_dim()` |
//! | `scratch` | `inner.hidden_dim() * patch_dim` |
//!
//! ## Example
//!
//! ```ignore
//! use rnnpool::prelude::*;
//!
//! let pool = RnnPool::new(inner_cell, outer_cell, 8).with_stride(image_width);
//!
//! let mut inner_buffers = pool.inner().buffers();
//! let mut outer_buffers = pool.outer().buffers();
//! let mut descriptor = vec![0; pool.output_dim()];
//! let mut scratch = vec![0; pool.scratch_len()];
//!
//! pool.forward(&image[offset..], &mut inner_buffers, &mut outer_buffers,
//!              &mut descriptor, &mut scratch)?;
//! ```
//!
//! [`QuantizedCell`]: crate::cells::QuantizedCell

pub mod rnn_pool;

pub use rnn_pool::RnnPool;
