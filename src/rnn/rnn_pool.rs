//! RNNPool: four-direction recurrent pooling of a square patch.
//!
//! Two cells cooperate. The inner cell summarises every row and every column
//! of the patch into one hidden vector each; the outer cell then reads those
//! summaries forward and backward. The four final outer states are
//! concatenated into the descriptor.

use tracing::{trace, trace_span};

use crate::cells::{Direction, QuantizedCell};
use crate::error::Result;
use crate::quantized::QInt;

/// RNNPool layer over a `patch_dim × patch_dim` patch of feature vectors.
///
/// # Type Parameters
/// * `I` - Inner cell, reads patch feature vectors
/// * `O` - Outer cell, reads inner-cell summaries
#[derive(Debug, Clone)]
pub struct RnnPool<I, O> {
    inner: I,
    outer: O,
    patch_dim: usize,
    stride: usize,
}

impl<I: QuantizedCell, O: QuantizedCell> RnnPool<I, O> {
    /// Create a pooling layer for a dense patch (`stride == patch_dim`).
    ///
    /// # Arguments
    /// * `inner` - Row/column summariser
    /// * `outer` - Direction mixer; its input dim must equal the inner hidden dim
    /// * `patch_dim` - Side length of the patch, in feature vectors
    pub fn new(inner: I, outer: O, patch_dim: usize) -> Self {
        debug_assert_eq!(outer.input_dim(), inner.hidden_dim());
        Self {
            inner,
            outer,
            patch_dim,
            stride: patch_dim,
        }
    }

    /// Set the distance, in feature vectors, between the starts of two
    /// consecutive patch rows. Use the feature-map width to pool a window of a
    /// larger map in place.
    pub fn with_stride(mut self, stride: usize) -> Self {
        debug_assert!(stride >= self.patch_dim);
        self.stride = stride;
        self
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn outer(&self) -> &O {
        &self.outer
    }

    pub fn patch_dim(&self) -> usize {
        self.patch_dim
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Descriptor length: four outer hidden states.
    pub fn output_dim(&self) -> usize {
        4 * self.outer.hidden_dim()
    }

    /// Length of the row/column summary scratch.
    pub fn scratch_len(&self) -> usize {
        self.inner.hidden_dim() * self.patch_dim
    }

    /// Pool one patch into `output`.
    ///
    /// # Arguments
    /// * `patch` - Feature map holding the patch; row `r` starts at vector
    ///   `r * stride`
    /// * `inner_buffers` / `outer_buffers` - Scratch sets of the two cells
    /// * `output` - Descriptor, at least [`output_dim`](Self::output_dim) long:
    ///   `[row-mix forward, row-mix backward, column-mix forward, column-mix backward]`
    /// * `scratch` - Summary storage, at least [`scratch_len`](Self::scratch_len)
    ///   long; holds the column summaries on return
    ///
    /// # Errors
    /// The first error returned by either cell. `output` and `scratch` are
    /// unspecified after an error.
    pub fn forward(
        &self,
        patch: &[QInt],
        inner_buffers: &mut I::Buffers,
        outer_buffers: &mut O::Buffers,
        output: &mut [QInt],
        scratch: &mut [QInt],
    ) -> Result<()> {
        let _span = trace_span!("rnn_pool", patch_dim = self.patch_dim, stride = self.stride)
            .entered();

        let input_dim = self.inner.input_dim();
        let inner_dim = self.inner.hidden_dim();
        let outer_dim = self.outer.hidden_dim();
        let patch_dim = self.patch_dim;

        let output = &mut output[..4 * outer_dim];
        let summaries = &mut scratch[..inner_dim * patch_dim];
        output.fill(0);

        // Row summaries
        trace!("row pass");
        summaries.fill(0);
        for (r, summary) in summaries.chunks_exact_mut(inner_dim).enumerate() {
            let start = self.stride * r * input_dim;
            let row = &patch[start..start + patch_dim * input_dim];
            self.inner
                .advance(summary, row, inner_buffers, Direction::Forward, false)?;
        }

        trace!("mixing row summaries");
        self.mix(summaries, outer_buffers, &mut output[..2 * outer_dim])?;

        // Column summaries, one single-step call per patch row
        trace!("column pass");
        summaries.fill(0);
        for (c, summary) in summaries.chunks_exact_mut(inner_dim).enumerate() {
            for r in 0..patch_dim {
                let start = (self.stride * r + c) * input_dim;
                let cell = &patch[start..start + input_dim];
                self.inner
                    .advance(summary, cell, inner_buffers, Direction::Forward, false)?;
            }
        }

        trace!("mixing column summaries");
        self.mix(summaries, outer_buffers, &mut output[2 * outer_dim..])?;

        Ok(())
    }

    /// Runs the outer cell forward into the first half of `segments` and
    /// backward into the second half.
    fn mix(
        &self,
        summaries: &[QInt],
        buffers: &mut O::Buffers,
        segments: &mut [QInt],
    ) -> Result<()> {
        let (forward, backward) = segments.split_at_mut(self.outer.hidden_dim());
        self.outer
            .advance(forward, summaries, buffers, Direction::Forward, false)?;
        self.outer
            .advance(backward, summaries, buffers, Direction::Backward, false)
    }
}
