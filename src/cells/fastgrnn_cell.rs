//! Standard (full-rank) quantized FastGRNN cell.
//!
//! The input and recurrent projections are dense matrices:
//!   pre = W · x + U · h
//! followed by the shared gating and mixing tail.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::step;
use super::{Direction, GateParams, Normalization, QuantizedCell};
use crate::error::{Result, ScratchBuffer};
use crate::quantized::{self, QInt};
use crate::scales::FastGrnnScales;

/// Quantized weights of a [`FastGrnnCell`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastGrnnParams {
    /// Input projection, shape `[hidden_dim, input_dim]`
    pub w: Array2<QInt>,
    /// Recurrent projection, shape `[hidden_dim, hidden_dim]`
    pub u: Array2<QInt>,
    pub gates: GateParams,
    /// Optional per-step normalization tables
    pub normalization: Option<Normalization>,
}

impl FastGrnnParams {
    /// All-zero weights for the given dimensions.
    pub fn zeros(input_dim: usize, hidden_dim: usize) -> Self {
        Self {
            w: Array2::zeros((hidden_dim, input_dim)),
            u: Array2::zeros((hidden_dim, hidden_dim)),
            gates: GateParams::zeros(hidden_dim),
            normalization: None,
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }
}

/// Scratch buffers of a [`FastGrnnCell`].
///
/// Each field may be left `None`; [`FastGrnnCell::advance`](QuantizedCell::advance)
/// then fails with the matching
/// [`Error::BufferNotInitialized`](crate::Error::BufferNotInitialized).
/// Buffers may be longer than needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastGrnnBuffers {
    /// `hidden_dim`
    pub pre_comp1: Option<Vec<QInt>>,
    /// `hidden_dim`
    pub pre_comp2: Option<Vec<QInt>>,
    /// `hidden_dim`
    pub pre_comp3: Option<Vec<QInt>>,
    /// `input_dim`
    pub norm_features: Option<Vec<QInt>>,
}

impl FastGrnnBuffers {
    pub fn new(input_dim: usize, hidden_dim: usize) -> Self {
        Self {
            pre_comp1: Some(vec![0; hidden_dim]),
            pre_comp2: Some(vec![0; hidden_dim]),
            pre_comp3: Some(vec![0; hidden_dim]),
            norm_features: Some(vec![0; input_dim]),
        }
    }
}

/// A quantized FastGRNN cell with full-rank projections.
///
/// # Example
///
/// ```ignore
/// let cell = FastGrnnCell::new(params, scales);
/// let mut buffers = cell.buffers();
/// let mut hidden = vec![0; cell.hidden_dim()];
/// cell.advance(&mut hidden, &sequence, &mut buffers, Direction::Forward, false)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastGrnnCell {
    params: FastGrnnParams,
    scales: FastGrnnScales,
}

impl FastGrnnCell {
    /// Pairs a parameter set with its scale table.
    pub fn new(params: FastGrnnParams, scales: FastGrnnScales) -> Self {
        debug_assert_eq!(params.u.nrows(), params.w.nrows());
        debug_assert_eq!(params.u.ncols(), params.w.nrows());
        Self { params, scales }
    }

    pub fn params(&self) -> &FastGrnnParams {
        &self.params
    }

    pub fn scales(&self) -> &FastGrnnScales {
        &self.scales
    }
}

impl QuantizedCell for FastGrnnCell {
    type Buffers = FastGrnnBuffers;

    fn input_dim(&self) -> usize {
        self.params.w.ncols()
    }

    fn hidden_dim(&self) -> usize {
        self.params.w.nrows()
    }

    fn buffers(&self) -> FastGrnnBuffers {
        FastGrnnBuffers::new(self.input_dim(), self.hidden_dim())
    }

    fn advance(
        &self,
        hidden: &mut [QInt],
        input: &[QInt],
        buffers: &mut FastGrnnBuffers,
        direction: Direction,
        normalize: bool,
    ) -> Result<()> {
        let hidden_dim = self.hidden_dim();
        let input_dim = self.input_dim();

        let pre_comp1 =
            step::require(&mut buffers.pre_comp1, ScratchBuffer::PreComp1, hidden_dim)?;
        let pre_comp2 =
            step::require(&mut buffers.pre_comp2, ScratchBuffer::PreComp2, hidden_dim)?;
        let pre_comp3 =
            step::require(&mut buffers.pre_comp3, ScratchBuffer::PreComp3, hidden_dim)?;
        let features = step::require(
            &mut buffers.norm_features,
            ScratchBuffer::NormFeatures,
            input_dim,
        )?;

        debug_assert_eq!(hidden.len(), hidden_dim);
        debug_assert!(input_dim > 0 && input.len() % input_dim == 0);

        let norm = step::normalization(self.params.normalization.as_ref(), normalize);
        let scales = &self.scales;
        let steps = input.len() / input_dim;

        for t in 0..steps {
            let offset = direction.offset(t, steps);
            step::load_features(input, offset, norm, &scales.norm, features);

            quantized::mul_vec(self.params.w.view(), features, pre_comp1, &scales.w);
            quantized::mul_vec(self.params.u.view(), hidden, pre_comp2, &scales.u);
            quantized::add_assign(pre_comp1, pre_comp2, &scales.pre_activation);

            step::gate_and_mix(
                hidden,
                pre_comp1,
                pre_comp2,
                pre_comp3,
                &self.params.gates,
                &scales.gating,
            );
        }

        Ok(())
    }
}
