//! Low-rank quantized FastGRNN cell.
//!
//! Both projections are factored through a narrow intermediate:
//!   W · x  ->  W2 · (W1 · x)      via a `w_rank`-long vector
//!   U · h  ->  U2 · (U1 · h)      via a `u_rank`-long vector
//! Everything after the projection sum is the same sequence of sub-steps as
//! [`FastGrnnCell`](super::FastGrnnCell), with its own scale table.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::step;
use super::{Direction, GateParams, Normalization, QuantizedCell};
use crate::error::{Result, ScratchBuffer};
use crate::quantized::{self, QInt};
use crate::scales::FastGrnnLrScales;

/// Quantized weights of a [`FastGrnnLrCell`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastGrnnLrParams {
    /// `[w_rank, input_dim]`
    pub w1: Array2<QInt>,
    /// `[hidden_dim, w_rank]`
    pub w2: Array2<QInt>,
    /// `[u_rank, hidden_dim]`
    pub u1: Array2<QInt>,
    /// `[hidden_dim, u_rank]`
    pub u2: Array2<QInt>,
    pub gates: GateParams,
    pub normalization: Option<Normalization>,
}

impl FastGrnnLrParams {
    pub fn zeros(input_dim: usize, hidden_dim: usize, w_rank: usize, u_rank: usize) -> Self {
        Self {
            w1: Array2::zeros((w_rank, input_dim)),
            w2: Array2::zeros((hidden_dim, w_rank)),
            u1: Array2::zeros((u_rank, hidden_dim)),
            u2: Array2::zeros((hidden_dim, u_rank)),
            gates: GateParams::zeros(hidden_dim),
            normalization: None,
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    /// Rank of the input-side factorization
    pub fn w_rank(&self) -> usize {
        self.w1.nrows()
    }

    /// Rank of the hidden-side factorization
    pub fn u_rank(&self) -> usize {
        self.u1.nrows()
    }
}

/// Scratch buffers of a [`FastGrnnLrCell`]: the standard set plus the two
/// rank-sized projection intermediates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastGrnnLrBuffers {
    pub pre_comp1: Option<Vec<QInt>>,
    pub pre_comp2: Option<Vec<QInt>>,
    pub pre_comp3: Option<Vec<QInt>>,
    /// `w_rank`
    pub temp_lrw: Option<Vec<QInt>>,
    /// `u_rank`
    pub temp_lru: Option<Vec<QInt>>,
    pub norm_features: Option<Vec<QInt>>,
}

impl FastGrnnLrBuffers {
    pub fn new(input_dim: usize, hidden_dim: usize, w_rank: usize, u_rank: usize) -> Self {
        Self {
            pre_comp1: Some(vec![0; hidden_dim]),
            pre_comp2: Some(vec![0; hidden_dim]),
            pre_comp3: Some(vec![0; hidden_dim]),
            temp_lrw: Some(vec![0; w_rank]),
            temp_lru: Some(vec![0; u_rank]),
            norm_features: Some(vec![0; input_dim]),
        }
    }
}

/// A quantized FastGRNN cell with low-rank projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastGrnnLrCell {
    params: FastGrnnLrParams,
    scales: FastGrnnLrScales,
}

impl FastGrnnLrCell {
    pub fn new(params: FastGrnnLrParams, scales: FastGrnnLrScales) -> Self {
        debug_assert_eq!(params.w2.ncols(), params.w1.nrows());
        debug_assert_eq!(params.u2.ncols(), params.u1.nrows());
        debug_assert_eq!(params.u1.ncols(), params.w2.nrows());
        Self { params, scales }
    }

    pub fn params(&self) -> &FastGrnnLrParams {
        &self.params
    }

    pub fn scales(&self) -> &FastGrnnLrScales {
        &self.scales
    }
}

impl QuantizedCell for FastGrnnLrCell {
    type Buffers = FastGrnnLrBuffers;

    fn input_dim(&self) -> usize {
        self.params.w1.ncols()
    }

    fn hidden_dim(&self) -> usize {
        self.params.w2.nrows()
    }

    fn buffers(&self) -> FastGrnnLrBuffers {
        FastGrnnLrBuffers::new(
            self.input_dim(),
            self.hidden_dim(),
            self.params.w_rank(),
            self.params.u_rank(),
        )
    }

    fn advance(
        &self,
        hidden: &mut [QInt],
        input: &[QInt],
        buffers: &mut FastGrnnLrBuffers,
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
        let temp_lrw = step::require(
            &mut buffers.temp_lrw,
            ScratchBuffer::TempLrW,
            self.params.w_rank(),
        )?;
        let temp_lru = step::require(
            &mut buffers.temp_lru,
            ScratchBuffer::TempLrU,
            self.params.u_rank(),
        )?;
        let features = step::require(
            &mut buffers.norm_features,
            ScratchBuffer::NormFeatures,
            input_dim,
        )?;

        debug_assert_eq!(hidden.len(), hidden_dim);
        debug_assert!(input_dim > 0 && input.len() % input_dim == 0);

        let norm = step::normalization(self.params.normalization.as_ref(), normalize);
        let params = &self.params;
        let scales = &self.scales;
        let steps = input.len() / input_dim;

        for t in 0..steps {
            let offset = direction.offset(t, steps);
            step::load_features(input, offset, norm, &scales.norm, features);

            quantized::mul_vec(params.w1.view(), features, temp_lrw, &scales.w1);
            quantized::mul_vec(params.w2.view(), temp_lrw, pre_comp1, &scales.w2);
            quantized::mul_vec(params.u1.view(), hidden, temp_lru, &scales.u1);
            quantized::mul_vec(params.u2.view(), temp_lru, pre_comp2, &scales.u2);
            quantized::add_assign(pre_comp1, pre_comp2, &scales.pre_activation);

            step::gate_and_mix(
                hidden,
                pre_comp1,
                pre_comp2,
                pre_comp3,
                &params.gates,
                &scales.gating,
            );
        }

        Ok(())
    }
}
