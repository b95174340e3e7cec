//! Shared fixtures for the integration tests.
//!
//! Everything runs at 12 fractional bits: `4096` is 1.0.

#![allow(dead_code)]

use ndarray::Array2;
use rand::prelude::*;
use rnnpool::prelude::*;

pub const ONE: QInt = 4096;

/// Tree-sum depth that fully reduces `cols` products.
pub fn levels(cols: usize) -> u8 {
    (usize::BITS - cols.saturating_sub(1).leading_zeros()) as u8
}

pub fn q12_gate_scales() -> GateScales {
    GateScales {
        gate_bias: AddScales::new(0, 0, 0),
        sigmoid: SigmoidParams::hard(12),
        update_bias: AddScales::new(0, 0, 0),
        tanh: TanhParams::hard(12),
        gate_mul_hidden: MulScales::new(12, 0),
        q_one: ONE,
        one_sub_gate: AddScales::new(0, 0, 0),
        zeta_mul: MulScales::new(12, 0),
        nu_add: AddScales::new(0, 0, 0),
        mix_mul_update: MulScales::new(12, 0),
        hidden_out: AddScales::new(0, 0, 0),
    }
}

pub fn q12_norm_scales() -> NormScales {
    NormScales {
        mean_sub: AddScales::new(0, 0, 0),
        std_dev_mul: MulScales::new(12, 0),
    }
}

pub fn q12_scales(input_dim: usize, hidden_dim: usize) -> FastGrnnScales {
    FastGrnnScales {
        norm: q12_norm_scales(),
        w: MatVecScales::new(12, 0, 0, levels(input_dim)),
        u: MatVecScales::new(12, 0, 0, levels(hidden_dim)),
        pre_activation: AddScales::new(0, 0, 0),
        gating: q12_gate_scales(),
    }
}

/// Gates that make a cell accumulate its projected input:
/// `z` saturates at 1, `ν = 1`, so `h' = h + tanh(W · x + U · h)`.
pub fn accumulating_gates(hidden_dim: usize) -> GateParams {
    GateParams {
        bias_gate: vec![16000; hidden_dim],
        bias_update: vec![0; hidden_dim],
        zeta: ONE,
        nu: ONE,
    }
}

/// `rows × cols` matrix with 1.0 on the main diagonal.
pub fn q12_eye(rows: usize, cols: usize) -> Array2<QInt> {
    Array2::from_shape_fn((rows, cols), |(r, c)| if r == c { ONE } else { 0 })
}

/// Standard cell computing a running sum of its input (padded with zeros
/// when `hidden_dim > input_dim`).
pub fn summing_cell(input_dim: usize, hidden_dim: usize) -> FastGrnnCell {
    let params = FastGrnnParams {
        w: q12_eye(hidden_dim, input_dim),
        u: Array2::zeros((hidden_dim, hidden_dim)),
        gates: accumulating_gates(hidden_dim),
        normalization: None,
    };
    FastGrnnCell::new(params, q12_scales(input_dim, hidden_dim))
}

pub fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize, bound: QInt) -> Array2<QInt> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-bound..=bound))
}

pub fn random_vec(rng: &mut StdRng, len: usize, bound: QInt) -> Vec<QInt> {
    (0..len).map(|_| rng.gen_range(-bound..=bound)).collect()
}

/// Standard cell with seeded random weights around ±0.5.
pub fn random_cell(seed: u64, input_dim: usize, hidden_dim: usize) -> FastGrnnCell {
    let mut rng = StdRng::seed_from_u64(seed);
    let params = FastGrnnParams {
        w: random_matrix(&mut rng, hidden_dim, input_dim, 2048),
        u: random_matrix(&mut rng, hidden_dim, hidden_dim, 2048),
        gates: GateParams {
            bias_gate: random_vec(&mut rng, hidden_dim, 2048),
            bias_update: random_vec(&mut rng, hidden_dim, 2048),
            zeta: 3072,
            nu: 512,
        },
        normalization: None,
    };
    FastGrnnCell::new(params, q12_scales(input_dim, hidden_dim))
}
