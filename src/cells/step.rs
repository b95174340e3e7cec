//! Sub-steps shared by both cell variants: buffer checks, feature selection
//! and the gating/mixing tail.

use tracing::debug;

use super::{GateParams, Normalization};
use crate::activation::QuantizedActivation;
use crate::error::{Error, Result, ScratchBuffer};
use crate::quantized::{self, QInt};
use crate::scales::{GateScales, NormScales};

/// Borrows a scratch buffer, or reports which one is unset.
pub(super) fn require(
    buffer: &mut Option<Vec<QInt>>,
    which: ScratchBuffer,
    len: usize,
) -> Result<&mut [QInt]> {
    match buffer.as_deref_mut() {
        Some(buf) => Ok(&mut buf[..len]),
        None => {
            debug!(buffer = %which, "scratch buffer not initialized");
            Err(Error::BufferNotInitialized(which))
        }
    }
}

/// Resolves the normalization tables once, before the step loop.
///
/// # Panics
/// If normalization is requested and the cell has no tables.
pub(super) fn normalization(
    tables: Option<&Normalization>,
    normalize: bool,
) -> Option<&Normalization> {
    if !normalize {
        return None;
    }
    match tables {
        Some(tables) => Some(tables),
        None => panic!("normalization requested but the cell has no mean/std-dev tables"),
    }
}

/// Writes the input row at `offset` into `features`, normalized if `norm` is set.
///
/// Normalization is `(x - mean) ⊙ inv_std_dev` as two separately scaled
/// sub-steps, never a single affine combination.
pub(super) fn load_features(
    input: &[QInt],
    offset: usize,
    norm: Option<&Normalization>,
    scales: &NormScales,
    features: &mut [QInt],
) {
    let input_dim = features.len();
    let row = &input[offset * input_dim..(offset + 1) * input_dim];
    match norm {
        Some(norm) => {
            let (mean, inv_std_dev) = norm.row(offset, input_dim);
            quantized::sub(row, mean, features, &scales.mean_sub);
            quantized::hadamard_assign(features, inv_std_dev, &scales.std_dev_mul);
        }
        None => features.copy_from_slice(row),
    }
}

/// Gating and state mixing, given the summed projections in `pre_comp1`.
///
/// Overwrites all three pre-computation buffers and writes the new state
/// into `hidden`.
pub(super) fn gate_and_mix(
    hidden: &mut [QInt],
    pre_comp1: &mut [QInt],
    pre_comp2: &mut [QInt],
    pre_comp3: &mut [QInt],
    params: &GateParams,
    scales: &GateScales,
) {
    // z = sigmoid(pre + b_g)
    quantized::add(pre_comp1, &params.bias_gate, pre_comp2, &scales.gate_bias);
    pre_comp2.q_sigmoid(&scales.sigmoid);

    // c = tanh(pre + b_h)
    quantized::add_assign(pre_comp1, &params.bias_update, &scales.update_bias);
    pre_comp1.q_tanh(&scales.tanh);

    // g1 = z ⊙ h
    quantized::hadamard(pre_comp2, hidden, pre_comp3, &scales.gate_mul_hidden);

    // g2 = (ν + ζ · (1 - z)) ⊙ c
    quantized::scalar_sub(scales.q_one, pre_comp2, &scales.one_sub_gate);
    quantized::scalar_mul(params.zeta, pre_comp2, &scales.zeta_mul);
    quantized::scalar_add(params.nu, pre_comp2, &scales.nu_add);
    quantized::hadamard_assign(pre_comp1, pre_comp2, &scales.mix_mul_update);

    // h' = g1 + g2
    quantized::add(pre_comp3, pre_comp1, hidden, &scales.hidden_out);
}
