//! Quantized activation functions.
//!
//! Both nonlinearities are piecewise-linear approximations that need only an
//! integer divide, an add and a clamp, which is what the integer-only targets
//! can afford.

use serde::{Deserialize, Serialize};

use crate::quantized::{saturate, QInt};

/// Parameters of the quantized hard sigmoid.
///
/// The function is defined as:
/// `y = clamp(x / div + add, 0, limit)`
///
/// evaluated at `scale_in` fractional bits and then moved to `scale_out`
/// fractional bits. With `div = 4`, `add = 2^scale_in / 2` and
/// `limit = 2^scale_in` this is the usual `clamp(x / 4 + 0.5, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigmoidParams {
    pub div: QInt,
    pub add: QInt,
    pub limit: QInt,
    pub scale_in: u8,
    pub scale_out: u8,
}

impl SigmoidParams {
    /// Standard hard sigmoid at `frac_bits` fractional bits in and out.
    pub fn hard(frac_bits: u8) -> Self {
        let one = 1i32 << frac_bits;
        Self {
            div: 4,
            add: saturate(i64::from(one / 2)),
            limit: saturate(i64::from(one)),
            scale_in: frac_bits,
            scale_out: frac_bits,
        }
    }
}

impl Default for SigmoidParams {
    fn default() -> Self {
        Self::hard(12)
    }
}

/// Parameters of the quantized hard tanh: `y = clamp(x, -1, 1)` at
/// `scale_in` fractional bits, then moved to `scale_out` fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TanhParams {
    pub scale_in: u8,
    pub scale_out: u8,
}

impl TanhParams {
    pub fn hard(frac_bits: u8) -> Self {
        Self {
            scale_in: frac_bits,
            scale_out: frac_bits,
        }
    }
}

impl Default for TanhParams {
    fn default() -> Self {
        Self::hard(12)
    }
}

/// Applies the quantized hard sigmoid in place.
///
/// # Arguments
///
/// * `vec` - Values at `params.scale_in` fractional bits, overwritten with
///   the activation at `params.scale_out` fractional bits
/// * `params` - Slope divisor, offset, saturation limit and scales
pub fn sigmoid(vec: &mut [QInt], params: &SigmoidParams) {
    let div = i32::from(params.div);
    let add = i32::from(params.add);
    let limit = i32::from(params.limit);
    for v in vec.iter_mut() {
        let y = (i32::from(*v) / div + add).clamp(0, limit);
        *v = rescale(y, params.scale_in, params.scale_out);
    }
}

/// Applies the quantized hard tanh in place.
pub fn tanh(vec: &mut [QInt], params: &TanhParams) {
    let one = 1i32 << params.scale_in;
    for v in vec.iter_mut() {
        let y = i32::from(*v).clamp(-one, one);
        *v = rescale(y, params.scale_in, params.scale_out);
    }
}

fn rescale(value: i32, from: u8, to: u8) -> QInt {
    let wide = i64::from(value);
    if to >= from {
        saturate(wide << (to - from))
    } else {
        saturate(wide >> (from - to))
    }
}

/// Quantized activations applied directly on a slice.
pub trait QuantizedActivation {
    /// Applies [`sigmoid`] in place
    fn q_sigmoid(&mut self, params: &SigmoidParams);
    /// Applies [`tanh`] in place
    fn q_tanh(&mut self, params: &TanhParams);
}

impl QuantizedActivation for [QInt] {
    fn q_sigmoid(&mut self, params: &SigmoidParams) {
        sigmoid(self, params);
    }

    fn q_tanh(&mut self, params: &TanhParams) {
        tanh(self, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_sigmoid_zero_is_half() {
        let mut v = [0; 3];
        sigmoid(&mut v, &SigmoidParams::hard(12));
        assert_eq!(v, [2048; 3]);
    }

    #[test]
    fn test_hard_sigmoid_saturation() {
        let mut v = [i16::MAX, i16::MIN, 8192, -8192];
        sigmoid(&mut v, &SigmoidParams::hard(12));
        assert_eq!(v, [4096, 0, 4096, 0]);
    }

    #[test]
    fn test_hard_sigmoid_linear_region() {
        // x = 1.0 -> 0.25 + 0.5 = 0.75
        let mut v = [4096];
        sigmoid(&mut v, &SigmoidParams::hard(12));
        assert_eq!(v, [3072]);
    }

    #[test]
    fn test_sigmoid_rescales_output() {
        let params = SigmoidParams {
            scale_out: 14,
            ..SigmoidParams::hard(12)
        };
        let mut v = [0, 10000];
        sigmoid(&mut v, &params);
        assert_eq!(v, [8192, 16384]);
    }

    #[test]
    fn test_hard_tanh() {
        let mut v = [-5000, -100, 0, 100, 5000];
        tanh(&mut v, &TanhParams::hard(12));
        assert_eq!(v, [-4096, -100, 0, 100, 4096]);
    }

    #[test]
    fn test_tanh_downscale() {
        let params = TanhParams {
            scale_in: 12,
            scale_out: 8,
        };
        let mut v = [4096, -4096, 160];
        tanh(&mut v, &params);
        assert_eq!(v, [256, -256, 10]);
    }

    #[test]
    fn test_trait_matches_functions() {
        let mut a = [-3000i16, 0, 1500, 9000];
        let mut b = a;
        a.q_sigmoid(&SigmoidParams::hard(12));
        sigmoid(&mut b, &SigmoidParams::hard(12));
        assert_eq!(a, b);

        a.q_tanh(&TanhParams::hard(12));
        tanh(&mut b, &TanhParams::hard(12));
        assert_eq!(a, b);
    }
}
