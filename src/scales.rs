//! Per-operation scale descriptors.
//!
//! Each fixed-point sub-step of a recurrence combines values that live at
//! different scales, so each one gets its own small descriptor instead of a
//! shared global exponent. A cell's scale table is a plain struct of these
//! descriptors, one field per sub-step, in the order the step runs them.
//!
//! All scales are arithmetic right-shift amounts.

use serde::{Deserialize, Serialize};

use crate::activation::{SigmoidParams, TanhParams};
use crate::quantized::{saturate, QInt};

/// Scales for a two-operand sum or difference.
///
/// `out = ((a >> self.a) ± (b >> self.b)) >> self.out`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddScales {
    pub a: u8,
    pub b: u8,
    pub out: u8,
}

impl AddScales {
    pub const fn new(a: u8, b: u8, out: u8) -> Self {
        Self { a, b, out }
    }

    /// Scaled sum of one element pair.
    #[inline]
    pub fn sum(&self, a: QInt, b: QInt) -> QInt {
        let wide = ((i32::from(a) >> self.a) + (i32::from(b) >> self.b)) >> self.out;
        saturate(i64::from(wide))
    }

    /// Scaled difference `a - b` of one element pair.
    #[inline]
    pub fn difference(&self, a: QInt, b: QInt) -> QInt {
        let wide = ((i32::from(a) >> self.a) - (i32::from(b) >> self.b)) >> self.out;
        saturate(i64::from(wide))
    }
}

/// Scales for a product. The two shifts are applied to the full-width
/// product, so `(a * b) >> (self.a + self.b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulScales {
    pub a: u8,
    pub b: u8,
}

impl MulScales {
    pub const fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn product(&self, a: QInt, b: QInt) -> QInt {
        let wide = (i32::from(a) * i32::from(b)) >> (self.a + self.b);
        saturate(i64::from(wide))
    }
}

/// Scales for a matrix-vector product.
///
/// Leaf products are shifted by `matrix + vector`; the row reduction then runs
/// `h1` halving levels followed by `h2` plain levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatVecScales {
    pub matrix: u8,
    pub vector: u8,
    pub h1: u8,
    pub h2: u8,
}

impl MatVecScales {
    pub const fn new(matrix: u8, vector: u8, h1: u8, h2: u8) -> Self {
        Self {
            matrix,
            vector,
            h1,
            h2,
        }
    }

    /// Number of tree-sum levels.
    pub fn depth(&self) -> u8 {
        self.h1 + self.h2
    }
}

/// Scales for the optional feature normalization: `(x - mean) ⊙ inv_std_dev`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormScales {
    /// `x - mean`: input scale, mean scale, output scale.
    pub mean_sub: AddScales,
    /// `inv_std_dev ⊙ (x - mean)`.
    pub std_dev_mul: MulScales,
}

/// Scales for the gating and state-mixing tail shared by both cell variants.
///
/// Field order is the order of the sub-steps:
///
/// ```text
/// z   = sigmoid(pre + bias_gate)        gate_bias, sigmoid
/// c   = tanh(pre + bias_update)         update_bias, tanh
/// g1  = z ⊙ h                           gate_mul_hidden
/// g2  = q_one - z                       one_sub_gate
/// g2  = zeta · g2                       zeta_mul
/// g2  = nu + g2                         nu_add
/// g2  = g2 ⊙ c                          mix_mul_update
/// h'  = g1 + g2                         hidden_out
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateScales {
    pub gate_bias: AddScales,
    pub sigmoid: SigmoidParams,
    pub update_bias: AddScales,
    pub tanh: TanhParams,
    pub gate_mul_hidden: MulScales,
    /// Quantized representation of 1 at the gate's output scale.
    pub q_one: QInt,
    pub one_sub_gate: AddScales,
    pub zeta_mul: MulScales,
    pub nu_add: AddScales,
    pub mix_mul_update: MulScales,
    pub hidden_out: AddScales,
}

/// Scale table of the standard (full-rank) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastGrnnScales {
    pub norm: NormScales,
    /// `W · x`
    pub w: MatVecScales,
    /// `U · h`
    pub u: MatVecScales,
    /// `W · x + U · h`
    pub pre_activation: AddScales,
    pub gating: GateScales,
}

/// Scale table of the low-rank cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastGrnnLrScales {
    pub norm: NormScales,
    /// `W1 · x`
    pub w1: MatVecScales,
    /// `W2 · (W1 · x)`
    pub w2: MatVecScales,
    /// `U1 · h`
    pub u1: MatVecScales,
    /// `U2 · (U1 · h)`
    pub u2: MatVecScales,
    pub pre_activation: AddScales,
    pub gating: GateScales,
}
