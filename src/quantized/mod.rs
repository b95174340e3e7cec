//! # Fixed-Point Primitive Layer
//!
//! Integer-only vector and matrix-vector operators consumed by the recurrent
//! cells. Every operator takes its scales explicitly and writes into storage
//! owned by the caller; nothing here allocates.
//!
//! ## Representation
//!
//! | Item | Type | Notes |
//! |------|------|-------|
//! | stored element | [`QInt`] (`i16`) | one value per vector/matrix entry |
//! | elementwise intermediate | `i32` | sums and products of two `i16` |
//! | matrix-vector accumulator | `i64` | tree-sum partials |
//! | scale | `u8` | arithmetic right-shift amount |
//!
//! Results are saturated back into the `i16` range instead of wrapping.
//!
//! ## Operators
//!
//! | Operator | Result |
//! |----------|--------|
//! | [`add`] | `((a >> s.a) + (b >> s.b)) >> s.out` |
//! | [`sub`] | `((a >> s.a) - (b >> s.b)) >> s.out` |
//! | [`hadamard`] | `(a * b) >> (s.a + s.b)` |
//! | [`scalar_add`] / [`scalar_sub`] / [`scalar_mul`] | as above with a broadcast scalar as operand A |
//! | [`mul_vec`] | per row: tree sum of `(m * v) >> (s.matrix + s.vector)` |
//!
//! The `*_assign` forms write the result over their first operand, which is
//! how the cells reuse one scratch buffer for several sub-steps.
//!
//! Scalar add/subtract only ever use the coefficients `+1`, `-1` (and the
//! implicit `0` of a shifted-out operand); there is no general scaled sum.

mod matvec;
mod vector;

pub use matvec::mul_vec;
pub use vector::{
    add, add_assign, hadamard, hadamard_assign, scalar_add, scalar_mul, scalar_sub, sub,
};

/// Stored fixed-point element.
pub type QInt = i16;

/// Clamp a widened intermediate back into the [`QInt`] range.
#[inline]
pub fn saturate(value: i64) -> QInt {
    value.clamp(i64::from(QInt::MIN), i64::from(QInt::MAX)) as QInt
}
