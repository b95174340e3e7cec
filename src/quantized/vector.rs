//! Elementwise and scalar-broadcast operators.

use super::QInt;
use crate::scales::{AddScales, MulScales};

/// `out[i] = ((a[i] >> s.a) + (b[i] >> s.b)) >> s.out`
pub fn add(a: &[QInt], b: &[QInt], out: &mut [QInt], scales: &AddScales) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = scales.sum(x, y);
    }
}

/// In-place [`add`] with `acc` as operand A.
pub fn add_assign(acc: &mut [QInt], b: &[QInt], scales: &AddScales) {
    debug_assert!(b.len() >= acc.len());
    for (o, &y) in acc.iter_mut().zip(b) {
        *o = scales.sum(*o, y);
    }
}

/// `out[i] = ((a[i] >> s.a) - (b[i] >> s.b)) >> s.out`
pub fn sub(a: &[QInt], b: &[QInt], out: &mut [QInt], scales: &AddScales) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = scales.difference(x, y);
    }
}

/// `out[i] = (a[i] * b[i]) >> (s.a + s.b)`
pub fn hadamard(a: &[QInt], b: &[QInt], out: &mut [QInt], scales: &MulScales) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = scales.product(x, y);
    }
}

/// In-place [`hadamard`]: `acc[i] = (b[i] * acc[i]) >> (s.a + s.b)`.
pub fn hadamard_assign(acc: &mut [QInt], b: &[QInt], scales: &MulScales) {
    debug_assert!(b.len() >= acc.len());
    for (o, &y) in acc.iter_mut().zip(b) {
        *o = scales.product(y, *o);
    }
}

/// `vec[i] = ((scalar >> s.a) + (vec[i] >> s.b)) >> s.out`
pub fn scalar_add(scalar: QInt, vec: &mut [QInt], scales: &AddScales) {
    for v in vec.iter_mut() {
        *v = scales.sum(scalar, *v);
    }
}

/// `vec[i] = ((scalar >> s.a) - (vec[i] >> s.b)) >> s.out`
pub fn scalar_sub(scalar: QInt, vec: &mut [QInt], scales: &AddScales) {
    for v in vec.iter_mut() {
        *v = scales.difference(scalar, *v);
    }
}

/// `vec[i] = (scalar * vec[i]) >> (s.a + s.b)`
pub fn scalar_mul(scalar: QInt, vec: &mut [QInt], scales: &MulScales) {
    for v in vec.iter_mut() {
        *v = scales.product(scalar, *v);
    }
}
