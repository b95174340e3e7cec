//! Quantized matrix-vector product with a two-stage tree-sum reduction.
//!
//! Each output row reduces its `cols` leaf products pairwise, level by level:
//!
//! ```text
//! level 0:   p0    p1    p2    p3    p4
//! level 1:  (p0+p1)   (p2+p3)    p4        halved if 1 <= h1
//! level 2:  (.. + ..)            p4        halved if 2 <= h1
//! level 3:  (.. + p4)                      halved if 3 <= h1
//! ```
//!
//! The first `h1` levels halve every partial sum so the accumulator stays in
//! range; the remaining `h2` levels add at full precision. An odd element at
//! the end of a level is carried up unchanged (but still halved on a halving
//! level). The reduction runs exactly `h1 + h2` levels and reads the first
//! node of the last one, so `h1 + h2` must be at least `ceil(log2(cols))`.

use ndarray::{ArrayView1, ArrayView2};

use super::{saturate, QInt};
use crate::scales::MatVecScales;

/// `out[r] = treesum_c((m[r, c] * v[c]) >> (s.matrix + s.vector))`
///
/// # Arguments
/// * `matrix` - Weights, shape `[rows, cols]`
/// * `vector` - Input of length `cols`
/// * `out` - Output of length `rows`
/// * `scales` - Leaf shift and tree-sum depths
pub fn mul_vec(
    matrix: ArrayView2<QInt>,
    vector: &[QInt],
    out: &mut [QInt],
    scales: &MatVecScales,
) {
    let cols = matrix.ncols();
    debug_assert!(vector.len() >= cols);
    debug_assert!(out.len() >= matrix.nrows());

    if cols == 0 {
        out[..matrix.nrows()].fill(0);
        return;
    }

    for (row, o) in matrix.rows().into_iter().zip(out.iter_mut()) {
        let reduced = TreeSum {
            row,
            vector,
            scales,
        }
        .node(scales.depth(), 0);
        *o = saturate(reduced);
    }
}

struct TreeSum<'a> {
    row: ArrayView1<'a, QInt>,
    vector: &'a [QInt],
    scales: &'a MatVecScales,
}

impl TreeSum<'_> {
    /// Number of live nodes at `level`.
    fn width(&self, level: u8) -> usize {
        let span = 1usize << level;
        (self.row.len() + span - 1) >> level
    }

    fn node(&self, level: u8, index: usize) -> i64 {
        if level == 0 {
            let product = i64::from(self.row[index]) * i64::from(self.vector[index]);
            return product >> (self.scales.matrix + self.scales.vector);
        }

        let left = 2 * index;
        let mut sum = self.node(level - 1, left);
        if left + 1 < self.width(level - 1) {
            sum += self.node(level - 1, left + 1);
        }

        if level <= self.scales.h1 {
            sum >> 1
        } else {
            sum
        }
    }
}
