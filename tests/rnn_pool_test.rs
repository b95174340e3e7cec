//! Tests for the RNNPool layer

mod common;

use rnnpool::prelude::*;

use common::*;

const PATCH: usize = 3;

/// Vector at patch position `(r, c)`: `[k, -2k]` with `k = 3r + c + 1`.
fn counting_vector(r: usize, c: usize) -> [QInt; 2] {
    let k = (PATCH * r + c + 1) as QInt;
    [k, -2 * k]
}

fn counting_patch() -> Vec<QInt> {
    (0..PATCH)
        .flat_map(|r| (0..PATCH).flat_map(move |c| counting_vector(r, c)))
        .collect()
}

/// Both cells add up their inputs; inner 2 -> 4, outer 4 -> 4.
fn summing_pool() -> RnnPool<FastGrnnCell, FastGrnnCell> {
    RnnPool::new(summing_cell(2, 4), summing_cell(4, 4), PATCH)
}

const PATCH_SUM: [QInt; 4] = [45, -90, 0, 0];
const COLUMN_SUMS: [QInt; 12] = [12, -24, 0, 0, 15, -30, 0, 0, 18, -36, 0, 0];

#[test]
fn test_pool_dimensions() {
    let pool = RnnPool::new(random_cell(1, 2, 4), random_cell(2, 4, 3), 5);

    assert_eq!(pool.patch_dim(), 5);
    assert_eq!(pool.stride(), 5);
    assert_eq!(pool.output_dim(), 12);
    assert_eq!(pool.scratch_len(), 20);
    assert_eq!(pool.inner().hidden_dim(), pool.outer().input_dim());

    let pool = pool.with_stride(16);
    assert_eq!(pool.stride(), 16);
}

#[test]
fn test_summing_cells_pool_to_patch_sum() {
    let pool = summing_pool();
    let mut inner_buffers = pool.inner().buffers();
    let mut outer_buffers = pool.outer().buffers();
    let mut output = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];

    pool.forward(
        &counting_patch(),
        &mut inner_buffers,
        &mut outer_buffers,
        &mut output,
        &mut scratch,
    )
    .unwrap();

    for segment in output.chunks_exact(4) {
        assert_eq!(segment, PATCH_SUM);
    }
    assert_eq!(scratch, COLUMN_SUMS);
}

#[test]
fn test_strided_window_of_wider_map() {
    const WIDTH: usize = 5;
    const LEFT: usize = 1;

    // 3 x 5 map; everything outside the window is a large sentinel
    let mut map = vec![1000; PATCH * WIDTH * 2];
    for r in 0..PATCH {
        for c in 0..PATCH {
            let at = (r * WIDTH + LEFT + c) * 2;
            map[at..at + 2].copy_from_slice(&counting_vector(r, c));
        }
    }

    let pool = summing_pool().with_stride(WIDTH);
    let mut inner_buffers = pool.inner().buffers();
    let mut outer_buffers = pool.outer().buffers();
    let mut output = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];

    pool.forward(
        &map[LEFT * 2..],
        &mut inner_buffers,
        &mut outer_buffers,
        &mut output,
        &mut scratch,
    )
    .unwrap();

    for segment in output.chunks_exact(4) {
        assert_eq!(segment, PATCH_SUM);
    }
    assert_eq!(scratch, COLUMN_SUMS);
}

#[test]
fn test_constant_patch_gives_equal_segments() {
    let pool = RnnPool::new(random_cell(1, 2, 4), random_cell(2, 4, 3), 4);
    let patch: Vec<QInt> = [700, -1300].repeat(16);

    let mut inner_buffers = pool.inner().buffers();
    let mut outer_buffers = pool.outer().buffers();
    let mut output = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];
    pool.forward(
        &patch,
        &mut inner_buffers,
        &mut outer_buffers,
        &mut output,
        &mut scratch,
    )
    .unwrap();

    let segments: Vec<&[QInt]> = output.chunks_exact(3).collect();
    assert_eq!(segments[0], segments[1]);
    assert_eq!(segments[2], segments[3]);
    assert_eq!(segments[0], segments[2]);
    assert!(output.iter().any(|&v| v != 0));
}

#[test]
fn test_dirty_output_and_scratch_are_reset() {
    let pool = RnnPool::new(random_cell(3, 2, 4), random_cell(4, 4, 4), PATCH);
    let patch = counting_patch();
    let mut inner_buffers = pool.inner().buffers();
    let mut outer_buffers = pool.outer().buffers();

    let mut clean = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];
    pool.forward(
        &patch,
        &mut inner_buffers,
        &mut outer_buffers,
        &mut clean,
        &mut scratch,
    )
    .unwrap();

    // Longer output: the tail past output_dim is left alone
    let mut dirty = vec![777; pool.output_dim() + 2];
    let mut dirty_scratch = vec![-777; pool.scratch_len()];
    pool.forward(
        &patch,
        &mut inner_buffers,
        &mut outer_buffers,
        &mut dirty,
        &mut dirty_scratch,
    )
    .unwrap();

    assert_eq!(&dirty[..pool.output_dim()], clean.as_slice());
    assert_eq!(&dirty[pool.output_dim()..], &[777, 777]);
    assert_eq!(dirty_scratch, scratch);
}

#[test]
fn test_one_cell_shared_by_both_passes() {
    let cell = summing_cell(4, 4);
    let pool = RnnPool::new(&cell, &cell, 2);
    let patch: Vec<QInt> = (1..=16).collect();

    let mut inner_buffers = cell.buffers();
    let mut outer_buffers = cell.buffers();
    let mut output = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];
    pool.forward(
        &patch,
        &mut inner_buffers,
        &mut outer_buffers,
        &mut output,
        &mut scratch,
    )
    .unwrap();

    // Sum of the four vectors [1..4], [5..8], [9..12], [13..16]
    for segment in output.chunks_exact(4) {
        assert_eq!(segment, [28, 32, 36, 40]);
    }
}

#[test]
fn test_inner_cell_error_propagates() {
    let pool = summing_pool();
    let mut inner_buffers = pool.inner().buffers();
    inner_buffers.norm_features = None;
    let mut outer_buffers = pool.outer().buffers();
    let mut output = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];

    let err = pool
        .forward(
            &counting_patch(),
            &mut inner_buffers,
            &mut outer_buffers,
            &mut output,
            &mut scratch,
        )
        .unwrap_err();

    assert_eq!(err, Error::BufferNotInitialized(ScratchBuffer::NormFeatures));
    assert_eq!(err.code(), -6);
}

#[test]
fn test_outer_cell_error_propagates() {
    let outer = FastGrnnLrCell::new(
        FastGrnnLrParams::zeros(4, 4, 2, 2),
        FastGrnnLrScales::default(),
    );
    let pool = RnnPool::new(summing_cell(2, 4), outer, PATCH);
    let mut inner_buffers = pool.inner().buffers();
    let mut outer_buffers = pool.outer().buffers();
    outer_buffers.temp_lru = None;
    let mut output = vec![0; pool.output_dim()];
    let mut scratch = vec![0; pool.scratch_len()];

    let err = pool
        .forward(
            &counting_patch(),
            &mut inner_buffers,
            &mut outer_buffers,
            &mut output,
            &mut scratch,
        )
        .unwrap_err();

    assert_eq!(err, Error::BufferNotInitialized(ScratchBuffer::TempLrU));
}
