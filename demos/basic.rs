//! Basic usage example of the quantized FastGRNN cells and RNNPool
//!
//! Builds small Q12 cells (4096 == 1.0) by hand, runs a sequence through a
//! cell in both directions, and pools the four quadrants of a feature map.

use ndarray::Array2;
use rand::prelude::*;
use rnnpool::error::status_code;
use rnnpool::prelude::*;

const ONE: QInt = 4096;

fn gate_scales() -> GateScales {
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

/// Random Q12 cell; `depth_w` / `depth_u` are the tree-sum depths of the two
/// projections.
fn random_cell(
    rng: &mut StdRng,
    input_dim: usize,
    hidden_dim: usize,
    depth_w: u8,
    depth_u: u8,
) -> FastGrnnCell {
    let mut weights = |rows: usize, cols: usize| -> Array2<QInt> {
        Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-2048..=2048))
    };
    let w = weights(hidden_dim, input_dim);
    let u = weights(hidden_dim, hidden_dim);

    let params = FastGrnnParams {
        w,
        u,
        gates: GateParams {
            bias_gate: vec![1024; hidden_dim],
            bias_update: vec![0; hidden_dim],
            zeta: 3072,
            nu: 512,
        },
        normalization: None,
    };
    let scales = FastGrnnScales {
        norm: NormScales::default(),
        w: MatVecScales::new(12, 0, 0, depth_w),
        u: MatVecScales::new(12, 0, 0, depth_u),
        pre_activation: AddScales::new(0, 0, 0),
        gating: gate_scales(),
    };
    FastGrnnCell::new(params, scales)
}

fn main() {
    println!("=== rnnpool Basic Example ===\n");

    let mut rng = StdRng::seed_from_u64(7);

    // Example 1: one cell over a sequence, both directions
    println!("Example 1: FastGRNN over a sequence");
    let cell = random_cell(&mut rng, 4, 8, 2, 3);
    let sequence: Vec<QInt> = (0..4 * 6).map(|_| rng.gen_range(-ONE..=ONE)).collect();
    let mut buffers = cell.buffers();

    for direction in [Direction::Forward, Direction::Backward] {
        let mut hidden = vec![0; cell.hidden_dim()];
        match cell.advance(&mut hidden, &sequence, &mut buffers, direction, false) {
            Ok(()) => println!("  {direction:?}: {hidden:?}"),
            Err(err) => println!("  {direction:?} failed: {err}"),
        }
    }
    println!();

    // Example 2: RNNPool over the quadrants of an 8x8 map
    println!("Example 2: RNNPool over an 8x8 map, 4x4 patches");
    let (width, channels, patch_dim) = (8, 4, 4);
    let inner = random_cell(&mut rng, channels, 8, 2, 3);
    let outer = random_cell(&mut rng, 8, 8, 3, 3);
    let pool = RnnPool::new(inner, outer, patch_dim).with_stride(width);

    let map: Vec<QInt> = (0..width * width * channels)
        .map(|_| rng.gen_range(-ONE..=ONE))
        .collect();
    let mut inner_buffers = pool.inner().buffers();
    let mut outer_buffers = pool.outer().buffers();
    let mut scratch = vec![0; pool.scratch_len()];

    println!("  Descriptor length: {}", pool.output_dim());
    for (top, left) in [(0, 0), (0, 4), (4, 0), (4, 4)] {
        let start = (top * width + left) * channels;
        let mut descriptor = vec![0; pool.output_dim()];
        let result = pool.forward(
            &map[start..],
            &mut inner_buffers,
            &mut outer_buffers,
            &mut descriptor,
            &mut scratch,
        );
        match result {
            Ok(()) => println!("  patch ({top}, {left}): {:?}", &descriptor[..8]),
            Err(err) => println!("  patch ({top}, {left}) failed: {err}"),
        }
    }
    println!();

    // Example 3: a missing scratch buffer
    println!("Example 3: Missing scratch buffer");
    let mut buffers = FastGrnnBuffers {
        norm_features: None,
        ..cell.buffers()
    };
    let mut hidden = vec![0; cell.hidden_dim()];
    let result = cell.advance(
        &mut hidden,
        &sequence,
        &mut buffers,
        Direction::Forward,
        false,
    );
    println!("  Result: {result:?}");
    println!("  Status code: {}", status_code(&result));
}
