use proptest::prelude::*;

use kirin_ir::DType;

use crate::hardmax::hardmax;
use crate::test::unit::run_unary;

/// Scalar reference: scan each column at `f32` precision, strict `>`.
fn reference_hardmax(shape: &[usize], axis: usize, data: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; data.len()];
    let outer: usize = shape[..axis].iter().product();
    let extent = shape[axis];
    let inner: usize = shape[axis + 1..].iter().product();
    for i in 0..outer {
        for k in 0..inner {
            let base = i * inner * extent + k;
            let mut best = f64::NEG_INFINITY;
            let mut best_offset = base;
            for j in 0..extent {
                let offset = base + j * inner;
                let value = data[offset] as f32 as f64;
                if value > best {
                    best = value;
                    best_offset = offset;
                }
            }
            out[best_offset] = 1.0;
        }
    }
    out
}

/// Shape of rank 1..=3 with small extents, plus a valid axis for it.
fn shape_and_axis() -> impl Strategy<Value = (Vec<isize>, isize)> {
    prop::collection::vec(1isize..=4, 1..=3)
        .prop_flat_map(|shape| {
            let rank = shape.len() as isize;
            (Just(shape), -rank..rank)
        })
}

proptest! {
    #[test]
    fn prop_matches_scalar_reference((shape, axis) in shape_and_axis(), seed in prop::collection::vec(-100.0f64..100.0, 64)) {
        let op = hardmax(&shape, axis, DType::Float32).unwrap();
        let shape: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        let total: usize = shape.iter().product();
        let data: Vec<f64> = seed.iter().cycle().take(total).copied().collect();

        let rank = shape.len();
        let normalized = if axis < 0 { (axis + rank as isize) as usize } else { axis as usize };
        let expected = reference_hardmax(&shape, normalized, &data);

        prop_assert_eq!(run_unary(&op, data), expected);
    }

    #[test]
    fn prop_each_column_holds_exactly_one_one((shape, axis) in shape_and_axis(), seed in prop::collection::vec(-1.0f64..1.0, 64)) {
        let op = hardmax(&shape, axis, DType::Float32).unwrap();
        let shape: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        let total: usize = shape.iter().product();
        let data: Vec<f64> = seed.iter().cycle().take(total).copied().collect();
        let out = run_unary(&op, data);

        let rank = shape.len();
        let normalized = if axis < 0 { (axis + rank as isize) as usize } else { axis as usize };
        let outer: usize = shape[..normalized].iter().product();
        let extent = shape[normalized];
        let inner: usize = shape[normalized + 1..].iter().product();

        for i in 0..outer {
            for k in 0..inner {
                let base = i * inner * extent + k;
                let ones = (0..extent).filter(|j| out[base + j * inner] == 1.0).count();
                let zeros = (0..extent).filter(|j| out[base + j * inner] == 0.0).count();
                prop_assert_eq!(ones, 1);
                prop_assert_eq!(zeros, extent - 1);
            }
        }
    }
}
