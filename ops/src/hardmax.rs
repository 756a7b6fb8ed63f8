//! One-hot-of-maximum along an axis.
//!
//! Hardmax has no tensor-expression formulation: the output depends on the
//! *position* of the running maximum, not only its value, so the kernel is
//! authored imperatively. The result holds `1` at the first maximum of each
//! column along the reduction axis and `0` everywhere else, in the input's
//! own element type.

use snafu::{ensure, ResultExt};
use tracing::debug;

use kirin_ir::{
    element_count, normalize_axis, validate_shape, AddrSpace, ConstValue, DType, Direction, Expr,
    KernelBuilder, TensorArg,
};

use crate::error::{IrSnafu, Result, UnsupportedElementTypeSnafu};
use crate::extern_op::ExternOp;

/// Build the hardmax kernel for the given input shape, reduction axis and
/// element type.
///
/// The axis may be negative, counting from the last dimension. Columns are
/// scanned with a strict `>` update, so ties resolve to the lowest offset.
/// Each column writes exactly one `1`.
///
/// The running maximum is accumulated in `Float32` scratch whatever the
/// element type, so `Float64` inputs compare at the narrower width.
///
/// All validation happens before any statement is emitted; an `Err` leaves
/// no partially-built kernel behind.
pub fn hardmax(shape: &[isize], axis: isize, dtype: DType) -> Result<ExternOp> {
    ensure!(dtype.is_int() || dtype.is_float(), UnsupportedElementTypeSnafu { dtype });
    let element = dtype.scalar().expect("non-pointer dtype checked above");

    let shape = validate_shape(shape).context(IrSnafu)?;
    let axis = normalize_axis(axis, shape.len()).context(IrSnafu)?;

    let outer: usize = shape[..axis].iter().product();
    let axis_extent = shape[axis];
    let inner: usize = shape[axis + 1..].iter().product();
    let total = element_count(&shape);

    let input = TensorArg::input(shape.clone(), dtype.clone());
    let output = TensorArg::output(shape.clone(), dtype.clone());

    let mut builder = KernelBuilder::new();
    let data = builder.buffer_view(&input, Direction::ReadOnly).context(IrSnafu)?;
    let out = builder.buffer_view(&output, Direction::WriteOnly).context(IrSnafu)?;

    // Running maximum and its flat offset, carried in fixed-width scratch
    // regardless of the element type. Comparisons run at the accumulator's
    // width, so the stored value and the compared value never diverge.
    let best = builder.allocate(DType::Float32, 1, AddrSpace::Reg);
    let best_idx = builder.allocate(DType::Int32, 1, AddrSpace::Reg);

    let slot = Expr::index_const(0);
    let zero = Expr::const_(dtype.clone(), ConstValue::zero(element));
    let one = Expr::const_(dtype.clone(), ConstValue::one(element));
    let neg_inf = Expr::const_(DType::Float32, ConstValue::Float(f64::NEG_INFINITY));
    let column_stride = Expr::index_const((inner * axis_extent) as i64);
    let inner_stride = Expr::index_const(inner as i64);

    builder
        .for_range_named("i0", total, |b, i| b.store(&out, &i, &zero))
        .context(IrSnafu)?;

    builder
        .for_range_named("i", outer, |b, i| {
            b.for_range_named("k", inner, |b, k| {
                // Flat offset of the column's first element.
                let base = i.try_mul(&column_stride)?.try_add(&k)?;
                b.scratch_store(&best, &slot, &neg_inf)?;
                b.scratch_store(&best_idx, &slot, &base)?;

                b.for_range_named("j", axis_extent, |b, j| {
                    let offset = base.try_add(&j.try_mul(&inner_stride)?)?;
                    let current = Expr::cast(&data.load(&offset)?, DType::Float32);
                    let is_new_max = current.try_cmp_gt(&best.load(&slot)?)?;
                    b.if_scope(is_new_max, |b| {
                        b.scratch_store(&best, &slot, &current)?;
                        b.scratch_store(&best_idx, &slot, &offset)
                    })
                })?;

                let target = best_idx.load(&slot)?;
                b.store(&out, &target, &one)
            })
        })
        .context(IrSnafu)?;

    let body = builder.seal().context(IrSnafu)?;
    debug!(outer, axis_extent, inner, nodes = body.node_count(), "hardmax kernel sealed");

    let data_view = data.id();
    let out_view = out.id();
    Ok(ExternOp::new("hardmax", body, vec![input], vec![data_view], output, out_view))
}
