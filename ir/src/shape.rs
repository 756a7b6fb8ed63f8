//! Shape validation and row-major addressing helpers.
//!
//! All helpers are pure free functions over concrete shapes; nothing here
//! touches builder state. Kernels index buffers with caller-computed flat
//! offsets, so the only addressing facts needed are element counts and
//! row-major strides.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{AxisOutOfRangeSnafu, IndexOutOfBoundsSnafu, InvalidShapeSnafu, Result};

/// Shape type - ordered sequence of axis extents.
///
/// Inline capacity of 4 avoids heap allocation for the common 1D-4D case.
pub type Shape = SmallVec<[usize; 4]>;

/// Validate a declared shape: every dimension must be positive.
///
/// # Examples
/// ```rust
/// # use kirin_ir::shape::validate_shape;
/// assert!(validate_shape(&[2, 3]).is_ok());
/// assert!(validate_shape(&[2, 0]).is_err());
/// assert!(validate_shape(&[2, -3]).is_err());
/// ```
pub fn validate_shape(shape: &[isize]) -> Result<Shape> {
    for (position, &dim) in shape.iter().enumerate() {
        ensure!(dim > 0, InvalidShapeSnafu { dim, position });
    }
    Ok(shape.iter().map(|&dim| dim as usize).collect())
}

/// Total number of elements; 1 for rank 0.
pub fn element_count(shape: &Shape) -> usize {
    shape.iter().product()
}

/// Row-major strides: `stride[n-1] = 1`, `stride[i] = stride[i+1] * d[i+1]`.
///
/// # Examples
/// ```rust
/// # use kirin_ir::shape::row_major_strides;
/// # use smallvec::smallvec;
/// let strides = row_major_strides(&smallvec![2, 3, 4]);
/// assert_eq!(strides.as_slice(), &[12, 4, 1]);
/// ```
pub fn row_major_strides(shape: &Shape) -> SmallVec<[usize; 4]> {
    let mut strides: SmallVec<[usize; 4]> = SmallVec::with_capacity(shape.len());
    let mut acc = 1usize;
    for &dim in shape.iter().rev() {
        strides.push(acc);
        acc *= dim;
    }
    strides.reverse();
    strides
}

/// Row-major flat offset of a multi-index, bounds-checked per axis.
///
/// The result always lies in `[0, element_count)`.
pub fn flat_offset(shape: &Shape, index: &[usize]) -> Result<usize> {
    ensure!(
        index.len() == shape.len(),
        IndexOutOfBoundsSnafu { index: index.len() as i64, len: shape.len() }
    );
    let strides = row_major_strides(shape);
    let mut offset = 0usize;
    for ((&i, &dim), &stride) in index.iter().zip(shape.iter()).zip(strides.iter()) {
        ensure!(i < dim, IndexOutOfBoundsSnafu { index: i as i64, len: dim });
        offset += i * stride;
    }
    Ok(offset)
}

/// Normalize a possibly-negative axis into `[0, rank - 1]`.
///
/// Negative axes count from the end: `-1` is the last axis, `-rank` the
/// first. Anything outside `[-rank, rank - 1]` is rejected.
///
/// # Examples
/// ```rust
/// # use kirin_ir::shape::normalize_axis;
/// assert_eq!(normalize_axis(1, 2).unwrap(), 1);
/// assert_eq!(normalize_axis(-1, 2).unwrap(), 1);
/// assert!(normalize_axis(5, 2).is_err());
/// ```
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize> {
    let normalized = if axis < 0 { axis + rank as isize } else { axis };
    ensure!(normalized >= 0 && (normalized as usize) < rank, AxisOutOfRangeSnafu { axis, rank });
    Ok(normalized as usize)
}
