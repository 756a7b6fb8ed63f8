use kirin_dtype::DType;
use snafu::Snafu;

use crate::buffer::Direction;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A declared tensor dimension is non-positive.
    #[snafu(display("invalid shape: dimension {dim} at position {position} is not positive"))]
    InvalidShape { dim: isize, position: usize },

    /// Normalized axis falls outside `[0, rank - 1]`.
    #[snafu(display("axis {axis} is out of range for rank {rank}"))]
    AxisOutOfRange { axis: isize, rank: usize },

    /// `seal` was invoked while a loop or conditional scope was still open.
    #[snafu(display("cannot seal kernel body: {depth} scope(s) still open"))]
    UnclosedScope { depth: usize },

    /// A buffer view or scratch value from a sealed session was accessed.
    #[snafu(display("{what} belongs to a session that was already sealed"))]
    UseAfterSeal { what: &'static str },

    /// A buffer view's direction conflicts with its intended use.
    #[snafu(display("type mismatch: cannot {access} through a {direction:?} buffer view"))]
    TypeMismatch { direction: Direction, access: &'static str },

    /// Operands of an expression or store have incompatible dtypes.
    #[snafu(display("dtype mismatch in {op}: {lhs} vs {rhs}"))]
    DTypeMismatch { op: &'static str, lhs: DType, rhs: DType },

    /// A flat offset or scratch slot does not resolve inside its storage.
    #[snafu(display("index {index} is out of bounds for length {len}"))]
    IndexOutOfBounds { index: i64, len: usize },

    /// A loop extent must be an integer-typed expression.
    #[snafu(display("loop extent must have an integer dtype, got {dtype}"))]
    NonIntegerExtent { dtype: DType },

    /// A constant loop extent must be non-negative.
    #[snafu(display("loop extent must be non-negative, got {extent}"))]
    NegativeExtent { extent: i64 },

    /// The interpreter found no binding for a buffer or iteration variable.
    #[snafu(display("no binding for {what} {id}"))]
    MissingBinding { what: &'static str, id: usize },

    /// The interpreter met a value it cannot execute (non-scalar buffers, etc).
    #[snafu(display("cannot evaluate {what}"))]
    Unevaluable { what: &'static str },
}
