//! Expression nodes of the statement IR.
//!
//! Expressions are immutable trees shared through `Rc`. Every node carries
//! its dtype, threaded through the constructors the same way stores and
//! loads thread the dtype of the storage they touch.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use snafu::ensure;

use kirin_dtype::DType;

use crate::buffer::ViewId;
use crate::error::{DTypeMismatchSnafu, Result};
use crate::scratch::ScratchId;
use crate::types::{BinaryOp, CmpOp, ConstValue, ConstValueHash};

/// Loop induction variable.
///
/// Identity is the session-unique `id`; the name only matters for display.
/// A fresh variable is minted per `for_range` call, so variables never
/// shadow each other.
#[derive(Debug, Clone)]
pub struct IterVar {
    pub(crate) id: u64,
    pub(crate) name: String,
}

impl IterVar {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for IterVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for IterVar {}

impl Hash for IterVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Expression operation with typed operands.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprOp {
    /// Scalar constant.
    Const(ConstValueHash),
    /// Reference to an enclosing loop's induction variable.
    Iter(IterVar),
    /// Load from a scratch slot.
    ScratchLoad { scratch: ScratchId, index: Rc<Expr> },
    /// Flat-indexed load from a buffer view.
    BufferLoad { view: ViewId, index: Rc<Expr> },
    /// Convert to the node's dtype.
    Cast { src: Rc<Expr> },
    /// Arithmetic combination, dtype of the operands preserved.
    Binary(BinaryOp, Rc<Expr>, Rc<Expr>),
    /// Comparison, dtype is always Bool.
    Cmp(CmpOp, Rc<Expr>, Rc<Expr>),
}

/// Expression node: an operation plus its result dtype.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    op: ExprOp,
    dtype: DType,
}

impl Expr {
    pub fn new(op: ExprOp, dtype: DType) -> Rc<Self> {
        Rc::new(Self { op, dtype })
    }

    pub fn op(&self) -> &ExprOp {
        &self.op
    }

    pub fn dtype(&self) -> DType {
        self.dtype.clone()
    }

    /// Create a constant expression.
    pub fn const_(dtype: DType, value: ConstValue) -> Rc<Self> {
        Self::new(ExprOp::Const(ConstValueHash(value)), dtype)
    }

    /// Create an `Int32` index constant.
    ///
    /// Loop bounds and flat offsets are 32-bit in this IR, matching the
    /// index width the generated kernels run with.
    pub fn index_const(value: i64) -> Rc<Self> {
        Self::const_(DType::Int32, ConstValue::Int(value))
    }

    pub(crate) fn iter(var: IterVar) -> Rc<Self> {
        Self::new(ExprOp::Iter(var), DType::Int32)
    }

    pub(crate) fn scratch_load(scratch: ScratchId, dtype: DType, index: Rc<Expr>) -> Rc<Self> {
        Self::new(ExprOp::ScratchLoad { scratch, index }, dtype)
    }

    pub(crate) fn buffer_load(view: ViewId, dtype: DType, index: Rc<Expr>) -> Rc<Self> {
        Self::new(ExprOp::BufferLoad { view, index }, dtype)
    }

    /// Create a cast. Returns the source unchanged when the dtype already
    /// matches.
    pub fn cast(src: &Rc<Self>, dtype: DType) -> Rc<Self> {
        if src.dtype == dtype {
            return src.clone();
        }
        Self::new(ExprOp::Cast { src: src.clone() }, dtype)
    }

    /// Extract the constant value if this node is a `Const`.
    pub fn as_const(&self) -> Option<ConstValue> {
        match &self.op {
            ExprOp::Const(c) => Some(c.0),
            _ => None,
        }
    }

    fn binary(op: BinaryOp, lhs: &Rc<Self>, rhs: &Rc<Self>) -> Result<Rc<Self>> {
        ensure!(
            lhs.dtype == rhs.dtype,
            DTypeMismatchSnafu { op: <&'static str>::from(op), lhs: lhs.dtype(), rhs: rhs.dtype() }
        );
        let dtype = lhs.dtype.clone();
        Ok(Self::new(ExprOp::Binary(op, lhs.clone(), rhs.clone()), dtype))
    }

    fn cmp(op: CmpOp, lhs: &Rc<Self>, rhs: &Rc<Self>) -> Result<Rc<Self>> {
        ensure!(
            lhs.dtype == rhs.dtype,
            DTypeMismatchSnafu { op: <&'static str>::from(op), lhs: lhs.dtype(), rhs: rhs.dtype() }
        );
        Ok(Self::new(ExprOp::Cmp(op, lhs.clone(), rhs.clone()), DType::Bool))
    }
}

// Macro-generated helper methods for arithmetic and comparison operations
macro_rules! binary_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        impl Expr {
            $(
                pub fn $name(self: &Rc<Self>, rhs: &Rc<Self>) -> Result<Rc<Self>> {
                    Self::binary(BinaryOp::$op, self, rhs)
                }
            )*
        }
    }
}

macro_rules! cmp_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        impl Expr {
            $(
                pub fn $name(self: &Rc<Self>, rhs: &Rc<Self>) -> Result<Rc<Self>> {
                    Self::cmp(CmpOp::$op, self, rhs)
                }
            )*
        }
    }
}

binary_ops! {
    try_add => Add,
    try_sub => Sub,
    try_mul => Mul,
}

cmp_ops! {
    try_cmp_lt => Lt,
    try_cmp_gt => Gt,
    try_cmp_eq => Eq,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            ExprOp::Const(c) => match c.0 {
                ConstValue::Int(v) => write!(f, "{v}"),
                ConstValue::Float(v) => write!(f, "{v}"),
                ConstValue::Bool(v) => write!(f, "{v}"),
            },
            ExprOp::Iter(var) => write!(f, "{}", var.name),
            ExprOp::ScratchLoad { scratch, index } => write!(f, "reg{}[{index}]", scratch.0),
            ExprOp::BufferLoad { view, index } => write!(f, "buf{}[{index}]", view.0),
            ExprOp::Cast { src } => write!(f, "({}){src}", self.dtype),
            ExprOp::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
            ExprOp::Cmp(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
        }
    }
}
