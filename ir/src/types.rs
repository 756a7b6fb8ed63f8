//! Constant values and operator enums for the statement IR.

use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use kirin_dtype::{DType, ScalarDType};

/// Constant value carried by an expression node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ConstValue {
    /// Natural dtype of the stored representation.
    pub const fn dtype(&self) -> DType {
        match self {
            ConstValue::Int(_) => DType::Int64,
            ConstValue::Float(_) => DType::Float64,
            ConstValue::Bool(_) => DType::Bool,
        }
    }

    pub const fn zero(dtype: ScalarDType) -> Self {
        use ScalarDType::*;
        match dtype {
            Bool => Self::Bool(false),
            Int32 | Int64 => Self::Int(0),
            Float16 | BFloat16 | Float32 | Float64 => Self::Float(0.0),
        }
    }

    pub const fn one(dtype: ScalarDType) -> Self {
        use ScalarDType::*;
        match dtype {
            Bool => Self::Bool(true),
            Int32 | Int64 => Self::Int(1),
            Float16 | BFloat16 | Float32 | Float64 => Self::Float(1.0),
        }
    }

    /// Numeric view, for the interpreter.
    pub fn as_f64(&self) -> f64 {
        match self {
            ConstValue::Int(v) => *v as f64,
            ConstValue::Float(v) => *v,
            ConstValue::Bool(v) => *v as u8 as f64,
        }
    }

    /// Integer view, for index evaluation. `None` for float/bool values.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// Wrapper for ConstValue that implements Eq and Hash.
///
/// Floats are compared and hashed by bit pattern, so identical NaN bit
/// patterns compare equal. Consistent with structural tree comparison.
#[derive(Debug, Clone, Copy)]
pub struct ConstValueHash(pub ConstValue);

impl PartialEq for ConstValueHash {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (ConstValue::Int(a), ConstValue::Int(b)) => a == b,
            (ConstValue::Float(a), ConstValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ConstValue::Bool(a), ConstValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConstValueHash {}

impl Hash for ConstValueHash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(&self.0).hash(state);
        match self.0 {
            ConstValue::Int(v) => v.hash(state),
            ConstValue::Float(v) => v.to_bits().hash(state),
            ConstValue::Bool(v) => v.hash(state),
        }
    }
}

/// Arithmetic combination of two expressions. Preserves the LHS dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::IntoStaticStr, strum::AsRefStr)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
}

impl BinaryOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
        }
    }

    pub const fn is_commutative(&self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }
}

/// Comparison of two same-dtype expressions. Always yields `DType::Bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::IntoStaticStr, strum::AsRefStr)]
pub enum CmpOp {
    /// Less than: a < b
    Lt,
    /// Greater than: a > b
    Gt,
    /// Equality: a == b
    Eq,
}

impl CmpOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "==",
        }
    }
}
