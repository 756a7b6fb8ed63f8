//! Reference interpreter for sealed statement trees.
//!
//! Lowering and codegen live elsewhere; this walker exists so kernel
//! authors can execute a sealed tree directly against flat buffers and
//! check its semantics. Buffers are `f64`-backed regardless of declared
//! element dtype; casts to `Float32` round through `f32` so the narrower
//! width is observable, while the 16-bit float kinds are evaluated at
//! full precision.

use std::collections::HashMap;
use std::rc::Rc;

use snafu::ensure;

use kirin_dtype::ScalarDType;

use crate::buffer::ViewId;
use crate::error::{IndexOutOfBoundsSnafu, MissingBindingSnafu, Result, UnevaluableSnafu};
use crate::expr::{Expr, ExprOp};
use crate::stmt::Stmt;
use crate::types::{BinaryOp, CmpOp, ConstValue};

/// Execution state: buffer bindings keyed by view id, scratch cells, and
/// the live loop-variable environment.
#[derive(Debug, Default)]
pub struct Machine {
    buffers: HashMap<usize, Vec<f64>>,
    scratch: HashMap<(usize, i64), ConstValue>,
    iters: HashMap<u64, i64>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind flat storage to a buffer view id.
    pub fn bind_buffer(&mut self, view: ViewId, data: Vec<f64>) {
        self.buffers.insert(view.0, data);
    }

    pub fn buffer(&self, view: ViewId) -> Option<&[f64]> {
        self.buffers.get(&view.0).map(Vec::as_slice)
    }

    pub fn take_buffer(&mut self, view: ViewId) -> Option<Vec<f64>> {
        self.buffers.remove(&view.0)
    }

    /// Execute a sealed statement tree against the current bindings.
    pub fn run(&mut self, root: &Stmt) -> Result<()> {
        self.exec(root)
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Seq(stmts) => {
                for stmt in stmts {
                    self.exec(stmt)?;
                }
                Ok(())
            }
            Stmt::For { var, extent, body } => {
                let extent = self.eval_index(extent)?;
                for value in 0..extent {
                    self.iters.insert(var.id(), value);
                    self.exec(body)?;
                }
                // The induction variable dies with its scope.
                self.iters.remove(&var.id());
                Ok(())
            }
            Stmt::If { cond, then_body, else_body } => {
                let taken = match self.eval(cond)? {
                    ConstValue::Bool(b) => b,
                    _ => return UnevaluableSnafu { what: "non-bool condition" }.fail(),
                };
                match (taken, else_body) {
                    (true, _) => self.exec(then_body),
                    (false, Some(else_body)) => self.exec(else_body),
                    (false, None) => Ok(()),
                }
            }
            Stmt::BufferStore { view, index, value } => {
                let offset = self.eval_index(index)?;
                let value = self.eval(value)?.as_f64();
                let buffer = self
                    .buffers
                    .get_mut(&view.0)
                    .ok_or(crate::Error::MissingBinding { what: "buffer view", id: view.0 })?;
                ensure!(
                    offset >= 0 && (offset as usize) < buffer.len(),
                    IndexOutOfBoundsSnafu { index: offset, len: buffer.len() }
                );
                buffer[offset as usize] = value;
                Ok(())
            }
            Stmt::ScratchStore { scratch, index, value } => {
                let slot = self.eval_index(index)?;
                let value = self.eval(value)?;
                self.scratch.insert((scratch.0, slot), value);
                Ok(())
            }
        }
    }

    fn eval(&self, expr: &Rc<Expr>) -> Result<ConstValue> {
        match expr.op() {
            ExprOp::Const(c) => Ok(c.0),
            ExprOp::Iter(var) => self
                .iters
                .get(&var.id())
                .map(|&v| ConstValue::Int(v))
                .ok_or(crate::Error::MissingBinding { what: "iteration variable", id: var.id() as usize }),
            ExprOp::ScratchLoad { scratch, index } => {
                let slot = self.eval_index(index)?;
                self.scratch
                    .get(&(scratch.0, slot))
                    .copied()
                    .ok_or(crate::Error::MissingBinding { what: "scratch slot", id: scratch.0 })
            }
            ExprOp::BufferLoad { view, index } => {
                let offset = self.eval_index(index)?;
                let buffer = self
                    .buffers
                    .get(&view.0)
                    .ok_or(crate::Error::MissingBinding { what: "buffer view", id: view.0 })?;
                ensure!(
                    offset >= 0 && (offset as usize) < buffer.len(),
                    IndexOutOfBoundsSnafu { index: offset, len: buffer.len() }
                );
                let raw = buffer[offset as usize];
                Ok(if expr.dtype().is_int() { ConstValue::Int(raw as i64) } else { ConstValue::Float(raw) })
            }
            ExprOp::Cast { src } => {
                let value = self.eval(src)?;
                self.eval_cast(value, expr)
            }
            ExprOp::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                eval_binary(*op, lhs, rhs)
            }
            ExprOp::Cmp(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                eval_cmp(*op, lhs, rhs)
            }
        }
    }

    fn eval_index(&self, expr: &Rc<Expr>) -> Result<i64> {
        match self.eval(expr)? {
            ConstValue::Int(v) => Ok(v),
            _ => UnevaluableSnafu { what: "non-integer index" }.fail(),
        }
    }

    fn eval_cast(&self, value: ConstValue, target: &Rc<Expr>) -> Result<ConstValue> {
        let Some(scalar) = target.dtype().scalar() else {
            return UnevaluableSnafu { what: "cast to non-scalar dtype" }.fail();
        };
        Ok(match scalar {
            ScalarDType::Bool => ConstValue::Bool(value.as_f64() != 0.0),
            ScalarDType::Int32 => ConstValue::Int((value.as_f64() as i64) as i32 as i64),
            ScalarDType::Int64 => ConstValue::Int(value.as_f64() as i64),
            // The narrower float width is observable through the round-trip.
            ScalarDType::Float32 => ConstValue::Float(value.as_f64() as f32 as f64),
            ScalarDType::Float16 | ScalarDType::BFloat16 | ScalarDType::Float64 => ConstValue::Float(value.as_f64()),
        })
    }
}

fn eval_binary(op: BinaryOp, lhs: ConstValue, rhs: ConstValue) -> Result<ConstValue> {
    use ConstValue::*;
    Ok(match (lhs, rhs) {
        (Int(a), Int(b)) => Int(match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
        }),
        (Float(a), Float(b)) => Float(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
        }),
        _ => return UnevaluableSnafu { what: "mixed-type arithmetic" }.fail(),
    })
}

fn eval_cmp(op: CmpOp, lhs: ConstValue, rhs: ConstValue) -> Result<ConstValue> {
    use ConstValue::*;
    let result = match (lhs, rhs) {
        (Int(a), Int(b)) => match op {
            CmpOp::Lt => a < b,
            CmpOp::Gt => a > b,
            CmpOp::Eq => a == b,
        },
        (Float(a), Float(b)) => match op {
            CmpOp::Lt => a < b,
            CmpOp::Gt => a > b,
            CmpOp::Eq => a == b,
        },
        (Bool(a), Bool(b)) => match op {
            CmpOp::Lt => !a & b,
            CmpOp::Gt => a & !b,
            CmpOp::Eq => a == b,
        },
        _ => return UnevaluableSnafu { what: "mixed-type comparison" }.fail(),
    };
    Ok(Bool(result))
}
