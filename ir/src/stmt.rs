//! Statement nodes of the kernel IR.
//!
//! A sealed kernel body is a tree of these nodes. Nesting is strictly
//! tree-shaped: a scope's statements live in exactly one compound node,
//! and there are no cross-scope jumps.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::buffer::ViewId;
use crate::expr::{Expr, IterVar};
use crate::scratch::ScratchId;

/// Statement node.
///
/// Once a builder session is sealed, the root node and everything below it
/// is immutable; downstream consumers share it read-only.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Sequence of statements, executed in order.
    Seq(SmallVec<[Rc<Stmt>; 4]>),

    /// For-range loop over `[0, extent)` with a fresh induction variable.
    For { var: IterVar, extent: Rc<Expr>, body: Rc<Stmt> },

    /// Conditional with optional else branch.
    If { cond: Rc<Expr>, then_body: Rc<Stmt>, else_body: Option<Rc<Stmt>> },

    /// Flat-indexed store into a buffer view.
    BufferStore { view: ViewId, index: Rc<Expr>, value: Rc<Expr> },

    /// Store into a scratch slot.
    ScratchStore { scratch: ScratchId, index: Rc<Expr>, value: Rc<Expr> },
}

impl Stmt {
    /// Wrap a list of statements into a compound node.
    ///
    /// A single statement is returned as-is instead of a one-element `Seq`.
    pub fn seq(mut stmts: Vec<Rc<Stmt>>) -> Rc<Stmt> {
        if stmts.len() == 1 {
            return stmts.pop().expect("len checked");
        }
        Rc::new(Stmt::Seq(SmallVec::from_vec(stmts)))
    }

    /// Direct child statements, for tree traversal.
    pub fn children(&self) -> SmallVec<[&Rc<Stmt>; 4]> {
        match self {
            Self::Seq(stmts) => stmts.iter().collect(),
            Self::For { body, .. } => SmallVec::from_slice(&[body]),
            Self::If { then_body, else_body, .. } => {
                let mut children = SmallVec::from_slice(&[then_body]);
                children.extend(else_body);
                children
            }
            Self::BufferStore { .. } | Self::ScratchStore { .. } => SmallVec::new(),
        }
    }

    /// Count nodes in this subtree, the statement itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Self::Seq(stmts) => {
                for stmt in stmts {
                    stmt.fmt_indented(f, depth)?;
                }
                Ok(())
            }
            Self::For { var, extent, body } => {
                writeln!(f, "{pad}for {} in 0..{extent} {{", var.name())?;
                body.fmt_indented(f, depth + 1)?;
                writeln!(f, "{pad}}}")
            }
            Self::If { cond, then_body, else_body } => {
                writeln!(f, "{pad}if {cond} {{")?;
                then_body.fmt_indented(f, depth + 1)?;
                if let Some(else_body) = else_body {
                    writeln!(f, "{pad}}} else {{")?;
                    else_body.fmt_indented(f, depth + 1)?;
                }
                writeln!(f, "{pad}}}")
            }
            Self::BufferStore { view, index, value } => {
                writeln!(f, "{pad}buf{}[{index}] = {value}", view.0)
            }
            Self::ScratchStore { scratch, index, value } => {
                writeln!(f, "{pad}reg{}[{index}] = {value}", scratch.0)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
