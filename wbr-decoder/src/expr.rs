// WBR - wbr-decoder
// Module: Instruction Tree
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Instruction nodes and the per-function arena that owns them.
//!
//! A function body is a singly linked list of [`ExprNode`]s. Structured
//! instructions own the head of a nested list through a [`Block`]. Nodes are
//! addressed by [`ExprId`], an index into the function's [`ExprArena`].

use wbr_error::{
    kinds,
    Result,
};
use wbr_format::{
    Opcode,
    ValueType,
};

/// Handle of a node in an [`ExprArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    /// Position of the node in its arena
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A constant operand, stored as raw bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Const {
    /// `i32.const`
    I32(u32),
    /// `i64.const`
    I64(u64),
    /// `f32.const`, IEEE 754 bits
    F32(u32),
    /// `f64.const`, IEEE 754 bits
    F64(u64),
}

impl Const {
    /// Type of the constant
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::I32(_) => ValueType::I32,
            Self::I64(_) => ValueType::I64,
            Self::F32(_) => ValueType::F32,
            Self::F64(_) => ValueType::F64,
        }
    }
}

/// Immediate of a load or store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemArg {
    /// Encoded alignment exponent
    pub align_log2: u32,
    /// Static address offset
    pub offset:     u32,
}

impl MemArg {
    /// Alignment in bytes
    pub fn alignment(self) -> Result<u32> {
        alignment(self.align_log2)
    }
}

/// `1 << align_log2`, failing when the result does not fit
pub fn alignment(align_log2: u32) -> Result<u32> {
    1u32.checked_shl(align_log2)
        .ok_or_else(|| kinds::AlignmentOverflow { align_log2 }.into())
}

/// A result signature and the head of a nested instruction list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Result types
    pub sig:   Vec<ValueType>,
    /// First instruction, `None` for an empty block
    pub first: Option<ExprId>,
}

impl Block {
    /// Create an empty block with the given signature
    pub fn new(sig: &[ValueType]) -> Self {
        Self {
            sig:   sig.to_vec(),
            first: None,
        }
    }
}

/// One MVP instruction
///
/// Branch depths are stored as decoded, relative to the enclosing labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Two-operand arithmetic
    Binary(Opcode),
    /// `block`
    Block(Block),
    /// `br`
    Br {
        /// Label depth
        depth: u32,
    },
    /// `br_if`
    BrIf {
        /// Label depth
        depth: u32,
    },
    /// `br_table`
    BrTable {
        /// Target depths, in table order
        targets:        Vec<u32>,
        /// Depth taken when the operand is out of range
        default_target: u32,
    },
    /// `call`
    Call {
        /// Callee
        func_index: u32,
    },
    /// `call_indirect`
    CallIndirect {
        /// Expected signature
        sig_index: u32,
    },
    /// Comparison
    Compare(Opcode),
    /// Constant
    Const(Const),
    /// Conversion
    Convert(Opcode),
    /// `current_memory`
    CurrentMemory,
    /// `drop`
    Drop,
    /// `get_global`
    GetGlobal {
        /// Global index
        index: u32,
    },
    /// `get_local`
    GetLocal {
        /// Local index, parameters first
        index: u32,
    },
    /// `grow_memory`
    GrowMemory,
    /// `if`, with an optional `else` list
    If {
        /// Signature and instructions of the taken branch
        true_block:  Block,
        /// Head of the `else` list; `None` without `else` or when it is empty
        false_first: Option<ExprId>,
    },
    /// Memory load
    Load {
        /// Which load
        opcode: Opcode,
        /// Alignment and offset
        memarg: MemArg,
    },
    /// `loop`
    Loop(Block),
    /// `nop`
    Nop,
    /// `return`
    Return,
    /// `select`
    Select,
    /// `set_global`
    SetGlobal {
        /// Global index
        index: u32,
    },
    /// `set_local`
    SetLocal {
        /// Local index, parameters first
        index: u32,
    },
    /// Memory store
    Store {
        /// Which store
        opcode: Opcode,
        /// Alignment and offset
        memarg: MemArg,
    },
    /// `tee_local`
    TeeLocal {
        /// Local index, parameters first
        index: u32,
    },
    /// One-operand arithmetic
    Unary(Opcode),
    /// `unreachable`
    Unreachable,
}

impl Expr {
    /// Whether the instruction opens a label
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Block(_) | Self::Loop(_) | Self::If { .. })
    }

    /// Whether the instruction may appear in an init expression
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Const(_) | Self::GetGlobal { .. })
    }
}

/// An instruction and its successor in the same list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprNode {
    /// The instruction
    pub expr: Expr,
    /// Next instruction of the same list
    pub next: Option<ExprId>,
}

/// Storage for every instruction node of one function
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `expr` as an unlinked node
    pub fn alloc(&mut self, expr: Expr) -> Result<ExprId> {
        let id = u32::try_from(self.nodes.len()).map_err(|_| kinds::AppendFailed)?;
        self.nodes.push(ExprNode { expr, next: None });
        Ok(ExprId(id))
    }

    /// Look up a node
    pub fn get(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: ExprId) -> Option<&mut ExprNode> {
        self.nodes.get_mut(id.index())
    }

    /// Look up the instruction of a node
    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.get(id).map(|node| &node.expr)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk the list starting at `first`
    pub fn list(&self, first: Option<ExprId>) -> ExprList<'_> {
        ExprList { arena: self, next: first }
    }
}

/// Iterator over one instruction list
#[derive(Debug, Clone)]
pub struct ExprList<'a> {
    arena: &'a ExprArena,
    next:  Option<ExprId>,
}

impl<'a> Iterator for ExprList<'a> {
    type Item = (ExprId, &'a Expr);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.arena.get(id)?;
        self.next = node.next;
        Some((id, &node.expr))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wbr_error::codes;

    use super::*;

    #[test]
    fn test_alignment() {
        assert_eq!(alignment(0).unwrap(), 1);
        assert_eq!(alignment(3).unwrap(), 8);
        assert_eq!(alignment(31).unwrap(), 1 << 31);

        let error = alignment(32).unwrap_err();
        assert_eq!(error.code, codes::ALIGNMENT_OVERFLOW);
        assert!(error.is_resource_error());
    }

    #[test]
    fn test_list_follows_links() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Nop).unwrap();
        let b = arena.alloc(Expr::Drop).unwrap();
        let c = arena.alloc(Expr::Return).unwrap();
        arena.get_mut(a).unwrap().next = Some(c);

        let list: Vec<_> = arena.list(Some(a)).map(|(_, expr)| expr.clone()).collect();
        assert_eq!(list, vec![Expr::Nop, Expr::Return]);
        assert_eq!(arena.list(Some(b)).count(), 1);
        assert_eq!(arena.list(None).count(), 0);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_expr_classification() {
        assert!(Expr::Block(Block::new(&[])).is_structured());
        assert!(!Expr::Nop.is_structured());
        assert!(Expr::Const(Const::I32(1)).is_constant());
        assert!(Expr::GetGlobal { index: 0 }.is_constant());
        assert!(!Expr::GetLocal { index: 0 }.is_constant());
        assert_eq!(Const::F64(0).value_type(), ValueType::F64);
    }
}
