// WBR - wbr-decoder
// Module: WebAssembly AST Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Builds an in-memory module tree from decode events.
//!
//! [`read_binary_ast`] walks a binary with any [`EventSource`] and feeds the
//! events to a [`BinaryReaderAst`], which reconstructs nested instruction
//! lists from the flat `block`/`loop`/`if`/`else`/`end` markers.
//!
//! ```rust
//! use wbr_decoder::{read_binary_ast, Expr, LogErrorHandler};
//! use wbr_format::{Event, EventStream, Opcode, ReadBinaryOptions, ValueType};
//!
//! let mut stream = EventStream::new();
//! stream
//!     .push(Event::BeginModule { version: 1 })
//!     .push(Event::OnType { index: 0, param_types: vec![], result_types: vec![ValueType::I32] })
//!     .push(Event::OnFunction { index: 0, sig_index: 0 })
//!     .push(Event::OnFunctionBodyCount { count: 1 })
//!     .push(Event::BeginFunctionBody { index: 0 })
//!     .push(Event::OnOpcode { opcode: Opcode::I32Const })
//!     .push(Event::OnI32ConstExpr { value: 7 })
//!     .push(Event::OnEndFunc)
//!     .push(Event::EndFunctionBody { index: 0 })
//!     .push(Event::EndModule);
//!
//! let module = read_binary_ast(&stream, &[], &ReadBinaryOptions::default(), &mut LogErrorHandler)?;
//! assert_eq!(module.funcs[0].body().count(), 1);
//! # Ok::<(), wbr_error::Error>(())
//! ```

#![forbid(unsafe_code)] // Rule 2
#![warn(missing_docs)]

/// The label-stack AST builder
pub mod binary_reader_ast;
/// Instruction nodes and their arena
pub mod expr;
/// Decoded module representation
pub mod module;

pub use binary_reader_ast::{
    BinaryReaderAst,
    LabelNode,
    LabelType,
    Slot,
    MAX_FUNCTION_LOCALS,
};
pub use expr::{
    Block,
    Const,
    Expr,
    ExprArena,
    ExprId,
    ExprList,
    ExprNode,
    MemArg,
};
pub use module::{
    DataSegment,
    ElemSegment,
    Export,
    Func,
    FuncDeclaration,
    FuncSignature,
    FuncType,
    Global,
    Import,
    ImportDesc,
    Memory,
    Module,
    ModuleCounts,
    ModuleField,
    Table,
};
use wbr_error::Result;
use wbr_format::{
    EventSource,
    ReadBinaryOptions,
};

/// Receives every decode failure before the walk aborts
pub trait BinaryErrorHandler {
    /// `offset` is `None` when the failure has no input position. Return
    /// `true` to ask the scanner to continue past a malformed-input error.
    fn on_error(&mut self, offset: Option<usize>, message: &str) -> bool;
}

impl<F> BinaryErrorHandler for F
where
    F: FnMut(Option<usize>, &str) -> bool,
{
    fn on_error(&mut self, offset: Option<usize>, message: &str) -> bool {
        self(offset, message)
    }
}

/// Error handler that logs every failure and never continues
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorHandler;

impl BinaryErrorHandler for LogErrorHandler {
    fn on_error(&mut self, offset: Option<usize>, message: &str) -> bool {
        match offset {
            Some(offset) => log::error!("@0x{offset:08x}: {message}"),
            None => log::error!("@unknown: {message}"),
        }
        false
    }
}

/// Decode `data` into a [`Module`].
///
/// Failures are passed to `error_handler` and abort the decode; no partial
/// module is returned.
pub fn read_binary_ast(
    source: &dyn EventSource,
    data: &[u8],
    options: &ReadBinaryOptions,
    error_handler: &mut dyn BinaryErrorHandler,
) -> Result<Module> {
    let mut builder = BinaryReaderAst::new(error_handler);
    wbr_intercept::read_binary(source, data, &mut builder, options)?;
    builder.finish()
}
