// WBR - wbr-decoder
// Module: AST Builder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Rebuilds a nested [`Module`] from the flat decode event stream.
//!
//! Instructions arrive as a flat sequence; nesting is only implied by
//! `block`/`loop`/`if`/`else`/`end`. The builder keeps a stack of labels, one
//! per open scope. Each label knows where the next instruction of its scope
//! goes (its [`Slot`]) and the last instruction appended so far, so appending
//! is constant time.
//!
//! Every failure is reported once to the host's [`BinaryErrorHandler`] and
//! then aborts the walk with `Err`.

use wbr_error::{
    kinds,
    Error,
    Result,
};
use wbr_format::{
    BinaryReader,
    ExternalKind,
    Limits,
    Opcode,
    ReaderState,
    ValueType,
};

use crate::{
    expr::{
        self,
        Block,
        Const,
        Expr,
        ExprId,
        MemArg,
    },
    module::{
        DataSegment,
        ElemSegment,
        Export,
        Func,
        FuncDeclaration,
        FuncType,
        Global,
        Import,
        ImportDesc,
        Memory,
        Module,
        ModuleField,
        Table,
    },
    BinaryErrorHandler,
};

/// Kind of scope a label was opened by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelType {
    /// A function body
    Func,
    /// `block`
    Block,
    /// `loop`
    Loop,
    /// `if`, before any `else`
    If,
    /// The `else` arm of an `if`
    Else,
}

/// Where the first instruction of a scope is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// [`Func::first_expr`] of the current function
    FuncBody,
    /// The block of the `block`, `loop` or `if` node with this id
    BlockFirst(ExprId),
    /// The false list of the `if` node with this id
    IfFalse(ExprId),
}

/// One open scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelNode {
    /// What opened the scope
    pub label_type: LabelType,
    /// Head of the scope's list
    pub slot:       Slot,
    /// Last instruction appended to the scope
    pub last:       Option<ExprId>,
}

impl LabelNode {
    const fn new(label_type: LabelType, slot: Slot) -> Self {
        Self {
            label_type,
            slot,
            last: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitExprTarget {
    Global(usize),
    ElemSegment(usize),
    DataSegment(usize),
}

/// Most locals a single function may declare
pub const MAX_FUNCTION_LOCALS: usize = 50_000;

/// Make room for a declared `count` of items
fn reserve<T>(items: &mut Vec<T>, count: u32) -> Result<()> {
    items.try_reserve_exact(count as usize).map_err(|error| {
        log::warn!("cannot reserve {count} items: {error}");
        kinds::AppendFailed.into()
    })
}

/// A reader that builds a [`Module`]
pub struct BinaryReaderAst<'h> {
    error_handler:     &'h mut dyn BinaryErrorHandler,
    module:            Module,
    current_func:      Option<usize>,
    label_stack:       Vec<LabelNode>,
    max_depth:         usize,
    current_init_expr: Option<InitExprTarget>,
    bodies_read:       usize,
}

impl<'h> BinaryReaderAst<'h> {
    /// Create a builder reporting failures to `error_handler`
    pub fn new(error_handler: &'h mut dyn BinaryErrorHandler) -> Self {
        Self {
            error_handler,
            module: Module::new(),
            current_func: None,
            label_stack: Vec::new(),
            max_depth: 0,
            current_init_expr: None,
            bodies_read: 0,
        }
    }

    /// The module built so far
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Number of open labels
    pub fn label_depth(&self) -> usize {
        self.label_stack.len()
    }

    /// Deepest label nesting seen so far
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Finish the walk and take the module.
    ///
    /// Fails if a scope is still open.
    pub fn finish(mut self) -> Result<Module> {
        if !self.label_stack.is_empty() {
            let error = kinds::UnclosedScope {
                at:    "end of input",
                depth: self.label_stack.len(),
            };
            return Err(self.report(None, error.into()));
        }
        log::debug!(
            "built module: {} fields, {} funcs, max label depth {}",
            self.module.fields.len(),
            self.module.funcs.len(),
            self.max_depth
        );
        Ok(self.module)
    }

    fn report(&mut self, offset: Option<usize>, error: Error) -> Error {
        match offset {
            Some(offset) => log::warn!("decode error at 0x{offset:x}: {}", error.message()),
            None => log::warn!("decode error: {}", error.message()),
        }
        // Builder errors always abort; the handler's answer only matters for
        // scanner errors.
        let _ = self.error_handler.on_error(offset, error.message());
        match offset {
            Some(offset) => error.at_offset(offset),
            None => error,
        }
    }

    fn checked<T>(&mut self, state: &ReaderState<'_>, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = f(self);
        result.map_err(|error| self.report(Some(state.offset), error))
    }

    fn push_label(&mut self, label_type: LabelType, slot: Slot) {
        self.label_stack.push(LabelNode::new(label_type, slot));
        self.max_depth = self.max_depth.max(self.label_stack.len());
        log::trace!("push {:?} label, depth {}", label_type, self.label_stack.len());
    }

    fn pop_label(&mut self) -> Result<LabelNode> {
        let label = self.label_stack.pop().ok_or(kinds::LabelStackUnderflow)?;
        log::trace!("pop {:?} label, depth {}", label.label_type, self.label_stack.len());
        Ok(label)
    }

    /// Position in `label_stack` of the label `depth` levels below the top
    fn label_at(&self, depth: usize) -> Result<usize> {
        let len = self.label_stack.len();
        if depth >= len {
            return Err(kinds::LabelDepthOutOfRange { depth, max: len }.into());
        }
        Ok(len - depth - 1)
    }

    fn current_func(&self, event: &'static str) -> Result<usize> {
        self.current_func.ok_or_else(|| {
            kinds::UnexpectedEvent {
                event,
                reason: "outside of a function body",
            }
            .into()
        })
    }

    fn append_expr(&mut self, expr: Expr) -> Result<ExprId> {
        let top = self.label_at(0)?;
        let func_index = self.current_func("instruction")?;
        let func = self
            .module
            .funcs
            .get_mut(func_index)
            .ok_or(kinds::AppendFailed)?;
        let id = func.exprs.alloc(expr)?;
        let label = &mut self.label_stack[top];

        match label.last {
            Some(last) => {
                func.exprs.get_mut(last).ok_or(kinds::AppendFailed)?.next = Some(id);
            }
            None => match label.slot {
                Slot::FuncBody => func.first_expr = Some(id),
                Slot::BlockFirst(owner) => {
                    match func.exprs.get_mut(owner).map(|node| &mut node.expr) {
                        Some(Expr::Block(block) | Expr::Loop(block)) => block.first = Some(id),
                        Some(Expr::If { true_block, .. }) => true_block.first = Some(id),
                        _ => return Err(kinds::AppendFailed.into()),
                    }
                }
                Slot::IfFalse(owner) => match func.exprs.get_mut(owner).map(|node| &mut node.expr) {
                    Some(Expr::If { false_first, .. }) => *false_first = Some(id),
                    _ => return Err(kinds::AppendFailed.into()),
                },
            },
        }
        label.last = Some(id);
        Ok(id)
    }

    fn append(&mut self, state: &ReaderState<'_>, expr: Expr) -> Result<()> {
        self.checked(state, |this| this.append_expr(expr).map(drop))
    }

    fn append_scope(&mut self, state: &ReaderState<'_>, label_type: LabelType, expr: Expr) -> Result<()> {
        self.checked(state, |this| {
            let id = this.append_expr(expr)?;
            this.push_label(label_type, Slot::BlockFirst(id));
            Ok(())
        })
    }

    fn append_memory(&mut self, state: &ReaderState<'_>, store: bool, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.checked(state, |this| {
            expr::alignment(align_log2)?;
            let memarg = MemArg { align_log2, offset };
            let expr = if store {
                Expr::Store { opcode, memarg }
            } else {
                Expr::Load { opcode, memarg }
            };
            this.append_expr(expr).map(drop)
        })
    }

    fn check_sig_index(&self, sig_index: u32) -> Result<()> {
        if sig_index as usize >= self.module.func_types.len() {
            return Err(kinds::IndexOutOfRange {
                what:  "signature",
                index: sig_index,
                count: self.module.func_types.len(),
            }
            .into());
        }
        Ok(())
    }

    fn declaration(&self, sig_index: u32) -> Result<FuncDeclaration> {
        self.check_sig_index(sig_index)?;
        let sig = self.module.func_types[sig_index as usize].sig.clone();
        Ok(FuncDeclaration {
            type_index: Some(sig_index),
            sig,
        })
    }

    /// `index` must name the most recent item of a collection of `len`
    fn last_item(what: &'static str, index: u32, len: usize) -> Result<usize> {
        let position = index as usize;
        if len == 0 || position != len - 1 {
            return Err(kinds::IndexOutOfRange { what, index, count: len }.into());
        }
        Ok(position)
    }

    /// Complete the most recent import with `desc`
    fn complete_import(&mut self, import_index: u32, imported: usize, defined: usize, desc: ImportDesc) -> Result<()> {
        let expected = self.module.imports.len().checked_sub(1);
        if expected != Some(import_index as usize) {
            return Err(kinds::ImportIndexMismatch {
                index: import_index,
                expected,
            }
            .into());
        }
        if imported != defined {
            return Err(kinds::UnexpectedEvent {
                event:  "import",
                reason: "imports must precede definitions of the same kind",
            }
            .into());
        }
        let import = &mut self.module.imports[import_index as usize];
        if import.desc.is_some() {
            return Err(kinds::UnexpectedEvent {
                event:  "import",
                reason: "import kind already set",
            }
            .into());
        }
        import.desc = Some(desc);
        Ok(())
    }

    fn begin_init_expr(&mut self, event: &'static str, target: InitExprTarget) -> Result<()> {
        if self.current_init_expr.is_some() {
            return Err(kinds::UnexpectedEvent {
                event,
                reason: "another init expression is open",
            }
            .into());
        }
        self.current_init_expr = Some(target);
        Ok(())
    }

    fn end_init_expr(&mut self, event: &'static str, target: InitExprTarget) -> Result<()> {
        if self.current_init_expr != Some(target) {
            return Err(kinds::InitExprOutsideScope { event }.into());
        }
        self.current_init_expr = None;
        Ok(())
    }

    fn set_init_expr(&mut self, event: &'static str, expr: Expr) -> Result<()> {
        let slot = match self.current_init_expr {
            None => None,
            Some(InitExprTarget::Global(i)) => self.module.globals.get_mut(i).map(|g| &mut g.init_expr),
            Some(InitExprTarget::ElemSegment(i)) => self.module.elem_segments.get_mut(i).map(|s| &mut s.offset),
            Some(InitExprTarget::DataSegment(i)) => self.module.data_segments.get_mut(i).map(|s| &mut s.offset),
        };
        let Some(slot) = slot else {
            return Err(kinds::InitExprOutsideScope { event }.into());
        };
        if slot.is_some() {
            return Err(kinds::UnexpectedEvent {
                event,
                reason: "init expression already has a value",
            }
            .into());
        }
        *slot = Some(expr);
        Ok(())
    }

    fn func_index(&self, what: &'static str, index: u32) -> Result<usize> {
        let position = index as usize;
        if position >= self.module.funcs.len() {
            return Err(kinds::IndexOutOfRange {
                what,
                index,
                count: self.module.funcs.len(),
            }
            .into());
        }
        Ok(position)
    }
}

impl BinaryReader for BinaryReaderAst<'_> {
    fn on_error(&mut self, state: &ReaderState<'_>, message: &str) -> bool {
        log::warn!("scanner error at 0x{:x}: {}", state.offset, message);
        self.error_handler.on_error(Some(state.offset), message)
    }

    fn begin_module(&mut self, _state: &ReaderState<'_>, version: u32) -> Result<()> {
        self.module.version = version;
        Ok(())
    }

    fn end_module(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.checked(state, |this| {
            if this.label_stack.is_empty() {
                Ok(())
            } else {
                Err(kinds::UnclosedScope {
                    at:    "end of module",
                    depth: this.label_stack.len(),
                }
                .into())
            }
        })
    }

    // Types and imports

    fn on_type_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.func_types, count))
    }

    fn on_type(
        &mut self,
        _state: &ReaderState<'_>,
        _index: u32,
        param_types: &[ValueType],
        result_types: &[ValueType],
    ) -> Result<()> {
        let mut func_type = FuncType::default();
        func_type.sig.param_types = param_types.to_vec();
        func_type.sig.result_types = result_types.to_vec();
        self.module.fields.push(ModuleField::FuncType(self.module.func_types.len()));
        self.module.func_types.push(func_type);
        Ok(())
    }

    fn on_import_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.imports, count))
    }

    fn on_import(&mut self, _state: &ReaderState<'_>, _index: u32, module_name: &str, field_name: &str) -> Result<()> {
        self.module.fields.push(ModuleField::Import(self.module.imports.len()));
        self.module.imports.push(Import {
            module_name: module_name.to_string(),
            field_name:  field_name.to_string(),
            desc:        None,
        });
        Ok(())
    }

    fn on_import_func(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        _module_name: &str,
        _field_name: &str,
        _func_index: u32,
        sig_index: u32,
    ) -> Result<()> {
        self.checked(state, |this| {
            let decl = this.declaration(sig_index)?;
            let index = this.module.funcs.len();
            this.complete_import(import_index, this.module.num_func_imports, index, ImportDesc::Func(index))?;
            this.module.funcs.push(Func {
                decl,
                ..Func::default()
            });
            this.module.num_func_imports += 1;
            Ok(())
        })
    }

    fn on_import_table(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        _module_name: &str,
        _field_name: &str,
        _table_index: u32,
        elem_type: ValueType,
        elem_limits: &Limits,
    ) -> Result<()> {
        self.checked(state, |this| {
            let index = this.module.tables.len();
            this.complete_import(import_index, this.module.num_table_imports, index, ImportDesc::Table(index))?;
            this.module.tables.push(Table {
                elem_type,
                elem_limits: *elem_limits,
            });
            this.module.num_table_imports += 1;
            Ok(())
        })
    }

    fn on_import_memory(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        _module_name: &str,
        _field_name: &str,
        _memory_index: u32,
        page_limits: &Limits,
    ) -> Result<()> {
        self.checked(state, |this| {
            let index = this.module.memories.len();
            this.complete_import(import_index, this.module.num_memory_imports, index, ImportDesc::Memory(index))?;
            this.module.memories.push(Memory {
                page_limits: *page_limits,
            });
            this.module.num_memory_imports += 1;
            Ok(())
        })
    }

    fn on_import_global(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        _module_name: &str,
        _field_name: &str,
        _global_index: u32,
        ty: ValueType,
        mutable: bool,
    ) -> Result<()> {
        self.checked(state, |this| {
            let index = this.module.globals.len();
            this.complete_import(import_index, this.module.num_global_imports, index, ImportDesc::Global(index))?;
            this.module.globals.push(Global {
                ty,
                mutable,
                init_expr: None,
            });
            this.module.num_global_imports += 1;
            Ok(())
        })
    }

    // Definitions

    fn on_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.funcs, count))
    }

    fn on_function(&mut self, state: &ReaderState<'_>, _index: u32, sig_index: u32) -> Result<()> {
        self.checked(state, |this| {
            let decl = this.declaration(sig_index)?;
            this.module.fields.push(ModuleField::Func(this.module.funcs.len()));
            this.module.funcs.push(Func {
                decl,
                ..Func::default()
            });
            Ok(())
        })
    }

    fn on_table_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.tables, count))
    }

    fn on_table(&mut self, _state: &ReaderState<'_>, _index: u32, elem_type: ValueType, elem_limits: &Limits) -> Result<()> {
        self.module.fields.push(ModuleField::Table(self.module.tables.len()));
        self.module.tables.push(Table {
            elem_type,
            elem_limits: *elem_limits,
        });
        Ok(())
    }

    fn on_memory_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.memories, count))
    }

    fn on_memory(&mut self, _state: &ReaderState<'_>, _index: u32, page_limits: &Limits) -> Result<()> {
        self.module.fields.push(ModuleField::Memory(self.module.memories.len()));
        self.module.memories.push(Memory {
            page_limits: *page_limits,
        });
        Ok(())
    }

    fn on_global_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.globals, count))
    }

    fn begin_global(&mut self, _state: &ReaderState<'_>, _index: u32, ty: ValueType, mutable: bool) -> Result<()> {
        self.module.fields.push(ModuleField::Global(self.module.globals.len()));
        self.module.globals.push(Global {
            ty,
            mutable,
            init_expr: None,
        });
        Ok(())
    }

    fn begin_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            let position = Self::last_item("global", index, this.module.globals.len())?;
            if position < this.module.num_global_imports {
                return Err(kinds::UnexpectedEvent {
                    event:  "BeginGlobalInitExpr",
                    reason: "imported globals have no init expression",
                }
                .into());
            }
            this.begin_init_expr("BeginGlobalInitExpr", InitExprTarget::Global(position))
        })
    }

    fn end_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            this.end_init_expr("EndGlobalInitExpr", InitExprTarget::Global(index as usize))
        })
    }

    fn on_export_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.exports, count))
    }

    fn on_export(
        &mut self,
        state: &ReaderState<'_>,
        _index: u32,
        kind: ExternalKind,
        item_index: u32,
        name: &str,
    ) -> Result<()> {
        self.checked(state, |this| {
            let count = this.module.item_count(kind);
            if item_index as usize >= count {
                return Err(kinds::IndexOutOfRange {
                    what: kind.name(),
                    index: item_index,
                    count,
                }
                .into());
            }
            this.module.fields.push(ModuleField::Export(this.module.exports.len()));
            this.module.exports.push(Export {
                name: name.to_string(),
                kind,
                item_index,
            });
            Ok(())
        })
    }

    fn on_start_function(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        self.checked(state, |this| {
            this.func_index("start function", func_index)?;
            this.module.fields.push(ModuleField::Start(func_index));
            this.module.start = Some(func_index);
            Ok(())
        })
    }

    // Code

    fn on_function_body_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| {
            let declared = this.module.funcs.len() - this.module.num_func_imports;
            if declared != count as usize {
                return Err(kinds::BodyCountMismatch {
                    declared,
                    bodies: count,
                }
                .into());
            }
            Ok(())
        })
    }

    fn begin_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            if !this.label_stack.is_empty() {
                return Err(kinds::UnclosedScope {
                    at:    "start of function body",
                    depth: this.label_stack.len(),
                }
                .into());
            }
            let position = this.func_index("function body", index)?;
            if position < this.module.num_func_imports {
                return Err(kinds::UnexpectedEvent {
                    event:  "BeginFunctionBody",
                    reason: "imported functions have no body",
                }
                .into());
            }
            if position != this.module.num_func_imports + this.bodies_read {
                return Err(kinds::UnexpectedEvent {
                    event:  "BeginFunctionBody",
                    reason: "function bodies must arrive once each, in index order",
                }
                .into());
            }
            this.bodies_read += 1;
            log::debug!("function body {index}");
            this.current_func = Some(position);
            this.push_label(LabelType::Func, Slot::FuncBody);
            Ok(())
        })
    }

    fn on_local_decl(&mut self, state: &ReaderState<'_>, _decl_index: u32, count: u32, ty: ValueType) -> Result<()> {
        self.checked(state, |this| {
            let func_index = this.current_func("local declaration")?;
            let locals = &mut this.module.funcs[func_index].local_types;
            let total = locals.len().saturating_add(count as usize);
            if total > MAX_FUNCTION_LOCALS {
                log::warn!("function {func_index} declares {total} locals, limit is {MAX_FUNCTION_LOCALS}");
                return Err(kinds::AppendFailed.into());
            }
            reserve(locals, count)?;
            locals.resize(total, ty);
            Ok(())
        })
    }

    fn on_binary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.append(state, Expr::Binary(opcode))
    }

    fn on_block_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.append_scope(state, LabelType::Block, Expr::Block(Block::new(sig_types)))
    }

    fn on_br_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        self.append(state, Expr::Br { depth })
    }

    fn on_br_if_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        self.append(state, Expr::BrIf { depth })
    }

    fn on_br_table_expr(
        &mut self,
        state: &ReaderState<'_>,
        target_depths: &[u32],
        default_target_depth: u32,
    ) -> Result<()> {
        self.append(state, Expr::BrTable {
            targets:        target_depths.to_vec(),
            default_target: default_target_depth,
        })
    }

    fn on_call_expr(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        self.append(state, Expr::Call { func_index })
    }

    fn on_call_indirect_expr(&mut self, state: &ReaderState<'_>, sig_index: u32) -> Result<()> {
        self.checked(state, |this| {
            this.check_sig_index(sig_index)?;
            this.append_expr(Expr::CallIndirect { sig_index }).map(drop)
        })
    }

    fn on_compare_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.append(state, Expr::Compare(opcode))
    }

    fn on_convert_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.append(state, Expr::Convert(opcode))
    }

    fn on_current_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::CurrentMemory)
    }

    fn on_drop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::Drop)
    }

    fn on_else_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.checked(state, |this| {
            let top = this.label_at(0)?;
            let label = this.label_stack[top];
            let (LabelType::If, Slot::BlockFirst(if_id)) = (label.label_type, label.slot) else {
                return Err(kinds::ElseWithoutIf.into());
            };
            debug_assert!(top > 0 && this.label_stack[top - 1].last == Some(if_id));
            let label = &mut this.label_stack[top];
            label.label_type = LabelType::Else;
            label.slot = Slot::IfFalse(if_id);
            label.last = None;
            Ok(())
        })
    }

    fn on_end_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.checked(state, |this| {
            let top = this.label_at(0)?;
            if this.label_stack[top].label_type == LabelType::Func {
                return Err(kinds::UnexpectedEvent {
                    event:  "end",
                    reason: "no open block, loop or if in the function body",
                }
                .into());
            }
            this.pop_label().map(drop)
        })
    }

    fn on_f32_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        self.append(state, Expr::Const(Const::F32(value_bits)))
    }

    fn on_f64_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        self.append(state, Expr::Const(Const::F64(value_bits)))
    }

    fn on_get_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        self.append(state, Expr::GetGlobal { index: global_index })
    }

    fn on_get_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.append(state, Expr::GetLocal { index: local_index })
    }

    fn on_grow_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::GrowMemory)
    }

    fn on_i32_const_expr(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        self.append(state, Expr::Const(Const::I32(value)))
    }

    fn on_i64_const_expr(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        self.append(state, Expr::Const(Const::I64(value)))
    }

    fn on_if_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.append_scope(state, LabelType::If, Expr::If {
            true_block:  Block::new(sig_types),
            false_first: None,
        })
    }

    fn on_load_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.append_memory(state, false, opcode, align_log2, offset)
    }

    fn on_loop_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.append_scope(state, LabelType::Loop, Expr::Loop(Block::new(sig_types)))
    }

    fn on_nop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::Nop)
    }

    fn on_return_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::Return)
    }

    fn on_select_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::Select)
    }

    fn on_set_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        self.append(state, Expr::SetGlobal { index: global_index })
    }

    fn on_set_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.append(state, Expr::SetLocal { index: local_index })
    }

    fn on_store_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.append_memory(state, true, opcode, align_log2, offset)
    }

    fn on_tee_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.append(state, Expr::TeeLocal { index: local_index })
    }

    fn on_unary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.append(state, Expr::Unary(opcode))
    }

    fn on_unreachable_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.append(state, Expr::Unreachable)
    }

    fn end_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            if this.current_func != Some(index as usize) {
                return Err(kinds::UnexpectedEvent {
                    event:  "EndFunctionBody",
                    reason: "index does not match the open function body",
                }
                .into());
            }
            let top = this.label_at(0)?;
            if this.label_stack[top].label_type != LabelType::Func {
                return Err(kinds::UnclosedScope {
                    at:    "end of function body",
                    depth: this.label_stack.len() - 1,
                }
                .into());
            }
            this.pop_label()?;
            this.current_func = None;
            Ok(())
        })
    }

    // Segments

    fn on_elem_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.elem_segments, count))
    }

    fn begin_elem_segment(&mut self, _state: &ReaderState<'_>, _index: u32, table_index: u32) -> Result<()> {
        self.module.fields.push(ModuleField::ElemSegment(self.module.elem_segments.len()));
        self.module.elem_segments.push(ElemSegment {
            table_index,
            offset: None,
            func_indices: Vec::new(),
        });
        Ok(())
    }

    fn begin_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            let position = Self::last_item("elem segment", index, this.module.elem_segments.len())?;
            this.begin_init_expr("BeginElemSegmentInitExpr", InitExprTarget::ElemSegment(position))
        })
    }

    fn end_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            this.end_init_expr("EndElemSegmentInitExpr", InitExprTarget::ElemSegment(index as usize))
        })
    }

    fn on_elem_segment_function_index_count(&mut self, state: &ReaderState<'_>, index: u32, count: u32) -> Result<()> {
        self.checked(state, |this| {
            let position = Self::last_item("elem segment", index, this.module.elem_segments.len())?;
            reserve(&mut this.module.elem_segments[position].func_indices, count)
        })
    }

    fn on_elem_segment_function_index(&mut self, state: &ReaderState<'_>, index: u32, func_index: u32) -> Result<()> {
        self.checked(state, |this| {
            let position = Self::last_item("elem segment", index, this.module.elem_segments.len())?;
            this.module.elem_segments[position].func_indices.push(func_index);
            Ok(())
        })
    }

    fn on_data_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| reserve(&mut this.module.data_segments, count))
    }

    fn begin_data_segment(&mut self, _state: &ReaderState<'_>, _index: u32, memory_index: u32) -> Result<()> {
        self.module.fields.push(ModuleField::DataSegment(self.module.data_segments.len()));
        self.module.data_segments.push(DataSegment {
            memory_index,
            offset: None,
            data: Vec::new(),
        });
        Ok(())
    }

    fn begin_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            let position = Self::last_item("data segment", index, this.module.data_segments.len())?;
            this.begin_init_expr("BeginDataSegmentInitExpr", InitExprTarget::DataSegment(position))
        })
    }

    fn end_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.checked(state, |this| {
            this.end_init_expr("EndDataSegmentInitExpr", InitExprTarget::DataSegment(index as usize))
        })
    }

    fn on_data_segment_data(&mut self, state: &ReaderState<'_>, index: u32, data: &[u8]) -> Result<()> {
        self.checked(state, |this| {
            let position = Self::last_item("data segment", index, this.module.data_segments.len())?;
            this.module.data_segments[position].data = data.to_vec();
            Ok(())
        })
    }

    // Names

    fn on_function_names_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.checked(state, |this| {
            let items = this.module.funcs.len();
            if count as usize > items {
                return Err(kinds::NameCountExceedsItems {
                    what: "function",
                    count,
                    items,
                }
                .into());
            }
            Ok(())
        })
    }

    /// Binds `name` to the function, replacing the function's previous
    /// name. When another function already holds `name`, the binding moves
    /// to this one and the other function keeps its `name` field.
    fn on_function_name(&mut self, state: &ReaderState<'_>, function_index: u32, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        self.checked(state, |this| {
            let position = this.func_index("function", function_index)?;
            let module = &mut this.module;
            if let Some(old) = module.funcs[position].name.replace(name.to_string()) {
                if module.func_bindings.get(&old) == Some(&function_index) {
                    module.func_bindings.remove(&old);
                }
            }
            module.func_bindings.insert(name.to_string(), function_index);
            Ok(())
        })
    }

    fn on_local_name_local_count(&mut self, state: &ReaderState<'_>, function_index: u32, count: u32) -> Result<()> {
        self.checked(state, |this| {
            let position = this.func_index("function", function_index)?;
            let items = this.module.funcs[position].num_params_and_locals();
            if count as usize > items {
                return Err(kinds::NameCountExceedsItems {
                    what: "local",
                    count,
                    items,
                }
                .into());
            }
            Ok(())
        })
    }

    fn on_local_name(
        &mut self,
        state: &ReaderState<'_>,
        function_index: u32,
        local_index: u32,
        name: &str,
    ) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        self.checked(state, |this| {
            let position = this.func_index("function", function_index)?;
            let func = &mut this.module.funcs[position];
            let num_params = func.num_params();
            let count = func.num_params_and_locals();
            if local_index as usize >= count {
                return Err(kinds::IndexOutOfRange {
                    what: "local",
                    index: local_index,
                    count,
                }
                .into());
            }
            if (local_index as usize) < num_params {
                func.param_bindings.insert(name.to_string(), local_index);
            } else {
                func.local_bindings
                    .insert(name.to_string(), local_index - num_params as u32);
            }
            Ok(())
        })
    }

    // Init expressions

    fn on_init_expr_f32_const_expr(&mut self, state: &ReaderState<'_>, _index: u32, value_bits: u32) -> Result<()> {
        self.checked(state, |this| {
            this.set_init_expr("f32.const", Expr::Const(Const::F32(value_bits)))
        })
    }

    fn on_init_expr_f64_const_expr(&mut self, state: &ReaderState<'_>, _index: u32, value_bits: u64) -> Result<()> {
        self.checked(state, |this| {
            this.set_init_expr("f64.const", Expr::Const(Const::F64(value_bits)))
        })
    }

    fn on_init_expr_get_global_expr(&mut self, state: &ReaderState<'_>, _index: u32, global_index: u32) -> Result<()> {
        self.checked(state, |this| {
            this.set_init_expr("get_global", Expr::GetGlobal { index: global_index })
        })
    }

    fn on_init_expr_i32_const_expr(&mut self, state: &ReaderState<'_>, _index: u32, value: u32) -> Result<()> {
        self.checked(state, |this| this.set_init_expr("i32.const", Expr::Const(Const::I32(value))))
    }

    fn on_init_expr_i64_const_expr(&mut self, state: &ReaderState<'_>, _index: u32, value: u64) -> Result<()> {
        self.checked(state, |this| this.set_init_expr("i64.const", Expr::Const(Const::I64(value))))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wbr_error::codes;

    use super::*;

    fn at(offset: usize) -> ReaderState<'static> {
        ReaderState::new(&[], offset)
    }

    /// One `() -> ()` function with its body open
    fn open_body(builder: &mut BinaryReaderAst<'_>) {
        builder.on_type(&at(0), 0, &[], &[]).unwrap();
        builder.on_function(&at(1), 0, 0).unwrap();
        builder.on_function_body_count(&at(2), 1).unwrap();
        builder.begin_function_body(&at(3), 0).unwrap();
    }

    #[test]
    fn test_nested_block_links() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        open_body(&mut builder);

        builder.on_nop_expr(&at(4)).unwrap();
        builder.on_block_expr(&at(5), &[]).unwrap();
        assert_eq!(builder.label_depth(), 2);
        builder.on_drop_expr(&at(6)).unwrap();
        builder.on_end_expr(&at(7)).unwrap();
        builder.on_return_expr(&at(8)).unwrap();
        builder.end_function_body(&at(9), 0).unwrap();
        assert_eq!(builder.label_depth(), 0);
        assert_eq!(builder.max_depth(), 2);

        let module = builder.finish().unwrap();
        let func = &module.funcs[0];
        let body: Vec<_> = func.body().map(|(_, e)| e.clone()).collect();
        assert_eq!(body.len(), 3);
        let Expr::Block(block) = &body[1] else {
            panic!("expected a block, got {:?}", body[1]);
        };
        let inner: Vec<_> = func.exprs.list(block.first).map(|(_, e)| e.clone()).collect();
        assert_eq!(inner, vec![Expr::Drop]);
    }

    #[test]
    fn test_else_without_if() {
        let mut messages = Vec::new();
        let mut collect = |offset: Option<usize>, message: &str| {
            messages.push((offset, message.to_string()));
            false
        };
        let mut builder = BinaryReaderAst::new(&mut collect);
        open_body(&mut builder);
        builder.on_block_expr(&at(4), &[]).unwrap();

        let error = builder.on_else_expr(&at(5)).unwrap_err();
        assert_eq!(error.code, codes::ELSE_WITHOUT_IF);
        assert_eq!(error.offset, Some(5));
        drop(builder);
        assert_eq!(messages, vec![(
            Some(5),
            "else expression without matching if".to_string()
        )]);
    }

    #[test]
    fn test_instruction_outside_body() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        let error = builder.on_nop_expr(&at(9)).unwrap_err();
        assert_eq!(error.code, codes::LABEL_DEPTH_OUT_OF_RANGE);
        assert_eq!(error.message(), "accessing stack depth: 0 >= max: 0");
    }

    #[test]
    fn test_alignment_overflow_is_reported() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        open_body(&mut builder);
        builder.on_load_expr(&at(4), Opcode::I32Load, 2, 8).unwrap();
        let error = builder.on_store_expr(&at(5), Opcode::I32Store, 40, 0).unwrap_err();
        assert_eq!(error.code, codes::ALIGNMENT_OVERFLOW);
    }

    #[test]
    fn test_init_expr_scoping() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        builder.begin_global(&at(0), 0, ValueType::I32, false).unwrap();

        let error = builder.on_init_expr_i32_const_expr(&at(1), 0, 1).unwrap_err();
        assert_eq!(error.code, codes::INIT_EXPR_OUTSIDE_SCOPE);

        builder.begin_global_init_expr(&at(2), 0).unwrap();
        builder.on_init_expr_i32_const_expr(&at(3), 0, 42).unwrap();
        let error = builder.on_init_expr_i32_const_expr(&at(4), 0, 43).unwrap_err();
        assert_eq!(error.code, codes::UNEXPECTED_EVENT);
        builder.end_global_init_expr(&at(5), 0).unwrap();

        let module = builder.finish().unwrap();
        assert_eq!(module.globals[0].init_expr, Some(Expr::Const(Const::I32(42))));
    }

    #[test]
    fn test_import_detail_must_follow_its_import() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        builder.on_import(&at(0), 0, "env", "mem").unwrap();
        let error = builder
            .on_import_memory(&at(1), 1, "env", "mem", 0, &Limits::new(1))
            .unwrap_err();
        assert_eq!(error.code, codes::IMPORT_INDEX_MISMATCH);
    }

    #[test]
    fn test_oversized_counts_are_reported() {
        let mut messages = Vec::new();
        let mut collect = |offset: Option<usize>, message: &str| {
            messages.push((offset, message.to_string()));
            false
        };
        let mut builder = BinaryReaderAst::new(&mut collect);

        let error = builder.on_type_count(&at(0), u32::MAX).unwrap_err();
        assert_eq!(error.code, codes::APPEND_FAILED);
        assert!(error.is_resource_error());
        assert_eq!(error.offset, Some(0));

        open_body(&mut builder);
        builder.on_local_decl(&at(4), 0, 3, ValueType::I32).unwrap();
        let error = builder.on_local_decl(&at(5), 1, u32::MAX, ValueType::I64).unwrap_err();
        assert_eq!(error.code, codes::APPEND_FAILED);
        assert_eq!(builder.module().funcs[0].local_types, vec![ValueType::I32; 3]);
        drop(builder);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], (Some(5), "failed to append expression".to_string()));
    }

    #[test]
    fn test_local_limit() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        open_body(&mut builder);
        builder
            .on_local_decl(&at(4), 0, MAX_FUNCTION_LOCALS as u32, ValueType::F32)
            .unwrap();
        let error = builder.on_local_decl(&at(5), 1, 1, ValueType::F32).unwrap_err();
        assert_eq!(error.code, codes::APPEND_FAILED);
        assert_eq!(builder.module().funcs[0].local_types.len(), MAX_FUNCTION_LOCALS);
    }

    #[test]
    fn test_second_body_for_same_function() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        open_body(&mut builder);
        builder.on_nop_expr(&at(4)).unwrap();
        builder.end_function_body(&at(5), 0).unwrap();

        let error = builder.begin_function_body(&at(6), 0).unwrap_err();
        assert_eq!(error.code, codes::UNEXPECTED_EVENT);
        assert_eq!(error.offset, Some(6));
        assert_eq!(builder.label_depth(), 0);

        let module = builder.finish().unwrap();
        let func = &module.funcs[0];
        assert_eq!(func.exprs.len(), 1);
        assert_eq!(func.body().map(|(_, e)| e.clone()).collect::<Vec<_>>(), vec![Expr::Nop]);
    }

    #[test]
    fn test_bodies_in_index_order() {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        builder.on_type(&at(0), 0, &[], &[]).unwrap();
        builder.on_function(&at(1), 0, 0).unwrap();
        builder.on_function(&at(2), 1, 0).unwrap();
        builder.on_function_body_count(&at(3), 2).unwrap();

        let error = builder.begin_function_body(&at(4), 1).unwrap_err();
        assert_eq!(error.code, codes::UNEXPECTED_EVENT);
        builder.begin_function_body(&at(5), 0).unwrap();
    }

    #[test]
    fn test_finish_with_open_scope() {
        let mut seen = None;
        let mut record = |offset: Option<usize>, _: &str| {
            seen = Some(offset);
            false
        };
        let mut builder = BinaryReaderAst::new(&mut record);
        open_body(&mut builder);
        let error = builder.finish().unwrap_err();
        assert_eq!(error.code, codes::UNCLOSED_SCOPE);
        assert_eq!(error.offset, None);
        assert_eq!(seen, Some(None));
    }
}
