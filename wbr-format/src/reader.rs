// WBR - wbr-format
// Module: Decode Event Protocol
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The decode event protocol.
//!
//! A scanner walking a binary module calls one [`BinaryReader`] method per
//! event, in encoding order. Every method has a default body, so a consumer
//! only overrides the events it cares about. [`NopReader`] takes every
//! default.
//!
//! Two families of events exist. Structural events come in Begin/End pairs
//! per section and per item group and carry the declared index or count.
//! Instruction events arrive once per opcode inside a function body or an
//! init expression and carry only the operands encoded for that opcode.
//!
//! Any handler may return `Err` to abort the walk.

use wbr_error::Result;

use crate::{
    opcode::Opcode,
    types::{
        BinarySection,
        ExternalKind,
        Limits,
        RelocType,
        ValueType,
    },
};

/// Scanner position handed to every event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderState<'a> {
    /// The whole input buffer
    pub data:   &'a [u8],
    /// Offset of the event being reported
    pub offset: usize,
}

impl<'a> ReaderState<'a> {
    /// Create a state at `offset` within `data`
    pub const fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// Size of the input buffer
    pub const fn size(&self) -> usize {
        self.data.len()
    }
}

/// Consumer of decode events
#[allow(unused_variables)]
pub trait BinaryReader {
    /// The scanner hit malformed input. Return `true` to keep walking.
    fn on_error(&mut self, state: &ReaderState<'_>, message: &str) -> bool {
        false
    }

    // Module

    /// Start of the module, after the preamble
    fn begin_module(&mut self, state: &ReaderState<'_>, version: u32) -> Result<()> {
        Ok(())
    }
    /// End of the module
    fn end_module(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// Generic section header, emitted before the section's own Begin event
    fn begin_section(
        &mut self,
        state: &ReaderState<'_>,
        section: BinarySection,
        size: u32,
    ) -> Result<()> {
        Ok(())
    }

    // Custom section

    /// Start of a custom section
    fn begin_custom_section(
        &mut self,
        state: &ReaderState<'_>,
        size: u32,
        section_name: &str,
    ) -> Result<()> {
        Ok(())
    }
    /// End of a custom section
    fn end_custom_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Type section

    /// Start of the type section
    fn begin_type_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of function types
    fn on_type_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// One function type
    fn on_type(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        param_types: &[ValueType],
        result_types: &[ValueType],
    ) -> Result<()> {
        Ok(())
    }
    /// End of the type section
    fn end_type_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Import section

    /// Start of the import section
    fn begin_import_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of imports
    fn on_import_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// An import's names, before its kind-specific detail
    fn on_import(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        module_name: &str,
        field_name: &str,
    ) -> Result<()> {
        Ok(())
    }
    /// The imported entity is a function
    fn on_import_func(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        module_name: &str,
        field_name: &str,
        func_index: u32,
        sig_index: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// The imported entity is a table
    fn on_import_table(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        module_name: &str,
        field_name: &str,
        table_index: u32,
        elem_type: ValueType,
        elem_limits: &Limits,
    ) -> Result<()> {
        Ok(())
    }
    /// The imported entity is a memory
    fn on_import_memory(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        module_name: &str,
        field_name: &str,
        memory_index: u32,
        page_limits: &Limits,
    ) -> Result<()> {
        Ok(())
    }
    /// The imported entity is a global
    fn on_import_global(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        module_name: &str,
        field_name: &str,
        global_index: u32,
        ty: ValueType,
        mutable: bool,
    ) -> Result<()> {
        Ok(())
    }
    /// End of the import section
    fn end_import_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Function section

    /// Start of the function section
    fn begin_function_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of defined functions
    fn on_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// One function declaration and its signature index
    fn on_function(&mut self, state: &ReaderState<'_>, index: u32, sig_index: u32) -> Result<()> {
        Ok(())
    }
    /// End of the function section
    fn end_function_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Table section

    /// Start of the table section
    fn begin_table_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of defined tables
    fn on_table_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// One table
    fn on_table(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        elem_type: ValueType,
        elem_limits: &Limits,
    ) -> Result<()> {
        Ok(())
    }
    /// End of the table section
    fn end_table_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Memory section

    /// Start of the memory section
    fn begin_memory_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of defined memories
    fn on_memory_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// One memory
    fn on_memory(&mut self, state: &ReaderState<'_>, index: u32, page_limits: &Limits) -> Result<()> {
        Ok(())
    }
    /// End of the memory section
    fn end_memory_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Global section

    /// Start of the global section
    fn begin_global_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of defined globals
    fn on_global_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// Start of one global
    fn begin_global(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        ty: ValueType,
        mutable: bool,
    ) -> Result<()> {
        Ok(())
    }
    /// Start of a global's init expression
    fn begin_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of a global's init expression
    fn end_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of one global
    fn end_global(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of the global section
    fn end_global_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Export section

    /// Start of the export section
    fn begin_export_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of exports
    fn on_export_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// One export
    fn on_export(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        kind: ExternalKind,
        item_index: u32,
        name: &str,
    ) -> Result<()> {
        Ok(())
    }
    /// End of the export section
    fn end_export_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Start section

    /// Start of the start section
    fn begin_start_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// The start function index
    fn on_start_function(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        Ok(())
    }
    /// End of the start section
    fn end_start_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Code section

    /// Start of the code section
    fn begin_code_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of function bodies
    fn on_function_body_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// Start of one function body; `index` counts imported functions too
    fn begin_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// Number of local declaration groups
    fn on_local_decl_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// `count` locals of type `ty`
    fn on_local_decl(
        &mut self,
        state: &ReaderState<'_>,
        decl_index: u32,
        count: u32,
        ty: ValueType,
    ) -> Result<()> {
        Ok(())
    }

    // Generic instruction events, emitted before the specific instruction event

    /// Any opcode
    fn on_opcode(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        Ok(())
    }
    /// Opcode without immediates
    fn on_opcode_bare(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// Opcode with one u32 immediate
    fn on_opcode_u32(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        Ok(())
    }
    /// Opcode with two u32 immediates
    fn on_opcode_u32_u32(&mut self, state: &ReaderState<'_>, value: u32, value2: u32) -> Result<()> {
        Ok(())
    }
    /// Opcode with one u64 immediate
    fn on_opcode_u64(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        Ok(())
    }
    /// Opcode with an f32 immediate, as raw bits
    fn on_opcode_f32(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        Ok(())
    }
    /// Opcode with an f64 immediate, as raw bits
    fn on_opcode_f64(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        Ok(())
    }
    /// Opcode with a block signature
    fn on_opcode_block_sig(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        Ok(())
    }

    // Instructions

    /// Binary operator
    fn on_binary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        Ok(())
    }
    /// `block`
    fn on_block_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        Ok(())
    }
    /// `br`
    fn on_br_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        Ok(())
    }
    /// `br_if`
    fn on_br_if_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        Ok(())
    }
    /// `br_table`
    fn on_br_table_expr(
        &mut self,
        state: &ReaderState<'_>,
        target_depths: &[u32],
        default_target_depth: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// `call`
    fn on_call_expr(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        Ok(())
    }
    /// `call_indirect`
    fn on_call_indirect_expr(&mut self, state: &ReaderState<'_>, sig_index: u32) -> Result<()> {
        Ok(())
    }
    /// Comparison operator
    fn on_compare_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        Ok(())
    }
    /// Conversion operator
    fn on_convert_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        Ok(())
    }
    /// `current_memory`
    fn on_current_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `drop`
    fn on_drop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `else`
    fn on_else_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `end` closing a block, loop or if
    fn on_end_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `end` closing the function body
    fn on_end_func(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `f32.const`, as raw bits
    fn on_f32_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        Ok(())
    }
    /// `f64.const`, as raw bits
    fn on_f64_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        Ok(())
    }
    /// `get_global`
    fn on_get_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        Ok(())
    }
    /// `get_local`
    fn on_get_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        Ok(())
    }
    /// `grow_memory`
    fn on_grow_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `i32.const`
    fn on_i32_const_expr(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        Ok(())
    }
    /// `i64.const`
    fn on_i64_const_expr(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        Ok(())
    }
    /// `if`
    fn on_if_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        Ok(())
    }
    /// Memory load
    fn on_load_expr(
        &mut self,
        state: &ReaderState<'_>,
        opcode: Opcode,
        align_log2: u32,
        offset: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// `loop`
    fn on_loop_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        Ok(())
    }
    /// `nop`
    fn on_nop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `return`
    fn on_return_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `select`
    fn on_select_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// `set_global`
    fn on_set_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        Ok(())
    }
    /// `set_local`
    fn on_set_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        Ok(())
    }
    /// Memory store
    fn on_store_expr(
        &mut self,
        state: &ReaderState<'_>,
        opcode: Opcode,
        align_log2: u32,
        offset: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// `tee_local`
    fn on_tee_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        Ok(())
    }
    /// Unary operator
    fn on_unary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        Ok(())
    }
    /// `unreachable`
    fn on_unreachable_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }
    /// End of one function body
    fn end_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of the code section
    fn end_code_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Elem section

    /// Start of the element section
    fn begin_elem_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of element segments
    fn on_elem_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// Start of one element segment
    fn begin_elem_segment(&mut self, state: &ReaderState<'_>, index: u32, table_index: u32) -> Result<()> {
        Ok(())
    }
    /// Start of an element segment's offset expression
    fn begin_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of an element segment's offset expression
    fn end_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// Number of function indices in a segment
    fn on_elem_segment_function_index_count(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        count: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// One function index of a segment
    fn on_elem_segment_function_index(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        func_index: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// End of one element segment
    fn end_elem_segment(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of the element section
    fn end_elem_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Data section

    /// Start of the data section
    fn begin_data_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of data segments
    fn on_data_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// Start of one data segment
    fn begin_data_segment(&mut self, state: &ReaderState<'_>, index: u32, memory_index: u32) -> Result<()> {
        Ok(())
    }
    /// Start of a data segment's offset expression
    fn begin_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of a data segment's offset expression
    fn end_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// Payload of a data segment
    fn on_data_segment_data(&mut self, state: &ReaderState<'_>, index: u32, data: &[u8]) -> Result<()> {
        Ok(())
    }
    /// End of one data segment
    fn end_data_segment(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        Ok(())
    }
    /// End of the data section
    fn end_data_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Names section

    /// Start of the `name` custom section
    fn begin_names_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Header of the function-name subsection
    fn on_function_name_subsection(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        name_type: u32,
        subsection_size: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// Number of function names
    fn on_function_names_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// One function name
    fn on_function_name(&mut self, state: &ReaderState<'_>, function_index: u32, name: &str) -> Result<()> {
        Ok(())
    }
    /// Header of the local-name subsection
    fn on_local_name_subsection(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        name_type: u32,
        subsection_size: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// Number of functions with local names
    fn on_local_name_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        Ok(())
    }
    /// Number of local names for one function
    fn on_local_name_local_count(
        &mut self,
        state: &ReaderState<'_>,
        function_index: u32,
        count: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// One local name; `local_index` counts parameters first
    fn on_local_name(
        &mut self,
        state: &ReaderState<'_>,
        function_index: u32,
        local_index: u32,
        name: &str,
    ) -> Result<()> {
        Ok(())
    }
    /// End of the `name` custom section
    fn end_names_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Reloc section

    /// Start of a `reloc.*` custom section
    fn begin_reloc_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        Ok(())
    }
    /// Number of relocations and the section they apply to
    fn on_reloc_count(
        &mut self,
        state: &ReaderState<'_>,
        count: u32,
        section: BinarySection,
        section_name: &str,
    ) -> Result<()> {
        Ok(())
    }
    /// One relocation entry
    fn on_reloc(
        &mut self,
        state: &ReaderState<'_>,
        ty: RelocType,
        offset: u32,
        index: u32,
        addend: i32,
    ) -> Result<()> {
        Ok(())
    }
    /// End of a `reloc.*` custom section
    fn end_reloc_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        Ok(())
    }

    // Init expressions, only between Begin*InitExpr and End*InitExpr

    /// `f32.const` in an init expression
    fn on_init_expr_f32_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value_bits: u32) -> Result<()> {
        Ok(())
    }
    /// `f64.const` in an init expression
    fn on_init_expr_f64_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value_bits: u64) -> Result<()> {
        Ok(())
    }
    /// `get_global` in an init expression
    fn on_init_expr_get_global_expr(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        global_index: u32,
    ) -> Result<()> {
        Ok(())
    }
    /// `i32.const` in an init expression
    fn on_init_expr_i32_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value: u32) -> Result<()> {
        Ok(())
    }
    /// `i64.const` in an init expression
    fn on_init_expr_i64_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value: u64) -> Result<()> {
        Ok(())
    }
}

/// A reader that accepts every event and does nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NopReader;

impl BinaryReader for NopReader {}
