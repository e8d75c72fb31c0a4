// WBR - wbr-format
// Module: Recorded Events
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Owned decode events.
//!
//! [`Event`] mirrors every [`BinaryReader`] method as a tagged variant, and
//! [`Event::dispatch`] calls the matching method. An [`EventStream`] is an
//! ordered list of events with their byte offsets; it replays into any reader
//! and is itself an [`EventSource`]. [`EventRecorder`] captures whatever a
//! scanner emits into such a stream.

use wbr_error::{
    Error,
    Result,
};

use crate::{
    opcode::Opcode,
    reader::{
        BinaryReader,
        ReaderState,
    },
    source::{
        EventSource,
        ReadBinaryOptions,
    },
    types::{
        BinarySection,
        ExternalKind,
        Limits,
        RelocType,
        ValueType,
    },
};

/// One decode event with owned arguments
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Malformed input reported by the scanner
    Error { message: String },

    BeginModule { version: u32 },
    EndModule,
    BeginSection { section: BinarySection, size: u32 },

    BeginCustomSection { size: u32, section_name: String },
    EndCustomSection,

    BeginTypeSection { size: u32 },
    OnTypeCount { count: u32 },
    OnType { index: u32, param_types: Vec<ValueType>, result_types: Vec<ValueType> },
    EndTypeSection,

    BeginImportSection { size: u32 },
    OnImportCount { count: u32 },
    OnImport { index: u32, module_name: String, field_name: String },
    OnImportFunc {
        import_index: u32,
        module_name:  String,
        field_name:   String,
        func_index:   u32,
        sig_index:    u32,
    },
    OnImportTable {
        import_index: u32,
        module_name:  String,
        field_name:   String,
        table_index:  u32,
        elem_type:    ValueType,
        elem_limits:  Limits,
    },
    OnImportMemory {
        import_index: u32,
        module_name:  String,
        field_name:   String,
        memory_index: u32,
        page_limits:  Limits,
    },
    OnImportGlobal {
        import_index: u32,
        module_name:  String,
        field_name:   String,
        global_index: u32,
        ty:           ValueType,
        mutable:      bool,
    },
    EndImportSection,

    BeginFunctionSection { size: u32 },
    OnFunctionCount { count: u32 },
    OnFunction { index: u32, sig_index: u32 },
    EndFunctionSection,

    BeginTableSection { size: u32 },
    OnTableCount { count: u32 },
    OnTable { index: u32, elem_type: ValueType, elem_limits: Limits },
    EndTableSection,

    BeginMemorySection { size: u32 },
    OnMemoryCount { count: u32 },
    OnMemory { index: u32, page_limits: Limits },
    EndMemorySection,

    BeginGlobalSection { size: u32 },
    OnGlobalCount { count: u32 },
    BeginGlobal { index: u32, ty: ValueType, mutable: bool },
    BeginGlobalInitExpr { index: u32 },
    EndGlobalInitExpr { index: u32 },
    EndGlobal { index: u32 },
    EndGlobalSection,

    BeginExportSection { size: u32 },
    OnExportCount { count: u32 },
    OnExport { index: u32, kind: ExternalKind, item_index: u32, name: String },
    EndExportSection,

    BeginStartSection { size: u32 },
    OnStartFunction { func_index: u32 },
    EndStartSection,

    BeginCodeSection { size: u32 },
    OnFunctionBodyCount { count: u32 },
    BeginFunctionBody { index: u32 },
    OnLocalDeclCount { count: u32 },
    OnLocalDecl { decl_index: u32, count: u32, ty: ValueType },

    OnOpcode { opcode: Opcode },
    OnOpcodeBare,
    OnOpcodeU32 { value: u32 },
    OnOpcodeU32U32 { value: u32, value2: u32 },
    OnOpcodeU64 { value: u64 },
    OnOpcodeF32 { value_bits: u32 },
    OnOpcodeF64 { value_bits: u64 },
    OnOpcodeBlockSig { sig_types: Vec<ValueType> },

    OnBinaryExpr { opcode: Opcode },
    OnBlockExpr { sig_types: Vec<ValueType> },
    OnBrExpr { depth: u32 },
    OnBrIfExpr { depth: u32 },
    OnBrTableExpr { target_depths: Vec<u32>, default_target_depth: u32 },
    OnCallExpr { func_index: u32 },
    OnCallIndirectExpr { sig_index: u32 },
    OnCompareExpr { opcode: Opcode },
    OnConvertExpr { opcode: Opcode },
    OnCurrentMemoryExpr,
    OnDropExpr,
    OnElseExpr,
    OnEndExpr,
    OnEndFunc,
    OnF32ConstExpr { value_bits: u32 },
    OnF64ConstExpr { value_bits: u64 },
    OnGetGlobalExpr { global_index: u32 },
    OnGetLocalExpr { local_index: u32 },
    OnGrowMemoryExpr,
    OnI32ConstExpr { value: u32 },
    OnI64ConstExpr { value: u64 },
    OnIfExpr { sig_types: Vec<ValueType> },
    OnLoadExpr { opcode: Opcode, align_log2: u32, offset: u32 },
    OnLoopExpr { sig_types: Vec<ValueType> },
    OnNopExpr,
    OnReturnExpr,
    OnSelectExpr,
    OnSetGlobalExpr { global_index: u32 },
    OnSetLocalExpr { local_index: u32 },
    OnStoreExpr { opcode: Opcode, align_log2: u32, offset: u32 },
    OnTeeLocalExpr { local_index: u32 },
    OnUnaryExpr { opcode: Opcode },
    OnUnreachableExpr,
    EndFunctionBody { index: u32 },
    EndCodeSection,

    BeginElemSection { size: u32 },
    OnElemSegmentCount { count: u32 },
    BeginElemSegment { index: u32, table_index: u32 },
    BeginElemSegmentInitExpr { index: u32 },
    EndElemSegmentInitExpr { index: u32 },
    OnElemSegmentFunctionIndexCount { index: u32, count: u32 },
    OnElemSegmentFunctionIndex { index: u32, func_index: u32 },
    EndElemSegment { index: u32 },
    EndElemSection,

    BeginDataSection { size: u32 },
    OnDataSegmentCount { count: u32 },
    BeginDataSegment { index: u32, memory_index: u32 },
    BeginDataSegmentInitExpr { index: u32 },
    EndDataSegmentInitExpr { index: u32 },
    OnDataSegmentData { index: u32, data: Vec<u8> },
    EndDataSegment { index: u32 },
    EndDataSection,

    BeginNamesSection { size: u32 },
    OnFunctionNameSubsection { index: u32, name_type: u32, subsection_size: u32 },
    OnFunctionNamesCount { count: u32 },
    OnFunctionName { function_index: u32, name: String },
    OnLocalNameSubsection { index: u32, name_type: u32, subsection_size: u32 },
    OnLocalNameFunctionCount { count: u32 },
    OnLocalNameLocalCount { function_index: u32, count: u32 },
    OnLocalName { function_index: u32, local_index: u32, name: String },
    EndNamesSection,

    BeginRelocSection { size: u32 },
    OnRelocCount { count: u32, section: BinarySection, section_name: String },
    OnReloc { ty: RelocType, offset: u32, index: u32, addend: i32 },
    EndRelocSection,

    OnInitExprF32ConstExpr { index: u32, value_bits: u32 },
    OnInitExprF64ConstExpr { index: u32, value_bits: u64 },
    OnInitExprGetGlobalExpr { index: u32, global_index: u32 },
    OnInitExprI32ConstExpr { index: u32, value: u32 },
    OnInitExprI64ConstExpr { index: u32, value: u64 },
}

impl Event {
    /// Whether this event belongs to the `name` section
    pub fn is_debug_name(&self) -> bool {
        matches!(
            self,
            Self::BeginNamesSection { .. }
                | Self::OnFunctionNameSubsection { .. }
                | Self::OnFunctionNamesCount { .. }
                | Self::OnFunctionName { .. }
                | Self::OnLocalNameSubsection { .. }
                | Self::OnLocalNameFunctionCount { .. }
                | Self::OnLocalNameLocalCount { .. }
                | Self::OnLocalName { .. }
                | Self::EndNamesSection
        )
    }

    /// Call the matching method of `reader`.
    ///
    /// For [`Event::Error`] the reader's `on_error` decides: `true` continues,
    /// `false` turns the message into a parse error at `state.offset`.
    pub fn dispatch(&self, state: &ReaderState<'_>, reader: &mut dyn BinaryReader) -> Result<()> {
        match self {
            Self::Error { message } => {
                if reader.on_error(state, message) {
                    Ok(())
                } else {
                    Err(Error::parse_error(message.clone()).at_offset(state.offset))
                }
            }

            Self::BeginModule { version } => reader.begin_module(state, *version),
            Self::EndModule => reader.end_module(state),
            Self::BeginSection { section, size } => reader.begin_section(state, *section, *size),

            Self::BeginCustomSection { size, section_name } => {
                reader.begin_custom_section(state, *size, section_name)
            }
            Self::EndCustomSection => reader.end_custom_section(state),

            Self::BeginTypeSection { size } => reader.begin_type_section(state, *size),
            Self::OnTypeCount { count } => reader.on_type_count(state, *count),
            Self::OnType { index, param_types, result_types } => {
                reader.on_type(state, *index, param_types, result_types)
            }
            Self::EndTypeSection => reader.end_type_section(state),

            Self::BeginImportSection { size } => reader.begin_import_section(state, *size),
            Self::OnImportCount { count } => reader.on_import_count(state, *count),
            Self::OnImport { index, module_name, field_name } => {
                reader.on_import(state, *index, module_name, field_name)
            }
            Self::OnImportFunc { import_index, module_name, field_name, func_index, sig_index } => {
                reader.on_import_func(state, *import_index, module_name, field_name, *func_index, *sig_index)
            }
            Self::OnImportTable {
                import_index,
                module_name,
                field_name,
                table_index,
                elem_type,
                elem_limits,
            } => reader.on_import_table(
                state,
                *import_index,
                module_name,
                field_name,
                *table_index,
                *elem_type,
                elem_limits,
            ),
            Self::OnImportMemory { import_index, module_name, field_name, memory_index, page_limits } => {
                reader.on_import_memory(state, *import_index, module_name, field_name, *memory_index, page_limits)
            }
            Self::OnImportGlobal { import_index, module_name, field_name, global_index, ty, mutable } => reader
                .on_import_global(state, *import_index, module_name, field_name, *global_index, *ty, *mutable),
            Self::EndImportSection => reader.end_import_section(state),

            Self::BeginFunctionSection { size } => reader.begin_function_section(state, *size),
            Self::OnFunctionCount { count } => reader.on_function_count(state, *count),
            Self::OnFunction { index, sig_index } => reader.on_function(state, *index, *sig_index),
            Self::EndFunctionSection => reader.end_function_section(state),

            Self::BeginTableSection { size } => reader.begin_table_section(state, *size),
            Self::OnTableCount { count } => reader.on_table_count(state, *count),
            Self::OnTable { index, elem_type, elem_limits } => {
                reader.on_table(state, *index, *elem_type, elem_limits)
            }
            Self::EndTableSection => reader.end_table_section(state),

            Self::BeginMemorySection { size } => reader.begin_memory_section(state, *size),
            Self::OnMemoryCount { count } => reader.on_memory_count(state, *count),
            Self::OnMemory { index, page_limits } => reader.on_memory(state, *index, page_limits),
            Self::EndMemorySection => reader.end_memory_section(state),

            Self::BeginGlobalSection { size } => reader.begin_global_section(state, *size),
            Self::OnGlobalCount { count } => reader.on_global_count(state, *count),
            Self::BeginGlobal { index, ty, mutable } => reader.begin_global(state, *index, *ty, *mutable),
            Self::BeginGlobalInitExpr { index } => reader.begin_global_init_expr(state, *index),
            Self::EndGlobalInitExpr { index } => reader.end_global_init_expr(state, *index),
            Self::EndGlobal { index } => reader.end_global(state, *index),
            Self::EndGlobalSection => reader.end_global_section(state),

            Self::BeginExportSection { size } => reader.begin_export_section(state, *size),
            Self::OnExportCount { count } => reader.on_export_count(state, *count),
            Self::OnExport { index, kind, item_index, name } => {
                reader.on_export(state, *index, *kind, *item_index, name)
            }
            Self::EndExportSection => reader.end_export_section(state),

            Self::BeginStartSection { size } => reader.begin_start_section(state, *size),
            Self::OnStartFunction { func_index } => reader.on_start_function(state, *func_index),
            Self::EndStartSection => reader.end_start_section(state),

            Self::BeginCodeSection { size } => reader.begin_code_section(state, *size),
            Self::OnFunctionBodyCount { count } => reader.on_function_body_count(state, *count),
            Self::BeginFunctionBody { index } => reader.begin_function_body(state, *index),
            Self::OnLocalDeclCount { count } => reader.on_local_decl_count(state, *count),
            Self::OnLocalDecl { decl_index, count, ty } => reader.on_local_decl(state, *decl_index, *count, *ty),

            Self::OnOpcode { opcode } => reader.on_opcode(state, *opcode),
            Self::OnOpcodeBare => reader.on_opcode_bare(state),
            Self::OnOpcodeU32 { value } => reader.on_opcode_u32(state, *value),
            Self::OnOpcodeU32U32 { value, value2 } => reader.on_opcode_u32_u32(state, *value, *value2),
            Self::OnOpcodeU64 { value } => reader.on_opcode_u64(state, *value),
            Self::OnOpcodeF32 { value_bits } => reader.on_opcode_f32(state, *value_bits),
            Self::OnOpcodeF64 { value_bits } => reader.on_opcode_f64(state, *value_bits),
            Self::OnOpcodeBlockSig { sig_types } => reader.on_opcode_block_sig(state, sig_types),

            Self::OnBinaryExpr { opcode } => reader.on_binary_expr(state, *opcode),
            Self::OnBlockExpr { sig_types } => reader.on_block_expr(state, sig_types),
            Self::OnBrExpr { depth } => reader.on_br_expr(state, *depth),
            Self::OnBrIfExpr { depth } => reader.on_br_if_expr(state, *depth),
            Self::OnBrTableExpr { target_depths, default_target_depth } => {
                reader.on_br_table_expr(state, target_depths, *default_target_depth)
            }
            Self::OnCallExpr { func_index } => reader.on_call_expr(state, *func_index),
            Self::OnCallIndirectExpr { sig_index } => reader.on_call_indirect_expr(state, *sig_index),
            Self::OnCompareExpr { opcode } => reader.on_compare_expr(state, *opcode),
            Self::OnConvertExpr { opcode } => reader.on_convert_expr(state, *opcode),
            Self::OnCurrentMemoryExpr => reader.on_current_memory_expr(state),
            Self::OnDropExpr => reader.on_drop_expr(state),
            Self::OnElseExpr => reader.on_else_expr(state),
            Self::OnEndExpr => reader.on_end_expr(state),
            Self::OnEndFunc => reader.on_end_func(state),
            Self::OnF32ConstExpr { value_bits } => reader.on_f32_const_expr(state, *value_bits),
            Self::OnF64ConstExpr { value_bits } => reader.on_f64_const_expr(state, *value_bits),
            Self::OnGetGlobalExpr { global_index } => reader.on_get_global_expr(state, *global_index),
            Self::OnGetLocalExpr { local_index } => reader.on_get_local_expr(state, *local_index),
            Self::OnGrowMemoryExpr => reader.on_grow_memory_expr(state),
            Self::OnI32ConstExpr { value } => reader.on_i32_const_expr(state, *value),
            Self::OnI64ConstExpr { value } => reader.on_i64_const_expr(state, *value),
            Self::OnIfExpr { sig_types } => reader.on_if_expr(state, sig_types),
            Self::OnLoadExpr { opcode, align_log2, offset } => {
                reader.on_load_expr(state, *opcode, *align_log2, *offset)
            }
            Self::OnLoopExpr { sig_types } => reader.on_loop_expr(state, sig_types),
            Self::OnNopExpr => reader.on_nop_expr(state),
            Self::OnReturnExpr => reader.on_return_expr(state),
            Self::OnSelectExpr => reader.on_select_expr(state),
            Self::OnSetGlobalExpr { global_index } => reader.on_set_global_expr(state, *global_index),
            Self::OnSetLocalExpr { local_index } => reader.on_set_local_expr(state, *local_index),
            Self::OnStoreExpr { opcode, align_log2, offset } => {
                reader.on_store_expr(state, *opcode, *align_log2, *offset)
            }
            Self::OnTeeLocalExpr { local_index } => reader.on_tee_local_expr(state, *local_index),
            Self::OnUnaryExpr { opcode } => reader.on_unary_expr(state, *opcode),
            Self::OnUnreachableExpr => reader.on_unreachable_expr(state),
            Self::EndFunctionBody { index } => reader.end_function_body(state, *index),
            Self::EndCodeSection => reader.end_code_section(state),

            Self::BeginElemSection { size } => reader.begin_elem_section(state, *size),
            Self::OnElemSegmentCount { count } => reader.on_elem_segment_count(state, *count),
            Self::BeginElemSegment { index, table_index } => reader.begin_elem_segment(state, *index, *table_index),
            Self::BeginElemSegmentInitExpr { index } => reader.begin_elem_segment_init_expr(state, *index),
            Self::EndElemSegmentInitExpr { index } => reader.end_elem_segment_init_expr(state, *index),
            Self::OnElemSegmentFunctionIndexCount { index, count } => {
                reader.on_elem_segment_function_index_count(state, *index, *count)
            }
            Self::OnElemSegmentFunctionIndex { index, func_index } => {
                reader.on_elem_segment_function_index(state, *index, *func_index)
            }
            Self::EndElemSegment { index } => reader.end_elem_segment(state, *index),
            Self::EndElemSection => reader.end_elem_section(state),

            Self::BeginDataSection { size } => reader.begin_data_section(state, *size),
            Self::OnDataSegmentCount { count } => reader.on_data_segment_count(state, *count),
            Self::BeginDataSegment { index, memory_index } => {
                reader.begin_data_segment(state, *index, *memory_index)
            }
            Self::BeginDataSegmentInitExpr { index } => reader.begin_data_segment_init_expr(state, *index),
            Self::EndDataSegmentInitExpr { index } => reader.end_data_segment_init_expr(state, *index),
            Self::OnDataSegmentData { index, data } => reader.on_data_segment_data(state, *index, data),
            Self::EndDataSegment { index } => reader.end_data_segment(state, *index),
            Self::EndDataSection => reader.end_data_section(state),

            Self::BeginNamesSection { size } => reader.begin_names_section(state, *size),
            Self::OnFunctionNameSubsection { index, name_type, subsection_size } => {
                reader.on_function_name_subsection(state, *index, *name_type, *subsection_size)
            }
            Self::OnFunctionNamesCount { count } => reader.on_function_names_count(state, *count),
            Self::OnFunctionName { function_index, name } => reader.on_function_name(state, *function_index, name),
            Self::OnLocalNameSubsection { index, name_type, subsection_size } => {
                reader.on_local_name_subsection(state, *index, *name_type, *subsection_size)
            }
            Self::OnLocalNameFunctionCount { count } => reader.on_local_name_function_count(state, *count),
            Self::OnLocalNameLocalCount { function_index, count } => {
                reader.on_local_name_local_count(state, *function_index, *count)
            }
            Self::OnLocalName { function_index, local_index, name } => {
                reader.on_local_name(state, *function_index, *local_index, name)
            }
            Self::EndNamesSection => reader.end_names_section(state),

            Self::BeginRelocSection { size } => reader.begin_reloc_section(state, *size),
            Self::OnRelocCount { count, section, section_name } => {
                reader.on_reloc_count(state, *count, *section, section_name)
            }
            Self::OnReloc { ty, offset, index, addend } => reader.on_reloc(state, *ty, *offset, *index, *addend),
            Self::EndRelocSection => reader.end_reloc_section(state),

            Self::OnInitExprF32ConstExpr { index, value_bits } => {
                reader.on_init_expr_f32_const_expr(state, *index, *value_bits)
            }
            Self::OnInitExprF64ConstExpr { index, value_bits } => {
                reader.on_init_expr_f64_const_expr(state, *index, *value_bits)
            }
            Self::OnInitExprGetGlobalExpr { index, global_index } => {
                reader.on_init_expr_get_global_expr(state, *index, *global_index)
            }
            Self::OnInitExprI32ConstExpr { index, value } => reader.on_init_expr_i32_const_expr(state, *index, *value),
            Self::OnInitExprI64ConstExpr { index, value } => reader.on_init_expr_i64_const_expr(state, *index, *value),
        }
    }
}

/// An ordered list of events, each with the byte offset it was reported at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    events: Vec<(usize, Event)>,
}

impl EventStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; its offset is its position in the stream
    pub fn push(&mut self, event: Event) -> &mut Self {
        let offset = self.events.len();
        self.events.push((offset, event));
        self
    }

    /// Append an event reported at `offset`
    pub fn push_at(&mut self, offset: usize, event: Event) -> &mut Self {
        self.events.push((offset, event));
        self
    }

    /// The recorded `(offset, event)` pairs
    pub fn events(&self) -> &[(usize, Event)] {
        &self.events
    }

    /// Iterate over the events without their offsets
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, event)| event)
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the stream holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Feed every event to `reader` against `data`, stopping at the first
    /// error. `name` section events are skipped unless `read_debug_names`.
    pub fn replay(&self, data: &[u8], reader: &mut dyn BinaryReader, read_debug_names: bool) -> Result<()> {
        for (offset, event) in &self.events {
            if !read_debug_names && event.is_debug_name() {
                continue;
            }
            let state = ReaderState::new(data, *offset);
            if let Err(error) = event.dispatch(&state, reader) {
                log::debug!("replay stopped at 0x{offset:x}: {error}");
                return Err(error);
            }
        }
        Ok(())
    }
}

impl FromIterator<Event> for EventStream {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut stream = Self::new();
        stream.extend(iter);
        stream
    }
}

impl Extend<Event> for EventStream {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}

impl EventSource for EventStream {
    fn read(&self, data: &[u8], reader: &mut dyn BinaryReader, options: &ReadBinaryOptions) -> Result<()> {
        self.replay(data, reader, options.read_debug_names)
    }
}

/// A reader that records every event it receives
#[derive(Debug, Default)]
pub struct EventRecorder {
    stream:            EventStream,
    continue_on_error: bool,
}

impl EventRecorder {
    /// Create a recorder that stops at the first scanner error
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that asks the scanner to keep going after errors
    pub fn continuing_on_error() -> Self {
        Self {
            stream:            EventStream::new(),
            continue_on_error: true,
        }
    }

    /// The events recorded so far
    pub fn stream(&self) -> &EventStream {
        &self.stream
    }

    /// Consume the recorder, returning the recorded stream
    pub fn into_stream(self) -> EventStream {
        self.stream
    }

    fn record(&mut self, state: &ReaderState<'_>, event: Event) -> Result<()> {
        self.stream.push_at(state.offset, event);
        Ok(())
    }
}

impl BinaryReader for EventRecorder {
    fn on_error(&mut self, state: &ReaderState<'_>, message: &str) -> bool {
        self.stream.push_at(state.offset, Event::Error { message: message.to_string() });
        self.continue_on_error
    }

    fn begin_module(&mut self, state: &ReaderState<'_>, version: u32) -> Result<()> {
        self.record(state, Event::BeginModule { version })
    }

    fn end_module(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndModule)
    }

    fn begin_section(&mut self, state: &ReaderState<'_>, section: BinarySection, size: u32) -> Result<()> {
        self.record(state, Event::BeginSection { section, size })
    }

    fn begin_custom_section(&mut self, state: &ReaderState<'_>, size: u32, section_name: &str) -> Result<()> {
        self.record(
            state,
            Event::BeginCustomSection {
                size,
                section_name: section_name.to_string(),
            },
        )
    }

    fn end_custom_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndCustomSection)
    }

    fn begin_type_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginTypeSection { size })
    }

    fn on_type_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnTypeCount { count })
    }

    fn on_type(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        param_types: &[ValueType],
        result_types: &[ValueType],
    ) -> Result<()> {
        self.record(
            state,
            Event::OnType {
                index,
                param_types: param_types.to_vec(),
                result_types: result_types.to_vec(),
            },
        )
    }

    fn end_type_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndTypeSection)
    }

    fn begin_import_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginImportSection { size })
    }

    fn on_import_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnImportCount { count })
    }

    fn on_import(&mut self, state: &ReaderState<'_>, index: u32, module_name: &str, field_name: &str) -> Result<()> {
        self.record(
            state,
            Event::OnImport {
                index,
                module_name: module_name.to_string(),
                field_name: field_name.to_string(),
            },
        )
    }

    fn on_import_func(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        module_name: &str,
        field_name: &str,
        func_index: u32,
        sig_index: u32,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnImportFunc {
                import_index,
                module_name: module_name.to_string(),
                field_name: field_name.to_string(),
                func_index,
                sig_index,
            },
        )
    }

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
        self.record(
            state,
            Event::OnImportTable {
                import_index,
                module_name: module_name.to_string(),
                field_name: field_name.to_string(),
                table_index,
                elem_type,
                elem_limits: *elem_limits,
            },
        )
    }

    fn on_import_memory(
        &mut self,
        state: &ReaderState<'_>,
        import_index: u32,
        module_name: &str,
        field_name: &str,
        memory_index: u32,
        page_limits: &Limits,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnImportMemory {
                import_index,
                module_name: module_name.to_string(),
                field_name: field_name.to_string(),
                memory_index,
                page_limits: *page_limits,
            },
        )
    }

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
        self.record(
            state,
            Event::OnImportGlobal {
                import_index,
                module_name: module_name.to_string(),
                field_name: field_name.to_string(),
                global_index,
                ty,
                mutable,
            },
        )
    }

    fn end_import_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndImportSection)
    }

    fn begin_function_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginFunctionSection { size })
    }

    fn on_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnFunctionCount { count })
    }

    fn on_function(&mut self, state: &ReaderState<'_>, index: u32, sig_index: u32) -> Result<()> {
        self.record(state, Event::OnFunction { index, sig_index })
    }

    fn end_function_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndFunctionSection)
    }

    fn begin_table_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginTableSection { size })
    }

    fn on_table_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnTableCount { count })
    }

    fn on_table(&mut self, state: &ReaderState<'_>, index: u32, elem_type: ValueType, elem_limits: &Limits) -> Result<()> {
        self.record(
            state,
            Event::OnTable {
                index,
                elem_type,
                elem_limits: *elem_limits,
            },
        )
    }

    fn end_table_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndTableSection)
    }

    fn begin_memory_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginMemorySection { size })
    }

    fn on_memory_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnMemoryCount { count })
    }

    fn on_memory(&mut self, state: &ReaderState<'_>, index: u32, page_limits: &Limits) -> Result<()> {
        self.record(
            state,
            Event::OnMemory {
                index,
                page_limits: *page_limits,
            },
        )
    }

    fn end_memory_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndMemorySection)
    }

    fn begin_global_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginGlobalSection { size })
    }

    fn on_global_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnGlobalCount { count })
    }

    fn begin_global(&mut self, state: &ReaderState<'_>, index: u32, ty: ValueType, mutable: bool) -> Result<()> {
        self.record(state, Event::BeginGlobal { index, ty, mutable })
    }

    fn begin_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::BeginGlobalInitExpr { index })
    }

    fn end_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndGlobalInitExpr { index })
    }

    fn end_global(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndGlobal { index })
    }

    fn end_global_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndGlobalSection)
    }

    fn begin_export_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginExportSection { size })
    }

    fn on_export_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnExportCount { count })
    }

    fn on_export(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        kind: ExternalKind,
        item_index: u32,
        name: &str,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnExport {
                index,
                kind,
                item_index,
                name: name.to_string(),
            },
        )
    }

    fn end_export_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndExportSection)
    }

    fn begin_start_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginStartSection { size })
    }

    fn on_start_function(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        self.record(state, Event::OnStartFunction { func_index })
    }

    fn end_start_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndStartSection)
    }

    fn begin_code_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginCodeSection { size })
    }

    fn on_function_body_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnFunctionBodyCount { count })
    }

    fn begin_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::BeginFunctionBody { index })
    }

    fn on_local_decl_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnLocalDeclCount { count })
    }

    fn on_local_decl(&mut self, state: &ReaderState<'_>, decl_index: u32, count: u32, ty: ValueType) -> Result<()> {
        self.record(state, Event::OnLocalDecl { decl_index, count, ty })
    }

    fn on_opcode(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.record(state, Event::OnOpcode { opcode })
    }

    fn on_opcode_bare(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnOpcodeBare)
    }

    fn on_opcode_u32(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        self.record(state, Event::OnOpcodeU32 { value })
    }

    fn on_opcode_u32_u32(&mut self, state: &ReaderState<'_>, value: u32, value2: u32) -> Result<()> {
        self.record(state, Event::OnOpcodeU32U32 { value, value2 })
    }

    fn on_opcode_u64(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        self.record(state, Event::OnOpcodeU64 { value })
    }

    fn on_opcode_f32(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        self.record(state, Event::OnOpcodeF32 { value_bits })
    }

    fn on_opcode_f64(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        self.record(state, Event::OnOpcodeF64 { value_bits })
    }

    fn on_opcode_block_sig(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.record(
            state,
            Event::OnOpcodeBlockSig {
                sig_types: sig_types.to_vec(),
            },
        )
    }

    fn on_binary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.record(state, Event::OnBinaryExpr { opcode })
    }

    fn on_block_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.record(
            state,
            Event::OnBlockExpr {
                sig_types: sig_types.to_vec(),
            },
        )
    }

    fn on_br_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        self.record(state, Event::OnBrExpr { depth })
    }

    fn on_br_if_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        self.record(state, Event::OnBrIfExpr { depth })
    }

    fn on_br_table_expr(
        &mut self,
        state: &ReaderState<'_>,
        target_depths: &[u32],
        default_target_depth: u32,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnBrTableExpr {
                target_depths: target_depths.to_vec(),
                default_target_depth,
            },
        )
    }

    fn on_call_expr(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        self.record(state, Event::OnCallExpr { func_index })
    }

    fn on_call_indirect_expr(&mut self, state: &ReaderState<'_>, sig_index: u32) -> Result<()> {
        self.record(state, Event::OnCallIndirectExpr { sig_index })
    }

    fn on_compare_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.record(state, Event::OnCompareExpr { opcode })
    }

    fn on_convert_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.record(state, Event::OnConvertExpr { opcode })
    }

    fn on_current_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnCurrentMemoryExpr)
    }

    fn on_drop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnDropExpr)
    }

    fn on_else_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnElseExpr)
    }

    fn on_end_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnEndExpr)
    }

    fn on_end_func(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnEndFunc)
    }

    fn on_f32_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        self.record(state, Event::OnF32ConstExpr { value_bits })
    }

    fn on_f64_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        self.record(state, Event::OnF64ConstExpr { value_bits })
    }

    fn on_get_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        self.record(state, Event::OnGetGlobalExpr { global_index })
    }

    fn on_get_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.record(state, Event::OnGetLocalExpr { local_index })
    }

    fn on_grow_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnGrowMemoryExpr)
    }

    fn on_i32_const_expr(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        self.record(state, Event::OnI32ConstExpr { value })
    }

    fn on_i64_const_expr(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        self.record(state, Event::OnI64ConstExpr { value })
    }

    fn on_if_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.record(
            state,
            Event::OnIfExpr {
                sig_types: sig_types.to_vec(),
            },
        )
    }

    fn on_load_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.record(state, Event::OnLoadExpr { opcode, align_log2, offset })
    }

    fn on_loop_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.record(
            state,
            Event::OnLoopExpr {
                sig_types: sig_types.to_vec(),
            },
        )
    }

    fn on_nop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnNopExpr)
    }

    fn on_return_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnReturnExpr)
    }

    fn on_select_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnSelectExpr)
    }

    fn on_set_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        self.record(state, Event::OnSetGlobalExpr { global_index })
    }

    fn on_set_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.record(state, Event::OnSetLocalExpr { local_index })
    }

    fn on_store_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.record(state, Event::OnStoreExpr { opcode, align_log2, offset })
    }

    fn on_tee_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.record(state, Event::OnTeeLocalExpr { local_index })
    }

    fn on_unary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.record(state, Event::OnUnaryExpr { opcode })
    }

    fn on_unreachable_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::OnUnreachableExpr)
    }

    fn end_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndFunctionBody { index })
    }

    fn end_code_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndCodeSection)
    }

    fn begin_elem_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginElemSection { size })
    }

    fn on_elem_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnElemSegmentCount { count })
    }

    fn begin_elem_segment(&mut self, state: &ReaderState<'_>, index: u32, table_index: u32) -> Result<()> {
        self.record(state, Event::BeginElemSegment { index, table_index })
    }

    fn begin_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::BeginElemSegmentInitExpr { index })
    }

    fn end_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndElemSegmentInitExpr { index })
    }

    fn on_elem_segment_function_index_count(&mut self, state: &ReaderState<'_>, index: u32, count: u32) -> Result<()> {
        self.record(state, Event::OnElemSegmentFunctionIndexCount { index, count })
    }

    fn on_elem_segment_function_index(&mut self, state: &ReaderState<'_>, index: u32, func_index: u32) -> Result<()> {
        self.record(state, Event::OnElemSegmentFunctionIndex { index, func_index })
    }

    fn end_elem_segment(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndElemSegment { index })
    }

    fn end_elem_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndElemSection)
    }

    fn begin_data_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginDataSection { size })
    }

    fn on_data_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnDataSegmentCount { count })
    }

    fn begin_data_segment(&mut self, state: &ReaderState<'_>, index: u32, memory_index: u32) -> Result<()> {
        self.record(state, Event::BeginDataSegment { index, memory_index })
    }

    fn begin_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::BeginDataSegmentInitExpr { index })
    }

    fn end_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndDataSegmentInitExpr { index })
    }

    fn on_data_segment_data(&mut self, state: &ReaderState<'_>, index: u32, data: &[u8]) -> Result<()> {
        self.record(
            state,
            Event::OnDataSegmentData {
                index,
                data: data.to_vec(),
            },
        )
    }

    fn end_data_segment(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.record(state, Event::EndDataSegment { index })
    }

    fn end_data_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndDataSection)
    }

    fn begin_names_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginNamesSection { size })
    }

    fn on_function_name_subsection(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        name_type: u32,
        subsection_size: u32,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnFunctionNameSubsection {
                index,
                name_type,
                subsection_size,
            },
        )
    }

    fn on_function_names_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnFunctionNamesCount { count })
    }

    fn on_function_name(&mut self, state: &ReaderState<'_>, function_index: u32, name: &str) -> Result<()> {
        self.record(
            state,
            Event::OnFunctionName {
                function_index,
                name: name.to_string(),
            },
        )
    }

    fn on_local_name_subsection(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        name_type: u32,
        subsection_size: u32,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnLocalNameSubsection {
                index,
                name_type,
                subsection_size,
            },
        )
    }

    fn on_local_name_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.record(state, Event::OnLocalNameFunctionCount { count })
    }

    fn on_local_name_local_count(&mut self, state: &ReaderState<'_>, function_index: u32, count: u32) -> Result<()> {
        self.record(state, Event::OnLocalNameLocalCount { function_index, count })
    }

    fn on_local_name(
        &mut self,
        state: &ReaderState<'_>,
        function_index: u32,
        local_index: u32,
        name: &str,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnLocalName {
                function_index,
                local_index,
                name: name.to_string(),
            },
        )
    }

    fn end_names_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndNamesSection)
    }

    fn begin_reloc_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.record(state, Event::BeginRelocSection { size })
    }

    fn on_reloc_count(
        &mut self,
        state: &ReaderState<'_>,
        count: u32,
        section: BinarySection,
        section_name: &str,
    ) -> Result<()> {
        self.record(
            state,
            Event::OnRelocCount {
                count,
                section,
                section_name: section_name.to_string(),
            },
        )
    }

    fn on_reloc(&mut self, state: &ReaderState<'_>, ty: RelocType, offset: u32, index: u32, addend: i32) -> Result<()> {
        self.record(state, Event::OnReloc { ty, offset, index, addend })
    }

    fn end_reloc_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.record(state, Event::EndRelocSection)
    }

    fn on_init_expr_f32_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value_bits: u32) -> Result<()> {
        self.record(state, Event::OnInitExprF32ConstExpr { index, value_bits })
    }

    fn on_init_expr_f64_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value_bits: u64) -> Result<()> {
        self.record(state, Event::OnInitExprF64ConstExpr { index, value_bits })
    }

    fn on_init_expr_get_global_expr(&mut self, state: &ReaderState<'_>, index: u32, global_index: u32) -> Result<()> {
        self.record(state, Event::OnInitExprGetGlobalExpr { index, global_index })
    }

    fn on_init_expr_i32_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value: u32) -> Result<()> {
        self.record(state, Event::OnInitExprI32ConstExpr { index, value })
    }

    fn on_init_expr_i64_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value: u64) -> Result<()> {
        self.record(state, Event::OnInitExprI64ConstExpr { index, value })
    }
}
