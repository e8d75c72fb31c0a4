//! Logging strategy for decode events
//!
//! [`LoggingReader`] wraps another reader, writes one indented line per event
//! to a [`LogSink`] and forwards the event unchanged. Module and section
//! Begin events log, then indent; the matching End events dedent, then log.

use std::{
    fmt,
    sync::{
        Arc,
        Mutex,
        PoisonError,
    },
};

use wbr_error::Result;
use wbr_format::{
    BinaryReader,
    BinarySection,
    ExternalKind,
    Limits,
    LogSink,
    Opcode,
    ReaderState,
    RelocType,
    ValueType,
};

/// Configuration for the logging reader
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Spaces added per nesting level
    pub indent_size: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { indent_size: 2 }
    }
}

/// A sink that keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// All lines joined, each terminated by a newline
    pub fn contents(&self) -> String {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();
        for line in lines.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl LogSink for MemorySink {
    fn write_log(&self, entry: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.to_string());
    }
}

/// A sink that forwards every line to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn write_log(&self, entry: &str) {
        log::debug!(target: "wbr::trace", "{}", entry);
    }
}

/// Formats a type list as `[i32, i64]`
struct TypeList<'t>(&'t [ValueType]);

impl fmt::Display for TypeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("]")
    }
}

/// A reader that traces events before forwarding them
pub struct LoggingReader<'a> {
    /// Reader receiving every event
    reader: &'a mut dyn BinaryReader,
    /// Log sink to write lines to
    sink:   Arc<dyn LogSink>,
    /// Configuration
    config: LoggingConfig,
    indent: usize,
}

impl<'a> LoggingReader<'a> {
    /// Create a logging reader with the default configuration
    pub fn new(sink: Arc<dyn LogSink>, reader: &'a mut dyn BinaryReader) -> Self {
        Self {
            reader,
            sink,
            config: LoggingConfig::default(),
            indent: 0,
        }
    }

    /// Configure the logging reader
    pub fn with_config(mut self, config: LoggingConfig) -> Self {
        self.config = config;
        self
    }

    /// Current indentation, in spaces
    pub fn indent(&self) -> usize {
        self.indent
    }

    fn write(&self, args: fmt::Arguments<'_>) {
        let line = format!("{:indent$}{}", "", args, indent = self.indent);
        self.sink.write_log(&line);
    }

    fn indent_more(&mut self) {
        self.indent += self.config.indent_size;
    }

    fn dedent(&mut self) {
        assert!(
            self.indent >= self.config.indent_size,
            "trace indentation would become negative"
        );
        self.indent -= self.config.indent_size;
    }

    fn begin(&mut self, name: &str, size: u32) {
        self.write(format_args!("{name}({size})"));
        self.indent_more();
    }

    fn end(&mut self, name: &str) {
        self.dedent();
        self.write(format_args!("{name}"));
    }

    fn opcode(&self, name: &str, opcode: Opcode) {
        self.write(format_args!("{name}(\"{}\" ({}))", opcode.name(), opcode.code()));
    }
}

impl BinaryReader for LoggingReader<'_> {
    fn on_error(&mut self, state: &ReaderState<'_>, message: &str) -> bool {
        self.reader.on_error(state, message)
    }

    fn begin_module(&mut self, state: &ReaderState<'_>, version: u32) -> Result<()> {
        self.write(format_args!("BeginModule(version: {version})"));
        self.indent_more();
        self.reader.begin_module(state, version)
    }

    fn end_module(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndModule");
        self.reader.end_module(state)
    }

    fn begin_section(&mut self, state: &ReaderState<'_>, section: BinarySection, size: u32) -> Result<()> {
        self.reader.begin_section(state, section, size)
    }

    fn begin_custom_section(&mut self, state: &ReaderState<'_>, size: u32, section_name: &str) -> Result<()> {
        self.write(format_args!("BeginCustomSection('{section_name}', size: {size})"));
        self.indent_more();
        self.reader.begin_custom_section(state, size, section_name)
    }

    fn end_custom_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndCustomSection");
        self.reader.end_custom_section(state)
    }

    fn begin_type_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginTypeSection", size);
        self.reader.begin_type_section(state, size)
    }

    fn on_type_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnTypeCount({count})"));
        self.reader.on_type_count(state, count)
    }

    fn on_type(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        param_types: &[ValueType],
        result_types: &[ValueType],
    ) -> Result<()> {
        self.write(format_args!(
            "OnType(index: {index}, params: {}, results: {})",
            TypeList(param_types),
            TypeList(result_types)
        ));
        self.reader.on_type(state, index, param_types, result_types)
    }

    fn end_type_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndTypeSection");
        self.reader.end_type_section(state)
    }

    fn begin_import_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginImportSection", size);
        self.reader.begin_import_section(state, size)
    }

    fn on_import_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnImportCount({count})"));
        self.reader.on_import_count(state, count)
    }

    fn on_import(&mut self, state: &ReaderState<'_>, index: u32, module_name: &str, field_name: &str) -> Result<()> {
        self.write(format_args!(
            "OnImport(index: {index}, module: \"{module_name}\", field: \"{field_name}\")"
        ));
        self.reader.on_import(state, index, module_name, field_name)
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
        self.write(format_args!(
            "OnImportFunc(import_index: {import_index}, func_index: {func_index}, sig_index: {sig_index})"
        ));
        self.reader
            .on_import_func(state, import_index, module_name, field_name, func_index, sig_index)
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
        self.write(format_args!(
            "OnImportTable(import_index: {import_index}, table_index: {table_index}, elem_type: {elem_type}, {elem_limits})"
        ));
        self.reader.on_import_table(
            state,
            import_index,
            module_name,
            field_name,
            table_index,
            elem_type,
            elem_limits,
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
        self.write(format_args!(
            "OnImportMemory(import_index: {import_index}, memory_index: {memory_index}, {page_limits})"
        ));
        self.reader
            .on_import_memory(state, import_index, module_name, field_name, memory_index, page_limits)
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
        self.write(format_args!(
            "OnImportGlobal(import_index: {import_index}, global_index: {global_index}, type: {ty}, mutable: {mutable})"
        ));
        self.reader
            .on_import_global(state, import_index, module_name, field_name, global_index, ty, mutable)
    }

    fn end_import_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndImportSection");
        self.reader.end_import_section(state)
    }

    fn begin_function_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginFunctionSection", size);
        self.reader.begin_function_section(state, size)
    }

    fn on_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnFunctionCount({count})"));
        self.reader.on_function_count(state, count)
    }

    fn on_function(&mut self, state: &ReaderState<'_>, index: u32, sig_index: u32) -> Result<()> {
        self.write(format_args!("OnFunction(index: {index}, sig_index: {sig_index})"));
        self.reader.on_function(state, index, sig_index)
    }

    fn end_function_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndFunctionSection");
        self.reader.end_function_section(state)
    }

    fn begin_table_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginTableSection", size);
        self.reader.begin_table_section(state, size)
    }

    fn on_table_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnTableCount({count})"));
        self.reader.on_table_count(state, count)
    }

    fn on_table(&mut self, state: &ReaderState<'_>, index: u32, elem_type: ValueType, elem_limits: &Limits) -> Result<()> {
        self.write(format_args!("OnTable(index: {index}, elem_type: {elem_type}, {elem_limits})"));
        self.reader.on_table(state, index, elem_type, elem_limits)
    }

    fn end_table_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndTableSection");
        self.reader.end_table_section(state)
    }

    fn begin_memory_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginMemorySection", size);
        self.reader.begin_memory_section(state, size)
    }

    fn on_memory_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnMemoryCount({count})"));
        self.reader.on_memory_count(state, count)
    }

    fn on_memory(&mut self, state: &ReaderState<'_>, index: u32, page_limits: &Limits) -> Result<()> {
        self.write(format_args!("OnMemory(index: {index}, {page_limits})"));
        self.reader.on_memory(state, index, page_limits)
    }

    fn end_memory_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndMemorySection");
        self.reader.end_memory_section(state)
    }

    fn begin_global_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginGlobalSection", size);
        self.reader.begin_global_section(state, size)
    }

    fn on_global_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnGlobalCount({count})"));
        self.reader.on_global_count(state, count)
    }

    fn begin_global(&mut self, state: &ReaderState<'_>, index: u32, ty: ValueType, mutable: bool) -> Result<()> {
        self.write(format_args!("BeginGlobal(index: {index}, type: {ty}, mutable: {mutable})"));
        self.reader.begin_global(state, index, ty, mutable)
    }

    fn begin_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("BeginGlobalInitExpr({index})"));
        self.reader.begin_global_init_expr(state, index)
    }

    fn end_global_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndGlobalInitExpr({index})"));
        self.reader.end_global_init_expr(state, index)
    }

    fn end_global(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndGlobal({index})"));
        self.reader.end_global(state, index)
    }

    fn end_global_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndGlobalSection");
        self.reader.end_global_section(state)
    }

    fn begin_export_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginExportSection", size);
        self.reader.begin_export_section(state, size)
    }

    fn on_export_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnExportCount({count})"));
        self.reader.on_export_count(state, count)
    }

    fn on_export(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        kind: ExternalKind,
        item_index: u32,
        name: &str,
    ) -> Result<()> {
        self.write(format_args!(
            "OnExport(index: {index}, kind: {kind}, item_index: {item_index}, name: \"{name}\")"
        ));
        self.reader.on_export(state, index, kind, item_index, name)
    }

    fn end_export_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndExportSection");
        self.reader.end_export_section(state)
    }

    fn begin_start_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginStartSection", size);
        self.reader.begin_start_section(state, size)
    }

    fn on_start_function(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        self.write(format_args!("OnStartFunction({func_index})"));
        self.reader.on_start_function(state, func_index)
    }

    fn end_start_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndStartSection");
        self.reader.end_start_section(state)
    }

    fn begin_code_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginCodeSection", size);
        self.reader.begin_code_section(state, size)
    }

    fn on_function_body_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnFunctionBodyCount({count})"));
        self.reader.on_function_body_count(state, count)
    }

    fn begin_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("BeginFunctionBody({index})"));
        self.reader.begin_function_body(state, index)
    }

    fn on_local_decl_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnLocalDeclCount({count})"));
        self.reader.on_local_decl_count(state, count)
    }

    fn on_local_decl(&mut self, state: &ReaderState<'_>, decl_index: u32, count: u32, ty: ValueType) -> Result<()> {
        self.write(format_args!("OnLocalDecl(index: {decl_index}, count: {count}, type: {ty})"));
        self.reader.on_local_decl(state, decl_index, count, ty)
    }

    // The generic opcode events are not traced; the specific instruction
    // event that follows is.

    fn on_opcode(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.reader.on_opcode(state, opcode)
    }

    fn on_opcode_bare(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.reader.on_opcode_bare(state)
    }

    fn on_opcode_u32(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        self.reader.on_opcode_u32(state, value)
    }

    fn on_opcode_u32_u32(&mut self, state: &ReaderState<'_>, value: u32, value2: u32) -> Result<()> {
        self.reader.on_opcode_u32_u32(state, value, value2)
    }

    fn on_opcode_u64(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        self.reader.on_opcode_u64(state, value)
    }

    fn on_opcode_f32(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        self.reader.on_opcode_f32(state, value_bits)
    }

    fn on_opcode_f64(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        self.reader.on_opcode_f64(state, value_bits)
    }

    fn on_opcode_block_sig(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.reader.on_opcode_block_sig(state, sig_types)
    }

    fn on_binary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.opcode("OnBinaryExpr", opcode);
        self.reader.on_binary_expr(state, opcode)
    }

    fn on_block_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.write(format_args!("OnBlockExpr(sig: {})", TypeList(sig_types)));
        self.reader.on_block_expr(state, sig_types)
    }

    fn on_br_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        self.write(format_args!("OnBrExpr(depth: {depth})"));
        self.reader.on_br_expr(state, depth)
    }

    fn on_br_if_expr(&mut self, state: &ReaderState<'_>, depth: u32) -> Result<()> {
        self.write(format_args!("OnBrIfExpr(depth: {depth})"));
        self.reader.on_br_if_expr(state, depth)
    }

    fn on_br_table_expr(
        &mut self,
        state: &ReaderState<'_>,
        target_depths: &[u32],
        default_target_depth: u32,
    ) -> Result<()> {
        let depths = target_depths
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.write(format_args!(
            "OnBrTableExpr(num_targets: {}, depths: [{depths}], default: {default_target_depth})",
            target_depths.len()
        ));
        self.reader.on_br_table_expr(state, target_depths, default_target_depth)
    }

    fn on_call_expr(&mut self, state: &ReaderState<'_>, func_index: u32) -> Result<()> {
        self.write(format_args!("OnCallExpr(func_index: {func_index})"));
        self.reader.on_call_expr(state, func_index)
    }

    fn on_call_indirect_expr(&mut self, state: &ReaderState<'_>, sig_index: u32) -> Result<()> {
        self.write(format_args!("OnCallIndirectExpr(sig_index: {sig_index})"));
        self.reader.on_call_indirect_expr(state, sig_index)
    }

    fn on_compare_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.opcode("OnCompareExpr", opcode);
        self.reader.on_compare_expr(state, opcode)
    }

    fn on_convert_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.opcode("OnConvertExpr", opcode);
        self.reader.on_convert_expr(state, opcode)
    }

    fn on_current_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnCurrentMemoryExpr"));
        self.reader.on_current_memory_expr(state)
    }

    fn on_drop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnDropExpr"));
        self.reader.on_drop_expr(state)
    }

    fn on_else_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnElseExpr"));
        self.reader.on_else_expr(state)
    }

    fn on_end_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnEndExpr"));
        self.reader.on_end_expr(state)
    }

    fn on_end_func(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.reader.on_end_func(state)
    }

    fn on_f32_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u32) -> Result<()> {
        self.write(format_args!(
            "OnF32ConstExpr({} (0x{value_bits:08x}))",
            f32::from_bits(value_bits)
        ));
        self.reader.on_f32_const_expr(state, value_bits)
    }

    fn on_f64_const_expr(&mut self, state: &ReaderState<'_>, value_bits: u64) -> Result<()> {
        self.write(format_args!(
            "OnF64ConstExpr({} (0x{value_bits:016x}))",
            f64::from_bits(value_bits)
        ));
        self.reader.on_f64_const_expr(state, value_bits)
    }

    fn on_get_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        self.write(format_args!("OnGetGlobalExpr(index: {global_index})"));
        self.reader.on_get_global_expr(state, global_index)
    }

    fn on_get_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.write(format_args!("OnGetLocalExpr(index: {local_index})"));
        self.reader.on_get_local_expr(state, local_index)
    }

    fn on_grow_memory_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnGrowMemoryExpr"));
        self.reader.on_grow_memory_expr(state)
    }

    fn on_i32_const_expr(&mut self, state: &ReaderState<'_>, value: u32) -> Result<()> {
        self.write(format_args!("OnI32ConstExpr({value} (0x{value:x}))"));
        self.reader.on_i32_const_expr(state, value)
    }

    fn on_i64_const_expr(&mut self, state: &ReaderState<'_>, value: u64) -> Result<()> {
        self.write(format_args!("OnI64ConstExpr({value} (0x{value:x}))"));
        self.reader.on_i64_const_expr(state, value)
    }

    fn on_if_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.write(format_args!("OnIfExpr(sig: {})", TypeList(sig_types)));
        self.reader.on_if_expr(state, sig_types)
    }

    fn on_load_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.write(format_args!(
            "OnLoadExpr(opcode: \"{}\" ({}), align log2: {align_log2}, offset: {offset})",
            opcode.name(),
            opcode.code()
        ));
        self.reader.on_load_expr(state, opcode, align_log2, offset)
    }

    fn on_loop_expr(&mut self, state: &ReaderState<'_>, sig_types: &[ValueType]) -> Result<()> {
        self.write(format_args!("OnLoopExpr(sig: {})", TypeList(sig_types)));
        self.reader.on_loop_expr(state, sig_types)
    }

    fn on_nop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnNopExpr"));
        self.reader.on_nop_expr(state)
    }

    fn on_return_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnReturnExpr"));
        self.reader.on_return_expr(state)
    }

    fn on_select_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnSelectExpr"));
        self.reader.on_select_expr(state)
    }

    fn on_set_global_expr(&mut self, state: &ReaderState<'_>, global_index: u32) -> Result<()> {
        self.write(format_args!("OnSetGlobalExpr(index: {global_index})"));
        self.reader.on_set_global_expr(state, global_index)
    }

    fn on_set_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.write(format_args!("OnSetLocalExpr(index: {local_index})"));
        self.reader.on_set_local_expr(state, local_index)
    }

    fn on_store_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        self.write(format_args!(
            "OnStoreExpr(opcode: \"{}\" ({}), align log2: {align_log2}, offset: {offset})",
            opcode.name(),
            opcode.code()
        ));
        self.reader.on_store_expr(state, opcode, align_log2, offset)
    }

    fn on_tee_local_expr(&mut self, state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        self.write(format_args!("OnTeeLocalExpr(index: {local_index})"));
        self.reader.on_tee_local_expr(state, local_index)
    }

    fn on_unary_expr(&mut self, state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        self.opcode("OnUnaryExpr", opcode);
        self.reader.on_unary_expr(state, opcode)
    }

    fn on_unreachable_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.write(format_args!("OnUnreachableExpr"));
        self.reader.on_unreachable_expr(state)
    }

    fn end_function_body(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndFunctionBody({index})"));
        self.reader.end_function_body(state, index)
    }

    fn end_code_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndCodeSection");
        self.reader.end_code_section(state)
    }

    fn begin_elem_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginElemSection", size);
        self.reader.begin_elem_section(state, size)
    }

    fn on_elem_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnElemSegmentCount({count})"));
        self.reader.on_elem_segment_count(state, count)
    }

    fn begin_elem_segment(&mut self, state: &ReaderState<'_>, index: u32, table_index: u32) -> Result<()> {
        self.write(format_args!("BeginElemSegment(index: {index}, table_index: {table_index})"));
        self.reader.begin_elem_segment(state, index, table_index)
    }

    fn begin_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("BeginElemSegmentInitExpr({index})"));
        self.reader.begin_elem_segment_init_expr(state, index)
    }

    fn end_elem_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndElemSegmentInitExpr({index})"));
        self.reader.end_elem_segment_init_expr(state, index)
    }

    fn on_elem_segment_function_index_count(&mut self, state: &ReaderState<'_>, index: u32, count: u32) -> Result<()> {
        self.write(format_args!("OnElemSegmentFunctionIndexCount(index: {index}, count: {count})"));
        self.reader.on_elem_segment_function_index_count(state, index, count)
    }

    fn on_elem_segment_function_index(&mut self, state: &ReaderState<'_>, index: u32, func_index: u32) -> Result<()> {
        self.write(format_args!("OnElemSegmentFunctionIndex(index: {index}, func_index: {func_index})"));
        self.reader.on_elem_segment_function_index(state, index, func_index)
    }

    fn end_elem_segment(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndElemSegment({index})"));
        self.reader.end_elem_segment(state, index)
    }

    fn end_elem_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndElemSection");
        self.reader.end_elem_section(state)
    }

    fn begin_data_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginDataSection", size);
        self.reader.begin_data_section(state, size)
    }

    fn on_data_segment_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnDataSegmentCount({count})"));
        self.reader.on_data_segment_count(state, count)
    }

    fn begin_data_segment(&mut self, state: &ReaderState<'_>, index: u32, memory_index: u32) -> Result<()> {
        self.write(format_args!("BeginDataSegment(index: {index}, memory_index: {memory_index})"));
        self.reader.begin_data_segment(state, index, memory_index)
    }

    fn begin_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("BeginDataSegmentInitExpr({index})"));
        self.reader.begin_data_segment_init_expr(state, index)
    }

    fn end_data_segment_init_expr(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndDataSegmentInitExpr({index})"));
        self.reader.end_data_segment_init_expr(state, index)
    }

    fn on_data_segment_data(&mut self, state: &ReaderState<'_>, index: u32, data: &[u8]) -> Result<()> {
        self.write(format_args!("OnDataSegmentData(index:{index}, size:{})", data.len()));
        self.reader.on_data_segment_data(state, index, data)
    }

    fn end_data_segment(&mut self, state: &ReaderState<'_>, index: u32) -> Result<()> {
        self.write(format_args!("EndDataSegment({index})"));
        self.reader.end_data_segment(state, index)
    }

    fn end_data_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndDataSection");
        self.reader.end_data_section(state)
    }

    fn begin_names_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginNamesSection", size);
        self.reader.begin_names_section(state, size)
    }

    fn on_function_name_subsection(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        name_type: u32,
        subsection_size: u32,
    ) -> Result<()> {
        self.write(format_args!(
            "OnFunctionNameSubsection(index:{index}, nametype:{name_type}, size:{subsection_size})"
        ));
        self.reader
            .on_function_name_subsection(state, index, name_type, subsection_size)
    }

    fn on_function_names_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnFunctionNamesCount({count})"));
        self.reader.on_function_names_count(state, count)
    }

    fn on_function_name(&mut self, state: &ReaderState<'_>, function_index: u32, name: &str) -> Result<()> {
        self.write(format_args!("OnFunctionName(index: {function_index}, name: \"{name}\")"));
        self.reader.on_function_name(state, function_index, name)
    }

    fn on_local_name_subsection(
        &mut self,
        state: &ReaderState<'_>,
        index: u32,
        name_type: u32,
        subsection_size: u32,
    ) -> Result<()> {
        self.write(format_args!(
            "OnLocalNameSubsection(index:{index}, nametype:{name_type}, size:{subsection_size})"
        ));
        self.reader
            .on_local_name_subsection(state, index, name_type, subsection_size)
    }

    fn on_local_name_function_count(&mut self, state: &ReaderState<'_>, count: u32) -> Result<()> {
        self.write(format_args!("OnLocalNameFunctionCount({count})"));
        self.reader.on_local_name_function_count(state, count)
    }

    fn on_local_name_local_count(&mut self, state: &ReaderState<'_>, function_index: u32, count: u32) -> Result<()> {
        self.write(format_args!("OnLocalNameLocalCount(index: {function_index}, count: {count})"));
        self.reader.on_local_name_local_count(state, function_index, count)
    }

    fn on_local_name(
        &mut self,
        state: &ReaderState<'_>,
        function_index: u32,
        local_index: u32,
        name: &str,
    ) -> Result<()> {
        self.write(format_args!(
            "OnLocalName(func_index: {function_index}, local_index: {local_index}, name: \"{name}\")"
        ));
        self.reader.on_local_name(state, function_index, local_index, name)
    }

    fn end_names_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndNamesSection");
        self.reader.end_names_section(state)
    }

    fn begin_reloc_section(&mut self, state: &ReaderState<'_>, size: u32) -> Result<()> {
        self.begin("BeginRelocSection", size);
        self.reader.begin_reloc_section(state, size)
    }

    fn on_reloc_count(
        &mut self,
        state: &ReaderState<'_>,
        count: u32,
        section: BinarySection,
        section_name: &str,
    ) -> Result<()> {
        self.write(format_args!(
            "OnRelocCount(count: {count}, section: {section}, section_name: {section_name})"
        ));
        self.reader.on_reloc_count(state, count, section, section_name)
    }

    fn on_reloc(&mut self, state: &ReaderState<'_>, ty: RelocType, offset: u32, index: u32, addend: i32) -> Result<()> {
        self.write(format_args!(
            "OnReloc(type: {ty}, offset: {offset}, index: {index}, addend: {addend})"
        ));
        self.reader.on_reloc(state, ty, offset, index, addend)
    }

    fn end_reloc_section(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.end("EndRelocSection");
        self.reader.end_reloc_section(state)
    }

    fn on_init_expr_f32_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value_bits: u32) -> Result<()> {
        self.write(format_args!(
            "OnInitExprF32ConstExpr(index: {index}, value: {} (0x{value_bits:08x}))",
            f32::from_bits(value_bits)
        ));
        self.reader.on_init_expr_f32_const_expr(state, index, value_bits)
    }

    fn on_init_expr_f64_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value_bits: u64) -> Result<()> {
        self.write(format_args!(
            "OnInitExprF64ConstExpr(index: {index}, value: {} (0x{value_bits:016x}))",
            f64::from_bits(value_bits)
        ));
        self.reader.on_init_expr_f64_const_expr(state, index, value_bits)
    }

    fn on_init_expr_get_global_expr(&mut self, state: &ReaderState<'_>, index: u32, global_index: u32) -> Result<()> {
        self.write(format_args!(
            "OnInitExprGetGlobalExpr(index: {index}, global_index: {global_index})"
        ));
        self.reader.on_init_expr_get_global_expr(state, index, global_index)
    }

    fn on_init_expr_i32_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value: u32) -> Result<()> {
        self.write(format_args!("OnInitExprI32ConstExpr(index: {index}, value: {value})"));
        self.reader.on_init_expr_i32_const_expr(state, index, value)
    }

    fn on_init_expr_i64_const_expr(&mut self, state: &ReaderState<'_>, index: u32, value: u64) -> Result<()> {
        self.write(format_args!("OnInitExprI64ConstExpr(index: {index}, value: {value})"));
        self.reader.on_init_expr_i64_const_expr(state, index, value)
    }
}
