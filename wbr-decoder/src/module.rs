//! Decoded module representation
//!
//! [`Module`] owns one collection per kind of definition, plus
//! [`Module::fields`], which records every definition in the order it was
//! decoded. Imported entities come first in their kind's collection.

use std::collections::HashMap;

use wbr_format::{
    ExternalKind,
    Limits,
    ValueType,
};

use crate::expr::{
    Expr,
    ExprArena,
    ExprId,
    ExprList,
};

/// Parameter and result types of a function
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncSignature {
    /// Parameter types, in order
    pub param_types:  Vec<ValueType>,
    /// Result types, in order
    pub result_types: Vec<ValueType>,
}

/// An entry of the type section
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncType {
    /// The signature
    pub sig: FuncSignature,
}

/// How a function declares its type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncDeclaration {
    /// Index into the type section, when the type was referenced by index
    pub type_index: Option<u32>,
    /// The resolved signature
    pub sig:        FuncSignature,
}

/// A function, imported or defined
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Func {
    /// Type of the function
    pub decl:           FuncDeclaration,
    /// Declared local types, excluding parameters
    pub local_types:    Vec<ValueType>,
    /// Head of the body list
    pub first_expr:     Option<ExprId>,
    /// Storage for every node of the body
    pub exprs:          ExprArena,
    /// Debug name
    pub name:           Option<String>,
    /// Parameter names to parameter index
    pub param_bindings: HashMap<String, u32>,
    /// Local names to index among the declared locals
    pub local_bindings: HashMap<String, u32>,
}

impl Func {
    /// Number of parameters
    pub fn num_params(&self) -> usize {
        self.decl.sig.param_types.len()
    }

    /// Number of parameters plus declared locals
    pub fn num_params_and_locals(&self) -> usize {
        self.num_params() + self.local_types.len()
    }

    /// The top-level body instructions
    pub fn body(&self) -> ExprList<'_> {
        self.exprs.list(self.first_expr)
    }
}

/// What an import brings into the module
///
/// Each variant holds the index of the created entity in its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportDesc {
    /// Index into [`Module::funcs`]
    Func(usize),
    /// Index into [`Module::tables`]
    Table(usize),
    /// Index into [`Module::memories`]
    Memory(usize),
    /// Index into [`Module::globals`]
    Global(usize),
}

impl ImportDesc {
    /// Kind of the imported entity
    pub const fn kind(self) -> ExternalKind {
        match self {
            Self::Func(_) => ExternalKind::Func,
            Self::Table(_) => ExternalKind::Table,
            Self::Memory(_) => ExternalKind::Memory,
            Self::Global(_) => ExternalKind::Global,
        }
    }
}

/// An import entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Module name
    pub module_name: String,
    /// Field name
    pub field_name:  String,
    /// Imported entity; `None` until its detail event arrives
    pub desc:        Option<ImportDesc>,
}

/// A table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    /// Element type
    pub elem_type:   ValueType,
    /// Size limits, in elements
    pub elem_limits: Limits,
}

/// A linear memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memory {
    /// Size limits, in pages
    pub page_limits: Limits,
}

/// A global variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    /// Value type
    pub ty:        ValueType,
    /// Whether `set_global` may write it
    pub mutable:   bool,
    /// Initial value; always `None` for imports
    pub init_expr: Option<Expr>,
}

/// An export entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Export name
    pub name:       String,
    /// Kind of the exported item
    pub kind:       ExternalKind,
    /// Index of the item in its kind's index space
    pub item_index: u32,
}

/// An element segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElemSegment {
    /// Target table
    pub table_index:  u32,
    /// Offset init expression
    pub offset:       Option<Expr>,
    /// Function indices written to the table
    pub func_indices: Vec<u32>,
}

/// A data segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    /// Target memory
    pub memory_index: u32,
    /// Offset init expression
    pub offset:       Option<Expr>,
    /// Bytes copied into memory
    pub data:         Vec<u8>,
}

/// One definition, in decode order
///
/// Variants hold an index into the matching collection of [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleField {
    /// [`Module::func_types`]
    FuncType(usize),
    /// [`Module::imports`]
    Import(usize),
    /// [`Module::funcs`]
    Func(usize),
    /// [`Module::tables`]
    Table(usize),
    /// [`Module::memories`]
    Memory(usize),
    /// [`Module::globals`]
    Global(usize),
    /// [`Module::exports`]
    Export(usize),
    /// The start function index
    Start(u32),
    /// [`Module::elem_segments`]
    ElemSegment(usize),
    /// [`Module::data_segments`]
    DataSegment(usize),
}

/// Structural counts of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleCounts {
    /// Type section entries
    pub types:          usize,
    /// Import entries
    pub imports:        usize,
    /// Imported functions
    pub func_imports:   usize,
    /// Imported tables
    pub table_imports:  usize,
    /// Imported memories
    pub memory_imports: usize,
    /// Imported globals
    pub global_imports: usize,
    /// Defined functions
    pub funcs:          usize,
    /// Defined tables
    pub tables:         usize,
    /// Defined memories
    pub memories:       usize,
    /// Defined globals
    pub globals:        usize,
    /// Export entries
    pub exports:        usize,
    /// Element segments
    pub elem_segments:  usize,
    /// Data segments
    pub data_segments:  usize,
}

/// A decoded module
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    /// Binary format version
    pub version:            u32,
    /// Every definition in decode order
    pub fields:             Vec<ModuleField>,
    /// Type section
    pub func_types:         Vec<FuncType>,
    /// Import entries
    pub imports:            Vec<Import>,
    /// Functions, imports first
    pub funcs:              Vec<Func>,
    /// Tables, imports first
    pub tables:             Vec<Table>,
    /// Memories, imports first
    pub memories:           Vec<Memory>,
    /// Globals, imports first
    pub globals:            Vec<Global>,
    /// Export entries
    pub exports:            Vec<Export>,
    /// Element segments
    pub elem_segments:      Vec<ElemSegment>,
    /// Data segments
    pub data_segments:      Vec<DataSegment>,
    /// Start function
    pub start:              Option<u32>,
    /// Imported prefix of `funcs`
    pub num_func_imports:   usize,
    /// Imported prefix of `tables`
    pub num_table_imports:  usize,
    /// Imported prefix of `memories`
    pub num_memory_imports: usize,
    /// Imported prefix of `globals`
    pub num_global_imports: usize,
    /// Function names to function index
    pub func_bindings:      HashMap<String, u32>,
}

impl Module {
    /// Create an empty module
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the structural items of the module
    pub fn counts(&self) -> ModuleCounts {
        ModuleCounts {
            types:          self.func_types.len(),
            imports:        self.imports.len(),
            func_imports:   self.num_func_imports,
            table_imports:  self.num_table_imports,
            memory_imports: self.num_memory_imports,
            global_imports: self.num_global_imports,
            funcs:          self.funcs.len() - self.num_func_imports,
            tables:         self.tables.len() - self.num_table_imports,
            memories:       self.memories.len() - self.num_memory_imports,
            globals:        self.globals.len() - self.num_global_imports,
            exports:        self.exports.len(),
            elem_segments:  self.elem_segments.len(),
            data_segments:  self.data_segments.len(),
        }
    }

    /// Defined functions, skipping imports
    pub fn defined_funcs(&self) -> &[Func] {
        &self.funcs[self.num_func_imports..]
    }

    /// Look up a function by its debug name.
    ///
    /// Names are last-write-wins: if two functions were given the same name,
    /// this returns the later one, although the earlier still carries the
    /// name in [`Func::name`].
    pub fn func_by_name(&self, name: &str) -> Option<&Func> {
        let index = *self.func_bindings.get(name)?;
        self.funcs.get(index as usize)
    }

    /// Number of entities of `kind`, imports included
    pub fn item_count(&self, kind: ExternalKind) -> usize {
        match kind {
            ExternalKind::Func => self.funcs.len(),
            ExternalKind::Table => self.tables.len(),
            ExternalKind::Memory => self.memories.len(),
            ExternalKind::Global => self.globals.len(),
        }
    }
}
