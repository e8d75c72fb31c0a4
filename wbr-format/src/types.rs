// WBR - wbr-format
// Module: Wire Types
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Value types, limits and section identifiers carried by decode events.

use core::fmt;

/// WebAssembly MVP value and type-constructor codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum ValueType {
    /// 32-bit integer
    #[default]
    I32,
    /// 64-bit integer
    I64,
    /// 32-bit floating point
    F32,
    /// 64-bit floating point
    F64,
    /// Table element type
    Anyfunc,
    /// Function type constructor
    Func,
    /// Empty block signature
    Void,
}

impl ValueType {
    /// Create a value type from its binary encoding
    pub fn from_binary(byte: u8) -> Option<Self> {
        match byte {
            0x7F => Some(Self::I32),
            0x7E => Some(Self::I64),
            0x7D => Some(Self::F32),
            0x7C => Some(Self::F64),
            0x70 => Some(Self::Anyfunc),
            0x60 => Some(Self::Func),
            0x40 => Some(Self::Void),
            _ => None,
        }
    }

    /// Convert to the binary encoding
    pub const fn to_binary(self) -> u8 {
        match self {
            Self::I32 => 0x7F,
            Self::I64 => 0x7E,
            Self::F32 => 0x7D,
            Self::F64 => 0x7C,
            Self::Anyfunc => 0x70,
            Self::Func => 0x60,
            Self::Void => 0x40,
        }
    }

    /// Text-format name of the type
    pub const fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Anyfunc => "anyfunc",
            Self::Func => "func",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size limits of a table or memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Limits {
    /// Initial size
    pub initial: u64,
    /// Optional maximum size
    pub max:     Option<u64>,
}

impl Limits {
    /// Limits with only an initial size
    pub const fn new(initial: u64) -> Self {
        Self { initial, max: None }
    }

    /// Limits with both bounds
    pub const fn with_max(initial: u64, max: u64) -> Self {
        Self {
            initial,
            max: Some(max),
        }
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "initial: {}, max: {}", self.initial, max),
            None => write!(f, "initial: {}", self.initial),
        }
    }
}

/// Kind of an imported or exported item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalKind {
    /// Function
    Func   = 0,
    /// Table
    Table  = 1,
    /// Linear memory
    Memory = 2,
    /// Global variable
    Global = 3,
}

impl ExternalKind {
    /// Create an external kind from its binary encoding
    pub fn from_binary(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Func),
            1 => Some(Self::Table),
            2 => Some(Self::Memory),
            3 => Some(Self::Global),
            _ => None,
        }
    }

    /// Text-format name of the kind
    pub const fn name(self) -> &'static str {
        match self {
            Self::Func => "func",
            Self::Table => "table",
            Self::Memory => "memory",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Known section identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinarySection {
    /// Custom section (names, relocations, ...)
    Custom   = 0,
    /// Type section
    Type     = 1,
    /// Import section
    Import   = 2,
    /// Function section
    Function = 3,
    /// Table section
    Table    = 4,
    /// Memory section
    Memory   = 5,
    /// Global section
    Global   = 6,
    /// Export section
    Export   = 7,
    /// Start section
    Start    = 8,
    /// Element section
    Elem     = 9,
    /// Code section
    Code     = 10,
    /// Data section
    Data     = 11,
}

impl BinarySection {
    /// Create a section id from its binary encoding
    pub fn from_binary(byte: u8) -> Option<Self> {
        let section = match byte {
            0 => Self::Custom,
            1 => Self::Type,
            2 => Self::Import,
            3 => Self::Function,
            4 => Self::Table,
            5 => Self::Memory,
            6 => Self::Global,
            7 => Self::Export,
            8 => Self::Start,
            9 => Self::Elem,
            10 => Self::Code,
            11 => Self::Data,
            _ => return None,
        };
        Some(section)
    }

    /// Section name as used in trace output
    pub const fn name(self) -> &'static str {
        match self {
            Self::Custom => "CUSTOM",
            Self::Type => "TYPE",
            Self::Import => "IMPORT",
            Self::Function => "FUNCTION",
            Self::Table => "TABLE",
            Self::Memory => "MEMORY",
            Self::Global => "GLOBAL",
            Self::Export => "EXPORT",
            Self::Start => "START",
            Self::Elem => "ELEM",
            Self::Code => "CODE",
            Self::Data => "DATA",
        }
    }
}

impl fmt::Display for BinarySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relocation entry types of the linking reloc sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelocType {
    /// Function index as a LEB128
    FuncIndexLeb       = 0,
    /// Table index as a signed LEB128
    TableIndexSleb     = 1,
    /// Table index as a 32-bit integer
    TableIndexI32      = 2,
    /// Global address as a LEB128
    GlobalAddressLeb   = 3,
    /// Global address as a signed LEB128
    GlobalAddressSleb  = 4,
    /// Global address as a 32-bit integer
    GlobalAddressI32   = 5,
    /// Type index as a LEB128
    TypeIndexLeb       = 6,
    /// Global index as a LEB128
    GlobalIndexLeb     = 7,
}

impl RelocType {
    /// Create a relocation type from its binary encoding
    pub fn from_binary(byte: u8) -> Option<Self> {
        let ty = match byte {
            0 => Self::FuncIndexLeb,
            1 => Self::TableIndexSleb,
            2 => Self::TableIndexI32,
            3 => Self::GlobalAddressLeb,
            4 => Self::GlobalAddressSleb,
            5 => Self::GlobalAddressI32,
            6 => Self::TypeIndexLeb,
            7 => Self::GlobalIndexLeb,
            _ => return None,
        };
        Some(ty)
    }

    /// Relocation name as used in trace output
    pub const fn name(self) -> &'static str {
        match self {
            Self::FuncIndexLeb => "R_FUNC_INDEX_LEB",
            Self::TableIndexSleb => "R_TABLE_INDEX_SLEB",
            Self::TableIndexI32 => "R_TABLE_INDEX_I32",
            Self::GlobalAddressLeb => "R_GLOBAL_ADDR_LEB",
            Self::GlobalAddressSleb => "R_GLOBAL_ADDR_SLEB",
            Self::GlobalAddressI32 => "R_GLOBAL_ADDR_I32",
            Self::TypeIndexLeb => "R_TYPE_INDEX_LEB",
            Self::GlobalIndexLeb => "R_GLOBAL_INDEX_LEB",
        }
    }
}

impl fmt::Display for RelocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subsection ids of the `name` custom section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameSubsection {
    /// Function names
    Function = 1,
    /// Local names
    Local    = 2,
}

impl NameSubsection {
    /// Create a subsection id from its binary encoding
    pub fn from_binary(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Function),
            2 => Some(Self::Local),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_binary_codes() {
        for ty in [
            ValueType::I32,
            ValueType::I64,
            ValueType::F32,
            ValueType::F64,
            ValueType::Anyfunc,
            ValueType::Func,
            ValueType::Void,
        ] {
            assert_eq!(ValueType::from_binary(ty.to_binary()), Some(ty));
        }
        assert_eq!(ValueType::from_binary(0x7B), None);
    }

    #[test]
    fn test_limits_display() {
        assert_eq!(Limits::new(1).to_string(), "initial: 1");
        assert_eq!(Limits::with_max(1, 16).to_string(), "initial: 1, max: 16");
    }

    #[test]
    fn test_section_and_reloc_names() {
        assert_eq!(BinarySection::from_binary(10), Some(BinarySection::Code));
        assert_eq!(BinarySection::Code.name(), "CODE");
        assert_eq!(BinarySection::from_binary(12), None);
        assert_eq!(RelocType::GlobalIndexLeb.to_string(), "R_GLOBAL_INDEX_LEB");
        assert_eq!(ExternalKind::from_binary(2), Some(ExternalKind::Memory));
    }
}
