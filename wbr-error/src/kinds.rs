// WBR - wbr-error
// Module: WBR Error Kinds
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Typed error kinds raised while consuming decode events.
//!
//! Each kind formats its own message and converts into [`Error`] with the
//! right category and code.

use core::fmt::{
    self,
    Display,
};

use crate::{
    codes,
    Error,
    ErrorCategory,
    ErrorSource,
};

/// Implements `ErrorSource` and `From<Kind> for Error` for a kind.
macro_rules! error_kind {
    ($kind:ty, $category:ident, $code:path) => {
        impl ErrorSource for $kind {
            fn code(&self) -> u16 {
                $code
            }

            fn category(&self) -> ErrorCategory {
                ErrorCategory::$category
            }
        }

        impl From<$kind> for Error {
            fn from(kind: $kind) -> Self {
                Error::with_message(ErrorCategory::$category, $code, kind.to_string())
            }
        }
    };
}

/// `else` arrived while the innermost scope is not an `if`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElseWithoutIf;

impl Display for ElseWithoutIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "else expression without matching if")
    }
}

/// `end` or an append arrived with no open scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelStackUnderflow;

impl Display for LabelStackUnderflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "popping empty label stack")
    }
}

/// A label depth reached past the bottom of the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDepthOutOfRange {
    /// Requested depth, counted from the top
    pub depth: usize,
    /// Number of labels on the stack
    pub max:   usize,
}

impl Display for LabelDepthOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "accessing stack depth: {} >= max: {}", self.depth, self.max)
    }
}

/// An init-expression event arrived outside its Begin/End pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitExprOutsideScope {
    /// Name of the offending event
    pub event: &'static str,
}

impl Display for InitExprOutsideScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} outside of an init expression", self.event)
    }
}

/// An event arrived where the builder cannot accept it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnexpectedEvent {
    /// Name of the offending event
    pub event:  &'static str,
    /// What was wrong about its position
    pub reason: &'static str,
}

impl Display for UnexpectedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected {}: {}", self.event, self.reason)
    }
}

/// Scopes were still open at the end of a function body or module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclosedScope {
    /// Where the check happened
    pub at:    &'static str,
    /// Label stack depth at that point
    pub depth: usize,
}

impl Display for UnclosedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} unclosed label(s)", self.at, self.depth)
    }
}

/// A name subsection declares more names than there are items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameCountExceedsItems {
    /// `"function"` or `"local"`
    pub what:  &'static str,
    /// Declared name count
    pub count: u32,
    /// Number of items available
    pub items: usize,
}

impl Display for NameCountExceedsItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {what} name count ({}) <= {what} count ({})",
            self.count,
            self.items,
            what = self.what
        )
    }
}

/// The code section body count disagrees with the function section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyCountMismatch {
    /// Functions declared in the function section
    pub declared: usize,
    /// Bodies announced by the code section
    pub bodies:   u32,
}

impl Display for BodyCountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "function body count ({}) != function count ({})",
            self.bodies, self.declared
        )
    }
}

/// An index names an entity that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    /// Kind of entity being indexed
    pub what:  &'static str,
    /// The index found in the event
    pub index: u32,
    /// Number of entities of that kind
    pub count: usize,
}

impl Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} index: {} (count: {})",
            self.what, self.index, self.count
        )
    }
}

/// An import detail event does not refer to the most recent import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportIndexMismatch {
    /// Import index carried by the event
    pub index:    u32,
    /// Index of the most recent import, if any
    pub expected: Option<usize>,
}

impl Display for ImportIndexMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected {
            Some(expected) => write!(
                f,
                "import detail for index {} but last import is {}",
                self.index, expected
            ),
            None => write!(f, "import detail for index {} before any import", self.index),
        }
    }
}

/// `1 << align_log2` does not fit in 32 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentOverflow {
    /// The encoded alignment exponent
    pub align_log2: u32,
}

impl Display for AlignmentOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alignment 2^{} overflows", self.align_log2)
    }
}

/// An instruction node could not be linked into its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendFailed;

impl Display for AppendFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to append expression")
    }
}

error_kind!(ElseWithoutIf, Structure, codes::ELSE_WITHOUT_IF);
error_kind!(LabelStackUnderflow, Structure, codes::LABEL_STACK_UNDERFLOW);
error_kind!(LabelDepthOutOfRange, Structure, codes::LABEL_DEPTH_OUT_OF_RANGE);
error_kind!(InitExprOutsideScope, Structure, codes::INIT_EXPR_OUTSIDE_SCOPE);
error_kind!(UnexpectedEvent, Structure, codes::UNEXPECTED_EVENT);
error_kind!(UnclosedScope, Structure, codes::UNCLOSED_SCOPE);
error_kind!(NameCountExceedsItems, Consistency, codes::NAME_COUNT_EXCEEDS_ITEMS);
error_kind!(BodyCountMismatch, Consistency, codes::BODY_COUNT_MISMATCH);
error_kind!(IndexOutOfRange, Consistency, codes::INDEX_OUT_OF_RANGE);
error_kind!(ImportIndexMismatch, Consistency, codes::IMPORT_INDEX_MISMATCH);
error_kind!(AlignmentOverflow, Resource, codes::ALIGNMENT_OVERFLOW);
error_kind!(AppendFailed, Resource, codes::APPEND_FAILED);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_depth_message() {
        let error: Error = LabelDepthOutOfRange { depth: 3, max: 2 }.into();
        assert_eq!(error.message(), "accessing stack depth: 3 >= max: 2");
        assert_eq!(error.code, codes::LABEL_DEPTH_OUT_OF_RANGE);
    }

    #[test]
    fn test_name_count_message() {
        let error: Error = NameCountExceedsItems {
            what:  "function",
            count: 5,
            items: 3,
        }
        .into();
        assert!(error.is_consistency_error());
        assert_eq!(
            error.message(),
            "expected function name count (5) <= function count (3)"
        );
    }

    #[test]
    fn test_kind_source_metadata() {
        assert_eq!(AlignmentOverflow { align_log2: 40 }.category(), ErrorCategory::Resource);
        assert_eq!(ElseWithoutIf.code(), codes::ELSE_WITHOUT_IF);
    }
}
