// WBR - wbr-error
// Module: WBR Error Types
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Unified error handling system for WBR
//!
//! This module provides the error type returned by every event handler,
//! its categories, and the conversions from the typed error kinds.

use core::fmt;
use std::borrow::Cow;

use crate::{
    codes,
    ToErrorCategory,
};

/// `Error` categories for WBR operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    /// Protocol or nesting violations in the event stream
    Structure   = 1,
    /// Counts or indices that disagree with what was declared
    Consistency = 2,
    /// Allocation and propagation failures
    Resource    = 3,
    /// Malformed input reported by the scanner
    Parse       = 4,
    /// System errors
    System      = 5,
    /// Unknown errors
    Unknown     = 9,
}

impl ErrorCategory {
    /// Short lowercase name, used in log lines
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Consistency => "consistency",
            Self::Resource => "resource",
            Self::Parse => "parse",
            Self::System => "system",
            Self::Unknown => "unknown",
        }
    }
}

/// Base trait for all error kinds
pub trait ErrorSource: fmt::Debug + Send + Sync {
    /// Get the error code
    fn code(&self) -> u16;

    /// Get the error category
    fn category(&self) -> ErrorCategory;
}

/// WBR `Error` type
///
/// Categorized error with a numeric code, a message and the byte offset of
/// the event that raised it, when that offset is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// `Error` category
    pub category: ErrorCategory,
    /// `Error` code
    pub code:     u16,
    /// `Error` message
    pub message:  Cow<'static, str>,
    /// Offset of the failing event in the input buffer
    pub offset:   Option<usize>,
}

impl Error {
    /// Popping an empty label stack
    pub const LABEL_STACK_UNDERFLOW: Self = Self::new(
        ErrorCategory::Structure,
        codes::LABEL_STACK_UNDERFLOW,
        "popping empty label stack",
    );
    /// `else` without a matching `if`
    pub const ELSE_WITHOUT_IF: Self = Self::new(
        ErrorCategory::Structure,
        codes::ELSE_WITHOUT_IF,
        "else expression without matching if",
    );

    /// Create a new error with a static message and no offset.
    #[must_use]
    pub const fn new(category: ErrorCategory, code: u16, message: &'static str) -> Self {
        Self {
            category,
            code,
            message: Cow::Borrowed(message),
            offset: None,
        }
    }

    /// Create a new error with an owned, formatted message.
    #[must_use]
    pub fn with_message(category: ErrorCategory, code: u16, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: Cow::Owned(message.into()),
            offset: None,
        }
    }

    /// Attach the byte offset of the failing event.
    #[must_use]
    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    // Factory methods

    /// Create a structural error
    #[must_use]
    pub fn structure_error(code: u16, message: impl Into<String>) -> Self {
        Self::with_message(ErrorCategory::Structure, code, message)
    }

    /// Create a consistency error
    #[must_use]
    pub fn consistency_error(code: u16, message: impl Into<String>) -> Self {
        Self::with_message(ErrorCategory::Consistency, code, message)
    }

    /// Create a resource error
    #[must_use]
    pub fn resource_error(code: u16, message: impl Into<String>) -> Self {
        Self::with_message(ErrorCategory::Resource, code, message)
    }

    /// Create a scanner (parse) error
    #[must_use]
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCategory::Parse, codes::SCANNER_ERROR, message)
    }

    /// The error message without category or offset decoration
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a structural error
    #[must_use]
    pub fn is_structure_error(&self) -> bool {
        self.category == ErrorCategory::Structure
    }

    /// Check if this is a consistency error
    #[must_use]
    pub fn is_consistency_error(&self) -> bool {
        self.category == ErrorCategory::Consistency
    }

    /// Check if this is a resource error
    #[must_use]
    pub fn is_resource_error(&self) -> bool {
        self.category == ErrorCategory::Resource
    }

    /// Check if this is a parse error
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        self.category == ErrorCategory::Parse
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}][E{:04X}] {}", self.category, self.code, self.message)?;
        if let Some(offset) = self.offset {
            write!(f, " @ 0x{offset:x}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl ToErrorCategory for Error {
    fn to_category(&self) -> ErrorCategory {
        self.category
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::new(
            ErrorCategory::System,
            codes::FORMAT_ERROR,
            "Formatting error",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_offset() {
        let error = Error::ELSE_WITHOUT_IF;
        assert_eq!(
            error.to_string(),
            "[Structure][E03E8] else expression without matching if"
        );
    }

    #[test]
    fn test_display_with_offset() {
        let error = Error::LABEL_STACK_UNDERFLOW.at_offset(0x2a);
        assert_eq!(error.offset, Some(42));
        assert!(error.to_string().ends_with(" @ 0x2a"));
    }

    #[test]
    fn test_category_predicates() {
        let error = Error::consistency_error(codes::BODY_COUNT_MISMATCH, "bodies");
        assert!(error.is_consistency_error());
        assert!(!error.is_structure_error());
        assert_eq!(error.to_category(), ErrorCategory::Consistency);
        assert_eq!(error.message(), "bodies");
    }

    #[test]
    fn test_fmt_error_conversion() {
        let error: Error = core::fmt::Error.into();
        assert_eq!(error.category, ErrorCategory::System);
        assert_eq!(error.code, codes::FORMAT_ERROR);
    }
}
