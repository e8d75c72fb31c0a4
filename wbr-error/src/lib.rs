// WBR - wbr-error
// Module: WBR Error Handling
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! WBR Error handling library
//!
//! This library provides the error handling system shared by every crate of
//! the binary reader front end. Every failure a decode can produce is an
//! [`Error`] carrying a category, a numeric code, a formatted message and,
//! when known, the byte offset of the event that caused it.
//!
//! # Error Categories
//!
//! Errors are organized into categories, each with its own range of error
//! codes:
//!
//! ## Structure Errors (1000-1099)
//! - Else without a matching if
//! - Popping an empty label stack
//! - Label depth beyond the stack size
//! - Init-expression events outside an init-expression scope
//!
//! ## Consistency Errors (2000-2099)
//! - Name counts exceeding item counts
//! - Function body count mismatches
//! - Indices naming entities that do not exist
//!
//! ## Resource Errors (3000-3099)
//! - Alignment overflow
//! - Failed list appends
//!
//! # Usage
//!
//! ```
//! use wbr_error::{
//!     codes,
//!     kinds,
//!     Error,
//!     ErrorCategory,
//! };
//!
//! let error = Error::new(
//!     ErrorCategory::Structure,
//!     codes::ELSE_WITHOUT_IF,
//!     "else expression without matching if",
//! );
//! assert!(error.is_structure_error());
//!
//! let underflow: Error = kinds::LabelStackUnderflow.into();
//! assert_eq!(underflow.code, codes::LABEL_STACK_UNDERFLOW);
//! ```

#![forbid(unsafe_code)] // Rule 2
#![warn(clippy::missing_panics_doc)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Error codes for wbr
pub mod codes;
/// Error and error handling types
pub mod errors;
/// Error kind definitions
pub mod kinds;

// Re-export key types
pub use errors::{
    Error,
    ErrorCategory,
    ErrorSource,
};

/// A specialized `Result` type for WBR operations.
///
/// This type alias uses `wbr_error::Error` as the error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error conversion trait for converting to specific error categories
///
/// This trait provides a way to ask any error which category it belongs to,
/// which is how hosts decide between structural and consistency failures.
pub trait ToErrorCategory {
    /// Convert the error to a specific category
    fn to_category(&self) -> ErrorCategory;
}
