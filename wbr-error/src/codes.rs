// WBR - wbr-error
// Module: WBR Error Codes
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error codes for WBR

// Structure error codes (1000-1099)
/// `else` arrived while the innermost scope is not an `if`
pub const ELSE_WITHOUT_IF: u16 = 1000;
/// `end` or an append arrived with no open scope
pub const LABEL_STACK_UNDERFLOW: u16 = 1001;
/// A label depth reached past the bottom of the label stack
pub const LABEL_DEPTH_OUT_OF_RANGE: u16 = 1002;
/// An init-expression event arrived outside a Begin/End init-expression pair
pub const INIT_EXPR_OUTSIDE_SCOPE: u16 = 1003;
/// An event arrived in a position the builder cannot accept
pub const UNEXPECTED_EVENT: u16 = 1004;
/// Scopes were still open when a function body or the module ended
pub const UNCLOSED_SCOPE: u16 = 1005;

// Consistency error codes (2000-2099)
/// A name count is larger than the number of items it names
pub const NAME_COUNT_EXCEEDS_ITEMS: u16 = 2000;
/// The code section body count disagrees with the function section
pub const BODY_COUNT_MISMATCH: u16 = 2001;
/// An index names an entity that does not exist
pub const INDEX_OUT_OF_RANGE: u16 = 2002;
/// An import detail event does not refer to the most recent import
pub const IMPORT_INDEX_MISMATCH: u16 = 2003;

// Resource error codes (3000-3099)
/// `1 << align_log2` does not fit in 32 bits
pub const ALIGNMENT_OVERFLOW: u16 = 3000;
/// An instruction node could not be linked into its scope
pub const APPEND_FAILED: u16 = 3001;

// Parse error codes (4000-4099)
/// The upstream scanner reported malformed input
pub const SCANNER_ERROR: u16 = 4000;

// System error codes (5000-5099)
/// A formatting sink failed
pub const FORMAT_ERROR: u16 = 5000;
