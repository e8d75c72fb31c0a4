// WBR - wbr-format
// Module: WebAssembly Binary Reader Event Protocol
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decode event protocol for the WebAssembly binary reader.
//!
//! This crate defines the contract between a binary scanner and the
//! consumers of its events:
//!
//! - [`BinaryReader`]: one method per decode event, each with a default body
//! - [`NopReader`]: a consumer that takes every default
//! - [`Event`], [`EventStream`] and [`EventRecorder`]: owned events that can
//!   be recorded and replayed
//! - [`EventSource`]: the seam a scanner implements
//! - [`ReadBinaryOptions`] and [`LogSink`]: options shared by the read entry
//!   points
//!
//! The wire types carried by events live in [`types`] and the opcode table in
//! [`opcode`].

#![forbid(unsafe_code)] // Rule 2
#![warn(missing_docs)]

/// Owned events, streams and the recorder
pub mod event;
/// The MVP opcode table
pub mod opcode;
/// The decode event protocol
pub mod reader;
/// Scanner seam and read options
pub mod source;
/// Wire types carried by events
pub mod types;

pub use event::{
    Event,
    EventRecorder,
    EventStream,
};
pub use opcode::Opcode;
pub use reader::{
    BinaryReader,
    NopReader,
    ReaderState,
};
pub use source::{
    EventSource,
    LogSink,
    ReadBinaryOptions,
};
pub use types::{
    BinarySection,
    ExternalKind,
    Limits,
    NameSubsection,
    RelocType,
    ValueType,
};
pub use wbr_error::{
    Error,
    Result,
};

/// The binary format version this front end understands
pub const WASM_VERSION: u32 = 1;

/// Prelude for consumers implementing the protocol
pub mod prelude {
    pub use crate::{
        BinaryReader,
        Limits,
        Opcode,
        ReaderState,
        ValueType,
    };
    pub use wbr_error::Result;
}
