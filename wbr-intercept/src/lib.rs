// WBR - wbr-intercept
// Module: Decode Event Interception Layer
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! # Interception Layer for the WebAssembly Binary Reader
//!
//! This crate sits between an event source and the reader consuming its
//! events. It provides:
//!
//! - [`LoggingReader`]: a decorator that writes an indented trace line for
//!   each event and forwards it unchanged
//! - [`OpcodeCounter`]: a terminal reader that builds an opcode histogram
//! - [`read_binary`] and [`read_binary_opcnt`]: entry points that wire these
//!   up from [`ReadBinaryOptions`]
//!
//! ```rust
//! # use std::sync::Arc;
//! # use wbr_format::{Event, EventStream, NopReader, ReadBinaryOptions};
//! # use wbr_intercept::{read_binary, MemorySink};
//! let mut stream = EventStream::new();
//! stream.push(Event::BeginModule { version: 1 }).push(Event::EndModule);
//!
//! let sink = Arc::new(MemorySink::new());
//! let options = ReadBinaryOptions::default().with_log_sink(sink.clone());
//! read_binary(&stream, &[], &mut NopReader, &options).unwrap();
//!
//! assert_eq!(sink.lines(), vec!["BeginModule(version: 1)", "EndModule"]);
//! ```

#![forbid(unsafe_code)] // Rule 2
#![warn(missing_docs)]

/// Built-in consumers
pub mod strategies;

pub use strategies::{
    IntCounter,
    IntPairCounter,
    LogCrateSink,
    LoggingConfig,
    LoggingReader,
    MemorySink,
    OpcntData,
    OpcodeCounter,
};
use wbr_error::Result;
use wbr_format::{
    BinaryReader,
    EventSource,
    ReadBinaryOptions,
};

/// Walk `data` with `source`, delivering every event to `reader`.
///
/// When `options` carries a log sink, the reader is wrapped in a
/// [`LoggingReader`] writing to that sink.
pub fn read_binary(
    source: &dyn EventSource,
    data: &[u8],
    reader: &mut dyn BinaryReader,
    options: &ReadBinaryOptions,
) -> Result<()> {
    log::debug!(
        "read_binary: {} bytes, trace: {}, debug names: {}",
        data.len(),
        options.log_sink.is_some(),
        options.read_debug_names
    );
    match &options.log_sink {
        Some(sink) => {
            let mut logger = LoggingReader::new(sink.clone(), reader);
            source.read(data, &mut logger, options)
        }
        None => source.read(data, reader, options),
    }
}

/// Walk `data` with `source` and return the opcode histogram
pub fn read_binary_opcnt(source: &dyn EventSource, data: &[u8], options: &ReadBinaryOptions) -> Result<OpcntData> {
    let mut counter = OpcodeCounter::new();
    read_binary(source, data, &mut counter, options)?;
    let data = counter.into_data();
    log::debug!("read_binary_opcnt: {} opcodes counted", data.total_opcodes());
    Ok(data)
}
