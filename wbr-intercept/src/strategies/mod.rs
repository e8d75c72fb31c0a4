//! Built-in consumers layered on the decode event protocol
//!
//! This module provides the two consumers that observe a decode without
//! building a tree: a decorator that traces every event it forwards, and a
//! terminal reader that counts opcodes and operand values.

mod logging;
mod stats;

pub use logging::{
    LogCrateSink,
    LoggingConfig,
    LoggingReader,
    MemorySink,
};
pub use stats::{
    IntCounter,
    IntPairCounter,
    OpcntData,
    OpcodeCounter,
};
