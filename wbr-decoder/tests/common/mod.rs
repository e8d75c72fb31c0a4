//! Event stream builders shared by the decoder tests.

#![allow(dead_code)]

use wbr_decoder::{
    read_binary_ast,
    Module,
};
use wbr_format::{
    Event,
    EventStream,
    Opcode,
    ReadBinaryOptions,
    Result,
    ValueType,
};

/// Push the generic opcode event followed by the specific one
pub fn instr(stream: &mut EventStream, opcode: Opcode, event: Event) {
    stream.push(Event::OnOpcode { opcode });
    stream.push(event);
}

/// `end` of a block, loop or if
pub fn end(stream: &mut EventStream) {
    instr(stream, Opcode::End, Event::OnEndExpr);
}

/// A module with one type and one function per body; each body is emitted
/// by `body(stream, func_index)` between BeginFunctionBody and the final
/// `end`.
pub fn module_with_bodies(
    params: &[ValueType],
    results: &[ValueType],
    bodies: usize,
    mut body: impl FnMut(&mut EventStream, u32),
) -> EventStream {
    let mut s = EventStream::new();
    s.push(Event::BeginModule { version: 1 })
        .push(Event::BeginTypeSection { size: 0 })
        .push(Event::OnTypeCount { count: 1 })
        .push(Event::OnType {
            index:        0,
            param_types:  params.to_vec(),
            result_types: results.to_vec(),
        })
        .push(Event::EndTypeSection)
        .push(Event::BeginFunctionSection { size: 0 })
        .push(Event::OnFunctionCount { count: bodies as u32 });
    for index in 0..bodies as u32 {
        s.push(Event::OnFunction { index, sig_index: 0 });
    }
    s.push(Event::EndFunctionSection)
        .push(Event::BeginCodeSection { size: 0 })
        .push(Event::OnFunctionBodyCount { count: bodies as u32 });
    for index in 0..bodies as u32 {
        s.push(Event::BeginFunctionBody { index })
            .push(Event::OnLocalDeclCount { count: 0 });
        body(&mut s, index);
        s.push(Event::OnOpcode { opcode: Opcode::End })
            .push(Event::OnEndFunc)
            .push(Event::EndFunctionBody { index });
    }
    s.push(Event::EndCodeSection).push(Event::EndModule);
    s
}

/// A module with a single function whose body is emitted by `body`
pub fn single_function(
    params: &[ValueType],
    results: &[ValueType],
    mut body: impl FnMut(&mut EventStream),
) -> EventStream {
    module_with_bodies(params, results, 1, |s, _| body(s))
}

/// Decode `stream`, discarding error messages
pub fn decode(stream: &EventStream) -> Result<Module> {
    let mut ignore = |_: Option<usize>, _: &str| false;
    read_binary_ast(stream, &[], &ReadBinaryOptions::default(), &mut ignore)
}

/// Decode `stream` with debug names, collecting every reported error
pub fn decode_collecting(stream: &EventStream) -> (Result<Module>, Vec<(Option<usize>, String)>) {
    let mut errors = Vec::new();
    let result = {
        let mut collect = |offset: Option<usize>, message: &str| {
            errors.push((offset, message.to_string()));
            false
        };
        read_binary_ast(
            stream,
            &[],
            &ReadBinaryOptions::default().with_debug_names(true),
            &mut collect,
        )
    };
    (result, errors)
}
