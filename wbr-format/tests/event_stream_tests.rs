//! Event stream replay tests.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wbr_format::{
    BinaryReader,
    Event,
    EventRecorder,
    EventSource,
    EventStream,
    Opcode,
    ReadBinaryOptions,
    ReaderState,
    Result,
    ValueType,
};

/// Stops the walk at a chosen event
struct FailAt {
    seen:  usize,
    limit: usize,
}

impl BinaryReader for FailAt {
    fn on_nop_expr(&mut self, state: &ReaderState<'_>) -> Result<()> {
        self.seen += 1;
        if self.seen == self.limit {
            return Err(wbr_format::Error::parse_error("stop").at_offset(state.offset));
        }
        Ok(())
    }
}

fn function_body(nops: usize) -> EventStream {
    let mut stream = EventStream::new();
    stream
        .push(Event::BeginModule { version: 1 })
        .push(Event::BeginCodeSection { size: 0 })
        .push(Event::OnFunctionBodyCount { count: 1 })
        .push(Event::BeginFunctionBody { index: 0 });
    for _ in 0..nops {
        stream.push(Event::OnOpcode { opcode: Opcode::Nop });
        stream.push(Event::OnOpcodeBare);
        stream.push(Event::OnNopExpr);
    }
    stream
        .push(Event::OnEndFunc)
        .push(Event::EndFunctionBody { index: 0 })
        .push(Event::EndCodeSection)
        .push(Event::EndModule);
    stream
}

#[test]
fn test_error_from_handler_aborts_replay() {
    let stream = function_body(5);
    let mut reader = FailAt { seen: 0, limit: 3 };
    let error = stream
        .read(&[], &mut reader, &ReadBinaryOptions::default())
        .unwrap_err();
    assert_eq!(reader.seen, 3);
    // BeginModule..BeginFunctionBody take offsets 0-3, each nop three more
    assert_eq!(error.offset, Some(4 + 2 * 3 + 2));
}

#[test]
fn test_block_signatures_are_preserved() {
    let mut stream = EventStream::new();
    stream.push(Event::OnBlockExpr {
        sig_types: vec![ValueType::I32],
    });
    stream.push(Event::OnIfExpr { sig_types: vec![] });

    let mut recorder = EventRecorder::new();
    stream.replay(&[0, 1, 2], &mut recorder, false).unwrap();
    assert_eq!(recorder.into_stream(), stream);
}

proptest! {
    #[test]
    fn test_recording_a_replay_is_identity(nops in 0usize..40) {
        let stream = function_body(nops);
        let mut recorder = EventRecorder::new();
        stream.read(&[], &mut recorder, &ReadBinaryOptions::default()).unwrap();
        prop_assert_eq!(recorder.stream(), &stream);
        prop_assert_eq!(stream.len(), 8 + 3 * nops);
    }
}
