//! Trace and histogram tests over recorded event streams.

use std::sync::{
    Arc,
    Mutex,
};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wbr_format::{
    Event,
    EventRecorder,
    EventStream,
    ExternalKind,
    Limits,
    NopReader,
    Opcode,
    ReadBinaryOptions,
    ValueType,
};
use wbr_intercept::{
    read_binary,
    read_binary_opcnt,
    LoggingReader,
    MemorySink,
};

fn instr(stream: &mut EventStream, opcode: Opcode, event: Event) {
    stream.push(Event::OnOpcode { opcode });
    stream.push(event);
}

/// A module with one imported memory, one function and one export
fn sample_module() -> EventStream {
    let mut s = EventStream::new();
    s.push(Event::BeginModule { version: 1 })
        .push(Event::BeginSection { section: wbr_format::BinarySection::Type, size: 6 })
        .push(Event::BeginTypeSection { size: 6 })
        .push(Event::OnTypeCount { count: 1 })
        .push(Event::OnType {
            index:        0,
            param_types:  vec![ValueType::I32],
            result_types: vec![ValueType::I32],
        })
        .push(Event::EndTypeSection)
        .push(Event::BeginImportSection { size: 11 })
        .push(Event::OnImportCount { count: 1 })
        .push(Event::OnImport {
            index:       0,
            module_name: "env".into(),
            field_name:  "mem".into(),
        })
        .push(Event::OnImportMemory {
            import_index: 0,
            module_name:  "env".into(),
            field_name:   "mem".into(),
            memory_index: 0,
            page_limits:  Limits::with_max(1, 2),
        })
        .push(Event::EndImportSection)
        .push(Event::BeginFunctionSection { size: 2 })
        .push(Event::OnFunctionCount { count: 1 })
        .push(Event::OnFunction { index: 0, sig_index: 0 })
        .push(Event::EndFunctionSection)
        .push(Event::BeginExportSection { size: 7 })
        .push(Event::OnExportCount { count: 1 })
        .push(Event::OnExport {
            index:      0,
            kind:       ExternalKind::Func,
            item_index: 0,
            name:       "run".into(),
        })
        .push(Event::EndExportSection)
        .push(Event::BeginCodeSection { size: 12 })
        .push(Event::OnFunctionBodyCount { count: 1 })
        .push(Event::BeginFunctionBody { index: 0 })
        .push(Event::OnLocalDeclCount { count: 0 });
    instr(&mut s, Opcode::GetLocal, Event::OnGetLocalExpr { local_index: 0 });
    instr(&mut s, Opcode::I32Load, Event::OnLoadExpr {
        opcode:     Opcode::I32Load,
        align_log2: 2,
        offset:     0,
    });
    instr(&mut s, Opcode::I32Const, Event::OnI32ConstExpr { value: 5 });
    instr(&mut s, Opcode::I32Add, Event::OnBinaryExpr { opcode: Opcode::I32Add });
    s.push(Event::OnEndFunc)
        .push(Event::EndFunctionBody { index: 0 })
        .push(Event::EndCodeSection)
        .push(Event::BeginNamesSection { size: 8 })
        .push(Event::OnFunctionNamesCount { count: 1 })
        .push(Event::OnFunctionName {
            function_index: 0,
            name:           "run".into(),
        })
        .push(Event::EndNamesSection)
        .push(Event::EndModule);
    s
}

#[test]
fn test_logging_reader_is_transparent() {
    let stream = sample_module();
    let sink = Arc::new(MemorySink::new());
    let mut recorder = EventRecorder::new();
    {
        let mut logger = LoggingReader::new(sink.clone(), &mut recorder);
        stream.replay(&[], &mut logger, true).unwrap();
        assert_eq!(logger.indent(), 0);
    }
    assert_eq!(recorder.stream(), &stream);
    assert!(!sink.lines().is_empty());
}

#[test]
fn test_trace_lines() {
    let sink = Arc::new(MemorySink::new());
    let options = ReadBinaryOptions::default().with_log_sink(sink.clone());
    read_binary(&sample_module(), &[], &mut NopReader, &options).unwrap();

    assert_eq!(
        sink.contents(),
        "\
BeginModule(version: 1)
  BeginTypeSection(6)
    OnTypeCount(1)
    OnType(index: 0, params: [i32], results: [i32])
  EndTypeSection
  BeginImportSection(11)
    OnImportCount(1)
    OnImport(index: 0, module: \"env\", field: \"mem\")
    OnImportMemory(import_index: 0, memory_index: 0, initial: 1, max: 2)
  EndImportSection
  BeginFunctionSection(2)
    OnFunctionCount(1)
    OnFunction(index: 0, sig_index: 0)
  EndFunctionSection
  BeginExportSection(7)
    OnExportCount(1)
    OnExport(index: 0, kind: func, item_index: 0, name: \"run\")
  EndExportSection
  BeginCodeSection(12)
    OnFunctionBodyCount(1)
    BeginFunctionBody(0)
    OnLocalDeclCount(0)
    OnGetLocalExpr(index: 0)
    OnLoadExpr(opcode: \"i32.load\" (40), align log2: 2, offset: 0)
    OnI32ConstExpr(5 (0x5))
    OnBinaryExpr(\"i32.add\" (106))
    EndFunctionBody(0)
  EndCodeSection
EndModule
"
    );
}

#[test]
fn test_debug_names_are_traced_when_requested() {
    let sink = Arc::new(MemorySink::new());
    let options = ReadBinaryOptions::default()
        .with_log_sink(sink.clone())
        .with_debug_names(true);
    read_binary(&sample_module(), &[], &mut NopReader, &options).unwrap();

    let lines = sink.lines();
    assert!(lines.contains(&"  BeginNamesSection(8)".to_string()));
    assert!(lines.contains(&"    OnFunctionName(index: 0, name: \"run\")".to_string()));
    assert!(lines.contains(&"  EndNamesSection".to_string()));
}

#[test]
fn test_closure_sink() {
    let collected = Arc::new(Mutex::new(Vec::<String>::new()));
    let target = collected.clone();
    let options = ReadBinaryOptions::default().with_log_sink(Arc::new(move |line: &str| {
        target.lock().unwrap().push(line.to_string());
    }));
    read_binary(&sample_module(), &[], &mut NopReader, &options).unwrap();

    let lines = collected.lock().unwrap();
    assert_eq!(lines.first().map(String::as_str), Some("BeginModule(version: 1)"));
    assert_eq!(lines.last().map(String::as_str), Some("EndModule"));
}

#[test]
fn test_read_binary_without_sink_forwards_directly() {
    let stream = sample_module();
    let mut recorder = EventRecorder::new();
    read_binary(&stream, &[], &mut recorder, &ReadBinaryOptions::default()).unwrap();

    let expected: EventStream = stream.iter().filter(|event| !event.is_debug_name()).cloned().collect();
    assert_eq!(recorder.stream().len(), expected.len());
    assert!(recorder.stream().iter().eq(expected.iter()));
}

#[test]
fn test_opcode_histogram() {
    let data = read_binary_opcnt(&sample_module(), &[], &ReadBinaryOptions::default()).unwrap();

    assert_eq!(data.opcode_count(Opcode::GetLocal), 1);
    assert_eq!(data.opcode_count(Opcode::I32Load), 1);
    assert_eq!(data.opcode_count(Opcode::I32Const), 1);
    assert_eq!(data.opcode_count(Opcode::I32Add), 1);
    assert_eq!(data.total_opcodes(), 4);

    let mut report = String::new();
    data.write_report(&mut report, 0).unwrap();
    assert!(report.starts_with("Opcode counts:\nget_local: 1\ni32.load: 1\ni32.const: 1\ni32.add: 1\n"));
    assert!(report.contains("i32.const:\ni32.const 5: 1\n"));
    assert!(report.contains("i32.load:\ni32.load align=2 offset=0: 1\n"));
}

proptest! {
    #[test]
    fn test_trace_indent_returns_to_zero(sections in 0usize..6, nops in 0usize..20) {
        let mut stream = EventStream::new();
        stream.push(Event::BeginModule { version: 1 });
        for _ in 0..sections {
            stream.push(Event::BeginCustomSection { size: 0, section_name: "x".into() });
            stream.push(Event::EndCustomSection);
        }
        stream.push(Event::BeginCodeSection { size: 0 });
        for _ in 0..nops {
            instr(&mut stream, Opcode::Nop, Event::OnNopExpr);
        }
        stream.push(Event::EndCodeSection).push(Event::EndModule);

        let sink = Arc::new(MemorySink::new());
        let mut nop = NopReader;
        let mut logger = LoggingReader::new(sink.clone(), &mut nop);
        stream.replay(&[], &mut logger, false).unwrap();
        prop_assert_eq!(logger.indent(), 0);
        prop_assert_eq!(sink.lines().len(), 2 + 2 * sections + 2 + nops);
    }
}
