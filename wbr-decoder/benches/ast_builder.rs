use std::sync::Arc;

use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};
use wbr_decoder::read_binary_ast;
use wbr_format::{
    Event,
    EventStream,
    Opcode,
    ReadBinaryOptions,
    ValueType,
};
use wbr_intercept::{
    read_binary_opcnt,
    MemorySink,
};

fn instr(stream: &mut EventStream, opcode: Opcode, event: Event) {
    stream.push(Event::OnOpcode { opcode }).push(event);
}

/// `funcs` functions, each a flat run of arithmetic inside `depth` nested blocks
fn synthetic_module(funcs: u32, depth: u32, width: u32) -> EventStream {
    let mut s = EventStream::new();
    s.push(Event::BeginModule { version: 1 })
        .push(Event::OnType {
            index:        0,
            param_types:  vec![ValueType::I32],
            result_types: vec![],
        });
    for index in 0..funcs {
        s.push(Event::OnFunction { index, sig_index: 0 });
    }
    s.push(Event::OnFunctionBodyCount { count: funcs });
    for index in 0..funcs {
        s.push(Event::BeginFunctionBody { index })
            .push(Event::OnLocalDeclCount { count: 0 });
        for _ in 0..depth {
            instr(&mut s, Opcode::Block, Event::OnBlockExpr { sig_types: vec![] });
        }
        for value in 0..width {
            instr(&mut s, Opcode::GetLocal, Event::OnGetLocalExpr { local_index: 0 });
            instr(&mut s, Opcode::I32Const, Event::OnI32ConstExpr { value });
            instr(&mut s, Opcode::I32Add, Event::OnBinaryExpr { opcode: Opcode::I32Add });
            instr(&mut s, Opcode::Drop, Event::OnDropExpr);
        }
        for _ in 0..depth {
            instr(&mut s, Opcode::End, Event::OnEndExpr);
        }
        s.push(Event::OnOpcode { opcode: Opcode::End })
            .push(Event::OnEndFunc)
            .push(Event::EndFunctionBody { index });
    }
    s.push(Event::EndModule);
    s
}

fn benchmark_ast_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("ast_builder");

    let flat = synthetic_module(64, 0, 64);
    group.bench_function("flat_bodies", |b| {
        b.iter(|| {
            let mut ignore = |_: Option<usize>, _: &str| false;
            let module =
                read_binary_ast(black_box(&flat), &[], &ReadBinaryOptions::default(), &mut ignore).unwrap();
            black_box(module)
        })
    });

    let nested = synthetic_module(64, 32, 8);
    group.bench_function("nested_blocks", |b| {
        b.iter(|| {
            let mut ignore = |_: Option<usize>, _: &str| false;
            let module =
                read_binary_ast(black_box(&nested), &[], &ReadBinaryOptions::default(), &mut ignore).unwrap();
            black_box(module)
        })
    });

    group.bench_function("traced", |b| {
        b.iter(|| {
            let options = ReadBinaryOptions::default().with_log_sink(Arc::new(MemorySink::new()));
            let mut ignore = |_: Option<usize>, _: &str| false;
            let module = read_binary_ast(black_box(&flat), &[], &options, &mut ignore).unwrap();
            black_box(module)
        })
    });

    group.finish();
}

fn benchmark_opcode_counter(c: &mut Criterion) {
    let stream = synthetic_module(64, 4, 64);
    c.bench_function("opcode_counter", |b| {
        b.iter(|| {
            let data = read_binary_opcnt(black_box(&stream), &[], &ReadBinaryOptions::default()).unwrap();
            black_box(data)
        })
    });
}

criterion_group!(benches, benchmark_ast_builder, benchmark_opcode_counter);
criterion_main!(benches);
