//! Tree reconstruction tests for the AST builder.

mod common;

use common::{
    decode,
    decode_collecting,
    end,
    instr,
    single_function,
};
use pretty_assertions::assert_eq;
use wbr_decoder::{
    BinaryReaderAst,
    Const,
    Expr,
    Func,
    MemArg,
};
use wbr_error::{
    codes,
    ErrorCategory,
};
use wbr_format::{
    Event,
    EventStream,
    Opcode,
    ReadBinaryOptions,
    ValueType,
};

fn list(func: &Func, first: Option<wbr_decoder::ExprId>) -> Vec<Expr> {
    func.exprs.list(first).map(|(_, expr)| expr.clone()).collect()
}

#[test]
fn test_flat_body() {
    let stream = single_function(&[ValueType::I32], &[ValueType::I32], |s| {
        instr(s, Opcode::GetLocal, Event::OnGetLocalExpr { local_index: 0 });
        instr(s, Opcode::I32Const, Event::OnI32ConstExpr { value: 5 });
        instr(s, Opcode::I32Add, Event::OnBinaryExpr { opcode: Opcode::I32Add });
    });
    let module = decode(&stream).unwrap();

    let func = &module.funcs[0];
    assert_eq!(list(func, func.first_expr), vec![
        Expr::GetLocal { index: 0 },
        Expr::Const(Const::I32(5)),
        Expr::Binary(Opcode::I32Add),
    ]);
    assert!(func.body().all(|(_, expr)| !expr.is_structured()));
    assert_eq!(func.exprs.len(), 3);
}

#[test]
fn test_block_owns_its_list() {
    let stream = single_function(&[], &[ValueType::I32], |s| {
        instr(s, Opcode::Block, Event::OnBlockExpr {
            sig_types: vec![ValueType::I32],
        });
        instr(s, Opcode::I32Const, Event::OnI32ConstExpr { value: 1 });
        end(s);
    });
    let module = decode(&stream).unwrap();

    let func = &module.funcs[0];
    let body = list(func, func.first_expr);
    assert_eq!(body.len(), 1);
    let Expr::Block(block) = &body[0] else {
        panic!("expected a block, got {:?}", body[0]);
    };
    assert_eq!(block.sig, vec![ValueType::I32]);
    assert_eq!(list(func, block.first), vec![Expr::Const(Const::I32(1))]);
}

#[test]
fn test_if_else_branches() {
    let stream = single_function(&[], &[ValueType::I32], |s| {
        instr(s, Opcode::If, Event::OnIfExpr {
            sig_types: vec![ValueType::I32],
        });
        instr(s, Opcode::I32Const, Event::OnI32ConstExpr { value: 1 });
        instr(s, Opcode::Else, Event::OnElseExpr);
        instr(s, Opcode::I32Const, Event::OnI32ConstExpr { value: 2 });
        end(s);
    });
    let module = decode(&stream).unwrap();

    let func = &module.funcs[0];
    let body = list(func, func.first_expr);
    assert_eq!(body.len(), 1);
    let Expr::If {
        true_block,
        false_first,
    } = &body[0]
    else {
        panic!("expected an if, got {:?}", body[0]);
    };
    assert_eq!(list(func, true_block.first), vec![Expr::Const(Const::I32(1))]);
    assert_eq!(list(func, *false_first), vec![Expr::Const(Const::I32(2))]);
}

#[test]
fn test_end_without_open_scope_aborts() {
    let stream = single_function(&[], &[], |s| {
        instr(s, Opcode::Nop, Event::OnNopExpr);
        end(s);
    });
    let (result, errors) = decode_collecting(&stream);

    let error = result.unwrap_err();
    assert_eq!(error.category, ErrorCategory::Structure);
    assert_eq!(error.code, codes::UNEXPECTED_EVENT);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, error.offset);
}

#[test]
fn test_function_name_count_checked_before_binding() {
    let mut stream = common::module_with_bodies(&[], &[], 3, |_, _| {});
    // Move EndModule behind the names section
    let mut events: Vec<Event> = stream.iter().cloned().collect();
    events.pop();
    stream = events.into_iter().collect();
    stream
        .push(Event::BeginNamesSection { size: 0 })
        .push(Event::OnFunctionNameSubsection {
            index:           0,
            name_type:       1,
            subsection_size: 0,
        })
        .push(Event::OnFunctionNamesCount { count: 5 })
        .push(Event::OnFunctionName {
            function_index: 0,
            name:           "first".into(),
        })
        .push(Event::EndNamesSection)
        .push(Event::EndModule);

    let mut errors = Vec::new();
    let mut collect = |offset: Option<usize>, message: &str| {
        errors.push((offset, message.to_string()));
        false
    };
    let mut builder = BinaryReaderAst::new(&mut collect);
    let error = stream.replay(&[], &mut builder, true).unwrap_err();

    assert_eq!(error.category, ErrorCategory::Consistency);
    assert_eq!(error.code, codes::NAME_COUNT_EXCEEDS_ITEMS);
    assert!(builder.module().func_bindings.is_empty());
    assert!(builder.module().funcs.iter().all(|f| f.name.is_none()));
    drop(builder);
    assert_eq!(errors[0].1, "expected function name count (5) <= function count (3)");
}

#[test]
fn test_nested_scopes_and_branches() {
    let stream = single_function(&[], &[], |s| {
        instr(s, Opcode::Block, Event::OnBlockExpr { sig_types: vec![] });
        instr(s, Opcode::Loop, Event::OnLoopExpr { sig_types: vec![] });
        instr(s, Opcode::I32Const, Event::OnI32ConstExpr { value: 0 });
        instr(s, Opcode::BrIf, Event::OnBrIfExpr { depth: 1 });
        instr(s, Opcode::Br, Event::OnBrExpr { depth: 0 });
        end(s);
        instr(s, Opcode::I32Const, Event::OnI32ConstExpr { value: 3 });
        instr(s, Opcode::BrTable, Event::OnBrTableExpr {
            target_depths:        vec![0, 1],
            default_target_depth: 0,
        });
        end(s);
        instr(s, Opcode::Return, Event::OnReturnExpr);
    });
    let module = decode(&stream).unwrap();

    let func = &module.funcs[0];
    let body = list(func, func.first_expr);
    assert_eq!(body.len(), 2);
    assert_eq!(body[1], Expr::Return);
    let Expr::Block(outer) = &body[0] else {
        panic!("expected a block");
    };
    let outer_list = list(func, outer.first);
    assert_eq!(outer_list.len(), 3);
    assert_eq!(outer_list[2], Expr::BrTable {
        targets:        vec![0, 1],
        default_target: 0,
    });
    let Expr::Loop(inner) = &outer_list[0] else {
        panic!("expected a loop");
    };
    assert_eq!(list(func, inner.first), vec![
        Expr::Const(Const::I32(0)),
        Expr::BrIf { depth: 1 },
        Expr::Br { depth: 0 },
    ]);
}

#[test]
fn test_empty_else_leaves_false_branch_absent() {
    let stream = single_function(&[], &[], |s| {
        instr(s, Opcode::If, Event::OnIfExpr { sig_types: vec![] });
        instr(s, Opcode::Nop, Event::OnNopExpr);
        instr(s, Opcode::Else, Event::OnElseExpr);
        end(s);
        instr(s, Opcode::Drop, Event::OnDropExpr);
    });
    let module = decode(&stream).unwrap();

    let func = &module.funcs[0];
    let body = list(func, func.first_expr);
    assert_eq!(body.len(), 2);
    assert_eq!(body[1], Expr::Drop);
    let Expr::If {
        true_block,
        false_first,
    } = &body[0]
    else {
        panic!("expected an if, got {:?}", body[0]);
    };
    assert_eq!(list(func, true_block.first), vec![Expr::Nop]);
    assert_eq!(*false_first, None);
}

#[test]
fn test_memory_immediates() {
    let stream = single_function(&[ValueType::I32], &[], |s| {
        instr(s, Opcode::GetLocal, Event::OnGetLocalExpr { local_index: 0 });
        instr(s, Opcode::I64Load, Event::OnLoadExpr {
            opcode:     Opcode::I64Load,
            align_log2: 3,
            offset:     16,
        });
        instr(s, Opcode::Drop, Event::OnDropExpr);
    });
    let module = decode(&stream).unwrap();

    let func = &module.funcs[0];
    let body = list(func, func.first_expr);
    let Expr::Load { opcode, memarg } = &body[1] else {
        panic!("expected a load");
    };
    assert_eq!(*opcode, Opcode::I64Load);
    assert_eq!(*memarg, MemArg {
        align_log2: 3,
        offset:     16,
    });
    assert_eq!(memarg.alignment().unwrap(), 8);
}

#[test]
fn test_scanner_error_continues_when_handler_allows() {
    let mut stream = single_function(&[], &[], |s| {
        instr(s, Opcode::Nop, Event::OnNopExpr);
    });
    let mut events: Vec<Event> = stream.iter().cloned().collect();
    events.insert(1, Event::Error {
        message: "unknown section 0x42".into(),
    });
    stream = events.into_iter().collect();

    let mut continue_all = |_: Option<usize>, _: &str| true;
    let module = wbr_decoder::read_binary_ast(&stream, &[], &ReadBinaryOptions::default(), &mut continue_all).unwrap();
    assert_eq!(module.funcs[0].body().count(), 1);

    let (result, errors) = decode_collecting(&stream);
    let error = result.unwrap_err();
    assert!(error.is_parse_error());
    assert_eq!(error.offset, Some(1));
    assert_eq!(errors, vec![(Some(1), "unknown section 0x42".to_string())]);
}

#[test]
fn test_body_count_mismatch() {
    let stream: EventStream = [
        Event::BeginModule { version: 1 },
        Event::OnType {
            index:        0,
            param_types:  vec![],
            result_types: vec![],
        },
        Event::OnFunction { index: 0, sig_index: 0 },
        Event::OnFunctionBodyCount { count: 2 },
    ]
    .into_iter()
    .collect();

    let error = decode(&stream).unwrap_err();
    assert_eq!(error.code, codes::BODY_COUNT_MISMATCH);
    assert_eq!(error.offset, Some(3));
}

#[test]
fn test_signature_index_checked() {
    let stream: EventStream = [
        Event::BeginModule { version: 1 },
        Event::OnFunction { index: 0, sig_index: 0 },
    ]
    .into_iter()
    .collect();

    let error = decode(&stream).unwrap_err();
    assert_eq!(error.code, codes::INDEX_OUT_OF_RANGE);
    assert_eq!(error.message(), "invalid signature index: 0 (count: 0)");
}
