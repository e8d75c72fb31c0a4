//! Property tests for tree reconstruction.

mod common;

use common::{
    decode,
    end,
    instr,
    module_with_bodies,
};
use proptest::prelude::*;
use wbr_decoder::{
    BinaryReaderAst,
    Expr,
    ExprId,
    Func,
};
use wbr_format::{
    Event,
    EventStream,
    Opcode,
};

/// Instruction nesting as a test-side tree
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Nop,
    Block(Vec<Shape>),
    Loop(Vec<Shape>),
    If(Vec<Shape>, Option<Vec<Shape>>),
}

impl Shape {
    fn depth(&self) -> usize {
        match self {
            Shape::Nop => 0,
            Shape::Block(body) | Shape::Loop(body) => 1 + max_depth(body),
            Shape::If(then, other) => {
                1 + max_depth(then).max(other.as_deref().map_or(0, max_depth))
            }
        }
    }

    /// An empty else arm decodes to no false list
    fn normalized(&self) -> Shape {
        match self {
            Shape::Nop => Shape::Nop,
            Shape::Block(body) => Shape::Block(normalize(body)),
            Shape::Loop(body) => Shape::Loop(normalize(body)),
            Shape::If(then, other) => Shape::If(
                normalize(then),
                other.as_deref().filter(|o| !o.is_empty()).map(normalize),
            ),
        }
    }
}

fn max_depth(shapes: &[Shape]) -> usize {
    shapes.iter().map(Shape::depth).max().unwrap_or(0)
}

fn normalize(shapes: &[Shape]) -> Vec<Shape> {
    shapes.iter().map(Shape::normalized).collect()
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = Just(Shape::Nop);
    leaf.prop_recursive(4, 32, 4, |inner| {
        let list = prop::collection::vec(inner, 0..4);
        prop_oneof![
            list.clone().prop_map(Shape::Block),
            list.clone().prop_map(Shape::Loop),
            (list.clone(), prop::option::of(list)).prop_map(|(t, f)| Shape::If(t, f)),
        ]
    })
}

fn body_strategy() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(shape_strategy(), 0..6)
}

fn emit(stream: &mut EventStream, shapes: &[Shape]) {
    for shape in shapes {
        match shape {
            Shape::Nop => instr(stream, Opcode::Nop, Event::OnNopExpr),
            Shape::Block(body) => {
                instr(stream, Opcode::Block, Event::OnBlockExpr { sig_types: vec![] });
                emit(stream, body);
                end(stream);
            }
            Shape::Loop(body) => {
                instr(stream, Opcode::Loop, Event::OnLoopExpr { sig_types: vec![] });
                emit(stream, body);
                end(stream);
            }
            Shape::If(then, other) => {
                instr(stream, Opcode::If, Event::OnIfExpr { sig_types: vec![] });
                emit(stream, then);
                if let Some(other) = other {
                    instr(stream, Opcode::Else, Event::OnElseExpr);
                    emit(stream, other);
                }
                end(stream);
            }
        }
    }
}

fn read_back(func: &Func, first: Option<ExprId>) -> Vec<Shape> {
    func.exprs
        .list(first)
        .map(|(_, expr)| match expr {
            Expr::Nop => Shape::Nop,
            Expr::Block(block) => Shape::Block(read_back(func, block.first)),
            Expr::Loop(block) => Shape::Loop(read_back(func, block.first)),
            Expr::If {
                true_block,
                false_first,
            } => Shape::If(
                read_back(func, true_block.first),
                false_first.map(|first| read_back(func, Some(first))),
            ),
            other => panic!("unexpected expression {other:?}"),
        })
        .collect()
}

fn functions(bodies: &[Vec<Shape>]) -> EventStream {
    module_with_bodies(&[], &[], bodies.len(), |s, index| emit(s, &bodies[index as usize]))
}

proptest! {
    #[test]
    fn test_tree_matches_nesting(body in body_strategy()) {
        let module = decode(&functions(&[body.clone()])).unwrap();
        let func = &module.funcs[0];
        prop_assert_eq!(read_back(func, func.first_expr), normalize(&body));
    }

    #[test]
    fn test_labels_balanced_after_body(body in body_strategy()) {
        let mut ignore = |_: Option<usize>, _: &str| false;
        let mut builder = BinaryReaderAst::new(&mut ignore);
        functions(&[body.clone()]).replay(&[], &mut builder, false).unwrap();

        prop_assert_eq!(builder.label_depth(), 0);
        prop_assert_eq!(builder.max_depth(), 1 + max_depth(&body));
    }

    #[test]
    fn test_decode_is_deterministic(body in body_strategy()) {
        let stream = functions(&[body]);
        prop_assert_eq!(decode(&stream).unwrap(), decode(&stream).unwrap());
    }

    #[test]
    fn test_counts_track_functions(bodies in prop::collection::vec(body_strategy(), 0..5)) {
        let module = decode(&functions(&bodies)).unwrap();
        let counts = module.counts();

        prop_assert_eq!(counts.types, 1);
        prop_assert_eq!(counts.funcs, bodies.len());
        prop_assert_eq!(counts.func_imports, 0);
        prop_assert_eq!(module.defined_funcs().len(), bodies.len());
        for (func, body) in module.funcs.iter().zip(&bodies) {
            prop_assert_eq!(read_back(func, func.first_expr), normalize(body));
        }
    }
}
