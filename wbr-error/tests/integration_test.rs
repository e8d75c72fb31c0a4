//! Integration tests for wbr-error.

use pretty_assertions::assert_eq;
use wbr_error::{
    codes,
    kinds,
    Error,
    ErrorCategory,
    Result,
};

fn pop(depth: usize) -> Result<usize> {
    if depth == 0 {
        return Err(kinds::LabelStackUnderflow.into());
    }
    Ok(depth - 1)
}

#[test]
fn test_question_mark_propagation() {
    fn run() -> Result<usize> {
        let depth = pop(1)?;
        pop(depth)
    }

    let error = run().unwrap_err();
    assert_eq!(error.category, ErrorCategory::Structure);
    assert_eq!(error.code, codes::LABEL_STACK_UNDERFLOW);
    assert_eq!(error.message(), "popping empty label stack");
}

#[test]
fn test_kind_conversions_keep_categories() {
    let cases: Vec<(Error, ErrorCategory, u16)> = vec![
        (kinds::ElseWithoutIf.into(), ErrorCategory::Structure, codes::ELSE_WITHOUT_IF),
        (
            kinds::InitExprOutsideScope { event: "OnInitExprI32ConstExpr" }.into(),
            ErrorCategory::Structure,
            codes::INIT_EXPR_OUTSIDE_SCOPE,
        ),
        (
            kinds::BodyCountMismatch { declared: 2, bodies: 3 }.into(),
            ErrorCategory::Consistency,
            codes::BODY_COUNT_MISMATCH,
        ),
        (
            kinds::IndexOutOfRange { what: "type", index: 4, count: 1 }.into(),
            ErrorCategory::Consistency,
            codes::INDEX_OUT_OF_RANGE,
        ),
        (kinds::AppendFailed.into(), ErrorCategory::Resource, codes::APPEND_FAILED),
    ];

    for (error, category, code) in cases {
        assert_eq!(error.category, category, "{error}");
        assert_eq!(error.code, code, "{error}");
        assert_eq!(error.offset, None);
    }
}

#[test]
fn test_offset_is_rendered_in_hex() {
    let error: Error = kinds::NameCountExceedsItems {
        what:  "local",
        count: 4,
        items: 2,
    }
    .into();
    let error = error.at_offset(0x1f0);
    assert_eq!(
        error.to_string(),
        "[Consistency][E07D0] expected local name count (4) <= local count (2) @ 0x1f0"
    );
}

#[test]
fn test_parse_errors_come_from_the_scanner() {
    let error = Error::parse_error("unexpected end of section");
    assert!(error.is_parse_error());
    assert_eq!(error.code, codes::SCANNER_ERROR);
}
