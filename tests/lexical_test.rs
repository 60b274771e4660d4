mod common;

use common::{ident, text_join};
use gramspec::model::{
    AugType, LexExpression, LexFactor, LexFactorAug, LexFactorNeg, LexFactorRep, LexJoin, LexTerm,
    Literal, LiteralKind, ReOrBlock, ReOrItem,
};
use gramspec::testing::{DiagnosticsExt, Testable};
use gramspec::{DiagnosticKind, SpecBuilder, TokenDecl};
use proc_macro2::Span;

fn data(s: &str) -> ReOrItem {
    ReOrItem::Data(s.to_string())
}

#[test]
fn test_long_character_class_stays_shallow() {
    let b = SpecBuilder::new();
    let mut block = ReOrBlock::Empty;
    for c in 'a'..='z' {
        block = b.lex_regular_expr_data(block, data(&c.to_string()));
    }
    assert_eq!(block.depth(), 2);
    assert_eq!(block.items(), vec![&data("abcdefghijklmnopqrstuvwxyz")]);
}

#[test]
fn test_identifier_token_with_repetition() {
    // id = [a-z] [a-z0-9]*
    let spec = gramspec::build(|b| {
        b.push_region_set(Span::call_site());

        let head = ReOrBlock::RecurseItem(Box::new(ReOrBlock::Empty), ReOrItem::Range('a', 'z'));
        let tail = b.lex_regular_expr_data(head.clone(), ReOrItem::Range('0', '9'));
        let first = LexFactorAug::from_factor(b.lex_factor_or_block(head, false));
        let rest = LexFactorRep::Star(Box::new(LexFactorRep::from(LexFactorNeg::from(
            b.lex_factor_or_block(tail, false),
        ))));
        let term = LexTerm::from(first).concat(LexFactorAug::from(rest));
        let join = LexJoin::from(LexExpression::from(term));

        b.define_token(TokenDecl::token(ident("id"), Some(join)));
        b.pop_region_set()?;
        Ok(())
    })
    .test()
    .assert_success();

    let join = spec.join(spec.token_defs[0].join.unwrap());
    match &join.expr {
        LexExpression::Term(LexTerm::Concat(_, aug)) => {
            assert!(matches!(aug.factor_rep, LexFactorRep::Star(_)));
        }
        other => panic!("unexpected expression: {:?}", other),
    }
}

#[test]
fn test_bounded_repetition_counts() {
    let mut b = SpecBuilder::new();
    let low = b.lex_factor_rep_num(Span::call_site(), "2");
    let high = b.lex_factor_rep_num(Span::call_site(), "4");
    let factor = LexFactorRep::from(LexFactorNeg::from(b.lex_factor_literal(Literal::string(
        Span::call_site(),
        "'x'",
    ))));
    let rep = LexFactorRep::Range(Box::new(factor), low, high);
    assert!(matches!(rep, LexFactorRep::Range(_, 2, 4)));
    b.diagnostics().assert_clean();
}

#[test]
fn test_overflowing_repetition_count() {
    let mut b = SpecBuilder::new();
    let rep = b.lex_factor_rep_num(Span::call_site(), "4294967296");
    assert_eq!(rep, 1);
    b.diagnostics().assert_reported(
        DiagnosticKind::MalformedLiteral,
        "repetition number 4294967296 overflows",
    );
}

#[test]
fn test_repetition_count_must_be_decimal() {
    let mut b = SpecBuilder::new();
    assert_eq!(b.lex_factor_rep_num(Span::call_site(), "0x10"), 1);
    b.diagnostics().assert_reported(
        DiagnosticKind::MalformedLiteral,
        "repetition number 0x10 is not a decimal count",
    );
}

#[test]
fn test_labelled_capture_numbers_marks_globally() {
    let mut b = SpecBuilder::new();
    let context = b.lex_opt_join(text_join("'a'"), Some(text_join("'b'")));
    let aug = LexFactorAug::from_factor(b.lex_factor_paren(context));
    let aug = b.lex_factor_label(&ident("body"), aug);

    let marks: Vec<_> = b.spec().actions.iter().map(|a| a.mark).collect();
    assert_eq!(marks, vec![0, 1, 2]);
    assert_eq!(aug.actions[0].aug, AugType::Start);
    assert_eq!(aug.captures.len(), 1);
    assert_eq!(b.spec().field(aug.captures[0].field).name, "body");
}

#[test]
fn test_trailing_context_kept_out_of_expression() {
    let mut b = SpecBuilder::new();
    let join = b.lex_opt_join(text_join("'if'"), Some(text_join("' '")));
    let context = join.context.as_ref().unwrap();
    assert!(matches!(
        context.expr,
        LexExpression::Term(LexTerm::FactorAug(_))
    ));
    assert!(join.mark.is_some());
}

#[test]
fn test_unknown_graph_reference_recovers() {
    gramspec::build(|b| {
        b.push_region_set(Span::call_site());
        let factor = b.lex_rl_factor_name(&ident("undefined"));
        assert!(factor.is_none());
        // the walker substitutes a placeholder and keeps going
        b.define_token(TokenDecl::token(ident("after"), Some(text_join("'z'"))));
        b.pop_region_set()?;
        Ok(())
    })
    .test()
    .assert_failure_contains("graph lookup of \"undefined\" failed");
}

#[test]
fn test_instantiated_graph_not_composable() {
    let mut b = SpecBuilder::new();
    b.instance_def(&ident("main"), text_join("'m'")).unwrap();
    assert!(b.lex_rl_factor_name(&ident("main")).is_none());
    b.diagnostics().assert_reported(
        DiagnosticKind::Unresolved,
        "references to graph instantiations not allowed in expressions",
    );
    assert!(b.spec().root_namespace().find_graph("main").unwrap().is_instance);
}

#[test]
fn test_duplicate_regular_definition_keeps_first() {
    let mut b = SpecBuilder::new();
    let first = b.regular_def(&ident("ws"), text_join("' '")).unwrap();
    assert!(b.regular_def(&ident("ws"), text_join("'\\t'")).is_none());
    b.diagnostics()
        .assert_reported(DiagnosticKind::Duplicate, "regular definition \"ws\" already exists");

    match b.lex_rl_factor_name(&ident("ws")) {
        Some(LexFactor::Reference { def, .. }) => assert_eq!(def, first),
        other => panic!("unexpected factor: {:?}", other),
    }
}

#[test]
fn test_numeric_range_bounds() {
    let b = SpecBuilder::new();
    let low = Literal::number(Span::call_site(), "48");
    let high = Literal::number(Span::call_site(), "57");
    match b.lex_factor_range(low, high) {
        LexFactor::Range(low, high) => {
            assert_eq!((low.kind, low.data.as_str()), (LiteralKind::Number, "48"));
            assert_eq!((high.kind, high.data.as_str()), (LiteralKind::Number, "57"));
        }
        other => panic!("unexpected factor: {:?}", other),
    }
}
