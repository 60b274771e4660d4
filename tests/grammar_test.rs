mod common;

use common::{ident, lit};
use gramspec::ids::ProductionId;
use gramspec::model::{
    ConsItemKind, FieldKind, LangElRef, LangExpr, LangTerm, ParseKind, ProdEl, RepeatType,
    TypeRef, TypeRefKind,
};
use gramspec::testing::{DiagnosticsExt, Testable};
use gramspec::{DiagnosticKind, SpecBuilder};
use proc_macro2::Span;

/// `name: item*` alternatives of a nonterminal, each capturing its first element.
fn define_list(
    b: &mut SpecBuilder,
    name: &str,
    alternatives: &[&[&str]],
) -> gramspec::ids::NtDefId {
    let object = b.new_object(&ident(name));
    let mut prods: Vec<ProductionId> = Vec::new();
    for elements in alternatives {
        let mut list: Vec<ProdEl> = Vec::new();
        for (i, el) in elements.iter().enumerate() {
            let capture =
                (i == 0).then(|| b.object_field(&ident("head"), FieldKind::RhsCapture, None));
            let el = if el.starts_with('\'') {
                b.prod_el_literal(&lit(el), None, capture, RepeatType::Bare, false)
            } else {
                b.prod_el_name(&ident(el), None, capture, RepeatType::Bare, false)
            };
            list = SpecBuilder::append_prod_el(list, el);
        }
        let prod = b.production(Span::call_site(), list, None, false, None, None);
        prods = b.prod_append(prods, prod);
    }
    b.cfl_def(&ident(name), object, prods, false)
}

#[test]
fn test_nonterminal_alternatives() {
    let spec = gramspec::build(|b| {
        define_list(b, "stmt", &[&["expr", "';'"], &["block"], &["'return'", "expr", "';'"]]);
        define_list(b, "block", &[&["'{'", "stmt", "'}'"]]);
        Ok(())
    })
    .test()
    .assert_success();

    let stmt = &spec.nt_defs[0];
    assert_eq!(stmt.productions.len(), 3);
    for (i, prod) in stmt.productions.iter().enumerate() {
        let prod = spec.production(*prod);
        assert_eq!(prod.prod_num, i);
        assert_eq!(prod.id.index(), i);
        let positions: Vec<_> = prod.elements.iter().map(|e| e.pos).collect();
        assert_eq!(positions, (0..prod.elements.len()).collect::<Vec<_>>());
    }

    // block's only alternative follows stmt's three in the global list
    let block = &spec.nt_defs[1];
    assert_eq!(block.productions, vec![ProductionId::new(3)]);
    assert_eq!(spec.production(block.productions[0]).prod_num, 0);

    let root = spec.root_namespace().id;
    assert_eq!(spec.find_nt_def(root, "block").map(|nt| nt.id), Some(block.id));
    assert!(spec.find_nt_def(root, "expr").is_none());
}

#[test]
fn test_captures_shared_across_alternatives() {
    let mut b = SpecBuilder::new();
    let nt = define_list(&mut b, "value", &[&["number"], &["string"], &["'null'"]]);
    let spec = b.finish().test().assert_success();

    let object = spec.nt_def(nt).object;
    let head = spec.object_field(object, "head").unwrap();
    assert!(head.is_rhs_get);
    assert_eq!(head.rhs_vals.len(), 3);
    // the first alternative decides the declared type
    assert_eq!(head.type_ref.as_ref().unwrap().text(), "number");
    assert!(head.rhs_vals.iter().all(|v| v.pos == 0));
}

#[test]
fn test_predicate_production() {
    let mut b = SpecBuilder::new();
    let tok = b
        .define_token(gramspec::TokenDecl::token(ident("kw"), None))
        .unwrap();
    let prod = b.production(
        Span::call_site(),
        Vec::new(),
        Some(ident("guard")),
        true,
        None,
        Some(LangElRef::Token(tok)),
    );
    let prod = b.spec().production(prod);
    assert_eq!(prod.name.as_deref(), Some("guard"));
    assert!(prod.commit);
    assert_eq!(prod.pred_of, Some(LangElRef::Token(tok)));
}

#[test]
fn test_match_binds_pattern_variables() {
    let mut b = SpecBuilder::new();
    b.block_open();
    let scope = b.push_scope();

    let name_var = b.var_ref(&ident("name"));
    let first = b.pattern_el_named(None, None, &ident("id"), RepeatType::Bare);
    let first = b.cons_pattern_el(Some(name_var), first);
    let middle = b.pattern_el_text(Span::call_site(), " = ");
    let value_var = b.var_ref(&ident("value"));
    let last = b.pattern_el_named(None, None, &ident("expr"), RepeatType::Star);
    let last = b.cons_pattern_el(Some(value_var), last);
    let items = SpecBuilder::pat_list_concat(SpecBuilder::pat_list_concat(first, middle), last);

    let target = b.var_ref(&ident("input"));
    let expr = b.match_pattern(Span::call_site(), target, items);

    let pattern = match expr.as_term() {
        Some(LangTerm::Match { pattern, .. }) => b.spec().pattern(*pattern),
        other => panic!("unexpected term: {:?}", other),
    };
    assert_eq!(pattern.items.len(), 3);
    assert!(pattern.items[1].prod_el().is_none());

    let value = b.spec().scope_field(scope, "value").unwrap();
    let ty = value.type_ref.as_ref().unwrap();
    assert_eq!(ty.text(), "expr");
    assert_eq!(ty.repeat, RepeatType::Star);
    assert!(b.spec().scope_field(scope, "name").is_some());

    b.pop_scope().unwrap();
    b.block_close();
    b.diagnostics().assert_clean();
}

#[test]
fn test_pattern_variable_redeclared() {
    let mut b = SpecBuilder::new();
    let existing = b.object_field(&ident("x"), FieldKind::UserLocal, None);
    b.var_def(existing, None);

    let x = b.var_ref(&ident("x"));
    let items = b.pattern_el_type(None, None, &lit("'+'"), RepeatType::Bare);
    b.cons_pattern_el(Some(x), items);
    b.diagnostics().assert_reported(DiagnosticKind::Duplicate, "variable x redeclared");

    let field = b.spec().scope_field(b.cur_scope(), "x").unwrap();
    assert_eq!(field.id, existing);
}

#[test]
fn test_pattern_typed_by_parsed_variable() {
    let b = SpecBuilder::new();
    let parsed = b.var_ref(&ident("p"));
    let items = b.pattern_el_named(Some(parsed), None, &ident("word"), RepeatType::Opt);
    let type_ref = &items[0].prod_el().unwrap().type_ref;
    assert_eq!(type_ref.parsed_var_ref.as_ref().unwrap().name, "p");
    assert_eq!(type_ref.repeat, RepeatType::Opt);
}

#[test]
fn test_construct_with_literal_and_expression() {
    let mut b = SpecBuilder::new();
    let target = TypeRef::named(Span::call_site(), "assign");
    let head = b.cons_el_literal(target.clone(), &lit("'let'"), None);
    let value = b.var_ref(&ident("rhs"));
    let tail = b.cons_el_expr(Span::call_site(), LangExpr::term(LangTerm::Var(value)));
    let items = SpecBuilder::cons_list_concat(head, tail);

    let field = b.object_field(&ident("tree"), FieldKind::UserLocal, None);
    let expr = b.construct(Span::call_site(), Some(field), items, target, Vec::new());

    let constructor = match expr.as_term() {
        Some(LangTerm::Construct { constructor, .. }) => b.spec().constructor(*constructor),
        other => panic!("unexpected term: {:?}", other),
    };
    assert_eq!(constructor.items.len(), 2);
    match &constructor.items[0].kind {
        ConsItemKind::Literal(el) => match &el.type_ref.kind {
            TypeRefKind::ConsLiteral { cons, literal } => {
                assert_eq!(cons.text(), "assign");
                assert_eq!(literal, "'let'");
            }
            other => panic!("unexpected type: {:?}", other),
        },
        other => panic!("unexpected item: {:?}", other),
    }
    assert!(matches!(constructor.items[1].kind, ConsItemKind::Expr(_)));

    let tree = b.spec().scope_field(b.cur_scope(), "tree").unwrap();
    assert_eq!(tree.type_ref.as_ref().unwrap().text(), "assign");
}

#[test]
fn test_parse_forms() {
    let mut b = SpecBuilder::new();
    let kinds = [ParseKind::Parse, ParseKind::ParseTree, ParseKind::ParseStop];
    for kind in kinds {
        let items = b.cons_el_text(Span::call_site(), "input text");
        let expr = b.parse_cmd(
            Span::call_site(),
            kind,
            None,
            TypeRef::named(Span::call_site(), "doc"),
            Vec::new(),
            items,
        );
        match expr.as_term() {
            Some(LangTerm::Parse { kind: got, var_ref, parser_type, .. }) => {
                assert_eq!(*got, kind);
                assert!(var_ref.is_none());
                assert_eq!(parser_type.text(), "doc");
            }
            other => panic!("unexpected term: {:?}", other),
        }
    }
    let spec = b.finish().test().assert_success();
    assert_eq!(spec.constructors.len(), 3);
    assert_eq!(spec.parser_texts.len(), 3);
    assert!(spec.constructors.iter().all(|c| c.items.is_empty()));
}

#[test]
fn test_parse_variable_redeclared() {
    let mut b = SpecBuilder::new();
    for _ in 0..2 {
        let field = b.object_field(&ident("parser"), FieldKind::UserLocal, None);
        b.parse_cmd(
            Span::call_site(),
            ParseKind::Parse,
            Some(field),
            TypeRef::named(Span::call_site(), "doc"),
            Vec::new(),
            Vec::new(),
        );
    }
    b.diagnostics()
        .assert_reported(DiagnosticKind::Duplicate, "variable parser redeclared");
    b.finish()
        .test()
        .assert_failure_contains("variable parser redeclared");
}
