//! Productions, nonterminals, patterns, constructors and the expressions
//! built from them.

use super::SpecBuilder;
use crate::ids::{
    ConstructorId, FieldId, NtDefId, ObjectId, ParserTextId, PatternId, ProductionId,
};
use crate::model::{
    CodeBlock, ConsItem, ConsItemKind, Constructor, FieldInit, FieldKind, Identifier, LangElRef,
    LangExpr, LangTerm, LangVarRef, NamespaceQual, NtDef, ObjectKind, ParseKind, ParserText,
    Pattern, PatternItem, PatternItemKind, ProdEl, ProdElKind, Production, RepeatType, RhsVal,
    StringLiteral, TypeRef,
};
use proc_macro2::Span;

impl SpecBuilder {
    // ---- productions ------------------------------------------------------

    /// An element referring to a token or nonterminal by name.
    pub fn prod_el_name(
        &self,
        name: &Identifier,
        qual: Option<NamespaceQual>,
        capture: Option<FieldId>,
        repeat: RepeatType,
        commit: bool,
    ) -> ProdEl {
        let type_ref = TypeRef::named(name.span, name.text.clone())
            .with_qual(qual)
            .with_repeat(repeat);
        ProdEl::new(name.span, ProdElKind::Reference, type_ref, capture, commit)
    }

    /// An element matching a literal token.
    pub fn prod_el_literal(
        &self,
        lit: &StringLiteral,
        qual: Option<NamespaceQual>,
        capture: Option<FieldId>,
        repeat: RepeatType,
        commit: bool,
    ) -> ProdEl {
        let type_ref = TypeRef::literal(lit.span, lit.value.clone())
            .with_qual(qual)
            .with_repeat(repeat);
        ProdEl::new(lit.span, ProdElKind::Literal, type_ref, capture, commit)
    }

    /// Appends `el`, numbering it by its position in the list.
    pub fn append_prod_el(mut list: Vec<ProdEl>, mut el: ProdEl) -> Vec<ProdEl> {
        el.pos = list.len();
        list.push(el);
        list
    }

    pub fn production(
        &mut self,
        span: Span,
        mut elements: Vec<ProdEl>,
        name: Option<Identifier>,
        commit: bool,
        code_block: Option<CodeBlock>,
        pred_of: Option<LangElRef>,
    ) -> ProductionId {
        let id = ProductionId::next(self.spec.productions.len());
        for el in &mut elements {
            el.production = Some(id);
        }
        self.spec.productions.push(Production {
            id,
            span,
            name: name.map(|n| n.text),
            elements,
            commit,
            code_block,
            prod_num: id.index(),
            pred_of,
            nt_def: None,
        });
        id
    }

    /// Appends an alternative and numbers it by its position in the list.
    pub fn prod_append(
        &mut self,
        mut list: Vec<ProductionId>,
        prod: ProductionId,
    ) -> Vec<ProductionId> {
        self.spec.productions[prod.index()].prod_num = list.len();
        list.push(prod);
        list
    }

    /// The object a nonterminal's captures are declared in.
    pub fn new_object(&mut self, name: &Identifier) -> ObjectId {
        self.spec.alloc_object(ObjectKind::UserType, &name.text)
    }

    /// Registers a nonterminal over its alternatives and declares the
    /// captured elements as fields of `object`. A capture name used in
    /// several alternatives maps to one field with one binding per use.
    pub fn cfl_def(
        &mut self,
        name: &Identifier,
        object: ObjectId,
        def_list: Vec<ProductionId>,
        reduce_first: bool,
    ) -> NtDefId {
        let nspace = self.cur_namespace();
        let id = NtDefId::next(self.spec.nt_defs.len());
        for prod in &def_list {
            self.spec.productions[prod.index()].nt_def = Some(id);
        }

        let root = self.spec.object(object).root_scope;
        let captures: Vec<(ProductionId, usize, FieldId)> = def_list
            .iter()
            .flat_map(|prod| {
                self.spec
                    .production(*prod)
                    .elements
                    .iter()
                    .filter_map(move |el| el.capture.map(|field| (*prod, el.pos, field)))
            })
            .collect();

        for (prod, pos, capture) in captures {
            let name = self.spec.field(capture).name.clone();
            // TODO: report when a reused capture's element type differs.
            let field = match self.spec.scope(root).check_redecl(&name) {
                Some(existing) => existing,
                None => {
                    let type_ref = self.spec.production(prod).elements[pos].type_ref.clone();
                    self.spec.fields[capture.index()].type_ref = Some(type_ref);
                    self.spec.insert_field(root, capture);
                    capture
                }
            };
            self.spec.productions[prod.index()].elements[pos].capture = Some(field);

            let field = &mut self.spec.fields[field.index()];
            field.is_rhs_get = true;
            field.rhs_vals.push(RhsVal {
                production: prod,
                pos,
            });
        }

        self.spec.nt_defs.push(NtDef {
            id,
            span: name.span,
            name: name.text.clone(),
            namespace: nspace,
            context: self.cur_context(),
            reduce_first,
            object,
            productions: def_list,
        });
        self.spec.namespaces[nspace.index()].nt_defs.push(id);
        tracing::debug!(nonterminal = %name, id = %id, "defined nonterminal");
        id
    }

    /// Declares a field directly on an object.
    pub fn obj_var_def(&mut self, object: ObjectId, field: FieldId) {
        self.declare_object_field(object, field);
    }

    // ---- patterns ---------------------------------------------------------

    /// `[var:]name` inside a pattern.
    pub fn pattern_el_named(
        &self,
        parsed_var_ref: Option<LangVarRef>,
        qual: Option<NamespaceQual>,
        name: &Identifier,
        repeat: RepeatType,
    ) -> Vec<PatternItem> {
        let mut type_ref = TypeRef::named(name.span, name.text.clone())
            .with_qual(qual)
            .with_repeat(repeat);
        type_ref.parsed_var_ref = parsed_var_ref.map(Box::new);
        vec![pattern_type_item(name.span, type_ref)]
    }

    /// `[var:]'lit'` inside a pattern.
    pub fn pattern_el_type(
        &self,
        parsed_var_ref: Option<LangVarRef>,
        qual: Option<NamespaceQual>,
        lit: &StringLiteral,
        repeat: RepeatType,
    ) -> Vec<PatternItem> {
        let mut type_ref = TypeRef::literal(lit.span, lit.value.clone())
            .with_qual(qual)
            .with_repeat(repeat);
        type_ref.parsed_var_ref = parsed_var_ref.map(Box::new);
        vec![pattern_type_item(lit.span, type_ref)]
    }

    /// Verbatim input text inside a pattern.
    pub fn pattern_el_text(&self, span: Span, text: impl Into<String>) -> Vec<PatternItem> {
        vec![PatternItem {
            span,
            kind: PatternItemKind::InputText(text.into()),
            var_ref: None,
        }]
    }

    /// Binds `var_ref` to the head of `list` and declares it in the current
    /// scope, typed by the head element.
    pub fn cons_pattern_el(
        &mut self,
        var_ref: Option<LangVarRef>,
        mut list: Vec<PatternItem>,
    ) -> Vec<PatternItem> {
        if list.is_empty() {
            return list;
        }
        let head = &mut list[0];
        head.var_ref = var_ref.clone();

        if let Some(var_ref) = var_ref {
            if !self.variable_redeclared(var_ref.span, &var_ref.name) {
                let type_ref = head.prod_el().map(|el| el.type_ref.clone());
                let field = self.spec.alloc_field(
                    var_ref.span,
                    &var_ref.name,
                    FieldKind::UserLocal,
                    type_ref,
                );
                self.spec.insert_field(self.cur_scope, field);
            }
        }
        list
    }

    pub fn pat_list_concat(mut list: Vec<PatternItem>, rest: Vec<PatternItem>) -> Vec<PatternItem> {
        list.extend(rest);
        list
    }

    // ---- constructors -----------------------------------------------------

    /// A literal inside a constructor of type `cons_type`.
    pub fn cons_el_literal(
        &self,
        cons_type: TypeRef,
        lit: &StringLiteral,
        qual: Option<NamespaceQual>,
    ) -> Vec<ConsItem> {
        let type_ref =
            TypeRef::cons_literal(lit.span, cons_type, lit.value.clone()).with_qual(qual);
        let el = ProdEl::new(lit.span, ProdElKind::Literal, type_ref, None, false);
        vec![ConsItem {
            span: lit.span,
            kind: ConsItemKind::Literal(el),
        }]
    }

    pub fn cons_el_text(&self, span: Span, text: impl Into<String>) -> Vec<ConsItem> {
        vec![ConsItem {
            span,
            kind: ConsItemKind::InputText(text.into()),
        }]
    }

    pub fn cons_el_expr(&self, span: Span, expr: LangExpr) -> Vec<ConsItem> {
        vec![ConsItem {
            span,
            kind: ConsItemKind::Expr(expr),
        }]
    }

    pub fn cons_list_concat(mut list: Vec<ConsItem>, rest: Vec<ConsItem>) -> Vec<ConsItem> {
        list.extend(rest);
        list
    }

    // ---- expressions ------------------------------------------------------

    /// `match var [pattern]`
    pub fn match_pattern(
        &mut self,
        span: Span,
        var_ref: LangVarRef,
        list: Vec<PatternItem>,
    ) -> LangExpr {
        let pattern = self.alloc_pattern(span, list);
        LangExpr::term(LangTerm::Match {
            span,
            var_ref,
            pattern,
        })
    }

    /// `require var [pattern]`
    pub fn require_pattern(
        &mut self,
        span: Span,
        var_ref: LangVarRef,
        list: Vec<PatternItem>,
    ) -> LangExpr {
        let pattern = self.alloc_pattern(span, list);
        LangExpr::term(LangTerm::Require {
            span,
            var_ref,
            pattern,
        })
    }

    /// `construct type [items]`, optionally bound to a new variable.
    pub fn construct(
        &mut self,
        span: Span,
        field: Option<FieldId>,
        list: Vec<ConsItem>,
        type_ref: TypeRef,
        field_inits: Vec<FieldInit>,
    ) -> LangExpr {
        let constructor = self.alloc_constructor(span, list);
        let var_ref = field.map(|f| self.field_var_ref(f, self.cur_context()));

        if let Some(field) = field {
            self.declare_typed_variable(field, type_ref.clone());
        }

        LangExpr::term(LangTerm::Construct {
            span,
            var_ref,
            field,
            type_ref,
            field_inits,
            constructor,
        })
    }

    /// `send var [items]`
    pub fn send(
        &mut self,
        span: Span,
        var_ref: LangVarRef,
        list: Vec<ConsItem>,
        eof: bool,
    ) -> LangExpr {
        let parser_text = self.alloc_parser_text(span, list);
        LangExpr::term(LangTerm::Send {
            span,
            var_ref,
            parser_text,
            eof,
        })
    }

    /// `send_tree var [items]`
    pub fn send_tree(
        &mut self,
        span: Span,
        var_ref: LangVarRef,
        list: Vec<ConsItem>,
        eof: bool,
    ) -> LangExpr {
        let parser_text = self.alloc_parser_text(span, list);
        LangExpr::term(LangTerm::SendTree {
            span,
            var_ref,
            parser_text,
            eof,
        })
    }

    /// `parse`, `parse_tree` or `parse_stop`: constructs a parser for
    /// `type_ref`, feeds it `list` and yields the result. The parser may be
    /// bound to a new variable.
    pub fn parse_cmd(
        &mut self,
        span: Span,
        kind: ParseKind,
        field: Option<FieldId>,
        type_ref: TypeRef,
        field_inits: Vec<FieldInit>,
        list: Vec<ConsItem>,
    ) -> LangExpr {
        let constructor = self.alloc_constructor(span, Vec::new());
        let var_ref = field.map(|f| self.field_var_ref(f, self.cur_context()));
        let parser_type = TypeRef::parser(span, type_ref.clone());
        let parser_text = self.alloc_parser_text(span, list);

        if let Some(field) = field {
            self.declare_typed_variable(field, type_ref);
        }

        LangExpr::term(LangTerm::Parse {
            span,
            kind,
            var_ref,
            field,
            parser_type,
            field_inits,
            constructor,
            parser_text,
        })
    }

    fn declare_typed_variable(&mut self, field: FieldId, type_ref: TypeRef) {
        self.spec.fields[field.index()].type_ref = Some(type_ref);
        self.declare_variable(field);
    }

    fn alloc_pattern(&mut self, span: Span, items: Vec<PatternItem>) -> PatternId {
        let id = PatternId::next(self.spec.patterns.len());
        let pat_cons_id = self.spec.next_pat_cons_id();
        self.spec.patterns.push(Pattern {
            id,
            span,
            namespace: self.cur_namespace(),
            items,
            pat_cons_id,
        });
        id
    }

    fn alloc_constructor(&mut self, span: Span, items: Vec<ConsItem>) -> ConstructorId {
        let id = ConstructorId::next(self.spec.constructors.len());
        let pat_cons_id = self.spec.next_pat_cons_id();
        self.spec.constructors.push(Constructor {
            id,
            span,
            namespace: self.cur_namespace(),
            items,
            pat_cons_id,
        });
        id
    }

    fn alloc_parser_text(&mut self, span: Span, items: Vec<ConsItem>) -> ParserTextId {
        let id = ParserTextId::next(self.spec.parser_texts.len());
        self.spec.parser_texts.push(ParserText {
            id,
            span,
            namespace: self.cur_namespace(),
            items,
        });
        id
    }
}

fn pattern_type_item(span: Span, type_ref: TypeRef) -> PatternItem {
    PatternItem {
        span,
        kind: PatternItemKind::TypeRef(ProdEl::new(
            span,
            ProdElKind::Reference,
            type_ref,
            None,
            false,
        )),
        var_ref: None,
    }
}
