//! Variable declarations, contexts, functions and precedence.

use super::SpecBuilder;
use crate::diagnostic::{internal_error, DiagnosticKind};
use crate::ids::{ContextId, FieldId, FunctionId, ObjectId, ScopeId, TypeAliasId};
use crate::model::{
    CodeBlock, Context, ContextDef, FieldKind, Function, Identifier, IterCall, LangExpr, LangStmt,
    NamespaceQual, ObjectKind, PredDecl, PredType, StringLiteral, TypeAlias, TypeRef,
};
use syn::Result;

impl SpecBuilder {
    // ---- variables --------------------------------------------------------

    /// Declares a local in the current scope. Returns the initializing
    /// assignment when there is one.
    pub fn var_def(&mut self, field: FieldId, expr: Option<LangExpr>) -> Option<LangStmt> {
        self.declare_variable(field);
        let expr = expr?;
        Some(LangStmt::Assign {
            span: self.spec.field(field).span,
            var_ref: self.field_var_ref(field, self.cur_context()),
            expr,
        })
    }

    /// Declares a global: a field of the open context's object, or of the
    /// global object outside contexts.
    pub fn global_def(&mut self, field: FieldId, expr: Option<LangExpr>) -> Option<LangStmt> {
        let context = self.cur_context();
        let object = match context {
            Some(context) => {
                self.spec.fields[field.index()].context = Some(context);
                self.spec.context(context).object
            }
            None => self.spec.global_object,
        };
        self.declare_object_field(object, field);

        let expr = expr?;
        Some(LangStmt::Assign {
            span: self.spec.field(field).span,
            var_ref: self.field_var_ref(field, context),
            expr,
        })
    }

    /// Declares an exported global. Context variables cannot be exported.
    pub fn export_stmt(&mut self, field: FieldId, expr: Option<LangExpr>) -> Option<LangStmt> {
        let span = self.spec.field(field).span;
        if self.cur_context().is_some() {
            self.error(
                DiagnosticKind::Structural,
                span,
                "cannot export parser context variables",
            );
            return None;
        }

        let global = self.spec.global_object;
        if self.declare_object_field(global, field) {
            self.spec.fields[field.index()].is_export = true;
        }

        let expr = expr?;
        Some(LangStmt::Assign {
            span,
            var_ref: self.field_var_ref(field, None),
            expr,
        })
    }

    /// Declares a field of the open context.
    pub fn context_var_def(&mut self, span: proc_macro2::Span, field: FieldId) -> Result<()> {
        let context = self
            .cur_context()
            .ok_or_else(|| syn::Error::new(span, "internal error: no context stack items found"))?;
        self.spec.fields[field.index()].context = Some(context);
        let object = self.spec.context(context).object;
        self.declare_object_field(object, field);
        Ok(())
    }

    // ---- contexts ---------------------------------------------------------

    /// Opens `context name { ... }`: a namespace of the same name, a context
    /// and the object holding its variables.
    pub fn context_head(&mut self, name: &Identifier) -> ContextId {
        let nspace = self.create_namespace(name);
        let object = self.spec.alloc_object(ObjectKind::UserType, &name.text);

        let id = ContextId::next(self.spec.contexts.len());
        self.spec.contexts.push(Context {
            id,
            span: name.span,
            namespace: nspace,
            object,
        });
        self.context_stack.push(id);
        self.spec.namespaces[nspace.index()].context_defs.push(ContextDef {
            name: name.text.clone(),
            context: id,
        });
        tracing::debug!(context = %name, id = %id, namespace = %nspace, "opened context");
        id
    }

    /// Closes the innermost context and its namespace.
    pub fn context_close(&mut self) -> Result<ContextId> {
        let context = self
            .context_stack
            .pop()
            .ok_or_else(|| internal_error("context stack is empty"))?;
        self.close_namespace()?;
        Ok(context)
    }

    // ---- loops and functions ----------------------------------------------

    /// `for name: type in iter(...) { stmts }`. The loop variable is untyped
    /// until the iterator is resolved.
    pub fn for_scope(
        &mut self,
        name: &Identifier,
        scope: ScopeId,
        type_ref: TypeRef,
        iter_call: IterCall,
        stmts: Vec<LangStmt>,
    ) -> LangStmt {
        let field = self.spec.alloc_field(name.span, &name.text, FieldKind::UserLocal, None);
        self.declare_variable(field);

        LangStmt::ForIter {
            span: name.span,
            field,
            type_ref,
            iter_call,
            stmts,
            context: self.cur_context(),
            scope,
        }
    }

    pub fn function_def(
        &mut self,
        stmts: Vec<LangStmt>,
        local_frame: ObjectId,
        params: Vec<FieldId>,
        type_ref: Option<TypeRef>,
        name: &Identifier,
        export: bool,
    ) -> FunctionId {
        let in_context = self.cur_context();
        self.alloc_function(Function {
            id: FunctionId::next(self.spec.functions.len()),
            name: name.text.clone(),
            type_ref,
            params,
            code_block: CodeBlock {
                stmts,
                local_frame,
                context: in_context,
            },
            is_iter: false,
            export,
            in_context,
        })
    }

    /// Iterators have no return type and are never bound to a context.
    pub fn iter_def(
        &mut self,
        stmts: Vec<LangStmt>,
        local_frame: ObjectId,
        params: Vec<FieldId>,
        name: &Identifier,
    ) -> FunctionId {
        self.alloc_function(Function {
            id: FunctionId::next(self.spec.functions.len()),
            name: name.text.clone(),
            type_ref: None,
            params,
            code_block: CodeBlock {
                stmts,
                local_frame,
                context: None,
            },
            is_iter: true,
            export: false,
            in_context: None,
        })
    }

    fn alloc_function(&mut self, function: Function) -> FunctionId {
        let id = function.id;
        tracing::debug!(function = %function.name, iter = function.is_iter, "defined function");
        self.spec.functions.push(function);
        id
    }

    /// Appends a statement; declarations without an initializer yield none.
    pub fn append_statement(mut list: Vec<LangStmt>, stmt: Option<LangStmt>) -> Vec<LangStmt> {
        list.extend(stmt);
        list
    }

    pub fn append_param(mut list: Vec<FieldId>, field: FieldId) -> Vec<FieldId> {
        list.push(field);
        list
    }

    pub fn add_param(
        &mut self,
        name: &Identifier,
        kind: FieldKind,
        type_ref: Option<TypeRef>,
    ) -> FieldId {
        let field = self.object_field(name, kind, type_ref);
        self.spec.fields[field.index()].is_param = true;
        field
    }

    // ---- declarations -----------------------------------------------------

    /// `alias name type`
    pub fn alias(&mut self, name: &Identifier, type_ref: TypeRef) -> TypeAliasId {
        let nspace = self.cur_namespace();
        let id = TypeAliasId::next(self.spec.type_aliases.len());
        self.spec.type_aliases.push(TypeAlias {
            id,
            span: name.span,
            namespace: nspace,
            name: name.text.clone(),
            type_ref,
        });
        self.spec.namespaces[nspace.index()].type_aliases.push(id);
        id
    }

    /// A token named in a precedence statement, at the current level.
    pub fn pred_token_name(&self, qual: Option<NamespaceQual>, name: &Identifier) -> PredDecl {
        PredDecl {
            type_ref: TypeRef::named(name.span, name.text.clone()).with_qual(qual),
            pred_value: self.spec.pred_value,
            pred_type: None,
        }
    }

    /// A literal named in a precedence statement, at the current level.
    pub fn pred_token_lit(&self, lit: &StringLiteral, qual: Option<NamespaceQual>) -> PredDecl {
        PredDecl {
            type_ref: TypeRef::literal(lit.span, lit.value.clone()).with_qual(qual),
            pred_value: self.spec.pred_value,
            pred_type: None,
        }
    }

    /// `left`, `right` or `nonassoc`. Each statement opens a new level.
    pub fn precedence_stmt(&mut self, pred_type: PredType, decls: Vec<PredDecl>) {
        self.spec.pred_decls.extend(decls.into_iter().map(|mut decl| {
            decl.pred_type = Some(pred_type);
            decl
        }));
        self.spec.pred_value += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LangTerm;
    use proc_macro2::Span;

    fn ident(s: &str) -> Identifier {
        Identifier::new(s, Span::call_site())
    }

    fn number(n: &str) -> LangExpr {
        LangExpr::term(LangTerm::Number(Span::call_site(), n.to_string()))
    }

    #[test]
    fn test_var_def_with_initializer() {
        let mut b = SpecBuilder::new();
        let field = b.object_field(&ident("count"), FieldKind::UserLocal, None);
        match b.var_def(field, Some(number("0"))) {
            Some(LangStmt::Assign { var_ref, .. }) => {
                assert_eq!(var_ref.name, "count");
                assert_eq!(var_ref.scope, b.cur_scope());
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_global_def_targets_global_object() {
        let mut b = SpecBuilder::new();
        let field = b.object_field(&ident("g"), FieldKind::UserField, None);
        assert!(b.global_def(field, None).is_none());
        let global = b.spec().global_object;
        assert!(b.spec().object_field(global, "g").is_some());

        let dup = b.object_field(&ident("g"), FieldKind::UserField, None);
        b.global_def(dup, None);
        let diag = b.diagnostics().iter().next().unwrap();
        assert_eq!(diag.kind, DiagnosticKind::Duplicate);
        assert!(diag.message.contains("object field g renamed"));
    }

    #[test]
    fn test_global_def_inside_context() {
        let mut b = SpecBuilder::new();
        let ctx = b.context_head(&ident("lexer"));
        let field = b.object_field(&ident("depth"), FieldKind::UserField, None);
        let stmt = b.global_def(field, Some(number("1")));
        b.context_close().unwrap();

        let object = b.spec().context(ctx).object;
        assert_eq!(b.spec().object_field(object, "depth").unwrap().context, Some(ctx));
        let global = b.spec().global_object;
        assert!(b.spec().object_field(global, "depth").is_none());
        match stmt {
            Some(LangStmt::Assign { var_ref, .. }) => assert_eq!(var_ref.context, Some(ctx)),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_export_rejected_inside_context() {
        let mut b = SpecBuilder::new();
        b.context_head(&ident("c"));
        let field = b.object_field(&ident("e"), FieldKind::UserField, None);
        assert!(b.export_stmt(field, Some(number("1"))).is_none());
        b.context_close().unwrap();
        assert_eq!(b.diagnostics().count(DiagnosticKind::Structural), 1);

        let field = b.object_field(&ident("e"), FieldKind::UserField, None);
        assert!(b.export_stmt(field, Some(number("1"))).is_some());
        assert!(b.spec().field(field).is_export);
    }

    #[test]
    fn test_context_var_def_requires_context() {
        let mut b = SpecBuilder::new();
        let field = b.object_field(&ident("v"), FieldKind::UserField, None);
        assert!(b.context_var_def(Span::call_site(), field).is_err());

        let ctx = b.context_head(&ident("c"));
        b.context_var_def(Span::call_site(), field).unwrap();
        assert_eq!(b.spec().field(field).context, Some(ctx));
        b.context_close().unwrap();
        assert!(b.context_close().is_err());
    }

    #[test]
    fn test_context_head_opens_namespace() {
        let mut b = SpecBuilder::new();
        let ctx = b.context_head(&ident("parse_ctx"));
        let nspace = b.cur_namespace();
        assert_eq!(b.cur_context(), Some(ctx));
        assert_eq!(b.spec().namespace(nspace).name, "parse_ctx");
        assert_eq!(b.spec().namespace(nspace).context_defs[0].context, ctx);
        b.context_close().unwrap();
        assert_eq!(b.cur_namespace(), b.spec().root_namespace().id);
        assert_eq!(b.cur_context(), None);
    }

    #[test]
    fn test_for_scope_declares_untyped_variable() {
        let mut b = SpecBuilder::new();
        let scope = b.push_scope();
        let iter_call = IterCall {
            span: Span::call_site(),
            iter: b.var_ref(&ident("child")),
            args: Vec::new(),
        };
        let stmt = b.for_scope(
            &ident("item"),
            scope,
            TypeRef::named(Span::call_site(), "node"),
            iter_call,
            Vec::new(),
        );
        assert!(matches!(stmt, LangStmt::ForIter { .. }));
        let field = b.spec().scope_field(scope, "item").unwrap();
        assert!(field.type_ref.is_none());
        b.pop_scope().unwrap();
    }

    #[test]
    fn test_functions() {
        let mut b = SpecBuilder::new();
        let frame = b.block_open();
        let int = TypeRef::named(Span::call_site(), "int");
        let p = b.add_param(&ident("n"), FieldKind::ParamVal, Some(int));
        let params = SpecBuilder::append_param(Vec::new(), p);
        let stmts = SpecBuilder::append_statement(Vec::new(), None);
        let f = b.function_def(stmts, frame, params, None, &ident("double"), true);
        b.block_close();

        let frame = b.block_open();
        let it = b.iter_def(Vec::new(), frame, Vec::new(), &ident("walk"));
        b.block_close();

        assert!(b.spec().field(p).is_param);
        let f = b.spec().function(f);
        assert!(f.export && !f.is_iter);
        assert_eq!(f.params, vec![p]);
        assert!(b.spec().function(it).is_iter);
    }

    #[test]
    fn test_precedence_levels() {
        let mut b = SpecBuilder::new();
        let plus = b.pred_token_lit(&StringLiteral::new("'+'", Span::call_site()), None);
        let minus = b.pred_token_name(None, &ident("MINUS"));
        b.precedence_stmt(PredType::Left, vec![plus, minus]);
        let times = b.pred_token_lit(&StringLiteral::new("'*'", Span::call_site()), None);
        b.precedence_stmt(PredType::Right, vec![times]);

        let levels: Vec<_> = b.spec().pred_decls.iter().map(|d| d.pred_value).collect();
        assert_eq!(levels, vec![0, 0, 1]);
        assert_eq!(b.spec().pred_decls[2].pred_type, Some(PredType::Right));
    }

    #[test]
    fn test_alias() {
        let mut b = SpecBuilder::new();
        let word = TypeRef::named(Span::call_site(), "word");
        let id = b.alias(&ident("words"), TypeRef::list(Span::call_site(), word));
        assert_eq!(b.spec().root_namespace().type_aliases, vec![id]);
        assert_eq!(b.spec().type_alias(id).type_ref.text(), "word");
    }
}
