//! Region sets, token and literal declarations, regular definitions.

use super::SpecBuilder;
use crate::diagnostic::{internal_error, DiagnosticKind};
use crate::ids::{
    JoinId, LexDefId, NamespaceId, ObjectId, RegionId, RegionSetId, TokenDefId, TokenInstanceId,
};
use crate::model::{
    CodeBlock, GraphDictEl, Identifier, LangStmt, LexDefinition, LexJoin, ObjectKind, RegionSet,
    StringLiteral, TokenDef, TokenInstance,
};
use proc_macro2::Span;
use syn::Result;

/// A token declaration as handed over by the walker.
#[derive(Debug, Clone)]
pub struct TokenDecl {
    pub span: Span,
    /// Anonymous ignore tokens get a generated name.
    pub name: Option<Identifier>,
    /// Predicate and forward declarations have no regex.
    pub join: Option<LexJoin>,
    pub object: Option<ObjectId>,
    pub trans_block: Option<CodeBlock>,
    pub ignore: bool,
    pub no_pre_ignore: bool,
    pub no_post_ignore: bool,
}

impl TokenDecl {
    pub fn token(name: Identifier, join: Option<LexJoin>) -> Self {
        Self {
            span: name.span,
            name: Some(name),
            join,
            object: None,
            trans_block: None,
            ignore: false,
            no_pre_ignore: false,
            no_post_ignore: false,
        }
    }

    pub fn ignore(span: Span, name: Option<Identifier>, join: LexJoin) -> Self {
        Self {
            span,
            name,
            join: Some(join),
            object: None,
            trans_block: None,
            ignore: true,
            no_pre_ignore: false,
            no_post_ignore: false,
        }
    }

    pub fn with_object(mut self, object: ObjectId) -> Self {
        self.object = Some(object);
        self
    }
}

impl SpecBuilder {
    /// Opens a scanner block: three region implementations and the four
    /// regions built over them.
    pub fn push_region_set(&mut self, span: Span) -> RegionSetId {
        let impl_token_ignore = self.spec.alloc_region_impl();
        let impl_token_only = self.spec.alloc_region_impl();
        let impl_ignore_only = self.spec.alloc_region_impl();

        let token_ignore = self.spec.alloc_region(span, impl_token_ignore);
        let token_only = self.spec.alloc_region(span, impl_token_only);
        let ignore_only = self.spec.alloc_region(span, impl_ignore_only);
        let collect_ignore = self.spec.alloc_region(span, impl_ignore_only);
        self.spec.regions[collect_ignore.index()].ignore_only = Some(ignore_only);

        let id = RegionSetId::next(self.spec.region_sets.len());
        self.spec.region_sets.push(RegionSet {
            id,
            impl_token_ignore,
            impl_token_only,
            impl_ignore_only,
            token_ignore,
            token_only,
            ignore_only,
            collect_ignore,
            token_defs: Vec::new(),
        });
        self.region_stack.push(id);
        tracing::debug!(region_set = %id, depth = self.region_stack.len(), "pushed region set");
        id
    }

    /// Closes the innermost scanner block. Its regions stay in the model.
    pub fn pop_region_set(&mut self) -> Result<RegionSetId> {
        self.region_stack
            .pop()
            .ok_or_else(|| internal_error("region stack is empty"))
    }

    /// The active region set, or a fresh one pushed for the duration of a
    /// single declaration.
    fn enter_region(&mut self, span: Span) -> (RegionSetId, bool) {
        match self.region_stack.last() {
            Some(top) => (*top, false),
            None => (self.push_region_set(span), true),
        }
    }

    fn leave_region(&mut self, pushed: bool) {
        if pushed {
            self.region_stack.pop();
        }
    }

    pub fn define_token(&mut self, decl: TokenDecl) -> Option<TokenDefId> {
        let TokenDecl {
            span,
            name,
            join,
            object,
            trans_block,
            ignore,
            no_pre_ignore,
            no_post_ignore,
        } = decl;

        if ignore && !self.inside_region() {
            self.error(
                DiagnosticKind::Structural,
                span,
                "ignore tokens can only appear inside scanners",
            );
            return None;
        }

        let name = match name {
            Some(name) => name.text,
            None if ignore => format!("_ignore_{:04x}", self.spec.token_instances.len()),
            None => {
                self.error(DiagnosticKind::Structural, span, "tokens must have a name");
                return None;
            }
        };

        let (region_set, pushed) = self.enter_region(span);
        let nspace = self.cur_namespace();
        let join = join.map(|join| self.spec.alloc_join(join));

        let token_def = self.alloc_token_def(TokenDef {
            id: TokenDefId::next(self.spec.token_defs.len()),
            span,
            name: name.clone(),
            literal: None,
            ignore,
            is_zero: false,
            join,
            trans_block,
            namespace: nspace,
            region_set,
            object,
            context: self.cur_context(),
            no_pre_ignore,
            no_post_ignore,
            instances: Vec::new(),
        });

        let set = self.spec.region_set(region_set);
        let (primary_region, dup_region) = if ignore {
            (set.token_ignore, set.ignore_only)
        } else {
            (set.token_ignore, set.token_only)
        };
        let primary = self.add_instance(token_def, span, join, nspace, primary_region, None);
        self.add_instance(token_def, span, join, nspace, dup_region, Some(primary));

        self.leave_region(pushed);

        // Lets later token definitions use this one as a named graph.
        if let Some(join) = join {
            self.add_regular_def(span, nspace, &name, join, false);
        }

        tracing::debug!(token = %name, ignore, region_set = %region_set, "defined token");
        Some(token_def)
    }

    /// Declares a literal token. Literals may appear outside scanner blocks
    /// and are unique per namespace by their interpreted text.
    pub fn literal_def(
        &mut self,
        lit: &StringLiteral,
        no_pre_ignore: bool,
        no_post_ignore: bool,
    ) -> Option<TokenDefId> {
        let name = format!("_literal_{:04x}", self.spec.token_instances.len());
        let interp = lit.interpret();
        let nspace = self.cur_namespace();

        if self.spec.namespace(nspace).find_literal(&interp.text).is_some() {
            self.error(
                DiagnosticKind::Duplicate,
                lit.span,
                format!("literal {} already defined in this namespace", lit.value),
            );
            return None;
        }

        let (region_set, pushed) = self.enter_region(lit.span);
        let join = self.literal_join(lit);
        let join = self.spec.alloc_join(join);
        let object = self.spec.alloc_object(ObjectKind::UserType, &name);

        let token_def = self.alloc_token_def(TokenDef {
            id: TokenDefId::next(self.spec.token_defs.len()),
            span: lit.span,
            name: name.clone(),
            literal: Some(lit.value.clone()),
            ignore: false,
            is_zero: false,
            join: Some(join),
            trans_block: None,
            namespace: nspace,
            region_set,
            object: Some(object),
            context: None,
            no_pre_ignore,
            no_post_ignore,
            instances: Vec::new(),
        });

        let set = self.spec.region_set(region_set);
        let (token_ignore, token_only) = (set.token_ignore, set.token_only);
        let primary =
            self.add_instance(token_def, lit.span, Some(join), nspace, token_ignore, None);
        self.spec.namespaces[nspace.index()]
            .literals
            .insert(interp.text, primary);
        self.add_instance(token_def, lit.span, Some(join), nspace, token_only, Some(primary));

        self.leave_region(pushed);

        tracing::debug!(literal = %lit, token = %name, "defined literal");
        Some(token_def)
    }

    /// Declares a sentinel token. It carries a one-character regex but gets no
    /// instance, so normal scanning never matches it.
    pub fn zero_def(&mut self, name: &Identifier) -> Option<TokenDefId> {
        let region_set = match self.cur_region_set() {
            Some(set) => set,
            None => {
                self.error(
                    DiagnosticKind::Structural,
                    name.span,
                    "zero token should be inside a region",
                );
                return None;
            }
        };

        let join = self.literal_join(&StringLiteral::new("`", name.span));
        let join = self.spec.alloc_join(join);
        let token_def = self.alloc_token_def(TokenDef {
            id: TokenDefId::next(self.spec.token_defs.len()),
            span: name.span,
            name: name.text.clone(),
            literal: None,
            ignore: false,
            is_zero: true,
            join: Some(join),
            trans_block: None,
            namespace: self.cur_namespace(),
            region_set,
            object: None,
            context: self.cur_context(),
            no_pre_ignore: false,
            no_post_ignore: false,
            instances: Vec::new(),
        });
        Some(token_def)
    }

    /// Attaches the block run before end of input in the current region set.
    pub fn pre_eof(&mut self, span: Span, stmts: Vec<LangStmt>, local_frame: ObjectId) {
        let region_set = match self.cur_region_set() {
            Some(set) => set,
            None => {
                self.error(
                    DiagnosticKind::Structural,
                    span,
                    "preeof must be used inside an existing region",
                );
                return;
            }
        };
        let block = CodeBlock {
            stmts,
            local_frame,
            context: self.cur_context(),
        };
        let region = self.spec.region_set(region_set).token_ignore;
        self.spec.regions[region.index()].pre_eof = Some(block);
    }

    /// Registers a named regular definition usable in later expressions.
    pub fn regular_def(&mut self, name: &Identifier, join: LexJoin) -> Option<LexDefId> {
        self.named_graph(name, join, false)
    }

    /// Registers an instantiated graph. It is visible to lookups, but
    /// references to it from expressions are rejected.
    pub fn instance_def(&mut self, name: &Identifier, join: LexJoin) -> Option<LexDefId> {
        self.named_graph(name, join, true)
    }

    fn named_graph(
        &mut self,
        name: &Identifier,
        join: LexJoin,
        is_instance: bool,
    ) -> Option<LexDefId> {
        let nspace = self.cur_namespace();
        if self.spec.namespace(nspace).find_graph(&name.text).is_some() {
            self.duplicate_graph(name.span, &name.text);
            return None;
        }
        let join = self.spec.alloc_join(join);
        self.add_regular_def(name.span, nspace, &name.text, join, is_instance)
    }

    fn add_regular_def(
        &mut self,
        span: Span,
        nspace: NamespaceId,
        name: &str,
        join: JoinId,
        is_instance: bool,
    ) -> Option<LexDefId> {
        if self.spec.namespace(nspace).find_graph(name).is_some() {
            // The duplicate is dropped; the first definition stays.
            self.duplicate_graph(span, name);
            return None;
        }
        let def = LexDefId::next(self.spec.lex_defs.len());
        self.spec.lex_defs.push(LexDefinition {
            id: def,
            name: name.to_string(),
            join,
        });
        self.spec.namespaces[nspace.index()].graphs.insert(
            name.to_string(),
            GraphDictEl {
                def,
                is_instance,
                span,
            },
        );
        Some(def)
    }

    fn duplicate_graph(&mut self, span: Span, name: &str) {
        self.error(
            DiagnosticKind::Duplicate,
            span,
            format!("regular definition \"{}\" already exists", name),
        );
    }

    fn alloc_token_def(&mut self, def: TokenDef) -> TokenDefId {
        let id = def.id;
        let (nspace, region_set) = (def.namespace, def.region_set);
        self.spec.token_defs.push(def);
        self.spec.region_sets[region_set.index()].token_defs.push(id);
        self.spec.namespaces[nspace.index()].token_defs.push(id);
        id
    }

    fn add_instance(
        &mut self,
        token_def: TokenDefId,
        span: Span,
        join: Option<JoinId>,
        nspace: NamespaceId,
        region: RegionId,
        dup_of: Option<TokenInstanceId>,
    ) -> TokenInstanceId {
        let id = TokenInstanceId::next(self.spec.token_instances.len());
        self.spec.token_instances.push(TokenInstance {
            id,
            span,
            token_def,
            join,
            namespace: nspace,
            region,
            dup_of,
        });
        let imp = self.spec.region(region).imp;
        self.spec.region_impls[imp.index()].token_instances.push(id);
        self.spec.token_defs[token_def.index()].instances.push(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LexFactor, Literal};

    fn ident(s: &str) -> Identifier {
        Identifier::new(s, Span::call_site())
    }

    fn lit_join(text: &str) -> LexJoin {
        LexJoin::from_factor(LexFactor::Literal(Literal::string(Span::call_site(), text)))
    }

    #[test]
    fn test_token_outside_region_is_auto_scoped() {
        let mut b = SpecBuilder::new();
        let def = b
            .define_token(TokenDecl::token(ident("id"), Some(lit_join("'x'"))))
            .unwrap();
        assert!(!b.inside_region());
        assert_eq!(b.spec().region_sets.len(), 1);

        let token = b.spec().token_def(def);
        assert_eq!(token.instances.len(), 2);
        assert!(b.spec().root_namespace().find_graph("id").is_some());
    }

    #[test]
    fn test_ignore_outside_region_rejected() {
        let mut b = SpecBuilder::new();
        let res = b.define_token(TokenDecl::ignore(Span::call_site(), None, lit_join("' '")));
        assert!(res.is_none());
        assert_eq!(b.diagnostics().count(DiagnosticKind::Structural), 1);
        assert!(b.spec().token_defs.is_empty());
        assert!(b.spec().region_sets.is_empty());
    }

    #[test]
    fn test_anonymous_ignore_gets_generated_name() {
        let mut b = SpecBuilder::new();
        b.push_region_set(Span::call_site());
        b.define_token(TokenDecl::token(ident("a"), Some(lit_join("'a'"))));
        let ws = b
            .define_token(TokenDecl::ignore(Span::call_site(), None, lit_join("' '")))
            .unwrap();
        b.pop_region_set().unwrap();
        assert_eq!(b.spec().token_def(ws).name, "_ignore_0002");
    }

    #[test]
    fn test_token_without_name_rejected() {
        let mut b = SpecBuilder::new();
        let mut decl = TokenDecl::token(ident("x"), None);
        decl.name = None;
        assert!(b.define_token(decl).is_none());
        assert_eq!(b.diagnostics().len(), 1);
    }

    #[test]
    fn test_token_without_regex_has_no_graph() {
        let mut b = SpecBuilder::new();
        b.define_token(TokenDecl::token(ident("fwd"), None)).unwrap();
        assert!(b.spec().root_namespace().graphs.is_empty());
    }

    #[test]
    fn test_duplicate_token_name_reports_regular_definition() {
        let mut b = SpecBuilder::new();
        b.define_token(TokenDecl::token(ident("t"), Some(lit_join("'a'"))));
        b.define_token(TokenDecl::token(ident("t"), Some(lit_join("'b'"))));
        let diag = b.diagnostics().iter().next().unwrap();
        assert_eq!(diag.kind, DiagnosticKind::Duplicate);
        assert!(diag.message.contains("regular definition \"t\" already exists"));
        assert_eq!(b.spec().lex_defs.len(), 1);
    }

    #[test]
    fn test_zero_def() {
        let mut b = SpecBuilder::new();
        assert!(b.zero_def(&ident("z")).is_none());

        b.push_region_set(Span::call_site());
        let z = b.zero_def(&ident("z")).unwrap();
        b.pop_region_set().unwrap();

        let def = b.spec().token_def(z);
        assert!(def.is_zero);
        assert!(def.instances.is_empty());
        assert!(def.join.is_some());
        assert!(b.spec().token_instances.is_empty());
    }

    #[test]
    fn test_pre_eof() {
        let mut b = SpecBuilder::new();
        let frame = b.spec().root_local_frame;
        b.pre_eof(Span::call_site(), Vec::new(), frame);
        assert_eq!(b.diagnostics().count(DiagnosticKind::Structural), 1);

        let set = b.push_region_set(Span::call_site());
        b.pre_eof(Span::call_site(), Vec::new(), frame);
        b.pop_region_set().unwrap();
        let region = b.spec().region_set(set).token_ignore;
        assert!(b.spec().region(region).pre_eof.is_some());
    }

    #[test]
    fn test_pop_empty_region_stack_is_fatal() {
        let mut b = SpecBuilder::new();
        assert!(b.pop_region_set().is_err());
    }
}
