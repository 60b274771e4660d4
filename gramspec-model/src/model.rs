//! The model populated by [`SpecBuilder`](crate::builder::SpecBuilder).
//!
//! Everything lives in flat arenas owned by [`Specification`]; entities refer
//! to each other through the handles in [`crate::ids`]. Parent links
//! (namespace to parent, scope to parent) are plain handles used for upward
//! lookup only.

pub mod grammar;
pub mod lang;
pub mod lex;
pub mod namespace;
pub mod object;
pub mod region;
pub mod types;

pub use grammar::*;
pub use lang::*;
pub use lex::*;
pub use namespace::*;
pub use object::*;
pub use region::*;
pub use types::*;

use crate::ids::*;
use proc_macro2::Span;

#[derive(Debug, Clone)]
pub struct Specification {
    pub namespaces: Vec<Namespace>,
    pub objects: Vec<ObjectDef>,
    pub scopes: Vec<Scope>,
    pub fields: Vec<ObjectField>,
    pub region_impls: Vec<RegionImpl>,
    pub regions: Vec<TokenRegion>,
    pub region_sets: Vec<RegionSet>,
    pub token_defs: Vec<TokenDef>,
    pub token_instances: Vec<TokenInstance>,
    pub lex_defs: Vec<LexDefinition>,
    pub joins: Vec<LexJoin>,
    pub actions: Vec<Action>,
    pub productions: Vec<Production>,
    pub nt_defs: Vec<NtDef>,
    pub patterns: Vec<Pattern>,
    pub constructors: Vec<Constructor>,
    pub parser_texts: Vec<ParserText>,
    pub functions: Vec<Function>,
    pub contexts: Vec<Context>,
    pub type_aliases: Vec<TypeAlias>,
    pub pred_decls: Vec<PredDecl>,
    pub global_object: ObjectId,
    pub root_local_frame: ObjectId,
    /// `list<str>`, the type of the program arguments.
    pub argv_type: Option<TypeRef>,
    /// Name of the type captured substrings and argv elements have.
    pub string_type: String,
    pub(crate) next_pat_cons_id: u32,
    pub(crate) next_match_end: u32,
    pub(crate) pred_value: u32,
}

impl Specification {
    pub(crate) fn new(string_type: impl Into<String>) -> Self {
        Self {
            namespaces: Vec::new(),
            objects: Vec::new(),
            scopes: Vec::new(),
            fields: Vec::new(),
            region_impls: Vec::new(),
            regions: Vec::new(),
            region_sets: Vec::new(),
            token_defs: Vec::new(),
            token_instances: Vec::new(),
            lex_defs: Vec::new(),
            joins: Vec::new(),
            actions: Vec::new(),
            productions: Vec::new(),
            nt_defs: Vec::new(),
            patterns: Vec::new(),
            constructors: Vec::new(),
            parser_texts: Vec::new(),
            functions: Vec::new(),
            contexts: Vec::new(),
            type_aliases: Vec::new(),
            pred_decls: Vec::new(),
            global_object: ObjectId::new(0),
            root_local_frame: ObjectId::new(0),
            argv_type: None,
            string_type: string_type.into(),
            next_pat_cons_id: 0,
            next_match_end: 0,
            pred_value: 0,
        }
    }

    // ---- lookups ----------------------------------------------------------

    pub fn root_namespace(&self) -> &Namespace {
        &self.namespaces[0]
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    pub fn object(&self, id: ObjectId) -> &ObjectDef {
        &self.objects[id.index()]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &ObjectField {
        &self.fields[id.index()]
    }

    pub fn region(&self, id: RegionId) -> &TokenRegion {
        &self.regions[id.index()]
    }

    pub fn region_set(&self, id: RegionSetId) -> &RegionSet {
        &self.region_sets[id.index()]
    }

    pub fn token_def(&self, id: TokenDefId) -> &TokenDef {
        &self.token_defs[id.index()]
    }

    pub fn token_instance(&self, id: TokenInstanceId) -> &TokenInstance {
        &self.token_instances[id.index()]
    }

    pub fn lex_def(&self, id: LexDefId) -> &LexDefinition {
        &self.lex_defs[id.index()]
    }

    pub fn join(&self, id: JoinId) -> &LexJoin {
        &self.joins[id.index()]
    }

    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.index()]
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.index()]
    }

    pub fn nt_def(&self, id: NtDefId) -> &NtDef {
        &self.nt_defs[id.index()]
    }

    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    pub fn constructor(&self, id: ConstructorId) -> &Constructor {
        &self.constructors[id.index()]
    }

    pub fn parser_text(&self, id: ParserTextId) -> &ParserText {
        &self.parser_texts[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn context(&self, id: ContextId) -> &Context {
        &self.contexts[id.index()]
    }

    pub fn type_alias(&self, id: TypeAliasId) -> &TypeAlias {
        &self.type_aliases[id.index()]
    }

    /// Token instances active in a region. Regions sharing an implementation
    /// share the list.
    pub fn region_tokens(&self, id: RegionId) -> &[TokenInstanceId] {
        let imp = self.region(id).imp;
        &self.region_impls[imp.index()].token_instances
    }

    /// Follows `dup_of` links to the instance that owns the regex.
    pub fn canonical_instance(&self, id: TokenInstanceId) -> TokenInstanceId {
        let mut cur = id;
        while let Some(orig) = self.token_instance(cur).dup_of {
            cur = orig;
        }
        cur
    }

    pub fn find_child_namespace(&self, parent: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.namespace(parent)
            .children
            .iter()
            .copied()
            .find(|child| self.namespace(*child).name == name)
    }

    /// Looks a regular definition up from `from` outward through the parents.
    pub fn lookup_graph(
        &self,
        from: NamespaceId,
        name: &str,
    ) -> Option<(NamespaceId, &GraphDictEl)> {
        let mut cur = Some(from);
        while let Some(id) = cur {
            let nspace = self.namespace(id);
            if let Some(el) = nspace.find_graph(name) {
                return Some((id, el));
            }
            cur = nspace.parent;
        }
        None
    }

    /// `outer::inner` style path of a namespace; empty for the root.
    pub fn namespace_path(&self, id: NamespaceId) -> String {
        let mut names = Vec::new();
        let mut cur = self.namespace(id);
        while let Some(parent) = cur.parent {
            names.push(cur.name.as_str());
            cur = self.namespace(parent);
        }
        names.reverse();
        names.join("::")
    }

    /// Looks a field up in one scope only.
    pub fn scope_field(&self, scope: ScopeId, name: &str) -> Option<&ObjectField> {
        self.scope(scope).check_redecl(name).map(|id| self.field(id))
    }

    /// Looks a field up in an object's root scope.
    pub fn object_field(&self, object: ObjectId, name: &str) -> Option<&ObjectField> {
        self.scope_field(self.object(object).root_scope, name)
    }

    pub fn find_token(&self, nspace: NamespaceId, name: &str) -> Option<&TokenDef> {
        self.namespace(nspace)
            .token_defs
            .iter()
            .map(|id| self.token_def(*id))
            .find(|def| def.name == name)
    }

    pub fn find_nt_def(&self, nspace: NamespaceId, name: &str) -> Option<&NtDef> {
        self.namespace(nspace)
            .nt_defs
            .iter()
            .map(|id| self.nt_def(*id))
            .find(|def| def.name == name)
    }

    // ---- allocation -------------------------------------------------------

    pub(crate) fn alloc_namespace(
        &mut self,
        span: Span,
        name: &str,
        parent: Option<NamespaceId>,
    ) -> NamespaceId {
        let id = NamespaceId::next(self.namespaces.len());
        self.namespaces.push(Namespace::new(id, span, name, parent));
        if let Some(parent) = parent {
            self.namespaces[parent.index()].children.push(id);
        }
        id
    }

    pub(crate) fn alloc_object(&mut self, kind: ObjectKind, name: &str) -> ObjectId {
        let id = ObjectId::next(self.objects.len());
        let root_scope = ScopeId::next(self.scopes.len());
        self.scopes.push(Scope::new(root_scope, id, None));
        self.objects.push(ObjectDef {
            id,
            kind,
            name: name.to_string(),
            root_scope,
            scopes: vec![root_scope],
        });
        id
    }

    /// Opens a child scope of `parent` inside the frame that owns it.
    pub(crate) fn alloc_scope(&mut self, parent: ScopeId) -> ScopeId {
        let owner = self.scope(parent).owner;
        let id = ScopeId::next(self.scopes.len());
        self.scopes.push(Scope::new(id, owner, Some(parent)));
        self.scopes[parent.index()].children.push(id);
        self.objects[owner.index()].scopes.push(id);
        id
    }

    pub(crate) fn alloc_field(
        &mut self,
        span: Span,
        name: &str,
        kind: FieldKind,
        type_ref: Option<TypeRef>,
    ) -> FieldId {
        let id = FieldId::next(self.fields.len());
        self.fields.push(ObjectField::new(id, span, name, kind, type_ref));
        id
    }

    pub(crate) fn insert_field(&mut self, scope: ScopeId, field: FieldId) {
        let name = self.fields[field.index()].name.clone();
        self.scopes[scope.index()].insert_field(&name, field);
    }

    pub(crate) fn alloc_region_impl(&mut self) -> RegionImplId {
        let id = RegionImplId::next(self.region_impls.len());
        self.region_impls.push(RegionImpl::default());
        id
    }

    pub(crate) fn alloc_region(&mut self, span: Span, imp: RegionImplId) -> RegionId {
        let id = RegionId::next(self.regions.len());
        self.regions.push(TokenRegion {
            id,
            span,
            imp,
            ignore_only: None,
            pre_eof: None,
        });
        id
    }

    pub(crate) fn alloc_join(&mut self, join: LexJoin) -> JoinId {
        let id = JoinId::next(self.joins.len());
        self.joins.push(join);
        id
    }

    /// Allocates a mark action with the next match-end number.
    pub(crate) fn alloc_mark_action(&mut self) -> ActionId {
        let id = ActionId::next(self.actions.len());
        let mark = self.next_match_end;
        self.next_match_end += 1;
        self.actions.push(Action {
            id,
            kind: ActionKind::MarkMark,
            mark,
        });
        id
    }

    pub(crate) fn next_pat_cons_id(&mut self) -> u32 {
        let id = self.next_pat_cons_id;
        self.next_pat_cons_id += 1;
        id
    }
}
