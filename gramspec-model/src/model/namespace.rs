//! Hierarchical symbol tables.

use crate::ids::{
    ContextId, LexDefId, NamespaceId, NtDefId, TokenDefId, TokenInstanceId, TypeAliasId,
};
use proc_macro2::Span;
use std::collections::HashMap;

/// Name of the namespace every specification starts in.
pub const ROOT_NAMESPACE_NAME: &str = "___ROOT_NAMESPACE";

/// An entry of the regular-definition dictionary.
#[derive(Debug, Clone)]
pub struct GraphDictEl {
    pub def: LexDefId,
    /// Instantiated graphs can be looked up but not composed into new expressions.
    pub is_instance: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContextDef {
    pub name: String,
    pub context: ContextId,
}

#[derive(Debug, Clone)]
pub struct Namespace {
    pub id: NamespaceId,
    pub span: Span,
    pub name: String,
    pub parent: Option<NamespaceId>,
    pub children: Vec<NamespaceId>,
    pub token_defs: Vec<TokenDefId>,
    pub nt_defs: Vec<NtDefId>,
    pub type_aliases: Vec<TypeAliasId>,
    pub context_defs: Vec<ContextDef>,
    /// Builtin type names declared in this namespace.
    pub base_types: Vec<String>,
    /// Interpreted literal text to the primary instance of its token.
    pub literals: HashMap<String, TokenInstanceId>,
    pub graphs: HashMap<String, GraphDictEl>,
}

impl Namespace {
    pub(crate) fn new(
        id: NamespaceId,
        span: Span,
        name: impl Into<String>,
        parent: Option<NamespaceId>,
    ) -> Self {
        Self {
            id,
            span,
            name: name.into(),
            parent,
            children: Vec::new(),
            token_defs: Vec::new(),
            nt_defs: Vec::new(),
            type_aliases: Vec::new(),
            context_defs: Vec::new(),
            base_types: Vec::new(),
            literals: HashMap::new(),
            graphs: HashMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn find_literal(&self, text: &str) -> Option<TokenInstanceId> {
        self.literals.get(text).copied()
    }

    pub fn find_graph(&self, name: &str) -> Option<&GraphDictEl> {
        self.graphs.get(name)
    }
}
