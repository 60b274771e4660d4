//! Structural types, their fields and block-local scopes.

use super::grammar::TypeRef;
use crate::ids::{ContextId, FieldId, ObjectId, ProductionId, ScopeId};
use proc_macro2::Span;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// User types: nonterminals, literals, contexts and the global object.
    UserType,
    /// Local variable frames of executable blocks.
    FrameType,
}

#[derive(Debug, Clone)]
pub struct ObjectDef {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub name: String,
    pub root_scope: ScopeId,
    /// Every scope created under this object, root first.
    pub scopes: Vec<ScopeId>,
}

/// A block-local variable frame.
///
/// Lookups by name only consult this scope; the parent chain is walked by
/// later passes, which is what allows shadowing.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub owner: ObjectId,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    fields: Vec<FieldId>,
    by_name: HashMap<String, FieldId>,
}

impl Scope {
    pub(crate) fn new(id: ScopeId, owner: ObjectId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            owner,
            parent,
            children: Vec::new(),
            fields: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Returns the field already declared under `name` in this scope.
    pub fn check_redecl(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn insert_field(&mut self, name: &str, field: FieldId) {
        if self.by_name.insert(name.to_string(), field).is_none() {
            self.fields.push(field);
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    UserLocal,
    UserField,
    StructField,
    ParamVal,
    ParamRef,
    /// The substring matched by a labelled piece of a token's regex.
    LexSubstr,
    /// Backed by a production element through [`RhsVal`] bindings.
    RhsCapture,
    Builtin,
}

/// Where a capture field finds its value: element `pos` of `production`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RhsVal {
    pub production: ProductionId,
    pub pos: usize,
}

#[derive(Debug, Clone)]
pub struct ObjectField {
    pub id: FieldId,
    pub span: Span,
    pub name: String,
    pub kind: FieldKind,
    pub type_ref: Option<TypeRef>,
    pub context: Option<ContextId>,
    pub is_param: bool,
    pub is_export: bool,
    pub is_rhs_get: bool,
    pub rhs_vals: Vec<RhsVal>,
}

impl ObjectField {
    pub(crate) fn new(
        id: FieldId,
        span: Span,
        name: impl Into<String>,
        kind: FieldKind,
        type_ref: Option<TypeRef>,
    ) -> Self {
        Self {
            id,
            span,
            name: name.into(),
            kind,
            type_ref,
            context: None,
            is_param: false,
            is_export: false,
            is_rhs_get: false,
            rhs_vals: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_keeps_declaration_order() {
        let mut scope = Scope::new(ScopeId::new(0), ObjectId::new(0), None);
        scope.insert_field("b", FieldId::new(1));
        scope.insert_field("a", FieldId::new(0));
        assert_eq!(scope.fields(), &[FieldId::new(1), FieldId::new(0)]);
        assert_eq!(scope.check_redecl("a"), Some(FieldId::new(0)));
        assert_eq!(scope.check_redecl("c"), None);
    }
}
