//! Builds a [`Specification`] while a syntax walker visits the source.
//!
//! The syntax walker calls one operation per recognized construct. Each
//! operation mutates the shared [`Specification`] and returns the node the
//! walker re-attaches into its own tree. The namespace, region-set and
//! context stacks plus the current frame and scope are carried by
//! [`SpecBuilder`]; the walker must nest pushes and pops the way its blocks
//! nest.
//!
//! Problems with a single declaration are reported to [`Diagnostics`] and the
//! walk continues with a safe default. Only stack-consistency violations are
//! returned as errors.

mod grammar;
mod lexical;
mod stmt;
mod tokens;

pub use tokens::TokenDecl;

use crate::diagnostic::{internal_error, DiagnosticKind, Diagnostics};
use crate::ids::{ContextId, FieldId, NamespaceId, ObjectId, RegionSetId, ScopeId};
use crate::model::{
    Identifier, LangVarRef, NamespaceQual, ObjectKind, Specification, TypeRef, ROOT_NAMESPACE_NAME,
};
use crate::validator;
use proc_macro2::Span;
use syn::Result;

/// Types every specification can refer to without declaring them.
pub const DEFAULT_BASE_TYPES: &[&str] = &["ptr", "bool", "int", "str", "stream", "input", "any"];

/// Builder configuration.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Names registered as builtin types on the root namespace.
    pub base_types: Vec<String>,
    /// The type of captured substrings and of the argv elements.
    pub string_type: String,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            base_types: DEFAULT_BASE_TYPES.iter().map(|s| s.to_string()).collect(),
            string_type: "str".to_string(),
        }
    }
}

impl BuilderOptions {
    pub fn with_base_types(base_types: &[&str]) -> Self {
        Self {
            base_types: base_types.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct SpecBuilder {
    spec: Specification,
    diagnostics: Diagnostics,
    namespace_stack: Vec<NamespaceId>,
    region_stack: Vec<RegionSetId>,
    context_stack: Vec<ContextId>,
    cur_local_frame: ObjectId,
    cur_scope: ScopeId,
}

impl Default for SpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        let mut builder = Self {
            spec: Specification::new(options.string_type.clone()),
            diagnostics: Diagnostics::default(),
            namespace_stack: Vec::new(),
            region_stack: Vec::new(),
            context_stack: Vec::new(),
            cur_local_frame: ObjectId::new(0),
            cur_scope: ScopeId::new(0),
        };

        let root = builder.create_root_namespace();
        builder.spec.global_object = builder.spec.alloc_object(ObjectKind::UserType, "global");
        builder.spec.namespaces[root.index()].base_types = options.base_types;

        let frame = builder.spec.alloc_object(ObjectKind::FrameType, "local");
        builder.spec.root_local_frame = frame;
        builder.cur_local_frame = frame;
        builder.cur_scope = builder.spec.object(frame).root_scope;

        // argv is a list of the string type
        let elem = TypeRef::named(Span::call_site(), options.string_type);
        builder.spec.argv_type = Some(TypeRef::list(Span::call_site(), elem));
        builder
    }

    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn cur_namespace(&self) -> NamespaceId {
        self.namespace_stack
            .last()
            .copied()
            .unwrap_or(NamespaceId::new(0))
    }

    pub fn cur_context(&self) -> Option<ContextId> {
        self.context_stack.last().copied()
    }

    pub fn cur_region_set(&self) -> Option<RegionSetId> {
        self.region_stack.last().copied()
    }

    pub fn inside_region(&self) -> bool {
        !self.region_stack.is_empty()
    }

    pub fn cur_scope(&self) -> ScopeId {
        self.cur_scope
    }

    pub fn cur_local_frame(&self) -> ObjectId {
        self.cur_local_frame
    }

    pub(crate) fn error(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        self.diagnostics.push(kind, span, message);
    }

    // ---- namespaces -------------------------------------------------------

    /// Creates the global namespace: id 0, no parent. Calling it again
    /// returns the same namespace.
    pub fn create_root_namespace(&mut self) -> NamespaceId {
        if let Some(root) = self.spec.namespaces.first() {
            return root.id;
        }
        let root = self
            .spec
            .alloc_namespace(Span::call_site(), ROOT_NAMESPACE_NAME, None);
        self.namespace_stack.push(root);
        root
    }

    /// Enters the child namespace `name` of the current namespace, creating
    /// it on first use.
    pub fn create_namespace(&mut self, name: &Identifier) -> NamespaceId {
        let parent = self.cur_namespace();
        let nspace = match self.spec.find_child_namespace(parent, &name.text) {
            Some(existing) => {
                tracing::debug!(namespace = %name, id = %existing, "reopened namespace");
                existing
            }
            None => {
                let id = self.spec.alloc_namespace(name.span, &name.text, Some(parent));
                tracing::debug!(namespace = %name, id = %id, parent = %parent, "created namespace");
                id
            }
        };
        self.namespace_stack.push(nspace);
        nspace
    }

    pub fn close_namespace(&mut self) -> Result<NamespaceId> {
        if self.namespace_stack.len() <= 1 {
            return Err(internal_error("attempt to close the root namespace"));
        }
        self.namespace_stack
            .pop()
            .ok_or_else(|| internal_error("namespace stack is empty"))
    }

    /// Records a `a::b::` qualification against the current namespace.
    pub fn namespace_qual(&self, span: Span, names: &[Identifier]) -> NamespaceQual {
        NamespaceQual {
            span,
            declared_in: self.cur_namespace(),
            names: names.iter().map(|n| n.text.clone()).collect(),
        }
    }

    // ---- frames and scopes ------------------------------------------------

    /// Opens the local frame of an executable block.
    pub fn block_open(&mut self) -> ObjectId {
        let frame = self.spec.alloc_object(ObjectKind::FrameType, "local");
        self.cur_local_frame = frame;
        self.cur_scope = self.spec.object(frame).root_scope;
        frame
    }

    /// Returns to the root local frame.
    pub fn block_close(&mut self) {
        self.cur_local_frame = self.spec.root_local_frame;
        self.cur_scope = self.spec.object(self.spec.root_local_frame).root_scope;
    }

    pub fn push_scope(&mut self) -> ScopeId {
        self.cur_scope = self.spec.alloc_scope(self.cur_scope);
        self.cur_scope
    }

    pub fn pop_scope(&mut self) -> Result<ScopeId> {
        let parent = self
            .spec
            .scope(self.cur_scope)
            .parent
            .ok_or_else(|| internal_error("attempt to pop the root scope of a frame"))?;
        let closed = self.cur_scope;
        self.cur_scope = parent;
        Ok(closed)
    }

    // ---- fields -----------------------------------------------------------

    /// Allocates a field the walker will hand to a declaration operation.
    pub fn object_field(
        &mut self,
        name: &Identifier,
        kind: crate::model::FieldKind,
        type_ref: Option<TypeRef>,
    ) -> FieldId {
        self.spec.alloc_field(name.span, &name.text, kind, type_ref)
    }

    /// A reference to `name` in the current context and scope.
    pub fn var_ref(&self, name: &Identifier) -> LangVarRef {
        LangVarRef {
            span: name.span,
            context: self.cur_context(),
            scope: self.cur_scope,
            name: name.text.clone(),
        }
    }

    fn field_var_ref(&self, field: FieldId, context: Option<ContextId>) -> LangVarRef {
        let field = self.spec.field(field);
        LangVarRef {
            span: field.span,
            context,
            scope: self.cur_scope,
            name: field.name.clone(),
        }
    }

    /// Reports a redeclaration of `name` in the current scope.
    fn variable_redeclared(&mut self, span: Span, name: &str) -> bool {
        if self.spec.scope(self.cur_scope).check_redecl(name).is_some() {
            self.error(
                DiagnosticKind::Duplicate,
                span,
                format!("variable {} redeclared", name),
            );
            return true;
        }
        false
    }

    /// Inserts `field` into the current scope unless the name is taken.
    fn declare_variable(&mut self, field: FieldId) -> bool {
        let (span, name) = {
            let f = self.spec.field(field);
            (f.span, f.name.clone())
        };
        if self.variable_redeclared(span, &name) {
            return false;
        }
        self.spec.insert_field(self.cur_scope, field);
        true
    }

    /// Inserts `field` into the root scope of `object` unless the name is taken.
    fn declare_object_field(&mut self, object: ObjectId, field: FieldId) -> bool {
        let root = self.spec.object(object).root_scope;
        let (span, name) = {
            let f = self.spec.field(field);
            (f.span, f.name.clone())
        };
        if self.spec.scope(root).check_redecl(&name).is_some() {
            self.error(
                DiagnosticKind::Duplicate,
                span,
                format!("object field {} renamed", name),
            );
            return false;
        }
        self.spec.insert_field(root, field);
        true
    }

    // ---- finishing --------------------------------------------------------

    /// Ends the build. Fails when a block was left open, when any declaration
    /// was rejected, or when the finished model is inconsistent; all reported
    /// problems are combined into the returned error.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn finish(self) -> Result<Specification> {
        if !self.region_stack.is_empty() {
            return Err(internal_error(format!(
                "{} region set(s) left open",
                self.region_stack.len()
            )));
        }
        if !self.context_stack.is_empty() {
            return Err(internal_error(format!(
                "{} context(s) left open",
                self.context_stack.len()
            )));
        }
        if self.namespace_stack.len() != 1 {
            return Err(internal_error(format!(
                "{} namespace(s) left open",
                self.namespace_stack.len().saturating_sub(1)
            )));
        }

        let (spec, diagnostics) = self.into_parts();
        let mut error = diagnostics.into_error();
        if let Err(invalid) = validator::validate(&spec) {
            match error.as_mut() {
                Some(e) => e.combine(invalid),
                None => error = Some(invalid),
            }
        }

        match error {
            Some(e) => Err(e),
            None => {
                tracing::debug!(
                    namespaces = spec.namespaces.len(),
                    tokens = spec.token_defs.len(),
                    productions = spec.productions.len(),
                    "specification complete"
                );
                Ok(spec)
            }
        }
    }

    /// The model and the diagnostics, without judging either.
    pub fn into_parts(self) -> (Specification, Diagnostics) {
        (self.spec, self.diagnostics)
    }
}
