//! Productions, patterns, constructors and the declarations around them.

use super::lang::{LangExpr, LangStmt, LangVarRef};
use crate::ids::{
    ConstructorId, ContextId, FieldId, FunctionId, NamespaceId, NtDefId, ObjectId, PatternId,
    ParserTextId, ProductionId, TokenDefId, TypeAliasId,
};
use proc_macro2::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatType {
    #[default]
    Bare,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Opt,
    /// `<*`
    LeftStar,
    /// `<+`
    LeftPlus,
}

/// A qualification such as `outer::inner::`, recorded against the namespace
/// the reference was written in.
#[derive(Debug, Clone)]
pub struct NamespaceQual {
    pub span: Span,
    pub declared_in: NamespaceId,
    pub names: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum TypeRefKind {
    Name(String),
    /// An inline literal used as a type: `'+'`.
    Literal(String),
    List(Box<TypeRef>),
    Parser(Box<TypeRef>),
    /// A literal appearing inside a constructor of the given type.
    ConsLiteral { cons: Box<TypeRef>, literal: String },
}

/// An unresolved reference to a type; resolution happens in later passes.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub span: Span,
    pub kind: TypeRefKind,
    pub qual: Option<NamespaceQual>,
    pub repeat: RepeatType,
    /// Set on pattern items written as `var: type`.
    pub parsed_var_ref: Option<Box<LangVarRef>>,
}

impl TypeRef {
    pub fn named(span: Span, name: impl Into<String>) -> Self {
        Self::new(span, TypeRefKind::Name(name.into()))
    }

    pub fn literal(span: Span, data: impl Into<String>) -> Self {
        Self::new(span, TypeRefKind::Literal(data.into()))
    }

    pub fn list(span: Span, elem: TypeRef) -> Self {
        Self::new(span, TypeRefKind::List(Box::new(elem)))
    }

    pub fn parser(span: Span, parsed: TypeRef) -> Self {
        Self::new(span, TypeRefKind::Parser(Box::new(parsed)))
    }

    pub fn cons_literal(span: Span, cons: TypeRef, literal: impl Into<String>) -> Self {
        Self::new(
            span,
            TypeRefKind::ConsLiteral {
                cons: Box::new(cons),
                literal: literal.into(),
            },
        )
    }

    fn new(span: Span, kind: TypeRefKind) -> Self {
        Self {
            span,
            kind,
            qual: None,
            repeat: RepeatType::Bare,
            parsed_var_ref: None,
        }
    }

    pub fn with_qual(mut self, qual: Option<NamespaceQual>) -> Self {
        self.qual = qual;
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatType) -> Self {
        self.repeat = repeat;
        self
    }

    /// The referenced name or literal text, ignoring wrappers.
    pub fn text(&self) -> &str {
        match &self.kind {
            TypeRefKind::Name(s) | TypeRefKind::Literal(s) => s,
            TypeRefKind::ConsLiteral { literal, .. } => literal,
            TypeRefKind::List(inner) | TypeRefKind::Parser(inner) => inner.text(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProdElKind {
    Reference,
    Literal,
}

/// One element of a production right-hand side.
#[derive(Debug, Clone)]
pub struct ProdEl {
    pub span: Span,
    pub kind: ProdElKind,
    pub type_ref: TypeRef,
    pub capture: Option<FieldId>,
    pub commit: bool,
    /// Position inside the owning list, assigned on append.
    pub pos: usize,
    /// Back link, assigned once the production exists.
    pub production: Option<ProductionId>,
}

impl ProdEl {
    pub fn new(
        span: Span,
        kind: ProdElKind,
        type_ref: TypeRef,
        capture: Option<FieldId>,
        commit: bool,
    ) -> Self {
        Self {
            span,
            kind,
            type_ref,
            capture,
            commit,
            pos: 0,
            production: None,
        }
    }
}

/// The language element a predicate production belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangElRef {
    Token(TokenDefId),
    Nonterminal(NtDefId),
}

#[derive(Debug, Clone)]
pub struct Production {
    pub id: ProductionId,
    pub span: Span,
    pub name: Option<String>,
    pub elements: Vec<ProdEl>,
    pub commit: bool,
    pub code_block: Option<CodeBlock>,
    /// Position inside the owning nonterminal's alternative list.
    pub prod_num: usize,
    pub pred_of: Option<LangElRef>,
    pub nt_def: Option<NtDefId>,
}

/// A nonterminal: its alternatives and the object type their captures live in.
#[derive(Debug, Clone)]
pub struct NtDef {
    pub id: NtDefId,
    pub span: Span,
    pub name: String,
    pub namespace: NamespaceId,
    pub context: Option<ContextId>,
    pub reduce_first: bool,
    pub object: ObjectId,
    pub productions: Vec<ProductionId>,
}

#[derive(Debug, Clone)]
pub enum PatternItemKind {
    TypeRef(ProdEl),
    InputText(String),
}

#[derive(Debug, Clone)]
pub struct PatternItem {
    pub span: Span,
    pub kind: PatternItemKind,
    pub var_ref: Option<LangVarRef>,
}

impl PatternItem {
    pub fn prod_el(&self) -> Option<&ProdEl> {
        match &self.kind {
            PatternItemKind::TypeRef(el) => Some(el),
            PatternItemKind::InputText(_) => None,
        }
    }
}

/// A tree-matching template.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub id: PatternId,
    pub span: Span,
    pub namespace: NamespaceId,
    pub items: Vec<PatternItem>,
    /// Shared numbering with constructors.
    pub pat_cons_id: u32,
}

#[derive(Debug, Clone)]
pub enum ConsItemKind {
    Literal(ProdEl),
    InputText(String),
    Expr(LangExpr),
}

#[derive(Debug, Clone)]
pub struct ConsItem {
    pub span: Span,
    pub kind: ConsItemKind,
}

/// A tree-construction template.
#[derive(Debug, Clone)]
pub struct Constructor {
    pub id: ConstructorId,
    pub span: Span,
    pub namespace: NamespaceId,
    pub items: Vec<ConsItem>,
    pub pat_cons_id: u32,
}

/// Items fed into an embedded parser by `send`, `send_tree` or `parse`.
#[derive(Debug, Clone)]
pub struct ParserText {
    pub id: ParserTextId,
    pub span: Span,
    pub namespace: NamespaceId,
    pub items: Vec<ConsItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredType {
    Left,
    Right,
    NonAssoc,
}

#[derive(Debug, Clone)]
pub struct PredDecl {
    pub type_ref: TypeRef,
    /// Precedence level; later statements bind tighter.
    pub pred_value: u32,
    pub pred_type: Option<PredType>,
}

#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub id: TypeAliasId,
    pub span: Span,
    pub namespace: NamespaceId,
    pub name: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone)]
pub struct Context {
    pub id: ContextId,
    pub span: Span,
    pub namespace: NamespaceId,
    pub object: ObjectId,
}

#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub stmts: Vec<LangStmt>,
    pub local_frame: ObjectId,
    pub context: Option<ContextId>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    pub type_ref: Option<TypeRef>,
    pub params: Vec<FieldId>,
    pub code_block: CodeBlock,
    pub is_iter: bool,
    pub export: bool,
    pub in_context: Option<ContextId>,
}
