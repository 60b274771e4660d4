//! Statement and expression nodes of semantic-action code.
//!
//! Only the shapes the builder itself produces are modelled; everything else
//! the walker attaches stays opaque to this crate.

use super::grammar::TypeRef;
use crate::ids::{ConstructorId, ContextId, FieldId, ParserTextId, PatternId, ScopeId};
use proc_macro2::Span;

#[derive(Debug, Clone)]
pub struct LangVarRef {
    pub span: Span,
    pub context: Option<ContextId>,
    pub scope: ScopeId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FieldInit {
    pub span: Span,
    pub name: String,
    pub expr: LangExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    /// Produces the parser's acceptance result.
    Parse,
    /// Produces the constructed tree.
    ParseTree,
    /// Stops at the first complete parse.
    ParseStop,
}

#[derive(Debug, Clone)]
pub enum LangTerm {
    Var(LangVarRef),
    Number(Span, String),
    String(Span, String),
    Match {
        span: Span,
        var_ref: LangVarRef,
        pattern: PatternId,
    },
    Require {
        span: Span,
        var_ref: LangVarRef,
        pattern: PatternId,
    },
    Construct {
        span: Span,
        var_ref: Option<LangVarRef>,
        field: Option<FieldId>,
        type_ref: TypeRef,
        field_inits: Vec<FieldInit>,
        constructor: ConstructorId,
    },
    Send {
        span: Span,
        var_ref: LangVarRef,
        parser_text: ParserTextId,
        eof: bool,
    },
    SendTree {
        span: Span,
        var_ref: LangVarRef,
        parser_text: ParserTextId,
        eof: bool,
    },
    Parse {
        span: Span,
        kind: ParseKind,
        var_ref: Option<LangVarRef>,
        field: Option<FieldId>,
        parser_type: TypeRef,
        field_inits: Vec<FieldInit>,
        constructor: ConstructorId,
        parser_text: ParserTextId,
    },
}

#[derive(Debug, Clone)]
pub enum LangExpr {
    Term(Box<LangTerm>),
    Binary {
        span: Span,
        op: String,
        lhs: Box<LangExpr>,
        rhs: Box<LangExpr>,
    },
    Unary {
        span: Span,
        op: String,
        expr: Box<LangExpr>,
    },
}

impl LangExpr {
    pub fn term(term: LangTerm) -> Self {
        LangExpr::Term(Box::new(term))
    }

    pub fn as_term(&self) -> Option<&LangTerm> {
        match self {
            LangExpr::Term(term) => Some(term),
            _ => None,
        }
    }
}

/// The iterator a `for` statement drives.
#[derive(Debug, Clone)]
pub struct IterCall {
    pub span: Span,
    pub iter: LangVarRef,
    pub args: Vec<LangExpr>,
}

#[derive(Debug, Clone)]
pub enum LangStmt {
    Assign {
        span: Span,
        var_ref: LangVarRef,
        expr: LangExpr,
    },
    Expr(LangExpr),
    Print {
        span: Span,
        args: Vec<LangExpr>,
    },
    ForIter {
        span: Span,
        field: FieldId,
        type_ref: TypeRef,
        iter_call: IterCall,
        stmts: Vec<LangStmt>,
        context: Option<ContextId>,
        scope: ScopeId,
    },
    Return {
        span: Span,
        expr: Option<LangExpr>,
    },
}
