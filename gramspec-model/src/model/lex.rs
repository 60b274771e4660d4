//! Regular-expression trees for token definitions.
//!
//! Trees are built bottom-up: factor, negation, repetition, augmentation,
//! term (concatenation), expression (alternation and set operations), join.

use crate::ids::{ActionId, FieldId, LexDefId};
use proc_macro2::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Number,
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub span: Span,
    /// Raw text as written, quotes included for strings.
    pub data: String,
    pub kind: LiteralKind,
}

impl Literal {
    pub fn string(span: Span, data: impl Into<String>) -> Self {
        Self {
            span,
            data: data.into(),
            kind: LiteralKind::String,
        }
    }

    pub fn number(span: Span, data: impl Into<String>) -> Self {
        Self {
            span,
            data: data.into(),
            kind: LiteralKind::Number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReOrItem {
    Data(String),
    Range(char, char),
}

/// The contents of a `[...]` character class, built left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReOrBlock {
    Empty,
    RecurseItem(Box<ReOrBlock>, ReOrItem),
}

impl ReOrBlock {
    /// Number of nodes on the left spine, `Empty` included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut cur = self;
        while let ReOrBlock::RecurseItem(inner, _) = cur {
            depth += 1;
            cur = inner;
        }
        depth
    }

    /// Items in source order.
    pub fn items(&self) -> Vec<&ReOrItem> {
        let mut items = Vec::new();
        let mut cur = self;
        while let ReOrBlock::RecurseItem(inner, item) = cur {
            items.push(item);
            cur = inner;
        }
        items.reverse();
        items
    }
}

#[derive(Debug, Clone)]
pub enum LexFactor {
    Literal(Literal),
    Range(Literal, Literal),
    OrBlock(ReOrBlock),
    NegOrBlock(ReOrBlock),
    /// A named regular definition looked up through the namespace chain.
    Reference { span: Span, def: LexDefId },
    Paren(Box<LexJoin>),
}

#[derive(Debug, Clone)]
pub enum LexFactorNeg {
    Negate(Box<LexFactorNeg>),
    CharNegate(Box<LexFactorNeg>),
    Factor(LexFactor),
}

#[derive(Debug, Clone)]
pub enum LexFactorRep {
    Star(Box<LexFactorRep>),
    StarStar(Box<LexFactorRep>),
    Optional(Box<LexFactorRep>),
    Plus(Box<LexFactorRep>),
    Exact(Box<LexFactorRep>, i32),
    Max(Box<LexFactorRep>, i32),
    Min(Box<LexFactorRep>, i32),
    Range(Box<LexFactorRep>, i32, i32),
    FactorNeg(LexFactorNeg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Records the current input position as a match boundary.
    MarkMark,
}

#[derive(Debug, Clone)]
pub struct Action {
    pub id: ActionId,
    pub kind: ActionKind,
    /// The match-end number the action marks.
    pub mark: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugType {
    Start,
    Leave,
}

#[derive(Debug, Clone)]
pub struct ParserAction {
    pub span: Span,
    pub aug: AugType,
    pub action: ActionId,
}

/// Binds the substring between two mark actions to an object field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReCapture {
    pub enter: ActionId,
    pub leave: ActionId,
    pub field: FieldId,
}

#[derive(Debug, Clone)]
pub struct LexFactorAug {
    pub factor_rep: LexFactorRep,
    pub actions: Vec<ParserAction>,
    pub captures: Vec<ReCapture>,
}

#[derive(Debug, Clone)]
pub enum LexTerm {
    Concat(Box<LexTerm>, LexFactorAug),
    RightStart(Box<LexTerm>, LexFactorAug),
    RightFinish(Box<LexTerm>, LexFactorAug),
    LeftPrec(Box<LexTerm>, LexFactorAug),
    FactorAug(LexFactorAug),
}

#[derive(Debug, Clone)]
pub enum LexExpression {
    Or(Box<LexExpression>, LexTerm),
    Intersect(Box<LexExpression>, LexTerm),
    Subtract(Box<LexExpression>, LexTerm),
    StrongSubtract(Box<LexExpression>, LexTerm),
    Term(LexTerm),
}

#[derive(Debug, Clone)]
pub struct LexJoin {
    pub expr: LexExpression,
    /// Trailing context the match must be followed by, not part of the token.
    pub context: Option<Box<LexJoin>>,
    pub mark: Option<ActionId>,
}

/// A named regular definition.
#[derive(Debug, Clone)]
pub struct LexDefinition {
    pub id: LexDefId,
    pub name: String,
    pub join: crate::ids::JoinId,
}

impl From<LexFactor> for LexFactorNeg {
    fn from(factor: LexFactor) -> Self {
        LexFactorNeg::Factor(factor)
    }
}

impl From<LexFactorNeg> for LexFactorRep {
    fn from(neg: LexFactorNeg) -> Self {
        LexFactorRep::FactorNeg(neg)
    }
}

impl From<LexFactorRep> for LexFactorAug {
    fn from(factor_rep: LexFactorRep) -> Self {
        LexFactorAug {
            factor_rep,
            actions: Vec::new(),
            captures: Vec::new(),
        }
    }
}

impl From<LexFactorAug> for LexTerm {
    fn from(aug: LexFactorAug) -> Self {
        LexTerm::FactorAug(aug)
    }
}

impl From<LexTerm> for LexExpression {
    fn from(term: LexTerm) -> Self {
        LexExpression::Term(term)
    }
}

impl From<LexExpression> for LexJoin {
    fn from(expr: LexExpression) -> Self {
        LexJoin {
            expr,
            context: None,
            mark: None,
        }
    }
}

impl LexFactorAug {
    /// Wraps a bare factor without negation, repetition or actions.
    pub fn from_factor(factor: LexFactor) -> Self {
        LexFactorRep::from(LexFactorNeg::from(factor)).into()
    }
}

impl LexTerm {
    pub fn concat(self, next: LexFactorAug) -> Self {
        LexTerm::Concat(Box::new(self), next)
    }
}

impl LexExpression {
    pub fn or(self, term: LexTerm) -> Self {
        LexExpression::Or(Box::new(self), term)
    }
}

impl LexJoin {
    /// Wraps a single factor into a complete join.
    pub fn from_factor(factor: LexFactor) -> Self {
        LexJoin::from(LexExpression::from(LexTerm::from(LexFactorAug::from_factor(factor))))
    }

    /// Named definitions this join refers to, left to right.
    pub fn references(&self) -> Vec<LexDefId> {
        let mut out = Vec::new();
        collect_expr_refs(&self.expr, &mut out);
        if let Some(context) = &self.context {
            out.extend(context.references());
        }
        out
    }
}

fn collect_expr_refs(expr: &LexExpression, out: &mut Vec<LexDefId>) {
    match expr {
        LexExpression::Or(lhs, term)
        | LexExpression::Intersect(lhs, term)
        | LexExpression::Subtract(lhs, term)
        | LexExpression::StrongSubtract(lhs, term) => {
            collect_expr_refs(lhs, out);
            collect_term_refs(term, out);
        }
        LexExpression::Term(term) => collect_term_refs(term, out),
    }
}

fn collect_term_refs(term: &LexTerm, out: &mut Vec<LexDefId>) {
    match term {
        LexTerm::Concat(lhs, aug)
        | LexTerm::RightStart(lhs, aug)
        | LexTerm::RightFinish(lhs, aug)
        | LexTerm::LeftPrec(lhs, aug) => {
            collect_term_refs(lhs, out);
            collect_rep_refs(&aug.factor_rep, out);
        }
        LexTerm::FactorAug(aug) => collect_rep_refs(&aug.factor_rep, out),
    }
}

fn collect_rep_refs(rep: &LexFactorRep, out: &mut Vec<LexDefId>) {
    match rep {
        LexFactorRep::Star(inner)
        | LexFactorRep::StarStar(inner)
        | LexFactorRep::Optional(inner)
        | LexFactorRep::Plus(inner)
        | LexFactorRep::Exact(inner, _)
        | LexFactorRep::Max(inner, _)
        | LexFactorRep::Min(inner, _)
        | LexFactorRep::Range(inner, _, _) => collect_rep_refs(inner, out),
        LexFactorRep::FactorNeg(neg) => collect_neg_refs(neg, out),
    }
}

fn collect_neg_refs(neg: &LexFactorNeg, out: &mut Vec<LexDefId>) {
    match neg {
        LexFactorNeg::Negate(inner) | LexFactorNeg::CharNegate(inner) => {
            collect_neg_refs(inner, out)
        }
        LexFactorNeg::Factor(LexFactor::Reference { def, .. }) => out.push(*def),
        LexFactorNeg::Factor(LexFactor::Paren(join)) => out.extend(join.references()),
        LexFactorNeg::Factor(_) => {}
    }
}
