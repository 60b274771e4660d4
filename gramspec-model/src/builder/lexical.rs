//! Regular-expression assembly.

use super::SpecBuilder;
use crate::diagnostic::DiagnosticKind;
use crate::model::{
    AugType, FieldKind, Identifier, LexFactor, LexFactorAug, LexJoin, Literal, ParserAction,
    ReCapture, ReOrBlock, ReOrItem, StringLiteral, TypeRef,
};
use proc_macro2::Span;
use std::num::IntErrorKind;

impl SpecBuilder {
    /// The single-factor join matching a literal's text.
    pub fn literal_join(&self, lit: &StringLiteral) -> LexJoin {
        LexJoin::from_factor(LexFactor::Literal(Literal::string(lit.span, lit.value.clone())))
    }

    pub fn lex_factor_literal(&self, lit: Literal) -> LexFactor {
        LexFactor::Literal(lit)
    }

    /// `low .. high`
    pub fn lex_factor_range(&self, low: Literal, high: Literal) -> LexFactor {
        LexFactor::Range(low, high)
    }

    /// `[...]`, or `[^...]` when negated.
    pub fn lex_factor_or_block(&self, block: ReOrBlock, negated: bool) -> LexFactor {
        if negated {
            LexFactor::NegOrBlock(block)
        } else {
            LexFactor::OrBlock(block)
        }
    }

    pub fn lex_factor_paren(&self, join: LexJoin) -> LexFactor {
        LexFactor::Paren(Box::new(join))
    }

    /// Resolves a named graph from the current namespace outward.
    pub fn lex_rl_factor_name(&mut self, name: &Identifier) -> Option<LexFactor> {
        let found = self
            .spec
            .lookup_graph(self.cur_namespace(), &name.text)
            .map(|(_, el)| (el.def, el.is_instance));

        match found {
            Some((def, false)) => Some(LexFactor::Reference {
                span: name.span,
                def,
            }),
            Some((_, true)) => {
                self.error(
                    DiagnosticKind::Unresolved,
                    name.span,
                    "references to graph instantiations not allowed in expressions",
                );
                None
            }
            None => {
                self.error(
                    DiagnosticKind::Unresolved,
                    name.span,
                    format!("graph lookup of \"{}\" failed", name.text),
                );
                None
            }
        }
    }

    /// Appends an item to a character class. Adjacent data items are merged
    /// into one so long classes do not deepen the tree.
    pub fn lex_regular_expr_data(&self, block: ReOrBlock, item: ReOrItem) -> ReOrBlock {
        match (block, item) {
            (ReOrBlock::RecurseItem(inner, ReOrItem::Data(mut data)), ReOrItem::Data(more)) => {
                data.push_str(&more);
                ReOrBlock::RecurseItem(inner, ReOrItem::Data(data))
            }
            (block, item) => ReOrBlock::RecurseItem(Box::new(block), item),
        }
    }

    /// Parses a repetition count. Only plain decimal digits are accepted; a
    /// count that is malformed or does not fit is reported and replaced by 1.
    pub fn lex_factor_rep_num(&mut self, span: Span, data: &str) -> i32 {
        let parsed = if data.is_empty() || !data.bytes().all(|c| c.is_ascii_digit()) {
            None
        } else {
            Some(data.parse::<i32>())
        };
        match parsed {
            Some(Ok(rep)) => rep,
            Some(Err(err)) if *err.kind() == IntErrorKind::PosOverflow => {
                self.error(
                    DiagnosticKind::MalformedLiteral,
                    span,
                    format!("repetition number {} overflows", data),
                );
                1
            }
            _ => {
                self.error(
                    DiagnosticKind::MalformedLiteral,
                    span,
                    format!("repetition number {} is not a decimal count", data),
                );
                1
            }
        }
    }

    /// `name: factor`. Marks the substring the factor matches and binds it to
    /// a new substring field.
    pub fn lex_factor_label(&mut self, name: &Identifier, mut aug: LexFactorAug) -> LexFactorAug {
        let type_ref = TypeRef::named(name.span, self.spec.string_type.clone());
        let field = self
            .spec
            .alloc_field(name.span, &name.text, FieldKind::LexSubstr, Some(type_ref));

        let enter = self.spec.alloc_mark_action();
        let leave = self.spec.alloc_mark_action();
        aug.actions.push(ParserAction {
            span: name.span,
            aug: AugType::Start,
            action: enter,
        });
        aug.actions.push(ParserAction {
            span: name.span,
            aug: AugType::Leave,
            action: leave,
        });
        aug.captures.push(ReCapture { enter, leave, field });
        aug
    }

    /// Attaches a trailing context to `join`. The context must follow the
    /// match but is not consumed by it.
    pub fn lex_opt_join(&mut self, mut join: LexJoin, context: Option<LexJoin>) -> LexJoin {
        if let Some(context) = context {
            join.context = Some(Box::new(context));
            join.mark = Some(self.spec.alloc_mark_action());
        }
        join
    }
}
