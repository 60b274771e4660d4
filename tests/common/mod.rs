#![allow(dead_code)]

use gramspec::model::{Identifier, LexFactor, LexJoin, Literal, ReOrBlock, ReOrItem, StringLiteral};
use gramspec::{SpecBuilder, TokenDecl};
use proc_macro2::Span;

/// An identifier whose span comes from real parsed tokens.
pub fn ident(name: &str) -> Identifier {
    let parsed: syn::Ident = syn::parse_str(name).expect("not an identifier");
    Identifier::from(parsed)
}

/// A string literal as written in source, quotes included.
pub fn lit(text: &str) -> StringLiteral {
    StringLiteral::new(text, Span::call_site())
}

/// `[lo-hi]`
pub fn char_range(b: &SpecBuilder, lo: char, hi: char) -> LexJoin {
    let block = ReOrBlock::RecurseItem(Box::new(ReOrBlock::Empty), ReOrItem::Range(lo, hi));
    LexJoin::from_factor(b.lex_factor_or_block(block, false))
}

/// A join matching the literal text.
pub fn text_join(text: &str) -> LexJoin {
    LexJoin::from_factor(LexFactor::Literal(Literal::string(Span::call_site(), text)))
}

/// Declares `name` over `join` in the current region set.
pub fn token(b: &mut SpecBuilder, name: &str, join: LexJoin) -> gramspec::ids::TokenDefId {
    b.define_token(TokenDecl::token(ident(name), Some(join)))
        .expect("token rejected")
}

/// Declares an anonymous ignore token over `join`.
pub fn ignore(b: &mut SpecBuilder, join: LexJoin) -> gramspec::ids::TokenDefId {
    b.define_token(TokenDecl::ignore(Span::call_site(), None, join))
        .expect("ignore rejected")
}
