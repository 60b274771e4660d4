//! Scanner regions and the tokens active in them.
//!
//! A region set owns three raw implementations and four regions built over
//! them. Every token gets a primary instance in the token+ignore region and one
//! duplicate, either in the token-only region or in the ignore-only region.
//! The collect-ignore region shares the ignore-only implementation.

use super::grammar::CodeBlock;
use crate::ids::{
    ContextId, JoinId, NamespaceId, ObjectId, RegionId, RegionImplId, RegionSetId, TokenDefId,
    TokenInstanceId,
};
use proc_macro2::Span;

#[derive(Debug, Clone, Default)]
pub struct RegionImpl {
    pub token_instances: Vec<TokenInstanceId>,
}

#[derive(Debug, Clone)]
pub struct TokenRegion {
    pub id: RegionId,
    pub span: Span,
    pub imp: RegionImplId,
    /// Set on collect-ignore regions: the ignore-only region they collect for.
    pub ignore_only: Option<RegionId>,
    pub pre_eof: Option<CodeBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRole {
    TokenIgnore,
    TokenOnly,
    IgnoreOnly,
    CollectIgnore,
}

#[derive(Debug, Clone)]
pub struct RegionSet {
    pub id: RegionSetId,
    pub impl_token_ignore: RegionImplId,
    pub impl_token_only: RegionImplId,
    pub impl_ignore_only: RegionImplId,
    pub token_ignore: RegionId,
    pub token_only: RegionId,
    pub ignore_only: RegionId,
    pub collect_ignore: RegionId,
    pub token_defs: Vec<TokenDefId>,
}

impl RegionSet {
    pub fn region(&self, role: RegionRole) -> RegionId {
        match role {
            RegionRole::TokenIgnore => self.token_ignore,
            RegionRole::TokenOnly => self.token_only,
            RegionRole::IgnoreOnly => self.ignore_only,
            RegionRole::CollectIgnore => self.collect_ignore,
        }
    }

    pub fn regions(&self) -> [RegionId; 4] {
        [
            self.token_ignore,
            self.token_only,
            self.ignore_only,
            self.collect_ignore,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TokenDef {
    pub id: TokenDefId,
    pub span: Span,
    pub name: String,
    /// Raw literal text for tokens declared by a literal.
    pub literal: Option<String>,
    pub ignore: bool,
    pub is_zero: bool,
    pub join: Option<JoinId>,
    pub trans_block: Option<CodeBlock>,
    pub namespace: NamespaceId,
    pub region_set: RegionSetId,
    pub object: Option<ObjectId>,
    pub context: Option<ContextId>,
    pub no_pre_ignore: bool,
    pub no_post_ignore: bool,
    pub instances: Vec<TokenInstanceId>,
}

impl TokenDef {
    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct TokenInstance {
    pub id: TokenInstanceId,
    pub span: Span,
    pub token_def: TokenDefId,
    pub join: Option<JoinId>,
    pub namespace: NamespaceId,
    pub region: RegionId,
    /// The instance this one was replicated from; `None` on the primary.
    pub dup_of: Option<TokenInstanceId>,
}

impl TokenInstance {
    pub fn is_duplicate(&self) -> bool {
        self.dup_of.is_some()
    }
}
