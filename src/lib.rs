//! # gramspec
//!
//! Semantic front end for combined scanner/parser specifications.
//!
//! A syntax walker drives a [`SpecBuilder`] with one call per recognized
//! construct; the builder produces a [`Specification`] that later stages turn
//! into lexical and pushdown automata. See [`gramspec_model`] for the model
//! itself.

use proc_macro2::TokenStream;
use quote::quote;

pub use gramspec_model::builder::{BuilderOptions, SpecBuilder, TokenDecl, DEFAULT_BASE_TYPES};
pub use gramspec_model::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use gramspec_model::model::{self, Specification};
pub use gramspec_model::{build, build_with_options, ids, validator};

#[cfg(feature = "testing")]
pub mod testing;

/// Renders every diagnostic as a `compile_error!` invocation at its span,
/// for hosts that report through the compiler.
pub fn to_compile_errors(diagnostics: &Diagnostics) -> TokenStream {
    let errors = diagnostics.iter().map(|d| d.to_error().to_compile_error());
    quote! { #(#errors)* }
}
