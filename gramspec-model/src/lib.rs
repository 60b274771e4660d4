//! # gramspec-model
//!
//! The semantic model of a combined scanner/parser specification and the
//! builder that populates it while a syntax walker visits the source once.
//!
//! ## Pipeline
//!
//! 1. **[builder]**: The walker calls one [`SpecBuilder`] operation per
//!    recognized construct. Misuse of a single declaration is collected in
//!    [`Diagnostics`] and the walk goes on.
//! 2. **[model]**: The resulting [`Specification`] holds namespaces, token
//!    regions, regex trees, productions, patterns and constructors in flat
//!    arenas addressed by the handles in [`ids`].
//! 3. **[validator]**: Structural checks over the finished model.

use syn::Result;

pub mod builder;
pub mod diagnostic;
pub mod ids;
pub mod model;
pub mod validator;

pub use builder::{BuilderOptions, SpecBuilder, TokenDecl, DEFAULT_BASE_TYPES};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use model::Specification;

/// Runs `walk` against a fresh builder and finishes it.
///
/// ```
/// use gramspec_model::model::Identifier;
/// use proc_macro2::Span;
///
/// let spec = gramspec_model::build(|b| {
///     b.create_namespace(&Identifier::new("util", Span::call_site()));
///     b.close_namespace()?;
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(spec.namespaces.len(), 2);
/// ```
pub fn build<F>(walk: F) -> Result<Specification>
where
    F: FnOnce(&mut SpecBuilder) -> Result<()>,
{
    build_with_options(BuilderOptions::default(), walk)
}

/// Same as [`build`] with custom builtin types.
pub fn build_with_options<F>(options: BuilderOptions, walk: F) -> Result<Specification>
where
    F: FnOnce(&mut SpecBuilder) -> Result<()>,
{
    let mut builder = SpecBuilder::with_options(options);
    walk(&mut builder)?;
    builder.finish()
}
