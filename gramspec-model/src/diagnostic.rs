//! Location-tagged error reporting with local recovery.
//!
//! Recoverable problems are collected here while the builder keeps going;
//! stack-consistency violations are returned as `syn::Error` right away.

use proc_macro2::Span;
use std::fmt;
use syn::Error;

/// The class of a reported problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A name collision: regular definition, literal, variable or object field.
    Duplicate,
    /// A declaration in a place where it cannot appear.
    Structural,
    /// A named graph or token that could not be found or may not be used.
    Unresolved,
    /// Literal data that could not be interpreted, e.g. an overflowing count.
    MalformedLiteral,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Duplicate => "duplicate declaration",
            DiagnosticKind::Structural => "misplaced declaration",
            DiagnosticKind::Unresolved => "unresolved reference",
            DiagnosticKind::MalformedLiteral => "malformed literal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn to_error(&self) -> Error {
        Error::new(self.span, &self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.span.start();
        write!(f, "{}:{}: {}", start.line, start.column, self.message)
    }
}

/// The shared diagnostic sink of one specification build.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        let diag = Diagnostic::new(kind, span, message);
        tracing::warn!(kind = %diag.kind, "{}", diag);
        self.items.push(diag);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    /// Folds every diagnostic into one `syn::Error`, in report order.
    pub fn into_error(self) -> Option<Error> {
        let mut iter = self.items.into_iter();
        let mut error = iter.next()?.to_error();
        for diag in iter {
            error.combine(diag.to_error());
        }
        Some(error)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Builds the error returned for an unrecoverable builder-state violation.
pub(crate) fn internal_error(message: impl fmt::Display) -> Error {
    Error::new(Span::call_site(), format!("internal error: {}", message))
}
