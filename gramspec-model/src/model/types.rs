use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A name together with the location it was written at.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub text: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<syn::Ident> for Identifier {
    fn from(ident: syn::Ident) -> Self {
        Self::new(ident.to_string(), ident.span())
    }
}

impl ToTokens for Identifier {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = syn::Ident::new(&self.text, self.span);
        ident.to_tokens(tokens);
    }
}

/// Raw literal text as written in the source, quotes and escapes included.
///
/// Scanner literals use single or double quotes and may carry a trailing `i`
/// to request case-insensitive matching: `'begin'i`.
#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

/// The text a [`StringLiteral`] stands for once quotes and escapes are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretedLiteral {
    pub text: String,
    pub case_insensitive: bool,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    /// Strips the quotes, the case-insensitivity suffix and the escapes.
    pub fn interpret(&self) -> InterpretedLiteral {
        let mut src = self.value.as_str();
        let mut case_insensitive = false;
        if src.len() > 2 && src.ends_with('i') && (src.starts_with('\'') || src.starts_with('"')) {
            case_insensitive = true;
            src = &src[..src.len() - 1];
        }

        let body = match (src.chars().next(), src.chars().last()) {
            (Some(open @ ('\'' | '"')), Some(close)) if src.len() >= 2 && open == close => {
                &src[1..src.len() - 1]
            }
            _ => src,
        };

        let mut text = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                text.push(c);
                continue;
            }
            match chars.next() {
                Some('0') => text.push('\0'),
                Some('a') => text.push('\x07'),
                Some('b') => text.push('\x08'),
                Some('t') => text.push('\t'),
                Some('n') => text.push('\n'),
                Some('v') => text.push('\x0b'),
                Some('f') => text.push('\x0c'),
                Some('r') => text.push('\r'),
                // line continuation
                Some('\n') => {}
                Some(other) => text.push(other),
                None => text.push('\\'),
            }
        }

        InterpretedLiteral {
            text,
            case_insensitive,
        }
    }
}

impl PartialEq for StringLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for StringLiteral {}

impl Hash for StringLiteral {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl ToTokens for StringLiteral {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let lit = syn::LitStr::new(&self.interpret().text, self.span);
        lit.to_tokens(tokens);
    }
}
