//! # Codeview Syntax
//!
//! Lightweight highlighting for the snippets shown in the code viewer.
//!
//! ## Why not a real parser?
//!
//! The snippets are short, developer-authored Go fragments. All we need is a
//! handful of lexical categories so the page can color them:
//! - **Keyword**: reserved words (`func`, `if`, `nil`, ...)
//! - **String**: single, double or backtick quoted literals
//! - **Comment**: `//` to end of line
//! - **Type**: builtin and illustrative type names
//!
//! ## Two strategies
//!
//! - [`HighlightMode::Lexer`] scans the text once and produces a flat list
//!   of non-overlapping [`Token`]s, which are then rendered as markup.
//!   Strings and comments shield their contents from every other category.
//! - [`HighlightMode::Passes`] is the ordered rewrite pipeline
//!   (keyword → string → comment → type) where every pass runs over the
//!   markup produced by the previous one. It keeps the historical output,
//!   including keywords highlighted inside strings and `//` inside a string
//!   being treated as a comment.
//!
//! Both operate on text that is already HTML-escaped (see [`escape_html`])
//! and only ever add `<span class="...">` wrappers.

mod lexer;
mod markup;
mod passes;
mod vocabulary;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use lexer::{Lexer, tokenize};
pub use markup::{CLOSE_TAG, escape_html, open_tag, render, strip_markup, unescape_html};
pub use passes::{Pass, highlight_passes};
pub use vocabulary::{KEYWORDS, TYPES};

/// Errors that can occur when configuring the highlighter.
///
/// Highlighting itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unknown highlight mode: {0}")]
    UnknownMode(String),
}

/// Lexical category of a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
    Type,
    Plain,
}

impl TokenKind {
    /// Returns the CSS class used to mark this kind, `None` for plain text.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            TokenKind::Keyword => Some("keyword"),
            TokenKind::String => Some("string"),
            TokenKind::Comment => Some("comment"),
            TokenKind::Type => Some("type"),
            TokenKind::Plain => None,
        }
    }
}

/// A classified span of the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Kind of lexical element
    pub kind: TokenKind,
    /// Byte range in the source
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

/// Which highlighting strategy to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    /// Single-pass lexer; strings and comments suppress other categories
    #[default]
    Lexer,
    /// Ordered keyword/string/comment/type rewrite passes
    Passes,
}

impl HighlightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightMode::Lexer => "lexer",
            HighlightMode::Passes => "passes",
        }
    }
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightMode {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexer" => Ok(HighlightMode::Lexer),
            "passes" | "legacy" => Ok(HighlightMode::Passes),
            other => Err(SyntaxError::UnknownMode(other.to_string())),
        }
    }
}

/// Turns escaped source text into annotated markup.
///
/// The highlighter holds no state besides its mode; the same input always
/// produces the same output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlighter {
    mode: HighlightMode,
}

impl Highlighter {
    pub fn new(mode: HighlightMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    /// Highlights already-escaped text.
    pub fn highlight(&self, escaped: &str) -> String {
        let markup = match self.mode {
            HighlightMode::Lexer => render(escaped, &tokenize(escaped)),
            HighlightMode::Passes => highlight_passes(escaped),
        };
        tracing::trace!(
            mode = %self.mode,
            input = escaped.len(),
            output = markup.len(),
            "highlighted snippet"
        );
        markup
    }

    /// Escapes raw source text and highlights it.
    pub fn highlight_source(&self, source: &str) -> String {
        self.highlight(&escape_html(source))
    }

    /// Returns the lexer tokens for the text, regardless of mode.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenize(text)
    }
}
