//! Ordered rewrite passes over markup.
//!
//! Each [`Pass`] takes the markup produced by the one before it and wraps
//! its matches. The order is fixed: keyword, string, comment, type.
//!
//! Before a pass searches, the current markup is projected into a *mask* of
//! identical byte length in which:
//! - every tag (`<span ...>`, `</span>`) is blanked out, so attributes are
//!   never matched;
//! - text already wrapped in the pass's own category is blanked out, so a
//!   pass run twice does not double-wrap.
//!
//! Text inside spans of *other* categories stays visible. That is why a
//! string literal swallows keyword spans inside it and why `//` inside a
//! string gets a comment span running to end of line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::TokenKind;
use crate::markup::{CLOSE_TAG, open_tag, push_wrapped};
use crate::vocabulary::{KEYWORDS, TYPES};

/// Byte used to blank out masked regions. It is neither a word character,
/// a quote, a slash nor a newline.
const MASK: char = '\0';

static KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| word_pattern(KEYWORDS));

static STRING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`"#)
        .expect("string pattern is valid")
});

static COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//.*").expect("comment pattern is valid"));

static TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| word_pattern(TYPES));

/// Whole-word alternation with ASCII word boundaries.
fn word_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?-u:\b)(?:{alternation})(?-u:\b)")).expect("word pattern is valid")
}

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Keyword,
    String,
    Comment,
    Type,
}

impl Pass {
    /// Pipeline order.
    pub const ALL: [Pass; 4] = [Pass::Keyword, Pass::String, Pass::Comment, Pass::Type];

    pub fn kind(&self) -> TokenKind {
        match self {
            Pass::Keyword => TokenKind::Keyword,
            Pass::String => TokenKind::String,
            Pass::Comment => TokenKind::Comment,
            Pass::Type => TokenKind::Type,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Pass::Keyword => &*KEYWORD_PATTERN,
            Pass::String => &*STRING_PATTERN,
            Pass::Comment => &*COMMENT_PATTERN,
            Pass::Type => &*TYPE_PATTERN,
        }
    }

    /// Wraps every match of this pass in `markup`.
    pub fn apply(&self, markup: &str) -> String {
        let kind = self.kind();
        let masked = mask(markup, kind);
        let mut out = String::with_capacity(markup.len() + markup.len() / 4);
        let mut last = 0;
        let mut wrapped = 0usize;

        for m in self.pattern().find_iter(&masked) {
            let (Some(gap), Some(text)) = (markup.get(last..m.start()), markup.get(m.range()))
            else {
                continue;
            };
            out.push_str(gap);
            push_wrapped(&mut out, kind, text);
            last = m.end();
            wrapped += 1;
        }

        out.push_str(&markup[last..]);
        tracing::trace!(pass = ?self, wrapped, "applied highlight pass");
        out
    }
}

/// Runs all four passes in order.
pub fn highlight_passes(escaped: &str) -> String {
    Pass::ALL
        .iter()
        .fold(escaped.to_string(), |markup, pass| pass.apply(&markup))
}

/// Projects `markup` into a same-length string with tags and `own`-category
/// text replaced by [`MASK`].
fn mask(markup: &str, own: TokenKind) -> String {
    let own_open = open_tag(own);
    let mut masked = String::with_capacity(markup.len());
    // One entry per open span: whether it belongs to `own`.
    let mut open_spans: Vec<bool> = Vec::new();
    let mut own_depth = 0usize;
    let mut i = 0;

    while i < markup.len() {
        let rest = &markup[i..];

        if rest.starts_with('<') {
            let tag_len = rest.find('>').map_or(rest.len(), |p| p + 1);
            let tag = &rest[..tag_len];

            if tag == CLOSE_TAG {
                if open_spans.pop() == Some(true) {
                    own_depth -= 1;
                }
            } else {
                let is_own = Some(tag) == own_open;
                if is_own {
                    own_depth += 1;
                }
                open_spans.push(is_own);
            }

            masked.extend(std::iter::repeat_n(MASK, tag_len));
            i += tag_len;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        if own_depth > 0 {
            masked.extend(std::iter::repeat_n(MASK, ch.len_utf8()));
        } else {
            masked.push(ch);
        }
        i += ch.len_utf8();
    }

    masked
}
