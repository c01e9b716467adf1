//! Single-pass lexer.
//!
//! ## Learning: Iterators Over Borrowed Input
//!
//! `Lexer<'a>` borrows the source instead of copying it. Each call to
//! `next()` advances a byte cursor and hands back a [`Token`] holding only a
//! byte range, so the whole scan allocates nothing until collected.
//!
//! Whichever construct opens first owns the text it covers: a `//` inside a
//! string stays part of the string, a quote inside a comment stays part of
//! the comment, and neither is ever searched for keywords or types.

use crate::vocabulary::{is_keyword, is_type, is_word_byte};
use crate::{Token, TokenKind};

/// Streaming tokenizer over escaped source text.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    /// Scans a quoted literal opened at `start`.
    ///
    /// Returns the end offset (past the closing quote), or `None` when the
    /// literal never closes. A backslash escapes any following character
    /// except a newline.
    fn string_end(&self, start: usize, quote: u8) -> Option<usize> {
        let bytes = self.bytes();
        let mut i = start + 1;

        while let Some(&b) = bytes.get(i) {
            if b == b'\\' {
                let escaped = self.source.get(i + 1..)?.chars().next()?;
                if escaped == '\n' {
                    return None;
                }
                i += 1 + escaped.len_utf8();
            } else if b == quote {
                return Some(i + 1);
            } else {
                i += 1;
            }
        }

        None
    }

    fn line_end(&self, start: usize) -> usize {
        self.source[start..]
            .find('\n')
            .map_or(self.source.len(), |offset| start + offset)
    }

    fn word_end(&self, start: usize) -> usize {
        let bytes = self.bytes();
        let mut end = start;
        while end < bytes.len() && is_word_byte(bytes[end]) {
            end += 1;
        }
        end
    }

    /// Consumes a run of text that cannot start any token.
    fn plain_end(&self, start: usize) -> usize {
        let bytes = self.bytes();
        let mut end = start + 1;
        while end < bytes.len() && !starts_token(bytes[end]) {
            end += 1;
        }
        end
    }
}

fn starts_token(b: u8) -> bool {
    matches!(b, b'/' | b'"' | b'\'' | b'`') || is_word_byte(b)
}

fn classify(word: &str) -> TokenKind {
    if is_keyword(word) {
        TokenKind::Keyword
    } else if is_type(word) {
        TokenKind::Type
    } else {
        TokenKind::Plain
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start = self.pos;
        let bytes = self.bytes();
        let first = *bytes.get(start)?;

        let (kind, end) = match first {
            b'/' if bytes.get(start + 1) == Some(&b'/') => {
                (TokenKind::Comment, self.line_end(start))
            }
            quote @ (b'"' | b'\'' | b'`') => match self.string_end(start, quote) {
                Some(end) => (TokenKind::String, end),
                None => (TokenKind::Plain, start + 1),
            },
            b if is_word_byte(b) => {
                let end = self.word_end(start);
                (classify(&self.source[start..end]), end)
            }
            _ => (TokenKind::Plain, self.plain_end(start)),
        };

        self.pos = end;
        Some(Token::new(kind, start..end))
    }
}

/// Tokenizes the whole text, merging adjacent plain runs.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for token in Lexer::new(source) {
        match tokens.last_mut() {
            Some(prev) if prev.kind == TokenKind::Plain && token.kind == TokenKind::Plain => {
                prev.span.end = token.span.end;
            }
            _ => tokens.push(token),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .into_iter()
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    #[test]
    fn test_tokens_cover_input() {
        let source = "func main() {\n    ctx := context.Background() // start\n}";
        let tokens = tokenize(source);
        let mut last = 0;
        for token in &tokens {
            assert_eq!(token.span.start, last);
            last = token.span.end;
        }
        assert_eq!(last, source.len());
    }

    #[test]
    fn test_basic_categories() {
        assert_eq!(
            kinds("var n int // count"),
            vec![
                (TokenKind::Keyword, "var"),
                (TokenKind::Plain, " n "),
                (TokenKind::Type, "int"),
                (TokenKind::Plain, " "),
                (TokenKind::Comment, "// count"),
            ]
        );
    }

    #[test]
    fn test_string_shields_keywords() {
        assert_eq!(
            kinds(r#"x("if true")"#),
            vec![
                (TokenKind::Plain, "x("),
                (TokenKind::String, r#""if true""#),
                (TokenKind::Plain, ")"),
            ]
        );
    }

    #[test]
    fn test_comment_shields_quotes() {
        assert_eq!(
            kinds("// it's \"fine\"\nnil"),
            vec![
                (TokenKind::Comment, "// it's \"fine\""),
                (TokenKind::Plain, "\n"),
                (TokenKind::Keyword, "nil"),
            ]
        );
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(
            kinds("iffy errs strings"),
            vec![(TokenKind::Plain, "iffy errs strings")]
        );
    }

    #[test]
    fn test_non_ascii_is_a_boundary() {
        // Hangul is not an ASCII word character, so `err` still stands alone.
        assert_eq!(
            kinds("err한"),
            vec![(TokenKind::Keyword, "err"), (TokenKind::Plain, "한")]
        );
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert_eq!(
            kinds(r#""a\"b" c"#),
            vec![(TokenKind::String, r#""a\"b""#), (TokenKind::Plain, " c")]
        );
    }

    #[test]
    fn test_quote_styles_do_not_nest() {
        assert_eq!(
            kinds(r#"`dynamodbav:"PK"`"#),
            vec![(TokenKind::String, r#"`dynamodbav:"PK"`"#)]
        );
    }

    #[test]
    fn test_unterminated_string_is_plain() {
        assert_eq!(
            kinds(r#"say "hi"#),
            vec![(TokenKind::Plain, r#"say "hi"#)]
        );
    }

    #[test]
    fn test_backslash_newline_breaks_string() {
        // Neither quote finds a partner, so both stay plain.
        assert_eq!(
            kinds("\"a\\\nb\" if"),
            vec![
                (TokenKind::Plain, "\"a\\\nb\" "),
                (TokenKind::Keyword, "if"),
            ]
        );
    }

    #[test]
    fn test_single_slash_is_plain() {
        assert_eq!(kinds("a / b"), vec![(TokenKind::Plain, "a / b")]);
    }
}
