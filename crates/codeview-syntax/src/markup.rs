//! Markup helpers: escaping, span wrapping and de-annotation.
//!
//! ## Learning: Building Strings Without Reallocating
//!
//! `String::with_capacity` reserves the expected size up front and
//! `push_str` appends in place. Every helper here walks its input once.

use crate::{Token, TokenKind};

/// Closing tag shared by every category.
pub const CLOSE_TAG: &str = "</span>";

/// Returns the opening tag for a category, `None` for plain text.
pub fn open_tag(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Keyword => Some(r#"<span class="keyword">"#),
        TokenKind::String => Some(r#"<span class="string">"#),
        TokenKind::Comment => Some(r#"<span class="comment">"#),
        TokenKind::Type => Some(r#"<span class="type">"#),
        TokenKind::Plain => None,
    }
}

/// Appends `text` to `out`, wrapped in the tags for `kind`.
pub(crate) fn push_wrapped(out: &mut String, kind: TokenKind, text: &str) {
    match open_tag(kind) {
        Some(open) => {
            out.push_str(open);
            out.push_str(text);
            out.push_str(CLOSE_TAG);
        }
        None => out.push_str(text),
    }
}

/// Renders tokens over `source` as annotated markup.
///
/// Tokens must be sorted and non-overlapping; gaps between them are copied
/// through as plain text.
pub fn render(source: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(source.len() + tokens.len() * 24);
    let mut last = 0;

    for token in tokens {
        let (Some(gap), Some(text)) = (
            source.get(last..token.span.start),
            source.get(token.span.clone()),
        ) else {
            tracing::debug!(?token.span, "skipping out-of-order token");
            continue;
        };
        out.push_str(gap);
        push_wrapped(&mut out, token.kind, text);
        last = token.span.end;
    }

    out.push_str(&source[last..]);
    out
}

/// Escapes the characters that would otherwise be read as markup.
///
/// Quotes are left alone: the string category depends on seeing them.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverses [`escape_html`], also accepting `&quot;` and `&#39;`.
///
/// Unknown entities are kept verbatim.
pub fn unescape_html(text: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Returns the plain text of annotated markup: tags removed, entities decoded.
pub fn strip_markup(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                // Unterminated tag: nothing after it is markup we produced.
                rest = "";
            }
        }
    }

    text.push_str(rest);
    unescape_html(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip_with_entities_in_source() {
        let source = "a < b && s == \"&lt;\" // 'x'";
        let escaped = escape_html(source);
        assert_eq!(escaped, "a &lt; b &amp;&amp; s == \"&amp;lt;\" // 'x'");
        assert_eq!(unescape_html(&escaped), source);
    }

    #[test]
    fn test_unescape_unknown_entity() {
        assert_eq!(unescape_html("&nbsp;&amp;&"), "&nbsp;&&");
        assert_eq!(unescape_html("&quot;hi&#39;"), "\"hi'");
    }

    #[test]
    fn test_strip_nested_markup() {
        let markup = r#"s := <span class="string">"http:<span class="comment">//x"</span></span>"#;
        assert_eq!(strip_markup(markup), r#"s := "http://x""#);
    }

    #[test]
    fn test_render_fills_gaps() {
        let source = "if x";
        let tokens = vec![Token::new(TokenKind::Keyword, 0..2)];
        assert_eq!(render(source, &tokens), r#"<span class="keyword">if</span> x"#);
    }

    #[test]
    fn test_render_skips_overlapping_tokens() {
        let source = "abcdef";
        let tokens = vec![
            Token::new(TokenKind::Type, 0..3),
            Token::new(TokenKind::Keyword, 2..4),
        ];
        assert_eq!(render(source, &tokens), r#"<span class="type">abc</span>def"#);
    }
}
