//! Closed word lists for the keyword and type categories.

/// Reserved words highlighted as keywords.
pub const KEYWORDS: &[&str] = &[
    "package", "import", "func", "type", "struct", "return", "if", "for", "range", "var",
    "const", "err", "nil", "true", "false",
];

/// Builtin and illustrative type names.
pub const TYPES: &[&str] = &["string", "int", "bool", "error", "any", "context", "User"];

/// ASCII word characters, the same set a regex `\b` boundary uses in ASCII mode.
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub(crate) fn is_type(word: &str) -> bool {
    TYPES.contains(&word)
}
