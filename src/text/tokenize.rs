//! Whitespace tokenization and case/punctuation-insensitive marker matching.

/// One whitespace-delimited word of the source text.
///
/// `raw` keeps the original punctuation for display; `normalized` is only used for comparisons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    raw: String,
    normalized: String,
}

impl Token {
    /// Build a token, computing its normalized form once.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }

    /// Token exactly as it appeared in the text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased token with everything except `[A-Za-z0-9_]` removed.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Prefix match of the normalized form against a lower-case marker literal.
    pub fn matches_marker(&self, marker: &str) -> bool {
        self.normalized.starts_with(marker)
    }
}

/// Split on runs of whitespace, dropping empty tokens and preserving order and punctuation.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace().map(Token::new).collect()
}

/// Strip every character that is not an ASCII letter, digit or underscore, then lower-case.
///
/// Total over any input; non-ASCII letters are stripped like a regex `\w` class would.
pub fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `true` iff `normalize(token)` equals `marker` or starts with it.
///
/// "Romeos" and "Romeoville" match "romeo" too; the over-match is kept on purpose.
pub fn matches_marker(token: &str, marker: &str) -> bool {
    normalize(token).starts_with(marker)
}

#[cfg(test)]
#[path = "../../tests/unit/text/tokenize.rs"]
mod tests;
