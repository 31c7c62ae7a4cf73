use std::fmt;

/// Token kinds produced by [`tokenize`](crate::tokenize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// An identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    Identifier,
    /// A numeric literal run (decimal, hex, binary, octal, scientific).
    Number,
    /// A single- or double-quoted string literal, raw lexeme including quotes.
    Str,
    /// An operator or punctuation token, one or two characters.
    Operator,
    /// A `//` line comment.
    Comment,
}

/// A single lexed token. Created fresh per evaluation call; answers change
/// on every keystroke, so tokens are never cached across checks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Whether this token is an operator with exactly the given text.
    #[must_use]
    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
