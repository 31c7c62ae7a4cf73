use crate::tokenize::tokenize;
use crate::types::{Token, TokenKind};

/// Tolerances applied to a raw answer before structural matching.
///
/// Application is a pure function of `(raw string, policy)`; it never reads
/// or writes the binding environment. The defaults match what a lesson
/// author almost always wants: comments ignored, one trailing `;` stripped,
/// up to two layers of symmetric wrapping brackets stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CheckPolicy {
    /// Drop comment tokens (and comment text) before matching.
    pub ignore_comments: bool,
    /// Strip one trailing `;` from the answer.
    pub strip_terminator: bool,
    /// Strip up to two symmetric `()`/`[]`/`{}` wrappers spanning the whole
    /// answer, each followed by one trailing `,`.
    pub strip_wrappers: bool,
    /// Token texts that immediately fail the answer when present.
    pub forbidden: Vec<String>,
    /// Operators that must have no whitespace directly before or after them
    /// in the original raw string.
    pub tight_operators: Vec<String>,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            ignore_comments: true,
            strip_terminator: true,
            strip_wrappers: true,
            forbidden: Vec::new(),
            tight_operators: Vec::new(),
        }
    }
}

/// The result of a successful policy application: the stripped answer text
/// and its token stream (comments already dropped when the policy says so).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Normalized {
    /// Token texts concatenated with nothing in between. Used for equality
    /// checks that must not care about inter-token spacing, e.g. comparing
    /// an answer against a bound `Foo::Bar`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl CheckPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add token texts to the forbidden list.
    #[must_use]
    pub fn forbid<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forbidden.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Add operators that must appear without adjacent whitespace.
    #[must_use]
    pub fn no_spaces_around<I, S>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tight_operators.extend(ops.into_iter().map(Into::into));
        self
    }

    /// Apply this policy to a raw answer string.
    ///
    /// Returns `None` when the answer violates the policy (a forbidden token
    /// is present, or a tight operator has adjacent whitespace in the
    /// original string); callers must treat that as a wrong answer without
    /// attempting structural matching.
    #[must_use]
    pub fn apply(&self, raw: &str) -> Option<Normalized> {
        let mut text = raw.trim();
        if self.strip_terminator {
            text = text.strip_suffix(';').unwrap_or(text).trim_end();
        }
        if self.strip_wrappers {
            for _ in 0..2 {
                text = text.trim();
                if let Some(inner) = strip_outer_pair(text) {
                    text = inner.trim();
                }
                text = text.strip_suffix(',').unwrap_or(text);
            }
            text = text.trim();
        }

        let mut tokens = tokenize(text);
        let text = if self.ignore_comments {
            tokens.retain(|t| t.kind != TokenKind::Comment);
            strip_line_comments(text).trim().to_owned()
        } else {
            text.to_owned()
        };

        if tokens.iter().any(|t| self.forbidden.contains(&t.text)) {
            return None;
        }

        // Whitespace is already gone from tokens, so adjacency is checked
        // against the original (trimmed) raw string.
        let raw = raw.trim();
        for op in &self.tight_operators {
            for (i, _) in raw.match_indices(op.as_str()) {
                let before = raw[..i].chars().next_back();
                let after = raw[i + op.len()..].chars().next();
                if before.is_some_and(char::is_whitespace)
                    || after.is_some_and(char::is_whitespace)
                {
                    return None;
                }
            }
        }

        Some(Normalized { text, tokens })
    }
}

/// If `s` is wholly wrapped in one matching `()`/`[]`/`{}` pair, return the
/// inside. The scan is quote-aware so brackets inside string literals do not
/// count, and a pair that closes early (`(a)(b)`) does not qualify.
fn strip_outer_pair(s: &str) -> Option<&str> {
    let open = s.chars().next()?;
    let close = match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => return None,
    };
    let mut depth = 0usize;
    let mut in_str: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if let Some(q) = in_str {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_str = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            in_str = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (i == s.len() - 1).then(|| &s[1..i]);
            }
        }
    }
    None
}

/// Remove `//`-to-end-of-line runs from `s`, preserving the line breaks.
/// Quote-aware: `//` inside a string literal is kept.
fn strip_line_comments(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut in_str: Option<char> = None;
    let mut escaped = false;
    while let Some(c) = chars.next() {
        if let Some(q) = in_str {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_str = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            in_str = Some(c);
            out.push(c);
        } else if c == '/' && chars.peek() == Some(&'/') {
            for skipped in chars.by_ref() {
                if skipped == '\n' {
                    out.push('\n');
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
