use std::collections::HashMap;

use crate::tokenize::tokenize;
use crate::types::{AnswerSpec, PatternPart, TokenKind};

/// Build a token-pattern specification from one worked-example fragment.
///
/// Each identifier in the reference becomes a generic identifier slot, or a
/// `same_as` slot when the `bind` map names a binding for it; numbers and
/// strings become kind slots; every other token is required literally.
/// Comment tokens are skipped, because the default policy drops them from
/// answers and the pattern's part count must equal the answer's token count.
///
/// This runs once, at authoring time, so content authors do not hand-write
/// every token class.
#[must_use]
pub fn pattern_from_reference(reference: &str, bind: &HashMap<String, String>) -> AnswerSpec {
    let parts = tokenize(reference)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .map(|t| match t.kind {
            TokenKind::Identifier => match bind.get(&t.text) {
                Some(target) => PatternPart::SameAs(target.clone()),
                None => PatternPart::Identifier,
            },
            TokenKind::Number => PatternPart::Number,
            TokenKind::Str => PatternPart::Str,
            TokenKind::Operator | TokenKind::Comment => PatternPart::Literal(t.text),
        })
        .collect();
    AnswerSpec::Pattern {
        parts,
        policy: None,
    }
}
