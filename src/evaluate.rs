use std::time::Instant;

use crate::policy::{CheckPolicy, Normalized};
use crate::types::{
    AnswerSpec, Bindings, CheckReport, ElementOrder, PatternPart, SimpleRule, Token, TokenKind,
};

/// Check every blank of one template in source order against one fresh
/// binding environment, returning per-blank verdicts.
///
/// The environment is allocated here and discarded on return: cross-blank
/// bindings are visible within this batch and nowhere else. Hosts must pass
/// blanks in a stable source order on every check pass, because `same_as`
/// treats an unbound target as an automatic pass.
///
/// # Example
///
/// ```
/// use blankcheck::{AnswerSpec, check_batch, identifier, same_as};
///
/// let declare: AnswerSpec = identifier().bind("PIN").into();
/// let reuse: AnswerSpec = same_as("PIN").into();
///
/// let verdicts = check_batch([(&declare, "ledPin"), (&reuse, "ledPin")]);
/// assert_eq!(verdicts, [true, true]);
/// ```
pub fn check_batch<'a, I>(blanks: I) -> Vec<bool>
where
    I: IntoIterator<Item = (&'a AnswerSpec, &'a str)>,
{
    let mut env = Bindings::new();
    blanks
        .into_iter()
        .map(|(spec, value)| eval_spec(spec, value, &mut env))
        .collect()
}

/// Like [`check_batch`], but returns named verdicts, the final binding
/// snapshot, and the wall-clock duration of the pass.
pub fn check_batch_detailed<'a, I>(blanks: I) -> CheckReport
where
    I: IntoIterator<Item = (&'a str, &'a AnswerSpec, &'a str)>,
{
    let start = Instant::now();
    let mut env = Bindings::new();
    let verdicts: Vec<(String, bool)> = blanks
        .into_iter()
        .map(|(name, spec, value)| (name.to_owned(), eval_spec(spec, value, &mut env)))
        .collect();
    CheckReport::new(verdicts, env, start.elapsed())
}

pub(crate) fn eval_spec(spec: &AnswerSpec, value: &str, env: &mut Bindings) -> bool {
    let value = value.trim();
    match spec {
        AnswerSpec::Literal(expected) => normalize_ws(value) == normalize_ws(expected),
        AnswerSpec::Values { values } => {
            let v = normalize_ws(value);
            values.iter().any(|c| normalize_ws(c) == v)
        }
        AnswerSpec::Rule(rule) => eval_simple_rule(rule, value),
        AnswerSpec::AnyOf(specs) => specs.iter().any(|s| eval_spec(s, value, env)),
        AnswerSpec::Identifier {
            allow_qualified,
            bind_as,
            policy,
        } => {
            let Some(norm) = apply_policy(policy, value) else {
                return false;
            };
            let Some(accepted) = accepted_identifier(&norm.tokens, *allow_qualified) else {
                return false;
            };
            if let Some(name) = bind_as {
                env.bind(name.clone(), accepted);
            }
            true
        }
        AnswerSpec::Number {
            int_only,
            min,
            max,
            one_of,
            policy,
        } => {
            let Some(norm) = apply_policy(policy, value) else {
                return false;
            };
            let Some(n) = parse_number(norm.text.trim()) else {
                return false;
            };
            // An explicit accept list overrides the range bounds entirely.
            if !one_of.is_empty() {
                return one_of.iter().any(|c| *c == n);
            }
            if *int_only && n.fract() != 0.0 {
                return false;
            }
            min.is_none_or(|m| n >= m) && max.is_none_or(|m| n <= m)
        }
        AnswerSpec::Str {
            require_quoted,
            one_of,
            regex,
            bind_as,
            policy,
        } => {
            let Some(norm) = apply_policy(policy, value) else {
                return false;
            };
            let text = norm.text.as_str();
            if *require_quoted && !text.starts_with(['"', '\'']) {
                return false;
            }
            let content = unquote(text);
            let ok = if !one_of.is_empty() {
                one_of.iter().any(|c| c == text || c == content)
            } else if let Some(re) = regex {
                re.is_match(content)
            } else {
                !content.is_empty()
            };
            if ok {
                if let Some(name) = bind_as {
                    env.bind(name.clone(), text);
                }
            }
            ok
        }
        AnswerSpec::SameAs { targets, policy } => {
            let Some(norm) = apply_policy(policy, value) else {
                return false;
            };
            // Spacing must not matter, so compare concatenated token text.
            let answer = norm.joined();
            let mut saw_bound = false;
            for target in targets {
                if let Some(bound) = env.get(target) {
                    saw_bound = true;
                    if bound == answer {
                        return true;
                    }
                }
            }
            // No target bound yet: pass vacuously. The host re-checks every
            // blank per pass, so the constraint takes hold once the target
            // blank binds.
            !saw_bound
        }
        AnswerSpec::Call { name, args, policy } => {
            let Some(norm) = apply_policy(policy, value) else {
                return false;
            };
            eval_call(name, args, &norm.text, env)
        }
        AnswerSpec::InitList {
            elements,
            order,
            policy,
        } => {
            if apply_policy(policy, value).is_none() {
                return false;
            }
            // Wrapper stripping would delete the braces this variant
            // requires, so match the terminator-stripped raw value instead.
            let strip = policy.as_ref().is_none_or(|p| p.strip_terminator);
            let mut target = value;
            if strip {
                target = target.strip_suffix(';').unwrap_or(target).trim_end();
            }
            eval_init_list(elements, *order, target, env)
        }
        AnswerSpec::Pattern { parts, policy } => {
            let Some(norm) = apply_policy(policy, value) else {
                return false;
            };
            if parts.len() != norm.tokens.len() {
                return false;
            }
            parts
                .iter()
                .zip(&norm.tokens)
                .all(|(part, token)| pattern_part_matches(part, token, env))
        }
    }
}

fn apply_policy(policy: &Option<CheckPolicy>, value: &str) -> Option<Normalized> {
    match policy {
        Some(p) => p.apply(value),
        None => CheckPolicy::default().apply(value),
    }
}

fn eval_simple_rule(rule: &SimpleRule, value: &str) -> bool {
    let v = normalize_ws(value);
    if rule.equals.as_ref().is_some_and(|e| *e == v) {
        return true;
    }
    if rule.one_of.iter().any(|c| *c == v) {
        return true;
    }
    if rule
        .contains
        .as_ref()
        .is_some_and(|c| v.contains(c.as_str()))
    {
        return true;
    }
    rule.matches.as_ref().is_some_and(|re| re.is_match(&v))
}

/// The accepted textual value of an identifier answer: a single identifier
/// token, or (when qualified names are allowed) an identifier/`.`|`::`
/// alternation starting and ending with an identifier, joined without
/// spacing.
fn accepted_identifier(tokens: &[Token], allow_qualified: bool) -> Option<String> {
    match tokens {
        [t] if t.kind == TokenKind::Identifier => Some(t.text.clone()),
        _ if allow_qualified => qualified_name(tokens),
        _ => None,
    }
}

fn qualified_name(tokens: &[Token]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let mut expect_identifier = true;
    for token in tokens {
        if expect_identifier {
            if token.kind != TokenKind::Identifier {
                return None;
            }
        } else if !(token.is_op(".") || token.is_op("::")) {
            return None;
        }
        expect_identifier = !expect_identifier;
    }
    // A well-formed name ends on an identifier, not a separator.
    if expect_identifier {
        return None;
    }
    Some(tokens.iter().map(|t| t.text.as_str()).collect())
}

/// Parse a numeric literal: decimal, scientific, `0x`/`0b`/`0o`, underscore
/// separators, optional sign.
#[allow(clippy::cast_precision_loss)]
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned.as_str())),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()? as f64
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).ok()? as f64
    } else if let Some(oct) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        u64::from_str_radix(oct, 8).ok()? as f64
    } else {
        body.parse::<f64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn eval_call(name: &str, args: &[AnswerSpec], text: &str, env: &mut Bindings) -> bool {
    let text = text.trim();
    let Some(open) = text.find('(') else {
        return false;
    };
    if text[..open].trim() != name {
        return false;
    }
    if !group_spans_to_end(text, open, '(', ')') {
        return false;
    }
    let inner = &text[open + 1..text.len() - 1];
    let actual = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(inner)
    };
    if actual.len() != args.len() {
        return false;
    }
    args.iter()
        .zip(actual)
        .all(|(spec, arg)| eval_spec(spec, arg, env))
}

fn eval_init_list(
    elements: &[AnswerSpec],
    order: ElementOrder,
    target: &str,
    env: &mut Bindings,
) -> bool {
    let target = target.trim();
    if !target.starts_with('{') || !group_spans_to_end(target, 0, '{', '}') {
        return false;
    }
    let inner = &target[1..target.len() - 1];
    let mut actual = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(inner)
    };
    // One trailing comma inside the braces is tolerated.
    if actual.len() == elements.len() + 1 && actual.last().is_some_and(|s| s.trim().is_empty()) {
        actual.pop();
    }
    if actual.len() != elements.len() {
        return false;
    }
    match order {
        ElementOrder::Strict => elements
            .iter()
            .zip(actual)
            .all(|(spec, element)| eval_spec(spec, element, env)),
        ElementOrder::Any => {
            let mut used = vec![false; actual.len()];
            for spec in elements {
                let matched = actual.iter().enumerate().find_map(|(i, element)| {
                    (!used[i] && eval_spec(spec, element, env)).then_some(i)
                });
                match matched {
                    Some(i) => used[i] = true,
                    None => return false,
                }
            }
            true
        }
    }
}

fn pattern_part_matches(part: &PatternPart, token: &Token, env: &Bindings) -> bool {
    match part {
        PatternPart::Literal(text) => token.text == *text,
        PatternPart::Identifier => token.kind == TokenKind::Identifier,
        PatternPart::Number => token.kind == TokenKind::Number,
        PatternPart::Str => token.kind == TokenKind::Str,
        PatternPart::OneOf(options) => options.iter().any(|o| *o == token.text),
        PatternPart::SameAs(target) => env.get(target).is_none_or(|bound| bound == token.text),
        PatternPart::AnyOf(parts) => parts.iter().any(|p| pattern_part_matches(p, token, env)),
    }
}

/// Whether the bracket group opened at `open_idx` closes exactly at the last
/// character of `s`. Quote-aware; only the given bracket pair is tracked.
fn group_spans_to_end(s: &str, open_idx: usize, open: char, close: char) -> bool {
    let mut depth = 0usize;
    let mut in_str: Option<char> = None;
    let mut escaped = false;
    for (offset, c) in s[open_idx..].char_indices() {
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
            if depth == 0 {
                return false;
            }
            depth -= 1;
            if depth == 0 {
                return open_idx + offset == s.len() - 1;
            }
        }
    }
    false
}

/// Split at top-level commas, respecting every bracket kind and string
/// literals.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut depth = 0i32;
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
        match c {
            '"' | '\'' => in_str = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip one layer of matching quotes, if present.
fn unquote(s: &str) -> &str {
    if s.len() >= 2 {
        let first = s.chars().next();
        let last = s.chars().next_back();
        if let (Some(q @ ('"' | '\'')), Some(l)) = (first, last) {
            if l == q {
                return &s[1..s.len() - 1];
            }
        }
    }
    s
}
