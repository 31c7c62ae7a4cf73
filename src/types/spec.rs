use std::fmt;

use regex::Regex;

use crate::policy::CheckPolicy;

use super::error::SpecError;

/// A regular expression embedded in a specification as data.
///
/// The pattern is compiled once, at construction (or deserialization). An
/// invalid pattern produces a node that never matches instead of a runtime
/// error, keeping the evaluator total; [`AnswerSpec::validate`] surfaces the
/// defect to the content author at load time.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct SpecRegex {
    source: String,
    compiled: Option<Regex>,
}

impl SpecRegex {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source).ok();
        Self { source, compiled }
    }

    /// The original pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the value matches. An invalid pattern never matches.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(value))
    }

    /// Check pattern validity, reporting the compile error if there is one.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.compiled.is_some() {
            return Ok(());
        }
        match Regex::new(&self.source) {
            Ok(_) => Ok(()),
            Err(source) => Err(SpecError::InvalidRegex {
                pattern: self.source.clone(),
                source,
            }),
        }
    }
}

impl PartialEq for SpecRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SpecRegex {}

impl From<String> for SpecRegex {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<&str> for SpecRegex {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<SpecRegex> for String {
    fn from(re: SpecRegex) -> Self {
        re.source
    }
}

impl fmt::Display for SpecRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// An untyped rule of alternatives, matched against the whitespace-normalized
/// answer. The provided alternatives are tried in `equals`, `one_of`,
/// `contains`, `matches` order; the first satisfied one wins. A rule with no
/// alternatives provided never matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimpleRule {
    pub equals: Option<String>,
    pub one_of: Vec<String>,
    pub contains: Option<String>,
    pub matches: Option<SpecRegex>,
}

/// Element ordering for [`AnswerSpec::InitList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElementOrder {
    /// Elements must appear in declaration order.
    #[default]
    Strict,
    /// Each expected element must match some not-yet-consumed actual element.
    Any,
}

/// One slot of a token pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PatternPart {
    /// The token text must equal this string exactly.
    Literal(String),
    /// Any identifier token.
    Identifier,
    /// Any number token.
    Number,
    /// Any string-literal token.
    Str,
    /// The token text must be one of these strings.
    OneOf(Vec<String>),
    /// The token text must equal the bound value of the named target;
    /// vacuously satisfied while the target is unbound.
    SameAs(String),
    /// Any of the nested parts may match.
    AnyOf(Vec<PatternPart>),
}

impl From<&str> for PatternPart {
    fn from(text: &str) -> Self {
        PatternPart::Literal(text.to_owned())
    }
}

impl From<String> for PatternPart {
    fn from(text: String) -> Self {
        PatternPart::Literal(text)
    }
}

/// The closed set of acceptable-answer shapes for one blank.
///
/// Every shape the platform can express is one of these variants; the
/// evaluator dispatches exhaustively, so adding a variant is a compile-time
/// decision rather than a silent fall-through.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnswerSpec {
    /// A single acceptable answer, compared with whitespace-normalized
    /// equality.
    Literal(String),
    /// A bare list of acceptable literal answers.
    Values { values: Vec<String> },
    /// An untyped alternative rule ([`SimpleRule`]).
    Rule(SimpleRule),
    /// A union of specifications; the first satisfied alternative wins.
    AnyOf(Vec<AnswerSpec>),
    /// A single identifier, optionally qualified (`a.b`, `a::b`), optionally
    /// recorded in the binding environment under `bind_as`.
    Identifier {
        allow_qualified: bool,
        bind_as: Option<String>,
        policy: Option<CheckPolicy>,
    },
    /// A numeric literal. A non-empty `one_of` list overrides the bounds
    /// entirely; otherwise `int_only`, `min`, and `max` apply as given.
    Number {
        int_only: bool,
        min: Option<f64>,
        max: Option<f64>,
        one_of: Vec<f64>,
        policy: Option<CheckPolicy>,
    },
    /// A string answer, optionally required to be quoted, accepted by list
    /// membership, regex, or (failing those) non-emptiness.
    Str {
        require_quoted: bool,
        one_of: Vec<String>,
        regex: Option<SpecRegex>,
        bind_as: Option<String>,
        policy: Option<CheckPolicy>,
    },
    /// The answer must equal the bound value of any listed target; if no
    /// target is bound yet, the check passes vacuously.
    SameAs {
        targets: Vec<String>,
        policy: Option<CheckPolicy>,
    },
    /// A function call `name(arg, ...)` with exact name and arity; each
    /// argument is evaluated against its child specification.
    Call {
        name: String,
        args: Vec<AnswerSpec>,
        policy: Option<CheckPolicy>,
    },
    /// A brace-delimited initializer list.
    InitList {
        elements: Vec<AnswerSpec>,
        order: ElementOrder,
        policy: Option<CheckPolicy>,
    },
    /// A token-for-token pattern; the part count must equal the post-policy
    /// token count.
    Pattern {
        parts: Vec<PatternPart>,
        policy: Option<CheckPolicy>,
    },
}

impl AnswerSpec {
    /// Evaluate this specification against a raw answer value, reading and
    /// writing the binding environment.
    #[must_use]
    pub fn matches(&self, value: &str, env: &mut super::env::Bindings) -> bool {
        crate::evaluate::eval_spec(self, value, env)
    }

    /// Walk the specification tree and report the first authoring defect.
    ///
    /// Intended to run once when lesson content is loaded, never per
    /// keystroke. The evaluator itself stays total: a node that fails
    /// validation simply never matches.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] for an invalid embedded regex, an inverted
    /// numeric range, a cross-reference with no targets, or an empty union.
    pub fn validate(&self) -> Result<(), SpecError> {
        match self {
            AnswerSpec::Literal(_) | AnswerSpec::Values { .. } | AnswerSpec::Identifier { .. } => {
                Ok(())
            }
            AnswerSpec::Rule(rule) => match &rule.matches {
                Some(re) => re.validate(),
                None => Ok(()),
            },
            AnswerSpec::AnyOf(specs) => {
                if specs.is_empty() {
                    return Err(SpecError::EmptyUnion);
                }
                specs.iter().try_for_each(AnswerSpec::validate)
            }
            AnswerSpec::Number {
                min: Some(min),
                max: Some(max),
                ..
            } if min > max => Err(SpecError::EmptyRange {
                min: *min,
                max: *max,
            }),
            AnswerSpec::Number { .. } => Ok(()),
            AnswerSpec::Str { regex, .. } => match regex {
                Some(re) => re.validate(),
                None => Ok(()),
            },
            AnswerSpec::SameAs { targets, .. } => {
                if targets.is_empty() {
                    return Err(SpecError::NoTargets);
                }
                Ok(())
            }
            AnswerSpec::Call { args, .. } => args.iter().try_for_each(AnswerSpec::validate),
            AnswerSpec::InitList { elements, .. } => {
                elements.iter().try_for_each(AnswerSpec::validate)
            }
            AnswerSpec::Pattern { .. } => Ok(()),
        }
    }

    /// The policy attached to this node, if the variant carries one.
    #[must_use]
    pub fn policy(&self) -> Option<&CheckPolicy> {
        match self {
            AnswerSpec::Identifier { policy, .. }
            | AnswerSpec::Number { policy, .. }
            | AnswerSpec::Str { policy, .. }
            | AnswerSpec::SameAs { policy, .. }
            | AnswerSpec::Call { policy, .. }
            | AnswerSpec::InitList { policy, .. }
            | AnswerSpec::Pattern { policy, .. } => policy.as_ref(),
            AnswerSpec::Literal(_)
            | AnswerSpec::Values { .. }
            | AnswerSpec::Rule(_)
            | AnswerSpec::AnyOf(_) => None,
        }
    }
}

impl From<&str> for AnswerSpec {
    fn from(value: &str) -> Self {
        AnswerSpec::Literal(value.to_owned())
    }
}

impl From<String> for AnswerSpec {
    fn from(value: String) -> Self {
        AnswerSpec::Literal(value)
    }
}
