//! Fluent constructors for hand-authored specifications.
//!
//! These assemble the same [`AnswerSpec`] values the evaluator consumes;
//! they run at lesson-authoring time, not per keystroke.

use crate::policy::CheckPolicy;

use super::spec::{AnswerSpec, ElementOrder, PatternPart, SpecRegex};

macro_rules! policy_modifiers {
    () => {
        /// Replace this node's policy wholesale.
        #[must_use]
        pub fn policy(mut self, policy: CheckPolicy) -> Self {
            self.policy = Some(policy);
            self
        }

        /// Reject answers containing any of these token texts.
        #[must_use]
        pub fn forbid<I, S>(mut self, tokens: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let policy = self.policy.take().unwrap_or_default();
            self.policy = Some(policy.forbid(tokens));
            self
        }

        /// Reject answers with whitespace adjacent to any of these operators.
        #[must_use]
        pub fn no_spaces_around<I, S>(mut self, ops: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let policy = self.policy.take().unwrap_or_default();
            self.policy = Some(policy.no_spaces_around(ops));
            self
        }
    };
}

/// An identifier blank. Defaults to a single plain identifier.
#[must_use]
pub fn identifier() -> IdentifierSpec {
    IdentifierSpec {
        allow_qualified: false,
        bind_as: None,
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct IdentifierSpec {
    allow_qualified: bool,
    bind_as: Option<String>,
    policy: Option<CheckPolicy>,
}

impl IdentifierSpec {
    /// Also accept dotted or `::`-scoped names.
    #[must_use]
    pub fn qualified(mut self) -> Self {
        self.allow_qualified = true;
        self
    }

    /// Record the accepted value in the binding environment.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>) -> Self {
        self.bind_as = Some(name.into());
        self
    }

    policy_modifiers!();
}

impl From<IdentifierSpec> for AnswerSpec {
    fn from(b: IdentifierSpec) -> Self {
        AnswerSpec::Identifier {
            allow_qualified: b.allow_qualified,
            bind_as: b.bind_as,
            policy: b.policy,
        }
    }
}

/// A numeric blank. Unconstrained until bounds or an accept list are added.
#[must_use]
pub fn number() -> NumberSpec {
    NumberSpec {
        int_only: false,
        min: None,
        max: None,
        one_of: Vec::new(),
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct NumberSpec {
    int_only: bool,
    min: Option<f64>,
    max: Option<f64>,
    one_of: Vec<f64>,
    policy: Option<CheckPolicy>,
}

impl NumberSpec {
    /// Require an integral value.
    #[must_use]
    pub fn int(mut self) -> Self {
        self.int_only = true;
        self
    }

    /// Inclusive bounds.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// An explicit accept list; overrides any bounds.
    #[must_use]
    pub fn one_of<I, N>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<f64>,
    {
        self.one_of.extend(values.into_iter().map(Into::into));
        self
    }

    policy_modifiers!();
}

impl From<NumberSpec> for AnswerSpec {
    fn from(b: NumberSpec) -> Self {
        AnswerSpec::Number {
            int_only: b.int_only,
            min: b.min,
            max: b.max,
            one_of: b.one_of,
            policy: b.policy,
        }
    }
}

/// A string blank. Defaults to "any non-empty string".
#[must_use]
pub fn string() -> StringSpec {
    StringSpec {
        require_quoted: false,
        one_of: Vec::new(),
        regex: None,
        bind_as: None,
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct StringSpec {
    require_quoted: bool,
    one_of: Vec<String>,
    regex: Option<SpecRegex>,
    bind_as: Option<String>,
    policy: Option<CheckPolicy>,
}

impl StringSpec {
    /// Require the answer to be a quoted literal.
    #[must_use]
    pub fn quoted(mut self) -> Self {
        self.require_quoted = true;
        self
    }

    /// Accept by list membership.
    #[must_use]
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of.extend(values.into_iter().map(Into::into));
        self
    }

    /// Accept by regex over the unquoted content. An invalid pattern makes
    /// the node permanently failing; run
    /// [`AnswerSpec::validate`](super::spec::AnswerSpec::validate) at load
    /// time to catch it.
    #[must_use]
    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(SpecRegex::new(pattern));
        self
    }

    /// Record the accepted value in the binding environment.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>) -> Self {
        self.bind_as = Some(name.into());
        self
    }

    policy_modifiers!();
}

impl From<StringSpec> for AnswerSpec {
    fn from(b: StringSpec) -> Self {
        AnswerSpec::Str {
            require_quoted: b.require_quoted,
            one_of: b.one_of,
            regex: b.regex,
            bind_as: b.bind_as,
            policy: b.policy,
        }
    }
}

/// A cross-reference blank: the answer must equal the bound value of the
/// target (or any additional target added with [`SameAsSpec::or`]).
#[must_use]
pub fn same_as(target: impl Into<String>) -> SameAsSpec {
    SameAsSpec {
        targets: vec![target.into()],
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct SameAsSpec {
    targets: Vec<String>,
    policy: Option<CheckPolicy>,
}

impl SameAsSpec {
    /// Accept a match against another target as well.
    #[must_use]
    pub fn or(mut self, target: impl Into<String>) -> Self {
        self.targets.push(target.into());
        self
    }

    policy_modifiers!();
}

impl From<SameAsSpec> for AnswerSpec {
    fn from(b: SameAsSpec) -> Self {
        AnswerSpec::SameAs {
            targets: b.targets,
            policy: b.policy,
        }
    }
}

/// A bare accept list of literal answers.
#[must_use]
pub fn one_of<I, S>(values: I) -> AnswerSpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    AnswerSpec::Values {
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// A function-call blank with one child specification per argument.
#[must_use]
pub fn call<I>(name: impl Into<String>, args: I) -> CallSpec
where
    I: IntoIterator,
    I::Item: Into<AnswerSpec>,
{
    CallSpec {
        name: name.into(),
        args: args.into_iter().map(Into::into).collect(),
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct CallSpec {
    name: String,
    args: Vec<AnswerSpec>,
    policy: Option<CheckPolicy>,
}

impl CallSpec {
    policy_modifiers!();
}

impl From<CallSpec> for AnswerSpec {
    fn from(b: CallSpec) -> Self {
        AnswerSpec::Call {
            name: b.name,
            args: b.args,
            policy: b.policy,
        }
    }
}

/// A brace-delimited initializer-list blank, strict element order by default.
#[must_use]
pub fn array<I>(elements: I) -> InitListSpec
where
    I: IntoIterator,
    I::Item: Into<AnswerSpec>,
{
    InitListSpec {
        elements: elements.into_iter().map(Into::into).collect(),
        order: ElementOrder::Strict,
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct InitListSpec {
    elements: Vec<AnswerSpec>,
    order: ElementOrder,
    policy: Option<CheckPolicy>,
}

impl InitListSpec {
    /// Accept the elements in any order.
    #[must_use]
    pub fn any_order(mut self) -> Self {
        self.order = ElementOrder::Any;
        self
    }

    policy_modifiers!();
}

impl From<InitListSpec> for AnswerSpec {
    fn from(b: InitListSpec) -> Self {
        AnswerSpec::InitList {
            elements: b.elements,
            order: b.order,
            policy: b.policy,
        }
    }
}

/// A token-for-token pattern blank. Bare strings become literal parts.
#[must_use]
pub fn pattern<I>(parts: I) -> PatternSpec
where
    I: IntoIterator,
    I::Item: Into<PatternPart>,
{
    PatternSpec {
        parts: parts.into_iter().map(Into::into).collect(),
        policy: None,
    }
}

#[derive(Debug, Clone)]
pub struct PatternSpec {
    parts: Vec<PatternPart>,
    policy: Option<CheckPolicy>,
}

impl PatternSpec {
    policy_modifiers!();
}

impl From<PatternSpec> for AnswerSpec {
    fn from(b: PatternSpec) -> Self {
        AnswerSpec::Pattern {
            parts: b.parts,
            policy: b.policy,
        }
    }
}

/// A union of alternatives; the first satisfied one wins.
#[must_use]
pub fn any_of<I>(specs: I) -> AnswerSpec
where
    I: IntoIterator,
    I::Item: Into<AnswerSpec>,
{
    AnswerSpec::AnyOf(specs.into_iter().map(Into::into).collect())
}
