use blankcheck::{
    AnswerSpec, Bindings, CheckPolicy, TokenKind, identifier, number, pattern, tokenize,
    PatternPart,
};
use proptest::prelude::*;

/// Generate arbitrary answer-ish text: identifiers, numbers, punctuation,
/// quotes, whitespace, and raw unicode to stress the lexer.
fn arb_answer() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,10}",
        "[0-9]{1,6}",
        "[ -~]{0,24}",
        ".*",
    ]
}

/// A small pool of identifiers so generated answers collide with bindings.
fn arb_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ledPin".to_owned()),
        Just("sensor".to_owned()),
        Just("_tmp".to_owned()),
        "[a-z][a-z0-9_]{0,8}",
    ]
}

// ---------------------------------------------------------------------------
// Invariant 1: the tokenizer is total.
//
// Any input lexes without panicking, and the concatenated token text never
// exceeds the input (whitespace is dropped, nothing is invented).
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn tokenize_never_panics(input in arb_answer()) {
        let _ = tokenize(&input);
    }

    #[test]
    fn tokenize_consumes_no_more_than_the_input(input in arb_answer()) {
        let total: usize = tokenize(&input).iter().map(|t| t.text.len()).sum();
        prop_assert!(total <= input.len());
    }

    #[test]
    fn tokenize_emits_no_whitespace_tokens(input in arb_answer()) {
        for token in tokenize(&input) {
            prop_assert!(!token.text.is_empty());
            if token.kind != TokenKind::Str && token.kind != TokenKind::Comment {
                prop_assert!(
                    !token.text.chars().any(char::is_whitespace),
                    "whitespace leaked into {token:?}"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: evaluation is deterministic and idempotent.
//
// The same spec + value + environment state always produces the same
// verdict, including across repeated calls (bindings rewrite the same
// value, so a second pass cannot flip the answer).
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn eval_idempotent_for_identifiers(value in arb_answer()) {
        let spec: AnswerSpec = identifier().bind("X").into();
        let mut env = Bindings::new();
        let first = spec.matches(&value, &mut env);
        let second = spec.matches(&value, &mut env);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn eval_idempotent_for_numbers(value in arb_answer()) {
        let spec: AnswerSpec = number().int().range(-1000.0, 1000.0).into();
        let mut env = Bindings::new();
        let first = spec.matches(&value, &mut env);
        let second = spec.matches(&value, &mut env);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn eval_never_panics_on_arbitrary_input(value in arb_answer()) {
        let specs: Vec<AnswerSpec> = vec![
            identifier().qualified().into(),
            number().into(),
            pattern([PatternPart::Identifier, PatternPart::Literal("=".into()), PatternPart::Number]).into(),
        ];
        let mut env = Bindings::new();
        for spec in &specs {
            let _ = spec.matches(&value, &mut env);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: whitespace between tokens never changes the verdict.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn inter_token_whitespace_is_invisible(name in arb_identifier(), n in 0_i64..10_000) {
        let spec: AnswerSpec = pattern([
            PatternPart::Identifier,
            PatternPart::Literal("=".into()),
            PatternPart::Number,
        ]).into();

        let tight = format!("{name}={n}");
        let spaced = format!("  {name} = {n} ");
        let mut env = Bindings::new();
        prop_assert_eq!(
            spec.matches(&tight, &mut env),
            spec.matches(&spaced, &mut env)
        );
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: wrapper and terminator tolerance for accepted numbers.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn accepted_numbers_stay_accepted_when_wrapped(n in -1000_i64..1000) {
        let spec: AnswerSpec = number().range(-1000.0, 1000.0).into();
        let mut env = Bindings::new();
        let plain = n.to_string();
        let wrapped = format!("({})", plain);
        let wrapped_term = format!("({});", plain);
        let plain_term = format!("{};", plain);
        prop_assert!(spec.matches(&plain, &mut env));
        prop_assert!(spec.matches(&wrapped, &mut env));
        prop_assert!(spec.matches(&wrapped_term, &mut env));
        prop_assert!(spec.matches(&plain_term, &mut env));
    }
}

// ---------------------------------------------------------------------------
// Invariant 5: policy application is pure.
//
// Applying the same policy to the same raw string twice gives identical
// results, and never depends on binding state.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn policy_application_is_pure(raw in arb_answer()) {
        let policy = CheckPolicy::default();
        prop_assert_eq!(policy.apply(&raw), policy.apply(&raw));
    }
}
