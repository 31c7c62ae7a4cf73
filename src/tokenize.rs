use winnow::ascii::till_line_ending;
use winnow::combinator::alt;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::types::{Token, TokenKind};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

// -- Comments ---------------------------------------------------------------

fn line_comment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ("//", till_line_ending).take().parse_next(input)
}

// -- String literals --------------------------------------------------------

// A backslash escapes exactly one following character. An unterminated
// literal runs to end of input rather than failing the whole lex.
fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut text = String::new();
    text.push(quote);
    loop {
        let next: ModalResult<char> = any.parse_next(input);
        match next {
            Ok(c) if c == quote => {
                text.push(c);
                return Ok(text);
            }
            Ok('\\') => {
                text.push('\\');
                let esc: ModalResult<char> = any.parse_next(input);
                if let Ok(esc) = esc {
                    text.push(esc);
                }
            }
            Ok(c) => text.push(c),
            Err(_) => return Ok(text),
        }
    }
}

// -- Identifiers ------------------------------------------------------------

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Numbers ----------------------------------------------------------------

// A greedy run starting at a digit: alphanumerics cover hex digits and the
// 0x/0b/0o prefixes as well as exponent markers; `.` and `_` continue the
// run; a sign continues it only immediately after an exponent marker.
fn number(input: &mut &str) -> ModalResult<String> {
    let first = any
        .verify(|c: &char| c.is_ascii_digit())
        .parse_next(input)?;
    let mut text = String::new();
    text.push(first);
    loop {
        let checkpoint = input.checkpoint();
        let next: ModalResult<char> = any.parse_next(input);
        match next {
            Ok(c) if c.is_ascii_alphanumeric() || c == '.' || c == '_' => text.push(c),
            Ok(c @ ('+' | '-'))
                if matches!(text.chars().last(), Some('e' | 'E' | 'p' | 'P')) =>
            {
                text.push(c);
            }
            Ok(_) => {
                input.reset(&checkpoint);
                return Ok(text);
            }
            Err(_) => return Ok(text),
        }
    }
}

// -- Operators --------------------------------------------------------------

fn two_char_operator<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt(("==", "!=", ">=", "<=", "&&", "||", "++", "--", "::")).parse_next(input)
}

// -- Token dispatch ---------------------------------------------------------

fn token(input: &mut &str) -> ModalResult<Token> {
    alt((
        line_comment.map(|s: &str| Token::new(TokenKind::Comment, s)),
        string_literal.map(|s| Token::new(TokenKind::Str, s)),
        identifier.map(|s: &str| Token::new(TokenKind::Identifier, s)),
        number.map(|s| Token::new(TokenKind::Number, s)),
        two_char_operator.map(|s: &str| Token::new(TokenKind::Operator, s)),
        any.map(|c: char| Token::new(TokenKind::Operator, c.to_string())),
    ))
    .parse_next(input)
}

/// Lex an answer fragment into a flat token sequence.
///
/// Total: never fails and never loops without consuming input. Unterminated
/// string literals and comments are captured to end of input. Whitespace is
/// consumed and discarded, never emitted as a token.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut rest = input;
    let mut tokens = Vec::new();
    loop {
        let _ = ws(&mut rest);
        if rest.is_empty() {
            return tokens;
        }
        // `token` ends in a bare `any`, so it only errors on empty input.
        match token(&mut rest) {
            Ok(t) => tokens.push(t),
            Err(_) => return tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn simple_assignment() {
        assert_eq!(texts("int ledPin = 13;"), ["int", "ledPin", "=", "13", ";"]);
        assert_eq!(
            kinds("int ledPin = 13;"),
            [
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
            ]
        );
    }

    #[test]
    fn two_char_operators_are_single_tokens() {
        assert_eq!(texts("a == b"), ["a", "==", "b"]);
        assert_eq!(texts("x!=y"), ["x", "!=", "y"]);
        assert_eq!(texts("i++"), ["i", "++"]);
        assert_eq!(texts("std::vec"), ["std", "::", "vec"]);
        assert_eq!(texts("a||b&&c"), ["a", "||", "b", "&&", "c"]);
    }

    #[test]
    fn triple_equals_lexes_as_two_tokens() {
        assert_eq!(texts("a === b"), ["a", "==", "=", "b"]);
    }

    #[test]
    fn line_comment_to_eol() {
        let toks = tokenize("x // set the pin\ny");
        assert_eq!(toks[1].kind, TokenKind::Comment);
        assert_eq!(toks[1].text, "// set the pin");
        assert_eq!(toks[2].text, "y");
    }

    #[test]
    fn comment_at_end_of_input() {
        let toks = tokenize("x // trailing");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].text, "// trailing");
    }

    #[test]
    fn double_quoted_string() {
        let toks = tokenize(r#"print("hello, world")"#);
        assert_eq!(toks[2].kind, TokenKind::Str);
        assert_eq!(toks[2].text, "\"hello, world\"");
    }

    #[test]
    fn single_quoted_string() {
        assert_eq!(texts("'a'"), ["'a'"]);
        assert_eq!(kinds("'a'"), [TokenKind::Str]);
    }

    #[test]
    fn escaped_quote_inside_string() {
        let toks = tokenize(r#""a\"b""#);
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].text, r#""a\"b""#);
    }

    #[test]
    fn unterminated_string_runs_to_eof() {
        let toks = tokenize("\"never closed");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Str);
        assert_eq!(toks[0].text, "\"never closed");
    }

    #[test]
    fn unterminated_string_with_trailing_backslash() {
        let toks = tokenize("\"abc\\");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].text, "\"abc\\");
    }

    #[test]
    fn numeric_forms() {
        assert_eq!(texts("0x1F"), ["0x1F"]);
        assert_eq!(texts("0b1010"), ["0b1010"]);
        assert_eq!(texts("0o755"), ["0o755"]);
        assert_eq!(texts("3.14"), ["3.14"]);
        assert_eq!(texts("1_000_000"), ["1_000_000"]);
    }

    #[test]
    fn exponent_sign_stays_inside_the_run() {
        assert_eq!(texts("1e-3"), ["1e-3"]);
        assert_eq!(texts("2.5E+10"), ["2.5E+10"]);
        // A sign anywhere else is its own operator token.
        assert_eq!(texts("1-3"), ["1", "-", "3"]);
    }

    #[test]
    fn leading_minus_is_an_operator() {
        assert_eq!(texts("-5"), ["-", "5"]);
    }

    #[test]
    fn identifier_with_underscore() {
        assert_eq!(texts("_private my_var2"), ["_private", "my_var2"]);
        assert_eq!(
            kinds("_private my_var2"),
            [TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn identifier_does_not_start_with_digit() {
        assert_eq!(texts("2abc"), ["2abc"]);
        assert_eq!(kinds("2abc"), [TokenKind::Number]);
    }

    #[test]
    fn punctuation_single_chars() {
        assert_eq!(texts("{a,b}"), ["{", "a", ",", "b", "}"]);
        assert_eq!(texts("f(x)[0]"), ["f", "(", "x", ")", "[", "0", "]"]);
    }

    #[test]
    fn unknown_characters_become_operators() {
        assert_eq!(kinds("@#$"), [TokenKind::Operator; 3]);
    }

    #[test]
    fn slash_alone_is_an_operator() {
        assert_eq!(texts("a / b"), ["a", "/", "b"]);
        assert_eq!(kinds("a / b")[1], TokenKind::Operator);
    }

    #[test]
    fn call_with_arguments() {
        assert_eq!(
            texts("digitalWrite(ledPin, HIGH);"),
            ["digitalWrite", "(", "ledPin", ",", "HIGH", ")", ";"]
        );
    }
}
