/*!
# JSON Parser

Recursive-descent parser that pulls tokens from a [`Lexer`] and builds a
[`Value`] tree.

## Examples

```rust
use jsonpull::{parse, Value};

let value = parse(r#"{"key-o": {}, "key-l": []}"#).expect("valid document");
assert_eq!(value.get("key-l"), Some(&Value::Array(vec![])));
```

## Errors

The first grammar violation aborts the parse and is returned as a
[`ParseError`]; no partial tree is ever handed back:

```rust
use jsonpull::{parse, ParseError};

assert_eq!(parse("tru"), Err(ParseError::IllegalToken("tru".to_string())));
assert_eq!(parse(""), Err(ParseError::UnexpectedEndOfInput));
```
*/
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::num::ParseFloatError;

use crate::tokenizer::{Lexer, Token, TokenKind};
use crate::value::Value;

/// Default bound on how deeply arrays and objects may nest.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Represents errors that can occur while parsing a JSON document.
///
/// Variants carrying a `String` hold the offending token as displayed, which
/// is its literal or `end of input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character the lexer could not place, or a keyword that stopped
    /// matching part way through.
    IllegalToken(String),
    /// The input ended where a value, key or separator was required.
    UnexpectedEndOfInput,
    /// A well-formed token that cannot start a value.
    UnknownToken(String),
    /// A number token that does not convert to a float.
    InvalidNumber {
        /// The malformed numeric text
        literal: String,
        /// Why the conversion failed
        source: ParseFloatError,
    },
    /// A number token whose magnitude does not fit a finite float.
    NumberOutOfRange(String),
    /// Something other than a string where an object key belongs.
    ExpectedKey(String),
    /// Something other than `:` after an object key.
    ExpectedNameSeparator(String),
    /// Something other than `,` or `}` after an object member.
    ExpectedClosingBrace(String),
    /// Something other than `,` or `]` after an array element.
    ExpectedClosingBracket(String),
    /// Tokens left over after a complete top-level value.
    TrailingContent(String),
    /// Arrays and objects nested beyond the configured limit.
    DepthLimitExceeded(usize),
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNumber { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalToken(token) => {
                write!(f, "illegal token '{token}' encountered")
            }
            Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            Self::UnknownToken(token) => write!(f, "unknown token '{token}'"),
            Self::InvalidNumber { literal, source } => {
                write!(f, "invalid number '{literal}': {source}")
            }
            Self::NumberOutOfRange(literal) => {
                write!(f, "number '{literal}' is out of range")
            }
            Self::ExpectedKey(found) => {
                write!(f, "expected key but found '{found}'")
            }
            Self::ExpectedNameSeparator(found) => {
                write!(f, "expected ':' but found '{found}'")
            }
            Self::ExpectedClosingBrace(found) => {
                write!(f, "expected '}}' but found '{found}'")
            }
            Self::ExpectedClosingBracket(found) => {
                write!(f, "expected ']' but found '{found}'")
            }
            Self::TrailingContent(found) => {
                write!(f, "expected end of input but found '{found}'")
            }
            Self::DepthLimitExceeded(limit) => {
                write!(f, "nesting exceeds the limit of {limit} levels")
            }
        }
    }
}

/// Parser for a single JSON document.
///
/// Tokens are requested from the lexer one at a time as the grammar needs
/// them; the lexer holds no reference back to the parser.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    max_depth: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Construct a parser over `input` with [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_DEPTH)
    }

    /// Construct a parser that rejects documents nesting arrays and objects
    /// more than `max_depth` levels deep.
    #[must_use]
    pub fn with_max_depth(input: &'a str, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(input),
            max_depth,
            depth: 0,
        }
    }

    /// Parse the whole document: exactly one value followed by the end of
    /// input.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse(mut self) -> Result<Value, ParseError> {
        let token = self.lexer.next_token();
        let value = self.parse_value(token)?;

        let trailing = self.lexer.next_token();
        if !trailing.is_eof() {
            return Err(ParseError::TrailingContent(trailing.to_string()));
        }

        Ok(value)
    }

    /// Build the value starting at `token`. Shared by the top level and by
    /// every array element and object member.
    fn parse_value(&mut self, token: Token<'a>) -> Result<Value, ParseError> {
        match token.kind {
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::String => Ok(Value::String(token.literal.to_owned())),
            TokenKind::Number => parse_number(token.literal).map(Value::Number),
            TokenKind::BeginObject => self.parse_object(),
            TokenKind::BeginArray => self.parse_array(),
            TokenKind::Illegal => {
                Err(ParseError::IllegalToken(token.literal.to_owned()))
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEndOfInput),
            TokenKind::EndArray
            | TokenKind::EndObject
            | TokenKind::NameSeparator
            | TokenKind::ValueSeparator => {
                Err(ParseError::UnknownToken(token.literal.to_owned()))
            }
        }
    }

    /// Parse the members of an object whose `{` was already consumed.
    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.enter("object")?;
        let mut object = HashMap::new();
        let mut token = self.lexer.next_token();

        // `{}` short-circuits the member loop
        if token.kind != TokenKind::EndObject {
            loop {
                let key = match token.kind {
                    TokenKind::String => token.literal.to_owned(),
                    TokenKind::Eof => {
                        return Err(ParseError::UnexpectedEndOfInput);
                    }
                    _ => {
                        return Err(ParseError::ExpectedKey(token.to_string()));
                    }
                };

                token = self.lexer.next_token();
                match token.kind {
                    TokenKind::NameSeparator => {}
                    TokenKind::Eof => {
                        return Err(ParseError::UnexpectedEndOfInput);
                    }
                    _ => {
                        return Err(ParseError::ExpectedNameSeparator(
                            token.to_string(),
                        ));
                    }
                }

                let value_token = self.lexer.next_token();
                let value = self.parse_value(value_token)?;
                // repeated keys: last write wins
                object.insert(key, value);

                token = self.lexer.next_token();
                if token.kind != TokenKind::ValueSeparator {
                    break;
                }
                token = self.lexer.next_token();
            }

            if token.kind != TokenKind::EndObject {
                return Err(ParseError::ExpectedClosingBrace(
                    token.to_string(),
                ));
            }
        }

        self.leave();
        log::debug!("parsed object with {} member(s)", object.len());
        Ok(Value::Object(object))
    }

    /// Parse the elements of an array whose `[` was already consumed.
    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.enter("array")?;
        let mut array = Vec::new();
        let mut token = self.lexer.next_token();

        if token.kind != TokenKind::EndArray {
            loop {
                array.push(self.parse_value(token)?);

                token = self.lexer.next_token();
                if token.kind != TokenKind::ValueSeparator {
                    break;
                }
                token = self.lexer.next_token();
            }

            if token.kind != TokenKind::EndArray {
                return Err(ParseError::ExpectedClosingBracket(
                    token.to_string(),
                ));
            }
        }

        self.leave();
        log::debug!("parsed array with {} element(s)", array.len());
        Ok(Value::Array(array))
    }

    /// Step into a container, enforcing the nesting limit.
    fn enter(&mut self, container: &str) -> Result<(), ParseError> {
        self.depth += 1;
        log::debug!("entering {container} at depth {}", self.depth);
        if self.depth > self.max_depth {
            return Err(ParseError::DepthLimitExceeded(self.max_depth));
        }
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Convert a number literal to a finite float.
///
/// The standard float parser saturates huge magnitudes to infinity; those
/// are rejected rather than kept.
fn parse_number(literal: &str) -> Result<f64, ParseError> {
    let number = literal.parse::<f64>().map_err(|source| {
        ParseError::InvalidNumber {
            literal: literal.to_owned(),
            source,
        }
    })?;
    if !number.is_finite() {
        return Err(ParseError::NumberOutOfRange(literal.to_owned()));
    }
    Ok(number)
}

/// Parse a complete JSON document into a [`Value`].
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first grammar violation.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let result = Parser::new(input).parse();
    match &result {
        Ok(value) => log::debug!("parsed top-level {}", value.kind()),
        Err(err) => log::debug!("parse failed: {err}"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(members: &[(&str, Value)]) -> Value {
        Value::Object(
            members
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn parse_literals() {
        assert_eq!(parse("true"), Ok(Value::Bool(true)));
        assert_eq!(parse("false"), Ok(Value::Bool(false)));
        assert_eq!(parse("null"), Ok(Value::Null));
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(parse("42"), Ok(Value::Number(42.0)));
        assert_eq!(parse("-42"), Ok(Value::Number(-42.0)));
        assert_eq!(parse("101.2"), Ok(Value::Number(101.2)));
        assert_eq!(parse("0"), Ok(Value::Number(0.0)));
    }

    #[test]
    fn parse_string_verbatim() {
        assert_eq!(parse(r#""hello""#), Ok(Value::String("hello".into())));
        assert_eq!(parse(r#""a\nb""#), Ok(Value::String(r"a\nb".into())));
        assert_eq!(parse(r#""""#), Ok(Value::String(String::new())));
    }

    #[test]
    fn parse_empty_containers() {
        assert_eq!(parse("{}"), Ok(Value::Object(HashMap::new())));
        assert_eq!(parse("[]"), Ok(Value::Array(vec![])));
    }

    #[test]
    fn parse_nested_empty_containers() {
        let expected = object(&[
            ("key-o", Value::Object(HashMap::new())),
            ("key-l", Value::Array(vec![])),
        ]);
        assert_eq!(parse(r#"{"key-o": {}, "key-l": []}"#), Ok(expected));
    }

    #[test]
    fn parse_full_object() {
        let input = concat!(
            r#"{ "key1": true, "key2": false, "key3": null, "#,
            r#""key4": "value", "key5": 101.2, "key6": -42, "#,
            r#""key7": { "inner key": ["list value", 1] } }"#,
        );
        let expected = object(&[
            ("key1", Value::Bool(true)),
            ("key2", Value::Bool(false)),
            ("key3", Value::Null),
            ("key4", Value::String("value".into())),
            ("key5", Value::Number(101.2)),
            ("key6", Value::Number(-42.0)),
            (
                "key7",
                object(&[(
                    "inner key",
                    Value::Array(vec![
                        Value::String("list value".into()),
                        Value::Number(1.0),
                    ]),
                )]),
            ),
        ]);
        assert_eq!(parse(input), Ok(expected));
    }

    #[test]
    fn parse_nested_arrays() {
        let expected = Value::Array(vec![
            Value::Array(vec![Value::Number(1.0)]),
            Value::Array(vec![]),
            Value::Null,
        ]);
        assert_eq!(parse("[[1],[],null]"), Ok(expected));
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        assert_eq!(
            parse(r#"{"a":1,"a":2}"#),
            Ok(object(&[("a", Value::Number(2.0))]))
        );
    }

    #[test]
    fn whitespace_insensitive() {
        assert_eq!(parse(r#"{ "a" : 1 }"#), parse(r#"{"a":1}"#));
        assert_eq!(parse(r#"\n[\t1 ,\r2 ]\n"#), parse("[1,2]"));
    }

    #[test]
    fn parse_is_idempotent() {
        let input = r#"{"a": [1, {"b": null}], "c": "d"}"#;
        assert_eq!(parse(input).unwrap(), parse(input).unwrap());
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), Err(ParseError::UnexpectedEndOfInput));
        assert_eq!(parse("   "), Err(ParseError::UnexpectedEndOfInput));
    }

    #[test]
    fn unexpected_end_inside_object() {
        assert_eq!(parse("{"), Err(ParseError::UnexpectedEndOfInput));
        assert_eq!(parse(r#"{"a""#), Err(ParseError::UnexpectedEndOfInput));
        assert_eq!(parse(r#"{"a":"#), Err(ParseError::UnexpectedEndOfInput));
        assert_eq!(parse("["), Err(ParseError::UnexpectedEndOfInput));
    }

    #[test]
    fn unclosed_array() {
        assert_eq!(
            parse("[1,2"),
            Err(ParseError::ExpectedClosingBracket("end of input".into()))
        );
        assert_eq!(
            parse("[1 2]"),
            Err(ParseError::ExpectedClosingBracket("2".into()))
        );
    }

    #[test]
    fn unclosed_object() {
        assert_eq!(
            parse(r#"{"a":1"#),
            Err(ParseError::ExpectedClosingBrace("end of input".into()))
        );
        assert_eq!(
            parse(r#"{"a":1 "b":2}"#),
            Err(ParseError::ExpectedClosingBrace("b".into()))
        );
        assert_eq!(
            parse(r#"{"a":1]"#),
            Err(ParseError::ExpectedClosingBrace("]".into()))
        );
    }

    #[test]
    fn illegal_tokens() {
        assert_eq!(parse("tru"), Err(ParseError::IllegalToken("tru".into())));
        assert_eq!(parse("nul"), Err(ParseError::IllegalToken("nul".into())));
        assert_eq!(parse("@"), Err(ParseError::IllegalToken("@".into())));
        assert_eq!(parse("[1,x]"), Err(ParseError::IllegalToken("x".into())));
        // real newlines are not whitespace
        assert_eq!(
            parse("[1,\n2]"),
            Err(ParseError::IllegalToken("\n".into()))
        );
    }

    #[test]
    fn unknown_tokens_in_value_position() {
        assert_eq!(parse("]"), Err(ParseError::UnknownToken("]".into())));
        assert_eq!(parse(":"), Err(ParseError::UnknownToken(":".into())));
        assert_eq!(parse("[1,]"), Err(ParseError::UnknownToken("]".into())));
        assert_eq!(
            parse(r#"{"a":}"#),
            Err(ParseError::UnknownToken("}".into()))
        );
    }

    #[test]
    fn object_structure_errors() {
        assert_eq!(parse("{1:2}"), Err(ParseError::ExpectedKey("1".into())));
        assert_eq!(
            parse(r#"{"a":1,}"#),
            Err(ParseError::ExpectedKey("}".into()))
        );
        assert_eq!(
            parse(r#"{"a" 1}"#),
            Err(ParseError::ExpectedNameSeparator("1".into()))
        );
    }

    #[test]
    fn invalid_numbers() {
        for literal in ["1-2.3.4", "-", "1..2", "--1"] {
            let result = parse(literal);
            assert!(
                matches!(
                    &result,
                    Err(ParseError::InvalidNumber { literal: l, .. })
                        if l == literal
                ),
                "Actual result: {result:?}"
            );
        }
        let err = parse("[0.1.2]").unwrap_err();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("0.1.2"));
    }

    #[test]
    fn numbers_beyond_f64_are_rejected() {
        let huge = format!("1{}", "0".repeat(400));
        assert_eq!(
            parse(&huge),
            Err(ParseError::NumberOutOfRange(huge.clone()))
        );

        let negative = format!("[-{huge}]");
        assert_eq!(
            parse(&negative),
            Err(ParseError::NumberOutOfRange(format!("-{huge}")))
        );

        let err = parse(&format!(r#"{{"n": {huge}}}"#)).unwrap_err();
        assert!(err.to_string().ends_with("is out of range"), "{err}");
        assert!(err.source().is_none());
    }

    #[test]
    fn largest_finite_numbers_are_kept() {
        let max = format!("{}", f64::MAX);
        assert_eq!(parse(&max), Ok(Value::Number(f64::MAX)));
        // underflow rounds to zero rather than failing
        let tiny = format!("0.{}1", "0".repeat(400));
        assert_eq!(parse(&tiny), Ok(Value::Number(0.0)));
    }

    #[test]
    fn trailing_content() {
        assert_eq!(parse("1 2"), Err(ParseError::TrailingContent("2".into())));
        assert_eq!(parse("{}}"), Err(ParseError::TrailingContent("}".into())));
        assert_eq!(
            parse(r#""a" "b""#),
            Err(ParseError::TrailingContent("b".into()))
        );
    }

    #[test]
    fn first_error_wins() {
        // the illegal token is reported, not the trailing garbage after it
        assert_eq!(parse("[@] 1"), Err(ParseError::IllegalToken("@".into())));
    }

    #[test]
    fn depth_limit() {
        assert_eq!(
            Parser::with_max_depth("[[[]]]", 2).parse(),
            Err(ParseError::DepthLimitExceeded(2))
        );
        assert!(Parser::with_max_depth("[[]]", 2).parse().is_ok());
        assert!(Parser::with_max_depth(r#"{"a":{"b":[]}}"#, 3).parse().is_ok());

        let deep = format!("{}{}", "[".repeat(100), "]".repeat(100));
        assert_eq!(parse(&deep).map(|v| v.depth()), Ok(100));

        let too_deep = "[".repeat(DEFAULT_MAX_DEPTH + 1);
        assert_eq!(
            parse(&too_deep),
            Err(ParseError::DepthLimitExceeded(DEFAULT_MAX_DEPTH))
        );
    }

    #[test]
    fn depth_counts_siblings_once() {
        let siblings = format!("[{}]", vec!["[]"; 10].join(","));
        assert!(Parser::with_max_depth(&siblings, 2).parse().is_ok());
    }

    #[test]
    fn error_messages_name_the_token() {
        assert_eq!(
            parse("tru").unwrap_err().to_string(),
            "illegal token 'tru' encountered"
        );
        assert_eq!(
            parse("[1,2").unwrap_err().to_string(),
            "expected ']' but found 'end of input'"
        );
        assert_eq!(
            parse(r#"{"a":1"#).unwrap_err().to_string(),
            "expected '}' but found 'end of input'"
        );
    }

    #[test]
    fn agrees_with_serde_json() {
        let documents = [
            r#"{"a": [1, 2.5, -3], "b": {"c": null, "d": true}, "e": "text"}"#,
            r#"[{"x": []}, {"y": {}}, false, "z", 0.125]"#,
            r#""plain string""#,
            "-17.75",
        ];
        for doc in documents {
            let expected: Value =
                serde_json::from_str::<serde_json::Value>(doc)
                    .expect("valid JSON")
                    .into();
            assert_eq!(parse(doc), Ok(expected), "document: {doc}");
        }
    }
}
