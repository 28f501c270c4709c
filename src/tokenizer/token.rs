//! # JSON Token
//!
//! Defines the lexical units produced from a JSON document.
use std::fmt::Display;

/// The kind of a lexical unit.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    /* Delimiters */
    /// Opening square bracket
    BeginArray,

    /// Closing square bracket
    EndArray,

    /// Opening curly brace
    BeginObject,

    /// Closing curly brace
    EndObject,

    /// Colon character
    NameSeparator,

    /// Comma character
    ValueSeparator,

    /* Values */
    /// String value, literal excludes the delimiting quotes
    String,

    /// Numeric value, not yet validated
    Number,

    /// `true` keyword
    True,

    /// `false` keyword
    False,

    /// `null` keyword
    Null,

    /* Reserved */
    /// End of input
    Eof,

    /// Unrecognized character or broken keyword
    Illegal,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BeginArray => "[",
            Self::EndArray => "]",
            Self::BeginObject => "{",
            Self::EndObject => "}",
            Self::NameSeparator => ":",
            Self::ValueSeparator => ",",
            Self::String => "string",
            Self::Number => "number",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Eof => "EOF",
            Self::Illegal => "ILLEGAL",
        };
        write!(f, "{name}")
    }
}

/// A token lexed from a JSON document.
///
/// The literal borrows the exact source text the token was read from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'a> {
    /// What was lexed
    pub kind: TokenKind,
    /// Source text of the token
    pub literal: &'a str,
}

impl<'a> Token<'a> {
    /// Construct a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, literal: &'a str) -> Self {
        Self { kind, literal }
    }

    /// Whether this token marks the end of the input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{}", self.literal),
        }
    }
}
