//! # JSON Lexer
//!
//! Turns the characters of a JSON document into a pull-based stream of
//! [`Token`]s. The lexer never fails: anything it cannot recognize comes back
//! as a [`TokenKind::Illegal`] token and judging it is left to the parser.
use crate::tokenizer::{Token, TokenKind};

/// A lexer over a borrowed JSON document.
///
/// Holds a single forward-only cursor with one character of lookahead.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input document
    input: &'a str,
    /// Byte offset of the current character
    position: usize,
    /// Byte offset just after the current character
    read_position: usize,
    /// Current character under examination, `None` once the input is spent
    ch: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Construct a lexer positioned on the first character of `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: None,
        };
        // put the lexer in an initial working state
        lexer.read_char();
        lexer
    }

    /// Reads and consumes the next character of the input.
    fn read_char(&mut self) {
        self.position = self.read_position;
        self.ch = self.input[self.read_position..].chars().next();
        if let Some(ch) = self.ch {
            self.read_position += ch.len_utf8();
        }
    }

    /// Returns the character after the current one without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.input[self.read_position..].chars().next()
    }

    /// Consume whitespace starting from the current position.
    ///
    /// Only the space character and the two-character sequences `\t`, `\n`
    /// and `\r` (a literal backslash followed by a letter) count as
    /// whitespace. Real tab and newline characters do not.
    fn skip_whitespace(&mut self) {
        loop {
            match self.ch {
                Some(' ') => self.read_char(),
                Some('\\')
                    if matches!(self.peek_char(), Some('t' | 'n' | 'r')) =>
                {
                    self.read_char();
                    self.read_char();
                }
                _ => break,
            }
        }
    }

    /// Returns the next token and advances past it.
    ///
    /// Once the input is exhausted every call returns a [`TokenKind::Eof`]
    /// token with an empty literal.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let token = match self.ch {
            None => Token::new(TokenKind::Eof, ""),
            Some('[') => self.read_single(TokenKind::BeginArray),
            Some(']') => self.read_single(TokenKind::EndArray),
            Some('{') => self.read_single(TokenKind::BeginObject),
            Some('}') => self.read_single(TokenKind::EndObject),
            Some(':') => self.read_single(TokenKind::NameSeparator),
            Some(',') => self.read_single(TokenKind::ValueSeparator),
            Some('"') => self.read_string(),
            Some('-' | '0'..='9') => self.read_number(),
            Some('t') => self.read_keyword("true", TokenKind::True),
            Some('f') => self.read_keyword("false", TokenKind::False),
            Some('n') => self.read_keyword("null", TokenKind::Null),
            Some(_) => self.read_single(TokenKind::Illegal),
        };

        log::trace!("lexed {} {:?}", token.kind, token.literal);
        token
    }

    /// Consumes the current character as a token of the given kind.
    fn read_single(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.position;
        self.read_char();
        Token::new(kind, &self.input[start..self.position])
    }

    /// Reads a string up to the next quote or the end of input.
    ///
    /// Backslashes carry no meaning here: `\"` still ends the string.
    fn read_string(&mut self) -> Token<'a> {
        // skip opening quote
        let start = self.position + 1;
        self.read_char();
        while !matches!(self.ch, Some('"') | None) {
            self.read_char();
        }
        let literal = &self.input[start..self.position];

        // consume the closing quote, if there is one
        if self.ch.is_some() {
            self.read_char();
        }

        Token::new(TokenKind::String, literal)
    }

    /// Greedily reads digits, `.` and `-`. The result is validated when the
    /// parser converts it, so `1-2.3.4` lexes as one number.
    fn read_number(&mut self) -> Token<'a> {
        let start = self.position;
        while matches!(self.ch, Some('0'..='9' | '.' | '-')) {
            self.read_char();
        }
        Token::new(TokenKind::Number, &self.input[start..self.position])
    }

    /// Matches `word` character by character. On the first mismatch the
    /// prefix read so far becomes an illegal token and the offending
    /// character is left for the next call.
    fn read_keyword(
        &mut self,
        word: &'static str,
        kind: TokenKind,
    ) -> Token<'a> {
        let start = self.position;
        for expected in word.chars() {
            if self.ch != Some(expected) {
                return Token::new(
                    TokenKind::Illegal,
                    &self.input[start..self.position],
                );
            }
            self.read_char();
        }
        Token::new(kind, &self.input[start..self.position])
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    /// Yields tokens up to, but not including, the end of input.
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenize a whole JSON document. The last token is always
/// [`TokenKind::Eof`].
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(input);
    let mut tokens: Vec<Token<'_>> = vec![];

    loop {
        let token = lexer.next_token();
        let is_eof = token.is_eof();

        tokens.push(token);

        if is_eof {
            break;
        }
    }

    tokens
}
