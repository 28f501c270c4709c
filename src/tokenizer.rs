//! # Tokenizer/ Lexer
//!
//! Splits a JSON document into a stream of tokens for the parser to pull.
pub mod lexer;
pub mod token;

// Re-exports
pub use lexer::{Lexer, tokenize};
pub use token::{Token, TokenKind};
