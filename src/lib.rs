/*!
# `jsonpull` Library

A small two-stage JSON reader: a [`Lexer`] turns text into tokens and a
recursive-descent [`Parser`] pulls those tokens to build a [`Value`] tree.

```rust
use jsonpull::Value;

let value: Value = r#"{"a": [1, 2.5, null]}"#.parse().expect("valid document");
assert_eq!(value.depth(), 3);
```

The grammar is deliberately narrow. Strings are taken verbatim between quotes
with no escape decoding, numbers are always `f64`, and only the space
character and the two-character sequences `\t`, `\n` and `\r` separate
tokens.
*/

pub mod commands;
pub mod parser;
pub mod tokenizer;
pub mod utils;
pub mod value;

// Re-exports
pub use parser::{DEFAULT_MAX_DEPTH, ParseError, Parser, parse};
pub use tokenizer::{Lexer, Token, TokenKind, tokenize};
pub use value::Value;
