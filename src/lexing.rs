//! Lexer
//!
//!     This module turns a pybrace source string into a lazy stream of lexemes. The heavy
//!     lifting is done by a vanilla logos lexer (see [tokens](tokens)); the
//!     [base_tokenization](base_tokenization) layer adds the stream contract on top of it.
//!
//! Token Kinds
//!
//!     The lexer only needs to understand python's surface syntax well enough to never
//!     mistake a brace, colon or semicolon inside a string literal or comment for a
//!     structural one. So only the structural punctuation gets its own kind: separators
//!     (`;` and line breaks), colons, curly braces, and the parenthesis and square bracket
//!     pairs. Names, numbers, strings and the remaining operators are coarse kinds whose
//!     text is preserved verbatim.
//!
//! Synthetic Tokens
//!
//!     StartMarker and EndMarker are not produced by logos. StartMarker is the lookback
//!     value the transducer starts from and is never yielded by a stream. EndMarker closes
//!     every stream, including streams cut short by a string literal left open at end of
//!     input.

pub mod base_tokenization;
pub mod tokens;

pub use base_tokenization::{tokenize, Lexeme, TokenStream};
pub use tokens::{LexingError, Token};

/// Start lexing `source`, returning the lazy lexeme stream.
pub fn lex(source: &str) -> TokenStream<'_> {
    TokenStream::new(source)
}
