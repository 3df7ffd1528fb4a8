//! Base tokenization for pybrace sources
//!
//! This module wraps the logos lexer into a lazy stream of [Lexeme]s. This is the entry
//! point where source strings become token streams, and where lexer failures are turned
//! into something the transducer can live with:
//!
//!     - A string literal still open at end of input ends the stream. One-liners are often
//!       typed without their final quote or bracket, and the interpreter is the right place
//!       to complain about that.
//!     - Any other failure becomes an [Token::Unknown] lexeme carrying its source text, so it
//!       is passed through untouched.
//!
//! Every stream ends with exactly one [Token::EndMarker].

use super::tokens::{LexingError, Token};
use logos::Logos;
use serde::Serialize;
use std::iter::FusedIterator;
use std::ops::Range;

/// A token paired with the exact source text it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme<'src> {
    pub token: Token,
    pub text: &'src str,
    pub span: Range<usize>,
}

impl<'src> Lexeme<'src> {
    fn end_marker(at: usize) -> Self {
        Lexeme {
            token: Token::EndMarker,
            text: "",
            span: at..at,
        }
    }
}

/// Lazy, finite, non-restartable sequence of lexemes in source order.
pub struct TokenStream<'src> {
    lexer: logos::Lexer<'src, Token>,
    finished: bool,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        TokenStream {
            lexer: Token::lexer(source),
            finished: false,
        }
    }

    fn finish(&mut self) -> Lexeme<'src> {
        self.finished = true;
        Lexeme::end_marker(self.lexer.source().len())
    }
}

impl<'src> Iterator for TokenStream<'src> {
    type Item = Lexeme<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.lexer.next() {
            Some(Ok(token)) => Some(Lexeme {
                token,
                text: self.lexer.slice(),
                span: self.lexer.span(),
            }),
            Some(Err(LexingError::UnterminatedAtEof)) => {
                tracing::debug!(
                    span = ?self.lexer.span(),
                    "string literal runs to end of input, ending token stream"
                );
                Some(self.finish())
            }
            Some(Err(error)) => {
                tracing::trace!(?error, span = ?self.lexer.span(), "passing through unlexable text");
                Some(Lexeme {
                    token: Token::Unknown,
                    text: self.lexer.slice(),
                    span: self.lexer.span(),
                })
            }
            None => Some(self.finish()),
        }
    }
}

impl FusedIterator for TokenStream<'_> {}

/// Convenience function to tokenize a string and collect all lexemes, end marker included
pub fn tokenize(source: &str) -> Vec<Lexeme<'_>> {
    TokenStream::new(source).collect()
}
