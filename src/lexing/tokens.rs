//! Token definitions for brace-delimited python source
//!
//! This module defines all the tokens that can be produced by the pybrace lexer.
//! The tokens are defined using the logos derive macro for efficient tokenization.
//! Only the structural tokens (separators, colons, braces and the grouping pairs) get
//! a kind of their own; everything else collapses into a handful of coarse kinds whose
//! text is carried through verbatim by [Lexeme](super::Lexeme).
use logos::{Lexer, Logos};
use serde::Serialize;

/// Failures reported by the logos lexer.
///
/// None of these abort the token stream by themselves, see
/// [TokenStream](super::TokenStream) for how each one is recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexingError {
    /// A character that starts no token at all.
    #[default]
    UnexpectedCharacter,
    /// A single-line string literal cut short by a line break.
    UnterminatedString,
    /// A string literal still open when the input runs out.
    UnterminatedAtEof,
}

/// All possible tokens in a pybrace source
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(error = LexingError)]
#[logos(skip r"[ \t\x0C]+")]
#[logos(skip r"\\\r?\n")]
#[logos(skip r"#[^\r\n]*")]
pub enum Token {
    // Synthetic markers, never matched by logos
    /// Precedes the first real token. Seeds the transducer lookback and is never emitted.
    StartMarker,
    /// Terminates every stream, carries no text.
    EndMarker,
    /// Verbatim text logos could not classify.
    Unknown,

    // Structural punctuation
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,

    // Physical line breaks
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[_\p{L}][_\p{L}\p{N}]*")]
    Name,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]+")]
    Number,

    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?"([^"\\\r\n]|\\(.|\n))*""#)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'([^'\\\r\n]|\\(.|\n))*'"#)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?"([^"\\\r\n]|\\(.|\n))*"#, unterminated_string)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'([^'\\\r\n]|\\(.|\n))*"#, unterminated_string)]
    #[regex(r##"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?""""##, triple_quoted_string)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'''"#, triple_quoted_string)]
    String,

    #[regex(r"\*\*=?|//=?|>>=?|<<=?|[-+*/%@&|^]=?|[<>=!]=|[<>=~.,]|->|:=|\.\.\.")]
    Operator,
}

/// Scan for the delimiter closing a triple-quoted literal, honouring backslash escapes.
///
/// Returns the number of bytes to consume, delimiter included.
fn find_triple_quote_end(rest: &str, delimiter: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    while let Some((idx, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if rest[idx..].starts_with(delimiter) {
            return Some(idx + delimiter.len());
        }
    }
    None
}

fn triple_quoted_string(lex: &mut Lexer<Token>) -> Result<(), LexingError> {
    let delimiter = if lex.slice().ends_with('"') {
        "\"\"\""
    } else {
        "'''"
    };
    match find_triple_quote_end(lex.remainder(), delimiter) {
        Some(len) => {
            lex.bump(len);
            Ok(())
        }
        None => {
            let len = lex.remainder().len();
            lex.bump(len);
            Err(LexingError::UnterminatedAtEof)
        }
    }
}

fn unterminated_string(lex: &mut Lexer<Token>) -> Result<(), LexingError> {
    if lex.remainder().is_empty() {
        Err(LexingError::UnterminatedAtEof)
    } else {
        Err(LexingError::UnterminatedString)
    }
}

impl Token {
    /// Check if this token is one of the synthetic stream markers
    pub fn is_marker(&self) -> bool {
        matches!(self, Token::StartMarker | Token::EndMarker)
    }

    /// Check if this token ends a statement
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Semicolon | Token::Newline)
    }

    /// Check if this token opens a parenthesis or square bracket group
    pub fn opens_group(&self) -> bool {
        matches!(self, Token::OpenParen | Token::OpenBracket)
    }

    /// Check if this token closes a parenthesis or square bracket group
    pub fn closes_group(&self) -> bool {
        matches!(self, Token::CloseParen | Token::CloseBracket)
    }
}
