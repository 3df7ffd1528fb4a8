//! Block transducer
//!
//!     Rewrites a flat stream of lexemes using braces and semicolons as block and statement
//!     delimiters into indentation-based python. This is a stateful single pass with one
//!     token of lookback, very much like the semantic indentation pass of an
//!     indentation-sensitive lexer, only run backwards: instead of turning indentation into
//!     indent/dedent events, it turns brace events into indentation.
//!
//! Algorithm
//!
//!     Each lexeme is classified into a single [Action], in priority order:
//!         1. `;` (and a line break outside any brackets) ends the statement: [Action::LineBreak].
//!         2. `:` outside any brackets ends a compound statement header: [Action::Indent]. The
//!            colon is kept and the line is broken one level deeper.
//!         3. `{` right after such a colon opens a block and is dropped. Any other `{` is a
//!            grouping brace (set or dict literal) and is emitted, raising the bracket depth.
//!         4. `}` closes the innermost grouping brace if there is one, otherwise the innermost
//!            block ([Action::Dedent]). With neither open the pass fails with a
//!            [StructureError].
//!         5. Everything else is emitted verbatim, followed by a single space.
//!
//!     Parentheses and square brackets are tracked separately from braces. Inside them a
//!     colon is a slice, lambda or annotation colon and never starts a block.
//!
//!     The rendered program always ends with exactly one newline. Running the transducer
//!     over its own output is not a round trip: the output uses indentation, not braces.

mod rendering;

pub use rendering::RenderOptions;

use crate::error::StructureError;
use crate::lexing::{lex, Lexeme, Token};
use rendering::RenderBuffer;

/// What to do with the current lexeme, computed before anything is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write the lexeme text.
    Emit,
    /// End the current line.
    LineBreak,
    /// Keep the header colon, then end the line one level deeper.
    Indent,
    /// End the line one level shallower. The closing brace is dropped.
    Dedent,
    /// Drop the lexeme.
    Suppress,
}

/// Result of a successful pass, with the block bookkeeping it ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformReport {
    pub program: String,
    pub blocks_opened: usize,
    pub blocks_closed: usize,
    pub final_indent_level: usize,
}

/// Mutable state of one pass. Created fresh for every source and dropped with it.
struct TransducerState<'opts> {
    indent_level: usize,
    /// Open grouping braces.
    bracket_depth: usize,
    /// Open parentheses and square brackets.
    paren_depth: usize,
    last_token: Token,
    blocks_opened: usize,
    blocks_closed: usize,
    output: RenderBuffer<'opts>,
}

impl<'opts> TransducerState<'opts> {
    fn new(options: &'opts RenderOptions) -> Self {
        TransducerState {
            indent_level: 0,
            bracket_depth: 0,
            paren_depth: 0,
            last_token: Token::StartMarker,
            blocks_opened: 0,
            blocks_closed: 0,
            output: RenderBuffer::new(options),
        }
    }

    fn nested(&self) -> bool {
        self.bracket_depth > 0 || self.paren_depth > 0
    }

    /// Classify a lexeme, updating the bracket bookkeeping it affects.
    fn classify(&mut self, lexeme: &Lexeme<'_>) -> Result<Action, StructureError> {
        let action = match lexeme.token {
            Token::Semicolon => Action::LineBreak,
            Token::Newline if self.nested() => Action::Suppress,
            Token::Newline => Action::LineBreak,
            Token::Colon if !self.nested() => Action::Indent,
            Token::OpenBrace if self.last_token == Token::Colon && !self.nested() => {
                self.blocks_opened += 1;
                Action::Suppress
            }
            Token::OpenBrace => {
                self.bracket_depth += 1;
                Action::Emit
            }
            Token::CloseBrace if self.bracket_depth > 0 => {
                self.bracket_depth -= 1;
                Action::Emit
            }
            Token::CloseBrace if self.indent_level > 0 => {
                self.blocks_closed += 1;
                Action::Dedent
            }
            Token::CloseBrace => {
                return Err(StructureError {
                    offset: lexeme.span.start,
                })
            }
            token if token.opens_group() => {
                self.paren_depth += 1;
                Action::Emit
            }
            token if token.closes_group() => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Action::Emit
            }
            token if token.is_marker() => Action::Suppress,
            _ => Action::Emit,
        };
        Ok(action)
    }

    fn apply(&mut self, action: Action, lexeme: &Lexeme<'_>) {
        match action {
            Action::Emit => self.output.push_token(lexeme.text, self.indent_level),
            Action::LineBreak => self.output.break_line(),
            Action::Indent => {
                self.output.push_header_colon(self.indent_level);
                self.indent_level += 1;
                self.output.break_line();
                tracing::trace!(level = self.indent_level, offset = lexeme.span.start, "block header");
            }
            Action::Dedent => {
                self.indent_level -= 1;
                self.output.break_line();
                tracing::trace!(level = self.indent_level, offset = lexeme.span.start, "block closed");
            }
            Action::Suppress => {}
        }

        // Line breaks are layout, a `{` on the line after its header still opens the block.
        if lexeme.token != Token::Newline {
            self.last_token = lexeme.token;
        }
    }

    fn step(&mut self, lexeme: &Lexeme<'_>) -> Result<(), StructureError> {
        let action = self.classify(lexeme)?;
        self.apply(action, lexeme);
        Ok(())
    }

    fn finish(self) -> TransformReport {
        TransformReport {
            program: self.output.finish(),
            blocks_opened: self.blocks_opened,
            blocks_closed: self.blocks_closed,
            final_indent_level: self.indent_level,
        }
    }
}

/// Rewrites brace-delimited sources into indentation-based ones.
#[derive(Debug, Clone, Default)]
pub struct Transducer {
    options: RenderOptions,
}

impl Transducer {
    pub fn new(options: RenderOptions) -> Self {
        Transducer { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Transform a whole source string into a rendered program.
    pub fn transform(&self, source: &str) -> Result<String, StructureError> {
        self.transform_with_report(source).map(|report| report.program)
    }

    pub fn transform_with_report(&self, source: &str) -> Result<TransformReport, StructureError> {
        self.transform_lexemes(lex(source))
    }

    /// Run the pass over an already lexed stream. The stream ends at its first end marker.
    pub fn transform_lexemes<'src, I>(&self, lexemes: I) -> Result<TransformReport, StructureError>
    where
        I: IntoIterator<Item = Lexeme<'src>>,
    {
        let mut state = TransducerState::new(&self.options);
        for lexeme in lexemes {
            if lexeme.token == Token::EndMarker {
                break;
            }
            state.step(&lexeme).inspect_err(|error| {
                tracing::debug!(offset = error.offset, %error, "transform aborted");
            })?;
        }

        let report = state.finish();
        tracing::debug!(
            blocks_opened = report.blocks_opened,
            blocks_closed = report.blocks_closed,
            final_indent_level = report.final_indent_level,
            "transform complete"
        );
        Ok(report)
    }
}

/// Transform `source` with the default four-space indentation.
///
/// Re-running this on its own output is not expected to give the same output back.
pub fn transform(source: &str) -> Result<String, StructureError> {
    Transducer::default().transform(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain_call(r#"print("hi")"#, "print ( \"hi\" )\n")]
    #[case::function_def(
        "def s2i(s): { return int(s) }",
        "def s2i ( s ) :\n    return int ( s )\n"
    )]
    #[case::if_else(
        r#"if "braces"=="bad": { print("Be gone!"); exit(99) } else: { print("Howdy!") }"#,
        "if \"braces\" == \"bad\" :\n    print ( \"Be gone!\" )\n    exit ( 99 )\nelse :\n    print ( \"Howdy!\" )\n"
    )]
    #[case::set_literal("x = {1,2,3}", "x = { 1 , 2 , 3 }\n")]
    #[case::dict_literal_in_block(
        "def f(): { return {'a': 1} }",
        "def f ( ) :\n    return { 'a' : 1 }\n"
    )]
    #[case::nested_blocks(
        "for i in range(3): { if i: { print(i) } else: { pass } }",
        "for i in range ( 3 ) :\n    if i :\n        print ( i )\n    else :\n        pass\n"
    )]
    #[case::top_level_slice("y = x[1:]", "y = x [ 1 : ]\n")]
    #[case::slice_in_call("print(x[1:2])", "print ( x [ 1 : 2 ] )\n")]
    #[case::statements("a = 1; b = 2", "a = 1\nb = 2\n")]
    #[case::repeated_separators(";a;;b;", "a\nb\n")]
    #[case::source_line_breaks("a = 1\nb = 2\n", "a = 1\nb = 2\n")]
    #[case::line_break_inside_call("f(1,\n2)", "f ( 1 , 2 )\n")]
    #[case::header_without_braces("if x: y", "if x :\n    y\n")]
    #[case::opener_on_next_line("if x:\n{ y }", "if x :\n    y\n")]
    #[case::statement_after_block(
        "while x: { x -= 1 }; print(x)",
        "while x :\n    x -= 1\nprint ( x )\n"
    )]
    #[case::empty("", "\n")]
    fn test_transform(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(transform(source).unwrap(), expected);
    }

    #[rstest]
    #[case::bare_close("}", 0)]
    #[case::one_too_many("if x: { y } }", 12)]
    #[case::after_grouping("x = {1}}", 7)]
    fn test_too_many_closing_brackets(#[case] source: &str, #[case] offset: usize) {
        let error = transform(source).unwrap_err();
        assert_eq!(error, StructureError { offset });
        assert_eq!(error.to_string(), "too many closing brackets");
    }

    #[test]
    fn test_report_tracks_block_balance() {
        let report = Transducer::default()
            .transform_with_report("if a: { if b: { c } } else: { d }")
            .unwrap();
        assert_eq!(report.blocks_opened, 3);
        assert_eq!(report.blocks_closed, 3);
        assert_eq!(report.final_indent_level, 0);
    }

    #[test]
    fn test_custom_indent_unit() {
        let transducer = Transducer::new(RenderOptions::tabs());
        assert_eq!(
            transducer.transform("if a: { if b: { c } }").unwrap(),
            "if a :\n\tif b :\n\t\tc\n"
        );
    }

    #[test]
    fn test_classify_colon_inside_brackets_is_emitted() {
        let options = RenderOptions::default();
        let mut state = TransducerState::new(&options);
        let colon = Lexeme {
            token: Token::Colon,
            text: ":",
            span: 0..1,
        };
        assert_eq!(state.classify(&colon), Ok(Action::Indent));
        state.bracket_depth = 1;
        assert_eq!(state.classify(&colon), Ok(Action::Emit));
    }

    #[test]
    fn test_transform_stops_at_end_marker() {
        let lexemes = vec![
            Lexeme {
                token: Token::Name,
                text: "a",
                span: 0..1,
            },
            Lexeme {
                token: Token::EndMarker,
                text: "",
                span: 1..1,
            },
            Lexeme {
                token: Token::CloseBrace,
                text: "}",
                span: 1..2,
            },
        ];
        let report = Transducer::default().transform_lexemes(lexemes).unwrap();
        assert_eq!(report.program, "a\n");
    }
}
