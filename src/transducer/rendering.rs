//! Rendering buffer for the block transducer
//!
//! Text is appended token by token. Indentation is written lazily, when the first token
//! of a line arrives, so consecutive line breaks never leave blank or whitespace-only
//! lines behind, and trailing token separators are trimmed whenever a line is closed.

/// Indentation settings for the rendered program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Text written once per indentation level.
    pub indent_unit: String,
}

impl RenderOptions {
    pub fn spaces(width: usize) -> Self {
        RenderOptions {
            indent_unit: " ".repeat(width),
        }
    }

    pub fn tabs() -> Self {
        RenderOptions {
            indent_unit: "\t".to_string(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::spaces(4)
    }
}

/// Append-only output of a single transducer pass.
#[derive(Debug)]
pub(crate) struct RenderBuffer<'opts> {
    text: String,
    indent_unit: &'opts str,
    line_open: bool,
}

impl<'opts> RenderBuffer<'opts> {
    pub(crate) fn new(options: &'opts RenderOptions) -> Self {
        RenderBuffer {
            text: String::new(),
            indent_unit: &options.indent_unit,
            line_open: false,
        }
    }

    fn open_line(&mut self, level: usize) {
        if !self.line_open {
            for _ in 0..level {
                self.text.push_str(self.indent_unit);
            }
            self.line_open = true;
        }
    }

    /// Write a token's text followed by a single separating space.
    pub(crate) fn push_token(&mut self, text: &str, level: usize) {
        self.open_line(level);
        self.text.push_str(text);
        self.text.push(' ');
    }

    /// Write the colon that ends a compound statement header.
    pub(crate) fn push_header_colon(&mut self, level: usize) {
        self.open_line(level);
        self.text.push(':');
    }

    /// End the current line, if anything has been written to it.
    pub(crate) fn break_line(&mut self) {
        if self.line_open {
            let trimmed = self.text.trim_end_matches(' ').len();
            self.text.truncate(trimmed);
            self.text.push('\n');
            self.line_open = false;
        }
    }

    /// Close the last line and hand out the program, ending in exactly one newline.
    pub(crate) fn finish(mut self) -> String {
        self.break_line();
        if self.text.is_empty() {
            self.text.push('\n');
        }
        self.text
    }
}
