//! Variables injected into the program's namespace.
//!
//! Bindings come from `NAME=VALUE` assignments on the command line and are always
//! strings. They are written as a prelude of python assignments placed in front of the
//! rendered program, so the transducer never sees them.

use crate::error::RunError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("assignment pattern is valid")
});

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

impl Binding {
    /// Parse a single `NAME=VALUE` assignment.
    pub fn parse(assignment: &str) -> Result<Self, RunError> {
        let captures = ASSIGNMENT
            .captures(assignment)
            .ok_or_else(|| RunError::InvalidAssignment(assignment.to_string()))?;
        let name = &captures[1];
        if KEYWORDS.contains(&name) {
            return Err(RunError::ReservedName(name.to_string()));
        }
        Ok(Binding {
            name: name.to_string(),
            value: captures[2].to_string(),
        })
    }
}

/// Ordered set of bindings. Rebinding a name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    bindings: Vec<Binding>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, RunError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut namespace = Namespace::new();
        for assignment in assignments {
            let binding = Binding::parse(assignment.as_ref())?;
            namespace.insert(binding.name, binding.value);
        }
        Ok(namespace)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.bindings.iter_mut().find(|binding| binding.name == name) {
            Some(binding) => binding.value = value,
            None => self.bindings.push(Binding { name, value }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// One python assignment per binding, each on its own line.
    pub fn prelude(&self) -> String {
        let mut prelude = String::new();
        for binding in &self.bindings {
            prelude.push_str(&binding.name);
            prelude.push_str(" = ");
            prelude.push_str(&python_string_literal(&binding.value));
            prelude.push('\n');
        }
        prelude
    }

    /// Put the prelude in front of an already rendered program.
    pub fn inject(&self, program: &str) -> String {
        let mut injected = self.prelude();
        injected.push_str(program);
        injected
    }
}

/// Quote `value` as a single-quoted python string literal.
pub fn python_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            ch if ch.is_control() => {
                let _ = write!(literal, "\\x{:02x}", ch as u32);
            }
            ch => literal.push(ch),
        }
    }
    literal.push('\'');
    literal
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_assignment() {
        let binding = Binding::parse("name=World").unwrap();
        assert_eq!(binding.name, "name");
        assert_eq!(binding.value, "World");
    }

    #[test]
    fn test_value_may_contain_equals_and_newlines() {
        let binding = Binding::parse("expr=a=b\nc").unwrap();
        assert_eq!(binding.value, "a=b\nc");
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(Binding::parse("x=").unwrap().value, "");
    }

    #[rstest]
    #[case("novalue")]
    #[case("=value")]
    #[case("1abc=value")]
    #[case("a-b=value")]
    fn test_invalid_assignments(#[case] assignment: &str) {
        assert!(matches!(
            Binding::parse(assignment),
            Err(RunError::InvalidAssignment(_))
        ));
    }

    #[test]
    fn test_keywords_are_rejected() {
        assert!(matches!(
            Binding::parse("class=x"),
            Err(RunError::ReservedName(name)) if name == "class"
        ));
    }

    #[test]
    fn test_rebinding_replaces_in_place() {
        let namespace = Namespace::from_assignments(["a=1", "b=2", "a=3"]).unwrap();
        assert_eq!(namespace.prelude(), "a = '3'\nb = '2'\n");
    }

    #[test]
    fn test_inject_prepends_prelude() {
        let mut namespace = Namespace::new();
        namespace.insert("who", "there");
        assert_eq!(
            namespace.inject("print ( who )\n"),
            "who = 'there'\nprint ( who )\n"
        );
    }

    #[test]
    fn test_empty_namespace_leaves_program_alone() {
        assert_eq!(Namespace::new().inject("pass\n"), "pass\n");
    }

    #[rstest]
    #[case("plain", "'plain'")]
    #[case("it's", r"'it\'s'")]
    #[case(r"C:\temp", r"'C:\\temp'")]
    #[case("a\nb\tc\r", r"'a\nb\tc\r'")]
    #[case("bell\u{7}", r"'bell\x07'")]
    #[case("größe", "'größe'")]
    fn test_python_string_literal(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(python_string_literal(value), expected);
    }
}
