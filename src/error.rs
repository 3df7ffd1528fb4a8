//! Errors raised while transforming a source.

use thiserror::Error;

/// A block closer was found with no open block or grouping brace left to close.
///
/// This is the only failure the transducer itself can produce. It is raised as soon
/// as the offending `}` is seen and nothing rendered so far is returned with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("too many closing brackets")]
pub struct StructureError {
    /// Byte offset of the offending `}` in the source.
    pub offset: usize,
}

/// Failures of the glue around the transform: variable injection and running the interpreter.
///
/// These are kept apart from [StructureError] so callers can tell a malformed source
/// from a program that could not be run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid variable assignment `{0}`, expected NAME=VALUE")]
    InvalidAssignment(String),
    #[error("`{0}` is a python keyword and cannot be used as a variable name")]
    ReservedName(String),
    #[error("failed to start interpreter `{interpreter}`")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read standard input")]
    ReadInput(#[source] std::io::Error),
    #[error("failed to forward standard input to the interpreter")]
    ForwardInput(#[source] std::io::Error),
    #[error("failed to wait for the interpreter")]
    Wait(#[source] std::io::Error),
}
