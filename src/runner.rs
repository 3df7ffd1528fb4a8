//! Hands a rendered program to the interpreter.
//!
//! The transducer only produces text. Everything needed to actually run it lives here:
//! variable injection (see [namespace]), standard input handling, and spawning the
//! configured interpreter as `<interpreter> <args...> -c <program>`.
//!
//! Standard input is handled according to an [InputMode] supplied by the caller. When
//! input is piped it is drained eagerly, before the interpreter starts, and forwarded to
//! it; an interpreter that exits without reading all of it is not an error.

pub mod namespace;

pub use namespace::{Binding, Namespace};

use crate::config::RunnerConfig;
use crate::error::RunError;
use std::io::{self, ErrorKind, IsTerminal, Read, Write};
use std::process::{Command, ExitStatus, Stdio};

/// Where the program's standard input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The interpreter inherits the terminal.
    Interactive,
    /// Input is drained up front and forwarded to the interpreter.
    Piped,
}

impl InputMode {
    pub fn from_piped(input_is_piped: bool) -> Self {
        if input_is_piped {
            InputMode::Piped
        } else {
            InputMode::Interactive
        }
    }

    /// Inspect this process's standard input.
    pub fn detect() -> Self {
        Self::from_piped(!io::stdin().is_terminal())
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    interpreter: String,
    args: Vec<String>,
    input: InputMode,
}

impl Runner {
    pub fn new(config: &RunnerConfig, input: InputMode) -> Self {
        Runner {
            interpreter: config.interpreter.clone(),
            args: config.args.clone(),
            input,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input
    }

    /// The command that runs `program`, standard streams not yet configured.
    pub fn command(&self, program: &str) -> Command {
        let mut command = Command::new(&self.interpreter);
        command.args(&self.args).arg("-c").arg(program);
        command
    }

    /// Run `program`, reading this process's standard input when it is piped.
    pub fn run(&self, program: &str) -> Result<ExitStatus, RunError> {
        match self.input {
            InputMode::Interactive => {
                tracing::debug!(interpreter = %self.interpreter, "running with inherited stdin");
                self.command(program)
                    .stdin(Stdio::inherit())
                    .status()
                    .map_err(|source| self.spawn_error(source))
            }
            InputMode::Piped => {
                let mut input = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut input)
                    .map_err(RunError::ReadInput)?;
                self.run_with_input(program, &input)
            }
        }
    }

    /// Run `program` with `input` as its standard input.
    pub fn run_with_input(&self, program: &str, input: &[u8]) -> Result<ExitStatus, RunError> {
        tracing::debug!(
            interpreter = %self.interpreter,
            input_bytes = input.len(),
            "running with forwarded stdin"
        );
        let mut child = self
            .command(program)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input) {
                Ok(()) => {}
                Err(error) if error.kind() == ErrorKind::BrokenPipe => {
                    tracing::debug!("interpreter closed its stdin early");
                }
                Err(error) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RunError::ForwardInput(error));
                }
            }
        }

        child.wait().map_err(RunError::Wait)
    }

    fn spawn_error(&self, source: io::Error) -> RunError {
        RunError::Spawn {
            interpreter: self.interpreter.clone(),
            source,
        }
    }
}

/// Exit code to report for an interpreter that finished with `status`.
///
/// A child killed by a signal maps to `128 + signal`, as shells do.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
