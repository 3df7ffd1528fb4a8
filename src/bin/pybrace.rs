//! Command-line interface for pybrace
//! This binary transforms a brace-delimited python one-liner and runs it (or prints it).
//!
//! Usage:
//!   pybrace `<code>` [--var NAME=VALUE]...              - Transform and run with the interpreter
//!   pybrace `<code>` --emit [--format `<format>`]       - Print the transformed program instead

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pybrace::config::{Loader, PybraceConfig};
use pybrace::lexing::tokenize;
use pybrace::runner::{exit_code, InputMode, Namespace, Runner};
use pybrace::{StructureError, Transducer};
use std::io::{self, ErrorKind, Write};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;
const EXIT_STRUCTURE: i32 = 2;

fn cli() -> Command {
    Command::new("pybrace")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run python written with braces and semicolons on a single line")
        .arg_required_else_help(true)
        .arg(
            Arg::new("code")
                .help("Source using { } for blocks and ; between statements")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .short('e')
                .help("Print the transformed program instead of running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format for --emit")
                .value_parser(["python", "token-json", "token-simple"])
                .default_value("python"),
        )
        .arg(
            Arg::new("var")
                .long("var")
                .short('v')
                .value_name("NAME=VALUE")
                .help("Bind a string variable before the program runs")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("interpreter")
                .long("interpreter")
                .value_name("PROGRAM")
                .help("Interpreter the program is handed to"),
        )
        .arg(
            Arg::new("indent-width")
                .long("indent-width")
                .value_name("N")
                .help("Spaces per block level")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("tabs")
                .long("tabs")
                .help("Indent blocks with tabs")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_logging();

    let code = match execute(&matches) {
        Ok(code) => code,
        Err(error) => match error.downcast_ref::<StructureError>() {
            Some(structure) => {
                eprintln!("pybrace: {} (at byte {})", structure, structure.offset);
                EXIT_STRUCTURE
            }
            None => {
                eprintln!("pybrace: {:#}", error);
                EXIT_FAILURE
            }
        },
    };
    std::process::exit(code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PYBRACE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<PybraceConfig> {
    let mut loader = Loader::new().with_user_file();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(width) = matches.get_one::<usize>("indent-width") {
        loader = loader.set_override("render.indent_width", *width as i64)?;
    }
    if matches.get_flag("tabs") {
        loader = loader.set_override("render.use_tabs", true)?;
    }
    if let Some(interpreter) = matches.get_one::<String>("interpreter") {
        loader = loader.set_override("runner.interpreter", interpreter.as_str())?;
    }
    loader.build().context("failed to load configuration")
}

fn execute(matches: &ArgMatches) -> anyhow::Result<i32> {
    let source = matches
        .get_one::<String>("code")
        .context("missing code argument")?;
    let config = load_config(matches)?;

    let namespace = Namespace::from_assignments(
        matches
            .get_many::<String>("var")
            .into_iter()
            .flatten(),
    )?;

    if matches.get_flag("emit") {
        let format = matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("python");
        let output = match format {
            "token-json" => {
                let mut json = serde_json::to_string_pretty(&tokenize(source))?;
                json.push('\n');
                json
            }
            "token-simple" => tokenize(source)
                .iter()
                .map(|lexeme| format!("{:?} {:?}\n", lexeme.token, lexeme.text))
                .collect(),
            _ => {
                let program = Transducer::new(config.render.to_options()).transform(source)?;
                namespace.inject(&program)
            }
        };
        return write_stdout(&output);
    }

    let program = Transducer::new(config.render.to_options()).transform(source)?;
    let program = namespace.inject(&program);
    tracing::debug!(program = %program, "rendered program");

    let runner = Runner::new(&config.runner, InputMode::detect());
    let status = runner.run(&program)?;
    Ok(exit_code(status))
}

/// Write to stdout, treating a reader that went away as a normal end.
fn write_stdout(output: &str) -> anyhow::Result<i32> {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
        Ok(()) => Ok(0),
        Err(error) if error.kind() == ErrorKind::BrokenPipe => Ok(0),
        Err(error) => Err(error).context("failed to write output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }
}
