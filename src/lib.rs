//! # pybrace
//!
//! Write python on a single line, using curly braces for blocks and semicolons between
//! statements, and run it as if it had been properly indented:
//!
//! ```text
//! pybrace 'for i in range(3): { if i % 2: { print(i, "odd") } else: { print(i, "even") } }'
//! ```
//!
//! Layout
//!
//!     The core is a complete-string-in, complete-string-out transform:
//!         - [lexing]: logos based tokenization of the python surface syntax.
//!         - [transducer]: the single-pass rewrite of braces and semicolons into indentation.
//!         - [error]: the structural error raised on unbalanced closing braces.
//!
//!     Everything needed to run the result sits around it and is never called by the core:
//!         - [config]: layered configuration (embedded defaults, user file, CLI overrides).
//!         - [runner]: variable injection, standard input handling and the interpreter process.

pub mod config;
pub mod error;
pub mod lexing;
pub mod runner;
pub mod transducer;

pub use error::{RunError, StructureError};
pub use transducer::{transform, RenderOptions, TransformReport, Transducer};
