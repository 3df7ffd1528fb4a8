//! Configuration loader for pybrace.
//!
//! `defaults/pybrace.default.toml` is embedded into the binary so that docs and
//! runtime behavior stay in sync. Callers layer user-specific files on top of
//! those defaults via [`Loader`] before deserializing into [`PybraceConfig`].

use crate::transducer::RenderOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/pybrace.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PybraceConfig {
    pub render: RenderConfig,
    pub runner: RunnerConfig,
}

/// Indentation of the rendered program.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub indent_width: usize,
    pub use_tabs: bool,
}

impl RenderConfig {
    pub fn to_options(&self) -> RenderOptions {
        if self.use_tabs {
            RenderOptions::tabs()
        } else {
            RenderOptions::spaces(self.indent_width)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    pub interpreter: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Location of the per-user configuration file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pybrace").join("config.toml"))
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer the per-user configuration file when there is one.
    pub fn with_user_file(self) -> Self {
        match user_config_path() {
            Some(path) => self.with_optional_file(path),
            None => self,
        }
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PybraceConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PybraceConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.render.indent_width, 4);
        assert!(!config.render.use_tabs);
        assert_eq!(config.runner.interpreter, "python3");
        assert!(config.runner.args.is_empty());
        assert_eq!(config.render.to_options(), RenderOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("render.indent_width", 2_i64)
            .expect("override to apply")
            .set_override("runner.interpreter", "pypy3")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.render.to_options(), RenderOptions::spaces(2));
        assert_eq!(config.runner.interpreter, "pypy3");
    }

    #[test]
    fn tabs_win_over_width() {
        let config = Loader::new()
            .set_override("render.use_tabs", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.render.to_options(), RenderOptions::tabs());
    }

    #[test]
    fn layers_files_over_defaults() {
        let path = std::env::temp_dir().join(format!("pybrace-config-{}.toml", std::process::id()));
        fs::write(&path, "[runner]\ninterpreter = \"python3.12\"\nargs = [\"-u\"]\n")
            .expect("write config");

        let config = Loader::new().with_file(&path).build().expect("config to build");
        fs::remove_file(&path).ok();

        assert_eq!(config.runner.interpreter, "python3.12");
        assert_eq!(config.runner.args, vec!["-u".to_string()]);
        assert_eq!(config.render.indent_width, 4);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/nonexistent/pybrace/config.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/pybrace/config.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.runner.interpreter, "python3");
    }
}
