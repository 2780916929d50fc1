//! Standard source chain assembly

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ConfigResult;
use crate::sources::{CommandLineSource, EnvSource, FileSource, SourceResolver};

/// Builds a [`Config`] over command line, environment and file sources
///
/// Precedence is fixed: command line, then environment, then the file, then
/// each option's default.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: Option<String>,
    /// Arguments, excluding the program name
    args: Vec<String>,
    /// Explicit file; otherwise taken from `--config-file`
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader with no arguments and no env prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader reading the current process arguments
    pub fn from_env_args() -> Self {
        Self::new().with_args(std::env::args().skip(1))
    }

    /// Use a prefix for environment variable names
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Use these command-line arguments (program name excluded)
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Read file values from `path` regardless of `--config-file`
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the config; fails if the config file cannot be read or parsed
    pub fn load(self) -> ConfigResult<Config> {
        let cli = CommandLineSource::new(self.args);
        let env = match self.prefix {
            Some(prefix) => EnvSource::with_prefix(prefix),
            None => EnvSource::new(),
        };

        let file_path = self
            .config_file
            .or_else(|| cli.config_file().map(PathBuf::from));
        let file = file_path
            .map(|path| FileSource::from_path(&path))
            .transpose()?;

        let mut sources: Vec<Box<dyn SourceResolver>> = vec![Box::new(cli), Box::new(env)];
        match file {
            Some(file) => sources.push(Box::new(file)),
            None => log::debug!("No configuration file given; file values are unavailable"),
        }

        Ok(Config::with_sources(sources))
    }
}
