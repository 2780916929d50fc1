//! Command-line interface for inspecting option resolution
//!
//! Options are declared in a YAML manifest; values are resolved through the
//! standard source chain. Arguments after `--` are handed to the
//! command-line source, so `conf-engine -m opts.yaml get db.url -- --db-url x`
//! shows the command line taking precedence.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::{ConfigError, ConfigLoader, ConfigResult, OptionManifest, Value};

/// Option resolution inspector
#[derive(Parser)]
#[command(name = "conf-engine")]
#[command(about = "Resolve declared options against command line, environment and file sources")]
#[command(version)]
pub struct ConfigCli {
    /// YAML manifest declaring the options
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Configuration file providing option values
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    /// Prefix for environment variable names
    #[arg(short, long)]
    pub prefix: Option<String>,

    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Available inspection commands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Resolve a single option, given as `option` or `group.option`
    Get {
        key: String,

        /// Option arguments, e.g. `-- --group-option value`
        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Resolve and print every declared option
    Dump {
        #[arg(last = true)]
        overrides: Vec<String>,
    },

    /// Resolve every declared option and report failures
    Check {
        #[arg(last = true)]
        overrides: Vec<String>,
    },
}

/// CLI application runner
pub struct ConfigCliRunner;

impl ConfigCliRunner {
    /// Run a parsed command, writing its report to `out`
    pub fn run(cli: ConfigCli, out: &mut impl Write) -> ConfigResult<()> {
        let ConfigCli {
            manifest,
            config_file,
            prefix,
            command,
        } = cli;

        let overrides = match &command {
            ConfigCommand::Get { overrides, .. }
            | ConfigCommand::Dump { overrides }
            | ConfigCommand::Check { overrides } => overrides.clone(),
        };

        let manifest = OptionManifest::from_path(&manifest)?;
        let mut loader = ConfigLoader::new().with_args(overrides);
        if let Some(prefix) = prefix {
            loader = loader.with_prefix(prefix);
        }
        if let Some(path) = config_file {
            loader = loader.with_config_file(path);
        }
        let config = loader.load()?;
        manifest.register(&config)?;

        match command {
            ConfigCommand::Get { key, .. } => {
                let (group, name) = split_key(&key);
                let value = config.get_in(group, name)?;
                writeln!(out, "{}", render(value.as_ref()))?;
            }
            ConfigCommand::Dump { .. } => {
                for (group, name) in manifest.keys() {
                    let value = config.get_in(group.as_deref(), &name)?;
                    writeln!(
                        out,
                        "{} = {}",
                        qualified(group.as_deref(), &name),
                        render(value.as_ref())
                    )?;
                }
            }
            ConfigCommand::Check { .. } => {
                let mut failures: Vec<ConfigError> = Vec::new();
                for (group, name) in manifest.keys() {
                    match config.get_in(group.as_deref(), &name) {
                        Ok(_) => writeln!(out, "✅ {}", qualified(group.as_deref(), &name))?,
                        Err(e) => {
                            writeln!(out, "❌ {}: {}", qualified(group.as_deref(), &name), e)?;
                            failures.push(e);
                        }
                    }
                }

                if let Some(first) = failures.into_iter().next() {
                    return Err(first);
                }
                writeln!(out, "All options resolved")?;
            }
        }

        Ok(())
    }
}

fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once('.') {
        Some((group, name)) => (Some(group), name),
        None => (None, key),
    }
}

fn qualified(group: Option<&str>, name: &str) -> String {
    match group {
        Some(group) => format!("{}.{}", group, name),
        None => name.to_string(),
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<unset>".to_string(),
    }
}
