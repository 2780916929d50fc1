//! Typed configuration options resolved from layered sources
//!
//! Options are declared once, optionally inside a named group, and resolved
//! lazily: the command line is consulted first, then the environment, then a
//! configuration file, then the option's default. Resolved values are coerced
//! to the declared type and cached per group until the cache is flushed.

pub mod config;
pub mod error;
pub mod group;
pub mod loader;
pub mod manifest;
pub mod options;
pub mod sources;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types
pub use config::{Config, GroupHandle};
pub use error::{ConfigError, ConfigResult};
pub use group::Group;
pub use loader::ConfigLoader;
pub use manifest::OptionManifest;
pub use options::{ConfigOption, OptionKind, Value};

// Re-export sources
pub use sources::{CommandLineSource, EnvSource, FileSource, MapSource, SourceResolver};
