//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option name was re-registered in a group with a different declaration
    #[error("Option '{name}' is already registered in group {group} with a different declaration")]
    DuplicateOption { group: String, name: String },

    /// A raw source value could not be converted to the option's type
    #[error("Cannot convert value '{value}' of option '{name}' to {kind}: {reason}")]
    Coercion {
        name: String,
        kind: String,
        value: String,
        reason: String,
    },

    /// A required option has neither a source value nor a default
    #[error("Required option '{name}' in group {group} has no value and no default")]
    RequiredOptionMissing { group: String, name: String },

    /// Lookup of an option that was never registered
    #[error("Option '{name}' is not registered in group {group}")]
    UnknownOption { group: String, name: String },

    /// Declared default does not match the option's type
    #[error("Invalid default for option '{name}' of type {kind}: {reason}")]
    InvalidDefault {
        name: String,
        kind: String,
        reason: String,
    },

    /// I/O error reading a configuration file or writing output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// INI parsing error
    #[error("Failed to parse INI: {0}")]
    IniError(#[from] ini::ParseError),

    /// A configuration file parsed but does not have the expected shape
    #[error("Invalid configuration document: {0}")]
    InvalidDocument(String),
}

/// Render a group name for messages and logs.
pub(crate) fn display_group(group: Option<&str>) -> String {
    match group {
        Some(name) => format!("'{}'", name),
        None => "<default>".to_string(),
    }
}
