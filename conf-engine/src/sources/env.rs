//! Environment variable source

use super::SourceResolver;

/// Resolves options from upper-cased `GROUP_OPTION` environment variables
///
/// Default-group options map to `OPTION`. With a prefix the names become
/// `PREFIX_GROUP_OPTION` and `PREFIX_OPTION`. The process environment is read
/// on every lookup, so a cache flush observes changes.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
}

impl EnvSource {
    /// Create an environment source without a prefix
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Create an environment source with a variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Name of the variable consulted for `name` in `group`
    pub fn var_name(&self, name: &str, group: Option<&str>) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if let Some(prefix) = self.prefix.as_deref() {
            parts.push(prefix);
        }
        if let Some(group) = group {
            parts.push(group);
        }
        parts.push(name);

        parts.join("_").replace('-', "_").to_uppercase()
    }
}

impl SourceResolver for EnvSource {
    fn lookup(&self, name: &str, group: Option<&str>) -> Option<String> {
        let var = self.var_name(name, group);
        let value = std::env::var_os(&var)?;
        match value.into_string() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring environment variable {}: value is not valid UTF-8", var);
                None
            }
        }
    }

    fn source_name(&self) -> &str {
        "environment"
    }
}
