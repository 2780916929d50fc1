//! Declarative option registration from YAML

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::error::ConfigResult;
use crate::options::ConfigOption;

/// Option declarations for the default group and for named groups
///
/// ```yaml
/// options:
///   - name: listen
///     type: url
///     default: "http://127.0.0.1:8080"
/// groups:
///   db:
///     - name: pool_size
///       type: number
///       required: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionManifest {
    /// Options of the default group
    pub options: Vec<ConfigOption>,

    /// Options of named groups
    pub groups: BTreeMap<String, Vec<ConfigOption>>,
}

impl OptionManifest {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Register every declaration; stops at the first conflict without rollback
    pub fn register(&self, config: &Config) -> ConfigResult<()> {
        config.register_options(self.options.iter().cloned(), None)?;
        for (group, options) in &self.groups {
            config.register_options(options.iter().cloned(), Some(group))?;
        }
        Ok(())
    }

    /// Every declared `(group, option name)` pair in declaration order
    pub fn keys(&self) -> Vec<(Option<String>, String)> {
        let defaults = self
            .options
            .iter()
            .map(|option| (None, option.name().to_string()));
        let grouped = self.groups.iter().flat_map(|(group, options)| {
            options
                .iter()
                .map(move |option| (Some(group.clone()), option.name().to_string()))
        });
        defaults.chain(grouped).collect()
    }
}
