//! File-backed source
//!
//! Files are YAML, JSON when the extension is `.json`, or INI when it is
//! `.ini`. Top-level scalar entries belong to the default group; top-level
//! mappings (INI `[section]` blocks) are group sections:
//!
//! ```yaml
//! default_option: default_value
//! test_int: 12345
//! booleans:
//!   boolean_true: true
//!   boolean_no: "no"
//! ```

use ini::Ini;
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::{Path, PathBuf};

use super::{MapSource, SourceResolver};
use crate::error::{ConfigError, ConfigResult};

/// Source backed by a configuration file parsed once at construction
#[derive(Debug, Clone)]
pub struct FileSource {
    path: Option<PathBuf>,
    values: MapSource,
}

impl FileSource {
    /// Read and parse a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let mut source = match extension.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("ini") => Self::from_ini_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };

        log::debug!("Loaded configuration file {}", path.display());
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let document: YamlValue = serde_yaml::from_str(content)?;
        Self::from_document(document)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let document: YamlValue = serde_json::from_str(content)?;
        Self::from_document(document)
    }

    /// Parse INI text; keys before the first `[section]` go to the default group
    pub fn from_ini_str(content: &str) -> ConfigResult<Self> {
        let document = Ini::load_from_str(content)?;
        let mut values = MapSource::new("file");

        for (section, properties) in document.iter() {
            for (key, value) in properties.iter() {
                values.set(section, key, value);
            }
        }

        Ok(Self { path: None, values })
    }

    /// Path the source was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn from_document(document: YamlValue) -> ConfigResult<Self> {
        let mut values = MapSource::new("file");

        let root = match document {
            YamlValue::Mapping(root) => root,
            // An empty document parses as null
            YamlValue::Null => Mapping::new(),
            other => {
                return Err(ConfigError::InvalidDocument(format!(
                    "expected a mapping at the top level, found {}",
                    describe(&other)
                )))
            }
        };

        for (key, value) in root {
            let Some(key) = render_scalar(&key) else {
                continue;
            };
            match value {
                YamlValue::Mapping(section) => load_section(&mut values, &key, section),
                other => {
                    if let Some(raw) = render(&other) {
                        values.set(None, &key, raw);
                    }
                }
            }
        }

        Ok(Self { path: None, values })
    }
}

fn describe(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

fn load_section(values: &mut MapSource, group: &str, section: Mapping) {
    for (key, value) in section {
        let Some(key) = render_scalar(&key) else {
            continue;
        };
        match render(&value) {
            Some(raw) => values.set(Some(group), &key, raw),
            None => log::trace!("Skipping non-scalar entry {}.{} in configuration file", group, key),
        }
    }
}

fn render(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::Sequence(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Option<Vec<_>>>()
            .map(|items| items.join(",")),
        other => render_scalar(other),
    }
}

fn render_scalar(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl SourceResolver for FileSource {
    fn lookup(&self, name: &str, group: Option<&str>) -> Option<String> {
        self.values.lookup(name, group)
    }

    fn source_name(&self) -> &str {
        "file"
    }
}
