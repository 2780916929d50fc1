//! In-memory source

use std::collections::HashMap;

use super::SourceResolver;

/// Source backed by a `(group, name) -> raw value` table
///
/// Useful for embedding programmatic overrides and for tests.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    values: HashMap<(Option<String>, String), String>,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    /// Set a raw value, returning the source for chaining
    pub fn with(mut self, group: Option<&str>, name: &str, value: impl Into<String>) -> Self {
        self.set(group, name, value);
        self
    }

    pub fn set(&mut self, group: Option<&str>, name: &str, value: impl Into<String>) {
        self.values
            .insert((group.map(str::to_string), name.to_string()), value.into());
    }
}

impl SourceResolver for MapSource {
    fn lookup(&self, name: &str, group: Option<&str>) -> Option<String> {
        self.values
            .get(&(group.map(str::to_string), name.to_string()))
            .cloned()
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
