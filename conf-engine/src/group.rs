//! Option groups and their resolved-value cache

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

use crate::error::{display_group, ConfigError, ConfigResult};
use crate::options::{ConfigOption, Value};
use crate::sources::SourceResolver;

/// A namespace of options sharing one cache scope
///
/// The default group has no name. A missing cache entry means "not yet
/// resolved", never "resolved to nothing".
#[derive(Debug, Default)]
pub struct Group {
    name: Option<String>,
    options: RwLock<HashMap<String, ConfigOption>>,
    cache: Mutex<HashMap<String, Value>>,
}

impl Group {
    /// Create the default (unnamed) group
    pub fn default_group() -> Self {
        Self::default()
    }

    /// Create a named group
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Register an option declaration
    ///
    /// Re-registering an identical declaration is accepted; a different
    /// declaration under the same name fails with `DuplicateOption`.
    pub fn add_option(&self, option: ConfigOption) -> ConfigResult<()> {
        let option = option.normalized()?;
        let mut options = self.options.write();

        match options.get(option.name()) {
            Some(existing) if *existing == option => Ok(()),
            Some(_) => Err(ConfigError::DuplicateOption {
                group: display_group(self.name()),
                name: option.name().to_string(),
            }),
            None => {
                options.insert(option.name().to_string(), option);
                Ok(())
            }
        }
    }

    /// Declaration registered under `name`
    pub fn option(&self, name: &str) -> Option<ConfigOption> {
        self.options.read().get(name).cloned()
    }

    /// Registered option names, sorted
    pub fn option_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.options.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the effective value of `name`
    ///
    /// Returns the cached value when present. Otherwise the first source in
    /// `sources` that knows the option wins; its raw value is coerced and
    /// cached. Without a source value the default is used. `Ok(None)` means
    /// the option is unset, not required, and has no default.
    pub fn resolve<S: SourceResolver>(
        &self,
        name: &str,
        sources: &[S],
    ) -> ConfigResult<Option<Value>> {
        let option = self.option(name).ok_or_else(|| ConfigError::UnknownOption {
            group: display_group(self.name()),
            name: name.to_string(),
        })?;

        let mut cache = self.cache.lock();
        if let Some(value) = cache.get(name) {
            log::trace!("Cache hit for {}", self.qualified(name));
            return Ok(Some(value.clone()));
        }

        let value = match self.lookup(name, sources) {
            Some(raw) => option.coerce(&raw)?,
            None => match option.default_value() {
                Some(default) => {
                    log::debug!("Using default for {}", self.qualified(name));
                    default.clone()
                }
                None if option.is_required() => {
                    return Err(ConfigError::RequiredOptionMissing {
                        group: display_group(self.name()),
                        name: name.to_string(),
                    })
                }
                None => return Ok(None),
            },
        };

        cache.insert(name.to_string(), value.clone());
        Ok(Some(value))
    }

    fn lookup<S: SourceResolver>(&self, name: &str, sources: &[S]) -> Option<String> {
        for source in sources {
            match source.lookup(name, self.name()) {
                Some(raw) => {
                    log::debug!(
                        "Resolved {} from {}",
                        self.qualified(name),
                        source.source_name()
                    );
                    return Some(raw);
                }
                None => log::trace!(
                    "No value for {} in {}",
                    self.qualified(name),
                    source.source_name()
                ),
            }
        }
        None
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.lock().contains_key(name)
    }

    pub fn cached_value(&self, name: &str) -> Option<Value> {
        self.cache.lock().get(name).cloned()
    }

    /// Drop every cached value; declarations are kept
    pub fn flush(&self) {
        let mut cache = self.cache.lock();
        if !cache.is_empty() {
            log::debug!(
                "Flushing {} cached values in group {}",
                cache.len(),
                display_group(self.name())
            );
        }
        cache.clear();
    }

    fn qualified(&self, name: &str) -> String {
        match self.name() {
            Some(group) => format!("{}.{}", group, name),
            None => name.to_string(),
        }
    }
}
