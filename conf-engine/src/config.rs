//! Top-level option registry

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigResult;
use crate::group::Group;
use crate::options::{ConfigOption, Value};
use crate::sources::SourceResolver;

/// Registry of option groups and the ordered list of sources
///
/// The default group exists from construction; named groups are created the
/// first time they are referenced. Sources are consulted highest precedence
/// first.
pub struct Config {
    default_group: Arc<Group>,
    groups: RwLock<BTreeMap<String, Arc<Group>>>,
    sources: Vec<Box<dyn SourceResolver>>,
}

impl Config {
    /// Create a config without any sources; only defaults resolve
    pub fn new() -> Self {
        Self::with_sources(Vec::new())
    }

    /// Create a config with sources in precedence order, highest first
    pub fn with_sources(sources: Vec<Box<dyn SourceResolver>>) -> Self {
        Self {
            default_group: Arc::new(Group::default_group()),
            groups: RwLock::new(BTreeMap::new()),
            sources,
        }
    }

    /// Append a source below every existing one
    pub fn add_source(&mut self, source: impl SourceResolver + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Names of the configured sources, highest precedence first
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }

    /// Register an option in `group`, or in the default group for `None`
    pub fn register_option(&self, option: ConfigOption, group: Option<&str>) -> ConfigResult<()> {
        self.raw_group(group).add_option(option)
    }

    /// Register several options into the same group
    ///
    /// Each option is registered on its own: the first failure is returned
    /// and options registered before it stay registered.
    pub fn register_options<I>(&self, options: I, group: Option<&str>) -> ConfigResult<()>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let target = self.raw_group(group);
        for option in options {
            target.add_option(option)?;
        }
        Ok(())
    }

    /// Resolve an option of the default group
    pub fn get(&self, name: &str) -> ConfigResult<Option<Value>> {
        self.default_group.resolve(name, self.sources.as_slice())
    }

    /// Resolve an option of `group`, or of the default group for `None`
    pub fn get_in(&self, group: Option<&str>, name: &str) -> ConfigResult<Option<Value>> {
        self.raw_group(group).resolve(name, self.sources.as_slice())
    }

    /// Namespace accessor for a named group
    pub fn group(&self, name: &str) -> GroupHandle<'_> {
        GroupHandle {
            config: self,
            group: self.raw_group(Some(name)),
        }
    }

    /// Names of the named groups created so far
    pub fn group_names(&self) -> Vec<String> {
        self.groups.read().keys().cloned().collect()
    }

    /// Underlying group state, created on first reference
    pub fn raw_group(&self, group: Option<&str>) -> Arc<Group> {
        let Some(name) = group else {
            return Arc::clone(&self.default_group);
        };

        if let Some(existing) = self.groups.read().get(name) {
            return Arc::clone(existing);
        }

        let mut groups = self.groups.write();
        let entry = groups.entry(name.to_string()).or_insert_with(|| {
            log::debug!("Creating option group '{}'", name);
            Arc::new(Group::named(name))
        });
        Arc::clone(entry)
    }

    /// Forget every resolved value in every group
    pub fn flush_cache(&self) {
        self.default_group.flush();
        for group in self.groups.read().values() {
            group.flush();
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("default_group", &self.default_group.option_names())
            .field("groups", &self.group_names())
            .field("sources", &self.source_names())
            .finish()
    }
}

/// Access to one named group's options through its owning [`Config`]
#[derive(Clone)]
pub struct GroupHandle<'a> {
    config: &'a Config,
    group: Arc<Group>,
}

impl GroupHandle<'_> {
    pub fn name(&self) -> &str {
        self.group.name().unwrap_or_default()
    }

    /// Resolve an option of this group against the config's sources
    pub fn get(&self, name: &str) -> ConfigResult<Option<Value>> {
        self.group.resolve(name, self.config.sources.as_slice())
    }

    pub fn register_option(&self, option: ConfigOption) -> ConfigResult<()> {
        self.group.add_option(option)
    }

    pub fn option_names(&self) -> Vec<String> {
        self.group.option_names()
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.group.is_cached(name)
    }

    pub fn flush(&self) {
        self.group.flush();
    }
}
