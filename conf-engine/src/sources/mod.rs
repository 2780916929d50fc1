//! Raw value sources
//!
//! A source answers one question: what raw string, if any, does it hold for
//! option `name` in `group`. Each source owns its naming convention. The
//! engine only consumes the first answer in precedence order.

pub mod cli;
pub mod env;
pub mod file;
pub mod memory;

pub use cli::CommandLineSource;
pub use env::EnvSource;
pub use file::FileSource;
pub use memory::MapSource;

/// Lookup capability consumed by the resolution pipeline
///
/// Implementations must be deterministic and must not mutate anything
/// observable.
pub trait SourceResolver: Send + Sync {
    /// Raw value for `name` in `group` (`None` is the default group)
    fn lookup(&self, name: &str, group: Option<&str>) -> Option<String>;

    /// Short name used in log output
    fn source_name(&self) -> &str;
}

impl<S: SourceResolver + ?Sized> SourceResolver for Box<S> {
    fn lookup(&self, name: &str, group: Option<&str>) -> Option<String> {
        (**self).lookup(name, group)
    }

    fn source_name(&self) -> &str {
        (**self).source_name()
    }
}
