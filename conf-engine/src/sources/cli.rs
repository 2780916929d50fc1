//! Command-line argument source

use super::SourceResolver;

/// Argument that names the configuration file; never treated as an option
pub const CONFIG_FILE_FLAG: &str = "config-file";

/// Resolves options from `--group-option value` style arguments
///
/// Default-group options are read from `--option`. Underscores in the option
/// name may be written as dashes. Both `--flag value` and `--flag=value` are
/// accepted, a flag with no value reads as `"true"`, the last occurrence wins
/// and `--` ends option parsing.
#[derive(Debug, Clone, Default)]
pub struct CommandLineSource {
    flags: Vec<(String, String)>,
}

impl CommandLineSource {
    /// Build from arguments, excluding the program name
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        Self {
            flags: tokenize(&args),
        }
    }

    /// Build from the current process arguments
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// Value of `--config-file`, if given
    pub fn config_file(&self) -> Option<&str> {
        self.find(CONFIG_FILE_FLAG)
    }

    fn find(&self, flag: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }
}

fn tokenize(args: &[String]) -> Vec<(String, String)> {
    let mut flags = Vec::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        let Some(flag) = arg.strip_prefix("--") else {
            continue;
        };

        if let Some((name, value)) = flag.split_once('=') {
            flags.push((name.to_string(), value.to_string()));
            continue;
        }

        let value = match iter.peek() {
            Some(next) if !next.starts_with("--") => iter.next().cloned(),
            _ => None,
        };
        flags.push((flag.to_string(), value.unwrap_or_else(|| "true".to_string())));
    }

    flags
}

fn flag_names(name: &str, group: Option<&str>) -> Vec<String> {
    let literal = match group {
        Some(group) => format!("{}-{}", group, name),
        None => name.to_string(),
    };
    let dashed = literal.replace('_', "-");

    if dashed == literal {
        vec![literal]
    } else {
        vec![literal, dashed]
    }
}

impl SourceResolver for CommandLineSource {
    fn lookup(&self, name: &str, group: Option<&str>) -> Option<String> {
        let names = flag_names(name, group);
        if group.is_none() && names.iter().any(|n| n == CONFIG_FILE_FLAG) {
            return None;
        }

        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| names.iter().any(|n| n == flag))
            .map(|(_, value)| value.clone())
    }

    fn source_name(&self) -> &str {
        "command line"
    }
}
