//! Option declarations and type coercion
//!
//! A [`ConfigOption`] is an immutable declaration: a name, an [`OptionKind`],
//! an optional default and a `required` flag. The kind owns the rule that
//! turns a raw source string into a typed [`Value`].

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Declared type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Number,
    Boolean,
    Url,
    List,
}

const TRUTHY: [&str; 3] = ["true", "yes", "1"];
const FALSY: [&str; 3] = ["false", "no", "0"];

impl OptionKind {
    /// Convert a raw source string into a value of this kind
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        match self {
            OptionKind::String => Ok(Value::String(raw.to_string())),
            OptionKind::Number => parse_number(raw.trim()),
            OptionKind::Boolean => parse_boolean(raw.trim()),
            OptionKind::Url => Url::parse(raw.trim())
                .map(Value::Url)
                .map_err(|e| e.to_string()),
            OptionKind::List => Ok(Value::List(parse_list(raw))),
        }
    }

    /// Whether an already-typed value fits this kind
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (OptionKind::String, Value::String(_))
                | (OptionKind::Number, Value::Integer(_))
                | (OptionKind::Number, Value::Float(_))
                | (OptionKind::Boolean, Value::Boolean(_))
                | (OptionKind::Url, Value::Url(_))
                | (OptionKind::List, Value::List(_))
        )
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::String => "string",
            OptionKind::Number => "number",
            OptionKind::Boolean => "boolean",
            OptionKind::Url => "url",
            OptionKind::List => "list",
        };
        f.write_str(name)
    }
}

fn parse_number(raw: &str) -> Result<Value, String> {
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Value::Integer(int));
    }

    match raw.parse::<f64>() {
        Ok(float) if float.is_finite() => Ok(Value::Float(float)),
        Ok(_) => Err("value is not a finite number".to_string()),
        Err(_) => Err("value is not an integer or floating-point number".to_string()),
    }
}

fn parse_boolean(raw: &str) -> Result<Value, String> {
    if TRUTHY.iter().any(|token| token.eq_ignore_ascii_case(raw)) {
        Ok(Value::Boolean(true))
    } else if FALSY.iter().any(|token| token.eq_ignore_ascii_case(raw)) {
        Ok(Value::Boolean(false))
    } else {
        Err(format!(
            "expected one of {} or {}",
            TRUTHY.join("/"),
            FALSY.join("/")
        ))
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A resolved, typed option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
    Url(Url),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Value::Url(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The option kind this value belongs to
    pub fn kind(&self) -> OptionKind {
        match self {
            Value::String(_) => OptionKind::String,
            Value::Integer(_) | Value::Float(_) => OptionKind::Number,
            Value::Boolean(_) => OptionKind::Boolean,
            Value::Url(_) => OptionKind::Url,
            Value::List(_) => OptionKind::List,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Url(u) => write!(f, "{}", u),
            Value::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Url> for Value {
    fn from(value: Url) -> Self {
        Value::Url(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

/// Declaration of a configuration option
///
/// Two declarations are the same option only when every field matches, which
/// is what duplicate detection compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigOption {
    name: String,

    #[serde(rename = "type")]
    kind: OptionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,

    #[serde(default)]
    required: bool,
}

impl ConfigOption {
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Boolean)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Url)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::List)
    }

    /// Set the value used when no source provides one
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Fail resolution when neither a source nor a default yields a value
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Coerce a raw source value into this option's type
    pub fn coerce(&self, raw: &str) -> ConfigResult<Value> {
        self.kind.parse(raw).map_err(|reason| ConfigError::Coercion {
            name: self.name.clone(),
            kind: self.kind.to_string(),
            value: raw.to_string(),
            reason,
        })
    }

    /// Bring the default in line with the declared kind.
    ///
    /// String defaults for non-string kinds are run through the kind's
    /// coercion rule; any other mismatch is rejected.
    pub(crate) fn normalized(mut self) -> ConfigResult<Self> {
        let Some(default) = self.default.take() else {
            return Ok(self);
        };

        let default = match default {
            Value::Float(float) if !float.is_finite() => {
                return Err(ConfigError::InvalidDefault {
                    name: self.name.clone(),
                    kind: self.kind.to_string(),
                    reason: "value is not a finite number".to_string(),
                })
            }
            value if self.kind.accepts(&value) => value,
            Value::String(raw) => {
                self.kind
                    .parse(&raw)
                    .map_err(|reason| ConfigError::InvalidDefault {
                        name: self.name.clone(),
                        kind: self.kind.to_string(),
                        reason,
                    })?
            }
            other => {
                return Err(ConfigError::InvalidDefault {
                    name: self.name.clone(),
                    kind: self.kind.to_string(),
                    reason: format!("default is a {}", other.kind()),
                })
            }
        };

        self.default = Some(default);
        Ok(self)
    }
}
