//! Dynamic option values

use std::{any::Any, fmt, sync::Arc};

use indexmap::IndexMap;
use regex::Regex;

/// Ordered mapping of option name to value
pub type OptionMap = IndexMap<String, OptionValue>;

/// A dynamically typed option value
///
/// Plain data (scalars, lists, maps) is owned and copied structurally by
/// [`OptionValue::deep_clone`]. Regular expressions and opaque handles are
/// reference counted and shared between a value and its clones.
pub enum OptionValue {
    /// Explicit absence of a value
    Null,

    /// Boolean flag
    Bool(bool),

    /// Integer or floating point number
    Number(serde_json::Number),

    /// Text
    String(String),

    /// Ordered sequence
    List(Vec<OptionValue>),

    /// Nested mapping
    Map(OptionMap),

    /// Compiled regular expression (shared, never copied)
    Regex(Arc<Regex>),

    /// Any other value: callbacks, generator instances, ... (shared, never copied)
    Handle(Arc<dyn Any + Send + Sync>),
}

impl OptionValue {
    /// Wrap an arbitrary value as a shared handle
    pub fn handle<T: Any + Send + Sync>(value: T) -> Self {
        Self::Handle(Arc::new(value))
    }

    /// Structural copy of maps and lists; regexes and handles are shared
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(b) => Self::Bool(*b),
            Self::Number(n) => Self::Number(n.clone()),
            Self::String(s) => Self::String(s.clone()),
            Self::List(items) => Self::List(items.iter().map(Self::deep_clone).collect()),
            Self::Map(map) => Self::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.deep_clone()))
                    .collect(),
            ),
            Self::Regex(re) => Self::Regex(Arc::clone(re)),
            Self::Handle(handle) => Self::Handle(Arc::clone(handle)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OptionMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Arc<Regex>> {
        match self {
            Self::Regex(re) => Some(re),
            _ => None,
        }
    }

    /// Downcast a handle to a concrete type
    pub fn as_handle<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Handle(handle) => handle.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Regex(_) => "regex",
            Self::Handle(_) => "handle",
        }
    }
}

impl Clone for OptionValue {
    fn clone(&self) -> Self {
        self.deep_clone()
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            (Self::Handle(a), Self::Handle(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Regex> for OptionValue {
    fn from(value: Regex) -> Self {
        Self::Regex(Arc::new(value))
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(value: Vec<OptionValue>) -> Self {
        Self::List(value)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(value: OptionMap) -> Self {
        Self::Map(value)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
