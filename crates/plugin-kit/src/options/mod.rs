//! Option merging and cloning
//!
//! Plugins usually accept a loosely shaped options object from the site
//! configuration and need to fill in defaults. [`merge`] does that with one
//! rule: the result has exactly the keys of the defaults. Keys that only exist
//! in the overrides are dropped, never copied.
//!
//! ```ignore
//! use plugin_kit::options::{self, OptionMap};
//!
//! let defaults = options::from_yaml_str("layout: page.hbs\ndraft: false")?;
//! let overrides = options::from_yaml_str("draft: true\ntypo: 1")?;
//! let effective = options::merge(&defaults, &overrides);
//! // effective == { layout: "page.hbs", draft: true }
//! ```

mod value;

pub use value::{OptionMap, OptionValue};

use tracing::trace;

use crate::error::{PluginError, Result};

/// Merge `overrides` onto `defaults`
///
/// The result contains exactly the keys of `defaults`, in their order. Each
/// key takes a deep clone of the override's value when the override defines
/// it, otherwise a deep clone of the default.
pub fn merge(defaults: &OptionMap, overrides: &OptionMap) -> OptionMap {
    let dropped: Vec<&String> = overrides
        .keys()
        .filter(|key| !defaults.contains_key(*key))
        .collect();
    if !dropped.is_empty() {
        trace!(dropped = ?dropped, "Ignoring unrecognized options");
    }

    defaults
        .iter()
        .map(|(key, default)| {
            let value = overrides.get(key).unwrap_or(default);
            (key.clone(), value.deep_clone())
        })
        .collect()
}

/// Structural copy of an option value
///
/// Maps and lists are copied at every level. Regular expressions and handles
/// are returned shared.
pub fn clone_value(value: &OptionValue) -> OptionValue {
    value.deep_clone()
}

/// Parse a JSON object into an option map
///
/// `null` and an empty document yield an empty map; any other non-object
/// document is rejected.
pub fn from_json_str(text: &str) -> Result<OptionMap> {
    if text.trim().is_empty() {
        return Ok(OptionMap::new());
    }
    let value: serde_json::Value = serde_json::from_str(text)?;
    into_map(value)
}

/// Parse a YAML mapping into an option map
///
/// `null` and an empty document yield an empty map; any other non-mapping
/// document is rejected.
pub fn from_yaml_str(text: &str) -> Result<OptionMap> {
    if text.trim().is_empty() {
        return Ok(OptionMap::new());
    }
    let value: serde_json::Value = serde_yaml::from_str(text)?;
    into_map(value)
}

fn into_map(value: serde_json::Value) -> Result<OptionMap> {
    match OptionValue::from(value) {
        OptionValue::Map(map) => Ok(map),
        OptionValue::Null => Ok(OptionMap::new()),
        other => Err(PluginError::invalid_option(
            "<root>",
            format!("expected a mapping, found {}", other.kind()),
        )),
    }
}

/// Read a boolean option, treating a missing key or `null` as `default`
pub(crate) fn bool_option(map: &OptionMap, key: &str, default: bool) -> Result<bool> {
    match map.get(key) {
        None | Some(OptionValue::Null) => Ok(default),
        Some(OptionValue::Bool(b)) => Ok(*b),
        Some(other) => Err(PluginError::invalid_option(
            key,
            format!("expected a boolean, found {}", other.kind()),
        )),
    }
}
