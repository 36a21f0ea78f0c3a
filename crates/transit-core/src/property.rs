//! Property values carried by graph entities.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single property value. CSV fields are always stored as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Property map of one entity or edge, keyed by property name.
pub type Properties = BTreeMap<String, PropValue>;

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view, used for edge weights.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Int(i) => Some(*i as f64),
            PropValue::Float(f) => Some(*f),
            PropValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => f.write_str(s),
            PropValue::Int(i) => write!(f, "{}", i),
            PropValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<i64> for PropValue {
    fn from(i: i64) -> Self {
        PropValue::Int(i)
    }
}

impl From<f64> for PropValue {
    fn from(f: f64) -> Self {
        PropValue::Float(f)
    }
}

/// Build a property map from `(key, value)` pairs.
pub fn properties<K, V, I>(pairs: I) -> Properties
where
    K: Into<String>,
    V: Into<PropValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Build a property map from fields that may be absent. Absent fields are
/// left out rather than stored empty, so they read as `null` downstream.
pub fn present_properties<'a, I>(pairs: I) -> Properties
where
    I: IntoIterator<Item = (&'a str, &'a Option<String>)>,
{
    pairs
        .into_iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), PropValue::from(v.as_str()))))
        .collect()
}

/// Display name of an entity: `name`, falling back to a bus route number.
pub fn display_name(props: &Properties) -> Option<String> {
    props
        .get("name")
        .or_else(|| props.get("Route Number"))
        .map(|v| v.to_string())
}
