//! Structured logging context
//!
//! This module provides:
//! - `FieldValue`: typed value of a key/value pair
//! - `KeyValues`: ordered, non-deduplicated key/value pairs
//! - `LoggerContext`: immutable name + bound pairs carried by a logger handle

use serde::Serialize;
use std::fmt;

/// Placeholder value given to an unpaired trailing key
pub const MISSING_VALUE: &str = "(MISSING)";

/// Separator used to join hierarchical logger names
pub const NAME_SEPARATOR: &str = ".";

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Maps, sequences and structs, kept in their serialized form
    Structured(serde_json::Value),
    Null,
}

impl FieldValue {
    /// Capture any serializable value (maps, slices, structs...)
    ///
    /// Values that cannot be serialized are replaced with a marker string;
    /// building a record never fails.
    ///
    /// ```
    /// use rust_contextual_logger::FieldValue;
    /// use std::collections::BTreeMap;
    ///
    /// let map: BTreeMap<&str, i32> = [("k", 1)].into_iter().collect();
    /// assert_eq!(FieldValue::structured(&map).to_string(), r#"{"k":1}"#);
    /// ```
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => json.into(),
            Err(e) => FieldValue::String(format!("<unserializable: {}>", e)),
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Uint(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Structured(v) => v.clone(),
            FieldValue::Null => serde_json::Value::Null,
        }
    }

    /// Render for the text format: strings are quoted only when needed
    pub fn render_text(&self) -> String {
        match self {
            FieldValue::String(s) => escape_text(s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Structured(v) => write!(f, "{}", v),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::Uint(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::Uint(u)
                } else {
                    n.as_f64()
                        .map(FieldValue::Float)
                        .unwrap_or(FieldValue::Null)
                }
            }
            composite => FieldValue::Structured(composite),
        }
    }
}

/// Quote and escape a key or string value if it would not survive as a
/// single bare `key=value` token.
pub(crate) fn escape_text(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=');

    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Ordered key/value pairs
///
/// Insertion order is kept and duplicate keys are not merged: a key set twice
/// is rendered twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValues {
    pairs: Vec<(String, FieldValue)>,
}

impl KeyValues {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a pair, keeping any earlier pair with the same key
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Build from a flat alternating `key, value, key, value...` list.
    ///
    /// Non-string keys are rendered with `Display`. An unpaired trailing key
    /// is kept and given [`MISSING_VALUE`].
    ///
    /// ```
    /// use rust_contextual_logger::{FieldValue, KeyValues};
    ///
    /// let kvs = KeyValues::from_flat(vec![FieldValue::from("World")]);
    /// assert_eq!(kvs.format_fields(), "World=(MISSING)");
    /// ```
    pub fn from_flat<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        let mut pairs = Vec::new();
        let mut items = items.into_iter().map(Into::into);
        while let Some(key) = items.next() {
            let key = match key {
                FieldValue::String(s) => s,
                other => other.to_string(),
            };
            let value = items
                .next()
                .unwrap_or_else(|| FieldValue::String(MISSING_VALUE.to_string()));
            pairs.push((key, value));
        }
        Self { pairs }
    }

    /// Strict variant of [`KeyValues::from_flat`]: an odd element count is
    /// rejected with [`LoggerError::OddKeyValues`](crate::LoggerError).
    pub fn try_from_flat<I>(items: I) -> crate::core::Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        let items: Vec<FieldValue> = items.into_iter().map(Into::into).collect();
        if items.len() % 2 != 0 {
            return Err(crate::core::LoggerError::odd_key_values(items.len()));
        }
        Ok(Self::from_flat(items))
    }

    /// New list holding `self` followed by `other`
    pub fn chained(&self, other: &KeyValues) -> KeyValues {
        let mut pairs = Vec::with_capacity(self.pairs.len() + other.pairs.len());
        pairs.extend(self.pairs.iter().cloned());
        pairs.extend(other.pairs.iter().cloned());
        KeyValues { pairs }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Format pairs as space separated `key=value` tokens
    pub fn format_fields(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", escape_text(k), v.render_text()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for KeyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

/// No call-site pairs
impl From<()> for KeyValues {
    fn from(_: ()) -> Self {
        KeyValues::new()
    }
}

impl<K, V> From<Vec<(K, V)>> for KeyValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for KeyValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for KeyValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Immutable context carried by a logger handle
///
/// Derivation (`with_name`, `with_values`) returns a new context; the
/// receiver is never modified.
///
/// # Example
///
/// ```
/// use rust_contextual_logger::core::LoggerContext;
/// use rust_contextual_logger::KeyValues;
///
/// let root = LoggerContext::new();
/// let child = root
///     .with_name("controller")
///     .with_name("reconciler")
///     .with_values(&KeyValues::new().with("pod", "192.168.0.1"));
///
/// assert_eq!(child.name().as_deref(), Some("controller.reconciler"));
/// assert_eq!(child.values().len(), 1);
/// assert!(root.name().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerContext {
    names: Vec<String>,
    values: KeyValues,
}

impl LoggerContext {
    /// Create the root context: no name, no pairs
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with `segment` appended to the name; empty segments are ignored
    #[must_use]
    pub fn with_name(&self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        let mut names = self.names.clone();
        if !segment.is_empty() {
            names.push(segment);
        }
        Self {
            names,
            values: self.values.clone(),
        }
    }

    /// Context with `values` appended after the bound pairs
    #[must_use]
    pub fn with_values(&self, values: &KeyValues) -> Self {
        Self {
            names: self.names.clone(),
            values: self.values.chained(values),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Joined hierarchical name, `None` for an unnamed logger
    pub fn name(&self) -> Option<String> {
        if self.names.is_empty() {
            None
        } else {
            Some(self.names.join(NAME_SEPARATOR))
        }
    }

    pub fn values(&self) -> &KeyValues {
        &self.values
    }
}
