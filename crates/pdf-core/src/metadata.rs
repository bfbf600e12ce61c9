//! Typed key/value metadata accessor consumed by the solver factory and the member facade.
//!
//! Loading metadata from disk is not handled here. Embedders implement
//! [`Metadata`] over whatever store they already have; [`MetadataMap`] is the
//! in-memory implementation used by tests and by callers that hold the YAML
//! text of a set header.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, PdfError};

/// A single metadata entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Boolean flag.
    Flag(bool),
    /// Numeric scalar. Integers are stored as exact `f64` values.
    Number(f64),
    /// Free-form text.
    Text(String),
    /// Homogeneous or mixed list.
    List(Vec<MetaValue>),
}

impl MetaValue {
    fn kind(&self) -> &'static str {
        match self {
            MetaValue::Flag(_) => "flag",
            MetaValue::Number(_) => "number",
            MetaValue::Text(_) => "text",
            MetaValue::List(_) => "list",
        }
    }
}

fn type_error(key: &str, expected: &str, found: &MetaValue) -> PdfError {
    PdfError::Metadata(
        ErrorInfo::new("metadata-type", format!("metadata key '{key}' is not a {expected}"))
            .with_context("key", key)
            .with_context("found", found.kind()),
    )
}

fn missing_error(key: &str) -> PdfError {
    PdfError::Metadata(
        ErrorInfo::new("metadata-missing", format!("metadata key '{key}' is not set"))
            .with_context("key", key),
    )
}

fn as_f64(key: &str, value: &MetaValue) -> Result<f64, PdfError> {
    match value {
        MetaValue::Number(number) => Ok(*number),
        // Numbers quoted in hand-written headers are still accepted.
        MetaValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| type_error(key, "number", value)),
        other => Err(type_error(key, "number", other)),
    }
}

fn as_i64(key: &str, value: &MetaValue) -> Result<i64, PdfError> {
    let number = as_f64(key, value)?;
    if number.fract() != 0.0 || !number.is_finite() {
        return Err(type_error(key, "integer", value));
    }
    Ok(number as i64)
}

/// Typed lookups by string key.
pub trait Metadata {
    /// Returns the raw entry stored under `key`.
    fn lookup(&self, key: &str) -> Option<MetaValue>;

    /// Whether `key` is present.
    fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Required floating point entry.
    fn get_f64(&self, key: &str) -> Result<f64, PdfError> {
        let value = self.lookup(key).ok_or_else(|| missing_error(key))?;
        as_f64(key, &value)
    }

    /// Optional floating point entry; present but mistyped entries still fail.
    fn opt_f64(&self, key: &str) -> Result<Option<f64>, PdfError> {
        self.lookup(key).map(|value| as_f64(key, &value)).transpose()
    }

    /// Required integer entry.
    fn get_i64(&self, key: &str) -> Result<i64, PdfError> {
        let value = self.lookup(key).ok_or_else(|| missing_error(key))?;
        as_i64(key, &value)
    }

    /// Optional integer entry.
    fn opt_i64(&self, key: &str) -> Result<Option<i64>, PdfError> {
        self.lookup(key).map(|value| as_i64(key, &value)).transpose()
    }

    /// Required text entry.
    fn get_string(&self, key: &str) -> Result<String, PdfError> {
        match self.lookup(key).ok_or_else(|| missing_error(key))? {
            MetaValue::Text(text) => Ok(text),
            MetaValue::Number(number) => Ok(number.to_string()),
            other => Err(type_error(key, "text", &other)),
        }
    }

    /// Required list of floating point values.
    fn get_f64_list(&self, key: &str) -> Result<Vec<f64>, PdfError> {
        match self.lookup(key).ok_or_else(|| missing_error(key))? {
            MetaValue::List(items) => items.iter().map(|item| as_f64(key, item)).collect(),
            other => Err(type_error(key, "list", &other)),
        }
    }

    /// Required list of integers.
    fn get_i64_list(&self, key: &str) -> Result<Vec<i64>, PdfError> {
        match self.lookup(key).ok_or_else(|| missing_error(key))? {
            MetaValue::List(items) => items.iter().map(|item| as_i64(key, item)).collect(),
            other => Err(type_error(key, "list", &other)),
        }
    }
}

/// In-memory metadata store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataMap {
    entries: BTreeMap<String, MetaValue>,
}

impl MetadataMap {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML mapping such as a set header.
    pub fn from_yaml_str(text: &str) -> Result<Self, PdfError> {
        serde_yaml::from_str(text)
            .map_err(|err| PdfError::Metadata(ErrorInfo::new("yaml-deserialize", err.to_string())))
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        self.entries.insert(key.into(), value)
    }

    /// Builder-style numeric insert.
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, MetaValue::Number(value));
        self
    }

    /// Builder-style text insert.
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, MetaValue::Text(value.into()));
        self
    }

    /// Builder-style numeric list insert.
    pub fn with_list(mut self, key: impl Into<String>, values: &[f64]) -> Self {
        let items = values.iter().copied().map(MetaValue::Number).collect();
        self.insert(key, MetaValue::List(items));
        self
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Metadata for MetadataMap {
    fn lookup(&self, key: &str) -> Option<MetaValue> {
        self.entries.get(key).cloned()
    }

    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
