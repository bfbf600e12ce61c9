//! Structured error types shared across the PDF crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PdfError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (offending values, expected sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for grid evaluation, coupling solvers and ensemble statistics.
///
/// Querying a flavor that the grid does not define is deliberately *not* an
/// error: the member facade returns `0.0` for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PdfError {
    /// A kinematic argument lies outside the physically valid domain.
    #[error("range error: {0}")]
    Range(ErrorInfo),
    /// Metadata is missing, has the wrong type, or names an unsupported model.
    #[error("metadata error: {0}")]
    Metadata(ErrorInfo),
    /// A size, length or construction contract was violated by the caller.
    #[error("contract error: {0}")]
    Contract(ErrorInfo),
    /// A requested identifier is not present in an index.
    #[error("lookup error: {0}")]
    Lookup(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PdfError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PdfError::Range(info)
            | PdfError::Metadata(info)
            | PdfError::Contract(info)
            | PdfError::Lookup(info) => info,
        }
    }

    /// Shorthand for a [`PdfError::Range`] with the given code and message.
    pub fn range(code: &str, message: impl Into<String>) -> Self {
        PdfError::Range(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`PdfError::Metadata`] with the given code and message.
    pub fn metadata(code: &str, message: impl Into<String>) -> Self {
        PdfError::Metadata(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`PdfError::Contract`] with the given code and message.
    pub fn contract(code: &str, message: impl Into<String>) -> Self {
        PdfError::Contract(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`PdfError::Lookup`] with the given code and message.
    pub fn lookup(code: &str, message: impl Into<String>) -> Self {
        PdfError::Lookup(ErrorInfo::new(code, message))
    }
}

/// Fails with a contract error unless `actual == expected`.
pub fn ensure_len(code: &str, what: &str, actual: usize, expected: usize) -> Result<(), PdfError> {
    if actual == expected {
        return Ok(());
    }
    Err(PdfError::Contract(
        ErrorInfo::new(code, format!("{what} has length {actual}, expected {expected}"))
            .with_context("actual", actual)
            .with_context("expected", expected),
    ))
}
