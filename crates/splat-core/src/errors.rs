//! Structured error types shared across SPLAT crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SplatError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (design, script, iteration, paths).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the SPLAT engine.
///
/// Failures are contained to the smallest unit that makes sense: one
/// iteration, one script, or one design instance. None of these variants
/// should abort a whole campaign on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SplatError {
    /// A seed artifact, library, or script file is absent.
    #[error("missing file: {0}")]
    MissingFile(ErrorInfo),
    /// The external synthesis/timing tool reported a non-zero status.
    #[error("tool error: {0}")]
    Tool(ErrorInfo),
    /// The tool's summary line is absent or unparsable.
    #[error("metric format error: {0}")]
    MetricFormat(ErrorInfo),
    /// Script catalog construction or validation errors.
    #[error("catalog error: {0}")]
    Catalog(ErrorInfo),
    /// Results table persistence errors (CSV, filesystem).
    #[error("registry error: {0}")]
    Registry(ErrorInfo),
    /// A campaign instance produced no output artifact.
    #[error("empty instance: {0}")]
    EmptyInstance(ErrorInfo),
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

impl SplatError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SplatError::MissingFile(info)
            | SplatError::Tool(info)
            | SplatError::MetricFormat(info)
            | SplatError::Catalog(info)
            | SplatError::Registry(info)
            | SplatError::EmptyInstance(info) => info,
        }
    }
}
