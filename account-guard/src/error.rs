//! Error types for account-guard.
//!
//! Field-level and business-rule problems are never surfaced through
//! [`GuardError`]; they are collected into a
//! [`ValidationOutcome`](crate::core::ValidationOutcome). The variants here
//! cover batch preconditions and configuration mistakes, which are returned to
//! the caller immediately.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors that abort an operation instead of being recorded on an outcome.
#[derive(Error, Debug)]
pub enum GuardError {
    /// A batch validation was requested with no records.
    #[error("Empty batch provided")]
    EmptyBatch,

    /// A schema, constraint or validator setting is inconsistent.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A constraint pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The fraud pattern name is not in the parameter tables.
    #[error("Unknown fraud pattern: {0}")]
    UnknownFraudPattern(String),

    /// The parameter path is not configured for the fraud pattern.
    #[error("Parameter {path} not defined for pattern {pattern}")]
    UnknownParameter { pattern: String, path: String },

    /// The dotted parameter path does not resolve in the parameter tables.
    #[error("Parameter path {0} not found")]
    ParameterPathNotFound(String),

    /// The difficulty tier name is not recognized.
    #[error("Unknown difficulty tier: {0}")]
    UnknownTier(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure, such as a panicked worker task.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GuardError {
    /// Creates a configuration error with the given message.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for errors caused by schema or lookup misconfiguration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::InvalidPattern { .. }
                | Self::UnknownFraudPattern(_)
                | Self::UnknownParameter { .. }
                | Self::ParameterPathNotFound(_)
                | Self::UnknownTier(_)
        )
    }
}

/// Extension trait for attaching a configuration context to fallible calls.
///
/// ```rust
/// use account_guard::prelude::*;
///
/// let parsed: Result<serde_json::Value> =
///     serde_json::from_str::<serde_json::Value>("{").context("loading schema");
/// assert!(parsed.unwrap_err().to_string().contains("loading schema"));
/// ```
pub trait ErrorContext<T> {
    /// Wraps the error as [`GuardError::Configuration`] prefixed with `context`.
    fn context(self, context: impl AsRef<str>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, context: impl AsRef<str>) -> Result<T> {
        self.map_err(|e| GuardError::Configuration(format!("{}: {e}", context.as_ref())))
    }
}
