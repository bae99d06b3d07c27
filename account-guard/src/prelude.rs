//! Prelude for commonly used types and traits in account-guard.

pub use crate::config::ValidatorConfig;
pub use crate::constraints::{BusinessRule, BusinessRuleSet, RuleSetKind};
pub use crate::core::{
    BatchSummary, FieldConstraint, FieldType, Record, RecordValidator, Schema, ValidationOutcome,
    Value,
};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
