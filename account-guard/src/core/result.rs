//! Validation outcomes for single records and batches.

use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// The result of validating one record.
///
/// Entries are formatted as `"field: message"`. Once an error is added the
/// outcome stays invalid.
///
/// # Examples
///
/// ```rust
/// use account_guard::core::ValidationOutcome;
///
/// let mut outcome = ValidationOutcome::new();
/// outcome.add_warning("nickname", "Unexpected field not in schema");
/// assert!(outcome.is_valid());
///
/// outcome.add_error("email", "Required field is missing");
/// assert!(!outcome.is_valid());
/// assert_eq!(outcome.errors(), ["email: Required field is missing"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Default for ValidationOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationOutcome {
    /// A valid outcome with no entries.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: impl std::fmt::Display) {
        self.errors.push(format!("{field}: {message}"));
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, field: &str, message: impl std::fmt::Display) {
        self.warnings.push(format!("{field}: {message}"));
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Error messages recorded under `field`, without the field prefix.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors.iter().filter_map(move |entry| {
            entry
                .strip_prefix(field)
                .and_then(|rest| rest.strip_prefix(": "))
        })
    }
}

/// One record's outcome inside a [`BatchSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Position of the record in the input batch.
    pub index: usize,
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RecordOutcome {
    pub fn new(index: usize, outcome: ValidationOutcome) -> Self {
        Self {
            index,
            is_valid: outcome.is_valid,
            errors: outcome.errors,
            warnings: outcome.warnings,
        }
    }
}

/// Aggregate statistics over a validated batch.
///
/// Only constructible from a non-empty sequence of outcomes, so
/// `validation_rate` is always defined and
/// `valid_records + invalid_records == total_records`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    total_errors: usize,
    total_warnings: usize,
    validation_rate: f64,
    per_record: Vec<RecordOutcome>,
}

impl BatchSummary {
    /// Folds outcomes, in input order, into a summary.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::EmptyBatch`] if `outcomes` is empty.
    pub fn from_outcomes<I>(outcomes: I) -> Result<Self>
    where
        I: IntoIterator<Item = ValidationOutcome>,
    {
        let per_record: Vec<RecordOutcome> = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| RecordOutcome::new(index, outcome))
            .collect();

        if per_record.is_empty() {
            return Err(GuardError::EmptyBatch);
        }

        let total_records = per_record.len();
        let valid_records = per_record.iter().filter(|r| r.is_valid).count();
        let total_errors = per_record.iter().map(|r| r.errors.len()).sum();
        let total_warnings = per_record.iter().map(|r| r.warnings.len()).sum();

        Ok(Self {
            total_records,
            valid_records,
            invalid_records: total_records - valid_records,
            total_errors,
            total_warnings,
            validation_rate: valid_records as f64 / total_records as f64,
            per_record,
        })
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn valid_records(&self) -> usize {
        self.valid_records
    }

    pub fn invalid_records(&self) -> usize {
        self.invalid_records
    }

    pub fn total_errors(&self) -> usize {
        self.total_errors
    }

    pub fn total_warnings(&self) -> usize {
        self.total_warnings
    }

    /// Fraction of valid records, in `[0, 1]`.
    pub fn validation_rate(&self) -> f64 {
        self.validation_rate
    }

    /// Fraction of invalid records, in `[0, 1]`.
    pub fn error_rate(&self) -> f64 {
        1.0 - self.validation_rate
    }

    pub fn per_record(&self) -> &[RecordOutcome] {
        &self.per_record
    }

    pub fn invalid_indices(&self) -> Vec<usize> {
        self.per_record
            .iter()
            .filter(|r| !r.is_valid)
            .map(|r| r.index)
            .collect()
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_records == 0
    }
}
