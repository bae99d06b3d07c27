//! Record and batch validation.
//!
//! A [`RecordValidator`] applies every field constraint of its schema in
//! order, warns about fields the schema does not know, then runs its business
//! rules once over the whole record.

use super::{BatchSummary, Record, Schema, ValidationOutcome};
use crate::config::ValidatorConfig;
use crate::constraints::{validate_field, BusinessRuleSet, BUSINESS_RULES_FIELD};
use crate::logging::{truncate_field, LogConfig};
use crate::prelude::*;
use crate::{log_batch, log_constraint, perf_debug};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Warning recorded for a field the schema does not declare.
pub const UNEXPECTED_FIELD_WARNING: &str = "Unexpected field not in schema";

/// Validates records against a schema and a business rule set.
///
/// The validator holds no mutable state, so one instance can be shared across
/// threads. [`validate_batch_parallel`](Self::validate_batch_parallel) takes
/// it behind an `Arc` for that reason.
///
/// # Examples
///
/// ```rust
/// use account_guard::core::{Record, RecordValidator, Schema};
/// use account_guard::constraints::BusinessRuleSet;
///
/// # fn main() -> account_guard::prelude::Result<()> {
/// let validator = RecordValidator::builder()
///     .schema(Schema::account_opening())
///     .rules(BusinessRuleSet::extended())
///     .build()?;
///
/// let record = Record::new().with("nickname", "ace");
/// let outcome = validator.validate_record(&record);
///
/// assert!(!outcome.is_valid());
/// assert_eq!(outcome.warnings(), ["nickname: Unexpected field not in schema"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RecordValidator {
    schema: Schema,
    rules: BusinessRuleSet,
    log_config: LogConfig,
    parallelism: usize,
}

impl RecordValidator {
    /// A validator with the standard business rules and default settings.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rules: BusinessRuleSet::standard(),
            log_config: LogConfig::default(),
            parallelism: num_cpus::get(),
        }
    }

    pub fn builder() -> RecordValidatorBuilder {
        RecordValidatorBuilder::default()
    }

    /// Builds a validator from loaded settings.
    pub fn from_config(schema: Schema, config: &ValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            schema,
            rules: config.business_rules.into(),
            log_config: config.logging.clone(),
            parallelism: config.parallelism,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rules(&self) -> &BusinessRuleSet {
        &self.rules
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Validates one record against the current time.
    pub fn validate_record(&self, record: &Record) -> ValidationOutcome {
        self.validate_record_at(record, Utc::now())
    }

    /// Validates one record with `now` as the clock reading for every
    /// time-dependent rule.
    ///
    /// Errors are ordered: field errors in schema order, then business rule
    /// errors in rule order. Unexpected-field warnings are sorted by name.
    #[instrument(level = "debug", skip_all, fields(
        schema.name = %self.schema.name(),
        record.fields = record.len()
    ))]
    pub fn validate_record_at(&self, record: &Record, now: DateTime<Utc>) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();

        for constraint in self.schema.constraints() {
            let field = constraint.field_name();
            let value = record.get(field);
            for violation in validate_field(value, constraint) {
                log_constraint!(
                    self.log_config,
                    field.name = %field,
                    violation.kind = violation.kind(),
                    value.kind = value.map_or("absent", crate::core::Value::kind_name),
                    field.value = %value
                        .map(|v| truncate_field(&v.to_string(), self.log_config.max_field_length))
                        .unwrap_or_default(),
                    "Field constraint violated"
                );
                outcome.add_error(field, violation);
            }
        }

        for field in record.field_names() {
            if !self.schema.contains(field) {
                perf_debug!(self.log_config, field.name = %field, "Unexpected field");
                outcome.add_warning(field, UNEXPECTED_FIELD_WARNING);
            }
        }

        for message in self.rules.evaluate(record, now) {
            log_constraint!(self.log_config, rule.message = %message, "Business rule violated");
            outcome.add_error(BUSINESS_RULES_FIELD, message);
        }

        outcome
    }

    /// Validates every record in order against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::EmptyBatch`] if `records` is empty.
    pub fn validate_batch(&self, records: &[Record]) -> Result<BatchSummary> {
        self.validate_batch_at(records, Utc::now())
    }

    /// Validates every record in order, with `now` as the clock reading for
    /// the whole batch.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::EmptyBatch`] if `records` is empty.
    #[instrument(skip_all, fields(
        schema.name = %self.schema.name(),
        batch.size = records.len()
    ))]
    pub fn validate_batch_at(
        &self,
        records: &[Record],
        now: DateTime<Utc>,
    ) -> Result<BatchSummary> {
        if records.is_empty() {
            warn!("Refusing to validate an empty batch");
            return Err(GuardError::EmptyBatch);
        }

        let start = Instant::now();
        let summary = BatchSummary::from_outcomes(
            records.iter().map(|record| self.validate_record_at(record, now)),
        )?;
        self.log_summary(&summary, start);
        Ok(summary)
    }

    /// Validates a batch on the blocking thread pool against the current time.
    ///
    /// # Errors
    ///
    /// See [`validate_batch_parallel_at`](Self::validate_batch_parallel_at).
    pub async fn validate_batch_parallel(
        self: &Arc<Self>,
        records: Vec<Record>,
    ) -> Result<BatchSummary> {
        self.validate_batch_parallel_at(records, Utc::now()).await
    }

    /// Validates a batch on the blocking thread pool, with `now` as the clock
    /// reading for every record.
    ///
    /// The batch is split into at most [`parallelism`](Self::parallelism)
    /// contiguous chunks. Per-record outcomes come back in input order, so
    /// the summary matches what [`validate_batch_at`](Self::validate_batch_at)
    /// returns for the same input.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::EmptyBatch`] for an empty batch and
    /// [`GuardError::Internal`] if a worker task panics.
    #[instrument(skip_all, fields(
        schema.name = %self.schema.name(),
        batch.size = records.len(),
        batch.parallelism = self.parallelism
    ))]
    pub async fn validate_batch_parallel_at(
        self: &Arc<Self>,
        records: Vec<Record>,
        now: DateTime<Utc>,
    ) -> Result<BatchSummary> {
        if records.is_empty() {
            warn!("Refusing to validate an empty batch");
            return Err(GuardError::EmptyBatch);
        }

        let start = Instant::now();
        let chunk_size = records.len().div_ceil(self.parallelism.max(1));

        let mut remaining = records.into_iter();
        let mut tasks = Vec::new();
        loop {
            let chunk: Vec<Record> = remaining.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let validator = Arc::clone(self);
            tasks.push(tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .map(|record| validator.validate_record_at(record, now))
                    .collect::<Vec<_>>()
            }));
        }
        debug!(chunks = tasks.len(), chunk.size = chunk_size, "Dispatched validation chunks");

        let chunks = futures::future::try_join_all(tasks)
            .await
            .map_err(|e| GuardError::internal(format!("validation task failed: {e}")))?;

        let summary = BatchSummary::from_outcomes(chunks.into_iter().flatten())?;
        self.log_summary(&summary, start);
        Ok(summary)
    }

    fn log_summary(&self, summary: &BatchSummary, start: Instant) {
        log_batch!(
            self.log_config,
            batch.total = summary.total_records(),
            batch.valid = summary.valid_records(),
            batch.invalid = summary.invalid_records(),
            batch.errors = summary.total_errors(),
            batch.warnings = summary.total_warnings(),
            batch.validation_rate = summary.validation_rate(),
            batch.elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch validation completed"
        );
    }
}

/// Builder for [`RecordValidator`].
#[derive(Debug, Clone)]
pub struct RecordValidatorBuilder {
    schema: Option<Schema>,
    rules: BusinessRuleSet,
    log_config: LogConfig,
    parallelism: usize,
}

impl Default for RecordValidatorBuilder {
    fn default() -> Self {
        Self {
            schema: None,
            rules: BusinessRuleSet::standard(),
            log_config: LogConfig::default(),
            parallelism: num_cpus::get(),
        }
    }
}

impl RecordValidatorBuilder {
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Replaces the business rules. Defaults to [`BusinessRuleSet::standard`].
    pub fn rules(mut self, rules: BusinessRuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Chunk count for [`RecordValidator::validate_batch_parallel`].
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// # Errors
    ///
    /// Fails if no schema was given or `parallelism` is zero.
    pub fn build(self) -> Result<RecordValidator> {
        let schema = self
            .schema
            .ok_or_else(|| GuardError::configuration("validator requires a schema"))?;
        if self.parallelism == 0 {
            return Err(GuardError::configuration("parallelism must be at least 1"));
        }
        Ok(RecordValidator {
            schema,
            rules: self.rules,
            log_config: self.log_config,
            parallelism: self.parallelism,
        })
    }
}
