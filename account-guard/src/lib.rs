//! # account-guard - Record Validation for Synthetic Fraud Data
//!
//! account-guard checks simulated account-opening records against a
//! declarative schema of per-field constraints and a set of cross-field
//! business rules, then aggregates the results over batches. It is meant to
//! gate synthetic fraud-detection training data before it is used.
//!
//! ## Quick Start
//!
//! ```rust
//! use account_guard::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<()> {
//! let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
//! let validator = RecordValidator::new(Schema::account_opening());
//!
//! let record = Record::from_json_str(r#"{
//!     "user_id": "550e8400-e29b-41d4-a716-446655440000",
//!     "email": "user@test.com",
//!     "first_name": "Jane",
//!     "last_name": "Roe",
//!     "address": "742 Evergreen Terrace, Springfield",
//!     "ip_address": "10.0.0.8",
//!     "device_fingerprint": "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4",
//!     "timestamp": "2025-08-17T10:30:00Z",
//!     "account_type": "personal",
//!     "is_fraud": false
//! }"#)?;
//!
//! let outcome = validator.validate_record_at(&record, now);
//! assert!(!outcome.is_valid());
//! assert_eq!(
//!     outcome.errors(),
//!     ["business_rules: Business rule violation: suspicious email domain 'test.com'"]
//! );
//!
//! let summary = validator.validate_batch_at(&[record, Record::new()], now)?;
//! assert_eq!(summary.invalid_records(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## How a record is checked
//!
//! 1. Every [`FieldConstraint`](core::FieldConstraint) in the schema runs in
//!    order. A value of the wrong type reports one type error and nothing
//!    else. Otherwise length, range, pattern and allowed-value checks all run.
//! 2. Fields the schema does not declare become warnings. They never make a
//!    record invalid.
//! 3. The [`BusinessRuleSet`](constraints::BusinessRuleSet) runs once over the
//!    whole record. Violations are reported under `business_rules`.
//!
//! Batches fold per-record outcomes into a [`BatchSummary`](core::BatchSummary).
//! [`RecordValidator::validate_batch_parallel`](core::RecordValidator::validate_batch_parallel)
//! spreads a batch over tokio's blocking pool and returns the same summary.
//!
//! ## Architecture
//!
//! - **`core`**: values, records, constraints, schemas, the validator and its outcomes
//! - **`constraints`**: type classification, field validation and business rules
//! - **`params`**: fraud-pattern parameter tables for record generators
//! - **`config`**: validator settings loaded from JSON
//! - **`formatters`**: JSON, console and Markdown batch reports
//! - **`logging`**: log configuration and subscriber setup

pub mod config;
pub mod constraints;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod params;
pub mod prelude;
