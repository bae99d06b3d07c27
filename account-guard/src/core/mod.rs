//! Core types for record validation.
//!
//! - [`Value`] and [`Record`]: the dynamic data being checked
//! - [`FieldConstraint`]: declarative rules for one field
//! - [`Schema`]: the ordered set of field constraints for a record shape
//! - [`RecordValidator`]: applies a schema and business rules to records
//! - [`ValidationOutcome`] and [`BatchSummary`]: what validation reports
//!
//! ## Example
//!
//! ```rust
//! use account_guard::core::{Record, RecordValidator, Schema};
//!
//! let validator = RecordValidator::new(Schema::account_opening());
//! let outcome = validator.validate_record(&Record::new());
//!
//! assert!(!outcome.is_valid());
//! assert!(outcome.errors().iter().any(|e| e.starts_with("user_id:")));
//! ```

mod constraint;
mod result;
mod schema;
mod validator;
mod value;

pub use constraint::{
    AllowedValues, ConstraintDescriptor, FieldConstraint, FieldConstraintBuilder, FieldPattern,
    FieldType, MAX_PATTERN_LENGTH,
};
pub use result::{BatchSummary, RecordOutcome, ValidationOutcome};
pub use schema::{Schema, SchemaBuilder, SchemaDocument};
pub use validator::{RecordValidator, RecordValidatorBuilder, UNEXPECTED_FIELD_WARNING};
pub use value::{Record, Value};
