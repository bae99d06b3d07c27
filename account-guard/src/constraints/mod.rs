//! Built-in checks applied to records.
//!
//! Validation runs in two layers:
//!
//! 1. **Field checks**: each [`FieldConstraint`](crate::core::FieldConstraint)
//!    is applied to the value under its field name by [`validate_field`]. The
//!    type gate comes from [`conforms`]. Length, range, pattern and allowed
//!    value checks only run on values that pass it.
//! 2. **Business rules**: a [`BusinessRuleSet`] inspects the record as a whole
//!    for cross-field consistency. Rules skip fields that are absent or of the
//!    wrong shape.
//!
//! ## Usage
//!
//! ```rust
//! use account_guard::constraints::{validate_field, BusinessRuleSet, FieldViolation};
//! use account_guard::core::{FieldConstraint, FieldType, Record};
//! use chrono::Utc;
//!
//! # fn main() -> account_guard::prelude::Result<()> {
//! let score = FieldConstraint::builder("fraud_score", FieldType::Real)
//!     .value_between(0.0, 1.0)
//!     .build()?;
//!
//! let record = Record::new().with("fraud_score", 0.2).with("is_fraud", true);
//!
//! assert!(validate_field(record.get("fraud_score"), &score).is_empty());
//! assert_eq!(
//!     BusinessRuleSet::standard().evaluate(&record, Utc::now()).len(),
//!     1
//! );
//! assert_eq!(
//!     validate_field(None, &score),
//!     vec![FieldViolation::Missing]
//! );
//! # Ok(())
//! # }
//! ```

mod business;
mod datatype;
pub(crate) mod field;
mod patterns;

pub use business::{
    email_domain, timestamp_age, BusinessRule, BusinessRuleSet, DisposableEmail,
    EmailDomainDenylist, EmailLooksPersonal, FraudScoreConsistency, MinimumAge,
    PhoneCountryMatch, PlaceholderAddress, PlaceholderName, RegistrationFloor, RuleContext,
    RuleSetKind, TimestampPlausibility, VelocityMonotonicity, BUSINESS_RULES_FIELD,
    FRAUD_SCORE_FLOOR, LEGIT_SCORE_CEILING, MAX_TIMESTAMP_AGE_DAYS,
};
pub use datatype::{conforms, parse_timestamp, timestamp_of};
pub use field::{validate_field, FieldViolation};
