//! Single-field validation: applies one [`FieldConstraint`] to one value.

use super::datatype::conforms;
use crate::core::{AllowedValues, FieldConstraint, FieldType, Value};
use std::fmt;

/// One way a field value can fail its constraint.
///
/// `Display` renders the message recorded on the validation outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldViolation {
    /// A required field is absent or null.
    Missing,
    /// The value does not have the declared shape.
    TypeMismatch { expected: FieldType },
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    /// `kind` is the field's declared type, which decides how the bound prints.
    TooSmall { min: f64, actual: f64, kind: FieldType },
    TooLarge { max: f64, actual: f64, kind: FieldType },
    PatternMismatch { pattern: String },
    NotAllowed { allowed: AllowedValues },
}

impl FieldViolation {
    /// Stable short name for the violation kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldViolation::Missing => "missing",
            FieldViolation::TypeMismatch { .. } => "type_mismatch",
            FieldViolation::TooShort { .. } | FieldViolation::TooLong { .. } => "length",
            FieldViolation::TooSmall { .. } | FieldViolation::TooLarge { .. } => "range",
            FieldViolation::PatternMismatch { .. } => "pattern",
            FieldViolation::NotAllowed { .. } => "allowed_values",
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::Missing => write!(f, "Required field is missing"),
            FieldViolation::TypeMismatch { expected } => {
                write!(f, "Invalid type. Expected {expected}")
            }
            FieldViolation::TooShort { min, .. } => write!(f, "Too short. Minimum length: {min}"),
            FieldViolation::TooLong { max, .. } => write!(f, "Too long. Maximum length: {max}"),
            FieldViolation::TooSmall { min, kind, .. } => {
                write!(f, "Value too small. Minimum: {}", Bound(*min, *kind))
            }
            FieldViolation::TooLarge { max, kind, .. } => {
                write!(f, "Value too large. Maximum: {}", Bound(*max, *kind))
            }
            FieldViolation::PatternMismatch { pattern } => {
                write!(f, "Does not match required pattern: {pattern}")
            }
            FieldViolation::NotAllowed { allowed } => write!(f, "Invalid value. Allowed: {allowed}"),
        }
    }
}

/// A numeric bound as it appears in messages. Bounds on real fields keep
/// their decimal point (`1.0`); integer bounds print bare (`1000`).
struct Bound(f64, FieldType);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            FieldType::Real => write!(f, "{:?}", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Validates one value against its constraint.
///
/// An absent or null value yields at most a [`FieldViolation::Missing`]. A
/// value of the wrong type yields a single [`FieldViolation::TypeMismatch`]
/// and nothing else. Past the type gate, length, range, pattern and allowed
/// value checks all run, so several violations can be reported at once.
pub fn validate_field(value: Option<&Value>, constraint: &FieldConstraint) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    let value = match value {
        Some(value) if !value.is_null() => value,
        _ => {
            if constraint.is_required() {
                violations.push(FieldViolation::Missing);
            }
            return violations;
        }
    };

    let kind = constraint.field_type();
    if !conforms(value, kind) {
        violations.push(FieldViolation::TypeMismatch { expected: kind });
        return violations;
    }

    if kind.supports_length() {
        if let Value::Text(text) = value {
            let length = text.chars().count();
            if let Some(min) = constraint.min_length() {
                if length < min {
                    violations.push(FieldViolation::TooShort {
                        min,
                        actual: length,
                    });
                }
            }
            if let Some(max) = constraint.max_length() {
                if length > max {
                    violations.push(FieldViolation::TooLong {
                        max,
                        actual: length,
                    });
                }
            }
        }
    }

    if kind.is_numeric() {
        if let Some(number) = value.as_f64() {
            if let Some(min) = constraint.min_value() {
                if number < min {
                    violations.push(FieldViolation::TooSmall {
                        min,
                        actual: number,
                        kind,
                    });
                }
            }
            if let Some(max) = constraint.max_value() {
                if number > max {
                    violations.push(FieldViolation::TooLarge {
                        max,
                        actual: number,
                        kind,
                    });
                }
            }
        }
    }

    if let (Some(pattern), Value::Text(text)) = (constraint.pattern(), value) {
        if !pattern.is_match(text) {
            violations.push(FieldViolation::PatternMismatch {
                pattern: pattern.as_str().to_string(),
            });
        }
    }

    if let Some(allowed) = constraint.allowed_values() {
        if !allowed.contains(value) {
            violations.push(FieldViolation::NotAllowed {
                allowed: allowed.clone(),
            });
        }
    }

    violations
}
