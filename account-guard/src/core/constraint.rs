//! Field constraints: the declarative description of one field's shape.

use crate::constraints::field::{validate_field, FieldViolation};
use crate::core::Value;
use crate::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest pattern accepted in a constraint definition.
pub const MAX_PATTERN_LENGTH: usize = 1000;

/// The closed set of recognized field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[serde(alias = "string")]
    Text,
    Integer,
    #[serde(alias = "float")]
    Real,
    Boolean,
    Email,
    Phone,
    /// UUID-shaped identifier.
    #[serde(alias = "uuid")]
    Identifier,
    Timestamp,
    IpAddress,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Integer,
        FieldType::Real,
        FieldType::Boolean,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Identifier,
        FieldType::Timestamp,
        FieldType::IpAddress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Boolean => "boolean",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Identifier => "identifier",
            FieldType::Timestamp => "timestamp",
            FieldType::IpAddress => "ip_address",
        }
    }

    /// Kinds whose `min_length`/`max_length` bounds are checked.
    pub fn supports_length(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Email | FieldType::Phone)
    }

    /// Kinds whose `min_value`/`max_value` bounds are checked.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Real)
    }

    /// Kinds whose conforming values are always text.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Email
                | FieldType::Phone
                | FieldType::Identifier
                | FieldType::IpAddress
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" | "string" => Ok(FieldType::Text),
            "integer" => Ok(FieldType::Integer),
            "real" | "float" => Ok(FieldType::Real),
            "boolean" => Ok(FieldType::Boolean),
            "email" => Ok(FieldType::Email),
            "phone" => Ok(FieldType::Phone),
            "identifier" | "uuid" => Ok(FieldType::Identifier),
            "timestamp" => Ok(FieldType::Timestamp),
            "ip_address" => Ok(FieldType::IpAddress),
            other => Err(GuardError::configuration(format!(
                "unknown field type '{other}'"
            ))),
        }
    }
}

/// The set of values a field may take, typed to match the field kind.
///
/// Duplicates are dropped on construction and first-seen order is kept so
/// error messages list the values the way they were configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValues {
    Boolean(Vec<bool>),
    Integer(Vec<i64>),
    Real(Vec<f64>),
    Text(Vec<String>),
}

impl AllowedValues {
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Text(dedup(values.into_iter().map(Into::into)))
    }

    pub fn integers(values: impl IntoIterator<Item = i64>) -> Self {
        Self::Integer(dedup(values))
    }

    pub fn reals(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Real(dedup(values))
    }

    pub fn booleans(values: impl IntoIterator<Item = bool>) -> Self {
        Self::Boolean(dedup(values))
    }

    /// Drops repeated values, keeping first-seen order. Sets parsed from a
    /// document skip the constructors, so the builder runs this on them.
    fn deduplicated(self) -> Self {
        match self {
            Self::Boolean(v) => Self::Boolean(dedup(v)),
            Self::Integer(v) => Self::Integer(dedup(v)),
            Self::Real(v) => Self::Real(dedup(v)),
            Self::Text(v) => Self::Text(dedup(v)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the set may be attached to a field of `kind`.
    pub fn is_compatible_with(&self, kind: FieldType) -> bool {
        match self {
            Self::Text(_) => kind.is_textual(),
            Self::Integer(_) => kind.is_numeric(),
            Self::Real(_) => kind == FieldType::Real,
            Self::Boolean(_) => kind == FieldType::Boolean,
        }
    }

    /// Membership test. Integers and reals compare numerically.
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Text(allowed), Value::Text(s)) => allowed.iter().any(|a| a == s),
            (Self::Boolean(allowed), Value::Boolean(b)) => allowed.contains(b),
            (Self::Integer(allowed), Value::Integer(i)) => allowed.contains(i),
            (Self::Integer(allowed), Value::Real(r)) => allowed.iter().any(|a| *a as f64 == *r),
            (Self::Real(allowed), Value::Real(r)) => allowed.contains(r),
            (Self::Real(allowed), Value::Integer(i)) => allowed.contains(&(*i as f64)),
            _ => false,
        }
    }
}

impl fmt::Display for AllowedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str("]")
        }
        match self {
            Self::Boolean(v) => list(f, v),
            Self::Integer(v) => list(f, v),
            Self::Real(v) => list(f, v),
            Self::Text(v) => list(f, v),
        }
    }
}

fn dedup<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// A constraint pattern, compiled once and anchored at the start of the value.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: String,
    regex: Regex,
}

impl FieldPattern {
    /// Compiles a pattern. Matching is anchored at the start of the value but
    /// not at the end; add `$` to the pattern for a full match.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        if source.len() > MAX_PATTERN_LENGTH {
            return Err(GuardError::configuration(format!(
                "pattern too long (max {MAX_PATTERN_LENGTH} characters)"
            )));
        }
        if source.contains('\0') {
            return Err(GuardError::configuration(
                "pattern cannot contain null bytes",
            ));
        }
        let regex = Regex::new(&format!("^(?:{source})")).map_err(|e| {
            GuardError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            }
        })?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// The expected shape of a single record field.
///
/// Constraints are immutable once built; use [`FieldConstraint::builder`].
///
/// # Examples
///
/// ```rust
/// use account_guard::core::{FieldConstraint, FieldType, Value};
///
/// let constraint = FieldConstraint::builder("first_name", FieldType::Text)
///     .length_between(1, 50)
///     .build()
///     .unwrap();
///
/// assert!(constraint.check(Some(&Value::from("Ada"))).is_empty());
/// assert_eq!(constraint.check(None).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConstraint {
    field_name: String,
    field_type: FieldType,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    pattern: Option<FieldPattern>,
    allowed_values: Option<AllowedValues>,
    description: Option<String>,
}

impl FieldConstraint {
    /// Starts building a required constraint for `field_name`.
    pub fn builder(field_name: impl Into<String>, field_type: FieldType) -> FieldConstraintBuilder {
        FieldConstraintBuilder {
            field_name: field_name.into(),
            field_type,
            required: true,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            pattern: None,
            allowed_values: None,
            description: None,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    pub fn pattern(&self) -> Option<&FieldPattern> {
        self.pattern.as_ref()
    }

    pub fn allowed_values(&self) -> Option<&AllowedValues> {
        self.allowed_values.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Checks a raw value against this constraint.
    ///
    /// `None` and `Some(Value::Null)` are both treated as absent.
    pub fn check(&self, value: Option<&Value>) -> Vec<FieldViolation> {
        validate_field(value, self)
    }

    /// Converts back into the serializable descriptor form.
    pub fn to_descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            field_name: self.field_name.clone(),
            field_type: self.field_type,
            required: self.required,
            min_length: self.min_length,
            max_length: self.max_length,
            min_value: self.min_value,
            max_value: self.max_value,
            pattern: self.pattern.as_ref().map(|p| p.as_str().to_string()),
            allowed_values: self.allowed_values.clone(),
            description: self.description.clone(),
        }
    }
}

/// Builder for [`FieldConstraint`].
#[derive(Debug, Clone)]
pub struct FieldConstraintBuilder {
    field_name: String,
    field_type: FieldType,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    pattern: Option<String>,
    allowed_values: Option<AllowedValues>,
    description: Option<String>,
}

impl FieldConstraintBuilder {
    /// Marks the field as optional: absence is not an error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn length_between(self, min: usize, max: usize) -> Self {
        self.min_length(min).max_length(max)
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub fn value_between(self, min: f64, max: f64) -> Self {
        self.min_value(min).max_value(max)
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn allowed_values(mut self, values: AllowedValues) -> Self {
        self.allowed_values = Some(values.deduplicated());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the definition and produces the constraint.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Configuration`] for inconsistent bounds, bounds on
    /// a kind that cannot honor them, or an allowed-value set that is empty or
    /// of the wrong type, and [`GuardError::InvalidPattern`] if the pattern fails to compile.
    pub fn build(self) -> Result<FieldConstraint> {
        let name = self.field_name;
        if name.trim().is_empty() {
            return Err(GuardError::configuration(
                "field name cannot be empty or whitespace-only",
            ));
        }

        if (self.min_length.is_some() || self.max_length.is_some())
            && !self.field_type.supports_length()
        {
            return Err(GuardError::configuration(format!(
                "field '{name}': length bounds are not supported for type {}",
                self.field_type
            )));
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(GuardError::configuration(format!(
                    "field '{name}': min_length {min} exceeds max_length {max}"
                )));
            }
        }

        if (self.min_value.is_some() || self.max_value.is_some()) && !self.field_type.is_numeric()
        {
            return Err(GuardError::configuration(format!(
                "field '{name}': value bounds are not supported for type {}",
                self.field_type
            )));
        }
        if self.min_value.is_some_and(f64::is_nan) || self.max_value.is_some_and(f64::is_nan) {
            return Err(GuardError::configuration(format!(
                "field '{name}': value bounds cannot be NaN"
            )));
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(GuardError::configuration(format!(
                    "field '{name}': min_value {min} exceeds max_value {max}"
                )));
            }
        }

        if let Some(allowed) = &self.allowed_values {
            if allowed.is_empty() {
                return Err(GuardError::configuration(format!(
                    "field '{name}': allowed values cannot be empty"
                )));
            }
            if !allowed.is_compatible_with(self.field_type) {
                return Err(GuardError::configuration(format!(
                    "field '{name}': allowed values {allowed} do not match type {}",
                    self.field_type
                )));
            }
        }

        let pattern = self.pattern.map(FieldPattern::new).transpose()?;

        Ok(FieldConstraint {
            field_name: name,
            field_type: self.field_type,
            required: self.required,
            min_length: self.min_length,
            max_length: self.max_length,
            min_value: self.min_value,
            max_value: self.max_value,
            pattern,
            allowed_values: self.allowed_values,
            description: self.description,
        })
    }
}

/// Serializable form of a [`FieldConstraint`], as found in schema documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    pub field_name: String,
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<AllowedValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_required() -> bool {
    true
}

impl TryFrom<ConstraintDescriptor> for FieldConstraint {
    type Error = GuardError;

    fn try_from(descriptor: ConstraintDescriptor) -> Result<Self> {
        let mut builder = FieldConstraint::builder(descriptor.field_name, descriptor.field_type)
            .required(descriptor.required);
        if let Some(min) = descriptor.min_length {
            builder = builder.min_length(min);
        }
        if let Some(max) = descriptor.max_length {
            builder = builder.max_length(max);
        }
        if let Some(min) = descriptor.min_value {
            builder = builder.min_value(min);
        }
        if let Some(max) = descriptor.max_value {
            builder = builder.max_value(max);
        }
        if let Some(pattern) = descriptor.pattern {
            builder = builder.pattern(pattern);
        }
        if let Some(allowed) = descriptor.allowed_values {
            builder = builder.allowed_values(allowed);
        }
        if let Some(description) = descriptor.description {
            builder = builder.description(description);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_required() {
        let constraint = FieldConstraint::builder("email", FieldType::Email)
            .build()
            .unwrap();
        assert!(constraint.is_required());
        assert_eq!(constraint.field_type(), FieldType::Email);
        assert!(constraint.pattern().is_none());

        let optional = FieldConstraint::builder("phone", FieldType::Phone)
            .optional()
            .build()
            .unwrap();
        assert!(!optional.is_required());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = FieldConstraint::builder("name", FieldType::Text)
            .length_between(10, 2)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("min_length 10 exceeds max_length 2"));

        let err = FieldConstraint::builder("score", FieldType::Real)
            .value_between(1.0, 0.0)
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rejects_bounds_on_wrong_kind() {
        assert!(FieldConstraint::builder("flag", FieldType::Boolean)
            .min_value(0.0)
            .build()
            .is_err());
        assert!(FieldConstraint::builder("count", FieldType::Integer)
            .max_length(3)
            .build()
            .is_err());
        assert!(FieldConstraint::builder("score", FieldType::Real)
            .max_value(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_rejects_empty_field_name() {
        assert!(FieldConstraint::builder("  ", FieldType::Text)
            .build()
            .is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FieldConstraint::builder("code", FieldType::Text)
            .pattern("([a-z")
            .build()
            .unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { .. }));
    }

    #[test]
    fn test_pattern_is_anchored_at_start_only() {
        let pattern = FieldPattern::new("[A-Z]{2}").unwrap();
        assert!(pattern.is_match("US-123"));
        assert!(!pattern.is_match("x-US"));

        let alternation = FieldPattern::new("ab|cd").unwrap();
        assert!(alternation.is_match("cdx"));
        assert!(!alternation.is_match("xcd"));
    }

    #[test]
    fn test_allowed_values_typing() {
        let text = AllowedValues::text(["personal", "business", "personal"]);
        assert_eq!(text.len(), 2);
        assert!(text.is_compatible_with(FieldType::Text));
        assert!(text.is_compatible_with(FieldType::Email));
        assert!(!text.is_compatible_with(FieldType::Integer));

        let ints = AllowedValues::integers([1, 2, 3]);
        assert!(ints.is_compatible_with(FieldType::Real));
        assert!(!ints.is_compatible_with(FieldType::Boolean));

        let err = FieldConstraint::builder("account_type", FieldType::Text)
            .allowed_values(AllowedValues::integers([1]))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_allowed_values_are_rejected() {
        for kind in [FieldType::Text, FieldType::Integer, FieldType::Boolean] {
            let descriptor: ConstraintDescriptor = serde_json::from_value(serde_json::json!({
                "field_name": "plan",
                "field_type": kind.as_str(),
                "allowed_values": []
            }))
            .unwrap();
            let err = FieldConstraint::try_from(descriptor).unwrap_err();
            assert!(err.is_configuration());
            assert!(
                err.to_string()
                    .contains("field 'plan': allowed values cannot be empty"),
                "{err}"
            );
        }
    }

    #[test]
    fn test_allowed_values_membership() {
        let reals = AllowedValues::reals([0.5, 1.0]);
        assert!(reals.contains(&Value::Integer(1)));
        assert!(reals.contains(&Value::Real(0.5)));
        assert!(!reals.contains(&Value::Text("1".into())));

        let text = AllowedValues::text(["personal"]);
        assert!(text.contains(&Value::Text("personal".into())));
        assert!(!text.contains(&Value::Text("Personal".into())));
        assert_eq!(text.to_string(), "[personal]");
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::IpAddress.to_string(), "ip_address");
        assert_eq!("uuid".parse::<FieldType>().unwrap(), FieldType::Identifier);
        assert_eq!("float".parse::<FieldType>().unwrap(), FieldType::Real);
        assert!("decimal".parse::<FieldType>().is_err());

        let parsed: FieldType = serde_json::from_str("\"string\"").unwrap();
        assert_eq!(parsed, FieldType::Text);
        for kind in FieldType::ALL {
            assert_eq!(kind.as_str().parse::<FieldType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_descriptor_round_trip_keeps_settings() {
        let constraint = FieldConstraint::builder("account_type", FieldType::Text)
            .allowed_values(AllowedValues::text(["personal", "business"]))
            .pattern("[a-z]+")
            .description("Kind of account")
            .build()
            .unwrap();

        let rebuilt = FieldConstraint::try_from(constraint.to_descriptor()).unwrap();
        assert_eq!(rebuilt, constraint);
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor: ConstraintDescriptor =
            serde_json::from_str(r#"{"field_name": "velocity_1h", "field_type": "integer"}"#)
                .unwrap();
        assert!(descriptor.required);
        assert!(descriptor.allowed_values.is_none());
    }
}
