//! Schemas: ordered sets of field constraints describing one record shape.

use super::constraint::{AllowedValues, ConstraintDescriptor, FieldConstraint, FieldType};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, instrument};

/// An ordered sequence of [`FieldConstraint`]s.
///
/// Field checks run, and report, in the order constraints were added.
///
/// # Examples
///
/// ```rust
/// use account_guard::core::{FieldConstraint, FieldType, Schema};
///
/// # fn main() -> account_guard::prelude::Result<()> {
/// let schema = Schema::builder("signup")
///     .field(FieldConstraint::builder("email", FieldType::Email).build()?)
///     .field(FieldConstraint::builder("age", FieldType::Integer).min_value(18.0).build()?)
///     .build();
///
/// assert_eq!(schema.len(), 2);
/// assert!(schema.field_names().contains("age"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    description: Option<String>,
    constraints: Vec<FieldConstraint>,
    field_names: BTreeSet<String>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            description: None,
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Constraints in evaluation order.
    pub fn constraints(&self) -> &[FieldConstraint] {
        &self.constraints
    }

    /// The set of field names the schema knows about.
    pub fn field_names(&self) -> &BTreeSet<String> {
        &self.field_names
    }

    /// Returns the first constraint declared for `field_name`.
    pub fn get(&self, field_name: &str) -> Option<&FieldConstraint> {
        self.constraints
            .iter()
            .find(|c| c.field_name() == field_name)
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.field_names.contains(field_name)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Names of the required fields, in schema order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.constraints
            .iter()
            .filter(|c| c.is_required())
            .map(FieldConstraint::field_name)
    }

    /// The built-in account-opening schema.
    ///
    /// | field | type | required | bounds |
    /// |---|---|---|---|
    /// | user_id | identifier | yes | |
    /// | email | email | yes | |
    /// | phone | phone | no | |
    /// | first_name, last_name | text | yes | length 1..=50 |
    /// | address | text | yes | length 10..=200 |
    /// | ip_address | ip_address | yes | |
    /// | device_fingerprint | text | yes | length 32..=64 |
    /// | timestamp | timestamp | yes | |
    /// | account_type | text | yes | personal, business, premium |
    /// | fraud_score | real | no | 0..=1 |
    /// | is_fraud | boolean | yes | |
    /// | velocity_1h | integer | no | 0..=1000 |
    /// | velocity_24h | integer | no | 0..=10000 |
    pub fn account_opening() -> Self {
        Self::builder("account_opening")
            .description("Simulated account-opening events for fraud model training")
            .fields(account_opening_fields())
            .build()
    }

    /// Parses a schema document.
    ///
    /// Every field goes through the same checks as
    /// [`FieldConstraint::builder`], and duplicate field names are rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use account_guard::core::Schema;
    ///
    /// let schema = Schema::from_json_str(r#"{
    ///     "name": "minimal",
    ///     "fields": [
    ///         {"field_name": "user_id", "field_type": "uuid"},
    ///         {"field_name": "score", "field_type": "float", "required": false, "max_value": 1.0}
    ///     ]
    /// }"#).unwrap();
    ///
    /// assert_eq!(schema.len(), 2);
    /// assert!(!schema.get("score").unwrap().is_required());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }

    /// Reads and parses a schema document from disk.
    #[instrument(skip_all, fields(schema.path = %path.as_ref().display()))]
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(format!("reading schema file {}", path.display()))?;
        let schema = Self::from_json_str(&json)?;
        debug!(schema.name = %schema.name, schema.fields = schema.len(), "Loaded schema");
        Ok(schema)
    }

    /// The serializable form of this schema.
    pub fn to_document(&self) -> SchemaDocument {
        SchemaDocument {
            name: self.name.clone(),
            description: self.description.clone(),
            fields: self
                .constraints
                .iter()
                .map(FieldConstraint::to_descriptor)
                .collect(),
        }
    }
}

/// On-disk form of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<ConstraintDescriptor>,
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = GuardError;

    fn try_from(document: SchemaDocument) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut builder = Schema::builder(document.name);
        if let Some(description) = document.description {
            builder = builder.description(description);
        }

        for descriptor in document.fields {
            if !seen.insert(descriptor.field_name.clone()) {
                return Err(GuardError::configuration(format!(
                    "duplicate field '{}' in schema",
                    descriptor.field_name
                )));
            }
            builder = builder.field(FieldConstraint::try_from(descriptor)?);
        }

        Ok(builder.build())
    }
}

/// Builder for [`Schema`].
///
/// Declaring the same field twice is allowed here; both constraints run.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    constraints: Vec<FieldConstraint>,
}

impl SchemaBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, constraint: FieldConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn fields<I>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = FieldConstraint>,
    {
        self.constraints.extend(constraints);
        self
    }

    pub fn build(self) -> Schema {
        let field_names = self
            .constraints
            .iter()
            .map(|c| c.field_name().to_string())
            .collect();
        Schema {
            name: self.name,
            description: self.description,
            constraints: self.constraints,
            field_names,
        }
    }
}

fn account_opening_fields() -> Vec<FieldConstraint> {
    let text = |name: &str, min: usize, max: usize, description: &str| {
        FieldConstraint::builder(name, FieldType::Text)
            .length_between(min, max)
            .description(description)
    };

    let builders = vec![
        FieldConstraint::builder("user_id", FieldType::Identifier)
            .description("Unique ID for the account (like a customer number)"),
        FieldConstraint::builder("email", FieldType::Email).description("Email address"),
        FieldConstraint::builder("phone", FieldType::Phone)
            .optional()
            .description("Phone number"),
        text("first_name", 1, 50, "Given name"),
        text("last_name", 1, 50, "Family name"),
        text("address", 10, 200, "Postal address"),
        FieldConstraint::builder("ip_address", FieldType::IpAddress)
            .description("IP address the application was submitted from"),
        text("device_fingerprint", 32, 64, "Device fingerprint hash"),
        FieldConstraint::builder("timestamp", FieldType::Timestamp)
            .description("When the account was opened"),
        FieldConstraint::builder("account_type", FieldType::Text)
            .allowed_values(AllowedValues::text(["personal", "business", "premium"]))
            .description("Product tier of the new account"),
        FieldConstraint::builder("fraud_score", FieldType::Real)
            .optional()
            .value_between(0.0, 1.0)
            .description("Model-assigned fraud likelihood"),
        FieldConstraint::builder("is_fraud", FieldType::Boolean)
            .description("Ground-truth fraud label"),
        FieldConstraint::builder("velocity_1h", FieldType::Integer)
            .optional()
            .value_between(0.0, 1000.0)
            .description("Applications from the same entity in the last hour"),
        FieldConstraint::builder("velocity_24h", FieldType::Integer)
            .optional()
            .value_between(0.0, 10000.0)
            .description("Applications from the same entity in the last 24 hours"),
    ];

    builders
        .into_iter()
        .map(|builder| {
            // Hard-coded definitions, covered by the tests below
            #[allow(clippy::expect_used)]
            builder
                .build()
                .expect("Built-in account-opening constraint should be valid")
        })
        .collect()
}
