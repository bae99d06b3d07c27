//! Validator settings loaded from configuration.

use crate::constraints::RuleSetKind;
use crate::logging::LogConfig;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for a [`RecordValidator`](crate::core::RecordValidator).
///
/// Every field has a default, so a partial document is enough.
///
/// # Examples
///
/// ```rust
/// use account_guard::config::ValidatorConfig;
/// use account_guard::constraints::RuleSetKind;
///
/// let config = ValidatorConfig::from_json_str(r#"{"business_rules": "extended", "parallelism": 2}"#).unwrap();
/// assert_eq!(config.business_rules, RuleSetKind::Extended);
/// assert_eq!(config.parallelism, 2);
/// assert!(!config.logging.log_constraint_details);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Which built-in business rule set to run.
    pub business_rules: RuleSetKind,
    /// Number of chunks a batch is split into for parallel validation.
    pub parallelism: usize,
    pub logging: LogConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            business_rules: RuleSetKind::Standard,
            parallelism: num_cpus::get(),
            logging: LogConfig::default(),
        }
    }
}

impl ValidatorConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(format!("reading validator config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Rejects settings no validator can run with.
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == 0 {
            return Err(GuardError::configuration("parallelism must be at least 1"));
        }
        Ok(())
    }

    pub fn with_business_rules(mut self, kind: RuleSetKind) -> Self {
        self.business_rules = kind;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }
}
