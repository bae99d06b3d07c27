//! Fraud-pattern parameter tables.
//!
//! Synthetic fraud is generated from named patterns. Each pattern selects a
//! difficulty tier for a handful of parameters, and every parameter has a
//! numeric range per tier. Parameters are addressed by a dotted
//! `category.parameter` path such as `velocity.accounts_per_hour`.
//!
//! The record validator does not use these tables; they are configuration
//! for record generators.
//!
//! # Examples
//!
//! ```rust
//! use account_guard::params::{param_range, DifficultyTier, ParamRange};
//!
//! # fn main() -> account_guard::prelude::Result<()> {
//! let range = param_range("account_farming", "velocity.accounts_per_ip", None)?;
//! assert_eq!(range, ParamRange::new(20.0, 100.0));
//!
//! let harder = param_range("account_farming", "velocity.accounts_per_ip", Some(DifficultyTier::T3))?;
//! assert_eq!(harder, ParamRange::new(2.0, 5.0));
//! # Ok(())
//! # }
//! ```

mod tables;

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tables::{CATEGORIES, PATTERNS};
use tracing::debug;

/// How hard a synthetic pattern is to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// Plausible: easy to detect.
    T1,
    /// Evasive: harder to detect.
    T2,
    /// Adversarial: hardest to detect.
    T3,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [DifficultyTier::T1, DifficultyTier::T2, DifficultyTier::T3];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::T1 => "T1",
            DifficultyTier::T2 => "T2",
            DifficultyTier::T3 => "T3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::T1 => "plausible",
            DifficultyTier::T2 => "evasive",
            DifficultyTier::T3 => "adversarial",
        }
    }

    fn index(self) -> usize {
        match self {
            DifficultyTier::T1 => 0,
            DifficultyTier::T2 => 1,
            DifficultyTier::T3 => 2,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "T1" => Ok(DifficultyTier::T1),
            "T2" => Ok(DifficultyTier::T2),
            "T3" => Ok(DifficultyTier::T3),
            _ => Err(GuardError::UnknownTier(s.to_string())),
        }
    }
}

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

impl From<(f64, f64)> for ParamRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}

/// A named fraud pattern and the tier it uses for each of its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternConfig {
    pub name: &'static str,
    pub description: &'static str,
    /// `(dotted path, tier)` in configured order.
    pub params: &'static [(&'static str, DifficultyTier)],
    /// Share of generated fraud that follows this pattern.
    pub weight: f64,
}

impl PatternConfig {
    /// The configured tier for `path`, if this pattern uses it.
    pub fn tier_for(&self, path: &str) -> Option<DifficultyTier> {
        self.params
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map(|(_, tier)| *tier)
    }
}

/// All configured fraud patterns.
pub fn patterns() -> &'static [PatternConfig] {
    PATTERNS
}

/// Looks up a fraud pattern by name.
pub fn pattern(name: &str) -> Result<&'static PatternConfig> {
    PATTERNS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| GuardError::UnknownFraudPattern(name.to_string()))
}

pub fn pattern_weight(name: &str) -> Result<f64> {
    pattern(name).map(|p| p.weight)
}

/// Resolves a dotted `category.parameter` path for one tier, without
/// reference to any pattern.
pub fn lookup(path: &str, tier: DifficultyTier) -> Result<ParamRange> {
    let not_found = || GuardError::ParameterPathNotFound(path.to_string());

    let (category, name) = path.split_once('.').ok_or_else(not_found)?;
    let spec = CATEGORIES
        .iter()
        .find(|c| c.name == category)
        .and_then(|c| c.params.iter().find(|p| p.name == name))
        .ok_or_else(not_found)?;

    Ok(spec.tiers[tier.index()].into())
}

/// Range of `path` for `pattern`.
///
/// The tier is `tier_override` when given, otherwise the tier the pattern
/// configures for `path`.
///
/// # Errors
///
/// - [`GuardError::UnknownFraudPattern`] if the pattern does not exist
/// - [`GuardError::UnknownParameter`] if no override is given and the pattern
///   does not configure `path`
/// - [`GuardError::ParameterPathNotFound`] if `path` does not resolve in the
///   tables, including malformed paths
pub fn param_range(
    pattern_name: &str,
    path: &str,
    tier_override: Option<DifficultyTier>,
) -> Result<ParamRange> {
    let config = pattern(pattern_name)?;
    let tier = match tier_override {
        Some(tier) => tier,
        None => config
            .tier_for(path)
            .ok_or_else(|| GuardError::UnknownParameter {
                pattern: pattern_name.to_string(),
                path: path.to_string(),
            })?,
    };

    let range = lookup(path, tier)?;
    debug!(pattern = pattern_name, param.path = path, param.tier = %tier, param.range = %range, "Resolved fraud parameter");
    Ok(range)
}

/// Every configured parameter range of a pattern, in configured order.
pub fn pattern_params(pattern_name: &str) -> Result<Vec<(&'static str, ParamRange)>> {
    let config = pattern(pattern_name)?;
    config
        .params
        .iter()
        .map(|&(path, tier)| Ok((path, lookup(path, tier)?)))
        .collect()
}

/// Every resolvable `category.parameter` path in the tables.
pub fn parameter_paths() -> Vec<String> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.params.iter().map(move |p| format!("{}.{}", c.name, p.name)))
        .collect()
}
