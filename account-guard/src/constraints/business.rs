//! Cross-field business rules evaluated over a whole record.
//!
//! A rule only fires when every field it reads is present and has the shape
//! it expects. Missing or mistyped fields are the field validator's concern,
//! so rules skip them silently. Every violation is reported under the
//! synthetic field name [`BUSINESS_RULES_FIELD`].

use super::datatype::timestamp_of;
use crate::core::{Record, Value};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Field name under which rule violations are recorded.
pub const BUSINESS_RULES_FIELD: &str = "business_rules";

/// Fraud flag set requires a score of at least this much.
pub const FRAUD_SCORE_FLOOR: f64 = 0.5;
/// Fraud flag clear requires a score of at most this much.
pub const LEGIT_SCORE_CEILING: f64 = 0.3;
/// Timestamps older than this many days are rejected.
pub const MAX_TIMESTAMP_AGE_DAYS: i64 = 5 * 365;

const SUSPICIOUS_EMAIL_DOMAINS: &[&str] = &["test.com", "example.com", "fake.com", "temp.com"];
const DISPOSABLE_EMAIL_DOMAINS: &[&str] = &["10minutemail.com", "guerrillamail.com", "tempmail.org"];
const PLACEHOLDER_NAMES: &[&str] = &["test user", "john doe", "jane smith"];
const PLACEHOLDER_STREETS: &[&str] = &["123 main st", "123 fake street", "n/a"];
const MINIMUM_AGE: f64 = 18.0;

/// Evaluation-scoped inputs shared by all rules of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    now: DateTime<Utc>,
}

impl RuleContext {
    /// Creates a context pinned to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// The clock reading taken once for this evaluation.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// A predicate over a full record.
///
/// Implementations must be stateless; the same rule instance is shared
/// across records and threads.
pub trait BusinessRule: Debug + Send + Sync {
    /// Stable identifier of the rule.
    fn name(&self) -> &str;

    /// One-line statement of what the rule requires.
    fn explanation(&self) -> &str;

    /// Returns a violation message, or `None` if the record passes or the rule
    /// does not apply.
    fn evaluate(&self, record: &Record, ctx: &RuleContext) -> Option<String>;
}

fn violation(message: impl std::fmt::Display) -> Option<String> {
    Some(format!("Business rule violation: {message}"))
}

/// Domain part of an email: everything after the last `@`, lowercased.
/// Empty when there is no `@`.
pub fn email_domain(email: &str) -> String {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .unwrap_or_default()
}

/// `is_fraud` and `fraud_score` must agree. Scores strictly between the two
/// thresholds pass with either flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct FraudScoreConsistency;

impl BusinessRule for FraudScoreConsistency {
    fn name(&self) -> &str {
        "fraud_score_consistency"
    }

    fn explanation(&self) -> &str {
        "fraud_score must be >= 0.5 for fraud and <= 0.3 for legitimate records"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let score = record.get_present("fraud_score")?.as_f64()?;
        let is_fraud = record.get_present("is_fraud")?.as_bool()?;

        if is_fraud && score < FRAUD_SCORE_FLOOR {
            violation("fraud_score should be >= 0.5 when is_fraud=true")
        } else if !is_fraud && score > LEGIT_SCORE_CEILING {
            violation("fraud_score should be <= 0.3 when is_fraud=false")
        } else {
            None
        }
    }
}

/// The one-hour velocity cannot exceed the 24-hour velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityMonotonicity;

impl BusinessRule for VelocityMonotonicity {
    fn name(&self) -> &str {
        "velocity_monotonicity"
    }

    fn explanation(&self) -> &str {
        "velocity_1h must not exceed velocity_24h"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let hourly = record.get_present("velocity_1h")?.as_f64()?;
        let daily = record.get_present("velocity_24h")?.as_f64()?;

        if hourly > daily {
            violation("velocity_1h cannot exceed velocity_24h")
        } else {
            None
        }
    }
}

/// The event timestamp is neither in the future nor more than five years old.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampPlausibility;

impl BusinessRule for TimestampPlausibility {
    fn name(&self) -> &str {
        "timestamp_plausibility"
    }

    fn explanation(&self) -> &str {
        "timestamp must not be in the future or more than 5 years old"
    }

    fn evaluate(&self, record: &Record, ctx: &RuleContext) -> Option<String> {
        let timestamp = timestamp_of(record.get_present("timestamp")?)?;
        let now = ctx.now();

        if timestamp > now {
            violation("timestamp cannot be in the future")
        } else if timestamp_age(timestamp, now).num_days() > MAX_TIMESTAMP_AGE_DAYS {
            violation("timestamp is too old (>5 years)")
        } else {
            None
        }
    }
}

/// Email domains that only show up in placeholder data.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailDomainDenylist;

impl BusinessRule for EmailDomainDenylist {
    fn name(&self) -> &str {
        "email_domain_denylist"
    }

    fn explanation(&self) -> &str {
        "email domain must not be test.com, example.com, fake.com or temp.com"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let email = record.get_present("email")?.as_text()?;
        let domain = email_domain(email);

        if SUSPICIOUS_EMAIL_DOMAINS.contains(&domain.as_str()) {
            violation(format!("suspicious email domain '{domain}'"))
        } else {
            None
        }
    }
}

/// Account holders must be adults.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumAge;

impl BusinessRule for MinimumAge {
    fn name(&self) -> &str {
        "age_minimum"
    }

    fn explanation(&self) -> &str {
        "Account holder must be an adult"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let age = record.get_present("age")?.as_f64()?;
        if age < MINIMUM_AGE {
            violation(format!("age {age} is below the minimum of 18"))
        } else {
            None
        }
    }
}

/// Names that are obviously placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderName;

impl PlaceholderName {
    fn full_name(record: &Record) -> Option<String> {
        if let Some(full) = record.get_present("full_name").and_then(Value::as_text) {
            return Some(full.to_string());
        }
        let first = record.get_present("first_name")?.as_text()?;
        let last = record.get_present("last_name")?.as_text()?;
        Some(format!("{first} {last}"))
    }
}

impl BusinessRule for PlaceholderName {
    fn name(&self) -> &str {
        "name_not_placeholder"
    }

    fn explanation(&self) -> &str {
        "Avoid obviously placeholder names"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let name = Self::full_name(record)?;
        if PLACEHOLDER_NAMES.contains(&name.trim().to_lowercase().as_str()) {
            violation(format!("placeholder name '{name}'"))
        } else {
            None
        }
    }
}

/// Street addresses that are obviously fake.
///
/// Reads `address.street` when the address is structured, otherwise the text
/// up to the first comma.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAddress;

impl BusinessRule for PlaceholderAddress {
    fn name(&self) -> &str {
        "address_looks_real"
    }

    fn explanation(&self) -> &str {
        "Avoid obviously fake addresses"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let street = match record.get_present("address")? {
            Value::Text(address) => address.split(',').next().unwrap_or_default(),
            Value::Object(address) => address.get("street")?.as_text()?,
            _ => return None,
        };

        if PLACEHOLDER_STREETS.contains(&street.trim().to_lowercase().as_str()) {
            violation(format!("placeholder street address '{}'", street.trim()))
        } else {
            None
        }
    }
}

/// Temporary-mailbox providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisposableEmail;

impl BusinessRule for DisposableEmail {
    fn name(&self) -> &str {
        "email_not_disposable"
    }

    fn explanation(&self) -> &str {
        "Block common temporary email services"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let email = record.get_present("email")?.as_text()?;
        let domain = email_domain(email);

        if DISPOSABLE_EMAIL_DOMAINS.contains(&domain.as_str()) {
            violation(format!("disposable email domain '{domain}'"))
        } else {
            None
        }
    }
}

/// The email should look like a personal address: not `test@test.com`, and
/// its local part is not just the phone number.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailLooksPersonal;

impl BusinessRule for EmailLooksPersonal {
    fn name(&self) -> &str {
        "email_format_reasonable"
    }

    fn explanation(&self) -> &str {
        "Email should look like real personal email"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let email = record.get_present("email")?.as_text()?;
        if email.eq_ignore_ascii_case("test@test.com") {
            return violation("placeholder email 'test@test.com'");
        }

        let phone = record.get_present("phone")?.as_text()?;
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        let local = email.rsplit_once('@').map_or(email, |(local, _)| local);
        let national = digits.strip_prefix('1').filter(|d| d.len() == 10);

        if !digits.is_empty() && (local == digits || Some(local) == national) {
            violation("email username matches phone number")
        } else {
            None
        }
    }
}

/// Registrations before 2020 are outside the simulated window.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationFloor;

impl BusinessRule for RegistrationFloor {
    fn name(&self) -> &str {
        "registration_not_too_old"
    }

    fn explanation(&self) -> &str {
        "Will only simulate recent account openings"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let timestamp = timestamp_of(record.get_present("timestamp")?)?;
        let floor = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single()?;

        if timestamp < floor {
            violation("timestamp is before 2020-01-01")
        } else {
            None
        }
    }
}

/// US addresses should carry US phone numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneCountryMatch;

impl BusinessRule for PhoneCountryMatch {
    fn name(&self) -> &str {
        "phone_country_match"
    }

    fn explanation(&self) -> &str {
        "US addresses should have US phone numbers"
    }

    fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
        let country = record
            .get_present("address")?
            .as_object()?
            .get("country")?
            .as_text()?;
        let phone = record.get_present("phone")?.as_text()?;

        if country.eq_ignore_ascii_case("US") && !phone.starts_with("+1") {
            violation("phone should start with +1 for a US address")
        } else {
            None
        }
    }
}

/// Which built-in rule set a validator uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetKind {
    /// The four core rules.
    #[default]
    Standard,
    /// The core rules followed by the identity and contact rules.
    Extended,
    /// No business rules; field checks only.
    None,
}

/// An ordered set of business rules.
///
/// Rules run in insertion order and each contributes at most one message.
///
/// # Examples
///
/// ```rust
/// use account_guard::constraints::BusinessRuleSet;
/// use account_guard::core::Record;
/// use chrono::Utc;
///
/// let rules = BusinessRuleSet::standard();
/// let record = Record::new().with("velocity_1h", 10).with("velocity_24h", 5);
///
/// let errors = rules.evaluate(&record, Utc::now());
/// assert_eq!(errors, vec!["Business rule violation: velocity_1h cannot exceed velocity_24h"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BusinessRuleSet {
    rules: Vec<Arc<dyn BusinessRule>>,
}

impl BusinessRuleSet {
    /// A set with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fraud-score consistency, velocity monotonicity, timestamp
    /// plausibility and the email domain denylist, in that order.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(FraudScoreConsistency)
            .with_rule(VelocityMonotonicity)
            .with_rule(TimestampPlausibility)
            .with_rule(EmailDomainDenylist)
    }

    /// The standard rules followed by the identity, contact, temporal and
    /// geographic checks.
    pub fn extended() -> Self {
        Self::standard()
            .with_rule(MinimumAge)
            .with_rule(PlaceholderName)
            .with_rule(PlaceholderAddress)
            .with_rule(DisposableEmail)
            .with_rule(EmailLooksPersonal)
            .with_rule(RegistrationFloor)
            .with_rule(PhoneCountryMatch)
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: impl BusinessRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn BusinessRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule against `record` using one clock reading.
    pub fn evaluate(&self, record: &Record, now: DateTime<Utc>) -> Vec<String> {
        self.evaluate_with(record, &RuleContext::new(now))
    }

    pub fn evaluate_with(&self, record: &Record, ctx: &RuleContext) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let message = rule.evaluate(record, ctx)?;
                debug!(rule.name = %rule.name(), rule.message = %message, "Business rule failed");
                Some(message)
            })
            .collect()
    }
}

impl From<RuleSetKind> for BusinessRuleSet {
    fn from(kind: RuleSetKind) -> Self {
        match kind {
            RuleSetKind::Standard => Self::standard(),
            RuleSetKind::Extended => Self::extended(),
            RuleSetKind::None => Self::empty(),
        }
    }
}

/// Age of a timestamp relative to `now`. Negative for future timestamps.
pub fn timestamp_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now - timestamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
    }

    fn ctx() -> RuleContext {
        RuleContext::new(now())
    }

    fn record(value: serde_json::Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn test_fraud_score_consistency() {
        let rule = FraudScoreConsistency;
        assert!(rule
            .evaluate(&record(json!({"fraud_score": 0.9, "is_fraud": true})), &ctx())
            .is_none());
        assert_eq!(
            rule.evaluate(&record(json!({"fraud_score": 0.1, "is_fraud": true})), &ctx()),
            Some("Business rule violation: fraud_score should be >= 0.5 when is_fraud=true".into())
        );
        assert!(rule
            .evaluate(&record(json!({"fraud_score": 0.6, "is_fraud": false})), &ctx())
            .is_some());
    }

    #[test]
    fn test_fraud_score_dead_zone() {
        let rule = FraudScoreConsistency;
        for flag in [true, false] {
            let r = record(json!({"fraud_score": 0.4, "is_fraud": flag}));
            assert!(rule.evaluate(&r, &ctx()).is_none());
        }
        // Boundaries are inclusive
        assert!(rule
            .evaluate(&record(json!({"fraud_score": 0.5, "is_fraud": true})), &ctx())
            .is_none());
        assert!(rule
            .evaluate(&record(json!({"fraud_score": 0.3, "is_fraud": false})), &ctx())
            .is_none());
    }

    #[test]
    fn test_fraud_score_skips_when_absent_or_mistyped() {
        let rule = FraudScoreConsistency;
        assert!(rule.evaluate(&record(json!({"is_fraud": true})), &ctx()).is_none());
        assert!(rule
            .evaluate(&record(json!({"fraud_score": null, "is_fraud": true})), &ctx())
            .is_none());
        assert!(rule
            .evaluate(&record(json!({"fraud_score": 0.1, "is_fraud": "yes"})), &ctx())
            .is_none());
    }

    #[test]
    fn test_velocity_monotonicity() {
        let rule = VelocityMonotonicity;
        assert!(rule
            .evaluate(&record(json!({"velocity_1h": 10, "velocity_24h": 5})), &ctx())
            .is_some());
        assert!(rule
            .evaluate(&record(json!({"velocity_1h": 5, "velocity_24h": 5})), &ctx())
            .is_none());
        assert!(rule.evaluate(&record(json!({"velocity_1h": 10})), &ctx()).is_none());
    }

    #[test]
    fn test_timestamp_plausibility() {
        let rule = TimestampPlausibility;
        assert!(rule
            .evaluate(&record(json!({"timestamp": "2025-08-17T10:30:00Z"})), &ctx())
            .is_none());
        assert_eq!(
            rule.evaluate(&record(json!({"timestamp": "2025-09-02T00:00:00Z"})), &ctx()),
            Some("Business rule violation: timestamp cannot be in the future".into())
        );
        assert_eq!(
            rule.evaluate(&record(json!({"timestamp": "2019-01-01T00:00:00Z"})), &ctx()),
            Some("Business rule violation: timestamp is too old (>5 years)".into())
        );
        // Unparseable timestamps are left to the field validator
        assert!(rule
            .evaluate(&record(json!({"timestamp": "invalid-date"})), &ctx())
            .is_none());
    }

    #[test]
    fn test_timestamp_age_boundary() {
        let rule = TimestampPlausibility;
        let exactly = now() - Duration::days(MAX_TIMESTAMP_AGE_DAYS);
        let r = Record::new().with("timestamp", exactly);
        assert!(rule.evaluate(&r, &ctx()).is_none());

        let older = now() - Duration::days(MAX_TIMESTAMP_AGE_DAYS + 1);
        let r = Record::new().with("timestamp", older);
        assert!(rule.evaluate(&r, &ctx()).is_some());
        assert_eq!(timestamp_age(older, now()).num_days(), MAX_TIMESTAMP_AGE_DAYS + 1);
    }

    #[test]
    fn test_email_domain_extraction() {
        assert_eq!(email_domain("user@Test.COM"), "test.com");
        assert_eq!(email_domain("a@b@example.com"), "example.com");
        assert_eq!(email_domain("no-at-sign"), "");
    }

    #[test]
    fn test_email_domain_denylist() {
        let rule = EmailDomainDenylist;
        assert_eq!(
            rule.evaluate(&record(json!({"email": "user@test.com"})), &ctx()),
            Some("Business rule violation: suspicious email domain 'test.com'".into())
        );
        assert!(rule
            .evaluate(&record(json!({"email": "user@corp.io"})), &ctx())
            .is_none());
        assert!(rule.evaluate(&record(json!({"email": 42})), &ctx()).is_none());
    }

    #[test]
    fn test_extended_identity_rules() {
        assert!(MinimumAge
            .evaluate(&record(json!({"age": 17})), &ctx())
            .is_some());
        assert!(MinimumAge.evaluate(&record(json!({"age": 18})), &ctx()).is_none());

        assert!(PlaceholderName
            .evaluate(&record(json!({"first_name": "John", "last_name": "Doe"})), &ctx())
            .is_some());
        assert!(PlaceholderName
            .evaluate(&record(json!({"full_name": "Ada Lovelace"})), &ctx())
            .is_none());

        assert!(PlaceholderAddress
            .evaluate(&record(json!({"address": "123 Main St, Anytown, USA"})), &ctx())
            .is_some());
        assert!(PlaceholderAddress
            .evaluate(&record(json!({"address": {"street": "N/A"}})), &ctx())
            .is_some());
        assert!(PlaceholderAddress
            .evaluate(&record(json!({"address": "742 Evergreen Terrace"})), &ctx())
            .is_none());
    }

    #[test]
    fn test_extended_contact_rules() {
        assert!(DisposableEmail
            .evaluate(&record(json!({"email": "x@guerrillamail.com"})), &ctx())
            .is_some());
        assert!(EmailLooksPersonal
            .evaluate(&record(json!({"email": "test@test.com"})), &ctx())
            .is_some());
        assert!(EmailLooksPersonal
            .evaluate(
                &record(json!({"email": "5551234567@mail.io", "phone": "+1-555-123-4567"})),
                &ctx()
            )
            .is_some());
        assert!(EmailLooksPersonal
            .evaluate(
                &record(json!({"email": "jane@mail.io", "phone": "+1-555-123-4567"})),
                &ctx()
            )
            .is_none());
    }

    #[test]
    fn test_extended_temporal_and_geographic_rules() {
        assert!(RegistrationFloor
            .evaluate(&record(json!({"timestamp": "2019-12-31T23:59:59Z"})), &ctx())
            .is_some());
        assert!(RegistrationFloor
            .evaluate(&record(json!({"timestamp": "2020-01-01T00:00:00Z"})), &ctx())
            .is_none());

        let us = json!({"country": "US", "street": "1 Elm"});
        assert!(PhoneCountryMatch
            .evaluate(&record(json!({"address": us, "phone": "020 7946 0958"})), &ctx())
            .is_some());
        assert!(PhoneCountryMatch
            .evaluate(&record(json!({"address": us, "phone": "+1 555 123 4567"})), &ctx())
            .is_none());
    }

    #[test]
    fn test_rule_set_order_and_kinds() {
        let standard = BusinessRuleSet::standard();
        assert_eq!(
            standard.rule_names(),
            vec![
                "fraud_score_consistency",
                "velocity_monotonicity",
                "timestamp_plausibility",
                "email_domain_denylist"
            ]
        );
        assert_eq!(BusinessRuleSet::extended().len(), 11);
        assert!(BusinessRuleSet::from(RuleSetKind::None).is_empty());
        assert_eq!(BusinessRuleSet::from(RuleSetKind::Standard).len(), 4);
    }

    #[test]
    fn test_rule_set_reports_in_fixed_order() {
        let r = record(json!({
            "email": "user@fake.com",
            "fraud_score": 0.1,
            "is_fraud": true,
            "velocity_1h": 10,
            "velocity_24h": 5,
            "timestamp": "2030-01-01T00:00:00Z"
        }));
        let errors = BusinessRuleSet::standard().evaluate(&r, now());
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("fraud_score"));
        assert!(errors[1].contains("velocity_1h"));
        assert!(errors[2].contains("future"));
        assert!(errors[3].contains("fake.com"));
    }

    #[derive(Debug)]
    struct NoVpn;

    impl BusinessRule for NoVpn {
        fn name(&self) -> &str {
            "no_vpn"
        }

        fn explanation(&self) -> &str {
            "vpn flag must be false"
        }

        fn evaluate(&self, record: &Record, _ctx: &RuleContext) -> Option<String> {
            record
                .get_present("vpn")?
                .as_bool()?
                .then(|| "Business rule violation: vpn in use".to_string())
        }
    }

    #[test]
    fn test_custom_rule_extends_set() {
        let rules = BusinessRuleSet::standard().with_rule(NoVpn);
        let errors = rules.evaluate(&record(json!({"vpn": true})), now());
        assert_eq!(errors, vec!["Business rule violation: vpn in use"]);
        assert_eq!(rules.rules().last().map(|r| r.explanation()), Some("vpn flag must be false"));
    }
}
