//! Fraud-pattern parameter lookups as a record generator would use them.

use account_guard::params::{
    lookup, param_range, parameter_paths, pattern, pattern_params, pattern_weight, patterns,
    DifficultyTier, ParamRange,
};
use account_guard::prelude::*;

#[test]
fn test_every_pattern_resolves_all_its_parameters() {
    for config in patterns() {
        let params = pattern_params(config.name).unwrap();
        assert_eq!(params.len(), config.params.len(), "{}", config.name);

        for (path, range) in params {
            assert!(range.min <= range.max, "{}: {path}", config.name);
            assert_eq!(param_range(config.name, path, None).unwrap(), range);
        }
    }
}

#[test]
fn test_override_matches_direct_lookup() {
    for path in parameter_paths() {
        for tier in DifficultyTier::ALL {
            assert_eq!(
                param_range("account_farming", &path, Some(tier)).unwrap(),
                lookup(&path, tier).unwrap(),
                "{path} {tier}"
            );
        }
    }
}

#[test]
fn test_known_ranges() {
    assert_eq!(
        lookup("temporal.inter_registration_gap", DifficultyTier::T3).unwrap(),
        ParamRange::new(300.0, 3600.0)
    );
    assert_eq!(
        param_range("dormant_sleeper", "behavioral_patterns.immediate_activity_rate", None)
            .unwrap(),
        ParamRange::new(0.8, 1.0)
    );
    assert_eq!(
        param_range("sophisticated_evasion", "identity_patterns.pii_field_consistency", None)
            .unwrap(),
        ParamRange::new(0.8, 0.95)
    );
}

#[test]
fn test_pattern_metadata() {
    let farming = pattern("account_farming").unwrap();
    assert_eq!(farming.description, "Multiple accounts from same source rapidly");
    assert_eq!(
        farming.tier_for("velocity.accounts_per_ip"),
        Some(DifficultyTier::T1)
    );
    assert_eq!(farming.tier_for("temporal.inter_registration_gap"), None);

    let names: Vec<&str> = patterns().iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        vec![
            "synthetic_identity",
            "account_farming",
            "sophisticated_evasion",
            "dormant_sleeper"
        ]
    );
    assert_eq!(pattern_weight("dormant_sleeper").unwrap(), 0.1);
}

#[test]
fn test_lookup_errors_are_configuration_errors() {
    let unknown = pattern_params("bust_out").unwrap_err();
    assert_eq!(unknown.to_string(), "Unknown fraud pattern: bust_out");
    assert!(unknown.is_configuration());

    let unconfigured =
        param_range("account_farming", "temporal.inter_registration_gap", None).unwrap_err();
    assert_eq!(
        unconfigured.to_string(),
        "Parameter temporal.inter_registration_gap not defined for pattern account_farming"
    );

    let bad_path = lookup("velocity", DifficultyTier::T1).unwrap_err();
    assert!(matches!(bad_path, GuardError::ParameterPathNotFound(_)));
    assert_eq!(bad_path.to_string(), "Parameter path velocity not found");
}

#[test]
fn test_tiers_from_config_strings() {
    let tiers: Vec<DifficultyTier> = ["t1", "T2", " t3"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(tiers, DifficultyTier::ALL);

    let range = param_range(
        "synthetic_identity",
        "velocity.accounts_per_hour",
        Some("T3".parse().unwrap()),
    )
    .unwrap();
    assert_eq!(range, ParamRange::new(1.0, 3.0));
}
