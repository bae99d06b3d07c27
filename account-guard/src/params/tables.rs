//! Static parameter data for synthetic fraud generation.

use super::DifficultyTier::{T1, T2, T3};
use super::PatternConfig;

/// One tunable parameter with its `[T1, T2, T3]` ranges.
#[derive(Debug)]
pub(crate) struct ParamSpec {
    pub name: &'static str,
    pub tiers: [(f64, f64); 3],
}

#[derive(Debug)]
pub(crate) struct Category {
    pub name: &'static str,
    pub params: &'static [ParamSpec],
}

const fn param(name: &'static str, tiers: [(f64, f64); 3]) -> ParamSpec {
    ParamSpec { name, tiers }
}

pub(crate) static CATEGORIES: &[Category] = &[
    Category {
        name: "velocity",
        params: &[
            param("accounts_per_hour", [(10.0, 50.0), (3.0, 10.0), (1.0, 3.0)]),
            param("accounts_per_ip", [(20.0, 100.0), (5.0, 20.0), (2.0, 5.0)]),
            param("accounts_per_device", [(15.0, 50.0), (3.0, 15.0), (2.0, 3.0)]),
        ],
    },
    Category {
        name: "temporal",
        params: &[
            // seconds
            param(
                "registration_burst_duration",
                [(60.0, 300.0), (300.0, 1800.0), (1800.0, 7200.0)],
            ),
            param(
                "inter_registration_gap",
                [(5.0, 30.0), (30.0, 300.0), (300.0, 3600.0)],
            ),
            param("time_of_day_clustering", [(0.8, 1.0), (0.5, 0.8), (0.3, 0.5)]),
        ],
    },
    Category {
        name: "device_patterns",
        params: &[
            param("device_reuse_rate", [(0.7, 0.9), (0.3, 0.7), (0.1, 0.3)]),
            param("user_agent_diversity", [(1.0, 3.0), (3.0, 10.0), (10.0, 50.0)]),
            param(
                "screen_resolution_diversity",
                [(1.0, 2.0), (2.0, 5.0), (5.0, 15.0)],
            ),
        ],
    },
    Category {
        name: "network_patterns",
        params: &[
            param("ip_subnet_clustering", [(0.8, 1.0), (0.4, 0.8), (0.1, 0.4)]),
            param("proxy_vpn_usage_rate", [(0.8, 1.0), (0.3, 0.8), (0.1, 0.3)]),
            param("geolocation_consistency", [(0.1, 0.3), (0.3, 0.7), (0.7, 0.9)]),
        ],
    },
    Category {
        name: "identity_patterns",
        params: &[
            param("synthetic_identity_rate", [(0.8, 1.0), (0.4, 0.8), (0.1, 0.4)]),
            param("pii_field_consistency", [(0.2, 0.5), (0.5, 0.8), (0.8, 0.95)]),
            param(
                "email_phone_mismatch_rate",
                [(0.6, 0.9), (0.2, 0.6), (0.05, 0.2)],
            ),
        ],
    },
    Category {
        name: "behavioral_patterns",
        params: &[
            param("immediate_activity_rate", [(0.8, 1.0), (0.4, 0.8), (0.1, 0.4)]),
            param("session_duration_variance", [(0.1, 0.3), (0.3, 0.7), (0.7, 1.0)]),
        ],
    },
];

pub(crate) static PATTERNS: &[PatternConfig] = &[
    PatternConfig {
        name: "synthetic_identity",
        description: "Fake person with mixed real/fake credentials",
        params: &[
            ("velocity.accounts_per_hour", T2),
            ("identity_patterns.synthetic_identity_rate", T1),
            ("identity_patterns.email_phone_mismatch_rate", T1),
            ("device_patterns.device_reuse_rate", T2),
            ("network_patterns.proxy_vpn_usage_rate", T2),
        ],
        weight: 0.3,
    },
    PatternConfig {
        name: "account_farming",
        description: "Multiple accounts from same source rapidly",
        params: &[
            ("velocity.accounts_per_hour", T1),
            ("velocity.accounts_per_ip", T1),
            ("temporal.registration_burst_duration", T1),
            ("device_patterns.device_reuse_rate", T1),
            ("network_patterns.ip_subnet_clustering", T1),
        ],
        weight: 0.4,
    },
    PatternConfig {
        name: "sophisticated_evasion",
        description: "Advanced fraud with evasion techniques",
        params: &[
            ("velocity.accounts_per_hour", T3),
            ("temporal.inter_registration_gap", T3),
            ("device_patterns.user_agent_diversity", T3),
            ("network_patterns.proxy_vpn_usage_rate", T3),
            ("identity_patterns.pii_field_consistency", T3),
            ("behavioral_patterns.session_duration_variance", T3),
        ],
        weight: 0.2,
    },
    PatternConfig {
        name: "dormant_sleeper",
        description: "Accounts that register but remain inactive initially",
        params: &[
            ("velocity.accounts_per_hour", T3),
            ("behavioral_patterns.immediate_activity_rate", T1),
            ("identity_patterns.pii_field_consistency", T2),
            ("device_patterns.device_reuse_rate", T3),
        ],
        weight: 0.1,
    },
];
