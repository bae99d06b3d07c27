//! Shared fixtures for integration tests.

#![allow(dead_code)]

use account_guard::core::Record;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

/// Fixed evaluation clock so time-dependent rules are reproducible.
pub fn eval_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
}

/// A record that passes the account-opening schema and the standard rules
/// at [`eval_time`].
pub fn valid_record() -> Record {
    Record::try_from(json!({
        "user_id": "550e8400-e29b-41d4-a716-446655440000",
        "email": "jane.roe@corp.io",
        "phone": "+1-555-123-4567",
        "first_name": "Jane",
        "last_name": "Roe",
        "address": "742 Evergreen Terrace, Springfield",
        "ip_address": "192.168.1.1",
        "device_fingerprint": "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4",
        "timestamp": "2025-08-17T10:30:00Z",
        "account_type": "personal",
        "fraud_score": 0.1,
        "is_fraud": false,
        "velocity_1h": 1,
        "velocity_24h": 3
    }))
    .unwrap()
}

/// `count` valid records with distinct user ids.
pub fn valid_batch(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            valid_record().with(
                "user_id",
                format!("550e8400-e29b-41d4-a716-{i:012x}"),
            )
        })
        .collect()
}
