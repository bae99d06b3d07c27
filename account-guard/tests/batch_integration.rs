//! Batch aggregation, parallel validation and report rendering.

mod common;

use account_guard::core::{Record, RecordValidator, Schema};
use account_guard::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, ResultFormatter,
};
use account_guard::prelude::*;
use common::{eval_time, valid_batch, valid_record};
use std::sync::Arc;

fn validator() -> RecordValidator {
    RecordValidator::new(Schema::account_opening())
}

/// Three valid records, one broken by a rule, one by a field, one with a
/// stray field.
fn mixed_batch() -> Vec<Record> {
    let mut batch = valid_batch(3);
    batch.push(valid_record().with("velocity_1h", 10).with("velocity_24h", 5));
    batch.push(valid_record().with("email", "not-an-email"));
    batch.push(valid_record().with("campaign", "spring"));
    batch
}

#[test]
fn test_batch_counts() {
    let summary = validator()
        .validate_batch_at(&mixed_batch(), eval_time())
        .unwrap();

    assert_eq!(summary.total_records(), 6);
    assert_eq!(summary.valid_records(), 4);
    assert_eq!(summary.invalid_records(), 2);
    assert_eq!(summary.total_errors(), 2);
    assert_eq!(summary.total_warnings(), 1);
    assert!((summary.validation_rate() - 4.0 / 6.0).abs() < 1e-9);
    assert!((summary.error_rate() - 2.0 / 6.0).abs() < 1e-9);
    assert_eq!(summary.invalid_indices(), vec![3, 4]);
    assert!(!summary.all_valid());
}

#[test]
fn test_per_record_outcomes_keep_input_order() {
    let summary = validator()
        .validate_batch_at(&mixed_batch(), eval_time())
        .unwrap();
    let indices: Vec<usize> = summary.per_record().iter().map(|r| r.index).collect();
    assert_eq!(indices, (0..6).collect::<Vec<_>>());

    let failing = &summary.per_record()[4];
    assert_eq!(failing.errors, vec!["email: Invalid type. Expected email"]);
    assert_eq!(
        summary.per_record()[5].warnings,
        vec!["campaign: Unexpected field not in schema"]
    );
}

#[test]
fn test_empty_batch_is_rejected() {
    let err = validator().validate_batch_at(&[], eval_time()).unwrap_err();
    assert!(matches!(err, GuardError::EmptyBatch));
}

#[test]
fn test_all_invalid_batch() {
    let summary = validator()
        .validate_batch_at(&[Record::new(), Record::new()], eval_time())
        .unwrap();
    assert_eq!(summary.valid_records(), 0);
    assert_eq!(summary.validation_rate(), 0.0);
    // Every required field of the account-opening schema
    assert_eq!(summary.total_errors(), 2 * 10);
}

#[tokio::test]
async fn test_parallel_batch_matches_sequential() {
    let validator = Arc::new(
        RecordValidator::builder()
            .schema(Schema::account_opening())
            .parallelism(4)
            .build()
            .unwrap(),
    );

    let mut records = valid_batch(37);
    records[5] = records[5].clone().with("account_type", "gold");
    records[30] = records[30].clone().with("email", "a@example.com");

    let sequential = validator.validate_batch_at(&records, eval_time()).unwrap();
    let parallel = validator
        .validate_batch_parallel_at(records, eval_time())
        .await
        .unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.invalid_indices(), vec![5, 30]);
}

#[tokio::test]
async fn test_parallel_batch_smaller_than_workers() {
    let validator = Arc::new(
        RecordValidator::builder()
            .schema(Schema::account_opening())
            .parallelism(16)
            .build()
            .unwrap(),
    );

    let summary = validator
        .validate_batch_parallel_at(valid_batch(3), eval_time())
        .await
        .unwrap();
    assert_eq!(summary.total_records(), 3);
    assert!(summary.all_valid());
}

#[tokio::test]
async fn test_parallel_empty_batch_is_rejected() {
    let validator = Arc::new(validator());
    let result = validator
        .validate_batch_parallel_at(Vec::new(), eval_time())
        .await;
    assert!(matches!(result, Err(GuardError::EmptyBatch)));
}

#[test]
fn test_json_report() {
    let summary = validator()
        .validate_batch_at(&mixed_batch(), eval_time())
        .unwrap();
    let output = JsonFormatter::new().format(&summary).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["status"], "failure");
    assert_eq!(report["total_records"], 6);
    assert_eq!(report["invalid_records"], 2);

    // Default config lists failures only
    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["index"], 3);
    assert_eq!(
        records[0]["errors"][0],
        "business_rules: Business rule violation: velocity_1h cannot exceed velocity_24h"
    );
}

#[test]
fn test_json_report_truncation() {
    let summary = validator()
        .validate_batch_at(&mixed_batch(), eval_time())
        .unwrap();
    let config = FormatterConfig::detailed().with_max_records(2);
    let output = JsonFormatter::with_config(config)
        .with_pretty(false)
        .format(&summary)
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["records"].as_array().unwrap().len(), 2);
    assert_eq!(report["omitted_records"], 4);
    assert!(!output.contains('\n'));
}

#[test]
fn test_human_report() {
    let summary = validator()
        .validate_batch_at(&valid_batch(2), eval_time())
        .unwrap();
    let output = HumanFormatter::with_config(FormatterConfig::ci())
        .format(&summary)
        .unwrap();

    assert!(output.contains("Validation PASSED"));
    assert!(output.contains("Total Records: 2"));
    assert!(output.contains("Validation Rate: 100.0%"));
    assert!(!output.contains("\x1b["));
}

#[test]
fn test_markdown_report() {
    let summary = validator()
        .validate_batch_at(&mixed_batch(), eval_time())
        .unwrap();
    let output = MarkdownFormatter::new()
        .with_heading_level(3)
        .format(&summary)
        .unwrap();

    assert!(output.starts_with("### ❌ Batch Validation - FAILED"));
    assert!(output.contains("| Validation Rate | 66.7% |"));
    assert!(output.contains("#### Records"));
    assert!(output.contains("| 4 | no | email: Invalid type. Expected email |"));
}

#[test]
fn test_minimal_config_hides_records() {
    let summary = validator()
        .validate_batch_at(&mixed_batch(), eval_time())
        .unwrap();
    let output = MarkdownFormatter::new()
        .format_with_config(&summary, &FormatterConfig::minimal())
        .unwrap();
    assert!(!output.contains("Records\n"));
}
