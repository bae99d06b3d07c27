//! Throughput benchmarks for record and batch validation.

use account_guard::constraints::BusinessRuleSet;
use account_guard::core::{Record, RecordValidator, Schema};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use std::sync::Arc;

fn base_record() -> Record {
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

/// Deterministic batch where every tenth record breaks a field and every
/// seventh breaks a rule.
fn create_batch(size: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            let mut record =
                base_record().with("user_id", format!("550e8400-e29b-41d4-a716-{i:012x}"));
            if i % 10 == 0 {
                record.insert("email", "not-an-email");
            }
            if i % 7 == 0 {
                record.insert("velocity_1h", 50);
            }
            record
        })
        .collect()
}

fn bench_single_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_record");
    let record = base_record();

    for (name, rules) in [
        ("no_rules", BusinessRuleSet::empty()),
        ("standard_rules", BusinessRuleSet::standard()),
        ("extended_rules", BusinessRuleSet::extended()),
    ] {
        let validator = RecordValidator::builder()
            .schema(Schema::account_opening())
            .rules(rules)
            .build()
            .unwrap();
        group.bench_function(name, |b| {
            b.iter(|| std::hint::black_box(validator.validate_record(&record)))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let validator = Arc::new(RecordValidator::new(Schema::account_opening()));

    for size in [100, 1_000, 10_000] {
        let records = create_batch(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &records, |b, records| {
            b.iter(|| std::hint::black_box(validator.validate_batch(records).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &records, |b, records| {
            b.iter(|| {
                runtime.block_on(async {
                    std::hint::black_box(
                        validator
                            .validate_batch_parallel(records.clone())
                            .await
                            .unwrap(),
                    )
                })
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_record, bench_batch);
criterion_main!(benches);
