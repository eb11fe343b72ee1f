#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tallyboard_client::config::EngineConfig;
use tallyboard_client::records::snapshot::RecordSet;
use tallyboard_client::records::store::SnapshotStore;
use tallyboard_client::records::types::Transaction;
use tallyboard_client::{BundleOptions, ClientResult, SuccessEnvelope};
use tempfile::{Builder, TempDir};

pub type BundleCommand = fn(BundleOptions<'_>) -> ClientResult<SuccessEnvelope>;

/// Local midnight (UTC reference) used as `now` by every scenario.
pub fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn days_before(days: i64, hours_after: i64) -> DateTime<Utc> {
    midnight() - Duration::days(days) + Duration::hours(hours_after)
}

pub fn transaction(id: &str, timestamp: DateTime<Utc>, cents: i64, category: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        timestamp,
        amount: Decimal::new(cents, 2),
        category: category.to_string(),
        merchant: format!("{category} merchant"),
        account_id: "acct_card".to_string(),
    }
}

pub fn store_with(transactions: Vec<Transaction>) -> Option<SnapshotStore> {
    let store = SnapshotStore::with_records(RecordSet {
        transactions,
        ..RecordSet::default()
    });
    assert!(store.is_ok());
    store.ok()
}

pub fn fixture_store() -> Option<SnapshotStore> {
    let store = SnapshotStore::from_fixture(&EngineConfig::default(), midnight());
    assert!(store.is_ok());
    store.ok()
}

pub fn options<'a>(
    store: &'a SnapshotStore,
    config: &'a EngineConfig,
    filter: Option<&'a str>,
) -> BundleOptions<'a> {
    BundleOptions {
        filter,
        now: Some(midnight()),
        store: Some(store),
        config: Some(config),
    }
}

/// Runs `command` against `store` and returns the serialized envelope.
pub fn payload(command: BundleCommand, store: &SnapshotStore, filter: Option<&str>) -> Value {
    let config = EngineConfig::default();
    envelope_json(command(options(store, &config, filter)))
}

pub fn envelope_json(result: ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok());
    if let Ok(success) = result {
        let value = serde_json::to_value(success);
        assert!(value.is_ok());
        if let Ok(value) = value {
            return value;
        }
    }
    Value::Null
}

pub fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

pub fn assert_close(value: &Value, expected: f64) {
    let actual = number(value);
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn temp_dir(prefix: &str) -> std::io::Result<TempDir> {
    Builder::new().prefix(prefix).tempdir()
}

pub fn write_csv(base: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    let path = base.join(name);
    fs::write(&path, body)?;
    Ok(path)
}
