use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use crate::analytics::date::{local_midnight, parse_instant};
use crate::records::snapshot::RecordSet;
use crate::records::types::{MAX_AMOUNT, Transaction, within_amount_limit};
use crate::{ClientError, ClientResult};

pub const CSV_HEADERS: [&str; 6] = [
    "id",
    "timestamp",
    "amount",
    "category",
    "merchant",
    "account_id",
];

/// Reads a transaction CSV from disk into a record set.
pub fn load_path(path: &Path, offset: FixedOffset) -> ClientResult<RecordSet> {
    let location = path.display().to_string();
    let content = fs::read_to_string(path)
        .map_err(|error| ClientError::source_unreadable(&location, &error.to_string()))?;
    parse_transactions(&content, offset).map(|transactions| RecordSet {
        transactions,
        ..RecordSet::default()
    })
}

/// Parses transaction rows. `timestamp` accepts RFC 3339 or a bare
/// `YYYY-MM-DD`, which is read as local midnight in the reference timezone.
pub fn parse_transactions(content: &str, offset: FixedOffset) -> ClientResult<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| ClientError::store_corrupt(&format!("CSV header row: {error}")))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<String>>();

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect::<HashMap<String, usize>>();

    let missing = CSV_HEADERS
        .iter()
        .filter(|name| !index_by_name.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect::<Vec<String>>();
    if !missing.is_empty() {
        return Err(ClientError::store_corrupt(&format!(
            "CSV is missing required headers: {}",
            missing.join(", ")
        ))
        .with_data(serde_json::json!({
            "required_headers": CSV_HEADERS,
            "actual_headers": headers,
        })));
    }

    let mut transactions = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let row = row_index + 1;
        let record = result_row
            .map_err(|error| ClientError::source_row_invalid(row, "*", &error.to_string()))?;
        let field = |name: &str| -> ClientResult<String> {
            let value = index_by_name
                .get(name)
                .and_then(|index| record.get(*index))
                .unwrap_or("")
                .to_string();
            if value.is_empty() {
                return Err(ClientError::source_row_invalid(row, name, "value is empty"));
            }
            Ok(value)
        };

        let raw_timestamp = field("timestamp")?;
        let timestamp = parse_timestamp(&raw_timestamp, offset).ok_or_else(|| {
            ClientError::source_row_invalid(
                row,
                "timestamp",
                &format!("`{raw_timestamp}` is neither RFC 3339 nor YYYY-MM-DD"),
            )
        })?;

        let raw_amount = field("amount")?;
        let amount = raw_amount.parse::<Decimal>().map_err(|_| {
            ClientError::source_row_invalid(
                row,
                "amount",
                &format!("`{raw_amount}` is not a decimal number"),
            )
        })?;
        if !within_amount_limit(amount) {
            return Err(ClientError::source_row_invalid(
                row,
                "amount",
                &format!("`{raw_amount}` exceeds the {MAX_AMOUNT} limit"),
            ));
        }

        transactions.push(Transaction {
            id: field("id")?,
            timestamp,
            amount,
            category: field("category")?.to_ascii_lowercase(),
            merchant: field("merchant")?,
            account_id: field("account_id")?,
        });
    }

    Ok(transactions)
}

fn parse_timestamp(value: &str, offset: FixedOffset) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Some(instant) = parse_instant(value) {
        return Some(instant);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| local_midnight(date, offset))
}
