use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::analytics::buckets::{BucketMap, SpendBucket};
use crate::records::types::Transaction;

/// One category tag as it appears in the filtered records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTag {
    pub category: String,
    pub bucket: Option<SpendBucket>,
    pub count: usize,
    pub net_total: Decimal,
}

pub fn category_tags(transactions: &[Transaction], map: &BucketMap) -> Vec<CategoryTag> {
    let mut by_category: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
    for transaction in transactions {
        let entry = by_category
            .entry(transaction.category.as_str())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += transaction.amount;
    }

    by_category
        .into_iter()
        .map(|(category, (count, net_total))| CategoryTag {
            category: category.to_string(),
            bucket: map.bucket_for(category),
            count,
            net_total,
        })
        .collect()
}

/// Copies `records` newest first; equal timestamps fall back to id order.
pub fn newest_first(records: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|left, right| {
        right
            .timestamp
            .cmp(&left.timestamp)
            .then_with(|| left.id.cmp(&right.id))
    });
    sorted
}
