use rust_decimal::Decimal;

use crate::analytics::buckets::{BucketMap, SpendBucket};
use crate::records::types::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpend {
    pub bucket: SpendBucket,
    /// Net spend: outflows positive, refunds reduce it.
    pub total: Decimal,
    pub count: usize,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryVsRestaurant {
    pub grocery: BucketSpend,
    pub restaurant: BucketSpend,
}

impl GroceryVsRestaurant {
    /// Grocery share of the combined spend, or `None` when nothing was spent.
    pub fn grocery_share(&self) -> Option<Decimal> {
        let combined = self.grocery.total + self.restaurant.total;
        if combined.is_zero() {
            return None;
        }
        Some(self.grocery.total / combined)
    }
}

/// Grocery and restaurant spend over already-filtered transactions.
pub fn build_grocery_vs_restaurant(
    transactions: &[Transaction],
    map: &BucketMap,
) -> GroceryVsRestaurant {
    GroceryVsRestaurant {
        grocery: bucket_spend(transactions, map, SpendBucket::Grocery),
        restaurant: bucket_spend(transactions, map, SpendBucket::Restaurant),
    }
}

fn bucket_spend(transactions: &[Transaction], map: &BucketMap, bucket: SpendBucket) -> BucketSpend {
    let members = transactions
        .iter()
        .filter(|transaction| map.bucket_for(&transaction.category) == Some(bucket))
        .collect::<Vec<&Transaction>>();

    BucketSpend {
        bucket,
        total: Decimal::ZERO
            - members
                .iter()
                .map(|transaction| transaction.amount)
                .sum::<Decimal>(),
        count: members.len(),
        tags: map
            .tags_for(bucket)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}
