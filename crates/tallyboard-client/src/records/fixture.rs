//! Deterministic sample corpus.
//!
//! The same seed, day count, offset and anchor instant always produce the
//! same records, so fixture-backed output is reproducible across runs.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::analytics::date::{local_at, local_date};
use crate::config::EngineConfig;
use crate::records::snapshot::RecordSet;
use crate::records::types::{AccountBalance, AccountKind, Receipt, ReceiptItem, Transaction};

const CHECKING: &str = "acct_checking";
const SAVINGS: &str = "acct_savings";
const CREDIT_CARD: &str = "acct_credit_card";

const GROCERS: [&str; 3] = ["Whole Foods", "Trader Joe's", "Corner Market"];
const RESTAURANTS: [&str; 4] = ["Luigi's Trattoria", "Sushi Go", "Taco Stand", "Blue Bottle"];
const RESTAURANT_CATEGORIES: [&str; 4] = ["restaurants", "restaurants", "fast_food", "coffee"];
const ENTERTAINMENT: [&str; 2] = ["Cinema City", "Steam"];
const PANTRY: [(&str, &str); 8] = [
    ("Milk", "dairy"),
    ("Sourdough", "bakery"),
    ("Apples", "produce"),
    ("Chicken Thighs", "meat"),
    ("Spinach", "produce"),
    ("Cheddar", "dairy"),
    ("Pasta", "pantry"),
    ("Coffee Beans", "pantry"),
];

#[derive(Debug, Clone, Copy)]
enum Stream {
    Salary,
    Utilities,
    Groceries,
    Restaurants,
    Entertainment,
    SavingsTransfer,
    ReceiptItems,
}

impl Stream {
    const fn salt(self) -> u64 {
        match self {
            Self::Salary => 1,
            Self::Utilities => 3,
            Self::Groceries => 4,
            Self::Restaurants => 5,
            Self::Entertainment => 6,
            Self::SavingsTransfer => 7,
            Self::ReceiptItems => 8,
        }
    }
}

struct Draft {
    timestamp: DateTime<Utc>,
    amount: Decimal,
    category: &'static str,
    merchant: &'static str,
    account_id: &'static str,
    receipt_seed: Option<u64>,
}

/// Generates `config.fixture_days` days of history ending strictly before `now`.
pub fn generate(config: &EngineConfig, now: DateTime<Utc>) -> RecordSet {
    let offset = config.reference_offset;
    let today = local_date(now, offset);
    let mut drafts: Vec<Draft> = Vec::new();

    for back in (0..i64::from(config.fixture_days)).rev() {
        let date = today - Duration::days(back);
        let day_index = u64::from(date.num_days_from_ce().unsigned_abs());
        drafts.extend(drafts_for_day(config.seed, day_index, date, offset));
    }

    drafts.retain(|draft| draft.timestamp < now);
    drafts.sort_by_key(|draft| draft.timestamp);

    let mut transactions = Vec::with_capacity(drafts.len());
    let mut receipts = Vec::new();
    for (index, draft) in drafts.into_iter().enumerate() {
        let id = format!("txn_{:05}", index + 1);
        if let Some(receipt_seed) = draft.receipt_seed {
            receipts.push(receipt_for(
                &format!("rcp_{:05}", receipts.len() + 1),
                draft.timestamp,
                -draft.amount,
                receipt_seed,
            ));
        }
        transactions.push(Transaction {
            id,
            timestamp: draft.timestamp,
            amount: draft.amount,
            category: draft.category.to_string(),
            merchant: draft.merchant.to_string(),
            account_id: draft.account_id.to_string(),
        });
    }

    let balances = balances_for(&transactions);
    RecordSet {
        transactions,
        receipts,
        balances,
    }
}

fn drafts_for_day(seed: u64, day_index: u64, date: NaiveDate, offset: FixedOffset) -> Vec<Draft> {
    let at = |hour: u32, minute: u32| {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        local_at(date.and_time(time), offset)
    };
    let mut drafts = Vec::new();

    if day_index % 14 == 0 {
        drafts.push(Draft {
            timestamp: at(8, 0),
            amount: cents_between(seed, day_index, Stream::Salary, 245_000, 252_000),
            category: "income",
            merchant: "Acme Payroll",
            account_id: CHECKING,
            receipt_seed: None,
        });
    }

    if day_index % 14 == 1 {
        let amount = cents_between(seed, day_index, Stream::SavingsTransfer, 20_000, 45_000);
        drafts.push(Draft {
            timestamp: at(9, 0),
            amount: -amount,
            category: "transfer",
            merchant: "Savings Transfer",
            account_id: CHECKING,
            receipt_seed: None,
        });
        drafts.push(Draft {
            timestamp: at(9, 1),
            amount,
            category: "transfer",
            merchant: "Savings Transfer",
            account_id: SAVINGS,
            receipt_seed: None,
        });
    }

    if date.day() == 1 {
        drafts.push(Draft {
            timestamp: at(7, 30),
            amount: Decimal::new(-165_000, 2),
            category: "housing",
            merchant: "Parkview Apartments",
            account_id: CHECKING,
            receipt_seed: None,
        });
    }

    if date.day() == 15 {
        drafts.push(Draft {
            timestamp: at(10, 15),
            amount: -cents_between(seed, day_index, Stream::Utilities, 8_000, 16_000),
            category: "utilities",
            merchant: "City Power & Water",
            account_id: CHECKING,
            receipt_seed: None,
        });
    }

    if day_index % 3 == 0 {
        let pick = mix(seed, day_index, Stream::Groceries);
        drafts.push(Draft {
            timestamp: at(17, 40),
            amount: -cents_between(seed, day_index, Stream::Groceries, 3_500, 14_000),
            category: "groceries",
            merchant: GROCERS[index_for(pick, GROCERS.len())],
            account_id: CREDIT_CARD,
            receipt_seed: Some(mix(seed, day_index, Stream::ReceiptItems)),
        });
    }

    if day_index % 4 == 2 {
        let pick = index_for(mix(seed, day_index, Stream::Restaurants), RESTAURANTS.len());
        drafts.push(Draft {
            timestamp: at(19, 20),
            amount: -cents_between(seed, day_index, Stream::Restaurants, 1_200, 7_500),
            category: RESTAURANT_CATEGORIES[pick],
            merchant: RESTAURANTS[pick],
            account_id: CREDIT_CARD,
            receipt_seed: None,
        });
    }

    if day_index % 7 == 5 {
        let pick = mix(seed, day_index, Stream::Entertainment);
        drafts.push(Draft {
            timestamp: at(21, 0),
            amount: -cents_between(seed, day_index, Stream::Entertainment, 1_000, 6_000),
            category: "entertainment",
            merchant: ENTERTAINMENT[index_for(pick, ENTERTAINMENT.len())],
            account_id: CREDIT_CARD,
            receipt_seed: None,
        });
    }

    drafts
}

fn receipt_for(id: &str, timestamp: DateTime<Utc>, total: Decimal, seed: u64) -> Receipt {
    let item_count = 2 + index_for(seed, 3);
    let cents = (total * Decimal::ONE_HUNDRED).round().to_i64().unwrap_or(0);
    let count = i64::try_from(item_count).unwrap_or(1);
    let share = cents / count;

    let items = (0..item_count)
        .map(|position| {
            let rotation = u32::try_from(position).unwrap_or(0) * 7;
            let (name, category) = PANTRY[index_for(seed.rotate_left(rotation), PANTRY.len())];
            let is_last = position + 1 == item_count;
            let price_cents = if is_last {
                cents - share * (count - 1)
            } else {
                share
            };
            ReceiptItem {
                name: name.to_string(),
                category: category.to_string(),
                price: Decimal::new(price_cents, 2),
            }
        })
        .collect::<Vec<ReceiptItem>>();

    let total = items.iter().map(|item| item.price).sum();
    Receipt {
        id: id.to_string(),
        timestamp,
        items,
        total,
    }
}

fn balances_for(transactions: &[Transaction]) -> Vec<AccountBalance> {
    let accounts = [
        (CHECKING, "Everyday Checking", AccountKind::Checking, 320_000),
        (SAVINGS, "Rainy Day Savings", AccountKind::Savings, 800_000),
        (CREDIT_CARD, "Rewards Card", AccountKind::CreditCard, -45_000),
    ];

    accounts
        .iter()
        .map(|(account_id, name, kind, opening_cents)| {
            let movement: Decimal = transactions
                .iter()
                .filter(|transaction| transaction.account_id == *account_id)
                .map(|transaction| transaction.amount)
                .sum();
            AccountBalance {
                account_id: (*account_id).to_string(),
                name: (*name).to_string(),
                kind: *kind,
                balance: Decimal::new(*opening_cents, 2) + movement,
            }
        })
        .collect()
}

fn cents_between(seed: u64, day_index: u64, stream: Stream, min: i64, max: i64) -> Decimal {
    let span = u64::try_from(max - min + 1).unwrap_or(1);
    let jitter = i64::try_from(mix(seed, day_index, stream) % span).unwrap_or(0);
    Decimal::new(min + jitter, 2)
}

fn index_for(hash: u64, len: usize) -> usize {
    let len_u64 = u64::try_from(len).unwrap_or(1).max(1);
    usize::try_from(hash % len_u64).unwrap_or(0)
}

// splitmix64 finalizer over (seed, day, stream)
fn mix(seed: u64, day_index: u64, stream: Stream) -> u64 {
    let mut z = seed
        ^ day_index.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ stream.salt().wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::generate;
    use crate::config::EngineConfig;
    use crate::records::snapshot::Snapshot;

    fn config(seed: u64, days: u32) -> EngineConfig {
        EngineConfig {
            seed,
            fixture_days: days,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn same_seed_produces_identical_records() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).single();
        assert!(now.is_some());
        if let Some(value) = now {
            let first = generate(&config(9, 120), value);
            let second = generate(&config(9, 120), value);
            assert_eq!(first.transactions, second.transactions);
            assert_eq!(first.receipts, second.receipts);
        }
    }

    #[test]
    fn records_are_chronological_and_before_now() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).single();
        assert!(now.is_some());
        if let Some(value) = now {
            let records = generate(&config(42, 60), value);
            assert!(!records.transactions.is_empty());
            assert!(records.transactions.iter().all(|row| row.timestamp < value));
            assert!(
                records
                    .transactions
                    .windows(2)
                    .all(|pair| pair[0].timestamp <= pair[1].timestamp)
            );
        }
    }

    #[test]
    fn generated_corpus_passes_snapshot_validation() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).single();
        assert!(now.is_some());
        if let Some(value) = now {
            let records = generate(&config(3, 400), value);
            assert!(!records.receipts.is_empty());
            assert_eq!(records.balances.len(), 3);
            assert!(Snapshot::build(1, records).is_ok());
        }
    }
}
