use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Largest accepted magnitude for any single amount, price or balance
/// (one trillion). Sums over a snapshot stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

pub fn within_amount_limit(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

/// Anything the filter engine can place on the timeline.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Signed: negative is money out, positive is money in.
    pub amount: Decimal,
    pub category: String,
    pub merchant: String,
    pub account_id: String,
}

impl Transaction {
    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_inflow(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}

impl Timestamped for Transaction {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptItem {
    pub name: String,
    pub category: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<ReceiptItem>,
    pub total: Decimal,
}

impl Receipt {
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|item| item.price).sum()
    }
}

impl Timestamped for Receipt {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
}

impl AccountKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::CreditCard => "credit_card",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: String,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{MAX_AMOUNT, Receipt, ReceiptItem, Transaction, within_amount_limit};

    #[test]
    fn zero_amount_is_neither_inflow_nor_outflow() {
        let transaction = Transaction {
            id: "txn_1".to_string(),
            timestamp: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            amount: Decimal::ZERO,
            category: "fees".to_string(),
            merchant: "Bank".to_string(),
            account_id: "acct_checking".to_string(),
        };
        assert!(!transaction.is_inflow());
        assert!(!transaction.is_outflow());
    }

    #[test]
    fn receipt_items_total_sums_prices() {
        let receipt = Receipt {
            id: "rcp_1".to_string(),
            timestamp: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            items: vec![
                ReceiptItem {
                    name: "Milk".to_string(),
                    category: "dairy".to_string(),
                    price: Decimal::new(349, 2),
                },
                ReceiptItem {
                    name: "Bread".to_string(),
                    category: "bakery".to_string(),
                    price: Decimal::new(275, 2),
                },
            ],
            total: Decimal::new(624, 2),
        };
        assert_eq!(receipt.items_total(), receipt.total);
    }

    #[test]
    fn amount_limit_is_one_trillion_either_sign() {
        assert_eq!(MAX_AMOUNT, Decimal::new(1_000_000_000_000, 0));
        assert!(within_amount_limit(Decimal::new(-1_000_000_000_000, 0)));
        assert!(!within_amount_limit(Decimal::new(1_000_000_000_001, 0)));
        assert!(!within_amount_limit(Decimal::MIN));
    }
}
