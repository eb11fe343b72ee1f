use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::records::types::{Receipt, Transaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    pub category: String,
    pub spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_spent: Decimal,
    pub total_income: Decimal,
    pub net: Decimal,
    pub transaction_count: usize,
    pub receipt_count: usize,
    pub average_spend: Decimal,
    pub top_category: Option<CategorySpend>,
}

/// Headline numbers over already-filtered records.
pub fn build_dashboard_stats(transactions: &[Transaction], receipts: &[Receipt]) -> DashboardStats {
    let mut total_spent = Decimal::ZERO;
    let mut total_income = Decimal::ZERO;
    let mut outflow_count = 0_usize;
    let mut spent_by_category: BTreeMap<&str, Decimal> = BTreeMap::new();

    for transaction in transactions {
        if transaction.is_outflow() {
            let magnitude = transaction.amount.abs();
            total_spent += magnitude;
            outflow_count += 1;
            *spent_by_category
                .entry(transaction.category.as_str())
                .or_insert(Decimal::ZERO) += magnitude;
        } else if transaction.is_inflow() {
            total_income += transaction.amount;
        }
    }

    // `max_by` keeps the last of equal spends; reversed, ties go to the first name.
    let top_category = spent_by_category
        .into_iter()
        .rev()
        .max_by(|left, right| left.1.cmp(&right.1))
        .map(|(category, spent)| CategorySpend {
            category: category.to_string(),
            spent,
        });

    let average_spend = if outflow_count == 0 {
        Decimal::ZERO
    } else {
        (total_spent / Decimal::from(outflow_count)).round_dp(2)
    };

    DashboardStats {
        total_spent,
        total_income,
        net: total_income - total_spent,
        transaction_count: total_count(transactions),
        receipt_count: receipts.len(),
        average_spend,
        top_category,
    }
}

/// Number of transactions in the filtered set.
pub fn total_count(transactions: &[Transaction]) -> usize {
    transactions.len()
}
