use chrono::FixedOffset;
use rust_decimal::Decimal;

use crate::analytics::daily::{DailyPoint, build_daily_series, running_totals};
use crate::analytics::filter::filter_by_period;
use crate::analytics::period::DateRange;
use crate::analytics::trends::{PeriodComparison, compare_periods, net};
use crate::records::types::{AccountBalance, AccountKind, Transaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Savings {
    pub inflow: Decimal,
    /// Magnitude of outgoing money, always non-negative.
    pub outflow: Decimal,
    pub net_savings: Decimal,
    /// Net savings against the preceding window of equal length.
    pub versus_prior: PeriodComparison,
    pub running_total: Vec<DailyPoint>,
    /// Sum of current balances held in savings accounts.
    pub savings_balance: Decimal,
}

/// Savings picture for `range`.
///
/// `transactions` must be the unfiltered corpus so the prior window can be cut.
pub fn build_savings(
    transactions: &[Transaction],
    range: &DateRange,
    offset: FixedOffset,
    balances: &[AccountBalance],
) -> Savings {
    let current = filter_by_period(transactions, range);
    let prior = filter_by_period(transactions, &range.preceding());

    let inflow = current
        .iter()
        .filter(|transaction| transaction.is_inflow())
        .map(|transaction| transaction.amount)
        .sum::<Decimal>();
    let outflow = current
        .iter()
        .filter(|transaction| transaction.is_outflow())
        .map(|transaction| transaction.amount.abs())
        .sum::<Decimal>();
    let net_savings = inflow - outflow;

    let savings_balance = balances
        .iter()
        .filter(|balance| balance.kind == AccountKind::Savings)
        .map(|balance| balance.balance)
        .sum();

    Savings {
        inflow,
        outflow,
        net_savings,
        versus_prior: compare_periods(net_savings, net(&prior)),
        running_total: running_totals(&build_daily_series(&current, range, offset)),
        savings_balance,
    }
}
