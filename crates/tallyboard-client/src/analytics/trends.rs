use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::analytics::filter::filter_by_period;
use crate::analytics::period::DateRange;
use crate::records::types::Transaction;

/// Relative changes smaller than this (as a fraction) classify as stable.
pub const STABLE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Improving,
    Declining,
    Stable,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodComparison {
    pub current: Decimal,
    pub prior: Decimal,
    /// Fractional change relative to `|prior|`; zero when `prior` is zero.
    pub percent_change: Decimal,
    pub direction: Direction,
}

/// Compares two signed net totals. A higher net is an improvement.
pub fn compare_periods(current: Decimal, prior: Decimal) -> PeriodComparison {
    // Zero prior or a ratio outside `Decimal` range reports no change.
    let ratio = current
        .checked_sub(prior)
        .and_then(|delta| delta.checked_div(prior.abs()));
    let Some(percent_change) = ratio else {
        return PeriodComparison {
            current,
            prior,
            percent_change: Decimal::ZERO,
            direction: Direction::Stable,
        };
    };

    let direction = if percent_change.abs() < STABLE_EPSILON {
        Direction::Stable
    } else if percent_change.is_sign_positive() {
        Direction::Improving
    } else {
        Direction::Declining
    };

    PeriodComparison {
        current,
        prior,
        percent_change,
        direction,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTrend {
    pub category: String,
    pub comparison: PeriodComparison,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trends {
    pub prior_range: DateRange,
    pub overall: PeriodComparison,
    pub categories: Vec<CategoryTrend>,
}

/// Current range against the equal-length window before it.
///
/// `transactions` must be the unfiltered corpus; both windows are cut from it.
pub fn build_trends(transactions: &[Transaction], range: &DateRange) -> Trends {
    let prior_range = range.preceding();
    let current = filter_by_period(transactions, range);
    let prior = filter_by_period(transactions, &prior_range);

    let overall = compare_periods(net(&current), net(&prior));

    let mut by_category: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for transaction in &current {
        by_category
            .entry(transaction.category.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO))
            .0 += transaction.amount;
    }
    for transaction in &prior {
        by_category
            .entry(transaction.category.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO))
            .1 += transaction.amount;
    }

    let categories = by_category
        .into_iter()
        .map(|(category, (current, prior))| CategoryTrend {
            category: category.to_string(),
            comparison: compare_periods(current, prior),
        })
        .collect();

    Trends {
        prior_range,
        overall,
        categories,
    }
}

pub(crate) fn net(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum()
}
