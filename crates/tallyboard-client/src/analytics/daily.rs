use std::collections::BTreeMap;

use chrono::{Duration, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use crate::analytics::date::{dates_inclusive, local_date};
use crate::analytics::period::DateRange;
use crate::records::types::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
}

/// Calendar days covered by `range` in the reference timezone.
///
/// Every series ends at `local(end - 1ns)`. A bounded range spanning exactly
/// N days yields N dates, so a trailing `30d` window always has 30 entries;
/// any other bounded range starts at `local(start)`. Unbounded ranges start
/// at the earliest of `transactions`, and are empty without any.
pub fn calendar_days(
    range: &DateRange,
    transactions: &[Transaction],
    offset: FixedOffset,
) -> Vec<NaiveDate> {
    if range.is_empty() {
        return Vec::new();
    }

    let last = local_date(range.end() - Duration::nanoseconds(1), offset);
    let first = if range.is_unbounded() {
        match transactions
            .iter()
            .map(|transaction| local_date(transaction.timestamp, offset))
            .min()
        {
            Some(date) => date,
            None => return Vec::new(),
        }
    } else {
        let span = range.end() - range.start();
        let whole_days = span.num_days();
        let from_start = local_date(range.start(), offset);
        if whole_days > 0 && span == Duration::days(whole_days) {
            last.checked_sub_signed(Duration::days(whole_days - 1))
                .unwrap_or(from_start)
        } else {
            from_start
        }
    };

    dates_inclusive(first, last)
}

/// Signed daily totals, one entry per calendar day, zero-filled.
///
/// Rows from a partial day before the first calendar day are counted in the
/// first entry.
pub fn build_daily_series(
    transactions: &[Transaction],
    range: &DateRange,
    offset: FixedOffset,
) -> Vec<DailyPoint> {
    let days = calendar_days(range, transactions, offset);
    let Some(&first) = days.first() else {
        return Vec::new();
    };

    let mut by_day: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();
    for transaction in transactions {
        let entry = by_day
            .entry(local_date(transaction.timestamp, offset).max(first))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += transaction.amount;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|date| {
            let (total, count) = by_day.get(&date).copied().unwrap_or((Decimal::ZERO, 0));
            DailyPoint { date, total, count }
        })
        .collect()
}

/// Cumulative totals over a daily series.
pub fn running_totals(series: &[DailyPoint]) -> Vec<DailyPoint> {
    let mut running = Decimal::ZERO;
    let mut count = 0;
    series
        .iter()
        .map(|point| {
            running += point.total;
            count += point.count;
            DailyPoint {
                date: point.date,
                total: running,
                count,
            }
        })
        .collect()
}
