use crate::analytics::period::DateRange;
use crate::records::types::Timestamped;

/// Records whose timestamp falls in `range`, in their original order.
///
/// A plain linear scan: callers may pass records in any order.
pub fn filter_by_period<T>(records: &[T], range: &DateRange) -> Vec<T>
where
    T: Timestamped + Clone,
{
    records
        .iter()
        .filter(|record| range.contains(record.timestamp()))
        .cloned()
        .collect()
}
