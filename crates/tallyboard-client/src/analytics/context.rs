use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

use crate::analytics::filter::filter_by_period;
use crate::analytics::period::{DateRange, FilterToken, ParsedFilter};
use crate::records::snapshot::Snapshot;
use crate::records::types::{Receipt, Transaction};

/// Everything one request needs: a single snapshot, a single resolved range,
/// and the records already filtered by that range. Every builder invoked for
/// the request reads from the same context, so widgets rendered together can
/// never disagree about which records they saw.
#[derive(Debug)]
pub struct RequestContext {
    snapshot: Arc<Snapshot>,
    filter: ParsedFilter,
    now: DateTime<Utc>,
    offset: FixedOffset,
    range: DateRange,
    transactions: Vec<Transaction>,
    receipts: Vec<Receipt>,
}

impl RequestContext {
    pub fn new(
        snapshot: Arc<Snapshot>,
        raw_filter: Option<&str>,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        let filter = FilterToken::parse(raw_filter);
        let range = filter.token.resolve(now, offset);
        let transactions = filter_by_period(snapshot.transactions(), &range);
        let receipts = filter_by_period(snapshot.receipts(), &range);

        debug!(
            filter = filter.token.as_str(),
            recognized = filter.recognized,
            generation = snapshot.generation(),
            transactions = transactions.len(),
            receipts = receipts.len(),
            "built request context"
        );

        Self {
            snapshot,
            filter,
            now,
            offset,
            range,
            transactions,
            receipts,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn filter(&self) -> ParsedFilter {
        self.filter
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// Transactions inside the resolved range.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Receipts inside the resolved range.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// The whole snapshot, for builders that look outside the range.
    pub fn all_transactions(&self) -> &[Transaction] {
        self.snapshot.transactions()
    }
}
