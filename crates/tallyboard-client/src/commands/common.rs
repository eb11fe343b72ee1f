use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ClientResult;
use crate::analytics::buckets::BucketMap;
use crate::analytics::comparison::{BucketSpend, build_grocery_vs_restaurant};
use crate::analytics::context::RequestContext;
use crate::analytics::daily::{DailyPoint, build_daily_series};
use crate::analytics::date::{format_instant, format_iso_date};
use crate::analytics::library::{category_tags, newest_first};
use crate::analytics::period::DateRange;
use crate::analytics::savings::build_savings;
use crate::analytics::stats::{build_dashboard_stats, total_count};
use crate::analytics::trends::{PeriodComparison, build_trends};
use crate::config::EngineConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    BalanceRow, BucketRow, BundleData, CategoryTagRow, CategoryTrendRow, ComparisonRow,
    DailyPointRow, DailySection, GroceryVsRestaurantSection, LibrarySection, RangeData,
    ReceiptItemRow, ReceiptRow, RequestData, SavingsSection, StatsSection, TopCategoryRow,
    TransactionRow, TrendsSection,
};
use crate::records::store::{self, SnapshotStore, system_now};

const PERCENT_DECIMALS: u32 = 4;

/// Inputs shared by every bundle command. Unset fields fall back to the
/// process-wide store, the environment config, and the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundleOptions<'a> {
    pub filter: Option<&'a str>,
    pub now: Option<DateTime<Utc>>,
    pub store: Option<&'a SnapshotStore>,
    pub config: Option<&'a EngineConfig>,
}

impl<'a> BundleOptions<'a> {
    pub fn filter(filter: Option<&'a str>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

pub(crate) fn resolve_config(options: &BundleOptions<'_>) -> ClientResult<EngineConfig> {
    match options.config {
        Some(config) => Ok(*config),
        None => EngineConfig::from_env(),
    }
}

pub(crate) fn resolve_store<'a>(options: &BundleOptions<'a>) -> ClientResult<&'a SnapshotStore> {
    match options.store {
        Some(store) => Ok(store),
        None => store::shared(),
    }
}

/// Reads one snapshot and resolves one range for the whole request.
pub(crate) fn request_context(options: &BundleOptions<'_>) -> ClientResult<RequestContext> {
    let config = resolve_config(options)?;
    let snapshot = resolve_store(options)?.current()?;
    let now = options.now.unwrap_or_else(system_now);
    Ok(RequestContext::new(
        snapshot,
        options.filter,
        now,
        config.reference_offset,
    ))
}

pub(crate) fn bundle<T>(
    command: &str,
    context: &RequestContext,
    body: T,
) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    success(
        command,
        BundleData {
            request: request_data(context),
            body,
        },
    )
}

pub(crate) fn request_data(context: &RequestContext) -> RequestData {
    let filter = context.filter();
    RequestData {
        filter: filter.token.as_str().to_string(),
        filter_recognized: filter.recognized,
        range: range_data(context.range()),
        generation: context.snapshot().generation(),
    }
}

pub(crate) fn range_data(range: &DateRange) -> RangeData {
    RangeData {
        start: (!range.is_unbounded()).then(|| format_instant(&range.start())),
        end: format_instant(&range.end()),
    }
}

fn point_rows(points: &[DailyPoint]) -> Vec<DailyPointRow> {
    points
        .iter()
        .map(|point| DailyPointRow {
            date: format_iso_date(&point.date),
            total: point.total,
            count: point.count,
        })
        .collect()
}

fn comparison_row(comparison: &PeriodComparison) -> ComparisonRow {
    ComparisonRow {
        current_period_total: comparison.current,
        prior_period_total: comparison.prior,
        percent_change: comparison.percent_change.round_dp(PERCENT_DECIMALS),
        direction: comparison.direction.as_str().to_string(),
    }
}

pub(crate) fn daily_section(context: &RequestContext) -> DailySection {
    let series = build_daily_series(context.transactions(), context.range(), context.offset());
    DailySection {
        net_total: series.iter().map(|point| point.total).sum(),
        transaction_count: series.iter().map(|point| point.count).sum(),
        days: point_rows(&series),
    }
}

pub(crate) fn trends_section(context: &RequestContext) -> TrendsSection {
    let trends = build_trends(context.all_transactions(), context.range());
    TrendsSection {
        prior_range: range_data(&trends.prior_range),
        overall: comparison_row(&trends.overall),
        categories: trends
            .categories
            .iter()
            .map(|trend| CategoryTrendRow {
                category: trend.category.clone(),
                comparison: comparison_row(&trend.comparison),
            })
            .collect(),
    }
}

pub(crate) fn savings_section(context: &RequestContext) -> SavingsSection {
    let savings = build_savings(
        context.all_transactions(),
        context.range(),
        context.offset(),
        context.snapshot().balances(),
    );
    SavingsSection {
        inflow: savings.inflow,
        outflow: savings.outflow,
        net_savings: savings.net_savings,
        prior_net_savings: savings.versus_prior.prior,
        delta: savings.versus_prior.current - savings.versus_prior.prior,
        percent_change: savings.versus_prior.percent_change.round_dp(PERCENT_DECIMALS),
        direction: savings.versus_prior.direction.as_str().to_string(),
        savings_balance: savings.savings_balance,
        running_total: point_rows(&savings.running_total),
    }
}

fn bucket_row(spend: BucketSpend) -> BucketRow {
    BucketRow {
        total: spend.total,
        count: spend.count,
        tags: spend.tags,
    }
}

pub(crate) fn grocery_vs_restaurant_section(
    context: &RequestContext,
    map: &BucketMap,
) -> GroceryVsRestaurantSection {
    let comparison = build_grocery_vs_restaurant(context.transactions(), map);
    let grocery_share = comparison
        .grocery_share()
        .map(|share| share.round_dp(PERCENT_DECIMALS));
    GroceryVsRestaurantSection {
        grocery: bucket_row(comparison.grocery),
        restaurant: bucket_row(comparison.restaurant),
        grocery_share,
    }
}

pub(crate) fn stats_section(context: &RequestContext) -> StatsSection {
    let stats = build_dashboard_stats(context.transactions(), context.receipts());
    StatsSection {
        total_spent: stats.total_spent,
        total_income: stats.total_income,
        net: stats.net,
        transaction_count: stats.transaction_count,
        receipt_count: stats.receipt_count,
        average_spend: stats.average_spend,
        top_category: stats.top_category.map(|top| TopCategoryRow {
            category: top.category,
            spent: top.spent,
        }),
    }
}

pub(crate) fn count(context: &RequestContext) -> usize {
    total_count(context.transactions())
}

pub(crate) fn library_section(context: &RequestContext, map: &BucketMap) -> LibrarySection {
    let transactions = newest_first(context.transactions())
        .into_iter()
        .map(|transaction| TransactionRow {
            timestamp: format_instant(&transaction.timestamp),
            id: transaction.id,
            amount: transaction.amount,
            category: transaction.category,
            merchant: transaction.merchant,
            account_id: transaction.account_id,
        })
        .collect();

    let mut receipts = context.receipts().to_vec();
    receipts.sort_by(|left, right| {
        right
            .timestamp
            .cmp(&left.timestamp)
            .then_with(|| left.id.cmp(&right.id))
    });
    let receipts = receipts
        .into_iter()
        .map(|receipt| ReceiptRow {
            timestamp: format_instant(&receipt.timestamp),
            id: receipt.id,
            total: receipt.total,
            items: receipt
                .items
                .into_iter()
                .map(|item| ReceiptItemRow {
                    name: item.name,
                    category: item.category,
                    price: item.price,
                })
                .collect(),
        })
        .collect();

    let categories = category_tags(context.transactions(), map)
        .into_iter()
        .map(|tag| CategoryTagRow {
            category: tag.category,
            bucket: tag.bucket.map(|bucket| bucket.as_str().to_string()),
            count: tag.count,
            net_total: tag.net_total,
        })
        .collect();

    let balances = context
        .snapshot()
        .balances()
        .iter()
        .map(|balance| BalanceRow {
            account_id: balance.account_id.clone(),
            name: balance.name.clone(),
            kind: balance.kind.as_str().to_string(),
            balance: balance.balance,
        })
        .collect();

    LibrarySection {
        transactions,
        receipts,
        categories,
        balances,
    }
}
