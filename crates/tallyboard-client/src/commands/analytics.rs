use crate::ClientResult;
use crate::analytics::buckets::BucketMap;
use crate::commands::common::{
    BundleOptions, bundle, count, daily_section, grocery_vs_restaurant_section, request_context,
    savings_section, stats_section, trends_section,
};
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::AnalyticsSection;

/// Every analytics widget for one filter, computed from one request context.
pub fn run(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn run_with_options(options: BundleOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    let body = AnalyticsSection {
        daily: daily_section(&context),
        trends: trends_section(&context),
        savings: savings_section(&context),
        grocery_vs_restaurant: grocery_vs_restaurant_section(&context, BucketMap::standard()),
        stats: stats_section(&context),
        count: count(&context),
    };
    bundle("analytics", &context, body)
}
