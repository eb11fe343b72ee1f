use crate::ClientResult;
use crate::commands::common::{BundleOptions, bundle, count, request_context, stats_section};
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::CountSection;

/// Headline dashboard numbers for the range.
pub fn run(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn run_with_options(options: BundleOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    bundle("stats", &context, stats_section(&context))
}

/// Number of transactions in the range.
pub fn count_transactions(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    count_transactions_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn count_transactions_with_options(
    options: BundleOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    let body = CountSection {
        count: count(&context),
    };
    bundle("count", &context, body)
}
