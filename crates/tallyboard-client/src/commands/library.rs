use crate::ClientResult;
use crate::analytics::buckets::BucketMap;
use crate::commands::common::{BundleOptions, bundle, library_section, request_context};
use crate::contracts::envelope::SuccessEnvelope;

/// Filtered transactions and receipts (newest first), category tags, and
/// current balances.
pub fn run(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn run_with_options(options: BundleOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    let body = library_section(&context, BucketMap::standard());
    bundle("library", &context, body)
}
