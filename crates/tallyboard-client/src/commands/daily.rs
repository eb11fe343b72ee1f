use crate::ClientResult;
use crate::commands::common::{BundleOptions, bundle, request_context, daily_section};
use crate::contracts::envelope::SuccessEnvelope;

/// Zero-filled signed totals for every calendar day in the range.
pub fn run(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn run_with_options(options: BundleOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    bundle("daily", &context, daily_section(&context))
}
