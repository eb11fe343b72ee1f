use crate::ClientResult;
use crate::commands::common::{BundleOptions, bundle, request_context, savings_section};
use crate::contracts::envelope::SuccessEnvelope;

/// Inflow, outflow, and net savings for the range, with a running total.
pub fn run(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn run_with_options(options: BundleOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    bundle("savings", &context, savings_section(&context))
}
