use crate::ClientResult;
use crate::commands::common::{BundleOptions, bundle, request_context, trends_section};
use crate::contracts::envelope::SuccessEnvelope;

/// Current range against the equal-length window before it.
pub fn run(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn run_with_options(options: BundleOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    bundle("trends", &context, trends_section(&context))
}
