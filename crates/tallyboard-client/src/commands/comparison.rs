use crate::ClientResult;
use crate::analytics::buckets::BucketMap;
use crate::commands::common::{
    BundleOptions, bundle, grocery_vs_restaurant_section, request_context,
};
use crate::contracts::envelope::SuccessEnvelope;

pub fn grocery_vs_restaurant(filter: Option<&str>) -> ClientResult<SuccessEnvelope> {
    grocery_vs_restaurant_with_options(BundleOptions::filter(filter))
}

#[doc(hidden)]
pub fn grocery_vs_restaurant_with_options(
    options: BundleOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let context = request_context(&options)?;
    let body = grocery_vs_restaurant_section(&context, BucketMap::standard());
    bundle("grocery-vs-restaurant", &context, body)
}
