use crate::commands::common::{BundleOptions, resolve_store};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::InvalidateData;
use crate::invalidation::{self, InvalidationSignal, Scope};
use crate::{ClientError, ClientResult};

#[derive(Default)]
pub struct InvalidateOptions<'a> {
    pub scope: Option<&'a str>,
    pub bundle: BundleOptions<'a>,
    /// Defaults to the process-wide signal.
    pub signal: Option<&'a InvalidationSignal>,
}

/// Marks bundles built from the current generation stale. Delivery is
/// at-most-once; only an unknown scope fails.
pub fn run(scope: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(InvalidateOptions {
        scope,
        ..InvalidateOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: InvalidateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let scope = parse_scope(options.scope)?;
    let generation = resolve_store(&options.bundle)?.current()?.generation();

    match options.signal {
        Some(signal) => signal.invalidate(scope, generation),
        None => invalidation::invalidate(scope, generation),
    }

    success(
        "invalidate",
        InvalidateData {
            scope: scope.as_str().to_string(),
            generation,
        },
    )
}

pub(crate) fn parse_scope(raw: Option<&str>) -> ClientResult<Scope> {
    let Some(raw) = raw else {
        return Ok(Scope::All);
    };
    Scope::parse(raw).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            &format!("Unknown invalidation scope `{raw}`. Expected `all` or `analytics`."),
            Some("invalidate"),
        )
    })
}
