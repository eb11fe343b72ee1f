use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{BundleOptions, resolve_config, resolve_store};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ReloadData;
use crate::invalidation::{self, InvalidationSignal, Scope};
use crate::records::snapshot::RecordSet;
use crate::records::{csv_source, fixture};
use crate::records::store::system_now;

#[derive(Default)]
pub struct ReloadOptions<'a> {
    /// CSV transactions to load; the fixture generator is used when absent.
    pub source: Option<&'a Path>,
    pub bundle: BundleOptions<'a>,
    pub signal: Option<&'a InvalidationSignal>,
}

/// Rebuilds the snapshot and tells downstream caches everything is stale.
pub fn run(source: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ReloadOptions {
        source,
        ..ReloadOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ReloadOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let config = resolve_config(&options.bundle)?;
    let store = resolve_store(&options.bundle)?;
    let previous = store.current()?;

    let (records, source) = match options.source {
        Some(path) => {
            // CSV sources carry transactions only; balances survive the reload.
            let loaded = csv_source::load_path(path, config.reference_offset)?;
            let records = RecordSet {
                balances: previous.balances().to_vec(),
                ..loaded
            };
            (records, path.display().to_string())
        }
        None => {
            let now = options.bundle.now.unwrap_or_else(system_now);
            (fixture::generate(&config, now), "fixture".to_string())
        }
    };
    let transaction_count = records.transactions.len();
    let generation = store.replace(records)?;

    match options.signal {
        Some(signal) => signal.invalidate(Scope::All, previous.generation()),
        None => invalidation::invalidate(Scope::All, previous.generation()),
    }

    success(
        "reload",
        ReloadData {
            source,
            previous_generation: previous.generation(),
            generation,
            transaction_count,
        },
    )
}
