use tallyboard_client::commands::invalidate::{self, InvalidateOptions};
use tallyboard_client::commands::reload::{self, ReloadOptions};
use tallyboard_client::commands::{analytics, comparison, daily, library, savings, stats, trends};
use tallyboard_client::config::EngineConfig;
use tallyboard_client::invalidation::{self, Scope};
use tallyboard_client::records::csv_source;
use tallyboard_client::records::store::{SnapshotStore, system_now};
use tallyboard_client::{BundleOptions, ClientResult, SuccessEnvelope};
use tracing::{debug, warn};

use crate::cli::{BundleArgs, Cli, Commands, StoreArgs};

type BundleCommand = fn(BundleOptions<'_>) -> ClientResult<SuccessEnvelope>;

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    let config = EngineConfig::from_env()?;
    debug!(command = cli.command.name(), "dispatching");
    match &cli.command {
        Commands::Daily(args) => run_bundle(daily::run_with_options, args, &config),
        Commands::Trends(args) => run_bundle(trends::run_with_options, args, &config),
        Commands::Savings(args) => run_bundle(savings::run_with_options, args, &config),
        Commands::GroceryVsRestaurant(args) => run_bundle(
            comparison::grocery_vs_restaurant_with_options,
            args,
            &config,
        ),
        Commands::Stats(args) => run_bundle(stats::run_with_options, args, &config),
        Commands::Count(args) => {
            run_bundle(stats::count_transactions_with_options, args, &config)
        }
        Commands::Analytics(args) => run_bundle(analytics::run_with_options, args, &config),
        Commands::Library(args) => run_bundle(library::run_with_options, args, &config),
        Commands::Invalidate { scope, store, .. } => {
            let snapshot_store = open_store(store, &config)?;
            let result = invalidate::run_with_options(InvalidateOptions {
                scope: scope.as_deref(),
                bundle: BundleOptions {
                    now: store.now,
                    store: Some(&snapshot_store),
                    config: Some(&config),
                    ..BundleOptions::default()
                },
                signal: None,
            });
            await_delivery(&result);
            result
        }
        Commands::Reload { store, .. } => {
            let now = store.now.unwrap_or_else(system_now);
            let snapshot_store = SnapshotStore::from_fixture(&config, now)?;
            let result = reload::run_with_options(ReloadOptions {
                source: store.source.as_deref(),
                bundle: BundleOptions {
                    now: Some(now),
                    store: Some(&snapshot_store),
                    config: Some(&config),
                    ..BundleOptions::default()
                },
                signal: None,
            });
            await_delivery(&result);
            result
        }
    }
}

fn run_bundle(
    command: BundleCommand,
    args: &BundleArgs,
    config: &EngineConfig,
) -> ClientResult<SuccessEnvelope> {
    let store = open_store(&args.store, config)?;
    command(BundleOptions {
        filter: args.filter.as_deref(),
        now: args.store.now,
        store: Some(&store),
        config: Some(config),
    })
}

fn open_store(args: &StoreArgs, config: &EngineConfig) -> ClientResult<SnapshotStore> {
    match &args.source {
        Some(path) => {
            SnapshotStore::with_records(csv_source::load_path(path, config.reference_offset)?)
        }
        None => SnapshotStore::from_fixture(config, args.now.unwrap_or_else(system_now)),
    }
}

/// The process exits right after printing, so drain the signal queue first.
fn await_delivery(result: &ClientResult<SuccessEnvelope>) {
    invalidation::flush_shared();
    let Ok(success) = result else {
        return;
    };
    let scope = success
        .data
        .get("scope")
        .and_then(serde_json::Value::as_str)
        .and_then(Scope::parse)
        .unwrap_or(Scope::All);
    match invalidation::shared_marker().stale_generation(scope) {
        Some(generation) => debug!(scope = scope.as_str(), generation, "caches marked stale"),
        None => warn!(scope = scope.as_str(), "invalidation was not delivered"),
    }
}
