use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tallyboard_client::analytics::date::parse_instant;

pub fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(value.trim())
        .ok_or_else(|| "now must be an RFC 3339 instant, e.g. 2026-03-31T00:00:00Z".to_string())
}

pub const FILTER_AFTER_HELP: &str = "\
Filters:
  7d    last 7 days        30d   last 30 days       90d   last 90 days
  ytd   since local Jan 1  all   everything (default)

  Ranges end at `now` (exclusive). Unknown filters are treated as `all`,
  and the response reports `filter_recognized: false`.

Record source:
  Without --source, records come from a deterministic generator seeded by
  TALLYBOARD_SEED. With --source, a CSV with this header is loaded:
    id,timestamp,amount,category,merchant,account_id";

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Reference instant (RFC 3339); defaults to the system clock
    #[arg(long, value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,
    /// Transaction CSV to read instead of the generated records
    #[arg(long)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct BundleArgs {
    /// Reporting period: 7d, 30d, 90d, ytd, or all
    #[arg(long)]
    pub filter: Option<String>,
    #[command(flatten)]
    pub store: StoreArgs,
    /// Emit the JSON envelope for machine parsing
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "tallyboard",
    version,
    about = "Personal-finance dashboard analytics",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Zero-filled daily totals for the period
    #[command(after_help = FILTER_AFTER_HELP)]
    Daily(BundleArgs),
    /// Net total against the preceding period of equal length
    #[command(after_help = FILTER_AFTER_HELP)]
    Trends(BundleArgs),
    /// Inflow, outflow, and net savings with a running total
    #[command(after_help = FILTER_AFTER_HELP)]
    Savings(BundleArgs),
    /// Grocery spend against restaurant spend
    #[command(after_help = FILTER_AFTER_HELP)]
    GroceryVsRestaurant(BundleArgs),
    /// Headline dashboard numbers
    #[command(after_help = FILTER_AFTER_HELP)]
    Stats(BundleArgs),
    /// Number of transactions in the period
    #[command(after_help = FILTER_AFTER_HELP)]
    Count(BundleArgs),
    /// Every analytics widget from one consistent snapshot
    #[command(after_help = FILTER_AFTER_HELP)]
    Analytics(BundleArgs),
    /// Transactions, receipts, category tags, and balances
    #[command(after_help = FILTER_AFTER_HELP)]
    Library(BundleArgs),
    /// Tell downstream caches that computed bundles are stale
    Invalidate {
        /// Which caches to mark stale: all or analytics
        #[arg(long)]
        scope: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
        /// Emit the JSON envelope for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Rebuild the record snapshot and mark every cache stale
    Reload {
        #[command(flatten)]
        store: StoreArgs,
        /// Emit the JSON envelope for machine parsing
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Daily(_) => "daily",
            Self::Trends(_) => "trends",
            Self::Savings(_) => "savings",
            Self::GroceryVsRestaurant(_) => "grocery-vs-restaurant",
            Self::Stats(_) => "stats",
            Self::Count(_) => "count",
            Self::Analytics(_) => "analytics",
            Self::Library(_) => "library",
            Self::Invalidate { .. } => "invalidate",
            Self::Reload { .. } => "reload",
        }
    }

    pub fn wants_json(&self) -> bool {
        match self {
            Self::Daily(args)
            | Self::Trends(args)
            | Self::Savings(args)
            | Self::GroceryVsRestaurant(args)
            | Self::Stats(args)
            | Self::Count(args)
            | Self::Analytics(args)
            | Self::Library(args) => args.json,
            Self::Invalidate { json, .. } | Self::Reload { json, .. } => *json,
        }
    }
}

pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{Commands, parse_from};

    #[test]
    fn bundle_commands_accept_filter_now_and_json() {
        let parsed = parse_from([
            "tallyboard",
            "daily",
            "--filter",
            "30d",
            "--now",
            "2026-03-31T00:00:00Z",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(cli.command.name(), "daily");
            assert!(cli.command.wants_json());
            if let Commands::Daily(args) = cli.command {
                assert_eq!(args.filter.as_deref(), Some("30d"));
                assert!(args.store.now.is_some());
                assert!(args.store.source.is_none());
            }
        }
    }

    #[test]
    fn grocery_command_uses_kebab_case() {
        let parsed = parse_from(["tallyboard", "grocery-vs-restaurant"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(cli.command, Commands::GroceryVsRestaurant(_)));
            assert!(!cli.command.wants_json());
        }
    }

    #[test]
    fn unknown_filters_parse_and_are_left_to_the_resolver() {
        let parsed = parse_from(["tallyboard", "count", "--filter", "bogus"]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn malformed_now_is_rejected() {
        let parsed = parse_from(["tallyboard", "stats", "--now", "yesterday"]);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn invalidate_takes_a_scope() {
        let parsed = parse_from(["tallyboard", "invalidate", "--scope", "analytics", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(cli.command.name(), "invalidate");
            assert!(cli.command.wants_json());
        }
    }
}
