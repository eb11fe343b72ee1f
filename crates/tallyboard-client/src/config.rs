use chrono::{FixedOffset, Offset, Utc};

use crate::{ClientError, ClientResult};

pub const SEED_VAR: &str = "TALLYBOARD_SEED";
pub const FIXTURE_DAYS_VAR: &str = "TALLYBOARD_FIXTURE_DAYS";
pub const UTC_OFFSET_VAR: &str = "TALLYBOARD_UTC_OFFSET_MINUTES";
pub const INVALIDATION_QUEUE_VAR: &str = "TALLYBOARD_INVALIDATION_QUEUE";

const DEFAULT_SEED: u64 = 42;
const DEFAULT_FIXTURE_DAYS: u32 = 400;
const DEFAULT_INVALIDATION_QUEUE: usize = 16;
const MAX_FIXTURE_DAYS: u32 = 3_650;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Engine settings, read once from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: u64,
    pub fixture_days: u32,
    /// Reference timezone used for calendar-day grouping and start-of-year.
    pub reference_offset: FixedOffset,
    pub invalidation_queue: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            fixture_days: DEFAULT_FIXTURE_DAYS,
            reference_offset: utc_offset(),
            invalidation_queue: DEFAULT_INVALIDATION_QUEUE,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = non_empty(lookup(SEED_VAR)) {
            config.seed = raw
                .parse::<u64>()
                .map_err(|_| ClientError::invalid_config(SEED_VAR, &raw, "an unsigned integer"))?;
        }

        if let Some(raw) = non_empty(lookup(FIXTURE_DAYS_VAR)) {
            config.fixture_days = raw
                .parse::<u32>()
                .ok()
                .filter(|days| (1..=MAX_FIXTURE_DAYS).contains(days))
                .ok_or_else(|| {
                    ClientError::invalid_config(
                        FIXTURE_DAYS_VAR,
                        &raw,
                        &format!("a day count between 1 and {MAX_FIXTURE_DAYS}"),
                    )
                })?;
        }

        if let Some(raw) = non_empty(lookup(UTC_OFFSET_VAR)) {
            config.reference_offset = raw
                .parse::<i32>()
                .ok()
                .filter(|minutes| minutes.abs() <= MAX_OFFSET_MINUTES)
                .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
                .ok_or_else(|| {
                    ClientError::invalid_config(
                        UTC_OFFSET_VAR,
                        &raw,
                        "a minute offset between -840 and 840",
                    )
                })?;
        }

        if let Some(raw) = non_empty(lookup(INVALIDATION_QUEUE_VAR)) {
            config.invalidation_queue = raw
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or_else(|| {
                    ClientError::invalid_config(
                        INVALIDATION_QUEUE_VAR,
                        &raw,
                        "a positive queue capacity",
                    )
                })?;
        }

        Ok(config)
    }
}

pub(crate) fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
