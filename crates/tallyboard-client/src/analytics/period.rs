use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::analytics::date::start_of_year;

/// Reporting-period selector accepted by every bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterToken {
    Last7Days,
    Last30Days,
    Last90Days,
    YearToDate,
    All,
}

/// Outcome of reading a raw `filter` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFilter {
    pub token: FilterToken,
    /// False when the raw value was present but outside the vocabulary.
    pub recognized: bool,
}

impl FilterToken {
    pub const VOCABULARY: [FilterToken; 5] = [
        Self::Last7Days,
        Self::Last30Days,
        Self::Last90Days,
        Self::YearToDate,
        Self::All,
    ];

    /// Absent and unknown values fall back to `all`; this never fails.
    pub fn parse(raw: Option<&str>) -> ParsedFilter {
        let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return ParsedFilter {
                token: Self::All,
                recognized: true,
            };
        };

        let token = match value.to_ascii_lowercase().as_str() {
            "7d" => Some(Self::Last7Days),
            "30d" => Some(Self::Last30Days),
            "90d" => Some(Self::Last90Days),
            "ytd" => Some(Self::YearToDate),
            "all" => Some(Self::All),
            _ => None,
        };

        ParsedFilter {
            token: token.unwrap_or(Self::All),
            recognized: token.is_some(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
            Self::YearToDate => "ytd",
            Self::All => "all",
        }
    }

    const fn trailing_days(self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::YearToDate | Self::All => None,
        }
    }

    pub fn resolve(self, now: DateTime<Utc>, offset: FixedOffset) -> DateRange {
        if let Some(days) = self.trailing_days() {
            let start = now
                .checked_sub_signed(Duration::days(days))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            return DateRange::new(start, now);
        }

        match self {
            Self::YearToDate => DateRange::new(start_of_year(now, offset), now),
            _ => DateRange::unbounded(now),
        }
    }
}

/// Resolves a raw filter value against `now`.
pub fn resolve(raw: Option<&str>, now: DateTime<Utc>, offset: FixedOffset) -> DateRange {
    FilterToken::parse(raw).token.resolve(now, offset)
}

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Builds a range; a `start` after `end` collapses to the empty range at `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.min(end),
            end,
        }
    }

    pub fn unbounded(end: DateTime<Utc>) -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == DateTime::<Utc>::MIN_UTC
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Equal-length window ending where this one starts. Unbounded ranges have
    /// no prior window, so this returns an empty range.
    pub fn preceding(&self) -> Self {
        if self.is_unbounded() {
            return Self::new(self.start, self.start);
        }
        let length = self.end - self.start;
        let start = self
            .start
            .checked_sub_signed(length)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::new(start, self.start)
    }
}
