use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Calendar date of `instant` in the reference timezone.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// First instant of `date` in the reference timezone, expressed in UTC.
pub fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    local_at(date.and_time(chrono::NaiveTime::MIN), offset)
}

pub fn local_at(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    match offset.from_local_datetime(&naive).single() {
        Some(value) => value.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

pub fn start_of_year(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let today = local_date(now, offset);
    match NaiveDate::from_ymd_opt(today.year(), 1, 1) {
        Some(jan_1) => local_midnight(jan_1, offset),
        None => local_midnight(today, offset),
    }
}

/// Inclusive list of calendar dates from `first` through `last`.
pub fn dates_inclusive(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    if first > last {
        return Vec::new();
    }
    first.iter_days().take_while(|date| *date <= last).collect()
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
