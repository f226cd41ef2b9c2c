use chrono::{DateTime, NaiveDate, Timelike, TimeZone, Utc};

/// This is the standard way of converting a calendar day to a string in mindhaven.
pub fn format_calendar_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Mood logs are keyed by the UTC calendar day, same as the timestamps of journal entries.
pub fn calendar_day(moment: DateTime<Utc>) -> NaiveDate {
    moment.date_naive()
}

/// Label used on the chart axis, e.g. `Jan 5`.
pub fn short_day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Hour of the day in the given timezone. Used by the dashboard greeting.
pub fn hour_in<Tz: TimeZone>(moment: DateTime<Utc>, tz: &Tz) -> u32 {
    moment.with_timezone(tz).hour()
}
