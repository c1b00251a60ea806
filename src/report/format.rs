//! Display formatting for ages and dates.

use chrono::{DateTime, Duration, FixedOffset};

/// Formats the given age as `"N seconds/minutes/hours/days"`.
///
/// Only the largest applicable unit is shown, with the singular form when
/// the value is 1. Negative ages get a leading minus sign.
pub fn format_age(age: Duration) -> String {
    if age < Duration::zero() {
        return format!("-{}", format_nonnegative_age(-age));
    }
    format_nonnegative_age(age)
}

fn format_nonnegative_age(age: Duration) -> String {
    let (value, unit) = if age.num_days() > 0 {
        (age.num_days(), "day")
    } else if age.num_hours() > 0 {
        (age.num_hours(), "hour")
    } else if age.num_minutes() > 0 {
        (age.num_minutes(), "minute")
    } else {
        (age.num_seconds(), "second")
    };

    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

/// Formats the given date as `"YYYY-MM-DD HH:MM:SS"`.
pub fn format_date(date: DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}
