//! Human-readable durations: "a few seconds", "3 hours", "in 2 days", "a month ago".
//!
//! Thresholds follow the widely used moment.js buckets so the text matches
//! what users see elsewhere in the dashboard.

use chrono::TimeDelta;

const SECONDS_THRESHOLD: f64 = 44.0;
const MINUTES_THRESHOLD: f64 = 45.0;
const HOURS_THRESHOLD: f64 = 22.0;
const DAYS_THRESHOLD: f64 = 26.0;
const MONTHS_THRESHOLD: f64 = 11.0;

/// Unsigned humanized magnitude of `duration`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn humanize(duration: TimeDelta) -> String {
    let secs_exact = (duration.num_milliseconds() as f64 / 1000.0).abs();
    let days_exact = secs_exact / 86_400.0;
    let months_exact = days_exact * 4800.0 / 146_097.0;

    let seconds = secs_exact.round();
    let minutes = (secs_exact / 60.0).round();
    let hours = (secs_exact / 3600.0).round();
    let days = days_exact.round();
    let months = months_exact.round();
    let years = (months_exact / 12.0).round();

    if seconds <= SECONDS_THRESHOLD {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < MINUTES_THRESHOLD {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < HOURS_THRESHOLD {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < DAYS_THRESHOLD {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < MONTHS_THRESHOLD {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

/// Humanized offset from now: `"in …"` for positive, `"… ago"` otherwise.
#[must_use]
pub fn humanize_relative(duration: TimeDelta) -> String {
    let text = humanize(duration);
    if duration > TimeDelta::zero() {
        format!("in {text}")
    } else {
        format!("{text} ago")
    }
}
