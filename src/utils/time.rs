use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Hours between two instants, negative when `end` precedes `start`.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// `8h 30m`, or `8h` on the hour.
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let (whole, minutes) = (total_minutes / 60, total_minutes % 60);
    if minutes == 0 {
        format!("{whole}h")
    } else {
        format!("{whole}h {minutes}m")
    }
}
