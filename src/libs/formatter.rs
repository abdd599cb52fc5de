//! Time duration formatting for console display.
//!
//! Everything the status table shows goes through here so all durations
//! share the same "HH:MM:SS" shape. Negative inputs are clamped to zero.

use chrono::Duration;

/// Formats a duration into a "HH:MM:SS" string.
///
/// # Examples
///
/// ```rust
/// use lumen::libs::formatter::format_duration;
/// use chrono::Duration;
///
/// assert_eq!(format_duration(&Duration::minutes(90)), "01:30:00");
/// assert_eq!(format_duration(&Duration::seconds(-5)), "00:00:00");
/// ```
pub fn format_duration(duration: &Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

/// Formats a millisecond total into the same "HH:MM:SS" shape.
pub fn format_millis(millis: i64) -> String {
    format_duration(&Duration::milliseconds(millis.max(0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_millis(0), "00:00:00");
        assert_eq!(format_millis(59_000), "00:00:59");
        assert_eq!(format_millis(3_661_000), "01:01:01");
        assert_eq!(format_millis(90_000_000), "25:00:00");
    }

    #[test]
    fn clamps_negative_to_zero() {
        assert_eq!(format_millis(-1000), "00:00:00");
        assert_eq!(format_duration(&Duration::hours(-2)), "00:00:00");
    }

    #[test]
    fn sub_second_remainder_is_truncated() {
        assert_eq!(format_millis(1999), "00:00:01");
    }
}
