//! 24-hour to 12-hour clock conversion.

use crate::error::{AlertError, Result};

/// Convert a 24-hour `H:MM` or `H:MM:SS` string to meridian form.
///
/// Input that already carries an `am`/`pm` marker (any case) is returned
/// unchanged. Seconds are only rendered when nonzero.
///
/// ```
/// use eruv_alerts::time::to_meridian;
///
/// assert_eq!(to_meridian("0:00").unwrap(), "12:00 AM");
/// assert_eq!(to_meridian("13:05").unwrap(), "1:05 PM");
/// assert_eq!(to_meridian("6:30 pm").unwrap(), "6:30 pm");
/// ```
pub fn to_meridian(time: &str) -> Result<String> {
    let lower = time.to_ascii_lowercase();
    if lower.contains("am") || lower.contains("pm") {
        return Ok(time.to_string());
    }

    let malformed = || AlertError::MalformedTime(time.to_string());

    let parts: Vec<&str> = time.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(malformed());
    }

    let hour = parse_field(parts[0], 1..=2, 23).ok_or_else(malformed)?;
    let minute = parse_field(parts[1], 2..=2, 59).ok_or_else(malformed)?;
    let second = match parts.get(2) {
        Some(s) => parse_field(s, 2..=2, 59).ok_or_else(malformed)?,
        None => 0,
    };

    let meridian = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour {
        0 => 12,
        13..=23 => hour - 12,
        h => h,
    };

    if second == 0 {
        Ok(format!("{display_hour}:{minute:02} {meridian}"))
    } else {
        Ok(format!("{display_hour}:{minute:02}:{second:02} {meridian}"))
    }
}

/// Parse a run of ASCII digits with a bounded width and maximum value.
fn parse_field(s: &str, width: std::ops::RangeInclusive<usize>, max: u32) -> Option<u32> {
    if !width.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|v| *v <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_is_twelve_am() {
        assert_eq!(to_meridian("0:00").unwrap(), "12:00 AM");
        assert_eq!(to_meridian("00:00").unwrap(), "12:00 AM");
    }

    #[test]
    fn afternoon_subtracts_twelve() {
        assert_eq!(to_meridian("13:05").unwrap(), "1:05 PM");
        assert_eq!(to_meridian("19:05").unwrap(), "7:05 PM");
        assert_eq!(to_meridian("23:59").unwrap(), "11:59 PM");
    }

    #[test]
    fn noon_stays_twelve_pm() {
        assert_eq!(to_meridian("12:00").unwrap(), "12:00 PM");
    }

    #[test]
    fn morning_keeps_hour() {
        assert_eq!(to_meridian("9:07").unwrap(), "9:07 AM");
        assert_eq!(to_meridian("11:30").unwrap(), "11:30 AM");
    }

    #[test]
    fn seconds_only_when_nonzero() {
        assert_eq!(to_meridian("18:42:00").unwrap(), "6:42 PM");
        assert_eq!(to_meridian("18:42:09").unwrap(), "6:42:09 PM");
    }

    #[test]
    fn already_meridian_is_unchanged() {
        assert_eq!(to_meridian("6:30 pm").unwrap(), "6:30 pm");
        assert_eq!(to_meridian("7:12pm").unwrap(), "7:12pm");
        assert_eq!(to_meridian("8:00 AM").unwrap(), "8:00 AM");
    }

    #[test]
    fn malformed_input_fails() {
        for bad in ["", "7", "24:00", "12:60", "1:5", "12:00:75", "ab:cd", "1:00:00:00"] {
            let err = to_meridian(bad).unwrap_err();
            assert!(
                matches!(err, AlertError::MalformedTime(ref s) if s == bad),
                "expected MalformedTime for {bad:?}, got {err:?}"
            );
        }
    }
}
