use std::fmt::Write;

use chrono::DateTime;

use crate::error::{FormatError, Result};
use crate::shared::constants::{
    DOT, DURATION_SUFFIX, NANOS_PER_MICROSECOND, NANOS_PER_MILLISECOND, NANOS_PER_SECOND,
    TIMESTAMP_SUFFIX,
};

/// 0001-01-01T00:00:00Z
pub const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
pub const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

const TIMESTAMP_TYPE: &str = "google.protobuf.Timestamp";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fold whole seconds out of `nanos` and make `nanos` non-negative.
#[must_use]
pub const fn normalize_timestamp(seconds: i64, nanos: i32) -> (i64, i32) {
    let extra = nanos / NANOS_PER_SECOND;
    let mut seconds = seconds.saturating_add(extra as i64);
    let mut nanos = nanos - extra * NANOS_PER_SECOND;
    if nanos < 0 {
        nanos += NANOS_PER_SECOND;
        seconds = seconds.saturating_sub(1);
    }
    (seconds, nanos)
}

/// Fold whole seconds out of `nanos` and give `nanos` the sign of `seconds`
/// whenever `seconds` is non-zero.
#[must_use]
pub const fn normalize_duration(seconds: i64, nanos: i32) -> (i64, i32) {
    let extra = nanos / NANOS_PER_SECOND;
    let mut seconds = seconds.saturating_add(extra as i64);
    let mut nanos = nanos - extra * NANOS_PER_SECOND;
    if seconds < 0 && nanos > 0 {
        seconds += 1;
        nanos -= NANOS_PER_SECOND;
    } else if seconds > 0 && nanos < 0 {
        seconds -= 1;
        nanos += NANOS_PER_SECOND;
    }
    (seconds, nanos)
}

/// Append `.` and exactly 3, 6 or 9 digits, or nothing when `nanos` is zero.
pub fn push_fractional_seconds(out: &mut String, nanos: u32) {
    if nanos == 0 {
        return;
    }
    out.push(DOT);
    let nanos = i64::from(nanos);
    if nanos % i64::from(NANOS_PER_MILLISECOND) == 0 {
        let _ = write!(out, "{:03}", nanos / i64::from(NANOS_PER_MILLISECOND));
    } else if nanos % i64::from(NANOS_PER_MICROSECOND) == 0 {
        let _ = write!(out, "{:06}", nanos / i64::from(NANOS_PER_MICROSECOND));
    } else {
        let _ = write!(out, "{nanos:09}");
    }
}

/// RFC 3339 text in UTC, e.g. `1970-01-01T00:00:00.001Z`.
///
/// # Errors
///
/// Returns [`FormatError::MalformedWellKnown`] when the normalized instant
/// falls outside years 0001 through 9999.
pub fn format_timestamp(seconds: i64, nanos: i32) -> Result<String> {
    let (seconds, nanos) = normalize_timestamp(seconds, nanos);
    if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&seconds) {
        return Err(FormatError::malformed(
            TIMESTAMP_TYPE,
            format!("seconds {seconds} outside 0001-01-01T00:00:00Z..=9999-12-31T23:59:59Z"),
        ));
    }
    let date_time = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        FormatError::malformed(TIMESTAMP_TYPE, format!("seconds {seconds} not representable"))
    })?;

    let mut out = String::with_capacity(30);
    let _ = write!(out, "{}", date_time.format(DATE_TIME_FORMAT));
    push_fractional_seconds(&mut out, nanos.unsigned_abs());
    out.push(TIMESTAMP_SUFFIX);
    Ok(out)
}

/// Signed seconds with a fractional suffix, e.g. `-1.5s`.
#[must_use]
pub fn format_duration(seconds: i64, nanos: i32) -> String {
    let (seconds, nanos) = normalize_duration(seconds, nanos);
    let mut out = String::with_capacity(24);
    // Zero seconds carries no sign of its own.
    if seconds == 0 && nanos < 0 {
        out.push('-');
    }
    let _ = write!(out, "{seconds}");
    push_fractional_seconds(&mut out, nanos.unsigned_abs());
    out.push(DURATION_SUFFIX);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(nanos: u32) -> String {
        let mut out = String::new();
        push_fractional_seconds(&mut out, nanos);
        out
    }

    #[test]
    fn fraction_uses_three_six_or_nine_digits() {
        assert_eq!(fraction(0), "");
        assert_eq!(fraction(1_000_000), ".001");
        assert_eq!(fraction(500_000_000), ".500");
        assert_eq!(fraction(1_000), ".000001");
        assert_eq!(fraction(123_456_000), ".123456");
        assert_eq!(fraction(1), ".000000001");
        assert_eq!(fraction(999_999_999), ".999999999");
    }

    #[test]
    fn timestamp_normalization_keeps_nanos_non_negative() {
        assert_eq!(normalize_timestamp(0, -1), (-1, 999_999_999));
        assert_eq!(normalize_timestamp(0, 1_500_000_000), (1, 500_000_000));
        assert_eq!(normalize_timestamp(5, -2_000_000_000), (3, 0));
    }

    #[test]
    fn duration_normalization_matches_signs() {
        assert_eq!(normalize_duration(1, -1), (0, 999_999_999));
        assert_eq!(normalize_duration(-1, 1), (0, -999_999_999));
        assert_eq!(normalize_duration(0, -1), (0, -1));
        assert_eq!(normalize_duration(0, 2_000_000_001), (2, 1));
        assert_eq!(normalize_duration(-3, -1_500_000_000), (-4, -500_000_000));
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(0, 0).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(format_timestamp(0, 1_000_000).unwrap(), "1970-01-01T00:00:00.001Z");
        assert_eq!(format_timestamp(0, -1).unwrap(), "1969-12-31T23:59:59.999999999Z");
        assert_eq!(
            format_timestamp(1_234_567_890, 123_456_000).unwrap(),
            "2009-02-13T23:31:30.123456Z"
        );
    }

    #[test]
    fn timestamp_range_edges() {
        assert_eq!(
            format_timestamp(MIN_TIMESTAMP_SECONDS, 0).unwrap(),
            "0001-01-01T00:00:00Z"
        );
        assert_eq!(
            format_timestamp(MAX_TIMESTAMP_SECONDS, 999_999_999).unwrap(),
            "9999-12-31T23:59:59.999999999Z"
        );
        assert!(format_timestamp(MAX_TIMESTAMP_SECONDS + 1, 0).is_err());
        assert!(format_timestamp(MIN_TIMESTAMP_SECONDS, -1).is_err());
    }

    #[test]
    fn durations_keep_sign_for_zero_seconds() {
        assert_eq!(format_duration(0, -1), "-0.000000001s");
        assert_eq!(format_duration(0, 0), "0s");
        assert_eq!(format_duration(-1, -500_000_000), "-1.500s");
        assert_eq!(format_duration(1, -500_000_000), "0.500s");
        assert_eq!(format_duration(315_576_000_000, 0), "315576000000s");
    }
}
