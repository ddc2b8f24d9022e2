//! Half-hour time-block indexing.
//!
//! A [`TimeBlock`] is a half-open 30-minute slot: `index = hour * 2 + minute / 30`.
//! `09:00` is block 18, `14:30` is block 29. All constraint and objective code
//! downstream works exclusively in this integer index space; string/float/
//! timestamp values are only ever seen at the normalizer boundary and at
//! materialization.

use chrono::{DateTime, Timelike, Utc};

use crate::error::{ScheduleError, ScheduleResult};

/// A half-hour slot index since midnight (`0..48`).
pub type TimeBlock = i64;

/// A value accepted at the input boundary for a time-of-day field: a numeric
/// half-hour count (possibly fractional), a wall-clock timestamp, an
/// hour/minute pair, or an `"HH:MM[:SS]"` string. Empty/missing values are
/// represented by the caller simply not supplying a `RawTime` (see
/// [`parse_time_or_default`]).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    /// A half-hour count, e.g. `12.5` for 12:30. Also covers plain integers.
    Numeric(f64),
    /// A wall-clock timestamp, e.g. `"2024-03-04T09:00:00Z"`. Only the time
    /// of day is used; the date is discarded.
    Timestamp(DateTime<Utc>),
    /// Hour/minute already split out.
    HourMinute { hour: u32, minute: u32 },
    /// `"HH:MM"` or `"HH:MM:SS"`.
    String(String),
}

/// Parse a [`RawTime`] into a [`TimeBlock`] index.
///
/// `Numeric(v)` rounds `v * 2` to the nearest block (so `12.5 -> 25`, not
/// `12.5 * 2 = 25.0` truncated). `Timestamp`, `HourMinute`, and `String` all
/// truncate: `idx = hour * 2 + minute / 30`.
pub fn time_to_index(raw: &RawTime) -> ScheduleResult<TimeBlock> {
    match raw {
        RawTime::Numeric(v) => Ok((v * 2.0).round() as TimeBlock),
        RawTime::Timestamp(dt) => Ok(dt.hour() as TimeBlock * 2 + (dt.minute() / 30) as TimeBlock),
        RawTime::HourMinute { hour, minute } => Ok(*hour as TimeBlock * 2 + (*minute / 30) as TimeBlock),
        RawTime::String(s) => parse_time_string(s),
    }
}

/// Parse a `"HH:MM[:SS]"` string into a block index. Seconds, if present, are ignored.
fn parse_time_string(s: &str) -> ScheduleResult<TimeBlock> {
    let mut parts = s.trim().split(':');
    let hour: u32 = parts
        .next()
        .and_then(|h| h.parse().ok())
        .ok_or_else(|| ScheduleError::UnparseableTime(s.to_string()))?;
    let minute: u32 = parts
        .next()
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| ScheduleError::UnparseableTime(s.to_string()))?;
    Ok(hour as TimeBlock * 2 + (minute / 30) as TimeBlock)
}

/// Parse an optional [`RawTime`], falling back to `default` when absent.
pub fn parse_time_or_default(raw: Option<&RawTime>, default: TimeBlock) -> ScheduleResult<TimeBlock> {
    match raw {
        Some(r) => time_to_index(r),
        None => Ok(default),
    }
}

/// Render a block index back to `"HH:MM"`.
pub fn index_to_time(index: TimeBlock) -> String {
    let hour = index.div_euclid(2);
    let minute = index.rem_euclid(2) * 30;
    format!("{:02}:{:02}", hour, minute)
}

/// Clamp an interval to `[min_block, max_block]`, the way absence-type fixing
/// requires before it ever looks at a row's bounds.
pub fn clamp_interval(start: TimeBlock, end: TimeBlock, min_block: TimeBlock, max_block: TimeBlock) -> (TimeBlock, TimeBlock) {
    (start.max(min_block), end.min(max_block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numeric_rounds_half_hours() {
        assert_eq!(time_to_index(&RawTime::Numeric(12.5)).unwrap(), 25);
        assert_eq!(time_to_index(&RawTime::Numeric(9.0)).unwrap(), 18);
    }

    #[test]
    fn string_truncates_minutes() {
        assert_eq!(time_to_index(&RawTime::String("14:30".into())).unwrap(), 29);
        assert_eq!(time_to_index(&RawTime::String("14:45".into())).unwrap(), 29);
    }

    #[test]
    fn unparseable_string_errors() {
        assert!(time_to_index(&RawTime::String("not-a-time".into())).is_err());
    }

    #[test]
    fn timestamp_uses_only_the_time_of_day() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 4, 14, 45, 0).unwrap();
        assert_eq!(time_to_index(&RawTime::Timestamp(dt)).unwrap(), 29);
    }

    #[test]
    fn timestamp_json_parses_as_rfc3339() {
        let raw: RawTime = serde_json::from_str(r#""2024-03-04T09:00:00Z""#).unwrap();
        assert_eq!(time_to_index(&raw).unwrap(), 18);
    }

    #[test]
    fn default_used_when_missing() {
        assert_eq!(parse_time_or_default(None, 18).unwrap(), 18);
    }

    #[test]
    fn round_trip_every_half_hour() {
        for hour in 0..24 {
            for &minute in &[0u32, 30] {
                let s = format!("{:02}:{:02}", hour, minute);
                let idx = time_to_index(&RawTime::String(s.clone())).unwrap();
                assert_eq!(index_to_time(idx), s);
            }
        }
    }

    #[test]
    fn clamp_restricts_to_bounds() {
        assert_eq!(clamp_interval(-5, 100, 0, 47), (0, 47));
        assert_eq!(clamp_interval(10, 20, 0, 47), (10, 20));
    }
}
