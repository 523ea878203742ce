//! GPS time conversion utilities
//!
//! Receivers report time as a week number plus milliseconds into the week,
//! counted from the GPS epoch (1980-01-06T00:00:00Z) without leap seconds.
//! These helpers turn that into UTC milliseconds since the Unix epoch.

use crate::error::{GpsError, Result};
use crate::types::{ChannelSet, GRXH_GROUP};
use log::debug;

/// Milliseconds in one GPS week
pub const MS_PER_WEEK: u64 = 604_800_000;

const MS_PER_DAY: u64 = 86_400_000;

/// Milliseconds from 1970-01-01T00:00:00Z to the GPS epoch, 1980-01-06T00:00:00Z
pub const GPS_EPOCH_OFFSET_MS: u64 = ymd_to_days(1980, 1, 6) * MS_PER_DAY;

/// GPS-UTC offset in seconds, correct since 2017-01-01
pub const DEFAULT_LEAP_SECONDS: i64 = 18;

/// Field of the `GRXH` group carrying the receiver's leap second count
pub const GRXH_LEAP_FIELD: &str = "leapS";

/// Where the GPS-UTC leap second offset comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeapSeconds {
    /// Always use this offset
    Fixed(i64),
    /// Use the last non-zero `GRXH.leapS` sample, or `fallback` when the log has none
    FromLog { fallback: i64 },
}

impl Default for LeapSeconds {
    fn default() -> Self {
        LeapSeconds::Fixed(DEFAULT_LEAP_SECONDS)
    }
}

impl LeapSeconds {
    /// Resolve the offset to apply for this log
    pub fn resolve(&self, set: &ChannelSet) -> i64 {
        match *self {
            LeapSeconds::Fixed(seconds) => seconds,
            LeapSeconds::FromLog { fallback } => {
                // receivers log 0 until the almanac arrives
                let logged = set
                    .channel(GRXH_GROUP, GRXH_LEAP_FIELD)
                    .and_then(|channel| {
                        channel
                            .samples
                            .iter()
                            .rev()
                            .filter_map(|(_, value)| value.as_u64())
                            .find(|&seconds| seconds > 0)
                    })
                    .and_then(|seconds| i64::try_from(seconds).ok());
                match logged {
                    Some(seconds) => {
                        debug!("Using {} leap seconds from GRXH", seconds);
                        seconds
                    }
                    None => {
                        debug!("No GRXH leap second count, using {}", fallback);
                        fallback
                    }
                }
            }
        }
    }
}

/// Convert GPS week and millisecond-of-week to Unix epoch milliseconds (UTC)
///
/// Every step is checked; a result outside `u64` is a [`GpsError::TimeOverflow`].
pub fn gps_to_unix_ms(week: u64, ms_of_week: u64, leap_seconds: i64) -> Result<u64> {
    let overflow = || GpsError::TimeOverflow { week, ms_of_week };

    let gps_ms = week
        .checked_mul(MS_PER_WEEK)
        .and_then(|ms| ms.checked_add(GPS_EPOCH_OFFSET_MS))
        .and_then(|ms| ms.checked_add(ms_of_week))
        .ok_or_else(overflow)?;

    let leap_ms = leap_seconds.checked_mul(1000).ok_or_else(overflow)?;
    let utc_ms = if leap_ms >= 0 {
        gps_ms.checked_sub(leap_ms.unsigned_abs())
    } else {
        gps_ms.checked_add(leap_ms.unsigned_abs())
    };
    utc_ms.ok_or_else(overflow)
}

/// Convert parallel week / millisecond-of-week columns
pub fn convert_gps_times(weeks: &[u64], ms_of_week: &[u64], leap_seconds: i64) -> Result<Vec<u64>> {
    debug_assert_eq!(weeks.len(), ms_of_week.len());
    weeks
        .iter()
        .zip(ms_of_week)
        .map(|(&week, &ms)| gps_to_unix_ms(week, ms, leap_seconds))
        .collect()
}

/// Format Unix epoch milliseconds as an ISO 8601 UTC timestamp
pub fn format_utc_timestamp(unix_ms: u64) -> String {
    let days = unix_ms / MS_PER_DAY;
    let ms_of_day = unix_ms % MS_PER_DAY;

    let hours = ms_of_day / 3_600_000;
    let minutes = (ms_of_day % 3_600_000) / 60_000;
    let seconds = (ms_of_day % 60_000) / 1000;
    let millis = ms_of_day % 1000;

    let (year, month, day) = days_to_ymd(days);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year, month, day, hours, minutes, seconds, millis
    )
}

const DAYS_IN_MONTH: [u64; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Convert year/month/day to days since Unix epoch (1970-01-01)
const fn ymd_to_days(year: u64, month: u64, day: u64) -> u64 {
    let mut total_days = 0;

    let mut y = 1970;
    while y < year {
        total_days += if is_leap_year(y) { 366 } else { 365 };
        y += 1;
    }

    let mut m = 1;
    while m < month {
        total_days += DAYS_IN_MONTH[m as usize];
        if m == 2 && is_leap_year(year) {
            total_days += 1;
        }
        m += 1;
    }

    total_days + day - 1
}

/// Convert days since Unix epoch to year/month/day
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    let mut remaining_days = days;
    let mut year = 1970;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let mut month = 1;
    while month <= 12 {
        let mut days_in_month = DAYS_IN_MONTH[month as usize];
        if month == 2 && is_leap_year(year) {
            days_in_month += 1;
        }
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year, month, remaining_days + 1)
}

const fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Channel, Value};

    #[test]
    fn test_gps_epoch_offset() {
        // 3657 days from 1970-01-01 to 1980-01-06
        assert_eq!(GPS_EPOCH_OFFSET_MS, 315_964_800_000);
    }

    #[test]
    fn test_leap_correction_cancels() {
        assert_eq!(gps_to_unix_ms(0, 18_000, 18).unwrap(), GPS_EPOCH_OFFSET_MS);
    }

    #[test]
    fn test_known_date() {
        // GPS week 2238 plus 3 days: 2022-11-30T00:00:00 GPS time
        let ms = gps_to_unix_ms(2238, 3 * MS_PER_DAY, 18).unwrap();
        assert_eq!(format_utc_timestamp(ms), "2022-11-29T23:59:42.000Z");
    }

    #[test]
    fn test_monotonic() {
        let points = [
            (0u64, 0u64),
            (0, 18_000),
            (0, MS_PER_WEEK - 1),
            (1, 0),
            (1, 1),
            (2200, 345_600_200),
            (2200, 345_600_400),
            (2301, 0),
        ];
        let times: Vec<u64> = points
            .iter()
            .map(|&(w, ms)| gps_to_unix_ms(w, ms, 18).unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_overflow_is_reported() {
        match gps_to_unix_ms(u64::MAX / 1000, 0, 18) {
            Err(GpsError::TimeOverflow { week, .. }) => assert_eq!(week, u64::MAX / 1000),
            other => panic!("expected TimeOverflow, got {other:?}"),
        }
        assert!(gps_to_unix_ms(u64::MAX / MS_PER_WEEK, MS_PER_WEEK, 0).is_err());
        assert!(gps_to_unix_ms(0, 0, i64::MAX).is_err());
        assert!(gps_to_unix_ms(0, 0, 400_000_000).is_err());
    }

    #[test]
    fn test_convert_columns() {
        let times = convert_gps_times(&[0, 1], &[18_000, 18_000], 18).unwrap();
        assert_eq!(times, vec![GPS_EPOCH_OFFSET_MS, GPS_EPOCH_OFFSET_MS + MS_PER_WEEK]);
        assert!(convert_gps_times(&[], &[], 18).unwrap().is_empty());
    }

    #[test]
    fn test_leap_seconds_source() {
        let mut set = ChannelSet::new();
        assert_eq!(LeapSeconds::default().resolve(&set), 18);
        assert_eq!(LeapSeconds::FromLog { fallback: 17 }.resolve(&set), 17);

        let channel: Channel = vec![Value::Int(0), Value::Int(18), Value::Int(19)]
            .into_iter()
            .collect();
        set.insert_channel(GRXH_GROUP, GRXH_LEAP_FIELD, channel);
        assert_eq!(LeapSeconds::FromLog { fallback: 17 }.resolve(&set), 19);
        assert_eq!(LeapSeconds::Fixed(18).resolve(&set), 18);
    }

    #[test]
    fn test_zero_leap_seconds_is_unknown() {
        let mut set = ChannelSet::new();
        let unknown: Channel = vec![0i64, 0].into_iter().collect();
        set.insert_channel(GRXH_GROUP, GRXH_LEAP_FIELD, unknown);
        assert_eq!(LeapSeconds::FromLog { fallback: 18 }.resolve(&set), 18);

        // a late zero does not override an earlier real count
        let late_zero: Channel = vec![0i64, 18, 0].into_iter().collect();
        set.insert_channel(GRXH_GROUP, GRXH_LEAP_FIELD, late_zero);
        assert_eq!(LeapSeconds::FromLog { fallback: 17 }.resolve(&set), 18);
    }

    #[test]
    fn test_format_utc_timestamp() {
        assert_eq!(format_utc_timestamp(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(
            format_utc_timestamp(GPS_EPOCH_OFFSET_MS),
            "1980-01-06T00:00:00.000Z"
        );
        // leap day
        assert_eq!(
            format_utc_timestamp(951_782_400_123),
            "2000-02-29T00:00:00.123Z"
        );
    }
}
