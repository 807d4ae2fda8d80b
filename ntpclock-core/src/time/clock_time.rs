//! Broken-down calendar time
//!
//! `ClockTime` wraps a `chrono::NaiveDateTime`, so it is always a valid
//! Gregorian date and time of day. It only moves forward through
//! [`ClockTime::advance`] and is replaced wholesale on every sync.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Seconds since 1970-01-01T00:00:00Z
pub type UnixTime = i64;

/// Years the clock accepts from the network
const YEARS: core::ops::RangeInclusive<i32> = 1970..=9999;

/// Day names indexed by weekday (0 = Sunday)
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Calendar date and time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTime {
    datetime: NaiveDateTime,
    is_dst: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockTime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

impl ClockTime {
    /// Build a time from calendar fields
    ///
    /// Returns `None` if any field is out of range for the given month/year.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if year == 0 {
            return None;
        }
        let datetime = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
            .and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))?;
        Some(Self {
            datetime,
            is_dst: false,
        })
    }

    /// Convert seconds since the Unix epoch into calendar time
    ///
    /// Only years 1970..=9999 are accepted; anything else returns `None`.
    pub fn from_unix(secs: UnixTime) -> Option<Self> {
        let datetime = DateTime::from_timestamp(secs, 0)?.naive_utc();
        if !YEARS.contains(&datetime.year()) {
            return None;
        }
        Some(Self {
            datetime,
            is_dst: false,
        })
    }

    /// Seconds since the Unix epoch, treating this time as UTC
    pub fn to_unix(&self) -> UnixTime {
        self.datetime.and_utc().timestamp()
    }

    /// Advance by `seconds` with full calendar rollover
    ///
    /// Returns `true` when the date changed.
    pub fn advance(&mut self, seconds: u32) -> bool {
        let Some(next) = self
            .datetime
            .checked_add_signed(Duration::seconds(i64::from(seconds)))
        else {
            return false;
        };
        let day_changed = next.date() != self.datetime.date();
        self.datetime = next;
        day_changed
    }

    /// Mark whether daylight saving time is in effect
    pub fn with_dst(mut self, is_dst: bool) -> Self {
        self.is_dst = is_dst;
        self
    }

    /// Hour on a 12-hour dial and whether it is PM
    ///
    /// Midnight and noon both read 12.
    pub fn hour12(&self) -> (u8, bool) {
        let (pm, hour) = self.datetime.hour12();
        (hour as u8, pm)
    }

    pub fn second(&self) -> u8 {
        self.datetime.second() as u8
    }

    pub fn minute(&self) -> u8 {
        self.datetime.minute() as u8
    }

    /// Hour of day, 0-23
    pub fn hour(&self) -> u8 {
        self.datetime.hour() as u8
    }

    /// Day of month, 1-31
    pub fn day(&self) -> u8 {
        self.datetime.day() as u8
    }

    /// Month, 1-12
    pub fn month(&self) -> u8 {
        self.datetime.month() as u8
    }

    pub fn year(&self) -> u16 {
        self.datetime.year() as u16
    }

    /// Day of week, 0 = Sunday
    pub fn weekday(&self) -> u8 {
        self.datetime.weekday().num_days_from_sunday() as u8
    }

    /// Zero-based day of year
    pub fn yearday(&self) -> u16 {
        self.datetime.ordinal0() as u16
    }

    pub fn is_dst(&self) -> bool {
        self.is_dst
    }

    /// Name of the weekday
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.weekday() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_is_thursday() {
        let t = ClockTime::from_unix(0).unwrap();
        assert_eq!(t, ClockTime::default());
        assert_eq!(t.day_name(), "Thursday");
        assert_eq!(t.weekday(), 4);
    }

    #[test]
    fn test_new_rejects_invalid_dates() {
        assert!(ClockTime::new(2023, 2, 29, 0, 0, 0).is_none());
        assert!(ClockTime::new(2024, 2, 29, 0, 0, 0).is_some());
        assert!(ClockTime::new(2024, 13, 1, 0, 0, 0).is_none());
        assert!(ClockTime::new(2024, 4, 31, 0, 0, 0).is_none());
        assert!(ClockTime::new(2024, 1, 1, 24, 0, 0).is_none());
        assert!(ClockTime::new(2024, 1, 1, 0, 0, 60).is_none());
        assert!(ClockTime::new(0, 1, 1, 0, 0, 0).is_none());
    }

    #[test]
    fn test_year_end_rollover() {
        // Wednesday 31 Dec 2025 -> Thursday 1 Jan 2026
        let mut t = ClockTime::new(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(t.weekday(), 3);
        assert_eq!(t.yearday(), 364);

        let day_changed = t.advance(1);
        assert!(day_changed);
        assert_eq!(t, ClockTime::new(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(t.weekday(), 4);
        assert_eq!(t.yearday(), 0);
    }

    #[test]
    fn test_leap_day_rollover() {
        let mut t = ClockTime::new(2024, 2, 28, 23, 59, 59).unwrap();
        t.advance(1);
        assert_eq!((t.month(), t.day()), (2, 29));

        let mut t = ClockTime::new(2024, 2, 29, 23, 59, 59).unwrap();
        t.advance(1);
        assert_eq!((t.month(), t.day()), (3, 1));

        let mut t = ClockTime::new(2100, 2, 28, 23, 59, 59).unwrap();
        t.advance(1);
        assert_eq!((t.month(), t.day()), (3, 1));
    }

    #[test]
    fn test_minute_rollover_keeps_day() {
        let mut t = ClockTime::new(2026, 10, 19, 12, 59, 59).unwrap();
        assert!(!t.advance(1));
        assert_eq!((t.hour(), t.minute(), t.second()), (13, 0, 0));
        assert_eq!(t.day(), 19);
    }

    #[test]
    fn test_advance_many_seconds() {
        let mut t = ClockTime::new(2026, 10, 19, 23, 59, 58).unwrap();
        assert!(!t.advance(0));
        assert_eq!(t.second(), 58);

        assert!(t.advance(5));
        assert_eq!(t, ClockTime::new(2026, 10, 20, 0, 0, 3).unwrap());
        assert_eq!(t.day_name(), "Tuesday");
    }

    #[test]
    fn test_known_unix_time() {
        // 2000-03-01T12:34:56Z
        let t = ClockTime::from_unix(951_914_096).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2000, 3, 1));
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 34, 56));
        assert_eq!(t.day_name(), "Wednesday");
        assert_eq!(t.yearday(), 60);
    }

    #[test]
    fn test_unix_range() {
        assert!(ClockTime::from_unix(-1).is_none());
        assert!(ClockTime::from_unix(253_402_300_799).is_some());
        assert!(ClockTime::from_unix(253_402_300_800).is_none());
    }

    #[test]
    fn test_hour12() {
        let at = |h| ClockTime::new(2026, 1, 1, h, 0, 0).unwrap().hour12();
        assert_eq!(at(0), (12, false));
        assert_eq!(at(1), (1, false));
        assert_eq!(at(11), (11, false));
        assert_eq!(at(12), (12, true));
        assert_eq!(at(13), (1, true));
        assert_eq!(at(23), (11, true));
    }

    proptest! {
        #[test]
        fn prop_advance_matches_unix(secs in 0i64..253_402_300_700, step in 0u32..100) {
            let mut t = ClockTime::from_unix(secs).unwrap();
            let before = (t.year(), t.month(), t.day());
            let day_changed = t.advance(step);
            let expected = ClockTime::from_unix(secs + i64::from(step)).unwrap();
            prop_assert_eq!(t, expected);
            prop_assert_eq!(day_changed, before != (t.year(), t.month(), t.day()));
        }

        #[test]
        fn prop_unix_roundtrip(secs in 0i64..253_402_300_799) {
            let t = ClockTime::from_unix(secs).unwrap();
            prop_assert_eq!(t.to_unix(), secs);
            // 1970-01-01 was a Thursday
            let days = secs.div_euclid(86_400);
            prop_assert_eq!(i64::from(t.weekday()), (days + 4).rem_euclid(7));
        }

        #[test]
        fn prop_hour12_range(hour in 0u8..24) {
            let (h, pm) = ClockTime::new(2026, 6, 1, hour, 0, 0).unwrap().hour12();
            prop_assert!((1..=12).contains(&h));
            prop_assert_eq!(pm, hour >= 12);
        }
    }
}
