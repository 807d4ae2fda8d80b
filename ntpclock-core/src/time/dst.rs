//! Local time: fixed UTC offset plus an optional daylight saving rule

use chrono::{NaiveDate, Weekday};

use super::clock_time::{ClockTime, UnixTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Daylight saving rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DstRule {
    /// No daylight saving
    #[default]
    None,
    /// EU: last Sunday of March 01:00 UTC until last Sunday of October 01:00 UTC
    Eu,
    /// US: second Sunday of March 02:00 local until first Sunday of November 02:00 local
    Us,
}

impl DstRule {
    /// Parse a rule name as used in config files and on the CLI
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(DstRule::None),
            "eu" => Some(DstRule::Eu),
            "us" => Some(DstRule::Us),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DstRule::None => "none",
            DstRule::Eu => "eu",
            DstRule::Us => "us",
        }
    }
}

/// Conversion from network (UTC) time to the displayed local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTimeConfig {
    /// Standard-time offset from UTC in minutes
    pub utc_offset_minutes: i16,
    /// Daylight saving rule
    pub dst_rule: DstRule,
}

impl LocalTimeConfig {
    /// Convert a UTC instant into local calendar time
    pub fn to_local(&self, utc: UnixTime) -> Option<ClockTime> {
        let standard = utc + self.utc_offset_minutes as i64 * 60;
        let is_dst = self.is_dst(utc, standard)?;
        let local = if is_dst { standard + 3600 } else { standard };
        ClockTime::from_unix(local).map(|t| t.with_dst(is_dst))
    }

    fn is_dst(&self, utc: UnixTime, standard: UnixTime) -> Option<bool> {
        match self.dst_rule {
            DstRule::None => Some(false),
            DstRule::Eu => {
                let year = ClockTime::from_unix(utc)?.year();
                let start = switch_instant(year, 3, Sunday::Last, 1)?;
                let end = switch_instant(year, 10, Sunday::Last, 1)?;
                Some(utc >= start && utc < end)
            }
            DstRule::Us => {
                let year = ClockTime::from_unix(standard)?.year();
                let start = switch_instant(year, 3, Sunday::Nth(2), 2)?;
                // 02:00 daylight time is 01:00 standard time
                let end = switch_instant(year, 11, Sunday::Nth(1), 1)?;
                Some(standard >= start && standard < end)
            }
        }
    }
}

/// Which Sunday of the month a rule switches on
#[derive(Debug, Clone, Copy)]
enum Sunday {
    Nth(u8),
    Last,
}

fn sunday_of(year: u16, month: u32, sunday: Sunday) -> Option<NaiveDate> {
    let year = i32::from(year);
    match sunday {
        Sunday::Nth(n) => NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, n),
        Sunday::Last => NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, 5)
            .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, 4)),
    }
}

/// The switch moment as seconds on the rule's own time scale
fn switch_instant(year: u16, month: u32, sunday: Sunday, hour: u32) -> Option<UnixTime> {
    let date = sunday_of(year, month, sunday)?;
    Some(date.and_hms_opt(hour, 0, 0)?.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> UnixTime {
        ClockTime::new(year, month, day, hour, minute, 0)
            .unwrap()
            .to_unix()
    }

    fn sunday_day(year: u16, month: u32, sunday: Sunday) -> u32 {
        use chrono::Datelike;
        sunday_of(year, month, sunday).unwrap().day()
    }

    #[test]
    fn test_sunday_helpers() {
        // March 2026: last Sunday is the 29th, second Sunday the 8th
        assert_eq!(sunday_day(2026, 3, Sunday::Last), 29);
        assert_eq!(sunday_day(2026, 3, Sunday::Nth(2)), 8);
        // November 2026: first Sunday is the 1st
        assert_eq!(sunday_day(2026, 11, Sunday::Nth(1)), 1);
        // October 2026 has only four Sundays
        assert_eq!(sunday_day(2026, 10, Sunday::Last), 25);
        assert!(sunday_of(2026, 10, Sunday::Nth(5)).is_none());
    }

    #[test]
    fn test_fixed_offset() {
        let config = LocalTimeConfig {
            utc_offset_minutes: -300,
            dst_rule: DstRule::None,
        };
        let t = config.to_local(utc(2026, 1, 1, 3, 30)).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2025, 12, 31));
        assert_eq!((t.hour(), t.minute()), (22, 30));
        assert!(!t.is_dst());
    }

    #[test]
    fn test_eu_transitions() {
        let config = LocalTimeConfig {
            utc_offset_minutes: 0,
            dst_rule: DstRule::Eu,
        };

        let before = config.to_local(utc(2026, 3, 29, 0, 59)).unwrap();
        assert!(!before.is_dst());
        assert_eq!(before.hour(), 0);

        let after = config.to_local(utc(2026, 3, 29, 1, 0)).unwrap();
        assert!(after.is_dst());
        assert_eq!(after.hour(), 2);

        let autumn = config.to_local(utc(2026, 10, 25, 1, 0)).unwrap();
        assert!(!autumn.is_dst());
        assert_eq!(autumn.hour(), 1);
    }

    #[test]
    fn test_us_transitions() {
        // US Eastern, UTC-5
        let config = LocalTimeConfig {
            utc_offset_minutes: -300,
            dst_rule: DstRule::Us,
        };

        // 2026-03-08 07:00 UTC is 02:00 EST, the switch instant
        let spring = config.to_local(utc(2026, 3, 8, 7, 0)).unwrap();
        assert!(spring.is_dst());
        assert_eq!(spring.hour(), 3);

        let just_before = config.to_local(utc(2026, 3, 8, 6, 59)).unwrap();
        assert!(!just_before.is_dst());
        assert_eq!(just_before.hour(), 1);

        // 2026-11-01 06:00 UTC is 01:00 EST, back to standard time
        let fall = config.to_local(utc(2026, 11, 1, 6, 0)).unwrap();
        assert!(!fall.is_dst());
        assert_eq!(fall.hour(), 1);
    }

    #[test]
    fn test_rule_names() {
        for rule in [DstRule::None, DstRule::Eu, DstRule::Us] {
            assert_eq!(DstRule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(DstRule::from_name("mars"), None);
    }
}
