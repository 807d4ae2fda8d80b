//! Status snapshots and serial time line formatting

use core::fmt::{self, Write};

use crate::state::State;
use crate::sync::Reachability;
use crate::time::ClockTime;
use crate::traits::SyncError;

/// Point-in-time copy of the engine state
///
/// Published by the clock task after every tick so the command line can
/// report without touching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncStatus {
    /// Clock state machine position
    pub state: State,
    /// Local time
    pub time: ClockTime,
    /// Outcomes of the last eight sync attempts
    pub reachability: Reachability,
    /// Successful syncs since local midnight
    pub resync_today: u32,
    /// Current poll interval (seconds)
    pub poll_interval: u32,
    /// Steady polling reached
    pub steady: bool,
    /// Seconds until the next poll
    pub next_poll: u32,
    /// Failed sync attempts since boot
    pub faults: u32,
    /// Successful syncs since boot
    pub syncs: u32,
    /// Seconds since boot
    pub uptime: u32,
    /// Error from the most recent failed attempt
    pub last_error: Option<SyncError>,
}

impl SyncStatus {
    /// Write the one-line time report
    ///
    /// `[SYNC] 3-1234   Monday 19/10/2026 - 12:34:56 DST`; the tag reads
    /// `[INIT]` until the first successful sync.
    pub fn write_time_line<W: Write>(&self, out: &mut W) -> fmt::Result {
        let tag = if self.state.time_valid() {
            "[SYNC]"
        } else {
            "[INIT]"
        };
        let t = &self.time;
        write!(
            out,
            "{} {}-{}   {} {:02}/{:02}/{:04} - {:02}:{:02}:{:02} {}",
            tag,
            self.resync_today,
            self.uptime,
            t.day_name(),
            t.day(),
            t.month(),
            t.year(),
            t.hour(),
            t.minute(),
            t.second(),
            if t.is_dst() { "DST" } else { "STD" },
        )
    }

    /// Write the reachability register as `0x%02x (0b...)` and a summary
    pub fn write_reachability<W: Write>(&self, out: &mut W) -> fmt::Result {
        let reach = self.reachability;
        write!(out, "{:#04x} ({:#010b})", reach.bits(), reach.bits())?;
        if reach.is_unreachable() {
            return out.write_str(", no replies");
        }
        write!(
            out,
            ", {}/{} ok, last {}",
            reach.successes(),
            Reachability::WIDTH,
            if reach.last_succeeded() { "ok" } else { "failed" }
        )
    }
}

/// Network link summary for status output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkInfo {
    /// Associated with the access point
    pub connected: bool,
    /// DHCP-assigned address
    pub address: Option<[u8; 4]>,
}

impl NetworkInfo {
    /// Write `WiFi connected, IP a.b.c.d` or `WiFi not connected`
    pub fn write_summary<W: Write>(&self, out: &mut W) -> fmt::Result {
        match (self.connected, self.address) {
            (true, Some([a, b, c, d])) => write!(out, "WiFi connected, IP {a}.{b}.{c}.{d}"),
            (true, None) => out.write_str("WiFi connected, no address"),
            (false, _) => out.write_str("WiFi not connected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;

    /// Register holding `bits`, oldest outcome shifted in first
    fn register(bits: u8) -> Reachability {
        let mut reach = Reachability::default();
        for bit in (0..8).rev() {
            reach.record(bits & (1 << bit) != 0);
        }
        reach
    }

    fn status(state: State) -> SyncStatus {
        SyncStatus {
            state,
            time: ClockTime::new(2026, 10, 19, 7, 5, 9).unwrap(),
            resync_today: 3,
            uptime: 1234,
            reachability: register(0b1011),
            ..Default::default()
        }
    }

    #[test]
    fn test_time_line() {
        let mut line = String::new();
        status(State::Timing).write_time_line(&mut line).unwrap();
        assert_eq!(line, "[SYNC] 3-1234   Monday 19/10/2026 - 07:05:09 STD");

        let mut line = String::new();
        status(State::Connected).write_time_line(&mut line).unwrap();
        assert!(line.starts_with("[INIT] "));
    }

    #[test]
    fn test_reachability_format() {
        let mut text = String::new();
        status(State::Timing).write_reachability(&mut text).unwrap();
        assert_eq!(text, "0x0b (0b00001011), 3/8 ok, last ok");

        let mut text = String::new();
        SyncStatus {
            reachability: register(0b0110),
            ..Default::default()
        }
        .write_reachability(&mut text)
        .unwrap();
        assert_eq!(text, "0x06 (0b00000110), 2/8 ok, last failed");

        let mut text = String::new();
        SyncStatus::default().write_reachability(&mut text).unwrap();
        assert_eq!(text, "0x00 (0b00000000), no replies");
    }

    #[test]
    fn test_network_summary() {
        let mut text = String::new();
        NetworkInfo {
            connected: true,
            address: Some([192, 168, 1, 40]),
        }
        .write_summary(&mut text)
        .unwrap();
        assert_eq!(text, "WiFi connected, IP 192.168.1.40");

        let mut text = String::new();
        NetworkInfo::default().write_summary(&mut text).unwrap();
        assert_eq!(text, "WiFi not connected");
    }
}
