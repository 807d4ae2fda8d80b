//! Command execution

use core::fmt::{self, Write};

use super::command::{Command, COMMAND_NAMES};
use crate::config::{set_field, ClockConfig};
use crate::display::{parse_hex_digits, DisplayBuffer, DisplayError};
use crate::status::{NetworkInfo, SyncStatus};
use crate::traits::SwitchState;

/// Write a line terminated for a serial terminal
macro_rules! outln {
    ($out:expr) => {
        $out.write_str("\r\n")
    };
    ($out:expr, $($arg:tt)*) => {{
        write!($out, $($arg)*)?;
        $out.write_str("\r\n")
    }};
}

/// Follow-up the caller must perform after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CliAction {
    /// Nothing further
    None,
    /// Running configuration changed; re-apply it to the engine
    Reconfigure,
    /// Write the running configuration to flash
    Save,
    /// Replace the running configuration from flash
    Load,
    /// Sound the current time in Morse
    SoundTime,
    /// Close the session and resume the clock
    Exit,
}

/// State a command can read or change
pub struct CliContext<'a> {
    /// Running configuration
    pub config: &'a mut ClockConfig,
    /// Display buffer, written by `display`
    pub display: &'a DisplayBuffer,
    /// Latest engine snapshot
    pub status: SyncStatus,
    /// Mode switch positions
    pub switches: SwitchState,
    /// WiFi link state
    pub network: NetworkInfo,
}

/// Run one command, writing its output to `out`
pub fn execute<W: Write>(
    command: Command<'_>,
    ctx: &mut CliContext<'_>,
    out: &mut W,
) -> Result<CliAction, fmt::Error> {
    match command {
        Command::Clear => {
            *ctx.config = ClockConfig::blank();
            outln!(out, "Running configuration erased")?;
            return Ok(CliAction::Reconfigure);
        }
        Command::Display(digits) => display(ctx.display, digits, out)?,
        Command::Dst(rule) => {
            if let Some(rule) = rule {
                ctx.config.dst_rule = rule;
            }
            outln!(out, "DST rule: {}", ctx.config.dst_rule.name())?;
            if rule.is_some() {
                return Ok(CliAction::Reconfigure);
            }
        }
        Command::Exit => return Ok(CliAction::Exit),
        Command::Help => {
            for name in COMMAND_NAMES {
                outln!(out, "{}", name)?;
            }
            outln!(out)?;
            outln!(out, "'exit' to finish")?;
        }
        Command::HostName(name) => {
            set_text(&mut ctx.config.host_name, name, out)?;
            outln!(out, "Hostname: {}", ctx.config.host_name)?;
        }
        Command::InitUpdate(secs) => {
            if let Some(secs) = secs {
                ctx.config.init_update = secs;
            }
            outln!(out, "Initial update period: {} seconds", ctx.config.init_update)?;
            if secs.is_some() {
                return Ok(CliAction::Reconfigure);
            }
        }
        Command::Load => return Ok(CliAction::Load),
        Command::Morse => {
            // The clock is stopped while the console is open, so ask
            // whether it was ever set rather than whether it is running
            if ctx.status.syncs == 0 {
                outln!(out, "Time not set")?;
            } else {
                let time = ctx.status.time;
                outln!(out, "Sounding {:02}:{:02}", time.hour(), time.minute())?;
                return Ok(CliAction::SoundTime);
            }
        }
        Command::NtpServer(server) => {
            set_text(&mut ctx.config.ntp_server, server, out)?;
            outln!(out, "NTP server: {}", ctx.config.ntp_server)?;
            if server.is_some() {
                return Ok(CliAction::Reconfigure);
            }
        }
        Command::Password(password) => {
            set_text(&mut ctx.config.password, password, out)?;
            outln!(out, "Password: {}", ctx.config.password)?;
        }
        Command::Save => return Ok(CliAction::Save),
        Command::Show => show(ctx, out)?,
        Command::Ssid(ssid) => {
            set_text(&mut ctx.config.ssid, ssid, out)?;
            outln!(out, "SSID: {}", ctx.config.ssid)?;
        }
        Command::SyncUpdate(secs) => {
            if let Some(secs) = secs {
                ctx.config.sync_update = secs;
            }
            outln!(
                out,
                "Update period once sync'ed: {} seconds",
                ctx.config.sync_update
            )?;
            if secs.is_some() {
                return Ok(CliAction::Reconfigure);
            }
        }
        Command::SyncValid(count) => {
            if let Some(count) = count {
                ctx.config.sync_valid = count;
            }
            outln!(
                out,
                "Sync's required before time valid: {}",
                ctx.config.sync_valid
            )?;
            if count.is_some() {
                return Ok(CliAction::Reconfigure);
            }
        }
        Command::UtcOffset(minutes) => {
            if let Some(minutes) = minutes {
                ctx.config.utc_offset_minutes = minutes;
            }
            outln!(
                out,
                "UTC offset: {} minutes",
                ctx.config.utc_offset_minutes
            )?;
            if minutes.is_some() {
                return Ok(CliAction::Reconfigure);
            }
        }
    }
    Ok(CliAction::None)
}

fn set_text<const N: usize, W: Write>(
    field: &mut heapless::String<N>,
    value: Option<&str>,
    out: &mut W,
) -> fmt::Result {
    if let Some(value) = value {
        if set_field(field, value).is_err() {
            outln!(out, "Too long, at most {} characters", N)?;
        }
    }
    Ok(())
}

fn display<W: Write>(buffer: &DisplayBuffer, digits: Option<&str>, out: &mut W) -> fmt::Result {
    let Some(digits) = digits else {
        return outln!(out, "display <six lowercase hex digits without spaces>");
    };

    match parse_hex_digits(digits).and_then(|d| buffer.set_digits(&d)) {
        Ok(()) => Ok(()),
        Err(DisplayError::InvalidLength) => outln!(out, "Need 6 digits"),
        Err(DisplayError::InvalidDigit) => outln!(out, "Digits must be 0-9 or a-f"),
        Err(DisplayError::ValueTooLarge | DisplayError::ColumnOutOfRange) => {
            outln!(out, "Digit too large for its column")
        }
    }
}

fn show<W: Write>(ctx: &CliContext<'_>, out: &mut W) -> fmt::Result {
    let config = &*ctx.config;
    let status = &ctx.status;

    ctx.network.write_summary(out)?;
    outln!(out)?;
    outln!(out, "Running configuration")?;
    outln!(out, "  SSID             : {}", config.ssid)?;
    outln!(out, "  Password         : {}", config.password)?;
    outln!(out, "  NTP server       : {}", config.ntp_server)?;
    outln!(out, "  Clock hostname   : {}", config.host_name)?;
    outln!(out, "  Updates for sync : {}", config.sync_valid)?;
    outln!(out, "  Initial update   : {} seconds", config.init_update)?;
    outln!(out, "  Update period    : {} seconds", config.sync_update)?;
    outln!(out, "  UTC offset       : {} minutes", config.utc_offset_minutes)?;
    outln!(out, "  DST rule         : {}", config.dst_rule.name())?;
    outln!(out)?;

    outln!(out, "Clock state: {}", status.state.label())?;
    outln!(out, "Scan count: {}", ctx.display.scan_count())?;
    out.write_str("Reachability: ")?;
    status.write_reachability(out)?;
    outln!(out)?;
    outln!(out, "Resync count: {} today", status.resync_today)?;
    outln!(
        out,
        "Polling: every {} seconds ({}), next in {}",
        status.poll_interval,
        if status.steady { "steady" } else { "initial" },
        status.next_poll
    )?;
    outln!(out, "Sync faults: {}", status.faults)?;

    let switches = ctx.switches;
    outln!(
        out,
        "Mode: {}",
        if switches.twelve_hour { "12 hour" } else { "24 hour" }
    )?;
    outln!(
        out,
        "Display: {}",
        if switches.show_date { "Date" } else { "Time" }
    )?;
    outln!(
        out,
        "Hourly chimes: {}",
        if switches.chimes { "Enabled" } else { "Disabled" }
    )?;

    status.write_time_line(out)?;
    outln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse;
    use crate::state::State;
    use crate::sync::Reachability;
    use crate::time::{ClockTime, DstRule};
    use std::string::String;

    /// Seven successes, then one failure
    fn mostly_reachable() -> Reachability {
        let mut reach = Reachability::default();
        for _ in 0..7 {
            reach.record(true);
        }
        reach.record(false);
        reach
    }

    struct Console {
        config: ClockConfig,
        display: DisplayBuffer,
    }

    impl Console {
        fn new() -> Self {
            Self {
                config: ClockConfig::default(),
                display: DisplayBuffer::new(),
            }
        }

        fn run(&mut self, line: &str) -> (CliAction, String) {
            let mut ctx = CliContext {
                config: &mut self.config,
                display: &self.display,
                status: SyncStatus {
                    state: State::Timing,
                    time: ClockTime::new(2026, 10, 19, 21, 30, 0).unwrap(),
                    reachability: mostly_reachable(),
                    resync_today: 7,
                    poll_interval: 600,
                    steady: true,
                    syncs: 42,
                    ..Default::default()
                },
                switches: SwitchState {
                    twelve_hour: true,
                    ..Default::default()
                },
                network: NetworkInfo {
                    connected: true,
                    address: Some([10, 0, 0, 7]),
                },
            };
            let command = parse(line).unwrap().unwrap();
            let mut out = String::new();
            let action = execute(command, &mut ctx, &mut out).unwrap();
            (action, out)
        }
    }

    #[test]
    fn test_ssid_set_and_show() {
        let mut console = Console::new();

        let (action, out) = console.run("ssid home-net");
        assert_eq!(action, CliAction::None);
        assert_eq!(out, "SSID: home-net\r\n");
        assert_eq!(console.config.ssid.as_str(), "home-net");

        let (_, out) = console.run("ssid");
        assert_eq!(out, "SSID: home-net\r\n");
    }

    #[test]
    fn test_too_long_keeps_value() {
        let mut console = Console::new();
        let long = format!("hostname {}", "h".repeat(40));
        let (_, out) = console.run(&long);
        assert!(out.starts_with("Too long"));
        assert_eq!(console.config.host_name.as_str(), "ntpclock");
    }

    #[test]
    fn test_interval_changes_reconfigure() {
        let mut console = Console::new();
        let (action, out) = console.run("syncupdate 900");
        assert_eq!(action, CliAction::Reconfigure);
        assert_eq!(out, "Update period once sync'ed: 900 seconds\r\n");
        assert_eq!(console.config.sync_update, 900);

        let (action, _) = console.run("syncupdate");
        assert_eq!(action, CliAction::None);

        let (action, _) = console.run("dst us");
        assert_eq!(action, CliAction::Reconfigure);
        assert_eq!(console.config.dst_rule, DstRule::Us);
    }

    #[test]
    fn test_display_command() {
        let mut console = Console::new();

        let (_, out) = console.run("display");
        assert!(out.starts_with("display <six"));

        let (_, out) = console.run("display 1234");
        assert_eq!(out, "Need 6 digits\r\n");

        let (_, out) = console.run("display 00F000");
        assert_eq!(out, "Digits must be 0-9 or a-f\r\n");

        // Column 2 only has three LEDs
        let (_, out) = console.run("display 00f000");
        assert_eq!(out, "Digit too large for its column\r\n");
        assert_eq!(console.display.digits(), [0; 6]);

        let (_, out) = console.run("display 9f7f7f");
        assert_eq!(out, "");
        assert_eq!(console.display.digits(), [9, 15, 7, 15, 7, 15]);
    }

    #[test]
    fn test_clear_blanks_config() {
        let mut console = Console::new();
        let (action, _) = console.run("clear");
        assert_eq!(action, CliAction::Reconfigure);
        assert!(console.config.ntp_server.is_empty());
        assert_eq!(console.config.sync_update, 0);
    }

    #[test]
    fn test_io_commands_return_actions() {
        let mut console = Console::new();
        assert_eq!(console.run("save").0, CliAction::Save);
        assert_eq!(console.run("load").0, CliAction::Load);
        assert_eq!(console.run("exit").0, CliAction::Exit);
    }

    #[test]
    fn test_morse_needs_a_synced_clock() {
        let mut console = Console::new();
        let (action, out) = console.run("morse");
        assert_eq!(action, CliAction::SoundTime);
        assert_eq!(out, "Sounding 21:30\r\n");

        let mut ctx = CliContext {
            config: &mut console.config,
            display: &console.display,
            status: SyncStatus::default(),
            switches: SwitchState::default(),
            network: NetworkInfo::default(),
        };
        let mut out = String::new();
        let action = execute(Command::Morse, &mut ctx, &mut out).unwrap();
        assert_eq!(action, CliAction::None);
        assert_eq!(out, "Time not set\r\n");
    }

    #[test]
    fn test_help_lists_commands() {
        let mut console = Console::new();
        let (_, out) = console.run("?");
        for name in COMMAND_NAMES {
            assert!(out.contains(name));
        }
        assert!(out.ends_with("'exit' to finish\r\n"));
    }

    #[test]
    fn test_show_report() {
        let mut console = Console::new();
        console.display.record_scan();
        let (_, out) = console.run("show");

        assert!(out.starts_with("WiFi connected, IP 10.0.0.7\r\n"));
        assert!(out.contains("  NTP server       : pool.ntp.org\r\n"));
        assert!(out.contains("Scan count: 1\r\n"));
        assert!(out.contains("Reachability: 0xfe (0b11111110), 7/8 ok, last failed\r\n"));
        assert!(out.contains("Resync count: 7 today\r\n"));
        assert!(out.contains("Mode: 12 hour\r\n"));
        assert!(out.contains("Display: Time\r\n"));
        assert!(out.contains("Hourly chimes: Disabled\r\n"));
        assert!(out.ends_with("[SYNC] 7-0   Monday 19/10/2026 - 21:30:00 STD\r\n"));
    }
}
