//! Command parsing

use crate::time::DstRule;

/// Every command name, in the order `help` lists them
pub const COMMAND_NAMES: [&str; 17] = [
    "clear",
    "display",
    "dst",
    "exit",
    "help",
    "hostname",
    "initupdate",
    "load",
    "morse",
    "ntpserver",
    "password",
    "save",
    "show",
    "ssid",
    "syncupdate",
    "syncvalid",
    "utcoffset",
];

/// Command parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CliError {
    /// First word is not a command
    BadCommand,
    /// Parameter is not a number in range
    BadNumber,
    /// Unknown DST rule name
    BadRule,
}

impl CliError {
    /// Console text for the error
    pub fn message(self) -> &'static str {
        match self {
            CliError::BadCommand => "Bad command",
            CliError::BadNumber => "Bad number",
            CliError::BadRule => "DST rule must be none, eu or us",
        }
    }
}

/// A parsed command line
///
/// Setters take an optional parameter; without one they only print the
/// current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Erase the running configuration
    Clear,
    /// Show six raw hex digits on the display
    Display(Option<&'a str>),
    Dst(Option<DstRule>),
    /// Leave the command line
    Exit,
    /// List commands (`help` or `?`)
    Help,
    HostName(Option<&'a str>),
    InitUpdate(Option<u32>),
    /// Replace the running configuration with the saved one
    Load,
    /// Sound the time on the beeper
    Morse,
    NtpServer(Option<&'a str>),
    Password(Option<&'a str>),
    /// Persist the running configuration
    Save,
    /// Print status and configuration
    Show,
    Ssid(Option<&'a str>),
    SyncUpdate(Option<u32>),
    SyncValid(Option<u8>),
    UtcOffset(Option<i16>),
}

fn number<T: core::str::FromStr>(param: Option<&str>) -> Result<Option<T>, CliError> {
    param
        .map(|p| p.parse().map_err(|_| CliError::BadNumber))
        .transpose()
}

/// Parse one input line
///
/// Returns `Ok(None)` for a blank line. Only the first parameter is used.
pub fn parse(line: &str) -> Result<Option<Command<'_>>, CliError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let param = words.next();

    let command = match name {
        "clear" => Command::Clear,
        "display" => Command::Display(param),
        "dst" => Command::Dst(
            param
                .map(|p| DstRule::from_name(p).ok_or(CliError::BadRule))
                .transpose()?,
        ),
        "exit" => Command::Exit,
        "help" | "?" => Command::Help,
        "hostname" => Command::HostName(param),
        "initupdate" => Command::InitUpdate(number(param)?),
        "load" => Command::Load,
        "morse" => Command::Morse,
        "ntpserver" => Command::NtpServer(param),
        "password" => Command::Password(param),
        "save" => Command::Save,
        "show" => Command::Show,
        "ssid" => Command::Ssid(param),
        "syncupdate" => Command::SyncUpdate(number(param)?),
        "syncvalid" => Command::SyncValid(number(param)?),
        "utcoffset" => Command::UtcOffset(number(param)?),
        _ => return Err(CliError::BadCommand),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("show"), Ok(Some(Command::Show)));
        assert_eq!(parse("?"), Ok(Some(Command::Help)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
        assert_eq!(parse(" save "), Ok(Some(Command::Save)));
        assert_eq!(parse("exit"), Ok(Some(Command::Exit)));
        assert_eq!(parse("morse"), Ok(Some(Command::Morse)));
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            parse("ssid home-net"),
            Ok(Some(Command::Ssid(Some("home-net"))))
        );
        assert_eq!(parse("ssid"), Ok(Some(Command::Ssid(None))));
        assert_eq!(
            parse("display 012345"),
            Ok(Some(Command::Display(Some("012345"))))
        );
        assert_eq!(
            parse("syncupdate 900"),
            Ok(Some(Command::SyncUpdate(Some(900))))
        );
        assert_eq!(
            parse("utcoffset -300"),
            Ok(Some(Command::UtcOffset(Some(-300))))
        );
        assert_eq!(parse("dst eu"), Ok(Some(Command::Dst(Some(DstRule::Eu)))));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("reboot"), Err(CliError::BadCommand));
        assert_eq!(parse("SHOW"), Err(CliError::BadCommand));
        assert_eq!(parse("syncvalid 300"), Err(CliError::BadNumber));
        assert_eq!(parse("initupdate soon"), Err(CliError::BadNumber));
        assert_eq!(parse("dst mars"), Err(CliError::BadRule));
        assert_eq!(CliError::BadCommand.message(), "Bad command");
    }

    #[test]
    fn test_every_listed_name_parses() {
        for name in COMMAND_NAMES {
            assert!(parse(name).is_ok(), "{name} did not parse");
        }
    }
}
