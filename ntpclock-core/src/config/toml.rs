//! Minimal TOML parser for the clock configuration
//!
//! Handles only the subset the clock needs; it is NOT a general TOML
//! parser.
//!
//! Supported features:
//! - `[section]` headers
//! - Key = value pairs (string, integer)
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and tables of any kind
//! - Multi-line strings and escapes
//! - Dotted keys

use super::types::{set_field, ClockConfig, ConfigError};
use crate::time::DstRule;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value of the wrong type or out of range
    InvalidValue,
    /// String longer than its field allows
    TooLong,
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::TooLong => ParseError::TooLong,
            other => ParseError::Invalid(other),
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Ntp,
    Clock,
}

/// Parse TOML text into a validated `ClockConfig`
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        match parse_key_value(line) {
            Some((key, value)) => apply_value(section, key, value, &mut config)?,
            None => return Err(ParseError::InvalidValue),
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "wifi" => Ok(Section::Wifi),
        "ntp" => Ok(Section::Ntp),
        "clock" => Ok(Section::Clock),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        // Make sure # is not inside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ClockConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Wifi, "ssid") => set_field(&mut config.ssid, parse_string(value)?)?,
        (Section::Wifi, "password") => set_field(&mut config.password, parse_string(value)?)?,

        (Section::Ntp, "server") => set_field(&mut config.ntp_server, parse_string(value)?)?,
        (Section::Ntp, "init_update") => config.init_update = parse_int(value)?,
        (Section::Ntp, "sync_update") => config.sync_update = parse_int(value)?,
        (Section::Ntp, "sync_valid") => config.sync_valid = parse_int(value)?,

        (Section::Clock, "host_name") => set_field(&mut config.host_name, parse_string(value)?)?,
        (Section::Clock, "utc_offset_minutes") => config.utc_offset_minutes = parse_int(value)?,
        (Section::Clock, "dst") => {
            config.dst_rule =
                DstRule::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)?;
        }

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
