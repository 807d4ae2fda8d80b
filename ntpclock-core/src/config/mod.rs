//! Configuration types and parsing
//!
//! The clock configuration is compiled into the firmware as a small TOML
//! file and may be overridden at runtime from the serial console, then
//! persisted to flash as postcard-serialized binary data.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::{
    set_field, ClockConfig, ConfigError, CONFIG_VERSION, MAX_HOST_NAME_LEN, MAX_NTP_SERVER_LEN,
    MAX_PASSWORD_LEN, MAX_SSID_LEN, MAX_UTC_OFFSET_MINUTES,
};
