//! Clock configuration

use heapless::String;

use crate::sync::SyncConfig;
use crate::time::{DstRule, LocalTimeConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout version of the persisted configuration
pub const CONFIG_VERSION: u8 = 1;

/// Maximum WiFi SSID length
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WiFi passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum NTP server name length
pub const MAX_NTP_SERVER_LEN: usize = 32;

/// Maximum DHCP host name length
pub const MAX_HOST_NAME_LEN: usize = 32;

/// Largest accepted UTC offset in either direction (minutes)
pub const MAX_UTC_OFFSET_MINUTES: i16 = 14 * 60;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Value longer than its field allows
    TooLong,
    /// Poll interval of zero seconds
    InvalidInterval,
    /// Sync threshold of zero
    InvalidThreshold,
    /// UTC offset beyond ±14 hours
    InvalidOffset,
    /// No NTP server configured
    EmptyServer,
}

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Layout version
    pub version: u8,
    /// WiFi network name
    pub ssid: String<MAX_SSID_LEN>,
    /// WiFi passphrase
    pub password: String<MAX_PASSWORD_LEN>,
    /// NTP server host name
    pub ntp_server: String<MAX_NTP_SERVER_LEN>,
    /// DHCP host name
    pub host_name: String<MAX_HOST_NAME_LEN>,
    /// Initial poll interval (seconds)
    pub init_update: u32,
    /// Steady poll interval (seconds)
    pub sync_update: u32,
    /// Consecutive successes before steady polling
    pub sync_valid: u8,
    /// Local offset from UTC (minutes)
    pub utc_offset_minutes: i16,
    /// Daylight saving rule
    pub dst_rule: DstRule,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let mut ntp_server = String::new();
        let _ = ntp_server.push_str("pool.ntp.org");
        let mut host_name = String::new();
        let _ = host_name.push_str("ntpclock");

        Self {
            version: CONFIG_VERSION,
            ssid: String::new(),
            password: String::new(),
            ntp_server,
            host_name,
            init_update: 1,
            sync_update: 600,
            sync_valid: 5,
            utc_offset_minutes: 0,
            dst_rule: DstRule::None,
        }
    }
}

impl ClockConfig {
    /// Configuration with every field erased
    ///
    /// What the `clear` command leaves behind; it fails validation until
    /// the console fills it in again.
    pub fn blank() -> Self {
        Self {
            version: CONFIG_VERSION,
            ssid: String::new(),
            password: String::new(),
            ntp_server: String::new(),
            host_name: String::new(),
            init_update: 0,
            sync_update: 0,
            sync_valid: 0,
            utc_offset_minutes: 0,
            dst_rule: DstRule::None,
        }
    }

    /// Check the configuration can drive the sync engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.init_update == 0 || self.sync_update == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.sync_valid == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::InvalidOffset);
        }
        if self.ntp_server.is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        Ok(())
    }

    /// Offset and DST rule as a local time conversion
    pub fn local_time(&self) -> LocalTimeConfig {
        LocalTimeConfig {
            utc_offset_minutes: self.utc_offset_minutes,
            dst_rule: self.dst_rule,
        }
    }
}

impl From<&ClockConfig> for SyncConfig {
    fn from(config: &ClockConfig) -> Self {
        Self {
            init_update: config.init_update,
            sync_update: config.sync_update,
            sync_valid: config.sync_valid,
            local: config.local_time(),
        }
    }
}

/// Copy `value` into a fixed-capacity string field
pub fn set_field<const N: usize>(field: &mut String<N>, value: &str) -> Result<(), ConfigError> {
    let mut next = String::new();
    next.push_str(value).map_err(|_| ConfigError::TooLong)?;
    *field = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ClockConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.ntp_server.as_str(), "pool.ntp.org");
        assert_eq!(config.init_update, 1);
        assert_eq!(config.sync_update, 600);
        assert_eq!(config.sync_valid, 5);
    }

    #[test]
    fn test_blank_is_invalid() {
        assert_eq!(
            ClockConfig::blank().validate(),
            Err(ConfigError::InvalidInterval)
        );
    }

    #[test]
    fn test_validate() {
        let mut config = ClockConfig::default();
        config.sync_valid = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold));

        let mut config = ClockConfig::default();
        config.utc_offset_minutes = -841;
        assert_eq!(config.validate(), Err(ConfigError::InvalidOffset));

        let mut config = ClockConfig::default();
        config.ntp_server.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyServer));
    }

    #[test]
    fn test_set_field() {
        let mut ssid: String<MAX_SSID_LEN> = String::new();
        assert_eq!(set_field(&mut ssid, "home"), Ok(()));
        assert_eq!(ssid.as_str(), "home");

        let long = "x".repeat(MAX_SSID_LEN + 1);
        assert_eq!(set_field(&mut ssid, &long), Err(ConfigError::TooLong));
        assert_eq!(ssid.as_str(), "home");
    }

    #[test]
    fn test_sync_config_from_clock_config() {
        let mut config = ClockConfig::default();
        config.utc_offset_minutes = 60;
        config.dst_rule = DstRule::Eu;

        let sync = SyncConfig::from(&config);
        assert_eq!(sync.sync_update, 600);
        assert_eq!(sync.local.utc_offset_minutes, 60);
        assert_eq!(sync.local.dst_rule, DstRule::Eu);
    }
}
