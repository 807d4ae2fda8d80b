//! Configuration persistence
//!
//! Loads and saves the running clock configuration in flash storage.
//! Falls back to the embedded defaults if flash is empty or unreadable.

use defmt::*;

use ntpclock_core::config::{parse_config, ClockConfig, CONFIG_VERSION};
use ntpclock_hal::flash::{FlashError, FlashStorage, StorageKey};

/// Maximum serialized config size (binary)
const MAX_CONFIG_SIZE: usize = 256;

/// Default configuration compiled into the firmware
///
/// Edit clock.toml and rebuild to customize.
const EMBEDDED_CONFIG: &str = include_str!("../../clock.toml");

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch,
    /// Stored configuration failed validation
    Invalid(ntpclock_core::config::ConfigError),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Configuration persistence manager
///
/// Handles loading and saving the clock configuration in flash storage.
pub struct ConfigPersistence<S> {
    storage: S,
}

impl<S: FlashStorage> ConfigPersistence<S> {
    /// Create a new config persistence manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the configuration from flash (binary postcard format)
    pub async fn load(&mut self) -> Result<ClockConfig, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self
            .storage
            .read(StorageKey::ClockConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of config from flash", len);

        let config: ClockConfig =
            postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: found {}, expected {}",
                config.version, CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch);
        }
        config.validate().map_err(ConfigError::Invalid)?;

        log_config_summary(&config);
        Ok(config)
    }

    /// Save the configuration to flash
    ///
    /// Incomplete configurations are stored as-is; they are rejected again
    /// on the next load.
    pub async fn save(&mut self, config: &ClockConfig) -> Result<(), ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let data = postcard::to_slice(config, &mut buffer).map_err(|_| ConfigError::Serialize)?;

        self.storage.write(StorageKey::ClockConfig, data).await?;
        info!("Saved {} bytes of config to flash", data.len());
        Ok(())
    }

    /// Load from flash, or fall back to the embedded defaults
    pub async fn load_or_default(&mut self) -> ClockConfig {
        match self.load().await {
            Ok(config) => {
                info!("Loaded configuration from flash");
                config
            }
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                info!("No configuration in flash, using embedded defaults");
                embedded_default()
            }
            Err(e) => {
                warn!("Failed to load configuration: {:?}, using embedded defaults", e);
                embedded_default()
            }
        }
    }
}

/// Parse the embedded clock.toml
///
/// build.rs has already validated it, so the fallback only guards
/// against the two parsers disagreeing.
pub fn embedded_default() -> ClockConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded clock.toml rejected: {:?}", e);
            ClockConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &ClockConfig) {
    info!("Configuration loaded successfully");
    debug!("  ssid: {}", config.ssid.as_str());
    debug!("  ntp server: {}", config.ntp_server.as_str());
    debug!(
        "  polling: {}s initial, {}s steady after {} syncs",
        config.init_update, config.sync_update, config.sync_valid
    );
    debug!(
        "  utc offset: {} min, dst: {}",
        config.utc_offset_minutes,
        config.dst_rule.name()
    );
}
