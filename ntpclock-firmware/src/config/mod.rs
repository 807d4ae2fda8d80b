//! Configuration loading and saving
//!
//! Loads the clock configuration from flash or the embedded clock.toml
//! defaults, parsed by the core no_std parser.

pub mod loader;

pub use loader::ConfigPersistence;
