//! RP2040-specific HAL for the ntpclock firmware
//!
//! Implements the shared `ntpclock-hal` traits on top of embassy-rp:
//!
//! - GPIO output and input pins
//! - Flash storage in the last 64KB of the 2MB flash

#![no_std]

pub mod flash;
pub mod gpio;

pub use flash::Rp2040FlashStorage;
pub use gpio::{RpInput, RpOutput};
