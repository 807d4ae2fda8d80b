//! ntpclock Hardware Abstraction Layer
//!
//! Traits the clock's drivers are written against, implemented by the
//! chip-specific HAL for the board in use.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ntpclock-firmware                      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ntpclock-drivers (matrix, switches)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ntpclock-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ntpclock-hal-rp2040                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`flash::FlashStorage`] - Persistent key-value storage

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;

pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{InputPin, OutputPin, Polarity};
