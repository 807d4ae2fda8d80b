//! Six-column LED matrix display
//!
//! The display is a binary clock: each column shows one decimal digit
//! (hh:mm:ss) as a stack of LEDs. Columns are scanned one at a time from
//! an interrupt-priority task, reading a lock-free shared buffer that the
//! clock task rewrites once per second.

pub mod buffer;
pub mod derive;
pub mod mux;

pub use buffer::{
    column_mask, parse_hex_digits, DisplayBuffer, DisplayError, COLUMNS, COLUMN_LEDS,
};
pub use derive::{date_digits, derive_digits, time_digits, PM_FLAG};
pub use mux::DisplayMultiplexer;

/// Display refresh rate in column scans per second
pub const SCANS_PER_SECOND: u32 = 400;
