//! Morse code chime
//!
//! The clock can sound the hour, the time or its IP address as Morse
//! digits on a beeper. Sequences are built up front as a list of
//! [`Tone`]s so the player only has to toggle the beeper and wait.

pub mod morse;

pub use morse::{
    hour_chime, ip_in_morse, number_in_morse, time_in_morse, Morse, Tone, MAX_TONES,
    MORSE_DOT_MS,
};

use crate::time::ClockTime;
use crate::traits::SwitchState;

/// Whether the hourly chime is due at `time`
pub fn chime_due(time: &ClockTime, switches: SwitchState) -> bool {
    switches.chimes && time.minute() == 0 && time.second() == 0
}
