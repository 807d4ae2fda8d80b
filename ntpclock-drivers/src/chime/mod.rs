//! Chime drivers

pub mod beeper;

pub use beeper::{play, GpioBeeper};
