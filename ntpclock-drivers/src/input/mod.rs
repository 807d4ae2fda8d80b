//! Input drivers

pub mod switches;

pub use switches::GpioSwitches;
