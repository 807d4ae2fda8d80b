//! Hardware and network abstraction traits
//!
//! These traits define the interface between the application logic
//! and board-specific implementations.

pub mod beeper;
pub mod display;
pub mod switches;
pub mod time_source;

pub use beeper::Beeper;
pub use display::ColumnDriver;
pub use switches::{ModeSwitches, SwitchState};
pub use time_source::{SyncError, TimeSource};
