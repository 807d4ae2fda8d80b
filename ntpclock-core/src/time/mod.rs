//! Calendar time keeping
//!
//! The clock runs on broken-down calendar time (`chrono`, no_std) that is
//! advanced by the elapsed seconds each tick and replaced wholesale on
//! every successful sync.

pub mod clock_time;
pub mod dst;

pub use clock_time::{ClockTime, UnixTime, DAY_NAMES};
pub use dst::{DstRule, LocalTimeConfig};
