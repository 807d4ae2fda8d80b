//! Front-panel mode switches

/// Switch positions sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchState {
    /// 12-hour display instead of 24-hour
    pub twelve_hour: bool,
    /// Show the date (dd mm yy) instead of the time
    pub show_date: bool,
    /// Sound the hourly morse chime
    pub chimes: bool,
}

/// Source of the mode switch positions
pub trait ModeSwitches {
    /// Sample all switches
    fn read(&self) -> SwitchState;
}

impl ModeSwitches for SwitchState {
    fn read(&self) -> SwitchState {
        *self
    }
}
