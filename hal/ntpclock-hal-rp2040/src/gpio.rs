//! GPIO adapters
//!
//! Thin wrappers that let embassy-rp pins stand in for the `ntpclock-hal`
//! pin traits.

use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;
use ntpclock_hal::{InputPin, OutputPin};

/// Push-pull output pin
pub struct RpOutput<'d>(Output<'d>);

impl<'d> RpOutput<'d> {
    /// Configure `pin` as an output driven to `high`
    pub fn new(pin: Peri<'d, impl Pin>, high: bool) -> Self {
        Self(Output::new(pin, Level::from(high)))
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Input pin with internal pull-up
///
/// Used for switches wired to ground.
pub struct RpInput<'d>(Input<'d>);

impl<'d> RpInput<'d> {
    pub fn pull_up(pin: Peri<'d, impl Pin>) -> Self {
        Self(Input::new(pin, Pull::Up))
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
