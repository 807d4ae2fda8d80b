//! Mode switches on GPIO inputs
//!
//! Three switches select 12-hour display, date display and the hourly
//! chime. They are read once per clock tick, so no debouncing is done.

use ntpclock_core::traits::{ModeSwitches, SwitchState};
use ntpclock_hal::{InputPin, Polarity};

/// Mode switches wired to input pins
pub struct GpioSwitches<P> {
    twelve_hour: P,
    show_date: P,
    chimes: P,
    polarity: Polarity,
}

impl<P: InputPin> GpioSwitches<P> {
    pub fn new(twelve_hour: P, show_date: P, chimes: P, polarity: Polarity) -> Self {
        Self {
            twelve_hour,
            show_date,
            chimes,
            polarity,
        }
    }

    /// Switches that close to ground against a pull-up
    pub fn active_low(twelve_hour: P, show_date: P, chimes: P) -> Self {
        Self::new(twelve_hour, show_date, chimes, Polarity::ActiveLow)
    }
}

impl<P: InputPin> ModeSwitches for GpioSwitches<P> {
    fn read(&self) -> SwitchState {
        SwitchState {
            twelve_hour: self.polarity.is_active(self.twelve_hour.is_high()),
            show_date: self.polarity.is_active(self.show_date.is_high()),
            chimes: self.polarity.is_active(self.chimes.is_high()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct MockInput<'a>(&'a Cell<bool>);

    impl InputPin for MockInput<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_active_low_switches() {
        let twelve = Cell::new(true);
        let date = Cell::new(true);
        let chime = Cell::new(true);
        let switches =
            GpioSwitches::active_low(MockInput(&twelve), MockInput(&date), MockInput(&chime));

        // Pulled up, nothing pressed
        assert_eq!(switches.read(), SwitchState::default());

        twelve.set(false);
        chime.set(false);
        assert_eq!(
            switches.read(),
            SwitchState {
                twelve_hour: true,
                show_date: false,
                chimes: true,
            }
        );
    }

    #[test]
    fn test_active_high_switches() {
        let on = Cell::new(true);
        let off = Cell::new(false);
        let switches = GpioSwitches::new(
            MockInput(&off),
            MockInput(&on),
            MockInput(&off),
            Polarity::ActiveHigh,
        );
        assert!(switches.read().show_date);
        assert!(!switches.read().twelve_hour);
    }
}
