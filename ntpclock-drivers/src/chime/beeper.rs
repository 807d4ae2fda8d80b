//! GPIO beeper
//!
//! A self-oscillating piezo buzzer switched by one GPIO pin, and a player
//! that sounds a Morse tone sequence on any [`Beeper`].

use embedded_hal_async::delay::DelayNs;
use ntpclock_core::chime::Morse;
use ntpclock_core::traits::Beeper;
use ntpclock_hal::{OutputPin, Polarity};

/// Buzzer on a GPIO pin
pub struct GpioBeeper<P> {
    pin: P,
    polarity: Polarity,
    sounding: bool,
}

impl<P: OutputPin> GpioBeeper<P> {
    /// Create a silent beeper
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut beeper = Self {
            pin,
            polarity,
            sounding: false,
        };
        beeper.set_tone(false);
        beeper
    }
}

impl<P: OutputPin> Beeper for GpioBeeper<P> {
    fn set_tone(&mut self, on: bool) {
        self.sounding = on;
        self.pin.set_state(self.polarity.level(on));
    }

    fn is_sounding(&self) -> bool {
        self.sounding
    }
}

/// Play a tone sequence, leaving the beeper silent afterwards
pub async fn play<B: Beeper, D: DelayNs>(beeper: &mut B, delay: &mut D, morse: &Morse) {
    for tone in morse.iter() {
        beeper.set_tone(tone.on);
        delay.delay_ms(u32::from(tone.duration_ms)).await;
    }
    beeper.set_tone(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use ntpclock_core::chime::{number_in_morse, MORSE_DOT_MS};

    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// Records every tone change
    struct LoggingBeeper {
        inner: GpioBeeper<MockPin>,
        log: Vec<bool>,
    }

    impl Beeper for LoggingBeeper {
        fn set_tone(&mut self, on: bool) {
            self.log.push(on);
            self.inner.set_tone(on);
        }

        fn is_sounding(&self) -> bool {
            self.inner.is_sounding()
        }
    }

    /// Delay that only accumulates the requested time
    #[derive(Default)]
    struct FakeDelay {
        total_ms: u32,
    }

    impl DelayNs for FakeDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn test_active_high_beeper() {
        let mut beeper = GpioBeeper::new(MockPin::default(), Polarity::ActiveHigh);
        assert!(!beeper.is_sounding());
        assert!(!beeper.pin.is_set_high());

        beeper.set_tone(true);
        assert!(beeper.is_sounding());
        assert!(beeper.pin.is_set_high());
    }

    #[test]
    fn test_active_low_beeper() {
        let mut beeper = GpioBeeper::new(MockPin::default(), Polarity::ActiveLow);
        assert!(beeper.pin.is_set_high());

        beeper.set_tone(true);
        assert!(!beeper.pin.is_set_high());
    }

    #[test]
    fn test_play_sequence() {
        let mut beeper = LoggingBeeper {
            inner: GpioBeeper::new(MockPin::default(), Polarity::ActiveHigh),
            log: Vec::new(),
        };
        let mut delay = FakeDelay::default();
        let morse = number_in_morse(5);

        block_on(play(&mut beeper, &mut delay, &morse));

        assert_eq!(delay.total_ms, morse.duration_ms());
        // Two digits of five symbols each
        assert_eq!(beeper.log.iter().filter(|&&on| on).count(), 10);
        assert_eq!(beeper.log.last(), Some(&false));
        assert!(!beeper.is_sounding());
        assert!(delay.total_ms > 10 * u32::from(MORSE_DOT_MS));
    }
}
