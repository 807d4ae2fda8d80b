//! Reachability register
//!
//! An 8-bit shift register of recent sync outcomes, newest in bit 0. A set
//! bit is a successful sync. Eight failures in a row clear it entirely.

/// Rolling record of the last eight sync outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reachability(u8);

impl Reachability {
    /// Number of outcomes the register holds
    pub const WIDTH: u32 = u8::BITS;

    /// Shift in one outcome
    pub fn record(&mut self, success: bool) {
        self.0 = (self.0 << 1) | u8::from(success);
    }

    /// Raw register value
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Successful syncs among the recorded outcomes
    pub fn successes(&self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the most recent attempt succeeded
    pub fn last_succeeded(&self) -> bool {
        self.0 & 1 != 0
    }

    /// Whether every recorded outcome was a failure
    pub fn is_unreachable(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_newest_in_low_bit() {
        let mut reach = Reachability::default();
        reach.record(true);
        assert_eq!(reach.bits(), 0b1);
        reach.record(false);
        assert_eq!(reach.bits(), 0b10);
        assert!(!reach.last_succeeded());
        reach.record(true);
        assert_eq!(reach.bits(), 0b101);
        assert!(reach.last_succeeded());
    }

    #[test]
    fn test_old_outcomes_fall_off() {
        let mut reach = Reachability::default();
        for _ in 0..8 {
            reach.record(true);
        }
        assert_eq!(reach.bits(), 0xFF);

        for _ in 0..8 {
            reach.record(false);
        }
        assert!(reach.is_unreachable());
    }

    proptest! {
        #[test]
        fn prop_successes_then_failures(n in 0u32..=8, m in 0u32..=8) {
            prop_assume!(n + m <= Reachability::WIDTH);

            let mut reach = Reachability::default();
            for _ in 0..n {
                reach.record(true);
            }
            for _ in 0..m {
                reach.record(false);
            }

            // Read MSB first: n ones, then m zeros in the low bits
            let expected = (((1u16 << n) - 1) << m) as u8;
            prop_assert_eq!(reach.bits(), expected);
            prop_assert_eq!(reach.successes(), n);
        }

        #[test]
        fn prop_register_keeps_last_eight(outcomes in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut reach = Reachability::default();
            for &ok in &outcomes {
                reach.record(ok);
            }

            let mut expected = 0u8;
            for (age, &ok) in outcomes.iter().rev().take(8).enumerate() {
                if ok {
                    expected |= 1 << age;
                }
            }
            prop_assert_eq!(reach.bits(), expected);
        }
    }
}
