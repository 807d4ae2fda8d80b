//! NTP 32.32 fixed-point timestamps

/// Seconds from 1900-01-01 (NTP epoch) to 1970-01-01 (Unix epoch)
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

/// Length of era 0 in seconds
const ERA_SECONDS: i64 = 1 << 32;

/// Seconds and fraction since the NTP epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpTimestamp {
    pub seconds: u32,
    pub fraction: u32,
}

impl NtpTimestamp {
    /// Timestamp with the given seconds and fraction
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    /// Decode from big-endian wire order
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self {
            seconds: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            fraction: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Encode in big-endian wire order
    pub fn to_bytes(self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&self.seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&self.fraction.to_be_bytes());
        bytes
    }

    /// Whether this is the "unknown time" marker
    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }

    /// Whole seconds since the Unix epoch
    ///
    /// Era 0 ends in February 2036. Seconds values with the top bit clear
    /// are taken to be in era 1, which keeps the conversion correct from
    /// January 1968 to February 2104.
    pub fn to_unix(&self) -> i64 {
        let mut ntp = i64::from(self.seconds);
        if self.seconds & 0x8000_0000 == 0 {
            ntp += ERA_SECONDS;
        }
        ntp - NTP_UNIX_OFFSET
    }

    /// Timestamp for whole Unix seconds, wrapping into the current era
    pub fn from_unix(unix: i64) -> Self {
        let ntp = (unix + NTP_UNIX_OFFSET).rem_euclid(ERA_SECONDS);
        Self::new(ntp as u32, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unix_epoch() {
        let ts = NtpTimestamp::new(2_208_988_800, 0);
        assert_eq!(ts.to_unix(), 0);
        assert_eq!(NtpTimestamp::from_unix(0), ts);
    }

    #[test]
    fn test_known_date() {
        // 2026-10-19 12:00:00 UTC
        let ts = NtpTimestamp::new(4_001_400_000, 0);
        assert_eq!(ts.to_unix(), 1_792_411_200);
    }

    #[test]
    fn test_era_rollover() {
        // Last second of era 0: 2036-02-07 06:28:15 UTC
        let last = NtpTimestamp::new(u32::MAX, 0);
        assert_eq!(last.to_unix(), 2_085_978_495);

        // First second of era 1
        let first = NtpTimestamp::new(0, 1);
        assert_eq!(first.to_unix(), 2_085_978_496);
    }

    #[test]
    fn test_wire_order() {
        let ts = NtpTimestamp::new(0x0102_0304, 0xA0B0_C0D0);
        assert_eq!(
            ts.to_bytes(),
            [0x01, 0x02, 0x03, 0x04, 0xA0, 0xB0, 0xC0, 0xD0]
        );
        assert_eq!(NtpTimestamp::from_bytes(ts.to_bytes()), ts);
    }

    proptest! {
        #[test]
        fn prop_unix_conversion(unix in -61_505_152i64..4_233_462_144) {
            // Whole pivoted range, January 1968 to February 2104
            let ts = NtpTimestamp::from_unix(unix);
            prop_assert_eq!(ts.to_unix(), unix);
        }
    }
}
