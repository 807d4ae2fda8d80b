//! SNTP request encoding and response validation

use crate::timestamp::NtpTimestamp;

/// Well-known NTP server port
pub const NTP_PORT: u16 = 123;

/// Protocol version sent in requests
pub const NTP_VERSION: u8 = 4;

/// Size of an SNTP packet without extensions
pub const PACKET_LEN: usize = 48;

const ORIGINATE: usize = 24;
const RECEIVE: usize = 32;
const TRANSMIT: usize = 40;

/// Errors from packet encoding or response validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Fewer than 48 bytes received
    TooShort,
    /// Mode is not server or broadcast
    InvalidMode,
    /// Server reports its clock is not synchronized
    Unsynchronized,
    /// Stratum 0: the server asked us to back off
    KissOfDeath,
    /// Stratum above 15
    InvalidStratum,
    /// Transmit timestamp is zero
    ZeroTimestamp,
    /// Output buffer too small for a request
    BufferTooSmall,
}

/// Leap second warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LeapIndicator {
    NoWarning,
    LastMinute61,
    LastMinute59,
    /// Clock not synchronized
    Alarm,
}

impl LeapIndicator {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::LastMinute61,
            2 => LeapIndicator::LastMinute59,
            _ => LeapIndicator::Alarm,
        }
    }
}

/// Association mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    Client = 3,
    Server = 4,
    Broadcast = 5,
}

/// Write a client request into `buf`
///
/// `transmit` is echoed back by the server as the originate timestamp,
/// so it can be any value the caller wants to match against.
pub fn encode_request(transmit: NtpTimestamp, buf: &mut [u8]) -> Result<usize, PacketError> {
    if buf.len() < PACKET_LEN {
        return Err(PacketError::BufferTooSmall);
    }

    let packet = &mut buf[..PACKET_LEN];
    packet.fill(0);
    // LI = 0, VN = 4, Mode = 3
    packet[0] = (NTP_VERSION << 3) | Mode::Client as u8;
    packet[TRANSMIT..TRANSMIT + 8].copy_from_slice(&transmit.to_bytes());

    Ok(PACKET_LEN)
}

/// A validated server response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SntpResponse {
    pub leap: LeapIndicator,
    pub version: u8,
    pub mode: Mode,
    pub stratum: u8,
    pub poll: i8,
    pub precision: i8,
    /// Reference clock identifier (or upstream server address)
    pub reference_id: [u8; 4],
    /// Our request's transmit timestamp as echoed by the server
    pub originate: NtpTimestamp,
    /// When the server received the request
    pub receive: NtpTimestamp,
    /// When the server sent the response
    pub transmit: NtpTimestamp,
}

fn timestamp_at(buf: &[u8], offset: usize) -> NtpTimestamp {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    NtpTimestamp::from_bytes(bytes)
}

impl SntpResponse {
    /// Decode and validate a response packet
    pub fn decode(buf: &[u8]) -> Result<Self, PacketError> {
        if buf.len() < PACKET_LEN {
            return Err(PacketError::TooShort);
        }

        let leap = LeapIndicator::from_bits(buf[0] >> 6);
        let version = (buf[0] >> 3) & 0x07;
        let mode = match buf[0] & 0x07 {
            4 => Mode::Server,
            5 => Mode::Broadcast,
            _ => return Err(PacketError::InvalidMode),
        };

        let stratum = buf[1];
        match stratum {
            0 => return Err(PacketError::KissOfDeath),
            1..=15 => {}
            _ => return Err(PacketError::InvalidStratum),
        }
        if leap == LeapIndicator::Alarm {
            return Err(PacketError::Unsynchronized);
        }

        let transmit = timestamp_at(buf, TRANSMIT);
        if transmit.seconds == 0 {
            return Err(PacketError::ZeroTimestamp);
        }

        Ok(Self {
            leap,
            version,
            mode,
            stratum,
            poll: buf[2] as i8,
            precision: buf[3] as i8,
            reference_id: [buf[12], buf[13], buf[14], buf[15]],
            originate: timestamp_at(buf, ORIGINATE),
            receive: timestamp_at(buf, RECEIVE),
            transmit,
        })
    }

    /// Server time in whole Unix seconds
    pub fn unix_time(&self) -> i64 {
        self.transmit.to_unix()
    }

    /// Whether this answers the request sent with `transmit`
    ///
    /// Broadcast packets never match.
    pub fn answers(&self, transmit: NtpTimestamp) -> bool {
        self.mode == Mode::Server && self.originate == transmit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 2026-10-19 12:00:00 UTC
    const NOON: u32 = 4_001_400_000;

    fn response(first: u8, stratum: u8, transmit_secs: u32) -> [u8; PACKET_LEN] {
        let mut buf = [0u8; PACKET_LEN];
        buf[0] = first;
        buf[1] = stratum;
        buf[2] = 6;
        buf[3] = 0xEC; // -20
        buf[12..16].copy_from_slice(b"GPS\0");
        buf[24..32].copy_from_slice(&NtpTimestamp::new(7, 9).to_bytes());
        buf[32..40].copy_from_slice(&NtpTimestamp::new(transmit_secs, 0).to_bytes());
        buf[40..48].copy_from_slice(&NtpTimestamp::new(transmit_secs, 0x8000_0000).to_bytes());
        buf
    }

    #[test]
    fn test_encode_request() {
        let mut buf = [0xFFu8; 64];
        let len = encode_request(NtpTimestamp::new(7, 9), &mut buf).unwrap();

        assert_eq!(len, PACKET_LEN);
        assert_eq!(buf[0], 0x23);
        assert!(buf[1..40].iter().all(|&b| b == 0));
        assert_eq!(&buf[40..48], &[0, 0, 0, 7, 0, 0, 0, 9]);
        // Bytes past the packet are untouched
        assert_eq!(buf[48], 0xFF);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 47];
        assert_eq!(
            encode_request(NtpTimestamp::default(), &mut buf),
            Err(PacketError::BufferTooSmall)
        );
    }

    #[test]
    fn test_decode_server_response() {
        // LI = 0, VN = 4, Mode = 4
        let buf = response(0x24, 1, NOON);
        let resp = SntpResponse::decode(&buf).unwrap();

        assert_eq!(resp.leap, LeapIndicator::NoWarning);
        assert_eq!(resp.version, 4);
        assert_eq!(resp.mode, Mode::Server);
        assert_eq!(resp.stratum, 1);
        assert_eq!(resp.precision, -20);
        assert_eq!(&resp.reference_id, b"GPS\0");
        assert_eq!(resp.unix_time(), 1_792_411_200);
        assert!(resp.answers(NtpTimestamp::new(7, 9)));
        assert!(!resp.answers(NtpTimestamp::new(7, 10)));
    }

    #[test]
    fn test_decode_broadcast() {
        let buf = response(0x25, 2, NOON);
        let resp = SntpResponse::decode(&buf).unwrap();
        assert_eq!(resp.mode, Mode::Broadcast);
        assert!(!resp.answers(NtpTimestamp::new(7, 9)));
    }

    #[test]
    fn test_leap_warning_accepted() {
        let buf = response(0x64, 2, NOON);
        let resp = SntpResponse::decode(&buf).unwrap();
        assert_eq!(resp.leap, LeapIndicator::LastMinute61);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            SntpResponse::decode(&[0u8; 47]),
            Err(PacketError::TooShort)
        );
        assert_eq!(
            SntpResponse::decode(&response(0x23, 1, NOON)),
            Err(PacketError::InvalidMode)
        );
        assert_eq!(
            SntpResponse::decode(&response(0x24, 0, NOON)),
            Err(PacketError::KissOfDeath)
        );
        assert_eq!(
            SntpResponse::decode(&response(0x24, 16, NOON)),
            Err(PacketError::InvalidStratum)
        );
        assert_eq!(
            SntpResponse::decode(&response(0xE4, 1, NOON)),
            Err(PacketError::Unsynchronized)
        );
        assert_eq!(
            SntpResponse::decode(&response(0x24, 1, 0)),
            Err(PacketError::ZeroTimestamp)
        );
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = SntpResponse::decode(&bytes);
        }

        #[test]
        fn prop_valid_response_time(stratum in 1u8..=15, secs in 0x8000_0000u32..) {
            let buf = response(0x24, stratum, secs);
            let resp = SntpResponse::decode(&buf).unwrap();
            prop_assert_eq!(resp.unix_time(), i64::from(secs) - 2_208_988_800);
        }
    }
}
