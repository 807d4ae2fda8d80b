//! SNTP client protocol
//!
//! This crate encodes SNTPv4 client requests and decodes and validates
//! server responses (RFC 4330). It does no I/O; the firmware sends the
//! bytes over UDP port 123.
//!
//! # Packet Overview
//!
//! ```text
//! ┌────┬────┬──────┬─────────┬──────┬───────────┬────────────┬────────────┐
//! │ LI │ VN │ MODE │ STRATUM │ ...  │ ORIGINATE │ RECEIVE    │ TRANSMIT   │
//! │ 2b │ 3b │ 3b   │ 1B      │ 23B  │ 8B (24..) │ 8B (32..)  │ 8B (40..)  │
//! └────┴────┴──────┴─────────┴──────┴───────────┴────────────┴────────────┘
//! ```
//!
//! Timestamps are seconds since 1900-01-01 in 32.32 fixed point.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod sntp;
pub mod timestamp;

pub use sntp::{
    encode_request, LeapIndicator, Mode, PacketError, SntpResponse, NTP_PORT, NTP_VERSION,
    PACKET_LEN,
};
pub use timestamp::{NtpTimestamp, NTP_UNIX_OFFSET};
