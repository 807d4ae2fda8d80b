//! Board-agnostic core logic for the ntpclock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Calendar time keeping and DST rules
//! - Clock state machine (network association and timing phases)
//! - NTP-disciplined time sync engine (reachability, poll cadence)
//! - Lock-free display buffer and column-scan multiplexer
//! - Morse chime encoder
//! - Serial command line parsing and execution
//! - Configuration type definitions and parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod chime;
pub mod cli;
pub mod config;
pub mod display;
pub mod state;
pub mod status;
pub mod sync;
pub mod time;
pub mod traits;
