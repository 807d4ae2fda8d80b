//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in ntpclock-core, built on the `ntpclock-hal` pin traits:
//!
//! - LED matrix column/row driver
//! - Mode switches
//! - Beeper and Morse chime player

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod chime;
pub mod display;
pub mod input;
