//! Clock state machine
//!
//! Tracks the network association and time discipline phases of the clock.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
