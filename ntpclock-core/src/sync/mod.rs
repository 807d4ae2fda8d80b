//! Time sync engine
//!
//! Keeps the calendar clock running one second per tick and disciplines it
//! against a network time source. Polling starts fast and drops to a slow
//! steady interval after enough consecutive successes.

pub mod engine;
pub mod reachability;

pub use engine::{
    PollPhase, SyncConfig, SyncOutcome, SyncState, TickOutcome, TimeSyncEngine,
    SYNC_TIMEOUT_SECS,
};
pub use reachability::Reachability;
