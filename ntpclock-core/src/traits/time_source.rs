//! Network time source trait

use crate::time::UnixTime;

/// Reasons a sync attempt can fail
///
/// None of these are fatal: they are recorded in the reachability
/// register and the attempt is repeated at the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// No response within the request timeout
    Timeout,
    /// Server name could not be resolved
    DnsFailure,
    /// Response failed validation
    MalformedResponse,
    /// Socket could not be opened or the request could not be sent
    Network,
    /// Network link is down
    LinkDown,
}

/// Source of network time
///
/// Implementations must bound each request by a fixed timeout so a dead
/// server cannot stall the caller indefinitely.
pub trait TimeSource {
    /// Query `server` for the current UTC time
    fn request_time(
        &mut self,
        server: &str,
    ) -> impl core::future::Future<Output = Result<UnixTime, SyncError>>;
}
