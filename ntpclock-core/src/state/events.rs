//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Configuration loaded, begin network bring-up
    Start,
    /// Halt for reconfiguration
    Stop,
    /// Leave the stopped state and start over
    Restart,

    // Network events
    /// WiFi association and address configuration completed
    Associated,
    /// WiFi association attempt failed
    AssociationFailed,
    /// Link or address lost
    LinkLost,

    // Sync events
    /// NTP sync attempt succeeded
    SyncSucceeded,
    /// NTP sync attempt failed or timed out
    SyncFailed,
}

impl Event {
    /// Check if this event comes from the network-association collaborator
    pub fn is_network_event(&self) -> bool {
        matches!(
            self,
            Event::Associated | Event::AssociationFailed | Event::LinkLost
        )
    }

    /// Check if this event is the outcome of a sync attempt
    pub fn is_sync_event(&self) -> bool {
        matches!(self, Event::SyncSucceeded | Event::SyncFailed)
    }
}
