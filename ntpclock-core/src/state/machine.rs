//! State machine definition
//!
//! Network bring-up drives the early transitions; the outcome of sync
//! attempts drives the move into timing.

use super::events::Event;

/// Clock states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Power-on, configuration loaded, network not started
    #[default]
    Init,
    /// WiFi association in progress
    Connecting,
    /// Associated, no successful time sync yet
    Connected,
    /// Clock disciplined by NTP, tick loop running
    Timing,
    /// Halted for reconfiguration
    Stopped,
}

impl State {
    /// Check if sync attempts should be made in this state
    pub fn sync_allowed(&self) -> bool {
        matches!(self, State::Connected | State::Timing)
    }

    /// Check if the displayed time is backed by at least one sync
    pub fn time_valid(&self) -> bool {
        matches!(self, State::Timing)
    }

    /// Short label used by status output
    pub fn label(&self) -> &'static str {
        match self {
            State::Init => "init",
            State::Connecting => "connecting",
            State::Connected => "connected",
            State::Timing => "timing",
            State::Stopped => "stopped",
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Stopped, Restart) => Init,
            (Stopped, _) => Stopped,
            (_, Stop) => Stopped,

            (Init, Start) => Connecting,

            (Connecting, Associated) => Connected,
            (Connecting, AssociationFailed) => Connecting,

            (Connected, SyncSucceeded) => Timing,
            (Connected, SyncFailed) => Connected,
            (Connected, LinkLost) => Connecting,

            // Once disciplined the clock free-runs through failures and outages
            (Timing, SyncSucceeded | SyncFailed | LinkLost) => Timing,

            // Default: stay in current state
            _ => self,
        }
    }
}
