//! NTP-disciplined clock engine
//!
//! Owns the calendar time, the sync bookkeeping and the clock state
//! machine. It is driven by [`TimeSyncEngine::advance`] with the seconds
//! elapsed since the last call and fed sync outcomes back in; the firmware
//! uses the async [`TimeSyncEngine::run_elapsed`], which does both against
//! any [`TimeSource`].

use super::reachability::Reachability;
use crate::display::{derive_digits, DisplayBuffer, DisplayError, COLUMNS};
use crate::state::{Event, State};
use crate::status::SyncStatus;
use crate::time::{ClockTime, LocalTimeConfig, UnixTime};
use crate::traits::{SwitchState, SyncError, TimeSource};

/// Upper bound on one sync request, in seconds
pub const SYNC_TIMEOUT_SECS: u64 = 5;

/// Engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncConfig {
    /// Poll interval before the clock is considered disciplined (seconds)
    pub init_update: u32,
    /// Poll interval once disciplined (seconds)
    pub sync_update: u32,
    /// Consecutive successes needed to switch to the steady interval
    pub sync_valid: u8,
    /// Offset and DST rule applied to server time
    pub local: LocalTimeConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            init_update: 1,
            sync_update: 600,
            sync_valid: 5,
            local: LocalTimeConfig::default(),
        }
    }
}

impl SyncConfig {
    fn initial_interval(&self) -> u32 {
        self.init_update.max(1)
    }

    fn steady_interval(&self) -> u32 {
        self.sync_update.max(1)
    }

    fn threshold(&self) -> u8 {
        self.sync_valid.max(1)
    }
}

/// Polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollPhase {
    /// Fast polling until `sync_valid` consecutive successes
    #[default]
    Initial,
    /// Slow polling, kept until reset
    Steady,
}

/// Sync bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncState {
    phase: PollPhase,
    countdown: u32,
    reachability: Reachability,
    consecutive: u8,
    resync_today: u32,
    faults: u32,
    syncs: u32,
    uptime: u32,
    last_error: Option<SyncError>,
}

impl SyncState {
    /// Current polling phase
    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// Seconds until the next poll
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Recent sync outcomes
    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    /// Successes since the last failure in the initial phase
    pub fn consecutive(&self) -> u8 {
        self.consecutive
    }

    /// Successful syncs since local midnight
    pub fn resync_today(&self) -> u32 {
        self.resync_today
    }

    /// Failed sync attempts since boot
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Successful syncs since boot
    pub fn syncs(&self) -> u32 {
        self.syncs
    }

    /// Ticks since boot
    pub fn uptime(&self) -> u32 {
        self.uptime
    }

    /// Error from the most recent failed attempt
    pub fn last_error(&self) -> Option<SyncError> {
        self.last_error
    }
}

/// Result of advancing the engine by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing further to do this second
    Idle,
    /// A sync attempt is due; report its result with `record_sync`
    PollDue,
}

/// Result of a completed sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Clock replaced from server time
    Synced {
        /// This success switched polling to the steady interval
        became_steady: bool,
    },
    /// Attempt failed; the clock keeps free-running
    Failed(SyncError),
}

/// The clock context: calendar time, sync state and state machine
#[derive(Debug, Clone)]
pub struct TimeSyncEngine {
    config: SyncConfig,
    clock: ClockTime,
    sync: SyncState,
    state: State,
}

impl TimeSyncEngine {
    /// Create an engine at the epoch with a poll due immediately
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            clock: ClockTime::default(),
            sync: SyncState::default(),
            state: State::Init,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// The new intervals apply from the next poll; the phase is kept.
    pub fn set_config(&mut self, config: SyncConfig) {
        self.config = config;
        self.sync.countdown = self.sync.countdown.min(self.poll_interval());
    }

    /// Current local time
    pub fn clock(&self) -> &ClockTime {
        &self.clock
    }

    /// Sync bookkeeping
    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// Current clock state
    pub fn state(&self) -> State {
        self.state
    }

    /// Interval used to reload the countdown
    pub fn poll_interval(&self) -> u32 {
        match self.sync.phase {
            PollPhase::Initial => self.config.initial_interval(),
            PollPhase::Steady => self.config.steady_interval(),
        }
    }

    /// Feed a network event into the state machine
    pub fn handle_event(&mut self, event: Event) -> State {
        self.state = self.state.transition(event);
        self.state
    }

    /// Advance the clock by one second
    pub fn tick(&mut self) -> TickOutcome {
        self.advance(1)
    }

    /// Advance the clock by `seconds` of elapsed real time
    ///
    /// A caller that woke late passes every second that went by, so the
    /// clock keeps pace with real time; at most one poll falls due however
    /// many seconds are covered. Polls only fall due once the network is
    /// up; until then the countdown rests at zero so the first poll happens
    /// right after association.
    pub fn advance(&mut self, seconds: u32) -> TickOutcome {
        if seconds == 0 {
            return TickOutcome::Idle;
        }
        if self.clock.advance(seconds) {
            self.sync.resync_today = 0;
        }
        self.sync.uptime = self.sync.uptime.wrapping_add(seconds);
        self.sync.countdown = self.sync.countdown.saturating_sub(seconds);

        if self.sync.countdown == 0 && self.state.sync_allowed() {
            TickOutcome::PollDue
        } else {
            TickOutcome::Idle
        }
    }

    /// Apply the result of a sync attempt
    pub fn record_sync(&mut self, result: Result<UnixTime, SyncError>) -> SyncOutcome {
        let local = result.and_then(|utc| {
            self.config
                .local
                .to_local(utc)
                .ok_or(SyncError::MalformedResponse)
        });

        let outcome = match local {
            Ok(time) => self.apply_success(time),
            Err(error) => self.apply_failure(error),
        };

        self.sync.countdown = self.poll_interval();
        outcome
    }

    fn apply_success(&mut self, time: ClockTime) -> SyncOutcome {
        if time.day() != self.clock.day() {
            self.sync.resync_today = 0;
        }
        self.clock = time;

        self.sync.reachability.record(true);
        self.sync.consecutive = self.sync.consecutive.saturating_add(1);
        self.sync.resync_today = self.sync.resync_today.saturating_add(1);
        self.sync.syncs = self.sync.syncs.saturating_add(1);

        let became_steady = self.sync.phase == PollPhase::Initial
            && self.sync.consecutive >= self.config.threshold();
        if became_steady {
            self.sync.phase = PollPhase::Steady;
        }

        self.state = self.state.transition(Event::SyncSucceeded);
        SyncOutcome::Synced { became_steady }
    }

    fn apply_failure(&mut self, error: SyncError) -> SyncOutcome {
        self.sync.reachability.record(false);
        self.sync.faults = self.sync.faults.saturating_add(1);
        self.sync.last_error = Some(error);
        if self.sync.phase == PollPhase::Initial {
            self.sync.consecutive = 0;
        }

        self.state = self.state.transition(Event::SyncFailed);
        SyncOutcome::Failed(error)
    }

    /// Advance by `seconds` and, if due, sync against `server`
    pub async fn run_elapsed<S: TimeSource>(
        &mut self,
        seconds: u32,
        source: &mut S,
        server: &str,
    ) -> Option<SyncOutcome> {
        match self.advance(seconds) {
            TickOutcome::Idle => None,
            TickOutcome::PollDue => {
                let result = source.request_time(server).await;
                Some(self.record_sync(result))
            }
        }
    }

    /// Column digits for the current time and switch positions
    pub fn display_digits(&self, switches: SwitchState) -> [u8; COLUMNS] {
        derive_digits(&self.clock, switches)
    }

    /// Rewrite the display buffer from the current time
    pub fn update_display(
        &self,
        buffer: &DisplayBuffer,
        switches: SwitchState,
    ) -> Result<(), DisplayError> {
        buffer.set_digits(&self.display_digits(switches))
    }

    /// Snapshot for status reporting
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            state: self.state,
            time: self.clock,
            reachability: self.sync.reachability,
            resync_today: self.sync.resync_today,
            poll_interval: self.poll_interval(),
            steady: self.sync.phase == PollPhase::Steady,
            next_poll: self.sync.countdown,
            faults: self.sync.faults,
            syncs: self.sync.syncs,
            uptime: self.sync.uptime,
            last_error: self.sync.last_error,
        }
    }

    /// Return to the initial polling phase and poll immediately
    ///
    /// The clock and counters are kept.
    pub fn reset(&mut self) {
        self.sync.phase = PollPhase::Initial;
        self.sync.consecutive = 0;
        self.sync.countdown = 0;
    }
}
