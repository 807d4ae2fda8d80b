//! Inter-task communication channels
//!
//! Defines the statics shared between Embassy tasks. Commands travel over
//! embassy-sync channels and signals; snapshots that any task may read at
//! any time sit in critical-section mutexes.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use ntpclock_core::config::ClockConfig;
use ntpclock_core::display::{DisplayBuffer, COLUMNS};
use ntpclock_core::state::Event;
use ntpclock_core::status::{NetworkInfo, SyncStatus};
use ntpclock_core::traits::SwitchState;

/// Channel capacity for clock commands
const CLOCK_CHANNEL_SIZE: usize = 4;

/// Channel capacity for chime requests
const CHIME_CHANNEL_SIZE: usize = 2;

/// Requests handled by the clock task
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockCommand {
    /// Network bring-up progress from the link task
    Network(Event),
    /// Console session opened: stop polling and leave the display alone
    Suspend,
    /// Console session closed: start over from the initial poll phase
    Resume,
    /// Running configuration changed
    Reconfigure(ClockConfig),
}

/// Something for the chime task to sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChimeRequest {
    /// The hour, from the time digits shown at the top of the hour
    Hour([u8; COLUMNS]),
    /// Hours and minutes, asked for at the console
    Time([u8; COLUMNS]),
    /// A freshly assigned IPv4 address
    Address([u8; 4]),
}

/// Digits shown on the LED matrix
///
/// Written by the clock task and the console `display` command, read by
/// the scan task at interrupt priority.
pub static DISPLAY: DisplayBuffer = DisplayBuffer::new();

/// Commands for the clock task
pub static CLOCK_CHANNEL: Channel<CriticalSectionRawMutex, ClockCommand, CLOCK_CHANNEL_SIZE> =
    Channel::new();

/// Requests for the chime task
pub static CHIME_CHANNEL: Channel<CriticalSectionRawMutex, ChimeRequest, CHIME_CHANNEL_SIZE> =
    Channel::new();

/// New credentials for the link task; it rejoins if they differ
pub static LINK_CONFIG: Signal<CriticalSectionRawMutex, ClockConfig> = Signal::new();

/// Latest engine snapshot (updated by the clock task every tick; `None`
/// until its first tick)
pub static STATUS: Mutex<CriticalSectionRawMutex, Cell<Option<SyncStatus>>> =
    Mutex::new(Cell::new(None));

/// Latest mode switch positions (sampled by the clock task every tick)
pub static SWITCHES: Mutex<CriticalSectionRawMutex, Cell<SwitchState>> =
    Mutex::new(Cell::new(SwitchState {
        twelve_hour: false,
        show_date: false,
        chimes: false,
    }));

/// WiFi link state (updated by the link task)
pub static NETWORK: Mutex<CriticalSectionRawMutex, Cell<NetworkInfo>> =
    Mutex::new(Cell::new(NetworkInfo {
        connected: false,
        address: None,
    }));

/// Read a published snapshot
pub fn snapshot<T: Copy>(cell: &Mutex<CriticalSectionRawMutex, Cell<T>>) -> T {
    cell.lock(|c| c.get())
}

/// Replace a published snapshot
pub fn publish<T: Copy>(cell: &Mutex<CriticalSectionRawMutex, Cell<T>>, value: T) {
    cell.lock(|c| c.set(value));
}
