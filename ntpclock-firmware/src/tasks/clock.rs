//! Clock task
//!
//! Owns the sync engine. Once a second it:
//! - advances the clock by the real time elapsed and polls the NTP server
//!   when due
//! - samples the mode switches
//! - rewrites the display buffer (unless the console has it)
//! - triggers the hourly chime
//! - publishes a status snapshot for the console

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker};
use heapless::String;

use ntpclock_core::chime::chime_due;
use ntpclock_core::config::MAX_NTP_SERVER_LEN;
use ntpclock_core::display::time_digits;
use ntpclock_core::state::{Event, State};
use ntpclock_core::sync::{SyncConfig, SyncOutcome, TimeSyncEngine};
use ntpclock_core::traits::ModeSwitches;
use ntpclock_drivers::input::GpioSwitches;
use ntpclock_hal_rp2040::RpInput;

use crate::channels::{
    publish, snapshot, ChimeRequest, ClockCommand, CHIME_CHANNEL, CLOCK_CHANNEL, DISPLAY,
    NETWORK, STATUS, SWITCHES,
};
use crate::net::NtpTimeSource;

/// The board's mode switches
pub type Switches = GpioSwitches<RpInput<'static>>;

/// NTP server host name
pub type ServerName = String<MAX_NTP_SERVER_LEN>;

/// Clock task - advances the engine once a second
#[embassy_executor::task]
pub async fn clock_task(
    config: SyncConfig,
    mut server: ServerName,
    mut source: NtpTimeSource,
    switches: Switches,
) {
    info!("Clock task started");

    let mut engine = TimeSyncEngine::new(config);
    engine.handle_event(Event::Start);

    let mut ticker = Ticker::every(Duration::from_secs(1));
    // Real time already counted into the clock
    let mut counted = Instant::now();

    loop {
        match select(ticker.next(), CLOCK_CHANNEL.receive()).await {
            Either::First(()) => {
                let elapsed = (Instant::now() - counted).as_secs();
                if elapsed == 0 {
                    continue;
                }
                counted += Duration::from_secs(elapsed);

                let seconds = u32::try_from(elapsed).unwrap_or(u32::MAX);
                if seconds > 1 {
                    debug!("Tick ran late, advancing {}s", seconds);
                }
                let synced = on_tick(&mut engine, seconds, &mut source, &server, &switches).await;

                if synced {
                    // The clock now holds the server's answer
                    counted = Instant::now();
                    ticker.reset();
                } else if Instant::now() - counted >= Duration::from_secs(1) {
                    // A poll overran the next deadline; drop the missed
                    // deadlines so none of them starts another poll
                    ticker.reset();
                }
            }
            Either::Second(command) => {
                handle_command(&mut engine, &mut server, command);
                publish(&STATUS, Some(engine.status()));
            }
        }
    }
}

/// Advance the clock by `seconds`, returning whether it synced successfully
async fn on_tick(
    engine: &mut TimeSyncEngine,
    seconds: u32,
    source: &mut NtpTimeSource,
    server: &str,
    switches: &Switches,
) -> bool {
    let switches = switches.read();
    publish(&SWITCHES, switches);

    let synced = match engine.run_elapsed(seconds, source, server).await {
        None => false,
        Some(SyncOutcome::Synced { became_steady }) => {
            debug!("Synced with {}", server);
            if became_steady {
                info!(
                    "Clock disciplined, polling every {}s",
                    engine.poll_interval()
                );
            }
            true
        }
        Some(SyncOutcome::Failed(e)) => {
            warn!("Sync with {} failed: {:?}", server, e);
            false
        }
    };

    if engine.state() != State::Stopped {
        if let Err(e) = engine.update_display(&DISPLAY, switches) {
            warn!("Display update rejected: {:?}", e);
        }

        let clock = engine.clock();
        if engine.state().time_valid() && chime_due(clock, switches) {
            let digits = time_digits(clock, switches.twelve_hour);
            if CHIME_CHANNEL.try_send(ChimeRequest::Hour(digits)).is_err() {
                debug!("Chime busy, hour skipped");
            }
        }
    }

    let status = engine.status();
    publish(&STATUS, Some(status));

    let mut line: String<80> = String::new();
    if status.write_time_line(&mut line).is_ok() {
        debug!("{}", line.as_str());
    }

    synced
}

fn handle_command(engine: &mut TimeSyncEngine, server: &mut ServerName, command: ClockCommand) {
    match command {
        ClockCommand::Network(event) => {
            let state = engine.handle_event(event);
            info!("Network event {:?}, clock {}", event, state.label());
        }
        ClockCommand::Suspend => {
            engine.handle_event(Event::Stop);
            info!("Clock stopped for console session");
        }
        ClockCommand::Resume => {
            engine.handle_event(Event::Restart);
            engine.reset();
            engine.handle_event(Event::Start);
            if snapshot(&NETWORK).address.is_some() {
                engine.handle_event(Event::Associated);
            }
            info!("Clock restarted, state {}", engine.state().label());
        }
        ClockCommand::Reconfigure(config) => {
            if let Err(e) = config.validate() {
                warn!("Configuration not applied: {:?}", e);
                return;
            }
            engine.set_config(SyncConfig::from(&config));
            *server = config.ntp_server;
            info!("Configuration applied");
        }
    }
}
