//! Serial console task
//!
//! The console is dormant until Enter is pressed. Opening a session stops
//! the clock so the display and configuration can be changed freely;
//! `exit` applies the running configuration and restarts the clock.

use defmt::*;
use embassy_rp::uart::BufferedUart;
use embedded_io_async::{Read, Write};
use heapless::String;

use ntpclock_core::cli::{
    execute, parse, CliAction, CliContext, Input, LineEditor, HELLO, PROMPT,
};
use ntpclock_core::config::ClockConfig;
use ntpclock_core::display::time_digits;
use ntpclock_hal::flash::FlashError;
use ntpclock_hal_rp2040::Rp2040FlashStorage;

use crate::channels::{
    snapshot, ChimeRequest, ClockCommand, CHIME_CHANNEL, CLOCK_CHANNEL, DISPLAY, LINK_CONFIG,
    NETWORK, STATUS, SWITCHES,
};
use crate::config::loader::ConfigError;
use crate::config::ConfigPersistence;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Output collected per flush; `show` is the longest report
const OUT_LEN: usize = 1024;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

type Output = String<OUT_LEN>;

/// Flash-backed configuration store
pub type Persistence = ConfigPersistence<Rp2040FlashStorage<'static>>;

/// Console task - line editing and command dispatch on UART0
#[embassy_executor::task]
pub async fn cli_task(mut uart: BufferedUart, mut config: ClockConfig, mut persistence: Persistence) {
    info!("Console task started");

    let mut editor = LineEditor::new();
    let mut out = Output::new();
    let mut buf = [0u8; RX_BUF_SIZE];
    let mut session = false;
    let mut last = 0u8;

    loop {
        let n = match uart.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            // CRLF terminals send both; one Enter is one line
            let skip = byte == LF && last == CR;
            last = byte;
            if skip {
                continue;
            }

            if !session {
                if byte == CR || byte == LF {
                    session = true;
                    editor.clear();
                    say(&mut uart, &mut out, &["\r\n", HELLO, "\r\n", PROMPT]).await;
                    CLOCK_CHANNEL.send(ClockCommand::Suspend).await;
                    info!("Console session opened");
                }
                continue;
            }

            match editor.feed(byte, &mut out) {
                Ok(Input::Pending) => {}
                Ok(Input::Complete) => {
                    flush(&mut uart, &mut out).await;
                    session = run_line(
                        editor.line(),
                        &mut config,
                        &mut persistence,
                        &mut uart,
                        &mut out,
                    )
                    .await;
                    editor.clear();
                    if session {
                        say(&mut uart, &mut out, &[PROMPT]).await;
                    }
                }
                Err(_) => flush(&mut uart, &mut out).await,
            }
        }

        flush(&mut uart, &mut out).await;
    }
}

/// Run one input line, returning whether the session stays open
async fn run_line(
    line: &str,
    config: &mut ClockConfig,
    persistence: &mut Persistence,
    uart: &mut BufferedUart,
    out: &mut Output,
) -> bool {
    let command = match parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            say(uart, out, &[e.message(), "\r\n"]).await;
            return true;
        }
    };

    let mut ctx = CliContext {
        config,
        display: &DISPLAY,
        status: snapshot(&STATUS).unwrap_or_default(),
        switches: snapshot(&SWITCHES),
        network: snapshot(&NETWORK),
    };
    let action = match execute(command, &mut ctx, out) {
        Ok(action) => action,
        Err(_) => {
            warn!("Console output truncated");
            say(uart, out, &["...\r\n"]).await;
            CliAction::None
        }
    };
    let status = ctx.status;
    let switches = ctx.switches;

    match action {
        CliAction::None => {}
        CliAction::Reconfigure => {
            CLOCK_CHANNEL
                .send(ClockCommand::Reconfigure(config.clone()))
                .await;
        }
        CliAction::Save => {
            let text = match persistence.save(config).await {
                Ok(()) => "Running configuration saved",
                Err(e) => {
                    warn!("Config save failed: {:?}", e);
                    "Save failed"
                }
            };
            say(uart, out, &[text, "\r\n"]).await;
        }
        CliAction::Load => {
            let text = match persistence.load().await {
                Ok(loaded) => {
                    *config = loaded;
                    CLOCK_CHANNEL
                        .send(ClockCommand::Reconfigure(config.clone()))
                        .await;
                    "Loaded saved configuration"
                }
                Err(ConfigError::Flash(FlashError::NotFound)) => "No saved configuration",
                Err(e) => {
                    warn!("Config load failed: {:?}", e);
                    "Saved configuration unreadable"
                }
            };
            say(uart, out, &[text, "\r\n"]).await;
        }
        CliAction::SoundTime => {
            let digits = time_digits(&status.time, switches.twelve_hour);
            if CHIME_CHANNEL.try_send(ChimeRequest::Time(digits)).is_err() {
                say(uart, out, &["Chime busy\r\n"]).await;
            }
        }
        CliAction::Exit => {
            LINK_CONFIG.signal(config.clone());
            CLOCK_CHANNEL
                .send(ClockCommand::Reconfigure(config.clone()))
                .await;
            CLOCK_CHANNEL.send(ClockCommand::Resume).await;
            say(uart, out, &["Bye\r\n"]).await;
            info!("Console session closed");
            return false;
        }
    }
    true
}

/// Append text to the collected output, flushing when it fills up
async fn say(uart: &mut BufferedUart, out: &mut Output, parts: &[&str]) {
    for part in parts {
        if out.push_str(part).is_ok() {
            continue;
        }
        flush(uart, out).await;
        if out.push_str(part).is_err() {
            // Longer than the whole buffer; send it as is
            debug!("Console text of {} bytes sent unbuffered", part.len());
            if let Err(e) = uart.write_all(part.as_bytes()).await {
                warn!("UART write error: {:?}", e);
            }
        }
    }
}

/// Write collected output to the UART
async fn flush(uart: &mut BufferedUart, out: &mut Output) {
    if out.is_empty() {
        return;
    }
    if let Err(e) = uart.write_all(out.as_bytes()).await {
        warn!("UART write error: {:?}", e);
    }
    out.clear();
}
