//! Chime task
//!
//! Sounds Morse sequences on the beeper. Requests that arrive while one is
//! playing wait in the channel.

use defmt::*;
use embassy_time::Delay;

use ntpclock_core::chime::{hour_chime, ip_in_morse, time_in_morse, Morse};
use ntpclock_drivers::chime::{play, GpioBeeper};
use ntpclock_hal_rp2040::RpOutput;

use crate::channels::{ChimeRequest, CHIME_CHANNEL};

/// The board's beeper
pub type Buzzer = GpioBeeper<RpOutput<'static>>;

/// Chime task - plays one request at a time
#[embassy_executor::task]
pub async fn chime_task(mut beeper: Buzzer) {
    info!("Chime task started");

    let mut delay = Delay;

    loop {
        let request = CHIME_CHANNEL.receive().await;
        let morse = sequence(request);
        debug!(
            "Chime {:?}: {} tones, {} ms",
            request,
            morse.tones().len(),
            morse.duration_ms()
        );
        play(&mut beeper, &mut delay, &morse).await;
    }
}

fn sequence(request: ChimeRequest) -> Morse {
    match request {
        ChimeRequest::Hour(digits) => hour_chime(&digits),
        ChimeRequest::Time(digits) => time_in_morse(&digits),
        ChimeRequest::Address(ip) => ip_in_morse(ip),
    }
}
