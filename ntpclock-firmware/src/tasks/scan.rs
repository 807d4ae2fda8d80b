//! Display scan task
//!
//! Runs on the interrupt executor so column refresh keeps its cadence
//! while the thread-mode tasks wait on the network or the console.

use defmt::*;
use embassy_time::{Duration, Ticker};

use ntpclock_core::display::{DisplayMultiplexer, SCANS_PER_SECOND};
use ntpclock_drivers::display::GpioMatrix;
use ntpclock_hal_rp2040::RpOutput;

use crate::channels::DISPLAY;

/// The board's LED matrix
pub type Matrix = GpioMatrix<RpOutput<'static>, RpOutput<'static>>;

/// Scan task - lights one column per tick
#[embassy_executor::task]
pub async fn scan_task(matrix: Matrix) {
    info!("Scan task started at {} Hz", SCANS_PER_SECOND);

    let mut mux = DisplayMultiplexer::new(&DISPLAY, matrix);
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(SCANS_PER_SECOND)));

    loop {
        ticker.next().await;
        mux.scan();
    }
}
