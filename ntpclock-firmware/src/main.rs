//! ntpclock - WiFi-synchronized LED matrix clock
//!
//! Main firmware binary for the Raspberry Pi Pico W. Shows hh:mm:ss as six
//! binary-coded columns, keeps the time from an NTP server and offers a
//! serial console for configuration.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ntpclock_core::config::ClockConfig;
use ntpclock_core::sync::SyncConfig;
use ntpclock_drivers::chime::GpioBeeper;
use ntpclock_drivers::display::GpioMatrix;
use ntpclock_drivers::input::GpioSwitches;
use ntpclock_hal::gpio::Polarity;
use ntpclock_hal_rp2040::{Rp2040FlashStorage, RpInput, RpOutput};

use crate::config::ConfigPersistence;
use crate::net::wifi::{self, WifiPeripherals};
use crate::net::{link_task, NtpTimeSource};
use crate::tasks::{chime_task, cli_task, clock_task, scan_task};

mod channels;
mod config;
mod net;
mod tasks;

bind_interrupts!(pub(crate) struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Display scanning runs here, above everything on the thread executor
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Network stack seed; only used for ports and DHCP transaction IDs
const NET_SEED: u64 = 0x4e54_5043_6c6f_636b;

/// Seconds between heartbeat traces
const HEARTBEAT_SECS: u64 = 60;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ntpclock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load configuration from flash (or use embedded defaults)
    let mut persistence = ConfigPersistence::new(Rp2040FlashStorage::new(p.FLASH, p.DMA_CH1));
    let config: ClockConfig = persistence.load_or_default().await;

    // LED matrix: rows GP2-GP5 (LSB first), columns GP6-GP11 (h h m m s s)
    let matrix = GpioMatrix::new(
        [
            RpOutput::new(p.PIN_2, false),
            RpOutput::new(p.PIN_3, false),
            RpOutput::new(p.PIN_4, false),
            RpOutput::new(p.PIN_5, false),
        ],
        [
            RpOutput::new(p.PIN_6, false),
            RpOutput::new(p.PIN_7, false),
            RpOutput::new(p.PIN_8, false),
            RpOutput::new(p.PIN_9, false),
            RpOutput::new(p.PIN_10, false),
            RpOutput::new(p.PIN_11, false),
        ],
        Polarity::ActiveHigh,
        Polarity::ActiveHigh,
    );

    // High-priority executor: SWI_IRQ_1, priority level 2
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(unwrap!(scan_task(matrix)));

    let beeper = GpioBeeper::new(RpOutput::new(p.PIN_12, false), Polarity::ActiveHigh);
    let switches = GpioSwitches::active_low(
        RpInput::pull_up(p.PIN_13),
        RpInput::pull_up(p.PIN_14),
        RpInput::pull_up(p.PIN_15),
    );

    // Console on UART0 (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);

    let (control, stack) = wifi::init(
        spawner,
        WifiPeripherals {
            pwr: p.PIN_23,
            cs: p.PIN_25,
            pio: p.PIO0,
            dio: p.PIN_24,
            clk: p.PIN_29,
            dma: p.DMA_CH0,
        },
        &config.host_name,
        NET_SEED,
    )
    .await;

    spawner.spawn(unwrap!(chime_task(beeper)));
    spawner.spawn(unwrap!(clock_task(
        SyncConfig::from(&config),
        config.ntp_server.clone(),
        NtpTimeSource::new(stack),
        switches,
    )));
    spawner.spawn(unwrap!(link_task(control, stack, config.clone())));
    spawner.spawn(unwrap!(cli_task(uart, config, persistence)));

    info!("All tasks spawned");

    loop {
        Timer::after_secs(HEARTBEAT_SECS).await;
        trace!("Heartbeat");
    }
}
