//! WiFi bring-up and link supervision
//!
//! The CYW43439 on the Pico W is driven over PIO SPI. Once the chip is up
//! the link task owns its control handle: it joins the configured network,
//! waits for DHCP and reports each step to the clock task. It rejoins when
//! the address is lost or the console changes the credentials.

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_net::{Config, ConfigV4, DhcpConfig, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::Pio;
use embassy_rp::Peri;
use embassy_time::Timer;
use static_cell::StaticCell;

use cyw43::{Control, JoinOptions};
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};

use ntpclock_core::config::ClockConfig;
use ntpclock_core::state::Event;
use ntpclock_core::status::NetworkInfo;

use crate::channels::{
    publish, snapshot, ChimeRequest, ClockCommand, CHIME_CHANNEL, CLOCK_CHANNEL, LINK_CONFIG,
    NETWORK, SWITCHES,
};
use crate::Irqs;

/// CYW43 firmware, flashed separately at 1MB
const FIRMWARE_ADDR: usize = 0x1010_0000;
const FIRMWARE_LEN: usize = 230_321;

/// CYW43 country locale matrix, flashed separately at 1.25MB
const CLM_ADDR: usize = 0x1014_0000;
const CLM_LEN: usize = 4752;

/// Delay between failed join attempts
const JOIN_RETRY_SECS: u64 = 5;

/// Sockets: DNS plus one UDP socket per sync, with headroom
const SOCKET_COUNT: usize = 4;

/// Pins and peripherals wired to the CYW43439
pub struct WifiPeripherals {
    pub pwr: Peri<'static, PIN_23>,
    pub cs: Peri<'static, PIN_25>,
    pub pio: Peri<'static, PIO0>,
    pub dio: Peri<'static, PIN_24>,
    pub clk: Peri<'static, PIN_29>,
    pub dma: Peri<'static, DMA_CH0>,
}

type WifiSpi = PioSpi<'static, PIO0, 0, DMA_CH0>;

/// Power up the radio and create the network stack
///
/// Spawns the driver and stack runners. The stack starts with DHCP using
/// `host_name`; joining a network is left to [`link_task`].
pub async fn init(
    spawner: Spawner,
    p: WifiPeripherals,
    host_name: &str,
    seed: u64,
) -> (Control<'static>, Stack<'static>) {
    // SAFETY: both blobs are written to these fixed flash addresses
    // alongside the firmware and are never erased or rewritten at runtime.
    let (fw, clm) = unsafe {
        (
            core::slice::from_raw_parts(FIRMWARE_ADDR as *const u8, FIRMWARE_LEN),
            core::slice::from_raw_parts(CLM_ADDR as *const u8, CLM_LEN),
        )
    };

    let pwr = Output::new(p.pwr, Level::Low);
    let cs = Output::new(p.cs, Level::High);
    let mut pio = Pio::new(p.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.dio,
        p.clk,
        p.dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(unwrap!(cyw43_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("CYW43 initialized");

    static RESOURCES: StaticCell<StackResources<SOCKET_COUNT>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        Config::dhcpv4(dhcp_config(host_name)),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(unwrap!(net_task(runner)));

    (control, stack)
}

fn dhcp_config(host_name: &str) -> DhcpConfig {
    let mut config = DhcpConfig::default();
    config.hostname = heapless::String::try_from(host_name).ok();
    config
}

/// Whether switching from `old` to `new` needs a fresh association
fn needs_rejoin(old: &ClockConfig, new: &ClockConfig) -> bool {
    old.ssid != new.ssid || old.password != new.password || old.host_name != new.host_name
}

#[embassy_executor::task]
async fn cyw43_task(runner: cyw43::Runner<'static, Output<'static>, WifiSpi>) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Link supervision task
///
/// Forwards `Associated`, `AssociationFailed` and `LinkLost` to the clock
/// task and keeps [`NETWORK`] current.
#[embassy_executor::task]
pub async fn link_task(
    mut control: Control<'static>,
    stack: Stack<'static>,
    mut config: ClockConfig,
) -> ! {
    info!("Link task started");

    loop {
        if config.ssid.is_empty() {
            warn!("No WiFi network configured; waiting for the console");
            config = LINK_CONFIG.wait().await;
            stack.set_config_v4(ConfigV4::Dhcp(dhcp_config(&config.host_name)));
            continue;
        }

        info!("Joining WiFi network {}", config.ssid.as_str());
        let options = if config.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(config.password.as_bytes())
        };
        if let Err(e) = control.join(config.ssid.as_str(), options).await {
            warn!("Join failed: status {}", e.status);
            CLOCK_CHANNEL
                .send(ClockCommand::Network(Event::AssociationFailed))
                .await;

            match select(Timer::after_secs(JOIN_RETRY_SECS), LINK_CONFIG.wait()).await {
                Either::First(()) => {}
                Either::Second(new) => {
                    stack.set_config_v4(ConfigV4::Dhcp(dhcp_config(&new.host_name)));
                    config = new;
                }
            }
            continue;
        }

        publish(
            &NETWORK,
            NetworkInfo {
                connected: true,
                address: None,
            },
        );
        info!("WiFi connected, waiting for DHCP...");

        if wait_address(stack, &mut config).await {
            on_address(stack).await;
            supervise(stack, &mut config).await;
        }

        info!("Leaving WiFi network");
        control.leave().await;
        stack.set_config_v4(ConfigV4::Dhcp(dhcp_config(&config.host_name)));
        publish(&NETWORK, NetworkInfo::default());
        CLOCK_CHANNEL
            .send(ClockCommand::Network(Event::LinkLost))
            .await;
    }
}

/// Wait for DHCP, returning `false` if the console changed the link
/// settings first
async fn wait_address(stack: Stack<'static>, config: &mut ClockConfig) -> bool {
    loop {
        match select(stack.wait_config_up(), LINK_CONFIG.wait()).await {
            Either::First(()) => return true,
            Either::Second(new) => {
                let rejoin = needs_rejoin(config, &new);
                *config = new;
                if rejoin {
                    return false;
                }
            }
        }
    }
}

/// Report a newly configured address
async fn on_address(stack: Stack<'static>) {
    let address = stack.config_v4().map(|c| c.address.address().octets());
    if let Some([a, b, c, d]) = address {
        info!("IP address {}.{}.{}.{}", a, b, c, d);
    }

    publish(
        &NETWORK,
        NetworkInfo {
            connected: true,
            address,
        },
    );
    CLOCK_CHANNEL
        .send(ClockCommand::Network(Event::Associated))
        .await;

    if let Some(ip) = address {
        if snapshot(&SWITCHES).chimes && CHIME_CHANNEL.try_send(ChimeRequest::Address(ip)).is_err()
        {
            debug!("Chime busy, address not announced");
        }
    }
}

/// Watch an established link until it drops or must be rejoined
async fn supervise(stack: Stack<'static>, config: &mut ClockConfig) {
    loop {
        match select(stack.wait_config_down(), LINK_CONFIG.wait()).await {
            Either::First(()) => {
                warn!("Network address lost");
                return;
            }
            Either::Second(new) => {
                let rejoin = needs_rejoin(config, &new);
                *config = new;
                if rejoin {
                    return;
                }
                debug!("Link settings unchanged");
            }
        }
    }
}
