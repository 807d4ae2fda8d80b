//! Networking: WiFi link and the SNTP time source

pub mod ntp;
pub mod wifi;

pub use ntp::NtpTimeSource;
pub use wifi::{link_task, WifiPeripherals};
