//! SNTP time source over embassy-net
//!
//! One request per sync: resolve the server, send a client packet from an
//! ephemeral port and wait for the matching reply. The whole exchange is
//! bounded by [`SYNC_TIMEOUT_SECS`].

use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Ipv4Address, Stack};
use embassy_time::{with_timeout, Duration, Instant};

use ntpclock_core::sync::SYNC_TIMEOUT_SECS;
use ntpclock_core::time::UnixTime;
use ntpclock_core::traits::{SyncError, TimeSource};
use ntpclock_protocol::{encode_request, NtpTimestamp, SntpResponse, NTP_PORT, PACKET_LEN};

/// Socket buffer size; one packet each way
const SOCKET_BUF_SIZE: usize = 128;

/// Time source querying an NTP server with SNTP
pub struct NtpTimeSource {
    stack: Stack<'static>,
    requests: u32,
}

impl NtpTimeSource {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack, requests: 0 }
    }

    /// Resolve `server`, accepting a dotted IPv4 literal without DNS
    async fn resolve(&self, server: &str) -> Result<IpAddress, SyncError> {
        if let Ok(addr) = server.parse::<Ipv4Address>() {
            return Ok(IpAddress::Ipv4(addr));
        }

        let addrs = self
            .stack
            .dns_query(server, DnsQueryType::A)
            .await
            .map_err(|e| {
                warn!("DNS lookup of {} failed: {:?}", server, e);
                SyncError::DnsFailure
            })?;
        addrs.first().copied().ok_or(SyncError::DnsFailure)
    }

    /// Transmit timestamp for the next request
    ///
    /// Only used to match the reply, so uptime plus a request counter is
    /// enough to make each one unique.
    fn next_transmit(&mut self) -> NtpTimestamp {
        self.requests = self.requests.wrapping_add(1);
        NtpTimestamp::new(Instant::now().as_secs() as u32, self.requests)
    }

    async fn exchange(&mut self, server: &str) -> Result<UnixTime, SyncError> {
        let addr = self.resolve(server).await?;
        let endpoint = IpEndpoint::new(addr, NTP_PORT);

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; SOCKET_BUF_SIZE];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; SOCKET_BUF_SIZE];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| SyncError::Network)?;

        let transmit = self.next_transmit();
        let mut packet = [0u8; PACKET_LEN];
        let len = encode_request(transmit, &mut packet).map_err(|_| SyncError::Network)?;
        socket
            .send_to(&packet[..len], endpoint)
            .await
            .map_err(|_| SyncError::Network)?;
        trace!("SNTP request sent to {}", endpoint);

        let mut reply = [0u8; SOCKET_BUF_SIZE];
        loop {
            let (n, meta) = socket
                .recv_from(&mut reply)
                .await
                .map_err(|_| SyncError::Network)?;

            // Stray datagrams for this port are ignored, not fatal
            if meta.endpoint.addr != addr {
                debug!("Ignoring datagram from {}", meta.endpoint);
                continue;
            }

            let response = SntpResponse::decode(&reply[..n]).map_err(|e| {
                warn!("Bad SNTP response: {:?}", e);
                SyncError::MalformedResponse
            })?;

            if !response.answers(transmit) {
                debug!("Ignoring SNTP reply to another request");
                continue;
            }

            debug!(
                "SNTP reply: stratum {}, ref {:?}",
                response.stratum, response.reference_id
            );
            return Ok(response.unix_time());
        }
    }
}

impl TimeSource for NtpTimeSource {
    async fn request_time(&mut self, server: &str) -> Result<UnixTime, SyncError> {
        if !self.stack.is_config_up() {
            return Err(SyncError::LinkDown);
        }

        with_timeout(
            Duration::from_secs(SYNC_TIMEOUT_SECS),
            self.exchange(server),
        )
        .await
        .map_err(|_| SyncError::Timeout)?
    }
}
