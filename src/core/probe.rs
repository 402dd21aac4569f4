use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::trace;

/// Outcome of one connection attempt against one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeResult {
    pub port: u16,
    pub is_open: bool,
}

impl ProbeResult {
    pub fn new(port: u16, is_open: bool) -> Self {
        ProbeResult { port, is_open }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_open { "open" } else { "not open" };
        write!(f, "{}/tcp {}", self.port, state)
    }
}

/// Attempt a TCP connect to `address:port`, giving up after `timeout`.
///
/// Only a completed handshake counts as open. Refusals, timeouts and every
/// network error are reported as not open; nothing is propagated. The stream
/// is dropped, and the socket closed, before this returns.
pub async fn probe(address: IpAddr, port: u16, timeout: Duration) -> ProbeResult {
    let socket = SocketAddr::new(address, port);

    let is_open = match tokio::time::timeout(timeout, TcpStream::connect(socket)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            trace!(port, kind = ?e.kind(), "connect failed");
            false
        }
        Err(_) => {
            // The pending connect future is dropped here, which closes its socket.
            trace!(port, "connect timed out");
            false
        }
    };

    ProbeResult { port, is_open }
}
