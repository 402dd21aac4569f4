use std::net::{IpAddr, Ipv4Addr};
use tokio::net::lookup_host;
use tracing::debug;

use crate::error::{Result, ScanError};
use crate::utils::valid_ipv4;

/// The host as given by the user together with the address it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub raw_input: String,
    pub resolved_address: Ipv4Addr,
}

impl Target {
    pub fn address(&self) -> IpAddr {
        IpAddr::V4(self.resolved_address)
    }
}

pub struct DNSResolver;

impl Default for DNSResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DNSResolver {
    pub fn new() -> DNSResolver {
        DNSResolver
    }

    /// Resolve a hostname or IPv4 literal to the first IPv4 address it maps to.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or address to resolve
    ///
    /// # Returns
    ///
    /// The resolved `Target`, or `ScanError::Resolution` when the name is
    /// malformed, unknown, or has no IPv4 record.
    pub async fn resolve(&self, host: &str) -> Result<Target> {
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(ScanError::resolution(host, "empty host name"));
        }

        if let Some(addr) = valid_ipv4(trimmed) {
            return Ok(Target {
                raw_input: host.to_string(),
                resolved_address: addr,
            });
        }

        // The port is irrelevant to the lookup; lookup_host only takes socket addresses.
        let addrs = lookup_host((trimmed, 0))
            .await
            .map_err(|e| ScanError::resolution(host, e))?;

        let first = addrs
            .filter_map(|addr| match addr.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .next()
            .ok_or_else(|| ScanError::resolution(host, "no IPv4 address found"))?;

        debug!(host = trimmed, address = %first, "resolved target");
        Ok(Target {
            raw_input: host.to_string(),
            resolved_address: first,
        })
    }
}
