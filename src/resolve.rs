use std::net::{IpAddr, Ipv4Addr};
use std::result::Result;

use crate::probe_error::ProbeError;

/// Resolves a host address to IPv4. IP literals short-circuit the resolver.
pub fn resolve_ipv4(address: &str) -> Result<Ipv4Addr, ProbeError> {
    if let Ok(ipv4) = address.parse::<Ipv4Addr>() {
        return Ok(ipv4);
    }

    let ips: Vec<IpAddr> = dns_lookup::lookup_host(address)?;
    ips.into_iter()
        .find_map(|ip| match ip {
            IpAddr::V4(ipv4) => Some(ipv4),
            IpAddr::V6(_) => None,
        })
        .ok_or(ProbeError {
            message: "could not resolve ".to_owned() + address + " to an IPv4 address",
        })
}
