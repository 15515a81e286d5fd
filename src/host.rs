use std::time::Duration;

use crate::icmp::v4::EchoIdent;

/// One monitored endpoint. Immutable once created; the echo identifier is
/// assigned randomly at construction and stays fixed for the host's lifetime.
#[derive(Clone, Debug)]
pub struct Host {
    address: String,
    name: String,
    ident: EchoIdent,
    timeout: Duration,
    interval: Duration,
}

impl Host {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new(address: &str, name: &str, timeout: Duration) -> Host {
        Host {
            address: address.to_owned(),
            name: name.to_owned(),
            ident: EchoIdent::random(),
            timeout,
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Host {
        self.interval = interval;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn ident(&self) -> EchoIdent {
        self.ident
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_two_seconds() {
        let host = Host::new("10.0.0.1", "gw", Duration::from_millis(1000));

        assert_eq!("10.0.0.1", host.address());
        assert_eq!("gw", host.name());
        assert_eq!(Duration::from_millis(1000), host.timeout());
        assert_eq!(Duration::from_secs(2), host.interval());
    }

    #[test]
    fn with_interval_overrides_default() {
        let host =
            Host::new("10.0.0.1", "gw", Duration::from_millis(500)).with_interval(Duration::from_secs(5));

        assert_eq!(Duration::from_secs(5), host.interval());
    }
}
