use std::{io, net::IpAddr, time::Duration};

pub(crate) mod raw_socket;

/// One probe loop owns exactly one socket for its whole lifetime.
pub trait Socket: Send + Sync {
    fn new(timeout: Duration) -> Result<Box<Self>, io::Error>;
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize>;
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)>;
    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()>;
}
