use super::Socket;
use pnet_packet::{ipv4::Ipv4Packet, Packet};
use socket2::{Domain, Protocol, Type};
use std::{io, net::IpAddr, time::Duration};

const IP_RECV_BUFFER_SIZE: usize = 256;

pub struct RawSocket {
    socket: socket2::Socket,
}

impl Socket for RawSocket {
    fn new(timeout: Duration) -> Result<Box<Self>, io::Error> {
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.set_read_timeout(Some(timeout))?;
        Ok(Box::new(RawSocket { socket }))
    }

    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)> {
        let mut recv_buf = [0u8; IP_RECV_BUFFER_SIZE];

        // Socket2 guarantees it does not read from the buffer, which makes
        // the cast from `&mut [u8]` to `&mut [MaybeUninit<u8>]` sound.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        let (n, socket_addr) = socket2::Socket::recv_from(&self.socket, unsafe {
            &mut *(std::ptr::addr_of_mut!(recv_buf) as *mut [u8]
                as *mut [std::mem::MaybeUninit<u8>])
        })?;

        // A RAW socket hands over the whole IP packet; strip the IPv4 header
        // and pass on only the ICMP content.
        let ipv4_packet = Ipv4Packet::new(&recv_buf[..n])
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "short IPv4 packet"))?;
        let ip_payload = ipv4_packet.payload();
        let len = ip_payload.len().min(buf.len());
        buf[..len].copy_from_slice(&ip_payload[..len]);

        let ip = *socket_addr.as_socket_ipv4().expect("logic error").ip();
        Ok((len, IpAddr::V4(ip)))
    }

    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.socket.set_read_timeout(Some(timeout))
    }
}
