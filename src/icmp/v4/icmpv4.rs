use pnet_packet::Packet;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use super::{decode_echo_header, new_echo_request_package};
use super::{EchoHeader, EchoIdent, SequenceNumber, Socket};
use crate::probe_error::ProbeError;

const RECV_BUFFER_SIZE: usize = 128;

/// A decoded incoming ICMP frame together with its arrival instant.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EchoReply {
    pub header: EchoHeader,
    pub receive_time: Instant,
}

/// Echo transport over one host's dedicated socket.
pub(crate) struct IcmpV4<S> {
    socket: S,
}

impl<S> IcmpV4<S>
where
    S: Socket + 'static,
{
    pub(crate) fn new(socket: S) -> IcmpV4<S> {
        IcmpV4 { socket }
    }

    /// Transmits one echo request and returns the send instant.
    pub(crate) fn send_to(
        &self,
        ipv4: Ipv4Addr,
        ident: EchoIdent,
        sequence_number: SequenceNumber,
    ) -> Result<Instant, ProbeError> {
        let addr = SocketAddr::new(IpAddr::V4(ipv4), 0);

        let package = new_echo_request_package(ident, sequence_number).ok_or(ProbeError {
            message: "could not create ICMP echo request".to_owned(),
        })?;

        let send_time = Instant::now();
        self.socket.send_to(package.packet(), &addr.into())?;
        tracing::trace!("echo request sent to {} with sequence {:?}", ipv4, sequence_number);

        Ok(send_time)
    }

    /// Attempts one receive within the socket's read timeout. `Ok(None)`
    /// means nothing usable arrived: the timeout fired or the frame was too
    /// short to carry an echo header.
    pub(crate) fn try_receive(&self) -> io::Result<Option<EchoReply>> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        match self.socket.recv_from(&mut buf) {
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e),
            Ok((n, _addr)) => {
                let receive_time = Instant::now();
                Ok(decode_echo_header(&buf[..n]).map(|header| EchoReply {
                    header,
                    receive_time,
                }))
            }
        }
    }

    pub(crate) fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::v4::{OnReceive, OnSend, SocketMock};

    #[test]
    fn send_one_echo_request() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);
        let icmpv4 = IcmpV4::new(socket_mock.clone());

        let addr = Ipv4Addr::new(127, 0, 0, 1);
        let result = icmpv4.send_to(addr, EchoIdent::from(7), SequenceNumber::start_value());

        assert!(result.is_ok());
        socket_mock
            .should_send_number_of_messages(1)
            .should_send_to_address(&IpAddr::V4(addr));
    }

    #[test]
    fn send_fails_when_socket_fails() {
        let socket_mock = SocketMock::new(OnSend::ReturnErr, OnReceive::ReturnWouldBlock);
        let icmpv4 = IcmpV4::new(socket_mock);

        let result = icmpv4.send_to(
            Ipv4Addr::new(127, 0, 0, 1),
            EchoIdent::from(7),
            SequenceNumber::start_value(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn receive_echoed_frame() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoSentFrame);
        let icmpv4 = IcmpV4::new(socket_mock);

        let ident = EchoIdent::from(0x0102);
        let sequence_number = SequenceNumber::from(3);
        icmpv4
            .send_to(Ipv4Addr::new(127, 0, 0, 1), ident, sequence_number)
            .unwrap();

        let reply = icmpv4.try_receive().unwrap().unwrap();
        assert!(reply.header.is_echo_reply());
        assert_eq!(ident, reply.header.ident);
        assert_eq!(sequence_number, reply.header.sequence_number);
    }

    #[test]
    fn receive_timeout_yields_none() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);
        let icmpv4 = IcmpV4::new(socket_mock);

        let received = icmpv4.try_receive().unwrap();

        assert!(received.is_none());
    }
}
