mod echo;
pub(crate) use echo::{decode_echo_header, internet_checksum, new_echo_request_package};
pub(crate) use echo::EchoHeader;

mod icmpv4;
pub(crate) use icmpv4::{EchoReply, IcmpV4};

mod ident;
pub(crate) use ident::EchoIdent;

mod sequence_number;
pub(crate) use sequence_number::SequenceNumber;

mod socket;
pub use socket::raw_socket::RawSocket;
pub use socket::Socket;

#[cfg(test)]
pub(crate) use socket::tests::{OnReceive, OnSend, SocketMock};
