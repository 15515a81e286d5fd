use pnet_packet::icmp::echo_reply::EchoReplyPacket;
use pnet_packet::icmp::echo_request::{EchoRequestPacket, MutableEchoRequestPacket};
use pnet_packet::icmp::{IcmpCode, IcmpTypes};
use pnet_packet::Packet;

use super::{EchoIdent, SequenceNumber};

/// Fixed filler carried by every echo request.
pub(crate) const PAYLOAD_SIZE: usize = 40;
const FILLER: [u8; PAYLOAD_SIZE] = [b'Q'; PAYLOAD_SIZE];

/// The 8-byte echo header shared by requests and replies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EchoHeader {
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub checksum: u16,
    pub ident: EchoIdent,
    pub sequence_number: SequenceNumber,
}

impl EchoHeader {
    pub(crate) fn is_echo_reply(&self) -> bool {
        self.icmp_type == IcmpTypes::EchoReply.0 && self.icmp_code == 0
    }
}

pub(crate) fn new_echo_request_package(
    ident: EchoIdent,
    sequence_number: SequenceNumber,
) -> Option<MutableEchoRequestPacket<'static>> {
    let buf = vec![0u8; EchoRequestPacket::minimum_packet_size() + PAYLOAD_SIZE];
    let mut package = MutableEchoRequestPacket::owned(buf)?;
    package.set_icmp_type(IcmpTypes::EchoRequest);
    package.set_icmp_code(IcmpCode::new(0));
    package.set_identifier(ident.into());
    package.set_sequence_number(sequence_number.into());
    package.set_payload(&FILLER);

    package.set_checksum(0_u16);
    let checksum = internet_checksum(package.packet());
    package.set_checksum(checksum);
    Some(package)
}

/// Parses the echo header out of the ICMP bytes of a datagram. The IPv4
/// header of a raw-socket read must already be stripped (see `RawSocket`).
pub(crate) fn decode_echo_header(buf: &[u8]) -> Option<EchoHeader> {
    let package = EchoReplyPacket::new(buf)?;
    Some(EchoHeader {
        icmp_type: package.get_icmp_type().0,
        icmp_code: package.get_icmp_code().0,
        checksum: package.get_checksum(),
        ident: package.get_identifier().into(),
        sequence_number: package.get_sequence_number().into(),
    })
}

/// RFC 1071 Internet checksum: one's-complement sum over big-endian 16-bit
/// words, carry folded back into the low 16 bits twice, complemented. The
/// checksum field must be zeroed before computing; a buffer embedding its own
/// correct checksum sums to 0.
pub(crate) fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut words = data.chunks_exact(2);
    for word in &mut words {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u32::from(*last) << 8;
    }
    sum = (sum >> 16) + (sum & 0xffff);
    sum += sum >> 16;
    !(sum as u16)
}
