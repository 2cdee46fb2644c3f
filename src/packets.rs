use std::io::Cursor;

use bytes::BytesMut;
use log::{debug, trace};

use crate::protocol::{
    decoding::{decode_remaining_length, decode_u8},
    packet_type::PacketType,
    DecodeError, EncodeError,
};

use connect_packet::ConnectPacket;
use publish_packet::PublishPacket;
use subscribe_packet::SubscribePacket;

pub mod connect_packet;
pub mod publish_packet;
pub mod subscribe_packet;

pub trait DecodablePacket: Sized {
    fn packet_type() -> PacketType;

    /// Checks the first byte of the fixed header before the body is read.
    fn validate_header(fixed_header: u8) -> Result<(), DecodeError> {
        let packet_type = PacketType::from_header(fixed_header)?;
        if packet_type != Self::packet_type() {
            return Err(DecodeError::UnexpectedPacketType {
                expected: Self::packet_type(),
                found: packet_type,
            });
        }

        Ok(())
    }

    /// Decodes the variable header and payload.
    ///
    /// `cursor` covers exactly the `remaining_len` bytes that follow the fixed header.
    fn decode_body(
        cursor: &mut Cursor<&[u8]>,
        fixed_header: u8,
        remaining_len: usize,
    ) -> Result<Self, DecodeError>;

    /// Decodes a complete packet, starting at the fixed header.
    ///
    /// Bytes past the declared Remaining Length are ignored.
    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let header = FixedHeader::decode(buf)?;
        Self::validate_header(header.byte)?;

        let body = header.body(buf)?;
        trace!("{} body: {}", header.packet_type, hex::encode(body));

        let mut cursor = Cursor::new(body);
        Self::decode_body(&mut cursor, header.byte, header.remaining_len)
    }
}

pub trait EncodablePacket: Sized {
    fn encode(&self) -> Result<BytesMut, EncodeError>;
}

/// The type byte and Remaining Length that start every control packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    pub packet_type: PacketType,

    /// The raw first byte, packet type and flags.
    pub byte: u8,

    /// Byte count of everything after the fixed header.
    pub remaining_len: usize,

    /// Byte count of the fixed header itself, 2 to 5.
    pub header_len: usize,
}

impl FixedHeader {
    /// Parses the fixed header at the start of `buf`.
    ///
    /// # Errors
    /// - Returns `DecodeError::Truncated` if `buf` ends inside the header.
    /// - Returns `DecodeError::UnknownPacketType` for reserved type codes.
    /// - Returns `DecodeError::RemainingLengthOverflow` for a malformed Remaining Length.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let byte = decode_u8(&mut Cursor::new(buf), "fixed header")?;
        let packet_type = PacketType::from_header(byte)?;
        let (remaining_len, len) = decode_remaining_length(&buf[1..])?;

        Ok(Self { packet_type, byte, remaining_len, header_len: 1 + len })
    }

    /// Total size of the packet, header included.
    pub fn packet_len(&self) -> usize {
        self.header_len + self.remaining_len
    }

    /// The `remaining_len` bytes that follow the header in `buf`.
    fn body<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        buf.get(self.header_len..self.packet_len())
            .ok_or(DecodeError::Truncated { field: "packet body" })
    }
}

/// A decoded packet of one of the types this codec understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingPacket {
    Connect(ConnectPacket),
    Subscribe(SubscribePacket),
    Publish(PublishPacket),
}

/// Size of the packet at the front of `buf`, or `None` until its fixed header is complete.
///
/// The type nibble is not checked, so a reserved type can still be skipped.
fn frame_len(buf: &[u8]) -> Result<Option<usize>, DecodeError> {
    let Some(rest) = buf.get(1..) else {
        return Ok(None);
    };

    match decode_remaining_length(rest) {
        Ok((remaining_len, len)) => Ok(Some(1 + len + remaining_len)),
        Err(DecodeError::Truncated { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Takes one complete packet off the front of `buffer`.
///
/// Returns `None` if `buffer` does not hold a full packet yet; nothing is consumed in
/// that case. Once a full packet is present its bytes are removed from `buffer`, even
/// when decoding it fails, so the caller can drop a bad packet and keep reading.
///
/// # Errors
/// - Returns `DecodeError::UnknownPacketType` for reserved type codes. The packet is consumed.
/// - Returns `DecodeError::UnsupportedPacketType` for types without a decoder. The packet is consumed.
/// - Returns any error raised by the packet decoder. The packet is consumed.
/// - Returns `DecodeError::PacketTooLarge` if the packet is bigger than `max_packet_size`, and
///   `DecodeError::RemainingLengthOverflow` if its length is malformed. Both leave `buffer`
///   untouched: the packet boundary is lost and the stream cannot be resumed.
pub fn read_packet(
    buffer: &mut BytesMut,
    max_packet_size: usize,
) -> Result<Option<IncomingPacket>, DecodeError> {
    let Some(packet_len) = frame_len(&buffer[..])? else {
        return Ok(None);
    };

    if packet_len > max_packet_size {
        return Err(DecodeError::PacketTooLarge(packet_len));
    }

    if buffer.len() < packet_len {
        return Ok(None);
    }

    let frame = buffer.split_to(packet_len);
    let header = FixedHeader::decode(&frame)?;
    debug!("Read {} packet of {packet_len} bytes", header.packet_type);

    let packet = match header.packet_type {
        PacketType::Connect => IncomingPacket::Connect(ConnectPacket::decode(&frame)?),
        PacketType::Subscribe => IncomingPacket::Subscribe(SubscribePacket::decode(&frame)?),
        PacketType::Publish => IncomingPacket::Publish(PublishPacket::decode(&frame)?),
        other => return Err(DecodeError::UnsupportedPacketType(other)),
    };

    Ok(Some(packet))
}
