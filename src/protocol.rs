use std::error::Error;
use std::fmt;

use packet_type::PacketType;

pub mod decoding;
pub mod encoding;
pub mod packet_type;

/// Errors produced while turning raw bytes into packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes are available than the field being read requires.
    Truncated { field: &'static str },

    /// The Remaining Length kept its continuation bit set past the 4th byte.
    RemainingLengthOverflow,

    /// The type nibble does not name an MQTT 3.1.1 control packet.
    UnknownPacketType(u8),

    /// A decoder was handed a packet of another type.
    UnexpectedPacketType { expected: PacketType, found: PacketType },

    /// A known packet type this codec has no decoder for.
    UnsupportedPacketType(PacketType),

    /// The full packet would exceed `MAX_PACKET_SIZE`.
    PacketTooLarge(usize),

    MalformedPacket(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { field } => write!(f, "Truncated input while reading {field}"),
            Self::RemainingLengthOverflow => write!(f, "Remaining length overflow"),
            Self::UnknownPacketType(code) => write!(f, "Unknown packet type: {code}"),
            Self::UnexpectedPacketType { expected, found } => {
                write!(f, "Unexpected packet type: expected {expected}, found {found}")
            }
            Self::UnsupportedPacketType(packet_type) => {
                write!(f, "Unsupported packet type: {packet_type}")
            }
            Self::PacketTooLarge(size) => write!(f, "Packet Too Large: {size} bytes"),
            Self::MalformedPacket(reason) => write!(f, "Malformed Packet: {reason}"),
        }
    }
}

impl Error for DecodeError {}

/// Errors produced while serializing packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A string does not fit behind a 2-byte length prefix.
    StringTooLong { field: &'static str, len: usize },

    /// A flag bit disagrees with whether its field is populated.
    InconsistentFlags { field: &'static str },

    /// The Remaining Length does not fit in a variable byte integer.
    PacketTooLarge(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringTooLong { field, len } => {
                write!(f, "String Too Long: {field} is {len} bytes")
            }
            Self::InconsistentFlags { field } => {
                write!(f, "Inconsistent Flags: {field} does not match its connect flag")
            }
            Self::PacketTooLarge(size) => write!(f, "Packet Too Large: {size} bytes"),
        }
    }
}

impl Error for EncodeError {}
