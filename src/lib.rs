//! Encoding and decoding of MQTT 3.1.1 control packets.
//!
//! CONNECT packets can be encoded and decoded; SUBSCRIBE and PUBLISH packets can be
//! decoded. Every other control packet type is known by name only. Nothing here
//! performs I/O: decoders take complete byte buffers and return owned values.

pub mod constants;
pub mod packets;
pub mod protocol;

pub use packets::{
    connect_packet::ConnectPacket,
    publish_packet::PublishPacket,
    read_packet,
    subscribe_packet::{SubscribePacket, TopicFilter},
    DecodablePacket, EncodablePacket, FixedHeader, IncomingPacket,
};
pub use protocol::{
    packet_type::{packet_type_name, PacketType},
    DecodeError, EncodeError,
};
