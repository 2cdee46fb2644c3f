use std::io::Cursor;

use bytes::Buf;
use log::debug;

use crate::protocol::{
    decoding::{decode_u16, decode_u8, decode_utf8_string},
    packet_type::PacketType,
    DecodeError,
};

use super::DecodablePacket;

/// A topic filter and the `QoS` the client requests for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    /// May contain wildcards; not validated.
    pub name: String,
    pub qos: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribePacket {
    pub packet_id: u16,

    /// Filters in the order they appear on the wire.
    pub topic_filters: Vec<TopicFilter>,
}

impl DecodablePacket for SubscribePacket {
    fn packet_type() -> PacketType {
        PacketType::Subscribe
    }

    fn decode_body(
        cursor: &mut Cursor<&[u8]>,
        _fixed_header: u8,
        _remaining_len: usize,
    ) -> Result<Self, DecodeError> {
        let packet_id = decode_u16(cursor, "packet id")?;
        debug!("packet_id: {packet_id}");

        let mut topic_filters = Vec::new();
        while cursor.has_remaining() {
            let name = decode_utf8_string(cursor, "topic filter")?;
            let qos = decode_u8(cursor, "requested qos")?;

            topic_filters.push(TopicFilter { name, qos });
        }

        if topic_filters.is_empty() {
            return Err(DecodeError::MalformedPacket(
                "SUBSCRIBE must contain at least one topic filter".to_string(),
            ));
        }

        Ok(Self { packet_id, topic_filters })
    }
}
