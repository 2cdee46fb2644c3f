use std::io::Cursor;

use bytes::{Buf, Bytes};
use log::debug;

use crate::protocol::{
    decoding::{decode_bytes, decode_utf8_string},
    packet_type::PacketType,
    DecodeError,
};

use super::DecodablePacket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPacket {
    pub topic: String,

    /// Application message. An owned copy, bounded by the packet's Remaining Length.
    pub payload: Bytes,
}

impl DecodablePacket for PublishPacket {
    fn packet_type() -> PacketType {
        PacketType::Publish
    }

    /// Reads the topic name, then takes the rest of the Remaining Length as payload.
    ///
    /// # Errors
    /// - Returns `DecodeError::Truncated` if the topic runs past the Remaining Length.
    /// - Returns `DecodeError::MalformedPacket` if the topic name is not valid UTF-8.
    fn decode_body(
        cursor: &mut Cursor<&[u8]>,
        _fixed_header: u8,
        remaining_len: usize,
    ) -> Result<Self, DecodeError> {
        let topic = decode_utf8_string(cursor, "topic name")?;

        // The cursor ends at the Remaining Length, so whatever is left is the payload
        let payload_len = cursor.remaining();
        debug!("topic: {topic}, payload_len: {payload_len} of {remaining_len}");

        let payload = decode_bytes(cursor, payload_len, "payload")?;

        Ok(Self { topic, payload })
    }
}
