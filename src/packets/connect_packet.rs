use std::io::Cursor;

use bytes::{BufMut, BytesMut};
use log::debug;

use crate::{
    constants::{
        CLEAN_SESSION_FLAG, PASSWORD_FLAG, PROTOCOL_LEVEL, PROTOCOL_NAME, USERNAME_FLAG,
        WILL_FLAG, WILL_QOS_MASK, WILL_RETAIN_FLAG,
    },
    protocol::{
        decoding::{decode_u16, decode_u8, decode_utf8_string},
        encoding::{put_utf8_string, put_variable_byte_int, utf8_string_len, variable_byte_int_len},
        packet_type::PacketType,
        DecodeError, EncodeError,
    },
};

use super::{DecodablePacket, EncodablePacket};

/// Represents an MQTT CONNECT packet.
///
/// The optional fields must agree with the bits in `flags`. Populate them through
/// [`ConnectPacket::set_username`], [`ConnectPacket::set_password`] and
/// [`ConnectPacket::set_will`]; [`EncodablePacket::encode`] rejects a packet whose
/// flags and fields disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectPacket {
    /// The protocol name is a utf-8 encoded string that represents the protocol name “MQTT”.
    pub protocol_name: String,

    /// Represents the revision level of the protocol used by the client.
    pub protocol_version: u8,

    /// Connect flags, carried verbatim. Bits 7, 6 and 2 announce username, password and will.
    pub flags: u8,

    /// Maximum interval in seconds between two control packets sent by the client.
    pub keep_alive: u16,

    /// The Client Identifier identifies the Client to the Server.
    pub client_id: String,

    /// Topic the will message is published on.
    pub will_topic: Option<String>,

    /// Message the server publishes on `will_topic` if the client goes away unexpectedly.
    pub will_message: Option<String>,

    /// It can be used by the Server for authentication and authorization.
    pub username: Option<String>,

    /// Although this field is called Password, it can be used to carry any credential information.
    pub password: Option<String>,
}

impl ConnectPacket {
    /// Creates a CONNECT packet for MQTT 3.1.1 with no flags set.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            protocol_name: PROTOCOL_NAME.to_string(),
            protocol_version: PROTOCOL_LEVEL,
            flags: 0,
            keep_alive: 0,
            client_id: client_id.into(),
            will_topic: None,
            will_message: None,
            username: None,
            password: None,
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
        self.flags |= USERNAME_FLAG;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
        self.flags |= PASSWORD_FLAG;
    }

    pub fn set_will(&mut self, topic: impl Into<String>, message: impl Into<String>) {
        self.will_topic = Some(topic.into());
        self.will_message = Some(message.into());
        self.flags |= WILL_FLAG;
    }

    pub fn has_username(&self) -> bool {
        self.flags & USERNAME_FLAG != 0
    }

    pub fn has_password(&self) -> bool {
        self.flags & PASSWORD_FLAG != 0
    }

    pub fn has_will(&self) -> bool {
        self.flags & WILL_FLAG != 0
    }

    pub fn clean_session(&self) -> bool {
        self.flags & CLEAN_SESSION_FLAG != 0
    }

    pub fn will_qos(&self) -> u8 {
        (self.flags & WILL_QOS_MASK) >> 3
    }

    pub fn will_retain(&self) -> bool {
        self.flags & WILL_RETAIN_FLAG != 0
    }

    /// Checks that every flag bit matches whether its field is populated.
    fn validate_flags(&self) -> Result<(), EncodeError> {
        let checks = [
            (self.has_will(), self.will_topic.is_some(), "will topic"),
            (self.has_will(), self.will_message.is_some(), "will message"),
            (self.has_username(), self.username.is_some(), "username"),
            (self.has_password(), self.password.is_some(), "password"),
        ];

        for (flag, present, field) in checks {
            if flag != present {
                return Err(EncodeError::InconsistentFlags { field });
            }
        }

        Ok(())
    }

    /// Size of the variable header and payload.
    fn remaining_len(&self) -> Result<usize, EncodeError> {
        // Protocol level, connect flags and keep alive
        let mut len = 4;

        len += utf8_string_len(&self.protocol_name, "protocol name")?;
        len += utf8_string_len(&self.client_id, "client id")?;

        if let Some(will_topic) = &self.will_topic {
            len += utf8_string_len(will_topic, "will topic")?;
        }
        if let Some(will_message) = &self.will_message {
            len += utf8_string_len(will_message, "will message")?;
        }
        if let Some(username) = &self.username {
            len += utf8_string_len(username, "username")?;
        }
        if let Some(password) = &self.password {
            len += utf8_string_len(password, "password")?;
        }

        Ok(len)
    }
}

impl EncodablePacket for ConnectPacket {
    /// Serializes the packet, fixed header included.
    ///
    /// The payload order is client id, will topic, will message, username, password.
    ///
    /// # Errors
    /// - Returns `EncodeError::InconsistentFlags` if a flag bit disagrees with its field.
    /// - Returns `EncodeError::StringTooLong` if a string exceeds 65_535 bytes.
    /// - Returns `EncodeError::PacketTooLarge` if the remaining length cannot be encoded.
    fn encode(&self) -> Result<BytesMut, EncodeError> {
        self.validate_flags()?;

        let remaining_len = self.remaining_len()?;
        let casted_len =
            u32::try_from(remaining_len).map_err(|_| EncodeError::PacketTooLarge(remaining_len))?;

        let mut buf = BytesMut::with_capacity(1 + variable_byte_int_len(casted_len) + remaining_len);

        // Fixed header
        buf.put_u8(PacketType::Connect.control_byte());
        put_variable_byte_int(&mut buf, casted_len)?;

        // Variable header
        put_utf8_string(&mut buf, &self.protocol_name, "protocol name")?;
        buf.put_u8(self.protocol_version);
        buf.put_u8(self.flags);
        buf.put_u16(self.keep_alive);

        // Payload
        put_utf8_string(&mut buf, &self.client_id, "client id")?;

        if let (Some(will_topic), Some(will_message)) = (&self.will_topic, &self.will_message) {
            put_utf8_string(&mut buf, will_topic, "will topic")?;
            put_utf8_string(&mut buf, will_message, "will message")?;
        }
        if let Some(username) = &self.username {
            put_utf8_string(&mut buf, username, "username")?;
        }
        if let Some(password) = &self.password {
            put_utf8_string(&mut buf, password, "password")?;
        }

        debug!("Encoded CONNECT for client {} ({} bytes)", self.client_id, buf.len());

        Ok(buf)
    }
}

impl DecodablePacket for ConnectPacket {
    fn packet_type() -> PacketType {
        PacketType::Connect
    }

    fn decode_body(
        cursor: &mut Cursor<&[u8]>,
        _fixed_header: u8,
        _remaining_len: usize,
    ) -> Result<Self, DecodeError> {
        let protocol_name = decode_utf8_string(cursor, "protocol name")?;
        let protocol_version = decode_u8(cursor, "protocol version")?;
        let flags = decode_u8(cursor, "connect flags")?;
        let keep_alive = decode_u16(cursor, "keep alive")?;

        let client_id = decode_utf8_string(cursor, "client id")?;
        debug!("CONNECT from client {client_id}: protocol {protocol_name} {protocol_version}, flags {flags:#010b}");

        let (will_topic, will_message) = if flags & WILL_FLAG != 0 {
            let will_topic = decode_utf8_string(cursor, "will topic")?;
            let will_message = decode_utf8_string(cursor, "will message")?;
            (Some(will_topic), Some(will_message))
        } else {
            (None, None)
        };

        let username = if flags & USERNAME_FLAG != 0 {
            Some(decode_utf8_string(cursor, "username")?)
        } else {
            None
        };

        let password = if flags & PASSWORD_FLAG != 0 {
            Some(decode_utf8_string(cursor, "password")?)
        } else {
            None
        };

        Ok(Self {
            protocol_name,
            protocol_version,
            flags,
            keep_alive,
            client_id,
            will_topic,
            will_message,
            username,
            password,
        })
    }
}
