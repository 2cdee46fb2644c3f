use std::fmt;

use super::DecodeError;

/// Represents the MQTT 3.1.1 Control Packet Types.
///
/// Codes 0 and 15 are reserved and have no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// Connection request.
    /// Sent by: Client to Server.
    Connect = 0x01,

    /// Connect acknowledgment.
    /// Sent by: Server to Client.
    ConnAck = 0x02,

    /// Publish message.
    /// Sent by: Client to Server or Server to Client.
    Publish = 0x03,

    /// Publish acknowledgment (`QoS` 1).
    /// Sent by: Client to Server or Server to Client.
    PubAck = 0x04,

    /// Publish received (`QoS` 2 delivery part 1).
    /// Sent by: Client to Server or Server to Client.
    PubRec = 0x05,

    /// Publish release (`QoS` 2 delivery part 2).
    /// Sent by: Client to Server or Server to Client.
    PubRel = 0x06,

    /// Publish complete (`QoS` 2 delivery part 3).
    /// Sent by: Client to Server or Server to Client.
    PubComp = 0x07,

    /// Subscribe request.
    /// Sent by: Client to Server.
    Subscribe = 0x08,

    /// Subscribe acknowledgment.
    /// Sent by: Server to Client.
    SubAck = 0x09,

    /// Unsubscribe request.
    /// Sent by: Client to Server.
    Unsubscribe = 0x0A,

    /// Unsubscribe acknowledgment.
    /// Sent by: Server to Client.
    UnsubAck = 0x0B,

    /// PING request.
    /// Sent by: Client to Server.
    PingReq = 0x0C,

    /// PING response.
    /// Sent by: Server to Client.
    PingResp = 0x0D,

    /// Disconnect notification.
    /// Sent by: Client to Server.
    Disconnect = 0x0E,
}

impl PacketType {
    /// Reads the packet type from the 4 most significant bits of a fixed header byte.
    ///
    /// # Errors
    /// - Returns `DecodeError::UnknownPacketType` for the reserved codes 0 and 15.
    pub fn from_header(fixed_header: u8) -> Result<Self, DecodeError> {
        Self::try_from(fixed_header >> 4)
    }

    /// Converts the `PacketType` to its numeric value.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Computes the control byte for the fixed header, with all flag bits cleared.
    ///
    /// | Bit       | 7   | 6   | 5   | 4   | 3   | 2   | 1   | 0   |
    /// |-----------|-----|-----|-----|-----|-----|-----|-----|-----|
    /// | Byte 1    | Packet type           | Packet flags          |
    pub fn control_byte(self) -> u8 {
        self.to_u8() << 4
    }

    /// Canonical protocol name of the packet type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::ConnAck => "CONNACK",
            Self::Publish => "PUBLISH",
            Self::PubAck => "PUBACK",
            Self::PubRec => "PUBREC",
            Self::PubRel => "PUBREL",
            Self::PubComp => "PUBCOMP",
            Self::Subscribe => "SUBSCRIBE",
            Self::SubAck => "SUBACK",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::UnsubAck => "UNSUBACK",
            Self::PingReq => "PINGREQ",
            Self::PingResp => "PINGRESP",
            Self::Disconnect => "DISCONNECT",
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Connect),
            0x02 => Ok(Self::ConnAck),
            0x03 => Ok(Self::Publish),
            0x04 => Ok(Self::PubAck),
            0x05 => Ok(Self::PubRec),
            0x06 => Ok(Self::PubRel),
            0x07 => Ok(Self::PubComp),
            0x08 => Ok(Self::Subscribe),
            0x09 => Ok(Self::SubAck),
            0x0A => Ok(Self::Unsubscribe),
            0x0B => Ok(Self::UnsubAck),
            0x0C => Ok(Self::PingReq),
            0x0D => Ok(Self::PingResp),
            0x0E => Ok(Self::Disconnect),
            _ => Err(DecodeError::UnknownPacketType(value)),
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Looks up the canonical name of a packet type code.
///
/// # Errors
/// - Returns `DecodeError::UnknownPacketType` if the code is reserved or out of range.
pub fn packet_type_name(code: u8) -> Result<&'static str, DecodeError> {
    PacketType::try_from(code).map(PacketType::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        assert_eq!(PacketType::from_header(0x10), Ok(PacketType::Connect));
        assert_eq!(PacketType::from_header(0x30), Ok(PacketType::Publish));
        assert_eq!(PacketType::from_header(0x3B), Ok(PacketType::Publish));
        assert_eq!(PacketType::from_header(0x82), Ok(PacketType::Subscribe));
        assert_eq!(PacketType::from_header(0xE0), Ok(PacketType::Disconnect));
    }

    #[test]
    fn test_reserved_codes_rejected() {
        assert_eq!(PacketType::from_header(0x00), Err(DecodeError::UnknownPacketType(0)));
        assert_eq!(PacketType::from_header(0xF0), Err(DecodeError::UnknownPacketType(15)));
        assert_eq!(packet_type_name(0), Err(DecodeError::UnknownPacketType(0)));
        assert_eq!(packet_type_name(15), Err(DecodeError::UnknownPacketType(15)));
        assert_eq!(packet_type_name(16), Err(DecodeError::UnknownPacketType(16)));
    }

    #[test]
    fn test_names() {
        assert_eq!(PacketType::from_header(0x10).map(PacketType::name), Ok("CONNECT"));
        assert_eq!(packet_type_name(0x0A), Ok("UNSUBSCRIBE"));
        assert_eq!(PacketType::PingResp.to_string(), "PINGRESP");

        for code in 1..=14 {
            let packet_type = PacketType::try_from(code).unwrap();
            assert_eq!(packet_type.to_u8(), code);
            assert_eq!(packet_type.control_byte(), code << 4);
        }
    }
}
