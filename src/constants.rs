/// Protocol name.
pub const PROTOCOL_NAME: &str = "MQTT";

/// Protocol level for MQTT 3.1.1.
pub const PROTOCOL_LEVEL: u8 = 4;

/// Largest value a Remaining Length field can carry.
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Maximum allowed size for a packet: type byte, 4 length bytes and the body.
pub const MAX_PACKET_SIZE: usize = 1 + 4 + MAX_REMAINING_LENGTH;

/// Maximum allowed length for a UTF-8 encoded string.
pub const MAX_STRING_LENGTH: usize = 65_535;

/// Maximum number of bytes in a variable byte integer.
pub const MAX_VARIABLE_BYTE_INT_LEN: usize = 4;

/// Connect flag: a user name is present in the payload.
pub const USERNAME_FLAG: u8 = 0b1000_0000;

/// Connect flag: a password is present in the payload.
pub const PASSWORD_FLAG: u8 = 0b0100_0000;

/// Connect flag: the will message must be retained.
pub const WILL_RETAIN_FLAG: u8 = 0b0010_0000;

/// Connect flag: `QoS` level of the will message (2 bits).
pub const WILL_QOS_MASK: u8 = 0b0001_1000;

/// Connect flag: a will topic and will message are present in the payload.
pub const WILL_FLAG: u8 = 0b0000_0100;

/// Connect flag: the server must discard any previous session.
pub const CLEAN_SESSION_FLAG: u8 = 0b0000_0010;
