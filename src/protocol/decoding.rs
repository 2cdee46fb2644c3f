use std::io::Cursor;

use bytes::{Buf, Bytes};

use crate::constants::MAX_VARIABLE_BYTE_INT_LEN;

use super::DecodeError;

/// Decode a variable byte integer.
///
/// Reference: <https://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718023>
///
/// **Specification:**
///
/// ```text
/// multiplier = 1
/// value = 0
/// do
///    encodedByte = 'next byte from stream'
///    value += (encodedByte AND 127) * multiplier
///    multiplier *= 128
///    if (multiplier > 128*128*128)
///       throw Error(Malformed Remaining Length)
/// while ((encodedByte AND 128) != 0)
/// ```
///
/// # Errors
/// - Returns `DecodeError::Truncated` if the input ends while the continuation bit is set.
/// - Returns `DecodeError::RemainingLengthOverflow` if the 4th byte still has its continuation bit set.
pub fn decode_variable_byte_int(buf: &mut Cursor<&[u8]>) -> Result<usize, DecodeError> {
    let mut multiplier = 1;
    let mut decoded_value = 0;

    for _ in 0..MAX_VARIABLE_BYTE_INT_LEN {
        if !buf.has_remaining() {
            return Err(DecodeError::Truncated { field: "remaining length" });
        }
        let encoded_byte = buf.get_u8();

        // Take the 7 least significant bits
        decoded_value += (encoded_byte & 127) as usize * multiplier;

        // If the continuation bit is not set, we are done
        if encoded_byte & 128 == 0 {
            return Ok(decoded_value);
        }

        multiplier *= 128;
    }

    Err(DecodeError::RemainingLengthOverflow)
}

/// Decode a variable byte integer from the start of `buf`.
///
/// Returns the decoded value and the number of bytes it occupied.
pub fn decode_remaining_length(buf: &[u8]) -> Result<(usize, usize), DecodeError> {
    let mut cursor = Cursor::new(buf);
    let value = decode_variable_byte_int(&mut cursor)?;

    Ok((value, cursor.position() as usize))
}

/// Decode a 1-byte unsigned integer.
pub fn decode_u8(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u8, DecodeError> {
    if buf.remaining() < 1 {
        return Err(DecodeError::Truncated { field });
    }

    Ok(buf.get_u8())
}

/// Decode a 2-byte big-endian unsigned integer.
pub fn decode_u16(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u16, DecodeError> {
    if buf.remaining() < 2 {
        return Err(DecodeError::Truncated { field });
    }

    Ok(buf.get_u16())
}

/// Decode a UTF-8 string.
///
/// Reference: <https://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718016>
///
/// **Specification:**
/// - Length is a two-byte integer representing the size of the following string.
/// - String must be valid UTF-8.
///
/// The bytes are checked to be UTF-8 and nothing more: control characters, wildcards
/// and U+0000 are accepted. Input that is not UTF-8 is rejected rather than passed
/// through, since the result is a `String`.
///
/// # Errors
/// - Returns `DecodeError::Truncated` if fewer bytes remain than the declared length.
/// - Returns `DecodeError::MalformedPacket` if the bytes are not valid UTF-8.
pub fn decode_utf8_string(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
) -> Result<String, DecodeError> {
    let len = decode_u16(buf, field)? as usize;

    let encoded_value = decode_bytes(buf, len, field)?;

    String::from_utf8(encoded_value.to_vec())
        .map_err(|_| DecodeError::MalformedPacket(format!("{field} is not valid UTF-8")))
}

/// Copy exactly `len` bytes out of the cursor.
pub fn decode_bytes(
    buf: &mut Cursor<&[u8]>,
    len: usize,
    field: &'static str,
) -> Result<Bytes, DecodeError> {
    if buf.remaining() < len {
        return Err(DecodeError::Truncated { field });
    }

    Ok(buf.copy_to_bytes(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_variable_byte_int_boundaries() {
        let cases: [(&[u8], usize); 8] = [
            (&[0x00], 0),
            (&[0x7F], 127),
            (&[0x80, 0x01], 128),
            (&[0xFF, 0x7F], 16_383),
            (&[0x80, 0x80, 0x01], 16_384),
            (&[0xFF, 0xFF, 0x7F], 2_097_151),
            (&[0x80, 0x80, 0x80, 0x01], 2_097_152),
            (&[0xFF, 0xFF, 0xFF, 0x7F], 268_435_455),
        ];

        for (encoded, expected) in cases {
            assert_eq!(decode_remaining_length(encoded), Ok((expected, encoded.len())));
        }
    }

    #[test]
    fn test_decode_variable_byte_int_stops_at_last_byte() {
        let mut cursor = Cursor::new(&[0x80, 0x01, 0xAA][..]);
        assert_eq!(decode_variable_byte_int(&mut cursor), Ok(128));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_decode_variable_byte_int_overflow() {
        assert_eq!(
            decode_remaining_length(&[0x80, 0x80, 0x80, 0x80, 0x01]),
            Err(DecodeError::RemainingLengthOverflow)
        );
        assert_eq!(
            decode_remaining_length(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(DecodeError::RemainingLengthOverflow)
        );
    }

    #[test]
    fn test_decode_variable_byte_int_truncated() {
        assert_eq!(
            decode_remaining_length(&[]),
            Err(DecodeError::Truncated { field: "remaining length" })
        );
        assert_eq!(
            decode_remaining_length(&[0x80, 0x80]),
            Err(DecodeError::Truncated { field: "remaining length" })
        );
    }

    #[test]
    fn test_decode_utf8_string() {
        let mut cursor = Cursor::new(&[0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04][..]);
        assert_eq!(decode_utf8_string(&mut cursor, "protocol name"), Ok("MQTT".to_string()));
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_decode_utf8_string_empty() {
        let mut cursor = Cursor::new(&[0x00, 0x00][..]);
        assert_eq!(decode_utf8_string(&mut cursor, "client id"), Ok(String::new()));
    }

    #[test]
    fn test_decode_utf8_string_truncated() {
        let mut cursor = Cursor::new(&[0x00, 0x05, b'a', b'b'][..]);
        assert_eq!(
            decode_utf8_string(&mut cursor, "topic"),
            Err(DecodeError::Truncated { field: "topic" })
        );

        let mut cursor = Cursor::new(&[0x00][..]);
        assert_eq!(
            decode_utf8_string(&mut cursor, "topic"),
            Err(DecodeError::Truncated { field: "topic" })
        );
    }

    #[test]
    fn test_decode_utf8_string_invalid() {
        let mut cursor = Cursor::new(&[0x00, 0x02, 0xC3, 0x28][..]);
        assert!(matches!(
            decode_utf8_string(&mut cursor, "topic"),
            Err(DecodeError::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_decode_u16_big_endian() {
        let mut cursor = Cursor::new(&[0x01, 0x02][..]);
        assert_eq!(decode_u16(&mut cursor, "packet id"), Ok(258));
        assert_eq!(decode_u8(&mut cursor, "qos"), Err(DecodeError::Truncated { field: "qos" }));
    }
}
