use bytes::BufMut;

use crate::constants::{MAX_REMAINING_LENGTH, MAX_STRING_LENGTH};

use super::EncodeError;

/// Encode a variable byte integer.
///
/// Reference: <https://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718023>
///
/// **Specification:**
///
/// ```text
/// do
///    encodedByte = X MOD 128
///    X = X DIV 128
///    // if there are more data to encode, set the top bit of this byte
///    if (X > 0)
///       encodedByte = encodedByte OR 128
///    endif
///    'output' encodedByte
/// while (X > 0)
/// ```
///
/// # Errors
/// - Returns `EncodeError::PacketTooLarge` if the value needs more than 4 bytes.
pub fn encode_variable_byte_int(value: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoded_value = Vec::with_capacity(variable_byte_int_len(value));
    put_variable_byte_int(&mut encoded_value, value)?;

    Ok(encoded_value)
}

/// Append a variable byte integer to `buf`.
pub fn put_variable_byte_int<B: BufMut>(buf: &mut B, mut value: u32) -> Result<(), EncodeError> {
    if value as usize > MAX_REMAINING_LENGTH {
        return Err(EncodeError::PacketTooLarge(value as usize));
    }

    loop {
        // Extract the 7 least significant bits from the current value
        let mut encoded_byte = (value % 128) as u8;

        // The remaining bits will be processed in the next iteration
        value /= 128;

        // If there are still remaining bits, mark this byte as continuation
        if value > 0 {
            encoded_byte |= 128;
        }

        buf.put_u8(encoded_byte);

        if value == 0 {
            return Ok(());
        }
    }
}

/// Number of bytes `value` occupies once encoded.
pub fn variable_byte_int_len(value: u32) -> usize {
    match value {
        0..=127 => 1,
        128..=16_383 => 2,
        16_384..=2_097_151 => 3,
        _ => 4,
    }
}

/// Encode a UTF-8 string.
///
/// Reference: <https://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718016>
///
/// # Errors
/// - Returns `EncodeError::StringTooLong` if the string length does not fit in 2 bytes.
pub fn encode_utf8_string(value: &str, field: &'static str) -> Result<Vec<u8>, EncodeError> {
    let mut encoded_value = Vec::with_capacity(2 + value.len());
    put_utf8_string(&mut encoded_value, value, field)?;

    Ok(encoded_value)
}

/// Append a length-prefixed UTF-8 string to `buf`.
pub fn put_utf8_string<B: BufMut>(
    buf: &mut B,
    value: &str,
    field: &'static str,
) -> Result<(), EncodeError> {
    // MQTT requires that the length of the string must fit within 2 bytes (0 to 65_535).
    let len = value.len();
    let casted_len =
        u16::try_from(len).map_err(|_| EncodeError::StringTooLong { field, len })?;

    buf.put_u16(casted_len);
    buf.put_slice(value.as_bytes());

    Ok(())
}

/// Size of a length-prefixed string on the wire, checked against `MAX_STRING_LENGTH`.
pub fn utf8_string_len(value: &str, field: &'static str) -> Result<usize, EncodeError> {
    let len = value.len();
    if len > MAX_STRING_LENGTH {
        return Err(EncodeError::StringTooLong { field, len });
    }

    Ok(2 + len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decoding::{decode_remaining_length, decode_utf8_string};
    use std::io::Cursor;

    #[test]
    fn test_encode_variable_byte_int_boundaries() {
        let cases = [
            (0, 1),
            (127, 1),
            (128, 2),
            (16_383, 2),
            (16_384, 3),
            (2_097_151, 3),
            (2_097_152, 4),
            (268_435_455, 4),
        ];

        for (value, expected_len) in cases {
            let encoded = encode_variable_byte_int(value).unwrap();
            assert_eq!(encoded.len(), expected_len, "length of {value}");
            assert_eq!(variable_byte_int_len(value), expected_len);
            assert_eq!(decode_remaining_length(&encoded), Ok((value as usize, expected_len)));
        }
    }

    #[test]
    fn test_encode_variable_byte_int_bytes() {
        assert_eq!(encode_variable_byte_int(0).unwrap(), vec![0x00]);
        assert_eq!(encode_variable_byte_int(128).unwrap(), vec![0x80, 0x01]);
        assert_eq!(encode_variable_byte_int(321).unwrap(), vec![0xC1, 0x02]);
        assert_eq!(encode_variable_byte_int(268_435_455).unwrap(), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_encode_variable_byte_int_too_large() {
        assert_eq!(
            encode_variable_byte_int(268_435_456),
            Err(EncodeError::PacketTooLarge(268_435_456))
        );
    }

    #[test]
    fn test_encode_utf8_string() {
        assert_eq!(encode_utf8_string("MQTT", "protocol name").unwrap(), b"\x00\x04MQTT".to_vec());
        assert_eq!(encode_utf8_string("", "client id").unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_utf8_string_max_length() {
        let value = "x".repeat(MAX_STRING_LENGTH);
        let encoded = encode_utf8_string(&value, "topic").unwrap();
        assert_eq!(&encoded[..2], &[0xFF, 0xFF]);

        let mut cursor = Cursor::new(&encoded[..]);
        assert_eq!(decode_utf8_string(&mut cursor, "topic"), Ok(value));
    }

    #[test]
    fn test_utf8_string_too_long() {
        let value = "x".repeat(MAX_STRING_LENGTH + 1);
        let expected = EncodeError::StringTooLong { field: "topic", len: MAX_STRING_LENGTH + 1 };

        assert_eq!(encode_utf8_string(&value, "topic"), Err(expected.clone()));
        assert_eq!(utf8_string_len(&value, "topic"), Err(expected));
    }
}
