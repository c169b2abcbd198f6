//! Serialization for [`Value`] types.
//!
//! # Format
//!
//! Each value is encoded with a 1-byte type tag followed by the payload:
//!
//! - `Bool`: `0x01` + `0x00` (false) or `0x01` (true)
//! - `Int`: `0x02` + 8 bytes (big-endian i64)
//! - `Float`: `0x03` + 8 bytes (IEEE 754 f64, big-endian)
//! - `String`: `0x04` + 4 bytes length + UTF-8 bytes

use crate::error::CoreError;
use crate::types::Value;

/// Type tags for value variants.
mod tags {
    pub const BOOL: u8 = 0x01;
    pub const INT: u8 = 0x02;
    pub const FLOAT: u8 = 0x03;
    pub const STRING: u8 = 0x04;
}

/// Encode a value, appending to `buf`.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if a string is longer than `u32::MAX` bytes.
pub fn encode_value(value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    match value {
        Value::Bool(b) => {
            buf.push(tags::BOOL);
            buf.push(u8::from(*b));
        }
        Value::Int(i) => {
            buf.push(tags::INT);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        Value::Float(f) => {
            buf.push(tags::FLOAT);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::String(s) => {
            buf.push(tags::STRING);
            let bytes = s.as_bytes();
            let len = u32::try_from(bytes.len())
                .map_err(|_| CoreError::Encoding("string too long".to_owned()))?;
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(bytes);
        }
    }
    Ok(())
}

/// Decode a value and return the number of bytes consumed.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] on truncated input, an unknown tag or
/// invalid UTF-8.
pub fn decode_value(bytes: &[u8]) -> Result<(Value, usize), CoreError> {
    let (&tag, rest) =
        bytes.split_first().ok_or_else(|| CoreError::Encoding("unexpected end of input".to_owned()))?;

    match tag {
        tags::BOOL => {
            let b = rest
                .first()
                .ok_or_else(|| CoreError::Encoding("unexpected end of input".to_owned()))?;
            Ok((Value::Bool(*b != 0), 2))
        }
        tags::INT => Ok((Value::Int(i64::from_be_bytes(read_array(rest)?)), 9)),
        tags::FLOAT => Ok((Value::Float(f64::from_be_bytes(read_array(rest)?)), 9)),
        tags::STRING => {
            let len = u32::from_be_bytes(read_array(rest)?) as usize;
            let payload = rest
                .get(4..4 + len)
                .ok_or_else(|| CoreError::Encoding("unexpected end of input".to_owned()))?;
            let s = String::from_utf8(payload.to_vec())
                .map_err(|e| CoreError::Encoding(format!("invalid UTF-8: {e}")))?;
            Ok((Value::String(s), 5 + len))
        }
        other => Err(CoreError::Encoding(format!("unknown value tag: {other:#04x}"))),
    }
}

fn read_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CoreError> {
    bytes
        .get(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| CoreError::Encoding("unexpected end of input".to_owned()))
}
