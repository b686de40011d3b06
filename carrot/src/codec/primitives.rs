//! Leaf codecs: no sub-codec, reading and writing raw bytes directly.

use super::error::CodecError;

/// Maximum number of 7-bit groups a varint may span before decoding gives up. Ten groups covers
/// every `u64`, since `ceil(64/7) == 10`.
const MAX_VARINT_GROUPS: usize = 10;

/// Encodes a non-negative integer as a sequence of 7-bit groups, most-significant group first,
/// each byte's low bit set except on the last group. Zero encodes to a single `0x00` byte.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let bit_length = if value == 0 { 1 } else { 64 - value.leading_zeros() };
    let groups = ((bit_length + 6) / 7) as usize;
    let mut out = Vec::with_capacity(groups);
    for i in (0..groups).rev() {
        let payload = ((value >> (i * 7)) & 0x7f) as u8;
        let continuation = if i == 0 { 0 } else { 1 };
        out.push((payload << 1) | continuation);
    }
    out
}

/// Decodes a varint starting at `offset`, returning the offset just past it and the value.
pub fn decode_varint(bytes: &[u8], mut offset: usize) -> Result<(usize, u64), CodecError> {
    let mut value: u64 = 0;
    for _ in 0..MAX_VARINT_GROUPS {
        let byte = *bytes
            .get(offset)
            .ok_or(CodecError::Truncated { offset, len: bytes.len() })?;
        offset += 1;
        let payload = (byte >> 1) as u64;
        value = (value << 7) | payload;
        if byte & 1 == 0 {
            return Ok((offset, value));
        }
    }
    Err(CodecError::VarintTooLarge(offset, 64))
}

pub fn encode_bool(value: bool) -> Vec<u8> {
    encode_varint(value as u64)
}

pub fn decode_bool(bytes: &[u8], offset: usize) -> Result<(usize, bool), CodecError> {
    let (offset, value) = decode_varint(bytes, offset)?;
    Ok((offset, value != 0))
}

/// Encodes as two varints, `mantissa` and `exponent`, such that `value ≈ mantissa * 10^-exponent`.
/// `exponent` is the number of fractional digits in `value`'s canonical `f64` decimal rendering.
/// `value` must be non-negative and finite; this mirrors the source encoder, which never handles
/// negative numbers or signed zero.
pub fn encode_float(value: f64) -> Vec<u8> {
    debug_assert!(value.is_finite() && value >= 0.0);
    let rendered = format!("{value}");
    let exponent = match rendered.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    };
    let scaled = value * 10f64.powi(exponent as i32);
    let mantissa = scaled.round() as u64;
    let mut out = encode_varint(mantissa);
    out.extend(encode_varint(exponent as u64));
    out
}

pub fn decode_float(bytes: &[u8], offset: usize) -> Result<(usize, f64), CodecError> {
    let (offset, mantissa) = decode_varint(bytes, offset)?;
    let (offset, exponent) = decode_varint(bytes, offset)?;
    let value = mantissa as f64 * 10f64.powi(-(exponent as i32));
    Ok((offset, value))
}

/// Encodes exactly `bytes.len()` raw bytes with no length prefix; the codec itself carries the
/// expected length. Returns an error if `bytes.len()` doesn't match `expected`.
pub fn encode_fixed_bytes(bytes: &[u8], expected: usize) -> Result<Vec<u8>, CodecError> {
    if bytes.len() != expected {
        return Err(CodecError::WrongByteLength {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes.to_vec())
}

pub fn decode_fixed_bytes(
    bytes: &[u8],
    offset: usize,
    expected: usize,
) -> Result<(usize, Vec<u8>), CodecError> {
    let end = offset + expected;
    if end > bytes.len() {
        return Err(CodecError::Truncated { offset, len: bytes.len() });
    }
    Ok((end, bytes[offset..end].to_vec()))
}

/// Encodes a string as its UTF-8 bytes followed by a `0x00` terminator. The string must not
/// contain an embedded NUL.
pub fn encode_string(value: &str) -> Result<Vec<u8>, CodecError> {
    if value.as_bytes().contains(&0) {
        return Err(CodecError::EmbeddedNul);
    }
    let mut out = value.as_bytes().to_vec();
    out.push(0);
    Ok(out)
}

pub fn decode_string(bytes: &[u8], offset: usize) -> Result<(usize, String), CodecError> {
    if offset > bytes.len() {
        return Err(CodecError::Truncated { offset, len: bytes.len() });
    }
    let terminator = bytes[offset..]
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::MissingStringTerminator(offset))?;
    let end = offset + terminator;
    let value = std::str::from_utf8(&bytes[offset..end])
        .map_err(|_| CodecError::MissingStringTerminator(offset))?
        .to_string();
    Ok((end + 1, value))
}

/// Big-endian four-byte unsigned integer, used only by the header infrastructure.
pub fn encode_int32(value: u32) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

pub fn decode_int32(bytes: &[u8], offset: usize) -> Result<(usize, u32), CodecError> {
    let end = offset + 4;
    if end > bytes.len() {
        return Err(CodecError::Truncated { offset, len: bytes.len() });
    }
    let array: [u8; 4] = bytes[offset..end].try_into().unwrap();
    Ok((end, u32::from_be_bytes(array)))
}
