use thiserror::Error;

/// Errors a [crate::codec::Codec] can raise. `Usage` errors are the caller's fault (wrong arity,
/// wrong fixed length) and are typically caught before bytes ever hit the wire; `Decode` errors
/// come from untrusted or corrupted input.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("expected {expected} bytes for a fixed-length field, got {actual}")]
    WrongByteLength { expected: usize, actual: usize },
    #[error("struct codec expected {expected} values, got {actual}")]
    WrongArity { expected: usize, actual: usize },
    #[error("offset {offset} is past the end of a buffer of length {len}")]
    Truncated { offset: usize, len: usize },
    #[error("string at offset {0} has no terminating 0x00 byte")]
    MissingStringTerminator(usize),
    #[error("unknown type tag {0} at offset {1}")]
    UnknownTypeTag(u8, usize),
    #[error("varint at offset {0} exceeds the {1}-bit bound")]
    VarintTooLarge(usize, u32),
    #[error("string value contains an embedded 0x00 byte, which the encoding uses as a terminator")]
    EmbeddedNul,
}
