//! Error types for payload, NDEF and vCard conversion.

use thiserror::Error;

/// Errors raised while converting a card to or from a transport string.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload is not well-formed JSON of the expected shape.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// The payload was written by a newer schema than this build understands.
    #[error("Unsupported payload schema version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The decoded card has no usable name.
    #[error("Payload has no name")]
    MissingName,

    /// Serialization of an outgoing card failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// vCard text could not be parsed.
    #[error("Invalid vCard: {0}")]
    InvalidVcard(String),
}

/// Errors raised while encoding or decoding NDEF messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NdefError {
    /// The buffer ended before the record it describes.
    #[error("Truncated NDEF data: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The message contains no records.
    #[error("Empty NDEF message")]
    Empty,

    /// Message begin/end flags are inconsistent.
    #[error("Invalid message boundary: {0}")]
    InvalidBoundary(String),

    /// Chunked records are not supported.
    #[error("Chunked records are not supported")]
    ChunkedRecord,

    /// TNF value outside the 3-bit range or not allowed in context.
    #[error("Invalid TNF value: {0:#04x}")]
    InvalidTnf(u8),

    /// The record is not an RTD Text record.
    #[error("Not a text record")]
    NotText,

    /// The record text is not encoded as UTF-8.
    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    /// A field exceeds the size allowed by the record format.
    #[error("Field too long: {field} is {len} bytes (max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
