//! Error types for NFC operations.
//!
//! Every failure the radio layer can report is a tagged variant, so callers
//! choose what to show the user by matching on [`NfcErrorKind`] instead of
//! inspecting message text.

use nfcard_codec::{CodecError, NdefError};
use serde::{Deserialize, Serialize};

/// Result type alias for NFC operations.
pub type NfcResult<T> = std::result::Result<T, NfcError>;

/// Errors that can occur while reading or writing an NFC tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NfcError {
    /// The tag left the field before the operation finished.
    #[error("Tag lost during {operation}")]
    TagLost { operation: String },

    /// The device or the tag does not support the requested technology.
    #[error("Unsupported: {reason}")]
    Unsupported { reason: String },

    /// The encoded message does not fit on the tag.
    #[error("Message of {required} bytes exceeds tag capacity of {capacity} bytes")]
    CapacityExceeded { required: usize, capacity: usize },

    /// The tag is locked against writing.
    #[error("Tag is read-only")]
    ReadOnly,

    /// The tag holds no NDEF text record.
    #[error("Tag is empty")]
    EmptyTag,

    /// The tag content is not a business card payload.
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    /// NFC is switched off on the device.
    #[error("NFC is disabled")]
    NotEnabled,

    /// Another operation already holds the radio.
    #[error("NFC radio busy")]
    Busy,

    /// The user or the application cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// No tag was presented in time.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The radio went away.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Anything the platform reports that fits no other variant.
    #[error("{message}")]
    Unknown { message: String },
}

impl NfcError {
    pub fn tag_lost(operation: impl Into<String>) -> Self {
        Self::TagLost {
            operation: operation.into(),
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Stable classification of this error.
    pub fn kind(&self) -> NfcErrorKind {
        match self {
            Self::TagLost { .. } => NfcErrorKind::TagLost,
            Self::Unsupported { .. } => NfcErrorKind::Unsupported,
            Self::CapacityExceeded { .. } => NfcErrorKind::CapacityExceeded,
            Self::ReadOnly => NfcErrorKind::ReadOnly,
            Self::EmptyTag => NfcErrorKind::EmptyTag,
            Self::InvalidPayload { .. } => NfcErrorKind::InvalidPayload,
            Self::NotEnabled => NfcErrorKind::NotEnabled,
            Self::Busy => NfcErrorKind::Busy,
            Self::Cancelled => NfcErrorKind::Cancelled,
            Self::Timeout { .. } => NfcErrorKind::Timeout,
            Self::Disconnected { .. } => NfcErrorKind::Disconnected,
            Self::Unknown { .. } => NfcErrorKind::Unknown,
        }
    }

    /// Whether presenting the tag again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            NfcErrorKind::TagLost | NfcErrorKind::Timeout | NfcErrorKind::Busy
        )
    }
}

impl From<CodecError> for NfcError {
    fn from(error: CodecError) -> Self {
        Self::invalid_payload(error.to_string())
    }
}

impl From<NdefError> for NfcError {
    fn from(error: NdefError) -> Self {
        match error {
            NdefError::Empty => Self::EmptyTag,
            other => Self::invalid_payload(other.to_string()),
        }
    }
}

/// Payload-free classification of [`NfcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NfcErrorKind {
    TagLost,
    Unsupported,
    CapacityExceeded,
    ReadOnly,
    EmptyTag,
    InvalidPayload,
    NotEnabled,
    Busy,
    Cancelled,
    Timeout,
    Disconnected,
    Unknown,
}

impl NfcErrorKind {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TagLost => "The tag moved away. Hold it still against the phone and try again.",
            Self::Unsupported => "This tag type is not supported.",
            Self::CapacityExceeded => {
                "The card is too large for this tag. Use a larger tag or remove some details."
            }
            Self::ReadOnly => "This tag is locked and cannot be written.",
            Self::EmptyTag => "This tag does not contain a business card.",
            Self::InvalidPayload => "This tag does not contain a valid business card.",
            Self::NotEnabled => "NFC is turned off. Enable it in your device settings.",
            Self::Busy => "Another NFC operation is in progress.",
            Self::Cancelled => "NFC operation cancelled.",
            Self::Timeout => "No tag was detected. Try again.",
            Self::Disconnected => "The NFC reader is not available.",
            Self::Unknown => "Something went wrong while talking to the tag.",
        }
    }
}
