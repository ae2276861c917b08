//! Versioned JSON payload shared by QR codes and NFC text records.
//!
//! # Wire Format
//!
//! The payload is the compact JSON serialization of a [`BusinessCard`],
//! field for field, with one extra `schemaVersion` member:
//!
//! ```text
//! {"schemaVersion":1,"name":"Jane Doe","title":"","company":"",
//!  "phone":"555-1111","email":"","website":"","notes":""}
//! ```
//!
//! No compression and no checksum; a QR code already carries error
//! correction and an NDEF tag its own CRC.
//!
//! # Compatibility
//!
//! - Payloads without `schemaVersion` predate versioning and decode as
//!   version 0.
//! - Missing members decode as empty values and unknown members are
//!   ignored, so older and newer clients interoperate within one version.
//! - A version above [`PAYLOAD_SCHEMA_VERSION`] is rejected instead of
//!   being half-understood.
//! - A card whose name is blank after decoding is rejected.

use crate::error::CodecError;
use nfcard_core::BusinessCard;
use nfcard_core::constants::{LEGACY_SCHEMA_VERSION, PAYLOAD_SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingPayload<'a> {
    schema_version: u32,
    #[serde(flatten)]
    card: &'a BusinessCard,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingPayload {
    #[serde(default)]
    schema_version: Option<u32>,
    #[serde(flatten)]
    card: BusinessCard,
}

/// Encode a card as a transport string.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use nfcard_codec::payload;
/// use nfcard_core::BusinessCard;
///
/// let text = payload::encode(&BusinessCard::new("Jane Doe")).unwrap();
/// assert!(text.starts_with(r#"{"schemaVersion":1,"name":"Jane Doe""#));
/// ```
pub fn encode(card: &BusinessCard) -> Result<String, CodecError> {
    let payload = OutgoingPayload {
        schema_version: PAYLOAD_SCHEMA_VERSION,
        card,
    };
    Ok(serde_json::to_string(&payload)?)
}

/// Decode a transport string, returning `None` when it is not a usable card.
///
/// This is the entry point for scanners: any malformed, foreign or empty
/// payload yields `None`, and the caller shows an "invalid code" message.
///
/// # Examples
///
/// ```
/// use nfcard_codec::payload;
///
/// assert!(payload::decode("not valid data").is_none());
/// assert_eq!(payload::decode(r#"{"name":"Ana"}"#).unwrap().name, "Ana");
/// ```
pub fn decode(payload: &str) -> Option<BusinessCard> {
    try_decode(payload).ok()
}

/// Decode a transport string, reporting why it was rejected.
///
/// # Errors
///
/// Returns an error if:
/// - the string is not a JSON object of card shape ([`CodecError::Malformed`])
/// - `schemaVersion` is newer than supported ([`CodecError::UnsupportedVersion`])
/// - the decoded name is blank ([`CodecError::MissingName`])
pub fn try_decode(payload: &str) -> Result<BusinessCard, CodecError> {
    let incoming: IncomingPayload = serde_json::from_str(payload.trim())
        .map_err(|e| CodecError::Malformed(e.to_string()))?;

    let version = incoming.schema_version.unwrap_or(LEGACY_SCHEMA_VERSION);
    if version > PAYLOAD_SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            supported: PAYLOAD_SCHEMA_VERSION,
        });
    }

    if incoming.card.name.trim().is_empty() {
        return Err(CodecError::MissingName);
    }

    Ok(incoming.card)
}

/// Schema version declared by a payload, if it parses as a JSON object.
///
/// Legacy payloads report [`LEGACY_SCHEMA_VERSION`].
pub fn schema_version(payload: &str) -> Option<u32> {
    let value: serde_json::Value = serde_json::from_str(payload.trim()).ok()?;
    let object = value.as_object()?;
    match object.get("schemaVersion") {
        None | Some(serde_json::Value::Null) => Some(LEGACY_SCHEMA_VERSION),
        Some(version) => version.as_u64().and_then(|v| u32::try_from(v).ok()),
    }
}
