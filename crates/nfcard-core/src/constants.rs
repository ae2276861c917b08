//! Constants shared by the codec, storage and NFC crates.
//!
//! Changing any of these affects data already written to devices, tags or
//! QR codes in the field.

// ============================================================================
// Persistence
// ============================================================================

/// Key under which the whole card collection is stored.
///
/// The value is a JSON array of card objects.
///
/// # Examples
///
/// ```
/// use nfcard_core::constants::STORAGE_KEY;
///
/// assert_eq!(STORAGE_KEY, "businessCards");
/// ```
pub const STORAGE_KEY: &str = "businessCards";

// ============================================================================
// Transport payload
// ============================================================================

/// Schema version written into every encoded payload.
pub const PAYLOAD_SCHEMA_VERSION: u32 = 1;

/// Version assumed for payloads that carry no `schemaVersion` field.
///
/// These were produced before the payload was versioned.
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

// ============================================================================
// NFC
// ============================================================================

/// Default IANA language code for NDEF text records.
pub const DEFAULT_NDEF_LANGUAGE: &str = "en";

/// User memory of an NTAG213 tag in bytes.
///
/// The smallest tag commonly sold for business cards. The NDEF message
/// shares this area with its TLV wrapper.
pub const NTAG213_USER_MEMORY: usize = 144;

/// User memory of an NTAG215 tag in bytes.
pub const NTAG215_USER_MEMORY: usize = 504;

/// User memory of an NTAG216 tag in bytes.
pub const NTAG216_USER_MEMORY: usize = 888;
