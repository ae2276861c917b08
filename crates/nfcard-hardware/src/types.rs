//! Common types shared by NFC device implementations.

use crate::error::{NfcError, NfcResult};
use nfcard_core::constants::{NTAG213_USER_MEMORY, NTAG215_USER_MEMORY, NTAG216_USER_MEMORY};
use serde::{Deserialize, Serialize};

/// Minimum UID length in bytes (per ISO 14443 specification).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (per ISO 14443 specification).
pub const MAX_UID_LENGTH: usize = 10;

/// Radio technology requested for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Technology {
    /// NDEF-formatted tag of any type.
    Ndef,

    /// Raw ISO 14443-A access.
    NfcA,
}

/// NFC tag type identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TagType {
    Ntag213,
    Ntag215,
    Ntag216,

    /// Mifare Ultralight (48 bytes of user memory).
    MifareUltralight,

    /// Other NDEF tag with the user memory it reports.
    Other { capacity: usize },
}

impl TagType {
    /// Get a human-readable name for the tag type.
    pub fn name(&self) -> &str {
        match self {
            Self::Ntag213 => "NTAG213",
            Self::Ntag215 => "NTAG215",
            Self::Ntag216 => "NTAG216",
            Self::MifareUltralight => "Mifare Ultralight",
            Self::Other { .. } => "NDEF tag",
        }
    }

    /// User memory in bytes, TLV wrapper included.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Ntag213 => NTAG213_USER_MEMORY,
            Self::Ntag215 => NTAG215_USER_MEMORY,
            Self::Ntag216 => NTAG216_USER_MEMORY,
            Self::MifareUltralight => 48,
            Self::Other { capacity } => *capacity,
        }
    }
}

/// A tag discovered in the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Tag unique identifier (4-10 bytes).
    pub uid: Vec<u8>,

    pub tag_type: TagType,

    /// Whether the tag accepts writes.
    pub writable: bool,

    /// Time of discovery.
    pub discovered_at: chrono::DateTime<chrono::Utc>,
}

impl TagInfo {
    /// Describe a freshly discovered tag.
    ///
    /// # Errors
    ///
    /// Returns [`NfcError::Unsupported`] if the UID length is outside
    /// 4-10 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfcard_hardware::types::{TagInfo, TagType};
    ///
    /// let tag = TagInfo::new(vec![0x04, 0xAB, 0xCD, 0xEF], TagType::Ntag215, true).unwrap();
    /// assert_eq!(tag.uid_hex(), "04:AB:CD:EF");
    /// assert_eq!(tag.capacity(), 504);
    ///
    /// assert!(TagInfo::new(vec![0x01], TagType::Ntag215, true).is_err());
    /// ```
    pub fn new(uid: Vec<u8>, tag_type: TagType, writable: bool) -> NfcResult<Self> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid.len()) {
            return Err(NfcError::unsupported(format!(
                "UID must be {}-{} bytes, got {}",
                MIN_UID_LENGTH,
                MAX_UID_LENGTH,
                uid.len()
            )));
        }

        Ok(Self {
            uid,
            tag_type,
            writable,
            discovered_at: chrono::Utc::now(),
        })
    }

    /// UID as colon-separated hex, the form NFC apps display.
    pub fn uid_hex(&self) -> String {
        self.uid
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn capacity(&self) -> usize {
        self.tag_type.capacity()
    }
}

/// NFC reader information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "Built-in NFC", "ACR122U").
    pub name: String,

    /// Supported technologies.
    pub technologies: Vec<Technology>,

    /// Whether the reader can write NDEF messages.
    pub can_write: bool,
}

impl ReaderInfo {
    pub fn new(name: impl Into<String>, technologies: Vec<Technology>) -> Self {
        Self {
            name: name.into(),
            technologies,
            can_write: true,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.can_write = false;
        self
    }

    pub fn supports(&self, technology: Technology) -> bool {
        self.technologies.contains(&technology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_type_capacities() {
        assert_eq!(TagType::MifareUltralight.capacity(), 48);
        assert_eq!(TagType::Ntag213.capacity(), 144);
        assert_eq!(TagType::Ntag216.capacity(), 888);
        assert_eq!(TagType::Other { capacity: 2000 }.capacity(), 2000);
        assert_eq!(TagType::Ntag213.name(), "NTAG213");
    }

    #[test]
    fn test_tag_info_uid_bounds() {
        assert!(TagInfo::new(vec![0; 4], TagType::Ntag213, true).is_ok());
        assert!(TagInfo::new(vec![0; 10], TagType::Ntag213, true).is_ok());
        assert!(matches!(
            TagInfo::new(vec![0; 11], TagType::Ntag213, true),
            Err(NfcError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_uid_hex_seven_byte() {
        let tag = TagInfo::new(
            vec![0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66],
            TagType::Ntag213,
            true,
        )
        .unwrap();
        assert_eq!(tag.uid_hex(), "04:11:22:33:44:55:66");
    }

    #[test]
    fn test_reader_info() {
        let info = ReaderInfo::new("Built-in NFC", vec![Technology::Ndef]);
        assert!(info.can_write);
        assert!(info.supports(Technology::Ndef));
        assert!(!info.supports(Technology::NfcA));
        assert!(!info.read_only().can_write);
    }

    #[test]
    fn test_reader_info_serialization() {
        let info = ReaderInfo::new("Reader", vec![Technology::Ndef, Technology::NfcA]);
        let json = serde_json::to_string(&info).unwrap();
        let back: ReaderInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
