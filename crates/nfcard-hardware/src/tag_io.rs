//! Business card read and write flows over an NFC radio.
//!
//! Each flow claims the radio, waits for a tag, does its work and then
//! releases the radio whether the work succeeded, failed, was cancelled or
//! timed out. A card travels as one NDEF message holding one RTD Text
//! record whose body is the card payload.

use crate::error::{NfcError, NfcResult};
use crate::traits::NfcDevice;
use crate::types::Technology;
use nfcard_codec::ndef::tag_footprint;
use nfcard_codec::{NdefMessage, NdefRecord, payload};
use nfcard_core::BusinessCard;
use nfcard_core::constants::DEFAULT_NDEF_LANGUAGE;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Configuration for tag sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcConfig {
    /// IANA language code stored in written text records
    pub language: String,

    /// Check support and enabled state before claiming the radio
    pub require_enabled: bool,

    /// Give up on a session after this long; `None` waits for the user
    pub timeout: Option<Duration>,
}

impl Default for NfcConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_NDEF_LANGUAGE.to_string(),
            require_enabled: true,
            timeout: None,
        }
    }
}

impl NfcConfig {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn require_enabled(mut self, require: bool) -> Self {
        self.require_enabled = require;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Reads and writes business cards on NFC tags
///
/// # Examples
///
/// ```
/// use nfcard_hardware::mock::{MockNfc, MockTag};
/// use nfcard_hardware::types::TagType;
/// use nfcard_hardware::{NfcConfig, NfcTagIo};
/// use nfcard_core::BusinessCard;
///
/// #[tokio::main]
/// async fn main() {
///     let (radio, handle) = MockNfc::new();
///     let mut nfc = NfcTagIo::new(radio, NfcConfig::default());
///     let card = BusinessCard::builder("Jane Doe").phone("555-1111").build();
///
///     handle.present_tag(MockTag::blank(TagType::Ntag215)).await.unwrap();
///     assert!(nfc.write_tag(&card).await);
///
///     handle.present_tag(handle.tag().await.unwrap()).await.unwrap();
///     assert_eq!(nfc.read_tag().await, Some(card));
///     assert!(!handle.session_active().await);
/// }
/// ```
#[derive(Debug)]
pub struct NfcTagIo<D> {
    device: D,
    config: NfcConfig,
}

impl<D: NfcDevice> NfcTagIo<D> {
    pub fn new(device: D, config: NfcConfig) -> Self {
        Self { device, config }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &NfcConfig {
        &self.config
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    /// Encode `card` as the NDEF message written to tags.
    pub fn encode_message(&self, card: &BusinessCard) -> NfcResult<Vec<u8>> {
        let text = payload::encode(card)?;
        let record = NdefRecord::text(&text, &self.config.language)?;
        Ok(NdefMessage::new(vec![record]).try_encode()?.to_vec())
    }

    /// Decode the card held in a raw NDEF message.
    pub fn decode_message(bytes: &[u8]) -> NfcResult<BusinessCard> {
        let message = NdefMessage::decode(bytes)?;
        let text = message.first_text().ok_or(NfcError::EmptyTag)?;
        Ok(payload::try_decode(&text)?)
    }

    /// Read a card from the next tag presented.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - NFC is unavailable, disabled or busy
    /// - the session is cancelled or times out
    /// - the tag leaves the field during the read
    /// - the tag is blank or holds something other than a card payload
    pub async fn try_read_tag(&mut self) -> NfcResult<BusinessCard> {
        let session = Self::read_session(&mut self.device, &self.config);
        let result = bounded(self.config.timeout, session).await;
        self.release().await;

        if let Ok(card) = &result {
            info!("Read business card {:?} from tag", card.name);
        }
        result
    }

    /// Write `card` to the next tag presented.
    ///
    /// The message and its TLV wrapper are checked against the tag's user
    /// memory before anything is written, so an oversized card leaves the
    /// tag untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the card cannot be encoded
    /// - NFC is unavailable, disabled or busy
    /// - the session is cancelled or times out
    /// - the tag is read-only, too small, or leaves the field
    pub async fn try_write_tag(&mut self, card: &BusinessCard) -> NfcResult<()> {
        let message = self.encode_message(card)?;

        let session = Self::write_session(&mut self.device, &self.config, &message);
        let result = bounded(self.config.timeout, session).await;
        self.release().await;

        result?;
        info!("Wrote business card {:?} to tag", card.name);
        Ok(())
    }

    /// Read a card, `None` on any failure
    pub async fn read_tag(&mut self) -> Option<BusinessCard> {
        match self.try_read_tag().await {
            Ok(card) => Some(card),
            Err(e) => {
                log_failure("read", &e);
                None
            }
        }
    }

    /// Write a card, `false` on any failure
    pub async fn write_tag(&mut self, card: &BusinessCard) -> bool {
        match self.try_write_tag(card).await {
            Ok(()) => true,
            Err(e) => {
                log_failure("write", &e);
                false
            }
        }
    }

    async fn read_session(device: &mut D, config: &NfcConfig) -> NfcResult<BusinessCard> {
        Self::claim(device, config).await?;

        let tag = device.wait_for_tag().await?;
        debug!("Reading {} tag {}", tag.tag_type.name(), tag.uid_hex());

        let bytes = device.read_ndef().await?;
        Self::decode_message(&bytes)
    }

    async fn write_session(device: &mut D, config: &NfcConfig, message: &[u8]) -> NfcResult<()> {
        Self::claim(device, config).await?;

        let tag = device.wait_for_tag().await?;
        debug!(
            "Writing {} bytes to {} tag {}",
            message.len(),
            tag.tag_type.name(),
            tag.uid_hex()
        );

        if !tag.writable {
            return Err(NfcError::ReadOnly);
        }
        let required = tag_footprint(message.len());
        if required > tag.capacity() {
            return Err(NfcError::CapacityExceeded {
                required,
                capacity: tag.capacity(),
            });
        }

        device.write_ndef(message).await
    }

    async fn claim(device: &mut D, config: &NfcConfig) -> NfcResult<()> {
        if config.require_enabled {
            if !device.is_supported().await? {
                return Err(NfcError::unsupported("device has no NFC radio"));
            }
            if !device.is_enabled().await? {
                return Err(NfcError::NotEnabled);
            }
        }

        device.request_technology(Technology::Ndef).await
    }

    /// Runs after every session, whatever its outcome.
    async fn release(&mut self) {
        if let Err(e) = self.device.cancel_technology_request().await {
            warn!("Failed to release NFC radio: {}", e);
        }
    }
}

async fn bounded<T>(
    limit: Option<Duration>,
    session: impl Future<Output = NfcResult<T>>,
) -> NfcResult<T> {
    let Some(limit) = limit else {
        return session.await;
    };

    tokio::time::timeout(limit, session)
        .await
        .unwrap_or_else(|_| Err(NfcError::timeout(limit.as_millis() as u64)))
}

fn log_failure(operation: &str, error: &NfcError) {
    match error {
        NfcError::Cancelled => debug!("Tag {} cancelled", operation),
        NfcError::Unknown { .. } | NfcError::Disconnected { .. } => {
            error!("Tag {} failed: {}", operation, error)
        }
        _ => warn!("Tag {} failed: {}", operation, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockNfc, MockNfcHandle, MockTag};
    use crate::types::TagType;

    fn tag_io() -> (NfcTagIo<MockNfc>, MockNfcHandle) {
        let (radio, handle) = MockNfc::new();
        (NfcTagIo::new(radio, NfcConfig::default()), handle)
    }

    fn jane() -> BusinessCard {
        BusinessCard::builder("Jane Doe")
            .company("Acme")
            .phone("555-1111")
            .build()
    }

    #[test]
    fn test_config_defaults() {
        let config = NfcConfig::default();
        assert_eq!(config.language, "en");
        assert!(config.require_enabled);
        assert_eq!(config.timeout, None);

        let config = config.language("pt").timeout(Duration::from_secs(5));
        assert_eq!(config.language, "pt");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_message_is_single_text_record() {
        let (nfc, _handle) = tag_io();
        let bytes = nfc.encode_message(&jane()).unwrap();

        let message = NdefMessage::decode(&bytes).unwrap();
        assert_eq!(message.records().len(), 1);
        let (language, text) = message.records()[0].as_text().unwrap();
        assert_eq!(language, "en");
        assert_eq!(text, payload::encode(&jane()).unwrap());
    }

    #[test]
    fn test_decode_message_errors() {
        assert_eq!(
            NfcTagIo::<MockNfc>::decode_message(&[0xD0, 0x00, 0x00]),
            Err(NfcError::EmptyTag)
        );

        let junk = NdefMessage::new(vec![NdefRecord::text("not a card", "en").unwrap()]).encode();
        assert!(matches!(
            NfcTagIo::<MockNfc>::decode_message(&junk),
            Err(NfcError::InvalidPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (mut nfc, handle) = tag_io();

        handle.present_tag(MockTag::blank(TagType::Ntag215)).await.unwrap();
        nfc.try_write_tag(&jane()).await.unwrap();

        let written = handle.tag().await.unwrap();
        handle.present_tag(written).await.unwrap();
        assert_eq!(nfc.try_read_tag().await.unwrap(), jane());

        assert_eq!(handle.request_count().await, 2);
        assert_eq!(handle.release_count().await, 2);
    }

    #[tokio::test]
    async fn test_capacity_checked_before_write() {
        let (mut nfc, handle) = tag_io();
        let card = BusinessCard::builder("Jane Doe")
            .notes("x".repeat(200))
            .build();

        handle.present_tag(MockTag::blank(TagType::Ntag213)).await.unwrap();
        let result = nfc.try_write_tag(&card).await;

        assert!(matches!(
            result,
            Err(NfcError::CapacityExceeded { capacity: 144, .. })
        ));
        assert!(handle.written().await.is_empty());
        assert!(!handle.session_active().await);
    }

    #[tokio::test]
    async fn test_capacity_counts_tlv_wrapper() {
        let (mut nfc, handle) = tag_io();
        let len = nfc.encode_message(&jane()).unwrap().len();

        handle
            .present_tag(MockTag::blank(TagType::Other { capacity: len }))
            .await
            .unwrap();
        assert_eq!(
            nfc.try_write_tag(&jane()).await,
            Err(NfcError::CapacityExceeded {
                required: len + 3,
                capacity: len
            })
        );
        assert!(handle.written().await.is_empty());

        handle
            .present_tag(MockTag::blank(TagType::Other { capacity: len + 3 }))
            .await
            .unwrap();
        assert_eq!(nfc.try_write_tag(&jane()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_read_only_tag_is_not_written() {
        let (mut nfc, handle) = tag_io();

        handle
            .present_tag(MockTag::blank(TagType::Ntag216).locked())
            .await
            .unwrap();
        assert_eq!(nfc.try_write_tag(&jane()).await, Err(NfcError::ReadOnly));
        assert!(handle.written().await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_radio_is_never_claimed() {
        let (mut nfc, handle) = tag_io();
        handle.set_enabled(false).await;

        assert_eq!(nfc.try_read_tag().await, Err(NfcError::NotEnabled));
        assert_eq!(handle.request_count().await, 0);
        assert_eq!(handle.release_count().await, 1);
    }

    #[tokio::test]
    async fn test_timeout_releases_radio() {
        let (radio, handle) = MockNfc::new();
        let config = NfcConfig::default().timeout(Duration::from_millis(20));
        let mut nfc = NfcTagIo::new(radio, config);

        assert_eq!(nfc.try_read_tag().await, Err(NfcError::timeout(20)));
        assert!(!handle.session_active().await);
        assert_eq!(nfc.read_tag().await, None);
    }

    #[tokio::test]
    async fn test_blank_tag_read_is_empty() {
        let (mut nfc, handle) = tag_io();

        handle.present_tag(MockTag::blank(TagType::Ntag213)).await.unwrap();
        assert_eq!(nfc.try_read_tag().await, Err(NfcError::EmptyTag));
    }
}
