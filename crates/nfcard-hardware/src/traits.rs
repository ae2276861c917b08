//! NFC radio trait definition.
//!
//! [`NfcDevice`] is the contract between the tag read/write flows and the
//! platform radio. The flows in [`crate::tag_io`] only ever talk to this
//! trait, so the mock radio and a real platform binding are interchangeable.
//!
//! All methods use native `async fn` (Rust 1.90 + Edition 2024 RPITIT).

#![allow(async_fn_in_trait)]

use crate::error::NfcResult;
use crate::types::{ReaderInfo, TagInfo, Technology};

/// NFC radio abstraction.
///
/// A session runs as:
///
/// 1. [`request_technology`](Self::request_technology) claims the radio
/// 2. [`wait_for_tag`](Self::wait_for_tag) blocks until a tag enters the field
/// 3. [`read_ndef`](Self::read_ndef) / [`write_ndef`](Self::write_ndef) talk to it
/// 4. [`cancel_technology_request`](Self::cancel_technology_request) releases the radio
///
/// Step 4 must run whatever happened in steps 1-3; a radio that is never
/// released stays [`Busy`](crate::NfcError::Busy) for every later session.
///
/// # Object Safety and Dynamic Dispatch
///
/// Native async methods make this trait unusable as `dyn NfcDevice`; take it
/// through generics.
///
/// # Examples
///
/// ```no_run
/// use nfcard_hardware::traits::NfcDevice;
/// use nfcard_hardware::types::Technology;
/// use nfcard_hardware::NfcResult;
///
/// async fn tag_uid<D: NfcDevice>(radio: &mut D) -> NfcResult<String> {
///     radio.request_technology(Technology::Ndef).await?;
///     let result = radio.wait_for_tag().await.map(|tag| tag.uid_hex());
///     radio.cancel_technology_request().await?;
///     result
/// }
/// ```
pub trait NfcDevice: Send + Sync {
    /// Whether the hardware has an NFC radio at all.
    async fn is_supported(&self) -> NfcResult<bool>;

    /// Whether NFC is switched on.
    async fn is_enabled(&self) -> NfcResult<bool>;

    /// Claim the radio for `technology`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - another session holds the radio ([`Busy`](crate::NfcError::Busy))
    /// - NFC is unavailable or switched off
    async fn request_technology(&mut self, technology: Technology) -> NfcResult<()>;

    /// Wait for a tag to enter the field.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`](crate::NfcError::Cancelled) if the request is
    /// cancelled while waiting.
    async fn wait_for_tag(&mut self) -> NfcResult<TagInfo>;

    /// Raw NDEF message bytes stored on the connected tag.
    async fn read_ndef(&mut self) -> NfcResult<Vec<u8>>;

    /// Replace the NDEF message on the connected tag.
    async fn write_ndef(&mut self, message: &[u8]) -> NfcResult<()>;

    /// Release the radio. Releasing without an active session succeeds.
    async fn cancel_technology_request(&mut self) -> NfcResult<()>;

    async fn get_reader_info(&self) -> NfcResult<ReaderInfo>;
}
