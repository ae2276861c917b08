//! NFC radio abstraction and business card tag flows.
//!
//! # Layers
//!
//! - [`NfcDevice`] is the platform radio: claim, wait for a tag, read or
//!   write raw NDEF bytes, release.
//! - [`NfcTagIo`] turns a radio into card operations. It encodes cards with
//!   `nfcard-codec`, checks tag capacity, and always releases the radio.
//! - [`mock::MockNfc`] is a scriptable radio for tests and development.
//!
//! # Errors
//!
//! Failures are reported as [`NfcError`] variants. Screens pick a message
//! through [`NfcError::kind`] and [`NfcErrorKind::user_message`]:
//!
//! ```no_run
//! use nfcard_hardware::{NfcDevice, NfcTagIo};
//!
//! async fn scan<D: NfcDevice>(nfc: &mut NfcTagIo<D>) -> String {
//!     match nfc.try_read_tag().await {
//!         Ok(card) => format!("Scanned {}", card.name),
//!         Err(e) => e.kind().user_message().to_string(),
//!     }
//! }
//! ```
//!
//! # Thread Safety
//!
//! [`NfcDevice`] requires `Send + Sync`, so radios and the flows built on
//! them can move between Tokio worker threads.

pub mod error;
pub mod mock;
pub mod tag_io;
pub mod traits;
pub mod types;

pub use error::{NfcError, NfcErrorKind, NfcResult};
pub use tag_io::{NfcConfig, NfcTagIo};
pub use traits::NfcDevice;
pub use types::{MAX_UID_LENGTH, MIN_UID_LENGTH, ReaderInfo, TagInfo, TagType, Technology};
