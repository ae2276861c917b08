//! Transport encodings for business cards.
//!
//! A card leaves the device in three shapes:
//!
//! - **Payload** ([`payload`]): versioned JSON string carried by QR codes and
//!   by the text record written to NFC tags.
//! - **NDEF** ([`ndef`]): the NFC Forum message format wrapping that string
//!   on a tag.
//! - **vCard** ([`vcard`]): contact interchange for importing and exporting
//!   address-book entries.
//!
//! # Example
//!
//! ```
//! use nfcard_codec::{NdefMessage, NdefRecord, payload};
//! use nfcard_core::BusinessCard;
//!
//! let card = BusinessCard::builder("Jane Doe").phone("555-1111").build();
//!
//! // QR code and NFC share the same string
//! let text = payload::encode(&card).unwrap();
//!
//! // Wrap it for a tag
//! let message = NdefMessage::new(vec![NdefRecord::text(&text, "en").unwrap()]);
//! let bytes = message.encode();
//!
//! // And back
//! let read = NdefMessage::decode(&bytes).unwrap();
//! let decoded = payload::decode(&read.first_text().unwrap()).unwrap();
//! assert_eq!(decoded, card);
//! ```

pub mod error;
pub mod ndef;
pub mod payload;
pub mod vcard;

pub use error::{CodecError, NdefError};
pub use ndef::{NdefMessage, NdefRecord, Tnf};
pub use payload::{decode, encode, try_decode};
