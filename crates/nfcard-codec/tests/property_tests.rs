//! Property-based tests for the card payload codec.
//!
//! These tests use proptest to generate arbitrary cards and verify that
//! the transport encodings preserve them.

use nfcard_codec::{NdefMessage, NdefRecord, payload};
use nfcard_core::BusinessCard;
use proptest::prelude::*;

/// Strategy for generating names that survive validation (non-blank).
fn valid_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-zÀ-ÿ][A-Za-zÀ-ÿ .'-]{0,40}")
        .expect("Failed to create name regex strategy")
}

/// Strategy for generating optional free-text fields, including quotes and
/// escapes that JSON has to handle.
fn free_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\\x00-\\x1F]{0,60}")
        .expect("Failed to create free text regex strategy")
}

/// Strategy for cards with only string fields populated.
fn string_only_card() -> impl Strategy<Value = BusinessCard> {
    (
        valid_name(),
        free_text(),
        free_text(),
        free_text(),
        free_text(),
        free_text(),
        free_text(),
    )
        .prop_map(|(name, title, company, phone, email, website, notes)| {
            BusinessCard::builder(name)
                .title(title)
                .company(company)
                .phone(phone)
                .email(email)
                .website(website)
                .notes(notes)
                .build()
        })
}

proptest! {
    /// Property: decode(encode(card)) == card for string-only cards.
    #[test]
    fn prop_payload_roundtrip(card in string_only_card()) {
        let text = payload::encode(&card).unwrap();
        let decoded = payload::decode(&text);
        prop_assert_eq!(decoded, Some(card));
    }

    /// Property: the same payload survives being wrapped in an NDEF text record.
    #[test]
    fn prop_ndef_text_roundtrip(card in string_only_card()) {
        let text = payload::encode(&card).unwrap();
        let message = NdefMessage::new(vec![NdefRecord::text(&text, "en").unwrap()]);

        let read = NdefMessage::decode(&message.encode()).unwrap();
        prop_assert_eq!(read.first_text(), Some(text));
    }

    /// Property: decoding arbitrary input never panics.
    #[test]
    fn prop_decode_never_panics(input in ".{0,200}") {
        let _ = payload::decode(&input);
    }

    /// Property: decoding arbitrary bytes as NDEF never panics.
    #[test]
    fn prop_ndef_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = NdefMessage::decode(&data);
    }
}
