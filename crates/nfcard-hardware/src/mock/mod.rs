//! Mock device implementations for testing and development.
//!
//! The mock radio can be driven programmatically without NFC hardware.

pub mod nfc;

pub use nfc::{MockNfc, MockNfcHandle, MockTag};
