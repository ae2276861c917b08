//! Core types for the nfcard business-card system.
//!
//! This crate holds the pieces every other crate agrees on: the
//! [`BusinessCard`] record, the duplicate-detection policy used when cards
//! are saved, shared constants and the core error type.

pub mod card;
pub mod constants;
pub mod error;
pub mod reconcile;

pub use card::{BusinessCard, BusinessCardBuilder, now_millis};
pub use error::{Error, Result};
pub use reconcile::DuplicatePolicy;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
