//! Duplicate detection for cards being saved.
//!
//! Importing or scanning the same card repeatedly should not pile up copies
//! in the store. The policy here decides whether a candidate card "is" an
//! already stored one. Matching is exact string equality, never fuzzy:
//! a typo in the phone number or a change of letter case produces a
//! distinct card.
//!
//! # Known Limitation
//!
//! The default policy cannot tell "the same card imported twice" apart from
//! "two different people sharing a name and a phone number or email". With
//! [`DuplicatePolicy::NameAndContact`] two cards with the same name and no
//! phone at all also match, because empty strings compare equal. Callers
//! that need a different trade-off pick another variant; the default keeps
//! the historical behavior so stores behave the same after an upgrade.

use crate::card::BusinessCard;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy used to decide whether a candidate card duplicates a stored one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Same name and (same phone or same email).
    ///
    /// Blank contact fields compare equal to each other.
    #[default]
    NameAndContact,

    /// Same name and a shared phone or email that is not blank.
    NameAndNonEmptyContact,

    /// Every save creates a new card.
    Disabled,
}

impl DuplicatePolicy {
    /// Whether `candidate` duplicates `existing` under this policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfcard_core::{BusinessCard, DuplicatePolicy};
    ///
    /// let stored = BusinessCard::builder("Jane Doe").phone("555-1111").build();
    /// let scanned = BusinessCard::builder("Jane Doe")
    ///     .phone("555-1111")
    ///     .email("jane@x.com")
    ///     .build();
    ///
    /// assert!(DuplicatePolicy::NameAndContact.is_duplicate(&scanned, &stored));
    /// assert!(!DuplicatePolicy::Disabled.is_duplicate(&scanned, &stored));
    /// ```
    pub fn is_duplicate(&self, candidate: &BusinessCard, existing: &BusinessCard) -> bool {
        match self {
            Self::NameAndContact => {
                candidate.name == existing.name
                    && (candidate.phone == existing.phone || candidate.email == existing.email)
            }
            Self::NameAndNonEmptyContact => {
                candidate.name == existing.name
                    && (shared_value(&candidate.phone, &existing.phone)
                        || shared_value(&candidate.email, &existing.email))
            }
            Self::Disabled => false,
        }
    }

    /// First stored card that `candidate` duplicates, in collection order.
    pub fn find_duplicate<'a>(
        &self,
        candidate: &BusinessCard,
        existing: &'a [BusinessCard],
    ) -> Option<&'a BusinessCard> {
        existing
            .iter()
            .find(|card| self.is_duplicate(candidate, card))
    }

    /// Stable configuration name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameAndContact => "name_and_contact",
            Self::NameAndNonEmptyContact => "name_and_non_empty_contact",
            Self::Disabled => "disabled",
        }
    }
}

fn shared_value(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name_and_contact" => Ok(Self::NameAndContact),
            "name_and_non_empty_contact" => Ok(Self::NameAndNonEmptyContact),
            "disabled" => Ok(Self::Disabled),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }
}
