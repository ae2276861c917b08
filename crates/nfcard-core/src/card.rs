use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Current time as milliseconds since the Unix epoch.
///
/// All card timestamps use this unit.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Business card record.
///
/// The only entity of the system. A card starts out transient (built from
/// manual entry, an NFC tag, a QR code or an imported contact) and becomes
/// durable once the store saves it, which is when `id`, `created_at` and
/// `updated_at` are assigned.
///
/// # Fields
///
/// * `id` - Store-assigned identifier, immutable once set
/// * `name` - Display name, the only required field
/// * `title`, `company`, `phone`, `email`, `website`, `notes` - Optional, empty by default
/// * `additional_phones`, `additional_emails`, `additional_websites` - Ordered extra values
/// * `created_at`, `updated_at` - Epoch milliseconds, store-assigned
///
/// # Serialized Form
///
/// Fields serialize in camelCase (`additionalPhones`, `createdAt`). Missing
/// fields and explicit `null` values deserialize to their defaults, so
/// payloads written by older clients still load.
///
/// # Examples
///
/// ```
/// use nfcard_core::BusinessCard;
///
/// let card = BusinessCard::builder("Jane Doe")
///     .title("Engineer")
///     .company("Acme")
///     .phone("555-1111")
///     .build();
///
/// assert!(card.validate().is_ok());
/// assert!(!card.is_persisted());
/// assert_eq!(card.phones().collect::<Vec<_>>(), vec!["555-1111"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessCard {
    /// Store-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Job title
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    /// Company or organization
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,

    /// Primary phone number
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,

    /// Primary email address
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,

    /// Primary website
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,

    /// Free-form notes
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,

    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_phones: Vec<String>,

    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_emails: Vec<String>,

    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_websites: Vec<String>,

    /// Creation time (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Last modification time (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BusinessCard {
    /// Create a transient card with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Start building a card with the given name.
    pub fn builder(name: impl Into<String>) -> BusinessCardBuilder {
        BusinessCardBuilder::new(name)
    }

    /// Generate a fresh identifier for a card being persisted.
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Whether the store has assigned this card an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check the record-level invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `name` is empty or whitespace only
    /// - `id` is present but blank
    /// - both timestamps are set and `updated_at < created_at`
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }

        if let Some(id) = &self.id
            && id.trim().is_empty()
        {
            return Err(Error::InvalidField {
                field: "id".to_string(),
                reason: "identifier cannot be blank".to_string(),
            });
        }

        if let (Some(created_at), Some(updated_at)) = (self.created_at, self.updated_at)
            && updated_at < created_at
        {
            return Err(Error::InvalidTimestamps {
                created_at,
                updated_at,
            });
        }

        Ok(())
    }

    /// Primary phone followed by the additional ones, blanks skipped.
    pub fn phones(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.phone, &self.additional_phones)
    }

    /// Primary email followed by the additional ones, blanks skipped.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.email, &self.additional_emails)
    }

    /// Primary website followed by the additional ones, blanks skipped.
    pub fn websites(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.website, &self.additional_websites)
    }

    /// Plain-text summary for the clipboard and the share sheet.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfcard_core::BusinessCard;
    ///
    /// let card = BusinessCard::builder("Jane Doe")
    ///     .title("CTO")
    ///     .company("Acme")
    ///     .email("jane@acme.io")
    ///     .build();
    ///
    /// assert_eq!(card.share_text(), "Jane Doe\nCTO at Acme\nEmail: jane@acme.io");
    /// ```
    pub fn share_text(&self) -> String {
        let mut lines = vec![self.name.trim().to_string()];

        let title = self.title.trim();
        let company = self.company.trim();
        match (title.is_empty(), company.is_empty()) {
            (false, false) => lines.push(format!("{} at {}", title, company)),
            (false, true) => lines.push(title.to_string()),
            (true, false) => lines.push(company.to_string()),
            (true, true) => {}
        }

        lines.extend(self.phones().map(|p| format!("Phone: {}", p)));
        lines.extend(self.emails().map(|e| format!("Email: {}", e)));
        lines.extend(self.websites().map(|w| format!("Web: {}", w)));

        let notes = self.notes.trim();
        if !notes.is_empty() {
            lines.push(notes.to_string());
        }

        lines.join("\n")
    }
}

fn non_blank<'a>(primary: &'a str, additional: &'a [String]) -> impl Iterator<Item = &'a str> {
    std::iter::once(primary)
        .chain(additional.iter().map(String::as_str))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Builder for transient cards.
///
/// Identifier and timestamps are left unset; the store assigns them.
#[derive(Debug, Clone)]
pub struct BusinessCardBuilder {
    card: BusinessCard,
}

impl BusinessCardBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            card: BusinessCard::new(name),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.card.title = title.into();
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.card.company = company.into();
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.card.phone = phone.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.card.email = email.into();
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.card.website = website.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.card.notes = notes.into();
        self
    }

    pub fn additional_phone(mut self, phone: impl Into<String>) -> Self {
        self.card.additional_phones.push(phone.into());
        self
    }

    pub fn additional_email(mut self, email: impl Into<String>) -> Self {
        self.card.additional_emails.push(email.into());
        self
    }

    pub fn additional_website(mut self, website: impl Into<String>) -> Self {
        self.card.additional_websites.push(website.into());
        self
    }

    pub fn build(self) -> BusinessCard {
        self.card
    }
}
