use nfcard_core::DuplicatePolicy;
use nfcard_core::constants::STORAGE_KEY;

/// Card store configuration
///
/// # Examples
///
/// ```
/// use nfcard_storage::StoreConfig;
/// use nfcard_core::DuplicatePolicy;
///
/// let config = StoreConfig::default()
///     .duplicate_policy(DuplicatePolicy::NameAndNonEmptyContact);
///
/// assert_eq!(config.storage_key, "businessCards");
/// assert!(config.validate_on_write);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the slot holding the card collection
    pub storage_key: String,

    /// How saves detect an already stored card
    pub duplicate_policy: DuplicatePolicy,

    /// Reject cards failing [`BusinessCard::validate`](nfcard_core::BusinessCard::validate)
    /// on save and update
    pub validate_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            validate_on_write: true,
        }
    }
}

impl StoreConfig {
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn validate_on_write(mut self, validate: bool) -> Self {
        self.validate_on_write = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::NameAndContact);
        assert!(config.validate_on_write);
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::default()
            .storage_key("cards-v2")
            .duplicate_policy(DuplicatePolicy::Disabled)
            .validate_on_write(false);

        assert_eq!(config.storage_key, "cards-v2");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Disabled);
        assert!(!config.validate_on_write);
    }
}
