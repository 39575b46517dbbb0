//! Secure Credential Storage using OS Keychain

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::PersistentStore,
};
use keyring::Entry;
use tracing::debug;

/// Keyring-based persistent store implementation
///
/// Uses platform-specific secure storage:
/// - macOS: Keychain
/// - Windows: Credential Manager (DPAPI)
/// - Linux: Secret Service (libsecret)
///
/// Each key maps to one keyring entry under the configured service name.
pub struct KeyringSecureStore {
    service_name: String,
}

impl KeyringSecureStore {
    /// Create a new secure store with default service name
    pub fn new() -> Self {
        Self {
            service_name: "authkit-session".to_string(),
        }
    }

    /// Create a new secure store with custom service name
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Get a keyring entry for the given key
    fn get_entry(&self, key: &str) -> std::result::Result<Entry, keyring::Error> {
        Entry::new(&self.service_name, key)
    }

    /// Convert keyring error to BridgeError
    fn map_keyring_error(e: keyring::Error) -> BridgeError {
        BridgeError::OperationFailed(format!("Keyring error: {}", e))
    }
}

impl Default for KeyringSecureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistentStore for KeyringSecureStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entry = self.get_entry(key).map_err(Self::map_keyring_error)?;

        match entry.get_password() {
            Ok(value) => {
                debug!(key = key, "Retrieved item from keyring");
                Ok(Some(value))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(key = key, "Item not found in keyring");
                Ok(None)
            }
            Err(e) => Err(Self::map_keyring_error(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let entry = self.get_entry(key).map_err(Self::map_keyring_error)?;

        entry.set_password(value).map_err(Self::map_keyring_error)?;

        debug!(key = key, "Stored item in keyring");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let entry = self.get_entry(key).map_err(Self::map_keyring_error)?;

        match entry.delete_credential() {
            Ok(_) => {
                debug!(key = key, "Deleted item from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                // Already deleted, consider it success
                debug!(key = key, "Item not found (already deleted)");
                Ok(())
            }
            Err(e) => Err(Self::map_keyring_error(e)),
        }
    }
}
