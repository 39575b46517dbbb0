//! Credential Storage
//!
//! Typed persistence of a single [`Credential`] on top of a host
//! [`PersistentStore`].
//!
//! ## Security Features
//!
//! - Credentials are never logged or exposed in error messages
//! - Storage goes through the injected `PersistentStore` (Keychain, SQLite, ...)
//! - Corrupted entries are removed instead of being retried forever
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::{CredentialStore, Credential};
//! use std::sync::Arc;
//! # use bridge_traits::PersistentStore;
//! # async fn example(store: Arc<dyn PersistentStore>) -> core_auth::Result<()> {
//! let credentials = CredentialStore::new(store);
//!
//! let credential = Credential::new("access_token_value".to_string(), None, None);
//!
//! credentials.store(&credential).await?;
//! let retrieved = credentials.retrieve().await?;
//! credentials.delete().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::Credential;
use bridge_traits::PersistentStore;
use core_runtime::config::DEFAULT_STORAGE_KEY;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Secure storage for the session credential
///
/// Each `CredentialStore` is bound to one storage key and holds at most one
/// credential under it. Writes replace the previous value wholesale.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn PersistentStore>,
    key: String,
}

impl CredentialStore {
    /// Create a credential store using [`DEFAULT_STORAGE_KEY`]
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create a credential store bound to a custom key
    ///
    /// Distinct keys let a host keep one credential per account.
    pub fn with_key(store: Arc<dyn PersistentStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        debug!(storage_key = %key, "Initializing CredentialStore");
        Self { store, key }
    }

    /// Storage key this store is bound to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist a credential, replacing any previous one
    ///
    /// # Errors
    ///
    /// - `AuthError::SerializationFailed` if the credential can't be encoded
    /// - `AuthError::SecureStorageUnavailable` if the write fails
    pub async fn store(&self, credential: &Credential) -> Result<()> {
        let json = serde_json::to_string(credential).map_err(|e| {
            warn!(storage_key = %self.key, error = %e, "Failed to serialize credential");
            AuthError::SerializationFailed(e.to_string())
        })?;

        self.store.set_item(&self.key, &json).await.map_err(|e| {
            warn!(
                storage_key = %self.key,
                error = %e,
                "Failed to store credential"
            );
            AuthError::SecureStorageUnavailable(e.to_string())
        })?;

        info!(
            storage_key = %self.key,
            has_refresh_token = credential.refresh_token.is_some(),
            "Credential stored"
        );

        Ok(())
    }

    /// Retrieve the stored credential
    ///
    /// # Returns
    ///
    /// - `Ok(Some(credential))` if a valid credential is stored
    /// - `Ok(None)` if nothing is stored under the key
    /// - `Err(AuthError::CredentialCorrupted)` if the stored value can't be
    ///   decoded; the value is removed before returning
    /// - `Err(AuthError::SecureStorageUnavailable)` if the read fails
    pub async fn retrieve(&self) -> Result<Option<Credential>> {
        let data = self.store.get_item(&self.key).await.map_err(|e| {
            warn!(
                storage_key = %self.key,
                error = %e,
                "Failed to read credential from storage"
            );
            AuthError::SecureStorageUnavailable(e.to_string())
        })?;

        let Some(data) = data else {
            debug!(storage_key = %self.key, "No credential in storage");
            return Ok(None);
        };

        let credential: Credential = match serde_json::from_str(&data) {
            Ok(credential) => credential,
            Err(e) => {
                warn!(
                    storage_key = %self.key,
                    error = %e,
                    "Failed to deserialize credential, it may be corrupted"
                );

                if let Err(delete_err) = self.store.remove_item(&self.key).await {
                    warn!(
                        storage_key = %self.key,
                        error = %delete_err,
                        "Failed to delete corrupted credential"
                    );
                }

                return Err(AuthError::CredentialCorrupted {
                    key: self.key.clone(),
                    reason: e.to_string(),
                });
            }
        };

        debug!(
            storage_key = %self.key,
            has_refresh_token = credential.refresh_token.is_some(),
            expires_at = ?credential.access_token_expiration_date,
            "Credential retrieved"
        );

        Ok(Some(credential))
    }

    /// Delete the stored credential
    ///
    /// Idempotent: succeeds when nothing is stored.
    pub async fn delete(&self) -> Result<()> {
        self.store.remove_item(&self.key).await.map_err(|e| {
            warn!(
                storage_key = %self.key,
                error = %e,
                "Failed to delete credential from storage"
            );
            AuthError::SecureStorageUnavailable(e.to_string())
        })?;

        info!(storage_key = %self.key, "Credential deleted");

        Ok(())
    }

    /// Check if a credential is stored without decoding it
    pub async fn exists(&self) -> Result<bool> {
        self.store
            .has_item(&self.key)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))
    }
}
