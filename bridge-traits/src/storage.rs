//! Storage Abstractions
//!
//! Provides the platform-agnostic trait for durable key/value persistence used to
//! keep a signed-in session across app restarts.

use async_trait::async_trait;

use crate::{error::Result, platform::PlatformSendSync};

/// Durable key/value storage trait
///
/// Abstracts platform-specific persistence:
/// - iOS: Keychain or UserDefaults
/// - Android: Keystore-backed SharedPreferences
/// - Desktop: SQLite file or OS keychain
/// - Web: localStorage / IndexedDB
///
/// Values are opaque strings. Writes to an existing key replace the previous
/// value (last write wins); there is no read-modify-write atomicity.
///
/// # Security Requirements
///
/// Implementations that hold credentials SHOULD:
/// - Use platform-provided secure storage when available
/// - Never log or expose stored values
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::PersistentStore;
///
/// async fn remember(store: &dyn PersistentStore, blob: &str) -> Result<()> {
///     store.set_item("session", blob).await?;
///     Ok(())
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PersistentStore: PlatformSendSync {
    /// Retrieve the value stored under `key`
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    ///
    /// Removing a key that doesn't exist succeeds.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Check if a value exists without handing it back
    async fn has_item(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key).await?.is_some())
    }
}
