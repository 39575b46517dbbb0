//! # Core Configuration Module
//!
//! Provides dependency wiring for the credential core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding the host bridges and settings that `core-auth` needs. It enforces
//! fail-fast validation so a missing capability is reported at startup instead
//! of on the first sign-in.
//!
//! ## Required Dependencies
//!
//! - `PersistentStore` - Required for credential persistence
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - Time source for expiry checks (default: `SystemClock`)
//!
//! When the `desktop-shims` feature is enabled, an SQLite-backed store in the
//! platform data directory is injected automatically if none is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .store(Arc::new(MyStore))
//!     .storage_key("auth_session:work")
//!     .build()
//!     .await
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::LoggingConfig;
use bridge_traits::{Clock, PersistentStore, SystemClock};
use std::sync::Arc;

/// Key under which the credential is persisted unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "auth_session:credential";

/// Core configuration for the credential core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Durable storage for the credential (required)
    pub store: Arc<dyn PersistentStore>,

    /// Time source used for expiry checks
    pub clock: Arc<dyn Clock>,

    /// Key the credential is stored under
    pub storage_key: String,

    /// Per-subscriber buffer of the auth event bus
    pub event_buffer_size: usize,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("store", &"PersistentStore { ... }")
            .field("clock", &"Clock { ... }")
            .field("storage_key", &self.storage_key)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("logging", &self.logging)
            .finish()
    }
}

impl CoreConfig {
    /// Create a new configuration builder
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Install the global subscriber described by [`logging`](Self::logging)
    ///
    /// # Errors
    ///
    /// `Error::Logging` if a subscriber is already installed or the filter is invalid.
    pub fn init_logging(&self) -> Result<()> {
        crate::logging::init_logging(self.logging.clone())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    store: Option<Arc<dyn PersistentStore>>,
    clock: Option<Arc<dyn Clock>>,
    storage_key: Option<String>,
    event_buffer_size: Option<usize>,
    logging: Option<LoggingConfig>,
}

impl CoreConfigBuilder {
    /// Set the persistent store (required unless `desktop-shims` is enabled)
    pub fn store(mut self, store: Arc<dyn PersistentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the time source
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the key the credential is stored under
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Set the event bus buffer size
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Set the logging configuration
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `Error::CapabilityMissing` if no store was provided and no desktop
    ///   default is available
    /// - `Error::Config` if the storage key is blank or the buffer size is zero
    /// - `Error::Store` if the desktop default store can't be opened
    pub async fn build(self) -> Result<CoreConfig> {
        let storage_key = self
            .storage_key
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(Error::Config("storage key must not be empty".to_string()));
        }

        let event_buffer_size = self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        if event_buffer_size == 0 {
            return Err(Error::Config(
                "event buffer size must be greater than zero".to_string(),
            ));
        }

        let store = match self.store {
            Some(store) => store,
            None => Self::default_store().await?,
        };

        Ok(CoreConfig {
            store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            storage_key,
            event_buffer_size,
            logging: self.logging.unwrap_or_default(),
        })
    }

    #[cfg(feature = "desktop-shims")]
    async fn default_store() -> Result<Arc<dyn PersistentStore>> {
        use bridge_desktop::SqliteStore;

        let path = SqliteStore::default_path().map_err(|e| Error::CapabilityMissing {
            capability: "PersistentStore".to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = ?path, "Using desktop SQLite store");

        let store = SqliteStore::open(path).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "desktop-shims"))]
    async fn default_store() -> Result<Arc<dyn PersistentStore>> {
        Err(Error::CapabilityMissing {
            capability: "PersistentStore".to_string(),
            message: "No persistent store provided. \
                      Desktop: enable the `desktop-shims` feature. \
                      Mobile: inject the platform storage adapter."
                .to_string(),
        })
    }
}
