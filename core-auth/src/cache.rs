//! # Credential Cache
//!
//! Persisted credential cache with expiry-triggered refresh.
//!
//! ## Overview
//!
//! The `CredentialCache` mediates between an [`AuthorizationProvider`] and a
//! host [`PersistentStore`]:
//!
//! ```text
//! UI action -> CredentialCache -> AuthorizationProvider
//!                    |
//!                    v
//!             CredentialStore (persist result) -> UI reads state
//! ```
//!
//! Operations run as a single sequential async chain. There are no retries, no
//! backoff and no locking: concurrent calls may race and the last write to the
//! store wins.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::{AuthConfig, CredentialCache};
//! use std::sync::Arc;
//! # use core_auth::AuthorizationProvider;
//! # use bridge_traits::PersistentStore;
//! # async fn example(
//! #     provider: Arc<dyn AuthorizationProvider>,
//! #     store: Arc<dyn PersistentStore>,
//! # ) -> core_auth::Result<()> {
//! let config = AuthConfig::new("https://accounts.google.com", "client-id", ["openid", "profile"])?;
//! let cache = CredentialCache::new(config, provider, store);
//!
//! let credential = match cache.current().await? {
//!     Some(credential) => credential,
//!     None => cache.sign_in().await?,
//! };
//!
//! cache.sign_out(&credential).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`PersistentStore`]: bridge_traits::PersistentStore

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::provider::{AuthorizationProvider, RevokeRequest};
use crate::token_store::CredentialStore;
use crate::types::Credential;
use bridge_traits::{Clock, PersistentStore, SystemClock};
use core_runtime::config::CoreConfig;
use core_runtime::events::{AuthEvent, EventBus};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Credential cache orchestrating sign-in, refresh and sign-out.
pub struct CredentialCache {
    /// Identity provider configuration
    config: AuthConfig,
    /// External authorization flow
    provider: Arc<dyn AuthorizationProvider>,
    /// Typed persistence bound to one storage key
    credentials: CredentialStore,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
    /// Optional event bus for auth state events
    event_bus: Option<EventBus>,
}

impl CredentialCache {
    /// Creates a cache using the default storage key and the system clock.
    pub fn new(
        config: AuthConfig,
        provider: Arc<dyn AuthorizationProvider>,
        store: Arc<dyn PersistentStore>,
    ) -> Self {
        Self {
            config,
            provider,
            credentials: CredentialStore::new(store),
            clock: Arc::new(SystemClock),
            event_bus: None,
        }
    }

    /// Creates a cache wired from a runtime [`CoreConfig`].
    ///
    /// Uses the configured store, clock and storage key, and attaches a fresh
    /// event bus sized by `event_buffer_size`.
    pub fn from_core_config(
        core: &CoreConfig,
        config: AuthConfig,
        provider: Arc<dyn AuthorizationProvider>,
    ) -> Self {
        Self {
            config,
            provider,
            credentials: CredentialStore::with_key(core.store.clone(), core.storage_key.clone()),
            clock: core.clock.clone(),
            event_bus: Some(EventBus::new(core.event_buffer_size)),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the credential store (e.g. to use another storage key)
    pub fn with_credential_store(mut self, credentials: CredentialStore) -> Self {
        self.credentials = credentials;
        self
    }

    /// Attach an event bus
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// The attached event bus, if any
    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    /// Identity provider configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Storage key the credential lives under
    pub fn storage_key(&self) -> &str {
        self.credentials.key()
    }

    /// Runs the provider's authorization flow and persists the result.
    ///
    /// # Errors
    ///
    /// - `AuthError::Provider` - the provider failed; nothing is persisted and
    ///   no retry is attempted
    /// - `AuthError::SecureStorageUnavailable` - the credential could not be stored
    #[instrument(skip(self), fields(issuer = %self.config.issuer()))]
    pub async fn sign_in(&self) -> Result<Credential> {
        info!("Initiating sign-in flow");
        self.emit(AuthEvent::SigningIn {
            issuer: self.config.issuer().to_string(),
        });

        let credential = match self.provider.authorize(&self.config).await {
            Ok(credential) => credential,
            Err(e) => {
                error!(error = %e, "Authorization failed");
                return Err(self.fail(e.into(), false));
            }
        };

        if let Err(e) = self.credentials.store(&credential).await {
            return Err(self.fail(e, false));
        }

        self.emit(AuthEvent::SignedIn {
            issuer: self.config.issuer().to_string(),
            expires_at: credential
                .access_token_expiration_date
                .map(|at| at.timestamp()),
        });

        info!("Sign-in completed successfully");
        Ok(credential)
    }

    /// Returns the stored credential, refreshing it first if it has expired.
    ///
    /// - Nothing stored: `Ok(None)` without contacting the provider
    /// - Stored and expired (`expiration < now`): [`refresh`](Self::refresh)
    ///   is called once and its result returned
    /// - Otherwise the stored credential is returned unchanged
    ///
    /// # Errors
    ///
    /// Refresh and storage errors propagate; after a refresh failure the
    /// session should be treated as invalid.
    #[instrument(skip(self), fields(storage_key = %self.credentials.key()))]
    pub async fn current(&self) -> Result<Option<Credential>> {
        let Some(credential) = self.credentials.retrieve().await? else {
            debug!("No cached credential");
            return Ok(None);
        };

        let now = self.clock.now();
        if !credential.is_expired_at(now) {
            debug!("Cached credential is valid, no refresh needed");
            return Ok(Some(credential));
        }

        info!(
            expired_at = ?credential.access_token_expiration_date,
            "Cached credential expired, refreshing"
        );
        self.refresh(&credential).await.map(Some)
    }

    /// Exchanges the credential's refresh token for a new credential.
    ///
    /// The new credential replaces the stored one wholesale.
    ///
    /// # Errors
    ///
    /// - `AuthError::NoRefreshToken` - the credential carries no refresh token;
    ///   the provider is not called
    /// - `AuthError::Provider` - the provider rejected the refresh
    /// - `AuthError::SecureStorageUnavailable` - the new credential could not be stored
    #[instrument(skip(self, credential), fields(storage_key = %self.credentials.key()))]
    pub async fn refresh(&self, credential: &Credential) -> Result<Credential> {
        let Some(refresh_token) = credential.refresh_token.as_deref() else {
            warn!("No refresh token available");
            return Err(self.fail(AuthError::NoRefreshToken, false));
        };

        self.emit(AuthEvent::TokenRefreshing {
            storage_key: self.credentials.key().to_string(),
        });

        let refreshed = match self.provider.refresh(&self.config, refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                error!(error = %e, "Token refresh failed");
                return Err(self.fail(e.into(), false));
            }
        };

        if let Err(e) = self.credentials.store(&refreshed).await {
            return Err(self.fail(e, false));
        }

        self.emit(AuthEvent::TokenRefreshed {
            storage_key: self.credentials.key().to_string(),
            expires_at: refreshed
                .access_token_expiration_date
                .map(|at| at.timestamp()),
        });

        info!("Token refreshed successfully");
        Ok(refreshed)
    }

    /// Revokes the credential's access token and clears the store.
    ///
    /// Revocation is best-effort: if the provider fails, the error is returned
    /// and the stored credential is left untouched, even though the remote side
    /// may have partially completed the revoke.
    ///
    /// # Errors
    ///
    /// - `AuthError::Provider` - the revoke failed; the store is unchanged
    /// - `AuthError::SecureStorageUnavailable` - the revoke succeeded but the
    ///   stored credential could not be deleted
    #[instrument(skip(self, credential), fields(storage_key = %self.credentials.key()))]
    pub async fn sign_out(&self, credential: &Credential) -> Result<()> {
        info!("Signing out");

        let request = RevokeRequest::access_token(credential.access_token.clone());
        if let Err(e) = self.provider.revoke(&self.config, &request).await {
            warn!(error = %e, "Token revoke failed, keeping cached credential");
            return Err(self.fail(e.into(), true));
        }

        if let Err(e) = self.credentials.delete().await {
            return Err(self.fail(e, false));
        }

        self.emit(AuthEvent::SignedOut {
            storage_key: self.credentials.key().to_string(),
        });

        info!("Sign-out completed successfully");
        Ok(())
    }

    /// Publish an `AuthError` event and hand the error back
    fn fail(&self, err: AuthError, recoverable: bool) -> AuthError {
        self.emit(AuthEvent::AuthError {
            message: err.to_string(),
            recoverable,
        });
        err
    }

    fn emit(&self, event: AuthEvent) {
        if let Some(bus) = &self.event_bus {
            // No subscribers is fine
            let _ = bus.emit(event);
        }
    }
}
