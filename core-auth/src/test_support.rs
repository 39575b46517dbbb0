//! Shared doubles for unit tests.

use crate::config::AuthConfig;
use crate::provider::{AuthorizationProvider, ProviderError, RevokeRequest};
use crate::social::{SocialLoginProvider, SocialLoginResult};
use crate::types::Credential;
use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{Clock, PersistentStore};
use chrono::{DateTime, Utc};
use mockall::mock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

mock! {
    pub Provider {}

    #[async_trait]
    impl AuthorizationProvider for Provider {
        async fn authorize(&self, config: &AuthConfig) -> Result<Credential, ProviderError>;
        async fn refresh(&self, config: &AuthConfig, refresh_token: &str) -> Result<Credential, ProviderError>;
        async fn revoke(&self, config: &AuthConfig, request: &RevokeRequest) -> Result<(), ProviderError>;
    }
}

mock! {
    pub SocialLogin {}

    #[async_trait]
    impl SocialLoginProvider for SocialLogin {
        async fn log_in(&self) -> Result<SocialLoginResult, ProviderError>;
    }
}

/// In-memory store with switchable write failures
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn check_writable(&self) -> BridgeResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get_item(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.check_writable()?;
        self.put_raw(key, value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> BridgeResult<()> {
        self.check_writable()?;
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Clock frozen at a given instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn test_config() -> AuthConfig {
    AuthConfig::new("https://accounts.google.com", "test-client", ["openid", "profile"])
        .expect("valid test config")
}

pub fn credential_expiring_at(access_token: &str, expires_at: DateTime<Utc>) -> Credential {
    Credential::new(
        access_token.to_string(),
        Some(format!("refresh-for-{}", access_token)),
        Some(expires_at),
    )
}
