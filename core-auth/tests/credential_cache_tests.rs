//! Integration tests for the CredentialCache
//!
//! These tests drive the public API end to end:
//! - Sign-in persistence and read-back through `current()`
//! - Expiry-triggered refresh, with provider call counts asserted
//! - Sign-out success and revoke failure
//! - Stored JSON compatibility

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{Clock, PersistentStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_auth::{
    AuthConfig, AuthError, AuthorizationProvider, Credential, CredentialCache, ProviderError,
    RevokeRequest,
};
use core_runtime::config::DEFAULT_STORAGE_KEY;
use mockall::mock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mock! {
    Provider {}

    #[async_trait]
    impl AuthorizationProvider for Provider {
        async fn authorize(&self, config: &AuthConfig) -> Result<Credential, ProviderError>;
        async fn refresh(&self, config: &AuthConfig, refresh_token: &str) -> Result<Credential, ProviderError>;
        async fn revoke(&self, config: &AuthConfig, request: &RevokeRequest) -> Result<(), ProviderError>;
    }
}

#[derive(Default)]
struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn raw(&self) -> Option<String> {
        self.items.lock().unwrap().get(DEFAULT_STORAGE_KEY).cloned()
    }

    fn put_raw(&self, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(DEFAULT_STORAGE_KEY.to_string(), value.to_string());
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get_item(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> BridgeResult<()> {
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn config() -> AuthConfig {
    AuthConfig::new(
        "https://accounts.google.com",
        "603386649315-example.apps.googleusercontent.com",
        ["openid", "profile"],
    )
    .unwrap()
}

fn credential(access_token: &str, expires_at: DateTime<Utc>) -> Credential {
    Credential::new(
        access_token.to_string(),
        Some(format!("{}-refresh", access_token)),
        Some(expires_at),
    )
}

fn create_cache(provider: MockProvider) -> (CredentialCache, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let cache = CredentialCache::new(config(), Arc::new(provider), store.clone())
        .with_clock(Arc::new(FixedClock(now())));
    (cache, store)
}

#[tokio::test]
async fn expired_credential_is_refreshed_exactly_once() {
    let stale = credential("stale", now() - Duration::seconds(30));
    let fresh = credential("fresh", now() + Duration::hours(1));

    let mut provider = MockProvider::new();
    let returned = fresh.clone();
    provider
        .expect_refresh()
        .times(1)
        .withf(|config, token| config.client_id().ends_with(".com") && token == "stale-refresh")
        .returning(move |_, _| Ok(returned.clone()));
    provider.expect_authorize().times(0);
    provider.expect_revoke().times(0);

    let (cache, store) = create_cache(provider);
    store.put_raw(&serde_json::to_string(&stale).unwrap());

    let current = cache.current().await.unwrap();
    assert_eq!(current, Some(fresh.clone()));

    // A second read sees the refreshed, still-valid credential
    assert_eq!(cache.current().await.unwrap(), Some(fresh));
}

#[tokio::test]
async fn unexpired_credential_is_returned_unchanged() {
    let valid = credential("valid", now() + Duration::seconds(1));

    let mut provider = MockProvider::new();
    provider.expect_refresh().times(0);

    let (cache, store) = create_cache(provider);
    store.put_raw(&serde_json::to_string(&valid).unwrap());
    let before = store.raw();

    assert_eq!(cache.current().await.unwrap(), Some(valid));
    assert_eq!(store.raw(), before);
}

#[tokio::test]
async fn sign_in_round_trips_through_current() {
    let issued = credential("issued", now() + Duration::hours(1))
        .with_extra("idToken", serde_json::json!("eyJhbGciOi"));

    let mut provider = MockProvider::new();
    let returned = issued.clone();
    provider
        .expect_authorize()
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let (cache, store) = create_cache(provider);

    let signed_in = cache.sign_in().await.unwrap();
    assert_eq!(signed_in, issued);

    let stored: Credential = serde_json::from_str(&store.raw().unwrap()).unwrap();
    assert_eq!(stored, issued);
    assert_eq!(cache.current().await.unwrap(), Some(issued));
}

#[tokio::test]
async fn sign_out_clears_session() {
    let session = credential("session", now() + Duration::hours(1));

    let mut provider = MockProvider::new();
    provider
        .expect_revoke()
        .times(1)
        .withf(|_, request| request.token == "session" && request.is_client_id_provided)
        .returning(|_, _| Ok(()));

    let (cache, store) = create_cache(provider);
    store.put_raw(&serde_json::to_string(&session).unwrap());

    cache.sign_out(&session).await.unwrap();
    assert!(cache.current().await.unwrap().is_none());
}

#[tokio::test]
async fn failed_revoke_leaves_store_unchanged() {
    let session = credential("session", now() + Duration::hours(1));

    let mut provider = MockProvider::new();
    provider
        .expect_revoke()
        .times(1)
        .returning(|_, _| Err(ProviderError::new("Network request failed")));

    let (cache, store) = create_cache(provider);
    store.put_raw(&serde_json::to_string(&session).unwrap());
    let before = store.raw();

    let err = cache.sign_out(&session).await.unwrap_err();
    assert!(matches!(err, AuthError::Provider(_)));
    assert_eq!(store.raw(), before);
}

#[tokio::test]
async fn empty_store_returns_none_without_provider_call() {
    let mut provider = MockProvider::new();
    provider.expect_authorize().times(0);
    provider.expect_refresh().times(0);
    provider.expect_revoke().times(0);

    let (cache, _store) = create_cache(provider);
    assert!(cache.current().await.unwrap().is_none());
}

#[tokio::test]
async fn stored_blob_with_millisecond_expiry_is_read() {
    let mut provider = MockProvider::new();
    provider.expect_refresh().times(0);

    let (cache, store) = create_cache(provider);
    let expires_ms = (now() + Duration::minutes(10)).timestamp_millis();
    store.put_raw(&format!(
        r#"{{"accessToken":"legacy","refreshToken":"legacy-refresh","accessTokenExpirationDate":{},"tokenType":"Bearer"}}"#,
        expires_ms
    ));

    let current = cache.current().await.unwrap().unwrap();
    assert_eq!(current.access_token, "legacy");
    assert_eq!(
        current.access_token_expiration_date.map(|at| at.timestamp_millis()),
        Some(expires_ms)
    );
    assert_eq!(current.extra["tokenType"], "Bearer");
}

#[tokio::test]
async fn corrupted_blob_is_dropped() {
    let mut provider = MockProvider::new();
    provider.expect_refresh().times(0);

    let (cache, store) = create_cache(provider);
    store.put_raw("null-ish garbage");

    let err = cache.current().await.unwrap_err();
    assert!(matches!(err, AuthError::CredentialCorrupted { .. }));
    assert!(store.raw().is_none());
    assert!(cache.current().await.unwrap().is_none());
}

#[tokio::test]
async fn missing_expiration_never_refreshes() {
    let mut provider = MockProvider::new();
    provider.expect_refresh().times(0);

    let (cache, store) = create_cache(provider);
    store.put_raw(r#"{"accessToken":"forever","refreshToken":"r"}"#);

    let current = cache.current().await.unwrap().unwrap();
    assert_eq!(current.access_token, "forever");
    assert!(current.access_token_expiration_date.is_none());
}

async fn read_with_expiration(expiration: &str) -> (Option<Credential>, Option<String>) {
    let mut provider = MockProvider::new();
    provider.expect_refresh().times(0);

    let (cache, store) = create_cache(provider);
    store.put_raw(&format!(
        r#"{{"accessToken":"a","refreshToken":"r","accessTokenExpirationDate":"{}"}}"#,
        expiration
    ));

    let current = cache.current().await.unwrap();
    (current, store.raw())
}

#[tokio::test]
async fn date_only_expiration_is_kept() {
    let (current, stored) = read_with_expiration("2099-05-09").await;
    let current = current.unwrap();
    assert_eq!(
        current.access_token_expiration_date,
        Some(Utc.with_ymd_and_hms(2099, 5, 9, 0, 0, 0).unwrap())
    );
    assert!(stored.is_some());
}

#[tokio::test]
async fn offsetless_expiration_is_kept() {
    let (current, stored) = read_with_expiration("2099-05-09T20:35:09").await;
    assert_eq!(
        current.unwrap().access_token_expiration_date,
        Some(Utc.with_ymd_and_hms(2099, 5, 9, 20, 35, 9).unwrap())
    );
    assert!(stored.is_some());
}

#[tokio::test]
async fn compact_offset_expiration_is_kept() {
    let (current, stored) = read_with_expiration("2099-05-09T20:35:09.000+0000").await;
    assert_eq!(
        current.unwrap().access_token_expiration_date,
        Some(Utc.with_ymd_and_hms(2099, 5, 9, 20, 35, 9).unwrap())
    );
    assert!(stored.is_some());
}

#[tokio::test]
async fn unreadable_expiration_is_kept_and_never_refreshed() {
    let (current, stored) = read_with_expiration("sometime soon").await;
    let current = current.unwrap();
    assert_eq!(current.access_token, "a");
    assert!(current.access_token_expiration_date.is_none());
    assert!(stored.unwrap().contains("sometime soon"));
}
