//! Credential cache walkthrough
//!
//! Wires a `CredentialCache` to an in-memory SQLite store and a canned provider,
//! then signs in, reads the session back, forces a refresh and signs out.
//!
//! Run with:
//! ```bash
//! cargo run -p core-auth --example session_demo
//!
//! # JSON logs
//! cargo run -p core-auth --example session_demo -- json
//! ```

use async_trait::async_trait;
use bridge_desktop::SqliteStore;
use bridge_traits::time::LogLevel;
use chrono::{Duration, Utc};
use core_auth::{
    AuthConfig, AuthorizationProvider, Credential, CredentialCache, ProviderError,
    RevokeRequest, SessionPresenter, SocialLoginProvider, SocialLoginResult,
};
use core_runtime::config::CoreConfig;
use core_runtime::logging::{LogFormat, LoggingConfig};
use std::env;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::info;

/// Issues numbered tokens; the first one is already expired
struct CannedProvider {
    issued: AtomicU32,
}

impl CannedProvider {
    fn issue(&self, lifetime: Duration) -> Credential {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        Credential::new(
            format!("access-{}", n),
            Some(format!("refresh-{}", n)),
            Some(Utc::now() + lifetime),
        )
        .with_extra("tokenType", serde_json::json!("Bearer"))
    }
}

#[async_trait]
impl AuthorizationProvider for CannedProvider {
    async fn authorize(&self, _config: &AuthConfig) -> Result<Credential, ProviderError> {
        Ok(self.issue(Duration::seconds(-5)))
    }

    async fn refresh(
        &self,
        _config: &AuthConfig,
        refresh_token: &str,
    ) -> Result<Credential, ProviderError> {
        info!(refresh_token_len = refresh_token.len(), "Canned refresh");
        Ok(self.issue(Duration::hours(1)))
    }

    async fn revoke(
        &self,
        _config: &AuthConfig,
        _request: &RevokeRequest,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Social SDK stand-in that always reports a successful login
struct CannedSocialLogin;

#[async_trait]
impl SocialLoginProvider for CannedSocialLogin {
    async fn log_in(&self) -> Result<SocialLoginResult, ProviderError> {
        Ok(SocialLoginResult::from_payload(serde_json::json!({
            "type": "success",
            "user": { "name": "Demo User" },
        })))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let format = match env::args().nth(1).as_deref() {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };
    let core = CoreConfig::builder()
        .store(Arc::new(SqliteStore::in_memory().await?))
        .logging(
            LoggingConfig::default()
                .with_format(format)
                .with_level(LogLevel::Debug),
        )
        .build()
        .await?;
    core.init_logging()?;

    let config = AuthConfig::new(
        "https://accounts.google.com",
        "603386649315-example.apps.googleusercontent.com",
        ["openid", "profile"],
    )?;
    let provider = Arc::new(CannedProvider {
        issued: AtomicU32::new(0),
    });

    let cache = Arc::new(CredentialCache::from_core_config(&core, config, provider));
    let mut events = cache
        .event_bus()
        .map(|bus| bus.subscribe())
        .ok_or("event bus missing")?;
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(severity = ?event.severity(), "{}", event.description());
        }
    });

    let mut presenter =
        SessionPresenter::new(cache.clone()).with_social_login(Arc::new(CannedSocialLogin));
    presenter.load().await;
    info!(button = presenter.button_title(), "Initial state");

    // Sign in; the canned credential is already expired
    if let Some(alert) = presenter.toggle().await {
        info!(title = %alert.title, message = %alert.message, "Alert");
    }
    info!(summary = ?presenter.summary(), "After sign-in");

    // Reading again refreshes it
    presenter.load().await;
    info!(summary = ?presenter.summary(), "After reload");

    if let Some(alert) = presenter.toggle().await {
        info!(title = %alert.title, message = %alert.message, "Alert");
    }
    info!(button = presenter.button_title(), "After sign-out");

    if let Some(alert) = presenter.social_login().await {
        info!(title = %alert.title, message = %alert.message, "Alert");
    }

    Ok(())
}
