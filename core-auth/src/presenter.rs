//! Session presentation state.
//!
//! [`SessionPresenter`] owns the credential a screen is currently showing and
//! turns cache failures into [`Alert`] values. It never renders anything; the
//! host decides how to display alerts and the summary text.

use crate::cache::CredentialCache;
use crate::error::AuthError;
use crate::provider::ProviderError;
use crate::social::{SocialLoginProvider, SocialLoginResult};
use crate::types::{AuthState, Credential};
use std::sync::Arc;
use tracing::{debug, info, warn};

const ERROR_TITLE: &str = "Error";
const REVOKE_FAILED_TITLE: &str = "Sign out failed";
const SOCIAL_SUCCESS_TITLE: &str = "Logged in!";

/// A message the host should surface to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn error(err: &AuthError) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            message: err.to_string(),
        }
    }

    fn revoke_failed(err: &AuthError) -> Self {
        Self {
            title: REVOKE_FAILED_TITLE.to_string(),
            message: format!("Failed to revoke token: {}", err),
        }
    }

    fn social_failed(err: &ProviderError) -> Self {
        Self {
            title: format!("Error! {}", err),
            message: String::new(),
        }
    }
}

/// Sign-in/sign-out toggle backed by a [`CredentialCache`].
pub struct SessionPresenter {
    cache: Arc<CredentialCache>,
    social: Option<Arc<dyn SocialLoginProvider>>,
    credential: Option<Credential>,
}

impl SessionPresenter {
    pub fn new(cache: Arc<CredentialCache>) -> Self {
        Self {
            cache,
            social: None,
            credential: None,
        }
    }

    /// Enable [`social_login`](Self::social_login)
    pub fn with_social_login(mut self, social: Arc<dyn SocialLoginProvider>) -> Self {
        self.social = Some(social);
        self
    }

    /// Load the cached credential, refreshing it if it has expired.
    ///
    /// On failure nothing is shown and the error comes back as an alert.
    pub async fn load(&mut self) -> Option<Alert> {
        match self.cache.current().await {
            Ok(credential) => {
                debug!(signed_in = credential.is_some(), "Session loaded");
                self.credential = credential;
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to load session");
                self.credential = None;
                Some(Alert::error(&e))
            }
        }
    }

    /// Sign out when a credential is shown, sign in otherwise.
    ///
    /// Signing out always clears the shown credential. When the revoke or the
    /// local delete fails the stored credential stays in place and the next
    /// [`load`](Self::load) shows it again.
    pub async fn toggle(&mut self) -> Option<Alert> {
        match self.credential.take() {
            Some(credential) => match self.cache.sign_out(&credential).await {
                Ok(()) => None,
                Err(e) if e.is_provider_error() => Some(Alert::revoke_failed(&e)),
                Err(e) => Some(Alert::error(&e)),
            },
            None => match self.cache.sign_in().await {
                Ok(credential) => {
                    self.credential = Some(credential);
                    None
                }
                Err(e) => Some(Alert::error(&e)),
            },
        }
    }

    /// Run the social login flow and report its outcome.
    ///
    /// Success alerts with the result payload as JSON, a cancel is silent and
    /// a failure alerts with the provider message. The cached session is not
    /// touched.
    pub async fn social_login(&self) -> Option<Alert> {
        let Some(social) = &self.social else {
            return Some(Alert::social_failed(&ProviderError::new(
                "Social login is not configured",
            )));
        };

        match social.log_in().await {
            Ok(SocialLoginResult::Success(payload)) => {
                info!("Social login succeeded");
                Some(Alert {
                    title: SOCIAL_SUCCESS_TITLE.to_string(),
                    message: payload.to_string(),
                })
            }
            Ok(SocialLoginResult::Cancel) => {
                debug!("Social login cancelled");
                None
            }
            Err(e) => {
                warn!(error = %e, "Social login failed");
                Some(Alert::social_failed(&e))
            }
        }
    }

    pub fn state(&self) -> AuthState {
        if self.credential.is_some() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        }
    }

    pub fn button_title(&self) -> &'static str {
        if self.state().is_authenticated() {
            "Sign out"
        } else {
            "Sign in"
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// The shown credential rendered as JSON, as stored
    pub fn summary(&self) -> Option<String> {
        let credential = self.credential.as_ref()?;
        serde_json::to_string(credential).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        credential_expiring_at, test_config, FixedClock, MemoryStore, MockProvider,
        MockSocialLogin,
    };
    use crate::token_store::CredentialStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn presenter(provider: MockProvider, store: Arc<MemoryStore>) -> SessionPresenter {
        let cache = CredentialCache::new(test_config(), Arc::new(provider), store)
            .with_clock(Arc::new(FixedClock(now())));
        SessionPresenter::new(Arc::new(cache))
    }

    #[tokio::test]
    async fn test_initial_state_is_signed_out() {
        let mut presenter = presenter(MockProvider::new(), Arc::new(MemoryStore::new()));
        assert!(presenter.load().await.is_none());
        assert_eq!(presenter.state(), AuthState::SignedOut);
        assert_eq!(presenter.button_title(), "Sign in");
        assert!(presenter.summary().is_none());
    }

    #[tokio::test]
    async fn test_toggle_signs_in() {
        let issued = credential_expiring_at("issued", now() + Duration::hours(1));
        let mut provider = MockProvider::new();
        let returned = issued.clone();
        provider
            .expect_authorize()
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let mut presenter = presenter(provider, Arc::new(MemoryStore::new()));
        assert!(presenter.toggle().await.is_none());

        assert_eq!(presenter.state(), AuthState::SignedIn);
        assert_eq!(presenter.button_title(), "Sign out");
        assert_eq!(presenter.credential(), Some(&issued));

        let summary = presenter.summary().unwrap();
        assert!(summary.contains(r#""accessToken":"issued""#));
    }

    #[tokio::test]
    async fn test_sign_in_failure_alerts_with_message() {
        let mut provider = MockProvider::new();
        provider
            .expect_authorize()
            .returning(|_| Err(ProviderError::new("User cancelled flow")));

        let mut presenter = presenter(provider, Arc::new(MemoryStore::new()));
        let alert = presenter.toggle().await.unwrap();

        assert_eq!(alert.message, "User cancelled flow");
        assert_eq!(presenter.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_toggle_signs_out() {
        let credential = credential_expiring_at("access", now() + Duration::hours(1));
        let store = Arc::new(MemoryStore::new());
        CredentialStore::new(store.clone())
            .store(&credential)
            .await
            .unwrap();

        let mut provider = MockProvider::new();
        provider.expect_revoke().times(1).returning(|_, _| Ok(()));

        let mut presenter = presenter(provider, store);
        presenter.load().await;
        assert_eq!(presenter.state(), AuthState::SignedIn);

        assert!(presenter.toggle().await.is_none());
        assert_eq!(presenter.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_revoke_failure_alerts_and_shows_signed_out() {
        let credential = credential_expiring_at("access", now() + Duration::hours(1));
        let store = Arc::new(MemoryStore::new());
        let credentials = CredentialStore::new(store.clone());
        credentials.store(&credential).await.unwrap();

        let mut provider = MockProvider::new();
        provider
            .expect_revoke()
            .times(1)
            .returning(|_, _| Err(ProviderError::new("Network request failed")));

        let mut presenter = presenter(provider, store);
        presenter.load().await;

        let alert = presenter.toggle().await.unwrap();
        assert_eq!(alert.message, "Failed to revoke token: Network request failed");
        assert_eq!(presenter.state(), AuthState::SignedOut);
        assert_eq!(presenter.button_title(), "Sign in");

        // The stored credential survives and comes back on the next load
        assert_eq!(credentials.retrieve().await.unwrap(), Some(credential.clone()));
        presenter.load().await;
        assert_eq!(presenter.credential(), Some(&credential));
    }

    #[tokio::test]
    async fn test_delete_failure_after_revoke_shows_signed_out() {
        let credential = credential_expiring_at("access", now() + Duration::hours(1));
        let store = Arc::new(MemoryStore::new());
        let credentials = CredentialStore::new(store.clone());
        credentials.store(&credential).await.unwrap();

        let mut provider = MockProvider::new();
        provider.expect_revoke().times(1).returning(|_, _| Ok(()));

        let mut presenter = presenter(provider, store.clone());
        presenter.load().await;
        store.fail_writes(true);

        let alert = presenter.toggle().await.unwrap();
        assert!(alert.message.contains("disk full"));
        assert_eq!(presenter.state(), AuthState::SignedOut);
        assert_eq!(credentials.retrieve().await.unwrap(), Some(credential));
    }

    fn with_social(social: MockSocialLogin) -> SessionPresenter {
        presenter(MockProvider::new(), Arc::new(MemoryStore::new()))
            .with_social_login(Arc::new(social))
    }

    #[tokio::test]
    async fn test_social_login_success_alerts_with_payload() {
        let payload = serde_json::json!({ "type": "success", "accessToken": "social" });
        let mut social = MockSocialLogin::new();
        let returned = payload.clone();
        social
            .expect_log_in()
            .times(1)
            .returning(move || Ok(SocialLoginResult::Success(returned.clone())));

        let presenter = with_social(social);
        let alert = presenter.social_login().await.unwrap();

        assert_eq!(alert.title, "Logged in!");
        let shown: serde_json::Value = serde_json::from_str(&alert.message).unwrap();
        assert_eq!(shown, payload);
        assert_eq!(presenter.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_social_login_cancel_is_silent() {
        let mut social = MockSocialLogin::new();
        social
            .expect_log_in()
            .times(1)
            .returning(|| Ok(SocialLoginResult::Cancel));

        assert!(with_social(social).social_login().await.is_none());
    }

    #[tokio::test]
    async fn test_social_login_error_alerts() {
        let mut social = MockSocialLogin::new();
        social
            .expect_log_in()
            .returning(|| Err(ProviderError::new("Play services missing")));

        let alert = with_social(social).social_login().await.unwrap();
        assert_eq!(alert.title, "Error! Play services missing");
    }

    #[tokio::test]
    async fn test_social_login_unconfigured() {
        let presenter = presenter(MockProvider::new(), Arc::new(MemoryStore::new()));
        let alert = presenter.social_login().await.unwrap();
        assert!(alert.title.starts_with("Error! "));
    }

    #[tokio::test]
    async fn test_load_refresh_failure_clears_session() {
        let stale = credential_expiring_at("stale", now() - Duration::minutes(1));
        let store = Arc::new(MemoryStore::new());
        CredentialStore::new(store.clone())
            .store(&stale)
            .await
            .unwrap();

        let mut provider = MockProvider::new();
        provider
            .expect_refresh()
            .times(1)
            .returning(|_, _| Err(ProviderError::new("invalid_grant")));

        let mut presenter = presenter(provider, store);
        let alert = presenter.load().await.unwrap();

        assert_eq!(alert.message, "invalid_grant");
        assert_eq!(presenter.state(), AuthState::SignedOut);
    }
}
