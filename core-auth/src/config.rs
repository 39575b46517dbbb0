//! Identity provider configuration.
//!
//! The issuer, client ID and scope list are fixed for the lifetime of a
//! [`CredentialCache`](crate::CredentialCache) and passed at construction.

use crate::error::{AuthError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// OAuth 2.0 / OpenID Connect client configuration.
///
/// Instances are always validated: construction through [`AuthConfig::new`] and
/// deserialization both reject an invalid issuer, an empty client ID or an empty
/// scope list.
///
/// # Examples
///
/// ```
/// use core_auth::AuthConfig;
///
/// let config = AuthConfig::new(
///     "https://accounts.google.com",
///     "603386649315-example.apps.googleusercontent.com",
///     ["openid", "profile"],
/// )
/// .unwrap();
///
/// assert_eq!(config.scope_string(), "openid profile");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAuthConfig")]
pub struct AuthConfig {
    issuer: String,
    client_id: String,
    scopes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthConfig {
    issuer: String,
    client_id: String,
    #[serde(default)]
    scopes: Vec<String>,
}

impl TryFrom<RawAuthConfig> for AuthConfig {
    type Error = AuthError;

    fn try_from(raw: RawAuthConfig) -> Result<Self> {
        AuthConfig::new(raw.issuer, raw.client_id, raw.scopes)
    }
}

impl AuthConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if:
    /// - `issuer` is not an absolute `http`/`https` URL
    /// - `client_id` is blank
    /// - `scopes` is empty or contains a blank entry
    pub fn new<I, S>(issuer: impl Into<String>, client_id: impl Into<String>, scopes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = Self {
            issuer: issuer.into(),
            client_id: client_id.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    ///
    /// ```
    /// use core_auth::AuthConfig;
    ///
    /// let config = AuthConfig::from_json(
    ///     r#"{"issuer":"https://accounts.google.com","clientId":"abc","scopes":["openid"]}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.client_id(), "abc");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AuthError::InvalidConfig(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let issuer = Url::parse(&self.issuer)
            .map_err(|e| AuthError::InvalidConfig(format!("issuer '{}': {}", self.issuer, e)))?;
        if !matches!(issuer.scheme(), "http" | "https") {
            return Err(AuthError::InvalidConfig(format!(
                "issuer '{}' must use http or https",
                self.issuer
            )));
        }

        if self.client_id.trim().is_empty() {
            return Err(AuthError::InvalidConfig(
                "client ID must not be empty".to_string(),
            ));
        }

        if self.scopes.is_empty() {
            return Err(AuthError::InvalidConfig(
                "at least one scope is required".to_string(),
            ));
        }
        if self.scopes.iter().any(|scope| scope.trim().is_empty()) {
            return Err(AuthError::InvalidConfig(
                "scopes must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Identity provider endpoint, e.g. `https://accounts.google.com`
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// OAuth client ID
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Requested scopes
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Scopes joined the way they travel on the wire
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}
