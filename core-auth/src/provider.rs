//! Authorization provider contract.
//!
//! The OAuth/OpenID authorization-code exchange, PKCE and redirect handling live
//! in the host (native AppAuth, a system browser flow, ...). The core only sees
//! this trait.

use crate::config::AuthConfig;
use crate::types::Credential;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure reported by an [`AuthorizationProvider`].
///
/// The message is meant for the user and is shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Token revocation request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    /// Token to revoke
    pub token: String,
    /// Whether the client ID accompanies the request
    pub is_client_id_provided: bool,
}

impl RevokeRequest {
    /// Revoke an access token, sending the client ID along
    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            is_client_id_provided: true,
        }
    }
}

impl fmt::Debug for RevokeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevokeRequest")
            .field("token", &"[REDACTED]")
            .field("is_client_id_provided", &self.is_client_id_provided)
            .finish()
    }
}

/// External identity service performing authorization, refresh and revocation.
///
/// Implementations must not retry internally; the cache propagates failures to
/// the caller unchanged.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Run the interactive authorization flow and return the issued credential
    async fn authorize(&self, config: &AuthConfig) -> Result<Credential, ProviderError>;

    /// Exchange a refresh token for a new credential
    async fn refresh(
        &self,
        config: &AuthConfig,
        refresh_token: &str,
    ) -> Result<Credential, ProviderError>;

    /// Revoke a token at the identity provider
    async fn revoke(&self, config: &AuthConfig, request: &RevokeRequest)
        -> Result<(), ProviderError>;
}
