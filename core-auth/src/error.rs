use crate::provider::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Failure reported by the authorization provider, message passed through unchanged
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No refresh token available for the stored credential")]
    NoRefreshToken,

    #[error("Stored credential under '{key}' is corrupted: {reason}")]
    CredentialCorrupted { key: String, reason: String },

    #[error("Secure storage unavailable: {0}")]
    SecureStorageUnavailable(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Invalid auth configuration: {0}")]
    InvalidConfig(String),
}

impl AuthError {
    /// Whether the error came from the authorization provider
    pub fn is_provider_error(&self) -> bool {
        matches!(self, AuthError::Provider(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
