//! Social login contract.
//!
//! A one-shot login through a platform social SDK (e.g. Google sign-in). The
//! result is only shown to the user; it is not persisted and does not affect
//! the cached credential.

use crate::provider::ProviderError;
use async_trait::async_trait;
use serde_json::Value;

/// Outcome of a social login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SocialLoginResult {
    /// The user signed in; carries the SDK's full result payload
    Success(Value),
    /// The user dismissed the flow
    Cancel,
}

impl SocialLoginResult {
    /// Interpret an SDK payload by its `type` field.
    ///
    /// Only `"success"` counts as a login; every other type is a cancel.
    pub fn from_payload(payload: Value) -> Self {
        match payload.get("type").and_then(Value::as_str) {
            Some("success") => Self::Success(payload),
            _ => Self::Cancel,
        }
    }
}

#[async_trait]
pub trait SocialLoginProvider: Send + Sync {
    /// Run the social login flow
    async fn log_in(&self) -> Result<SocialLoginResult, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_payload() {
        let payload = json!({ "type": "success", "accessToken": "a", "user": { "name": "Ada" } });
        assert_eq!(
            SocialLoginResult::from_payload(payload.clone()),
            SocialLoginResult::Success(payload)
        );
    }

    #[test]
    fn test_other_types_are_cancel() {
        assert_eq!(
            SocialLoginResult::from_payload(json!({ "type": "cancel" })),
            SocialLoginResult::Cancel
        );
        assert_eq!(
            SocialLoginResult::from_payload(json!({ "type": "dismiss" })),
            SocialLoginResult::Cancel
        );
        assert_eq!(SocialLoginResult::from_payload(json!({})), SocialLoginResult::Cancel);
    }
}
