//! # Authentication Module
//!
//! Persisted credential cache with expiry-triggered refresh.
//!
//! ## Overview
//!
//! The [`CredentialCache`] sits between an external [`AuthorizationProvider`]
//! (the OS-level OAuth/OpenID flow) and a host [`PersistentStore`]. It keeps at
//! most one [`Credential`] per storage key, refreshes it when the access token
//! has expired, and clears it after a successful revoke.
//!
//! ## Features
//!
//! - Sign-in delegated to the provider, result persisted as JSON
//! - Strict expiry check against an injectable clock, refresh on read
//! - Best-effort revoke that leaves the stored credential intact on failure
//! - Auth state events on the runtime event bus
//! - A presentation layer ([`SessionPresenter`]) that turns typed errors into alerts
//! - Optional one-shot social login whose result is only reported, never cached
//!
//! [`PersistentStore`]: bridge_traits::PersistentStore

pub mod cache;
pub mod config;
pub mod error;
pub mod presenter;
pub mod provider;
pub mod social;
pub mod token_store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::CredentialCache;
pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use presenter::{Alert, SessionPresenter};
pub use provider::{AuthorizationProvider, ProviderError, RevokeRequest};
pub use social::{SocialLoginProvider, SocialLoginResult};
pub use token_store::CredentialStore;
pub use types::{AuthState, Credential};
