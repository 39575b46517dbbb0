//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the credential core and the
//! platform-specific code around it. Each trait represents a capability that the
//! core requires but that must be implemented differently per platform
//! (desktop, iOS, Android, web).
//!
//! ## Traits
//!
//! - [`PersistentStore`](storage::PersistentStore) - Durable key/value persistence
//!   (SQLite, Keychain/Keystore, AsyncStorage, localStorage)
//! - [`Clock`](time::Clock) - Time source for deterministic expiry checks
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ In Progress |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform-specific errors to `BridgeError` and
//! include actionable context (the key or path involved), never the stored value.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` on native targets so implementations can be
//! shared behind `Arc` across async tasks.
//!
//! ## Examples
//!
//! ### Implementing PersistentStore
//!
//! ```ignore
//! use bridge_traits::storage::PersistentStore;
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct AsyncStorageBridge { /* host handle */ }
//!
//! #[async_trait]
//! impl PersistentStore for AsyncStorageBridge {
//!     async fn get_item(&self, key: &str) -> Result<Option<String>> { todo!() }
//!     async fn set_item(&self, key: &str, value: &str) -> Result<()> { todo!() }
//!     async fn remove_item(&self, key: &str) -> Result<()> { todo!() }
//! }
//! ```

pub mod error;
pub mod platform;
pub mod storage;
pub mod time;

pub use error::BridgeError;

pub use storage::PersistentStore;
pub use time::{Clock, LogLevel, SystemClock};
