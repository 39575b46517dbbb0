//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready `PersistentStore` implementations
//! using desktop-appropriate libraries:
//! - `SqliteStore` using an SQLite-backed key-value table
//! - `KeyringSecureStore` using the `keyring` crate (OS keychain)
//!
//! ## Feature Flags
//!
//! - `secure-store`: Enable OS keychain integration (default)
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::SqliteStore;
//! use bridge_traits::PersistentStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SqliteStore::open(SqliteStore::default_path()?).await?;
//!
//!     // Use in core configuration
//! }
//! ```

mod sqlite_store;

#[cfg(feature = "secure-store")]
mod secure_store;

pub use sqlite_store::SqliteStore;

#[cfg(feature = "secure-store")]
pub use secure_store::KeyringSecureStore;
