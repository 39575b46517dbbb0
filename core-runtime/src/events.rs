//! # Event Bus System
//!
//! Broadcast channel for authentication lifecycle events.
//!
//! ## Overview
//!
//! The credential cache publishes an [`AuthEvent`] for every state transition
//! (sign-in, refresh, sign-out, failures). Presentation layers and diagnostics
//! subscribe without the cache knowing about them. Emitting with no subscribers
//! is not an error for callers; `emit` reports it and callers ignore it.
//!
//! ### Subscribing to Events
//!
//! ```rust
//! use core_runtime::events::{EventBus, AuthEvent};
//! use tokio::sync::broadcast::error::RecvError;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(16);
//! let mut stream = event_bus.subscribe();
//!
//! tokio::spawn(async move {
//!     loop {
//!         match stream.recv().await {
//!             Ok(event) => println!("Received: {}", event.description()),
//!             Err(RecvError::Lagged(n)) => eprintln!("Missed {} events", n),
//!             Err(RecvError::Closed) => break,
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! Slow subscribers receive `Lagged` errors but never block the publisher.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

/// Events related to the cached credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Authorization flow handed to the provider.
    SigningIn {
        /// Issuer being authenticated against.
        issuer: String,
    },
    /// Sign-in completed and the credential was persisted.
    SignedIn {
        /// Issuer that granted the credential.
        issuer: String,
        /// Expiration of the new access token (Unix epoch seconds), if known.
        expires_at: Option<i64>,
    },
    /// Access token is being refreshed.
    TokenRefreshing {
        /// Storage key of the credential being refreshed.
        storage_key: String,
    },
    /// Refresh completed and the new credential was persisted.
    TokenRefreshed {
        /// Storage key of the refreshed credential.
        storage_key: String,
        /// Expiration of the new access token (Unix epoch seconds), if known.
        expires_at: Option<i64>,
    },
    /// Token revoked and the stored credential removed.
    SignedOut {
        /// Storage key that was cleared.
        storage_key: String,
    },
    /// An operation failed.
    AuthError {
        /// Human-readable error message.
        message: String,
        /// Whether the session is still usable (e.g. a failed revoke).
        recoverable: bool,
    },
}

impl AuthEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            AuthEvent::SigningIn { .. } => "Authentication in progress",
            AuthEvent::SignedIn { .. } => "User signed in successfully",
            AuthEvent::TokenRefreshing { .. } => "Refreshing access token",
            AuthEvent::TokenRefreshed { .. } => "Token refreshed successfully",
            AuthEvent::SignedOut { .. } => "User signed out",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            AuthEvent::AuthError {
                recoverable: false, ..
            } => EventSeverity::Error,
            AuthEvent::AuthError {
                recoverable: true, ..
            } => EventSeverity::Warning,
            AuthEvent::SignedIn { .. } | AuthEvent::SignedOut { .. } => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Broadcast event bus for auth events.
///
/// Cloning the bus shares the underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AuthEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are no active subscribers.
    pub fn emit(&self, event: AuthEvent) -> Result<usize, SendError<AuthEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}
