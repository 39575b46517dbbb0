//! Time and Logging Abstractions
//!
//! Provides an injectable time source for deterministic expiry checks and the
//! log level shared by the logging configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::platform::PlatformSendSync;

/// Time source trait
///
/// Abstracts system time so expiry decisions can be tested deterministically.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::time::Clock;
///
/// fn log_timestamp(clock: &dyn Clock) {
///     let now = clock.now();
///     println!("Current time: {}", now);
/// }
/// ```
pub trait Clock: PlatformSendSync {
    /// Get current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Get current Unix timestamp in seconds
    fn unix_timestamp(&self) -> i64 {
        self.now().timestamp()
    }

    /// Get current Unix timestamp in milliseconds
    fn unix_timestamp_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// System clock implementation using actual system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing` filters
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
