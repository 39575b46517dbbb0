//! # Logging & Tracing Infrastructure
//!
//! Configures structured logging with the `tracing` crate, supporting:
//! - JSON, pretty-print and compact output formats
//! - Module-level filtering through `EnvFilter`
//! - Span contexts around credential operations
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use bridge_traits::LogLevel;
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_level(LogLevel::Debug);
//!
//! init_logging(config).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```
//!
//! Tokens are never passed to `tracing` macros by the workspace crates; spans
//! skip credential arguments explicitly.

use crate::error::{Error, Result};
use bridge_traits::LogLevel;
use std::io;
use tracing_subscriber::{
    filter::EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Crates whose level follows [`LoggingConfig::level`] in the default filter.
const WORKSPACE_TARGETS: &[&str] = &[
    "authkit_workspace",
    "core_runtime",
    "core_auth",
    "bridge_traits",
    "bridge_desktop",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_auth=debug,sqlx=warn")
    pub filter: Option<String>,
    /// Enable span contexts
    pub enable_spans: bool,
    /// Display target module in logs
    pub display_target: bool,
    /// Display thread info
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Enable or disable span contexts
    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    /// Enable or disable target display
    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// Enable or disable thread info
    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the logging system
///
/// This should be called once during application startup. Subsequent calls
/// return an error.
///
/// # Errors
///
/// Returns `Error::Logging` if:
/// - Logging is already initialized
/// - The filter string is invalid
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_span_events(span_events(&config))
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(config.enable_spans)
                    .with_span_list(config.enable_spans)
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Logging(format!("subscriber already installed: {}", e)))
}

fn span_events(config: &LoggingConfig) -> FmtSpan {
    if config.enable_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    }
}

/// Default filter: workspace crates at the configured level, dependencies at warn
fn default_filter_string(level: LogLevel) -> String {
    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("sqlx=warn".to_string());
    directives.push("warn".to_string());
    directives.join(",")
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = config
        .filter
        .clone()
        .unwrap_or_else(|| default_filter_string(config.level));

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Logging(format!("invalid filter: {}", e)))
}
