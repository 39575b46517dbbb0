//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the credential core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Auth event bus
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that `core-auth` depends on. It
//! establishes the logging conventions, dependency wiring and event
//! broadcasting used throughout the workspace.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
