use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors raised while wiring the runtime.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// A required host capability was neither injected nor available by default
    #[error("Missing capability {capability}: {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Persistent store unavailable: {0}")]
    Store(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, Error>;
