use thiserror::Error;

/// Failures reported by host store and clock implementations.
///
/// Messages carry the key or path involved, never a stored value.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The capability does not exist on this host
    #[error("Store not available on this host: {0}")]
    NotAvailable(String),

    #[error("Store operation failed: {0}")]
    OperationFailed(String),

    #[error("Store database error: {0}")]
    Database(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
