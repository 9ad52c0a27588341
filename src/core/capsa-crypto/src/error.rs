//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur when creating or handling keys.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key format or size.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Invalid input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The key refused or could not perform a secure erase.
    #[error("key destruction failed: {0}")]
    DestructionFailed(String),
}
