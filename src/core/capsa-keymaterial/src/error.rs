//! Key material error types.

use thiserror::Error;

/// Errors that can occur when building or destroying key material.
#[derive(Debug, Error)]
pub enum KeyMaterialError {
    /// Invalid key label.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Invalid password.
    #[error("invalid password: {0}")]
    InvalidPassword(String),

    /// Unknown key origin.
    #[error("unknown key origin: {0}")]
    InvalidOrigin(String),

    /// Unknown destroy policy.
    #[error("unknown destroy policy: {0}")]
    InvalidPolicy(String),

    /// The underlying key could not be destroyed.
    #[error("failed to destroy key material '{label}': {reason}")]
    DestructionFailed {
        /// Label of the key material.
        label: String,
        /// Reason reported by the key.
        reason: String,
    },

    /// Cryptographic error.
    #[error("crypto error: {0}")]
    Crypto(#[from] capsa_crypto::CryptoError),
}
