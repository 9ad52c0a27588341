//! # Capsa Crypto
//!
//! Key primitives for Capsa document encryption.
//!
//! This crate provides the key objects that encryption key material wraps:
//! - Symmetric pre-shared keys with explicit secure erase
//! - References to non-extractable keys held by tokens or HSMs
//! - Recipient public keys (EC and RSA) in encoded form
//! - Secure random key generation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod public;

pub use error::CryptoError;
pub use keys::{Destroyable, KeyReference, SecretKey, SymmetricKey, KEY_SIZE};
pub use public::{PublicKey, PublicKeyAlgorithm};
