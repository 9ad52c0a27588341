//! Recipient public keys.
//!
//! Public keys are carried in their standard encoded form and are not parsed
//! here; the encapsulation layer that consumes them owns the curve and modulus
//! arithmetic.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// DER `SEQUENCE` tag, the first byte of a SubjectPublicKeyInfo.
const DER_SEQUENCE: u8 = 0x30;

/// Leading bytes of a SEC1 encoded point (compressed even/odd, uncompressed).
const SEC1_PREFIXES: [u8; 3] = [0x02, 0x03, 0x04];

/// Supported public key algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicKeyAlgorithm {
    /// Elliptic curve key (ECDH key agreement).
    Ec,
    /// RSA key (RSA-OAEP key transport).
    Rsa,
}

impl std::fmt::Display for PublicKeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ec => write!(f, "ec"),
            Self::Rsa => write!(f, "rsa"),
        }
    }
}

impl FromStr for PublicKeyAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ec" => Ok(Self::Ec),
            "rsa" => Ok(Self::Rsa),
            _ => Err(CryptoError::InvalidInput(format!(
                "unknown public key algorithm: {}",
                s
            ))),
        }
    }
}

/// A recipient public key in encoded form.
///
/// EC keys may be a SEC1 point or a DER SubjectPublicKeyInfo; RSA keys must be
/// a DER SubjectPublicKeyInfo.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    algorithm: PublicKeyAlgorithm,
    encoded: Vec<u8>,
}

impl PublicKey {
    /// Creates a public key from its encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding is empty or does not start like a
    /// valid encoding for `algorithm`.
    pub fn new(
        algorithm: PublicKeyAlgorithm,
        encoded: impl Into<Vec<u8>>,
    ) -> Result<Self, CryptoError> {
        let encoded = encoded.into();

        let Some(&first) = encoded.first() else {
            return Err(CryptoError::InvalidKey("public key cannot be empty".into()));
        };

        let valid = match algorithm {
            PublicKeyAlgorithm::Ec => first == DER_SEQUENCE || SEC1_PREFIXES.contains(&first),
            PublicKeyAlgorithm::Rsa => first == DER_SEQUENCE,
        };
        if !valid {
            return Err(CryptoError::InvalidKey(format!(
                "unexpected leading byte 0x{:02x} for {} public key",
                first, algorithm
            )));
        }

        Ok(Self { algorithm, encoded })
    }

    /// Returns the key algorithm.
    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    /// Returns the encoded key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &self.algorithm)
            .field("len", &self.encoded.len())
            .finish()
    }
}
