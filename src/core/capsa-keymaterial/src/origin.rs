//! Key origin tags.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyMaterialError;

/// Identifies which credential shape a piece of key material was built from.
///
/// The encryption layer uses this to pick the key encryption algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionKeyOrigin {
    /// Recipient public key (key agreement or key transport).
    FromPublicKey,
    /// Pre-shared symmetric secret.
    FromSecret,
    /// Password, to be run through a KDF.
    FromPassword,
}

impl std::fmt::Display for EncryptionKeyOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FromPublicKey => write!(f, "from-public-key"),
            Self::FromSecret => write!(f, "from-secret"),
            Self::FromPassword => write!(f, "from-password"),
        }
    }
}

impl FromStr for EncryptionKeyOrigin {
    type Err = KeyMaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from-public-key" => Ok(Self::FromPublicKey),
            "from-secret" => Ok(Self::FromSecret),
            "from-password" => Ok(Self::FromPassword),
            _ => Err(KeyMaterialError::InvalidOrigin(s.to_string())),
        }
    }
}
