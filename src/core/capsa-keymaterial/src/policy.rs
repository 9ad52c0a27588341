//! Handling of key material that refuses to be destroyed.
//!
//! Whether a pre-shared key that cannot be erased should abort an encryption
//! workflow is a deployment decision, so it is expressed as configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::KeyMaterialError;
use crate::material::EncryptionKeyMaterial;

/// What to do when key material cannot be destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestroyPolicy {
    /// Log a warning and carry on (default).
    Lenient,
    /// Return the error so the caller aborts.
    Strict,
}

impl Default for DestroyPolicy {
    fn default() -> Self {
        Self::Lenient
    }
}

impl std::fmt::Display for DestroyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for DestroyPolicy {
    type Err = KeyMaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(KeyMaterialError::InvalidPolicy(s.to_string())),
        }
    }
}

impl EncryptionKeyMaterial {
    /// Destroys this key material, applying `policy` to destruction failures.
    ///
    /// Under [`DestroyPolicy::Lenient`] a
    /// [`KeyMaterialError::DestructionFailed`] is logged and swallowed.
    pub fn destroy_with_policy(&mut self, policy: DestroyPolicy) -> Result<(), KeyMaterialError> {
        match self.destroy() {
            Err(KeyMaterialError::DestructionFailed { label, reason })
                if policy == DestroyPolicy::Lenient =>
            {
                warn!(
                    label = %label,
                    origin = %self.key_origin(),
                    reason = %reason,
                    "Key material could not be destroyed"
                );
                Ok(())
            },
            result => result,
        }
    }
}

/// Destroys every key material in `materials`.
///
/// Each element is attempted even if an earlier one fails; the first error is
/// returned.
pub fn destroy_all(
    materials: &mut [EncryptionKeyMaterial],
    policy: DestroyPolicy,
) -> Result<(), KeyMaterialError> {
    let mut first_error = None;

    for material in materials.iter_mut() {
        if let Err(e) = material.destroy_with_policy(policy) {
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
