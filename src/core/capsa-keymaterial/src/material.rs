//! Encryption key material.
//!
//! [`EncryptionKeyMaterial`] is what a caller hands to the encryption layer
//! for each recipient. It is built by one of three factories, each pinning the
//! origin tag to the credential shape it was given:
//!
//! | Factory | Holds | `key()` | Origin |
//! |---|---|---|---|
//! | [`from_public_key`](EncryptionKeyMaterial::from_public_key) | public key | the public key | `FromPublicKey` |
//! | [`from_secret`](EncryptionKeyMaterial::from_secret) | pre-shared secret key | the secret key | `FromSecret` |
//! | [`from_password`](EncryptionKeyMaterial::from_password) | password bytes | `None` | `FromPassword` |
//!
//! Secret material is released explicitly with
//! [`destroy`](EncryptionKeyMaterial::destroy). The transition to destroyed is
//! one-way; accessors stay callable afterwards.

use capsa_crypto::{CryptoError, PublicKey, PublicKeyAlgorithm, SecretKey};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::KeyMaterialError;
use crate::origin::EncryptionKeyOrigin;
use crate::password::PasswordKeyMaterial;

/// Rejects labels that cannot identify key material. Labels are otherwise
/// stored verbatim.
pub(crate) fn validate_label(label: &str) -> Result<(), KeyMaterialError> {
    if label.is_empty() {
        return Err(KeyMaterialError::InvalidLabel("label cannot be empty".into()));
    }
    Ok(())
}

/// A borrowed view of the key held by key material.
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    /// Recipient public key.
    Public(&'a PublicKey),
    /// Pre-shared secret key.
    Secret(&'a dyn SecretKey),
}

impl<'a> Key<'a> {
    /// Returns the public key, if this is one.
    pub fn as_public(&self) -> Option<&'a PublicKey> {
        match self {
            Key::Public(key) => Some(*key),
            Key::Secret(_) => None,
        }
    }

    /// Returns the secret key, if this is one.
    pub fn as_secret(&self) -> Option<&'a dyn SecretKey> {
        match self {
            Key::Public(_) => None,
            Key::Secret(key) => Some(*key),
        }
    }
}

/// Key material wrapping a recipient public key.
#[derive(Debug)]
pub struct PublicKeyMaterial {
    public_key: PublicKey,
    label: String,
}

impl PublicKeyMaterial {
    /// Returns the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the key label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Key material wrapping a pre-shared secret key.
///
/// Destruction is delegated to the key itself.
#[derive(Debug)]
pub struct SecretKeyMaterial {
    secret_key: Box<dyn SecretKey>,
    label: String,
}

impl SecretKeyMaterial {
    /// Returns the secret key.
    pub fn secret_key(&self) -> &dyn SecretKey {
        self.secret_key.as_ref()
    }

    /// Returns the key label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The material needed to supply or derive a recipient's encryption key.
#[derive(Debug)]
pub enum EncryptionKeyMaterial {
    /// Built from a recipient public key.
    PublicKey(PublicKeyMaterial),
    /// Built from a pre-shared secret key.
    PreSharedSecret(SecretKeyMaterial),
    /// Built from a password.
    Password(PasswordKeyMaterial),
}

impl EncryptionKeyMaterial {
    /// Creates key material from a recipient public key.
    ///
    /// The recipient needs the matching private key to decrypt.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is empty.
    pub fn from_public_key(
        public_key: PublicKey,
        label: impl Into<String>,
    ) -> Result<Self, KeyMaterialError> {
        let label = label.into();
        validate_label(&label)?;

        Ok(Self::PublicKey(PublicKeyMaterial { public_key, label }))
    }

    /// Creates key material from an encoded recipient public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding is not a valid `algorithm` key or the
    /// label is empty.
    pub fn from_encoded_public_key(
        algorithm: PublicKeyAlgorithm,
        encoded: impl Into<Vec<u8>>,
        label: impl Into<String>,
    ) -> Result<Self, KeyMaterialError> {
        let public_key = PublicKey::new(algorithm, encoded)?;
        Self::from_public_key(public_key, label)
    }

    /// Creates key material from a pre-shared secret key.
    ///
    /// The recipient must hold the same secret under the same label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is empty.
    pub fn from_secret(
        secret_key: impl SecretKey + 'static,
        label: impl Into<String>,
    ) -> Result<Self, KeyMaterialError> {
        let label = label.into();
        validate_label(&label)?;

        Ok(Self::PreSharedSecret(SecretKeyMaterial {
            secret_key: Box::new(secret_key),
            label,
        }))
    }

    /// Creates key material from a password, taking ownership of the buffer.
    ///
    /// The recipient must know the same password; the salt travels with the
    /// encrypted document under the same label.
    ///
    /// # Errors
    ///
    /// Returns an error if the password or the label is empty.
    pub fn from_password(
        password: impl Into<Zeroizing<Vec<u8>>>,
        label: impl Into<String>,
    ) -> Result<Self, KeyMaterialError> {
        PasswordKeyMaterial::new(password, label).map(Self::Password)
    }

    /// Returns the key, if one already exists.
    ///
    /// Password material has no key until the KDF runs, so it returns `None`.
    pub fn key(&self) -> Option<Key<'_>> {
        match self {
            Self::PublicKey(m) => Some(Key::Public(&m.public_key)),
            Self::PreSharedSecret(m) => Some(Key::Secret(m.secret_key.as_ref())),
            Self::Password(_) => None,
        }
    }

    /// Returns the label identifying this key material.
    pub fn label(&self) -> &str {
        match self {
            Self::PublicKey(m) => &m.label,
            Self::PreSharedSecret(m) => &m.label,
            Self::Password(m) => m.label(),
        }
    }

    /// Returns the origin tag used to pick the encryption algorithm.
    pub fn key_origin(&self) -> EncryptionKeyOrigin {
        match self {
            Self::PublicKey(_) => EncryptionKeyOrigin::FromPublicKey,
            Self::PreSharedSecret(_) => EncryptionKeyOrigin::FromSecret,
            Self::Password(_) => EncryptionKeyOrigin::FromPassword,
        }
    }

    /// Returns the password material, if this was built from a password.
    pub fn as_password(&self) -> Option<&PasswordKeyMaterial> {
        match self {
            Self::Password(m) => Some(m),
            _ => None,
        }
    }

    /// Erases secret material owned by this value.
    ///
    /// - Public key: nothing to erase, always succeeds.
    /// - Pre-shared secret: delegates to the key's own `destroy`.
    /// - Password: zeroes the password buffer; repeated calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMaterialError::DestructionFailed`] if a pre-shared key
    /// refuses to be destroyed. The material stays live in that case.
    pub fn destroy(&mut self) -> Result<(), KeyMaterialError> {
        match self {
            Self::PublicKey(_) => Ok(()),
            Self::PreSharedSecret(m) => {
                m.secret_key
                    .destroy()
                    .map_err(|e| KeyMaterialError::DestructionFailed {
                        label: m.label.clone(),
                        reason: match e {
                            CryptoError::DestructionFailed(reason) => reason,
                            other => other.to_string(),
                        },
                    })?;
                debug!(label = %m.label, "Pre-shared key material destroyed");
                Ok(())
            },
            Self::Password(m) => {
                m.destroy();
                Ok(())
            },
        }
    }

    /// Returns true once secret material has been erased.
    ///
    /// Public key material holds no secret and always reports `false`.
    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::PublicKey(_) => false,
            Self::PreSharedSecret(m) => m.secret_key.is_destroyed(),
            Self::Password(m) => m.is_destroyed(),
        }
    }
}

impl From<PasswordKeyMaterial> for EncryptionKeyMaterial {
    fn from(material: PasswordKeyMaterial) -> Self {
        Self::Password(material)
    }
}

impl std::fmt::Display for EncryptionKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} key material '{}'", self.key_origin(), self.label())
    }
}
