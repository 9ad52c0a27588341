//! Password key material.

use std::hash::{Hash, Hasher};

use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::error::KeyMaterialError;
use crate::material::validate_label;
use crate::origin::EncryptionKeyOrigin;

/// Key material built from a password.
///
/// No key exists yet: the recipient derives it with a KDF from the password
/// and a salt agreed under the same label. The password buffer is owned by
/// this value, wiped by [`destroy`](Self::destroy) and again on drop.
///
/// Equality and hashing compare the password content and label, so two
/// instances built from the same password are interchangeable in tests.
/// `Debug` never prints the password.
pub struct PasswordKeyMaterial {
    password: Zeroizing<Vec<u8>>,
    label: String,
    destroyed: bool,
}

impl PasswordKeyMaterial {
    /// Creates password key material, taking ownership of the password buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the password or the label is empty.
    pub fn new(
        password: impl Into<Zeroizing<Vec<u8>>>,
        label: impl Into<String>,
    ) -> Result<Self, KeyMaterialError> {
        let password = password.into();
        let label = label.into();

        validate_label(&label)?;
        if password.is_empty() {
            return Err(KeyMaterialError::InvalidPassword(
                "password cannot be empty".into(),
            ));
        }

        Ok(Self {
            password,
            label,
            destroyed: false,
        })
    }

    /// Returns the password bytes to run through the KDF.
    ///
    /// Empty once the material has been destroyed.
    #[inline]
    pub fn password(&self) -> &[u8] {
        self.password.as_slice()
    }

    /// Returns the password as text, if it is valid UTF-8.
    pub fn password_str(&self) -> Option<&str> {
        std::str::from_utf8(self.password()).ok()
    }

    /// Returns the key label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Always [`EncryptionKeyOrigin::FromPassword`].
    pub fn key_origin(&self) -> EncryptionKeyOrigin {
        EncryptionKeyOrigin::FromPassword
    }

    /// Zeroes the password buffer in place. Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        self.password.zeroize();
        self.destroyed = true;

        debug!(label = %self.label, "Password key material destroyed");
    }

    /// Returns true once the password buffer has been cleared.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl PartialEq for PasswordKeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.password() == other.password() && self.label == other.label
    }
}

impl Eq for PasswordKeyMaterial {}

impl Hash for PasswordKeyMaterial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.password().hash(state);
        self.label.hash(state);
    }
}

impl std::fmt::Debug for PasswordKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordKeyMaterial")
            .field("password", &"[REDACTED]")
            .field("label", &self.label)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
