//! Secret key types and the secure-erase capability.
//!
//! Keys that hold their bytes in process memory implement `Zeroize` and
//! `ZeroizeOnDrop`, and can additionally be destroyed explicitly through
//! [`Destroyable`]. Keys living outside the process (tokens, HSM slots) are
//! represented by [`KeyReference`] and refuse destruction.

use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Size of a symmetric key in bytes.
pub const KEY_SIZE: usize = 32;

/// Explicit secure-erase of sensitive material.
///
/// `destroy` is a one-way transition: once `is_destroyed` reports `true` it
/// never goes back to `false`.
pub trait Destroyable {
    /// Clears any secret material held by this value.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DestructionFailed`] if the value cannot erase
    /// its backing storage.
    fn destroy(&mut self) -> Result<(), CryptoError>;

    /// Returns true once the secret material has been cleared.
    fn is_destroyed(&self) -> bool;
}

/// A symmetric secret key usable as a pre-shared key.
pub trait SecretKey: Destroyable + std::fmt::Debug + Send + Sync {
    /// Name of the key algorithm (e.g. `"AES"`).
    fn algorithm(&self) -> &str;

    /// Returns the raw key bytes, or `None` if the key is not extractable
    /// or has been destroyed.
    fn as_bytes(&self) -> Option<&[u8]>;
}

/// A 256-bit symmetric key with automatic zeroization.
///
/// The key is wiped when dropped, and can be wiped earlier with
/// [`Destroyable::destroy`] or [`Zeroize::zeroize`]. Both mark it destroyed.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
    #[zeroize(skip)]
    destroyed: bool,
}

impl SymmetricKey {
    /// Generates a new random symmetric key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self {
            bytes,
            destroyed: false,
        }
    }

    /// Creates a symmetric key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);

        Ok(Self {
            bytes: key_bytes,
            destroyed: false,
        })
    }

    /// Returns the raw key bytes, or `None` once the key is destroyed.
    ///
    /// Use with caution - the returned slice is not zeroized automatically.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if self.destroyed {
            None
        } else {
            Some(&self.bytes)
        }
    }
}

impl Zeroize for SymmetricKey {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
        self.destroyed = true;
    }
}

impl Destroyable for SymmetricKey {
    fn destroy(&mut self) -> Result<(), CryptoError> {
        if !self.destroyed {
            self.zeroize();
        }
        Ok(())
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl SecretKey for SymmetricKey {
    fn algorithm(&self) -> &str {
        "AES"
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        SymmetricKey::as_bytes(self)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

/// A reference to a secret key held outside process memory.
///
/// Hardware tokens and HSMs expose keys by slot without ever releasing the
/// bytes, so there is nothing this process can erase: `destroy` always fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyReference {
    slot: String,
    algorithm: String,
}

impl KeyReference {
    /// Creates a reference to the key stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot or algorithm name is empty.
    pub fn new(slot: impl Into<String>, algorithm: impl Into<String>) -> Result<Self, CryptoError> {
        let slot = slot.into();
        let algorithm = algorithm.into();

        if slot.is_empty() {
            return Err(CryptoError::InvalidKey("key slot cannot be empty".into()));
        }
        if algorithm.is_empty() {
            return Err(CryptoError::InvalidKey(
                "key algorithm cannot be empty".into(),
            ));
        }

        Ok(Self { slot, algorithm })
    }

    /// Returns the slot identifier.
    pub fn slot(&self) -> &str {
        &self.slot
    }
}

impl Destroyable for KeyReference {
    fn destroy(&mut self) -> Result<(), CryptoError> {
        Err(CryptoError::DestructionFailed(format!(
            "key in slot '{}' is not extractable",
            self.slot
        )))
    }

    fn is_destroyed(&self) -> bool {
        false
    }
}

impl SecretKey for KeyReference {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        None
    }
}
