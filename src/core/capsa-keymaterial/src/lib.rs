//! # Capsa Key Material
//!
//! The material needed to supply or derive a recipient's encryption key.
//!
//! A recipient is described by one of three credential shapes:
//! - A public key (the recipient decrypts with the private key)
//! - A pre-shared secret key
//! - A password (the key is derived later by a KDF)
//!
//! All three are handled uniformly through [`EncryptionKeyMaterial`], while
//! [`EncryptionKeyOrigin`] tells the encryption layer which algorithm to use.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod material;
pub mod origin;
pub mod password;
pub mod policy;

pub use error::KeyMaterialError;
pub use material::{EncryptionKeyMaterial, Key, PublicKeyMaterial, SecretKeyMaterial};
pub use origin::EncryptionKeyOrigin;
pub use password::PasswordKeyMaterial;
pub use policy::{destroy_all, DestroyPolicy};
