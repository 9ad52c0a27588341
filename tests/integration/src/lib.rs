//! Integration tests for Capsa key material.
//!
//! These tests drive key material the way a document encryption layer does:
//! pick a key encryption scheme from the origin, pull the key or password,
//! then destroy everything once all recipients are processed.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use anyhow::{bail, Context, Result};
use capsa_crypto::PublicKeyAlgorithm;
use capsa_keymaterial::{EncryptionKeyMaterial, EncryptionKeyOrigin, Key};
use serde::Serialize;

// ============================================================================
// Recipient Planning
// ============================================================================

/// Key encryption scheme chosen for a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KekScheme {
    /// ECDH against the recipient's EC public key.
    KeyAgreement,
    /// Key transport to the recipient's RSA public key.
    KeyTransport,
    /// KEK derived from a pre-shared secret.
    SecretDerivation,
    /// KEK derived from a password and salt.
    PasswordDerivation,
}

/// What the encryption layer extracted for one recipient.
#[derive(Debug, Serialize)]
pub struct RecipientPlan {
    pub label: String,
    pub origin: EncryptionKeyOrigin,
    pub scheme: KekScheme,
    /// Length of the key or password fed into the scheme.
    #[serde(skip)]
    pub input_len: usize,
}

/// Chooses the key encryption scheme for `material`.
pub fn plan_recipient(material: &EncryptionKeyMaterial) -> Result<RecipientPlan> {
    if material.is_destroyed() {
        bail!("key material '{}' has been destroyed", material.label());
    }

    let (scheme, input_len) = match (material.key_origin(), material.key()) {
        (EncryptionKeyOrigin::FromPublicKey, Some(Key::Public(pk))) => {
            let scheme = match pk.algorithm() {
                PublicKeyAlgorithm::Ec => KekScheme::KeyAgreement,
                PublicKeyAlgorithm::Rsa => KekScheme::KeyTransport,
            };
            (scheme, pk.as_bytes().len())
        },
        (EncryptionKeyOrigin::FromSecret, Some(Key::Secret(sk))) => {
            let bytes = sk
                .as_bytes()
                .context("pre-shared key is not extractable")?;
            (KekScheme::SecretDerivation, bytes.len())
        },
        (EncryptionKeyOrigin::FromPassword, None) => {
            let password = material
                .as_password()
                .context("password origin without password material")?;
            (KekScheme::PasswordDerivation, password.password().len())
        },
        (origin, _) => bail!("key does not match origin {}", origin),
    };

    Ok(RecipientPlan {
        label: material.label().to_string(),
        origin: material.key_origin(),
        scheme,
        input_len,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use capsa_crypto::{KeyReference, PublicKey, SymmetricKey, KEY_SIZE};
    use capsa_keymaterial::{destroy_all, DestroyPolicy, KeyMaterialError};

    fn ec_public_key() -> PublicKey {
        let mut point = vec![0x04u8];
        point.extend_from_slice(&[0x22; 96]);
        PublicKey::new(PublicKeyAlgorithm::Ec, point).unwrap()
    }

    #[test]
    fn test_scenario_public_key() {
        let pk = ec_public_key();
        let mut material = EncryptionKeyMaterial::from_public_key(pk.clone(), "alice").unwrap();

        assert_eq!(material.key_origin(), EncryptionKeyOrigin::FromPublicKey);
        assert_eq!(material.key().and_then(|k| k.as_public()), Some(&pk));

        let plan = plan_recipient(&material).unwrap();
        assert_eq!(plan.scheme, KekScheme::KeyAgreement);
        assert_eq!(plan.input_len, 97);

        material.destroy().unwrap();
        material.destroy().unwrap();
        assert!(!material.is_destroyed());

        // Nothing secret was held, so the recipient is still usable.
        assert!(plan_recipient(&material).is_ok());
    }

    #[test]
    fn test_scenario_destroyable_secret() {
        let sk = SymmetricKey::from_bytes(&[0x07u8; KEY_SIZE]).unwrap();
        let mut material = EncryptionKeyMaterial::from_secret(sk, "shared-1").unwrap();

        assert!(!material.is_destroyed());
        let plan = plan_recipient(&material).unwrap();
        assert_eq!(plan.scheme, KekScheme::SecretDerivation);
        assert_eq!(plan.input_len, KEY_SIZE);

        material.destroy().unwrap();

        assert!(material.is_destroyed());
        let key = material.key().and_then(|k| k.as_secret()).unwrap();
        assert!(key.is_destroyed());
        assert!(key.as_bytes().is_none());
        assert!(plan_recipient(&material).is_err());
    }

    #[test]
    fn test_scenario_non_destroyable_secret() {
        let sk = KeyReference::new("token-slot-2", "AES").unwrap();
        let mut material = EncryptionKeyMaterial::from_secret(sk, "shared-2").unwrap();

        let result = material.destroy();

        assert!(matches!(
            result,
            Err(KeyMaterialError::DestructionFailed { .. })
        ));
        assert!(!material.is_destroyed());

        // The key never leaves the token, so there are no bytes to plan with.
        let err = plan_recipient(&material).unwrap_err();
        assert!(err.to_string().contains("not extractable"));
    }

    #[test]
    fn test_scenario_password() {
        let password: Vec<u8> = vec![b's', b'3', b'c', b'r', b'e', b't'];
        let mut material = EncryptionKeyMaterial::from_password(password, "pw-1").unwrap();

        assert_eq!(material.key_origin(), EncryptionKeyOrigin::FromPassword);
        assert!(material.key().is_none());

        let plan = plan_recipient(&material).unwrap();
        assert_eq!(plan.scheme, KekScheme::PasswordDerivation);
        assert_eq!(plan.input_len, 6);

        material.destroy().unwrap();
        assert!(material.is_destroyed());
        assert!(material.as_password().unwrap().password().is_empty());

        material.destroy().unwrap();
        assert!(material.is_destroyed());
    }

    #[test]
    fn test_plan_serializes_origin() {
        let material = EncryptionKeyMaterial::from_password(b"s3cret".to_vec(), "pw-1").unwrap();

        let plan = plan_recipient(&material).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["label"], "pw-1");
        assert_eq!(json["origin"], "from-password");
        assert_eq!(json["scheme"], "password-derivation");
        assert!(!json.to_string().contains("s3cret"));
    }

    #[test]
    fn test_multi_recipient_workflow() -> Result<()> {
        let mut recipients = vec![
            EncryptionKeyMaterial::from_public_key(ec_public_key(), "alice")?,
            EncryptionKeyMaterial::from_encoded_public_key(
                PublicKeyAlgorithm::Rsa,
                vec![0x30u8, 0x82, 0x01, 0x0a],
                "bob",
            )?,
            EncryptionKeyMaterial::from_secret(SymmetricKey::generate(), "shared-1")?,
            EncryptionKeyMaterial::from_password(b"hunter2".to_vec(), "pw-1")?,
        ];

        let plans = recipients
            .iter()
            .map(plan_recipient)
            .collect::<Result<Vec<_>>>()?;
        let schemes: Vec<KekScheme> = plans.iter().map(|p| p.scheme).collect();
        assert_eq!(
            schemes,
            vec![
                KekScheme::KeyAgreement,
                KekScheme::KeyTransport,
                KekScheme::SecretDerivation,
                KekScheme::PasswordDerivation,
            ]
        );

        destroy_all(&mut recipients, DestroyPolicy::Strict)?;

        assert!(recipients[2].is_destroyed());
        assert!(recipients[3].is_destroyed());
        Ok(())
    }

    #[test]
    fn test_strict_workflow_aborts_on_token_key() {
        let mut recipients = vec![
            EncryptionKeyMaterial::from_secret(KeyReference::new("slot-9", "AES").unwrap(), "hsm")
                .unwrap(),
            EncryptionKeyMaterial::from_password(b"hunter2".to_vec(), "pw-1").unwrap(),
        ];

        assert!(destroy_all(&mut recipients, DestroyPolicy::Strict).is_err());
        assert!(recipients[1].is_destroyed());

        assert!(destroy_all(&mut recipients, DestroyPolicy::Lenient).is_ok());
    }
}
