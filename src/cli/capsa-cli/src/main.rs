//! Capsa CLI - Inspect and destroy encryption key material.

use std::io::{self, BufRead, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use capsa_crypto::{KeyReference, PublicKeyAlgorithm, SymmetricKey};
use capsa_keymaterial::{DestroyPolicy, EncryptionKeyMaterial, Key};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "capsa")]
#[command(about = "Capsa CLI - Inspect and destroy encryption key material")]
#[command(version)]
struct Cli {
    /// What to do when key material cannot be destroyed (lenient, strict)
    #[arg(long, default_value = "lenient", env = "CAPSA_DESTROY_POLICY")]
    destroy_policy: DestroyPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build key material, describe it, then destroy it
    Describe {
        /// Label identifying the key material for the recipient
        #[arg(long)]
        label: String,

        /// Public key algorithm (ec, rsa), used with --public-key-file
        #[arg(long, default_value = "ec")]
        algorithm: PublicKeyAlgorithm,

        #[command(flatten)]
        source: KeySource,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct KeySource {
    /// Read the password from this environment variable
    #[arg(long)]
    password_env: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    password_stdin: bool,

    /// Pre-shared key as 64 hex characters
    #[arg(long)]
    secret_hex: Option<String>,

    /// Slot of a non-extractable pre-shared key held by a token
    #[arg(long)]
    key_ref: Option<String>,

    /// File containing a DER or SEC1 encoded public key
    #[arg(long)]
    public_key_file: Option<PathBuf>,
}

// ============================================================================
// Key Material Construction
// ============================================================================

/// Longest password line read from stdin without reallocating.
const PASSWORD_LINE_CAPACITY: usize = 1024;

fn read_password_line() -> Result<Zeroizing<Vec<u8>>> {
    // The read is bounded by the capacity so the buffer never reallocates
    // and leaves an unwiped copy behind.
    let mut line = Zeroizing::new(String::with_capacity(PASSWORD_LINE_CAPACITY));
    io::stdin()
        .lock()
        .take(PASSWORD_LINE_CAPACITY as u64)
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    if line.len() == PASSWORD_LINE_CAPACITY && !line.ends_with('\n') {
        bail!("Password read from stdin exceeds {} bytes", PASSWORD_LINE_CAPACITY - 1);
    }

    let password = line.trim_end_matches(['\r', '\n']);
    Ok(Zeroizing::new(password.as_bytes().to_vec()))
}

fn build_material(
    source: KeySource,
    algorithm: PublicKeyAlgorithm,
    label: String,
) -> Result<EncryptionKeyMaterial> {
    if let Some(var) = source.password_env {
        let password = std::env::var(&var)
            .with_context(|| format!("Environment variable {} is not set", var))?;
        let password = Zeroizing::new(password.into_bytes());
        return Ok(EncryptionKeyMaterial::from_password(password, label)?);
    }

    if source.password_stdin {
        let password = read_password_line()?;
        return Ok(EncryptionKeyMaterial::from_password(password, label)?);
    }

    if let Some(secret_hex) = source.secret_hex {
        let bytes = Zeroizing::new(hex::decode(secret_hex.trim()).context("Invalid hex key")?);
        let key = SymmetricKey::from_bytes(&bytes)?;
        return Ok(EncryptionKeyMaterial::from_secret(key, label)?);
    }

    if let Some(slot) = source.key_ref {
        let key = KeyReference::new(slot, "AES")?;
        return Ok(EncryptionKeyMaterial::from_secret(key, label)?);
    }

    if let Some(path) = source.public_key_file {
        let encoded = std::fs::read(&path)
            .with_context(|| format!("Failed to read public key file {}", path.display()))?;
        return Ok(EncryptionKeyMaterial::from_encoded_public_key(
            algorithm, encoded, label,
        )?);
    }

    bail!("No key source given")
}

fn describe_key(key: Option<Key<'_>>) -> String {
    match key {
        None => "none (derived from password)".to_string(),
        Some(Key::Public(pk)) => {
            format!("{} public key ({} bytes)", pk.algorithm(), pk.as_bytes().len())
        },
        Some(Key::Secret(sk)) => match sk.as_bytes() {
            Some(bytes) => format!("{} secret key ({} bytes)", sk.algorithm(), bytes.len()),
            None => format!("{} secret key (not extractable)", sk.algorithm()),
        },
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Describe {
            label,
            algorithm,
            source,
        } => {
            let mut material = build_material(source, algorithm, label)?;
            tracing::debug!(origin = %material.key_origin(), "Key material built");

            println!("Origin:    {}", material.key_origin());
            println!("Label:     {}", material.label());
            println!("Key:       {}", describe_key(material.key()));
            println!("Material:  {}", material);

            material
                .destroy_with_policy(cli.destroy_policy)
                .context("Failed to destroy key material")?;

            println!("Destroyed: {}", material.is_destroyed());
            tracing::debug!(
                destroyed = material.is_destroyed(),
                policy = %cli.destroy_policy,
                "Key material released"
            );
        },
    }

    Ok(())
}
