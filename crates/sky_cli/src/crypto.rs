//! Parsing of key material and digests given on the command line

use anyhow::{anyhow, Context, Result};
use clap::Args;
use sky_core::{hex_to_array, sha256, PublicKey, SecretKey, Signature};
use zeroize::Zeroizing;

#[derive(Args)]
pub struct SeedArgs {
    /// Seed as text
    #[arg(long, required_unless_present = "seed_hex", conflicts_with = "seed_hex")]
    pub seed: Option<String>,
    /// Seed as hex bytes
    #[arg(long)]
    pub seed_hex: Option<String>,
}

impl SeedArgs {
    pub fn bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        match (&self.seed, &self.seed_hex) {
            (Some(text), _) => Ok(Zeroizing::new(text.as_bytes().to_vec())),
            (None, Some(hex_seed)) => {
                let bytes = hex::decode(hex_seed).context("Seed is not valid hex")?;
                Ok(Zeroizing::new(bytes))
            }
            (None, None) => Err(anyhow!("A seed is required")),
        }
    }
}

#[derive(Args)]
pub struct DigestArgs {
    /// 32-byte digest (hex)
    #[arg(long, required_unless_present = "message", conflicts_with = "message")]
    pub digest: Option<String>,
    /// Text whose SHA-256 is used as the digest
    #[arg(long)]
    pub message: Option<String>,
}

impl DigestArgs {
    pub fn digest(&self) -> Result<[u8; 32]> {
        match (&self.digest, &self.message) {
            (Some(hex_digest), _) => parse_digest(hex_digest),
            (None, Some(message)) => Ok(sha256(message.as_bytes())),
            (None, None) => Err(anyhow!("A digest or message is required")),
        }
    }
}

pub fn parse_secret(hex_key: &str) -> Result<SecretKey> {
    SecretKey::from_hex(hex_key).context("Invalid secret key")
}

pub fn parse_pubkey(hex_key: &str) -> Result<PublicKey> {
    PublicKey::from_hex(hex_key).context("Invalid public key")
}

pub fn parse_digest(hex_digest: &str) -> Result<[u8; 32]> {
    hex_to_array(hex_digest).context("Digest must be 32 bytes of hex")
}

pub fn parse_signature(hex_sig: &str) -> Result<Signature> {
    Signature::from_hex(hex_sig).context("Invalid signature")
}

/// Split an `ADDRESS:COINS:HOURS` output argument
pub fn parse_output(text: &str) -> Result<(String, u64, u64)> {
    let mut parts = text.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(address), Some(coins), Some(hours), None) => {
            let coins = coins.parse().with_context(|| format!("Invalid coin amount '{}'", coins))?;
            let hours = hours.parse().with_context(|| format!("Invalid hour amount '{}'", hours))?;
            Ok((address.to_string(), coins, hours))
        }
        _ => Err(anyhow!("Output '{}' must look like ADDRESS:COINS:HOURS", text)),
    }
}
