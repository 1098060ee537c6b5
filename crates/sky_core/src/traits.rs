//! Core traits for the Skycoin crypto core

use crate::errors::CryptoError;
use crate::keys::{PublicKey, SecretKey, Signature};

/// Trait for recoverable signatures over pre-hashed 32-byte digests
pub trait SignatureEngine {
    /// Sign a digest; the same key and digest always give the same signature
    fn sign(&self, secret: &SecretKey, digest: &[u8; 32]) -> Result<Signature, CryptoError>;

    /// Reconstruct the signer's public key from a digest and signature
    fn recover(&self, digest: &[u8; 32], signature: &Signature) -> Result<PublicKey, CryptoError>;

    /// Check that `signature` over `digest` was made by `public`
    fn verify(
        &self,
        public: &PublicKey,
        digest: &[u8; 32],
        signature: &Signature,
    ) -> Result<(), CryptoError>;
}
