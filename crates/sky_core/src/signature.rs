//! Recoverable ECDSA over secp256k1
//!
//! Nonces come from RFC 6979, so signing never touches a random number
//! generator and a given (key, digest) pair always yields the same bytes.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1};

use crate::errors::CryptoError;
use crate::keys::{PublicKey, SecretKey, Signature};
use crate::traits::SignatureEngine;

/// secp256k1 ECDSA engine backed by libsecp256k1
#[derive(Debug, Default, Clone, Copy)]
pub struct EcdsaEngine;

impl SignatureEngine for EcdsaEngine {
    fn sign(&self, secret: &SecretKey, digest: &[u8; 32]) -> Result<Signature, CryptoError> {
        let message = to_message(digest)?;
        let key = secret.to_secp()?;

        let recoverable = SECP256K1.sign_ecdsa_recoverable(&message, &key);
        let (recovery_id, compact) = recoverable.serialize_compact();

        if is_zero(&compact[..32]) || is_zero(&compact[32..]) {
            return Err(CryptoError::DegenerateSignature);
        }

        let recovery_id = u8::try_from(recovery_id.to_i32()).map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Signature::from_parts(&compact, recovery_id))
    }

    fn recover(&self, digest: &[u8; 32], signature: &Signature) -> Result<PublicKey, CryptoError> {
        let message = to_message(digest)?;
        let recoverable = to_recoverable(signature)?;

        let key = SECP256K1
            .recover_ecdsa(&message, &recoverable)
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(PublicKey::from_secp(&key))
    }

    fn verify(
        &self,
        public: &PublicKey,
        digest: &[u8; 32],
        signature: &Signature,
    ) -> Result<(), CryptoError> {
        let recovered = self.recover(digest, signature)?;
        if recovered != *public {
            return Err(CryptoError::InvalidSignature);
        }

        let message = to_message(digest)?;
        let standard = to_recoverable(signature)?.to_standard();
        SECP256K1
            .verify_ecdsa(&message, &standard, &public.to_secp()?)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

fn to_message(digest: &[u8; 32]) -> Result<Message, CryptoError> {
    Message::from_slice(digest).map_err(|_| CryptoError::InvalidDigest(digest.len()))
}

fn to_recoverable(signature: &Signature) -> Result<RecoverableSignature, CryptoError> {
    let recovery_id = RecoveryId::from_i32(i32::from(signature.recovery_id()))
        .map_err(|_| CryptoError::InvalidSignatureFormat)?;
    RecoverableSignature::from_compact(signature.compact(), recovery_id)
        .map_err(|_| CryptoError::InvalidSignatureFormat)
}

fn is_zero(bytes: &[u8]) -> bool {
    bytes.iter().fold(0u8, |acc, b| acc | b) == 0
}

/// Convert a digest slice into the fixed 32-byte form the engine signs
pub fn digest_from_slice(digest: &[u8]) -> Result<[u8; 32], CryptoError> {
    digest
        .try_into()
        .map_err(|_| CryptoError::InvalidDigest(digest.len()))
}

/// Sign a 32-byte digest, returning r || s || recovery id.
///
/// `DegenerateSignature` is returned if r or s is zero; callers retry with a
/// perturbed digest.
pub fn sign(secret: &SecretKey, digest: &[u8; 32]) -> Result<Signature, CryptoError> {
    EcdsaEngine.sign(secret, digest)
}

/// Recover the signer's public key
pub fn recover(digest: &[u8; 32], signature: &Signature) -> Result<PublicKey, CryptoError> {
    EcdsaEngine.recover(digest, signature)
}

/// Verify a signature against an expected public key
pub fn verify_signature(
    public: &PublicKey,
    digest: &[u8; 32],
    signature: &Signature,
) -> Result<(), CryptoError> {
    EcdsaEngine.verify(public, digest, signature)
}

/// Whether `pub_key` is a 33-byte compressed point on secp256k1.
///
/// False for a wrong length, a prefix other than 0x02/0x03, an x coordinate
/// with no curve point, or the all-zero buffer.
pub fn verify_pub_key(pub_key: &[u8]) -> bool {
    PublicKey::from_bytes(pub_key).is_ok()
}
