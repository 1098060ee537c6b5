//! Digest primitives shared by every other module

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::derivation::derive_keypair;
use crate::ecdh::ecdh_point;
use crate::errors::CryptoError;

/// Size of a SHA-256 digest
pub const SHA256_DIGEST_LENGTH: usize = 32;

/// Size of a RIPEMD-160 digest
pub const RIPEMD160_DIGEST_LENGTH: usize = 20;

/// SHA-256 of `data`
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `msg1 || msg2` without building the concatenation
pub fn add_sha256(msg1: &[u8], msg2: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(msg1);
    hasher.update(msg2);
    hasher.finalize().into()
}

/// RIPEMD-160 of `data`
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Seed hash salted with a curve multiplication.
///
/// Computes `sha256(h || ecdh(sk, pk))` where `h = sha256(seed)`, `sk` is
/// the key derived from `h` and `pk` is the public key derived from
/// `sha256(h)`. Knowing one link of a key chain therefore does not reveal
/// the next seed without a point multiplication by a secret scalar.
pub fn secp256k1_hash(seed: &[u8]) -> Result<[u8; 32], CryptoError> {
    let hash = Zeroizing::new(sha256(seed));
    let secret = derive_keypair(&hash[..])?.secret;
    let rehashed = Zeroizing::new(sha256(&hash[..]));
    let public = derive_keypair(&rehashed[..])?.public;

    let point = ecdh_point(&secret, &public)?;
    Ok(add_sha256(&hash[..], &point[..]))
}
