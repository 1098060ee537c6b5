//! Deterministic key derivation from seeds
//!
//! A single derivation hashes the seed into a scalar. The iterator form also
//! returns the seed for the next step, so a whole chain of receiving keys can
//! be rebuilt from the master seed alone.

use zeroize::Zeroizing;

use crate::errors::CryptoError;
use crate::hash::{add_sha256, secp256k1_hash, sha256};
use crate::keys::{KeyPair, PublicKey, SecretKey};

/// Longest seed accepted by the derivation functions
pub const MAX_SEED_LENGTH: usize = 224;

/// Upper bound on rehashing a digest that is not a valid scalar. Each retry
/// fails with probability below 2^-127, so the bound is never reached.
const MAX_SCALAR_ATTEMPTS: usize = 256;

fn check_seed(seed: &[u8]) -> Result<(), CryptoError> {
    if seed.is_empty() || seed.len() > MAX_SEED_LENGTH {
        return Err(CryptoError::InvalidSeed {
            len: seed.len(),
            max: MAX_SEED_LENGTH,
        });
    }
    Ok(())
}

/// Derive one key pair from `seed`.
///
/// The secret key is `sha256(seed)`, rehashed until it lands in [1, n - 1].
pub fn derive_keypair(seed: &[u8]) -> Result<KeyPair, CryptoError> {
    check_seed(seed)?;

    let mut candidate = Zeroizing::new(sha256(seed));
    for _ in 0..MAX_SCALAR_ATTEMPTS {
        if let Ok(secret) = SecretKey::from_bytes(&candidate[..]) {
            return KeyPair::from_secret(secret);
        }
        tracing::trace!("seed digest is not a valid scalar, rehashing");
        *candidate = sha256(&candidate[..]);
    }
    Err(CryptoError::InvalidSecretKey)
}

/// Derive the key pair at `seed` and the seed of the next chain position.
///
/// `next = secp256k1_hash(seed)` and the key pair comes from
/// `derive_keypair(sha256(seed || next))`. Feeding `next` back in walks the
/// chain one step.
pub fn derive_keypair_iterator(
    seed: &[u8],
) -> Result<(Zeroizing<[u8; 32]>, KeyPair), CryptoError> {
    check_seed(seed)?;

    let next_seed = Zeroizing::new(secp256k1_hash(seed)?);
    let key_seed = Zeroizing::new(add_sha256(seed, &next_seed[..]));
    let keypair = derive_keypair(&key_seed[..])?;
    Ok((next_seed, keypair))
}

/// Public key for a secret key
pub fn pubkey_from_seckey(secret: &SecretKey) -> Result<PublicKey, CryptoError> {
    secret.public_key()
}

/// Walks the deterministic key chain of a master seed.
///
/// Only the current chain position is held; it is wiped when the chain is
/// dropped.
pub struct KeyChain {
    seed: Zeroizing<Vec<u8>>,
    position: u64,
}

impl KeyChain {
    pub fn new(master_seed: &[u8]) -> Result<Self, CryptoError> {
        check_seed(master_seed)?;
        Ok(Self {
            seed: Zeroizing::new(master_seed.to_vec()),
            position: 0,
        })
    }

    /// Number of key pairs produced so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Seed that will produce the next key pair
    pub fn current_seed(&self) -> &[u8] {
        &self.seed
    }

    pub fn next_keypair(&mut self) -> Result<KeyPair, CryptoError> {
        let (next_seed, keypair) = derive_keypair_iterator(&self.seed)?;
        self.seed = Zeroizing::new(next_seed.to_vec());
        self.position += 1;
        tracing::debug!(position = self.position, pubkey = %keypair.public, "derived chain key");
        Ok(keypair)
    }
}

impl Iterator for KeyChain {
    type Item = Result<KeyPair, CryptoError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_keypair())
    }
}

/// The first `count` key pairs of the chain rooted at `master_seed`
pub fn generate_keypairs(master_seed: &[u8], count: usize) -> Result<Vec<KeyPair>, CryptoError> {
    KeyChain::new(master_seed)?.take(count).collect()
}
