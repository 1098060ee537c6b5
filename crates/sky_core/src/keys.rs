//! Key and signature value types
//!
//! `SecretKey` owns its bytes and wipes them on drop. `PublicKey` can only be
//! built from bytes that decode to a point on secp256k1, so holding one is
//! proof that it was verified.

use std::fmt;
use std::str::FromStr;

use secp256k1::SECP256K1;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::CryptoError;

/// Secret key length in bytes
pub const SECKEY_LENGTH: usize = 32;

/// Compressed public key length in bytes
pub const PUBKEY_LENGTH: usize = 33;

/// Recoverable signature length in bytes (r || s || recovery id)
pub const SIGNATURE_LENGTH: usize = 65;

/// A secp256k1 scalar in [1, n - 1], zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECKEY_LENGTH]);

// Constant time so comparing keys never branches on their contents
impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for SecretKey {}

impl SecretKey {
    /// Build a secret key from raw bytes, rejecting zero and values >= n
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = SecpSecret::from_slice(bytes)?;
        Ok(Self(key.secret_bytes()))
    }

    /// Build a secret key from hex text
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = zeroize::Zeroizing::new([0u8; SECKEY_LENGTH]);
        crate::encoding::hex_to_buf(hex_str, &mut bytes[..])?;
        Self::from_bytes(&bytes[..])
    }

    pub fn as_bytes(&self) -> &[u8; SECKEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The public key for this scalar
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        let key = self.to_secp()?;
        let public = secp256k1::PublicKey::from_secret_key(SECP256K1, &key);
        Ok(PublicKey(public.serialize()))
    }

    pub(crate) fn to_secp(&self) -> Result<SecpSecret, CryptoError> {
        SecpSecret::from_slice(&self.0)
    }
}

/// A `secp256k1::SecretKey` copy that is overwritten when dropped.
///
/// The library type is `Copy` and never wipes itself, so every conversion out
/// of [`SecretKey`] goes through this guard.
pub(crate) struct SecpSecret(secp256k1::SecretKey);

impl SecpSecret {
    fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        secp256k1::SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSecretKey)
    }

    fn erase(&mut self) {
        self.0.non_secure_erase();
    }
}

impl std::ops::Deref for SecpSecret {
    type Target = secp256k1::SecretKey;

    fn deref(&self) -> &secp256k1::SecretKey {
        &self.0
    }
}

impl Drop for SecpSecret {
    fn drop(&mut self) {
        self.erase();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// A compressed secp256k1 point that has been checked to lie on the curve
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBKEY_LENGTH]);

impl PublicKey {
    /// Parse a 33-byte compressed point, rejecting anything not on the curve
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBKEY_LENGTH || (bytes[0] != 0x02 && bytes[0] != 0x03) {
            return Err(CryptoError::InvalidPublicKey);
        }
        let key = secp256k1::PublicKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(key.serialize()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = crate::encoding::hex_to_array::<PUBKEY_LENGTH>(hex_str)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn to_secp(&self) -> Result<secp256k1::PublicKey, CryptoError> {
        secp256k1::PublicKey::from_slice(&self.0).map_err(|_| CryptoError::InvalidPublicKey)
    }

    pub(crate) fn from_secp(key: &secp256k1::PublicKey) -> Self {
        Self(key.serialize())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(de::Error::custom)
    }
}

/// A secret key together with its public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn from_secret(secret: SecretKey) -> Result<Self, CryptoError> {
        let public = secret.public_key()?;
        Ok(Self { secret, public })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &self.secret)
            .field("public", &self.public)
            .finish()
    }
}

/// Recoverable ECDSA signature: r(32) || s(32) || recovery id(1)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Parse a 65-byte signature; only the layout is checked here
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidSignatureFormat)?;
        if array[64] > 3 {
            return Err(CryptoError::InvalidSignatureFormat);
        }
        Ok(Self(array))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = crate::encoding::hex_to_array::<SIGNATURE_LENGTH>(hex_str)?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_parts(compact: &[u8; 64], recovery_id: u8) -> Self {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(compact);
        bytes[64] = recovery_id;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[0..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    /// The 64-byte compact form without the recovery id
    pub fn compact(&self) -> &[u8] {
        &self.0[..64]
    }

    pub fn recovery_id(&self) -> u8 {
        self.0[64]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(de::Error::custom)
    }
}
