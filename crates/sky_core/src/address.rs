//! Skycoin address derivation
//!
//! An address is `base58(key || version || checksum)` where
//! `key = ripemd160(sha256(sha256(pubkey)))` and the checksum is the first
//! four bytes of `sha256(key || version)`.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{AddressError, CryptoError};
use crate::hash::{add_sha256, ripemd160, sha256};
use crate::keys::PublicKey;

/// Version byte of standard addresses
pub const ADDRESS_VERSION: u8 = 0;

/// Length of the address checksum suffix
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Length of the address identifier
pub const ADDRESS_KEY_LENGTH: usize = 20;

/// Length of the binary address: key + version + checksum
pub const ADDRESS_BYTES_LENGTH: usize = ADDRESS_KEY_LENGTH + 1 + ADDRESS_CHECKSUM_LENGTH;

/// Longest base58 text a 25-byte address can encode to
pub const MAX_ADDRESS_LENGTH: usize = 35;

/// The 20-byte identifier of a public key
pub fn address_hash(pubkey: &PublicKey) -> [u8; ADDRESS_KEY_LENGTH] {
    let once = sha256(pubkey.as_bytes());
    let twice = sha256(&once);
    ripemd160(&twice)
}

/// Decoded address: version plus 20-byte identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub version: u8,
    pub key: [u8; ADDRESS_KEY_LENGTH],
}

impl Address {
    pub fn from_pubkey(pubkey: &PublicKey) -> Self {
        Self {
            version: ADDRESS_VERSION,
            key: address_hash(pubkey),
        }
    }

    /// First four bytes of `sha256(key || version)`
    pub fn checksum(&self) -> [u8; ADDRESS_CHECKSUM_LENGTH] {
        let digest = add_sha256(&self.key, &[self.version]);
        let mut checksum = [0u8; ADDRESS_CHECKSUM_LENGTH];
        checksum.copy_from_slice(&digest[..ADDRESS_CHECKSUM_LENGTH]);
        checksum
    }

    /// Binary form `key || version || checksum`
    pub fn to_bytes(&self) -> [u8; ADDRESS_BYTES_LENGTH] {
        let mut bytes = [0u8; ADDRESS_BYTES_LENGTH];
        bytes[..ADDRESS_KEY_LENGTH].copy_from_slice(&self.key);
        bytes[ADDRESS_KEY_LENGTH] = self.version;
        bytes[ADDRESS_KEY_LENGTH + 1..].copy_from_slice(&self.checksum());
        bytes
    }

    /// Parse the binary form, checking version and checksum
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_BYTES_LENGTH {
            return Err(AddressError::InvalidLength(bytes.len()));
        }

        let mut key = [0u8; ADDRESS_KEY_LENGTH];
        key.copy_from_slice(&bytes[..ADDRESS_KEY_LENGTH]);
        let address = Self {
            version: bytes[ADDRESS_KEY_LENGTH],
            key,
        };

        if address.version != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(address.version));
        }
        if address.checksum()[..] != bytes[ADDRESS_KEY_LENGTH + 1..] {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(address)
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    pub fn from_base58(text: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(text)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base58(&text).map_err(de::Error::custom)
    }
}

/// Base58 address text for a public key
pub fn address_from_pubkey(pubkey: &PublicKey) -> String {
    Address::from_pubkey(pubkey).to_base58()
}

/// Write the address of `pubkey` into `buf`, returning the number of bytes
/// used. `buf` must hold at least the encoded length; `MAX_ADDRESS_LENGTH`
/// always suffices.
pub fn address_from_pubkey_into(pubkey: &PublicKey, buf: &mut [u8]) -> Result<usize, CryptoError> {
    let text = address_from_pubkey(pubkey);
    if buf.len() < text.len() {
        return Err(CryptoError::BufferTooSmall {
            needed: text.len(),
            got: buf.len(),
        });
    }
    buf[..text.len()].copy_from_slice(text.as_bytes());
    Ok(text.len())
}
