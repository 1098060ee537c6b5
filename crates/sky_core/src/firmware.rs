//! Firmware image checks used by the bootloader
//!
//! A signed image starts with a 256-byte metadata block:
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | magic `SKY1`                            |
//! | 4      | 4    | code length, little endian              |
//! | 8      | 3    | key index per signature slot (0: empty) |
//! | 11     | 1    | flags                                   |
//! | 12     | 52   | reserved                                |
//! | 64     | 192  | three 64-byte `r || s` signatures       |
//!
//! The fingerprint is `sha256` of everything after the metadata block. Each
//! slot holds a signature of the fingerprint by the trusted key named by its
//! index, recoverable with recovery id 0.

use tracing::{debug, warn};

use crate::errors::{CryptoError, FirmwareError};
use crate::hash::sha256;
use crate::keys::{PublicKey, SecretKey, Signature};
use crate::signature::{recover, sign};

pub const FIRMWARE_MAGIC: &[u8; 4] = b"SKY1";

/// Size of the metadata block that precedes the code
pub const METADATA_LENGTH: usize = 256;

pub const SIGNATURE_SLOTS: usize = 3;

const LENGTH_OFFSET: usize = 4;
const INDEXES_OFFSET: usize = 8;
const FLAGS_OFFSET: usize = INDEXES_OFFSET + SIGNATURE_SLOTS;
const RESERVED_LENGTH: usize = 52;
const SIGNATURES_OFFSET: usize = FLAGS_OFFSET + 1 + RESERVED_LENGTH;
const SLOT_SIGNATURE_LENGTH: usize = 64;

/// Flags written into a freshly prepared header
const DEFAULT_FLAGS: u8 = 0x01;

/// Compressed keys trusted to sign firmware, in index order starting at 1
pub const BOOTLOADER_PUBKEYS: [&str; 5] = [
    "024291e2425a2fc7ec7bd75c8128726ca8cfb7ce9c04ae8186b66c3516f0f80cd2",
    "03e592cb31c3c2cc9b3810e5c78298280b0cc785cd7f28e36e135aa8a0fc74d081",
    "03b155df34b4c0879fdd6bde2acb9c7a45e93aa0bd0c697f6292dc3d1cb4c596d6",
    "026d1d2e1c4af5a2c89e8e4c8bf724034d0252eb8b9179fc6eec9ceb8bb1734997",
    "033bdf377502789d27a1d534775392af97a93333181b9736395b3db687ceffc473",
];

/// Compare a computed firmware hash with the trusted one.
///
/// Runs in constant time with respect to where the inputs differ.
pub fn firmware_hash_matches(candidate: &[u8; 32], trusted: &[u8; 32]) -> bool {
    candidate
        .iter()
        .zip(trusted.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Table of keys allowed to sign firmware. Slot index `i` refers to entry `i - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareKeys {
    keys: Vec<PublicKey>,
}

impl FirmwareKeys {
    pub fn new(keys: Vec<PublicKey>) -> Self {
        Self { keys }
    }

    /// The keys shipped with the bootloader
    pub fn bootloader() -> Result<Self, CryptoError> {
        let keys = BOOTLOADER_PUBKEYS
            .iter()
            .map(|hex| PublicKey::from_hex(hex))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keys })
    }

    /// Key for a 1-based slot index
    pub fn get(&self, index: u8) -> Option<&PublicKey> {
        usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.keys.get(i))
    }

    /// 1-based index of `public`, if trusted
    pub fn index_of(&self, public: &PublicKey) -> Option<u8> {
        self.keys
            .iter()
            .position(|key| key == public)
            .and_then(|i| u8::try_from(i + 1).ok())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Outcome of checking one signature slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Empty,
    Valid { index: u8 },
    /// Valid signature by a key that already signed an earlier slot
    Duplicate { index: u8 },
    Invalid { index: u8 },
}

/// Firmware image with its metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    data: Vec<u8>,
}

impl FirmwareImage {
    /// Parse an image that already carries a `SKY1` header
    pub fn parse(data: Vec<u8>) -> Result<Self, FirmwareError> {
        if data.len() < METADATA_LENGTH {
            return Err(FirmwareError::TooShort(data.len()));
        }
        if &data[..FIRMWARE_MAGIC.len()] != FIRMWARE_MAGIC {
            return Err(FirmwareError::BadMagic);
        }
        if data.len() % 4 != 0 {
            return Err(FirmwareError::Misaligned(data.len()));
        }
        Ok(Self { data })
    }

    /// Wrap raw code in a fresh header with every slot empty
    pub fn wrap(code: &[u8]) -> Result<Self, FirmwareError> {
        if code.len() % 4 != 0 {
            return Err(FirmwareError::Misaligned(code.len()));
        }
        let code_length = code_length_field(code.len())?;

        let mut data = vec![0u8; METADATA_LENGTH];
        data[..FIRMWARE_MAGIC.len()].copy_from_slice(FIRMWARE_MAGIC);
        data[LENGTH_OFFSET..INDEXES_OFFSET].copy_from_slice(&code_length.to_le_bytes());
        data[FLAGS_OFFSET] = DEFAULT_FLAGS;
        data.extend_from_slice(code);
        Ok(Self { data })
    }

    /// Code length recorded in the header
    pub fn code_length(&self) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[LENGTH_OFFSET..INDEXES_OFFSET]);
        u32::from_le_bytes(bytes)
    }

    pub fn code(&self) -> &[u8] {
        &self.data[METADATA_LENGTH..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Digest the signatures cover
    pub fn fingerprint(&self) -> [u8; 32] {
        sha256(self.code())
    }

    /// Key index and signature stored in `slot`
    pub fn slot(&self, slot: usize) -> Result<(u8, [u8; SLOT_SIGNATURE_LENGTH]), FirmwareError> {
        check_slot(slot)?;
        let start = SIGNATURES_OFFSET + slot * SLOT_SIGNATURE_LENGTH;
        let mut signature = [0u8; SLOT_SIGNATURE_LENGTH];
        signature.copy_from_slice(&self.data[start..start + SLOT_SIGNATURE_LENGTH]);
        Ok((self.data[INDEXES_OFFSET + slot], signature))
    }

    pub fn set_slot(
        &mut self,
        slot: usize,
        index: u8,
        signature: &[u8; SLOT_SIGNATURE_LENGTH],
    ) -> Result<(), FirmwareError> {
        check_slot(slot)?;
        let start = SIGNATURES_OFFSET + slot * SLOT_SIGNATURE_LENGTH;
        self.data[INDEXES_OFFSET + slot] = index;
        self.data[start..start + SLOT_SIGNATURE_LENGTH].copy_from_slice(signature);
        Ok(())
    }

    pub fn clear_slot(&mut self, slot: usize) -> Result<(), FirmwareError> {
        self.set_slot(slot, 0, &[0u8; SLOT_SIGNATURE_LENGTH])
    }

    /// Rebuild the metadata block for signing.
    ///
    /// Keeps the magic, the recorded code length and the code. Every slot is
    /// emptied, the flags go back to their default and the reserved bytes are
    /// zeroed.
    pub fn reset_metadata(&mut self) {
        self.data[INDEXES_OFFSET..METADATA_LENGTH].fill(0);
        self.data[FLAGS_OFFSET] = DEFAULT_FLAGS;
    }

    pub fn flags(&self) -> u8 {
        self.data[FLAGS_OFFSET]
    }

    /// Sign the fingerprint with a trusted key and store it in `slot`.
    ///
    /// Slots only keep `r || s`, so a signature with odd recovery id is stored
    /// with `s` negated, which recovers the same key under id 0.
    pub fn sign_slot(
        &mut self,
        slot: usize,
        secret: &SecretKey,
        keys: &FirmwareKeys,
    ) -> Result<u8, FirmwareError> {
        check_slot(slot)?;
        let index = keys
            .index_of(&secret.public_key()?)
            .ok_or(FirmwareError::UnknownKey)?;

        let signature = sign(secret, &self.fingerprint())?;
        let compact = match signature.recovery_id() {
            0 => compact_bytes(&signature),
            1 => negate_s(&signature)?,
            _ => return Err(CryptoError::InvalidSignature.into()),
        };

        self.set_slot(slot, index, &compact)?;
        debug!("Signed firmware slot {} with key index {}", slot, index);
        Ok(index)
    }

    /// Check each slot against the trusted key table
    pub fn check_signatures(&self, keys: &FirmwareKeys) -> [SlotStatus; SIGNATURE_SLOTS] {
        let fingerprint = self.fingerprint();
        let mut statuses = [SlotStatus::Empty; SIGNATURE_SLOTS];
        let mut used: Vec<u8> = Vec::with_capacity(SIGNATURE_SLOTS);

        for (slot, status) in statuses.iter_mut().enumerate() {
            let Ok((index, compact)) = self.slot(slot) else {
                continue;
            };
            if index == 0 {
                continue;
            }

            let signature = Signature::from_parts(&compact, 0);
            let signed_by_index = match (recover(&fingerprint, &signature), keys.get(index)) {
                (Ok(recovered), Some(expected)) => recovered == *expected,
                _ => false,
            };

            *status = if !signed_by_index {
                warn!("Firmware slot {} has an invalid signature for key index {}", slot, index);
                SlotStatus::Invalid { index }
            } else if used.contains(&index) {
                SlotStatus::Duplicate { index }
            } else {
                used.push(index);
                SlotStatus::Valid { index }
            };
        }
        statuses
    }

    /// True when every slot holds a valid signature by a distinct trusted key
    pub fn is_fully_signed(&self, keys: &FirmwareKeys) -> bool {
        self.check_signatures(keys)
            .iter()
            .all(|status| matches!(status, SlotStatus::Valid { .. }))
    }
}

/// Header encoding of a code length
fn code_length_field(len: usize) -> Result<u32, FirmwareError> {
    u32::try_from(len).map_err(|_| FirmwareError::TooLarge(len))
}

fn check_slot(slot: usize) -> Result<(), FirmwareError> {
    if slot >= SIGNATURE_SLOTS {
        return Err(FirmwareError::InvalidSlot(slot));
    }
    Ok(())
}

fn compact_bytes(signature: &Signature) -> [u8; SLOT_SIGNATURE_LENGTH] {
    let mut compact = [0u8; SLOT_SIGNATURE_LENGTH];
    compact.copy_from_slice(signature.compact());
    compact
}

/// `r || (n - s)` for a signature
fn negate_s(signature: &Signature) -> Result<[u8; SLOT_SIGNATURE_LENGTH], CryptoError> {
    let s = secp256k1::SecretKey::from_slice(signature.s()).map_err(|_| CryptoError::InvalidSignature)?;
    let mut compact = compact_bytes(signature);
    compact[32..].copy_from_slice(&s.negate().secret_bytes());
    Ok(compact)
}
