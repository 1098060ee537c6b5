//! Error types for the Skycoin crypto core

use thiserror::Error;

/// Error types for cryptographic operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Seed must be between 1 and {max} bytes, got {len}")]
    InvalidSeed { len: usize, max: usize },

    #[error("Invalid secret key")]
    InvalidSecretKey,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// r or s came out as zero; retry with a perturbed digest
    #[error("Degenerate signature (zero r or s component)")]
    DegenerateSignature,

    #[error("Digest must be 32 bytes, got {0}")]
    InvalidDigest(usize),

    #[error("Output buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
}

/// Error types for address decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid base58 encoding")]
    InvalidBase58,

    #[error("Decoded address has {0} bytes, expected 25")]
    InvalidLength(usize),

    #[error("Unknown address version {0}")]
    InvalidVersion(u8),

    #[error("Address checksum mismatch")]
    InvalidChecksum,
}

/// Which bounded list of a transaction an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Inputs,
    Outputs,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Inputs => write!(f, "inputs"),
            ListKind::Outputs => write!(f, "outputs"),
        }
    }
}

/// Error types for transaction building and hashing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction {kind} are full (capacity {capacity})")]
    CapacityExceeded { kind: ListKind, capacity: usize },

    #[error("Input index {index} out of range ({count} inputs)")]
    InputIndexOutOfRange { index: usize, count: usize },

    #[error("Inner hash has not been computed for the current inputs and outputs")]
    InnerHashNotComputed,

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Error types for firmware image handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FirmwareError {
    #[error("Firmware image is {0} bytes, shorter than its metadata header")]
    TooShort(usize),

    #[error("Firmware header magic missing")]
    BadMagic,

    #[error("Firmware size {0} is not a multiple of 4")]
    Misaligned(usize),

    #[error("Firmware code of {0} bytes does not fit the header length field")]
    TooLarge(usize),

    #[error("Signature slot {0} does not exist")]
    InvalidSlot(usize),

    #[error("Signing key is not in the trusted key table")]
    UnknownKey,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
