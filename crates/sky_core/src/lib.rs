//! Cryptographic core of the Skycoin hardware wallet
//! Contains hashing, key derivation, ECDSA signing and recovery, ECDH,
//! address encoding and transaction signing digests

pub mod address;
pub mod derivation;
pub mod ecdh;
pub mod encoding;
pub mod errors;
pub mod firmware;
pub mod hash;
pub mod keys;
pub mod signature;
pub mod traits;
pub mod transaction;

#[cfg(test)]
mod test_vectors;

pub use address::*;
pub use derivation::*;
pub use ecdh::*;
pub use encoding::*;
pub use errors::*;
pub use firmware::*;
pub use hash::*;
pub use keys::*;
pub use signature::*;
pub use traits::*;
pub use transaction::*;
