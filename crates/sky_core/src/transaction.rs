//! Transaction model and signing hashes
//!
//! A transaction holds at most eight input references and eight outputs in
//! insertion order. Its inner hash commits to all of them; each input is
//! signed over `sha256(inner_hash || input)`, so inputs can be signed
//! independently and in any order.

use serde::{Deserialize, Serialize};

use crate::address::{Address, ADDRESS_KEY_LENGTH, ADDRESS_VERSION};
use crate::errors::{ListKind, TransactionError};
use crate::hash::{add_sha256, sha256};
use crate::keys::{SecretKey, Signature};
use crate::signature::sign;

/// Maximum number of inputs in a transaction
pub const MAX_INPUTS: usize = 8;

/// Maximum number of outputs in a transaction
pub const MAX_OUTPUTS: usize = 8;

/// Reference to a previous output being spent
pub type InputRef = [u8; 32];

/// Size of an output in its in-memory layout
pub const OUTPUT_LENGTH: usize = 36;

/// Size of an output in the hashed wire layout
pub const ENCODED_OUTPUT_LENGTH: usize = 1 + ADDRESS_KEY_LENGTH + 8 + 8;

/// A list that refuses to grow past `CAP` entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedList<T, const CAP: usize> {
    items: Vec<T>,
}

impl<T, const CAP: usize> BoundedList<T, CAP> {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(CAP),
        }
    }

    /// Append `item`, handing it back if the list is full
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.items.len() >= CAP {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= CAP
    }

    pub fn capacity(&self) -> usize {
        CAP
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T, const CAP: usize> Default for BoundedList<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

/// One transaction output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Amount in droplets
    pub coin: u64,
    /// Coin hours carried with the amount
    pub hour: u64,
    /// Recipient address identifier
    pub address: [u8; ADDRESS_KEY_LENGTH],
}

impl TransactionOutput {
    pub fn new(coin: u64, hour: u64, address: [u8; ADDRESS_KEY_LENGTH]) -> Self {
        Self { coin, hour, address }
    }

    /// In-memory layout: coin (LE) || hour (LE) || address
    pub fn to_bytes(&self) -> [u8; OUTPUT_LENGTH] {
        let mut bytes = [0u8; OUTPUT_LENGTH];
        bytes[0..8].copy_from_slice(&self.coin.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.hour.to_le_bytes());
        bytes[16..].copy_from_slice(&self.address);
        bytes
    }

    /// Hashed layout: address version || address || coin (LE) || hour (LE)
    pub fn encode(&self) -> [u8; ENCODED_OUTPUT_LENGTH] {
        let mut bytes = [0u8; ENCODED_OUTPUT_LENGTH];
        bytes[0] = ADDRESS_VERSION;
        bytes[1..21].copy_from_slice(&self.address);
        bytes[21..29].copy_from_slice(&self.coin.to_le_bytes());
        bytes[29..37].copy_from_slice(&self.hour.to_le_bytes());
        bytes
    }
}

/// Cached inner hash of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InnerHash {
    #[default]
    NotComputed,
    Computed([u8; 32]),
}

/// Unsigned transaction being assembled for signing
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    inputs: BoundedList<InputRef, MAX_INPUTS>,
    outputs: BoundedList<TransactionOutput, MAX_OUTPUTS>,
    inner_hash: InnerHash,
}

impl Transaction {
    /// An empty transaction
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, input: &InputRef) -> Result<(), TransactionError> {
        self.inputs
            .push(*input)
            .map_err(|_| TransactionError::CapacityExceeded {
                kind: ListKind::Inputs,
                capacity: MAX_INPUTS,
            })?;
        self.inner_hash = InnerHash::NotComputed;
        Ok(())
    }

    pub fn add_output(
        &mut self,
        coin: u64,
        hour: u64,
        address: [u8; ADDRESS_KEY_LENGTH],
    ) -> Result<(), TransactionError> {
        self.outputs
            .push(TransactionOutput::new(coin, hour, address))
            .map_err(|_| TransactionError::CapacityExceeded {
                kind: ListKind::Outputs,
                capacity: MAX_OUTPUTS,
            })?;
        self.inner_hash = InnerHash::NotComputed;
        Ok(())
    }

    /// Add an output paying to a base58 address
    pub fn add_output_address(
        &mut self,
        coin: u64,
        hour: u64,
        address: &str,
    ) -> Result<(), TransactionError> {
        let address: Address = address.parse()?;
        self.add_output(coin, hour, address.key)
    }

    pub fn inputs(&self) -> &[InputRef] {
        self.inputs.as_slice()
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        self.outputs.as_slice()
    }

    /// Bytes committed to by the inner hash:
    /// `u32 LE input count || inputs || u32 LE output count || outputs`
    pub fn encode_inner(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            8 + self.inputs.len() * 32 + self.outputs.len() * ENCODED_OUTPUT_LENGTH,
        );
        buf.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in self.inputs.iter() {
            buf.extend_from_slice(input);
        }
        buf.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in self.outputs.iter() {
            buf.extend_from_slice(&output.encode());
        }
        buf
    }

    /// Inner hash of the current inputs and outputs, computed on first use
    pub fn inner_hash(&mut self) -> [u8; 32] {
        if let InnerHash::Computed(hash) = self.inner_hash {
            return hash;
        }
        let hash = sha256(&self.encode_inner());
        tracing::debug!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            inner_hash = %hex::encode(hash),
            "computed transaction inner hash"
        );
        self.inner_hash = InnerHash::Computed(hash);
        hash
    }

    pub fn cached_inner_hash(&self) -> Option<[u8; 32]> {
        match self.inner_hash {
            InnerHash::Computed(hash) => Some(hash),
            InnerHash::NotComputed => None,
        }
    }

    /// Digest to sign for input `index`: `sha256(inner_hash || input)`.
    ///
    /// Requires `inner_hash` to have been computed since the last change.
    pub fn msg_to_sign(&self, index: usize) -> Result<[u8; 32], TransactionError> {
        let inner_hash = self
            .cached_inner_hash()
            .ok_or(TransactionError::InnerHashNotComputed)?;
        let input = self
            .inputs
            .get(index)
            .ok_or(TransactionError::InputIndexOutOfRange {
                index,
                count: self.inputs.len(),
            })?;
        Ok(add_sha256(&inner_hash, input))
    }

    /// Sign input `index` with `secret`
    pub fn sign_input(&self, index: usize, secret: &SecretKey) -> Result<Signature, TransactionError> {
        let digest = self.msg_to_sign(index)?;
        Ok(sign(secret, &digest)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::address_hash;
    use crate::derivation::derive_keypair;
    use crate::signature::recover;

    fn input(tag: u8) -> InputRef {
        [tag; 32]
    }

    fn sample_transaction() -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input(&input(1)).unwrap();
        tx.add_input(&input(2)).unwrap();
        tx.add_output(1_000_000, 100, [0xaa; 20]).unwrap();
        tx.add_output(2_000_000, 5, [0xbb; 20]).unwrap();
        tx
    }

    #[test]
    fn test_bounded_list_refuses_overflow() {
        let mut list: BoundedList<u8, 2> = BoundedList::new();
        assert!(list.push(1).is_ok());
        assert!(list.push(2).is_ok());
        assert!(list.is_full());
        assert_eq!(list.push(3), Err(3));
        assert_eq!(list.as_slice(), &[1, 2]);
        assert_eq!(list.capacity(), 2);
    }

    #[test]
    fn test_capacity_is_enforced_without_mutation() {
        let mut tx = Transaction::new();
        for i in 0..MAX_INPUTS {
            tx.add_input(&input(i as u8)).unwrap();
        }
        for i in 0..MAX_OUTPUTS {
            tx.add_output(i as u64, 0, [0u8; 20]).unwrap();
        }
        let hash = tx.inner_hash();

        assert_eq!(
            tx.add_input(&input(99)),
            Err(TransactionError::CapacityExceeded { kind: ListKind::Inputs, capacity: 8 })
        );
        assert_eq!(
            tx.add_output(1, 1, [1u8; 20]),
            Err(TransactionError::CapacityExceeded { kind: ListKind::Outputs, capacity: 8 })
        );
        assert_eq!(tx.inputs().len(), MAX_INPUTS);
        assert_eq!(tx.outputs().len(), MAX_OUTPUTS);
        // A rejected append leaves the cached hash valid
        assert_eq!(tx.cached_inner_hash(), Some(hash));
    }

    #[test]
    fn test_inner_hash_layout() {
        let tx = sample_transaction();

        let mut expected = Vec::new();
        expected.extend_from_slice(&[2, 0, 0, 0]);
        expected.extend_from_slice(&[1u8; 32]);
        expected.extend_from_slice(&[2u8; 32]);
        expected.extend_from_slice(&[2, 0, 0, 0]);
        expected.push(0);
        expected.extend_from_slice(&[0xaa; 20]);
        expected.extend_from_slice(&1_000_000u64.to_le_bytes());
        expected.extend_from_slice(&100u64.to_le_bytes());
        expected.push(0);
        expected.extend_from_slice(&[0xbb; 20]);
        expected.extend_from_slice(&2_000_000u64.to_le_bytes());
        expected.extend_from_slice(&5u64.to_le_bytes());

        assert_eq!(tx.encode_inner(), expected);
        assert_eq!(tx.clone().inner_hash(), sha256(&expected));
    }

    #[test]
    fn test_empty_transaction_hash() {
        let mut tx = Transaction::new();
        assert_eq!(tx.encode_inner(), vec![0u8; 8]);
        assert_eq!(tx.inner_hash(), sha256(&[0u8; 8]));
    }

    #[test]
    fn test_inner_hash_is_cached_and_invalidated() {
        let mut tx = sample_transaction();
        assert_eq!(tx.cached_inner_hash(), None);

        let first = tx.inner_hash();
        assert_eq!(tx.cached_inner_hash(), Some(first));
        assert_eq!(tx.inner_hash(), first);

        tx.add_output(1, 1, [0xcc; 20]).unwrap();
        assert_eq!(tx.cached_inner_hash(), None);
        assert_eq!(tx.msg_to_sign(0), Err(TransactionError::InnerHashNotComputed));

        let second = tx.inner_hash();
        assert_ne!(first, second);

        tx.add_input(&input(3)).unwrap();
        assert_eq!(tx.cached_inner_hash(), None);
    }

    #[test]
    fn test_inner_hash_depends_on_order() {
        let mut a = Transaction::new();
        a.add_input(&input(1)).unwrap();
        a.add_input(&input(2)).unwrap();

        let mut b = Transaction::new();
        b.add_input(&input(2)).unwrap();
        b.add_input(&input(1)).unwrap();

        assert_ne!(a.inner_hash(), b.inner_hash());
    }

    #[test]
    fn test_inner_hash_sensitive_to_every_output_field() {
        let base = sample_transaction().inner_hash();

        let variants: [(u64, u64, [u8; 20]); 3] = [
            (1_000_001, 100, [0xaa; 20]),
            (1_000_000, 101, [0xaa; 20]),
            (1_000_000, 100, {
                let mut a = [0xaa; 20];
                a[19] = 0xab;
                a
            }),
        ];

        for (coin, hour, address) in variants {
            let mut tx = Transaction::new();
            tx.add_input(&input(1)).unwrap();
            tx.add_input(&input(2)).unwrap();
            tx.add_output(coin, hour, address).unwrap();
            tx.add_output(2_000_000, 5, [0xbb; 20]).unwrap();
            assert_ne!(tx.inner_hash(), base);
        }
    }

    #[test]
    fn test_msg_to_sign_requires_hash_and_valid_index() {
        let mut tx = sample_transaction();
        assert_eq!(tx.msg_to_sign(0), Err(TransactionError::InnerHashNotComputed));

        let inner = tx.inner_hash();
        assert_eq!(tx.msg_to_sign(0).unwrap(), add_sha256(&inner, &input(1)));
        assert_eq!(tx.msg_to_sign(1).unwrap(), add_sha256(&inner, &input(2)));
        assert_eq!(
            tx.msg_to_sign(2),
            Err(TransactionError::InputIndexOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_msg_to_sign_differs_per_input() {
        let mut tx = sample_transaction();
        tx.inner_hash();
        assert_ne!(tx.msg_to_sign(0).unwrap(), tx.msg_to_sign(1).unwrap());
    }

    #[test]
    fn test_msg_to_sign_tracks_other_inputs() {
        let mut tx = Transaction::new();
        tx.add_input(&input(1)).unwrap();
        tx.add_input(&input(2)).unwrap();
        tx.add_input(&input(3)).unwrap();
        tx.add_output(1_000_000, 100, [0xaa; 20]).unwrap();

        // The middle input keeps its position while the ones around it swap
        let mut swapped = Transaction::new();
        swapped.add_input(&input(3)).unwrap();
        swapped.add_input(&input(2)).unwrap();
        swapped.add_input(&input(1)).unwrap();
        swapped.add_output(1_000_000, 100, [0xaa; 20]).unwrap();

        let inner = tx.inner_hash();
        let swapped_inner = swapped.inner_hash();
        assert_ne!(inner, swapped_inner);

        // Same input, same position, different digest: only the inner hash moved
        assert_eq!(tx.inputs()[1], swapped.inputs()[1]);
        assert_ne!(tx.msg_to_sign(1).unwrap(), swapped.msg_to_sign(1).unwrap());
        assert_eq!(swapped.msg_to_sign(1).unwrap(), add_sha256(&swapped_inner, &input(2)));
    }

    #[test]
    fn test_add_output_address() {
        let keypair = derive_keypair(b"recipient").unwrap();
        let address = Address::from_pubkey(&keypair.public).to_string();

        let mut tx = Transaction::new();
        tx.add_output_address(10, 20, &address).unwrap();
        assert_eq!(tx.outputs()[0], TransactionOutput::new(10, 20, address_hash(&keypair.public)));

        let mut broken = address.clone();
        broken.pop();
        broken.push(if address.ends_with('2') { '3' } else { '2' });
        assert!(matches!(
            tx.add_output_address(10, 20, &broken),
            Err(TransactionError::Address(_))
        ));
        assert_eq!(tx.outputs().len(), 1);
    }

    #[test]
    fn test_sign_input_recovers_signer() {
        let signer = derive_keypair(b"spender").unwrap();
        let mut tx = sample_transaction();
        assert!(matches!(
            tx.sign_input(0, &signer.secret),
            Err(TransactionError::InnerHashNotComputed)
        ));

        tx.inner_hash();
        let signature = tx.sign_input(1, &signer.secret).unwrap();
        let digest = tx.msg_to_sign(1).unwrap();
        assert_eq!(recover(&digest, &signature).unwrap(), signer.public);
        assert!(matches!(
            tx.sign_input(5, &signer.secret),
            Err(TransactionError::InputIndexOutOfRange { index: 5, count: 2 })
        ));
    }

    #[test]
    fn test_output_byte_layouts() {
        let output = TransactionOutput::new(0x0102, 0x0304, [0x55; 20]);

        let memory = output.to_bytes();
        assert_eq!(&memory[0..8], &0x0102u64.to_le_bytes());
        assert_eq!(&memory[8..16], &0x0304u64.to_le_bytes());
        assert_eq!(&memory[16..], &[0x55; 20]);

        let encoded = output.encode();
        assert_eq!(encoded[0], ADDRESS_VERSION);
        assert_eq!(&encoded[1..21], &[0x55; 20]);
        assert_eq!(&encoded[21..29], &0x0102u64.to_le_bytes());
        assert_eq!(&encoded[29..], &0x0304u64.to_le_bytes());
    }
}
