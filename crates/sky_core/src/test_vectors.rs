//! Known-answer vectors shared with the other Skycoin implementations

use crate::{
    address_from_pubkey, address_hash, derive_keypair, derive_keypair_iterator, ecdh, ecdh_point,
    ripemd160, secp256k1_hash, sha256, KeyChain, PublicKey, SecretKey, Transaction,
};

const SEED: &[u8] = b"seed";
const SEED_NEXT: &str = "c79454cf362b3f55e5effce09f664311650a44b9c189b3c8eed1ae9bd696cd9e";
const SEED_SECKEY: &str = "001aa9e416aff5f3a3c7f9ae0811757cf54f393d50df861f5c33747954341aa7";
const SEED_PUBKEY: &str = "02e5be89fa161bf6b0bc64ec9ec7fe27311fbb78949c3ef9739d4c73a84920d6e1";
const SEED_ADDRESS: &str = "2EVNa4CK9SKosT4j1GEn8SuuUUEAXaHAMbM";

const STEP2_NEXT: &str = "ae081d9c92fa04acd6181230206e05521dbfd7dcebc99b99198eeb6edb387408";
const STEP2_SECKEY: &str = "cc6c6e2581053dc6b405e460513ed2f0b59557ba60120d89c064287502cb3955";
const STEP2_PUBKEY: &str = "031471a97c683c6fb83962219ac2a206c3a6cda1b5993a07da691ef1819dd97b5d";

#[test]
fn test_hash_vectors() {
    assert_eq!(
        hex::encode(sha256(b"abc")),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        hex::encode(ripemd160(b"abc")),
        "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
    );
}

#[test]
fn test_secp256k1_hash_vector() {
    assert_eq!(hex::encode(secp256k1_hash(SEED).unwrap()), SEED_NEXT);
}

#[test]
fn test_keypair_iterator_vector() {
    let (next_seed, keypair) = derive_keypair_iterator(SEED).unwrap();
    assert_eq!(hex::encode(&next_seed[..]), SEED_NEXT);
    assert_eq!(keypair.secret.to_hex(), SEED_SECKEY);
    assert_eq!(keypair.public.to_hex(), SEED_PUBKEY);

    let (next_seed, keypair) = derive_keypair_iterator(&next_seed[..]).unwrap();
    assert_eq!(hex::encode(&next_seed[..]), STEP2_NEXT);
    assert_eq!(keypair.secret.to_hex(), STEP2_SECKEY);
    assert_eq!(keypair.public.to_hex(), STEP2_PUBKEY);
}

#[test]
fn test_key_chain_vector() {
    let mut chain = KeyChain::new(SEED).unwrap();
    assert_eq!(chain.next().unwrap().unwrap().public.to_hex(), SEED_PUBKEY);
    assert_eq!(hex::encode(chain.current_seed()), SEED_NEXT);
    assert_eq!(chain.next().unwrap().unwrap().public.to_hex(), STEP2_PUBKEY);
    assert_eq!(chain.position(), 2);
}

#[test]
fn test_address_vector() {
    let pubkey = PublicKey::from_hex(SEED_PUBKEY).unwrap();
    assert_eq!(address_from_pubkey(&pubkey), SEED_ADDRESS);
}

#[test]
fn test_zero_seed_vector() {
    let keypair = derive_keypair(&[0u8; 32]).unwrap();
    assert_eq!(
        keypair.secret.to_hex(),
        "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925"
    );
    assert_eq!(
        keypair.public.to_hex(),
        "03ee0b1602eb18fef7986887a7e8769a30c9df981d33c8380d255edef003abdcd2"
    );
    assert_eq!(
        hex::encode(address_hash(&keypair.public)),
        "368e7fccf2e6ce33640cb4afeecf7b6001679f05"
    );
    assert_eq!(address_from_pubkey(&keypair.public), "NxF3DqwETVr2UFhutRCTDQxjhoWZuen1XC");
}

#[test]
fn test_ecdh_vector() {
    let alice = derive_keypair(b"alice").unwrap();
    let bob = derive_keypair(b"bob").unwrap();
    assert_eq!(
        alice.public.to_hex(),
        "039997a497d964fc1a62885b05a51166a65a90df00492c8d7cf61d6accf54803be"
    );
    assert_eq!(
        bob.public.to_hex(),
        "024edfcf9dfe6c0b5c83d1ab3f78d1b39a46ebac6798e08e19761f5ed89ec83c10"
    );

    assert_eq!(
        hex::encode(&ecdh_point(&alice.secret, &bob.public).unwrap()[..]),
        "0205aaea3882116920f603246a563cc2f3da5704bdf9d33ca60a29298956c26cf9"
    );
    assert_eq!(
        hex::encode(&ecdh(&bob.secret, &alice.public).unwrap()[..]),
        "4e06de2520d1fe909bcf244b0a0de57c92bc6e21e28c2cdb108d980ad7d709b6"
    );
}

#[test]
fn test_transaction_vector() {
    let keypair = derive_keypair(&[0u8; 32]).unwrap();
    let input: [u8; 32] =
        crate::hex_to_array("181bd5656115172fe81451fae4fb56498a97744d89702e73da75ba91ed5200f9")
            .unwrap();

    let mut tx = Transaction::new();
    tx.add_input(&input).unwrap();
    tx.add_output(1_000_000, 100, address_hash(&keypair.public)).unwrap();

    assert_eq!(
        hex::encode(tx.inner_hash()),
        "013e1e2d8dc2a18dd8ef2d0d543b877ad3d02f96854b07f9bd6b26e36eabad5a"
    );
    assert_eq!(
        hex::encode(tx.msg_to_sign(0).unwrap()),
        "65333573a65b633e2d3600517b12ada1710dc7f7d3ae3f826244c44aeae2480e"
    );
}

#[test]
fn test_empty_transaction_vector() {
    assert_eq!(
        hex::encode(Transaction::new().inner_hash()),
        "af5570f5a1810b7af78caf4bc70a660f0df51e42baf91d4de5b2328de0e83dfc"
    );
}

#[test]
fn test_seckey_hex_vector() {
    let secret = SecretKey::from_hex(SEED_SECKEY).unwrap();
    assert_eq!(secret.public_key().unwrap().to_hex(), SEED_PUBKEY);
}
