//! Elliptic-curve Diffie-Hellman over secp256k1
//!
//! Every result is key material, so each is returned wrapped in `Zeroizing`.

use secp256k1::ecdh::{shared_secret_point, SharedSecret};
use zeroize::Zeroizing;

use crate::errors::CryptoError;
use crate::keys::{PublicKey, SecretKey};

/// Shared secret: SHA-256 of the compressed point `secret * remote`.
///
/// Symmetric: `ecdh(a, B) == ecdh(b, A)`.
pub fn ecdh(secret: &SecretKey, remote: &PublicKey) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let mut shared = SharedSecret::new(&remote.to_secp()?, &*secret.to_secp()?);
    let bytes = Zeroizing::new(shared.secret_bytes());
    shared.non_secure_erase();
    Ok(bytes)
}

/// Raw x-coordinate of `secret * remote`, before any hashing
pub fn ecdh_shared_secret(
    secret: &SecretKey,
    remote: &PublicKey,
) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let point = Zeroizing::new(shared_secret_point(&remote.to_secp()?, &*secret.to_secp()?));
    let mut x = Zeroizing::new([0u8; 32]);
    x.copy_from_slice(&point[..32]);
    Ok(x)
}

/// `secret * remote` as a 33-byte compressed point
pub fn ecdh_point(secret: &SecretKey, remote: &PublicKey) -> Result<Zeroizing<[u8; 33]>, CryptoError> {
    let point = Zeroizing::new(shared_secret_point(&remote.to_secp()?, &*secret.to_secp()?));
    let mut compressed = Zeroizing::new([0u8; 33]);
    compressed[0] = 0x02 | (point[63] & 0x01);
    compressed[1..].copy_from_slice(&point[..32]);
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::derive_keypair;
    use crate::hash::sha256;

    #[test]
    fn test_ecdh_is_symmetric() {
        let alice = derive_keypair(b"alice").unwrap();
        let bob = derive_keypair(b"bob").unwrap();

        assert_eq!(
            ecdh(&alice.secret, &bob.public).unwrap(),
            ecdh(&bob.secret, &alice.public).unwrap()
        );
        assert_eq!(
            ecdh_shared_secret(&alice.secret, &bob.public).unwrap(),
            ecdh_shared_secret(&bob.secret, &alice.public).unwrap()
        );
        assert_eq!(
            ecdh_point(&alice.secret, &bob.public).unwrap(),
            ecdh_point(&bob.secret, &alice.public).unwrap()
        );
    }

    #[test]
    fn test_ecdh_forms_are_consistent() {
        let alice = derive_keypair(b"alice").unwrap();
        let bob = derive_keypair(b"bob").unwrap();

        let point = ecdh_point(&alice.secret, &bob.public).unwrap();
        assert!(point[0] == 0x02 || point[0] == 0x03);
        assert_eq!(&point[1..], &ecdh_shared_secret(&alice.secret, &bob.public).unwrap()[..]);
        assert_eq!(sha256(&point[..]), *ecdh(&alice.secret, &bob.public).unwrap());

        // The shared point must itself be a valid curve point
        assert!(PublicKey::from_bytes(&point[..]).is_ok());
    }

    #[test]
    fn test_ecdh_with_generator_multiple() {
        // secret * G for secret = 1 is G itself
        let one = SecretKey::from_bytes(&{
            let mut b = [0u8; 32];
            b[31] = 1;
            b
        })
        .unwrap();
        let other = derive_keypair(b"other").unwrap();

        assert_eq!(*ecdh_point(&one, &other.public).unwrap(), *other.public.as_bytes());
    }

    #[test]
    fn test_ecdh_differs_per_peer() {
        let alice = derive_keypair(b"alice").unwrap();
        let bob = derive_keypair(b"bob").unwrap();
        let carol = derive_keypair(b"carol").unwrap();

        assert_ne!(
            ecdh(&alice.secret, &bob.public).unwrap(),
            ecdh(&alice.secret, &carol.public).unwrap()
        );
    }
}
