//! Hex conversion helpers used at the edges of the core

use zeroize::Zeroizing;

use crate::errors::CryptoError;

/// Lowercase hex text of `buffer`
pub fn to_hex(buffer: &[u8]) -> String {
    hex::encode(buffer)
}

/// Decode `text` into `buf`.
///
/// Fails unless `text` is exactly `2 * buf.len()` hex characters. `buf` is
/// left untouched on failure.
pub fn hex_to_buf(text: &str, buf: &mut [u8]) -> Result<(), CryptoError> {
    if text.len() != buf.len() * 2 {
        return Err(CryptoError::InvalidHex(format!(
            "expected {} hex characters, got {}",
            buf.len() * 2,
            text.len()
        )));
    }
    let decoded =
        Zeroizing::new(hex::decode(text).map_err(|e| CryptoError::InvalidHex(e.to_string()))?);
    buf.copy_from_slice(&decoded);
    Ok(())
}

/// Decode `text` into a fixed-size array
pub fn hex_to_array<const N: usize>(text: &str) -> Result<[u8; N], CryptoError> {
    let mut out = [0u8; N];
    hex_to_buf(text, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_hex_to_buf_roundtrip() {
        let mut buf = [0u8; 3];
        hex_to_buf("00ABff", &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0xab, 0xff]);
    }

    #[test]
    fn test_hex_to_buf_length_mismatch() {
        let mut buf = [0u8; 4];
        assert!(hex_to_buf("00ab", &mut buf).is_err());
        assert!(hex_to_buf("00ab00ab00", &mut buf).is_err());
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn test_hex_to_buf_rejects_non_hex_and_leaves_buffer() {
        let mut buf = [0x55u8; 2];
        assert!(matches!(hex_to_buf("zz00", &mut buf), Err(CryptoError::InvalidHex(_))));
        assert!(hex_to_buf("00g0", &mut buf).is_err());
        assert_eq!(buf, [0x55, 0x55]);
    }

    #[test]
    fn test_hex_to_array() {
        let arr: [u8; 2] = hex_to_array("beef").unwrap();
        assert_eq!(arr, [0xbe, 0xef]);
        assert!(hex_to_array::<2>("bee").is_err());
    }
}
