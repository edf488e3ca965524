use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use ndn_lite::SignedPortion;

/// An immutable, cheaply cloned byte buffer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Blob(Arc<[u8]>);

impl Blob {
    pub fn new(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex, two digits per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Default for Blob {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for Blob {
    fn from(bytes: [u8; N]) -> Self {
        Self::new(&bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for Blob {
    fn from(bytes: &[u8; N]) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for Blob {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({})", self.to_hex())
    }
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A wire encoding together with the offsets of its signed bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SignedBlob {
    blob: Blob,
    signed_portion: SignedPortion,
}

impl SignedBlob {
    pub fn new(blob: Blob, signed_portion: SignedPortion) -> Self {
        Self {
            blob,
            signed_portion,
        }
    }

    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    pub fn into_blob(self) -> Blob {
        self.blob
    }

    pub fn signed_portion(&self) -> SignedPortion {
        self.signed_portion
    }

    /// The bytes a signature covers.
    pub fn signed_bytes(&self) -> &[u8] {
        self.blob
            .get(self.signed_portion.range())
            .unwrap_or_default()
    }
}

impl Deref for SignedBlob {
    type Target = Blob;

    fn deref(&self) -> &Blob {
        &self.blob
    }
}

/// Hex encoding and decoding utilities
/// Lowercase hex encoding and case-insensitive decoding.
pub mod hex {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            out.push(DIGITS[usize::from(byte >> 4)] as char);
            out.push(DIGITS[usize::from(byte & 0x0F)] as char);
        }
        out
    }

    pub fn decode(text: &str) -> Option<Vec<u8>> {
        if text.len() % 2 != 0 {
            return None;
        }
        text.as_bytes()
            .chunks(2)
            .map(|pair| Some((digit(pair[0])? << 4) | digit(pair[1])?))
            .collect()
    }

    pub fn digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        let blob = Blob::from(vec![0x00, 0x1f, 0xAB, 0xff]);
        assert_eq!(blob.to_hex(), "001fabff");
        assert_eq!(hex::decode("001FabFF"), Some(vec![0x00, 0x1f, 0xab, 0xff]));
        assert_eq!(hex::decode("abc"), None);
        assert_eq!(hex::decode("zz"), None);
    }

    #[test]
    fn test_clone_shares_bytes() {
        let blob = Blob::from("abab");
        let copy = blob.clone();
        assert_eq!(copy.as_slice(), b"abab");
        assert!(std::ptr::eq(blob.as_slice(), copy.as_slice()));
    }

    #[test]
    fn test_signed_bytes() {
        let signed = SignedBlob::new(Blob::from(&[1, 2, 3, 4, 5]), SignedPortion::new(1, 4));
        assert_eq!(signed.signed_bytes(), &[2, 3, 4]);
        assert_eq!(signed.len(), 5);
    }
}
