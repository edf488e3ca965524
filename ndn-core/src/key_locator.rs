use std::cell::Cell;
use std::hash::{Hash, Hasher};

use ndn_lite::{tlv_types, KeyLocatorLite, KeyLocatorType};

use crate::blob::Blob;
use crate::change_counter::{next_change_count, ChangeCount, ChangeCounter};
use crate::error::Result;
use crate::name::Name;
use crate::wire_format::{default_wire_format, WireFormat};

/// Names the key behind a signature, either by key name or by key digest.
/// At most one of the two is in effect.
#[derive(Debug, Clone, Default)]
pub struct KeyLocator {
    locator_type: Option<KeyLocatorType>,
    key_data: Blob,
    key_name: ChangeCounter<Name>,
    change_count: Cell<u64>,
}

impl KeyLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_key_name(key_name: Name) -> Self {
        let mut key_locator = Self::new();
        key_locator.set_key_name(key_name);
        key_locator
    }

    pub fn from_key_digest(digest: impl Into<Blob>) -> Self {
        let mut key_locator = Self::new();
        key_locator.set_key_digest(digest);
        key_locator
    }

    pub fn locator_type(&self) -> Option<KeyLocatorType> {
        self.locator_type
    }

    pub fn is_empty(&self) -> bool {
        self.locator_type.is_none()
    }

    pub fn key_digest(&self) -> Option<&Blob> {
        match self.locator_type {
            Some(KeyLocatorType::KeyLocatorDigest) => Some(&self.key_data),
            _ => None,
        }
    }

    /// The key name, empty unless this is a key name locator.
    pub fn key_name(&self) -> &Name {
        self.key_name.get()
    }

    /// Switch to a key name locator and return the name for editing.
    pub fn key_name_mut(&mut self) -> &mut Name {
        if self.locator_type != Some(KeyLocatorType::KeyName) {
            self.locator_type = Some(KeyLocatorType::KeyName);
            self.key_data = Blob::default();
            self.key_name.get_mut().clear();
            self.set_changed();
        }
        self.key_name.get_mut()
    }

    pub fn set_key_name(&mut self, key_name: Name) -> &mut Self {
        self.locator_type = Some(KeyLocatorType::KeyName);
        self.key_data = Blob::default();
        self.key_name.set(key_name);
        self.set_changed();
        self
    }

    pub fn set_key_digest(&mut self, digest: impl Into<Blob>) -> &mut Self {
        self.locator_type = Some(KeyLocatorType::KeyLocatorDigest);
        self.key_data = digest.into();
        if !self.key_name.get().is_empty() {
            self.key_name.get_mut().clear();
        }
        self.set_changed();
        self
    }

    pub fn clear(&mut self) {
        self.locator_type = None;
        self.key_data = Blob::default();
        if !self.key_name.get().is_empty() {
            self.key_name.get_mut().clear();
        }
        self.set_changed();
    }

    pub fn change_count(&self) -> u64 {
        if self.key_name.check_changed() {
            self.change_count.set(next_change_count());
        }
        self.change_count.get()
    }

    /// Encode as a KeyLocator TLV.
    pub fn wire_encode(&self) -> Result<Blob> {
        self.wire_encode_with(default_wire_format())
    }

    pub fn wire_encode_with(&self, wire_format: &dyn WireFormat) -> Result<Blob> {
        wire_format.encode_key_locator(tlv_types::KEY_LOCATOR, self)
    }

    pub fn wire_decode(&mut self, input: &[u8]) -> Result<()> {
        self.wire_decode_with(input, default_wire_format())
    }

    pub fn wire_decode_with(&mut self, input: &[u8], wire_format: &dyn WireFormat) -> Result<()> {
        wire_format
            .decode_key_locator(tlv_types::KEY_LOCATOR, self, input)
            .map(|_| ())
    }

    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut KeyLocatorLite<'a, '_>) -> ndn_lite::Result<()> {
        match self.locator_type {
            None => lite.clear(),
            Some(KeyLocatorType::KeyLocatorDigest) => lite.set_key_digest(&self.key_data),
            Some(KeyLocatorType::KeyName) => self.key_name.get().copy_to_lite(lite.key_name_mut())?,
        }
        Ok(())
    }

    pub(crate) fn from_lite(lite: &KeyLocatorLite<'_, '_>) -> Self {
        let mut key_locator = Self::new();
        if let Some(digest) = lite.key_digest() {
            key_locator.set_key_digest(digest);
        } else if let Some(key_name) = lite.key_name() {
            key_locator.set_key_name(Name::from_lite(key_name));
        }
        key_locator
    }

    fn set_changed(&self) {
        self.change_count.set(next_change_count());
    }
}

impl ChangeCount for KeyLocator {
    fn change_count(&self) -> u64 {
        KeyLocator::change_count(self)
    }
}

impl PartialEq for KeyLocator {
    fn eq(&self, other: &Self) -> bool {
        self.locator_type == other.locator_type
            && self.key_data == other.key_data
            && self.key_name.get() == other.key_name.get()
    }
}

impl Eq for KeyLocator {}

impl Hash for KeyLocator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.locator_type.hash(state);
        self.key_data.hash(state);
        self.key_name.get().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_are_exclusive() {
        let mut key_locator = KeyLocator::from_key_digest(vec![1, 2, 3]);
        assert_eq!(key_locator.locator_type(), Some(KeyLocatorType::KeyLocatorDigest));
        assert_eq!(key_locator.key_digest().unwrap().as_slice(), &[1, 2, 3]);

        key_locator.key_name_mut().append("key");
        assert_eq!(key_locator.locator_type(), Some(KeyLocatorType::KeyName));
        assert_eq!(key_locator.key_digest(), None);
        assert_eq!(key_locator.key_name().to_uri(), "/key");

        key_locator.set_key_digest(vec![9]);
        assert!(key_locator.key_name().is_empty());

        key_locator.clear();
        assert!(key_locator.is_empty());
    }

    #[test]
    fn test_key_name_edit_changes_count() {
        let mut key_locator = KeyLocator::from_key_name(Name::from_uri("/a").unwrap());
        let before = key_locator.change_count();
        assert_eq!(key_locator.change_count(), before);

        key_locator.key_name_mut().append("b");
        assert_ne!(key_locator.change_count(), before);
    }

    #[test]
    fn test_wire_round_trip() {
        let key_locator = KeyLocator::from_key_name(Name::from_uri("/k").unwrap());
        let encoding = key_locator.wire_encode().unwrap();
        assert_eq!(encoding.as_slice(), &[0x1C, 0x05, 0x07, 0x03, 0x08, 0x01, b'k']);

        let mut decoded = KeyLocator::new();
        decoded.wire_decode(&encoding).unwrap();
        assert_eq!(decoded, key_locator);
    }

    #[test]
    fn test_digest_and_name_together_is_an_error() {
        let input = [
            0x1C, 0x08, 0x1D, 0x01, 0xAA, 0x07, 0x03, 0x08, 0x01, b'k',
        ];
        let mut key_locator = KeyLocator::from_key_digest(vec![7]);
        assert!(key_locator.wire_decode(&input).unwrap_err().is_format());
        assert_eq!(key_locator.key_digest().unwrap().as_slice(), &[7]);
    }
}
