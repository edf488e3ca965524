use crate::error::{check_capacity, Result};
use crate::name::{NameComponentLite, NameLite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLocatorType {
    KeyName,
    KeyLocatorDigest,
}

/// A key locator whose key name components live in caller-supplied storage.
///
/// At most one of the key name and the key digest is populated; setting one
/// discards the other.
#[derive(Debug)]
pub struct KeyLocatorLite<'a, 's> {
    locator_type: Option<KeyLocatorType>,
    key_data: &'a [u8],
    key_name: NameLite<'a, 's>,
}

impl<'a, 's> KeyLocatorLite<'a, 's> {
    pub fn new(key_name_storage: &'s mut [NameComponentLite<'a>]) -> Self {
        Self {
            locator_type: None,
            key_data: &[],
            key_name: NameLite::new(key_name_storage),
        }
    }

    pub fn locator_type(&self) -> Option<KeyLocatorType> {
        self.locator_type
    }

    pub fn key_digest(&self) -> Option<&'a [u8]> {
        match self.locator_type {
            Some(KeyLocatorType::KeyLocatorDigest) => Some(self.key_data),
            _ => None,
        }
    }

    pub fn key_name(&self) -> Option<&NameLite<'a, 's>> {
        match self.locator_type {
            Some(KeyLocatorType::KeyName) => Some(&self.key_name),
            _ => None,
        }
    }

    /// The most key name components this locator can hold.
    pub fn key_name_capacity(&self) -> usize {
        self.key_name.capacity()
    }

    /// Switch to a key name locator (starting from an empty name if it was
    /// not one already) and return the name for editing.
    pub fn key_name_mut(&mut self) -> &mut NameLite<'a, 's> {
        if self.locator_type != Some(KeyLocatorType::KeyName) {
            self.locator_type = Some(KeyLocatorType::KeyName);
            self.key_data = &[];
            self.key_name.clear();
        }
        &mut self.key_name
    }

    pub fn set_key_digest(&mut self, digest: &'a [u8]) {
        self.locator_type = Some(KeyLocatorType::KeyLocatorDigest);
        self.key_data = digest;
        self.key_name.clear();
    }

    pub fn set_key_name(&mut self, name: &NameLite<'a, '_>) -> Result<()> {
        self.key_name.set(name)?;
        self.locator_type = Some(KeyLocatorType::KeyName);
        self.key_data = &[];
        Ok(())
    }

    /// Fail if `other` would not fit in this locator's storage.
    pub(crate) fn check_fits(&self, other: &KeyLocatorLite<'_, '_>) -> Result<()> {
        match other.locator_type {
            Some(KeyLocatorType::KeyName) => {
                check_capacity(other.key_name.len(), self.key_name.capacity())
            }
            _ => Ok(()),
        }
    }

    /// Copy `other`, including its key name components, into this locator.
    pub fn set(&mut self, other: &KeyLocatorLite<'a, '_>) -> Result<()> {
        match other.locator_type {
            Some(KeyLocatorType::KeyName) => self.set_key_name(&other.key_name),
            Some(KeyLocatorType::KeyLocatorDigest) => {
                self.set_key_digest(other.key_data);
                Ok(())
            }
            None => {
                self.clear();
                Ok(())
            }
        }
    }

    pub fn clear(&mut self) {
        self.locator_type = None;
        self.key_data = &[];
        self.key_name.clear();
    }
}
