use core::cmp::Ordering;

use crate::error::{Error, Result};
use crate::tlv::tlv_types;

/// Length of a SHA-256 digest, the only valid implicit digest component size.
pub const SHA256_DIGEST_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameComponentType {
    #[default]
    Generic,
    ImplicitSha256Digest,
}

impl NameComponentType {
    pub const fn tlv_type(self) -> u64 {
        match self {
            NameComponentType::Generic => tlv_types::NAME_COMPONENT,
            NameComponentType::ImplicitSha256Digest => tlv_types::IMPLICIT_SHA256_DIGEST_COMPONENT,
        }
    }

    pub const fn from_tlv_type(type_: u64) -> Option<Self> {
        match type_ {
            tlv_types::NAME_COMPONENT => Some(NameComponentType::Generic),
            tlv_types::IMPLICIT_SHA256_DIGEST_COMPONENT => {
                Some(NameComponentType::ImplicitSha256Digest)
            }
            _ => None,
        }
    }
}

/// A name component that borrows its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NameComponentLite<'a> {
    value: &'a [u8],
    component_type: NameComponentType,
}

impl<'a> NameComponentLite<'a> {
    pub const fn new(value: &'a [u8]) -> Self {
        Self {
            value,
            component_type: NameComponentType::Generic,
        }
    }

    pub fn implicit_sha256_digest(digest: &'a [u8]) -> Result<Self> {
        if digest.len() != SHA256_DIGEST_SIZE {
            return Err(Error::InvalidLength {
                type_: tlv_types::IMPLICIT_SHA256_DIGEST_COMPONENT,
                length: digest.len(),
            });
        }
        Ok(Self {
            value: digest,
            component_type: NameComponentType::ImplicitSha256Digest,
        })
    }

    pub(crate) fn from_tlv(type_: u64, value: &'a [u8]) -> Result<Self> {
        match NameComponentType::from_tlv_type(type_) {
            Some(NameComponentType::Generic) => Ok(Self::new(value)),
            Some(NameComponentType::ImplicitSha256Digest) => Self::implicit_sha256_digest(value),
            None => Err(Error::UnexpectedType {
                expected: tlv_types::NAME_COMPONENT,
                actual: type_,
            }),
        }
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    pub fn component_type(&self) -> NameComponentType {
        self.component_type
    }

    pub fn is_implicit_sha256_digest(&self) -> bool {
        self.component_type == NameComponentType::ImplicitSha256Digest
    }
}

impl Ord for NameComponentLite<'_> {
    /// Canonical NDN order: component type, then length, then bytes.
    fn cmp(&self, other: &Self) -> Ordering {
        self.component_type
            .tlv_type()
            .cmp(&other.component_type.tlv_type())
            .then(self.value.len().cmp(&other.value.len()))
            .then_with(|| self.value.cmp(other.value))
    }
}

impl PartialOrd for NameComponentLite<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A name whose components live in caller-supplied storage.
///
/// The lite name tracks how many slots of `components` are in use and never
/// grows beyond the slice it was given.
#[derive(Debug)]
pub struct NameLite<'a, 's> {
    components: &'s mut [NameComponentLite<'a>],
    n_components: usize,
}

impl<'a, 's> NameLite<'a, 's> {
    /// An empty name over `storage`. `storage.len()` is the capacity.
    pub fn new(storage: &'s mut [NameComponentLite<'a>]) -> Self {
        Self {
            components: storage,
            n_components: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.components.len()
    }

    pub fn len(&self) -> usize {
        self.n_components
    }

    pub fn is_empty(&self) -> bool {
        self.n_components == 0
    }

    pub fn get(&self, index: usize) -> Option<&NameComponentLite<'a>> {
        self.components().get(index)
    }

    pub fn components(&self) -> &[NameComponentLite<'a>] {
        &self.components[..self.n_components]
    }

    pub fn clear(&mut self) {
        self.n_components = 0;
    }

    pub fn append(&mut self, value: &'a [u8]) -> Result<()> {
        self.append_component(NameComponentLite::new(value))
    }

    pub fn append_component(&mut self, component: NameComponentLite<'a>) -> Result<()> {
        let capacity = self.components.len();
        let slot = self
            .components
            .get_mut(self.n_components)
            .ok_or(Error::CapacityExceeded { capacity })?;
        *slot = component;
        self.n_components += 1;
        Ok(())
    }

    /// Replace the components with `components`, failing without any change
    /// if they do not fit.
    pub fn set_components(&mut self, components: &[NameComponentLite<'a>]) -> Result<()> {
        if components.len() > self.components.len() {
            return Err(Error::CapacityExceeded {
                capacity: self.components.len(),
            });
        }
        self.components[..components.len()].copy_from_slice(components);
        self.n_components = components.len();
        Ok(())
    }

    /// Copy `other` into this name's own storage.
    pub fn set(&mut self, other: &NameLite<'a, '_>) -> Result<()> {
        self.set_components(other.components())
    }

    /// Remove the final `count` components (or all of them).
    pub fn truncate(&mut self, count: usize) {
        self.n_components -= count.min(self.n_components);
    }

    pub fn is_prefix_of(&self, other: &NameLite<'_, '_>) -> bool {
        self.len() <= other.len()
            && self
                .components()
                .iter()
                .zip(other.components())
                .all(|(a, b)| a == b)
    }

    /// Compare components in canonical order; a proper prefix sorts first.
    pub fn compare(&self, other: &NameLite<'_, '_>) -> Ordering {
        for (a, b) in self.components().iter().zip(other.components()) {
            let ordering = a.cmp(b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        self.len().cmp(&other.len())
    }
}

impl PartialEq<NameLite<'_, '_>> for NameLite<'_, '_> {
    fn eq(&self, other: &NameLite<'_, '_>) -> bool {
        self.components() == other.components()
    }
}
