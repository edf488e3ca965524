use crate::error::{check_capacity, Error, Result};
use crate::exclude::{ExcludeEntryLite, ExcludeLite};
use crate::key_locator::KeyLocatorLite;
use crate::name::{NameComponentLite, NameLite};
use crate::tlv::tlv_types;

/// Size of an Interest nonce.
pub const NONCE_SIZE: usize = 4;

/// An Interest whose name, exclude and key name live in caller-supplied
/// storage. Byte fields borrow from the packet buffer.
#[derive(Debug)]
pub struct InterestLite<'a, 's> {
    name: NameLite<'a, 's>,
    min_suffix_components: Option<u64>,
    max_suffix_components: Option<u64>,
    key_locator: KeyLocatorLite<'a, 's>,
    exclude: ExcludeLite<'a, 's>,
    child_selector: Option<u64>,
    must_be_fresh: bool,
    scope: Option<u64>,
    interest_lifetime_ms: Option<u64>,
    nonce: Option<&'a [u8]>,
}

impl<'a, 's> InterestLite<'a, 's> {
    pub fn new(
        name_storage: &'s mut [NameComponentLite<'a>],
        exclude_storage: &'s mut [ExcludeEntryLite<'a>],
        key_name_storage: &'s mut [NameComponentLite<'a>],
    ) -> Self {
        Self {
            name: NameLite::new(name_storage),
            min_suffix_components: None,
            max_suffix_components: None,
            key_locator: KeyLocatorLite::new(key_name_storage),
            exclude: ExcludeLite::new(exclude_storage),
            child_selector: None,
            must_be_fresh: true,
            scope: None,
            interest_lifetime_ms: None,
            nonce: None,
        }
    }

    pub fn name(&self) -> &NameLite<'a, 's> {
        &self.name
    }

    pub fn name_mut(&mut self) -> &mut NameLite<'a, 's> {
        &mut self.name
    }

    pub fn min_suffix_components(&self) -> Option<u64> {
        self.min_suffix_components
    }

    pub fn set_min_suffix_components(&mut self, value: Option<u64>) -> &mut Self {
        self.min_suffix_components = value;
        self
    }

    pub fn max_suffix_components(&self) -> Option<u64> {
        self.max_suffix_components
    }

    pub fn set_max_suffix_components(&mut self, value: Option<u64>) -> &mut Self {
        self.max_suffix_components = value;
        self
    }

    pub fn key_locator(&self) -> &KeyLocatorLite<'a, 's> {
        &self.key_locator
    }

    pub fn key_locator_mut(&mut self) -> &mut KeyLocatorLite<'a, 's> {
        &mut self.key_locator
    }

    pub fn exclude(&self) -> &ExcludeLite<'a, 's> {
        &self.exclude
    }

    pub fn exclude_mut(&mut self) -> &mut ExcludeLite<'a, 's> {
        &mut self.exclude
    }

    pub fn child_selector(&self) -> Option<u64> {
        self.child_selector
    }

    pub fn set_child_selector(&mut self, value: Option<u64>) -> &mut Self {
        self.child_selector = value;
        self
    }

    pub fn must_be_fresh(&self) -> bool {
        self.must_be_fresh
    }

    pub fn set_must_be_fresh(&mut self, must_be_fresh: bool) -> &mut Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    pub fn scope(&self) -> Option<u64> {
        self.scope
    }

    pub fn set_scope(&mut self, value: Option<u64>) -> &mut Self {
        self.scope = value;
        self
    }

    pub fn interest_lifetime_ms(&self) -> Option<u64> {
        self.interest_lifetime_ms
    }

    pub fn set_interest_lifetime_ms(&mut self, value: Option<u64>) -> &mut Self {
        self.interest_lifetime_ms = value;
        self
    }

    pub fn nonce(&self) -> Option<&'a [u8]> {
        self.nonce
    }

    /// A nonce is exactly [`NONCE_SIZE`] bytes. The lite layer has no change
    /// tracking; the caller owns nonce hygiene.
    pub fn set_nonce(&mut self, nonce: Option<&'a [u8]>) -> Result<&mut Self> {
        if let Some(nonce) = nonce {
            if nonce.len() != NONCE_SIZE {
                return Err(Error::InvalidLength {
                    type_: tlv_types::NONCE,
                    length: nonce.len(),
                });
            }
        }
        self.nonce = nonce;
        Ok(self)
    }

    /// Reset every field to its value in a newly constructed Interest.
    pub fn clear(&mut self) {
        self.name.clear();
        self.min_suffix_components = None;
        self.max_suffix_components = None;
        self.key_locator.clear();
        self.exclude.clear();
        self.child_selector = None;
        self.must_be_fresh = true;
        self.scope = None;
        self.interest_lifetime_ms = None;
        self.nonce = None;
    }

    /// Copy `other` into this Interest's own storage. On a capacity error
    /// nothing is copied.
    pub fn set(&mut self, other: &InterestLite<'a, '_>) -> Result<()> {
        check_capacity(other.name.len(), self.name.capacity())?;
        check_capacity(other.exclude.len(), self.exclude.capacity())?;
        self.key_locator.check_fits(&other.key_locator)?;

        self.name.set(&other.name)?;
        self.key_locator.set(&other.key_locator)?;
        self.exclude.set(&other.exclude)?;
        self.min_suffix_components = other.min_suffix_components;
        self.max_suffix_components = other.max_suffix_components;
        self.child_selector = other.child_selector;
        self.must_be_fresh = other.must_be_fresh;
        self.scope = other.scope;
        self.interest_lifetime_ms = other.interest_lifetime_ms;
        self.nonce = other.nonce;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interest_defaults() {
        let mut names = [NameComponentLite::default(); 4];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let interest = InterestLite::new(&mut names, &mut entries, &mut key_names);

        assert!(interest.name().is_empty());
        assert!(interest.must_be_fresh());
        assert_eq!(interest.scope(), None);
        assert_eq!(interest.nonce(), None);
    }

    #[test]
    fn test_set_copies_into_own_storage() {
        let mut names = [NameComponentLite::default(); 4];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let mut source = InterestLite::new(&mut names, &mut entries, &mut key_names);
        source.name_mut().append(b"ndn").unwrap();
        source.exclude_mut().append_any().unwrap();
        source
            .set_scope(Some(2))
            .set_must_be_fresh(false)
            .set_nonce(Some(&b"abab"[..]))
            .unwrap();

        let mut names2 = [NameComponentLite::default(); 1];
        let mut entries2 = [ExcludeEntryLite::default(); 1];
        let mut key_names2 = [NameComponentLite::default(); 1];
        let mut copy = InterestLite::new(&mut names2, &mut entries2, &mut key_names2);
        copy.set(&source).unwrap();

        assert_eq!(copy.name(), source.name());
        assert_eq!(copy.exclude().entries(), &[ExcludeEntryLite::Any]);
        assert_eq!(copy.scope(), Some(2));
        assert!(!copy.must_be_fresh());
        assert_eq!(copy.nonce(), Some(&b"abab"[..]));

        copy.clear();
        assert!(copy.name().is_empty());
        assert!(copy.must_be_fresh());
    }

    #[test]
    fn test_nonce_must_be_four_bytes() {
        let mut names = [NameComponentLite::default(); 1];
        let mut entries = [ExcludeEntryLite::default(); 1];
        let mut key_names = [NameComponentLite::default(); 1];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        interest.set_nonce(Some(&b"abab"[..])).unwrap();

        assert_eq!(
            interest.set_nonce(Some(&[1, 2][..])).unwrap_err(),
            Error::InvalidLength { type_: tlv_types::NONCE, length: 2 }
        );
        assert!(interest.set_nonce(Some(&[0; 5][..])).is_err());
        assert_eq!(interest.nonce(), Some(&b"abab"[..]));

        interest.set_nonce(None).unwrap();
        assert_eq!(interest.nonce(), None);
    }

    #[test]
    fn test_set_over_capacity_copies_nothing() {
        let mut names = [NameComponentLite::default(); 2];
        let mut entries = [ExcludeEntryLite::default(); 2];
        let mut key_names = [NameComponentLite::default(); 2];
        let mut source = InterestLite::new(&mut names, &mut entries, &mut key_names);
        source.name_mut().append(b"ndn").unwrap();
        source.exclude_mut().append_any().unwrap();
        source.key_locator_mut().key_name_mut().append(b"a").unwrap();
        source.key_locator_mut().key_name_mut().append(b"b").unwrap();
        source.set_scope(Some(2));

        let mut names2 = [NameComponentLite::default(); 2];
        let mut entries2 = [ExcludeEntryLite::default(); 2];
        let mut key_names2 = [NameComponentLite::default(); 1];
        let mut copy = InterestLite::new(&mut names2, &mut entries2, &mut key_names2);
        copy.name_mut().append(b"old").unwrap();
        copy.set_scope(Some(9));

        let error = copy.set(&source).unwrap_err();
        assert!(error.is_capacity());
        assert_eq!(copy.name().len(), 1);
        assert_eq!(copy.name().get(0).unwrap().value(), b"old");
        assert!(copy.exclude().is_empty());
        assert_eq!(copy.key_locator().locator_type(), None);
        assert_eq!(copy.scope(), Some(9));
    }
}
