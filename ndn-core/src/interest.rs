use std::cell::Cell;
use std::time::Duration;

use ndn_lite::{InterestLite, NONCE_SIZE};

use crate::blob::{Blob, SignedBlob};
use crate::change_counter::{next_change_count, ChangeCounter, EncodingCache};
use crate::error::{Error, Result};
use crate::exclude::Exclude;
use crate::key_locator::KeyLocator;
use crate::meta_info::duration_to_millis;
use crate::name::Name;
use crate::wire_format::{default_wire_format, is_default_wire_format, WireFormat};

/// An Interest packet.
///
/// Any change to a field other than the nonce, including edits made through
/// [`name_mut`](Self::name_mut) and the other child accessors, invalidates
/// the nonce and the cached wire encoding.
#[derive(Debug, Clone)]
pub struct Interest {
    name: ChangeCounter<Name>,
    min_suffix_components: Option<u64>,
    max_suffix_components: Option<u64>,
    key_locator: ChangeCounter<KeyLocator>,
    exclude: ChangeCounter<Exclude>,
    child_selector: Option<u64>,
    must_be_fresh: bool,
    scope: Option<u64>,
    interest_lifetime: Option<Duration>,
    nonce: Option<Blob>,
    nonce_change_count: u64,
    change_count: Cell<u64>,
    default_wire_encoding: EncodingCache,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        let mut interest = Self::default();
        interest.set_name(name);
        interest
    }

    pub fn name(&self) -> &Name {
        self.name.get()
    }

    pub fn name_mut(&mut self) -> &mut Name {
        self.name.get_mut()
    }

    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name.set(name);
        self
    }

    pub fn min_suffix_components(&self) -> Option<u64> {
        self.min_suffix_components
    }

    pub fn set_min_suffix_components(&mut self, min_suffix_components: Option<u64>) -> &mut Self {
        self.min_suffix_components = min_suffix_components;
        self.set_changed();
        self
    }

    pub fn max_suffix_components(&self) -> Option<u64> {
        self.max_suffix_components
    }

    pub fn set_max_suffix_components(&mut self, max_suffix_components: Option<u64>) -> &mut Self {
        self.max_suffix_components = max_suffix_components;
        self.set_changed();
        self
    }

    /// The PublisherPublicKeyLocator selector.
    pub fn key_locator(&self) -> &KeyLocator {
        self.key_locator.get()
    }

    pub fn key_locator_mut(&mut self) -> &mut KeyLocator {
        self.key_locator.get_mut()
    }

    pub fn set_key_locator(&mut self, key_locator: KeyLocator) -> &mut Self {
        self.key_locator.set(key_locator);
        self
    }

    pub fn exclude(&self) -> &Exclude {
        self.exclude.get()
    }

    pub fn exclude_mut(&mut self) -> &mut Exclude {
        self.exclude.get_mut()
    }

    pub fn set_exclude(&mut self, exclude: Exclude) -> &mut Self {
        self.exclude.set(exclude);
        self
    }

    pub fn child_selector(&self) -> Option<u64> {
        self.child_selector
    }

    pub fn set_child_selector(&mut self, child_selector: Option<u64>) -> &mut Self {
        self.child_selector = child_selector;
        self.set_changed();
        self
    }

    pub fn must_be_fresh(&self) -> bool {
        self.must_be_fresh
    }

    pub fn set_must_be_fresh(&mut self, must_be_fresh: bool) -> &mut Self {
        self.must_be_fresh = must_be_fresh;
        self.set_changed();
        self
    }

    pub fn scope(&self) -> Option<u64> {
        self.scope
    }

    pub fn set_scope(&mut self, scope: Option<u64>) -> &mut Self {
        self.scope = scope;
        self.set_changed();
        self
    }

    pub fn interest_lifetime(&self) -> Option<Duration> {
        self.interest_lifetime
    }

    /// Carried on the wire in whole milliseconds.
    pub fn set_interest_lifetime(&mut self, interest_lifetime: Option<Duration>) -> &mut Self {
        self.interest_lifetime = interest_lifetime;
        self.set_changed();
        self
    }

    /// The nonce, unless some other field changed after it was set.
    pub fn nonce(&self) -> Option<&Blob> {
        if self.nonce_change_count == self.change_count() {
            self.nonce.as_ref()
        } else {
            None
        }
    }

    /// Fails with a format error unless the nonce is [`NONCE_SIZE`] bytes.
    pub fn set_nonce(&mut self, nonce: Option<Blob>) -> Result<&mut Self> {
        if let Some(nonce) = &nonce {
            if nonce.len() != NONCE_SIZE {
                return Err(Error::Format(ndn_lite::Error::InvalidLength {
                    type_: ndn_lite::tlv_types::NONCE,
                    length: nonce.len(),
                }));
            }
        }
        Ok(self.store_nonce(nonce))
    }

    fn store_nonce(&mut self, nonce: Option<Blob>) -> &mut Self {
        self.nonce = nonce;
        self.set_changed();
        self.nonce_change_count = self.change_count();
        self
    }

    /// Set a random nonce that differs from the current one.
    pub fn refresh_nonce(&mut self) -> &mut Self {
        let current = self.nonce().cloned();
        let nonce = loop {
            let candidate: [u8; NONCE_SIZE] = rand::random();
            if current.as_deref() != Some(&candidate[..]) {
                break candidate;
            }
        };
        self.store_nonce(Some(Blob::from(nonce)))
    }

    /// Whether a Data packet named `name` can satisfy this Interest. The
    /// suffix bounds count the implicit digest component as well.
    pub fn matches_name(&self, name: &Name) -> bool {
        let prefix = self.name();
        if !prefix.is_prefix_of(name) {
            return false;
        }
        let suffix_components = (name.len() + 1 - prefix.len()) as u64;
        if self.min_suffix_components.is_some_and(|min| suffix_components < min) {
            return false;
        }
        if self.max_suffix_components.is_some_and(|max| suffix_components > max) {
            return false;
        }
        match name.get(prefix.len()) {
            Some(component) => !self.exclude().matches(component),
            None => true,
        }
    }

    pub fn change_count(&self) -> u64 {
        let changed = self.name.check_changed()
            | self.key_locator.check_changed()
            | self.exclude.check_changed();
        if changed {
            self.set_changed();
        }
        self.change_count.get()
    }

    /// The encoding in the default wire format from the last encode or
    /// decode, if nothing has changed since.
    pub fn default_wire_encoding(&self) -> Option<SignedBlob> {
        self.default_wire_encoding.get(self.change_count())
    }

    pub fn wire_encode(&self) -> Result<SignedBlob> {
        self.wire_encode_with(default_wire_format())
    }

    /// Encode with `wire_format`. Encodings in the default format are cached
    /// until the next change.
    pub fn wire_encode_with(&self, wire_format: &dyn WireFormat) -> Result<SignedBlob> {
        let use_cache = is_default_wire_format(wire_format);
        if use_cache {
            if let Some(encoding) = self.default_wire_encoding() {
                return Ok(encoding);
            }
        }
        let encoding = wire_format.encode_interest(self)?;
        if use_cache {
            self.default_wire_encoding.set(encoding.clone(), self.change_count());
        }
        Ok(encoding)
    }

    pub fn wire_decode(&mut self, input: &[u8]) -> Result<()> {
        self.wire_decode_with(input, default_wire_format())
    }

    /// Replace every field from the Interest TLV at the front of `input`.
    /// On failure the Interest is unchanged.
    pub fn wire_decode_with(&mut self, input: &[u8], wire_format: &dyn WireFormat) -> Result<()> {
        let (signed_portion, consumed) = wire_format.decode_interest(self, input)?;
        if is_default_wire_format(wire_format) {
            if let Some(encoding) = input.get(..consumed) {
                self.default_wire_encoding
                    .set(SignedBlob::new(Blob::new(encoding), signed_portion), self.change_count());
            }
        }
        Ok(())
    }

    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut InterestLite<'a, '_>) -> ndn_lite::Result<()> {
        self.name.get().copy_to_lite(lite.name_mut())?;
        self.key_locator.get().copy_to_lite(lite.key_locator_mut())?;
        self.exclude.get().copy_to_lite(lite.exclude_mut())?;
        lite.set_min_suffix_components(self.min_suffix_components)
            .set_max_suffix_components(self.max_suffix_components)
            .set_child_selector(self.child_selector)
            .set_must_be_fresh(self.must_be_fresh)
            .set_scope(self.scope)
            .set_interest_lifetime_ms(self.interest_lifetime.map(duration_to_millis));
        lite.set_nonce(self.nonce().map(|nonce| nonce.as_slice()))?;
        Ok(())
    }

    pub(crate) fn from_lite(lite: &InterestLite<'_, '_>) -> Self {
        let mut interest = Interest::new(Name::from_lite(lite.name()));
        interest
            .set_min_suffix_components(lite.min_suffix_components())
            .set_max_suffix_components(lite.max_suffix_components())
            .set_key_locator(KeyLocator::from_lite(lite.key_locator()))
            .set_exclude(Exclude::from_lite(lite.exclude()))
            .set_child_selector(lite.child_selector())
            .set_must_be_fresh(lite.must_be_fresh())
            .set_scope(lite.scope())
            .set_interest_lifetime(lite.interest_lifetime_ms().map(Duration::from_millis));
        // Last, so that no other setter invalidates it.
        interest.store_nonce(lite.nonce().map(Blob::new));
        interest
    }

    fn set_changed(&self) {
        self.change_count.set(next_change_count());
    }
}

impl Default for Interest {
    fn default() -> Self {
        Self {
            name: ChangeCounter::default(),
            min_suffix_components: None,
            max_suffix_components: None,
            key_locator: ChangeCounter::default(),
            exclude: ChangeCounter::default(),
            child_selector: None,
            must_be_fresh: true,
            scope: None,
            interest_lifetime: None,
            nonce: None,
            nonce_change_count: 0,
            change_count: Cell::new(0),
            default_wire_encoding: EncodingCache::default(),
        }
    }
}

impl PartialEq for Interest {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.min_suffix_components == other.min_suffix_components
            && self.max_suffix_components == other.max_suffix_components
            && self.key_locator() == other.key_locator()
            && self.exclude() == other.exclude()
            && self.child_selector == other.child_selector
            && self.must_be_fresh == other.must_be_fresh
            && self.scope == other.scope
            && self.interest_lifetime == other.interest_lifetime
            && self.nonce() == other.nonce()
    }
}

impl Eq for Interest {}
