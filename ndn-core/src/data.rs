use std::cell::Cell;

use ndn_lite::DataLite;
use sha2::{Digest, Sha256};

use crate::blob::{Blob, SignedBlob};
use crate::change_counter::{next_change_count, ChangeCounter, EncodingCache};
use crate::error::Result;
use crate::meta_info::MetaInfo;
use crate::name::Name;
use crate::signature::Signature;
use crate::wire_format::{default_wire_format, is_default_wire_format, WireFormat};

/// A Data packet.
#[derive(Debug, Clone, Default)]
pub struct Data {
    name: ChangeCounter<Name>,
    meta_info: ChangeCounter<MetaInfo>,
    content: Blob,
    signature: ChangeCounter<Signature>,
    change_count: Cell<u64>,
    default_wire_encoding: EncodingCache,
}

impl Data {
    pub fn new(name: Name) -> Self {
        let mut data = Self::default();
        data.set_name(name);
        data
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

    pub fn meta_info(&self) -> &MetaInfo {
        self.meta_info.get()
    }

    pub fn meta_info_mut(&mut self) -> &mut MetaInfo {
        self.meta_info.get_mut()
    }

    pub fn set_meta_info(&mut self, meta_info: MetaInfo) -> &mut Self {
        self.meta_info.set(meta_info);
        self
    }

    pub fn content(&self) -> &Blob {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<Blob>) -> &mut Self {
        self.content = content.into();
        self.set_changed();
        self
    }

    pub fn signature(&self) -> &Signature {
        self.signature.get()
    }

    pub fn signature_mut(&mut self) -> &mut Signature {
        self.signature.get_mut()
    }

    pub fn set_signature(&mut self, signature: Signature) -> &mut Self {
        self.signature.set(signature);
        self
    }

    pub fn change_count(&self) -> u64 {
        let changed = self.name.check_changed()
            | self.meta_info.check_changed()
            | self.signature.check_changed();
        if changed {
            self.set_changed();
        }
        self.change_count.get()
    }

    /// The name plus the implicit SHA-256 digest of the default wire
    /// encoding.
    pub fn full_name(&self) -> Result<Name> {
        let encoding = self.wire_encode()?;
        let digest = Sha256::digest(encoding.as_slice());
        let mut full_name = self.name().clone();
        full_name.append_implicit_sha256_digest(digest.to_vec())?;
        Ok(full_name)
    }

    /// The encoding in the default wire format from the last encode or
    /// decode, if nothing has changed since.
    pub fn default_wire_encoding(&self) -> Option<SignedBlob> {
        self.default_wire_encoding.get(self.change_count())
    }

    pub fn wire_encode(&self) -> Result<SignedBlob> {
        self.wire_encode_with(default_wire_format())
    }

    /// Encode with `wire_format`. The signed portion runs from the Name
    /// through SignatureInfo.
    pub fn wire_encode_with(&self, wire_format: &dyn WireFormat) -> Result<SignedBlob> {
        let use_cache = is_default_wire_format(wire_format);
        if use_cache {
            if let Some(encoding) = self.default_wire_encoding() {
                return Ok(encoding);
            }
        }
        let encoding = wire_format.encode_data(self)?;
        if use_cache {
            self.default_wire_encoding.set(encoding.clone(), self.change_count());
        }
        Ok(encoding)
    }

    pub fn wire_decode(&mut self, input: &[u8]) -> Result<()> {
        self.wire_decode_with(input, default_wire_format())
    }

    /// Replace every field from the Data TLV at the front of `input`. On
    /// failure the packet is unchanged.
    pub fn wire_decode_with(&mut self, input: &[u8], wire_format: &dyn WireFormat) -> Result<()> {
        let (signed_portion, consumed) = wire_format.decode_data(self, input)?;
        if is_default_wire_format(wire_format) {
            if let Some(encoding) = input.get(..consumed) {
                self.default_wire_encoding
                    .set(SignedBlob::new(Blob::new(encoding), signed_portion), self.change_count());
            }
        }
        Ok(())
    }

    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut DataLite<'a, '_>) -> ndn_lite::Result<()> {
        self.name.get().copy_to_lite(lite.name_mut())?;
        self.meta_info.get().copy_to_lite(lite.meta_info_mut())?;
        self.signature.get().copy_to_lite(lite.signature_mut())?;
        lite.set_content(&self.content);
        Ok(())
    }

    pub(crate) fn from_lite(lite: &DataLite<'_, '_>) -> Result<Self> {
        let mut data = Data::new(Name::from_lite(lite.name()));
        data.set_meta_info(MetaInfo::from_lite(lite.meta_info())?)
            .set_content(lite.content())
            .set_signature(Signature::from_lite(lite.signature())?);
        Ok(data)
    }

    fn set_changed(&self) {
        self.change_count.set(next_change_count());
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.meta_info() == other.meta_info()
            && self.content == other.content
            && self.signature() == other.signature()
    }
}

impl Eq for Data {}
