//! Pluggable packet encodings.
//!
//! Packet types never encode themselves. They hand their fields to a
//! [`WireFormat`], either one passed explicitly or the process default.
//! [`TlvWireFormat`] implements NDN-TLV by building borrowed lite views of
//! the packet and running the `ndn-lite` codec over them.

use std::fmt;
use std::sync::OnceLock;

use log::info;
use ndn_lite::{
    DataLite, ExcludeEntryLite, ExcludeLite, InterestLite, KeyLocatorLite, MetaInfoLite,
    NameComponentLite, NameLite, SignatureLite, SignedPortion, TlvEncoder, TlvRevision,
    TlvWireFormatLite,
};

use crate::blob::{Blob, SignedBlob};
use crate::data::Data;
use crate::error::{Error, Result};
use crate::exclude::Exclude;
use crate::interest::Interest;
use crate::key_locator::KeyLocator;
use crate::meta_info::MetaInfo;
use crate::name::Name;
use crate::signature::Signature;

/// An encoding of packets and their fields.
///
/// Every method has a default that fails with [`Error::Unimplemented`], so a
/// format only implements what it supports. Decoders replace their target
/// only on success and return the number of bytes consumed.
pub trait WireFormat: Send + Sync + fmt::Debug {
    fn encode_name(&self, _name: &Name) -> Result<Blob> {
        Err(Error::Unimplemented("encode_name"))
    }

    fn decode_name(&self, _name: &mut Name, _input: &[u8]) -> Result<usize> {
        Err(Error::Unimplemented("decode_name"))
    }

    fn encode_exclude(&self, _exclude: &Exclude) -> Result<Blob> {
        Err(Error::Unimplemented("encode_exclude"))
    }

    fn decode_exclude(&self, _exclude: &mut Exclude, _input: &[u8]) -> Result<usize> {
        Err(Error::Unimplemented("decode_exclude"))
    }

    /// Encode `key_locator` as a TLV of `type_`.
    fn encode_key_locator(&self, _type_: u64, _key_locator: &KeyLocator) -> Result<Blob> {
        Err(Error::Unimplemented("encode_key_locator"))
    }

    fn decode_key_locator(&self, _type_: u64, _key_locator: &mut KeyLocator, _input: &[u8]) -> Result<usize> {
        Err(Error::Unimplemented("decode_key_locator"))
    }

    fn encode_meta_info(&self, _meta_info: &MetaInfo) -> Result<Blob> {
        Err(Error::Unimplemented("encode_meta_info"))
    }

    fn decode_meta_info(&self, _meta_info: &mut MetaInfo, _input: &[u8]) -> Result<usize> {
        Err(Error::Unimplemented("decode_meta_info"))
    }

    fn encode_signature_info(&self, _signature: &Signature) -> Result<Blob> {
        Err(Error::Unimplemented("encode_signature_info"))
    }

    fn encode_signature_value(&self, _signature: &Signature) -> Result<Blob> {
        Err(Error::Unimplemented("encode_signature_value"))
    }

    fn decode_signature_info_and_value(
        &self,
        _signature: &mut Signature,
        _info: &[u8],
        _value: Option<&[u8]>,
    ) -> Result<()> {
        Err(Error::Unimplemented("decode_signature_info_and_value"))
    }

    /// Encode `interest`, reporting the bytes a signed Interest signs.
    fn encode_interest(&self, _interest: &Interest) -> Result<SignedBlob> {
        Err(Error::Unimplemented("encode_interest"))
    }

    /// Returns the signed portion, as offsets into `input`, and the bytes
    /// consumed.
    fn decode_interest(&self, _interest: &mut Interest, _input: &[u8]) -> Result<(SignedPortion, usize)> {
        Err(Error::Unimplemented("decode_interest"))
    }

    fn encode_data(&self, _data: &Data) -> Result<SignedBlob> {
        Err(Error::Unimplemented("encode_data"))
    }

    fn decode_data(&self, _data: &mut Data, _input: &[u8]) -> Result<(SignedPortion, usize)> {
        Err(Error::Unimplemented("decode_data"))
    }
}

/// NDN-TLV as a [`WireFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TlvWireFormat {
    lite: TlvWireFormatLite,
}

/// NDN-TLV revision 0.1.
pub static TLV_WIRE_FORMAT_0_1: TlvWireFormat = TlvWireFormat::new(TlvRevision::V0_1);
/// NDN-TLV revision 0.1.1, the default.
pub static TLV_WIRE_FORMAT_0_1_1: TlvWireFormat = TlvWireFormat::new(TlvRevision::V0_1_1);

static DEFAULT_WIRE_FORMAT: OnceLock<&'static dyn WireFormat> = OnceLock::new();

/// Starting size of scratch lite storage when decoding.
const INITIAL_DECODE_CAPACITY: usize = 8;

/// The format used by every `wire_encode`/`wire_decode` call without an
/// explicit one. NDN-TLV 0.1.1 unless changed at startup.
pub fn default_wire_format() -> &'static dyn WireFormat {
    *DEFAULT_WIRE_FORMAT.get_or_init(|| &TLV_WIRE_FORMAT_0_1_1)
}

/// Select the process default. This succeeds once, and only before the
/// default has been used.
pub fn set_default_wire_format(wire_format: &'static dyn WireFormat) -> Result<()> {
    DEFAULT_WIRE_FORMAT
        .set(wire_format)
        .map_err(|_| Error::DefaultWireFormatAlreadySet)?;
    info!("Default wire format set to {:?}", wire_format);
    Ok(())
}

pub(crate) fn is_default_wire_format(wire_format: &dyn WireFormat) -> bool {
    std::ptr::addr_eq(wire_format, default_wire_format())
}

impl TlvWireFormat {
    pub const fn new(revision: TlvRevision) -> Self {
        Self {
            lite: TlvWireFormatLite::new(revision),
        }
    }

    pub fn revision(&self) -> TlvRevision {
        self.lite.revision()
    }

    /// The allocation-free codec behind this format.
    pub fn lite(&self) -> &TlvWireFormatLite {
        &self.lite
    }
}

impl WireFormat for TlvWireFormat {
    fn encode_name(&self, name: &Name) -> Result<Blob> {
        let mut storage = component_storage(name.len());
        let mut lite = NameLite::new(&mut storage);
        name.copy_to_lite(&mut lite)?;
        let (blob, _) = encode_to_blob(|encoder| self.lite.encode_name(&lite, encoder))?;
        Ok(blob)
    }

    fn decode_name(&self, name: &mut Name, input: &[u8]) -> Result<usize> {
        decode_with_storage(input, |capacity| {
            let mut storage = component_storage(capacity);
            let mut lite = NameLite::new(&mut storage);
            let (_, consumed) = self.lite.decode_name(&mut lite, input)?;
            *name = Name::from_lite(&lite);
            Ok(consumed)
        })
    }

    fn encode_exclude(&self, exclude: &Exclude) -> Result<Blob> {
        let mut storage = vec![ExcludeEntryLite::default(); exclude.len()];
        let mut lite = ExcludeLite::new(&mut storage);
        exclude.copy_to_lite(&mut lite)?;
        let (blob, _) = encode_to_blob(|encoder| self.lite.encode_exclude(&lite, encoder))?;
        Ok(blob)
    }

    fn decode_exclude(&self, exclude: &mut Exclude, input: &[u8]) -> Result<usize> {
        decode_with_storage(input, |capacity| {
            let mut storage = vec![ExcludeEntryLite::default(); capacity];
            let mut lite = ExcludeLite::new(&mut storage);
            let consumed = self.lite.decode_exclude(&mut lite, input)?;
            *exclude = Exclude::from_lite(&lite);
            Ok(consumed)
        })
    }

    fn encode_key_locator(&self, type_: u64, key_locator: &KeyLocator) -> Result<Blob> {
        let mut storage = component_storage(key_locator.key_name().len());
        let mut lite = KeyLocatorLite::new(&mut storage);
        key_locator.copy_to_lite(&mut lite)?;
        let (blob, _) =
            encode_to_blob(|encoder| self.lite.encode_key_locator(type_, &lite, encoder))?;
        Ok(blob)
    }

    fn decode_key_locator(&self, type_: u64, key_locator: &mut KeyLocator, input: &[u8]) -> Result<usize> {
        decode_with_storage(input, |capacity| {
            let mut storage = component_storage(capacity);
            let mut lite = KeyLocatorLite::new(&mut storage);
            let consumed = self.lite.decode_key_locator(type_, &mut lite, input)?;
            *key_locator = KeyLocator::from_lite(&lite);
            Ok(consumed)
        })
    }

    fn encode_meta_info(&self, meta_info: &MetaInfo) -> Result<Blob> {
        let mut lite = MetaInfoLite::new();
        meta_info.copy_to_lite(&mut lite)?;
        let (blob, _) = encode_to_blob(|encoder| self.lite.encode_meta_info(&lite, encoder))?;
        Ok(blob)
    }

    fn decode_meta_info(&self, meta_info: &mut MetaInfo, input: &[u8]) -> Result<usize> {
        let mut lite = MetaInfoLite::new();
        let consumed = self.lite.decode_meta_info(&mut lite, input)?;
        *meta_info = MetaInfo::from_lite(&lite)?;
        Ok(consumed)
    }

    fn encode_signature_info(&self, signature: &Signature) -> Result<Blob> {
        let mut storage = component_storage(signature.key_locator().key_name().len());
        let mut lite = SignatureLite::new(&mut storage);
        signature.copy_to_lite(&mut lite)?;
        let (blob, _) = encode_to_blob(|encoder| self.lite.encode_signature_info(&lite, encoder))?;
        Ok(blob)
    }

    fn encode_signature_value(&self, signature: &Signature) -> Result<Blob> {
        let mut storage = component_storage(signature.key_locator().key_name().len());
        let mut lite = SignatureLite::new(&mut storage);
        signature.copy_to_lite(&mut lite)?;
        let (blob, _) = encode_to_blob(|encoder| self.lite.encode_signature_value(&lite, encoder))?;
        Ok(blob)
    }

    fn decode_signature_info_and_value(
        &self,
        signature: &mut Signature,
        info: &[u8],
        value: Option<&[u8]>,
    ) -> Result<()> {
        decode_with_storage(info, |capacity| {
            let mut storage = component_storage(capacity);
            let mut lite = SignatureLite::new(&mut storage);
            self.lite.decode_signature_info(&mut lite, info)?;
            if let Some(value) = value {
                self.lite.decode_signature_value(&mut lite, value)?;
            }
            *signature = Signature::from_lite(&lite)?;
            Ok(())
        })
    }

    fn encode_interest(&self, interest: &Interest) -> Result<SignedBlob> {
        let mut name_storage = component_storage(interest.name().len());
        let mut exclude_storage = vec![ExcludeEntryLite::default(); interest.exclude().len()];
        let mut key_name_storage = component_storage(interest.key_locator().key_name().len());
        let mut lite = InterestLite::new(&mut name_storage, &mut exclude_storage, &mut key_name_storage);
        interest.copy_to_lite(&mut lite)?;
        let (blob, signed_portion) =
            encode_to_blob(|encoder| self.lite.encode_interest(&lite, encoder))?;
        Ok(SignedBlob::new(blob, signed_portion))
    }

    fn decode_interest(&self, interest: &mut Interest, input: &[u8]) -> Result<(SignedPortion, usize)> {
        decode_with_storage(input, |capacity| {
            let mut name_storage = component_storage(capacity);
            let mut exclude_storage = vec![ExcludeEntryLite::default(); capacity];
            let mut key_name_storage = component_storage(capacity);
            let mut lite =
                InterestLite::new(&mut name_storage, &mut exclude_storage, &mut key_name_storage);
            let decoded = self.lite.decode_interest(&mut lite, input)?;
            *interest = Interest::from_lite(&lite);
            Ok(decoded)
        })
    }

    fn encode_data(&self, data: &Data) -> Result<SignedBlob> {
        let mut name_storage = component_storage(data.name().len());
        let mut key_name_storage =
            component_storage(data.signature().key_locator().key_name().len());
        let mut lite = DataLite::new(&mut name_storage, &mut key_name_storage);
        data.copy_to_lite(&mut lite)?;
        let (blob, signed_portion) = encode_to_blob(|encoder| self.lite.encode_data(&lite, encoder))?;
        Ok(SignedBlob::new(blob, signed_portion))
    }

    fn decode_data(&self, data: &mut Data, input: &[u8]) -> Result<(SignedPortion, usize)> {
        decode_with_storage(input, |capacity| {
            let mut name_storage = component_storage(capacity);
            let mut key_name_storage = component_storage(capacity);
            let mut lite = DataLite::new(&mut name_storage, &mut key_name_storage);
            let decoded = self.lite.decode_data(&mut lite, input)?;
            *data = Data::from_lite(&lite)?;
            Ok(decoded)
        })
    }
}

fn component_storage<'a>(len: usize) -> Vec<NameComponentLite<'a>> {
    vec![NameComponentLite::default(); len]
}

/// Run `encode` once to size the output and once to fill it.
fn encode_to_blob<T>(
    mut encode: impl FnMut(&mut TlvEncoder<'_>) -> ndn_lite::Result<T>,
) -> Result<(Blob, T)> {
    let mut counter = TlvEncoder::counting();
    encode(&mut counter)?;
    let mut buffer = vec![0u8; counter.offset()];
    let result = encode(&mut TlvEncoder::new(&mut buffer))?;
    Ok((Blob::from(buffer), result))
}

/// Run `decode` with scratch storage of the given capacity, doubling it
/// while the input does not fit. Each component or entry takes at least two
/// bytes, which bounds the capacity ever needed.
fn decode_with_storage<T>(input: &[u8], mut decode: impl FnMut(usize) -> Result<T>) -> Result<T> {
    let limit = input.len() / 2 + 1;
    let mut capacity = INITIAL_DECODE_CAPACITY.min(limit);
    loop {
        match decode(capacity) {
            Err(error) if error.is_capacity() && capacity < limit => {
                capacity = (capacity * 2).min(limit);
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NameOnly;

    impl WireFormat for NameOnly {
        fn encode_name(&self, name: &Name) -> Result<Blob> {
            Ok(Blob::from(name.to_uri().into_bytes()))
        }
    }

    #[test]
    fn test_default_is_tlv_0_1_1() {
        assert!(is_default_wire_format(&TLV_WIRE_FORMAT_0_1_1));
        assert!(!is_default_wire_format(&TLV_WIRE_FORMAT_0_1));
        assert_eq!(TLV_WIRE_FORMAT_0_1_1.revision(), TlvRevision::V0_1_1);
    }

    #[test]
    fn test_unimplemented_methods() {
        let name = Name::from_uri("/a/b").unwrap();
        assert_eq!(name.wire_encode_with(&NameOnly).unwrap().as_slice(), b"/a/b");

        let error = Interest::new(name).wire_encode_with(&NameOnly).unwrap_err();
        assert!(matches!(error, Error::Unimplemented("encode_interest")));
    }

    #[test]
    fn test_decode_storage_grows() {
        let mut name = Name::new();
        for i in 0..40u64 {
            name.append_segment(i);
        }
        let encoding = name.wire_encode().unwrap();

        let mut decoded = Name::new();
        decoded.wire_decode(&encoding).unwrap();
        assert_eq!(decoded, name);
    }

    #[test]
    fn test_format_errors_are_not_retried() {
        let mut name = Name::new();
        let error = name.wire_decode(&[0x07, 0x02, 0x08]).unwrap_err();
        assert!(error.is_format());
    }

    #[test]
    fn test_encode_to_blob_sizes_exactly() {
        let (blob, ()) = encode_to_blob(|encoder| encoder.write_blob_tlv(0x15, b"content")).unwrap();
        assert_eq!(blob.len(), 9);
        assert_eq!(&blob[..2], &[0x15, 0x07]);
    }
}
