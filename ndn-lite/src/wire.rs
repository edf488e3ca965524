//! The NDN-TLV codec over lite types.
//!
//! Encoders write into a [`TlvEncoder`] (which may only be counting) and
//! decoders borrow every byte field from the input buffer, so nothing here
//! allocates. Packet decoders reset their target on failure. Sub-field
//! decoders check the whole element, capacity included, before they write.

use core::ops::Range;

use crate::data::DataLite;
use crate::error::{Error, Result};
use crate::exclude::{ExcludeEntryLite, ExcludeLite};
use crate::interest::InterestLite;
use crate::key_locator::KeyLocatorLite;
use crate::meta_info::{ContentType, MetaInfoLite};
use crate::name::{NameComponentLite, NameComponentType, NameLite};
use crate::signature::{
    from_iso_string, to_iso_string, SignatureLite, SignatureType, ValidityPeriodLite,
};
use crate::tlv::{skip_unrecognized, tlv_types, var_number_size, TlvDecoder, TlvElement, TlvEncoder};

/// Revisions of the NDN-TLV packet format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlvRevision {
    V0_1,
    /// Adds the ValidityPeriod to SignatureInfo.
    V0_1_1,
}

impl TlvRevision {
    pub const fn supports_validity_period(self) -> bool {
        matches!(self, TlvRevision::V0_1_1)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TlvRevision::V0_1 => "0.1",
            TlvRevision::V0_1_1 => "0.1.1",
        }
    }
}

/// Offsets of the signed bytes within an encoded or decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignedPortion {
    pub begin: usize,
    pub end: usize,
}

impl SignedPortion {
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    fn offset_by(self, base: usize) -> Self {
        Self::new(self.begin + base, self.end + base)
    }
}

/// Recognized types seen so far in one container. Each may appear once.
#[derive(Debug, Default)]
struct SeenFields([u64; 4]);

impl SeenFields {
    fn mark(&mut self, type_: u64) -> Result<()> {
        let bit = 1u64 << (type_ % 64);
        if let Some(word) = self.0.get_mut((type_ / 64) as usize) {
            if *word & bit != 0 {
                return Err(Error::DuplicateField(type_));
            }
            *word |= bit;
        }
        Ok(())
    }
}

fn component_encoded_length(component: &NameComponentLite<'_>) -> usize {
    let length = component.value().len();
    var_number_size(component.component_type().tlv_type()) + var_number_size(length as u64) + length
}

fn write_component(component: &NameComponentLite<'_>, encoder: &mut TlvEncoder<'_>) -> Result<()> {
    encoder.write_blob_tlv(component.component_type().tlv_type(), component.value())
}

fn read_component<'a>(element: &TlvElement<'a>) -> Result<NameComponentLite<'a>> {
    NameComponentLite::from_tlv(element.type_, element.value)
}

/// Check that a Name value holds well-formed components, at most `capacity`
/// of them. Returns the offset of the last component.
fn scan_name_value(value: &[u8], capacity: usize) -> Result<usize> {
    let mut decoder = TlvDecoder::new(value);
    let mut count = 0;
    let mut last_begin = 0;
    while !decoder.is_empty() {
        last_begin = decoder.offset();
        read_component(&decoder.read_element()?)?;
        count += 1;
    }
    if count > capacity {
        return Err(Error::CapacityExceeded { capacity });
    }
    Ok(last_begin)
}

/// Fill `name` from a Name value. Returns the offsets, relative to `value`,
/// of every component but the last.
fn decode_name_value<'a>(name: &mut NameLite<'a, '_>, value: &'a [u8]) -> Result<SignedPortion> {
    let last_begin = scan_name_value(value, name.capacity())?;
    name.clear();
    for element in TlvDecoder::new(value) {
        name.append_component(read_component(&element?)?)?;
    }
    Ok(SignedPortion::new(0, last_begin))
}

fn read_exclude_entry<'a>(element: &TlvElement<'a>) -> Result<Option<ExcludeEntryLite<'a>>> {
    match element.type_ {
        tlv_types::ANY if element.value.is_empty() => Ok(Some(ExcludeEntryLite::Any)),
        tlv_types::ANY => Err(Error::InvalidLength {
            type_: tlv_types::ANY,
            length: element.value.len(),
        }),
        type_ if NameComponentType::from_tlv_type(type_).is_some() => {
            Ok(Some(ExcludeEntryLite::Component(read_component(element)?)))
        }
        _ => skip_unrecognized(element).map(|_| None),
    }
}

fn decode_exclude_value<'a>(exclude: &mut ExcludeLite<'a, '_>, value: &'a [u8]) -> Result<()> {
    let mut count = 0;
    for element in TlvDecoder::new(value) {
        if read_exclude_entry(&element?)?.is_some() {
            count += 1;
        }
    }
    if count > exclude.capacity() {
        return Err(Error::CapacityExceeded {
            capacity: exclude.capacity(),
        });
    }

    exclude.clear();
    for element in TlvDecoder::new(value) {
        if let Some(entry) = read_exclude_entry(&element?)? {
            exclude.append(entry)?;
        }
    }
    Ok(())
}

/// A checked KeyLocator value that has not been stored yet.
#[derive(Debug, Clone, Copy)]
enum KeyLocatorField<'a> {
    KeyName(&'a [u8]),
    KeyDigest(&'a [u8]),
}

fn scan_key_locator_value(value: &[u8], key_name_capacity: usize) -> Result<KeyLocatorField<'_>> {
    let mut field = None;
    for element in TlvDecoder::new(value) {
        let element = element?;
        match element.type_ {
            tlv_types::NAME | tlv_types::KEY_LOCATOR_DIGEST if field.is_some() => {
                return Err(Error::DuplicateField(element.type_));
            }
            tlv_types::NAME => {
                scan_name_value(element.value, key_name_capacity)?;
                field = Some(KeyLocatorField::KeyName(element.value));
            }
            tlv_types::KEY_LOCATOR_DIGEST => {
                field = Some(KeyLocatorField::KeyDigest(element.value));
            }
            _ => skip_unrecognized(&element)?,
        }
    }
    field.ok_or(Error::MissingRequiredField("KeyLocator name or digest"))
}

fn store_key_locator<'a>(key_locator: &mut KeyLocatorLite<'a, '_>, field: KeyLocatorField<'a>) -> Result<()> {
    match field {
        KeyLocatorField::KeyName(value) => {
            decode_name_value(key_locator.key_name_mut(), value)?;
        }
        KeyLocatorField::KeyDigest(digest) => key_locator.set_key_digest(digest),
    }
    Ok(())
}

/// Decode a KeyLocator value. `key_locator` changes only on success.
fn decode_key_locator_value<'a>(
    key_locator: &mut KeyLocatorLite<'a, '_>,
    value: &'a [u8],
) -> Result<()> {
    let field = scan_key_locator_value(value, key_locator.key_name_capacity())?;
    store_key_locator(key_locator, field)
}

fn decode_final_block_id(value: &[u8]) -> Result<NameComponentLite<'_>> {
    let mut decoder = TlvDecoder::new(value);
    let component = read_component(&decoder.read_element()?)?;
    if !decoder.is_empty() {
        return Err(Error::InvalidLength {
            type_: tlv_types::FINAL_BLOCK_ID,
            length: value.len(),
        });
    }
    Ok(component)
}

fn decode_validity_period_value(value: &[u8]) -> Result<ValidityPeriodLite> {
    let mut seen = SeenFields::default();
    let mut not_before = None;
    let mut not_after = None;
    for element in TlvDecoder::new(value) {
        let element = element?;
        match element.type_ {
            tlv_types::NOT_BEFORE => {
                seen.mark(element.type_)?;
                not_before = Some(from_iso_string(element.value)?);
            }
            tlv_types::NOT_AFTER => {
                seen.mark(element.type_)?;
                not_after = Some(from_iso_string(element.value)?);
            }
            _ => skip_unrecognized(&element)?,
        }
    }
    Ok(ValidityPeriodLite::new(
        not_before.ok_or(Error::MissingRequiredField("NotBefore"))?,
        not_after.ok_or(Error::MissingRequiredField("NotAfter"))?,
    ))
}

/// Read the outer element of `type_` and return it with the offset of its
/// value in `input` and the number of bytes it spans.
fn read_outer(input: &[u8], type_: u64) -> Result<(TlvElement<'_>, usize, usize)> {
    let mut decoder = TlvDecoder::new(input);
    let element = decoder.read_element_of_type(type_)?;
    let consumed = decoder.offset();
    Ok((element, consumed - element.value.len(), consumed))
}

/// The NDN-TLV codec for one format revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TlvWireFormatLite {
    revision: TlvRevision,
}

impl TlvWireFormatLite {
    pub const V0_1: Self = Self::new(TlvRevision::V0_1);
    pub const V0_1_1: Self = Self::new(TlvRevision::V0_1_1);

    pub const fn new(revision: TlvRevision) -> Self {
        Self { revision }
    }

    pub fn revision(&self) -> TlvRevision {
        self.revision
    }

    /// Write a Name TLV. The returned portion covers the Name value without
    /// its final component, the part a signed Interest signs.
    pub fn encode_name(&self, name: &NameLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<SignedPortion> {
        let length = name.components().iter().map(component_encoded_length).sum();
        encoder.write_type_and_length(tlv_types::NAME, length)?;
        let begin = encoder.offset();
        let mut end = begin;
        for component in name.components() {
            end = encoder.offset();
            write_component(component, encoder)?;
        }
        Ok(SignedPortion::new(begin, end))
    }

    /// Decode the Name TLV at the front of `input`. If the components do not
    /// fit, `name` is left untouched.
    pub fn decode_name<'a>(&self, name: &mut NameLite<'a, '_>, input: &'a [u8]) -> Result<(SignedPortion, usize)> {
        let (element, value_begin, consumed) = read_outer(input, tlv_types::NAME)?;
        let signed_portion = decode_name_value(name, element.value)?;
        Ok((signed_portion.offset_by(value_begin), consumed))
    }

    /// Write an Exclude TLV with its entries in their stored order.
    pub fn encode_exclude(&self, exclude: &ExcludeLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<()> {
        encoder.write_nested_tlv(tlv_types::EXCLUDE, false, |encoder| {
            for entry in exclude.entries() {
                match entry {
                    ExcludeEntryLite::Any => encoder.write_type_and_length(tlv_types::ANY, 0)?,
                    ExcludeEntryLite::Component(component) => write_component(component, encoder)?,
                }
            }
            Ok(())
        })
    }

    pub fn decode_exclude<'a>(&self, exclude: &mut ExcludeLite<'a, '_>, input: &'a [u8]) -> Result<usize> {
        let (element, _, consumed) = read_outer(input, tlv_types::EXCLUDE)?;
        decode_exclude_value(exclude, element.value)?;
        Ok(consumed)
    }

    /// Write `key_locator` as a TLV of `type_` (KeyLocator in SignatureInfo,
    /// PublisherPublicKeyLocator in Selectors). An empty locator writes
    /// nothing.
    pub fn encode_key_locator(
        &self,
        type_: u64,
        key_locator: &KeyLocatorLite<'_, '_>,
        encoder: &mut TlvEncoder<'_>,
    ) -> Result<()> {
        if let Some(digest) = key_locator.key_digest() {
            encoder.write_nested_tlv(type_, false, |encoder| {
                encoder.write_blob_tlv(tlv_types::KEY_LOCATOR_DIGEST, digest)
            })
        } else if let Some(key_name) = key_locator.key_name() {
            encoder.write_nested_tlv(type_, false, |encoder| {
                self.encode_name(key_name, encoder).map(|_| ())
            })
        } else {
            Ok(())
        }
    }

    pub fn decode_key_locator<'a>(
        &self,
        type_: u64,
        key_locator: &mut KeyLocatorLite<'a, '_>,
        input: &'a [u8],
    ) -> Result<usize> {
        let (element, _, consumed) = read_outer(input, type_)?;
        decode_key_locator_value(key_locator, element.value)?;
        Ok(consumed)
    }

    /// Write a MetaInfo TLV. The timestamp is not part of the wire format.
    pub fn encode_meta_info(&self, meta_info: &MetaInfoLite<'_>, encoder: &mut TlvEncoder<'_>) -> Result<()> {
        encoder.write_nested_tlv(tlv_types::META_INFO, false, |encoder| {
            if meta_info.content_type() != ContentType::Blob {
                encoder.write_non_negative_integer_tlv(
                    tlv_types::CONTENT_TYPE,
                    meta_info.content_type().code(),
                )?;
            }
            encoder.write_optional_non_negative_integer_tlv(
                tlv_types::FRESHNESS_PERIOD,
                meta_info.freshness_period_ms(),
            )?;
            if let Some(final_block_id) = meta_info.final_block_id() {
                encoder.write_nested_tlv(tlv_types::FINAL_BLOCK_ID, false, |encoder| {
                    write_component(&final_block_id, encoder)
                })?;
            }
            Ok(())
        })
    }

    pub fn decode_meta_info<'a>(&self, meta_info: &mut MetaInfoLite<'a>, input: &'a [u8]) -> Result<usize> {
        let (element, _, consumed) = read_outer(input, tlv_types::META_INFO)?;
        self.decode_meta_info_value(meta_info, element.value)?;
        Ok(consumed)
    }

    /// `target` changes only on success.
    fn decode_meta_info_value<'a>(&self, target: &mut MetaInfoLite<'a>, value: &'a [u8]) -> Result<()> {
        let mut meta_info = MetaInfoLite::new();
        let mut seen = SeenFields::default();
        for element in TlvDecoder::new(value) {
            let element = element?;
            match element.type_ {
                tlv_types::CONTENT_TYPE => {
                    seen.mark(element.type_)?;
                    let code = element.to_non_negative_integer()?;
                    meta_info.set_content_type(ContentType::from_code(code));
                }
                tlv_types::FRESHNESS_PERIOD => {
                    seen.mark(element.type_)?;
                    meta_info.set_freshness_period_ms(Some(element.to_non_negative_integer()?));
                }
                tlv_types::FINAL_BLOCK_ID => {
                    seen.mark(element.type_)?;
                    meta_info.set_final_block_id(Some(decode_final_block_id(element.value)?));
                }
                _ => skip_unrecognized(&element)?,
            }
        }
        *target = meta_info;
        Ok(())
    }

    /// Write a SignatureInfo TLV. The KeyLocator is written only for
    /// algorithms that use one; the ValidityPeriod only from revision 0.1.1.
    pub fn encode_signature_info(&self, signature: &SignatureLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<()> {
        let validity_period = match signature.validity_period() {
            Some(period) if self.revision.supports_validity_period() => {
                Some((to_iso_string(period.not_before)?, to_iso_string(period.not_after)?))
            }
            _ => None,
        };

        encoder.write_nested_tlv(tlv_types::SIGNATURE_INFO, false, |encoder| {
            let signature_type = signature.signature_type();
            encoder.write_non_negative_integer_tlv(tlv_types::SIGNATURE_TYPE, signature_type.code())?;
            if signature_type.uses_key_locator() {
                self.encode_key_locator(tlv_types::KEY_LOCATOR, signature.key_locator(), encoder)?;
            }
            if let Some((not_before, not_after)) = &validity_period {
                encoder.write_nested_tlv(tlv_types::VALIDITY_PERIOD, false, |encoder| {
                    encoder.write_blob_tlv(tlv_types::NOT_BEFORE, not_before)?;
                    encoder.write_blob_tlv(tlv_types::NOT_AFTER, not_after)
                })?;
            }
            Ok(())
        })
    }

    /// Write the SignatureValue TLV if the signature has bits, even empty ones.
    pub fn encode_signature_value(&self, signature: &SignatureLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<()> {
        encoder.write_optional_blob_tlv(tlv_types::SIGNATURE_VALUE, signature.signature())
    }

    /// Decode a SignatureInfo TLV into `signature`, leaving its bits alone.
    pub fn decode_signature_info<'a>(&self, signature: &mut SignatureLite<'a, '_>, input: &'a [u8]) -> Result<usize> {
        let (element, _, consumed) = read_outer(input, tlv_types::SIGNATURE_INFO)?;
        self.decode_signature_info_value(signature, element.value)?;
        Ok(consumed)
    }

    pub fn decode_signature_value<'a>(&self, signature: &mut SignatureLite<'a, '_>, input: &'a [u8]) -> Result<usize> {
        let (element, _, consumed) = read_outer(input, tlv_types::SIGNATURE_VALUE)?;
        signature.set_signature(Some(element.value));
        Ok(consumed)
    }

    /// Decode a SignatureInfo value. `signature` changes only on success.
    fn decode_signature_info_value<'a>(&self, signature: &mut SignatureLite<'a, '_>, value: &'a [u8]) -> Result<()> {
        let key_name_capacity = signature.key_locator().key_name_capacity();
        let mut seen = SeenFields::default();
        let mut signature_type = None;
        let mut key_locator = None;
        let mut validity_period = None;
        for element in TlvDecoder::new(value) {
            let element = element?;
            match element.type_ {
                tlv_types::SIGNATURE_TYPE => {
                    seen.mark(element.type_)?;
                    signature_type = Some(SignatureType::from_code(element.to_non_negative_integer()?)?);
                }
                tlv_types::KEY_LOCATOR => {
                    seen.mark(element.type_)?;
                    key_locator = Some(scan_key_locator_value(element.value, key_name_capacity)?);
                }
                tlv_types::VALIDITY_PERIOD if self.revision.supports_validity_period() => {
                    seen.mark(element.type_)?;
                    validity_period = Some(decode_validity_period_value(element.value)?);
                }
                _ => skip_unrecognized(&element)?,
            }
        }
        let signature_type = signature_type.ok_or(Error::MissingRequiredField("SignatureType"))?;

        match key_locator {
            Some(field) => store_key_locator(signature.key_locator_mut(), field)?,
            None => signature.key_locator_mut().clear(),
        }
        signature
            .set_signature_type(signature_type)
            .set_validity_period(validity_period);
        Ok(())
    }

    /// Write an Interest TLV. Absent fields are omitted, as is an empty
    /// Selectors block. A nonce is written only if one is set.
    pub fn encode_interest(&self, interest: &InterestLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<SignedPortion> {
        let mut counter = TlvEncoder::counting();
        self.encode_interest_value(interest, &mut counter)?;
        encoder.write_type_and_length(tlv_types::INTEREST, counter.offset())?;
        self.encode_interest_value(interest, encoder)
    }

    fn encode_interest_value(&self, interest: &InterestLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<SignedPortion> {
        let signed_portion = self.encode_name(interest.name(), encoder)?;
        encoder.write_nested_tlv(tlv_types::SELECTORS, true, |encoder| {
            self.encode_selectors_value(interest, encoder)
        })?;
        encoder.write_optional_blob_tlv(tlv_types::NONCE, interest.nonce())?;
        encoder.write_optional_non_negative_integer_tlv(tlv_types::SCOPE, interest.scope())?;
        encoder.write_optional_non_negative_integer_tlv(
            tlv_types::INTEREST_LIFETIME,
            interest.interest_lifetime_ms(),
        )?;
        Ok(signed_portion)
    }

    fn encode_selectors_value(&self, interest: &InterestLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<()> {
        encoder.write_optional_non_negative_integer_tlv(
            tlv_types::MIN_SUFFIX_COMPONENTS,
            interest.min_suffix_components(),
        )?;
        encoder.write_optional_non_negative_integer_tlv(
            tlv_types::MAX_SUFFIX_COMPONENTS,
            interest.max_suffix_components(),
        )?;
        self.encode_key_locator(
            tlv_types::PUBLISHER_PUBLIC_KEY_LOCATOR,
            interest.key_locator(),
            encoder,
        )?;
        if !interest.exclude().is_empty() {
            self.encode_exclude(interest.exclude(), encoder)?;
        }
        encoder.write_optional_non_negative_integer_tlv(
            tlv_types::CHILD_SELECTOR,
            interest.child_selector(),
        )?;
        if interest.must_be_fresh() {
            encoder.write_type_and_length(tlv_types::MUST_BE_FRESH, 0)?;
        }
        Ok(())
    }

    /// Decode the Interest TLV at the front of `input`, returning the signed
    /// portion (offsets into `input`) and the bytes consumed. Trailing bytes
    /// after the Interest are not examined. On failure `interest` is cleared.
    pub fn decode_interest<'a>(
        &self,
        interest: &mut InterestLite<'a, '_>,
        input: &'a [u8],
    ) -> Result<(SignedPortion, usize)> {
        let result = self.decode_interest_fields(interest, input);
        if result.is_err() {
            interest.clear();
        }
        result
    }

    fn decode_interest_fields<'a>(
        &self,
        interest: &mut InterestLite<'a, '_>,
        input: &'a [u8],
    ) -> Result<(SignedPortion, usize)> {
        let (element, value_begin, consumed) = read_outer(input, tlv_types::INTEREST)?;
        interest.clear();
        // On the wire MustBeFresh is the presence of its TLV.
        interest.set_must_be_fresh(false);

        let mut seen = SeenFields::default();
        let mut signed_portion = None;
        let mut decoder = TlvDecoder::new(element.value);
        while !decoder.is_empty() {
            let field = decoder.read_element()?;
            match field.type_ {
                tlv_types::NAME => {
                    seen.mark(field.type_)?;
                    let name_begin = value_begin + decoder.offset() - field.value.len();
                    let portion = decode_name_value(interest.name_mut(), field.value)?;
                    signed_portion = Some(portion.offset_by(name_begin));
                }
                tlv_types::SELECTORS => {
                    seen.mark(field.type_)?;
                    self.decode_selectors_value(interest, field.value)?;
                }
                tlv_types::NONCE => {
                    seen.mark(field.type_)?;
                    interest.set_nonce(Some(field.value))?;
                }
                tlv_types::SCOPE => {
                    seen.mark(field.type_)?;
                    interest.set_scope(Some(field.to_non_negative_integer()?));
                }
                tlv_types::INTEREST_LIFETIME => {
                    seen.mark(field.type_)?;
                    interest.set_interest_lifetime_ms(Some(field.to_non_negative_integer()?));
                }
                _ => skip_unrecognized(&field)?,
            }
        }

        let signed_portion = signed_portion.ok_or(Error::MissingRequiredField("Name"))?;
        Ok((signed_portion, consumed))
    }

    fn decode_selectors_value<'a>(&self, interest: &mut InterestLite<'a, '_>, value: &'a [u8]) -> Result<()> {
        let mut seen = SeenFields::default();
        for element in TlvDecoder::new(value) {
            let element = element?;
            match element.type_ {
                tlv_types::MIN_SUFFIX_COMPONENTS => {
                    seen.mark(element.type_)?;
                    interest.set_min_suffix_components(Some(element.to_non_negative_integer()?));
                }
                tlv_types::MAX_SUFFIX_COMPONENTS => {
                    seen.mark(element.type_)?;
                    interest.set_max_suffix_components(Some(element.to_non_negative_integer()?));
                }
                tlv_types::PUBLISHER_PUBLIC_KEY_LOCATOR => {
                    seen.mark(element.type_)?;
                    decode_key_locator_value(interest.key_locator_mut(), element.value)?;
                }
                tlv_types::EXCLUDE => {
                    seen.mark(element.type_)?;
                    decode_exclude_value(interest.exclude_mut(), element.value)?;
                }
                tlv_types::CHILD_SELECTOR => {
                    seen.mark(element.type_)?;
                    interest.set_child_selector(Some(element.to_non_negative_integer()?));
                }
                tlv_types::MUST_BE_FRESH => {
                    seen.mark(element.type_)?;
                    if !element.value.is_empty() {
                        return Err(Error::InvalidLength {
                            type_: tlv_types::MUST_BE_FRESH,
                            length: element.value.len(),
                        });
                    }
                    interest.set_must_be_fresh(true);
                }
                _ => skip_unrecognized(&element)?,
            }
        }
        Ok(())
    }

    /// Write a Data TLV. The returned portion runs from the start of the
    /// Name through the end of SignatureInfo.
    pub fn encode_data(&self, data: &DataLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<SignedPortion> {
        let mut counter = TlvEncoder::counting();
        self.encode_data_value(data, &mut counter)?;
        encoder.write_type_and_length(tlv_types::DATA, counter.offset())?;
        self.encode_data_value(data, encoder)
    }

    fn encode_data_value(&self, data: &DataLite<'_, '_>, encoder: &mut TlvEncoder<'_>) -> Result<SignedPortion> {
        let begin = encoder.offset();
        self.encode_name(data.name(), encoder)?;
        self.encode_meta_info(data.meta_info(), encoder)?;
        encoder.write_blob_tlv(tlv_types::CONTENT, data.content())?;
        self.encode_signature_info(data.signature(), encoder)?;
        let end = encoder.offset();
        self.encode_signature_value(data.signature(), encoder)?;
        Ok(SignedPortion::new(begin, end))
    }

    /// Decode the Data TLV at the front of `input`, returning the signed
    /// portion (offsets into `input`) and the bytes consumed. Without a
    /// SignatureInfo the signed portion runs to the end of the Data value.
    /// On failure `data` is cleared.
    pub fn decode_data<'a>(&self, data: &mut DataLite<'a, '_>, input: &'a [u8]) -> Result<(SignedPortion, usize)> {
        let result = self.decode_data_fields(data, input);
        if result.is_err() {
            data.clear();
        }
        result
    }

    fn decode_data_fields<'a>(&self, data: &mut DataLite<'a, '_>, input: &'a [u8]) -> Result<(SignedPortion, usize)> {
        let (element, value_begin, consumed) = read_outer(input, tlv_types::DATA)?;
        data.clear();

        let mut seen = SeenFields::default();
        let mut begin = None;
        let mut end = element.value.len();
        let mut decoder = TlvDecoder::new(element.value);
        while !decoder.is_empty() {
            let field_begin = decoder.offset();
            let field = decoder.read_element()?;
            match field.type_ {
                tlv_types::NAME => {
                    seen.mark(field.type_)?;
                    decode_name_value(data.name_mut(), field.value)?;
                    begin = Some(field_begin);
                }
                tlv_types::META_INFO => {
                    seen.mark(field.type_)?;
                    self.decode_meta_info_value(data.meta_info_mut(), field.value)?;
                }
                tlv_types::CONTENT => {
                    seen.mark(field.type_)?;
                    data.set_content(field.value);
                }
                tlv_types::SIGNATURE_INFO => {
                    seen.mark(field.type_)?;
                    self.decode_signature_info_value(data.signature_mut(), field.value)?;
                    end = decoder.offset();
                }
                tlv_types::SIGNATURE_VALUE => {
                    seen.mark(field.type_)?;
                    data.signature_mut().set_signature(Some(field.value));
                }
                _ => skip_unrecognized(&field)?,
            }
        }

        let begin = begin.ok_or(Error::MissingRequiredField("Name"))?;
        Ok((SignedPortion::new(begin, end).offset_by(value_begin), consumed))
    }
}

impl Default for TlvWireFormatLite {
    fn default() -> Self {
        Self::V0_1_1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::key_locator::KeyLocatorType;

    const DIGEST: [u8; 32] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
        0x0F, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D,
        0x1E, 0x1F,
    ];

    const CODED_INTEREST: [u8; 85] = [
        0x05, 0x53, // Interest
        0x07, 0x0A, 0x08, 0x03, 0x6E, 0x64, 0x6E, 0x08, 0x03, 0x61, 0x62, 0x63, // Name
        0x09, 0x38, // Selectors
        0x0D, 0x01, 0x04, // MinSuffixComponents
        0x0E, 0x01, 0x06, // MaxSuffixComponents
        0x0F, 0x22, 0x1D, 0x20, // PublisherPublicKeyLocator, KeyLocatorDigest
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
        0x0F, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D,
        0x1E, 0x1F, //
        0x10, 0x07, 0x08, 0x03, 0x61, 0x62, 0x63, 0x13, 0x00, // Exclude
        0x11, 0x01, 0x01, // ChildSelector
        0x12, 0x00, // MustBeFresh
        0x0A, 0x04, 0x61, 0x62, 0x61, 0x62, // Nonce
        0x0B, 0x01, 0x02, // Scope
        0x0C, 0x02, 0x75, 0x30, // InterestLifetime
    ];

    #[test]
    fn test_decode_reference_interest() {
        let mut names = [NameComponentLite::default(); 4];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);

        let (signed_portion, consumed) = TlvWireFormatLite::V0_1_1
            .decode_interest(&mut interest, &CODED_INTEREST)
            .unwrap();

        assert_eq!(consumed, CODED_INTEREST.len());
        assert_eq!(signed_portion, SignedPortion::new(4, 9));
        assert_eq!(interest.name().len(), 2);
        assert_eq!(interest.name().get(0).unwrap().value(), b"ndn");
        assert_eq!(interest.name().get(1).unwrap().value(), b"abc");
        assert_eq!(interest.min_suffix_components(), Some(4));
        assert_eq!(interest.max_suffix_components(), Some(6));
        assert_eq!(
            interest.key_locator().locator_type(),
            Some(KeyLocatorType::KeyLocatorDigest)
        );
        assert_eq!(interest.key_locator().key_digest(), Some(&DIGEST[..]));
        assert_eq!(
            interest.exclude().entries(),
            &[
                ExcludeEntryLite::Component(NameComponentLite::new(b"abc")),
                ExcludeEntryLite::Any,
            ]
        );
        assert_eq!(interest.child_selector(), Some(1));
        assert!(interest.must_be_fresh());
        assert_eq!(interest.nonce(), Some(&b"abab"[..]));
        assert_eq!(interest.scope(), Some(2));
        assert_eq!(interest.interest_lifetime_ms(), Some(30000));
    }

    #[test]
    fn test_reencode_reference_interest() {
        let mut names = [NameComponentLite::default(); 4];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        let wire_format = TlvWireFormatLite::default();
        wire_format.decode_interest(&mut interest, &CODED_INTEREST).unwrap();

        let mut counter = TlvEncoder::counting();
        wire_format.encode_interest(&interest, &mut counter).unwrap();
        assert_eq!(counter.offset(), CODED_INTEREST.len());

        let mut buffer = [0u8; 85];
        let mut encoder = TlvEncoder::new(&mut buffer);
        let signed_portion = wire_format.encode_interest(&interest, &mut encoder).unwrap();
        assert_eq!(buffer, CODED_INTEREST);
        assert_eq!(signed_portion, SignedPortion::new(4, 9));
    }

    #[test]
    fn test_trailing_bytes_are_not_consumed() {
        let mut input = [0u8; 86];
        input[..85].copy_from_slice(&CODED_INTEREST);
        input[85] = 1;

        let mut names = [NameComponentLite::default(); 4];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        let (_, consumed) = TlvWireFormatLite::default()
            .decode_interest(&mut interest, &input)
            .unwrap();
        assert_eq!(consumed, 85);
    }

    #[test]
    fn test_name_capacity_leaves_count_unchanged() {
        // Name with five components.
        let input = [
            0x07, 0x0F, 0x08, 0x01, b'a', 0x08, 0x01, b'b', 0x08, 0x01, b'c', 0x08, 0x01, b'd',
            0x08, 0x01, b'e',
        ];
        let mut storage = [NameComponentLite::default(); 3];
        let mut name = NameLite::new(&mut storage);
        name.append(b"x").unwrap();

        let error = TlvWireFormatLite::default()
            .decode_name(&mut name, &input)
            .unwrap_err();
        assert_eq!(error, Error::CapacityExceeded { capacity: 3 });
        assert_eq!(error.kind(), ErrorKind::Capacity);
        assert_eq!(name.len(), 1);
        assert_eq!(name.get(0).unwrap().value(), b"x");
    }

    #[test]
    fn test_interest_decode_failure_resets_target() {
        let mut names = [NameComponentLite::default(); 1];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        interest.set_scope(Some(7));

        let error = TlvWireFormatLite::default()
            .decode_interest(&mut interest, &CODED_INTEREST)
            .unwrap_err();
        assert!(error.is_capacity());
        assert!(interest.name().is_empty());
        assert_eq!(interest.scope(), None);
        assert_eq!(interest.nonce(), None);
    }

    #[test]
    fn test_unknown_types_are_skipped_unless_critical() {
        // Name /a, then an unknown type 0x80 carrying three bytes.
        let input = [0x05, 0x0A, 0x07, 0x03, 0x08, 0x01, b'a', 0x80, 0x03, 1, 2, 3];
        let mut names = [NameComponentLite::default(); 2];
        let mut entries = [ExcludeEntryLite::default(); 2];
        let mut key_names = [NameComponentLite::default(); 2];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        let wire_format = TlvWireFormatLite::default();

        let (_, consumed) = wire_format.decode_interest(&mut interest, &input).unwrap();
        assert_eq!(consumed, input.len());
        assert_eq!(interest.name().get(0).unwrap().value(), b"a");
        assert!(!interest.must_be_fresh());

        let critical = [0x05, 0x07, 0x07, 0x03, 0x08, 0x01, b'a', 0x1E, 0x00];
        let error = wire_format.decode_interest(&mut interest, &critical).unwrap_err();
        assert_eq!(error, Error::UnrecognizedCriticalType(0x1E));
        assert_eq!(error.kind(), ErrorKind::UnsupportedFeature);
    }

    #[test]
    fn test_truncation_is_a_format_error() {
        let truncated = &CODED_INTEREST[..40];
        let mut names = [NameComponentLite::default(); 4];
        let mut entries = [ExcludeEntryLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);

        let error = TlvWireFormatLite::default()
            .decode_interest(&mut interest, truncated)
            .unwrap_err();
        assert_eq!(error, Error::UnexpectedEndOfInput);
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_interest_field_rules() {
        let wire_format = TlvWireFormatLite::default();
        let mut names = [NameComponentLite::default(); 2];
        let mut entries = [ExcludeEntryLite::default(); 2];
        let mut key_names = [NameComponentLite::default(); 2];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);

        let short_nonce = [0x05, 0x08, 0x07, 0x00, 0x0A, 0x02, 0x61, 0x62, 0x0B, 0x00];
        assert_eq!(
            wire_format.decode_interest(&mut interest, &short_nonce),
            Err(Error::InvalidLength { type_: tlv_types::NONCE, length: 2 })
        );

        let duplicate_name = [0x05, 0x04, 0x07, 0x00, 0x07, 0x00];
        assert_eq!(
            wire_format.decode_interest(&mut interest, &duplicate_name),
            Err(Error::DuplicateField(tlv_types::NAME))
        );

        let no_name = [0x05, 0x03, 0x0B, 0x01, 0x02];
        assert_eq!(
            wire_format.decode_interest(&mut interest, &no_name),
            Err(Error::MissingRequiredField("Name"))
        );

        let wide_any = [0x05, 0x09, 0x07, 0x00, 0x09, 0x05, 0x10, 0x03, 0x13, 0x01, 0x00];
        assert_eq!(
            wire_format.decode_interest(&mut interest, &wide_any),
            Err(Error::InvalidLength { type_: tlv_types::ANY, length: 1 })
        );
    }

    #[test]
    fn test_empty_selectors_are_omitted() {
        let mut names = [NameComponentLite::default(); 2];
        let mut entries = [ExcludeEntryLite::default(); 2];
        let mut key_names = [NameComponentLite::default(); 2];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        interest.name_mut().append(b"a").unwrap();
        interest.set_must_be_fresh(false);

        let mut buffer = [0u8; 16];
        let mut encoder = TlvEncoder::new(&mut buffer);
        TlvWireFormatLite::default()
            .encode_interest(&interest, &mut encoder)
            .unwrap();
        let length = encoder.offset();
        assert_eq!(&buffer[..length], &[0x05, 0x05, 0x07, 0x03, 0x08, 0x01, b'a']);
    }

    static SIGNATURE_BITS: [u8; 16] = [0xAA; 16];

    fn sample_data<'a, 's>(
        names: &'s mut [NameComponentLite<'a>],
        key_names: &'s mut [NameComponentLite<'a>],
    ) -> DataLite<'a, 's> {
        let mut data = DataLite::new(names, key_names);
        data.name_mut().append(b"ndn").unwrap();
        data.name_mut().append(b"abc").unwrap();
        data.meta_info_mut()
            .set_content_type(ContentType::Key)
            .set_freshness_period_ms(Some(5000))
            .set_final_block_id(Some(NameComponentLite::new(&[0x00, 0x09])));
        data.set_content(b"SUCCESS!");
        data.signature_mut()
            .set_signature_type(SignatureType::Sha256WithRsa)
            .set_signature(Some(&SIGNATURE_BITS[..]))
            .set_validity_period(Some(ValidityPeriodLite::new(
                1_420_070_400_000,
                1_451_606_399_000,
            )));
        data.signature_mut().key_locator_mut().key_name_mut().append(b"key").unwrap();
        data
    }

    #[test]
    fn test_data_round_trip() {
        let mut names = [NameComponentLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let data = sample_data(&mut names, &mut key_names);
        let wire_format = TlvWireFormatLite::V0_1_1;

        let mut buffer = [0u8; 128];
        let mut encoder = TlvEncoder::new(&mut buffer);
        let encoded_portion = wire_format.encode_data(&data, &mut encoder).unwrap();
        let length = encoder.offset();
        let encoding = &buffer[..length];

        let mut names2 = [NameComponentLite::default(); 4];
        let mut key_names2 = [NameComponentLite::default(); 4];
        let mut decoded = DataLite::new(&mut names2, &mut key_names2);
        let (decoded_portion, consumed) = wire_format.decode_data(&mut decoded, encoding).unwrap();

        assert_eq!(consumed, length);
        assert_eq!(decoded_portion, encoded_portion);
        // Signed bytes start at the Name and stop before the 18-byte SignatureValue.
        assert_eq!(encoded_portion.begin, 2);
        assert_eq!(encoded_portion.end, length - 18);

        assert_eq!(decoded.name(), data.name());
        assert_eq!(decoded.meta_info(), data.meta_info());
        assert_eq!(decoded.content(), b"SUCCESS!");
        assert_eq!(decoded.signature().signature(), Some(&SIGNATURE_BITS[..]));
        assert_eq!(decoded.signature().signature_type(), SignatureType::Sha256WithRsa);
        assert_eq!(
            decoded.signature().key_locator().key_name().unwrap().get(0).unwrap().value(),
            b"key"
        );
        assert_eq!(
            decoded.signature().validity_period(),
            Some(ValidityPeriodLite::new(1_420_070_400_000, 1_451_606_399_000))
        );
    }

    #[test]
    fn test_validity_period_depends_on_revision() {
        let mut names = [NameComponentLite::default(); 4];
        let mut key_names = [NameComponentLite::default(); 4];
        let data = sample_data(&mut names, &mut key_names);

        let mut buffer = [0u8; 128];
        let mut encoder = TlvEncoder::new(&mut buffer);
        TlvWireFormatLite::V0_1_1.encode_data(&data, &mut encoder).unwrap();
        let length = encoder.offset();

        let mut names2 = [NameComponentLite::default(); 4];
        let mut key_names2 = [NameComponentLite::default(); 4];
        let mut decoded = DataLite::new(&mut names2, &mut key_names2);
        TlvWireFormatLite::V0_1
            .decode_data(&mut decoded, &buffer[..length])
            .unwrap();
        assert_eq!(decoded.signature().validity_period(), None);

        let mut counter = TlvEncoder::counting();
        TlvWireFormatLite::V0_1.encode_data(&data, &mut counter).unwrap();
        // ValidityPeriod is 4 + 2 * (4 + 15) bytes; its type numbers take three bytes.
        assert_eq!(counter.offset() + 42, length);
    }

    #[test]
    fn test_digest_signature_omits_key_locator() {
        let mut names = [NameComponentLite::default(); 1];
        let mut key_names = [NameComponentLite::default(); 1];
        let mut signature_storage = [NameComponentLite::default(); 1];
        let mut signature = SignatureLite::new(&mut signature_storage);
        signature.set_signature_type(SignatureType::DigestSha256);
        signature.key_locator_mut().set_key_digest(&DIGEST);

        let mut buffer = [0u8; 8];
        let mut encoder = TlvEncoder::new(&mut buffer);
        TlvWireFormatLite::default()
            .encode_signature_info(&signature, &mut encoder)
            .unwrap();
        assert_eq!(encoder.offset(), 5);
        assert_eq!(&buffer[..5], &[0x16, 0x03, 0x1B, 0x01, 0x00]);

        let mut data = DataLite::new(&mut names, &mut key_names);
        TlvWireFormatLite::default()
            .decode_signature_info(data.signature_mut(), &buffer[..5])
            .unwrap();
        assert_eq!(data.signature().signature_type(), SignatureType::DigestSha256);
        assert_eq!(data.signature().key_locator().locator_type(), None);
    }

    #[test]
    fn test_data_without_name_is_rejected() {
        let input = [0x06, 0x03, 0x15, 0x01, 0x41];
        let mut names = [NameComponentLite::default(); 1];
        let mut key_names = [NameComponentLite::default(); 1];
        let mut data = DataLite::new(&mut names, &mut key_names);
        assert_eq!(
            TlvWireFormatLite::default().decode_data(&mut data, &input),
            Err(Error::MissingRequiredField("Name"))
        );
        assert!(data.content().is_empty());
    }

    #[test]
    fn test_exclude_keeps_entry_order() {
        let input = [0x10, 0x08, 0x08, 0x01, b'b', 0x08, 0x01, b'a', 0x13, 0x00, 0x80];
        let mut storage = [ExcludeEntryLite::default(); 3];
        let mut exclude = ExcludeLite::new(&mut storage);
        // The last byte lies outside the Exclude TLV.
        let consumed = TlvWireFormatLite::default()
            .decode_exclude(&mut exclude, &input)
            .unwrap();
        assert_eq!(consumed, 10);
        assert_eq!(
            exclude.entries(),
            &[
                ExcludeEntryLite::Component(NameComponentLite::new(b"b")),
                ExcludeEntryLite::Component(NameComponentLite::new(b"a")),
                ExcludeEntryLite::Any,
            ]
        );
    }

    #[test]
    fn test_lite_interest_round_trip_with_key_name() {
        let mut names = [NameComponentLite::default(); 2];
        let mut entries = [ExcludeEntryLite::default(); 2];
        let mut key_names = [NameComponentLite::default(); 2];
        let mut interest = InterestLite::new(&mut names, &mut entries, &mut key_names);
        interest.name_mut().append(b"a").unwrap();
        let key_name = interest.key_locator_mut().key_name_mut();
        key_name.append(b"key").unwrap();
        key_name.append(b"x").unwrap();
        interest.set_nonce(Some(&b"abab"[..])).unwrap();

        let mut buffer = [0u8; 64];
        let mut encoder = TlvEncoder::new(&mut buffer);
        let wire_format = TlvWireFormatLite::default();
        wire_format.encode_interest(&interest, &mut encoder).unwrap();
        let length = encoder.offset();

        let mut names2 = [NameComponentLite::default(); 2];
        let mut entries2 = [ExcludeEntryLite::default(); 2];
        let mut key_names2 = [NameComponentLite::default(); 2];
        let mut decoded = InterestLite::new(&mut names2, &mut entries2, &mut key_names2);
        let (_, consumed) = wire_format
            .decode_interest(&mut decoded, &buffer[..length])
            .unwrap();

        assert_eq!(consumed, length);
        assert_eq!(decoded.name(), interest.name());
        assert_eq!(decoded.key_locator().locator_type(), Some(KeyLocatorType::KeyName));
        assert_eq!(decoded.key_locator().key_name(), interest.key_locator().key_name());
        assert_eq!(decoded.nonce(), Some(&b"abab"[..]));
        assert!(decoded.must_be_fresh());
    }

    #[test]
    fn test_failed_meta_info_decode_leaves_target_unchanged() {
        let wire_format = TlvWireFormatLite::default();
        let mut meta_info = MetaInfoLite::new();
        meta_info
            .set_content_type(ContentType::Key)
            .set_freshness_period_ms(Some(1));
        let before = meta_info;

        let duplicate_freshness = [0x14, 0x06, 0x19, 0x01, 0x05, 0x19, 0x01, 0x06];
        assert_eq!(
            wire_format.decode_meta_info(&mut meta_info, &duplicate_freshness),
            Err(Error::DuplicateField(tlv_types::FRESHNESS_PERIOD))
        );
        assert_eq!(meta_info, before);

        // FinalBlockId holding two components.
        let wide_final_block_id = [0x14, 0x08, 0x1A, 0x06, 0x08, 0x01, b'a', 0x08, 0x01, b'b'];
        assert!(wire_format
            .decode_meta_info(&mut meta_info, &wide_final_block_id)
            .is_err());
        assert_eq!(meta_info, before);

        wire_format
            .decode_meta_info(&mut meta_info, &[0x14, 0x03, 0x19, 0x01, 0x05])
            .unwrap();
        assert_eq!(meta_info.content_type(), ContentType::Blob);
        assert_eq!(meta_info.freshness_period_ms(), Some(5));
    }

    #[test]
    fn test_failed_key_locator_decode_leaves_target_unchanged() {
        let wire_format = TlvWireFormatLite::default();
        let mut storage = [NameComponentLite::default(); 1];
        let mut key_locator = KeyLocatorLite::new(&mut storage);
        key_locator.key_name_mut().append(b"old").unwrap();

        let assert_unchanged = |key_locator: &KeyLocatorLite<'_, '_>| {
            assert_eq!(key_locator.locator_type(), Some(KeyLocatorType::KeyName));
            let key_name = key_locator.key_name().unwrap();
            assert_eq!(key_name.len(), 1);
            assert_eq!(key_name.get(0).unwrap().value(), b"old");
        };

        // Digest followed by a Name.
        let digest_and_name = [0x1C, 0x08, 0x1D, 0x01, 0xAA, 0x07, 0x03, 0x08, 0x01, b'k'];
        assert_eq!(
            wire_format.decode_key_locator(
                tlv_types::KEY_LOCATOR,
                &mut key_locator,
                &digest_and_name
            ),
            Err(Error::DuplicateField(tlv_types::NAME))
        );
        assert_unchanged(&key_locator);

        let two_component_name = [0x1C, 0x08, 0x07, 0x06, 0x08, 0x01, b'a', 0x08, 0x01, b'b'];
        let error = wire_format
            .decode_key_locator(tlv_types::KEY_LOCATOR, &mut key_locator, &two_component_name)
            .unwrap_err();
        assert_eq!(error, Error::CapacityExceeded { capacity: 1 });
        assert_unchanged(&key_locator);

        let truncated = [0x1C, 0x05, 0x1D, 0x01, 0xAA];
        let error = wire_format
            .decode_key_locator(tlv_types::KEY_LOCATOR, &mut key_locator, &truncated)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
        assert_unchanged(&key_locator);

        let empty = [0x1C, 0x00];
        assert_eq!(
            wire_format.decode_key_locator(tlv_types::KEY_LOCATOR, &mut key_locator, &empty),
            Err(Error::MissingRequiredField("KeyLocator name or digest"))
        );
        assert_unchanged(&key_locator);
    }

    #[test]
    fn test_failed_signature_info_decode_leaves_target_unchanged() {
        let wire_format = TlvWireFormatLite::V0_1_1;
        let period = ValidityPeriodLite::new(1_420_070_400_000, 1_451_606_399_000);
        let mut storage = [NameComponentLite::default(); 1];
        let mut signature = SignatureLite::new(&mut storage);
        signature
            .set_signature_type(SignatureType::Sha256WithRsa)
            .set_signature(Some(&SIGNATURE_BITS[..]))
            .set_validity_period(Some(period));
        signature.key_locator_mut().set_key_digest(&DIGEST);

        let assert_unchanged = |signature: &SignatureLite<'_, '_>| {
            assert_eq!(signature.signature_type(), SignatureType::Sha256WithRsa);
            assert_eq!(signature.signature(), Some(&SIGNATURE_BITS[..]));
            assert_eq!(signature.key_locator().key_digest(), Some(&DIGEST[..]));
            assert_eq!(signature.validity_period(), Some(period));
        };

        let duplicate_type = [0x16, 0x06, 0x1B, 0x01, 0x00, 0x1B, 0x01, 0x01];
        assert_eq!(
            wire_format.decode_signature_info(&mut signature, &duplicate_type),
            Err(Error::DuplicateField(tlv_types::SIGNATURE_TYPE))
        );
        assert_unchanged(&signature);

        // RSA with a two-component key name.
        let wide_key_name = [
            0x16, 0x0D, 0x1B, 0x01, 0x01, 0x1C, 0x08, 0x07, 0x06, 0x08, 0x01, b'a', 0x08, 0x01,
            b'b',
        ];
        let error = wire_format
            .decode_signature_info(&mut signature, &wide_key_name)
            .unwrap_err();
        assert!(error.is_capacity());
        assert_unchanged(&signature);

        // Key name that fits, but no SignatureType.
        let missing_type = [0x16, 0x07, 0x1C, 0x05, 0x07, 0x03, 0x08, 0x01, b'a'];
        assert_eq!(
            wire_format.decode_signature_info(&mut signature, &missing_type),
            Err(Error::MissingRequiredField("SignatureType"))
        );
        assert_unchanged(&signature);

        let truncated = [0x16, 0x06, 0x1B, 0x01, 0x00];
        let error = wire_format
            .decode_signature_info(&mut signature, &truncated)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
        assert_unchanged(&signature);

        wire_format
            .decode_signature_info(&mut signature, &[0x16, 0x03, 0x1B, 0x01, 0x00])
            .unwrap();
        assert_eq!(signature.signature_type(), SignatureType::DigestSha256);
        assert_eq!(signature.key_locator().locator_type(), None);
        assert_eq!(signature.validity_period(), None);
        // The bits belong to SignatureValue.
        assert_eq!(signature.signature(), Some(&SIGNATURE_BITS[..]));
    }
}
