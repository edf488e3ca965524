use crate::error::{Error, Result};

/// NDN-TLV type numbers.
pub mod tlv_types {
    pub const IMPLICIT_SHA256_DIGEST_COMPONENT: u64 = 0x01;
    pub const INTEREST: u64 = 0x05;
    pub const DATA: u64 = 0x06;
    pub const NAME: u64 = 0x07;
    pub const NAME_COMPONENT: u64 = 0x08;
    pub const SELECTORS: u64 = 0x09;
    pub const NONCE: u64 = 0x0A;
    pub const SCOPE: u64 = 0x0B;
    pub const INTEREST_LIFETIME: u64 = 0x0C;
    pub const MIN_SUFFIX_COMPONENTS: u64 = 0x0D;
    pub const MAX_SUFFIX_COMPONENTS: u64 = 0x0E;
    pub const PUBLISHER_PUBLIC_KEY_LOCATOR: u64 = 0x0F;
    pub const EXCLUDE: u64 = 0x10;
    pub const CHILD_SELECTOR: u64 = 0x11;
    pub const MUST_BE_FRESH: u64 = 0x12;
    pub const ANY: u64 = 0x13;
    pub const META_INFO: u64 = 0x14;
    pub const CONTENT: u64 = 0x15;
    pub const SIGNATURE_INFO: u64 = 0x16;
    pub const SIGNATURE_VALUE: u64 = 0x17;
    pub const CONTENT_TYPE: u64 = 0x18;
    pub const FRESHNESS_PERIOD: u64 = 0x19;
    pub const FINAL_BLOCK_ID: u64 = 0x1A;
    pub const SIGNATURE_TYPE: u64 = 0x1B;
    pub const KEY_LOCATOR: u64 = 0x1C;
    pub const KEY_LOCATOR_DIGEST: u64 = 0x1D;
    pub const VALIDITY_PERIOD: u64 = 0xFD;
    pub const NOT_BEFORE: u64 = 0xFE;
    pub const NOT_AFTER: u64 = 0xFF;
}

/// Highest type number reserved for the core protocol. An unrecognized type
/// at or below it cannot be skipped.
pub const MAX_CRITICAL_TYPE: u64 = 31;

pub fn is_critical_type(type_: u64) -> bool {
    type_ <= MAX_CRITICAL_TYPE
}

/// Number of bytes the varint encoding of `value` takes: 1, 3, 5 or 9.
pub const fn var_number_size(value: u64) -> usize {
    if value < 253 {
        1
    } else if value <= 0xFFFF {
        3
    } else if value <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

/// Number of bytes of the shortest NonNegativeInteger encoding of `value`.
pub const fn non_negative_integer_size(value: u64) -> usize {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

/// Decode a varint from the front of `input`, returning the value and the
/// number of bytes consumed.
///
/// Values encoded wider than necessary are rejected with
/// [`Error::NonCanonicalVarNumber`].
pub fn decode_var_number(input: &[u8]) -> Result<(u64, usize)> {
    let first = *input.first().ok_or(Error::UnexpectedEndOfInput)?;
    let (width, minimum) = match first {
        0..=252 => return Ok((u64::from(first), 1)),
        253 => (2, 253),
        254 => (4, 0x1_0000),
        255 => (8, 0x1_0000_0000),
    };
    let bytes = input.get(1..1 + width).ok_or(Error::UnexpectedEndOfInput)?;
    let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    if value < minimum {
        return Err(Error::NonCanonicalVarNumber);
    }
    Ok((value, 1 + width))
}

/// Decode a big-endian NonNegativeInteger of 1, 2, 4 or 8 bytes.
pub fn decode_non_negative_integer(value: &[u8]) -> Result<u64> {
    match value.len() {
        1 | 2 | 4 | 8 => Ok(value.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))),
        length => Err(Error::InvalidNonNegativeIntegerLength(length)),
    }
}

/// A borrowed TLV block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvElement<'a> {
    pub type_: u64,
    pub value: &'a [u8],
}

impl<'a> TlvElement<'a> {
    pub const fn new(type_: u64, value: &'a [u8]) -> Self {
        Self { type_, value }
    }

    /// Get the total encoded length of this TLV element
    pub fn encoded_length(&self) -> usize {
        var_number_size(self.type_) + var_number_size(self.value.len() as u64) + self.value.len()
    }

    pub fn encode_to(&self, encoder: &mut TlvEncoder<'_>) -> Result<()> {
        encoder.write_blob_tlv(self.type_, self.value)
    }

    /// Decode one TLV element from the front of `data`, returning it with the
    /// number of bytes consumed.
    pub fn decode(data: &'a [u8]) -> Result<(Self, usize)> {
        let mut decoder = TlvDecoder::new(data);
        let element = decoder.read_element()?;
        Ok((element, decoder.offset()))
    }

    pub fn expect_type(&self, type_: u64) -> Result<()> {
        if self.type_ == type_ {
            Ok(())
        } else {
            Err(Error::UnexpectedType {
                expected: type_,
                actual: self.type_,
            })
        }
    }

    pub fn to_non_negative_integer(&self) -> Result<u64> {
        decode_non_negative_integer(self.value)
    }
}

/// Reads TLV elements sequentially from a borrowed buffer.
///
/// Iterating yields each element in turn; the first error ends iteration.
#[derive(Debug, Clone)]
pub struct TlvDecoder<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> TlvDecoder<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }

    pub fn read_var_number(&mut self) -> Result<u64> {
        let (value, consumed) = decode_var_number(&self.input[self.offset..])?;
        self.offset += consumed;
        Ok(value)
    }

    /// Read the next element. On failure the offset is left where it was.
    pub fn read_element(&mut self) -> Result<TlvElement<'a>> {
        let start = self.offset;
        let result = self.read_element_unchecked();
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    pub fn read_element_of_type(&mut self, type_: u64) -> Result<TlvElement<'a>> {
        let start = self.offset;
        let element = self.read_element()?;
        if let Err(e) = element.expect_type(type_) {
            self.offset = start;
            return Err(e);
        }
        Ok(element)
    }

    fn read_element_unchecked(&mut self) -> Result<TlvElement<'a>> {
        let type_ = self.read_var_number()?;
        let length = self.read_var_number()?;
        let length = usize::try_from(length).map_err(|_| Error::UnexpectedEndOfInput)?;
        if length > self.remaining() {
            return Err(Error::UnexpectedEndOfInput);
        }
        let value = &self.input[self.offset..self.offset + length];
        self.offset += length;
        Ok(TlvElement { type_, value })
    }
}

impl<'a> Iterator for TlvDecoder<'a> {
    type Item = Result<TlvElement<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }
        let item = self.read_element();
        if item.is_err() {
            self.offset = self.input.len();
        }
        Some(item)
    }
}

/// Skip an element no decoder recognized, failing if its type is critical.
pub fn skip_unrecognized(element: &TlvElement<'_>) -> Result<()> {
    if is_critical_type(element.type_) {
        Err(Error::UnrecognizedCriticalType(element.type_))
    } else {
        Ok(())
    }
}

/// Writes TLV elements into a caller-supplied buffer, or only counts bytes.
///
/// A counting encoder (see [`TlvEncoder::counting`]) is used to size nested
/// values before their headers are written, so nothing is ever allocated.
#[derive(Debug)]
pub struct TlvEncoder<'b> {
    output: Option<&'b mut [u8]>,
    offset: usize,
}

impl<'b> TlvEncoder<'b> {
    pub fn new(output: &'b mut [u8]) -> Self {
        Self {
            output: Some(output),
            offset: 0,
        }
    }

    pub fn counting() -> Self {
        Self {
            output: None,
            offset: 0,
        }
    }

    /// Bytes written (or counted) so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_counting(&self) -> bool {
        self.output.is_none()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(output) = self.output.as_deref_mut() {
            let end = self.offset + bytes.len();
            let target = output
                .get_mut(self.offset..end)
                .ok_or(Error::OutputBufferTooSmall)?;
            target.copy_from_slice(bytes);
        }
        self.offset += bytes.len();
        Ok(())
    }

    /// Write `value` in the shortest varint form.
    pub fn write_var_number(&mut self, value: u64) -> Result<()> {
        if value < 253 {
            self.write_bytes(&[value as u8])
        } else if value <= 0xFFFF {
            self.write_bytes(&[253])?;
            self.write_bytes(&(value as u16).to_be_bytes())
        } else if value <= 0xFFFF_FFFF {
            self.write_bytes(&[254])?;
            self.write_bytes(&(value as u32).to_be_bytes())
        } else {
            self.write_bytes(&[255])?;
            self.write_bytes(&value.to_be_bytes())
        }
    }

    pub fn write_type_and_length(&mut self, type_: u64, length: usize) -> Result<()> {
        self.write_var_number(type_)?;
        self.write_var_number(length as u64)
    }

    pub fn write_non_negative_integer(&mut self, value: u64) -> Result<()> {
        let bytes = value.to_be_bytes();
        self.write_bytes(&bytes[bytes.len() - non_negative_integer_size(value)..])
    }

    pub fn write_non_negative_integer_tlv(&mut self, type_: u64, value: u64) -> Result<()> {
        self.write_type_and_length(type_, non_negative_integer_size(value))?;
        self.write_non_negative_integer(value)
    }

    pub fn write_optional_non_negative_integer_tlv(
        &mut self,
        type_: u64,
        value: Option<u64>,
    ) -> Result<()> {
        match value {
            Some(value) => self.write_non_negative_integer_tlv(type_, value),
            None => Ok(()),
        }
    }

    pub fn write_blob_tlv(&mut self, type_: u64, value: &[u8]) -> Result<()> {
        self.write_type_and_length(type_, value.len())?;
        self.write_bytes(value)
    }

    pub fn write_optional_blob_tlv(&mut self, type_: u64, value: Option<&[u8]>) -> Result<()> {
        match value {
            Some(value) => self.write_blob_tlv(type_, value),
            None => Ok(()),
        }
    }

    /// Write a TLV whose value is produced by `write_value`.
    ///
    /// The closure runs once against a counting encoder to learn the length
    /// and once more against `self`. With `omit_if_empty`, a zero-length
    /// value writes nothing at all.
    pub fn write_nested_tlv<F>(&mut self, type_: u64, omit_if_empty: bool, mut write_value: F) -> Result<()>
    where
        F: FnMut(&mut TlvEncoder<'_>) -> Result<()>,
    {
        let mut counter = TlvEncoder::counting();
        write_value(&mut counter)?;
        let length = counter.offset;
        if omit_if_empty && length == 0 {
            return Ok(());
        }

        self.write_type_and_length(type_, length)?;
        if self.is_counting() {
            self.offset += length;
            return Ok(());
        }
        write_value(&mut *self)
    }
}
