use std::cell::Cell;

use chrono::{DateTime, SubsecRound, Utc};
use ndn_lite::{SignatureLite, ValidityPeriodLite};

pub use ndn_lite::SignatureType;

use crate::blob::Blob;
use crate::change_counter::{next_change_count, ChangeCount, ChangeCounter};
use crate::error::{Error, Result};
use crate::key_locator::KeyLocator;
use crate::wire_format::{default_wire_format, WireFormat};

/// The window in which a signing key is valid. Bounds are kept to the
/// second, the precision of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidityPeriod {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl ValidityPeriod {
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        Self {
            not_before: not_before.trunc_subsecs(0),
            not_after: not_after.trunc_subsecs(0),
        }
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    pub fn is_valid(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    fn to_lite(self) -> ValidityPeriodLite {
        ValidityPeriodLite::new(self.not_before.timestamp_millis(), self.not_after.timestamp_millis())
    }

    fn from_lite(lite: ValidityPeriodLite) -> Result<Self> {
        let convert = |millis| {
            DateTime::from_timestamp_millis(millis)
                .ok_or(Error::from(ndn_lite::Error::InvalidTimestamp))
        };
        Ok(Self::new(convert(lite.not_before)?, convert(lite.not_after)?))
    }
}

/// SignatureInfo and SignatureValue of a packet.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    signature_type: SignatureType,
    signature: Option<Blob>,
    key_locator: ChangeCounter<KeyLocator>,
    validity_period: Option<ValidityPeriod>,
    change_count: Cell<u64>,
}

impl Signature {
    pub fn new(signature_type: SignatureType) -> Self {
        let mut signature = Self::default();
        signature.set_signature_type(signature_type);
        signature
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn set_signature_type(&mut self, signature_type: SignatureType) -> &mut Self {
        self.signature_type = signature_type;
        self.set_changed();
        self
    }

    /// The signature bits. `None` means no SignatureValue, which differs
    /// from an empty one.
    pub fn signature(&self) -> Option<&Blob> {
        self.signature.as_ref()
    }

    pub fn set_signature(&mut self, signature: Option<Blob>) -> &mut Self {
        self.signature = signature;
        self.set_changed();
        self
    }

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

    pub fn validity_period(&self) -> Option<&ValidityPeriod> {
        self.validity_period.as_ref()
    }

    /// Encoded only by wire format revision 0.1.1.
    pub fn set_validity_period(&mut self, validity_period: Option<ValidityPeriod>) -> &mut Self {
        self.validity_period = validity_period;
        self.set_changed();
        self
    }

    pub fn clear(&mut self) {
        self.signature_type = SignatureType::default();
        self.signature = None;
        if !self.key_locator.get().is_empty() {
            self.key_locator.get_mut().clear();
        }
        self.validity_period = None;
        self.set_changed();
    }

    pub fn change_count(&self) -> u64 {
        if self.key_locator.check_changed() {
            self.set_changed();
        }
        self.change_count.get()
    }

    pub fn wire_encode_info(&self) -> Result<Blob> {
        self.wire_encode_info_with(default_wire_format())
    }

    /// Encode the SignatureInfo TLV.
    pub fn wire_encode_info_with(&self, wire_format: &dyn WireFormat) -> Result<Blob> {
        wire_format.encode_signature_info(self)
    }

    /// Encode the SignatureValue TLV, empty if there are no bits.
    pub fn wire_encode_value_with(&self, wire_format: &dyn WireFormat) -> Result<Blob> {
        wire_format.encode_signature_value(self)
    }

    /// Replace this signature with a decoded SignatureInfo and, if given,
    /// SignatureValue.
    pub fn wire_decode(&mut self, info: &[u8], value: Option<&[u8]>) -> Result<()> {
        self.wire_decode_with(info, value, default_wire_format())
    }

    pub fn wire_decode_with(
        &mut self,
        info: &[u8],
        value: Option<&[u8]>,
        wire_format: &dyn WireFormat,
    ) -> Result<()> {
        wire_format.decode_signature_info_and_value(self, info, value)
    }

    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut SignatureLite<'a, '_>) -> ndn_lite::Result<()> {
        lite.set_signature_type(self.signature_type)
            .set_signature(self.signature.as_deref())
            .set_validity_period(self.validity_period.map(ValidityPeriod::to_lite));
        self.key_locator.get().copy_to_lite(lite.key_locator_mut())
    }

    pub(crate) fn from_lite(lite: &SignatureLite<'_, '_>) -> Result<Self> {
        let validity_period = lite.validity_period().map(ValidityPeriod::from_lite).transpose()?;
        let mut signature = Self::new(lite.signature_type());
        signature
            .set_signature(lite.signature().map(Blob::new))
            .set_validity_period(validity_period)
            .set_key_locator(KeyLocator::from_lite(lite.key_locator()));
        Ok(signature)
    }

    fn set_changed(&self) {
        self.change_count.set(next_change_count());
    }
}

impl ChangeCount for Signature {
    fn change_count(&self) -> u64 {
        Signature::change_count(self)
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.signature_type == other.signature_type
            && self.signature == other.signature
            && self.key_locator.get() == other.key_locator.get()
            && self.validity_period == other.validity_period
    }
}

impl Eq for Signature {}
