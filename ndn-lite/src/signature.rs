use crate::error::{Error, Result};
use crate::key_locator::KeyLocatorLite;
use crate::name::NameComponentLite;

/// Signature algorithms understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureType {
    DigestSha256,
    #[default]
    Sha256WithRsa,
    Sha256WithEcdsa,
    HmacWithSha256,
}

impl SignatureType {
    pub const fn code(self) -> u64 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
            SignatureType::HmacWithSha256 => 4,
        }
    }

    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            0 => Ok(SignatureType::DigestSha256),
            1 => Ok(SignatureType::Sha256WithRsa),
            3 => Ok(SignatureType::Sha256WithEcdsa),
            4 => Ok(SignatureType::HmacWithSha256),
            _ => Err(Error::UnsupportedSignatureType(code)),
        }
    }

    /// Whether this algorithm names its key through a KeyLocator.
    pub const fn uses_key_locator(self) -> bool {
        !matches!(self, SignatureType::DigestSha256)
    }
}

/// Validity window in milliseconds since 1970, carried with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidityPeriodLite {
    pub not_before: i64,
    pub not_after: i64,
}

impl ValidityPeriodLite {
    pub const fn new(not_before: i64, not_after: i64) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    pub fn is_valid(&self, time: i64) -> bool {
        self.not_before <= time && time <= self.not_after
    }
}

/// Length of a `YYYYMMDDThhmmss` timestamp.
pub const ISO_STRING_LENGTH: usize = 15;

const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/// Format `milliseconds` since 1970 as `YYYYMMDDThhmmss`, dropping the
/// fractional second.
pub fn to_iso_string(milliseconds: i64) -> Result<[u8; ISO_STRING_LENGTH]> {
    let days = milliseconds.div_euclid(MILLISECONDS_PER_DAY);
    let seconds_of_day = milliseconds.rem_euclid(MILLISECONDS_PER_DAY) / 1000;
    let (year, month, day) = civil_from_days(days);
    if !(0..=9999).contains(&year) {
        return Err(Error::InvalidTimestamp);
    }

    let mut out = [0u8; ISO_STRING_LENGTH];
    write_digits(&mut out[0..4], year);
    write_digits(&mut out[4..6], month);
    write_digits(&mut out[6..8], day);
    out[8] = b'T';
    write_digits(&mut out[9..11], seconds_of_day / 3600);
    write_digits(&mut out[11..13], seconds_of_day % 3600 / 60);
    write_digits(&mut out[13..15], seconds_of_day % 60);
    Ok(out)
}

/// Parse a `YYYYMMDDThhmmss` timestamp into milliseconds since 1970.
pub fn from_iso_string(iso: &[u8]) -> Result<i64> {
    if iso.len() != ISO_STRING_LENGTH || iso[8] != b'T' {
        return Err(Error::InvalidTimestamp);
    }
    let year = read_digits(&iso[0..4])?;
    let month = read_digits(&iso[4..6])?;
    let day = read_digits(&iso[6..8])?;
    let hour = read_digits(&iso[9..11])?;
    let minute = read_digits(&iso[11..13])?;
    let second = read_digits(&iso[13..15])?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || minute > 59 || second > 60 {
        return Err(Error::InvalidTimestamp);
    }

    let days = days_from_civil(year, month, day);
    Ok(days * MILLISECONDS_PER_DAY + (hour * 3600 + minute * 60 + second) * 1000)
}

fn write_digits(out: &mut [u8], mut value: i64) {
    for slot in out.iter_mut().rev() {
        *slot = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

fn read_digits(digits: &[u8]) -> Result<i64> {
    digits.iter().try_fold(0i64, |acc, b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + i64::from(b - b'0'))
        } else {
            Err(Error::InvalidTimestamp)
        }
    })
}

// Proleptic Gregorian conversions, counting days from 1970-01-01.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let year_of_era = year - era * 400;
    let day_of_year = (153 * ((month + 9) % 12) + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let days = days + 719_468;
    let era = (if days >= 0 { days } else { days - 146_096 }) / 146_097;
    let day_of_era = days - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_index + 2) / 5 + 1;
    let month = if month_index < 10 { month_index + 3 } else { month_index - 9 };
    let year = year_of_era + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Signature fields of a packet, borrowing the signature bits from the
/// packet buffer and the key name from caller-supplied storage.
#[derive(Debug)]
pub struct SignatureLite<'a, 's> {
    signature_type: SignatureType,
    signature: Option<&'a [u8]>,
    key_locator: KeyLocatorLite<'a, 's>,
    validity_period: Option<ValidityPeriodLite>,
}

impl<'a, 's> SignatureLite<'a, 's> {
    pub fn new(key_name_storage: &'s mut [NameComponentLite<'a>]) -> Self {
        Self {
            signature_type: SignatureType::default(),
            signature: None,
            key_locator: KeyLocatorLite::new(key_name_storage),
            validity_period: None,
        }
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn set_signature_type(&mut self, signature_type: SignatureType) -> &mut Self {
        self.signature_type = signature_type;
        self
    }

    /// The signature bits; `None` when no SignatureValue is present, which is
    /// distinct from an empty value.
    pub fn signature(&self) -> Option<&'a [u8]> {
        self.signature
    }

    pub fn set_signature(&mut self, signature: Option<&'a [u8]>) -> &mut Self {
        self.signature = signature;
        self
    }

    pub fn key_locator(&self) -> &KeyLocatorLite<'a, 's> {
        &self.key_locator
    }

    pub fn key_locator_mut(&mut self) -> &mut KeyLocatorLite<'a, 's> {
        &mut self.key_locator
    }

    pub fn validity_period(&self) -> Option<ValidityPeriodLite> {
        self.validity_period
    }

    pub fn set_validity_period(&mut self, validity_period: Option<ValidityPeriodLite>) -> &mut Self {
        self.validity_period = validity_period;
        self
    }

    pub fn clear(&mut self) {
        self.signature_type = SignatureType::default();
        self.signature = None;
        self.key_locator.clear();
        self.validity_period = None;
    }

    pub fn set(&mut self, other: &SignatureLite<'a, '_>) -> Result<()> {
        self.key_locator.set(&other.key_locator)?;
        self.signature_type = other.signature_type;
        self.signature = other.signature;
        self.validity_period = other.validity_period;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_type_codes() {
        for signature_type in [
            SignatureType::DigestSha256,
            SignatureType::Sha256WithRsa,
            SignatureType::Sha256WithEcdsa,
            SignatureType::HmacWithSha256,
        ] {
            assert_eq!(SignatureType::from_code(signature_type.code()), Ok(signature_type));
        }
        assert_eq!(
            SignatureType::from_code(2),
            Err(Error::UnsupportedSignatureType(2))
        );
    }

    #[test]
    fn test_iso_string() {
        assert_eq!(&to_iso_string(0).unwrap(), b"19700101T000000");
        assert_eq!(&to_iso_string(1_420_070_400_000).unwrap(), b"20150101T000000");
        assert_eq!(&to_iso_string(1_451_606_399_999).unwrap(), b"20151231T235959");

        assert_eq!(from_iso_string(b"20150101T000000"), Ok(1_420_070_400_000));
        assert_eq!(from_iso_string(b"20000229T123456"), Ok(951_827_696_000));
        assert_eq!(from_iso_string(b"2015-01-01T0000"), Err(Error::InvalidTimestamp));
        assert_eq!(from_iso_string(b"20151301T000000"), Err(Error::InvalidTimestamp));
    }

    #[test]
    fn test_validity_period() {
        let period = ValidityPeriodLite::new(1000, 2000);
        assert!(period.is_valid(1000));
        assert!(period.is_valid(2000));
        assert!(!period.is_valid(2001));
    }
}
