//! Runs in its own process: the default wire format can only be chosen once.

use chrono::{TimeZone, Utc};
use ndn_core::{
    default_wire_format, set_default_wire_format, Blob, Data, Error, KeyLocator, Name, SignatureType,
    ValidityPeriod, TLV_WIRE_FORMAT_0_1, TLV_WIRE_FORMAT_0_1_1,
};

#[test]
fn test_set_default_wire_format_once() {
    set_default_wire_format(&TLV_WIRE_FORMAT_0_1).unwrap();
    assert!(std::ptr::addr_eq(default_wire_format(), &TLV_WIRE_FORMAT_0_1));

    let error = set_default_wire_format(&TLV_WIRE_FORMAT_0_1_1).unwrap_err();
    assert!(matches!(error, Error::DefaultWireFormatAlreadySet));

    let not_before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let not_after = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut data = Data::new(Name::from_uri("/a").unwrap());
    data.signature_mut()
        .set_signature_type(SignatureType::Sha256WithRsa)
        .set_key_locator(KeyLocator::from_key_name(Name::from_uri("/key").unwrap()))
        .set_validity_period(Some(ValidityPeriod::new(not_before, not_after)))
        .set_signature(Some(Blob::from(vec![0x55; 16])));

    // Revision 0.1 has no ValidityPeriod, so it is dropped.
    let encoding = data.wire_encode().unwrap();
    assert_eq!(data.default_wire_encoding(), Some(encoding.clone()));
    let mut decoded = Data::default();
    decoded.wire_decode(&encoding).unwrap();
    assert_eq!(decoded.signature().validity_period(), None);

    // Other formats still work when passed explicitly, without the cache.
    let explicit = data.wire_encode_with(&TLV_WIRE_FORMAT_0_1_1).unwrap();
    assert!(explicit.len() > encoding.len());
    assert_eq!(data.default_wire_encoding(), Some(encoding));

    let mut decoded = Data::default();
    decoded
        .wire_decode_with(&explicit, &TLV_WIRE_FORMAT_0_1_1)
        .unwrap();
    assert!(decoded.signature().validity_period().is_some());
    assert_eq!(decoded.default_wire_encoding(), None);
}
