use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use ndn_lite::tlv::{decode_non_negative_integer, non_negative_integer_size};
use ndn_lite::{NameComponentLite, NameComponentType, NameLite, SHA256_DIGEST_SIZE};

use crate::blob::{hex, Blob};
use crate::change_counter::{next_change_count, ChangeCount};
use crate::error::{Error, Result};
use crate::wire_format::{default_wire_format, WireFormat};

/// Marker byte of a segment number component.
pub const SEGMENT_MARKER: u8 = 0x00;
/// Marker byte of a version number component.
pub const VERSION_MARKER: u8 = 0xFD;

const DIGEST_URI_PREFIX: &str = "sha256digest=";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameComponent {
    value: Blob,
    component_type: NameComponentType,
}

impl NameComponent {
    pub fn new(value: impl Into<Blob>) -> Self {
        Self {
            value: value.into(),
            component_type: NameComponentType::Generic,
        }
    }

    pub fn implicit_sha256_digest(digest: impl Into<Blob>) -> Result<Self> {
        let value = digest.into();
        NameComponentLite::implicit_sha256_digest(&value)?;
        Ok(Self {
            value,
            component_type: NameComponentType::ImplicitSha256Digest,
        })
    }

    /// A marker byte followed by `number` as a NonNegativeInteger.
    pub fn from_number_with_marker(number: u64, marker: u8) -> Self {
        let size = non_negative_integer_size(number);
        let mut value = Vec::with_capacity(size + 1);
        value.push(marker);
        value.extend_from_slice(&number.to_be_bytes()[8 - size..]);
        Self::new(value)
    }

    pub fn from_segment(segment: u64) -> Self {
        Self::from_number_with_marker(segment, SEGMENT_MARKER)
    }

    pub fn from_version(version: u64) -> Self {
        Self::from_number_with_marker(version, VERSION_MARKER)
    }

    /// Parse one escaped URI component. `.` and `..` name no component and
    /// are rejected.
    pub fn from_escaped_str(escaped: &str) -> Result<Self> {
        let escaped = escaped.trim();
        if let Some(digest) = escaped.strip_prefix(DIGEST_URI_PREFIX) {
            let digest = hex::decode(digest)
                .filter(|digest| digest.len() == SHA256_DIGEST_SIZE)
                .ok_or_else(|| Error::InvalidUri(escaped.to_string()))?;
            return Self::implicit_sha256_digest(digest);
        }

        if escaped.bytes().all(|c| c == b'.') {
            if escaped.len() <= 2 {
                return Err(Error::InvalidUri(escaped.to_string()));
            }
            return Ok(Self::new(&escaped.as_bytes()[3..]));
        }

        let bytes = escaped.as_bytes();
        let mut value = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                let byte = bytes
                    .get(i + 1..i + 3)
                    .and_then(|pair| Some((hex::digit(pair[0])? << 4) | hex::digit(pair[1])?))
                    .ok_or_else(|| Error::InvalidUri(escaped.to_string()))?;
                value.push(byte);
                i += 3;
            } else {
                value.push(bytes[i]);
                i += 1;
            }
        }
        Ok(Self::new(value))
    }

    pub fn value(&self) -> &Blob {
        &self.value
    }

    pub fn component_type(&self) -> NameComponentType {
        self.component_type
    }

    pub fn is_implicit_sha256_digest(&self) -> bool {
        self.component_type == NameComponentType::ImplicitSha256Digest
    }

    /// The number after `marker`, if this component starts with it.
    pub fn to_number_with_marker(&self, marker: u8) -> Option<u64> {
        match self.value.split_first() {
            Some((&first, rest)) if first == marker => decode_non_negative_integer(rest).ok(),
            _ => None,
        }
    }

    pub fn to_segment(&self) -> Option<u64> {
        self.to_number_with_marker(SEGMENT_MARKER)
    }

    pub fn to_version(&self) -> Option<u64> {
        self.to_number_with_marker(VERSION_MARKER)
    }

    pub(crate) fn to_lite(&self) -> ndn_lite::Result<NameComponentLite<'_>> {
        match self.component_type {
            NameComponentType::Generic => Ok(NameComponentLite::new(&self.value)),
            NameComponentType::ImplicitSha256Digest => {
                NameComponentLite::implicit_sha256_digest(&self.value)
            }
        }
    }

    pub(crate) fn from_lite(component: &NameComponentLite<'_>) -> Self {
        Self {
            value: Blob::new(component.value()),
            component_type: component.component_type(),
        }
    }
}

impl Ord for NameComponent {
    /// Canonical NDN order: component type, then length, then bytes.
    fn cmp(&self, other: &Self) -> Ordering {
        self.component_type
            .tlv_type()
            .cmp(&other.component_type.tlv_type())
            .then(self.value.len().cmp(&other.value.len()))
            .then_with(|| self.value.as_slice().cmp(other.value.as_slice()))
    }
}

impl PartialOrd for NameComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for NameComponent {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for NameComponent {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for NameComponent {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<Blob> for NameComponent {
    fn from(value: Blob) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for NameComponent {
    /// The escaped URI form of the component.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_implicit_sha256_digest() {
            return write!(f, "{}{}", DIGEST_URI_PREFIX, self.value.to_hex());
        }
        if self.value.iter().all(|&c| c == b'.') {
            // Three extra periods keep "", "." and ".." distinct from path syntax.
            f.write_str("...")?;
            for _ in 0..self.value.len() {
                f.write_str(".")?;
            }
            return Ok(());
        }
        for &c in self.value.iter() {
            if c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.' | b'_') {
                write!(f, "{}", c as char)?;
            } else {
                write!(f, "%{:02X}", c)?;
            }
        }
        Ok(())
    }
}

/// An NDN name: an ordered sequence of components.
#[derive(Debug, Clone, Default)]
pub struct Name {
    components: Vec<NameComponent>,
    change_count: u64,
}

impl Name {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an NDN URI such as `/ndn/abc` or `ndn:/ndn/abc`.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let mut rest = uri.trim();
        if let Some(colon) = rest.find(':') {
            if rest.find('/').map_or(true, |slash| colon < slash) {
                rest = &rest[colon + 1..];
                if let Some(authority) = rest.strip_prefix("//") {
                    rest = authority.find('/').map_or("", |slash| &authority[slash..]);
                }
            }
        }

        let mut name = Name::new();
        for escaped in rest.split('/') {
            let escaped = escaped.trim();
            if escaped.is_empty() || escaped == "." || escaped == ".." {
                continue;
            }
            name.append_component(NameComponent::from_escaped_str(escaped)?);
        }
        Ok(name)
    }

    pub fn to_uri(&self) -> String {
        self.to_string()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NameComponent> {
        self.components.get(index)
    }

    pub fn components(&self) -> &[NameComponent] {
        &self.components
    }

    /// Append a generic component holding `value`.
    pub fn append(&mut self, value: impl Into<Blob>) -> &mut Self {
        self.append_component(NameComponent::new(value))
    }

    pub fn append_component(&mut self, component: NameComponent) -> &mut Self {
        self.components.push(component);
        self.set_changed();
        self
    }

    pub fn append_name(&mut self, name: &Name) -> &mut Self {
        self.components.extend_from_slice(&name.components);
        self.set_changed();
        self
    }

    pub fn append_segment(&mut self, segment: u64) -> &mut Self {
        self.append_component(NameComponent::from_segment(segment))
    }

    pub fn append_version(&mut self, version: u64) -> &mut Self {
        self.append_component(NameComponent::from_version(version))
    }

    pub fn append_implicit_sha256_digest(&mut self, digest: impl Into<Blob>) -> Result<&mut Self> {
        let component = NameComponent::implicit_sha256_digest(digest)?;
        Ok(self.append_component(component))
    }

    /// The first `count` components (all of them if there are fewer).
    pub fn get_prefix(&self, count: usize) -> Name {
        self.get_sub_name(0, count)
    }

    /// Up to `count` components starting at `start`.
    pub fn get_sub_name(&self, start: usize, count: usize) -> Name {
        let components: Vec<_> = self.components.iter().skip(start).take(count).cloned().collect();
        Name::from(components)
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a == b)
    }

    pub fn pop(&mut self) -> Option<NameComponent> {
        let component = self.components.pop();
        if component.is_some() {
            self.set_changed();
        }
        component
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.set_changed();
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub fn wire_encode(&self) -> Result<Blob> {
        self.wire_encode_with(default_wire_format())
    }

    pub fn wire_encode_with(&self, wire_format: &dyn WireFormat) -> Result<Blob> {
        wire_format.encode_name(self)
    }

    /// Replace this name with the Name TLV at the front of `input`. On
    /// failure the name is unchanged.
    pub fn wire_decode(&mut self, input: &[u8]) -> Result<()> {
        self.wire_decode_with(input, default_wire_format())
    }

    pub fn wire_decode_with(&mut self, input: &[u8], wire_format: &dyn WireFormat) -> Result<()> {
        wire_format.decode_name(self, input).map(|_| ())
    }

    /// Fill `lite` with views of this name's components.
    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut NameLite<'a, '_>) -> ndn_lite::Result<()> {
        lite.clear();
        for component in &self.components {
            lite.append_component(component.to_lite()?)?;
        }
        Ok(())
    }

    pub(crate) fn from_lite(lite: &NameLite<'_, '_>) -> Self {
        Name::from(
            lite.components()
                .iter()
                .map(NameComponent::from_lite)
                .collect::<Vec<_>>(),
        )
    }

    fn set_changed(&mut self) {
        self.change_count = next_change_count();
    }
}

impl From<Vec<NameComponent>> for Name {
    fn from(components: Vec<NameComponent>) -> Self {
        Self {
            components,
            change_count: next_change_count(),
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(uri: &str) -> Result<Self> {
        Name::from_uri(uri)
    }
}

impl ChangeCount for Name {
    fn change_count(&self) -> u64 {
        self.change_count
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl Ord for Name {
    /// Componentwise canonical order; a proper prefix sorts first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_uri() {
        let name = Name::from_uri("/ndn/abc").unwrap();
        assert_eq!(name.len(), 2);
        assert_eq!(name.get(0).unwrap().value().as_slice(), b"ndn");
        assert_eq!(name.get(1).unwrap().value().as_slice(), b"abc");
        assert_eq!(name.to_uri(), "/ndn/abc");
    }

    #[test]
    fn test_scheme_and_authority_are_stripped() {
        let expected = Name::from_uri("/a/b").unwrap();
        assert_eq!(Name::from_uri("ndn:/a/b").unwrap(), expected);
        assert_eq!(Name::from_uri("ndn://authority/a/b").unwrap(), expected);
        assert_eq!(Name::from_uri("  /a//b/  ").unwrap(), expected);
    }

    #[test]
    fn test_empty_name() {
        let name = Name::from_uri("/").unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_uri(), "/");
        assert_eq!(Name::new().to_string(), "/");
    }

    #[test]
    fn test_escaping() {
        let mut name = Name::new();
        name.append(&b"hello world"[..]).append(&[0x00u8, 0xFF][..]);
        assert_eq!(name.to_uri(), "/hello%20world/%00%FF");
        assert_eq!(Name::from_uri(&name.to_uri()).unwrap(), name);
    }

    #[test]
    fn test_period_components() {
        let name = Name::from_uri("/a/./b/../.../....").unwrap();
        assert_eq!(name.len(), 4);
        assert!(name.get(2).unwrap().value().is_empty());
        assert_eq!(name.get(3).unwrap().value().as_slice(), b".");
        assert_eq!(name.to_uri(), "/a/b/.../....");
    }

    #[test]
    fn test_invalid_escape() {
        assert!(matches!(Name::from_uri("/a%zz"), Err(Error::InvalidUri(_))));
        assert!(matches!(Name::from_uri("/a%4"), Err(Error::InvalidUri(_))));
    }

    #[test]
    fn test_implicit_digest_uri() {
        let mut name = Name::from_uri("/a").unwrap();
        name.append_implicit_sha256_digest(vec![0xAB; 32]).unwrap();
        let uri = name.to_uri();
        assert!(uri.starts_with("/a/sha256digest=abab"));
        let parsed: Name = uri.parse().unwrap();
        assert!(parsed.get(1).unwrap().is_implicit_sha256_digest());
        assert_eq!(parsed, name);

        assert!(Name::new().append_implicit_sha256_digest(vec![0; 31]).is_err());
    }

    #[test]
    fn test_segment_and_version() {
        let mut name = Name::new();
        name.append_segment(0).append_version(0x1234);
        assert_eq!(name.get(0).unwrap().value().as_slice(), &[0x00, 0x00]);
        assert_eq!(name.get(1).unwrap().value().as_slice(), &[0xFD, 0x12, 0x34]);
        assert_eq!(name.get(0).unwrap().to_segment(), Some(0));
        assert_eq!(name.get(1).unwrap().to_version(), Some(0x1234));
        assert_eq!(name.get(1).unwrap().to_segment(), None);
    }

    #[test]
    fn test_prefix_and_sub_name() {
        let name = Name::from_uri("/a/b/c").unwrap();
        assert_eq!(name.get_prefix(2).to_uri(), "/a/b");
        assert_eq!(name.get_prefix(10), name);
        assert_eq!(name.get_sub_name(1, 1).to_uri(), "/b");
        assert!(name.get_prefix(2).is_prefix_of(&name));
        assert!(!name.is_prefix_of(&name.get_prefix(2)));
    }

    #[test]
    fn test_canonical_order() {
        let a = Name::from_uri("/a").unwrap();
        let ab = Name::from_uri("/a/b").unwrap();
        let zz = Name::from_uri("/zz").unwrap();
        let b = Name::from_uri("/b").unwrap();
        assert!(a < ab);
        assert!(ab < b);
        // Shorter components sort first.
        assert!(b < zz);
    }

    #[test]
    fn test_mutation_changes_count() {
        let mut name = Name::from_uri("/a").unwrap();
        let before = name.change_count();
        name.append("b");
        assert_ne!(name.change_count(), before);

        let copy = name.clone();
        assert_eq!(copy.change_count(), name.change_count());
    }

    #[test]
    fn test_wire_round_trip() {
        let name = Name::from_uri("/ndn/abc").unwrap();
        let encoding = name.wire_encode().unwrap();
        assert_eq!(
            encoding.as_slice(),
            &[0x07, 0x0A, 0x08, 0x03, b'n', b'd', b'n', 0x08, 0x03, b'a', b'b', b'c']
        );

        let mut decoded = Name::new();
        decoded.wire_decode(&encoding).unwrap();
        assert_eq!(decoded, name);
    }

    #[test]
    fn test_failed_decode_leaves_name() {
        let mut name = Name::from_uri("/keep").unwrap();
        assert!(name.wire_decode(&[0x07, 0x05, 0x08, 0x03]).is_err());
        assert_eq!(name.to_uri(), "/keep");
    }
}
