//! NDN packets with change tracking and pluggable wire formats.
//!
//! [`Interest`] and [`Data`] own their fields and remember which of them
//! changed, so a cached encoding is reused until the next edit and an
//! Interest nonce never outlives the fields it was chosen for. Encoding is
//! delegated to a [`WireFormat`]; the default is NDN-TLV 0.1.1, implemented
//! by the allocation-free codec in [`lite`].

pub mod blob;
mod change_counter;
pub mod data;
pub mod error;
pub mod exclude;
pub mod interest;
pub mod key_locator;
pub mod meta_info;
pub mod name;
pub mod security;
pub mod signature;
pub mod wire_format;

pub use ndn_lite as lite;

pub use blob::{Blob, SignedBlob};
pub use data::Data;
pub use error::{Error, Result};
pub use exclude::{Exclude, ExcludeEntry};
pub use interest::Interest;
pub use key_locator::KeyLocator;
pub use meta_info::{duration_to_millis, MetaInfo};
pub use name::{Name, NameComponent};
pub use ndn_lite::{ContentType, KeyLocatorType, NameComponentType, SignedPortion, TlvRevision};
pub use security::{MemoryPrivateKeyStorage, PrivateKeyStorage, Signer};
pub use signature::{Signature, SignatureType, ValidityPeriod};
pub use wire_format::{
    default_wire_format, set_default_wire_format, TlvWireFormat, WireFormat, TLV_WIRE_FORMAT_0_1,
    TLV_WIRE_FORMAT_0_1_1,
};
