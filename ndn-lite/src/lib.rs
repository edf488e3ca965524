#![cfg_attr(not(feature = "std"), no_std)]

//! Allocation-free NDN-TLV primitives and packet types.
//!
//! Every lite type borrows its arrays from the caller and fails with
//! [`Error::CapacityExceeded`] instead of growing. The codec in [`wire`] is
//! the only implementation of the packet format; heap-backed models encode
//! and decode through it.

pub mod data;
pub mod error;
pub mod exclude;
pub mod interest;
pub mod key_locator;
pub mod meta_info;
pub mod name;
pub mod signature;
pub mod tlv;
pub mod wire;

pub use data::DataLite;
pub use error::{Error, ErrorKind, Result};
pub use exclude::{ExcludeEntryLite, ExcludeLite};
pub use interest::{InterestLite, NONCE_SIZE};
pub use key_locator::{KeyLocatorLite, KeyLocatorType};
pub use meta_info::{ContentType, MetaInfoLite};
pub use name::{NameComponentLite, NameComponentType, NameLite, SHA256_DIGEST_SIZE};
pub use signature::{SignatureLite, SignatureType, ValidityPeriodLite};
pub use tlv::{tlv_types, TlvDecoder, TlvElement, TlvEncoder};
pub use wire::{SignedPortion, TlvRevision, TlvWireFormatLite};
