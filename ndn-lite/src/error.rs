use core::fmt;

/// Broad classification of an [`Error`].
///
/// Capacity errors are recoverable by retrying with larger storage; format
/// errors mean the input itself is corrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Capacity,
    UnsupportedFeature,
}

/// Errors raised by the TLV codec and the lite types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A declared length runs past the end of the input.
    UnexpectedEndOfInput,
    /// A varint was encoded wider than its minimal width.
    NonCanonicalVarNumber,
    /// A TLV of one type was found where another was required.
    UnexpectedType { expected: u64, actual: u64 },
    /// A NonNegativeInteger value was not 1, 2, 4 or 8 bytes long.
    InvalidNonNegativeIntegerLength(usize),
    /// A TLV had a length its type does not allow.
    InvalidLength { type_: u64, length: usize },
    /// A field that may appear once appeared twice.
    DuplicateField(u64),
    MissingRequiredField(&'static str),
    /// A ValidityPeriod bound was not a `YYYYMMDDThhmmss` string.
    InvalidTimestamp,
    /// An unrecognized type in the core range where nothing may be skipped.
    UnrecognizedCriticalType(u64),
    UnsupportedSignatureType(u64),
    /// A lite array is full.
    CapacityExceeded { capacity: usize },
    /// The caller-supplied encoding buffer is full.
    OutputBufferTooSmall,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CapacityExceeded { .. } | Error::OutputBufferTooSmall => ErrorKind::Capacity,
            Error::UnrecognizedCriticalType(_) | Error::UnsupportedSignatureType(_) => {
                ErrorKind::UnsupportedFeature
            }
            _ => ErrorKind::Format,
        }
    }

    pub fn is_capacity(&self) -> bool {
        self.kind() == ErrorKind::Capacity
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEndOfInput => write!(f, "TLV length exceeds the remaining input"),
            Error::NonCanonicalVarNumber => write!(f, "varint is not in its shortest form"),
            Error::UnexpectedType { expected, actual } => {
                write!(f, "expected TLV type {}, got {}", expected, actual)
            }
            Error::InvalidNonNegativeIntegerLength(length) => {
                write!(f, "invalid NonNegativeInteger length {}", length)
            }
            Error::InvalidLength { type_, length } => {
                write!(f, "invalid length {} for TLV type {}", length, type_)
            }
            Error::DuplicateField(type_) => write!(f, "TLV type {} appears more than once", type_),
            Error::MissingRequiredField(field) => write!(f, "missing required field {}", field),
            Error::InvalidTimestamp => write!(f, "invalid ISO 8601 timestamp"),
            Error::UnrecognizedCriticalType(type_) => {
                write!(f, "unrecognized critical TLV type {}", type_)
            }
            Error::UnsupportedSignatureType(code) => {
                write!(f, "unsupported signature type {}", code)
            }
            Error::CapacityExceeded { capacity } => {
                write!(f, "capacity of {} entries exceeded", capacity)
            }
            Error::OutputBufferTooSmall => write!(f, "output buffer too small"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

pub(crate) fn check_capacity(needed: usize, capacity: usize) -> Result<()> {
    if needed > capacity {
        return Err(Error::CapacityExceeded { capacity });
    }
    Ok(())
}
