use ndn_lite::ErrorKind;

use crate::name::Name;
use crate::signature::SignatureType;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed TLV: {0}")]
    Format(ndn_lite::Error),
    #[error("Capacity exceeded: {0}")]
    Capacity(ndn_lite::Error),
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(ndn_lite::Error),
    #[error("Key does not exist: {0}")]
    MissingKey(Name),
    #[error("Unsupported signature algorithm: {0:?}")]
    UnsupportedAlgorithm(SignatureType),
    #[error("Invalid name URI: {0}")]
    InvalidUri(String),
    #[error("RSA error: {0}")]
    Signing(#[from] rsa::Error),
    #[error("Cannot verify signature: {0}")]
    Verification(&'static str),
    #[error("The default wire format has already been set")]
    DefaultWireFormatAlreadySet,
    #[error("{0} is not implemented by this wire format")]
    Unimplemented(&'static str),
}

impl Error {
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// A capacity error can be retried with larger storage.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Error::Capacity(_))
    }
}

impl From<ndn_lite::Error> for Error {
    fn from(error: ndn_lite::Error) -> Self {
        match error.kind() {
            ErrorKind::Format => Error::Format(error),
            ErrorKind::Capacity => Error::Capacity(error),
            ErrorKind::UnsupportedFeature => Error::UnsupportedFeature(error),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
