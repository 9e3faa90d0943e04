use quai_addresses::AddressError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    String(String),

    /// Seed must be between 16 and 64 bytes.
    #[error("seed length invalid")]
    SeedLength,

    #[error("maximum derivation depth exceeded")]
    Depth,

    #[error("invalid child number")]
    ChildNumber,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid path component `{component}` at path[{index}]")]
    PathComponent { index: usize, component: String },

    #[error("cannot derive root path (i.e. path starting with \"m/\") for a node at non-zero depth {0}")]
    RootPathAtDepth(u8),

    #[error("cryptographic error")]
    Crypto,

    #[error("scalar bytes out of range")]
    ScalarOutOfRange,

    #[error("Secp256k1 -> {0}")]
    Secp256k1Error(#[from] secp256k1::Error),

    #[error(transparent)]
    AddressError(#[from] AddressError),
}

impl From<hmac::digest::InvalidLength> for Error {
    fn from(_: hmac::digest::InvalidLength) -> Error {
        Error::Crypto
    }
}

impl From<secp256k1::scalar::OutOfRangeError> for Error {
    fn from(_: secp256k1::scalar::OutOfRangeError) -> Error {
        Error::ScalarOutOfRange
    }
}

impl From<std::array::TryFromSliceError> for Error {
    fn from(_: std::array::TryFromSliceError) -> Error {
        Error::Crypto
    }
}
