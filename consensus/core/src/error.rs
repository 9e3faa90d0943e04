use quai_addresses::AddressError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A malformed value was supplied for `field`.
    #[error("invalid {field} `{value}`: {message}")]
    InvalidArgument { field: String, value: String, message: String },

    /// The fields are individually valid but violate a cross-field rule.
    #[error("bad transaction data: {0}")]
    InvalidData(String),

    #[error("unsupported operation `{operation}`: {message}")]
    UnsupportedOperation { operation: String, message: String },

    #[error("Secp256k1 -> {0}")]
    Secp256k1Error(#[from] secp256k1::Error),

    #[error(transparent)]
    AddressError(#[from] AddressError),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn invalid_argument(field: &str, value: impl ToString, message: &str) -> Self {
        Error::InvalidArgument { field: field.to_string(), value: value.to_string(), message: message.to_string() }
    }

    pub fn unsupported(operation: &str, message: &str) -> Self {
        Error::UnsupportedOperation { operation: operation.to_string(), message: message.to_string() }
    }

    pub fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Self::Custom(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Self::Custom(err.to_string())
    }
}
