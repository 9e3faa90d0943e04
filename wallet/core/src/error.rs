use crate::musig::SessionPhase;
use quai_addresses::{Address, AddressError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("missing private key for {0}")]
    MissingKey(Address),

    #[error("transaction from address mismatch: expected {expected}, got {actual}")]
    FromMismatch { expected: Address, actual: Address },

    #[error("invalid UTXO transaction, missing inputs or outputs")]
    InvalidUtxoTransaction,

    #[error("signing session expected phase `{expected}`, found `{actual}`")]
    SessionPhase { expected: SessionPhase, actual: SessionPhase },

    #[error("MuSig2 -> {0}")]
    MuSig2(String),

    #[error(transparent)]
    ConsensusError(#[from] quai_consensus_core::Error),

    #[error(transparent)]
    Bip32Error(#[from] quai_bip32::Error),

    #[error(transparent)]
    AddressError(#[from] AddressError),

    #[error("Secp256k1 -> {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

impl Error {
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
