//!
//! Transaction model for the Quai network: the account ledger [`tx::Transaction`]
//! and the UTXO ledger [`tx::QiTransaction`], their protobuf wire codec,
//! digests and ECDSA / Schnorr signatures.
//!

pub mod config;
pub mod confirmation;
pub mod convert;
pub mod error;
pub mod proto;
pub mod result;
pub mod sign;
pub mod tx;

pub use error::Error;
pub use result::Result;
