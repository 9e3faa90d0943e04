//!
//! Wallet implementations.
//!

pub mod base;
pub mod utxo;

pub use base::BaseWallet;
pub use utxo::{UtxoAddress, UtxoHdWallet};
