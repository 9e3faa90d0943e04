//!
//! Wallets for the Quai (account) and Qi (UTXO) ledgers.
//!
//! [`BaseWallet`](wallet::BaseWallet) signs account transactions and
//! messages with a single key. [`UtxoHdWallet`](wallet::UtxoHdWallet)
//! discovers funded Qi addresses below a BIP44 change node and signs Qi
//! transactions, falling back to a MuSig2 [`SigningSession`](musig::SigningSession)
//! when inputs are spread over several keys.
//!

extern crate self as quai_wallet_core;

pub mod error;
mod imports;
pub mod musig;
pub mod result;
pub mod rpc;
pub mod settings;
pub mod wallet;

#[cfg(test)]
pub mod tests;

pub use error::Error;
pub use musig::SigningSession;
pub use result::Result;
pub use settings::WalletSettings;
pub use wallet::{BaseWallet, UtxoAddress, UtxoHdWallet};
