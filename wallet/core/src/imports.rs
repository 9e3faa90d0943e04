//!
//! Common imports used internally by the wallet crate.
//!

pub use crate::error::Error;
pub use crate::result::Result;
pub use crate::rpc::{AddressClassifier, PrefixClassifier, UtxoLookup};
pub use crate::settings::WalletSettings;

pub use async_trait::async_trait;
pub use log::{debug, info, trace};
pub use quai_addresses::{Address, Ledger, Zone};
pub use quai_bip32::{AddressType, DerivationPath, HDNode};
pub use quai_consensus_core::tx::{Outpoint, QiTransaction, Signature, Transaction, TransactionLike};
pub use quai_hashes::Hash;
pub use secp256k1::{PublicKey, SecretKey, XOnlyPublicKey, SECP256K1};
pub use serde::{Deserialize, Serialize};
pub use std::str::FromStr;
pub use std::sync::Arc;
