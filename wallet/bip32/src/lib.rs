//!
//! BIP32 hierarchical key derivation laid out along BIP44
//! (`m/44'/<coin>'/<account>'/<change>/<address_index>`), with
//! phrase-seeded roots.
//!

mod address_type;
mod child_number;
mod derivation_path;
mod error;
mod mnemonic;
mod node;
mod result;
pub mod types;

pub use address_type::AddressType;
pub use child_number::ChildNumber;
pub use derivation_path::{is_valid_path, DerivationPath, BIP44_PURPOSE};
pub use error::Error;
pub use mnemonic::{Mnemonic, Seed};
pub use node::{fingerprint, HDNode, ACCOUNT_DEPTH};
pub use result::Result;
pub use types::*;

pub use secp256k1::{PublicKey, SecretKey};
