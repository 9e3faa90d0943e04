//!
//! Utilities and helpers for unit testing.
//!

mod utxo_lookup_mock;
pub use utxo_lookup_mock::*;
