//!
//! Constants shared by the wire codec and the signature layer.
//!

/// Transaction type codes as they appear in the `type` wire field.
pub mod tx_type {
    pub const STANDARD: u64 = 0;
    /// Reserved. Named but not constructible.
    pub const EXTERNAL: u64 = 1;
    pub const INTERNAL_TO_EXTERNAL: u64 = 2;
    /// UTXO ledger transaction.
    pub const QI: u64 = 3;
}

/// Length of the compact `r || s || v` recoverable signature.
pub const SIGNATURE_SIZE: usize = 65;

/// Length of a BIP340 Schnorr signature.
pub const SCHNORR_SIGNATURE_SIZE: usize = 64;

/// Offset added to `yParity` to form the legacy `v` value.
pub const V_OFFSET: u8 = 27;

/// Length of a storage key in an access list.
pub const STORAGE_KEY_SIZE: usize = 32;
