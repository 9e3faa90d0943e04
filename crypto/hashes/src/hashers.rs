use crate::Hash;
use sha3::{Digest, Keccak256 as Keccak256Core};

/// Incremental hashing interface shared by the digests in this crate.
pub trait HasherBase {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self;
}

pub trait Hasher: HasherBase + Clone + Default {
    fn finalize(self) -> Hash;

    fn hash<A: AsRef<[u8]>>(data: A) -> Hash {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Keccak-256 (the pre-standard SHA3 padding), used for transaction
/// pre-images, transaction hashes and address derivation.
#[derive(Clone, Default)]
pub struct Keccak256(Keccak256Core);

impl Keccak256 {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HasherBase for Keccak256 {
    #[inline(always)]
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.0.update(data.as_ref());
        self
    }
}

impl Hasher for Keccak256 {
    #[inline(always)]
    fn finalize(self) -> Hash {
        Hash::from_bytes(self.0.finalize().into())
    }
}

/// Digest used for UTXO (Qi) input authorization.
pub type UtxoHash = Keccak256;

#[inline]
pub fn keccak256<A: AsRef<[u8]>>(data: A) -> Hash {
    Keccak256::hash(data)
}

#[inline]
pub fn utxo_hash<A: AsRef<[u8]>>(data: A) -> Hash {
    UtxoHash::hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keccak256_vectors() {
        assert_eq!(keccak256(b""), Hash::from_str("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470").unwrap());
        assert_eq!(keccak256(b"abc"), Hash::from_str("4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45").unwrap());
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Keccak256::new();
        hasher.update(b"ab").update(b"c");
        assert_eq!(hasher.finalize(), keccak256(b"abc"));
        assert_eq!(utxo_hash(b"abc"), keccak256(b"abc"));
    }
}
