//!
//! Hierarchical deterministic key nodes restricted to the BIP44 layout
//! `m/44'/<coin>'/<account>'/<change>/<address_index>`.
//!

use crate::types::*;
use crate::{is_valid_path, ChildNumber, DerivationPath, Error, Mnemonic, Result};
use hmac::Mac;
use log::trace;
use quai_addresses::Address;
use rand::RngCore;
use ripemd::Ripemd160;
use secp256k1::{PublicKey, Scalar, SecretKey, SECP256K1};
use sha2::{Digest, Sha256};
use std::fmt::{self, Debug};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// Derivation domain separator for BIP39 keys ("Bitcoin seed").
const MASTER_SECRET: [u8; 12] = [0x42, 0x69, 0x74, 0x63, 0x6f, 0x69, 0x6e, 0x20, 0x73, 0x65, 0x65, 0x64];

/// Depth of the BIP44 account level (`m/44'/coin'/account'`).
pub const ACCOUNT_DEPTH: Depth = 3;

/// Number of segments of a full address-level path, `m` included.
const ADDRESS_PATH_SEGMENTS: usize = 6;

/// First four bytes of RIPEMD160(SHA256(compressed public key)).
pub fn fingerprint(public_key: &PublicKey) -> KeyFingerprint {
    let digest = Ripemd160::digest(Sha256::digest(public_key.serialize()));
    let mut fingerprint = KeyFingerprint::default();
    fingerprint.copy_from_slice(&digest[..4]);
    fingerprint
}

/// A node in the key tree. Nodes are immutable; derivation produces new,
/// independent nodes.
#[derive(Clone)]
pub struct HDNode {
    secret_key: SecretKey,
    public_key: PublicKey,
    address: Address,
    chain_code: ChainCode,
    path: DerivationPath,
    index: ChildNumber,
    depth: Depth,
    fingerprint: KeyFingerprint,
    account_fingerprint: KeyFingerprint,
    mnemonic: Option<Mnemonic>,
}

impl HDNode {
    fn new(
        secret_key: SecretKey,
        chain_code: ChainCode,
        path: DerivationPath,
        index: ChildNumber,
        depth: Depth,
        account_fingerprint: KeyFingerprint,
        mnemonic: Option<Mnemonic>,
    ) -> Result<Self> {
        let public_key = secret_key.public_key(SECP256K1);
        let address = Address::from_uncompressed_public_key(&public_key.serialize_uncompressed())?;
        let fingerprint = fingerprint(&public_key);
        Ok(Self { secret_key, public_key, address, chain_code, path, index, depth, fingerprint, account_fingerprint, mnemonic })
    }

    /// Root node of the tree seeded by `seed` (16 to 64 bytes).
    pub(crate) fn from_seed(seed: &[u8], mnemonic: Option<Mnemonic>) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::SeedLength);
        }

        let mut hmac = HmacSha512::new_from_slice(&MASTER_SECRET)?;
        hmac.update(seed);
        let result = hmac.finalize().into_bytes();
        let (secret_key, chain_code) = result.split_at(KEY_SIZE);

        Self::new(
            SecretKey::from_slice(secret_key)?,
            chain_code.try_into()?,
            DerivationPath::default(),
            ChildNumber::default(),
            0,
            KeyFingerprint::default(),
            mnemonic,
        )
    }

    fn check_path(path: &str) -> Result<()> {
        if is_valid_path(path) {
            Ok(())
        } else {
            Err(Error::InvalidPath(path.to_string()))
        }
    }

    /// A node at `path` below a fresh random 32-byte seed. No mnemonic is attached.
    pub fn create_random(path: &str) -> Result<Self> {
        Self::check_path(path)?;
        let mut seed = Zeroizing::new([0u8; 32]);
        rand::thread_rng().fill_bytes(&mut seed[..]);
        Self::from_seed(&seed[..], None)?.derive_path(path)
    }

    pub fn from_mnemonic(mnemonic: &Mnemonic, path: &str) -> Result<Self> {
        Self::check_path(path)?;
        let seed = mnemonic.compute_seed()?;
        Self::from_seed(seed.as_ref(), Some(mnemonic.clone()))?.derive_path(path)
    }

    pub fn from_phrase(phrase: &str, password: Option<&str>, path: &str) -> Result<Self> {
        Self::from_mnemonic(&Mnemonic::new(phrase, password)?, path)
    }

    /// Derive the child at `index`; indices with the top bit set are hardened.
    ///
    /// Deriving from a full address-level path replaces the address index
    /// instead of descending, so the result is a sibling address.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        let index = ChildNumber(index);
        let mut path = self.path.clone();
        let mut depth = self.depth;
        if path.segments() == ADDRESS_PATH_SEGMENTS {
            path.pop();
            depth = depth.checked_sub(1).ok_or(Error::Depth)?;
        }
        path.push(index);
        let depth = depth.checked_add(1).ok_or(Error::Depth)?;

        let mut hmac = HmacSha512::new_from_slice(&self.chain_code)?;
        if index.is_hardened() {
            hmac.update(&[0]);
            hmac.update(&self.secret_key.secret_bytes());
        } else {
            hmac.update(&self.public_key.serialize());
        }
        hmac.update(&index.to_bytes());

        let result = hmac.finalize().into_bytes();
        let (child_key, chain_code) = result.split_at(KEY_SIZE);

        // IL >= n or a zero child key fails instead of skipping to the next index;
        // the probability is below 2^-127.
        let tweak = Scalar::from_be_bytes(child_key.try_into()?)?;
        let secret_key = self.secret_key.add_tweak(&tweak)?;

        let account_fingerprint = if self.depth == ACCOUNT_DEPTH { self.fingerprint } else { self.account_fingerprint };

        Self::new(secret_key, chain_code.try_into()?, path, index, depth, account_fingerprint, self.mnemonic.clone())
    }

    /// Derive along `path`. A leading `m` is only accepted on a depth 0 node;
    /// other paths are relative to this node. Segments are `N` or `N'` with `N < 2^31`.
    pub fn derive_path(&self, path: &str) -> Result<Self> {
        let mut components = path.split('/').peekable();
        if components.peek() == Some(&"m") {
            if self.depth != 0 {
                return Err(Error::RootPathAtDepth(self.depth));
            }
            components.next();
        }

        let mut node = self.clone();
        for (index, component) in components.enumerate() {
            let child = component
                .parse::<ChildNumber>()
                .map_err(|_| Error::PathComponent { index, component: component.to_string() })?;
            node = node.derive_child(child.0)?;
        }
        trace!("derived {} (depth {})", node.path, node.depth);
        Ok(node)
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn private_key_bytes(&self) -> Zeroizing<[u8; KEY_SIZE]> {
        Zeroizing::new(self.secret_key.secret_bytes())
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// 33-byte SEC1 compressed public key.
    pub fn compressed_public_key(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn index(&self) -> ChildNumber {
        self.index
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn fingerprint(&self) -> KeyFingerprint {
        self.fingerprint
    }

    /// Fingerprint of the account level node this node descends from.
    pub fn account_fingerprint(&self) -> KeyFingerprint {
        self.account_fingerprint
    }

    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        self.mnemonic.as_ref()
    }

    /// Coin type read from the path (`m/44'/<coin_type>'/...`).
    pub fn coin_type(&self) -> Option<u32> {
        self.path.coin_type()
    }
}

impl ConstantTimeEq for HDNode {
    fn ct_eq(&self, other: &Self) -> Choice {
        let key_a = self.private_key_bytes();
        let key_b = other.private_key_bytes();

        key_a[..].ct_eq(&key_b[..])
            & self.depth.ct_eq(&other.depth)
            & self.account_fingerprint[..].ct_eq(&other.account_fingerprint[..])
            & self.index.0.ct_eq(&other.index.0)
            & self.chain_code[..].ct_eq(&other.chain_code[..])
    }
}

/// NOTE: uses [`ConstantTimeEq`] internally
impl PartialEq for HDNode {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into() && self.path == other.path
    }
}

impl Eq for HDNode {}

impl Debug for HDNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HDNode")
            .field("secret_key", &"...")
            .field("path", &self.path.to_string())
            .field("depth", &self.depth)
            .field("fingerprint", &self.fingerprint)
            .field("account_fingerprint", &self.account_fingerprint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [7u8; 32];

    fn root() -> HDNode {
        HDNode::from_seed(&SEED, None).unwrap()
    }

    #[test]
    fn test_seed_length() {
        assert!(matches!(HDNode::from_seed(&[0u8; 15], None), Err(Error::SeedLength)));
        assert!(matches!(HDNode::from_seed(&[0u8; 65], None), Err(Error::SeedLength)));
        assert!(HDNode::from_seed(&[1u8; 16], None).is_ok());
        assert!(HDNode::from_seed(&[1u8; 64], None).is_ok());
    }

    #[test]
    fn test_bip32_vector_1() {
        // BIP32 test vector 1, chain m/0'
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = HDNode::from_seed(&seed, None).unwrap();
        assert_eq!(hex::encode(*master.private_key_bytes()), "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35");
        assert_eq!(hex::encode(master.chain_code()), "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508");
        assert_eq!(hex::encode(master.fingerprint()), "3442193e");

        let child = master.derive_child(ChildNumber::HARDENED_FLAG).unwrap();
        assert_eq!(hex::encode(*child.private_key_bytes()), "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea");
        assert_eq!(hex::encode(child.chain_code()), "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141");
        assert_eq!(child.path().to_string(), "m/0'");
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn test_deterministic_derivation() {
        let run = || {
            let node = root().derive_child(0).unwrap().derive_child(0x8000_0000).unwrap();
            (*node.private_key_bytes(), *node.chain_code(), node.fingerprint())
        };
        assert_eq!(run(), run());
        let node = root().derive_child(0).unwrap().derive_child(0x8000_0000).unwrap();
        assert_eq!(node.path().to_string(), "m/0/0'");
        assert_eq!(node, root().derive_path("m/0/0'").unwrap());
    }

    #[test]
    fn test_account_fingerprint_propagation() {
        let account = root().derive_path("m/44'/969'/0'").unwrap();
        assert_eq!(account.depth(), 3);
        let change = account.derive_child(0).unwrap();
        assert_eq!(change.account_fingerprint(), account.fingerprint());

        let address = change.derive_child(5).unwrap();
        assert_eq!(change.depth(), 4);
        assert_eq!(address.account_fingerprint(), change.account_fingerprint());
        assert_ne!(address.account_fingerprint(), change.fingerprint());

        let shallow = root().derive_child(1).unwrap();
        assert_eq!(shallow.account_fingerprint(), KeyFingerprint::default());
    }

    #[test]
    fn test_address_path_collapse() {
        let change = root().derive_path("m/44'/994'/0'/0").unwrap();
        let first = change.derive_child(0).unwrap();
        assert_eq!(first.path().to_string(), "m/44'/994'/0'/0/0");
        assert_eq!(first.depth(), 5);

        let sibling = first.derive_child(1).unwrap();
        assert_eq!(sibling.path().to_string(), "m/44'/994'/0'/0/1");
        assert_eq!(sibling.depth(), 5);
        assert_eq!(sibling.account_fingerprint(), first.account_fingerprint());
    }

    #[test]
    fn test_derive_path_rules() {
        let change = root().derive_path("m/44'/994'/0'/0").unwrap();
        assert!(matches!(change.derive_path("m/0"), Err(Error::RootPathAtDepth(4))));
        assert!(matches!(change.derive_path("x"), Err(Error::PathComponent { index: 0, .. })));
        assert!(matches!(root().derive_path("m/2147483648"), Err(Error::PathComponent { index: 0, .. })));
        assert_eq!(change.derive_path("3").unwrap(), change.derive_child(3).unwrap());
        assert_eq!(change.coin_type(), Some(994));
    }

    #[test]
    fn test_entry_points() {
        assert!(matches!(HDNode::create_random("m/44'/994'/0'/0/0"), Err(Error::InvalidPath(_))));
        let node = HDNode::create_random("m/44'/969'/0'/0").unwrap();
        assert_eq!(node.depth(), 4);
        assert!(node.mnemonic().is_none());

        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let a = HDNode::from_phrase(phrase, None, "m/44'/994'/0'/0").unwrap();
        let b = HDNode::from_mnemonic(&Mnemonic::new(phrase, None).unwrap(), "m/44'/994'/0'/0").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.mnemonic().map(Mnemonic::phrase), Some(phrase));
        assert_eq!(a.address(), b.address());
    }
}
