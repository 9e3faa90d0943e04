use hmac::Hmac;
use sha2::Sha512;

/// Size of a secret key and of a chain code.
pub const KEY_SIZE: usize = 32;

/// Chain code: extension for both private and public keys which provides an
/// additional 256 bits of entropy.
pub type ChainCode = [u8; KEY_SIZE];

/// Derivation depth.
pub type Depth = u8;

/// BIP32 key fingerprints.
pub type KeyFingerprint = [u8; 4];

/// HMAC with SHA-512
pub type HmacSha512 = Hmac<Sha512>;
