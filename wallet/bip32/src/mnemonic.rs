//!
//! Seed source for phrase-based wallets. Word list validation is not
//! performed here; the phrase is used as given.
//!

use crate::types::HmacSha512;
use crate::{Error, Result};
use zeroize::{Zeroize, Zeroizing};

/// Number of PBKDF2 rounds to perform when deriving the seed
const PBKDF2_ROUNDS: u32 = 2048;

/// BIP39 seeds.
pub struct Seed(pub(crate) [u8; Seed::SIZE]);

impl Seed {
    /// Number of bytes of PBKDF2 output to extract.
    pub const SIZE: usize = 64;

    /// Get the inner secret byte slice
    pub fn as_bytes(&self) -> &[u8; Seed::SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A mnemonic phrase together with its optional password.
#[derive(Clone)]
pub struct Mnemonic {
    phrase: String,
    password: String,
}

impl Mnemonic {
    pub fn new(phrase: &str, password: Option<&str>) -> Result<Self> {
        let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        if phrase.is_empty() {
            return Err(Error::String("empty mnemonic phrase".to_string()));
        }
        Ok(Self { phrase, password: password.unwrap_or_default().to_string() })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// PBKDF2-HMAC-SHA512 over the phrase, salted with `"mnemonic" + password`.
    pub fn compute_seed(&self) -> Result<Seed> {
        let salt = Zeroizing::new(format!("mnemonic{}", self.password));
        let mut seed = [0u8; Seed::SIZE];
        pbkdf2::pbkdf2::<HmacSha512>(self.phrase.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed)?;
        Ok(Seed(seed))
    }
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic").field("phrase", &"...").finish()
    }
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.phrase.zeroize();
        self.password.zeroize();
    }
}
