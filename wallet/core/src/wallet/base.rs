//!
//! Single-key signer for the account (Quai) ledger.
//!

use crate::imports::*;
use quai_consensus_core::sign::{hash_message, public_key_to_address, sign_digest};
use std::fmt;

#[derive(Clone)]
pub struct BaseWallet {
    secret_key: SecretKey,
    address: Address,
}

impl BaseWallet {
    pub fn try_new(secret_key: SecretKey) -> Result<Self> {
        let address = public_key_to_address(&secret_key.public_key(SECP256K1))?;
        Ok(Self { secret_key, address })
    }

    pub fn from_node(node: &HDNode) -> Self {
        Self { secret_key: *node.secret_key(), address: node.address() }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn public_key(&self) -> PublicKey {
        self.secret_key.public_key(SECP256K1)
    }

    /// Build the transaction described by `like`, sign its unsigned hash and
    /// return the final wire bytes. A `from` field must name this wallet.
    pub fn sign_transaction(&self, like: &TransactionLike) -> Result<Vec<u8>> {
        let mut like = like.clone();
        if let Some(from) = like.from.take() {
            let from = Address::from_str(&from)?;
            if from != self.address {
                return Err(Error::FromMismatch { expected: self.address, actual: from });
            }
        }

        let mut tx = Transaction::from_like(&like)?;
        tx.set_signature(sign_digest(&tx.unsigned_hash(), &self.secret_key));
        debug!("signed transaction from {}", self.address);
        Ok(tx.serialized()?)
    }

    /// Sign `message` under the `"\x19Ethereum Signed Message:\n" + len` envelope.
    pub fn sign_message(&self, message: impl AsRef<[u8]>) -> Signature {
        sign_digest(&hash_message(message.as_ref()), &self.secret_key)
    }
}

impl fmt::Debug for BaseWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseWallet").field("address", &self.address).finish()
    }
}
