use crate::error::Error;
use crate::proto::{decode_transaction, encode_transaction};
use crate::result::Result;
use crate::tx::{Signature, Transaction};
use quai_addresses::Address;
use quai_hashes::{keccak256, Hash};
use secp256k1::{schnorr, Keypair, Message, PublicKey, SecretKey, XOnlyPublicKey, SECP256K1};

impl Transaction {
    /// Decode a transaction from its wire bytes.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        decode_transaction(bytes)
    }

    /// The signing pre-image: the wire encoding without signature fields.
    pub fn unsigned_serialized(&self) -> Vec<u8> {
        encode_transaction(self, false)
    }

    pub fn unsigned_hash(&self) -> Hash {
        keccak256(self.unsigned_serialized())
    }

    /// Final wire bytes. Fails with `UnsupportedOperation` while unsigned.
    pub fn serialized(&self) -> Result<Vec<u8>> {
        if !self.is_signed() {
            return Err(Error::unsupported(".serialized", "cannot serialize unsigned transaction; maybe you meant .unsignedSerialized"));
        }
        Ok(encode_transaction(self, true))
    }

    pub fn hash(&self) -> Option<Hash> {
        self.serialized().ok().map(keccak256)
    }

    /// Split into the unsigned or signed variant. Signing material is
    /// recovered once here so the signed accessors cannot fail.
    pub fn into_signed(self) -> Result<Signed> {
        match self.signature() {
            None => Ok(Signed::Unsigned(self)),
            Some(_) => Ok(Signed::Signed(SignedTransaction::try_new(self)?)),
        }
    }
}

/// A transaction whose signature is attached and recoverable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    signature: Signature,
    sender_public_key: PublicKey,
    sender: Address,
}

impl SignedTransaction {
    pub fn try_new(tx: Transaction) -> Result<Self> {
        let signature = *tx.signature().ok_or_else(|| Error::unsupported("signed", "transaction is not signed"))?;
        let sender_public_key = recover_public_key(&tx.unsigned_hash(), &signature)?;
        let sender = public_key_to_address(&sender_public_key)?;
        Ok(Self { tx, signature, sender_public_key, sender })
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn serialized(&self) -> Vec<u8> {
        encode_transaction(&self.tx, true)
    }

    pub fn hash(&self) -> Hash {
        keccak256(self.serialized())
    }

    pub fn unsigned_hash(&self) -> Hash {
        self.tx.unsigned_hash()
    }

    /// The recovered `from` address.
    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn sender_public_key(&self) -> &PublicKey {
        &self.sender_public_key
    }
}

/// The signed state of an account ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signed {
    Unsigned(Transaction),
    Signed(SignedTransaction),
}

impl Signed {
    pub fn is_signed(&self) -> bool {
        matches!(self, Signed::Signed(_))
    }

    /// Returns the signed transaction, otherwise fails with an error
    pub fn signed(self) -> Result<SignedTransaction> {
        match self {
            Signed::Signed(tx) => Ok(tx),
            Signed::Unsigned(_) => Err(Error::unsupported("signed", "transaction is not signed")),
        }
    }

    /// Returns the signed transaction, otherwise returns the unsigned
    /// transaction as an error `Err(tx)`.
    #[allow(clippy::result_large_err)]
    pub fn try_signed(self) -> std::result::Result<SignedTransaction, Transaction> {
        match self {
            Signed::Signed(tx) => Ok(tx),
            Signed::Unsigned(tx) => Err(tx),
        }
    }

    /// Returns the transaction regardless of its signed state
    pub fn unwrap(self) -> Transaction {
        match self {
            Signed::Signed(tx) => tx.into_transaction(),
            Signed::Unsigned(tx) => tx,
        }
    }
}

/// ECDSA-sign a 32-byte digest, producing a recoverable signature.
pub fn sign_digest(digest: &Hash, secret_key: &SecretKey) -> Signature {
    let message = Message::from_digest(digest.as_bytes());
    Signature::from_secp(&SECP256K1.sign_ecdsa_recoverable(&message, secret_key))
}

pub fn recover_public_key(digest: &Hash, signature: &Signature) -> Result<PublicKey> {
    let message = Message::from_digest(digest.as_bytes());
    Ok(SECP256K1.recover_ecdsa(&message, &signature.to_secp()?)?)
}

pub fn recover_address(digest: &Hash, signature: &Signature) -> Result<Address> {
    public_key_to_address(&recover_public_key(digest, signature)?)
}

pub fn public_key_to_address(public_key: &PublicKey) -> Result<Address> {
    Ok(Address::from_uncompressed_public_key(&public_key.serialize_uncompressed())?)
}

/// Digest of a personal message: Keccak-256 over the
/// `"\x19Ethereum Signed Message:\n" + len + message` envelope.
pub fn hash_message(message: &[u8]) -> Hash {
    let mut envelope = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    envelope.extend_from_slice(message);
    keccak256(envelope)
}

/// BIP340 Schnorr signature over a 32-byte digest.
pub fn sign_schnorr(digest: &Hash, secret_key: &SecretKey) -> [u8; 64] {
    let keypair = Keypair::from_secret_key(SECP256K1, secret_key);
    let message = Message::from_digest(digest.as_bytes());
    SECP256K1.sign_schnorr(&message, &keypair).serialize()
}

pub fn verify_schnorr(digest: &Hash, signature: &[u8], public_key: &XOnlyPublicKey) -> Result<()> {
    let signature = schnorr::Signature::from_slice(signature)?;
    let message = Message::from_digest(digest.as_bytes());
    Ok(SECP256K1.verify_schnorr(&signature, &message, public_key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::rand;

    fn unsigned_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.set_type(0u8).unwrap();
        tx.set_to("0x0011223344556677889900112233445566778899").unwrap();
        tx.set_nonce(1u64).unwrap();
        tx.set_gas_limit(21000u64).unwrap();
        tx.set_value(10u64).unwrap();
        tx.set_chain_id(1u64).unwrap();
        tx
    }

    #[test]
    fn test_sign_and_recover() {
        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut rand::thread_rng());
        let mut tx = unsigned_tx();
        assert!(matches!(tx.serialized(), Err(Error::UnsupportedOperation { .. })));
        assert!(tx.hash().is_none());

        let unsigned_hash = tx.unsigned_hash();
        assert_eq!(tx.unsigned_hash(), unsigned_hash);
        tx.set_signature(sign_digest(&unsigned_hash, &secret_key));
        assert_eq!(tx.unsigned_hash(), unsigned_hash);
        assert!(tx.hash().is_some());

        let signed = tx.clone().into_signed().unwrap().signed().unwrap();
        assert_eq!(signed.sender_public_key(), &public_key);
        assert_eq!(signed.sender(), public_key_to_address(&public_key).unwrap());
        assert_eq!(Some(signed.hash()), tx.hash());

        let decoded = Transaction::from_wire(&signed.serialized()).unwrap();
        assert_eq!(decoded.into_signed().unwrap().signed().unwrap().sender(), signed.sender());
    }

    #[test]
    fn test_unsigned_variant() {
        let signed = unsigned_tx().into_signed().unwrap();
        assert!(!signed.is_signed());
        assert!(signed.clone().signed().is_err());
        assert_eq!(signed.unwrap(), unsigned_tx());
    }

    #[test]
    fn test_schnorr() {
        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut rand::thread_rng());
        let digest = keccak256(b"utxo");
        let signature = sign_schnorr(&digest, &secret_key);
        let (xonly, _) = public_key.x_only_public_key();
        assert!(verify_schnorr(&digest, &signature, &xonly).is_ok());
        assert!(verify_schnorr(&keccak256(b"other"), &signature, &xonly).is_err());
    }

    #[test]
    fn test_known_address() {
        let secret_key = SecretKey::from_slice(&[[0u8; 31].as_slice(), &[1u8]].concat()).unwrap();
        let public_key = secret_key.public_key(SECP256K1);
        assert_eq!(public_key_to_address(&public_key).unwrap().to_string(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        let digest = hash_message(b"hello");
        let signature = sign_digest(&digest, &secret_key);
        assert_eq!(recover_address(&digest, &signature).unwrap().to_string(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }
}
