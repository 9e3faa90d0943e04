//!
//! UTXO ledger (Qi) transactions. Inputs are authorized by one Schnorr
//! signature over the UTXO digest of the unsigned encoding; multi-key inputs
//! share a MuSig2 aggregate signature.
//!

use crate::config::SCHNORR_SIGNATURE_SIZE;
use crate::error::Error;
use crate::proto::{decode_qi_transaction, encode_qi_transaction};
use crate::result::Result;
use num::BigUint;
use quai_addresses::Address;
use quai_hashes::{keccak256, utxo_hash, Hash};
use serde::{Deserialize, Serialize};

/// Reference to an output of a previous transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpoint {
    pub tx_hash: Hash,
    pub index: u32,
}

impl Outpoint {
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    pub previous_outpoint: Outpoint,
    /// Address owning the spent output; selects the signing key.
    pub address: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    pub address: Address,
    /// Output value as an index into the denomination table.
    pub denomination: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QiTransaction {
    pub chain_id: BigUint,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    signature: Option<Vec<u8>>,
}

impl QiTransaction {
    pub fn new(chain_id: BigUint, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        Self { chain_id, inputs, outputs, signature: None }
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        decode_qi_transaction(bytes)
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Attach the opaque 64-byte Schnorr (or MuSig2 aggregate) signature.
    pub fn set_signature(&mut self, signature: impl Into<Vec<u8>>) -> Result<()> {
        let signature = signature.into();
        if signature.len() != SCHNORR_SIGNATURE_SIZE {
            return Err(Error::invalid_argument("signature", hex::encode(&signature), "invalid schnorr signature length"));
        }
        self.signature = Some(signature);
        Ok(())
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn unsigned_serialized(&self) -> Vec<u8> {
        encode_qi_transaction(self, false)
    }

    /// The digest signed by the input keys.
    pub fn digest(&self) -> Hash {
        utxo_hash(self.unsigned_serialized())
    }

    pub fn serialized(&self) -> Result<Vec<u8>> {
        if self.signature.is_none() {
            return Err(Error::unsupported(".serialized", "cannot serialize unsigned transaction; maybe you meant .unsignedSerialized"));
        }
        Ok(encode_qi_transaction(self, true))
    }

    pub fn hash(&self) -> Option<Hash> {
        self.serialized().ok().map(keccak256)
    }

    /// Distinct input addresses in first-seen order.
    pub fn input_addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if !addresses.contains(&input.address) {
                addresses.push(input.address);
            }
        }
        addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qi_tx() -> QiTransaction {
        let address = Address::from_bytes([0x00, 0x80, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18]);
        QiTransaction::new(
            BigUint::from(1u8),
            vec![
                TxInput { previous_outpoint: Outpoint::new(Hash::from_bytes([1; 32]), 0), address },
                TxInput { previous_outpoint: Outpoint::new(Hash::from_bytes([1; 32]), 1), address },
            ],
            vec![TxOutput { address, denomination: 3 }],
        )
    }

    #[test]
    fn test_serialize_requires_signature() {
        let mut tx = qi_tx();
        assert!(matches!(tx.serialized(), Err(Error::UnsupportedOperation { .. })));
        assert!(tx.hash().is_none());
        let digest = tx.digest();
        assert!(tx.set_signature(vec![1u8; 65]).is_err());
        tx.set_signature(vec![1u8; 64]).unwrap();
        assert_eq!(tx.digest(), digest);
        assert!(tx.hash().is_some());
        assert_eq!(QiTransaction::from_wire(&tx.serialized().unwrap()).unwrap(), tx);
    }

    #[test]
    fn test_input_addresses() {
        assert_eq!(qi_tx().input_addresses().len(), 1);
    }
}
