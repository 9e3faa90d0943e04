//!
//! JSON view of a transaction: big integers as decimal strings, byte strings
//! as `0x` hex, absent optional fields as `null`.
//!

use super::{AccessList, Signature, Transaction};
use crate::convert::hexlify;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionJson {
    #[serde(rename = "type")]
    pub tx_type: Option<u8>,
    pub to: Option<String>,
    pub data: String,
    pub nonce: u64,
    pub gas_limit: String,
    pub gas_price: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub max_fee_per_gas: Option<String>,
    pub value: String,
    pub chain_id: String,
    pub signature: Option<Signature>,
    pub hash: Option<String>,
    pub access_list: Option<AccessList>,
    pub external_gas_limit: Option<String>,
    pub external_gas_tip: Option<String>,
    pub external_gas_price: Option<String>,
    pub external_data: Option<String>,
    pub external_access_list: Option<AccessList>,
}

impl From<&Transaction> for TransactionJson {
    fn from(tx: &Transaction) -> Self {
        Self {
            tx_type: tx.tx_type().map(|tx_type| tx_type as u8),
            to: tx.to().map(|to| to.to_checksum()),
            data: hexlify(tx.data()),
            nonce: tx.nonce(),
            gas_limit: tx.gas_limit().to_string(),
            gas_price: tx.gas_price().map(ToString::to_string),
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas().map(ToString::to_string),
            max_fee_per_gas: tx.max_fee_per_gas().map(ToString::to_string),
            value: tx.value().to_string(),
            chain_id: tx.chain_id().to_string(),
            signature: tx.signature().copied(),
            hash: tx.hash().map(|hash| hash.to_hex()),
            access_list: tx.access_list().cloned(),
            external_gas_limit: tx.external_gas_limit().map(|limit| limit.to_string()),
            external_gas_tip: tx.external_gas_tip().map(ToString::to_string),
            external_gas_price: tx.external_gas_price().map(ToString::to_string),
            external_data: tx.external_data().map(hexlify),
            external_access_list: tx.external_access_list().cloned(),
        }
    }
}

impl Transaction {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(TransactionJson::from(self)).unwrap_or(serde_json::Value::Null)
    }
}
