//!
//! Loosely typed transaction record and the polymorphic constructor built on it.
//!

use super::{AccessListish, Signature, Transaction, TxType};
use crate::convert::{hexlify, BytesLike, Numeric};
use crate::error::Error;
use crate::result::Result;
use serde::{Deserialize, Serialize};

/// Transaction type in a record: a numeric code or a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxTypeValue {
    Code(u64),
    Name(String),
}

impl From<TxType> for TxTypeValue {
    fn from(tx_type: TxType) -> Self {
        TxTypeValue::Code(tx_type.code())
    }
}

/// Every settable transaction field, each optional. `hash` and `from`, when
/// present, are verified against the constructed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLike {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<TxTypeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessListish>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_gas_limit: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_gas_price: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_gas_tip: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_access_list: Option<AccessListish>,
}

/// Input to [`Transaction::from_source`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionSource {
    /// Encoded wire bytes.
    Wire(Vec<u8>),
    Fields(TransactionLike),
}

impl From<TransactionLike> for TransactionSource {
    fn from(like: TransactionLike) -> Self {
        TransactionSource::Fields(like)
    }
}

impl TryFrom<&str> for TransactionSource {
    type Error = Error;

    /// `0x` prefixed hex wire bytes.
    fn try_from(hex: &str) -> Result<Self> {
        Ok(TransactionSource::Wire(hex.to_bytes("tx")?))
    }
}

impl Transaction {
    pub fn from_source(source: impl Into<TransactionSource>) -> Result<Self> {
        match source.into() {
            TransactionSource::Wire(bytes) => Transaction::from_wire(&bytes),
            TransactionSource::Fields(like) => Transaction::from_like(&like),
        }
    }

    /// Assign every present field through its setter. Nothing is returned
    /// unless all of them succeed.
    pub fn from_like(like: &TransactionLike) -> Result<Self> {
        let mut tx = Transaction::new();
        match &like.tx_type {
            Some(TxTypeValue::Code(code)) => tx.set_type(*code)?,
            Some(TxTypeValue::Name(name)) => tx.set_type(name)?,
            None => {}
        }
        if let Some(to) = &like.to {
            tx.set_to(to)?;
        }
        if let Some(nonce) = &like.nonce {
            tx.set_nonce(nonce)?;
        }
        if let Some(gas_limit) = &like.gas_limit {
            tx.set_gas_limit(gas_limit)?;
        }
        if let Some(gas_price) = &like.gas_price {
            tx.set_gas_price(gas_price)?;
        }
        if let Some(fee) = &like.max_priority_fee_per_gas {
            tx.set_max_priority_fee_per_gas(fee)?;
        }
        if let Some(fee) = &like.max_fee_per_gas {
            tx.set_max_fee_per_gas(fee)?;
        }
        if let Some(data) = &like.data {
            tx.set_data(data)?;
        }
        if let Some(value) = &like.value {
            tx.set_value(value)?;
        }
        if let Some(chain_id) = &like.chain_id {
            tx.set_chain_id(chain_id)?;
        }
        if let Some(signature) = &like.signature {
            tx.set_signature(*signature);
        }
        if let Some(access_list) = &like.access_list {
            tx.set_access_list(access_list.clone())?;
        }
        if let Some(gas_limit) = &like.external_gas_limit {
            tx.set_external_gas_limit(gas_limit)?;
        }
        if let Some(gas_price) = &like.external_gas_price {
            tx.set_external_gas_price(gas_price)?;
        }
        if let Some(gas_tip) = &like.external_gas_tip {
            tx.set_external_gas_tip(gas_tip)?;
        }
        if let Some(data) = &like.external_data {
            tx.set_external_data(data)?;
        }
        if let Some(access_list) = &like.external_access_list {
            tx.set_external_access_list(access_list.clone())?;
        }

        if let Some(hash) = &like.hash {
            let computed = tx.hash().ok_or_else(|| Error::invalid_argument("tx", hash, "unsigned transaction cannot define hash"))?;
            if !computed.to_hex().eq_ignore_ascii_case(hash) {
                return Err(Error::invalid_argument("tx", hash, "hash mismatch"));
            }
        }
        if let Some(from) = &like.from {
            let signed = tx
                .clone()
                .into_signed()?
                .try_signed()
                .map_err(|_| Error::invalid_argument("tx", from, "unsigned transaction cannot define from"))?;
            if !signed.sender().to_checksum().eq_ignore_ascii_case(from) {
                return Err(Error::invalid_argument("tx", from, "from mismatch"));
            }
        }
        Ok(tx)
    }

    /// The record form of this transaction; round-trips through [`Transaction::from_like`].
    pub fn to_like(&self) -> TransactionLike {
        TransactionLike {
            tx_type: self.tx_type().map(TxTypeValue::from),
            to: self.to().map(|to| to.to_checksum()),
            from: None,
            nonce: Some(Numeric::from(self.nonce())),
            gas_limit: Some(Numeric::from(self.gas_limit())),
            gas_price: self.gas_price().map(Numeric::from),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas().map(Numeric::from),
            max_fee_per_gas: self.max_fee_per_gas().map(Numeric::from),
            data: Some(hexlify(self.data())),
            value: Some(Numeric::from(self.value())),
            chain_id: Some(Numeric::from(self.chain_id())),
            hash: None,
            signature: self.signature().copied(),
            access_list: self.access_list().cloned().map(AccessListish::from),
            external_gas_limit: self.external_gas_limit().map(Numeric::from),
            external_gas_price: self.external_gas_price().map(Numeric::from),
            external_gas_tip: self.external_gas_tip().map(Numeric::from),
            external_data: self.external_data().map(hexlify),
            external_access_list: self.external_access_list().cloned().map(AccessListish::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::sign_digest;
    use secp256k1::{rand, SECP256K1};

    fn like() -> TransactionLike {
        TransactionLike {
            tx_type: Some(TxTypeValue::Name("internalToExternal".to_string())),
            to: Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string()),
            nonce: Some(Numeric::Int(3)),
            gas_limit: Some(Numeric::Text("21000".to_string())),
            max_fee_per_gas: Some(Numeric::Text("0x10".to_string())),
            max_priority_fee_per_gas: Some(Numeric::Int(1)),
            value: Some(Numeric::Text("1000".to_string())),
            chain_id: Some(Numeric::Int(9000)),
            data: Some("0xabcd".to_string()),
            external_gas_limit: Some(Numeric::Int(100)),
            external_data: Some("0x".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_fields() {
        let tx = Transaction::from_source(like()).unwrap();
        assert_eq!(tx.tx_type(), Some(TxType::InternalToExternal));
        assert_eq!(tx.nonce(), 3);
        assert_eq!(tx.gas_limit(), 21000);
        assert_eq!(tx.external_gas_limit(), Some(100));
        assert_eq!(tx.external_data(), Some(&[][..]));
        assert_eq!(Transaction::from_like(&tx.to_like()).unwrap(), tx);
    }

    #[test]
    fn test_from_wire_hex() {
        let mut tx = Transaction::from_source(like()).unwrap();
        let (secret_key, _) = SECP256K1.generate_keypair(&mut rand::thread_rng());
        tx.set_signature(sign_digest(&tx.unsigned_hash(), &secret_key));
        let hex = hexlify(&tx.serialized().unwrap());
        let decoded = Transaction::from_source(TransactionSource::try_from(hex.as_str()).unwrap()).unwrap();
        assert_eq!(decoded.hash(), tx.hash());
    }

    #[test]
    fn test_invalid_field_is_named() {
        let record = TransactionLike { max_fee_per_gas: Some(Numeric::Text("nope".to_string())), ..like() };
        assert!(matches!(Transaction::from_like(&record), Err(Error::InvalidArgument { field, .. }) if field == "maxFeePerGas"));
    }

    #[test]
    fn test_hash_and_from_cross_checks() {
        let mut tx = Transaction::from_source(like()).unwrap();
        let (secret_key, _) = SECP256K1.generate_keypair(&mut rand::thread_rng());
        tx.set_signature(sign_digest(&tx.unsigned_hash(), &secret_key));
        let signed = tx.clone().into_signed().unwrap().signed().unwrap();

        let mut record = tx.to_like();
        record.hash = Some(signed.hash().to_hex().to_uppercase().replace("0X", "0x"));
        record.from = Some(signed.sender().to_checksum().to_lowercase());
        assert_eq!(Transaction::from_like(&record).unwrap(), tx);

        let bad_hash = TransactionLike { hash: Some(quai_hashes::Hash::default().to_hex()), ..record.clone() };
        assert!(matches!(Transaction::from_like(&bad_hash), Err(Error::InvalidArgument { field, .. }) if field == "tx"));

        let bad_from = TransactionLike { from: Some("0x0000000000000000000000000000000000000001".to_string()), ..record.clone() };
        assert!(matches!(Transaction::from_like(&bad_from), Err(Error::InvalidArgument { field, message, .. }) if field == "tx" && message == "from mismatch"));

        let unsigned = TransactionLike { signature: None, ..record };
        assert!(matches!(Transaction::from_like(&unsigned), Err(Error::InvalidArgument { field, .. }) if field == "tx"));
    }

    #[test]
    fn test_record_serde() {
        let json = r#"{"type":2,"to":"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed","nonce":"0x01","externalGasLimit":5,
            "accessList":[{"address":"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed","storageKeys":[]}]}"#;
        let record: TransactionLike = serde_json::from_str(json).unwrap();
        let tx = Transaction::from_source(record).unwrap();
        assert_eq!(tx.nonce(), 1);
        assert_eq!(tx.access_list().map(Vec::len), Some(1));
    }
}
