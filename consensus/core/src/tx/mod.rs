//!
//! The account ledger transaction value object.
//!
//! Every field is private and assigned through a validating setter, so a
//! [`Transaction`] is never observed with a half-applied or malformed value.
//!

pub mod access_list;
pub mod json;
pub mod like;
pub mod signature;
pub mod utxo;

pub use access_list::*;
pub use like::*;
pub use signature::*;
pub use utxo::*;

use crate::config::tx_type;
use crate::convert::{AddressLike, BigNumberish, BytesLike};
use crate::error::Error;
use crate::result::Result;
use num::BigUint;
use quai_addresses::Address;
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TxType {
    Standard = 0,
    /// Reserved; no setter path produces it.
    External = 1,
    InternalToExternal = 2,
}

impl TxType {
    pub fn code(&self) -> u64 {
        *self as u64
    }

    pub fn name(&self) -> &'static str {
        match self {
            TxType::Standard => "standard",
            TxType::External => "external",
            TxType::InternalToExternal => "internalToExternal",
        }
    }

    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            tx_type::STANDARD => Ok(TxType::Standard),
            tx_type::EXTERNAL => Ok(TxType::External),
            tx_type::INTERNAL_TO_EXTERNAL => Ok(TxType::InternalToExternal),
            _ => Err(Error::invalid_argument("type", code, "unsupported transaction type")),
        }
    }
}

impl Display for TxType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Transaction type given as a code or a name.
pub trait TxTypeLike {
    fn to_tx_type(&self) -> Result<TxType>;
}

impl TxTypeLike for TxType {
    fn to_tx_type(&self) -> Result<TxType> {
        Ok(*self)
    }
}

impl TxTypeLike for u8 {
    fn to_tx_type(&self) -> Result<TxType> {
        TxType::from_code(*self as u64)
    }
}

impl TxTypeLike for u64 {
    fn to_tx_type(&self) -> Result<TxType> {
        TxType::from_code(*self)
    }
}

impl TxTypeLike for i32 {
    fn to_tx_type(&self) -> Result<TxType> {
        u64::try_from(*self)
            .map_err(|_| Error::invalid_argument("type", self, "unsupported transaction type"))
            .and_then(TxType::from_code)
    }
}

impl TxTypeLike for str {
    fn to_tx_type(&self) -> Result<TxType> {
        match self {
            "standard" => Ok(TxType::Standard),
            "external" => Ok(TxType::External),
            "internalToExternal" => Ok(TxType::InternalToExternal),
            _ => Err(Error::invalid_argument("type", self, "unsupported transaction type")),
        }
    }
}

impl TxTypeLike for String {
    fn to_tx_type(&self) -> Result<TxType> {
        self.as_str().to_tx_type()
    }
}

impl<T: TxTypeLike + ?Sized> TxTypeLike for &T {
    fn to_tx_type(&self) -> Result<TxType> {
        (**self).to_tx_type()
    }
}

/// An account ledger transaction: standard transfers and calls (type 0) and
/// internal-to-external cross shard transactions (type 2).
///
/// `Clone` produces a fully independent deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    tx_type: Option<TxType>,
    to: Option<Address>,
    nonce: u64,
    gas_limit: u64,
    gas_price: Option<BigUint>,
    max_priority_fee_per_gas: Option<BigUint>,
    max_fee_per_gas: Option<BigUint>,
    data: Vec<u8>,
    value: BigUint,
    chain_id: BigUint,
    signature: Option<Signature>,
    access_list: Option<AccessList>,
    external_gas_limit: Option<u64>,
    external_gas_price: Option<BigUint>,
    external_gas_tip: Option<BigUint>,
    external_data: Option<Vec<u8>>,
    external_access_list: Option<AccessList>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            tx_type: None,
            to: None,
            nonce: 0,
            gas_limit: 0,
            gas_price: None,
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
            data: Vec::new(),
            value: BigUint::default(),
            chain_id: BigUint::default(),
            signature: None,
            access_list: None,
            external_gas_limit: None,
            external_gas_price: None,
            external_gas_tip: None,
            external_data: None,
            external_access_list: None,
        }
    }

    pub fn tx_type(&self) -> Option<TxType> {
        self.tx_type
    }

    /// Accepts `0` / `"standard"` and `2` / `"internalToExternal"`.
    pub fn set_type(&mut self, value: impl TxTypeLike) -> Result<()> {
        match value.to_tx_type() {
            Ok(TxType::External) => Err(Error::invalid_argument("type", TxType::External.code(), "unsupported transaction type")),
            Ok(tx_type) => {
                self.tx_type = Some(tx_type);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn clear_type(&mut self) {
        self.tx_type = None;
    }

    pub fn type_name(&self) -> Option<&'static str> {
        self.tx_type.map(|tx_type| tx_type.name())
    }

    /// `None` denotes contract creation.
    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn set_to(&mut self, to: impl AddressLike) -> Result<()> {
        self.to = Some(to.to_address("to")?);
        Ok(())
    }

    pub fn clear_to(&mut self) {
        self.to = None;
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn set_nonce(&mut self, nonce: impl BigNumberish) -> Result<()> {
        self.nonce = nonce.to_u64("nonce")?;
        Ok(())
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn set_gas_limit(&mut self, gas_limit: impl BigNumberish) -> Result<()> {
        self.gas_limit = gas_limit.to_u64("gasLimit")?;
        Ok(())
    }

    pub fn gas_price(&self) -> Option<&BigUint> {
        self.gas_price.as_ref()
    }

    pub fn set_gas_price(&mut self, gas_price: impl BigNumberish) -> Result<()> {
        self.gas_price = Some(gas_price.to_biguint("gasPrice")?);
        Ok(())
    }

    pub fn clear_gas_price(&mut self) {
        self.gas_price = None;
    }

    pub fn max_priority_fee_per_gas(&self) -> Option<&BigUint> {
        self.max_priority_fee_per_gas.as_ref()
    }

    pub fn set_max_priority_fee_per_gas(&mut self, fee: impl BigNumberish) -> Result<()> {
        self.max_priority_fee_per_gas = Some(fee.to_biguint("maxPriorityFeePerGas")?);
        Ok(())
    }

    pub fn clear_max_priority_fee_per_gas(&mut self) {
        self.max_priority_fee_per_gas = None;
    }

    pub fn max_fee_per_gas(&self) -> Option<&BigUint> {
        self.max_fee_per_gas.as_ref()
    }

    pub fn set_max_fee_per_gas(&mut self, fee: impl BigNumberish) -> Result<()> {
        self.max_fee_per_gas = Some(fee.to_biguint("maxFeePerGas")?);
        Ok(())
    }

    pub fn clear_max_fee_per_gas(&mut self) {
        self.max_fee_per_gas = None;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_data(&mut self, data: impl BytesLike) -> Result<()> {
        self.data = data.to_bytes("data")?;
        Ok(())
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn set_value(&mut self, value: impl BigNumberish) -> Result<()> {
        self.value = value.to_biguint("value")?;
        Ok(())
    }

    pub fn chain_id(&self) -> &BigUint {
        &self.chain_id
    }

    pub fn set_chain_id(&mut self, chain_id: impl BigNumberish) -> Result<()> {
        self.chain_id = chain_id.to_biguint("chainId")?;
        Ok(())
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Attach a signature. The signature covers [`Transaction::unsigned_hash`],
    /// which attaching does not change.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn access_list(&self) -> Option<&AccessList> {
        self.access_list.as_ref()
    }

    pub fn set_access_list(&mut self, access_list: impl Into<AccessListish>) -> Result<()> {
        self.access_list = Some(access_listify(&access_list.into())?);
        Ok(())
    }

    pub fn clear_access_list(&mut self) {
        self.access_list = None;
    }

    pub fn external_gas_limit(&self) -> Option<u64> {
        self.external_gas_limit
    }

    pub fn set_external_gas_limit(&mut self, gas_limit: impl BigNumberish) -> Result<()> {
        self.external_gas_limit = Some(gas_limit.to_u64("externalGasLimit")?);
        Ok(())
    }

    pub fn clear_external_gas_limit(&mut self) {
        self.external_gas_limit = None;
    }

    pub fn external_gas_price(&self) -> Option<&BigUint> {
        self.external_gas_price.as_ref()
    }

    pub fn set_external_gas_price(&mut self, gas_price: impl BigNumberish) -> Result<()> {
        self.external_gas_price = Some(gas_price.to_biguint("externalGasPrice")?);
        Ok(())
    }

    pub fn clear_external_gas_price(&mut self) {
        self.external_gas_price = None;
    }

    pub fn external_gas_tip(&self) -> Option<&BigUint> {
        self.external_gas_tip.as_ref()
    }

    pub fn set_external_gas_tip(&mut self, gas_tip: impl BigNumberish) -> Result<()> {
        self.external_gas_tip = Some(gas_tip.to_biguint("externalGasTip")?);
        Ok(())
    }

    pub fn clear_external_gas_tip(&mut self) {
        self.external_gas_tip = None;
    }

    pub fn external_data(&self) -> Option<&[u8]> {
        self.external_data.as_deref()
    }

    pub fn set_external_data(&mut self, data: impl BytesLike) -> Result<()> {
        self.external_data = Some(data.to_bytes("externalData")?);
        Ok(())
    }

    pub fn clear_external_data(&mut self) {
        self.external_data = None;
    }

    pub fn external_access_list(&self) -> Option<&AccessList> {
        self.external_access_list.as_ref()
    }

    pub fn set_external_access_list(&mut self, access_list: impl Into<AccessListish>) -> Result<()> {
        self.external_access_list = Some(access_listify(&access_list.into())?);
        Ok(())
    }

    pub fn clear_external_access_list(&mut self) {
        self.external_access_list = None;
    }

    fn has_external(&self) -> bool {
        self.external_gas_limit.is_some()
            || self.external_gas_price.is_some()
            || self.external_gas_tip.is_some()
            || self.external_data.is_some()
            || self.external_access_list.is_some()
    }

    /// The ascending, non-empty set of transaction types compatible with the
    /// fields currently set.
    pub fn infer_types(&self) -> Result<Vec<TxType>> {
        if let (Some(max_fee), Some(max_priority)) = (&self.max_fee_per_gas, &self.max_priority_fee_per_gas) {
            if max_fee < max_priority {
                return Err(Error::InvalidData(format!(
                    "priorityFee cannot be more than maxFee (maxFeePerGas {max_fee} < maxPriorityFeePerGas {max_priority})"
                )));
            }
        }

        let has_external = self.has_external();
        if has_external && matches!(self.tx_type, Some(TxType::Standard) | Some(TxType::External)) {
            return Err(Error::InvalidData(
                "transaction type cannot have externalGasLimit, externalGasTip, externalGasPrice, externalData, or externalAccessList"
                    .to_string(),
            ));
        }

        let mut types = match self.tx_type {
            Some(tx_type) => vec![tx_type],
            None if has_external => vec![TxType::InternalToExternal],
            None => vec![TxType::Standard],
        };
        types.sort();
        Ok(types)
    }

    /// The most feature-rich compatible type.
    pub fn infer_type(&self) -> Result<TxType> {
        self.infer_types()?.pop().ok_or_else(|| Error::InvalidData("no compatible transaction type".to_string()))
    }

    /// Type code written to the wire: the explicit type, otherwise `0`.
    /// External fields on an untyped transaction are not inferred into type `2`.
    pub fn wire_type(&self) -> u64 {
        self.tx_type.map(|kind| kind.code()).unwrap_or(tx_type::STANDARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_setter() {
        let mut tx = Transaction::new();
        tx.set_type(2u8).unwrap();
        assert_eq!(tx.tx_type(), Some(TxType::InternalToExternal));
        tx.set_type("standard").unwrap();
        assert_eq!(tx.type_name(), Some("standard"));
        assert!(matches!(tx.set_type(1u8), Err(Error::InvalidArgument { field, .. }) if field == "type"));
        assert!(matches!(tx.set_type("external"), Err(Error::InvalidArgument { .. })));
        assert!(tx.set_type(7u64).is_err());
        // failed assignments leave the previous value in place
        assert_eq!(tx.tx_type(), Some(TxType::Standard));
        tx.clear_type();
        assert_eq!(tx.tx_type(), None);
    }

    #[test]
    fn test_setter_validation() {
        let mut tx = Transaction::new();
        assert!(matches!(tx.set_to("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"), Err(Error::InvalidArgument { field, .. }) if field == "to"));
        assert!(tx.to().is_none());
        tx.set_to("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        assert!(tx.to().is_some());
        assert!(matches!(tx.set_value("-5"), Err(Error::InvalidArgument { field, .. }) if field == "value"));
        assert!(matches!(tx.set_value("1_0"), Err(Error::InvalidArgument { field, .. }) if field == "value"));
        assert!(matches!(tx.set_value("+5"), Err(Error::InvalidArgument { field, .. }) if field == "value"));
        assert_eq!(tx.value(), &BigUint::default());
        assert!(matches!(tx.set_data("zz"), Err(Error::InvalidArgument { field, .. }) if field == "data"));
        tx.set_data("0x1234").unwrap();
        assert_eq!(tx.data(), &[0x12, 0x34]);
        assert!(matches!(tx.set_nonce("0x10000000000000000"), Err(Error::InvalidArgument { field, .. }) if field == "nonce"));
    }

    #[test]
    fn test_infer_default_types() {
        let mut tx = Transaction::new();
        assert_eq!(tx.infer_types().unwrap(), vec![TxType::Standard]);
        tx.set_external_gas_limit(100u64).unwrap();
        assert_eq!(tx.infer_types().unwrap(), vec![TxType::InternalToExternal]);
        assert_eq!(tx.infer_type().unwrap(), TxType::InternalToExternal);
        tx.set_type(2u8).unwrap();
        assert_eq!(tx.infer_types().unwrap(), vec![TxType::InternalToExternal]);
    }

    #[test]
    fn test_fee_invariant() {
        let mut tx = Transaction::new();
        tx.set_max_fee_per_gas(5u64).unwrap();
        tx.set_max_priority_fee_per_gas(10u64).unwrap();
        assert!(matches!(tx.infer_types(), Err(Error::InvalidData(_))));
        tx.set_max_fee_per_gas(10u64).unwrap();
        assert!(tx.infer_types().is_ok());
    }

    #[test]
    fn test_external_field_guard() {
        let mut tx = Transaction::new();
        tx.set_type(0u8).unwrap();
        tx.set_external_gas_limit(100u64).unwrap();
        assert!(matches!(tx.infer_type(), Err(Error::InvalidData(_))));
        tx.clear_external_gas_limit();
        assert_eq!(tx.infer_type().unwrap(), TxType::Standard);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut tx = Transaction::new();
        tx.set_value(1u8).unwrap();
        tx.set_access_list(AccessList::new()).unwrap();
        let mut copy = tx.clone();
        assert_eq!(copy, tx);
        copy.set_value(2u8).unwrap();
        copy.clear_access_list();
        assert_eq!(tx.value(), &BigUint::from(1u8));
        assert_eq!(tx.access_list(), Some(&AccessList::new()));
    }
}
