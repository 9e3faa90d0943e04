use super::*;
use crate::config::tx_type;
use crate::convert::{from_be_bytes, hexlify, to_be_bytes_minimal};
use crate::error::Error;
use crate::result::Result;
use crate::tx::signature::pad_bytes_32;
use crate::tx::{AccessList, AccessListEntry, Outpoint, QiTransaction, Signature, Transaction, TxInput, TxOutput};
use prost::Message;
use quai_addresses::Address;
use quai_hashes::Hash;

impl From<&AccessList> for ProtoAccessList {
    fn from(list: &AccessList) -> Self {
        Self {
            access_tuples: list
                .iter()
                .map(|entry| ProtoAccessTuple {
                    address: entry.address.as_bytes().to_vec(),
                    storage_key: entry.storage_keys.iter().map(|key| ProtoHash { value: key.as_bytes().to_vec() }).collect(),
                })
                .collect(),
        }
    }
}

fn access_list_from_proto(list: &ProtoAccessList) -> Result<AccessList> {
    list.access_tuples
        .iter()
        .map(|tuple| {
            let address = Address::try_from_slice(&tuple.address)
                .map_err(|err| Error::invalid_argument("accessList.address", hexlify(&tuple.address), &err.to_string()))?;
            let storage_keys = tuple
                .storage_key
                .iter()
                .map(|key| {
                    Hash::try_from_slice(&key.value)
                        .map_err(|_| Error::invalid_argument("accessList.storageKey", hexlify(&key.value), "invalid storage key length"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(AccessListEntry { address, storage_keys })
        })
        .collect()
}

fn big_bytes(value: Option<&num::BigUint>) -> Vec<u8> {
    value.map(to_be_bytes_minimal).unwrap_or_default()
}

/// Build the wire message of `tx`. Signature fields are included only when
/// `with_signature` is set and a signature is attached.
pub fn transaction_to_proto(tx: &Transaction, with_signature: bool) -> ProtoTransaction {
    let wire_type = tx.wire_type();
    let mut proto = ProtoTransaction {
        r#type: Some(wire_type),
        to: Some(tx.to().map(|to| to.as_bytes().to_vec()).unwrap_or_default()),
        nonce: Some(tx.nonce()),
        value: Some(to_be_bytes_minimal(tx.value())),
        gas: Some(tx.gas_limit()),
        data: Some(tx.data().to_vec()),
        chain_id: Some(to_be_bytes_minimal(tx.chain_id())),
        gas_fee_cap: Some(big_bytes(tx.max_fee_per_gas())),
        gas_tip_cap: Some(big_bytes(tx.max_priority_fee_per_gas())),
        access_list: Some(tx.access_list().map(ProtoAccessList::from).unwrap_or_default()),
        ..Default::default()
    };

    if wire_type == tx_type::INTERNAL_TO_EXTERNAL {
        proto.etx_gas_limit = Some(tx.external_gas_limit().unwrap_or_default());
        proto.etx_gas_price = Some(big_bytes(tx.external_gas_price()));
        proto.etx_gas_tip = Some(big_bytes(tx.external_gas_tip()));
        proto.etx_data = Some(tx.external_data().map(<[u8]>::to_vec).unwrap_or_default());
        proto.etx_access_list = Some(tx.external_access_list().map(ProtoAccessList::from).unwrap_or_default());
    }

    if let (true, Some(signature)) = (with_signature, tx.signature()) {
        proto.v = Some(if signature.y_parity() == 0 { vec![] } else { vec![signature.y_parity()] });
        proto.r = Some(strip_leading_zeros(signature.r()));
        proto.s = Some(strip_leading_zeros(signature.s()));
        proto.signature = Some(signature.serialized().to_vec());
    }

    proto
}

fn strip_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

pub fn encode_transaction(tx: &Transaction, with_signature: bool) -> Vec<u8> {
    transaction_to_proto(tx, with_signature).encode_to_vec()
}

fn parse_y_parity(v: &[u8]) -> Result<u8> {
    let value = if v.len() > 8 { None } else { Some(v.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)) };
    match value {
        Some(parity @ (0 | 1)) => Ok(parity as u8),
        _ => Err(Error::invalid_argument("yParity", hexlify(v), "invalid yParity")),
    }
}

impl TryFrom<ProtoTransaction> for Transaction {
    type Error = Error;

    fn try_from(proto: ProtoTransaction) -> Result<Self> {
        let mut tx = Transaction::new();
        let wire_type = proto.r#type.unwrap_or(tx_type::STANDARD);
        tx.set_type(wire_type)?;
        tx.set_chain_id(from_be_bytes(proto.chain_id.as_deref().unwrap_or_default()))?;
        tx.set_nonce(proto.nonce.unwrap_or_default())?;
        tx.set_max_priority_fee_per_gas(from_be_bytes(proto.gas_tip_cap.as_deref().unwrap_or_default()))?;
        tx.set_max_fee_per_gas(from_be_bytes(proto.gas_fee_cap.as_deref().unwrap_or_default()))?;
        tx.set_gas_limit(proto.gas.unwrap_or_default())?;
        match proto.to.as_deref() {
            None | Some([]) => tx.clear_to(),
            Some(to) => {
                let address = Address::try_from_slice(to).map_err(|err| Error::invalid_argument("to", hexlify(to), &err.to_string()))?;
                tx.set_to(address)?;
            }
        }
        tx.set_value(from_be_bytes(proto.value.as_deref().unwrap_or_default()))?;
        tx.set_data(proto.data.unwrap_or_default())?;
        tx.set_access_list(access_list_from_proto(&proto.access_list.unwrap_or_default())?)?;

        if wire_type == tx_type::INTERNAL_TO_EXTERNAL {
            tx.set_external_gas_limit(proto.etx_gas_limit.unwrap_or_default())?;
            tx.set_external_gas_price(from_be_bytes(proto.etx_gas_price.as_deref().unwrap_or_default()))?;
            tx.set_external_gas_tip(from_be_bytes(proto.etx_gas_tip.as_deref().unwrap_or_default()))?;
            tx.set_external_data(proto.etx_data.unwrap_or_default())?;
            tx.set_external_access_list(access_list_from_proto(&proto.etx_access_list.unwrap_or_default())?)?;
        }

        if proto.v.is_some() || proto.r.is_some() || proto.s.is_some() {
            let y_parity = parse_y_parity(proto.v.as_deref().unwrap_or_default())?;
            let r = pad_bytes_32("r", proto.r.as_deref().unwrap_or_default())?;
            let s = pad_bytes_32("s", proto.s.as_deref().unwrap_or_default())?;
            tx.set_signature(Signature::new(r, s, y_parity)?);
        }

        Ok(tx)
    }
}

pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction> {
    let proto = ProtoTransaction::decode(bytes).map_err(|err| Error::invalid_argument("data", hexlify(bytes), &err.to_string()))?;
    Transaction::try_from(proto)
}

pub fn qi_transaction_to_proto(tx: &QiTransaction, with_signature: bool) -> ProtoTransaction {
    let mut proto = ProtoTransaction {
        r#type: Some(tx_type::QI),
        chain_id: Some(to_be_bytes_minimal(&tx.chain_id)),
        tx_ins: Some(ProtoTxIns {
            tx_ins: tx
                .inputs
                .iter()
                .map(|input| ProtoTxIn {
                    previous_out_point: Some(ProtoOutPoint {
                        hash: Some(ProtoHash { value: input.previous_outpoint.tx_hash.as_bytes().to_vec() }),
                        index: Some(input.previous_outpoint.index),
                    }),
                    address: Some(input.address.as_bytes().to_vec()),
                })
                .collect(),
        }),
        tx_outs: Some(ProtoTxOuts {
            tx_outs: tx
                .outputs
                .iter()
                .map(|output| ProtoTxOut {
                    denomination: Some(output.denomination as u32),
                    address: Some(output.address.as_bytes().to_vec()),
                })
                .collect(),
        }),
        ..Default::default()
    };
    if let (true, Some(signature)) = (with_signature, tx.signature()) {
        proto.signature = Some(signature.to_vec());
    }
    proto
}

pub fn encode_qi_transaction(tx: &QiTransaction, with_signature: bool) -> Vec<u8> {
    qi_transaction_to_proto(tx, with_signature).encode_to_vec()
}

fn proto_address(field: &str, bytes: Option<&[u8]>) -> Result<Address> {
    let bytes = bytes.unwrap_or_default();
    Address::try_from_slice(bytes).map_err(|err| Error::invalid_argument(field, hexlify(bytes), &err.to_string()))
}

impl TryFrom<ProtoTransaction> for QiTransaction {
    type Error = Error;

    fn try_from(proto: ProtoTransaction) -> Result<Self> {
        let wire_type = proto.r#type.unwrap_or_default();
        if wire_type != tx_type::QI {
            return Err(Error::invalid_argument("type", wire_type, "not a UTXO transaction"));
        }
        let inputs = proto
            .tx_ins
            .unwrap_or_default()
            .tx_ins
            .into_iter()
            .map(|input| {
                let outpoint = input.previous_out_point.unwrap_or_default();
                let hash = outpoint.hash.unwrap_or_default();
                let tx_hash = Hash::try_from_slice(&hash.value)
                    .map_err(|_| Error::invalid_argument("txIn.previousOutpoint.hash", hexlify(&hash.value), "invalid hash length"))?;
                Ok(TxInput {
                    previous_outpoint: Outpoint { tx_hash, index: outpoint.index.unwrap_or_default() },
                    address: proto_address("txIn.address", input.address.as_deref())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let outputs = proto
            .tx_outs
            .unwrap_or_default()
            .tx_outs
            .into_iter()
            .map(|output| {
                let denomination = output.denomination.unwrap_or_default();
                let denomination = u8::try_from(denomination)
                    .map_err(|_| Error::invalid_argument("txOut.denomination", denomination, "denomination out of range"))?;
                Ok(TxOutput { address: proto_address("txOut.address", output.address.as_deref())?, denomination })
            })
            .collect::<Result<Vec<_>>>()?;
        let mut tx = QiTransaction::new(from_be_bytes(proto.chain_id.as_deref().unwrap_or_default()), inputs, outputs);
        if let Some(signature) = proto.signature {
            tx.set_signature(signature)?;
        }
        Ok(tx)
    }
}

pub fn decode_qi_transaction(bytes: &[u8]) -> Result<QiTransaction> {
    let proto = ProtoTransaction::decode(bytes).map_err(|err| Error::invalid_argument("data", hexlify(bytes), &err.to_string()))?;
    QiTransaction::try_from(proto)
}
