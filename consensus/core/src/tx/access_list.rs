//!
//! Access lists: ordered `(address, storage keys)` pairs declared up front by a transaction.
//!

use crate::config::STORAGE_KEY_SIZE;
use crate::convert::AddressLike;
use crate::error::Error;
use crate::result::Result;
use quai_addresses::Address;
use quai_hashes::Hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<Hash>,
}

impl AccessListEntry {
    pub fn new(address: Address, storage_keys: Vec<Hash>) -> Self {
        Self { address, storage_keys }
    }
}

/// `None` on a transaction means "not set", which is distinct from an empty list.
pub type AccessList = Vec<AccessListEntry>;

/// Loosely typed access list accepted from records and callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessListish {
    /// Tried before `Entries`, which would also accept a two-element array.
    Tuples(Vec<(String, Vec<String>)>),
    Entries(Vec<AccessListEntryLike>),
    /// Keyed by address; normalized in address order.
    Map(BTreeMap<String, Vec<String>>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListEntryLike {
    pub address: String,
    #[serde(default)]
    pub storage_keys: Vec<String>,
}

impl From<AccessList> for AccessListish {
    fn from(list: AccessList) -> Self {
        AccessListish::Entries(
            list.into_iter()
                .map(|entry| AccessListEntryLike {
                    address: entry.address.to_checksum(),
                    storage_keys: entry.storage_keys.iter().map(Hash::to_hex).collect(),
                })
                .collect(),
        )
    }
}

fn access_set(address: &str, storage_keys: &[String]) -> Result<AccessListEntry> {
    let address = address.to_address("address")?;
    let storage_keys = storage_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let body = key.strip_prefix("0x").unwrap_or(key);
            let mut bytes = [0u8; STORAGE_KEY_SIZE];
            hex::decode_to_slice(body, &mut bytes)
                .map_err(|_| Error::invalid_argument(&format!("storageKeys[{index}]"), key, "invalid access list storageKey"))?;
            Ok(Hash::from_bytes(bytes))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AccessListEntry { address, storage_keys })
}

/// Normalize any accepted access list shape into an [`AccessList`].
/// Entry and tuple order is preserved; storage key order is preserved.
pub fn access_listify(value: &AccessListish) -> Result<AccessList> {
    match value {
        AccessListish::Entries(entries) => entries.iter().map(|entry| access_set(&entry.address, &entry.storage_keys)).collect(),
        AccessListish::Tuples(tuples) => tuples.iter().map(|(address, keys)| access_set(address, keys)).collect(),
        AccessListish::Map(map) => {
            let mut list = map.iter().map(|(address, keys)| access_set(address, keys)).collect::<Result<AccessList>>()?;
            list.sort_by(|a, b| a.address.cmp(&b.address));
            Ok(list)
        }
    }
}
