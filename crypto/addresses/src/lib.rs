use quai_hashes::keccak256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

mod checksum;
mod zone;

pub use zone::{Ledger, Zone};

pub const ADDRESS_SIZE: usize = 20;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum AddressError {
    #[error("Invalid address length {0}")]
    InvalidLength(usize),

    #[error("Invalid character in address `{0}`")]
    DecodingError(String),

    #[error("Checksum is invalid")]
    BadChecksum,

    #[error("Invalid public key length {0}")]
    InvalidPublicKey(usize),

    #[error("Invalid zone `{0}`")]
    InvalidZone(String),
}

/// A 20-byte account or UTXO address. Parses from `0x`-prefixed hex (checksum
/// enforced for mixed-case input) and displays in checksum form.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_SIZE] = bytes.try_into().map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Derive the address owned by an uncompressed SEC1 public key
    /// (`0x04 || x || y`): the trailing 20 bytes of its Keccak-256 digest.
    pub fn from_uncompressed_public_key(public_key: &[u8]) -> Result<Self, AddressError> {
        if public_key.len() != 65 || public_key[0] != 0x04 {
            return Err(AddressError::InvalidPublicKey(public_key.len()));
        }
        let digest = keccak256(&public_key[1..]).as_bytes();
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&digest[32 - ADDRESS_SIZE..]);
        Ok(Self(bytes))
    }

    /// Checksummed text form.
    pub fn to_checksum(&self) -> String {
        checksum::encode(&self.0)
    }

    pub fn zone(&self) -> Option<Zone> {
        Zone::of(self)
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::of(self)
    }

    pub fn is_utxo(&self) -> bool {
        self.ledger() == Ledger::Qi
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let body = address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")).unwrap_or(address);
        if body.len() != ADDRESS_SIZE * 2 {
            return Err(AddressError::InvalidLength(body.len() / 2));
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| AddressError::DecodingError(address.to_string()))?;
        if !checksum::is_checksummed_or_single_case(body, &bytes) {
            return Err(AddressError::BadChecksum);
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_checksum()
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn checksum_cases() -> Vec<&'static str> {
        vec![
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ]
    }

    #[test]
    fn check_checksum_round_trip() {
        for case in checksum_cases() {
            let address: Address = case.parse().expect("valid checksum");
            assert_eq!(address.to_string(), case);
            let lower: Address = case.to_lowercase().parse().expect("lowercase carries no checksum");
            assert_eq!(lower, address);
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>(), Err(AddressError::BadChecksum));
        assert_eq!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA".parse::<Address>(), Err(AddressError::InvalidLength(19)));
        assert!(matches!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAzz".parse::<Address>(), Err(AddressError::DecodingError(_))));
    }

    #[test]
    fn test_from_public_key() {
        // secret key 0x...01, i.e. the curve generator
        let generator = hex::decode(concat!(
            "04",
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        ))
        .unwrap();
        let address = Address::from_uncompressed_public_key(&generator).unwrap();
        assert_eq!(address.to_string(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert_eq!(Address::from_uncompressed_public_key(&generator[1..]), Err(AddressError::InvalidPublicKey(64)));
    }

    #[test]
    fn test_serde() {
        let address: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"");
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), address);
    }
}
