//! Derivation paths

use crate::{AddressType, ChildNumber, Error, Result};
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Prefix for all derivation paths.
const PREFIX: &str = "m";

/// Derivation paths within a hierarchical keyspace.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DerivationPath {
    path: Vec<ChildNumber>,
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D>(deserializer: D) -> std::result::Result<DerivationPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DerivationPathVisitor;
        impl<'de> de::Visitor<'de> for DerivationPathVisitor {
            type Value = DerivationPath;
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a derivation path such as `m/44'/969'/0'/0`")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                DerivationPath::from_str(value).map_err(|err| de::Error::custom(err.to_string()))
            }
            fn visit_borrowed_str<E>(self, v: &'de str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                DerivationPath::from_str(v).map_err(|err| de::Error::custom(err.to_string()))
            }
        }

        deserializer.deserialize_str(DerivationPathVisitor)
    }
}

impl Serialize for DerivationPath {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl DerivationPath {
    /// Iterate over the [`ChildNumber`] values in this derivation path.
    pub fn iter(&self) -> impl Iterator<Item = ChildNumber> + '_ {
        self.path.iter().cloned()
    }

    /// Is this derivation path empty? (i.e. the root)
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Get the count of [`ChildNumber`] values in this derivation path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Push a [`ChildNumber`] onto an existing derivation path.
    pub fn push(&mut self, child_number: ChildNumber) {
        self.path.push(child_number)
    }

    /// Remove the last [`ChildNumber`], if any.
    pub fn pop(&mut self) -> Option<ChildNumber> {
        self.path.pop()
    }

    /// Number of `/` separated segments including the `m` prefix.
    pub fn segments(&self) -> usize {
        self.path.len() + 1
    }

    /// `m/44'/<coin_type>'/<account>'/<change>`
    pub fn bip44(coin_type: u32, account: u32, address_type: AddressType) -> Result<Self> {
        Ok(DerivationPath {
            path: vec![
                ChildNumber::new(BIP44_PURPOSE, true)?,
                ChildNumber::new(coin_type, true)?,
                ChildNumber::new(account, true)?,
                ChildNumber::new(address_type.index(), false)?,
            ],
        })
    }

    /// The BIP44 coin type segment (`m/44'/<coin_type>'/...`), if present.
    pub fn coin_type(&self) -> Option<u32> {
        self.path.get(1).map(|child| child.index())
    }
}

/// BIP44 purpose.
pub const BIP44_PURPOSE: u32 = 44;

/// Whether `path` has the exact shape `m/44'/<coin>'/<account>'/<0|1>`:
/// a BIP44 path ending at the change level, without an address index.
pub fn is_valid_path(path: &str) -> bool {
    fn hardened_digits(segment: &str) -> bool {
        segment.strip_suffix('\'').is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    }

    let segments = path.split('/').collect::<Vec<_>>();
    matches!(
        segments.as_slice(),
        [PREFIX, "44'", coin, account, "0" | "1"] if hardened_digits(coin) && hardened_digits(account)
    )
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;

        for child_number in self.iter() {
            write!(f, "/{}", child_number)?;
        }

        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<DerivationPath> {
        let mut path = path.split('/');

        if path.next() != Some(PREFIX) {
            return Err(Error::String(format!("Derivation don't start with `{PREFIX}/`")));
        }

        Ok(DerivationPath { path: path.map(str::parse).collect::<Result<_>>()? })
    }
}
