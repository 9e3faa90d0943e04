//!
//! Address-level shards ("zones") and the ledger a given address belongs to.
//!

use crate::{Address, AddressError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ledger kind of an address: account based (Quai) or UTXO based (Qi).
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ledger {
    Quai,
    Qi,
}

impl Ledger {
    /// The top bit of the second address byte selects the UTXO ledger.
    pub const LEDGER_BIT: u8 = 0x80;

    pub fn of(address: &Address) -> Self {
        if address.as_bytes()[1] & Self::LEDGER_BIT != 0 {
            Ledger::Qi
        } else {
            Ledger::Quai
        }
    }
}

impl Display for Ledger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Ledger::Quai => f.write_str("quai"),
            Ledger::Qi => f.write_str("qi"),
        }
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Cyprus1,
    Cyprus2,
    Cyprus3,
    Paxos1,
    Paxos2,
    Paxos3,
    Hydra1,
    Hydra2,
    Hydra3,
}

impl Zone {
    pub const ALL: [Zone; 9] = [
        Zone::Cyprus1,
        Zone::Cyprus2,
        Zone::Cyprus3,
        Zone::Paxos1,
        Zone::Paxos2,
        Zone::Paxos3,
        Zone::Hydra1,
        Zone::Hydra2,
        Zone::Hydra3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Zone::Cyprus1 => "Cyprus One",
            Zone::Cyprus2 => "Cyprus Two",
            Zone::Cyprus3 => "Cyprus Three",
            Zone::Paxos1 => "Paxos One",
            Zone::Paxos2 => "Paxos Two",
            Zone::Paxos3 => "Paxos Three",
            Zone::Hydra1 => "Hydra One",
            Zone::Hydra2 => "Hydra Two",
            Zone::Hydra3 => "Hydra Three",
        }
    }

    pub fn nickname(&self) -> &'static str {
        match self {
            Zone::Cyprus1 => "cyprus1",
            Zone::Cyprus2 => "cyprus2",
            Zone::Cyprus3 => "cyprus3",
            Zone::Paxos1 => "paxos1",
            Zone::Paxos2 => "paxos2",
            Zone::Paxos3 => "paxos3",
            Zone::Hydra1 => "hydra1",
            Zone::Hydra2 => "hydra2",
            Zone::Hydra3 => "hydra3",
        }
    }

    /// Shard identifier in `zone-<region>-<zone>` form.
    pub fn shard(&self) -> String {
        format!("zone-{}-{}", self.region(), self.index())
    }

    pub fn region(&self) -> u8 {
        self.prefix_byte() >> 4
    }

    pub fn index(&self) -> u8 {
        self.prefix_byte() & 0x0f
    }

    /// Leading address byte owned by this zone.
    pub fn prefix_byte(&self) -> u8 {
        match self {
            Zone::Cyprus1 => 0x00,
            Zone::Cyprus2 => 0x01,
            Zone::Cyprus3 => 0x02,
            Zone::Paxos1 => 0x10,
            Zone::Paxos2 => 0x11,
            Zone::Paxos3 => 0x12,
            Zone::Hydra1 => 0x20,
            Zone::Hydra2 => 0x21,
            Zone::Hydra3 => 0x22,
        }
    }

    pub fn from_prefix_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|zone| zone.prefix_byte() == byte)
    }

    pub fn of(address: &Address) -> Option<Self> {
        Self::from_prefix_byte(address.as_bytes()[0])
    }

    pub fn contains(&self, address: &Address) -> bool {
        Self::of(address) == Some(*self)
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.nickname())
    }
}

impl FromStr for Zone {
    type Err = AddressError;

    /// Accepts the zone name, nickname or prefix byte (`0x10`), case-insensitively.
    fn from_str(zone: &str) -> Result<Self, Self::Err> {
        let needle = zone.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|z| {
                z.name().to_lowercase() == needle || z.nickname() == needle || format!("0x{:02x}", z.prefix_byte()) == needle
            })
            .ok_or_else(|| AddressError::InvalidZone(zone.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_lookup() {
        assert_eq!("cyprus1".parse::<Zone>().unwrap(), Zone::Cyprus1);
        assert_eq!("Paxos Two".parse::<Zone>().unwrap(), Zone::Paxos2);
        assert_eq!("0x22".parse::<Zone>().unwrap(), Zone::Hydra3);
        assert_eq!("HYDRA1".parse::<Zone>().unwrap(), Zone::Hydra1);
        assert_eq!("mars".parse::<Zone>(), Err(AddressError::InvalidZone("mars".to_string())));
        assert_eq!(Zone::Paxos3.shard(), "zone-1-2");
    }

    #[test]
    fn test_classification() {
        let mut bytes = [0u8; 20];
        bytes[0] = 0x11;
        bytes[1] = 0x80;
        let qi = Address::from_bytes(bytes);
        assert_eq!(Zone::of(&qi), Some(Zone::Paxos2));
        assert_eq!(Ledger::of(&qi), Ledger::Qi);

        bytes[0] = 0x33;
        bytes[1] = 0x7f;
        let other = Address::from_bytes(bytes);
        assert_eq!(Zone::of(&other), None);
        assert_eq!(Ledger::of(&other), Ledger::Quai);
    }
}
