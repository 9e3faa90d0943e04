use std::fmt::{Display, Formatter};

/// BIP44 `change` level: external (receive) or internal (change) chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressType {
    #[default]
    Receive = 0,
    Change,
}

impl Display for AddressType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Receive => f.write_str("Receive"),
            Self::Change => f.write_str("Change"),
        }
    }
}

impl AddressType {
    pub fn index(&self) -> u32 {
        match self {
            Self::Receive => 0,
            Self::Change => 1,
        }
    }
}
