//! Child numbers

use crate::{Error, Result};
use core::{
    fmt::{self, Display},
    str::FromStr,
};

/// Index of a particular child key for a given (extended) private key.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct ChildNumber(pub u32);

impl ChildNumber {
    /// Hardened child keys use indices 2^31 through 2^32-1.
    pub const HARDENED_FLAG: u32 = 1 << 31;

    /// Create new [`ChildNumber`] with the given index and hardened flag.
    ///
    /// Returns an error if it is equal to or greater than [`Self::HARDENED_FLAG`].
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index & Self::HARDENED_FLAG == 0 {
            let mut child = index;

            if hardened {
                child |= Self::HARDENED_FLAG;
            }

            Ok(ChildNumber(child))
        } else {
            Err(Error::ChildNumber)
        }
    }

    /// Get the index number for this [`ChildNumber`], i.e. with
    /// [`Self::HARDENED_FLAG`] cleared.
    pub fn index(self) -> u32 {
        self.0 & !Self::HARDENED_FLAG
    }

    /// Is this child number within the hardened range?
    pub fn is_hardened(&self) -> bool {
        self.0 & Self::HARDENED_FLAG != 0
    }

    /// Serialize this child number as bytes.
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())?;

        if self.is_hardened() {
            f.write_str("'")?;
        }

        Ok(())
    }
}

impl From<u32> for ChildNumber {
    fn from(n: u32) -> ChildNumber {
        ChildNumber(n)
    }
}

impl From<ChildNumber> for u32 {
    fn from(n: ChildNumber) -> u32 {
        n.0
    }
}

/// Accepts `N` and `N'`; `N` must be below 2^31.
impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(child: &str) -> Result<ChildNumber> {
        let (child, hardened) = match child.strip_suffix('\'') {
            Some(c) => (c, true),
            None => (child, false),
        };

        if child.is_empty() || !child.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::ChildNumber);
        }

        let index = child.parse().map_err(|_| Error::ChildNumber)?;
        ChildNumber::new(index, hardened)
    }
}

#[cfg(test)]
mod tests {
    use super::ChildNumber;

    #[test]
    fn parse_and_display() {
        let hardened: ChildNumber = "44'".parse().unwrap();
        assert!(hardened.is_hardened());
        assert_eq!(hardened.index(), 44);
        assert_eq!(hardened.0, 44 | ChildNumber::HARDENED_FLAG);
        assert_eq!(hardened.to_string(), "44'");

        let normal: ChildNumber = "7".parse().unwrap();
        assert!(!normal.is_hardened());
        assert_eq!(normal.to_bytes(), [0, 0, 0, 7]);

        assert!("2147483648".parse::<ChildNumber>().is_err());
        assert!("1h".parse::<ChildNumber>().is_err());
        assert!("-1".parse::<ChildNumber>().is_err());
        assert!("'".parse::<ChildNumber>().is_err());
    }
}
