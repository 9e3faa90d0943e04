//!
//! Loose input coercion used by the transaction setters. Every conversion
//! names the field it is coercing so failures can be reported precisely.
//!

use crate::error::Error;
use crate::result::Result;
use num::{BigUint, Num, ToPrimitive, Zero};
use quai_addresses::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Anything that can be read as a non-negative arbitrary precision integer:
/// native integers, [`BigUint`], or decimal / `0x` hex text.
pub trait BigNumberish {
    fn to_biguint(&self, field: &str) -> Result<BigUint>;

    fn to_u64(&self, field: &str) -> Result<u64> {
        let value = self.to_biguint(field)?;
        ToPrimitive::to_u64(&value).ok_or_else(|| Error::invalid_argument(field, &value, "value out of range"))
    }
}

macro_rules! impl_big_numberish_unsigned {
    ($($t:ty),*) => {
        $(
            impl BigNumberish for $t {
                fn to_biguint(&self, _field: &str) -> Result<BigUint> {
                    Ok(BigUint::from(*self))
                }
            }
        )*
    };
}

macro_rules! impl_big_numberish_signed {
    ($($t:ty),*) => {
        $(
            impl BigNumberish for $t {
                fn to_biguint(&self, field: &str) -> Result<BigUint> {
                    if *self < 0 {
                        return Err(Error::invalid_argument(field, self, "negative value"));
                    }
                    Ok(BigUint::from(self.unsigned_abs()))
                }
            }
        )*
    };
}

impl_big_numberish_unsigned!(u8, u16, u32, u64, u128, usize);
impl_big_numberish_signed!(i8, i16, i32, i64, i128, isize);

impl BigNumberish for BigUint {
    fn to_biguint(&self, _field: &str) -> Result<BigUint> {
        Ok(self.clone())
    }
}

impl BigNumberish for str {
    fn to_biguint(&self, field: &str) -> Result<BigUint> {
        parse_biguint(field, self)
    }
}

impl BigNumberish for String {
    fn to_biguint(&self, field: &str) -> Result<BigUint> {
        parse_biguint(field, self)
    }
}

impl<T: BigNumberish + ?Sized> BigNumberish for &T {
    fn to_biguint(&self, field: &str) -> Result<BigUint> {
        (**self).to_biguint(field)
    }
}

fn parse_biguint(field: &str, text: &str) -> Result<BigUint> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(Error::invalid_argument(field, text, "negative value"));
    }
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some("") => Some(BigUint::zero()),
        Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => BigUint::from_str_radix(hex, 16).ok(),
        Some(_) => None,
        None if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => BigUint::from_str_radix(trimmed, 10).ok(),
        None => None,
    };
    parsed.ok_or_else(|| Error::invalid_argument(field, text, "invalid BigNumberish string"))
}

/// Byte strings given either as raw bytes or `0x` prefixed hex text.
pub trait BytesLike {
    fn to_bytes(&self, field: &str) -> Result<Vec<u8>>;
}

impl BytesLike for [u8] {
    fn to_bytes(&self, _field: &str) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl<const N: usize> BytesLike for [u8; N] {
    fn to_bytes(&self, _field: &str) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl BytesLike for Vec<u8> {
    fn to_bytes(&self, _field: &str) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

impl BytesLike for str {
    fn to_bytes(&self, field: &str) -> Result<Vec<u8>> {
        parse_hex(field, self)
    }
}

impl BytesLike for String {
    fn to_bytes(&self, field: &str) -> Result<Vec<u8>> {
        parse_hex(field, self)
    }
}

impl<T: BytesLike + ?Sized> BytesLike for &T {
    fn to_bytes(&self, field: &str) -> Result<Vec<u8>> {
        (**self).to_bytes(field)
    }
}

fn parse_hex(field: &str, text: &str) -> Result<Vec<u8>> {
    let body = text.strip_prefix("0x").ok_or_else(|| Error::invalid_argument(field, text, "invalid BytesLike value"))?;
    hex::decode(body).map_err(|_| Error::invalid_argument(field, text, "invalid BytesLike value"))
}

/// Render bytes as `0x` prefixed lowercase hex.
pub fn hexlify(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Addresses given as an [`Address`] or as (optionally checksummed) hex text.
pub trait AddressLike {
    fn to_address(&self, field: &str) -> Result<Address>;
}

impl AddressLike for Address {
    fn to_address(&self, _field: &str) -> Result<Address> {
        Ok(*self)
    }
}

impl AddressLike for str {
    fn to_address(&self, field: &str) -> Result<Address> {
        self.parse::<Address>().map_err(|err| Error::invalid_argument(field, self, &err.to_string()))
    }
}

impl AddressLike for String {
    fn to_address(&self, field: &str) -> Result<Address> {
        self.as_str().to_address(field)
    }
}

impl<T: AddressLike + ?Sized> AddressLike for &T {
    fn to_address(&self, field: &str) -> Result<Address> {
        (**self).to_address(field)
    }
}

/// Minimal big-endian encoding: zero is the empty byte string.
pub fn to_be_bytes_minimal(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

pub fn from_be_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Numeric value in a serde record: either a JSON number or a decimal / hex string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(u64),
    Text(String),
}

impl BigNumberish for Numeric {
    fn to_biguint(&self, field: &str) -> Result<BigUint> {
        match self {
            Numeric::Int(value) => value.to_biguint(field),
            Numeric::Text(text) => text.to_biguint(field),
        }
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Numeric::Int(value)
    }
}

impl From<&BigUint> for Numeric {
    fn from(value: &BigUint) -> Self {
        Numeric::Text(value.to_str_radix(10))
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Int(value) => write!(f, "{value}"),
            Numeric::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_numberish() {
        assert_eq!(42u8.to_biguint("f").unwrap(), BigUint::from(42u8));
        assert_eq!("0x10".to_biguint("f").unwrap(), BigUint::from(16u8));
        assert_eq!("0x".to_biguint("f").unwrap(), BigUint::zero());
        assert_eq!("1000000000000000000000".to_biguint("f").unwrap().to_str_radix(10), "1000000000000000000000");
        assert!(matches!((-1i32).to_biguint("nonce"), Err(Error::InvalidArgument { field, .. }) if field == "nonce"));
        assert!(matches!("12ab".to_biguint("value"), Err(Error::InvalidArgument { .. })));
        assert!(matches!("".to_biguint("value"), Err(Error::InvalidArgument { .. })));
        assert!("18446744073709551616".to_u64("gasLimit").is_err());
    }

    #[test]
    fn test_malformed_number_text() {
        for text in ["1_000", "+5", "0x+1", "0x1_0", "1 0", "0x-1", "١٢"] {
            assert!(matches!(text.to_biguint("value"), Err(Error::InvalidArgument { .. })), "{text}");
        }
        assert_eq!(" 12 ".to_biguint("value").unwrap(), BigUint::from(12u8));
        assert_eq!(BigNumberish::to_u64(&BigUint::from(300u32), "gasLimit").unwrap(), 300);
    }

    #[test]
    fn test_bytes_like() {
        assert_eq!("0x0a0b".to_bytes("data").unwrap(), vec![10, 11]);
        assert_eq!("0x".to_bytes("data").unwrap(), Vec::<u8>::new());
        assert!("0a0b".to_bytes("data").is_err());
        assert!("0x0a0".to_bytes("data").is_err());
        assert_eq!(hexlify(&[0xde, 0xad]), "0xdead");
    }

    #[test]
    fn test_minimal_encoding() {
        assert!(to_be_bytes_minimal(&BigUint::zero()).is_empty());
        assert_eq!(to_be_bytes_minimal(&BigUint::from(0x0100u32)), vec![1, 0]);
        assert_eq!(from_be_bytes(&[]), BigUint::zero());
    }

    #[test]
    fn test_numeric_serde() {
        let values: Vec<Numeric> = serde_json::from_str(r#"[12, "0x0c", "12"]"#).unwrap();
        for value in values {
            assert_eq!(value.to_biguint("value").unwrap(), BigUint::from(12u8));
        }
    }
}
