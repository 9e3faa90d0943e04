use crate::config::{SIGNATURE_SIZE, V_OFFSET};
use crate::error::Error;
use crate::result::Result;
use serde::{Deserialize, Serialize};

/// Recoverable secp256k1 ECDSA signature authorizing an account ledger transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "SignatureLike", try_from = "SignatureLike")]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    y_parity: u8,
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32], y_parity: u8) -> Result<Self> {
        if y_parity > 1 {
            return Err(Error::invalid_argument("yParity", y_parity, "invalid yParity"));
        }
        Ok(Self { r, s, y_parity })
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn y_parity(&self) -> u8 {
        self.y_parity
    }

    /// Legacy `v`: `27 + yParity`.
    pub fn v(&self) -> u8 {
        V_OFFSET + self.y_parity
    }

    /// `r || s || v`
    pub fn serialized(&self) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v();
        bytes
    }

    /// Parse the 65-byte `r || s || v` form; `v` may be `27`/`28` or a bare parity.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::invalid_argument("signature", hex::encode(bytes), "invalid raw signature length"));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self::new(r, s, parity_from_v(bytes[64] as u64)?)
    }

    pub fn from_like(like: &SignatureLike) -> Result<Self> {
        let r = left_pad_32("signature.r", &like.r)?;
        let s = left_pad_32("signature.s", &like.s)?;
        let y_parity = match (like.y_parity, like.v) {
            (Some(y_parity), Some(v)) => {
                let from_v = parity_from_v(v)?;
                if from_v != y_parity {
                    return Err(Error::invalid_argument("signature.v", v, "yParity mismatch"));
                }
                y_parity
            }
            (Some(y_parity), None) => y_parity,
            (None, Some(v)) => parity_from_v(v)?,
            (None, None) => return Err(Error::invalid_argument("signature", "null", "missing yParity")),
        };
        Self::new(r, s, y_parity)
    }

    pub(crate) fn to_secp(self) -> Result<secp256k1::ecdsa::RecoverableSignature> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32(self.y_parity as i32)?;
        Ok(secp256k1::ecdsa::RecoverableSignature::from_compact(&compact, recovery_id)?)
    }

    pub(crate) fn from_secp(signature: &secp256k1::ecdsa::RecoverableSignature) -> Self {
        let (recovery_id, compact) = signature.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Self { r, s, y_parity: recovery_id.to_i32() as u8 }
    }
}

fn parity_from_v(v: u64) -> Result<u8> {
    match v {
        0 | 1 => Ok(v as u8),
        27 | 28 => Ok((v - V_OFFSET as u64) as u8),
        _ => Err(Error::invalid_argument("yParity", v, "invalid yParity")),
    }
}

/// Left-pad a big-endian byte string to 32 bytes.
pub(crate) fn left_pad_32(field: &str, text_or_bytes: &str) -> Result<[u8; 32]> {
    let body = text_or_bytes.strip_prefix("0x").unwrap_or(text_or_bytes);
    let body = if body.len() % 2 == 1 { format!("0{body}") } else { body.to_string() };
    let bytes = hex::decode(&body).map_err(|_| Error::invalid_argument(field, text_or_bytes, "invalid hex"))?;
    pad_bytes_32(field, &bytes)
}

pub(crate) fn pad_bytes_32(field: &str, bytes: &[u8]) -> Result<[u8; 32]> {
    if bytes.len() > 32 {
        return Err(Error::invalid_argument(field, hex::encode(bytes), "value exceeds 32 bytes"));
    }
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(padded)
}

/// Serde shape of a signature: hex `r` / `s` plus `yParity` and/or legacy `v`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureLike {
    pub r: String,
    pub s: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_parity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,
}

impl From<Signature> for SignatureLike {
    fn from(signature: Signature) -> Self {
        Self {
            r: format!("0x{}", hex::encode(signature.r)),
            s: format!("0x{}", hex::encode(signature.s)),
            y_parity: Some(signature.y_parity),
            v: Some(signature.v() as u64),
        }
    }
}

impl TryFrom<SignatureLike> for Signature {
    type Error = Error;

    fn try_from(like: SignatureLike) -> Result<Self> {
        Signature::from_like(&like)
    }
}
