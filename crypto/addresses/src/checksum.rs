//!
//! Mixed-case checksum text encoding for 20-byte addresses (EIP-55).
//!

use quai_hashes::keccak256;

/// Render `bytes` as `0x`-prefixed hex whose letter casing encodes a checksum.
pub(crate) fn encode(bytes: &[u8; 20]) -> String {
    let lower = hex::encode(bytes);
    let digest = keccak256(lower.as_bytes()).as_bytes();

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        // high nibble for even positions, low nibble for odd ones
        let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Single-case input carries no checksum and is always accepted.
pub(crate) fn is_checksummed_or_single_case(hex_body: &str, bytes: &[u8; 20]) -> bool {
    let has_lower = hex_body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_body.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    encode(bytes)[2..] == *hex_body
}
