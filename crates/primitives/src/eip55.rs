//! EIP-55 mixed-case address checksums.

use crate::{keccak256, Address};

/// Formats an address with the EIP-55 mixed-case checksum: hex nibble `i`
/// is uppercased iff nibble `i` of `keccak256(lowercase_hex_address)` is
/// greater than 7.
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_slice());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        out.push(if nibble > 7 { c.to_ascii_uppercase() } else { c });
    }
    out
}

/// Checks an address string's checksum.
///
/// All-lowercase and all-uppercase hex carry no checksum and are accepted;
/// mixed-case input must match [`to_checksum`] exactly.
pub fn validate_checksum(address: &str) -> bool {
    let hex_part = address.strip_prefix("0x").unwrap_or(address);
    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    let has_upper = hex_part.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = hex_part.bytes().any(|b| b.is_ascii_lowercase());
    if !(has_upper && has_lower) {
        return true;
    }
    let parsed: Address = match hex_part.parse() {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    to_checksum(&parsed)[2..] == *hex_part
}
