//! Input checks run before anything is sent to the node.

use ethers_core::{
    types::{Address, H256},
    utils::to_checksum,
};

use super::error::ValidationError;

fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

fn decode_fixed(input: &str, len: usize) -> Option<Vec<u8>> {
    let body = strip_hex_prefix(input);
    if body.len() != len * 2 {
        return None;
    }
    hex::decode(body).ok()
}

/// Parses an EVM address, with or without `0x`.
///
/// Single-case bodies are accepted as-is. A mixed-case body is treated as
/// EIP-55 checksummed and must match the checksum of the decoded address.
pub fn validate_address(input: &str) -> Result<Address, ValidationError> {
    let bytes = decode_fixed(input, 20)
        .ok_or_else(|| ValidationError::InvalidAddress(input.to_string()))?;
    let address = Address::from_slice(&bytes);

    let body = strip_hex_prefix(input);
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None)[2..] != *body {
        return Err(ValidationError::InvalidAddress(format!(
            "{} (checksum mismatch)",
            input
        )));
    }

    Ok(address)
}

/// Parses a 32-byte transaction or block hash.
pub fn validate_hash(input: &str) -> Result<H256, ValidationError> {
    decode_fixed(input, 32)
        .map(|bytes| H256::from_slice(&bytes))
        .ok_or_else(|| ValidationError::InvalidHash(input.to_string()))
}

/// Checks that `input` is a non-empty, even-length hex string and returns it
/// `0x`-prefixed and lowercased, the form sent to the node.
pub fn normalize_raw_transaction(input: &str) -> Result<String, ValidationError> {
    let body = strip_hex_prefix(input);
    if body.is_empty() {
        return Err(ValidationError::InvalidHex("empty payload".to_string()));
    }
    let bytes = hex::decode(body)
        .map_err(|e| ValidationError::InvalidHex(format!("{}: {}", input, e)))?;
    Ok(format!("0x{}", hex::encode(bytes)))
}
