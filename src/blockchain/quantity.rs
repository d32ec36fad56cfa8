//! Hex quantity encoding used by the EVM JSON-RPC interface.

use ethers_core::types::U256;
use serde_json::Value;

use super::error::TransportError;

fn hex_body<'a>(value: &'a Value, what: &str) -> Result<&'a str, TransportError> {
    let s = value
        .as_str()
        .ok_or_else(|| TransportError::malformed(format!("{} is not a hex string: {}", what, value)))?;
    match s.strip_prefix("0x") {
        Some(body) if !body.is_empty() => Ok(body),
        _ => Err(TransportError::malformed(format!("{} is not a hex quantity: {}", what, s))),
    }
}

/// Decodes a quantity such as a block height, nonce or chain id.
///
/// Plain JSON numbers are accepted too, some nodes return them for small values.
pub fn decode_u64(value: &Value, what: &str) -> Result<u64, TransportError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let body = hex_body(value, what)?;
    u64::from_str_radix(body, 16)
        .map_err(|e| TransportError::malformed(format!("{} '{}': {}", what, body, e)))
}

/// Decodes a 256-bit quantity such as a balance in wei.
pub fn decode_u256(value: &Value, what: &str) -> Result<U256, TransportError> {
    if let Some(n) = value.as_u64() {
        return Ok(U256::from(n));
    }
    let body = hex_body(value, what)?;
    U256::from_str_radix(body, 16)
        .map_err(|e| TransportError::malformed(format!("{} '{}': {}", what, body, e)))
}

pub fn encode_u64(n: u64) -> String {
    format!("{:#x}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_hex_and_numbers() {
        assert_eq!(decode_u64(&json!("0x0"), "n").unwrap(), 0);
        assert_eq!(decode_u64(&json!("0x64"), "n").unwrap(), 100);
        assert_eq!(decode_u64(&json!(7), "n").unwrap(), 7);
        assert_eq!(
            decode_u256(&json!("0xde0b6b3a7640000"), "balance").unwrap(),
            U256::exp10(18)
        );
    }

    #[test]
    fn rejects_non_quantities() {
        assert!(decode_u64(&json!("0x"), "n").is_err());
        assert!(decode_u64(&json!("64"), "n").is_err());
        assert!(decode_u64(&json!(null), "n").is_err());
        assert!(decode_u64(&json!("0x10000000000000000"), "n").is_err());
        assert!(decode_u256(&json!({"a": 1}), "balance").is_err());
    }

    #[test]
    fn encodes_heights() {
        assert_eq!(encode_u64(0), "0x0");
        assert_eq!(encode_u64(100), "0x64");
    }
}
