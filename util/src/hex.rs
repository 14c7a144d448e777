//! Helpers for converting values to and from hex strings
use alloy_primitives::{Address, U256};

/// Convert a byte array to a hex string
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    format!("0x{encoded}")
}

/// Convert a hex string to a byte array
pub fn bytes_from_hex_string(hex: &str) -> Result<Vec<u8>, String> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    hex::decode(hex).map_err(|e| format!("error deserializing bytes from hex string: {e}"))
}

/// Whether the given string is a well formed, even length hex string with an
/// optional `0x` prefix
pub fn is_even_length_hex(hex: &str) -> bool {
    let stripped = hex.strip_prefix("0x").unwrap_or(hex);
    stripped.len() % 2 == 0 && stripped.chars().all(|c| c.is_ascii_hexdigit())
}

/// A helper to deserialize a `U256` from a hex string
pub fn u256_from_hex_string(hex: &str) -> Result<U256, String> {
    // Deserialize as a string and remove "0x" if present
    let stripped = hex.strip_prefix("0x").unwrap_or(hex);
    U256::from_str_radix(stripped, 16 /* radix */)
        .map_err(|e| format!("error deserializing U256 from hex string: {e}"))
}

/// Parse a `U256` from either a `0x` prefixed hex string or a decimal string
pub fn u256_from_str(val: &str) -> Result<U256, String> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(_) => u256_from_hex_string(val),
        None => U256::from_str_radix(val, 10 /* radix */)
            .map_err(|e| format!("error deserializing U256 from decimal string: {e}")),
    }
}

/// Parse an address from a hex string
pub fn address_from_hex_string(hex: &str) -> Result<Address, String> {
    hex.parse::<Address>().map_err(|e| format!("error parsing address `{hex}`: {e}"))
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, thread_rng};

    use super::*;

    #[test]
    fn test_bytes_serialize_deserialize() {
        let mut rng = thread_rng();
        let mut bytes = [0_u8; 32];
        rng.fill_bytes(&mut bytes);

        let hex = bytes_to_hex_string(&bytes);
        let bytes_rec = bytes_from_hex_string(&hex).unwrap();

        assert_eq!(bytes.to_vec(), bytes_rec)
    }

    #[test]
    fn test_even_length_hex() {
        assert!(is_even_length_hex("0xdeadbeef"));
        assert!(is_even_length_hex("deadbeef"));
        assert!(is_even_length_hex("0x"));
        assert!(!is_even_length_hex("0xabc"));
        assert!(!is_even_length_hex("0xzz"));
    }

    #[test]
    fn test_u256_parsing() {
        let val = U256::from(3_200_000_000u64);
        assert_eq!(u256_from_str("3200000000").unwrap(), val);
        assert_eq!(u256_from_str(&format!("{val:#x}")).unwrap(), val);
        assert!(u256_from_str("12ab").is_err());
    }
}
