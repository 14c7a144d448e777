//! Conversions between EVM words and circuit scalars

use alloy_primitives::U256;
use ark_ff::{BigInteger, PrimeField};
use constants::{SCALAR_FIELD_MODULUS, ScalarField};

use crate::errors::CryptoError;

/// Whether the given word is a canonical scalar field element
pub fn is_in_scalar_field(val: &U256) -> bool {
    *val < SCALAR_FIELD_MODULUS
}

/// Convert a word into a scalar, rejecting values that would wrap
///
/// The name is attached to the error so callers can report which input
/// overflowed
pub fn u256_to_scalar(val: &U256, name: &'static str) -> Result<ScalarField, CryptoError> {
    if !is_in_scalar_field(val) {
        return Err(CryptoError::FieldOverflow { name, value: *val });
    }

    Ok(u256_to_scalar_mod_order(val))
}

/// Convert a word into a scalar, reducing modulo the field order
pub fn u256_to_scalar_mod_order(val: &U256) -> ScalarField {
    ScalarField::from_be_bytes_mod_order(&val.to_be_bytes::<32>())
}

/// Convert a scalar into its canonical word representation
pub fn scalar_to_u256(val: &ScalarField) -> U256 {
    U256::from_be_slice(&val.into_bigint().to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let val = U256::from(3_200_000_000u64);
        let scalar = u256_to_scalar(&val, "val").unwrap();
        assert_eq!(scalar_to_u256(&scalar), val);

        let max = SCALAR_FIELD_MODULUS - U256::from(1u8);
        let scalar = u256_to_scalar(&max, "max").unwrap();
        assert_eq!(scalar_to_u256(&scalar), max);
    }

    #[test]
    fn test_modulus_rejected() {
        let err = u256_to_scalar(&SCALAR_FIELD_MODULUS, "nonce").unwrap_err();
        assert!(matches!(err, CryptoError::FieldOverflow { name: "nonce", .. }));

        // The lossy variant wraps to zero
        let wrapped = u256_to_scalar_mod_order(&SCALAR_FIELD_MODULUS);
        assert_eq!(scalar_to_u256(&wrapped), U256::ZERO);
    }
}
