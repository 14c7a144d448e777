//! The commitment scheme binding a maker's secret thresholds
//!
//! The hash is the circom parameterization of Poseidon over BN254 so that the
//! value computed here equals the value the threshold circuit computes from
//! the same witness

use alloy_primitives::U256;
use constants::ScalarField;
use light_poseidon::{Poseidon, PoseidonHasher};

use crate::{
    errors::CryptoError,
    fields::{scalar_to_u256, u256_to_scalar},
};

/// Compute the circom Poseidon hash of a sequence of scalars
pub fn compute_poseidon_hash(values: &[ScalarField]) -> Result<ScalarField, CryptoError> {
    let mut hasher =
        Poseidon::<ScalarField>::new_circom(values.len()).map_err(CryptoError::poseidon)?;
    hasher.hash(values).map_err(CryptoError::poseidon)
}

/// Compute the commitment to a maker's secret thresholds
///
/// `commit = Poseidon(secret_price, secret_amount, nonce)`; every input must
/// already be a canonical field element
pub fn compute_commitment(
    secret_price: &U256,
    secret_amount: &U256,
    nonce: &U256,
) -> Result<U256, CryptoError> {
    let inputs = [
        u256_to_scalar(secret_price, "secret price")?,
        u256_to_scalar(secret_amount, "secret amount")?,
        u256_to_scalar(nonce, "nonce")?,
    ];

    let commitment = compute_poseidon_hash(&inputs)?;
    Ok(scalar_to_u256(&commitment))
}

/// Compute a Poseidon hash over words, e.g. for auxiliary circuit inputs
pub fn compute_poseidon_hash_u256(values: &[U256]) -> Result<U256, CryptoError> {
    let scalars = values
        .iter()
        .map(|v| u256_to_scalar(v, "hash input"))
        .collect::<Result<Vec<_>, _>>()?;
    let res = compute_poseidon_hash(&scalars)?;
    Ok(scalar_to_u256(&res))
}
