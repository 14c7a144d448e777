//! The maker's private threshold parameters

use std::fmt::{Debug, Formatter, Result as FmtResult};

use alloy_primitives::U256;
use constants::SCALAR_FIELD_MODULUS;
use rand::{RngCore, thread_rng};
use serde::{Deserialize, Serialize};
use zk_crypto::{CryptoError, hash::compute_commitment};

/// The secret thresholds a fill must satisfy
///
/// These never leave the maker's process except as a witness to the proving
/// backend
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretParameters {
    /// The minimum acceptable price, scaled by `1e18`
    pub secret_price: U256,
    /// The minimum acceptable amount
    pub secret_amount: U256,
    /// The nonce blinding the commitment
    pub nonce: U256,
}

impl SecretParameters {
    /// Constructor
    pub fn new(secret_price: U256, secret_amount: U256, nonce: U256) -> Self {
        Self { secret_price, secret_amount, nonce }
    }

    /// Construct the parameters with a nonce sampled uniformly from the scalar
    /// field
    pub fn with_random_nonce(secret_price: U256, secret_amount: U256) -> Self {
        let mut bytes = [0_u8; 32];
        thread_rng().fill_bytes(&mut bytes);
        let nonce = U256::from_be_bytes(bytes) % SCALAR_FIELD_MODULUS;

        Self { secret_price, secret_amount, nonce }
    }

    /// Compute the public commitment to these parameters
    pub fn commitment(&self) -> Result<U256, CryptoError> {
        compute_commitment(&self.secret_price, &self.secret_amount, &self.nonce)
    }
}

/// Debug implementation that redacts the thresholds
impl Debug for SecretParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SecretParameters")
            .field("secret_price", &"<redacted>")
            .field("secret_amount", &"<redacted>")
            .field("nonce", &self.nonce)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_nonce_in_field() {
        let params = SecretParameters::with_random_nonce(U256::from(1u8), U256::from(2u8));
        assert!(params.nonce < SCALAR_FIELD_MODULUS);
        assert!(params.commitment().is_ok());
    }

    #[test]
    fn test_debug_redacts_thresholds() {
        let params = SecretParameters::new(U256::from(31337u64), U256::from(4242u64), U256::ZERO);
        let debug = format!("{params:?}");
        assert!(!debug.contains("31337"));
        assert!(!debug.contains("4242"));
    }
}
