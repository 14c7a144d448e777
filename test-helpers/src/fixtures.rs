//! Order and proof fixtures
//!
//! Proofs built here are structurally well formed with placeholder curve
//! points; only the public signals carry meaning

use alloy_primitives::{Address, U256, uint};
use common::types::{OrderParams, SecretParameters};
use constants::PRICE_SCALE;
use proof_types::{CircuitInputs, G1Point, G2Point, Groth16Proof, PublicSignals, ZkProof};
use rand::{RngCore, thread_rng};

/// The secret minimum price of the reference order, scaled by `1e18`
pub const SECRET_PRICE: U256 = uint!(3200000000_U256);
/// The secret minimum amount of the reference order
pub const SECRET_AMOUNT: U256 = uint!(2000000000000000000_U256);
/// The making amount of the reference order
pub const MAKING_AMOUNT: U256 = uint!(5000000000000000000_U256);
/// The taking amount of the reference order
pub const TAKING_AMOUNT: U256 = uint!(17500000000_U256);
/// The nonce of the reference order
pub const NONCE: U256 = uint!(123456789_U256);

/// A random non-zero address
pub fn random_address() -> Address {
    let mut bytes = [0u8; 20];
    thread_rng().fill_bytes(&mut bytes);
    bytes[0] |= 1;
    Address::from(bytes)
}

/// The reference secret parameters
pub fn secret_params() -> SecretParameters {
    SecretParameters::new(SECRET_PRICE, SECRET_AMOUNT, NONCE)
}

/// Reference order parameters for the given maker, selling `5e18` of one
/// token for `17500000000` of another
pub fn order_params(maker: Address) -> OrderParams {
    OrderParams {
        maker,
        maker_asset: Address::repeat_byte(0xa1),
        taker_asset: Address::repeat_byte(0xb2),
        making_amount: MAKING_AMOUNT,
        taking_amount: TAKING_AMOUNT,
        ..Default::default()
    }
}

/// The circuit inputs of an order built from the given parameters
pub fn circuit_inputs(params: &OrderParams, secret: &SecretParameters) -> CircuitInputs {
    CircuitInputs {
        secret_price: secret.secret_price,
        secret_amount: secret.secret_amount,
        nonce: secret.nonce,
        commit: secret.commitment().unwrap_or_default(),
        offered_price: params.taking_amount * PRICE_SCALE / params.making_amount,
        offered_amount: params.making_amount,
    }
}

/// Whether an offer satisfies the thresholds, as the circuit decides it
pub fn satisfies_thresholds(inputs: &CircuitInputs) -> bool {
    inputs.offered_price >= inputs.secret_price && inputs.offered_amount >= inputs.secret_amount
}

/// A structurally valid proof attesting to the given inputs
pub fn mock_proof(inputs: &CircuitInputs) -> ZkProof {
    let signals = PublicSignals::new(
        satisfies_thresholds(inputs),
        inputs.commit,
        inputs.nonce,
        inputs.offered_price,
        inputs.offered_amount,
    );

    ZkProof { proof: placeholder_points(), public_signals: signals }
}

/// Curve points in range of the base field
fn placeholder_points() -> Groth16Proof {
    let word = |v: u64| U256::from(v);
    Groth16Proof {
        a: G1Point { x: word(1), y: word(2) },
        b: G2Point { x: [word(3), word(4)], y: [word(5), word(6)] },
        c: G1Point { x: word(7), y: word(8) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_order_satisfies_thresholds() {
        let params = order_params(random_address());
        let inputs = circuit_inputs(&params, &secret_params());

        assert_eq!(inputs.offered_price, U256::from(3_500_000_000u64));
        assert!(mock_proof(&inputs).public_signals.is_valid());
    }
}
