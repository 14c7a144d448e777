//! Serializes proofs into the exact byte layout the predicate verifier
//! decodes, and back again for inspection
//!
//! The verifier input is `abi.encode(uint256[2] pA, uint256[2][2] pB,
//! uint256[2] pC, uint256[5] pubSignals)`, thirteen static words. The verifier
//! is invoked through `predicate(bytes)`, so the calldata wraps that input in
//! a dynamic `bytes` argument behind the selector

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolValue;
use constants::{
    BASE_FIELD_MODULUS, NUM_PUBLIC_SIGNALS, PREDICATE_SELECTOR, SCALAR_FIELD_MODULUS,
    VERIFIER_INPUT_LEN,
};
use tracing::debug;

use crate::{
    errors::ProofError,
    groth16::{Groth16Proof, PublicSignals, ZkProof},
};

/// The width of an ABI word
const WORD_SIZE: usize = 32;

// --------------
// | Validation |
// --------------

/// Check that every element of the proof is well formed
///
/// This checks element ranges only, it does not verify the proof
pub fn validate_proof_structure(proof: &ZkProof) -> Result<(), ProofError> {
    let Groth16Proof { a, b, c } = &proof.proof;
    let coords = [
        ("a.x", a.x),
        ("a.y", a.y),
        ("b.x0", b.x[0]),
        ("b.x1", b.x[1]),
        ("b.y0", b.y[0]),
        ("b.y1", b.y[1]),
        ("c.x", c.x),
        ("c.y", c.y),
    ];

    if let Some((name, _)) = coords.iter().find(|(_, v)| *v >= BASE_FIELD_MODULUS) {
        return Err(ProofError::CoordinateOutOfRange(name));
    }

    validate_public_signals(&proof.public_signals)
}

/// Check that the public signals are scalar field elements with a boolean
/// validity flag
pub fn validate_public_signals(signals: &PublicSignals) -> Result<(), ProofError> {
    if let Some(index) = signals.0.iter().position(|s| *s >= SCALAR_FIELD_MODULUS) {
        return Err(ProofError::SignalOutOfRange { index });
    }

    if signals.validity_flag() > U256::from(1u8) {
        return Err(ProofError::InvalidValidityFlag);
    }

    Ok(())
}

// ------------
// | Encoding |
// ------------

/// ABI encode the proof and signals as the verifier's input
pub fn encode_verifier_input(proof: &ZkProof) -> Result<Bytes, ProofError> {
    validate_proof_structure(proof)?;

    let (a, b, c) = proof.proof.to_verifier_layout();
    let encoded = (a, b, c, proof.public_signals.0).abi_encode_params();
    debug_assert_eq!(encoded.len(), VERIFIER_INPUT_LEN);

    Ok(Bytes::from(encoded))
}

/// Decode the verifier's input back into a proof and its signals
pub fn decode_verifier_input(input: &[u8]) -> Result<ZkProof, ProofError> {
    if input.len() != VERIFIER_INPUT_LEN {
        return Err(ProofError::InvalidLength {
            expected: VERIFIER_INPUT_LEN,
            actual: input.len(),
        });
    }

    let words: Vec<U256> = input.chunks_exact(WORD_SIZE).map(U256::from_be_slice).collect();
    let a = [words[0], words[1]];
    let b = [[words[2], words[3]], [words[4], words[5]]];
    let c = [words[6], words[7]];
    let public_signals = PublicSignals::from_slice(&words[8..8 + NUM_PUBLIC_SIGNALS])?;

    let proof = ZkProof { proof: Groth16Proof::from_verifier_layout((a, b, c)), public_signals };
    validate_proof_structure(&proof)?;
    Ok(proof)
}

/// Build the calldata for `predicate(bytes)` on the verifier contract
pub fn verifier_calldata(proof: &ZkProof) -> Result<Bytes, ProofError> {
    let input = encode_verifier_input(proof)?;

    let mut calldata = PREDICATE_SELECTOR.to_vec();
    calldata.extend((input,).abi_encode_params());
    debug!(len = calldata.len(), "encoded verifier calldata");

    Ok(Bytes::from(calldata))
}

/// Decode `predicate(bytes)` calldata back into a proof and its signals
pub fn decode_verifier_calldata(calldata: &[u8]) -> Result<ZkProof, ProofError> {
    let selector_len = PREDICATE_SELECTOR.len();
    if calldata.len() < selector_len || calldata[..selector_len] != PREDICATE_SELECTOR {
        let found = calldata.get(..selector_len.min(calldata.len())).unwrap_or_default();
        return Err(ProofError::InvalidSelector(util::hex::bytes_to_hex_string(found)));
    }

    // A single dynamic argument: offset word, length word, padded data
    let args = &calldata[selector_len..];
    let expected = 2 * WORD_SIZE + VERIFIER_INPUT_LEN;
    if args.len() != expected {
        return Err(ProofError::InvalidLength { expected, actual: args.len() });
    }

    let offset = U256::from_be_slice(&args[..WORD_SIZE]);
    let len = U256::from_be_slice(&args[WORD_SIZE..2 * WORD_SIZE]);
    if offset != U256::from(WORD_SIZE) || len != U256::from(VERIFIER_INPUT_LEN) {
        return Err(ProofError::InvalidLength {
            expected: VERIFIER_INPUT_LEN,
            actual: len.saturating_to::<usize>(),
        });
    }

    decode_verifier_input(&args[2 * WORD_SIZE..])
}

#[cfg(test)]
mod tests {
    use crate::groth16::{G1Point, G2Point};

    use super::*;

    /// Build a structurally valid proof with small coordinates
    fn dummy_proof() -> ZkProof {
        let w = |v: u64| U256::from(v);
        ZkProof {
            proof: Groth16Proof {
                a: G1Point { x: w(1), y: w(2) },
                b: G2Point { x: [w(3), w(4)], y: [w(5), w(6)] },
                c: G1Point { x: w(7), y: w(8) },
            },
            public_signals: PublicSignals::new(true, w(99), w(42), w(3_500_000_000), w(5)),
        }
    }

    #[test]
    fn test_encoded_layout() {
        let encoded = encode_verifier_input(&dummy_proof()).unwrap();
        assert_eq!(encoded.len(), VERIFIER_INPUT_LEN);

        // pB is written with each coordinate pair reversed
        let word = |i: usize| U256::from_be_slice(&encoded[i * 32..(i + 1) * 32]);
        assert_eq!(word(0), U256::from(1u8));
        assert_eq!(word(2), U256::from(4u8));
        assert_eq!(word(3), U256::from(3u8));
        assert_eq!(word(8), U256::from(1u8));
        assert_eq!(word(9), U256::from(99u8));
    }

    #[test]
    fn test_calldata_decodes_to_original() {
        let proof = dummy_proof();
        let calldata = verifier_calldata(&proof).unwrap();

        assert_eq!(&calldata[..4], &PREDICATE_SELECTOR);
        assert_eq!(calldata.len(), 4 + 64 + VERIFIER_INPUT_LEN);
        assert_eq!(decode_verifier_calldata(&calldata).unwrap(), proof);
    }

    #[test]
    fn test_rejects_out_of_range_elements() {
        let mut proof = dummy_proof();
        proof.proof.c.y = BASE_FIELD_MODULUS;
        assert_eq!(
            encode_verifier_input(&proof).unwrap_err(),
            ProofError::CoordinateOutOfRange("c.y")
        );

        let mut proof = dummy_proof();
        proof.public_signals.0[3] = SCALAR_FIELD_MODULUS;
        assert_eq!(
            encode_verifier_input(&proof).unwrap_err(),
            ProofError::SignalOutOfRange { index: 3 }
        );

        let mut proof = dummy_proof();
        proof.public_signals.0[0] = U256::from(2u8);
        assert_eq!(encode_verifier_input(&proof).unwrap_err(), ProofError::InvalidValidityFlag);
    }

    #[test]
    fn test_rejects_bad_calldata() {
        let err = decode_verifier_calldata(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, ProofError::InvalidSelector(_)));

        let err = decode_verifier_input(&[0u8; 100]).unwrap_err();
        assert_eq!(err, ProofError::InvalidLength { expected: VERIFIER_INPUT_LEN, actual: 100 });
    }
}
