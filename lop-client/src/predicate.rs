//! Builds predicates in the host protocol's calldata dialect
//!
//! A predicate is calldata the protocol static-calls against itself at fill
//! time; the fill proceeds only if the call returns a nonzero word. The
//! primitives here wrap arbitrary calls, compare their results, and join
//! several predicates behind an offsets table.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use common::types::ExtensionData;
use constants::{
    ADDITIONAL_PREDICATE_GAS, BASE_VERIFICATION_GAS, CALLDATA_GAS_PER_BYTE,
    MAX_PRECOMPILE_ADDRESS, PREDICATE_OVERHEAD_GAS, PREDICATE_SELECTOR, VERIFIER_INPUT_LEN,
};
use tracing::{debug, warn};
use util::hex::{bytes_from_hex_string, is_even_length_hex};

use crate::{
    abi::IPredicateHelper::{andCall, arbitraryStaticCallCall, eqCall, gtCall, ltCall, orCall},
    errors::PredicateError,
    extension::ExtensionBuilder,
    salt::extension_hash,
};

// --------------
// | Primitives |
// --------------

/// Wrap a call to an arbitrary contract
pub fn arbitrary_static_call(target: Address, calldata: &[u8]) -> Bytes {
    arbitraryStaticCallCall { target, data: Bytes::copy_from_slice(calldata) }.abi_encode().into()
}

/// Assert that the wrapped call returns a value greater than `value`
pub fn gt(value: U256, call: &[u8]) -> Bytes {
    gtCall { value, data: Bytes::copy_from_slice(call) }.abi_encode().into()
}

/// Assert that the wrapped call returns a value less than `value`
pub fn lt(value: U256, call: &[u8]) -> Bytes {
    ltCall { value, data: Bytes::copy_from_slice(call) }.abi_encode().into()
}

/// Assert that the wrapped call returns exactly `value`
pub fn eq(value: U256, call: &[u8]) -> Bytes {
    eqCall { value, data: Bytes::copy_from_slice(call) }.abi_encode().into()
}

/// Assert that the wrapped call returns a nonzero value
pub fn gt_zero(call: &[u8]) -> Bytes {
    gt(U256::ZERO, call)
}

/// Split a `gt(0, arbitraryStaticCall(target, calldata))` predicate into the
/// called contract and its calldata
pub fn decode_zk_predicate(predicate: &[u8]) -> Result<(Address, Bytes), PredicateError> {
    let gt = gtCall::abi_decode(predicate).map_err(PredicateError::malformed_predicate)?;
    if !gt.value.is_zero() {
        return Err(PredicateError::malformed_predicate("expected a comparison against zero"));
    }

    let call =
        arbitraryStaticCallCall::abi_decode(&gt.data).map_err(PredicateError::malformed_predicate)?;
    Ok((call.target, call.data))
}

/// Build the cumulative end offsets and concatenated blob of a join
fn join_parts(predicates: &[Bytes]) -> (Vec<U256>, Bytes) {
    let mut offsets = Vec::with_capacity(predicates.len());
    let mut data = Vec::new();
    for pred in predicates {
        data.extend_from_slice(pred);
        offsets.push(U256::from(data.len()));
    }

    (offsets, Bytes::from(data))
}

/// Join predicates so that all must hold
///
/// A single predicate is returned as-is
pub fn join_and(predicates: &[Bytes]) -> Result<Bytes, PredicateError> {
    match predicates {
        [] => Err(PredicateError::EmptyJoin),
        [single] => Ok(single.clone()),
        _ => {
            let (offsets, data) = join_parts(predicates);
            Ok(andCall { offsets, data }.abi_encode().into())
        },
    }
}

/// Join predicates so that any one must hold
///
/// A single predicate is returned as-is
pub fn join_or(predicates: &[Bytes]) -> Result<Bytes, PredicateError> {
    match predicates {
        [] => Err(PredicateError::EmptyJoin),
        [single] => Ok(single.clone()),
        _ => {
            let (offsets, data) = join_parts(predicates);
            Ok(orCall { offsets, data }.abi_encode().into())
        },
    }
}

// -------------
// | Gas Model |
// -------------

/// Estimate the gas spent evaluating a predicate
///
/// A coarse additive model; real costs must come from simulation
pub fn estimate_predicate_gas(calldata_len: usize, num_predicates: usize, num_zk: usize) -> u64 {
    let verification = BASE_VERIFICATION_GAS * num_zk as u64;
    let calldata = CALLDATA_GAS_PER_BYTE * calldata_len as u64;
    let extra = ADDITIONAL_PREDICATE_GAS * num_predicates.saturating_sub(1) as u64;

    verification + calldata + extra + PREDICATE_OVERHEAD_GAS
}

// ------------
// | Composer |
// ------------

/// A predicate to be composed into an order's extension
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateInput {
    /// A proof check against a verifier contract
    Zk {
        /// The verifier contract
        target: Address,
        /// The hex encoded verifier calldata
        proof_calldata: String,
    },
    /// A predicate already in the protocol's dialect
    Plain(Bytes),
}

/// Composes predicates into an extension ready to be bound into a salt
#[derive(Clone, Copy, Debug, Default)]
pub struct PredicateComposer;

impl PredicateComposer {
    /// Constructor
    pub fn new() -> Self {
        Self
    }

    /// Compose a single proof check into an extension
    ///
    /// The verifier returns `1` on acceptance, so its result is wrapped in
    /// `gt(0, ..)`
    pub fn compose_zk_predicate(
        &self,
        target: Address,
        proof_calldata: &str,
    ) -> Result<ExtensionData, PredicateError> {
        let input = PredicateInput::Zk { target, proof_calldata: proof_calldata.to_string() };
        self.compose(&[input], false /* use_or_logic */)
    }

    /// Compose a list of predicates into an extension
    ///
    /// OR composition of more than one proof check is not supported by the
    /// protocol; it is logged, recorded as a warning, and built as an AND
    pub fn compose(
        &self,
        predicates: &[PredicateInput],
        use_or_logic: bool,
    ) -> Result<ExtensionData, PredicateError> {
        if predicates.is_empty() {
            return Err(PredicateError::EmptyJoin);
        }

        let mut warnings = Vec::new();
        let mut parts = Vec::with_capacity(predicates.len());
        let mut num_zk = 0;
        for pred in predicates {
            match pred {
                PredicateInput::Zk { target, proof_calldata } => {
                    let calldata = validate_proof_calldata(proof_calldata, &mut warnings)?;
                    validate_target(*target, &mut warnings);
                    parts.push(gt_zero(&arbitrary_static_call(*target, &calldata)));
                    num_zk += 1;
                },
                PredicateInput::Plain(bytes) => parts.push(bytes.clone()),
            }
        }

        let predicate_call = if use_or_logic && num_zk > 1 {
            let msg = format!(
                "OR composition of {num_zk} proof predicates is unsupported, falling back to AND"
            );
            warn!("{msg}");
            warnings.push(msg);
            join_and(&parts)?
        } else if use_or_logic {
            join_or(&parts)?
        } else {
            join_and(&parts)?
        };

        let extension_bytes = ExtensionBuilder::new().with_predicate(predicate_call.clone()).build()?;
        let gas_estimate = estimate_predicate_gas(predicate_call.len(), parts.len(), num_zk);
        debug!(
            predicates = parts.len(),
            extension_len = extension_bytes.len(),
            gas_estimate,
            "composed predicate"
        );

        Ok(ExtensionData {
            extension_hash: extension_hash(&extension_bytes),
            extension_bytes,
            predicate_call,
            gas_estimate,
            warnings,
        })
    }
}

/// Decode proof calldata, warning when it is too short to hold a proof
fn validate_proof_calldata(
    proof_calldata: &str,
    warnings: &mut Vec<String>,
) -> Result<Bytes, PredicateError> {
    if !is_even_length_hex(proof_calldata) {
        return Err(PredicateError::invalid_proof_hex("expected an even length hex string"));
    }
    let bytes = bytes_from_hex_string(proof_calldata).map_err(PredicateError::invalid_proof_hex)?;

    let min_len = PREDICATE_SELECTOR.len() + VERIFIER_INPUT_LEN;
    if bytes.len() < min_len {
        warnings.push(format!(
            "proof calldata is {} bytes, shorter than the {min_len} byte minimum",
            bytes.len()
        ));
    }

    Ok(Bytes::from(bytes))
}

/// Warn when a predicate target cannot host a verifier
fn validate_target(target: Address, warnings: &mut Vec<String>) {
    if target == Address::ZERO {
        warnings.push("predicate target is the zero address".to_string());
    } else if is_precompile(target) {
        warnings.push(format!("predicate target {target} is a precompile address"));
    }
}

/// Whether the address falls in the precompile range
fn is_precompile(addr: Address) -> bool {
    let (high, low) = addr.0.split_at(addr.len() - 1);
    high.iter().all(|b| *b == 0) && u64::from(low[0]) <= MAX_PRECOMPILE_ADDRESS
}
