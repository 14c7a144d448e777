//! Assembles zero-knowledge limit orders, at a high level the steps are:
//!     1. Validate the public order parameters
//!     2. Commit to the secret thresholds
//!     3. Obtain a proof, from the proving backend or pre-generated
//!     4. Compose the proof check into a predicate extension
//!     5. Bind the commitment and extension into the salt
//!     6. Assemble the order and attach the maker's metadata

use alloy_primitives::{Address, Bytes, U256};
use common::types::{
    IssueCategory, Order, OrderParams, SecretParameters, ValidationResult, ZkEnabledOrder,
    ZkMetadata,
};
use constants::PRICE_SCALE;
use lop_client::{
    order_traits::{HAS_EXTENSION_FLAG, MakerTraits},
    predicate::PredicateComposer,
    salt::{create_from_extension_bytes, extension_hash, truncate_commitment, unpack},
};
use proof_types::{
    CircuitInputs, ProvingBackend, ZkProof,
    encoding::{validate_proof_structure, verifier_calldata},
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use util::hex::bytes_to_hex_string;

use crate::errors::AssemblerError;

/// The prefix of every salt consistency error
pub const SALT_INCONSISTENCY: &str = "salt inconsistency";

/// Where the assembler obtains the order's proof
pub enum ProofSource<'a> {
    /// Prove with the given backend
    Backend(&'a dyn ProvingBackend),
    /// Use a proof generated ahead of time
    Pregenerated(ZkProof),
}

/// Options for order assembly
#[derive(Clone, Copy, Debug, Default)]
pub struct AssemblerConfig {
    /// Whether the maker accepts that the salt binds only the low 96 bits of
    /// the commitment
    pub truncation_acknowledged: bool,
}

/// Intermediate values of a build, for inspection
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDebugInfo {
    /// The full commitment
    pub commitment: U256,
    /// The price implied by the order's own amounts, scaled by `1e18`
    pub offered_price: U256,
    /// The amount offered by the order
    pub offered_amount: U256,
    /// The `predicate(bytes)` calldata sent to the verifier
    pub verifier_calldata: Bytes,
    /// The advisory predicate gas estimate
    pub predicate_gas_estimate: u64,
    /// Whether a caller-supplied salt was replaced
    pub salt_overwritten: bool,
    /// Warnings raised during the build
    pub warnings: ValidationResult,
}

/// Builds zero-knowledge orders
#[derive(Clone, Debug, Default)]
pub struct OrderAssembler {
    /// The assembler's options
    config: AssemblerConfig,
    /// The predicate composer
    composer: PredicateComposer,
}

impl OrderAssembler {
    /// Constructor
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config, composer: PredicateComposer::new() }
    }

    /// Build an order whose fill is gated on a proof against the secret
    /// thresholds
    #[instrument(skip_all, err, fields(maker = %params.maker, target = %predicate_target))]
    pub async fn build(
        &self,
        params: &OrderParams,
        secret_params: &SecretParameters,
        predicate_target: Address,
        proof_source: ProofSource<'_>,
    ) -> Result<(ZkEnabledOrder, BuildDebugInfo), AssemblerError> {
        let mut warnings = ValidationResult::new();

        // 1-2. Validate the public parameters and commit to the secret ones
        let proof_inputs = prepare_circuit_inputs(params, secret_params)?;
        let CircuitInputs { commit: commitment, offered_price, offered_amount, .. } = proof_inputs;

        // 3. Obtain and check the proof
        let proof = match proof_source {
            ProofSource::Backend(backend) => {
                debug!("proving order thresholds");
                backend.prove(&proof_inputs).await.map_err(AssemblerError::external_failure)?
            },
            ProofSource::Pregenerated(proof) => proof,
        };
        check_proof(&proof, commitment, secret_params.nonce, &mut warnings)?;

        // 4. Compose the predicate
        let calldata = verifier_calldata(&proof)?;
        let extension_data =
            self.composer.compose_zk_predicate(predicate_target, &bytes_to_hex_string(&calldata))?;
        for msg in extension_data.warnings.iter() {
            warnings.warning(IssueCategory::Zk, msg);
        }

        // 5. Bind the commitment and extension into the salt
        let salt_data = create_from_extension_bytes(commitment, &extension_data.extension_bytes)?;
        let salt_overwritten = params.salt.is_some_and(|s| s != salt_data.salt);
        if salt_overwritten {
            debug!("replacing caller-supplied salt with the packed salt");
        }

        // 6. Assemble the order
        let maker_traits = MakerTraits::from(params.maker_traits).with_flag(HAS_EXTENSION_FLAG);
        let order = Order {
            salt: salt_data.salt,
            maker: params.maker,
            receiver: params.receiver,
            maker_asset: params.maker_asset,
            taker_asset: params.taker_asset,
            making_amount: params.making_amount,
            taking_amount: params.taking_amount,
            maker_traits: maker_traits.into(),
            extension: extension_data.extension_bytes.clone(),
        };

        self.economic_warnings(params, secret_params, offered_price, &mut warnings);
        let debug_info = BuildDebugInfo {
            commitment,
            offered_price,
            offered_amount,
            verifier_calldata: calldata,
            predicate_gas_estimate: extension_data.gas_estimate,
            salt_overwritten,
            warnings: warnings.clone(),
        };

        // 7. Attach the metadata
        let zk_order = ZkEnabledOrder {
            order,
            zk_metadata: ZkMetadata {
                commitment,
                nonce: secret_params.nonce,
                secret_params: *secret_params,
                extension_data,
                salt_data,
                proof_inputs,
            },
        };

        let consistency = validate_consistency(&zk_order);
        if let Some(issue) = consistency.errors().next() {
            return Err(AssemblerError::consistency(&issue.message));
        }

        info!(
            salt = %zk_order.order.salt,
            extension_len = zk_order.order.extension.len(),
            warnings = warnings.issues.len(),
            "assembled zk order"
        );
        Ok((zk_order, debug_info))
    }

    /// Flag thresholds that work against the maker's own order
    fn economic_warnings(
        &self,
        params: &OrderParams,
        secret_params: &SecretParameters,
        offered_price: U256,
        warnings: &mut ValidationResult,
    ) {
        if offered_price < secret_params.secret_price {
            warnings.warning(
                IssueCategory::Order,
                "the order's own price is below the secret minimum price, it can never fill",
            );
        }

        if secret_params.secret_amount > params.making_amount {
            warnings.warning(
                IssueCategory::Order,
                "the secret minimum amount exceeds the making amount",
            );
        }

        if !self.config.truncation_acknowledged {
            warnings.warning(
                IssueCategory::Zk,
                "the salt binds only the low 96 bits of the commitment; acknowledge the reduced \
                 collision resistance to silence this warning",
            );
        }

        for issue in warnings.warnings() {
            warn!(category = ?issue.category, "{}", issue.message);
        }
    }
}

/// Validate the public parameters and derive the proving backend's inputs
///
/// This is the witness a backend proves over; makers proving out of process
/// render it with `CircuitInputs::to_snarkjs_input`
pub fn prepare_circuit_inputs(
    params: &OrderParams,
    secret_params: &SecretParameters,
) -> Result<CircuitInputs, AssemblerError> {
    validate_order_params(params)?;
    let offered_price = compute_offered_price(params)?;
    let commitment = secret_params.commitment()?;

    Ok(CircuitInputs {
        secret_price: secret_params.secret_price,
        secret_amount: secret_params.secret_amount,
        nonce: secret_params.nonce,
        commit: commitment,
        offered_price,
        offered_amount: params.making_amount,
    })
}

/// Check that the order's public parameters are well formed
fn validate_order_params(params: &OrderParams) -> Result<(), AssemblerError> {
    let addresses = [
        ("maker", params.maker),
        ("maker asset", params.maker_asset),
        ("taker asset", params.taker_asset),
    ];
    if let Some((name, _)) = addresses.iter().find(|(_, addr)| *addr == Address::ZERO) {
        return Err(AssemblerError::order_param(format!("{name} is the zero address")));
    }

    if params.making_amount.is_zero() {
        return Err(AssemblerError::order_param("making amount must be positive"));
    }
    if params.taking_amount.is_zero() {
        return Err(AssemblerError::order_param("taking amount must be positive"));
    }

    Ok(())
}

/// The price implied by the order's amounts, `taking * 1e18 / making`
fn compute_offered_price(params: &OrderParams) -> Result<U256, AssemblerError> {
    params
        .taking_amount
        .checked_mul(PRICE_SCALE)
        .map(|scaled| scaled / params.making_amount)
        .ok_or_else(|| AssemblerError::order_param("taking amount overflows the price scale"))
}

/// Check a proof against the commitment it must attest to
fn check_proof(
    proof: &ZkProof,
    commitment: U256,
    nonce: U256,
    warnings: &mut ValidationResult,
) -> Result<(), AssemblerError> {
    validate_proof_structure(proof)?;

    let signals = &proof.public_signals;
    if signals.commitment() != commitment {
        return Err(AssemblerError::consistency(
            "the proof's commitment signal does not match the secret parameters",
        ));
    }
    if signals.nonce() != nonce {
        return Err(AssemblerError::consistency("the proof's nonce signal does not match"));
    }

    if !signals.is_valid() {
        warnings.warning(
            IssueCategory::Zk,
            "the proof attests that the order's own amounts do not satisfy the thresholds",
        );
    }

    Ok(())
}

/// Check that an order's salt and extension agree with its metadata
///
/// Side-effect free; callable at any point in the lifecycle
pub fn validate_consistency(zk_order: &ZkEnabledOrder) -> ValidationResult {
    let mut result = ValidationResult::new();
    let order = &zk_order.order;
    let meta = &zk_order.zk_metadata;

    match meta.secret_params.commitment() {
        Ok(c) if c == meta.commitment => {},
        Ok(_) => result.error(
            IssueCategory::Zk,
            format!("{SALT_INCONSISTENCY}: commitment does not match the secret parameters"),
        ),
        Err(e) => result.error(IssueCategory::Zk, format!("{SALT_INCONSISTENCY}: {e}")),
    }
    if meta.nonce != meta.secret_params.nonce {
        result.error(IssueCategory::Zk, format!("{SALT_INCONSISTENCY}: nonce mismatch"));
    }

    let (salt_commitment, salt_ext_hash) = unpack(order.salt);
    if salt_commitment != truncate_commitment(meta.commitment) {
        result.error(
            IssueCategory::Zk,
            format!("{SALT_INCONSISTENCY}: salt does not carry the order's commitment"),
        );
    }
    if salt_ext_hash != extension_hash(&order.extension) {
        result.error(
            IssueCategory::Zk,
            format!("{SALT_INCONSISTENCY}: salt does not match the extension hash"),
        );
    }
    if meta.extension_data.extension_bytes != order.extension {
        result.error(
            IssueCategory::Zk,
            format!("{SALT_INCONSISTENCY}: extension differs from the composed predicate"),
        );
    }

    if order.extension.is_empty() {
        result.error(IssueCategory::Zk, "order has no extension");
    }
    if !MakerTraits::from(order.maker_traits).has_extension() {
        result.error(IssueCategory::Order, "maker traits do not flag the extension");
    }

    result
}

#[cfg(test)]
mod tests {
    use alloy_primitives::uint;
    use lop_client::errors::SaltError;

    use super::*;

    /// Parameters with the given amounts
    fn params(making: U256, taking: U256) -> OrderParams {
        OrderParams {
            maker: Address::repeat_byte(1),
            maker_asset: Address::repeat_byte(2),
            taker_asset: Address::repeat_byte(3),
            making_amount: making,
            taking_amount: taking,
            ..Default::default()
        }
    }

    #[test]
    fn test_offered_price() {
        let p = params(uint!(5000000000000000000_U256), U256::from(17_500_000_000u64));
        assert_eq!(compute_offered_price(&p).unwrap(), U256::from(3_500_000_000u64));
    }

    #[test]
    fn test_rejects_bad_params() {
        let mut p = params(U256::from(1u8), U256::from(1u8));
        assert!(validate_order_params(&p).is_ok());

        p.maker_asset = Address::ZERO;
        assert!(matches!(validate_order_params(&p), Err(AssemblerError::OrderParam(_))));

        let p = params(U256::ZERO, U256::from(1u8));
        assert!(matches!(validate_order_params(&p), Err(AssemblerError::OrderParam(_))));

        // A zero receiver means the maker
        let p = OrderParams { receiver: Address::ZERO, ..params(U256::from(1u8), U256::from(1u8)) };
        assert!(validate_order_params(&p).is_ok());
    }

    #[test]
    fn test_circuit_inputs_bind_commitment() {
        let p = params(uint!(5000000000000000000_U256), U256::from(17_500_000_000u64));
        let secret = SecretParameters::new(U256::from(3u8), U256::from(2u8), U256::from(7u8));

        let inputs = prepare_circuit_inputs(&p, &secret).unwrap();
        assert_eq!(inputs.commit, secret.commitment().unwrap());
        assert_eq!(inputs.offered_amount, p.making_amount);
        assert_eq!(inputs.to_snarkjs_input()["offeredPrice"], "3500000000");
    }

    #[test]
    fn test_salt_errors_surface() {
        let wide = U256::from(1u8) << 160;
        let err: AssemblerError = SaltError::ExtensionHashTooLarge(wide).into();
        assert!(matches!(err, AssemblerError::Salt(_)));
        assert!(err.to_string().starts_with("error packing salt"));
    }
}
