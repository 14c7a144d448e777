//! Integration tests for assembling and signing zero-knowledge orders

mod helpers;

use alloy_primitives::{Address, U256};
use common::types::{IssueCategory, IssueSeverity};
use eyre::{Result, eyre};
use lop_client::{
    client::LocalOrderSigner,
    eip712::{OrderTypedData, recover_signer},
    order_traits::MakerTraits,
    salt::{truncate_commitment, unpack},
    traits::OrderSigner,
};
use order_lifecycle::{
    AssemblerConfig, LifecycleController, LifecycleStatus, OrderAssembler, OrderLifecycle,
    ProofSource, errors::AssemblerError, prepare_for_fill, validate_consistency,
};
use test_helpers::{
    assert_eq_result, assert_issue_result, assert_true_result,
    fixtures::{circuit_inputs, mock_proof, order_params, random_address, secret_params},
    mocks::{FailingSigner, ThresholdProver},
};
use util::hex::bytes_to_hex_string;

use crate::helpers::{
    VERIFIER_ADDRESS, build_reference_order, domain, domain_for, ready_order,
};

// ---------
// | Build |
// ---------

/// Builds, signs, and revalidates the reference order
#[tokio::test]
async fn happy_path() -> Result<()> {
    let (lifecycle, signer) = ready_order().await?;
    let order = &lifecycle.order().order;

    assert_eq_result!(lifecycle.status(), LifecycleStatus::ReadyToFill)?;
    assert_true_result!(order.salt > U256::ZERO)?;
    assert_true_result!(bytes_to_hex_string(&order.extension).len() > 1000)?;
    assert_true_result!(MakerTraits::from(order.maker_traits).has_extension())?;

    // The signature recovers to the maker
    let sig = lifecycle.signature().ok_or_else(|| eyre!("missing signature"))?;
    let hash = OrderTypedData::new(domain(), order).signing_hash();
    assert_eq_result!(recover_signer(hash, sig)?, signer.address())?;

    let fill = prepare_for_fill(&lifecycle)?;
    assert_eq_result!(fill.r, sig.r)?;
    assert_eq_result!(fill.extension, order.extension)
}

/// The salt carries the truncated commitment and the extension hash
#[tokio::test]
async fn salt_binds_commitment_and_extension() -> Result<()> {
    let (order, debug) = build_reference_order(random_address()).await?;
    let (commitment, ext_hash) = unpack(order.order.salt);

    assert_eq_result!(commitment, truncate_commitment(debug.commitment))?;
    assert_eq_result!(ext_hash, order.zk_metadata.extension_data.extension_hash)?;
    assert_eq_result!(debug.offered_price, U256::from(3_500_000_000u64))?;
    assert_true_result!(validate_consistency(&order).is_valid())
}

/// A caller-supplied salt is replaced by the packed salt
#[tokio::test]
async fn caller_salt_is_overwritten() -> Result<()> {
    let mut params = order_params(random_address());
    params.salt = Some(U256::from(42u8));
    let secret = secret_params();
    let proof = mock_proof(&circuit_inputs(&params, &secret));

    let (order, debug) = OrderAssembler::default()
        .build(&params, &secret, VERIFIER_ADDRESS, ProofSource::Pregenerated(proof))
        .await?;

    assert_true_result!(debug.salt_overwritten)?;
    assert_true_result!(order.order.salt != U256::from(42u8))?;

    // Without an acknowledgement the truncation is flagged
    assert_issue_result!(debug.warnings, IssueSeverity::Warning, IssueCategory::Zk, "96 bits")
}

/// Proving through a backend yields the same order shape
#[tokio::test]
async fn build_with_backend() -> Result<()> {
    let params = order_params(random_address());
    let prover = ThresholdProver::new();
    let assembler = OrderAssembler::new(AssemblerConfig { truncation_acknowledged: true });

    let (order, debug) = assembler
        .build(&params, &secret_params(), VERIFIER_ADDRESS, ProofSource::Backend(&prover))
        .await?;

    assert_true_result!(debug.warnings.issues.is_empty())?;
    assert_true_result!(OrderLifecycle::new(order).status() == LifecycleStatus::Created)
}

/// A failing backend surfaces as an external failure with its cause
#[tokio::test]
#[allow(non_snake_case)]
async fn build__prover_failure() -> Result<()> {
    let prover = ThresholdProver::failing();
    let res = OrderAssembler::default()
        .build(
            &order_params(random_address()),
            &secret_params(),
            VERIFIER_ADDRESS,
            ProofSource::Backend(&prover),
        )
        .await;

    match res {
        Err(AssemblerError::ExternalFailure(msg)) => assert_true_result!(msg.contains("unavailable")),
        other => Err(eyre!("expected an external failure, got {other:?}")),
    }
}

/// Malformed parameters are rejected before any proving
#[tokio::test]
#[allow(non_snake_case)]
async fn build__invalid_params() -> Result<()> {
    let mut params = order_params(random_address());
    params.making_amount = U256::ZERO;
    let proof = mock_proof(&circuit_inputs(&order_params(Address::ZERO), &secret_params()));

    let res = OrderAssembler::default()
        .build(&params, &secret_params(), VERIFIER_ADDRESS, ProofSource::Pregenerated(proof))
        .await;
    assert_true_result!(matches!(res, Err(AssemblerError::OrderParam(_))))
}

/// A proof for a different commitment is rejected
#[tokio::test]
#[allow(non_snake_case)]
async fn build__mismatched_proof() -> Result<()> {
    let params = order_params(random_address());
    let mut other_secret = secret_params();
    other_secret.nonce += U256::from(1u8);
    let proof = mock_proof(&circuit_inputs(&params, &other_secret));

    let res = OrderAssembler::default()
        .build(&params, &secret_params(), VERIFIER_ADDRESS, ProofSource::Pregenerated(proof))
        .await;
    assert_true_result!(matches!(res, Err(AssemblerError::Consistency(_))))
}

/// Thresholds the order's own amounts can never meet are flagged, not fatal
#[tokio::test]
#[allow(non_snake_case)]
async fn build__economic_warnings() -> Result<()> {
    let params = order_params(random_address());
    let mut secret = secret_params();
    secret.secret_price = U256::from(4_000_000_000u64);
    secret.secret_amount = params.making_amount + U256::from(1u8);
    let prover = ThresholdProver::new();

    let (_, debug) = OrderAssembler::default()
        .build(&params, &secret, VERIFIER_ADDRESS, ProofSource::Backend(&prover))
        .await?;

    let w = &debug.warnings;
    assert_issue_result!(w, IssueSeverity::Warning, IssueCategory::Order, "below the secret")?;
    assert_issue_result!(w, IssueSeverity::Warning, IssueCategory::Order, "exceeds the making")?;
    assert_issue_result!(w, IssueSeverity::Warning, IssueCategory::Zk, "do not satisfy")
}

// -------------
// | Lifecycle |
// -------------

/// Corrupting the salt blocks signing and invalidates the order
#[tokio::test]
#[allow(non_snake_case)]
async fn lifecycle__corrupted_salt() -> Result<()> {
    let signer = LocalOrderSigner::random();
    let (mut order, _) = build_reference_order(signer.address()).await?;
    order.order.salt = U256::ZERO;

    let check = validate_consistency(&order);
    assert_issue_result!(check, IssueSeverity::Error, IssueCategory::Zk, "salt inconsistency")?;

    let mut lifecycle = OrderLifecycle::new(order);
    assert_eq_result!(lifecycle.status(), LifecycleStatus::Invalid)?;

    // Signing an invalid order is refused outright
    let controller = LifecycleController::new(signer, domain());
    assert_true_result!(controller.sign(&mut lifecycle).await.is_err())?;
    assert_true_result!(prepare_for_fill(&lifecycle).is_err())
}

/// Mutating a created order's salt before signing leads to `Invalid`
#[tokio::test]
#[allow(non_snake_case)]
async fn lifecycle__mutated_before_sign() -> Result<()> {
    let signer = LocalOrderSigner::random();
    let (order, _) = build_reference_order(signer.address()).await?;
    let mut lifecycle = OrderLifecycle::new(order);
    assert_eq_result!(lifecycle.status(), LifecycleStatus::Created)?;

    lifecycle.order_mut()?.order.salt = U256::ZERO;
    let controller = LifecycleController::new(signer, domain());
    let status = controller.sign(&mut lifecycle).await?;

    assert_eq_result!(status, LifecycleStatus::Invalid)?;
    assert_true_result!(lifecycle.signature().is_none())?;
    match prepare_for_fill(&lifecycle) {
        Err(e) => assert_true_result!(e.to_string().contains("Invalid")),
        Ok(_) => Err(eyre!("invalid order produced fill args")),
    }
}

/// A signer failure is folded into the lifecycle as a network error
#[tokio::test]
#[allow(non_snake_case)]
async fn lifecycle__signer_failure() -> Result<()> {
    let maker = random_address();
    let (order, _) = build_reference_order(maker).await?;
    let mut lifecycle = OrderLifecycle::new(order);

    let controller = LifecycleController::new(FailingSigner::new(maker), domain());
    let status = controller.sign(&mut lifecycle).await?;

    assert_eq_result!(status, LifecycleStatus::Invalid)?;
    assert_issue_result!(
        lifecycle.validation(),
        IssueSeverity::Error,
        IssueCategory::Network,
        "user rejected"
    )
}

/// A signature from someone other than the maker does not reach `ReadyToFill`
#[tokio::test]
#[allow(non_snake_case)]
async fn lifecycle__wrong_signer() -> Result<()> {
    let (order, _) = build_reference_order(random_address()).await?;
    let mut lifecycle = OrderLifecycle::new(order);

    let controller = LifecycleController::new(LocalOrderSigner::random(), domain());
    let status = controller.sign(&mut lifecycle).await?;

    assert_eq_result!(status, LifecycleStatus::Invalid)?;
    assert_true_result!(lifecycle.signature().is_some())
}

/// Status only moves forward, and a terminal order cannot be signed again
#[tokio::test]
#[allow(non_snake_case)]
async fn lifecycle__monotonic() -> Result<()> {
    let (mut lifecycle, signer) = ready_order().await?;
    let controller = LifecycleController::new(signer, domain());

    assert_true_result!(controller.sign(&mut lifecycle).await.is_err())?;
    assert_true_result!(lifecycle.order_mut().is_err())?;
    assert_eq_result!(lifecycle.status(), LifecycleStatus::ReadyToFill)?;
    assert_true_result!(lifecycle.status().is_terminal())
}

/// An order signed elsewhere is resumed into the same state `sign` reaches
#[tokio::test]
#[allow(non_snake_case)]
async fn lifecycle__import_signed() -> Result<()> {
    let (lifecycle, _) = ready_order().await?;
    let signature = lifecycle.signature().cloned().ok_or_else(|| eyre!("missing signature"))?;
    let order = lifecycle.order().clone();

    let imported = OrderLifecycle::import_signed(order.clone(), signature.clone(), &domain());
    assert_eq_result!(imported.status(), LifecycleStatus::ReadyToFill)?;
    let imported_args = prepare_for_fill(&imported)?;
    let signed_args = prepare_for_fill(&lifecycle)?;
    assert_eq_result!(imported_args, signed_args)?;

    // The same signature does not cover a different deployment
    let imported = OrderLifecycle::import_signed(order, signature, &domain_for(1));
    assert_eq_result!(imported.status(), LifecycleStatus::Invalid)?;
    assert_issue_result!(
        imported.validation(),
        IssueSeverity::Error,
        IssueCategory::Order,
        "expected maker"
    )
}
