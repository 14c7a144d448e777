//! Shared setup for the order lifecycle integration tests

#![allow(dead_code)]

use alloy_primitives::Address;
use common::types::ZkEnabledOrder;
use eyre::Result;
use lop_client::{client::LocalOrderSigner, eip712::OrderDomain, traits::OrderSigner};
use order_lifecycle::{
    AssemblerConfig, BuildDebugInfo, LifecycleController, LifecycleStatus, OrderAssembler,
    OrderLifecycle, ProofSource,
};
use test_helpers::fixtures::{circuit_inputs, mock_proof, order_params, secret_params};

/// The protocol contract orders are signed for
pub const PROTOCOL_ADDRESS: Address = Address::repeat_byte(0x11);
/// The verifier contract predicates call
pub const VERIFIER_ADDRESS: Address = Address::repeat_byte(0x22);
/// The chain the protocol is deployed on
pub const CHAIN_ID: u64 = 31337;

/// The signing domain of the test protocol deployment
pub fn domain() -> OrderDomain {
    domain_for(CHAIN_ID)
}

/// The signing domain of the test protocol deployed on another chain
pub fn domain_for(chain_id: u64) -> OrderDomain {
    OrderDomain::new(chain_id, PROTOCOL_ADDRESS)
}

/// Build the reference order for the given maker from a pre-generated proof
pub async fn build_reference_order(maker: Address) -> Result<(ZkEnabledOrder, BuildDebugInfo)> {
    let params = order_params(maker);
    let secret = secret_params();
    let proof = mock_proof(&circuit_inputs(&params, &secret));

    let assembler = OrderAssembler::new(AssemblerConfig { truncation_acknowledged: true });
    let res = assembler
        .build(&params, &secret, VERIFIER_ADDRESS, ProofSource::Pregenerated(proof))
        .await?;
    Ok(res)
}

/// Build and sign the reference order, returning the lifecycle and signer
pub async fn ready_order() -> Result<(OrderLifecycle, LocalOrderSigner)> {
    let signer = LocalOrderSigner::random();
    let (order, _) = build_reference_order(signer.address()).await?;

    let mut lifecycle = OrderLifecycle::new(order);
    let controller = LifecycleController::new(signer.clone(), domain());
    let status = controller.sign(&mut lifecycle).await?;
    eyre::ensure!(status == LifecycleStatus::ReadyToFill, "order not ready: {status}");

    Ok((lifecycle, signer))
}
