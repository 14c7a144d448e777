//! Capabilities the order tooling consumes from its environment
//!
//! Signing and chain access sit behind narrow traits so that wallets, RPC
//! providers, and test doubles can be swapped freely

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use common::types::OrderSignature;

use crate::{
    eip712::OrderTypedData,
    errors::{ChainError, SignerError},
};

/// Produces EIP-712 signatures over orders
#[async_trait]
pub trait OrderSigner: Send + Sync {
    /// The address signatures recover to
    fn address(&self) -> Address;

    /// Sign an order under its domain
    ///
    /// May wait on user interaction; callers cancel by dropping the future
    async fn sign_order(&self, typed_data: &OrderTypedData) -> Result<OrderSignature, SignerError>;
}

/// A call to simulate against the chain
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// The sender of the call
    pub from: Address,
    /// The contract called
    pub to: Address,
    /// The calldata
    pub data: Bytes,
    /// The value attached to the call
    pub value: U256,
}

/// Read-only access to chain state
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// The balance of `owner` in `token`
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    /// Estimate the gas used by a call
    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ChainError>;
}
