//! A chain reader backed by an RPC provider

use alloy::{network::TransactionBuilder, providers::Provider, rpc::types::TransactionRequest};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use tracing::instrument;

use super::{ChainClientConfig, LopProvider};
use crate::{
    abi::IERC20,
    errors::ChainError,
    traits::{CallRequest, ChainReader},
};

/// Reads balances and simulates calls over RPC
#[derive(Clone)]
pub struct ProviderChainReader {
    /// The underlying provider
    provider: LopProvider,
}

impl ProviderChainReader {
    /// Constructor
    pub fn new(provider: LopProvider) -> Self {
        Self { provider }
    }

    /// Connect to the endpoint in the given configuration
    pub fn from_config(config: &ChainClientConfig) -> Result<Self, ChainError> {
        config.get_provider().map(Self::new)
    }

    /// Get a reference to the provider
    pub fn provider(&self) -> &LopProvider {
        &self.provider
    }
}

#[async_trait]
impl ChainReader for ProviderChainReader {
    #[instrument(skip_all, err, fields(token = %token, owner = %owner))]
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        IERC20::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(ChainError::contract_interaction)
    }

    #[instrument(skip_all, err, fields(to = %call.to))]
    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ChainError> {
        let tx = TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_input(call.data.clone())
            .with_value(call.value);

        self.provider.estimate_gas(tx).await.map_err(ChainError::gas_estimation)
    }
}
