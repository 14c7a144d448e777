//! Alloy-backed implementations of the signer and chain reader capabilities

use alloy::{
    providers::{DynProvider, ProviderBuilder},
    transports::http::reqwest::Url,
};
use util::err_str;

use crate::errors::ChainError;

mod reader;
mod signer;

pub use reader::ProviderChainReader;
pub use signer::LocalOrderSigner;

/// A type alias for the RPC provider used for read-only chain queries
pub type LopProvider = DynProvider;

/// The configuration of a chain connection
#[derive(Clone, Debug)]
pub struct ChainClientConfig {
    /// HTTP-addressable RPC endpoint for the client to connect to
    pub rpc_url: String,
}

impl ChainClientConfig {
    /// Constructs an RPC provider from the configuration
    pub fn get_provider(&self) -> Result<LopProvider, ChainError> {
        let url = Url::parse(&self.rpc_url).map_err(err_str!(ChainError::RpcClientInitialization))?;
        let provider = ProviderBuilder::new().connect_http(url);
        Ok(DynProvider::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_rpc_url() {
        let config = ChainClientConfig { rpc_url: "not a url".to_string() };
        assert!(matches!(config.get_provider(), Err(ChainError::RpcClientInitialization(_))));
    }
}
