//! The tool's command line options and the config parsed from them

use std::time::Duration;

use alloy_primitives::Address;
use clap::Args;
use lop_client::{client::ChainClientConfig, eip712::OrderDomain};
use util::logging::LevelFilter;

// -------
// | CLI |
// -------

/// Options shared by every subcommand
#[derive(Clone, Debug, Args)]
#[rustfmt::skip]
pub struct ToolArgs {
    // ---------------
    // | Config File |
    // ---------------
    /// A TOML config file to read options from, command line flags take precedence
    #[clap(long, value_parser, global = true)]
    pub config_file: Option<String>,

    // ------------------
    // | Chain + Domain |
    // ------------------
    /// The chain the protocol is deployed on
    #[clap(long, value_parser, default_value = "1", global = true)]
    pub chain_id: u64,
    /// The limit order protocol contract, used as the EIP-712 verifying contract
    #[clap(long, value_parser, default_value = "0x111111125421cA6dc452d289314280a0f8842A65", global = true)]
    pub protocol_address: String,
    /// The predicate verifier contract the order's proof check calls
    #[clap(long, value_parser, global = true)]
    pub verifier_address: Option<String>,
    /// The EIP-712 domain name
    #[clap(long, value_parser, default_value = constants::DEFAULT_DOMAIN_NAME, global = true)]
    pub domain_name: String,
    /// The EIP-712 domain version
    #[clap(long, value_parser, default_value = constants::DEFAULT_DOMAIN_VERSION, global = true)]
    pub domain_version: String,

    // -----------------
    // | Chain Queries |
    // -----------------
    /// The HTTP RPC endpoint used for balance and gas queries
    #[clap(long, value_parser, global = true, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// The bound on each chain query, in milliseconds
    #[clap(long, value_parser, default_value_t = constants::DEFAULT_CHAIN_QUERY_TIMEOUT_MS, global = true)]
    pub query_timeout_ms: u64,

    // ----------
    // | Maker |
    // ----------
    /// The hex encoded private key orders are signed with
    #[clap(long, value_parser, global = true, env = "MAKER_PRIVATE_KEY", hide_env_values = true)]
    pub maker_key: Option<String>,
    /// Acknowledge that salts bind only the low 96 bits of the commitment
    #[clap(long, value_parser, global = true)]
    pub acknowledge_truncation: bool,

    // -----------
    // | Logging |
    // -----------
    /// The log level: one of off, error, warn, info, debug, trace
    #[clap(long, value_parser, default_value = "info", global = true)]
    pub log_level: String,
    /// Emit logs as newline delimited JSON
    #[clap(long, value_parser, global = true)]
    pub json_logs: bool,
}

// ----------
// | Config |
// ----------

/// The validated tool config
#[derive(Clone, Debug)]
pub struct ToolConfig {
    /// The chain the protocol is deployed on
    pub chain_id: u64,
    /// The limit order protocol contract
    pub protocol_address: Address,
    /// The predicate verifier contract
    pub verifier_address: Option<Address>,
    /// The EIP-712 domain name
    pub domain_name: String,
    /// The EIP-712 domain version
    pub domain_version: String,
    /// The RPC endpoint for chain queries
    pub rpc_url: Option<String>,
    /// The bound on each chain query
    pub query_timeout: Duration,
    /// The maker's signing key
    pub maker_key: Option<String>,
    /// Whether the commitment truncation is acknowledged
    pub truncation_acknowledged: bool,
    /// The log level
    pub log_level: LevelFilter,
    /// Whether logs are emitted as JSON
    pub json_logs: bool,
}

impl ToolConfig {
    /// The domain orders are signed under
    pub fn domain(&self) -> OrderDomain {
        OrderDomain::new(self.chain_id, self.protocol_address)
            .with_name_and_version(&self.domain_name, &self.domain_version)
    }

    /// The chain client config, if an RPC endpoint is configured
    pub fn chain_client_config(&self) -> Option<ChainClientConfig> {
        self.rpc_url.clone().map(|rpc_url| ChainClientConfig { rpc_url })
    }
}
