//! Parsing logic for the tool config

use std::{str::FromStr, time::Duration};

use alloy_primitives::Address;
use util::logging::parse_log_level;

use crate::{ToolArgs, ToolConfig, validation::validate_config};

pub mod config_file;

/// Parse the config from a set of command line arguments
///
/// The arguments are expected to already include any config file entries,
/// see `with_config_file_args`
pub fn parse_config_from_args(args: ToolArgs) -> Result<ToolConfig, String> {
    let protocol_address = parse_address("protocol address", &args.protocol_address)?;
    let verifier_address = args
        .verifier_address
        .as_deref()
        .map(|a| parse_address("verifier address", a))
        .transpose()?;
    let log_level = parse_log_level(&args.log_level)?;

    let config = ToolConfig {
        chain_id: args.chain_id,
        protocol_address,
        verifier_address,
        domain_name: args.domain_name,
        domain_version: args.domain_version,
        rpc_url: args.rpc_url,
        query_timeout: Duration::from_millis(args.query_timeout_ms),
        maker_key: args.maker_key,
        truncation_acknowledged: args.acknowledge_truncation,
        log_level,
        json_logs: args.json_logs,
    };

    validate_config(&config)?;
    Ok(config)
}

/// Parse a hex encoded address
fn parse_address(name: &str, s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|e| format!("invalid {name} `{s}`: {e}"))
}
