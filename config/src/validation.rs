//! Validation of a parsed config

use alloy_primitives::Address;

use crate::ToolConfig;

/// Check the config for values that parse but cannot work
pub(crate) fn validate_config(config: &ToolConfig) -> Result<(), String> {
    if config.protocol_address == Address::ZERO {
        return Err("protocol address must be non-zero".to_string());
    }
    if config.verifier_address == Some(Address::ZERO) {
        return Err("verifier address must be non-zero".to_string());
    }
    if config.query_timeout.is_zero() {
        return Err("query timeout must be positive".to_string());
    }
    if config.domain_name.is_empty() || config.domain_version.is_empty() {
        return Err("EIP-712 domain name and version must be set".to_string());
    }

    Ok(())
}
