//! Outputs of the predicate composer and salt codec

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

/// A composed predicate and the extension that carries it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionData {
    /// The full extension attached to the order
    pub extension_bytes: Bytes,
    /// `keccak256(extension_bytes) mod 2^160`
    pub extension_hash: U256,
    /// The predicate calldata the host protocol static-calls
    pub predicate_call: Bytes,
    /// An advisory estimate of the gas spent evaluating the predicate
    pub gas_estimate: u64,
    /// Non-fatal issues found while composing
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A packed salt together with the values it was packed from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedSaltData {
    /// The packed salt, `(truncated_commitment << 160) | extension_hash`
    pub salt: U256,
    /// The full commitment, held separately since the salt is lossy
    pub commitment: U256,
    /// The low 96 bits of the commitment
    pub truncated_commitment: U256,
    /// The extension hash occupying the low 160 bits
    pub extension_hash: U256,
}
