//! Limit orders and their maker-side zero-knowledge metadata

use alloy_primitives::{Address, Bytes, U256};
use proof_types::CircuitInputs;
use serde::{Deserialize, Serialize};

use super::{
    extension::{ExtensionData, PackedSaltData},
    secret::SecretParameters,
};

/// A limit order in the host protocol's layout
///
/// `extension` is not part of the signed struct; the protocol binds it to the
/// order through the low 160 bits of the salt
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The salt, packing the truncated commitment and the extension hash
    pub salt: U256,
    /// The maker's address
    pub maker: Address,
    /// The recipient of the taker asset, zero meaning the maker
    pub receiver: Address,
    /// The asset the maker sells
    pub maker_asset: Address,
    /// The asset the maker buys
    pub taker_asset: Address,
    /// The amount of the maker asset on offer
    pub making_amount: U256,
    /// The amount of the taker asset requested
    pub taking_amount: U256,
    /// The maker's packed flags and limits
    pub maker_traits: U256,
    /// The extension carrying the predicate
    pub extension: Bytes,
}

impl Order {
    /// The address that receives the taker asset
    pub fn effective_receiver(&self) -> Address {
        if self.receiver == Address::ZERO { self.maker } else { self.receiver }
    }
}

/// The public order parameters a maker supplies to the assembler
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParams {
    /// The maker's address
    pub maker: Address,
    /// The recipient of the taker asset
    #[serde(default)]
    pub receiver: Address,
    /// The asset the maker sells
    pub maker_asset: Address,
    /// The asset the maker buys
    pub taker_asset: Address,
    /// The amount of the maker asset on offer
    pub making_amount: U256,
    /// The amount of the taker asset requested
    pub taking_amount: U256,
    /// Initial maker traits; the extension flag is set by the assembler
    #[serde(default)]
    pub maker_traits: U256,
    /// A caller-supplied salt, always replaced by the packed salt
    #[serde(default)]
    pub salt: Option<U256>,
}

/// The maker's bookkeeping for a zero-knowledge order
///
/// Never sent on-chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkMetadata {
    /// The full commitment to the secret parameters
    pub commitment: U256,
    /// The nonce bound into the commitment
    pub nonce: U256,
    /// The secret thresholds
    pub secret_params: SecretParameters,
    /// The composed predicate and extension
    pub extension_data: ExtensionData,
    /// The packed salt and its components
    pub salt_data: PackedSaltData,
    /// The inputs the proof was generated from
    pub proof_inputs: CircuitInputs,
}

/// An order together with its zero-knowledge metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkEnabledOrder {
    /// The on-chain order
    pub order: Order,
    /// The maker-side metadata
    pub zk_metadata: ZkMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_receiver() {
        let maker = Address::repeat_byte(1);
        let mut order = Order { maker, ..Default::default() };
        assert_eq!(order.effective_receiver(), maker);

        order.receiver = Address::repeat_byte(2);
        assert_eq!(order.effective_receiver(), Address::repeat_byte(2));
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = Order { making_amount: U256::from(5u8), ..Default::default() };
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("makingAmount").is_some());
        assert!(json.get("makerTraits").is_some());
    }
}
