//! EIP-712 typed data for order signatures

use std::borrow::Cow;

use alloy_primitives::{Address, B256, Signature, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use common::types::{Order, OrderSignature};
use constants::{DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{abi, conversion::to_contract_order, errors::SignerError};

/// The signing domain of a deployed protocol contract
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDomain {
    /// The domain name
    pub name: String,
    /// The domain version
    pub version: String,
    /// The chain the protocol is deployed on
    pub chain_id: u64,
    /// The protocol contract
    pub verifying_contract: Address,
}

impl OrderDomain {
    /// A domain with the protocol's default name and version
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: DEFAULT_DOMAIN_NAME.to_string(),
            version: DEFAULT_DOMAIN_VERSION.to_string(),
            chain_id,
            verifying_contract,
        }
    }

    /// Override the domain name and version
    pub fn with_name_and_version(mut self, name: &str, version: &str) -> Self {
        self.name = name.to_string();
        self.version = version.to_string();
        self
    }

    /// Convert to the sol-types domain
    pub fn to_eip712_domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None, // salt
        )
    }
}

/// An order together with the domain it is signed under
#[derive(Clone, Debug)]
pub struct OrderTypedData {
    /// The signing domain
    pub domain: OrderDomain,
    /// The signed struct
    pub order: abi::Order,
}

impl OrderTypedData {
    /// Constructor
    pub fn new(domain: OrderDomain, order: &Order) -> Self {
        Self { domain, order: to_contract_order(order) }
    }

    /// The EIP-712 digest a signer signs
    pub fn signing_hash(&self) -> B256 {
        self.order.eip712_signing_hash(&self.domain.to_eip712_domain())
    }

    /// Render as an `eth_signTypedData_v4` payload for external wallets
    pub fn to_json(&self) -> serde_json::Value {
        let o = &self.order;
        json!({
            "types": {
                "EIP712Domain": [
                    { "name": "name", "type": "string" },
                    { "name": "version", "type": "string" },
                    { "name": "chainId", "type": "uint256" },
                    { "name": "verifyingContract", "type": "address" },
                ],
                "Order": [
                    { "name": "salt", "type": "uint256" },
                    { "name": "maker", "type": "address" },
                    { "name": "receiver", "type": "address" },
                    { "name": "makerAsset", "type": "address" },
                    { "name": "takerAsset", "type": "address" },
                    { "name": "makingAmount", "type": "uint256" },
                    { "name": "takingAmount", "type": "uint256" },
                    { "name": "makerTraits", "type": "uint256" },
                ],
            },
            "primaryType": "Order",
            "domain": {
                "name": self.domain.name,
                "version": self.domain.version,
                "chainId": self.domain.chain_id,
                "verifyingContract": self.domain.verifying_contract.to_string(),
            },
            "message": {
                "salt": o.salt.to_string(),
                "maker": o.maker.to_string(),
                "receiver": o.receiver.to_string(),
                "makerAsset": o.makerAsset.to_string(),
                "takerAsset": o.takerAsset.to_string(),
                "makingAmount": o.makingAmount.to_string(),
                "takingAmount": o.takingAmount.to_string(),
                "makerTraits": o.makerTraits.to_string(),
            },
        })
    }
}

/// Recover the address that produced a signature over a digest
pub fn recover_signer(hash: B256, signature: &OrderSignature) -> Result<Address, SignerError> {
    let r = U256::from_be_bytes(signature.r.0);
    let sig = Signature::new(r, signature.s(), signature.y_parity());
    sig.recover_address_from_prehash(&hash).map_err(SignerError::recovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_hash() {
        let encoded = abi::Order::eip712_encode_type();
        assert_eq!(
            encoded,
            "Order(uint256 salt,address maker,address receiver,address makerAsset,address \
             takerAsset,uint256 makingAmount,uint256 takingAmount,uint256 makerTraits)"
        );
    }

    #[test]
    fn test_domain_binds_hash() {
        let order = Order { making_amount: U256::from(1u8), ..Default::default() };
        let a = OrderTypedData::new(OrderDomain::new(1, Address::repeat_byte(1)), &order);
        let b = OrderTypedData::new(OrderDomain::new(137, Address::repeat_byte(1)), &order);
        let c = OrderTypedData::new(
            OrderDomain::new(1, Address::repeat_byte(1)).with_name_and_version("x", "1"),
            &order,
        );

        assert_ne!(a.signing_hash(), b.signing_hash());
        assert_ne!(a.signing_hash(), c.signing_hash());
        assert_eq!(a.to_json()["domain"]["version"], "6");
    }
}
