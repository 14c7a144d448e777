//! Conversions between workspace order types and their contract analogues

use alloy_primitives::Bytes;
use common::types::Order;

use crate::abi;

/// Convert an order to the struct the protocol signs and fills
///
/// The extension is not part of the signed struct and is dropped
pub fn to_contract_order(order: &Order) -> abi::Order {
    abi::Order {
        salt: order.salt,
        maker: order.maker,
        receiver: order.receiver,
        makerAsset: order.maker_asset,
        takerAsset: order.taker_asset,
        makingAmount: order.making_amount,
        takingAmount: order.taking_amount,
        makerTraits: order.maker_traits,
    }
}

/// Convert a contract order back, reattaching its extension
pub fn from_contract_order(order: &abi::Order, extension: Bytes) -> Order {
    Order {
        salt: order.salt,
        maker: order.maker,
        receiver: order.receiver,
        maker_asset: order.makerAsset,
        taker_asset: order.takerAsset,
        making_amount: order.makingAmount,
        taking_amount: order.takingAmount,
        maker_traits: order.makerTraits,
        extension,
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;

    #[test]
    fn test_order_conversion() {
        let order = Order {
            salt: U256::from(1u8),
            maker: Address::repeat_byte(1),
            receiver: Address::ZERO,
            maker_asset: Address::repeat_byte(2),
            taker_asset: Address::repeat_byte(3),
            making_amount: U256::from(10u8),
            taking_amount: U256::from(20u8),
            maker_traits: U256::from(1u8) << 249,
            extension: Bytes::from(vec![1, 2, 3]),
        };

        let contract = to_contract_order(&order);
        assert_eq!(contract.makerAsset, order.maker_asset);
        assert_eq!(from_contract_order(&contract, order.extension.clone()), order);
    }
}
