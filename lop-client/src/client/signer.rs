//! An order signer holding a local private key

use std::str::FromStr;

use alloy::signers::{SignerSync, local::PrivateKeySigner};
use alloy_primitives::Address;
use async_trait::async_trait;
use common::types::OrderSignature;
use tracing::instrument;

use crate::{eip712::OrderTypedData, errors::SignerError, traits::OrderSigner};

/// Signs orders with an in-process key
#[derive(Clone, Debug)]
pub struct LocalOrderSigner {
    /// The signing key
    key: PrivateKeySigner,
}

impl LocalOrderSigner {
    /// Constructor
    pub fn new(key: PrivateKeySigner) -> Self {
        Self { key }
    }

    /// A signer over a freshly sampled key
    pub fn random() -> Self {
        Self::new(PrivateKeySigner::random())
    }

    /// Parse a hex encoded private key
    pub fn from_hex(key: &str) -> Result<Self, SignerError> {
        PrivateKeySigner::from_str(key).map(Self::new).map_err(SignerError::signing)
    }
}

#[async_trait]
impl OrderSigner for LocalOrderSigner {
    fn address(&self) -> Address {
        self.key.address()
    }

    #[instrument(skip_all, err, fields(signer = %self.key.address()))]
    async fn sign_order(&self, typed_data: &OrderTypedData) -> Result<OrderSignature, SignerError> {
        let digest = typed_data.signing_hash();
        let sig = self.key.sign_hash_sync(&digest).map_err(SignerError::signing)?;
        Ok(OrderSignature::from_parts(sig.r(), sig.s(), sig.v()))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use common::types::Order;
    use constants::SECP256K1_ORDER;

    use super::*;
    use crate::eip712::{OrderDomain, recover_signer};

    #[tokio::test]
    async fn test_signature_recovers_to_signer() {
        let signer = LocalOrderSigner::random();
        let order = Order {
            maker: signer.address(),
            making_amount: U256::from(5u8),
            taking_amount: U256::from(7u8),
            ..Default::default()
        };
        let typed = OrderTypedData::new(OrderDomain::new(1, Address::repeat_byte(9)), &order);

        let sig = signer.sign_order(&typed).await.unwrap();
        let recovered = recover_signer(typed.signing_hash(), &sig).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[tokio::test]
    async fn test_high_s_wallet_signature_recovers() {
        let signer = LocalOrderSigner::random();
        let order = Order { maker: signer.address(), ..Default::default() };
        let typed = OrderTypedData::new(OrderDomain::new(1, Address::repeat_byte(9)), &order);
        let sig = signer.sign_order(&typed).await.unwrap();

        // The malleated `(r, n - s, !v)` form some wallets emit
        let mut raw = Vec::with_capacity(65);
        raw.extend_from_slice(sig.r.as_slice());
        raw.extend_from_slice(&(SECP256K1_ORDER - sig.s()).to_be_bytes::<32>());
        raw.push(27 + u8::from(!sig.y_parity()));

        let parsed = OrderSignature::from_raw(&raw).unwrap();
        assert_eq!(parsed.vs, sig.vs);
        assert_eq!(recover_signer(typed.signing_hash(), &parsed).unwrap(), signer.address());
    }

    #[test]
    fn test_from_hex() {
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let signer = LocalOrderSigner::from_hex(key).unwrap();
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(signer.address(), expected);
        assert!(LocalOrderSigner::from_hex("0x1234").is_err());
    }
}
