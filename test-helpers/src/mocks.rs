//! Mock implementations of the capabilities the order tooling consumes

use std::{collections::HashMap, time::Duration};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use common::types::{OrderSignature, SecretParameters};
use constants::PRICE_SCALE;
use alloy_sol_types::SolCall;
use lop_client::{
    abi::IOrderMixin::fillOrderArgsCall,
    eip712::{OrderDomain, OrderTypedData, recover_signer},
    errors::{ChainError, SignerError},
    extension::get_predicate,
    order_traits::{MakerTraits, TakerTraits},
    predicate::decode_zk_predicate,
    traits::{CallRequest, ChainReader, OrderSigner},
};
use proof_types::{
    CircuitInputs, ProverError, ProvingBackend, ZkProof, encoding::decode_verifier_calldata,
};
use tracing::debug;

use crate::fixtures::{mock_proof, satisfies_thresholds};

// ----------
// | Prover |
// ----------

/// A proving backend that evaluates the threshold relation in the clear
///
/// The proof's validity flag is set exactly as the circuit would set it
#[derive(Clone, Copy, Debug, Default)]
pub struct ThresholdProver {
    /// Fail every proving request
    fail: bool,
}

impl ThresholdProver {
    /// Constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every request fails
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl ProvingBackend for ThresholdProver {
    async fn prove(&self, inputs: &CircuitInputs) -> Result<ZkProof, ProverError> {
        if self.fail {
            return Err(ProverError::proving("prover unavailable"));
        }

        let secret = SecretParameters::new(inputs.secret_price, inputs.secret_amount, inputs.nonce);
        let commit = secret.commitment().map_err(ProverError::proving)?;
        if commit != inputs.commit {
            return Err(ProverError::proving("witness does not open the commitment"));
        }

        debug!(valid = satisfies_thresholds(inputs), "mock proof generated");
        Ok(mock_proof(inputs))
    }

    async fn verify(&self, proof: &ZkProof) -> Result<bool, ProverError> {
        Ok(proof.public_signals.is_valid())
    }
}

// ------------
// | Verifier |
// ------------

/// Stands in for the predicate verifier contract at fill time
///
/// The real verifier checks the proof against the fill; this mock holds the
/// maker's secret so that it can decide the same relation in the clear
#[derive(Clone, Copy, Debug)]
pub struct MockFillVerifier {
    /// The maker's secret parameters
    secret: SecretParameters,
}

impl MockFillVerifier {
    /// Constructor
    pub fn new(secret: SecretParameters) -> Self {
        Self { secret }
    }

    /// Evaluate an order's predicate against a fill of `fill_amount` maker
    /// tokens for `fill_taking_amount` taker tokens
    ///
    /// Returns whether the protocol would let the fill through
    pub fn evaluate_fill(
        &self,
        extension: &[u8],
        fill_amount: U256,
        fill_taking_amount: U256,
    ) -> eyre::Result<bool> {
        let proof = extract_proof(extension)?;
        let signals = &proof.public_signals;
        if signals.commitment() != self.secret.commitment()? || !signals.is_valid() {
            return Ok(false);
        }
        if fill_amount.is_zero() {
            return Ok(false);
        }

        let inputs = CircuitInputs {
            secret_price: self.secret.secret_price,
            secret_amount: self.secret.secret_amount,
            nonce: self.secret.nonce,
            commit: signals.commitment(),
            offered_price: fill_taking_amount * PRICE_SCALE / fill_amount,
            offered_amount: fill_amount,
        };
        Ok(satisfies_thresholds(&inputs))
    }
}

/// Pull the verifier proof out of a `gt(0, arbitraryStaticCall(..))` predicate
pub fn extract_proof(extension: &[u8]) -> eyre::Result<ZkProof> {
    let predicate = get_predicate(extension)?;
    let (_, calldata) = decode_zk_predicate(&predicate)?;
    Ok(decode_verifier_calldata(&calldata)?)
}

// ----------
// | Signer |
// ----------

/// A signer that always fails, as when a user rejects the request
#[derive(Clone, Copy, Debug)]
pub struct FailingSigner {
    /// The address the signer claims
    address: Address,
}

impl FailingSigner {
    /// Constructor
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl OrderSigner for FailingSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_order(&self, _: &OrderTypedData) -> Result<OrderSignature, SignerError> {
        Err(SignerError::signing("user rejected the request"))
    }
}

// ----------------
// | Chain Reader |
// ----------------

/// The gas of a call with empty calldata
const MOCK_BASE_GAS: u64 = 100_000;
/// The gas charged per byte of calldata
const MOCK_GAS_PER_BYTE: u64 = 16;
/// The gas charged for running a fill's extension predicate
const MOCK_PREDICATE_GAS: u64 = 230_000;

/// An in-memory chain reader with configurable failures and latency
///
/// With a signing domain set, gas estimates of fills are checked the way the
/// protocol checks them: the signature must recover to the maker and an order
/// flagged as extended must carry its extension
#[derive(Clone, Debug, Default)]
pub struct MockChainReader {
    /// The domain fill signatures are checked under
    domain: Option<OrderDomain>,
    /// Token balances keyed by `(token, owner)`
    balances: HashMap<(Address, Address), U256>,
    /// Fail every balance query
    fail_balances: bool,
    /// Fail every gas estimate
    fail_gas: bool,
    /// The latency added to every query
    delay: Option<Duration>,
}

impl MockChainReader {
    /// An empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a balance
    pub fn with_balance(mut self, token: Address, owner: Address, balance: U256) -> Self {
        self.balances.insert((token, owner), balance);
        self
    }

    /// Check fill signatures under the given domain
    pub fn with_order_domain(mut self, domain: OrderDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Fail every balance query
    pub fn with_failing_balances(mut self) -> Self {
        self.fail_balances = true;
        self
    }

    /// Fail every gas estimate
    pub fn with_failing_gas(mut self) -> Self {
        self.fail_gas = true;
        self
    }

    /// Delay every query
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Wait out the configured latency
    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        self.wait().await;
        if self.fail_balances {
            return Err(ChainError::contract_interaction("rpc connection refused"));
        }

        Ok(self.balances.get(&(token, owner)).copied().unwrap_or_default())
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ChainError> {
        self.wait().await;
        if self.fail_gas {
            return Err(ChainError::gas_estimation("execution reverted"));
        }

        let calldata_gas = MOCK_BASE_GAS + MOCK_GAS_PER_BYTE * call.data.len() as u64;
        let Some(domain) = self.domain.as_ref() else {
            return Ok(calldata_gas);
        };

        let fill = fillOrderArgsCall::abi_decode(&call.data)
            .map_err(|e| ChainError::gas_estimation(format!("execution reverted: {e}")))?;
        check_fill_signature(&fill, domain)?;

        let extension_len = TakerTraits(fill.takerTraits).extension_length();
        if MakerTraits::from(fill.order.makerTraits).has_extension() && extension_len == 0 {
            return Err(ChainError::gas_estimation("execution reverted: MissingOrderExtension"));
        }

        let predicate_gas = if extension_len > 0 { MOCK_PREDICATE_GAS } else { 0 };
        Ok(calldata_gas + predicate_gas)
    }
}

/// Check that a fill's signature recovers to the order's maker
fn check_fill_signature(
    fill: &fillOrderArgsCall,
    domain: &OrderDomain,
) -> Result<(), ChainError> {
    let typed = OrderTypedData { domain: domain.clone(), order: fill.order.clone() };
    let signature = OrderSignature { r: fill.r, vs: fill.vs, raw: String::new() };

    match recover_signer(typed.signing_hash(), &signature) {
        Ok(signer) if signer == fill.order.maker => Ok(()),
        _ => Err(ChainError::gas_estimation("execution reverted: BadSignature")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{circuit_inputs, order_params, random_address, secret_params};

    #[tokio::test]
    async fn test_prover_rejects_bad_opening() {
        let mut inputs = circuit_inputs(&order_params(random_address()), &secret_params());
        assert!(ThresholdProver::new().prove(&inputs).await.is_ok());

        inputs.commit += U256::from(1u8);
        assert!(ThresholdProver::new().prove(&inputs).await.is_err());
    }

    #[tokio::test]
    async fn test_reader_balances() {
        let (token, owner) = (random_address(), random_address());
        let reader = MockChainReader::new().with_balance(token, owner, U256::from(5u8));

        assert_eq!(reader.balance_of(token, owner).await.unwrap(), U256::from(5u8));
        assert_eq!(reader.balance_of(owner, token).await.unwrap(), U256::ZERO);
        assert!(reader.with_failing_balances().balance_of(token, owner).await.is_err());
    }
}
