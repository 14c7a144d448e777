//! Possible errors thrown by the limit order protocol client

use alloy_primitives::U256;

/// The error type returned by the salt codec
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaltError {
    /// The extension hash does not fit in the low 160 bits of the salt
    #[error("extension hash {0:#x} exceeds 160 bits")]
    ExtensionHashTooLarge(U256),
}

/// The error type returned by the predicate composer
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    /// A join was requested over zero predicates
    #[error("cannot join an empty list of predicates")]
    EmptyJoin,
    /// The proof calldata is not valid hex
    #[error("invalid proof hex: {0}")]
    InvalidProofHex(String),
    /// A predicate blob is too large to be addressed by the extension offsets
    #[error("predicate of {0} bytes exceeds the extension field limit")]
    TooLarge(usize),
    /// The extension envelope is malformed
    #[error("malformed extension: {0}")]
    MalformedExtension(String),
    /// A predicate does not have the expected shape
    #[error("malformed predicate: {0}")]
    MalformedPredicate(String),
}

impl PredicateError {
    /// Create a new invalid proof hex error
    #[allow(clippy::needless_pass_by_value)]
    pub fn invalid_proof_hex<T: ToString>(msg: T) -> Self {
        Self::InvalidProofHex(msg.to_string())
    }

    /// Create a new malformed extension error
    #[allow(clippy::needless_pass_by_value)]
    pub fn malformed_extension<T: ToString>(msg: T) -> Self {
        Self::MalformedExtension(msg.to_string())
    }

    /// Create a new malformed predicate error
    #[allow(clippy::needless_pass_by_value)]
    pub fn malformed_predicate<T: ToString>(msg: T) -> Self {
        Self::MalformedPredicate(msg.to_string())
    }
}

/// The error type returned by an order signer
#[derive(Clone, Debug, thiserror::Error)]
pub enum SignerError {
    /// The signer failed to produce a signature
    #[error("error signing order: {0}")]
    Signing(String),
    /// The signature could not be recovered to an address
    #[error("error recovering signer: {0}")]
    Recovery(String),
}

impl SignerError {
    /// Create a new signing error
    #[allow(clippy::needless_pass_by_value)]
    pub fn signing<T: ToString>(msg: T) -> Self {
        Self::Signing(msg.to_string())
    }

    /// Create a new recovery error
    #[allow(clippy::needless_pass_by_value)]
    pub fn recovery<T: ToString>(msg: T) -> Self {
        Self::Recovery(msg.to_string())
    }
}

/// The error type returned by a chain reader
#[derive(Clone, Debug, thiserror::Error)]
pub enum ChainError {
    /// Error setting up the RPC client
    #[error("error initializing rpc client: {0}")]
    RpcClientInitialization(String),
    /// Error calling a contract
    #[error("error interacting with contract: {0}")]
    ContractInteraction(String),
    /// Error estimating gas for a call
    #[error("error estimating gas: {0}")]
    GasEstimation(String),
}

impl ChainError {
    /// Create a new contract interaction error
    #[allow(clippy::needless_pass_by_value)]
    pub fn contract_interaction<T: ToString>(msg: T) -> Self {
        Self::ContractInteraction(msg.to_string())
    }

    /// Create a new gas estimation error
    #[allow(clippy::needless_pass_by_value)]
    pub fn gas_estimation<T: ToString>(msg: T) -> Self {
        Self::GasEstimation(msg.to_string())
    }
}
