//! Errors raised while assembling, signing, and evaluating orders

use common::types::Issue;
use lop_client::errors::{PredicateError, SaltError};
use proof_types::ProofError;
use zk_crypto::CryptoError;

use crate::lifecycle::LifecycleStatus;

/// The error type returned by the order assembler
#[derive(Clone, Debug, thiserror::Error)]
pub enum AssemblerError {
    /// An order parameter is malformed
    #[error("invalid order parameter: {0}")]
    OrderParam(String),
    /// The secret parameters cannot be committed to
    #[error("error computing commitment: {0}")]
    Commitment(String),
    /// The proof is structurally malformed
    #[error("malformed proof: {0}")]
    Proof(String),
    /// The predicate could not be composed
    #[error("error composing predicate: {0}")]
    Predicate(String),
    /// The salt could not be packed
    #[error("error packing salt: {0}")]
    Salt(String),
    /// The proof, commitment, salt, and extension disagree
    #[error("inconsistent order: {0}")]
    Consistency(String),
    /// The proving backend failed
    #[error("proving backend failed: {0}")]
    ExternalFailure(String),
}

impl AssemblerError {
    /// Create a new order parameter error
    #[allow(clippy::needless_pass_by_value)]
    pub fn order_param<T: ToString>(msg: T) -> Self {
        Self::OrderParam(msg.to_string())
    }

    /// Create a new consistency error
    #[allow(clippy::needless_pass_by_value)]
    pub fn consistency<T: ToString>(msg: T) -> Self {
        Self::Consistency(msg.to_string())
    }

    /// Create a new external failure error
    #[allow(clippy::needless_pass_by_value)]
    pub fn external_failure<T: ToString>(msg: T) -> Self {
        Self::ExternalFailure(msg.to_string())
    }
}

impl From<CryptoError> for AssemblerError {
    fn from(e: CryptoError) -> Self {
        AssemblerError::Commitment(e.to_string())
    }
}

impl From<ProofError> for AssemblerError {
    fn from(e: ProofError) -> Self {
        AssemblerError::Proof(e.to_string())
    }
}

impl From<PredicateError> for AssemblerError {
    fn from(e: PredicateError) -> Self {
        AssemblerError::Predicate(e.to_string())
    }
}

impl From<SaltError> for AssemblerError {
    fn from(e: SaltError) -> Self {
        AssemblerError::Salt(e.to_string())
    }
}

/// The error type returned by the lifecycle controller
#[derive(Clone, Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A step was requested from a state that does not allow it
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        /// The current state
        from: LifecycleStatus,
        /// The requested state
        to: LifecycleStatus,
    },
    /// The order is not ready to fill
    #[error("order in state {status} is not ready to fill ({} errors)", .errors.len())]
    NotReady {
        /// The order's state
        status: LifecycleStatus,
        /// The errors accumulated by the order
        errors: Vec<Issue>,
    },
    /// The fill arguments could not be encoded
    #[error("error encoding fill: {0}")]
    Encoding(String),
}

impl From<PredicateError> for LifecycleError {
    fn from(e: PredicateError) -> Self {
        LifecycleError::Encoding(e.to_string())
    }
}

/// The error type returned by the taker evaluator
#[derive(Clone, Debug, thiserror::Error)]
pub enum TakerError {
    /// The order cannot be filled at all
    #[error("order is not fillable: {0}")]
    NotFillable(#[from] LifecycleError),
    /// A fill simulation failed
    #[error("fill simulation failed: {0}")]
    Simulation(String),
    /// A chain query exceeded its timeout
    #[error("chain query timed out after {0}ms")]
    Timeout(u128),
}

impl TakerError {
    /// Create a new simulation error
    #[allow(clippy::needless_pass_by_value)]
    pub fn simulation<T: ToString>(msg: T) -> Self {
        Self::Simulation(msg.to_string())
    }
}
