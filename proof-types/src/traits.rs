//! The capability exposed by the external proving backend

use async_trait::async_trait;

use crate::groth16::{CircuitInputs, ZkProof};

/// The error type returned by a proving backend
#[derive(Clone, Debug, thiserror::Error)]
pub enum ProverError {
    /// The backend failed to generate a proof
    #[error("proof generation failed: {0}")]
    Proving(String),
    /// The backend failed to run verification
    #[error("proof verification failed: {0}")]
    Verification(String),
}

impl ProverError {
    /// Create a new proving error
    #[allow(clippy::needless_pass_by_value)]
    pub fn proving<T: ToString>(msg: T) -> Self {
        Self::Proving(msg.to_string())
    }

    /// Create a new verification error
    #[allow(clippy::needless_pass_by_value)]
    pub fn verification<T: ToString>(msg: T) -> Self {
        Self::Verification(msg.to_string())
    }
}

/// A backend capable of proving and verifying the threshold circuit
///
/// Proving may take seconds; callers impose their own timeouts by dropping
/// the returned future
#[async_trait]
pub trait ProvingBackend: Send + Sync {
    /// Generate a proof and its public signals from the circuit inputs
    async fn prove(&self, inputs: &CircuitInputs) -> Result<ZkProof, ProverError>;

    /// Verify a proof against its public signals
    async fn verify(&self, proof: &ZkProof) -> Result<bool, ProverError>;
}
