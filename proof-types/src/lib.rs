//! Defines the proof types produced by the external proving backend and the
//! bridge between them and the on-chain predicate verifier
//!
//! Nothing in this crate evaluates whether a proof is cryptographically
//! valid; validation here is purely structural
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod encoding;
pub mod errors;
pub mod groth16;
pub mod traits;

pub use errors::ProofError;
pub use groth16::{CircuitInputs, G1Point, G2Point, Groth16Proof, PublicSignals, ZkProof};
pub use traits::{ProverError, ProvingBackend};
