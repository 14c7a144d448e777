//! Errors raised by the cryptographic helpers

use alloy_primitives::U256;

/// The error type returned by commitment and field helpers
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// A value does not fit in the circuit's scalar field
    #[error("{name} is not below the scalar field modulus")]
    FieldOverflow {
        /// The name of the offending input
        name: &'static str,
        /// The offending value
        value: U256,
    },
    /// The hash function rejected its inputs
    #[error("poseidon error: {0}")]
    Poseidon(String),
}

impl CryptoError {
    /// Create a new poseidon error
    #[allow(clippy::needless_pass_by_value)]
    pub fn poseidon<T: ToString>(msg: T) -> Self {
        Self::Poseidon(msg.to_string())
    }
}
