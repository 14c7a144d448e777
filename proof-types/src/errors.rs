//! Structural errors raised while parsing or encoding proofs

/// The error type returned by the proof bridge
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    /// A coordinate of a proof point is not a base field element
    #[error("proof point coordinate {0} is out of the base field")]
    CoordinateOutOfRange(&'static str),
    /// The encoded verifier input has the wrong length
    #[error("invalid verifier input length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// The expected byte length
        expected: usize,
        /// The actual byte length
        actual: usize,
    },
    /// The calldata does not begin with the verifier's selector
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    /// A snarkjs proof or signal file could not be parsed
    #[error("malformed proof json: {0}")]
    MalformedJson(String),
    /// A public signal is not a scalar field element
    #[error("public signal {index} is out of the scalar field")]
    SignalOutOfRange {
        /// The index of the offending signal
        index: usize,
    },
    /// The validity flag is neither zero nor one
    #[error("validity signal must be 0 or 1")]
    InvalidValidityFlag,
    /// The wrong number of public signals was supplied
    #[error("expected {expected} public signals, got {actual}")]
    WrongSignalCount {
        /// The expected signal count
        expected: usize,
        /// The actual signal count
        actual: usize,
    },
}

impl ProofError {
    /// Create a new malformed json error
    #[allow(clippy::needless_pass_by_value)]
    pub fn malformed_json<T: ToString>(msg: T) -> Self {
        Self::MalformedJson(msg.to_string())
    }
}
