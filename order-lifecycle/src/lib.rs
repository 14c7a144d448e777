//! Drives zero-knowledge limit orders from assembly to a fillable state
//!
//! The maker side assembles an order whose fill is gated on a proof against
//! hidden thresholds, then signs and revalidates it. The taker side evaluates
//! a signed order from public information and chain state alone

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod assembler;
pub mod errors;
pub mod lifecycle;
pub mod taker;

pub use assembler::{
    AssemblerConfig, BuildDebugInfo, OrderAssembler, ProofSource, prepare_circuit_inputs,
    validate_consistency,
};
pub use lifecycle::{
    FillArgs, LifecycleController, LifecycleStatus, OrderLifecycle, prepare_for_fill,
};
pub use taker::{
    FillRequest, GasBaseline, GasComparison, GasEfficiency, TakerAssessment, TakerEvaluator,
};
