//! Groups helpers used for testing the order tooling
//!
//! Fixtures are built explicitly and passed into tests; nothing here holds
//! shared state between tests
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

pub mod assertions;
#[cfg(feature = "mocks")]
pub mod fixtures;
#[cfg(feature = "mocks")]
pub mod mocks;
