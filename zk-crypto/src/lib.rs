//! Cryptography helpers and primitives that must agree bit-for-bit with the
//! external threshold circuit
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod errors;
pub mod fields;
pub mod hash;

pub use errors::CryptoError;
