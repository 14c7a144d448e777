//! Provides a client for the host limit order protocol
//!
//! This covers the encodings the protocol understands (salts, predicates,
//! extensions, trait words, EIP-712 typed data) along with the signer and
//! chain reader capabilities used to sign and evaluate orders

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod abi;
pub mod client;
pub mod conversion;
pub mod eip712;
pub mod errors;
pub mod extension;
pub mod order_traits;
pub mod predicate;
pub mod salt;
pub mod traits;
