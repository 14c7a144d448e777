//! Defines common types shared by the maker and taker tooling
//!
//! These are plain data types; the encodings that produce them live in
//! `lop-client` and the flows that drive them live in `order-lifecycle`

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::needless_pass_by_ref_mut)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod types;
