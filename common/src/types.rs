//! Groups the data model of hidden-threshold orders

pub mod extension;
pub mod order;
pub mod secret;
pub mod signature;
pub mod validation;

pub use extension::{ExtensionData, PackedSaltData};
pub use order::{Order, OrderParams, ZkEnabledOrder, ZkMetadata};
pub use secret::SecretParameters;
pub use signature::OrderSignature;
pub use validation::{Issue, IssueCategory, IssueSeverity, ValidationResult};
