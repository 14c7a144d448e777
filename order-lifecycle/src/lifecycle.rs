//! The maker-side lifecycle of a zero-knowledge order
//!
//! An order moves strictly forward through
//! `Created -> Signed -> Validated -> ReadyToFill`, and any structural or
//! external failure moves it to the terminal `Invalid` state

use std::fmt::{Display, Formatter, Result as FmtResult};

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use common::types::{
    Issue, IssueCategory, Order, OrderSignature, ValidationResult, ZkEnabledOrder,
};
use lop_client::{
    abi::IOrderMixin::fillOrderArgsCall,
    conversion::to_contract_order,
    eip712::{OrderDomain, OrderTypedData, recover_signer},
    order_traits::TakerTraits,
    traits::OrderSigner,
};
use serde::{Serialize, Serializer};
use tracing::{info, instrument, warn};

use crate::{assembler::validate_consistency, errors::LifecycleError};

// -------------------
// | Lifecycle State |
// -------------------

/// The state of an order in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleStatus {
    /// Built and consistency checked, not yet signed
    Created,
    /// Signed by the maker, not yet revalidated
    Signed,
    /// Revalidated after signing, signature not yet checked
    Validated,
    /// Signed, consistent, and ready to hand to a taker
    ReadyToFill,
    /// A step failed; the order must be rebuilt
    Invalid,
}

impl LifecycleStatus {
    /// Whether a transition from `self` to `next` is a legal forward step
    pub fn can_transition_to(&self, next: LifecycleStatus) -> bool {
        use LifecycleStatus::*;
        matches!(
            (self, next),
            (Created, Signed)
                | (Signed, Validated)
                | (Validated, ReadyToFill)
                | (Created | Signed | Validated, Invalid)
        )
    }

    /// Whether no further transitions are possible in this layer
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleStatus::ReadyToFill | LifecycleStatus::Invalid)
    }
}

impl Display for LifecycleStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LifecycleStatus::Created => write!(f, "Created"),
            LifecycleStatus::Signed => write!(f, "Signed"),
            LifecycleStatus::Validated => write!(f, "Validated"),
            LifecycleStatus::ReadyToFill => write!(f, "ReadyToFill"),
            LifecycleStatus::Invalid => write!(f, "Invalid"),
        }
    }
}

impl Serialize for LifecycleStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// An order together with its signature and lifecycle state
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLifecycle {
    /// The order and its maker-side metadata
    order: ZkEnabledOrder,
    /// The maker's signature, once signed
    signature: Option<OrderSignature>,
    /// The issues accumulated over the lifecycle
    validation: ValidationResult,
    /// The current state
    status: LifecycleStatus,
}

impl OrderLifecycle {
    /// Start a lifecycle, checking the order's consistency once
    pub fn new(order: ZkEnabledOrder) -> Self {
        let validation = validate_consistency(&order);
        let status =
            if validation.is_valid() { LifecycleStatus::Created } else { LifecycleStatus::Invalid };

        Self { order, signature: None, validation, status }
    }

    /// The order
    pub fn order(&self) -> &ZkEnabledOrder {
        &self.order
    }

    /// Mutable access to the order while it is still unsigned
    pub fn order_mut(&mut self) -> Result<&mut ZkEnabledOrder, LifecycleError> {
        if self.status != LifecycleStatus::Created {
            return Err(LifecycleError::IllegalTransition {
                from: self.status,
                to: LifecycleStatus::Created,
            });
        }

        Ok(&mut self.order)
    }

    /// The maker's signature, if signed
    pub fn signature(&self) -> Option<&OrderSignature> {
        self.signature.as_ref()
    }

    /// The issues accumulated so far
    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// The current state
    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    /// Move forward to `next`
    fn transition(&mut self, next: LifecycleStatus) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(next) {
            return Err(LifecycleError::IllegalTransition { from: self.status, to: next });
        }

        self.status = next;
        Ok(())
    }

    /// Record an error issue and move to `Invalid`
    fn invalidate(&mut self, issue: Issue) {
        warn!(from = %self.status, "invalidating order: {issue}");
        self.validation.push(issue);
        self.status = LifecycleStatus::Invalid;
    }

    /// Resume the lifecycle of an order signed elsewhere
    ///
    /// The order is checked exactly as after `LifecycleController::sign`, so
    /// the result holds either `ReadyToFill` or `Invalid`
    #[instrument(skip_all, fields(maker = %order.order.maker))]
    pub fn import_signed(
        order: ZkEnabledOrder,
        signature: OrderSignature,
        domain: &OrderDomain,
    ) -> Self {
        let mut lifecycle = Self::new(order);
        if lifecycle.status != LifecycleStatus::Created {
            return lifecycle;
        }

        lifecycle.signature = Some(signature);
        let res = lifecycle
            .transition(LifecycleStatus::Signed)
            .and_then(|_| lifecycle.revalidate(domain));
        if let Err(e) = res {
            lifecycle.invalidate(Issue::error(IssueCategory::Order, e));
        }

        lifecycle
    }

    /// Revalidate a signed order and check its signature recovers to the maker
    fn revalidate(&mut self, domain: &OrderDomain) -> Result<(), LifecycleError> {
        // Signing is the last point the order's fields may change
        let post_sign = validate_consistency(&self.order);
        if !post_sign.is_valid() {
            self.validation.merge(post_sign);
            self.status = LifecycleStatus::Invalid;
            return Ok(());
        }
        self.transition(LifecycleStatus::Validated)?;

        let Some(signature) = self.signature.as_ref() else {
            self.invalidate(Issue::error(IssueCategory::Order, "order is not signed"));
            return Ok(());
        };
        let typed_data = OrderTypedData::new(domain.clone(), &self.order.order);
        let maker = self.order.order.maker;
        match recover_signer(typed_data.signing_hash(), signature) {
            Ok(addr) if addr == maker => {},
            Ok(addr) => {
                let msg = format!("signature recovers to {addr}, expected maker {maker}");
                self.invalidate(Issue::error(IssueCategory::Order, msg));
                return Ok(());
            },
            Err(e) => {
                self.invalidate(Issue::error(IssueCategory::Order, e));
                return Ok(());
            },
        }
        self.transition(LifecycleStatus::ReadyToFill)?;

        info!(salt = %self.order.order.salt, "order ready to fill");
        Ok(())
    }
}

// --------------
// | Controller |
// --------------

/// Drives orders through signing and revalidation
pub struct LifecycleController<S: OrderSigner> {
    /// The maker's signer
    signer: S,
    /// The domain orders are signed under
    domain: OrderDomain,
}

impl<S: OrderSigner> LifecycleController<S> {
    /// Constructor
    pub fn new(signer: S, domain: OrderDomain) -> Self {
        Self { signer, domain }
    }

    /// The signing domain
    pub fn domain(&self) -> &OrderDomain {
        &self.domain
    }

    /// Sign an order and revalidate it
    ///
    /// Only errors when the order is not in `Created`; every other failure is
    /// folded into the lifecycle, which then holds `Invalid`
    #[instrument(skip_all, err, fields(maker = %lifecycle.order.order.maker))]
    pub async fn sign(
        &self,
        lifecycle: &mut OrderLifecycle,
    ) -> Result<LifecycleStatus, LifecycleError> {
        if lifecycle.status != LifecycleStatus::Created {
            return Err(LifecycleError::IllegalTransition {
                from: lifecycle.status,
                to: LifecycleStatus::Signed,
            });
        }

        // Refuse to sign an inconsistent order, the caller may have mutated it
        let pre_sign = validate_consistency(&lifecycle.order);
        if !pre_sign.is_valid() {
            lifecycle.validation.merge(pre_sign);
            lifecycle.status = LifecycleStatus::Invalid;
            warn!("refusing to sign an inconsistent order");
            return Ok(lifecycle.status);
        }

        let typed_data = OrderTypedData::new(self.domain.clone(), &lifecycle.order.order);
        let signature = match self.signer.sign_order(&typed_data).await {
            Ok(sig) => sig,
            Err(e) => {
                lifecycle.invalidate(Issue::error(IssueCategory::Network, e));
                return Ok(lifecycle.status);
            },
        };
        lifecycle.signature = Some(signature);
        lifecycle.transition(LifecycleStatus::Signed)?;
        lifecycle.revalidate(&self.domain)?;

        Ok(lifecycle.status)
    }
}

// -------------
// | Fill Args |
// -------------

/// The values a taker needs to fill an order
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillArgs {
    /// The signed order
    pub order: Order,
    /// The `r` component of the signature
    pub r: B256,
    /// The `vs` component of the signature
    pub vs: B256,
    /// The order's extension, passed to the protocol in the taker args
    pub extension: Bytes,
}

impl FillArgs {
    /// Taker traits for a maker-denominated fill carrying the extension
    ///
    /// `threshold` is the most the taker is willing to pay
    pub fn taker_traits(
        &self,
        threshold: U256,
        target: Option<Address>,
    ) -> Result<(TakerTraits, Bytes), LifecycleError> {
        let traits = TakerTraits::new().with_maker_amount().with_threshold(threshold);
        traits
            .encode_args(target, &self.extension, &[] /* interaction */)
            .map_err(LifecycleError::from)
    }

    /// The `fillOrderArgs` calldata for a fill of `fill_amount` maker tokens
    pub fn fill_calldata(
        &self,
        fill_amount: U256,
        threshold: U256,
        target: Option<Address>,
    ) -> Result<Bytes, LifecycleError> {
        let (traits, args) = self.taker_traits(threshold, target)?;
        let call = fillOrderArgsCall {
            order: to_contract_order(&self.order),
            r: self.r,
            vs: self.vs,
            amount: fill_amount,
            takerTraits: traits.0,
            args,
        };

        Ok(Bytes::from(call.abi_encode()))
    }
}

/// Extract the fill arguments of an order that is ready to fill
///
/// Any other state returns the order's accumulated errors
pub fn prepare_for_fill(lifecycle: &OrderLifecycle) -> Result<FillArgs, LifecycleError> {
    let not_ready = || LifecycleError::NotReady {
        status: lifecycle.status,
        errors: lifecycle.validation.errors().cloned().collect(),
    };

    if lifecycle.status != LifecycleStatus::ReadyToFill {
        return Err(not_ready());
    }
    let signature = lifecycle.signature.as_ref().ok_or_else(not_ready)?;

    Ok(FillArgs {
        order: lifecycle.order.order.clone(),
        r: signature.r,
        vs: signature.vs,
        extension: lifecycle.order.order.extension.clone(),
    })
}
