//! Taker-side checks of a signed order
//!
//! A taker never sees the maker's secret thresholds, so these checks reason
//! only from public order fields and live chain state. Whether a fill meets
//! the thresholds is decided by the proof check at fill time

use std::time::Duration;

use alloy_primitives::{Address, U256};
use common::types::{IssueCategory, ValidationResult};
use constants::{
    BPS_DENOMINATOR, DEADLINE_CRITICAL_WINDOW_SECS, DEADLINE_WARNING_WINDOW_SECS,
    DEFAULT_CHAIN_QUERY_TIMEOUT_MS, GAS_OVERHEAD_ACCEPTABLE_PCT, GAS_OVERHEAD_EFFICIENT_PCT,
    MAX_SLIPPAGE_BPS, TINY_FILL_BPS,
};
use lop_client::{
    order_traits::MakerTraits,
    traits::{CallRequest, ChainReader},
};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};
use util::get_current_time_seconds;

use crate::{
    errors::TakerError,
    lifecycle::{FillArgs, LifecycleStatus, OrderLifecycle, prepare_for_fill},
};

/// A taker's intended fill
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRequest {
    /// The taker's address
    pub taker: Address,
    /// The amount of the maker asset to fill
    pub fill_amount: U256,
    /// The slippage tolerated on the taking amount, in basis points
    pub slippage_bps: u64,
}

/// The outcome of evaluating an order from a taker's perspective
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakerAssessment {
    /// Whether the public checks permit a fill
    ///
    /// A fill may still be rejected by the proof check at fill time
    pub can_fill: bool,
    /// The taking amount owed for the requested fill, rounded up
    pub required_taking_amount: U256,
    /// The issues found
    pub issues: ValidationResult,
}

/// The relative gas cost of the proof check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GasEfficiency {
    /// Overhead below 20%
    Efficient,
    /// Overhead below 50%
    Acceptable,
    /// Overhead of 50% or more
    Expensive,
}

impl GasEfficiency {
    /// Classify an overhead percentage
    pub fn from_overhead_pct(pct: u64) -> Self {
        if pct < GAS_OVERHEAD_EFFICIENT_PCT {
            GasEfficiency::Efficient
        } else if pct < GAS_OVERHEAD_ACCEPTABLE_PCT {
            GasEfficiency::Acceptable
        } else {
            GasEfficiency::Expensive
        }
    }
}

/// How the gas of a fill without the extension was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GasBaseline {
    /// Simulated from a separately signed plain order
    Simulated,
    /// The simulated fill less the modeled predicate gas
    Modeled,
}

/// Fill costs with and without the extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasComparison {
    /// Gas of a fill carrying the extension
    pub with_extension: u64,
    /// Gas of a fill without the extension
    pub without_extension: u64,
    /// The extension's overhead relative to the plain fill, in percent
    pub overhead_pct: u64,
    /// The overhead classification
    pub efficiency: GasEfficiency,
    /// How `without_extension` was obtained
    pub baseline: GasBaseline,
}

impl GasComparison {
    /// Compare two gas figures
    fn new(with_extension: u64, without_extension: u64, baseline: GasBaseline) -> Self {
        let overhead = with_extension.saturating_sub(without_extension);
        let overhead_pct =
            overhead.saturating_mul(100).checked_div(without_extension).unwrap_or(u64::MAX);
        let efficiency = GasEfficiency::from_overhead_pct(overhead_pct);
        debug!(with_extension, without_extension, overhead_pct, ?baseline, "estimated fill gas");

        Self { with_extension, without_extension, overhead_pct, efficiency, baseline }
    }
}

/// Evaluates orders against public information and chain state
pub struct TakerEvaluator<R: ChainReader> {
    /// The chain reader
    reader: R,
    /// The protocol contract fills are sent to
    protocol_address: Address,
    /// The bound on each chain query
    query_timeout: Duration,
}

impl<R: ChainReader> TakerEvaluator<R> {
    /// Constructor
    pub fn new(reader: R, protocol_address: Address) -> Self {
        Self {
            reader,
            protocol_address,
            query_timeout: Duration::from_millis(DEFAULT_CHAIN_QUERY_TIMEOUT_MS),
        }
    }

    /// Set the chain query timeout
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Evaluate a fill at the current time
    pub async fn evaluate(&self, lifecycle: &OrderLifecycle, req: &FillRequest) -> TakerAssessment {
        self.evaluate_at(lifecycle, req, get_current_time_seconds()).await
    }

    /// Evaluate a fill as of the unix timestamp `now`
    #[instrument(skip_all, fields(taker = %req.taker, fill_amount = %req.fill_amount))]
    pub async fn evaluate_at(
        &self,
        lifecycle: &OrderLifecycle,
        req: &FillRequest,
        now: u64,
    ) -> TakerAssessment {
        let mut issues = ValidationResult::new();
        let order = &lifecycle.order().order;

        if lifecycle.status() != LifecycleStatus::ReadyToFill {
            issues.error(
                IssueCategory::Order,
                format!("order is {}, not ReadyToFill", lifecycle.status()),
            );
        }
        if lifecycle.signature().is_none() {
            issues.error(IssueCategory::Order, "order is not signed");
        }
        if order.extension.is_empty() {
            issues.error(IssueCategory::Zk, "order carries no predicate extension");
        }

        let required_taking_amount = self.check_amounts(lifecycle, req, &mut issues);
        check_deadline(MakerTraits::from(order.maker_traits), now, &mut issues);

        if order.maker == req.taker {
            issues.warning(IssueCategory::Order, "taker is the order's maker");
        }

        if !required_taking_amount.is_zero() {
            self.check_balance(order.taker_asset, req.taker, required_taking_amount, &mut issues)
                .await;
        }

        let can_fill = issues.is_valid();
        debug!(can_fill, issues = issues.issues.len(), "evaluated fill");
        TakerAssessment { can_fill, required_taking_amount, issues }
    }

    /// Check the fill amount and slippage, returning the required taking amount
    fn check_amounts(
        &self,
        lifecycle: &OrderLifecycle,
        req: &FillRequest,
        issues: &mut ValidationResult,
    ) -> U256 {
        let order = &lifecycle.order().order;
        if req.fill_amount.is_zero() {
            issues.error(IssueCategory::Order, "fill amount must be positive");
            return U256::ZERO;
        }
        if req.fill_amount > order.making_amount {
            issues.error(
                IssueCategory::Order,
                format!(
                    "fill amount {} exceeds the making amount {}",
                    req.fill_amount, order.making_amount
                ),
            );
            return U256::ZERO;
        }

        let traits = MakerTraits::from(order.maker_traits);
        if !traits.allow_partial_fills() && req.fill_amount != order.making_amount {
            issues.error(IssueCategory::Order, "order does not allow partial fills");
        }

        let bps = U256::from(BPS_DENOMINATOR);
        if req.fill_amount.saturating_mul(bps)
            < order.making_amount.saturating_mul(U256::from(TINY_FILL_BPS)) {
            issues.warning(IssueCategory::Order, "fill is below 1% of the making amount");
        }
        if req.slippage_bps > MAX_SLIPPAGE_BPS {
            issues.warning(
                IssueCategory::Order,
                format!("slippage tolerance of {} bps is above 3%", req.slippage_bps),
            );
        }

        required_taking_amount(order.taking_amount, order.making_amount, req.fill_amount)
    }

    /// Check the taker holds enough of the taking asset
    ///
    /// A failed or timed out query is only a warning
    async fn check_balance(
        &self,
        token: Address,
        taker: Address,
        required: U256,
        issues: &mut ValidationResult,
    ) {
        match timeout(self.query_timeout, self.reader.balance_of(token, taker)).await {
            Ok(Ok(balance)) if balance >= required => {},
            Ok(Ok(balance)) => issues.error(
                IssueCategory::Balance,
                format!("taker balance {balance} is below the required {required}"),
            ),
            Ok(Err(e)) => {
                warn!("balance query failed: {e}");
                issues.warning(IssueCategory::Network, format!("could not check balance: {e}"));
            },
            Err(_) => {
                warn!("balance query timed out");
                issues.warning(
                    IssueCategory::Network,
                    format!(
                        "balance query timed out after {}ms",
                        self.query_timeout.as_millis()
                    ),
                );
            },
        }
    }

    /// Compare the gas of a fill with and without the order's extension
    ///
    /// Only the signed order is simulated. Any edit to it invalidates the
    /// maker's signature, so the plain figure is the simulated gas less the
    /// modeled predicate cost and is advisory
    #[instrument(skip_all, err, fields(taker = %req.taker))]
    pub async fn estimate_fill_gas(
        &self,
        lifecycle: &OrderLifecycle,
        req: &FillRequest,
    ) -> Result<GasComparison, TakerError> {
        let fill = prepare_for_fill(lifecycle)?;
        let with_extension = self.simulate(&fill, req).await?;

        let predicate_gas = lifecycle.order().zk_metadata.extension_data.gas_estimate;
        let without_extension = with_extension.saturating_sub(predicate_gas);
        Ok(GasComparison::new(with_extension, without_extension, GasBaseline::Modeled))
    }

    /// Compare the gas of a fill against a fill of a plain order
    ///
    /// `baseline` must be an order without an extension carrying its own
    /// signature, such as the same trade signed without the proof check
    #[instrument(skip_all, err, fields(taker = %req.taker))]
    pub async fn estimate_fill_gas_against(
        &self,
        lifecycle: &OrderLifecycle,
        baseline: &FillArgs,
        req: &FillRequest,
    ) -> Result<GasComparison, TakerError> {
        let fill = prepare_for_fill(lifecycle)?;
        let with_extension = self.simulate(&fill, req).await?;
        let without_extension = self.simulate(baseline, req).await?;

        Ok(GasComparison::new(with_extension, without_extension, GasBaseline::Simulated))
    }

    /// Estimate the gas of a single fill
    async fn simulate(&self, fill: &FillArgs, req: &FillRequest) -> Result<u64, TakerError> {
        let order = &fill.order;
        let required =
            required_taking_amount(order.taking_amount, order.making_amount, req.fill_amount);
        let threshold = apply_slippage(required, req.slippage_bps);

        let data = fill.fill_calldata(req.fill_amount, threshold, None /* target */)?;
        let call = CallRequest {
            from: req.taker,
            to: self.protocol_address,
            data,
            value: U256::ZERO,
        };

        timeout(self.query_timeout, self.reader.estimate_gas(&call))
            .await
            .map_err(|_| TakerError::Timeout(self.query_timeout.as_millis()))?
            .map_err(TakerError::simulation)
    }
}

/// The taking amount owed for a fill, `ceil(fill * taking / making)`
pub fn required_taking_amount(taking: U256, making: U256, fill: U256) -> U256 {
    if making.is_zero() {
        return U256::ZERO;
    }

    let numerator = fill.saturating_mul(taking);
    numerator.div_ceil(making)
}

/// Raise an amount by a slippage tolerance in basis points
pub fn apply_slippage(amount: U256, slippage_bps: u64) -> U256 {
    let bps = U256::from(BPS_DENOMINATOR);
    amount.saturating_mul(bps + U256::from(slippage_bps)) / bps
}

/// Check the order's expiration against `now`
fn check_deadline(traits: MakerTraits, now: u64, issues: &mut ValidationResult) {
    let Some(expiration) = traits.expiration() else {
        return;
    };

    if traits.is_expired(now) {
        issues.error(IssueCategory::Order, format!("order expired at {expiration}"));
        return;
    }

    let remaining = expiration - now;
    if remaining <= DEADLINE_CRITICAL_WINDOW_SECS {
        issues.warning(
            IssueCategory::Order,
            format!("order expires in {remaining}s, a fill is unlikely to land in time"),
        );
    } else if remaining <= DEADLINE_WARNING_WINDOW_SECS {
        issues.warning(IssueCategory::Order, format!("order expires in {remaining}s"));
    }
}

#[cfg(test)]
mod tests {
    use common::types::IssueSeverity;

    use super::*;

    #[test]
    fn test_required_taking_rounds_up() {
        let taking = U256::from(17_500_000_000u64);
        let making = U256::from(5_000_000_000_000_000_000u64);

        assert_eq!(required_taking_amount(taking, making, making), taking);
        assert_eq!(required_taking_amount(taking, making, U256::from(1u8)), U256::from(1u8));
        assert_eq!(required_taking_amount(taking, U256::ZERO, making), U256::ZERO);
    }

    #[test]
    fn test_slippage() {
        assert_eq!(apply_slippage(U256::from(10_000u64), 50), U256::from(10_050u64));
        assert_eq!(apply_slippage(U256::from(10_000u64), 0), U256::from(10_000u64));
    }

    #[test]
    fn test_gas_classification() {
        assert_eq!(GasEfficiency::from_overhead_pct(0), GasEfficiency::Efficient);
        assert_eq!(GasEfficiency::from_overhead_pct(19), GasEfficiency::Efficient);
        assert_eq!(GasEfficiency::from_overhead_pct(20), GasEfficiency::Acceptable);
        assert_eq!(GasEfficiency::from_overhead_pct(49), GasEfficiency::Acceptable);
        assert_eq!(GasEfficiency::from_overhead_pct(50), GasEfficiency::Expensive);
    }

    #[test]
    fn test_deadline_escalation() {
        let traits = MakerTraits::new().with_expiration(1_000);

        let mut far = ValidationResult::new();
        check_deadline(traits, 0, &mut far);
        assert!(far.issues.is_empty());

        let mut near = ValidationResult::new();
        check_deadline(traits, 1_000 - 200, &mut near);
        assert!(near.has(IssueSeverity::Warning, IssueCategory::Order));

        let mut critical = ValidationResult::new();
        check_deadline(traits, 1_000 - 30, &mut critical);
        assert!(critical.issues[0].message.contains("unlikely"));

        // Still fillable in the block stamped with the expiration
        let mut at_expiry = ValidationResult::new();
        check_deadline(traits, 1_000, &mut at_expiry);
        assert!(at_expiry.is_valid());
        assert!(at_expiry.issues[0].message.contains("unlikely"));

        let mut passed = ValidationResult::new();
        check_deadline(traits, 1_001, &mut passed);
        assert!(!passed.is_valid());

        let mut none = ValidationResult::new();
        check_deadline(MakerTraits::new(), u64::MAX, &mut none);
        assert!(none.issues.is_empty());
    }
}
