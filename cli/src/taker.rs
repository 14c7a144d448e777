//! Taker subcommands: evaluating a signed order and building its fill call

use std::path::PathBuf;

use alloy_primitives::{Address, Bytes, U256};
use clap::Args;
use config::ToolConfig;
use eyre::{Result, eyre};
use lop_client::client::ProviderChainReader;
use order_lifecycle::{
    FillRequest, GasComparison, TakerAssessment, TakerEvaluator, prepare_for_fill,
    taker::{apply_slippage, required_taking_amount},
};
use serde::Serialize;
use tracing::{info, warn};
use util::hex::{address_from_hex_string, u256_from_str};

use crate::io::{load_order, write_json};

/// The fill a taker intends, shared by the taker subcommands
#[derive(Debug, Args)]
pub struct FillOpts {
    /// A signed order file written by `build` or `import`
    #[arg(long)]
    order: PathBuf,
    /// The amount of the maker asset to fill
    #[arg(long, value_parser = u256_from_str)]
    fill_amount: U256,
    /// The slippage tolerated on the taking amount, in basis points
    #[arg(long, default_value_t = 50)]
    slippage_bps: u64,
}

// ------------
// | Evaluate |
// ------------

/// Arguments to `evaluate`
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// The intended fill
    #[clap(flatten)]
    fill: FillOpts,
    /// The taker's address
    #[arg(long, value_parser = address_from_hex_string)]
    taker: Address,
    /// Also simulate the fill and compare it to the modeled cost without the
    /// extension
    #[arg(long)]
    estimate_gas: bool,
}

/// The result of `evaluate`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateOutput {
    /// The public checks
    assessment: TakerAssessment,
    /// The simulated gas costs, when requested and available
    gas: Option<GasComparison>,
}

/// Evaluate a fill against the order's public fields and chain state
pub async fn evaluate(args: EvaluateArgs, config: &ToolConfig) -> Result<()> {
    let client_config =
        config.chain_client_config().ok_or_else(|| eyre!("an RPC url is required to evaluate"))?;
    let reader = ProviderChainReader::from_config(&client_config)?;
    let evaluator = TakerEvaluator::new(reader, config.protocol_address)
        .with_query_timeout(config.query_timeout);

    let lifecycle = load_order(&args.fill.order, None, &config.domain())?;
    let req = FillRequest {
        taker: args.taker,
        fill_amount: args.fill.fill_amount,
        slippage_bps: args.fill.slippage_bps,
    };

    let assessment = evaluator.evaluate(&lifecycle, &req).await;
    info!(can_fill = assessment.can_fill, "evaluated fill");

    let gas = if args.estimate_gas && assessment.can_fill {
        match evaluator.estimate_fill_gas(&lifecycle, &req).await {
            Ok(gas) => Some(gas),
            Err(e) => {
                warn!("could not estimate fill gas: {e}");
                None
            },
        }
    } else {
        None
    };

    write_json(&EvaluateOutput { assessment, gas }, None)
}

// -----------------
// | Fill Calldata |
// -----------------

/// The fill transaction for a signed order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FillCalldata {
    /// The protocol contract to call
    to: Address,
    /// The `fillOrderArgs` calldata
    data: Bytes,
    /// The taking amount owed, rounded up
    required_taking_amount: U256,
    /// The most the taker pays once slippage is applied
    threshold: U256,
}

/// Build the fill calldata for a signed order
fn fill_calldata(opts: &FillOpts, config: &ToolConfig) -> Result<FillCalldata> {
    let lifecycle = load_order(&opts.order, None, &config.domain())?;
    let fill = prepare_for_fill(&lifecycle)?;

    let required = required_taking_amount(
        fill.order.taking_amount,
        fill.order.making_amount,
        opts.fill_amount,
    );
    let threshold = apply_slippage(required, opts.slippage_bps);
    let data = fill.fill_calldata(opts.fill_amount, threshold, None /* target */)?;

    Ok(FillCalldata {
        to: config.protocol_address,
        data,
        required_taking_amount: required,
        threshold,
    })
}

/// Print the fill calldata for a signed order
pub fn print_fill_calldata(opts: FillOpts, config: &ToolConfig) -> Result<()> {
    write_json(&fill_calldata(&opts, config)?, None)
}
