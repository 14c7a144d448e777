//! Maker subcommands: committing to thresholds, rendering the proving
//! witness, assembling and signing orders

use std::path::PathBuf;

use alloy_primitives::U256;
use clap::Args;
use common::types::{OrderParams, SecretParameters};
use config::ToolConfig;
use eyre::{Result, bail, eyre};
use lop_client::{client::LocalOrderSigner, eip712::OrderTypedData, salt::truncate_commitment};
use order_lifecycle::{
    AssemblerConfig, BuildDebugInfo, LifecycleController, LifecycleStatus, OrderAssembler,
    OrderLifecycle, ProofSource, prepare_circuit_inputs,
};
use proof_types::ZkProof;
use serde::Serialize;
use tracing::{info, warn};
use util::hex::u256_from_str;

use crate::io::{LifecycleFile, load_order, read_file, read_json, write_json};

// ----------
// | Commit |
// ----------

/// Arguments to `commit`
#[derive(Debug, Args)]
pub struct CommitArgs {
    /// The secret minimum price, scaled by 1e18
    #[arg(long, value_parser = u256_from_str)]
    secret_price: U256,
    /// The secret minimum amount
    #[arg(long, value_parser = u256_from_str)]
    secret_amount: U256,
    /// The blinding nonce, sampled from the scalar field when omitted
    #[arg(long, value_parser = u256_from_str)]
    nonce: Option<U256>,
    /// Write the secret file here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

/// The secret parameters together with their commitment
///
/// Readable as a secret file by `witness` and `build`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommitOutput {
    /// The secret parameters
    #[serde(flatten)]
    secret: SecretParameters,
    /// The full commitment
    commitment: U256,
    /// The part of the commitment the salt carries
    truncated_commitment: U256,
}

/// Commit to a set of secret thresholds
pub fn commit(args: CommitArgs) -> Result<()> {
    let secret = match args.nonce {
        Some(nonce) => SecretParameters::new(args.secret_price, args.secret_amount, nonce),
        None => SecretParameters::with_random_nonce(args.secret_price, args.secret_amount),
    };
    let commitment = secret.commitment()?;
    info!(%commitment, "committed to secret parameters");

    let output =
        CommitOutput { secret, commitment, truncated_commitment: truncate_commitment(commitment) };
    write_json(&output, args.out.as_deref())
}

// -----------
// | Witness |
// -----------

/// Arguments to `witness`
#[derive(Debug, Args)]
pub struct WitnessArgs {
    /// A JSON file of public order parameters
    #[arg(long)]
    params: PathBuf,
    /// A JSON file of secret parameters, as written by `commit`
    #[arg(long)]
    secret: PathBuf,
    /// Write the witness here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Render the proving backend's input for an order
pub fn witness(args: WitnessArgs) -> Result<()> {
    let params: OrderParams = read_json(&args.params)?;
    let secret: SecretParameters = read_json(&args.secret)?;

    let inputs = prepare_circuit_inputs(&params, &secret)?;
    write_json(&inputs.to_snarkjs_input(), args.out.as_deref())
}

// ---------
// | Build |
// ---------

/// Arguments to `build`
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// A JSON file of public order parameters
    #[arg(long)]
    params: PathBuf,
    /// A JSON file of secret parameters, as written by `commit`
    #[arg(long)]
    secret: PathBuf,
    /// The snarkjs `proof.json` generated from the order's witness
    #[arg(long)]
    proof: PathBuf,
    /// The snarkjs `public.json` generated alongside the proof
    #[arg(long)]
    public: PathBuf,
    /// Leave the order unsigned even when a maker key is configured
    #[arg(long)]
    no_sign: bool,
    /// Write the order here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

/// The result of `build`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput<'a> {
    /// The order's lifecycle
    #[serde(flatten)]
    file: LifecycleFile<'a>,
    /// The EIP-712 typed data, for signing with an external wallet
    typed_data: serde_json::Value,
    /// Intermediate values of the assembly
    debug: BuildDebugInfo,
}

/// Assemble an order around a pre-generated proof and sign it
pub async fn build(args: BuildArgs, config: &ToolConfig) -> Result<()> {
    let verifier = config
        .verifier_address
        .ok_or_else(|| eyre!("a verifier address is required to build orders"))?;
    let params: OrderParams = read_json(&args.params)?;
    let secret: SecretParameters = read_json(&args.secret)?;
    let proof = ZkProof::from_snarkjs_json(&read_file(&args.proof)?, &read_file(&args.public)?)?;

    let assembler = OrderAssembler::new(AssemblerConfig {
        truncation_acknowledged: config.truncation_acknowledged,
    });
    let (order, debug) =
        assembler.build(&params, &secret, verifier, ProofSource::Pregenerated(proof)).await?;
    for issue in debug.warnings.warnings() {
        warn!("{issue}");
    }

    let domain = config.domain();
    let typed_data = OrderTypedData::new(domain.clone(), &order.order).to_json();
    let mut lifecycle = OrderLifecycle::new(order);
    match config.maker_key.as_deref() {
        Some(key) if !args.no_sign => {
            let signer = LocalOrderSigner::from_hex(key)?;
            LifecycleController::new(signer, domain).sign(&mut lifecycle).await?;
        },
        _ => info!("order left unsigned, sign its typed data and pass the signature to `import`"),
    }

    let output = BuildOutput { file: LifecycleFile { lifecycle: &lifecycle }, typed_data, debug };
    write_json(&output, args.out.as_deref())?;
    ensure_not_invalid(&lifecycle)
}

// ----------
// | Import |
// ----------

/// Arguments to `import`
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// An order file written by `build`
    #[arg(long)]
    order: PathBuf,
    /// The 65-byte hex signature over the order's typed data
    #[arg(long)]
    signature: String,
    /// Write the signed order here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Attach an externally produced signature to an order and revalidate it
pub fn import(args: ImportArgs, config: &ToolConfig) -> Result<()> {
    let lifecycle = load_order(&args.order, Some(&args.signature), &config.domain())?;
    write_json(&LifecycleFile { lifecycle: &lifecycle }, args.out.as_deref())?;
    ensure_not_invalid(&lifecycle)
}

/// Fail with the lifecycle's errors if it ended up `Invalid`
fn ensure_not_invalid(lifecycle: &OrderLifecycle) -> Result<()> {
    if lifecycle.status() != LifecycleStatus::Invalid {
        return Ok(());
    }

    let errors: Vec<String> = lifecycle.validation().errors().map(ToString::to_string).collect();
    bail!("order is invalid: {}", errors.join("; "))
}
