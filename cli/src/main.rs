//! The entrypoint to the zero-knowledge limit order tool
//!
//! Makers commit to hidden thresholds, render the proving witness, and build
//! and sign orders around the resulting proof. Takers evaluate signed orders
//! and build their fill calls
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod inspect;
mod io;
mod maker;
mod taker;

use std::env;

use clap::{Parser, Subcommand};
use config::{ToolArgs, parse_config_from_args, with_config_file_args};
use eyre::{Result, eyre};
use tracing::debug;
use util::logging::{setup_json_logger, setup_system_logger};

use crate::{
    inspect::{DecodeProofArgs, InspectSaltArgs},
    maker::{BuildArgs, CommitArgs, ImportArgs, WitnessArgs},
    taker::{EvaluateArgs, FillOpts},
};

/// Build and inspect limit orders gated on hidden price and amount thresholds
#[derive(Debug, Parser)]
#[command(name = "zk-order", version)]
struct Cli {
    /// Options shared by every subcommand
    #[clap(flatten)]
    args: ToolArgs,
    /// The subcommand to run
    #[command(subcommand)]
    command: Command,
}

/// The tool's subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Commit to secret thresholds, sampling a nonce if none is given
    Commit(CommitArgs),
    /// Render the proving backend's input for an order
    Witness(WitnessArgs),
    /// Assemble an order around a pre-generated proof and sign it
    Build(BuildArgs),
    /// Attach a wallet signature to an order and revalidate it
    Import(ImportArgs),
    /// Unpack a salt into its commitment and extension hash
    InspectSalt(InspectSaltArgs),
    /// Decode a proof from verifier calldata or an order's predicate
    DecodeProof(DecodeProofArgs),
    /// Evaluate a fill of a signed order against chain state
    Evaluate(EvaluateArgs),
    /// Print the fill calldata for a signed order
    FillCalldata(FillOpts),
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv = with_config_file_args(env::args().collect()).map_err(|e| eyre!(e))?;
    let cli = Cli::parse_from(argv);
    let config = parse_config_from_args(cli.args).map_err(|e| eyre!(e))?;

    if config.json_logs {
        setup_json_logger(config.log_level);
    } else {
        setup_system_logger(config.log_level);
    }
    debug!(chain_id = config.chain_id, protocol = %config.protocol_address, "parsed config");

    match cli.command {
        Command::Commit(args) => maker::commit(args),
        Command::Witness(args) => maker::witness(args),
        Command::Build(args) => maker::build(args, &config).await,
        Command::Import(args) => maker::import(args, &config),
        Command::InspectSalt(args) => inspect::inspect_salt(args),
        Command::DecodeProof(args) => inspect::decode_proof(args),
        Command::Evaluate(args) => taker::evaluate(args, &config).await,
        Command::FillCalldata(opts) => taker::print_fill_calldata(opts, &config),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "zk-order",
            "inspect-salt",
            "--salt",
            "0x1234",
            "--chain-id",
            "137",
        ]);
        assert_eq!(cli.args.chain_id, 137);
        assert!(matches!(cli.command, Command::InspectSalt(_)));
    }

    #[test]
    fn test_decode_proof_needs_an_input() {
        assert!(Cli::try_parse_from(["zk-order", "decode-proof"]).is_err());
        assert!(
            Cli::try_parse_from(["zk-order", "decode-proof", "--calldata", "0x", "--order", "o"])
                .is_err()
        );
    }
}
