//! Read-only subcommands for looking inside salts and proofs

use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use clap::Args;
use eyre::{Result, eyre};
use lop_client::{
    extension::get_predicate,
    predicate::decode_zk_predicate,
    salt::{extension_hash, truncate_commitment, unpack},
};
use proof_types::{ZkProof, encoding::decode_verifier_calldata, groth16::SnarkjsProof};
use serde::Serialize;
use util::hex::{bytes_from_hex_string, u256_from_str};

use crate::io::{read_saved_order, write_json};

// ----------------
// | Inspect Salt |
// ----------------

/// Arguments to `inspect-salt`
#[derive(Debug, Args)]
pub struct InspectSaltArgs {
    /// The salt to unpack
    #[arg(long, value_parser = u256_from_str)]
    salt: U256,
    /// A commitment to check against the salt's high bits
    #[arg(long, value_parser = u256_from_str)]
    commitment: Option<U256>,
    /// A hex encoded extension to check against the salt's low bits
    #[arg(long)]
    extension: Option<String>,
}

/// The unpacked components of a salt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaltReport {
    /// The salt's high 96 bits
    truncated_commitment: U256,
    /// The salt's low 160 bits
    extension_hash: U256,
    /// Whether the given commitment truncates to the high bits
    #[serde(skip_serializing_if = "Option::is_none")]
    commitment_matches: Option<bool>,
    /// Whether the given extension hashes to the low bits
    #[serde(skip_serializing_if = "Option::is_none")]
    extension_matches: Option<bool>,
}

/// Unpack a salt and check it against a commitment and extension
fn salt_report(args: &InspectSaltArgs) -> Result<SaltReport> {
    let (truncated_commitment, ext_hash) = unpack(args.salt);
    let extension_matches = match args.extension.as_deref() {
        Some(hex) => {
            let bytes = bytes_from_hex_string(hex).map_err(|e| eyre!(e))?;
            Some(extension_hash(&bytes) == ext_hash)
        },
        None => None,
    };

    Ok(SaltReport {
        truncated_commitment,
        extension_hash: ext_hash,
        commitment_matches: args.commitment.map(|c| truncate_commitment(c) == truncated_commitment),
        extension_matches,
    })
}

/// Print the components of a salt
pub fn inspect_salt(args: InspectSaltArgs) -> Result<()> {
    write_json(&salt_report(&args)?, None)
}

// ----------------
// | Decode Proof |
// ----------------

/// Arguments to `decode-proof`
#[derive(Debug, Args)]
pub struct DecodeProofArgs {
    /// Hex encoded verifier calldata
    #[arg(long, conflicts_with = "order", required_unless_present = "order")]
    calldata: Option<String>,
    /// An order file whose predicate carries the proof
    #[arg(long)]
    order: Option<PathBuf>,
}

/// A decoded proof and its public signals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofReport {
    /// The verifier the predicate calls, when decoded from an order
    #[serde(skip_serializing_if = "Option::is_none")]
    verifier: Option<Address>,
    /// The proof in snarkjs form
    proof: SnarkjsProof,
    /// The public signals as decimal strings
    public_signals: Vec<String>,
    /// Whether the circuit judged the thresholds met
    valid: bool,
    /// The commitment the proof is bound to
    commitment: U256,
    /// The nonce the proof is bound to
    nonce: U256,
    /// The price the proof was generated for
    offered_price: U256,
    /// The amount the proof was generated for
    offered_amount: U256,
}

impl ProofReport {
    /// Describe a proof
    fn new(proof: &ZkProof, verifier: Option<Address>) -> Self {
        let signals = &proof.public_signals;
        Self {
            verifier,
            proof: SnarkjsProof::from(&proof.proof),
            public_signals: signals.0.iter().map(ToString::to_string).collect(),
            valid: signals.is_valid(),
            commitment: signals.commitment(),
            nonce: signals.nonce(),
            offered_price: signals.offered_price(),
            offered_amount: signals.offered_amount(),
        }
    }
}

/// Decode a proof from raw calldata or from an order's predicate
fn proof_report(args: &DecodeProofArgs) -> Result<ProofReport> {
    if let Some(hex) = args.calldata.as_deref() {
        let calldata = bytes_from_hex_string(hex).map_err(|e| eyre!(e))?;
        let proof = decode_verifier_calldata(&calldata)?;
        return Ok(ProofReport::new(&proof, None));
    }

    let path = args.order.as_deref().ok_or_else(|| eyre!("pass --calldata or --order"))?;
    let order = read_saved_order(path)?;
    let predicate = get_predicate(&order.order.extension)?;
    let (verifier, calldata) = decode_zk_predicate(&predicate)?;
    let proof = decode_verifier_calldata(&calldata)?;

    Ok(ProofReport::new(&proof, Some(verifier)))
}

/// Print a decoded proof
pub fn decode_proof(args: DecodeProofArgs) -> Result<()> {
    write_json(&proof_report(&args)?, None)
}

#[cfg(test)]
mod tests {
    use lop_client::{
        client::LocalOrderSigner, salt::create_from_extension_bytes, traits::OrderSigner,
    };
    use proof_types::encoding::verifier_calldata;
    use test_helpers::fixtures::{circuit_inputs, mock_proof, order_params, secret_params};
    use util::hex::bytes_to_hex_string;

    use super::*;
    use crate::io::tests::saved_order;

    #[test]
    fn test_salt_report() {
        let commitment = secret_params().commitment().unwrap();
        let extension = vec![0xab; 40];
        let salt = create_from_extension_bytes(commitment, &extension).unwrap().salt;

        let args = InspectSaltArgs {
            salt,
            commitment: Some(commitment),
            extension: Some(bytes_to_hex_string(&extension)),
        };
        let report = salt_report(&args).unwrap();
        assert_eq!(report.commitment_matches, Some(true));
        assert_eq!(report.extension_matches, Some(true));

        let args = InspectSaltArgs {
            salt,
            commitment: Some(commitment + U256::from(1u8)),
            extension: Some(bytes_to_hex_string(&extension[1..])),
        };
        let report = salt_report(&args).unwrap();
        assert_eq!(report.commitment_matches, Some(false));
        assert_eq!(report.extension_matches, Some(false));
    }

    #[tokio::test]
    async fn test_proof_from_order_matches_calldata() {
        let signer = LocalOrderSigner::random();
        let file = saved_order(&signer, true).await;

        let from_order =
            proof_report(&DecodeProofArgs { calldata: None, order: Some(file.path().into()) })
                .unwrap();
        assert_eq!(from_order.verifier, Some(Address::repeat_byte(0x22)));

        let proof = mock_proof(&circuit_inputs(&order_params(signer.address()), &secret_params()));
        let hex = bytes_to_hex_string(&verifier_calldata(&proof).unwrap());
        let from_calldata =
            proof_report(&DecodeProofArgs { calldata: Some(hex), order: None }).unwrap();

        assert_eq!(from_calldata.public_signals, from_order.public_signals);
        assert_eq!(from_calldata.commitment, secret_params().commitment().unwrap());
        assert!(from_calldata.valid);
    }
}
