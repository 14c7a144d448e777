//! Groth16 proof types in the shape emitted by snarkjs

use alloy_primitives::U256;
use constants::{
    NUM_PUBLIC_SIGNALS, SIGNAL_COMMITMENT_IDX, SIGNAL_NONCE_IDX, SIGNAL_OFFERED_AMOUNT_IDX,
    SIGNAL_OFFERED_PRICE_IDX, SIGNAL_VALID_IDX,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use util::hex::u256_from_str;

use crate::errors::ProofError;

// ----------
// | Points |
// ----------

/// An affine point in G1
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct G1Point {
    /// The x coordinate
    pub x: U256,
    /// The y coordinate
    pub y: U256,
}

/// An affine point in G2
///
/// Each coordinate is an element of the quadratic extension, stored in the
/// snarkjs order `[c0, c1]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct G2Point {
    /// The x coordinate
    pub x: [U256; 2],
    /// The y coordinate
    pub y: [U256; 2],
}

/// A Groth16 proof
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    /// The `A` element of the proof
    pub a: G1Point,
    /// The `B` element of the proof
    pub b: G2Point,
    /// The `C` element of the proof
    pub c: G1Point,
}

/// The proof points in the layout the Solidity verifier decodes
pub type VerifierPoints = ([U256; 2], [[U256; 2]; 2], [U256; 2]);

impl Groth16Proof {
    /// Arrange the proof points as the verifier expects them
    ///
    /// The verifier's precompile input orders each G2 coordinate as
    /// `[c1, c0]`, the reverse of the snarkjs JSON order
    pub fn to_verifier_layout(&self) -> VerifierPoints {
        let a = [self.a.x, self.a.y];
        let b = [[self.b.x[1], self.b.x[0]], [self.b.y[1], self.b.y[0]]];
        let c = [self.c.x, self.c.y];
        (a, b, c)
    }

    /// Rebuild a proof from the verifier layout
    pub fn from_verifier_layout(points: VerifierPoints) -> Self {
        let (a, b, c) = points;
        Self {
            a: G1Point { x: a[0], y: a[1] },
            b: G2Point { x: [b[0][1], b[0][0]], y: [b[1][1], b[1][0]] },
            c: G1Point { x: c[0], y: c[1] },
        }
    }
}

// ------------------
// | Public Signals |
// ------------------

/// The ordered public outputs of the threshold circuit:
/// `[valid, commit, nonce, offered_price, offered_amount]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignals(pub [U256; NUM_PUBLIC_SIGNALS]);

impl PublicSignals {
    /// Constructor
    pub fn new(
        valid: bool,
        commitment: U256,
        nonce: U256,
        offered_price: U256,
        offered_amount: U256,
    ) -> Self {
        let mut signals = [U256::ZERO; NUM_PUBLIC_SIGNALS];
        signals[SIGNAL_VALID_IDX] = U256::from(valid as u8);
        signals[SIGNAL_COMMITMENT_IDX] = commitment;
        signals[SIGNAL_NONCE_IDX] = nonce;
        signals[SIGNAL_OFFERED_PRICE_IDX] = offered_price;
        signals[SIGNAL_OFFERED_AMOUNT_IDX] = offered_amount;
        Self(signals)
    }

    /// Build the signals from a slice, checking the element count
    pub fn from_slice(signals: &[U256]) -> Result<Self, ProofError> {
        let arr: [U256; NUM_PUBLIC_SIGNALS] = signals.try_into().map_err(|_| {
            ProofError::WrongSignalCount { expected: NUM_PUBLIC_SIGNALS, actual: signals.len() }
        })?;
        Ok(Self(arr))
    }

    /// Whether the circuit attested that the offer satisfies the thresholds
    pub fn is_valid(&self) -> bool {
        self.0[SIGNAL_VALID_IDX] == U256::from(1u8)
    }

    /// The raw validity flag
    pub fn validity_flag(&self) -> U256 {
        self.0[SIGNAL_VALID_IDX]
    }

    /// The commitment the proof was generated against
    pub fn commitment(&self) -> U256 {
        self.0[SIGNAL_COMMITMENT_IDX]
    }

    /// The nonce bound into the commitment
    pub fn nonce(&self) -> U256 {
        self.0[SIGNAL_NONCE_IDX]
    }

    /// The offered price, scaled by `1e18`
    pub fn offered_price(&self) -> U256 {
        self.0[SIGNAL_OFFERED_PRICE_IDX]
    }

    /// The offered amount
    pub fn offered_amount(&self) -> U256 {
        self.0[SIGNAL_OFFERED_AMOUNT_IDX]
    }
}

/// A proof together with its public signals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof {
    /// The Groth16 proof
    pub proof: Groth16Proof,
    /// The public signals the proof attests to
    pub public_signals: PublicSignals,
}

impl ZkProof {
    /// Parse a proof from the `proof.json` and `public.json` files written by
    /// snarkjs
    pub fn from_snarkjs_json(proof_json: &str, signals_json: &str) -> Result<Self, ProofError> {
        let raw: SnarkjsProof =
            serde_json::from_str(proof_json).map_err(ProofError::malformed_json)?;
        let raw_signals: Vec<String> =
            serde_json::from_str(signals_json).map_err(ProofError::malformed_json)?;

        let proof = Groth16Proof::try_from(&raw)?;
        let signals = raw_signals.iter().map(|s| parse_word(s)).collect::<Result<Vec<_>, _>>()?;
        let public_signals = PublicSignals::from_slice(&signals)?;

        Ok(Self { proof, public_signals })
    }
}

// -----------------
// | snarkjs Types |
// -----------------

/// The JSON proof object written by `snarkjs groth16 prove`
///
/// Points are in projective form with decimal string coordinates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarkjsProof {
    /// The `A` point, `[x, y, z]`
    pub pi_a: Vec<String>,
    /// The `B` point, `[[x0, x1], [y0, y1], [z0, z1]]`
    pub pi_b: Vec<Vec<String>>,
    /// The `C` point, `[x, y, z]`
    pub pi_c: Vec<String>,
    /// The proof system name
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// The curve name
    #[serde(default = "default_curve")]
    pub curve: String,
}

/// The protocol name snarkjs writes for Groth16 proofs
fn default_protocol() -> String {
    "groth16".to_string()
}

/// The curve name snarkjs writes for BN254
fn default_curve() -> String {
    "bn128".to_string()
}

/// Parse a decimal or hex word
fn parse_word(s: &str) -> Result<U256, ProofError> {
    u256_from_str(s).map_err(ProofError::malformed_json)
}

/// Parse the affine part of a G1 point
fn parse_g1(coords: &[String], name: &str) -> Result<G1Point, ProofError> {
    if coords.len() < 2 {
        return Err(ProofError::malformed_json(format!("{name} needs at least two coordinates")));
    }

    Ok(G1Point { x: parse_word(&coords[0])?, y: parse_word(&coords[1])? })
}

/// Parse the affine part of a G2 point
fn parse_g2(coords: &[Vec<String>], name: &str) -> Result<G2Point, ProofError> {
    if coords.len() < 2 || coords[..2].iter().any(|c| c.len() != 2) {
        return Err(ProofError::malformed_json(format!("{name} needs two coordinate pairs")));
    }

    let x = [parse_word(&coords[0][0])?, parse_word(&coords[0][1])?];
    let y = [parse_word(&coords[1][0])?, parse_word(&coords[1][1])?];
    Ok(G2Point { x, y })
}

impl TryFrom<&SnarkjsProof> for Groth16Proof {
    type Error = ProofError;

    fn try_from(raw: &SnarkjsProof) -> Result<Self, Self::Error> {
        if raw.protocol != "groth16" {
            return Err(ProofError::malformed_json(format!(
                "unsupported protocol `{}`",
                raw.protocol
            )));
        }

        Ok(Self {
            a: parse_g1(&raw.pi_a, "pi_a")?,
            b: parse_g2(&raw.pi_b, "pi_b")?,
            c: parse_g1(&raw.pi_c, "pi_c")?,
        })
    }
}

impl From<&Groth16Proof> for SnarkjsProof {
    fn from(proof: &Groth16Proof) -> Self {
        let g1 = |p: &G1Point| vec![p.x.to_string(), p.y.to_string(), "1".to_string()];
        Self {
            pi_a: g1(&proof.a),
            pi_b: vec![
                vec![proof.b.x[0].to_string(), proof.b.x[1].to_string()],
                vec![proof.b.y[0].to_string(), proof.b.y[1].to_string()],
                vec!["1".to_string(), "0".to_string()],
            ],
            pi_c: g1(&proof.c),
            protocol: default_protocol(),
            curve: default_curve(),
        }
    }
}

// ------------------
// | Circuit Inputs |
// ------------------

/// The witness and public inputs handed to the proving backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitInputs {
    /// The maker's secret minimum price, scaled by `1e18`
    pub secret_price: U256,
    /// The maker's secret minimum amount
    pub secret_amount: U256,
    /// The nonce bound into the commitment
    pub nonce: U256,
    /// The public commitment to the secret parameters
    pub commit: U256,
    /// The price offered by the fill, scaled by `1e18`
    pub offered_price: U256,
    /// The amount offered by the fill
    pub offered_amount: U256,
}

impl CircuitInputs {
    /// Render the inputs as a snarkjs `input.json` object with decimal strings
    pub fn to_snarkjs_input(&self) -> serde_json::Value {
        json!({
            "secretPrice": self.secret_price.to_string(),
            "secretAmount": self.secret_amount.to_string(),
            "nonce": self.nonce.to_string(),
            "commit": self.commit.to_string(),
            "offeredPrice": self.offered_price.to_string(),
            "offeredAmount": self.offered_amount.to_string(),
        })
    }
}
