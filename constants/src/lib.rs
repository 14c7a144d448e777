//! Defines system-wide constants for hidden-threshold order construction

#![deny(unsafe_code)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(missing_docs)]

use alloy_primitives::{U256, uint};

// ------------------------------------
// | System Specific Type Definitions |
// ------------------------------------

/// The scalar field the curve is defined over
pub type ScalarField = ark_bn254::Fr;

/// The order of the BN254 scalar field, i.e. the circuit prime
pub const SCALAR_FIELD_MODULUS: U256 =
    uint!(21888242871839275222246405745257275088548364400416034343698204186575808495617_U256);

/// The order of the BN254 base field, bounds the coordinates of proof points
pub const BASE_FIELD_MODULUS: U256 =
    uint!(21888242871839275222246405745257275088696311157297823662689037894645226208583_U256);

/// The order of the secp256k1 group that order signatures are produced over
pub const SECP256K1_ORDER: U256 =
    uint!(115792089237316195423570985008687907852837564279074904382605163141518161494337_U256);

// ---------------
// | Salt Layout |
// ---------------

/// The number of high bits of the salt holding the truncated commitment
pub const SALT_COMMITMENT_BITS: usize = 96;

/// The number of low bits of the salt holding the extension hash
pub const SALT_EXTENSION_HASH_BITS: usize = 160;

// ---------------------
// | Verifier Contract |
// ---------------------

/// The selector of `predicate(bytes)` on the predicate verifier contract
pub const PREDICATE_SELECTOR: [u8; 4] = [0x6f, 0xe7, 0xb0, 0xba];

/// The number of public signals the circuit exposes
pub const NUM_PUBLIC_SIGNALS: usize = 5;

/// The number of 32-byte words in the verifier input:
/// `pA[2] + pB[2][2] + pC[2] + signals[5]`
pub const VERIFIER_INPUT_WORDS: usize = 2 + 4 + 2 + NUM_PUBLIC_SIGNALS;

/// The byte length of the ABI encoded verifier input
pub const VERIFIER_INPUT_LEN: usize = VERIFIER_INPUT_WORDS * 32;

/// Index of the validity flag in the public signals
pub const SIGNAL_VALID_IDX: usize = 0;
/// Index of the commitment in the public signals
pub const SIGNAL_COMMITMENT_IDX: usize = 1;
/// Index of the nonce in the public signals
pub const SIGNAL_NONCE_IDX: usize = 2;
/// Index of the offered price in the public signals
pub const SIGNAL_OFFERED_PRICE_IDX: usize = 3;
/// Index of the offered amount in the public signals
pub const SIGNAL_OFFERED_AMOUNT_IDX: usize = 4;

// -----------
// | Pricing |
// -----------

/// The fixed point scale applied to offered prices, `1e18`
pub const PRICE_SCALE: U256 = uint!(1000000000000000000_U256);

/// The denominator of a basis point quantity
pub const BPS_DENOMINATOR: u64 = 10_000;

// -------------
// | Gas Model |
// -------------

/// The base cost of a Groth16 verification inside a predicate
pub const BASE_VERIFICATION_GAS: u64 = 250_000;

/// The calldata cost charged per byte of predicate calldata
pub const CALLDATA_GAS_PER_BYTE: u64 = 12;

/// The surcharge for each predicate beyond the first in a joined expression
pub const ADDITIONAL_PREDICATE_GAS: u64 = 30_000;

/// The fixed overhead of evaluating a predicate in the host protocol
pub const PREDICATE_OVERHEAD_GAS: u64 = 5_000;

/// Gas overhead below this percentage is classified as efficient
pub const GAS_OVERHEAD_EFFICIENT_PCT: u64 = 20;

/// Gas overhead below this percentage is classified as acceptable
pub const GAS_OVERHEAD_ACCEPTABLE_PCT: u64 = 50;

// ---------------------
// | Taker Evaluation |
// ---------------------

/// The window before expiration in which a taker is warned
pub const DEADLINE_WARNING_WINDOW_SECS: u64 = 5 * 60;

/// The window before expiration in which the warning escalates
pub const DEADLINE_CRITICAL_WINDOW_SECS: u64 = 60;

/// Fills smaller than this fraction of the making amount are flagged as tiny
pub const TINY_FILL_BPS: u64 = 100;

/// Slippage tolerances above this value are flagged
pub const MAX_SLIPPAGE_BPS: u64 = 300;

/// The default timeout for a single read-only chain query
pub const DEFAULT_CHAIN_QUERY_TIMEOUT_MS: u64 = 5_000;

/// The highest address occupied by an EVM precompile
pub const MAX_PRECOMPILE_ADDRESS: u64 = 0x11;

// ------------------
// | Order Signing |
// ------------------

/// The default EIP-712 domain name of the host protocol
pub const DEFAULT_DOMAIN_NAME: &str = "1inch Aggregation Router";

/// The default EIP-712 domain version of the host protocol
pub const DEFAULT_DOMAIN_VERSION: &str = "6";
