//! The host protocol's packed maker and taker trait words

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::errors::PredicateError;

// ----------------
// | Maker Traits |
// ----------------

/// The maker does not allow partial fills
pub const NO_PARTIAL_FILLS_FLAG: usize = 255;
/// The order may be filled more than once
pub const ALLOW_MULTIPLE_FILLS_FLAG: usize = 254;
/// A pre-interaction call is attached
pub const PRE_INTERACTION_CALL_FLAG: usize = 252;
/// A post-interaction call is attached
pub const POST_INTERACTION_CALL_FLAG: usize = 251;
/// The nonce field is checked against the epoch manager
pub const NEED_CHECK_EPOCH_MANAGER_FLAG: usize = 250;
/// The order carries an extension bound by the salt
pub const HAS_EXTENSION_FLAG: usize = 249;
/// The maker asset is pulled through permit2
pub const USE_PERMIT2_FLAG: usize = 248;
/// Received WETH is unwrapped for the maker
pub const UNWRAP_WETH_FLAG: usize = 247;

/// The bit offset and width of the allowed sender's low bytes
const ALLOWED_SENDER: (usize, usize) = (0, 80);
/// The bit offset and width of the expiration timestamp
const EXPIRATION: (usize, usize) = (80, 40);
/// The bit offset and width of the nonce or epoch
const NONCE_OR_EPOCH: (usize, usize) = (120, 40);
/// The bit offset and width of the series
const SERIES: (usize, usize) = (160, 40);

/// A mask over the low `bits` bits
fn mask(bits: usize) -> U256 {
    (U256::from(1u8) << bits) - U256::from(1u8)
}

/// Read a packed field
fn read_field(word: U256, (offset, width): (usize, usize)) -> U256 {
    (word >> offset) & mask(width)
}

/// Overwrite a packed field, truncating the value to the field width
fn write_field(word: U256, (offset, width): (usize, usize), value: U256) -> U256 {
    let cleared = word & !(mask(width) << offset);
    cleared | ((value & mask(width)) << offset)
}

/// The maker's packed order flags and limits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerTraits(pub U256);

impl MakerTraits {
    /// Traits with no flags and no limits
    pub fn new() -> Self {
        Self(U256::ZERO)
    }

    /// Set a flag bit
    pub fn with_flag(self, bit: usize) -> Self {
        Self(self.0 | (U256::from(1u8) << bit))
    }

    /// Whether a flag bit is set
    pub fn has_flag(&self, bit: usize) -> bool {
        self.0.bit(bit)
    }

    /// Restrict the order to a single taker, matched on the low 80 bits of
    /// its address
    pub fn with_allowed_sender(self, sender: Address) -> Self {
        let value = U256::from_be_slice(sender.as_slice());
        Self(write_field(self.0, ALLOWED_SENDER, value))
    }

    /// Set the expiration timestamp, zero meaning no expiration
    pub fn with_expiration(self, timestamp: u64) -> Self {
        Self(write_field(self.0, EXPIRATION, U256::from(timestamp)))
    }

    /// Set the nonce or epoch
    pub fn with_nonce_or_epoch(self, nonce: u64) -> Self {
        Self(write_field(self.0, NONCE_OR_EPOCH, U256::from(nonce)))
    }

    /// Set the series
    pub fn with_series(self, series: u64) -> Self {
        Self(write_field(self.0, SERIES, U256::from(series)))
    }

    /// The expiration timestamp, if one is set
    pub fn expiration(&self) -> Option<u64> {
        let exp = read_field(self.0, EXPIRATION).to::<u64>();
        (exp != 0).then_some(exp)
    }

    /// The nonce or epoch
    pub fn nonce_or_epoch(&self) -> u64 {
        read_field(self.0, NONCE_OR_EPOCH).to::<u64>()
    }

    /// Whether the order carries an extension
    pub fn has_extension(&self) -> bool {
        self.has_flag(HAS_EXTENSION_FLAG)
    }

    /// Whether partial fills are allowed
    pub fn allow_partial_fills(&self) -> bool {
        !self.has_flag(NO_PARTIAL_FILLS_FLAG)
    }

    /// Whether the order has expired at the given timestamp
    ///
    /// An order is still fillable in the block whose timestamp equals its
    /// expiration
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration().is_some_and(|exp| exp < now)
    }
}

impl From<U256> for MakerTraits {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<MakerTraits> for U256 {
    fn from(traits: MakerTraits) -> Self {
        traits.0
    }
}

// ----------------
// | Taker Traits |
// ----------------

/// The fill amount is denominated in the maker asset
pub const MAKER_AMOUNT_FLAG: usize = 255;
/// Received WETH is unwrapped for the taker
pub const TAKER_UNWRAP_WETH_FLAG: usize = 254;
/// Skip the maker permit
pub const SKIP_ORDER_PERMIT_FLAG: usize = 253;
/// The taker asset is pulled through permit2
pub const TAKER_USE_PERMIT2_FLAG: usize = 252;
/// The args begin with the address receiving the maker asset
pub const ARGS_HAS_TARGET_FLAG: usize = 251;

/// The bit offset and width of the extension length in the args
const ARGS_EXTENSION_LENGTH: (usize, usize) = (224, 24);
/// The bit offset and width of the interaction length in the args
const ARGS_INTERACTION_LENGTH: (usize, usize) = (200, 24);
/// The bit width of the threshold amount
const THRESHOLD_BITS: usize = 185;

/// The taker's packed fill options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakerTraits(pub U256);

impl TakerTraits {
    /// Traits with no flags
    pub fn new() -> Self {
        Self(U256::ZERO)
    }

    /// Set a flag bit
    pub fn with_flag(self, bit: usize) -> Self {
        Self(self.0 | (U256::from(1u8) << bit))
    }

    /// Denominate the fill amount in the maker asset
    pub fn with_maker_amount(self) -> Self {
        self.with_flag(MAKER_AMOUNT_FLAG)
    }

    /// Bound the counter-amount of the fill
    ///
    /// With the maker amount flag set this is the most the taker pays,
    /// otherwise the least the taker receives
    pub fn with_threshold(self, threshold: U256) -> Self {
        Self(write_field(self.0, (0, THRESHOLD_BITS), threshold))
    }

    /// The threshold amount
    pub fn threshold(&self) -> U256 {
        read_field(self.0, (0, THRESHOLD_BITS))
    }

    /// Whether the fill amount is denominated in the maker asset
    pub fn is_making_amount(&self) -> bool {
        self.0.bit(MAKER_AMOUNT_FLAG)
    }

    /// The length of the extension carried in the args
    pub fn extension_length(&self) -> usize {
        read_field(self.0, ARGS_EXTENSION_LENGTH).to::<usize>()
    }

    /// The length of the interaction carried in the args
    pub fn interaction_length(&self) -> usize {
        read_field(self.0, ARGS_INTERACTION_LENGTH).to::<usize>()
    }

    /// Pack the fill args and record their layout in the traits
    ///
    /// The args are `[target] ++ extension ++ interaction`
    pub fn encode_args(
        self,
        target: Option<Address>,
        extension: &[u8],
        interaction: &[u8],
    ) -> Result<(Self, Bytes), PredicateError> {
        let max_len = mask(ARGS_EXTENSION_LENGTH.1);
        if U256::from(extension.len()) > max_len {
            return Err(PredicateError::TooLarge(extension.len()));
        }
        if U256::from(interaction.len()) > max_len {
            return Err(PredicateError::TooLarge(interaction.len()));
        }

        let mut traits = self.0;
        traits = write_field(traits, ARGS_EXTENSION_LENGTH, U256::from(extension.len()));
        traits = write_field(traits, ARGS_INTERACTION_LENGTH, U256::from(interaction.len()));

        let mut args = Vec::with_capacity(20 + extension.len() + interaction.len());
        if let Some(target) = target {
            traits |= U256::from(1u8) << ARGS_HAS_TARGET_FLAG;
            args.extend_from_slice(target.as_slice());
        }
        args.extend_from_slice(extension);
        args.extend_from_slice(interaction);

        Ok((Self(traits), Bytes::from(args)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maker_traits_fields() {
        let traits = MakerTraits::new()
            .with_expiration(1_700_000_000)
            .with_nonce_or_epoch(7)
            .with_flag(HAS_EXTENSION_FLAG)
            .with_flag(ALLOW_MULTIPLE_FILLS_FLAG);

        assert_eq!(traits.expiration(), Some(1_700_000_000));
        assert_eq!(traits.nonce_or_epoch(), 7);
        assert!(traits.has_extension());
        assert!(traits.allow_partial_fills());
        assert!(traits.is_expired(1_700_000_001));
        assert!(!traits.is_expired(1_700_000_000));
        assert!(!traits.is_expired(1_699_999_999));
        assert!(!MakerTraits::new().is_expired(u64::MAX));

        // The series occupies its own field
        let with_series = traits.with_series(3);
        assert_ne!(with_series.0, traits.0);
        assert_eq!(with_series.nonce_or_epoch(), 7);
        assert_eq!(with_series.expiration(), Some(1_700_000_000));
    }

    #[test]
    fn test_allowed_sender_low_bits() {
        let sender = Address::repeat_byte(0xab);
        let traits = MakerTraits::new().with_allowed_sender(sender);
        assert_eq!(traits.0, U256::from_be_slice(&[0xab; 10]));
    }

    #[test]
    fn test_taker_args_layout() {
        let target = Address::repeat_byte(0x11);
        let (traits, args) = TakerTraits::new()
            .with_maker_amount()
            .with_threshold(U256::from(1000u64))
            .encode_args(Some(target), &[1u8; 50], &[])
            .unwrap();

        assert!(traits.is_making_amount());
        assert!(traits.0.bit(ARGS_HAS_TARGET_FLAG));
        assert_eq!(traits.extension_length(), 50);
        assert_eq!(traits.interaction_length(), 0);
        assert_eq!(traits.threshold(), U256::from(1000u64));
        assert_eq!(args.len(), 70);
        assert_eq!(&args[..20], target.as_slice());
    }
}
