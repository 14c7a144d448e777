//! Packs a truncated commitment and an extension hash into an order salt
//!
//! Layout: bits `[255:160]` hold the low 96 bits of the commitment, bits
//! `[159:0]` hold the extension hash the protocol checks against the order's
//! extension

use alloy_primitives::{U256, keccak256};
use common::types::PackedSaltData;
use constants::{SALT_COMMITMENT_BITS, SALT_EXTENSION_HASH_BITS};

use crate::errors::SaltError;

/// A mask over the low `bits` bits of a word
fn low_mask(bits: usize) -> U256 {
    (U256::from(1u8) << bits) - U256::from(1u8)
}

/// Truncate a commitment to the bits the salt can carry
pub fn truncate_commitment(commitment: U256) -> U256 {
    commitment & low_mask(SALT_COMMITMENT_BITS)
}

/// Hash an extension the way the protocol does, `keccak256(bytes) mod 2^160`
pub fn extension_hash(extension: &[u8]) -> U256 {
    U256::from_be_bytes(keccak256(extension).0) & low_mask(SALT_EXTENSION_HASH_BITS)
}

/// Pack a commitment and an extension hash into a salt
///
/// The commitment is truncated silently; an extension hash wider than 160
/// bits is rejected
pub fn pack(commitment: U256, extension_hash: U256) -> Result<U256, SaltError> {
    if extension_hash > low_mask(SALT_EXTENSION_HASH_BITS) {
        return Err(SaltError::ExtensionHashTooLarge(extension_hash));
    }

    let high = truncate_commitment(commitment) << SALT_EXTENSION_HASH_BITS;
    Ok(high | extension_hash)
}

/// Split a salt into its truncated commitment and extension hash
pub fn unpack(salt: U256) -> (U256, U256) {
    let truncated = salt >> SALT_EXTENSION_HASH_BITS;
    let ext_hash = salt & low_mask(SALT_EXTENSION_HASH_BITS);
    (truncated, ext_hash)
}

/// Check that packing then unpacking recovers the truncated commitment and the
/// extension hash
pub fn verify_round_trip(commitment: U256, extension_hash: U256) -> bool {
    match pack(commitment, extension_hash) {
        Ok(salt) => unpack(salt) == (truncate_commitment(commitment), extension_hash),
        Err(_) => false,
    }
}

/// Build the salt for an order carrying the given extension
pub fn create_from_extension_bytes(
    commitment: U256,
    extension: &[u8],
) -> Result<PackedSaltData, SaltError> {
    let ext_hash = extension_hash(extension);
    let salt = pack(commitment, ext_hash)?;

    Ok(PackedSaltData {
        salt,
        commitment,
        truncated_commitment: truncate_commitment(commitment),
        extension_hash: ext_hash,
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::uint;
    use rand::{RngCore, thread_rng};

    use super::*;

    /// Sample a random word
    fn random_u256() -> U256 {
        let mut bytes = [0u8; 32];
        thread_rng().fill_bytes(&mut bytes);
        U256::from_be_bytes(bytes)
    }

    #[test]
    fn test_round_trip_random() {
        for _ in 0..32 {
            let commitment = random_u256();
            let ext_hash = random_u256() & low_mask(SALT_EXTENSION_HASH_BITS);

            let salt = pack(commitment, ext_hash).unwrap();
            let (truncated, recovered_hash) = unpack(salt);
            assert_eq!(truncated, commitment % (U256::from(1u8) << 96));
            assert_eq!(recovered_hash, ext_hash);
            assert!(verify_round_trip(commitment, ext_hash));
        }
    }

    #[test]
    fn test_truncation_only_keeps_low_bits() {
        let low = uint!(0xabcdef_U256);
        let a = low | (U256::from(1u8) << 200);
        let b = low | (U256::from(7u8) << 120);
        assert_eq!(truncate_commitment(a), truncate_commitment(b));
        assert_eq!(truncate_commitment(a), low);
    }

    #[test]
    fn test_rejects_wide_extension_hash() {
        let too_large = U256::from(1u8) << 160;
        let err = pack(U256::from(1u8), too_large).unwrap_err();
        assert_eq!(err, SaltError::ExtensionHashTooLarge(too_large));
        assert!(!verify_round_trip(U256::from(1u8), too_large));

        let max = too_large - U256::from(1u8);
        assert!(pack(U256::from(1u8), max).is_ok());
    }

    #[test]
    fn test_create_from_extension_bytes() {
        let commitment = random_u256();
        let data = create_from_extension_bytes(commitment, b"some extension").unwrap();

        assert_eq!(data.extension_hash, extension_hash(b"some extension"));
        assert_eq!(data.salt, pack(commitment, data.extension_hash).unwrap());
        assert_eq!(data.commitment, commitment);
        assert!(data.extension_hash < (U256::from(1u8) << 160));
        assert_eq!(unpack(data.salt), (data.truncated_commitment, data.extension_hash));
    }
}
