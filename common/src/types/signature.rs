//! Compact order signatures in the host protocol's `(r, vs)` form

use alloy_primitives::{B256, U256};
use constants::SECP256K1_ORDER;
use serde::{Deserialize, Serialize};

/// The bit of `vs` holding the recovery parity
const PARITY_BIT: usize = 255;

/// An EIP-712 order signature
///
/// `vs` folds the recovery parity into the top bit of `s` (EIP-2098)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSignature {
    /// The `r` component
    pub r: B256,
    /// The `s` component with the parity in its high bit
    pub vs: B256,
    /// The 65-byte `r || s || v` signature as a hex string
    pub raw: String,
}

impl OrderSignature {
    /// Build the compact form from the signature components
    ///
    /// A high `s` is replaced by `n - s` with the parity flipped, which
    /// recovers the same signer and leaves the top bit of `s` free
    pub fn from_parts(r: U256, s: U256, y_parity: bool) -> Self {
        let (s, y_parity) = if s > SECP256K1_ORDER >> 1usize {
            (SECP256K1_ORDER - s, !y_parity)
        } else {
            (s, y_parity)
        };

        let vs = if y_parity { s | (U256::from(1u8) << PARITY_BIT) } else { s };
        let v = 27 + y_parity as u8;

        let mut raw = Vec::with_capacity(65);
        raw.extend_from_slice(&r.to_be_bytes::<32>());
        raw.extend_from_slice(&s.to_be_bytes::<32>());
        raw.push(v);

        Self {
            r: B256::from(r.to_be_bytes::<32>()),
            vs: B256::from(vs.to_be_bytes::<32>()),
            raw: format!("0x{}", alloy_primitives::hex::encode(raw)),
        }
    }

    /// Parse a 65-byte `r || s || v` signature as produced by wallets
    ///
    /// `v` may be given either as a parity bit or in its legacy `27 + parity`
    /// form
    pub fn from_raw(raw: &[u8]) -> Option<Self> {
        if raw.len() != 65 {
            return None;
        }

        let r = U256::from_be_slice(&raw[..32]);
        let s = U256::from_be_slice(&raw[32..64]);
        if s.is_zero() || s >= SECP256K1_ORDER {
            return None;
        }

        let y_parity = match raw[64] {
            0 | 27 => false,
            1 | 28 => true,
            _ => return None,
        };
        Some(Self::from_parts(r, s, y_parity))
    }

    /// The `s` component with the parity bit cleared
    pub fn s(&self) -> U256 {
        let vs = U256::from_be_bytes(self.vs.0);
        vs & !(U256::from(1u8) << PARITY_BIT)
    }

    /// The recovery parity
    pub fn y_parity(&self) -> bool {
        U256::from_be_bytes(self.vs.0).bit(PARITY_BIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_folding() {
        let r = U256::from(7u8);
        let s = U256::from(11u8);

        let even = OrderSignature::from_parts(r, s, false);
        assert_eq!(even.s(), s);
        assert!(!even.y_parity());
        assert!(even.raw.ends_with("1b"));

        let odd = OrderSignature::from_parts(r, s, true);
        assert_eq!(odd.s(), s);
        assert!(odd.y_parity());
        assert!(odd.raw.ends_with("1c"));
        assert_eq!(odd.raw.len(), 2 + 130);
    }

    #[test]
    fn test_from_raw() {
        let sig = OrderSignature::from_parts(U256::from(7u8), U256::from(11u8), true);
        let raw = alloy_primitives::hex::decode(&sig.raw).unwrap();
        assert_eq!(OrderSignature::from_raw(&raw), Some(sig));

        // Parity bit form of `v`
        let mut compact = raw.clone();
        compact[64] = 1;
        assert!(OrderSignature::from_raw(&compact).unwrap().y_parity());

        compact[64] = 5;
        assert_eq!(OrderSignature::from_raw(&compact), None);
        assert_eq!(OrderSignature::from_raw(&raw[..64]), None);

        // `s` outside the group
        let mut out_of_range = raw.clone();
        out_of_range[32..64].copy_from_slice(&SECP256K1_ORDER.to_be_bytes::<32>());
        assert_eq!(OrderSignature::from_raw(&out_of_range), None);
    }

    #[test]
    fn test_high_s_normalized() {
        let r = U256::from(7u8);
        let s = U256::from(11u8);
        let high = OrderSignature::from_parts(r, SECP256K1_ORDER - s, false);

        assert_eq!(high.s(), s);
        assert!(high.y_parity());
        assert_eq!(high, OrderSignature::from_parts(r, s, true));
    }
}
