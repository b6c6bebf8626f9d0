//! Pool identity — canonical token ordering and pool-id derivation
//!
//! A v4-style pool is keyed by (currency0, currency1, fee, tickSpacing,
//! hooks) with currency0 <= currency1 by address. The pool id is the
//! keccak256 of the key's ABI encoding, exactly as the ledger computes it.
//! Derivation here must match the hook's on-chain id or every
//! lastSwapTimestampByPool read silently targets the wrong slot.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use alloy::primitives::aliases::{I24, U24};
use alloy::primitives::{keccak256, Address, B256};
use alloy::sol_types::SolValue;

use crate::error::ConsoleError;
use crate::types::PoolKey;

/// Parse a textual address. The boundary where malformed operator input
/// is rejected; everything past this point works on typed addresses.
pub fn parse_address(s: &str) -> Result<Address, ConsoleError> {
    s.trim()
        .parse::<Address>()
        .map_err(|_| ConsoleError::InvalidAddress(s.trim().to_string()))
}

/// Order an unordered token pair into the canonical (low, high) tuple.
/// Byte order on the raw address equals case-folded hex order.
/// Identical inputs come back as (a, a) — a degenerate pool the caller
/// may reject.
pub fn canonicalize(a: Address, b: Address) -> (Address, Address) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Assemble a canonical pool key from unordered tokens and raw pool
/// parameters. Fields outside their on-chain widths fail here, before
/// any encoding happens.
pub fn build_pool_key(
    token_a: Address,
    token_b: Address,
    fee: u32,
    tick_spacing: i32,
    hooks: Address,
) -> Result<PoolKey, ConsoleError> {
    let fee = U24::try_from(fee)
        .map_err(|_| ConsoleError::Encoding(format!("fee {fee} does not fit uint24")))?;
    let tick_spacing = I24::try_from(tick_spacing).map_err(|_| {
        ConsoleError::Encoding(format!("tick spacing {tick_spacing} does not fit int24"))
    })?;

    let (currency0, currency1) = canonicalize(token_a, token_b);
    Ok(PoolKey {
        currency0,
        currency1,
        fee,
        tickSpacing: tick_spacing,
        hooks,
    })
}

impl PoolKey {
    /// Derive the canonical pool id: keccak256 over the key's ABI encoding
    /// (five 32-byte words). Deterministic; performs no normalization —
    /// the key is already canonical by construction.
    pub fn id(&self) -> B256 {
        keccak256(self.abi_encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const HOOK: &str = "0x00000000000000000000000000000000000000a0";

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    #[test]
    fn test_canonicalize_commutative() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        assert_eq!(canonicalize(a, b), canonicalize(b, a));
        assert_eq!(canonicalize(a, b), (b, a));
    }

    #[test]
    fn test_canonicalize_tie() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        assert_eq!(canonicalize(a, a), (a, a));
    }

    #[test]
    fn test_pool_id_order_independent() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        let hook = addr(HOOK);

        let key_ab = build_pool_key(a, b, 3000, 60, hook).unwrap();
        let key_ba = build_pool_key(b, a, 3000, 60, hook).unwrap();
        assert_eq!(key_ab, key_ba);
        assert_eq!(key_ab.id(), key_ba.id());
    }

    #[test]
    fn test_pool_id_sensitive_to_fee() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        let hook = addr(HOOK);

        let id_3000 = build_pool_key(a, b, 3000, 60, hook).unwrap().id();
        let id_500 = build_pool_key(a, b, 500, 60, hook).unwrap().id();
        assert_ne!(id_3000, id_500);
    }

    #[test]
    fn test_encoding_is_five_static_words() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        let key = build_pool_key(a, b, 3000, 60, addr(HOOK)).unwrap();
        assert_eq!(key.abi_encode().len(), 160);
    }

    #[test]
    fn test_negative_tick_spacing_allowed() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        let key = build_pool_key(a, b, 3000, -60, addr(HOOK)).unwrap();
        assert_eq!(i32::try_from(key.tickSpacing).unwrap(), -60);
    }

    #[test]
    fn test_fee_width_rejected() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        let err = build_pool_key(a, b, 1 << 24, 60, addr(HOOK)).unwrap_err();
        assert!(matches!(err, ConsoleError::Encoding(_)));
    }

    #[test]
    fn test_tick_spacing_width_rejected() {
        let a = addr("0x00000000000000000000000000000000000000aa");
        let b = addr("0x0000000000000000000000000000000000000011");
        for bad in [1 << 23, -(1 << 23) - 1] {
            let err = build_pool_key(a, b, 3000, bad, addr(HOOK)).unwrap_err();
            assert!(matches!(err, ConsoleError::Encoding(_)));
        }
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for bad in ["", "0x123", "not-an-address", "0xzz00000000000000000000000000000000000000"] {
            assert!(matches!(parse_address(bad), Err(ConsoleError::InvalidAddress(_))));
        }
    }

    #[test]
    fn test_parse_address_trims_whitespace() {
        let parsed = parse_address("  0x00000000000000000000000000000000000000aa ").unwrap();
        assert_eq!(parsed, addr("0x00000000000000000000000000000000000000aa"));
    }
}
