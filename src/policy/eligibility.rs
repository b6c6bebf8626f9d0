//! Swap eligibility evaluation
//!
//! Purpose:
//!     Given the effective policy, the trader's last-swap timestamp for a
//!     pool, and a chain clock sample, decide whether a prospective swap of
//!     a given magnitude would pass the hook's checks right now.
//!
//! Two clocks are deliberately kept apart: allow/block verdicts are
//! computed against the chain timestamp captured at refresh, while the
//! cosmetic remaining-seconds countdown reads the continuously advancing
//! local clock. The two can drift; the verdict never follows the local one.
//!
//! All monetary and time arithmetic stays in U256/I256 — no float anywhere.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use alloy::primitives::{I256, U256};

use crate::types::EffectivePolicy;

/// Outcome of one eligibility evaluation. Pure data; embedded into the
/// refresh snapshot by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub amount_check: bool,
    pub cooldown_check: bool,
    pub next_allowed_timestamp: U256,
    pub allowed_now: bool,
}

/// Evaluate the hook's two checks for a prospective swap.
///
/// A zero `max_swap_abs` means unlimited, not zero-tolerance. The cooldown
/// check has three independent escapes: no cooldown configured, trader has
/// never swapped in this pool (timestamp 0), or the window already elapsed.
/// Total for well-typed inputs; the window end saturates rather than wraps.
pub fn evaluate(
    effective: &EffectivePolicy,
    last_swap_timestamp: U256,
    chain_timestamp: U256,
    test_amount_abs: U256,
) -> Eligibility {
    let amount_check =
        effective.max_swap_abs.is_zero() || test_amount_abs <= effective.max_swap_abs;

    let next_allowed_timestamp = last_swap_timestamp.saturating_add(effective.cooldown_seconds);

    let cooldown_check = effective.cooldown_seconds.is_zero()
        || last_swap_timestamp.is_zero()
        || chain_timestamp >= next_allowed_timestamp;

    Eligibility {
        amount_check,
        cooldown_check,
        next_allowed_timestamp,
        allowed_now: amount_check && cooldown_check,
    }
}

/// Seconds left in the cooldown window as of `local_now` — display value
/// only, recomputed on every render tick. Zero once the window has passed.
pub fn remaining_cooldown(next_allowed_timestamp: U256, local_now: U256) -> U256 {
    next_allowed_timestamp.saturating_sub(local_now)
}

/// Magnitude of a signed swap amount. Direction is not a risk dimension:
/// the sign is discarded before evaluation ever sees the value.
pub fn swap_amount_abs(amount_specified: I256) -> U256 {
    amount_specified.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PolicySource;

    fn policy(max_swap_abs: &str, cooldown_seconds: u64) -> EffectivePolicy {
        EffectivePolicy {
            max_swap_abs: max_swap_abs.parse().unwrap(),
            cooldown_seconds: U256::from(cooldown_seconds),
            source: PolicySource::CustomPolicy,
        }
    }

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        let effective = policy("0", 60);
        for amount in ["0", "1", "1000000000000000000", "115792089237316195423570985008687907853269984665640564039457584007913129639935"] {
            let result = evaluate(&effective, u(1000), u(1059), amount.parse().unwrap());
            assert!(result.amount_check, "amount {amount} must pass under zero limit");
        }
    }

    #[test]
    fn test_cooldown_boundary_is_inclusive() {
        // cooldown_check flips exactly at last + cooldown, not one second later
        let effective = policy("1000000000000000000", 60);
        for ts in 1000..1060u64 {
            let result = evaluate(&effective, u(1000), u(ts), u(1));
            assert!(!result.cooldown_check, "chain ts {ts} is inside the window");
        }
        for ts in [1060u64, 1061, 5000] {
            let result = evaluate(&effective, u(1000), u(ts), u(1));
            assert!(result.cooldown_check, "chain ts {ts} is past the window");
        }
    }

    #[test]
    fn test_never_swapped_escapes_cooldown() {
        let effective = policy("1000000000000000000", 86_400);
        let result = evaluate(&effective, U256::ZERO, U256::ZERO, u(1));
        assert!(result.cooldown_check);
        assert!(result.allowed_now);
    }

    #[test]
    fn test_no_cooldown_configured_escapes() {
        let effective = policy("1000000000000000000", 0);
        let result = evaluate(&effective, u(999_999_999), U256::ZERO, u(1));
        assert!(result.cooldown_check);
    }

    // Concrete scenarios: maxSwapAbs=1e18, cooldown=60s, last swap at t=1000.

    #[test]
    fn test_scenario_inside_window_blocks() {
        let effective = policy("1000000000000000000", 60);
        let result = evaluate(&effective, u(1000), u(1059), "500000000000000000".parse().unwrap());
        assert!(result.amount_check);
        assert!(!result.cooldown_check);
        assert!(!result.allowed_now);
        assert_eq!(result.next_allowed_timestamp, u(1060));
    }

    #[test]
    fn test_scenario_window_elapsed_allows() {
        let effective = policy("1000000000000000000", 60);
        let result = evaluate(&effective, u(1000), u(1060), "500000000000000000".parse().unwrap());
        assert!(result.amount_check);
        assert!(result.cooldown_check);
        assert!(result.allowed_now);
    }

    #[test]
    fn test_scenario_oversized_amount_blocks() {
        let effective = policy("1000000000000000000", 60);
        let result = evaluate(&effective, u(1000), u(1060), "2000000000000000000".parse().unwrap());
        assert!(!result.amount_check);
        assert!(result.cooldown_check);
        assert!(!result.allowed_now);
    }

    #[test]
    fn test_window_end_saturates() {
        let effective = EffectivePolicy {
            max_swap_abs: U256::ZERO,
            cooldown_seconds: U256::MAX,
            source: PolicySource::HookDefaults,
        };
        let result = evaluate(&effective, U256::MAX, u(5000), u(1));
        assert_eq!(result.next_allowed_timestamp, U256::MAX);
        assert!(!result.cooldown_check);
    }

    #[test]
    fn test_remaining_reads_local_clock_verdict_reads_chain() {
        // The two clocks have drifted: the chain says the window elapsed,
        // the local clock is 30s behind. The verdict must follow the chain
        // clock while the countdown follows the local one.
        let effective = policy("1000000000000000000", 60);
        let result = evaluate(&effective, u(1000), u(1060), u(1));
        assert!(result.allowed_now);

        let local_now = u(1030);
        assert_eq!(remaining_cooldown(result.next_allowed_timestamp, local_now), u(30));

        // Local clock ahead of the window: countdown is pinned at zero.
        assert_eq!(remaining_cooldown(result.next_allowed_timestamp, u(2000)), U256::ZERO);
    }

    #[test]
    fn test_swap_amount_abs_discards_sign() {
        let exact_input: I256 = "-100000000000000000".parse().unwrap();
        assert_eq!(swap_amount_abs(exact_input), "100000000000000000".parse::<U256>().unwrap());
        let exact_output: I256 = "100000000000000000".parse().unwrap();
        assert_eq!(swap_amount_abs(exact_output), "100000000000000000".parse::<U256>().unwrap());
        assert_eq!(swap_amount_abs(I256::ZERO), U256::ZERO);
    }
}
