//! Core data model for the policy console
//!
//! Pure value types: registry/hook state as read from the ledger, the
//! derived effective policy, the eligibility snapshot published on each
//! refresh, and the unified timeline event record.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use alloy::primitives::{Address, B256, I256, U256};
use std::fmt;

pub use crate::contracts::PoolKey;

/// A trader's custom policy row as stored in the PolicyRegistry.
/// `exists == false` means no custom row; the hook-wide defaults apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub max_swap_abs: U256,
    pub cooldown_seconds: U256,
    pub exists: bool,
}

/// Hook-wide default limits, read from the UniswapExeGuard contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub max_swap_abs: U256,
    pub cooldown_seconds: U256,
}

/// Which data source produced the effective policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    CustomPolicy,
    HookDefaults,
}

impl fmt::Display for PolicySource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolicySource::CustomPolicy => write!(f, "custom-policy"),
            PolicySource::HookDefaults => write!(f, "hook-defaults"),
        }
    }
}

/// The policy actually in force for a trader — derived, never stored.
/// A custom row replaces both fields atomically; there is no per-field merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePolicy {
    pub max_swap_abs: U256,
    pub cooldown_seconds: U256,
    pub source: PolicySource,
}

/// Everything the operator sees after one refresh: the resolved policy,
/// the cooldown window, and the allow/block verdict for the test amount.
/// Replaced wholesale on the next refresh; the 1 Hz re-render only reads it.
#[derive(Debug, Clone)]
pub struct SwapEligibilitySnapshot {
    pub trader: Address,
    pub pool_id: B256,
    pub pool_key: PoolKey,
    pub effective: EffectivePolicy,
    /// Unix seconds of the trader's last swap in this pool; 0 = never.
    pub last_swap_timestamp: U256,
    pub next_allowed_timestamp: U256,
    /// Chain clock sampled at refresh time. Never advanced by the ticker.
    pub chain_timestamp: U256,
    pub test_amount_abs: U256,
    pub amount_check: bool,
    pub cooldown_check: bool,
    pub allowed_now: bool,
}

/// Historical event kinds emitted by the registry and the hook.
/// Closed set — adding a contract event means adding a variant here,
/// and the compiler flags every match that misses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PolicySet {
        trader: Address,
        max_swap_abs: U256,
        cooldown_seconds: U256,
    },
    PolicyCleared {
        trader: Address,
    },
    DefaultsUpdated {
        max_swap_abs: U256,
        cooldown_seconds: U256,
    },
    SwapAllowed {
        trader: Address,
        amount_specified: I256,
        max_swap_abs: U256,
        cooldown_seconds: U256,
    },
    SwapBlocked {
        trader: Address,
        reason: u8,
        amount_specified: I256,
    },
}

impl EventKind {
    /// Event name as emitted by the contract.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::PolicySet { .. } => "PolicySet",
            EventKind::PolicyCleared { .. } => "PolicyCleared",
            EventKind::DefaultsUpdated { .. } => "DefaultsUpdated",
            EventKind::SwapAllowed { .. } => "SwapAllowed",
            EventKind::SwapBlocked { .. } => "SwapBlocked",
        }
    }
}

/// One record in the merged registry+hook timeline, ordered by ledger
/// position (block number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub block: u64,
    pub kind: EventKind,
}

impl fmt::Display for TimelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "block {:>9} | {:<15} | ", self.block, self.kind.name())?;
        match &self.kind {
            EventKind::PolicySet { trader, max_swap_abs, cooldown_seconds } => {
                write!(f, "trader={} maxSwapAbs={} cooldownSeconds={}", trader, max_swap_abs, cooldown_seconds)
            }
            EventKind::PolicyCleared { trader } => write!(f, "trader={}", trader),
            EventKind::DefaultsUpdated { max_swap_abs, cooldown_seconds } => {
                write!(f, "maxSwapAbs={} cooldownSeconds={}", max_swap_abs, cooldown_seconds)
            }
            EventKind::SwapAllowed { trader, amount_specified, max_swap_abs, cooldown_seconds } => {
                write!(
                    f,
                    "trader={} amountSpecified={} maxSwapAbs={} cooldownSeconds={}",
                    trader, amount_specified, max_swap_abs, cooldown_seconds
                )
            }
            EventKind::SwapBlocked { trader, reason, amount_specified } => {
                write!(f, "trader={} reason={} amountSpecified={}", trader, reason, amount_specified)
            }
        }
    }
}
