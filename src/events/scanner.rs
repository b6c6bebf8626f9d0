//! Event scanner — pulls registry + hook histories over a block range
//!
//! Purpose:
//!     Issues the five eth_getLogs queries (PolicySet / PolicyCleared on
//!     the registry, DefaultsUpdated / SwapAllowed / SwapBlocked on the
//!     hook) concurrently over a [from, to] range, decodes each batch into
//!     uniform timeline records, and returns the merged timeline.
//!
//! Malformed logs are skipped with a warning rather than failing the
//! scan; a transport failure on any query fails the whole scan.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use tracing::warn;

use crate::contracts::{IPolicyRegistry, IUniswapExeGuard};
use crate::error::ConsoleError;
use crate::events::timeline::merge;
use crate::types::{EventKind, TimelineEvent};

/// Read-only scanner over the registry and hook event histories.
pub struct EventScanner<P> {
    provider: P,
    registry: Address,
    hook: Address,
}

impl<P: Provider> EventScanner<P> {
    pub fn new(provider: P, registry: Address, hook: Address) -> Self {
        Self {
            provider,
            registry,
            hook,
        }
    }

    /// Fetch all five event kinds over `[from_block, to_block]` and merge
    /// them into one block-ordered timeline.
    pub async fn load_timeline(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TimelineEvent>, ConsoleError> {
        let (policy_set, policy_cleared, defaults_updated, swap_allowed, swap_blocked) = tokio::try_join!(
            self.fetch::<IPolicyRegistry::PolicySet, _>(self.registry, from_block, to_block, |e| {
                EventKind::PolicySet {
                    trader: e.trader,
                    max_swap_abs: e.maxSwapAbs,
                    cooldown_seconds: e.cooldownSeconds,
                }
            }),
            self.fetch::<IPolicyRegistry::PolicyCleared, _>(self.registry, from_block, to_block, |e| {
                EventKind::PolicyCleared { trader: e.trader }
            }),
            self.fetch::<IUniswapExeGuard::DefaultsUpdated, _>(self.hook, from_block, to_block, |e| {
                EventKind::DefaultsUpdated {
                    max_swap_abs: e.defaultMaxSwapAbs,
                    cooldown_seconds: e.defaultCooldownSeconds,
                }
            }),
            self.fetch::<IUniswapExeGuard::SwapAllowed, _>(self.hook, from_block, to_block, |e| {
                EventKind::SwapAllowed {
                    trader: e.trader,
                    amount_specified: e.amountSpecified,
                    max_swap_abs: e.maxSwapAbs,
                    cooldown_seconds: e.cooldownSeconds,
                }
            }),
            self.fetch::<IUniswapExeGuard::SwapBlocked, _>(self.hook, from_block, to_block, |e| {
                EventKind::SwapBlocked {
                    trader: e.trader,
                    reason: e.reason,
                    amount_specified: e.amountSpecified,
                }
            }),
        )?;

        Ok(merge([
            policy_set,
            policy_cleared,
            defaults_updated,
            swap_allowed,
            swap_blocked,
        ]))
    }

    async fn fetch<E, F>(
        &self,
        source: Address,
        from_block: u64,
        to_block: u64,
        to_kind: F,
    ) -> Result<Vec<TimelineEvent>, ConsoleError>
    where
        E: SolEvent,
        F: Fn(E) -> EventKind,
    {
        let filter = Filter::new()
            .address(source)
            .event_signature(E::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(ConsoleError::transport)?;

        Ok(decode_logs(logs, to_kind))
    }
}

/// Decode one source's raw logs into timeline records, preserving the
/// source's delivery order. Undecodable or positionless logs are skipped.
fn decode_logs<E, F>(logs: Vec<Log>, to_kind: F) -> Vec<TimelineEvent>
where
    E: SolEvent,
    F: Fn(E) -> EventKind,
{
    let mut events = Vec::with_capacity(logs.len());
    for log in logs {
        let Some(block) = log.block_number else {
            warn!("{} log without block number — skipping", E::SIGNATURE);
            continue;
        };
        match log.log_decode::<E>() {
            Ok(decoded) => events.push(TimelineEvent {
                block,
                kind: to_kind(decoded.inner.data),
            }),
            Err(err) => warn!("malformed {} log at block {}: {} — skipping", E::SIGNATURE, block, err),
        }
    }
    events
}
