//! Policy state monitor — refresh orchestration and snapshot rendering
//!
//! Purpose:
//!     Drives one eligibility evaluation end to end: derive the pool id,
//!     issue the four ledger reads concurrently, resolve the effective
//!     policy, evaluate the checks, and publish the snapshot. A 1 Hz
//!     ticker re-renders the latest snapshot with a live local-clock
//!     countdown; it never re-fetches and never mutates snapshot fields.
//!
//! Concurrency notes:
//!     - All four reads must succeed or the refresh fails whole; a failed
//!       refresh leaves the previously published snapshot untouched.
//!     - Overlapping refreshes are not guarded against: whichever set of
//!       fetches completes last wins the snapshot slot, even if it was
//!       issued first. Inherited behavior, documented by a test below
//!       rather than silently changed.
//!
//! Author: AI-Generated
//! Created: 2026-08-05

use std::sync::{Mutex, PoisonError};

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::chain::reader::StateReader;
use crate::error::ConsoleError;
use crate::policy::eligibility::{evaluate, remaining_cooldown};
use crate::policy::resolver::resolve;
use crate::types::{PoolKey, SwapEligibilitySnapshot};

/// Inputs for one refresh: who, which pool, and the magnitude to test.
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub trader: Address,
    pub pool_key: PoolKey,
    pub test_amount_abs: U256,
}

/// Holds the latest published snapshot and the reader used to refresh it.
pub struct PolicyStateMonitor<R> {
    reader: R,
    snapshot: Mutex<Option<SwapEligibilitySnapshot>>,
}

impl<R: StateReader> PolicyStateMonitor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            snapshot: Mutex::new(None),
        }
    }

    /// Run one full evaluation cycle and publish the result.
    pub async fn refresh(
        &self,
        request: &RefreshRequest,
    ) -> Result<SwapEligibilitySnapshot, ConsoleError> {
        let pool_id = request.pool_key.id();

        // Independent reads, issued together; any failure fails the cycle
        // before anything is published.
        let (custom, defaults, last_swap_timestamp, chain_timestamp) = tokio::try_join!(
            self.reader.custom_policy(request.trader),
            self.reader.hook_defaults(),
            self.reader.last_swap_timestamp(request.trader, pool_id),
            self.reader.chain_timestamp(),
        )?;

        let effective = resolve(&custom, &defaults);
        let verdict = evaluate(
            &effective,
            last_swap_timestamp,
            chain_timestamp,
            request.test_amount_abs,
        );

        let snapshot = SwapEligibilitySnapshot {
            trader: request.trader,
            pool_id,
            pool_key: request.pool_key.clone(),
            effective,
            last_swap_timestamp,
            next_allowed_timestamp: verdict.next_allowed_timestamp,
            chain_timestamp,
            test_amount_abs: request.test_amount_abs,
            amount_check: verdict.amount_check,
            cooldown_check: verdict.cooldown_check,
            allowed_now: verdict.allowed_now,
        };

        info!(
            "policy state refreshed: trader={} source={} allowedNow={}",
            snapshot.trader, snapshot.effective.source, snapshot.allowed_now
        );

        let mut slot = self.lock_snapshot();
        *slot = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// The most recently published snapshot, if any refresh has succeeded.
    pub fn snapshot(&self) -> Option<SwapEligibilitySnapshot> {
        self.lock_snapshot().clone()
    }

    /// Render the latest snapshot against `local_now`. Read-only: the
    /// countdown moves, the stored snapshot does not.
    pub fn render_latest(&self, local_now: U256) -> Option<SnapshotView> {
        self.lock_snapshot()
            .as_ref()
            .map(|snapshot| SnapshotView::new(snapshot, local_now))
    }

    fn lock_snapshot(
        &self,
    ) -> std::sync::MutexGuard<'_, Option<SwapEligibilitySnapshot>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current local wall clock as unix seconds — the display clock, distinct
/// from the chain clock captured in the snapshot.
pub fn local_now() -> U256 {
    U256::from(Utc::now().timestamp().max(0) as u64)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Display form of a snapshot. Big integers are decimal strings; check
/// results use PASS/BLOCKED, matching the operator-facing convention.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub trader: String,
    pub pool_id: String,
    pub pool_key: PoolKeyView,
    pub policy_source: String,
    pub max_swap_abs: String,
    pub cooldown_seconds: String,
    pub chain_timestamp_at_refresh: String,
    pub last_swap_timestamp: String,
    pub next_allowed_timestamp: String,
    pub remaining_seconds: String,
    pub test_amount_abs: String,
    pub amount_check: &'static str,
    pub cooldown_check: &'static str,
    pub allowed_now: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKeyView {
    pub currency0: String,
    pub currency1: String,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: String,
}

impl SnapshotView {
    pub fn new(snapshot: &SwapEligibilitySnapshot, local_now: U256) -> Self {
        let remaining = remaining_cooldown(snapshot.next_allowed_timestamp, local_now);
        Self {
            trader: snapshot.trader.to_string(),
            pool_id: snapshot.pool_id.to_string(),
            pool_key: PoolKeyView {
                currency0: snapshot.pool_key.currency0.to_string(),
                currency1: snapshot.pool_key.currency1.to_string(),
                fee: snapshot.pool_key.fee.to::<u32>(),
                tick_spacing: i32::try_from(snapshot.pool_key.tickSpacing).unwrap_or_default(),
                hooks: snapshot.pool_key.hooks.to_string(),
            },
            policy_source: snapshot.effective.source.to_string(),
            max_swap_abs: snapshot.effective.max_swap_abs.to_string(),
            cooldown_seconds: snapshot.effective.cooldown_seconds.to_string(),
            chain_timestamp_at_refresh: format_unix(snapshot.chain_timestamp),
            last_swap_timestamp: format_unix(snapshot.last_swap_timestamp),
            next_allowed_timestamp: format_unix(snapshot.next_allowed_timestamp),
            remaining_seconds: remaining.to_string(),
            test_amount_abs: snapshot.test_amount_abs.to_string(),
            amount_check: pass_or_blocked(snapshot.amount_check),
            cooldown_check: pass_or_blocked(snapshot.cooldown_check),
            allowed_now: snapshot.allowed_now,
        }
    }

    /// Compact single line for the 1 Hz watch ticker.
    pub fn status_line(&self) -> String {
        format!(
            "allowedNow={} | amount={} | cooldown={} | remaining={}s | source={}",
            self.allowed_now,
            self.amount_check,
            self.cooldown_check,
            self.remaining_seconds,
            self.policy_source
        )
    }
}

fn pass_or_blocked(check: bool) -> &'static str {
    if check {
        "PASS"
    } else {
        "BLOCKED"
    }
}

/// "0" for never, otherwise "unix (UTC datetime)".
fn format_unix(ts: U256) -> String {
    if ts.is_zero() {
        return "0".to_string();
    }
    match u64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0))
    {
        Some(dt) => format!("{} ({})", ts, dt.format("%Y-%m-%d %H:%M:%S UTC")),
        None => ts.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::identity::build_pool_key;
    use crate::types::{Defaults, Policy, PolicySource};
    use alloy::primitives::B256;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    /// Scripted reader: each refresh pops one (latency, defaults) entry;
    /// the chain clock can be made to fail for one call.
    struct ScriptedReader {
        script: Mutex<VecDeque<(Duration, Defaults)>>,
        fail_chain_clock: AtomicBool,
    }

    impl ScriptedReader {
        fn new(entries: Vec<(Duration, u64)>) -> Self {
            let script = entries
                .into_iter()
                .map(|(latency, max)| {
                    (
                        latency,
                        Defaults {
                            max_swap_abs: U256::from(max),
                            cooldown_seconds: U256::from(60u64),
                        },
                    )
                })
                .collect();
            Self {
                script: Mutex::new(script),
                fail_chain_clock: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl StateReader for ScriptedReader {
        async fn custom_policy(&self, _trader: Address) -> Result<Policy, ConsoleError> {
            Ok(Policy {
                max_swap_abs: U256::ZERO,
                cooldown_seconds: U256::ZERO,
                exists: false,
            })
        }

        async fn hook_defaults(&self) -> Result<Defaults, ConsoleError> {
            let entry = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            match entry {
                Some((latency, defaults)) => {
                    sleep(latency).await;
                    Ok(defaults)
                }
                None => Err(ConsoleError::Transport("script exhausted".to_string())),
            }
        }

        async fn last_swap_timestamp(
            &self,
            _trader: Address,
            _pool_id: B256,
        ) -> Result<U256, ConsoleError> {
            Ok(U256::from(1000u64))
        }

        async fn chain_timestamp(&self) -> Result<U256, ConsoleError> {
            if self.fail_chain_clock.swap(false, Ordering::SeqCst) {
                return Err(ConsoleError::Transport("clock read failed".to_string()));
            }
            Ok(U256::from(1060u64))
        }

        async fn resolve_alias(&self, name: &str) -> Result<Address, ConsoleError> {
            Err(ConsoleError::UnresolvedName(name.to_string()))
        }
    }

    fn request(test_amount: u64) -> RefreshRequest {
        let token_a = Address::with_last_byte(0x11);
        let token_b = Address::with_last_byte(0xaa);
        let hook = Address::with_last_byte(0xbb);
        RefreshRequest {
            trader: Address::with_last_byte(0x01),
            pool_key: build_pool_key(token_a, token_b, 3000, 60, hook).unwrap(),
            test_amount_abs: U256::from(test_amount),
        }
    }

    #[tokio::test]
    async fn test_refresh_resolves_defaults_and_evaluates() {
        let reader = ScriptedReader::new(vec![(Duration::ZERO, 500)]);
        let monitor = PolicyStateMonitor::new(reader);
        let req = request(400);

        let snapshot = monitor.refresh(&req).await.unwrap();
        assert_eq!(snapshot.effective.source, PolicySource::HookDefaults);
        assert_eq!(snapshot.effective.max_swap_abs, U256::from(500u64));
        assert_eq!(snapshot.pool_id, req.pool_key.id());
        // last swap 1000 + cooldown 60 = 1060 == chain ts: window elapsed
        assert!(snapshot.amount_check);
        assert!(snapshot.cooldown_check);
        assert!(snapshot.allowed_now);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let reader = ScriptedReader::new(vec![(Duration::ZERO, 500), (Duration::ZERO, 900)]);
        let monitor = PolicyStateMonitor::new(reader);

        let first = monitor.refresh(&request(400)).await.unwrap();

        // Second refresh loses its chain clock read: the whole cycle fails
        // and the published snapshot must be exactly the first one.
        monitor
            .reader
            .fail_chain_clock
            .store(true, Ordering::SeqCst);
        let err = monitor.refresh(&request(999)).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Transport(_)));

        let kept = monitor.snapshot().unwrap();
        assert_eq!(kept.test_amount_abs, first.test_amount_abs);
        assert_eq!(kept.effective.max_swap_abs, U256::from(500u64));
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_last_fetch_wins() {
        // Documents the inherited race: a slow refresh issued FIRST lands
        // LAST and overwrites the fresher result. Guarding this (e.g. with
        // a generation counter) would be an observable behavior change.
        let reader = ScriptedReader::new(vec![
            (Duration::from_millis(80), 111), // refresh 1: slow
            (Duration::from_millis(5), 222),  // refresh 2: fast
        ]);
        let monitor = Arc::new(PolicyStateMonitor::new(reader));

        let (req1, req2) = (request(1), request(2));
        let (first, second) =
            tokio::join!(monitor.refresh(&req1), monitor.refresh(&req2));
        first.unwrap();
        second.unwrap();

        let published = monitor.snapshot().unwrap();
        assert_eq!(published.effective.max_swap_abs, U256::from(111u64));
    }

    #[tokio::test]
    async fn test_render_reads_local_clock_without_mutating() {
        let reader = ScriptedReader::new(vec![(Duration::ZERO, 500)]);
        let monitor = PolicyStateMonitor::new(reader);
        monitor.refresh(&request(400)).await.unwrap();

        // Local clock 20s behind the window end: countdown shows 20s while
        // the chain-clock verdict stays allowed.
        let view = monitor.render_latest(U256::from(1040u64)).unwrap();
        assert_eq!(view.remaining_seconds, "20");
        assert!(view.allowed_now);

        // A later tick only moves the countdown.
        let later = monitor.render_latest(U256::from(1100u64)).unwrap();
        assert_eq!(later.remaining_seconds, "0");
        let snapshot = monitor.snapshot().unwrap();
        assert_eq!(snapshot.chain_timestamp, U256::from(1060u64));
    }

    #[test]
    fn test_format_unix_zero_is_bare() {
        assert_eq!(format_unix(U256::ZERO), "0");
        assert!(format_unix(U256::from(1_700_000_000u64)).starts_with("1700000000 ("));
    }
}
