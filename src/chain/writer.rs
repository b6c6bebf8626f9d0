//! Ledger writes — policy administration and demo swap submission
//!
//! Purpose:
//!     Thin orchestration around the submission transport. The evaluation
//!     core never issues writes; it only computes the values that land
//!     here as transaction payloads. Each submission waits for its
//!     receipt and logs hash + inclusion block, mirroring how reads are
//!     reported elsewhere.
//!
//! The blocked-swap path is intentionally inverted: a revert is the
//! expected outcome when the hook is doing its job, and an on-chain
//! success is the anomaly worth flagging.
//!
//! Author: AI-Generated
//! Created: 2026-08-05

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, Bytes, B256, I256, U256};
use alloy::providers::Provider;
use tracing::{info, warn};

use crate::contracts::{IPoolSwapTest, IPolicyRegistry, IUniswapExeGuard, IERC20};
use crate::error::ConsoleError;
use crate::types::PoolKey;

/// v4 MIN_SQRT_PRICE + 1 — the loosest price bound for a zeroForOne swap.
pub const MIN_SQRT_PRICE_PLUS_ONE: U160 = U160::from_limbs([4_295_128_740, 0, 0]);

/// A confirmed administrative transaction.
#[derive(Debug, Clone)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub block: u64,
}

/// Result of a demo swap submission through the PoolSwapTest router.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub action: &'static str,
    pub success: bool,
    /// True when a revert was the anticipated result (blocked-swap demo).
    pub expected_revert: bool,
    pub tx_hash: Option<B256>,
    pub error: Option<String>,
}

/// Write-side collaborator: registry/hook administration and swap
/// submission over a wallet-backed provider.
pub struct GuardAdmin<P> {
    provider: P,
    registry: Address,
    hook: Address,
}

impl<P: Provider> GuardAdmin<P> {
    pub fn new(provider: P, registry: Address, hook: Address) -> Self {
        Self {
            provider,
            registry,
            hook,
        }
    }

    /// Set a trader's custom policy row in the registry.
    pub async fn set_policy(
        &self,
        trader: Address,
        max_swap_abs: U256,
        cooldown_seconds: U256,
    ) -> Result<TxOutcome, ConsoleError> {
        let registry = IPolicyRegistry::new(self.registry, &self.provider);
        let call = registry.setPolicy(trader, max_swap_abs, cooldown_seconds);
        self.confirm("setPolicy", call.send().await).await
    }

    /// Set a policy keyed by a registry alias; resolution happens on-chain
    /// inside the registry, not in the console.
    pub async fn set_policy_for_alias(
        &self,
        name: &str,
        max_swap_abs: U256,
        cooldown_seconds: U256,
    ) -> Result<TxOutcome, ConsoleError> {
        let registry = IPolicyRegistry::new(self.registry, &self.provider);
        let call = registry.setPolicyForENS(name.to_string(), max_swap_abs, cooldown_seconds);
        self.confirm("setPolicyForENS", call.send().await).await
    }

    /// Remove a trader's custom policy row; the hook defaults take over.
    pub async fn clear_policy(&self, trader: Address) -> Result<TxOutcome, ConsoleError> {
        let registry = IPolicyRegistry::new(self.registry, &self.provider);
        let call = registry.clearPolicy(trader);
        self.confirm("clearPolicy", call.send().await).await
    }

    /// Update the hook-wide default pair.
    pub async fn set_defaults(
        &self,
        max_swap_abs: U256,
        cooldown_seconds: U256,
    ) -> Result<TxOutcome, ConsoleError> {
        let hook = IUniswapExeGuard::new(self.hook, &self.provider);
        let call = hook.setDefaults(max_swap_abs, cooldown_seconds);
        self.confirm("setDefaults", call.send().await).await
    }

    /// Grant the swap router unlimited allowances for both pool tokens.
    /// The duplicate approval is skipped for a degenerate same-token pool.
    pub async fn approve_for_swaps(
        &self,
        router: Address,
        token0: Address,
        token1: Address,
    ) -> Result<Vec<TxOutcome>, ConsoleError> {
        let mut outcomes = Vec::with_capacity(2);
        let first = IERC20::new(token0, &self.provider);
        outcomes.push(
            self.confirm("approve token0", first.approve(router, U256::MAX).send().await)
                .await?,
        );
        if token1 != token0 {
            let second = IERC20::new(token1, &self.provider);
            outcomes.push(
                self.confirm("approve token1", second.approve(router, U256::MAX).send().await)
                    .await?,
            );
        }
        Ok(outcomes)
    }

    /// Submit an exact-input swap through the PoolSwapTest router.
    /// `expect_blocked` flips the interpretation: a hook revert is then the
    /// anticipated result and is reported as such, not as a failure.
    pub async fn swap(
        &self,
        router: Address,
        key: PoolKey,
        amount: U256,
        expect_blocked: bool,
    ) -> Result<SwapOutcome, ConsoleError> {
        let action = if expect_blocked { "blockedSwap" } else { "allowedSwap" };

        let magnitude = I256::try_from(amount).map_err(|_| {
            ConsoleError::Encoding(format!("swap amount {amount} does not fit int256"))
        })?;
        let params = IPoolSwapTest::SwapParams {
            zeroForOne: true,
            // Negative amountSpecified = exact input in v4 convention.
            amountSpecified: -magnitude,
            sqrtPriceLimitX96: MIN_SQRT_PRICE_PLUS_ONE,
        };
        let settings = IPoolSwapTest::TestSettings {
            takeClaims: false,
            settleUsingBurn: false,
        };

        let router_contract = IPoolSwapTest::new(router, &self.provider);
        let call = router_contract.swap(key, params, settings, Bytes::new());

        match self.confirm(action, call.send().await).await {
            Ok(outcome) => {
                if expect_blocked {
                    warn!("blocked swap unexpectedly succeeded (tx {})", outcome.tx_hash);
                }
                Ok(SwapOutcome {
                    action,
                    success: true,
                    expected_revert: false,
                    tx_hash: Some(outcome.tx_hash),
                    error: None,
                })
            }
            Err(err) if expect_blocked => {
                info!("expected blocked swap revert: {err}");
                Ok(SwapOutcome {
                    action,
                    success: false,
                    expected_revert: true,
                    tx_hash: None,
                    error: Some(err.to_string()),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Wait out a submission: log the pending hash, then the inclusion
    /// block once the receipt lands. A failed on-chain status is an error,
    /// not a silent success.
    async fn confirm<E: std::fmt::Display>(
        &self,
        label: &str,
        sent: Result<alloy::providers::PendingTransactionBuilder<alloy::network::Ethereum>, E>,
    ) -> Result<TxOutcome, ConsoleError> {
        let pending = sent.map_err(ConsoleError::transport)?;
        let tx_hash = *pending.tx_hash();
        info!("{label} tx submitted: {tx_hash}");

        let receipt = pending.get_receipt().await.map_err(ConsoleError::transport)?;
        let block = receipt.block_number.unwrap_or_default();
        if !receipt.status() {
            return Err(ConsoleError::Transport(format!(
                "{label} reverted in block {block} (tx {tx_hash})"
            )));
        }
        info!("{label} confirmed in block {block}");
        Ok(TxOutcome { tx_hash, block })
    }
}
