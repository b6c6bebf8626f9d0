//! Ledger reads — registry policy, hook defaults, cooldown slots, clock
//!
//! `StateReader` is the seam between the pure evaluation core and the
//! RPC transport: the monitor and the CLI depend on the trait, tests
//! substitute a mock, and `RpcStateReader` is the production impl over
//! the registry + hook contracts. Every transport failure surfaces as
//! `ConsoleError::Transport`; nothing is retried here.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use async_trait::async_trait;

use crate::contracts::{IPolicyRegistry, IUniswapExeGuard};
use crate::error::ConsoleError;
use crate::types::{Defaults, Policy};

/// Read-side collaborator contract for the console core.
#[async_trait]
pub trait StateReader: Send + Sync {
    /// The trader's custom policy row, present or not.
    async fn custom_policy(&self, trader: Address) -> Result<Policy, ConsoleError>;

    /// Hook-wide default limits.
    async fn hook_defaults(&self) -> Result<Defaults, ConsoleError>;

    /// Unix seconds of the trader's last swap in the pool; 0 = never.
    async fn last_swap_timestamp(
        &self,
        trader: Address,
        pool_id: B256,
    ) -> Result<U256, ConsoleError>;

    /// Timestamp of the latest finalized block.
    async fn chain_timestamp(&self) -> Result<U256, ConsoleError>;

    /// Resolve a registry alias to a trader address.
    async fn resolve_alias(&self, name: &str) -> Result<Address, ConsoleError>;
}

/// Production reader over an alloy provider.
pub struct RpcStateReader<P> {
    provider: P,
    registry: Address,
    hook: Address,
}

impl<P: Provider> RpcStateReader<P> {
    pub fn new(provider: P, registry: Address, hook: Address) -> Self {
        Self {
            provider,
            registry,
            hook,
        }
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> StateReader for RpcStateReader<P> {
    async fn custom_policy(&self, trader: Address) -> Result<Policy, ConsoleError> {
        let registry = IPolicyRegistry::new(self.registry, &self.provider);
        let row = registry
            .getPolicy(trader)
            .call()
            .await
            .map_err(ConsoleError::transport)?;
        Ok(Policy {
            max_swap_abs: row.maxSwapAbs,
            cooldown_seconds: row.cooldownSeconds,
            exists: row.exists,
        })
    }

    async fn hook_defaults(&self) -> Result<Defaults, ConsoleError> {
        let hook = IUniswapExeGuard::new(self.hook, &self.provider);
        let max_call = hook.defaultMaxSwapAbs();
        let cooldown_call = hook.defaultCooldownSeconds();
        let (max_res, cooldown_res) = tokio::join!(max_call.call(), cooldown_call.call());
        Ok(Defaults {
            max_swap_abs: max_res.map_err(ConsoleError::transport)?,
            cooldown_seconds: cooldown_res.map_err(ConsoleError::transport)?,
        })
    }

    async fn last_swap_timestamp(
        &self,
        trader: Address,
        pool_id: B256,
    ) -> Result<U256, ConsoleError> {
        let hook = IUniswapExeGuard::new(self.hook, &self.provider);
        hook.lastSwapTimestampByPool(trader, pool_id)
            .call()
            .await
            .map_err(ConsoleError::transport)
    }

    async fn chain_timestamp(&self) -> Result<U256, ConsoleError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(ConsoleError::transport)?
            .ok_or_else(|| ConsoleError::Transport("latest block unavailable".to_string()))?;
        Ok(U256::from(block.header.timestamp))
    }

    async fn resolve_alias(&self, name: &str) -> Result<Address, ConsoleError> {
        let registry = IPolicyRegistry::new(self.registry, &self.provider);
        let trader = registry
            .resolveENS(name.to_string())
            .call()
            .await
            .map_err(ConsoleError::transport)?;
        if trader == Address::ZERO {
            return Err(ConsoleError::UnresolvedName(name.to_string()));
        }
        Ok(trader)
    }
}
