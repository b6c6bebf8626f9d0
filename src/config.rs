//! Configuration management
//! Load settings from .env / environment, with demo-friendly fallbacks

use alloy::primitives::{Address, I256, U256};
use anyhow::{anyhow, Context, Result};

use crate::pool::identity::parse_address;

// Demo deployment defaults: 1 token (1e18 wei) max swap, 60 s cooldown,
// 0.30% fee / 60 tick spacing pool, 0.1 token allowed vs 2 token blocked
// probe amounts.
pub const DEFAULT_MAX_SWAP_ABS: &str = "1000000000000000000";
pub const DEFAULT_COOLDOWN_SECONDS: &str = "60";
pub const DEFAULT_SWAP_FEE: u32 = 3000;
pub const DEFAULT_TICK_SPACING: i32 = 60;
pub const DEFAULT_ALLOWED_INPUT: &str = "100000000000000000";
pub const DEFAULT_BLOCKED_INPUT: &str = "2000000000000000000";
pub const DEFAULT_EVENT_LOOKBACK: u64 = 2000;

/// Console configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    // Network
    pub rpc_url: String,

    // Wallet (required for writes only)
    pub private_key: Option<String>,

    // Contract addresses
    pub registry: Address,
    pub hook: Address,
    pub swap_router: Option<Address>,

    // Pool parameters for the demo pool
    pub token0: Option<Address>,
    pub token1: Option<Address>,
    pub swap_fee: u32,
    pub tick_spacing: i32,

    // Probe amounts (wei)
    pub allowed_input: U256,
    pub blocked_input: U256,

    // Prefill values for policy/defaults writes
    pub default_max_swap_abs: U256,
    pub default_cooldown_seconds: U256,

    // Event scan window
    pub event_lookback: u64,
}

pub fn load_config() -> Result<ConsoleConfig> {
    dotenv::dotenv().ok();

    let registry = parse_address(
        &std::env::var("POLICY_REGISTRY").context("POLICY_REGISTRY not set")?,
    )?;
    let hook = parse_address(
        &std::env::var("EXE_GUARD_HOOK").context("EXE_GUARD_HOOK not set")?,
    )?;

    Ok(ConsoleConfig {
        rpc_url: std::env::var("RPC_URL").context("RPC_URL not set")?,
        private_key: optional_env("PRIVATE_KEY"),
        registry,
        hook,
        swap_router: optional_address("SWAP_ROUTER")?,
        token0: optional_address("SWAP_TOKEN0")?,
        token1: optional_address("SWAP_TOKEN1")?,
        swap_fee: optional_env("SWAP_FEE")
            .map(|v| v.parse().context("SWAP_FEE must be an integer"))
            .transpose()?
            .unwrap_or(DEFAULT_SWAP_FEE),
        tick_spacing: optional_env("SWAP_TICK_SPACING")
            .map(|v| v.parse().context("SWAP_TICK_SPACING must be an integer"))
            .transpose()?
            .unwrap_or(DEFAULT_TICK_SPACING),
        allowed_input: parse_u256(
            "SWAP_ALLOWED_INPUT",
            &optional_env("SWAP_ALLOWED_INPUT").unwrap_or_else(|| DEFAULT_ALLOWED_INPUT.into()),
        )?,
        blocked_input: parse_u256(
            "SWAP_BLOCKED_INPUT",
            &optional_env("SWAP_BLOCKED_INPUT").unwrap_or_else(|| DEFAULT_BLOCKED_INPUT.into()),
        )?,
        default_max_swap_abs: parse_u256(
            "MAX_SWAP_ABS",
            &optional_env("MAX_SWAP_ABS").unwrap_or_else(|| DEFAULT_MAX_SWAP_ABS.into()),
        )?,
        default_cooldown_seconds: parse_u256(
            "COOLDOWN_SECONDS",
            &optional_env("COOLDOWN_SECONDS").unwrap_or_else(|| DEFAULT_COOLDOWN_SECONDS.into()),
        )?,
        event_lookback: optional_env("EVENT_LOOKBACK_BLOCKS")
            .map(|v| v.parse().context("EVENT_LOOKBACK_BLOCKS must be an integer"))
            .transpose()?
            .unwrap_or(DEFAULT_EVENT_LOOKBACK),
    })
}

/// Parse an unsigned wei amount from operator input.
pub fn parse_u256(label: &str, value: &str) -> Result<U256> {
    value
        .trim()
        .parse::<U256>()
        .map_err(|_| anyhow!("{label} must be an integer in wei, got '{value}'"))
}

/// Parse a signed wei amount (test amounts may carry a direction sign;
/// the evaluator discards it).
pub fn parse_i256(label: &str, value: &str) -> Result<I256> {
    value
        .trim()
        .parse::<I256>()
        .map_err(|_| anyhow!("{label} must be an integer in wei, got '{value}'"))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_address(name: &str) -> Result<Option<Address>> {
    match optional_env(name) {
        Some(value) => Ok(Some(parse_address(&value)?)),
        None => Ok(None),
    }
}
