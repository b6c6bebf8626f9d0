//! ExeGuard Operator Console
//!
//! CLI for operating a swap-risk-control deployment: read and write
//! per-trader policies on the PolicyRegistry, manage hook-wide defaults
//! on the UniswapExeGuard hook, inspect the merged event timeline, check
//! a trader's live swap eligibility, and fire demo swaps through the
//! PoolSwapTest router.
//!
//! Reads go through an unsigned HTTP provider; writes build a second,
//! wallet-backed provider from PRIVATE_KEY. Commands:
//!     state | watch | events | policy get/set/clear | defaults get/set |
//!     approve | swap
//!
//! Author: AI-Generated
//! Created: 2026-08-05

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::time::{interval, Duration};
use tracing::info;

use exeguard_console::chain::{GuardAdmin, RpcStateReader, StateReader};
use exeguard_console::config::{load_config, parse_i256, parse_u256, ConsoleConfig};
use exeguard_console::events::EventScanner;
use exeguard_console::monitor::{local_now, PolicyStateMonitor, RefreshRequest};
use exeguard_console::policy::swap_amount_abs;
use exeguard_console::pool::{build_pool_key, parse_address};
use exeguard_console::types::PoolKey;

/// ExeGuard Operator Console — swap-risk policy administration
#[derive(Parser)]
#[command(name = "exeguard-console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One-shot eligibility refresh for a trader, printed as JSON
    State {
        /// Trader address
        #[arg(long, env = "TRADER")]
        trader: Option<String>,
        /// Registry alias instead of a raw address
        #[arg(long)]
        alias: Option<String>,
        /// Signed test amount in wei (direction sign is discarded)
        #[arg(long)]
        test_amount: Option<String>,
    },
    /// Refresh once, then re-render the countdown every second
    Watch {
        #[arg(long, env = "TRADER")]
        trader: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        test_amount: Option<String>,
    },
    /// Merged registry + hook event timeline over recent blocks
    Events {
        /// Blocks to look back from the latest (default: EVENT_LOOKBACK_BLOCKS)
        #[arg(long)]
        lookback: Option<u64>,
    },
    /// Read or write a trader's custom policy row
    Policy {
        #[command(subcommand)]
        action: PolicyCmd,
    },
    /// Read or write the hook-wide default limits
    Defaults {
        #[command(subcommand)]
        action: DefaultsCmd,
    },
    /// Grant the swap router unlimited allowances for both pool tokens
    Approve,
    /// Submit a demo swap; --blocked submits the oversized probe amount
    /// and treats a hook revert as the expected outcome
    Swap {
        #[arg(long)]
        blocked: bool,
        /// Override the probe amount in wei
        #[arg(long)]
        amount: Option<String>,
    },
}

#[derive(Subcommand)]
enum PolicyCmd {
    Get {
        #[arg(long)]
        trader: Option<String>,
        #[arg(long)]
        alias: Option<String>,
    },
    Set {
        #[arg(long)]
        trader: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        /// Max swap magnitude in wei, 0 = unlimited (default: MAX_SWAP_ABS)
        #[arg(long)]
        max_swap: Option<String>,
        /// Cooldown in seconds, 0 = none (default: COOLDOWN_SECONDS)
        #[arg(long)]
        cooldown: Option<String>,
    },
    Clear {
        #[arg(long)]
        trader: Option<String>,
        #[arg(long)]
        alias: Option<String>,
    },
}

#[derive(Subcommand)]
enum DefaultsCmd {
    Get,
    Set {
        #[arg(long)]
        max_swap: Option<String>,
        #[arg(long)]
        cooldown: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command {
        Command::State { trader, alias, test_amount } => {
            run_state(&config, trader, alias, test_amount).await
        }
        Command::Watch { trader, alias, test_amount } => {
            run_watch(&config, trader, alias, test_amount).await
        }
        Command::Events { lookback } => run_events(&config, lookback).await,
        Command::Policy { action } => run_policy(&config, action).await,
        Command::Defaults { action } => run_defaults(&config, action).await,
        Command::Approve => run_approve(&config).await,
        Command::Swap { blocked, amount } => run_swap(&config, blocked, amount).await,
    }
}

// ── Providers ───────────────────────────────────────────────────────────

fn http_provider(config: &ConsoleConfig) -> Result<impl Provider> {
    Ok(ProviderBuilder::new()
        .connect_http(config.rpc_url.parse().context("Invalid RPC URL")?))
}

fn wallet_provider(config: &ConsoleConfig) -> Result<impl Provider> {
    let key = config
        .private_key
        .as_deref()
        .context("PRIVATE_KEY not set (required for writes)")?;
    let signer: PrivateKeySigner = key.parse().context("PRIVATE_KEY is not a valid key")?;
    Ok(ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(config.rpc_url.parse().context("Invalid RPC URL")?))
}

// ── Shared argument handling ────────────────────────────────────────────

async fn resolve_trader<R: StateReader>(
    reader: &R,
    trader: &Option<String>,
    alias: &Option<String>,
) -> Result<Address> {
    match (trader, alias) {
        (Some(t), _) => Ok(parse_address(t)?),
        (None, Some(name)) => Ok(reader.resolve_alias(name).await?),
        (None, None) => bail!("provide --trader or --alias"),
    }
}

fn demo_pool_key(config: &ConsoleConfig) -> Result<PoolKey> {
    let token0 = config.token0.context("SWAP_TOKEN0 not set")?;
    let token1 = config.token1.context("SWAP_TOKEN1 not set")?;
    Ok(build_pool_key(
        token0,
        token1,
        config.swap_fee,
        config.tick_spacing,
        config.hook,
    )?)
}

fn test_amount_abs(config: &ConsoleConfig, test_amount: Option<String>) -> Result<U256> {
    match test_amount {
        Some(raw) => Ok(swap_amount_abs(parse_i256("test amount", &raw)?)),
        None => Ok(config.allowed_input),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

async fn run_state(
    config: &ConsoleConfig,
    trader: Option<String>,
    alias: Option<String>,
    test_amount: Option<String>,
) -> Result<()> {
    let reader = RpcStateReader::new(http_provider(config)?, config.registry, config.hook);
    let request = RefreshRequest {
        trader: resolve_trader(&reader, &trader, &alias).await?,
        pool_key: demo_pool_key(config)?,
        test_amount_abs: test_amount_abs(config, test_amount)?,
    };

    let monitor = PolicyStateMonitor::new(reader);
    monitor.refresh(&request).await?;
    let view = monitor
        .render_latest(local_now())
        .context("refresh produced no snapshot")?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

async fn run_watch(
    config: &ConsoleConfig,
    trader: Option<String>,
    alias: Option<String>,
    test_amount: Option<String>,
) -> Result<()> {
    let reader = RpcStateReader::new(http_provider(config)?, config.registry, config.hook);
    let request = RefreshRequest {
        trader: resolve_trader(&reader, &trader, &alias).await?,
        pool_key: demo_pool_key(config)?,
        test_amount_abs: test_amount_abs(config, test_amount)?,
    };

    let monitor = PolicyStateMonitor::new(reader);
    monitor.refresh(&request).await?;
    if let Some(view) = monitor.render_latest(local_now()) {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    // Cosmetic 1 Hz re-render: only the local-clock countdown moves, the
    // snapshot itself is never re-fetched here.
    info!("watching (Ctrl+C to stop)...");
    let mut ticker = interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(view) = monitor.render_latest(local_now()) {
                    println!("{}", view.status_line());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("watch stopped");
                return Ok(());
            }
        }
    }
}

async fn run_events(config: &ConsoleConfig, lookback: Option<u64>) -> Result<()> {
    let provider = http_provider(config)?;
    let latest = provider
        .get_block_number()
        .await
        .context("Failed to fetch latest block")?;
    let lookback = lookback.unwrap_or(config.event_lookback);
    let from = latest.saturating_sub(lookback);

    let scanner = EventScanner::new(provider, config.registry, config.hook);
    let timeline = scanner.load_timeline(from, latest).await?;

    if timeline.is_empty() {
        println!("No events in blocks {from}-{latest}");
        return Ok(());
    }
    info!("{} events in blocks {}-{}", timeline.len(), from, latest);
    for event in &timeline {
        println!("{event}");
    }
    Ok(())
}

async fn run_policy(config: &ConsoleConfig, action: PolicyCmd) -> Result<()> {
    let reader = RpcStateReader::new(http_provider(config)?, config.registry, config.hook);

    match action {
        PolicyCmd::Get { trader, alias } => {
            let trader = resolve_trader(&reader, &trader, &alias).await?;
            let policy = reader.custom_policy(trader).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "trader": trader.to_string(),
                    "maxSwapAbs": policy.max_swap_abs.to_string(),
                    "cooldownSeconds": policy.cooldown_seconds.to_string(),
                    "exists": policy.exists,
                }))?
            );
        }
        PolicyCmd::Set { trader, alias, max_swap, cooldown } => {
            let admin = GuardAdmin::new(wallet_provider(config)?, config.registry, config.hook);
            let max_swap = match max_swap {
                Some(raw) => parse_u256("max swap", &raw)?,
                None => config.default_max_swap_abs,
            };
            let cooldown = match cooldown {
                Some(raw) => parse_u256("cooldown", &raw)?,
                None => config.default_cooldown_seconds,
            };
            match (trader, alias) {
                (Some(t), _) => {
                    admin.set_policy(parse_address(&t)?, max_swap, cooldown).await?;
                }
                // Alias writes resolve on-chain inside the registry.
                (None, Some(name)) => {
                    admin.set_policy_for_alias(&name, max_swap, cooldown).await?;
                }
                (None, None) => bail!("provide --trader or --alias"),
            }
        }
        PolicyCmd::Clear { trader, alias } => {
            let admin = GuardAdmin::new(wallet_provider(config)?, config.registry, config.hook);
            let trader = resolve_trader(&reader, &trader, &alias).await?;
            admin.clear_policy(trader).await?;
        }
    }
    Ok(())
}

async fn run_defaults(config: &ConsoleConfig, action: DefaultsCmd) -> Result<()> {
    match action {
        DefaultsCmd::Get => {
            let reader =
                RpcStateReader::new(http_provider(config)?, config.registry, config.hook);
            let defaults = reader.hook_defaults().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "defaultMaxSwapAbs": defaults.max_swap_abs.to_string(),
                    "defaultCooldownSeconds": defaults.cooldown_seconds.to_string(),
                }))?
            );
        }
        DefaultsCmd::Set { max_swap, cooldown } => {
            let admin = GuardAdmin::new(wallet_provider(config)?, config.registry, config.hook);
            let max_swap = match max_swap {
                Some(raw) => parse_u256("max swap", &raw)?,
                None => config.default_max_swap_abs,
            };
            let cooldown = match cooldown {
                Some(raw) => parse_u256("cooldown", &raw)?,
                None => config.default_cooldown_seconds,
            };
            admin.set_defaults(max_swap, cooldown).await?;
        }
    }
    Ok(())
}

async fn run_approve(config: &ConsoleConfig) -> Result<()> {
    let router = config.swap_router.context("SWAP_ROUTER not set")?;
    let token0 = config.token0.context("SWAP_TOKEN0 not set")?;
    let token1 = config.token1.context("SWAP_TOKEN1 not set")?;

    let admin = GuardAdmin::new(wallet_provider(config)?, config.registry, config.hook);
    let outcomes = admin.approve_for_swaps(router, token0, token1).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "approved": true,
            "router": router.to_string(),
            "transactions": outcomes.iter().map(|o| o.tx_hash.to_string()).collect::<Vec<_>>(),
        }))?
    );
    Ok(())
}

async fn run_swap(config: &ConsoleConfig, blocked: bool, amount: Option<String>) -> Result<()> {
    let router = config.swap_router.context("SWAP_ROUTER not set")?;
    let key = demo_pool_key(config)?;
    let amount = match amount {
        Some(raw) => parse_u256("swap amount", &raw)?,
        None if blocked => config.blocked_input,
        None => config.allowed_input,
    };

    let admin = GuardAdmin::new(wallet_provider(config)?, config.registry, config.hook);
    let outcome = admin.swap(router, key, amount, blocked).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "action": outcome.action,
            "success": outcome.success,
            "expectedRevert": outcome.expected_revert,
            "txHash": outcome.tx_hash.map(|h| h.to_string()),
            "error": outcome.error,
        }))?
    );
    Ok(())
}
