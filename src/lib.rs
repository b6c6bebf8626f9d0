//! ExeGuard Operator Console Library
//!
//! Policy-state evaluation and pool-identity core for a swap-risk-control
//! mechanism (PolicyRegistry + UniswapExeGuard hook), plus the chain
//! reader/writer collaborators and refresh orchestration the CLI drives.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod events;
pub mod monitor;
pub mod policy;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use chain::{GuardAdmin, RpcStateReader, StateReader};
pub use config::{load_config, ConsoleConfig};
pub use error::ConsoleError;
pub use events::EventScanner;
pub use monitor::{PolicyStateMonitor, RefreshRequest, SnapshotView};
pub use types::{
    Defaults, EffectivePolicy, EventKind, Policy, PolicySource, PoolKey,
    SwapEligibilitySnapshot, TimelineEvent,
};
