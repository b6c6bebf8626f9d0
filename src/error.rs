//! Console error taxonomy
//!
//! Every failure the library can surface, as a distinguishable variant.
//! The orchestration layer decides whether to report to the operator or
//! abort a batched operation; nothing is swallowed or retried here.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use thiserror::Error;

/// Failure conditions surfaced by the console core.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Malformed trader/token/contract identifier at a text boundary.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Pool-key field outside its fixed binary width (uint24 fee, int24 tick spacing).
    #[error("pool key encoding: {0}")]
    Encoding(String),

    /// Any read/write to the ledger failed or timed out. Opaque — the
    /// transport's failure detail is carried as text, not decomposed.
    #[error("ledger transport failure: {0}")]
    Transport(String),

    /// A human-readable alias does not map to any known trader address.
    #[error("unresolved name: {0}")]
    UnresolvedName(String),
}

impl ConsoleError {
    /// Wrap a transport-layer error, keeping it opaque.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}
