//! Pool identity module
//!
//! Canonical token ordering and deterministic pool-id derivation for
//! v4-style pools.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

pub mod identity;

pub use identity::{build_pool_key, canonicalize, parse_address};
