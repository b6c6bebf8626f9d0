//! Ledger collaborators
//!
//! Read side (policy rows, defaults, cooldown slots, chain clock) and
//! write side (policy administration, demo swap submission).
//!
//! Author: AI-Generated
//! Created: 2026-08-04

pub mod reader;
pub mod writer;

pub use reader::{RpcStateReader, StateReader};
pub use writer::{GuardAdmin, SwapOutcome, TxOutcome};
