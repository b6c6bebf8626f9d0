//! Policy module
//!
//! Effective-policy resolution (custom override vs. hook defaults) and
//! swap eligibility evaluation.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

pub mod eligibility;
pub mod resolver;

pub use eligibility::{evaluate, remaining_cooldown, swap_amount_abs, Eligibility};
pub use resolver::resolve;
