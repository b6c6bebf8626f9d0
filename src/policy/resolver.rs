//! Effective policy resolution — custom override vs. hook-wide default
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use crate::types::{Defaults, EffectivePolicy, Policy, PolicySource};

/// Determine the policy in force for a trader. A custom registry row
/// (exists == true) replaces both fields atomically; otherwise the hook
/// defaults apply verbatim. There are no partial overrides.
pub fn resolve(custom: &Policy, defaults: &Defaults) -> EffectivePolicy {
    if custom.exists {
        EffectivePolicy {
            max_swap_abs: custom.max_swap_abs,
            cooldown_seconds: custom.cooldown_seconds,
            source: PolicySource::CustomPolicy,
        }
    } else {
        EffectivePolicy {
            max_swap_abs: defaults.max_swap_abs,
            cooldown_seconds: defaults.cooldown_seconds,
            source: PolicySource::HookDefaults,
        }
    }
}
