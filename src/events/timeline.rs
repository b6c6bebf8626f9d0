//! Timeline merging — one causally-ordered view over two event sources
//!
//! The registry and the hook emit their histories independently; each
//! batch arrives already ordered by block within its source. Merging is a
//! stable sort on block number over the concatenation, so events sharing
//! a block keep their batch order. Within one block, relative order across
//! contracts carries no meaning and none is claimed.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use crate::types::TimelineEvent;

/// Merge per-source event batches into a single ascending timeline.
/// Empty input yields an empty timeline, not an error — rendering a
/// "no events" placeholder is the caller's concern.
pub fn merge<I>(batches: I) -> Vec<TimelineEvent>
where
    I: IntoIterator<Item = Vec<TimelineEvent>>,
{
    let mut merged: Vec<TimelineEvent> = batches.into_iter().flatten().collect();
    // Vec::sort_by_key is stable: ties keep concatenation order.
    merged.sort_by_key(|event| event.block);
    merged
}
