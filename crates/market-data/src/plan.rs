//! Fetch planning: checkpoint generation and batch merging.
//!
//! Both functions are pure so the ordering and dedup guarantees can be
//! tested without any network involvement.

use lt_core::types::Candle;

/// Partition `[start_ms, end_ms]` into request checkpoints spaced `step_ms`
/// apart.
///
/// The first checkpoint is the `None` sentinel meaning "most recent batch"
/// (no `before` parameter); every subsequent checkpoint requests candles
/// bounded by that timestamp. Stepping continues until a checkpoint reaches
/// or passes `end_ms`, so the final checkpoint may overshoot the end bound —
/// overshoot only produces overlap, which the merge collapses.
pub fn checkpoints(start_ms: i64, end_ms: i64, step_ms: i64) -> Vec<Option<i64>> {
    let mut plan = vec![None, Some(start_ms)];
    let mut current = start_ms;
    while current < end_ms {
        current += step_ms;
        plan.push(Some(current));
    }
    plan
}

/// Merge batch results into a single strictly-ascending candle series.
///
/// Flattens all batches, drops empty ones implicitly, sorts ascending by
/// timestamp, and collapses duplicate timestamps (the first entry in sorted
/// order wins; duplicates are not expected from the exchange but overlapping
/// checkpoint ranges make them possible). Idempotent: merging the merged
/// output again yields the same sequence.
pub fn merge(batches: Vec<Vec<Candle>>) -> Vec<Candle> {
    let mut all: Vec<Candle> = batches.into_iter().flatten().collect();
    all.sort_by_key(|c| c.ts);
    all.dedup_by_key(|c| c.ts);
    all
}
