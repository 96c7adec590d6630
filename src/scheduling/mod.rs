//! Scheduling of the per-event computation over the event sequence
//!
//! Each event's derived values depend only on that event's readout and the
//! run-wide constants, so the ordered sequence is partitioned into
//! contiguous ranges that can be processed independently and merged back in
//! range order. Both backends produce identical results.

#[cfg(feature = "multi-threading")]
mod multi_threading;
#[cfg(not(feature = "multi-threading"))]
mod sequential;

use crate::{error::AnalysisError, resacc::RunAccumulator};

use std::ops::Range;

/// Size of the processed event batches
///
/// Batches bound per-task state and give the multi-threaded backend its work
/// granularity. Since range results are merged in range order either way,
/// the value only affects performance, never the output.
pub const EVENT_BATCH_SIZE: usize = 10_000;

/// Process `num_events` events with the backend selected at build time
///
/// The kernel maps a contiguous index range to an accumulator holding that
/// range's results; any per-range error aborts the whole run before output
/// is produced.
pub fn process_events(
    num_events: usize,
    process_range: impl Sync + Fn(Range<usize>) -> Result<RunAccumulator, AnalysisError>,
) -> Result<RunAccumulator, AnalysisError> {
    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::process_events_impl(num_events, process_range)
    }

    #[cfg(feature = "multi-threading")]
    {
        multi_threading::process_events_impl(num_events, process_range)
    }
}

/// Contiguous batch ranges covering `0..num_events`
fn batch_ranges(num_events: usize) -> impl Iterator<Item = Range<usize>> {
    (0..num_events)
        .step_by(EVENT_BATCH_SIZE)
        .map(move |start| start..(start + EVENT_BATCH_SIZE).min(num_events))
}
