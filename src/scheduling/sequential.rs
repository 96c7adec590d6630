//! Sequential back-end of the analysis pass
//!
//! Batched logic is kept even in sequential mode so that the merge order,
//! and therefore the output, is identical to a multi-threaded run.

use crate::{error::AnalysisError, resacc::RunAccumulator, scheduling};

use std::ops::Range;

/// Process the event ranges one after the other
pub(super) fn process_events_impl(
    num_events: usize,
    process_range: impl Sync + Fn(Range<usize>) -> Result<RunAccumulator, AnalysisError>,
) -> Result<RunAccumulator, AnalysisError> {
    let mut ranges = scheduling::batch_ranges(num_events);

    // An empty input still yields a well-formed (empty) accumulator
    let mut accumulator = match ranges.next() {
        Some(first) => process_range(first)?,
        None => return process_range(0..0),
    };

    for range in ranges {
        accumulator.merge(process_range(range)?);
    }
    Ok(accumulator)
}
