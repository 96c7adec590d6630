//! Multi-threaded back-end of the analysis pass
//!
//! Event ranges are handed to rayon tasks; each task deposits its result in
//! a per-range slot, and the slots are merged in range order afterwards.
//! This keeps the output bit-identical to the sequential backend, and makes
//! error reporting deterministic: the first failing range in event order
//! wins.

use crate::{error::AnalysisError, resacc::RunAccumulator, scheduling};

use std::{ops::Range, sync::Mutex};

/// Process the event ranges on the rayon thread pool
pub(super) fn process_events_impl(
    num_events: usize,
    process_range: impl Sync + Fn(Range<usize>) -> Result<RunAccumulator, AnalysisError>,
) -> Result<RunAccumulator, AnalysisError> {
    let ranges: Vec<Range<usize>> = scheduling::batch_ranges(num_events).collect();
    if ranges.is_empty() {
        return process_range(0..0);
    }

    // One result slot per range, filled in whatever order tasks finish
    let slots: Vec<Mutex<Option<Result<RunAccumulator, AnalysisError>>>> =
        ranges.iter().map(|_| Mutex::new(None)).collect();

    // This scope only returns once every spawned task has run
    let process_range_ref = &process_range;
    rayon::scope(|scope| {
        for (slot, range) in slots.iter().zip(ranges) {
            scope.spawn(move |_| {
                let result = process_range_ref(range);
                let mut lock = slot.lock().expect("Mutex data should be valid");
                assert!(lock.is_none(), "Tasks should not report results twice");
                *lock = Some(result);
            });
        }
    });

    // Merge in range order so that the result matches a sequential run
    let mut results = slots.into_iter().map(|slot| {
        slot.into_inner()
            .expect("Mutex data should be valid")
            .expect("Result should be ready")
    });
    let mut accumulator = results
        .next()
        .expect("There should be at least one range")?;
    for result in results {
        accumulator.merge(result?);
    }
    Ok(accumulator)
}
