//! End-to-end analysis pass
//!
//! Validates the three run names, resolves the run constants, reads the
//! event table, drives the per-event computation through the scheduler, and
//! hands the results to the output adapter.

use crate::{
    config::{ExperimentConfig, Kinematics, Pass, Target},
    error::AnalysisError,
    geometry::DetectorGeometry,
    observables, output,
    resacc::RunAccumulator,
    scheduling,
    store::{self, ColumnarTable},
};

use std::{ops::Range, path::Path};

/// Where the derived values go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Append x_exp/y_exp/dx/dy columns to the event table and rewrite the
    /// store; a degenerate event aborts the pass with the store untouched
    AppendToStore,

    /// Accumulate histograms and write them next to the input; degenerate
    /// events are skipped and counted
    Histograms,
}

/// Run one analysis pass
///
/// All three names are validated before any data access, so an invalid name
/// aborts with no side effects.
pub fn run(
    kinematics: &str,
    target: &str,
    pass: &str,
    mode: OutputMode,
    base_dir: &Path,
) -> Result<RunAccumulator, AnalysisError> {
    let kinematics = kinematics.parse::<Kinematics>()?;
    let target = target.parse::<Target>()?;
    let pass = pass.parse::<Pass>()?;
    let cfg = ExperimentConfig::for_kinematics(kinematics);
    cfg.print();
    run_with_config(&cfg, target, pass, mode, base_dir)
}

/// Run one analysis pass with an explicit configuration
///
/// Exposed separately so callers can override the direction source or the
/// cut thresholds without going through the name lookup.
pub fn run_with_config(
    cfg: &ExperimentConfig,
    target: Target,
    pass: Pass,
    mode: OutputMode,
    base_dir: &Path,
) -> Result<RunAccumulator, AnalysisError> {
    let geometry = DetectorGeometry::new(cfg.hcal_distance, cfg.hcal_angle);

    let path = cfg.input_path(base_dir, target, pass);
    let mut table = ColumnarTable::open(&path, store::EVENT_TABLE)?;
    let events = table.read_events()?;

    // Per-range kernel: a pure fold over one contiguous slice of events
    let process_range = |range: Range<usize>| -> Result<RunAccumulator, AnalysisError> {
        let mut accumulator = match mode {
            OutputMode::AppendToStore => RunAccumulator::for_append(),
            OutputMode::Histograms => RunAccumulator::for_histograms(),
        };
        for (offset, event) in events[range.clone()].iter().enumerate() {
            let outcome = observables::compute(event, cfg, &geometry).map(|obs| {
                let verdict = cfg.cuts.evaluate(event, &obs);
                (obs, verdict)
            });
            accumulator.record(range.start + offset, outcome)?;
        }
        Ok(accumulator)
    };
    let accumulator = scheduling::process_events(events.len(), process_range)?;

    match mode {
        OutputMode::AppendToStore => {
            output::append_derived_fields(&mut table, &accumulator, &path)?;
        }
        OutputMode::Histograms => {
            output::dump_histograms(&accumulator.histograms, &path.with_extension("hist"))?;
        }
    }
    Ok(accumulator)
}
