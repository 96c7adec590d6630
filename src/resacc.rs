//! Accumulation of per-event results across an analysis pass
//!
//! Each contiguous event range is folded into its own accumulator; merging
//! the range accumulators in range order reproduces the sequential result
//! exactly, which is what lets the scheduler parallelize the pass.

use crate::{
    error::{AnalysisError, EventError},
    evcut::CutVerdict,
    histogram::RunHistograms,
    numeric::Float,
    observables::DerivedObservables,
};

use nalgebra::Vector2;
use num_traits::Zero;

/// Policy for per-event degenerate conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// Abort the whole pass on the first degenerate event
    ///
    /// Write-back mode requires one derived row per event, so a degenerate
    /// event leaves nothing valid to append and the store must stay
    /// untouched.
    Abort,

    /// Skip the event and count it per cause
    ///
    /// Histogram mode can tolerate holes in the sample as long as they are
    /// counted rather than binned as NaN.
    Skip,
}

/// Derived values appended back to the store for one event
#[derive(Debug, Clone, Copy)]
pub struct DerivedRow {
    /// Expected hit, plane-local x (m)
    pub expected_x: Float,
    /// Expected hit, plane-local y (m)
    pub expected_y: Float,
    /// Residual, plane-local x (m)
    pub dx: Float,
    /// Residual, plane-local y (m)
    pub dy: Float,
}

/// Counts of skipped events per degenerate cause
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipCounts {
    /// Events with zero-magnitude momentum
    pub degenerate_momentum: usize,

    /// Events whose recoil ray was parallel to the plane
    pub parallel_ray: usize,
}
//
impl SkipCounts {
    fn count(&mut self, cause: EventError) {
        match cause {
            EventError::DegenerateMomentum => self.degenerate_momentum += 1,
            EventError::ParallelRay => self.parallel_ray += 1,
        }
    }

    /// Total number of skipped events
    pub fn total(&self) -> usize {
        self.degenerate_momentum + self.parallel_ray
    }
}

/// Results of one event range, mergeable across ranges
#[derive(Debug)]
pub struct RunAccumulator {
    /// Number of events whose observables were computed
    pub processed: usize,

    /// Events passing the quasi-elastic selection
    pub selected: usize,

    /// Events skipped under the skip policy
    pub skips: SkipCounts,

    /// Sum of selected-event residuals, for the run summary
    pub residual_sum: Vector2<Float>,

    /// Derived rows in event order (write-back mode only)
    pub rows: Vec<DerivedRow>,

    /// Histogram set of this range
    pub histograms: RunHistograms,

    /// Whether derived rows are being collected
    collect_rows: bool,

    /// Active degenerate-event policy
    policy: DegeneratePolicy,
}
//
impl RunAccumulator {
    /// Accumulator for write-back mode: rows are collected 1:1 with events
    /// and any degenerate event aborts the pass
    pub fn for_append() -> Self {
        Self::new(DegeneratePolicy::Abort, true)
    }

    /// Accumulator for histogram mode: degenerate events are skipped and
    /// counted, no rows are kept
    pub fn for_histograms() -> Self {
        Self::new(DegeneratePolicy::Skip, false)
    }

    fn new(policy: DegeneratePolicy, collect_rows: bool) -> Self {
        RunAccumulator {
            processed: 0,
            selected: 0,
            skips: SkipCounts::default(),
            residual_sum: Vector2::zero(),
            rows: Vec::new(),
            histograms: RunHistograms::new(),
            collect_rows,
            policy,
        }
    }

    /// Fold one event's outcome into the accumulator
    ///
    /// `outcome` carries the observables and the two-tier selection verdict,
    /// or the degenerate condition the computation ran into. Derived rows
    /// are kept 1:1 with events, but only pre-selected events reach the
    /// histograms. Under the abort policy the degenerate condition is
    /// promoted to a run-fatal error tagged with the event index.
    pub fn record(
        &mut self,
        index: usize,
        outcome: Result<(DerivedObservables, CutVerdict), EventError>,
    ) -> Result<(), AnalysisError> {
        match outcome {
            Ok((obs, verdict)) => {
                self.processed += 1;
                if verdict.selected {
                    self.selected += 1;
                    self.residual_sum += Vector2::new(obs.dx, obs.dy);
                }
                if self.collect_rows {
                    self.rows.push(DerivedRow {
                        expected_x: obs.expected_x,
                        expected_y: obs.expected_y,
                        dx: obs.dx,
                        dy: obs.dy,
                    });
                }
                if verdict.preselected {
                    self.histograms.fill(&obs, verdict.selected);
                }
                Ok(())
            }
            Err(source) => match self.policy {
                DegeneratePolicy::Abort => Err(AnalysisError::Event { index, source }),
                DegeneratePolicy::Skip => {
                    self.skips.count(source);
                    Ok(())
                }
            },
        }
    }

    /// Merge the results of the next contiguous event range
    pub fn merge(&mut self, other: Self) {
        debug_assert_eq!(self.policy, other.policy);
        self.processed += other.processed;
        self.selected += other.selected;
        self.skips.degenerate_momentum += other.skips.degenerate_momentum;
        self.skips.parallel_ray += other.skips.parallel_ray;
        self.residual_sum += other.residual_sum;
        self.rows.extend(other.rows);
        self.histograms.merge(&other.histograms);
    }

    /// Mean residual of the selected events, if any were selected
    pub fn mean_residual(&self) -> Option<(Float, Float)> {
        if self.selected == 0 {
            return None;
        }
        let n = self.selected as Float;
        Some((self.residual_sum[0] / n, self.residual_sum[1] / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn observables(dx: Float, dy: Float) -> DerivedObservables {
        DerivedObservables {
            theta: 0.6,
            phi: 0.0,
            momentum_magnitude: 2.1,
            q2: 2.5,
            w2: 1.0,
            q2_cal: 2.4,
            w2_cal: 1.2,
            elastic_energy: 2.0,
            expected_x: 0.0,
            expected_y: 0.0,
            dx,
            dy,
            vertex: Vector3::zeros(),
            cointime: 100.0,
        }
    }

    fn verdict(selected: bool) -> CutVerdict {
        CutVerdict {
            preselected: true,
            selected,
        }
    }

    #[test]
    fn skip_policy_counts_per_cause() {
        let mut acc = RunAccumulator::for_histograms();
        acc.record(0, Ok((observables(0.1, 0.0), verdict(true)))).unwrap();
        acc.record(1, Err(EventError::DegenerateMomentum)).unwrap();
        acc.record(2, Err(EventError::ParallelRay)).unwrap();
        assert_eq!(acc.processed, 1);
        assert_eq!(acc.skips.degenerate_momentum, 1);
        assert_eq!(acc.skips.parallel_ray, 1);
        assert_eq!(acc.skips.total(), 2);
        assert!(acc.rows.is_empty());
    }

    #[test]
    fn histograms_only_receive_preselected_events() {
        // A row is still produced, but nothing is binned
        let mut acc = RunAccumulator::for_append();
        let rejected = CutVerdict {
            preselected: false,
            selected: false,
        };
        acc.record(0, Ok((observables(0.1, 0.0), rejected))).unwrap();
        acc.record(1, Ok((observables(0.2, 0.0), verdict(false)))).unwrap();
        assert_eq!(acc.processed, 2);
        assert_eq!(acc.rows.len(), 2);
        assert_eq!(acc.histograms.dx.entries(), 1);
        assert_eq!(acc.histograms.dx_cut.entries(), 0);
    }

    #[test]
    fn abort_policy_promotes_the_event_index() {
        let mut acc = RunAccumulator::for_append();
        let err = acc
            .record(42, Err(EventError::ParallelRay))
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Event {
                index: 42,
                source: EventError::ParallelRay
            }
        ));
    }

    #[test]
    fn merge_preserves_row_order_and_totals() {
        let mut first = RunAccumulator::for_append();
        first
            .record(0, Ok((observables(0.1, 0.0), verdict(true))))
            .unwrap();
        first
            .record(1, Ok((observables(0.2, 0.0), verdict(false))))
            .unwrap();
        let mut second = RunAccumulator::for_append();
        second
            .record(2, Ok((observables(0.3, 0.0), verdict(true))))
            .unwrap();

        first.merge(second);
        assert_eq!(first.processed, 3);
        assert_eq!(first.selected, 2);
        let dx: Vec<Float> = first.rows.iter().map(|row| row.dx).collect();
        assert_eq!(dx, vec![0.1, 0.2, 0.3]);
        let (mean_dx, mean_dy) = first.mean_residual().unwrap();
        assert!((mean_dx - 0.2).abs() < 1e-12);
        assert!(mean_dy.abs() < 1e-12);
    }
}
