//! Per-event quasi-elastic selection
//!
//! The selection has two tiers, as in the reference analysis: an outer
//! pre-selection on the raw readout (vertex fiducial volume, calorimeter
//! activity, beam monitor) that gates every downstream aggregate, and an
//! inner kinematic cut (E/p band, Q², W², |dy|) that defines the
//! quasi-elastic sample proper.
//!
//! Boundary conventions follow the reference selection: fiducial bounds are
//! inclusive, energy thresholds strict, the E/p band inclusive on both
//! edges, the Q² floor inclusive, the W² ceiling and the |dy| bound strict.

use crate::{event::EventRecord, numeric::Float, observables::DerivedObservables};

use prefix_num_ops::real::*;

/// Two-tier verdict of the selection on one event
#[derive(Debug, Clone, Copy)]
pub struct CutVerdict {
    /// Event passes the outer pre-selection
    pub preselected: bool,

    /// Event also passes the full quasi-elastic selection
    pub selected: bool,
}

/// Thresholds of the per-event selection
#[derive(Debug, Clone)]
pub struct EventCut {
    /// Fiducial half-width on the vertex x coordinate (m)
    pub vertex_x_max: Float,

    /// Fiducial half-width on the vertex y coordinate (m)
    pub vertex_y_max: Float,

    /// Fiducial half-width on the vertex z coordinate (m)
    pub vertex_z_max: Float,

    /// Minimum HCAL cluster energy (GeV)
    pub min_cluster_energy: Float,

    /// Minimum preshower segment energy (GeV)
    pub min_preshower_energy: Float,

    /// Lower edge of the electron PID band on E/p
    pub min_e_over_p: Float,

    /// Upper edge of the electron PID band on E/p
    pub max_e_over_p: Float,

    /// Minimum Q² (GeV²)
    pub min_q2: Float,

    /// Maximum W² (GeV²)
    pub max_w2: Float,

    /// Bound on the non-dispersive residual |dy| (m)
    pub max_abs_dy: Float,
}
//
impl EventCut {
    /// Standard thresholds of the quasi-elastic selection
    ///
    /// Only the Q² floor varies across kinematics settings.
    pub fn with_min_q2(min_q2: Float) -> Self {
        EventCut {
            vertex_x_max: 0.0115,
            vertex_y_max: 0.0115,
            vertex_z_max: 0.27,
            min_cluster_energy: 0.025,
            min_preshower_energy: 0.2,
            min_e_over_p: 0.85,
            max_e_over_p: 1.15,
            min_q2,
            max_w2: 2.0,
            max_abs_dy: 0.5,
        }
    }

    /// Outer pre-selection on the raw readout
    ///
    /// This is the gate on all downstream aggregates; events failing it are
    /// never histogrammed.
    pub fn preselect(&self, event: &EventRecord) -> bool {
        // Vertex must lie inside the target fiducial volume
        if abs(event.vertex_x) > self.vertex_x_max {
            return false;
        }
        if abs(event.vertex_y) > self.vertex_y_max {
            return false;
        }
        if abs(event.vertex_z) > self.vertex_z_max {
            return false;
        }

        // Calorimeter activity thresholds
        if event.hcal_energy <= self.min_cluster_energy {
            return false;
        }
        if event.preshower_energy <= self.min_preshower_energy {
            return false;
        }

        // Beam monitor must report a physical reading
        event.beam_monitor_energy > 0.
    }

    /// Evaluate both selection tiers on one event
    pub fn evaluate(&self, event: &EventRecord, obs: &DerivedObservables) -> CutVerdict {
        let preselected = self.preselect(event);
        CutVerdict {
            preselected,
            selected: preselected && self.kinematic_cut(event, obs),
        }
    }

    /// Decide whether an event enters the quasi-elastic sample
    pub fn keep(&self, event: &EventRecord, obs: &DerivedObservables) -> bool {
        self.evaluate(event, obs).selected
    }

    /// Inner kinematic cut, evaluated on pre-selected events only
    fn kinematic_cut(&self, event: &EventRecord, obs: &DerivedObservables) -> bool {
        // Electron PID band on E/p
        if event.e_over_p < self.min_e_over_p || event.e_over_p > self.max_e_over_p {
            return false;
        }

        // Kinematic selection
        if obs.q2 < self.min_q2 {
            return false;
        }
        if obs.w2 >= self.max_w2 {
            return false;
        }

        // Quasi-elastic band in the non-dispersive residual
        abs(obs.dy) < self.max_abs_dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    /// An event and observables that pass every cut with margin
    fn passing_pair() -> (EventRecord, DerivedObservables) {
        let event = EventRecord {
            beam_monitor_energy: 4291.0,
            momentum_x: 1.2,
            momentum_y: 0.05,
            momentum_z: 1.7,
            vertex_x: 0.001,
            vertex_y: -0.002,
            vertex_z: 0.05,
            preshower_energy: 0.5,
            shower_energy: 1.5,
            e_over_p: 1.0,
            hcal_x: 0.1,
            hcal_y: -0.05,
            hcal_energy: 0.3,
            hcal_time: 95.0,
            shower_time: -1060.0,
        };
        let obs = DerivedObservables {
            theta: 0.6,
            phi: 0.04,
            momentum_magnitude: 2.08,
            q2: 2.5,
            w2: 1.1,
            q2_cal: 2.4,
            w2_cal: 1.3,
            elastic_energy: 2.1,
            expected_x: 0.05,
            expected_y: -0.02,
            dx: 0.05,
            dy: -0.03,
            vertex: event.vertex(),
            cointime: 1155.0,
        };
        (event, obs)
    }

    fn cut() -> EventCut {
        EventCut::with_min_q2(2.0)
    }

    #[test]
    fn nominal_event_is_kept() {
        let (event, obs) = passing_pair();
        assert!(cut().keep(&event, &obs));
    }

    #[test]
    fn fiducial_bounds_are_inclusive() {
        let cut = cut();
        let (mut event, obs) = passing_pair();
        event.vertex_z = cut.vertex_z_max;
        assert!(cut.keep(&event, &obs));
        event.vertex_z = cut.vertex_z_max + 1e-6;
        assert!(!cut.keep(&event, &obs));
        event.vertex_z = -cut.vertex_z_max;
        assert!(cut.keep(&event, &obs));
    }

    #[test]
    fn energy_thresholds_are_strict() {
        let cut = cut();
        let (mut event, obs) = passing_pair();
        event.hcal_energy = cut.min_cluster_energy;
        assert!(!cut.keep(&event, &obs));
        event.hcal_energy = cut.min_cluster_energy + 1e-6;
        assert!(cut.keep(&event, &obs));

        let (mut event, obs) = passing_pair();
        event.preshower_energy = cut.min_preshower_energy;
        assert!(!cut.keep(&event, &obs));
    }

    #[test]
    fn pid_band_is_inclusive_on_both_edges() {
        let cut = cut();
        let (mut event, obs) = passing_pair();
        event.e_over_p = cut.min_e_over_p;
        assert!(cut.keep(&event, &obs));
        event.e_over_p = cut.max_e_over_p;
        assert!(cut.keep(&event, &obs));
        event.e_over_p = cut.max_e_over_p + 1e-6;
        assert!(!cut.keep(&event, &obs));
    }

    #[test]
    fn kinematic_bounds_follow_their_conventions() {
        let cut = cut();
        let (event, mut obs) = passing_pair();
        obs.q2 = cut.min_q2;
        assert!(cut.keep(&event, &obs));
        obs.q2 = cut.min_q2 - 1e-6;
        assert!(!cut.keep(&event, &obs));

        let (event, mut obs) = passing_pair();
        obs.w2 = cut.max_w2;
        assert!(!cut.keep(&event, &obs));
        obs.w2 = cut.max_w2 - 1e-6;
        assert!(cut.keep(&event, &obs));

        let (event, mut obs) = passing_pair();
        obs.dy = cut.max_abs_dy;
        assert!(!cut.keep(&event, &obs));
        obs.dy = -(cut.max_abs_dy - 1e-6);
        assert!(cut.keep(&event, &obs));
    }

    #[test]
    fn selection_tiers_are_nested() {
        let cut = cut();

        // Failing the inner kinematic cut keeps the pre-selection verdict
        let (event, mut obs) = passing_pair();
        obs.w2 = 5.0;
        let verdict = cut.evaluate(&event, &obs);
        assert!(verdict.preselected);
        assert!(!verdict.selected);

        // Failing the pre-selection fails both tiers, whatever the
        // kinematics say
        let (mut event, obs) = passing_pair();
        event.vertex_z = 1.0;
        assert!(!cut.preselect(&event));
        let verdict = cut.evaluate(&event, &obs);
        assert!(!verdict.preselected);
        assert!(!verdict.selected);
    }

    #[test]
    fn each_cut_contributes_independently() {
        // Breaking any single condition must flip the overall AND
        let cut = cut();

        let (mut event, obs) = passing_pair();
        event.beam_monitor_energy = 0.;
        assert!(!cut.keep(&event, &obs));

        let (mut event, obs) = passing_pair();
        event.vertex_x = 0.1;
        assert!(!cut.keep(&event, &obs));

        let (mut event, obs) = passing_pair();
        event.vertex_y = -0.1;
        assert!(!cut.keep(&event, &obs));

        let (event, mut obs) = passing_pair();
        obs.vertex = Vector3::zeros();
        obs.dy = 0.7;
        assert!(!cut.keep(&event, &obs));
    }
}
