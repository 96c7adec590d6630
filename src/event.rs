//! Per-event detector readout

use crate::numeric::Float;

use nalgebra::Vector3;

/// Names of the table fields the analysis reads, in binding order
///
/// These are the column names produced by the reconstruction upstream of
/// this analysis; they are bound once, before the first event is read.
pub const REQUIRED_FIELDS: [&str; 15] = [
    "HALLA_p",
    "bb.tr.px",
    "bb.tr.py",
    "bb.tr.pz",
    "bb.tr.vx",
    "bb.tr.vy",
    "bb.tr.vz",
    "bb.ps.e",
    "bb.sh.e",
    "bb.etot_over_p",
    "sbs.hcal.x",
    "sbs.hcal.y",
    "sbs.hcal.e",
    "sbs.hcal.atimeblk",
    "bb.sh.atimeblk",
];

/// One detector event, immutable for the duration of its processing
#[derive(Debug, Clone, Copy)]
pub struct EventRecord {
    /// Beam-monitor (EPICS) energy reading (MeV)
    pub beam_monitor_energy: Float,

    /// Scattered-track momentum, x component (GeV)
    pub momentum_x: Float,
    /// Scattered-track momentum, y component (GeV)
    pub momentum_y: Float,
    /// Scattered-track momentum, z component (GeV)
    pub momentum_z: Float,

    /// Reaction-vertex position, x component (m)
    pub vertex_x: Float,
    /// Reaction-vertex position, y component (m)
    pub vertex_y: Float,
    /// Reaction-vertex position, z component (m)
    pub vertex_z: Float,

    /// Preshower segment energy (GeV)
    pub preshower_energy: Float,
    /// Shower segment energy (GeV)
    pub shower_energy: Float,
    /// PID ratio: energy deposited over track momentum
    pub e_over_p: Float,

    /// Measured HCAL hit, plane-local x coordinate (m)
    pub hcal_x: Float,
    /// Measured HCAL hit, plane-local y coordinate (m)
    pub hcal_y: Float,
    /// HCAL cluster energy (GeV)
    pub hcal_energy: Float,
    /// HCAL block ADC time (ns)
    pub hcal_time: Float,

    /// BigBite shower block ADC time (ns)
    pub shower_time: Float,
}
//
impl EventRecord {
    /// Track momentum as a lab-frame 3-vector
    pub fn momentum(&self) -> Vector3<Float> {
        Vector3::new(self.momentum_x, self.momentum_y, self.momentum_z)
    }

    /// Reaction vertex as a lab-frame 3-vector
    pub fn vertex(&self) -> Vector3<Float> {
        Vector3::new(self.vertex_x, self.vertex_y, self.vertex_z)
    }
}
