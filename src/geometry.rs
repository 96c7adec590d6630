//! Lab-frame model of the calorimeter plane
//!
//! The calorimeter stands at a fixed distance from the target, on the other
//! side of the beam line from the electron spectrometer, tilted about the
//! lab vertical (y) axis. Everything downstream of this module works in the
//! plane's local 2-D coordinates, so the basis derived here must be exactly
//! orthonormal.

use crate::numeric::{floats::consts::PI, Float};

use nalgebra::Vector3;

use prefix_num_ops::real::*;

/// Position and orientation of the calorimeter plane, derived once per run
#[derive(Debug, Clone)]
pub struct DetectorGeometry {
    /// Center of the calorimeter face (lab frame, m)
    pub origin: Vector3<Float>,

    /// Unit normal of the plane, pointing back toward the target
    pub normal: Vector3<Float>,

    /// In-plane unit vector of the local "x" (dispersive) coordinate
    pub horizontal: Vector3<Float>,

    /// In-plane unit vector of the local "y" (non-dispersive) coordinate
    pub vertical: Vector3<Float>,
}
//
impl DetectorGeometry {
    /// Build the plane basis from the calorimeter distance (m) and tilt
    /// angle about the lab vertical axis (rad)
    ///
    /// The raw in-plane direction inherited from the reference analysis is
    /// only orthogonal to the normal at a 45 degree tilt, so its normal
    /// component is removed and the result renormalized before the last
    /// basis vector is taken as a cross product. {normal, horizontal,
    /// vertical} is then a right-handed orthonormal frame for any tilt.
    pub fn new(distance: Float, angle: Float) -> Self {
        assert!(distance > 0., "calorimeter distance must be positive");
        assert!(
            angle > 0. && angle < PI / 2.,
            "calorimeter tilt must lie in (0, pi/2)"
        );

        let origin = Vector3::new(-distance * sin(angle), 0., distance * cos(angle));
        let normal = Vector3::new(sin(angle), 0., cos(angle));

        let raw = Vector3::new(sin(PI - angle), 0., cos(PI - angle));
        let vertical = (raw - normal * raw.dot(&normal)).normalize();
        let horizontal = vertical.cross(&normal);

        DetectorGeometry {
            origin,
            normal,
            horizontal,
            vertical,
        }
    }
}
