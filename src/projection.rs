//! Intersection of the recoil ray with the calorimeter plane
//!
//! The ray starts at the reaction vertex and follows the recoil direction;
//! its intersection with the calorimeter plane, expressed in the plane's
//! local coordinates, is the expected hit position against which the
//! measured hit is compared.

use crate::{error::EventError, geometry::DetectorGeometry, numeric::Float};

use nalgebra::Vector3;

/// Expected hit position in the plane-local coordinates (m)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedHit {
    /// Local "x" component, along the dispersive axis
    pub x: Float,

    /// Local "y" component, along the non-dispersive axis
    pub y: Float,
}

/// Intersect the ray `vertex + t·direction` with the calorimeter plane
///
/// Solves `t = (O − vertex)·n / (direction·n)`, then projects the offset of
/// the intersection point from the plane origin onto the in-plane basis.
/// The direction need not be unit length; the intersection point does not
/// depend on its magnitude.
pub fn project(
    geometry: &DetectorGeometry,
    vertex: &Vector3<Float>,
    direction: &Vector3<Float>,
) -> Result<ExpectedHit, EventError> {
    let denominator = direction.dot(&geometry.normal);
    if denominator == 0. {
        return Err(EventError::ParallelRay);
    }
    let t = (geometry.origin - vertex).dot(&geometry.normal) / denominator;
    let intersection = vertex + direction * t;
    let offset = intersection - geometry.origin;
    Ok(ExpectedHit {
        x: offset.dot(&geometry.horizontal),
        y: offset.dot(&geometry.vertical),
    })
}
