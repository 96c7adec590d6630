//! Four-vector kinematics of the electron-nucleon scattering reaction
//!
//! Invariants are computed under two hypotheses for the scattered-electron
//! energy. The measured hypothesis combines the track direction with an
//! energy measured elsewhere (track momentum magnitude or calorimeter sum).
//! The elastic hypothesis derives the energy from two-body kinematics off a
//! nucleon at rest, using only the scattering angle.
//!
//! All Minkowski products use the timelike-positive metric, so Q² = −q·q
//! comes out positive for physical spacelike exchange.

use crate::{error::EventError, numeric::Float};

use nalgebra::{SVector, Vector3};

use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum
pub type FourMomentum = SVector<Float, MOMENTUM_DIM>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Minkowski square under the timelike-positive metric: E² − |p⃗|²
pub fn minkowski_square(p: &FourMomentum) -> Float {
    p[E] * p[E] - p[X] * p[X] - p[Y] * p[Y] - p[Z] * p[Z]
}

/// Spatial part of a 4-momentum
pub fn spatial(p: &FourMomentum) -> Vector3<Float> {
    Vector3::new(p[X], p[Y], p[Z])
}

/// Build a 4-momentum from its spatial part and energy
pub fn from_spatial(p: &Vector3<Float>, energy: Float) -> FourMomentum {
    FourMomentum::new(p[0], p[1], p[2], energy)
}

/// Invariants of one scattering hypothesis
#[derive(Debug, Clone)]
pub struct ScatteringKinematics {
    /// Polar scattering angle of the track (rad)
    pub theta: Float,

    /// Azimuthal angle of the track (rad)
    pub phi: Float,

    /// Scattered-electron energy under this hypothesis (GeV)
    pub scattered_energy: Float,

    /// Momentum-transfer 4-vector q = k − k′
    pub q: FourMomentum,

    /// Recoil 4-vector P′ = q + P_target
    pub recoil: FourMomentum,

    /// Q² = −q·q, positive for spacelike exchange (GeV²)
    pub q2: Float,

    /// W² = P′·P′, invariant mass squared of the recoil system (GeV²)
    pub w2: Float,
}
//
impl ScatteringKinematics {
    /// Measured-energy hypothesis
    ///
    /// The scattered 4-momentum combines the track's spatial momentum with a
    /// separately measured energy supplied by the caller.
    pub fn measured(
        beam_energy: Float,
        nucleon_mass: Float,
        momentum: &Vector3<Float>,
        scattered_energy: Float,
    ) -> Result<Self, EventError> {
        let (theta, phi) = track_angles(momentum)?;
        let scattered = from_spatial(momentum, scattered_energy);
        Ok(Self::from_scattered(
            beam_energy,
            nucleon_mass,
            theta,
            phi,
            scattered,
        ))
    }

    /// Elastic hypothesis
    ///
    /// The scattered energy is E′ = E / (1 + (E/M)(1 − cos θ)) and the
    /// scattered 4-momentum is rebuilt from the track angles at that energy,
    /// massless-electron approximation throughout.
    pub fn elastic(
        beam_energy: Float,
        nucleon_mass: Float,
        momentum: &Vector3<Float>,
    ) -> Result<Self, EventError> {
        let (theta, phi) = track_angles(momentum)?;
        let energy = beam_energy / (1. + beam_energy / nucleon_mass * (1. - cos(theta)));
        let direction = Vector3::new(
            cos(phi) * sin(theta),
            sin(phi) * sin(theta),
            cos(theta),
        );
        let scattered = from_spatial(&(direction * energy), energy);
        Ok(Self::from_scattered(
            beam_energy,
            nucleon_mass,
            theta,
            phi,
            scattered,
        ))
    }

    /// Shared tail of both hypotheses: beam along +z, target at rest
    fn from_scattered(
        beam_energy: Float,
        nucleon_mass: Float,
        theta: Float,
        phi: Float,
        scattered: FourMomentum,
    ) -> Self {
        let beam = FourMomentum::new(0., 0., beam_energy, beam_energy);
        let target = FourMomentum::new(0., 0., 0., nucleon_mass);
        let q = beam - scattered;
        let recoil = q + target;
        let q2 = -minkowski_square(&q);
        let w2 = minkowski_square(&recoil);
        ScatteringKinematics {
            theta,
            phi,
            scattered_energy: scattered[E],
            q,
            recoil,
            q2,
            w2,
        }
    }

    /// Unit direction of the recoil's spatial momentum
    ///
    /// Undefined when the recoil carries no spatial momentum, which happens
    /// for exactly forward elastic scattering.
    pub fn recoil_direction(&self) -> Result<Vector3<Float>, EventError> {
        let p = spatial(&self.recoil);
        let magnitude = p.norm();
        if magnitude == 0. {
            return Err(EventError::DegenerateMomentum);
        }
        Ok(p / magnitude)
    }
}

/// Polar and azimuthal angles of a track momentum
///
/// Fails on an exactly zero momentum, whose direction is undefined.
fn track_angles(momentum: &Vector3<Float>) -> Result<(Float, Float), EventError> {
    let magnitude = momentum.norm();
    if magnitude == 0. {
        return Err(EventError::DegenerateMomentum);
    }
    let theta = (momentum[2] / magnitude).clamp(-1., 1.).acos();
    let phi = momentum[1].atan2(momentum[0]);
    Ok((theta, phi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NUCLEON_MASS;

    const TOLERANCE: Float = 1e-9;

    #[test]
    fn zero_momentum_is_degenerate() {
        let zero = Vector3::zeros();
        assert_eq!(
            ScatteringKinematics::measured(4.291, NUCLEON_MASS, &zero, 1.).unwrap_err(),
            EventError::DegenerateMomentum
        );
        assert_eq!(
            ScatteringKinematics::elastic(4.291, NUCLEON_MASS, &zero).unwrap_err(),
            EventError::DegenerateMomentum
        );
    }

    #[test]
    fn forward_elastic_scattering_keeps_the_beam_energy() {
        let momentum = Vector3::new(0., 0., 2.0);
        let kin = ScatteringKinematics::elastic(4.291, NUCLEON_MASS, &momentum).unwrap();
        assert!(abs(kin.theta) < TOLERANCE);
        assert!(abs(kin.scattered_energy - 4.291) < TOLERANCE);
        assert!(abs(kin.q2) < TOLERANCE);
        assert!(abs(kin.w2 - NUCLEON_MASS * NUCLEON_MASS) < TOLERANCE);
    }

    #[test]
    fn elastic_recoil_mass_is_the_nucleon_mass() {
        // W² = M² is an identity of the elastic solution at any angle
        for momentum in [
            Vector3::new(0.9, 0.1, 1.7),
            Vector3::new(-0.4, 0.8, 2.5),
            Vector3::new(0.02, -1.1, 0.6),
        ] {
            let kin = ScatteringKinematics::elastic(6.373, NUCLEON_MASS, &momentum).unwrap();
            assert!(abs(kin.w2 - NUCLEON_MASS * NUCLEON_MASS) < 1e-9);
            assert!(kin.q2 > 0.);
        }
    }

    #[test]
    fn q2_matches_the_two_body_formula() {
        // For a massless electron, Q² = 2 E E′ (1 − cos θ) under either
        // hypothesis
        let momentum = Vector3::new(1.2, 0.05, 1.7);
        let beam_energy = 4.291;

        let elastic = ScatteringKinematics::elastic(beam_energy, NUCLEON_MASS, &momentum).unwrap();
        let expected =
            2. * beam_energy * elastic.scattered_energy * (1. - cos(elastic.theta));
        assert!(abs(elastic.q2 - expected) < TOLERANCE);

        let scattered_energy = momentum.norm();
        let measured =
            ScatteringKinematics::measured(beam_energy, NUCLEON_MASS, &momentum, scattered_energy)
                .unwrap();
        let expected = 2. * beam_energy * scattered_energy * (1. - cos(measured.theta));
        assert!(abs(measured.q2 - expected) < TOLERANCE);
    }

    #[test]
    fn measured_hypothesis_at_the_elastic_point_is_elastic() {
        // Feeding the elastic energy back through the measured hypothesis
        // must reproduce the elastic invariants
        let momentum = Vector3::new(0.9, -0.2, 1.5);
        let elastic = ScatteringKinematics::elastic(4.291, NUCLEON_MASS, &momentum).unwrap();
        let rescaled = momentum / momentum.norm() * elastic.scattered_energy;
        let measured = ScatteringKinematics::measured(
            4.291,
            NUCLEON_MASS,
            &rescaled,
            elastic.scattered_energy,
        )
        .unwrap();
        assert!(abs(measured.q2 - elastic.q2) < TOLERANCE);
        assert!(abs(measured.w2 - elastic.w2) < TOLERANCE);
    }

    #[test]
    fn recoil_direction_is_unit_length() {
        let momentum = Vector3::new(1.2, 0.05, 1.7);
        let kin = ScatteringKinematics::elastic(4.291, NUCLEON_MASS, &momentum).unwrap();
        let direction = kin.recoil_direction().unwrap();
        assert!(abs(direction.norm() - 1.) < TOLERANCE);
    }

    #[test]
    fn forward_elastic_recoil_has_no_direction() {
        let momentum = Vector3::new(0., 0., 2.0);
        let kin = ScatteringKinematics::elastic(4.291, NUCLEON_MASS, &momentum).unwrap();
        assert_eq!(
            kin.recoil_direction().unwrap_err(),
            EventError::DegenerateMomentum
        );
    }
}
