//! Resolution of the run configuration from its enumerated names
//!
//! The original analysis repeated an if/else ladder over the kinematics name
//! in every script variant, and the copies had drifted apart (beam energies
//! of 4.291 vs 4.30 GeV for the same setting). The lookup table below is the
//! single source of truth for all run-period constants.

use crate::{error::AnalysisError, evcut::EventCut, numeric::Float};

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Nucleon rest mass (GeV)
pub const NUCLEON_MASS: Float = 0.9385;

/// Distance from the target to the HCAL front face (m), common to all
/// kinematics settings
const HCAL_DISTANCE: Float = 17.0;

/// Enumerated kinematics settings of the experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kinematics {
    /// GEN2 running, E_beam = 4.291 GeV
    Kin2,
    /// GEN3 running, E_beam = 6.373 GeV
    Kin3,
    /// GEN4 running, E_beam = 8.448 GeV
    Kin4a,
    /// GEN4b running, same beam as kin4a with a different field setting
    Kin4b,
}
//
impl Kinematics {
    /// Every valid kinematics setting
    pub const ALL: [Kinematics; 4] = [
        Kinematics::Kin2,
        Kinematics::Kin3,
        Kinematics::Kin4a,
        Kinematics::Kin4b,
    ];

    /// Name used on the command line and in data directory paths
    pub fn tag(self) -> &'static str {
        match self {
            Kinematics::Kin2 => "kin2",
            Kinematics::Kin3 => "kin3",
            Kinematics::Kin4a => "kin4a",
            Kinematics::Kin4b => "kin4b",
        }
    }
}

impl FromStr for Kinematics {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kin2" => Ok(Kinematics::Kin2),
            "kin3" => Ok(Kinematics::Kin3),
            "kin4a" => Ok(Kinematics::Kin4a),
            "kin4b" => Ok(Kinematics::Kin4b),
            _ => Err(AnalysisError::InvalidConfiguration(s.to_owned())),
        }
    }
}

/// Target material in the scattering chamber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Polarized helium-3 cell
    He3,
    /// Hydrogen reference cell
    Hydrogen,
}
//
impl Target {
    /// Name used on the command line and in data directory paths
    pub fn tag(self) -> &'static str {
        match self {
            Target::He3 => "He3",
            Target::Hydrogen => "H",
        }
    }
}

impl FromStr for Target {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "He3" => Ok(Target::He3),
            "H" => Ok(Target::Hydrogen),
            _ => Err(AnalysisError::InvalidTarget(s.to_owned())),
        }
    }
}

/// Reconstruction pass the input data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// First reconstruction pass
    Pass1,
    /// Second reconstruction pass
    Pass2,
}
//
impl Pass {
    /// Name used on the command line and in data directory paths
    pub fn tag(self) -> &'static str {
        match self {
            Pass::Pass1 => "pass1",
            Pass::Pass2 => "pass2",
        }
    }
}

impl FromStr for Pass {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass1" => Ok(Pass::Pass1),
            "pass2" => Ok(Pass::Pass2),
            _ => Err(AnalysisError::InvalidPass(s.to_owned())),
        }
    }
}

/// Which scattering hypothesis supplies the recoil direction that is
/// intersected with the calorimeter plane
///
/// The reference analysis was ambiguous on this point (one script projected
/// the elastic-hypothesis recoil, a near-identical one the measured-energy
/// recoil), so the choice is an explicit named setting rather than an
/// accident of which temporary was passed where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionSource {
    /// Recoil of the elastic two-body solution
    Elastic,
    /// Recoil built from the measured track energy
    Measured,
}

/// Constants of one experimental run period
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Kinematics setting these constants belong to
    pub kinematics: Kinematics,

    /// Run-period name used in data file names
    pub experiment_name: &'static str,

    /// Beam energy (GeV)
    pub beam_energy: Float,

    /// HCAL distance from the target (m)
    pub hcal_distance: Float,

    /// HCAL tilt angle about the lab vertical axis (rad)
    pub hcal_angle: Float,

    /// Hypothesis supplying the projection direction
    pub direction_source: DirectionSource,

    /// Per-event selection thresholds
    pub cuts: EventCut,
}
//
impl ExperimentConfig {
    /// Look up the constants of a kinematics setting
    ///
    /// Only the beam energy, calorimeter tilt and Q² floor vary across
    /// settings; everything else is common to the whole experiment.
    pub fn for_kinematics(kinematics: Kinematics) -> Self {
        let (experiment_name, beam_energy, angle_deg, min_q2) = match kinematics {
            Kinematics::Kin2 => ("GEN2", 4.291, 34.7, 2.0),
            Kinematics::Kin3 => ("GEN3", 6.373, 21.6, 5.2),
            Kinematics::Kin4a => ("GEN4", 8.448, 18.0, 8.0),
            Kinematics::Kin4b => ("GEN4b", 8.448, 18.0, 8.0),
        };
        ExperimentConfig {
            kinematics,
            experiment_name,
            beam_energy,
            hcal_distance: HCAL_DISTANCE,
            hcal_angle: (angle_deg as Float).to_radians(),
            direction_source: DirectionSource::Elastic,
            cuts: EventCut::with_min_q2(min_q2),
        }
    }

    /// Input file location derived from {pass, kinematics, target}
    ///
    /// This is a packaging convention of the experiment's data layout, not
    /// part of the analysis logic.
    pub fn input_path(&self, base_dir: &Path, target: Target, pass: Pass) -> PathBuf {
        base_dir
            .join("data")
            .join("raw")
            .join(pass.tag())
            .join(format!("{}_{}", self.kinematics.tag(), target.tag()))
            .join(format!(
                "QE_data_{}_sbs100p_nucleon_np.tsv",
                self.experiment_name
            ))
    }

    /// Display the configuration before the run starts
    pub fn print(&self) {
        println!("Kinematics          : {}", self.kinematics.tag());
        println!("Experiment          : {}", self.experiment_name);
        println!("E beam        (GeV) : {}", self.beam_energy);
        println!("Nucleon mass  (GeV) : {}", NUCLEON_MASS);
        println!("HCAL distance   (m) : {}", self.hcal_distance);
        println!("HCAL angle    (rad) : {}", self.hcal_angle);
        println!("Q2 minimum   (GeV2) : {}", self.cuts.min_q2);
        println!("W2 maximum   (GeV2) : {}", self.cuts.max_w2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_setting_resolves() {
        for kinematics in Kinematics::ALL {
            let cfg = ExperimentConfig::for_kinematics(kinematics);
            assert_eq!(cfg.kinematics, kinematics);
            assert!(cfg.beam_energy > 0.);
            assert!(cfg.hcal_angle > 0. && cfg.hcal_angle < crate::numeric::floats::consts::FRAC_PI_2);
            assert_eq!(cfg.direction_source, DirectionSource::Elastic);
        }
    }

    #[test]
    fn name_round_trips() {
        for kinematics in Kinematics::ALL {
            assert_eq!(kinematics.tag().parse::<Kinematics>().unwrap(), kinematics);
        }
        assert_eq!("He3".parse::<Target>().unwrap(), Target::He3);
        assert_eq!("H".parse::<Target>().unwrap(), Target::Hydrogen);
        assert_eq!("pass2".parse::<Pass>().unwrap(), Pass::Pass2);
    }

    #[test]
    fn unknown_names_are_rejected() {
        use crate::error::AnalysisError;
        assert!(matches!(
            "kin5".parse::<Kinematics>(),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            "D2".parse::<Target>(),
            Err(AnalysisError::InvalidTarget(_))
        ));
        assert!(matches!(
            "pass3".parse::<Pass>(),
            Err(AnalysisError::InvalidPass(_))
        ));
    }

    #[test]
    fn input_path_follows_the_data_layout() {
        let cfg = ExperimentConfig::for_kinematics(Kinematics::Kin2);
        let path = cfg.input_path(Path::new("/work"), Target::Hydrogen, Pass::Pass1);
        assert_eq!(
            path,
            Path::new("/work/data/raw/pass1/kin2_H/QE_data_GEN2_sbs100p_nucleon_np.tsv")
        );
    }
}
