//! Quasi-elastic dx/dy analysis for electron-nucleon scattering data
//!
//!
//! # Introduction (for the physicist)
//!
//! This program processes event tables from an electron-nucleon scattering
//! experiment in which the scattered electron is tracked by a spectrometer
//! and the recoiling nucleon is detected in a hadronic calorimeter (HCAL)
//! downstream of the target.
//!
//! For each event it computes the Lorentz invariants Q² and W² of the
//! reaction, predicts where the recoil nucleon should strike the calorimeter
//! under two-body elastic kinematics, and forms the residuals dx/dy between
//! the measured and predicted hit positions. Quasi-elastic scattering off a
//! nucleon at rest clusters tightly around dx ≈ dy ≈ 0; inelastic and
//! accidental backgrounds spread away from that point, which makes the
//! residual pair the primary selection discriminant of the analysis.
//!
//!
//! # Introduction (for the numerical guy)
//!
//! Every event's derived values are a pure function of that event's readout
//! and the run-wide constants, so the pass is a single streaming loop with
//! no look-ahead. The loop is batched, and batches can be computed on worker
//! threads and merged back in order without changing the result.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The pipeline is organized as:
//!
//! * validate the three run names and resolve the run constants,
//! * derive the calorimeter plane's position and orthonormal basis,
//! * stream over the event table,
//!     * computing four-vector invariants under two scattering hypotheses,
//!     * intersecting the recoil ray with the calorimeter plane,
//!     * evaluating the quasi-elastic selection,
//! * then either write the derived fields back to the table or dump the
//!   accumulated histograms.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod evcut;
pub mod event;
pub mod geometry;
pub mod histogram;
pub mod kinematics;
pub mod numeric;
pub mod observables;
pub mod output;
pub mod pipeline;
pub mod projection;
pub mod resacc;
pub mod scheduling;
pub mod store;
