//! Error taxonomy of the analysis
//!
//! Run-fatal conditions abort the entire pass before any write-back occurs.
//! Per-event degenerate conditions carry their own type so that the caller
//! must classify them explicitly (skip-and-count or abort) instead of letting
//! NaN values leak into the emitted fields and silently corrupt downstream
//! aggregates.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Conditions that abort an entire analysis pass
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Unrecognized kinematics setting name
    #[error("invalid configuration '{0}' (allowed: kin2, kin3, kin4a, kin4b)")]
    InvalidConfiguration(String),

    /// Unrecognized target material name
    #[error("invalid target '{0}' (allowed: He3, H)")]
    InvalidTarget(String),

    /// Unrecognized processing pass name
    #[error("invalid pass '{0}' (allowed: pass1, pass2)")]
    InvalidPass(String),

    /// The event store could not be opened
    #[error("could not open event store at {}", path.display())]
    StoreUnavailable {
        /// Location of the store that could not be opened
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The requested table is absent from the store
    #[error("table '{0}' not found in event store")]
    MissingTable(String),

    /// A required per-event field is absent from the table
    #[error("field '{0}' not found in event table")]
    MissingField(String),

    /// The store was opened but its contents could not be decoded
    #[error("malformed event table: {0}")]
    MalformedTable(String),

    /// A degenerate event encountered under the abort policy
    #[error("event {index}: {source}")]
    Event {
        /// Zero-based index of the offending event in table order
        index: usize,
        /// The degenerate condition that was encountered
        #[source]
        source: EventError,
    },

    /// Result emission failed
    #[error("failed to write results")]
    Io(#[from] io::Error),
}

/// Per-event degenerate conditions
///
/// These are the two places where the per-event computation has no defined
/// answer; both must surface as errors rather than NaN.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// The track momentum has exactly zero magnitude, so the scattering
    /// angles (and everything derived from them) are undefined
    #[error("zero-magnitude momentum vector, scattering angles are undefined")]
    DegenerateMomentum,

    /// The recoil direction lies in the calorimeter plane, so the ray-plane
    /// intersection parameter is undefined
    #[error("recoil direction parallel to the calorimeter plane")]
    ParallelRay,
}
