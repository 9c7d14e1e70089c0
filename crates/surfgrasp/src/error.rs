//! Error taxonomy and the outcome status reported by the detection entry points.

use serde::{Deserialize, Serialize};

/// Outcome of one detection call.
///
/// Every non-`Ok` status comes with an empty ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    /// Candidates were ranked and the canonical frame was derived.
    #[default]
    Ok,
    /// The input (or the thinned candidate pool) holds no usable points.
    InsufficientPoints,
    /// Boundary classification produced an empty boundary set.
    NoBoundaryDetected,
    /// Principal axes are undefined (coincident or collinear points).
    DegenerateGeometry,
    /// Every candidate lies within `boundary_threshold` of the boundary.
    NoCandidatesSurvived,
    /// The configuration failed validation.
    InvalidConfig,
}

impl DetectionStatus {
    /// Returns `true` for [`DetectionStatus::Ok`].
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Whether a caller can expect a different outcome by relaxing parameters
    /// on the same cloud.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::NoCandidatesSurvived | Self::InvalidConfig)
    }
}

impl std::fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::InsufficientPoints => "insufficient surface points",
            Self::NoBoundaryDetected => "no boundary points detected",
            Self::DegenerateGeometry => "degenerate geometry",
            Self::NoCandidatesSurvived => "no candidates survived the boundary filter",
            Self::InvalidConfig => "invalid configuration",
        };
        f.write_str(s)
    }
}

/// Errors raised by the pipeline stages.
#[derive(Debug, Clone, PartialEq)]
pub enum GraspError {
    /// The cloud (or the sampled pool) is empty after the named stage.
    InsufficientPoints {
        /// Stage that ran out of points.
        stage: &'static str,
    },
    /// Boundary classification flagged no points.
    NoBoundaryDetected {
        /// Number of surface points that were classified.
        n_classified: usize,
    },
    /// Principal-axis decomposition is undefined for this cloud.
    DegenerateGeometry {
        /// Number of points handed to the aligner.
        n_points: usize,
        /// Scatter eigenvalues, descending.
        eigenvalues: [f64; 3],
    },
    /// The boundary filter rejected every candidate.
    NoCandidatesSurvived {
        /// Number of candidates that were tested.
        n_candidates: usize,
        /// Threshold in cloud length units.
        boundary_threshold: f64,
    },
    /// A configuration parameter is out of its admissible range.
    InvalidConfig {
        /// Offending parameter name.
        parameter: &'static str,
        /// Human-readable constraint.
        reason: String,
    },
}

impl GraspError {
    /// Status reported to callers of the non-failing entry points.
    pub fn status(&self) -> DetectionStatus {
        match self {
            Self::InsufficientPoints { .. } => DetectionStatus::InsufficientPoints,
            Self::NoBoundaryDetected { .. } => DetectionStatus::NoBoundaryDetected,
            Self::DegenerateGeometry { .. } => DetectionStatus::DegenerateGeometry,
            Self::NoCandidatesSurvived { .. } => DetectionStatus::NoCandidatesSurvived,
            Self::InvalidConfig { .. } => DetectionStatus::InvalidConfig,
        }
    }

    pub(crate) fn invalid_config(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for GraspError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientPoints { stage } => {
                write!(f, "insufficient surface points after {}", stage)
            }
            Self::NoBoundaryDetected { n_classified } => {
                write!(
                    f,
                    "no boundary points detected among {} surface points",
                    n_classified
                )
            }
            Self::DegenerateGeometry {
                n_points,
                eigenvalues,
            } => write!(
                f,
                "degenerate geometry: {} points, scatter eigenvalues [{:.3e}, {:.3e}, {:.3e}]",
                n_points, eigenvalues[0], eigenvalues[1], eigenvalues[2]
            ),
            Self::NoCandidatesSurvived {
                n_candidates,
                boundary_threshold,
            } => write!(
                f,
                "all {} candidates lie within {} of the boundary",
                n_candidates, boundary_threshold
            ),
            Self::InvalidConfig { parameter, reason } => {
                write!(f, "invalid config parameter `{}`: {}", parameter, reason)
            }
        }
    }
}

impl std::error::Error for GraspError {}
