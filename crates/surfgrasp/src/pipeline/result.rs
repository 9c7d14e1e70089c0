use crate::detector::frame::quaternion_xyzw;
use crate::detector::{CanonicalFrame, ScoredCandidate, UtilityFeatures};
use crate::error::DetectionStatus;

/// Grasp pose in the cloud frame. The quaternion is `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraspPose {
    pub position: [f64; 3],
    pub orientation: [f64; 4],
}

/// One ranked grasp with the features behind its utility.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankedGrasp {
    pub pose: GraspPose,
    pub utility: f64,
    pub features: UtilityFeatures,
}

impl From<&ScoredCandidate> for RankedGrasp {
    fn from(s: &ScoredCandidate) -> Self {
        let p = s.candidate.position;
        Self {
            pose: GraspPose {
                position: [p.x, p.y, p.z],
                orientation: quaternion_xyzw(&s.candidate.orientation),
            },
            utility: s.utility,
            features: s.features,
        }
    }
}

/// Point counts gathered along the pipeline.
///
/// Counts for stages that did not run stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DetectionStats {
    /// Points in the raw input.
    pub input_points: usize,
    /// Points left after dropping non-finite coordinates.
    pub finite_points: usize,
    /// Surface points with a defined normal and curvature.
    pub surface_points: usize,
    pub boundary_points: usize,
    /// Size of the thinned candidate pool.
    pub samples: usize,
    /// Candidates dropped by the boundary filter.
    pub rejected: usize,
    pub scored: usize,
    pub returned: usize,
}

/// Full detection result for one cloud.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraspDetection {
    pub status: DetectionStatus,
    /// Grasps sorted by utility, best first. Empty unless `status` is `Ok`.
    pub ranked: Vec<RankedGrasp>,
    /// Principal frame of the full cloud.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_frame: Option<CanonicalFrame>,
    pub stats: DetectionStats,
}

impl GraspDetection {
    /// Empty result carrying a failure status and the stats gathered so far.
    pub fn failed(status: DetectionStatus, stats: DetectionStats) -> Self {
        Self {
            status,
            ranked: Vec::new(),
            canonical_frame: None,
            stats,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Highest-utility grasp, if any.
    pub fn best(&self) -> Option<&RankedGrasp> {
        self.ranked.first()
    }
}
