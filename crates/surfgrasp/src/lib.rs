//! surfgrasp: surface-based grasp candidate detection from 3D point clouds.
//!
//! Turns the visible surface of an object into a ranked list of grasp poses
//! for a suction-style end-effector, preferring flat regions far from the
//! object silhouette. The pipeline stages are:
//!
//! 1. **Geometry** – per-point normals and curvature, boundary classification
//!    and voxel thinning (pluggable through [`SurfaceGeometry`]).
//! 2. **Sampler** – one oriented [`GraspCandidate`] per thinned surface point.
//! 3. **Boundary filter** – drops candidates within `boundary_threshold` of
//!    the boundary set.
//! 4. **Scorer** – `(1 - normalized_curvature) * curvature_weight +
//!    normalized_min_distance * boundary_weight`.
//! 5. **Ranker** – stable sort by utility, best first.
//! 6. **Canonical frame** – right-handed principal axes of the full cloud.
//!
//! # Public API
//! - [`GraspDetector`] and [`detect_grasp_candidates`] as primary entry points
//! - [`GraspConfig`] for tuning
//! - [`GraspDetection`] and its parts as result structures
//! - [`SurfaceGeometry`] to plug in an existing point-cloud library

mod api;
mod cloud;
mod config;
mod detector;
mod error;
pub mod geometry;
pub mod io;
mod pipeline;

#[cfg(test)]
mod test_utils;

pub use api::GraspDetector;
pub use cloud::{centroid, derive_viewpoint, sanitize, SurfacePoint};
pub use config::GraspConfig;
pub use detector::{
    align_canonical_frame, approach_axis, filter_candidates, rank_by_utility, sample_candidates,
    score_candidates, shortest_arc, BoundaryCloud, BoundaryDistances, CandidatePool,
    CanonicalFrame, CurvatureRange, FilterOutcome, FilteredCandidate, GraspCandidate,
    PrincipalFrame, ScoredCandidate, UtilityFeatures, UtilityWeights,
};
pub use error::{DetectionStatus, GraspError};
pub use geometry::{IndexedGeometry, SurfaceGeometry};
pub use pipeline::{
    detect_from_surface, detect_grasp_candidates, rank_candidates, try_detect_grasp_candidates,
    DetectionStats, GraspDetection, GraspPose, RankedGrasp,
};
