//! Grasp detection stages, independent of orchestration.
//!
//! The `pipeline` module owns the call order. This module provides the
//! sampler, boundary filter, utility scorer, ranker and canonical-frame
//! aligner as standalone building blocks.

pub(crate) mod boundary_filter;
pub(crate) mod frame;
pub(crate) mod ranking;
pub(crate) mod sampler;
pub(crate) mod scoring;

pub use boundary_filter::{
    filter_candidates, BoundaryCloud, BoundaryDistances, FilterOutcome, FilteredCandidate,
};
pub use frame::{align_canonical_frame, CanonicalFrame, PrincipalFrame};
pub use ranking::rank_by_utility;
pub use sampler::{approach_axis, sample_candidates, shortest_arc, CandidatePool, GraspCandidate};
pub use scoring::{
    score_candidates, CurvatureRange, ScoredCandidate, UtilityFeatures, UtilityWeights,
};
