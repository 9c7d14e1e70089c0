//! High-level detection pipeline.
//!
//! This module is the internal "glue" layer that wires the detector stages
//! together: geometry estimation -> sampling -> boundary filter -> scoring ->
//! ranking -> canonical frame.
//!
//! Algorithmic primitives live in `crate::detector` and `crate::geometry`.
//! The pipeline layer focuses on stage boundaries, call order, statistics and
//! turning stage errors into a [`DetectionStatus`](crate::DetectionStatus).
//!
//! Entry points:
//! - `detect_grasp_candidates`: raw cloud in, ranked grasps out (never fails)
//! - `try_detect_grasp_candidates`: same, with stage errors returned
//! - `detect_from_surface`: caller-supplied normals and boundary mask
//! - `rank_candidates`: sampling to ranking only, against explicit boundary points

mod result;
mod run;

pub use result::{DetectionStats, GraspDetection, GraspPose, RankedGrasp};
pub use run::{
    detect_from_surface, detect_grasp_candidates, rank_candidates, try_detect_grasp_candidates,
};

pub(crate) use run::{detect_from_surface_with, detect_with, try_detect_with};
