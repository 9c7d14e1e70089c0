//! Candidate sampling: one oriented grasp pose per surface sample.

use std::f64::consts::PI;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use crate::cloud::SurfacePoint;
use crate::error::GraspError;
use crate::geometry::any_orthogonal;

/// Nominal approach axis of the gripper in its own frame.
pub fn approach_axis() -> Unit<Vector3<f64>> {
    Vector3::x_axis()
}

/// An oriented grasp pose derived from one surface sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspCandidate {
    pub position: Point3<f64>,
    /// Rotation taking [`approach_axis`] onto the surface normal.
    pub orientation: UnitQuaternion<f64>,
    /// Index of the originating sample in the sampler input.
    pub source_index: usize,
}

/// Sampler output: candidates and their curvatures, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    pub candidates: Vec<GraspCandidate>,
    pub curvatures: Vec<f64>,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Minimal rotation taking `from` onto `to`.
///
/// Antiparallel inputs rotate by π about an axis orthogonal to `from`.
pub fn shortest_arc(from: &Unit<Vector3<f64>>, to: &Unit<Vector3<f64>>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between_axis(from, to).unwrap_or_else(|| {
        let axis = Unit::new_normalize(any_orthogonal(from));
        UnitQuaternion::from_axis_angle(&axis, PI)
    })
}

/// Turn every usable sample into a [`GraspCandidate`].
///
/// Samples without a finite normal, or with a zero normal, carry no approach
/// direction and are skipped. An empty result is reported as
/// [`GraspError::InsufficientPoints`].
pub fn sample_candidates(samples: &[SurfacePoint]) -> Result<CandidatePool, GraspError> {
    let axis = approach_axis();
    let mut pool = CandidatePool {
        candidates: Vec::with_capacity(samples.len()),
        curvatures: Vec::with_capacity(samples.len()),
    };

    for (source_index, sp) in samples.iter().enumerate() {
        if !sp.is_finite() {
            continue;
        }
        let Some(normal) = Unit::try_new(sp.normal, 1e-12) else {
            continue;
        };
        pool.candidates.push(GraspCandidate {
            position: sp.position,
            orientation: shortest_arc(&axis, &normal),
            source_index,
        });
        pool.curvatures.push(sp.curvature);
    }

    if pool.is_empty() {
        tracing::warn!(n_samples = samples.len(), "no usable surface samples");
        return Err(GraspError::InsufficientPoints {
            stage: "candidate sampling",
        });
    }
    tracing::debug!(
        n_samples = samples.len(),
        n_candidates = pool.len(),
        "candidate sampling complete"
    );
    Ok(pool)
}
