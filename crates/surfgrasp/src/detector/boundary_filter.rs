//! Boundary-distance filtering of grasp candidates.
//!
//! A candidate survives when its distance to the nearest boundary point
//! exceeds `boundary_threshold`. Survivors carry the distance to the farthest
//! boundary point as a per-candidate normaliser.

use nalgebra::Point3;

use super::sampler::{CandidatePool, GraspCandidate};
use crate::cloud::{is_finite_point, SurfacePoint};
use crate::error::GraspError;
use crate::geometry::PointIndex;

/// Points classified as lying on the visible silhouette/edge of the object.
#[derive(Clone)]
pub struct BoundaryCloud {
    index: PointIndex,
    n_classified: usize,
}

impl BoundaryCloud {
    /// Boundary set from explicit points. Non-finite points are dropped.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let kept: Vec<Point3<f64>> = points.iter().copied().filter(is_finite_point).collect();
        Self {
            index: PointIndex::new(&kept),
            n_classified: points.len(),
        }
    }

    /// Boundary set from a classification mask over `surface`.
    ///
    /// Entries missing from a short mask count as non-boundary.
    pub fn from_mask(surface: &[SurfacePoint], mask: &[bool]) -> Self {
        let kept: Vec<Point3<f64>> = surface
            .iter()
            .zip(mask)
            .filter(|(sp, flag)| **flag && is_finite_point(&sp.position))
            .map(|(sp, _)| sp.position)
            .collect();
        Self {
            index: PointIndex::new(&kept),
            n_classified: surface.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn points(&self) -> &[Point3<f64>] {
        self.index.points()
    }

    /// Nearest and farthest boundary distances from `p`.
    pub fn distances(&self, p: &Point3<f64>) -> Option<BoundaryDistances> {
        let nearest = self.index.nearest(p)?;
        let farthest = self.index.farthest_from(p)?;
        Some(BoundaryDistances {
            min_distance: nearest.distance(),
            max_distance: farthest.distance(),
        })
    }
}

/// Distances from a candidate to the boundary set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryDistances {
    pub min_distance: f64,
    pub max_distance: f64,
}

impl BoundaryDistances {
    /// `min_distance / max_distance` in `[0, 1]`; 0 when `max_distance` is 0.
    pub fn normalized(&self) -> f64 {
        if self.max_distance > 0.0 {
            (self.min_distance / self.max_distance).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A candidate that passed the boundary test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredCandidate {
    pub candidate: GraspCandidate,
    pub curvature: f64,
    pub distances: BoundaryDistances,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Survivors in sampler order.
    pub survivors: Vec<FilteredCandidate>,
    pub n_rejected: usize,
}

/// Keep candidates with `min_distance > boundary_threshold`.
pub fn filter_candidates(
    pool: &CandidatePool,
    boundary: &BoundaryCloud,
    boundary_threshold: f64,
) -> Result<FilterOutcome, GraspError> {
    if boundary.is_empty() {
        tracing::warn!(
            n_classified = boundary.n_classified,
            "boundary set is empty"
        );
        return Err(GraspError::NoBoundaryDetected {
            n_classified: boundary.n_classified,
        });
    }

    let mut outcome = FilterOutcome::default();
    for (candidate, &curvature) in pool.candidates.iter().zip(&pool.curvatures) {
        match boundary.distances(&candidate.position) {
            Some(distances) if distances.min_distance > boundary_threshold => {
                outcome.survivors.push(FilteredCandidate {
                    candidate: *candidate,
                    curvature,
                    distances,
                });
            }
            _ => outcome.n_rejected += 1,
        }
    }

    if outcome.survivors.is_empty() {
        tracing::warn!(
            n_candidates = pool.len(),
            boundary_threshold,
            "every candidate is too close to the boundary"
        );
        return Err(GraspError::NoCandidatesSurvived {
            n_candidates: pool.len(),
            boundary_threshold,
        });
    }
    tracing::debug!(
        n_candidates = pool.len(),
        n_boundary = boundary.len(),
        n_rejected = outcome.n_rejected,
        n_survivors = outcome.survivors.len(),
        "boundary filter complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::sampler::sample_candidates;
    use approx::assert_abs_diff_eq;

    fn pool_on_x_axis(xs: &[f64]) -> CandidatePool {
        let samples: Vec<SurfacePoint> = xs
            .iter()
            .map(|&x| SurfacePoint::from_arrays([x, 0.0, 0.0], [0.0, 0.0, 1.0], 0.0))
            .collect();
        sample_candidates(&samples).unwrap()
    }

    #[test]
    fn threshold_is_strict() {
        let pool = pool_on_x_axis(&[0.0, 0.5, 0.99]);
        let boundary = BoundaryCloud::from_points(&[Point3::new(1.0, 0.0, 0.0)]);
        let out = filter_candidates(&pool, &boundary, 0.5).unwrap();
        assert_eq!(out.n_rejected, 2);
        assert_eq!(out.survivors.len(), 1);
        assert_eq!(out.survivors[0].candidate.source_index, 0);
        for s in &out.survivors {
            assert!(s.distances.min_distance > 0.5);
        }
    }

    #[test]
    fn normaliser_is_farthest_boundary_point() {
        let pool = pool_on_x_axis(&[0.0]);
        let boundary =
            BoundaryCloud::from_points(&[Point3::new(0.1, 0.0, 0.0), Point3::new(0.0, 0.4, 0.0)]);
        let out = filter_candidates(&pool, &boundary, 0.01).unwrap();
        let d = out.survivors[0].distances;
        assert_abs_diff_eq!(d.min_distance, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(d.max_distance, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(d.normalized(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn coincident_single_boundary_point_normalises_to_zero() {
        let d = BoundaryDistances {
            min_distance: 0.0,
            max_distance: 0.0,
        };
        assert_eq!(d.normalized(), 0.0);
    }

    #[test]
    fn empty_boundary_is_an_error() {
        let pool = pool_on_x_axis(&[0.0]);
        let boundary = BoundaryCloud::from_mask(
            &[SurfacePoint::from_arrays([0.0; 3], [0.0, 0.0, 1.0], 0.0)],
            &[false],
        );
        let err = filter_candidates(&pool, &boundary, 0.01).unwrap_err();
        assert_eq!(err, GraspError::NoBoundaryDetected { n_classified: 1 });
    }

    #[test]
    fn all_rejected_is_an_error() {
        let pool = pool_on_x_axis(&[0.0, 0.001]);
        let boundary = BoundaryCloud::from_points(&[Point3::origin()]);
        let err = filter_candidates(&pool, &boundary, 0.01).unwrap_err();
        assert!(matches!(
            err,
            GraspError::NoCandidatesSurvived { n_candidates: 2, .. }
        ));
    }

    #[test]
    fn short_mask_treats_missing_entries_as_interior() {
        let surface = [
            SurfacePoint::from_arrays([0.0; 3], [0.0, 0.0, 1.0], 0.0),
            SurfacePoint::from_arrays([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], 0.0),
        ];
        let boundary = BoundaryCloud::from_mask(&surface, &[true]);
        assert_eq!(boundary.len(), 1);
    }
}
