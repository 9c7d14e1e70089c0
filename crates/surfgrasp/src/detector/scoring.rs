//! Composite utility: flatness plus distance from the boundary.
//!
//! Curvature is normalised with extrema taken over the whole sampled pool
//! (first pass), then each survivor is scored (second pass):
//!
//! ```text
//! utility = (1 - normalized_curvature) * curvature_weight
//!         + normalized_min_distance * boundary_weight
//! ```

use serde::{Deserialize, Serialize};

use super::boundary_filter::FilteredCandidate;
use super::sampler::GraspCandidate;

/// Global curvature extrema of the sampled pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureRange {
    pub min: f64,
    pub max: f64,
}

impl CurvatureRange {
    /// Extrema over the finite values of `curvatures`.
    pub fn from_samples(curvatures: &[f64]) -> Option<Self> {
        curvatures
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .fold(None, |acc, c| match acc {
                None => Some(Self { min: c, max: c }),
                Some(r) => Some(Self {
                    min: r.min.min(c),
                    max: r.max.max(c),
                }),
            })
    }

    /// Rescale into `[0, 1]`; 0 for every value when the range is empty.
    pub fn normalize(&self, curvature: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((curvature - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Weights of the two utility terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityWeights {
    pub curvature: f64,
    pub boundary: f64,
}

impl UtilityWeights {
    pub fn utility(&self, normalized_curvature: f64, normalized_min_distance: f64) -> f64 {
        (1.0 - normalized_curvature) * self.curvature + normalized_min_distance * self.boundary
    }
}

/// Per-candidate inputs of the utility, reported alongside each grasp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityFeatures {
    pub curvature: f64,
    pub normalized_curvature: f64,
    /// Distance to the nearest boundary point.
    pub min_distance: f64,
    /// Distance to the farthest boundary point.
    pub max_distance: f64,
    pub normalized_min_distance: f64,
    /// Index of the originating sample.
    pub source_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: GraspCandidate,
    pub utility: f64,
    pub features: UtilityFeatures,
}

/// Score survivors in their incoming order.
pub fn score_candidates(
    survivors: &[FilteredCandidate],
    range: &CurvatureRange,
    weights: UtilityWeights,
) -> Vec<ScoredCandidate> {
    let scored: Vec<ScoredCandidate> = survivors
        .iter()
        .map(|s| {
            let normalized_curvature = range.normalize(s.curvature);
            let normalized_min_distance = s.distances.normalized();
            ScoredCandidate {
                candidate: s.candidate,
                utility: weights.utility(normalized_curvature, normalized_min_distance),
                features: UtilityFeatures {
                    curvature: s.curvature,
                    normalized_curvature,
                    min_distance: s.distances.min_distance,
                    max_distance: s.distances.max_distance,
                    normalized_min_distance,
                    source_index: s.candidate.source_index,
                },
            }
        })
        .collect();

    tracing::debug!(
        n_scored = scored.len(),
        curvature_min = range.min,
        curvature_max = range.max,
        "utility scoring complete"
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::boundary_filter::BoundaryDistances;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Point3, UnitQuaternion};

    fn survivor(idx: usize, curvature: f64, min_d: f64, max_d: f64) -> FilteredCandidate {
        FilteredCandidate {
            candidate: GraspCandidate {
                position: Point3::new(idx as f64, 0.0, 0.0),
                orientation: UnitQuaternion::identity(),
                source_index: idx,
            },
            curvature,
            distances: BoundaryDistances {
                min_distance: min_d,
                max_distance: max_d,
            },
        }
    }

    const EVEN: UtilityWeights = UtilityWeights {
        curvature: 0.5,
        boundary: 0.5,
    };

    #[test]
    fn range_ignores_non_finite_values() {
        let r = CurvatureRange::from_samples(&[0.3, f64::NAN, 0.1, 0.9]).unwrap();
        assert_eq!(r, CurvatureRange { min: 0.1, max: 0.9 });
        assert!(CurvatureRange::from_samples(&[]).is_none());
    }

    #[test]
    fn uniform_curvature_normalises_to_zero() {
        let r = CurvatureRange::from_samples(&[0.2, 0.2, 0.2]).unwrap();
        assert_eq!(r.normalize(0.2), 0.0);
    }

    #[test]
    fn lower_curvature_never_scores_lower() {
        let range = CurvatureRange { min: 0.0, max: 1.0 };
        let scored = score_candidates(
            &[survivor(0, 0.2, 0.1, 0.4), survivor(1, 0.7, 0.1, 0.4)],
            &range,
            EVEN,
        );
        assert!(scored[0].utility >= scored[1].utility);
    }

    #[test]
    fn features_stay_in_unit_interval() {
        let range = CurvatureRange { min: 0.1, max: 0.5 };
        let survivors = [
            survivor(0, 0.1, 0.02, 0.3),
            survivor(1, 0.5, 0.3, 0.3),
            survivor(2, 0.3, 0.05, 0.0),
        ];
        for s in score_candidates(&survivors, &range, EVEN) {
            let f = s.features;
            assert!((0.0..=1.0).contains(&f.normalized_curvature));
            assert!((0.0..=1.0).contains(&f.normalized_min_distance));
        }
    }

    #[test]
    fn utility_matches_weighted_sum() {
        let range = CurvatureRange { min: 0.0, max: 0.8 };
        let weights = UtilityWeights {
            curvature: 2.0,
            boundary: 1.0,
        };
        let s = score_candidates(&[survivor(3, 0.2, 0.1, 0.4)], &range, weights)[0];
        assert_abs_diff_eq!(s.utility, 0.75 * 2.0 + 0.25 * 1.0, epsilon = 1e-12);
        assert_eq!(s.features.source_index, 3);
    }
}
