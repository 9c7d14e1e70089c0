//! Silhouette/edge classification by angular gap.
//!
//! Neighbours of a point are projected onto its tangent plane. On the
//! interior of a surface the projected directions surround the point; on an
//! edge they leave a wide empty sector. A point is a boundary point when the
//! widest gap between consecutive neighbour directions exceeds the
//! configured angle.

use std::f64::consts::TAU;

use super::any_orthogonal;
use super::index::{Neighbor, PointIndex};
use crate::cloud::SurfacePoint;

/// Neighbourhood selection for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryNeighborhood {
    /// The `k` nearest neighbours.
    Nearest(usize),
    /// All neighbours within the radius.
    Radius(f64),
}

impl BoundaryNeighborhood {
    /// `k > 0` selects k-NN, otherwise the radius search, as in the flat config.
    pub fn from_params(k: usize, radius: f64) -> Self {
        if k > 0 {
            Self::Nearest(k)
        } else {
            Self::Radius(radius)
        }
    }

    fn query(self, index: &PointIndex, sp: &SurfacePoint) -> Vec<Neighbor> {
        match self {
            // +1: the query point is its own nearest neighbour.
            Self::Nearest(k) => index.k_nearest(&sp.position, k + 1),
            Self::Radius(r) => index.within_radius(&sp.position, r),
        }
    }
}

/// Minimum number of distinct neighbours for an interior classification.
const MIN_BOUNDARY_NEIGHBORS: usize = 3;

/// Classify every surface point. Output is index-aligned with `surface`.
///
/// `index` must be built over the positions of `surface`.
pub fn classify_boundary(
    surface: &[SurfacePoint],
    index: &PointIndex,
    neighborhood: BoundaryNeighborhood,
    angle_threshold: f64,
) -> Vec<bool> {
    let mut directions = Vec::new();
    let flags: Vec<bool> = surface
        .iter()
        .map(|sp| {
            let neighbors = neighborhood.query(index, sp);
            is_boundary_point(sp, index, &neighbors, angle_threshold, &mut directions)
        })
        .collect();

    tracing::debug!(
        n_points = surface.len(),
        n_boundary = flags.iter().filter(|&&b| b).count(),
        ?neighborhood,
        angle_threshold,
        "boundary classification complete"
    );
    flags
}

fn is_boundary_point(
    sp: &SurfacePoint,
    index: &PointIndex,
    neighbors: &[Neighbor],
    angle_threshold: f64,
    angles: &mut Vec<f64>,
) -> bool {
    if !sp.is_finite() {
        return true;
    }
    let u = any_orthogonal(&sp.normal);
    let v = sp.normal.cross(&u);

    angles.clear();
    for n in neighbors {
        let delta = index.points()[n.index] - sp.position;
        let du = u.dot(&delta);
        let dv = v.dot(&delta);
        if du * du + dv * dv <= f64::EPSILON * f64::EPSILON {
            continue;
        }
        angles.push(dv.atan2(du));
    }
    if angles.len() < MIN_BOUNDARY_NEIGHBORS {
        return true;
    }

    max_angular_gap(angles) > angle_threshold
}

/// Widest empty sector between sorted directions, wrap-around included.
fn max_angular_gap(angles: &mut [f64]) -> f64 {
    angles.sort_by(f64::total_cmp);
    let mut max_gap = angles
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(0.0f64, f64::max);
    if let (Some(first), Some(last)) = (angles.first(), angles.last()) {
        max_gap = max_gap.max(TAU - (last - first));
    }
    max_gap
}
