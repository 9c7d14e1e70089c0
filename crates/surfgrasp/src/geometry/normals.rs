//! Normal and curvature estimation from local neighbourhood covariance.
//!
//! For each point the neighbours within `radius` (the point itself included)
//! are collected. The normal is the eigenvector of the smallest eigenvalue of
//! the neighbourhood covariance, flipped to face the viewpoint. Curvature is
//! the surface variation `λ_min / (λ0 + λ1 + λ2)`.

use nalgebra::{Point3, Vector3};

use super::index::PointIndex;
use super::pca::{covariance_about, sorted_eigen};
use crate::cloud::{centroid, SurfacePoint};

/// Minimum neighbourhood size for a defined normal.
pub const MIN_NORMAL_NEIGHBORS: usize = 3;

/// Estimate a normal and curvature for every point of `points`.
///
/// Output is index-aligned with the input. Points whose neighbourhood is too
/// small get NaN normal and curvature.
pub fn estimate_normals(
    points: &[Point3<f64>],
    index: &PointIndex,
    viewpoint: &Point3<f64>,
    radius: f64,
) -> Vec<SurfacePoint> {
    let mut out = Vec::with_capacity(points.len());
    let mut neighborhood = Vec::new();
    let mut n_undefined = 0usize;

    for p in points {
        neighborhood.clear();
        neighborhood.extend(
            index
                .within_radius(p, radius)
                .iter()
                .map(|n| index.points()[n.index]),
        );

        let sp = match local_normal(&neighborhood) {
            Some((normal, curvature)) => {
                SurfacePoint::new(*p, orient_towards(normal, p, viewpoint), curvature)
            }
            None => {
                n_undefined += 1;
                SurfacePoint::new(*p, Vector3::repeat(f64::NAN), f64::NAN)
            }
        };
        out.push(sp);
    }

    tracing::debug!(
        n_points = points.len(),
        n_undefined,
        radius,
        "normal estimation complete"
    );
    out
}

/// Normal and surface variation of a neighbourhood.
fn local_normal(neighborhood: &[Point3<f64>]) -> Option<(Vector3<f64>, f64)> {
    if neighborhood.len() < MIN_NORMAL_NEIGHBORS {
        return None;
    }
    let center = centroid(neighborhood)?;
    let pa = sorted_eigen(covariance_about(neighborhood, &center));
    let normal = pa.axis(2).try_normalize(1e-12)?;

    let lambda_min = pa.eigenvalues[2].max(0.0);
    let sum: f64 = pa.eigenvalues.iter().map(|v| v.max(0.0)).sum();
    let curvature = if sum > 0.0 { lambda_min / sum } else { 0.0 };
    Some((normal, curvature))
}

/// Flip `normal` so that it points to the viewpoint side of `p`.
fn orient_towards(normal: Vector3<f64>, p: &Point3<f64>, viewpoint: &Point3<f64>) -> Vector3<f64> {
    if normal.dot(&(viewpoint - p)) < 0.0 {
        -normal
    } else {
        normal
    }
}
