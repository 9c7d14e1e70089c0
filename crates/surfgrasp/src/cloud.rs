//! Point and surface-point types shared by every stage.

use nalgebra::{Point3, Vector3};

/// A surface sample: position, unit outward normal and curvature estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
    /// Surface variation in `[0, 1/3]` for the bundled estimator; any
    /// non-negative scalar is accepted.
    pub curvature: f64,
}

impl SurfacePoint {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>, curvature: f64) -> Self {
        Self {
            position,
            normal,
            curvature,
        }
    }

    /// Build from plain arrays (as read from a file or a foreign buffer).
    pub fn from_arrays(position: [f64; 3], normal: [f64; 3], curvature: f64) -> Self {
        Self::new(Point3::from(position), Vector3::from(normal), curvature)
    }

    /// `true` when position, normal and curvature are all finite.
    pub fn is_finite(&self) -> bool {
        is_finite_point(&self.position)
            && self.normal.iter().all(|v| v.is_finite())
            && self.curvature.is_finite()
    }
}

#[inline]
pub(crate) fn is_finite_point(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Drop non-finite points. Returns the kept points in input order.
pub fn sanitize(raw: &[[f64; 3]]) -> Vec<Point3<f64>> {
    raw.iter()
        .map(|&p| Point3::from(p))
        .filter(is_finite_point)
        .collect()
}

/// Arithmetic mean of the points, or `None` for an empty slice.
pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Viewpoint used to orient normals when none is configured.
///
/// The point at unit distance from the sensor origin along the centroid
/// direction. Falls back to `+Z` when the centroid sits at the origin.
///
/// For an object closer than one length unit to the sensor this point lies
/// behind the object, and normals end up facing away from the sensor. Set
/// `GraspConfig::viewpoint` explicitly when that matters.
pub fn derive_viewpoint(points: &[Point3<f64>]) -> Point3<f64> {
    centroid(points)
        .and_then(|c| c.coords.try_normalize(1e-12))
        .map(Point3::from)
        .unwrap_or_else(|| Point3::new(0.0, 0.0, 1.0))
}
