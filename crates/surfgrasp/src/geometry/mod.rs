//! Surface geometry collaborators.
//!
//! The detection core consumes normals, curvature, thinning, boundary flags
//! and principal axes through the [`SurfaceGeometry`] trait. Hosts that own a
//! point-cloud library can plug it in; [`IndexedGeometry`] is the bundled
//! implementation built on an R-tree and local covariance analysis.

pub mod boundary;
pub mod index;
pub mod normals;
pub mod pca;
pub mod voxel;

use nalgebra::{Point3, Vector3};

use crate::cloud::SurfacePoint;

pub use boundary::BoundaryNeighborhood;
pub use index::{Neighbor, PointIndex};
pub use pca::PrincipalAxes;

/// Point-cloud geometry estimators consumed by the detection pipeline.
///
/// Implementations must be pure: the same input yields the same output.
pub trait SurfaceGeometry {
    /// Per-point normal (oriented towards `viewpoint`) and non-negative
    /// curvature, index-aligned with `cloud`. Undefined estimates are NaN.
    fn estimate_normals(
        &self,
        cloud: &[Point3<f64>],
        viewpoint: &Point3<f64>,
        radius: f64,
    ) -> Vec<SurfacePoint>;

    /// Spatial thinning that keeps normal and curvature per output point.
    fn downsample(&self, surface: &[SurfacePoint], leaf: f64) -> Vec<SurfacePoint>;

    /// `true` for points on the silhouette/edge, index-aligned with `surface`.
    /// `k > 0` selects k-NN neighbourhoods, otherwise `radius` is used.
    fn classify_boundary(
        &self,
        surface: &[SurfacePoint],
        k: usize,
        radius: f64,
        angle_threshold: f64,
    ) -> Vec<bool>;

    /// Eigenvectors of the scatter matrix of an already centred cloud,
    /// ordered by descending eigenvalue.
    fn principal_axes(&self, centered: &[Point3<f64>]) -> PrincipalAxes;
}

/// Bundled estimators backed by [`PointIndex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedGeometry;

impl SurfaceGeometry for IndexedGeometry {
    fn estimate_normals(
        &self,
        cloud: &[Point3<f64>],
        viewpoint: &Point3<f64>,
        radius: f64,
    ) -> Vec<SurfacePoint> {
        let index = PointIndex::new(cloud);
        normals::estimate_normals(cloud, &index, viewpoint, radius)
    }

    fn downsample(&self, surface: &[SurfacePoint], leaf: f64) -> Vec<SurfacePoint> {
        voxel::voxel_downsample(surface, leaf)
    }

    fn classify_boundary(
        &self,
        surface: &[SurfacePoint],
        k: usize,
        radius: f64,
        angle_threshold: f64,
    ) -> Vec<bool> {
        let positions: Vec<Point3<f64>> = surface.iter().map(|sp| sp.position).collect();
        let index = PointIndex::new(&positions);
        boundary::classify_boundary(
            surface,
            &index,
            BoundaryNeighborhood::from_params(k, radius),
            angle_threshold,
        )
    }

    fn principal_axes(&self, centered: &[Point3<f64>]) -> PrincipalAxes {
        pca::principal_axes(centered)
    }
}

/// A unit vector orthogonal to `v` (which need not be normalised).
pub(crate) fn any_orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    // Cross with the basis axis least aligned with v.
    let a = v.abs();
    let helper = if a.x <= a.y && a.x <= a.z {
        Vector3::x()
    } else if a.y <= a.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&helper)
        .try_normalize(1e-15)
        .unwrap_or_else(Vector3::x)
}
