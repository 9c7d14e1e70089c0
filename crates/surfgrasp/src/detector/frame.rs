//! Canonical object frame from the principal axes of the full cloud.
//!
//! The frame is an orientation anchored at the centroid; the cloud itself is
//! never transformed. The third axis is recomputed as `axis0 × axis1` so the
//! basis is right-handed whatever signs the eigen-solver returns.

use nalgebra::{Matrix3, Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::sampler::{approach_axis, shortest_arc};
use crate::cloud::centroid;
use crate::error::GraspError;
use crate::geometry::SurfaceGeometry;

/// Minimum number of points for a principal frame.
pub const MIN_FRAME_POINTS: usize = 3;
/// Largest eigenvalue at or below this means the points coincide.
const COINCIDENT_EIGENVALUE: f64 = 1e-18;
/// `λ1 / λ0` at or below this means the points are collinear.
const COLLINEAR_RATIO: f64 = 1e-9;

/// Right-handed principal frame of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalFrame {
    pub centroid: Point3<f64>,
    /// Columns are `axis0`, `axis1`, `axis2 = axis0 × axis1`.
    pub axes: Matrix3<f64>,
    /// Scatter eigenvalues, descending.
    pub eigenvalues: [f64; 3],
    /// Rotation taking the approach axis onto `axis0`.
    pub orientation: UnitQuaternion<f64>,
    /// `orientation` followed by the grip roll about its own approach axis.
    pub grip_orientation: UnitQuaternion<f64>,
}

impl PrincipalFrame {
    pub fn axis(&self, i: usize) -> Vector3<f64> {
        self.axes.column(i).into_owned()
    }

    /// Plain-array form for serialisation.
    pub fn to_canonical(&self) -> CanonicalFrame {
        let column = |i: usize| {
            let a = self.axis(i);
            [a.x, a.y, a.z]
        };
        CanonicalFrame {
            centroid: [self.centroid.x, self.centroid.y, self.centroid.z],
            axes: [column(0), column(1), column(2)],
            eigenvalues: self.eigenvalues,
            orientation: quaternion_xyzw(&self.orientation),
            grip_orientation: quaternion_xyzw(&self.grip_orientation),
        }
    }
}

/// Serialisable canonical frame. Quaternions are `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFrame {
    pub centroid: [f64; 3],
    /// `axis0`, `axis1`, `axis2` as column vectors.
    pub axes: [[f64; 3]; 3],
    pub eigenvalues: [f64; 3],
    pub orientation: [f64; 4],
    pub grip_orientation: [f64; 4],
}

pub(crate) fn quaternion_xyzw(q: &UnitQuaternion<f64>) -> [f64; 4] {
    let q = q.quaternion();
    [q.i, q.j, q.k, q.w]
}

/// Derive the canonical frame of `cloud`.
///
/// Fails with [`GraspError::DegenerateGeometry`] for fewer than three points
/// or for coincident or collinear points.
pub fn align_canonical_frame<G: SurfaceGeometry + ?Sized>(
    cloud: &[Point3<f64>],
    geometry: &G,
    grip_roll_offset: f64,
) -> Result<PrincipalFrame, GraspError> {
    let degenerate = |eigenvalues: [f64; 3]| {
        tracing::warn!(n_points = cloud.len(), ?eigenvalues, "degenerate principal frame");
        GraspError::DegenerateGeometry {
            n_points: cloud.len(),
            eigenvalues,
        }
    };

    if cloud.len() < MIN_FRAME_POINTS {
        return Err(degenerate([0.0; 3]));
    }
    let Some(center) = centroid(cloud) else {
        return Err(degenerate([0.0; 3]));
    };
    let centered: Vec<Point3<f64>> = cloud
        .iter()
        .map(|p| Point3::from(p - center))
        .collect();

    let pa = geometry.principal_axes(&centered);
    let [l0, l1, _] = pa.eigenvalues;
    if !(l0.is_finite() && l1.is_finite())
        || l0 <= COINCIDENT_EIGENVALUE
        || l1 <= COLLINEAR_RATIO * l0
    {
        return Err(degenerate(pa.eigenvalues));
    }

    let Some(axis0) = Unit::try_new(pa.axis(0), 1e-12) else {
        return Err(degenerate(pa.eigenvalues));
    };
    // Re-orthogonalise against axis0 before closing the basis.
    let raw1 = pa.axis(1);
    let Some(axis1) = Unit::try_new(raw1 - axis0.as_ref() * axis0.dot(&raw1), 1e-12) else {
        return Err(degenerate(pa.eigenvalues));
    };
    let axis2 = axis0.cross(axis1.as_ref());

    let orientation = shortest_arc(&approach_axis(), &axis0);
    let roll = UnitQuaternion::from_axis_angle(&approach_axis(), grip_roll_offset);
    let frame = PrincipalFrame {
        centroid: center,
        axes: Matrix3::from_columns(&[axis0.into_inner(), axis1.into_inner(), axis2]),
        eigenvalues: pa.eigenvalues,
        orientation,
        grip_orientation: orientation * roll,
    };

    tracing::debug!(
        n_points = cloud.len(),
        eigenvalues = ?frame.eigenvalues,
        "canonical frame aligned"
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{IndexedGeometry, PrincipalAxes};
    use crate::test_utils::{hemisphere, planar_patch};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_right_handed(frame: &PrincipalFrame) {
        let a0 = frame.axis(0);
        let a1 = frame.axis(1);
        assert_abs_diff_eq!(frame.axis(2), a0.cross(&a1), epsilon = 1e-12);
        assert_abs_diff_eq!(frame.axes.determinant(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            frame.axes.transpose() * frame.axes,
            Matrix3::identity(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn elongated_patch_major_axis_and_handedness() {
        let cloud = planar_patch(0.2, 0.05, 0.005, 0.7, 0.0005, 11);
        let frame = align_canonical_frame(&cloud, &IndexedGeometry, FRAC_PI_2).unwrap();
        assert_right_handed(&frame);
        assert_abs_diff_eq!(frame.axis(0).x.abs(), 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(frame.axis(2).z.abs(), 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(frame.centroid.z, 0.7, epsilon = 1e-3);
    }

    #[test]
    fn orientation_maps_approach_axis_onto_major_axis() {
        let cloud = hemisphere(0.05, 0.004, Point3::new(0.1, -0.2, 0.6));
        let frame = align_canonical_frame(&cloud, &IndexedGeometry, FRAC_PI_2).unwrap();
        assert_right_handed(&frame);
        assert_abs_diff_eq!(frame.orientation * Vector3::x(), frame.axis(0), epsilon = 1e-9);
        // Grip roll keeps the approach axis.
        assert_abs_diff_eq!(
            frame.grip_orientation * Vector3::x(),
            frame.axis(0),
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            frame.orientation.angle_to(&frame.grip_orientation),
            FRAC_PI_2,
            epsilon = 1e-9
        );
    }

    /// Collaborator returning a left-handed eigenbasis.
    struct MirroredAxes;

    impl SurfaceGeometry for MirroredAxes {
        fn estimate_normals(
            &self,
            _: &[Point3<f64>],
            _: &Point3<f64>,
            _: f64,
        ) -> Vec<crate::cloud::SurfacePoint> {
            Vec::new()
        }
        fn downsample(
            &self,
            s: &[crate::cloud::SurfacePoint],
            _: f64,
        ) -> Vec<crate::cloud::SurfacePoint> {
            s.to_vec()
        }
        fn classify_boundary(
            &self,
            s: &[crate::cloud::SurfacePoint],
            _: usize,
            _: f64,
            _: f64,
        ) -> Vec<bool> {
            vec![false; s.len()]
        }
        fn principal_axes(&self, _: &[Point3<f64>]) -> PrincipalAxes {
            PrincipalAxes {
                axes: Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, -1.0)),
                eigenvalues: [3.0, 2.0, 1.0],
            }
        }
    }

    #[test]
    fn third_axis_is_recomputed_from_first_two() {
        let cloud = planar_patch(0.1, 0.1, 0.01, 0.5, 0.0, 1);
        let frame = align_canonical_frame(&cloud, &MirroredAxes, 0.0).unwrap();
        assert_right_handed(&frame);
        assert_abs_diff_eq!(frame.axis(2), Vector3::z(), epsilon = 1e-12);
        assert_eq!(frame.orientation, frame.grip_orientation);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let geo = IndexedGeometry;
        let two = [Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0)];
        assert!(matches!(
            align_canonical_frame(&two, &geo, 0.0),
            Err(GraspError::DegenerateGeometry { n_points: 2, .. })
        ));

        let coincident = vec![Point3::new(0.3, 0.3, 0.3); 10];
        assert!(align_canonical_frame(&coincident, &geo, 0.0).is_err());

        let collinear: Vec<Point3<f64>> = (0..20)
            .map(|i| Point3::new(i as f64 * 0.01, i as f64 * 0.02, 0.5))
            .collect();
        assert!(align_canonical_frame(&collinear, &geo, 0.0).is_err());
    }

    #[test]
    fn canonical_form_uses_xyzw_quaternions() {
        let cloud = planar_patch(0.2, 0.05, 0.01, 0.5, 0.0, 1);
        let frame = align_canonical_frame(&cloud, &IndexedGeometry, FRAC_PI_2).unwrap();
        let c = frame.to_canonical();
        let q = frame.orientation.quaternion();
        assert_eq!(c.orientation, [q.i, q.j, q.k, q.w]);
        assert_eq!(c.axes[2], [frame.axis(2).x, frame.axis(2).y, frame.axis(2).z]);
    }
}
