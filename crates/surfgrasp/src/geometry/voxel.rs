//! Voxel-grid thinning of surface points.

use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};

use crate::cloud::SurfacePoint;

#[derive(Default)]
struct VoxelAccum {
    position: Vector3<f64>,
    normal: Vector3<f64>,
    curvature: f64,
    count: usize,
}

type VoxelKey = (i64, i64, i64);

fn voxel_key(p: &Point3<f64>, inv_leaf: f64) -> VoxelKey {
    (
        (p.x * inv_leaf).floor() as i64,
        (p.y * inv_leaf).floor() as i64,
        (p.z * inv_leaf).floor() as i64,
    )
}

/// Replace all points falling in the same cubic cell of edge `leaf` by their
/// mean position, mean curvature and renormalised mean normal.
///
/// Non-finite points are skipped. Output is ordered by voxel key, so the
/// result does not depend on input order. A non-positive or non-finite `leaf`
/// returns the finite input points unchanged.
pub fn voxel_downsample(points: &[SurfacePoint], leaf: f64) -> Vec<SurfacePoint> {
    if !(leaf.is_finite() && leaf > 0.0) {
        return points.iter().copied().filter(SurfacePoint::is_finite).collect();
    }
    let inv_leaf = 1.0 / leaf;

    let mut cells: BTreeMap<VoxelKey, VoxelAccum> = BTreeMap::new();
    for sp in points.iter().filter(|sp| sp.is_finite()) {
        let cell = cells.entry(voxel_key(&sp.position, inv_leaf)).or_default();
        cell.position += sp.position.coords;
        cell.normal += sp.normal;
        cell.curvature += sp.curvature;
        cell.count += 1;
    }

    let n_cells = cells.len();
    let out: Vec<SurfacePoint> = cells
        .into_values()
        .filter_map(|cell| {
            let n = cell.count as f64;
            // Opposing normals in one cell cancel out; such cells carry no direction.
            let normal = cell.normal.try_normalize(1e-9)?;
            Some(SurfacePoint::new(
                Point3::from(cell.position / n),
                normal,
                cell.curvature / n,
            ))
        })
        .collect();

    tracing::debug!(
        n_in = points.len(),
        n_cells,
        n_out = out.len(),
        leaf,
        "voxel downsample complete"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sp(x: f64, y: f64, z: f64, curvature: f64) -> SurfacePoint {
        SurfacePoint::from_arrays([x, y, z], [0.0, 0.0, 1.0], curvature)
    }

    #[test]
    fn points_in_one_cell_are_averaged() {
        let pts = [sp(0.001, 0.001, 0.0, 0.1), sp(0.003, 0.005, 0.0, 0.3)];
        let out = voxel_downsample(&pts, 0.01);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].position.x, 0.002, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].position.y, 0.003, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].curvature, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].normal.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let pts: Vec<SurfacePoint> = (0..50)
            .map(|i| sp(i as f64 * 0.0031, (i % 7) as f64 * 0.004, 0.0, i as f64 * 0.01))
            .collect();
        let mut reversed = pts.clone();
        reversed.reverse();
        let a = voxel_downsample(&pts, 0.01);
        let b = voxel_downsample(&reversed, 0.01);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_abs_diff_eq!(pa.position.coords, pb.position.coords, epsilon = 1e-12);
            assert_abs_diff_eq!(pa.curvature, pb.curvature, epsilon = 1e-12);
        }
    }

    #[test]
    fn non_finite_points_are_dropped() {
        let mut bad = sp(0.0, 0.0, 0.0, 0.1);
        bad.normal = Vector3::repeat(f64::NAN);
        let out = voxel_downsample(&[bad, sp(0.5, 0.5, 0.5, 0.0)], 0.01);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].position.x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn opposing_normals_cancel_cell() {
        let mut down = sp(0.002, 0.0, 0.0, 0.0);
        down.normal = -Vector3::z();
        let out = voxel_downsample(&[sp(0.001, 0.0, 0.0, 0.0), down], 0.01);
        assert!(out.is_empty());
    }
}
