//! Shared synthetic point clouds for unit tests.

use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cloud::SurfacePoint;

/// Regular grid in the plane `z = z`, centred on the optical axis and
/// spanning `[-width/2, width/2] × [-height/2, height/2]` (edges included).
///
/// `noise > 0` adds uniform depth jitter in `[-noise, noise]` from a seeded RNG.
pub(crate) fn planar_patch(
    width: f64,
    height: f64,
    spacing: f64,
    z: f64,
    noise: f64,
    seed: u64,
) -> Vec<Point3<f64>> {
    let nx = (width / spacing).round() as usize;
    let ny = (height / spacing).round() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pts = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            let x = -0.5 * width + i as f64 * spacing;
            let y = -0.5 * height + j as f64 * spacing;
            let dz = if noise > 0.0 {
                rng.gen_range(-noise..=noise)
            } else {
                0.0
            };
            pts.push(Point3::new(x, y, z + dz));
        }
    }
    pts
}

/// Spherical cap of `radius` around `center`, sampled on an x/y grid, on the
/// side of the sphere that faces the origin.
pub(crate) fn hemisphere(radius: f64, spacing: f64, center: Point3<f64>) -> Vec<Point3<f64>> {
    let n = (radius / spacing).floor() as i64;
    let mut pts = Vec::new();
    for j in -n..=n {
        for i in -n..=n {
            let x = i as f64 * spacing;
            let y = j as f64 * spacing;
            let r2 = radius * radius - x * x - y * y;
            if r2 < 0.0 {
                continue;
            }
            pts.push(Point3::new(center.x + x, center.y + y, center.z - r2.sqrt()));
        }
    }
    pts
}

/// Open box seen from the sensor: a square top face at depth `z` plus four
/// side walls of height `depth` extending away from the sensor.
pub(crate) fn box_top_face(size: f64, depth: f64, spacing: f64, z: f64) -> Vec<Point3<f64>> {
    let mut pts = planar_patch(size, size, spacing, z, 0.0, 0);
    let half = 0.5 * size;
    let n_side = (size / spacing).round() as usize;
    let n_depth = (depth / spacing).round() as usize;
    for k in 1..=n_depth {
        let wz = z + k as f64 * spacing;
        for i in 0..=n_side {
            let t = -half + i as f64 * spacing;
            pts.push(Point3::new(t, -half, wz));
            pts.push(Point3::new(t, half, wz));
            if i > 0 && i < n_side {
                pts.push(Point3::new(-half, t, wz));
                pts.push(Point3::new(half, t, wz));
            }
        }
    }
    pts
}

/// Flat surface points with `+Z` normals and zero curvature.
pub(crate) fn planar_surface(points: &[Point3<f64>]) -> Vec<SurfacePoint> {
    points
        .iter()
        .map(|p| SurfacePoint::new(*p, Vector3::z(), 0.0))
        .collect()
}
