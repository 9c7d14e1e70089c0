//! R-tree spatial index over 3D points.
//!
//! Built once per detection call and queried read-only.

use nalgebra::Point3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A point stored in the tree together with its index in the source slice.
#[derive(Clone, Debug)]
struct IndexedPoint {
    xyz: [f64; 3],
    index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// One neighbour hit: index into the indexed slice and squared distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance_sq: f64,
}

impl Neighbor {
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

/// Nearest-neighbour structure over a fixed point set.
#[derive(Clone)]
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<Point3<f64>>,
}

impl PointIndex {
    /// Bulk-load the index. Point indices refer to positions in `points`.
    pub fn new(points: &[Point3<f64>]) -> Self {
        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedPoint {
                xyz: [p.x, p.y, p.z],
                index,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
            points: points.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indexed points, in insertion order.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// 1-nearest neighbour, or `None` for an empty index.
    pub fn nearest(&self, query: &Point3<f64>) -> Option<Neighbor> {
        let q = [query.x, query.y, query.z];
        self.tree
            .nearest_neighbor_iter_with_distance_2(&q)
            .next()
            .map(|(p, distance_sq)| Neighbor {
                index: p.index,
                distance_sq,
            })
    }

    /// Up to `k` nearest neighbours, closest first.
    pub fn k_nearest(&self, query: &Point3<f64>, k: usize) -> Vec<Neighbor> {
        let q = [query.x, query.y, query.z];
        self.tree
            .nearest_neighbor_iter_with_distance_2(&q)
            .take(k)
            .map(|(p, distance_sq)| Neighbor {
                index: p.index,
                distance_sq,
            })
            .collect()
    }

    /// All neighbours with `distance <= radius`, sorted by index.
    pub fn within_radius(&self, query: &Point3<f64>, radius: f64) -> Vec<Neighbor> {
        let q = [query.x, query.y, query.z];
        let mut hits: Vec<Neighbor> = self
            .tree
            .locate_within_distance(q, radius * radius)
            .map(|p| Neighbor {
                index: p.index,
                distance_sq: p.distance_2(&q),
            })
            .collect();
        hits.sort_by_key(|n| n.index);
        hits
    }

    /// The indexed point farthest from `query` (linear scan).
    pub fn farthest_from(&self, query: &Point3<f64>) -> Option<Neighbor> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, p)| Neighbor {
                index,
                distance_sq: (p - query).norm_squared(),
            })
            .max_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq))
    }
}
