//! Scatter matrices and principal-axis decomposition.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

/// Principal axes of a point set, ordered by descending variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    /// Column `i` is the axis of the `i`-th largest eigenvalue.
    pub axes: Matrix3<f64>,
    /// Eigenvalues of the scatter matrix, descending.
    pub eigenvalues: [f64; 3],
}

impl PrincipalAxes {
    pub fn axis(&self, i: usize) -> Vector3<f64> {
        self.axes.column(i).into_owned()
    }
}

/// Mean-free scatter matrix `Σ (p - c)(p - c)ᵀ / n` about `center`.
pub fn covariance_about(points: &[Point3<f64>], center: &Point3<f64>) -> Matrix3<f64> {
    if points.is_empty() {
        return Matrix3::zeros();
    }
    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p - center;
        cov += d * d.transpose();
    }
    cov / points.len() as f64
}

/// Eigen-decompose a symmetric 3×3 matrix and sort the pairs by descending
/// eigenvalue.
pub fn sorted_eigen(sym: Matrix3<f64>) -> PrincipalAxes {
    let eig = SymmetricEigen::new(sym);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

    let axes = Matrix3::from_columns(&[
        eig.eigenvectors.column(order[0]).into_owned(),
        eig.eigenvectors.column(order[1]).into_owned(),
        eig.eigenvectors.column(order[2]).into_owned(),
    ]);
    PrincipalAxes {
        axes,
        eigenvalues: [
            eig.eigenvalues[order[0]],
            eig.eigenvalues[order[1]],
            eig.eigenvalues[order[2]],
        ],
    }
}

/// Principal axes of an already centred cloud.
pub fn principal_axes(centered: &[Point3<f64>]) -> PrincipalAxes {
    sorted_eigen(covariance_about(centered, &Point3::origin()))
}
