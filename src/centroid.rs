use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Result of recomputing every centroid from the membership matrix
pub struct CentroidUpdate {
    /// New centroids of shape (n_clusters, n_features). Rows of degenerate
    /// clusters are left at zero.
    pub centroids: Array2<f64>,

    /// Clusters whose total weight was zero, in ascending order
    pub degenerate: Vec<usize>,
}

/// Membership-weighted mean of all points for one cluster
///
/// `c_j = sum_i(U[i, j]^m * x_i) / sum_i(U[i, j]^m)`
///
/// Returns `None` if the cluster's total weight is not strictly positive.
pub fn compute_centroid(
    data: &ArrayView2<f64>,
    memberships: &ArrayView1<f64>,
    m: f64,
) -> Option<Array1<f64>> {
    let weights = memberships.mapv(|u| u.powf(m));
    let total = weights.sum();

    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    Some(weights.dot(data) / total)
}

/// Recompute all centroids, one cluster per task
pub fn update_centroids(
    data: &ArrayView2<f64>,
    membership: &ArrayView2<f64>,
    m: f64,
) -> CentroidUpdate {
    let n_clusters = membership.ncols();

    let computed: Vec<Option<Array1<f64>>> = (0..n_clusters)
        .into_par_iter()
        .map(|j| compute_centroid(data, &membership.column(j), m))
        .collect();

    let mut centroids = Array2::zeros((n_clusters, data.ncols()));
    let mut degenerate = Vec::new();

    for (j, centroid) in computed.into_iter().enumerate() {
        match centroid {
            Some(c) => centroids.row_mut(j).assign(&c),
            None => degenerate.push(j),
        }
    }

    CentroidUpdate {
        centroids,
        degenerate,
    }
}
