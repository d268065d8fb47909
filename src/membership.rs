use crate::distance::pairwise_distances;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};
use rand::distributions::{Distribution, Open01};
use rand::Rng;

/// Random row-stochastic membership matrix of shape (n_samples, n_clusters)
///
/// Entries are drawn from the open interval (0, 1), so no row can sum to zero.
pub fn initialize_membership<R: Rng + ?Sized>(
    n_samples: usize,
    n_clusters: usize,
    rng: &mut R,
) -> Array2<f64> {
    let mut membership = Array2::from_shape_simple_fn((n_samples, n_clusters), || -> f64 {
        Open01.sample(&mut *rng)
    });

    let row_sums = membership.sum_axis(Axis(1)).insert_axis(Axis(1));
    membership /= &row_sums;

    membership
}

/// Compute the membership matrix for `data` against `centroids`
///
/// `U[i, j] = 1 / sum_k (d(x_i, c_j) / d(x_i, c_k))^(2 / (m - 1))`
///
/// A point lying exactly on a centroid gets membership 1 for that cluster and
/// 0 elsewhere; when several centroids coincide with the point the membership
/// is split equally between them.
pub fn compute_membership(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
    m: f64,
) -> Array2<f64> {
    let distances = pairwise_distances(data, centroids);
    let exponent = 2.0 / (m - 1.0);

    let mut membership = Array2::zeros(distances.raw_dim());

    Zip::from(membership.rows_mut())
        .and(distances.rows())
        .par_for_each(|row, dists| membership_row(row, dists, exponent));

    membership
}

fn membership_row(mut row: ArrayViewMut1<f64>, distances: ArrayView1<f64>, exponent: f64) {
    let n_coincident = distances.iter().filter(|&&d| d == 0.0).count();

    if n_coincident > 0 {
        let share = 1.0 / n_coincident as f64;
        for (u, &d) in row.iter_mut().zip(distances.iter()) {
            *u = if d == 0.0 { share } else { 0.0 };
        }
        return;
    }

    for (u, &d_j) in row.iter_mut().zip(distances.iter()) {
        let denom: f64 = distances.iter().map(|&d_k| (d_j / d_k).powf(exponent)).sum();
        *u = 1.0 / denom;
    }
}

/// Index of the largest membership in each row (first index wins ties)
pub fn hard_assignments(membership: &ArrayView2<f64>) -> Array1<usize> {
    membership
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            for (j, &u) in row.iter().enumerate() {
                if u > row[best] {
                    best = j;
                }
            }
            best
        })
        .collect()
}
