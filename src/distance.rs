use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

/// Euclidean distance between two points of equal length
///
/// Differences are scaled by the largest one before squaring, as `hypot` does,
/// so coordinates near the top of the `f64` range do not overflow.
#[inline]
pub fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    let scale = a
        .iter()
        .zip(b.iter())
        .fold(0.0f64, |acc, (&x, &y)| {
            let d = (x - y).abs();
            if d > acc || d.is_nan() {
                d
            } else {
                acc
            }
        });
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }

    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let d = (x - y) / scale;
        sum += d * d;
    }
    scale * sum.sqrt()
}

/// Compute the Euclidean distance from every row of `data` to `centroid`
///
/// The difference is taken explicitly rather than through
/// ||x||^2 + ||c||^2 - 2*x.c so that a point equal to the centroid gives exactly 0.
pub fn euclidean_distances(data: &ArrayView2<f64>, centroid: &ArrayView1<f64>) -> Array1<f64> {
    let mut distances = Array1::zeros(data.nrows());

    Zip::from(&mut distances)
        .and(data.rows())
        .par_for_each(|dist, row| {
            *dist = euclidean_distance(&row, centroid);
        });

    distances
}

/// Distance matrix of shape (n_samples, n_clusters)
pub fn pairwise_distances(data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Array2<f64> {
    let mut distances = Array2::zeros((data.nrows(), centroids.nrows()));

    for (j, centroid) in centroids.rows().into_iter().enumerate() {
        distances
            .column_mut(j)
            .assign(&euclidean_distances(data, &centroid));
    }

    distances
}

/// Largest absolute entry-wise difference between two matrices of equal shape
///
/// Returns NaN if any difference is NaN.
pub fn max_abs_difference(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> f64 {
    Zip::from(a).and(b).fold(0.0f64, |acc, &x, &y| {
        let diff = (x - y).abs();
        if acc.is_nan() || diff.is_nan() {
            f64::NAN
        } else {
            acc.max(diff)
        }
    })
}
