use approx::assert_relative_eq;
use fastfcm_rs::{
    align_clusters, cluster, compute_membership, fuzzy_cmeans, predict, update_centroids,
    DegeneratePolicy, FcmConfig, FcmError, FcmStatus, FuzzyCMeans,
};
use ndarray::{array, Array2, ArrayView2, Axis};
use ndarray_rand::rand_distr::{Normal, Uniform};
use ndarray_rand::RandomExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const BLOB_MEANS: [[f64; 2]; 3] = [[0.0, 0.0], [8.0, 8.0], [-8.0, 8.0]];

/// Three 2-D Gaussian blobs (unit variance), 50 points each, interleaved
fn generate_blobs(seed: u64) -> (Array2<f64>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Array2::random_using((150, 2), Normal::new(0.0, 1.0).unwrap(), &mut rng);

    let mut data = Array2::zeros((150, 2));
    let mut labels = Vec::with_capacity(150);

    for i in 0..150 {
        let blob = i % 3;
        data[[i, 0]] = BLOB_MEANS[blob][0] + noise[[i, 0]];
        data[[i, 1]] = BLOB_MEANS[blob][1] + noise[[i, 1]];
        labels.push(blob);
    }

    (data, labels)
}

fn assert_valid_membership(u: &ArrayView2<f64>) {
    for row in u.rows() {
        assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-9);
        for &x in row.iter() {
            assert!((0.0..=1.0).contains(&x), "membership {} outside [0, 1]", x);
        }
    }
}

fn blob_config() -> FcmConfig {
    FcmConfig::new(3).with_m(2.0).with_eps(1e-6).with_seed(42)
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_three_blobs_recovered() {
    let (data, labels) = generate_blobs(7);

    let (result, alignment) = cluster(&data.view(), Some(&labels[..]), &blob_config()).unwrap();

    assert_eq!(result.status, FcmStatus::Converged);
    assert!(alignment.unwrap().conflicts.is_empty());

    // Centroid i sits on blob i after alignment
    for (i, mean) in BLOB_MEANS.iter().enumerate() {
        let dx = result.centroids[[i, 0]] - mean[0];
        let dy = result.centroids[[i, 1]] - mean[1];
        let dist = (dx * dx + dy * dy).sqrt();
        assert!(dist < 0.75, "centroid {} is {} away from its blob mean", i, dist);
    }

    let predicted = predict(&data.view(), &result.centroids.view()).unwrap();
    let correct = predicted
        .iter()
        .zip(labels.iter())
        .filter(|(p, t)| p == t)
        .count();
    assert!(
        correct as f64 / labels.len() as f64 >= 0.95,
        "only {} of {} points predicted correctly",
        correct,
        labels.len()
    );
}

#[test]
fn test_coincident_point_gets_full_membership() {
    let data = array![[1.0, 1.0], [4.0, -2.0], [0.5, 0.5]];
    let centroids = array![[4.0, -2.0], [0.0, 0.0]];

    let u = compute_membership(&data.view(), &centroids.view(), 2.0);

    assert_eq!(u[[1, 0]], 1.0);
    assert_eq!(u[[1, 1]], 0.0);
    assert!(u.iter().all(|x| !x.is_nan()));
    assert_valid_membership(&u.view());
}

#[test]
fn test_single_cluster() {
    let data = Array2::random_using(
        (80, 3),
        Uniform::new(-5.0, 5.0),
        &mut ChaCha8Rng::seed_from_u64(11),
    );

    let result = fuzzy_cmeans(&data.view(), &FcmConfig::new(1)).unwrap();

    assert!(result.membership.iter().all(|&u| u == 1.0));

    let mean = data.mean_axis(Axis(0)).unwrap();
    for j in 0..3 {
        assert_relative_eq!(result.centroids[[0, j]], mean[j], epsilon = 1e-9);
    }
}

#[test]
fn test_n_equals_clusters() {
    let data = array![[0.0, 0.0], [5.0, 1.0], [-3.0, 4.0], [2.0, -6.0]];

    let result = fuzzy_cmeans(&data.view(), &FcmConfig::new(4).with_seed(3)).unwrap();

    assert_eq!(result.centroids.shape(), &[4, 2]);
    assert!(result.centroids.iter().all(|c| c.is_finite()));
    assert_valid_membership(&result.membership.view());
}

// ============================================================================
// Property Tests
// ============================================================================

#[test]
fn test_membership_rows_sum_to_one() {
    for seed in 0..5 {
        let data = Array2::random_using(
            (120, 4),
            Uniform::new(-1.0, 1.0),
            &mut ChaCha8Rng::seed_from_u64(seed),
        );

        for &(n_clusters, m) in &[(2, 1.5), (3, 2.0), (6, 3.0)] {
            let config = FcmConfig::new(n_clusters)
                .with_m(m)
                .with_seed(seed)
                .with_max_iters(100);
            let result = fuzzy_cmeans(&data.view(), &config).unwrap();
            assert_valid_membership(&result.membership.view());
        }
    }
}

#[test]
fn test_reproducibility_with_seed() {
    let (data, _) = generate_blobs(5);
    let config = FcmConfig::new(3).with_seed(12345);

    let r1 = fuzzy_cmeans(&data.view(), &config).unwrap();
    let r2 = fuzzy_cmeans(&data.view(), &config).unwrap();

    // Bit-for-bit identical
    assert_eq!(r1.centroids, r2.centroids);
    assert_eq!(r1.membership, r2.membership);
    assert_eq!(r1.deltas, r2.deltas);
}

#[test]
fn test_different_seeds_start_differently() {
    let (data, _) = generate_blobs(5);

    let r1 = fuzzy_cmeans(&data.view(), &FcmConfig::new(3).with_seed(1)).unwrap();
    let r2 = fuzzy_cmeans(&data.view(), &FcmConfig::new(3).with_seed(99999)).unwrap();

    assert_ne!(r1.deltas[0], r2.deltas[0]);
}

#[test]
fn test_alignment_is_idempotent() {
    let (data, labels) = generate_blobs(9);

    let (result, _) = cluster(&data.view(), Some(&labels[..]), &blob_config()).unwrap();
    let again = align_clusters(&result.membership.view(), &labels).unwrap();

    assert!(again.is_identity());
    assert!(again.conflicts.is_empty());

    let (centroids, membership) =
        again.apply(&result.centroids.view(), &result.membership.view());
    assert_eq!(centroids, result.centroids);
    assert_eq!(membership, result.membership);
}

#[test]
fn test_delta_non_increasing_after_warm_up() {
    let (data, _) = generate_blobs(21);

    let result = fuzzy_cmeans(&data.view(), &blob_config().with_eps(1e-8)).unwrap();
    assert!(result.converged());

    // Warm-up: the symmetry-breaking phase, up to the largest delta and at
    // least half of the run
    let peak = result
        .deltas
        .iter()
        .enumerate()
        .fold(0, |best, (i, &d)| if d > result.deltas[best] { i } else { best });
    let warm_up = peak.max(result.deltas.len() / 2);
    for pair in result.deltas.windows(2).skip(warm_up) {
        assert!(
            pair[1] <= pair[0] * (1.0 + 1e-6) + 1e-14,
            "delta grew from {:e} to {:e}",
            pair[0],
            pair[1]
        );
    }
}

// ============================================================================
// Error and Status Tests
// ============================================================================

#[test]
fn test_invalid_configurations() {
    let data = Array2::random((10, 2), Uniform::new(-1.0, 1.0));

    let configs = [
        FcmConfig::new(0),
        FcmConfig::new(11),
        FcmConfig::new(2).with_m(1.0),
        FcmConfig::new(2).with_eps(0.0),
        FcmConfig::new(2).with_max_iters(0),
    ];

    for config in configs.iter() {
        let result = fuzzy_cmeans(&data.view(), config);
        assert!(
            matches!(result, Err(FcmError::InvalidConfiguration(_))),
            "expected InvalidConfiguration for {:?}",
            config
        );
    }
}

#[test]
fn test_not_converged_is_not_an_error() {
    let (data, _) = generate_blobs(4);
    let config = blob_config().with_max_iters(1);

    let result = fuzzy_cmeans(&data.view(), &config).unwrap();

    assert_eq!(result.status, FcmStatus::NotConverged);
    assert_eq!(result.n_iterations, 1);
    assert_valid_membership(&result.membership.view());
}

#[test]
fn test_degenerate_cluster_detected() {
    let data = array![[0.0, 0.0], [1.0, 1.0]];
    let membership = array![[0.0, 1.0], [0.0, 1.0]];

    let update = update_centroids(&data.view(), &membership.view(), 2.0);
    assert_eq!(update.degenerate, vec![0]);
    assert!(update.centroids.iter().all(|c| c.is_finite()));
}

#[test]
fn test_reseed_policy_runs_normally() {
    let (data, _) = generate_blobs(2);
    let config = blob_config().with_degenerate_policy(DegeneratePolicy::Reseed);

    let result = fuzzy_cmeans(&data.view(), &config).unwrap();
    assert!(result.converged());
}

/// 60 uniform points with m = 2000: u^m underflows to zero on the first
/// centroid update, so at least one cluster has no weight
fn collapsing_setup() -> (Array2<f64>, FcmConfig) {
    let data = Array2::random_using(
        (60, 2),
        Uniform::new(-1.0, 1.0),
        &mut ChaCha8Rng::seed_from_u64(17),
    );
    (data, FcmConfig::new(3).with_m(2000.0).with_seed(5))
}

#[test]
fn test_collapsed_cluster_aborts() {
    let (data, config) = collapsing_setup();

    let result = fuzzy_cmeans(&data.view(), &config);
    match result {
        Err(FcmError::DegenerateCluster {
            cluster,
            n_samples,
            n_clusters,
        }) => {
            assert!(cluster < 3);
            assert_eq!(n_samples, 60);
            assert_eq!(n_clusters, 3);
        }
        other => panic!("Expected DegenerateCluster, got {:?}", other),
    }
}

#[test]
fn test_collapsed_cluster_reseeded() {
    let (data, config) = collapsing_setup();
    let config = config.with_degenerate_policy(DegeneratePolicy::Reseed);

    let result = fuzzy_cmeans(&data.view(), &config).unwrap();

    assert!(result.centroids.iter().all(|c| c.is_finite()));
    assert!(result.membership.iter().all(|u| u.is_finite()));
    assert_valid_membership(&result.membership.view());
}

#[test]
fn test_large_magnitude_points_keep_rows_stochastic() {
    let data = array![[1e200, 1e200], [-1e200, -1e200], [1e200, -1e200], [0.0, 0.0]];

    let result = fuzzy_cmeans(&data.view(), &FcmConfig::new(2)).unwrap();

    assert!(result.membership.iter().all(|u| u.is_finite()));
    assert_valid_membership(&result.membership.view());

    let labels = predict(&data.view(), &result.centroids.view()).unwrap();
    assert!(labels.iter().all(|&l| l < 2));
}

#[test]
fn test_predict_dimension_mismatch() {
    let centroids = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
    let data = array![[0.0, 0.0]];

    let result = predict(&data.view(), &centroids.view());
    assert!(matches!(
        result,
        Err(FcmError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    ));
}

// ============================================================================
// Model API Tests
// ============================================================================

#[test]
fn test_model_train_with_labels_and_predict() {
    let (data, labels) = generate_blobs(13);

    let mut fcm = FuzzyCMeans::with_config(blob_config());
    let status = fcm.train_with_labels(&data.view(), &labels).unwrap();
    assert_eq!(status, FcmStatus::Converged);

    let predicted = fcm.predict(&data.view()).unwrap();
    let correct = predicted
        .iter()
        .zip(labels.iter())
        .filter(|(p, t)| p == t)
        .count();
    assert!(correct >= 143);

    let free = predict(&data.view(), &fcm.centroids().unwrap().view()).unwrap();
    assert_eq!(free, predicted);
}

#[test]
fn test_model_fit_predict_consistent() {
    let data = Array2::random((200, 4), Uniform::new(-1.0, 1.0));
    let mut fcm = FuzzyCMeans::new(4, 3);

    let labels1 = fcm.fit_predict(&data.view()).unwrap();
    let labels2 = fcm.predict(&data.view()).unwrap();

    assert_eq!(labels1, labels2);
    assert!(labels1.iter().all(|&l| l < 3));
}

#[test]
fn test_model_predict_before_fit_fails() {
    let data = Array2::random((20, 4), Uniform::new(-1.0, 1.0));
    let fcm = FuzzyCMeans::new(4, 3);

    match fcm.predict(&data.view()) {
        Err(FcmError::NotFitted) => {}
        _ => panic!("Expected NotFitted error"),
    }
}

#[test]
fn test_model_high_dimensional_data() {
    let data = Array2::random((200, 256), Uniform::new(-1.0, 1.0));
    let mut fcm = FuzzyCMeans::with_config(FcmConfig::new(5).with_max_iters(50));

    let result = fcm.fit_predict(&data.view());
    assert!(result.is_ok(), "Should handle high-dimensional data");
    assert_valid_membership(&fcm.membership().unwrap().view());
}
