//! Basic example demonstrating fastfcm-rs usage
//!
//! Run with: cargo run --example basic --release

use fastfcm_rs::{FcmConfig, FuzzyCMeans};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    pretty_env_logger::init();

    println!("=== fastfcm-rs example ===\n");

    // Generate synthetic data: 3 clusters in 2D
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;

    println!("Generating {} samples with {} features...", n_samples, n_features);

    let mut data = Array2::<f64>::zeros((n_samples, n_features));
    let mut truth = vec![0usize; n_samples];

    // Cluster centers
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];

    for i in 0..n_samples {
        let cluster_idx = i % 3;
        let noise = Array2::random((1, n_features), Uniform::new(-1.0, 1.0));
        data[[i, 0]] = centers[cluster_idx][0] + noise[[0, 0]];
        data[[i, 1]] = centers[cluster_idx][1] + noise[[0, 1]];
        truth[i] = cluster_idx;
    }

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    let config = FcmConfig::new(n_clusters)
        .with_m(2.0)
        .with_eps(1e-6)
        .with_max_iters(300)
        .with_seed(42)
        .with_verbose(true);

    println!("Running fuzzy c-means with c={}...\n", n_clusters);

    let mut fcm = FuzzyCMeans::with_config(config);
    let status = fcm
        .train_with_labels(&data.view(), &truth)
        .expect("Training failed");
    println!("Status: {:?} after {:?} iterations", status, fcm.n_iterations());

    // Centroid i now corresponds to true cluster i
    println!("\nLearned centroids:");
    let centroids = fcm.centroids().unwrap();
    for i in 0..centroids.nrows() {
        println!(
            "  Centroid {}: ({:.4}, {:.4})",
            i,
            centroids[[i, 0]],
            centroids[[i, 1]]
        );
    }
    println!();

    // Show the soft memberships of the first few samples
    let membership = fcm.membership().unwrap();
    println!("Memberships of the first 5 samples:");
    for i in 0..5 {
        let row: Vec<String> = membership
            .row(i)
            .iter()
            .map(|u| format!("{:.3}", u))
            .collect();
        println!(
            "  Sample {} at ({:.2}, {:.2}) -> [{}]",
            i,
            data[[i, 0]],
            data[[i, 1]],
            row.join(", ")
        );
    }
    println!();

    let labels = fcm.predict(&data.view()).expect("Prediction failed");
    let correct = labels
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();

    println!(
        "Accuracy against the generating clusters: {:.1}%",
        correct as f64 / n_samples as f64 * 100.0
    );

    println!("\n=== Done! ===");
}
