//! Train fuzzy c-means on a labeled dataset and report clustering accuracy
//!
//! Reads a feature matrix and an integer label vector from .npy files, shuffles
//! them with a seed, clusters the training split with label alignment, then
//! predicts both splits and reports how many points land in their true class.
//!
//! Usage: `fcm-evaluate <features.npy> <labels.npy> [--clusters 3] [--ratio 0.6] ...`

#[macro_use]
extern crate log;

use clap::Parser;
use fastfcm_rs::{predict, FcmConfig, FcmStatus, FuzzyCMeans};
use ndarray::{Array1, Array2, Axis};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::BufReader;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate fuzzy c-means clustering against known labels")]
struct Args {
    /// Feature matrix (n_samples x n_features, f64) in .npy format
    features: String,

    /// Category codes (n_samples, i64) in .npy format
    labels: String,

    /// Number of clusters
    #[arg(short, long, default_value_t = 3)]
    clusters: usize,

    /// Fuzziness coefficient
    #[arg(short, long, default_value_t = 2.0)]
    m: f64,

    /// Convergence threshold on the membership change
    #[arg(short, long, default_value_t = 1e-6)]
    eps: f64,

    /// Maximum number of iterations
    #[arg(long, default_value_t = 300)]
    max_iters: usize,

    /// Fraction of the shuffled data used for training
    #[arg(short, long, default_value_t = 0.6)]
    ratio: f64,

    /// Seed for shuffling and membership initialization
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Write the aligned centroids to this .npy file
    #[arg(short, long)]
    output: Option<String>,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn accuracy(predicted: &Array1<usize>, truth: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    hits as f64 / truth.len() as f64
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    if !(args.ratio > 0.0 && args.ratio < 1.0) {
        return Err(format!("ratio must lie in (0, 1), got {}", args.ratio).into());
    }

    let data: Array2<f64> = Array2::read_npy(BufReader::new(File::open(&args.features)?))?;
    let raw_labels: Array1<i64> = Array1::read_npy(BufReader::new(File::open(&args.labels)?))?;

    if raw_labels.len() != data.nrows() {
        return Err(format!(
            "{} feature rows but {} labels",
            data.nrows(),
            raw_labels.len()
        )
        .into());
    }

    let labels = raw_labels
        .iter()
        .map(|&l| usize::try_from(l).map_err(|_| format!("negative label {}", l)))
        .collect::<Result<Vec<usize>, _>>()?;

    info!(
        "Loaded data: {} samples x {} features",
        data.nrows(),
        data.ncols()
    );

    // Shuffle, then split into train and test parts
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut order: Vec<usize> = (0..data.nrows()).collect();
    order.shuffle(&mut rng);

    let n_train = (data.nrows() as f64 * args.ratio) as usize;
    let (train_idx, test_idx) = order.split_at(n_train);

    let train_x = data.select(Axis(0), train_idx);
    let test_x = data.select(Axis(0), test_idx);
    let train_y: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();
    let test_y: Vec<usize> = test_idx.iter().map(|&i| labels[i]).collect();

    info!(
        "Running fuzzy c-means with {} clusters, m={}, eps={}, max_iters={} on {} training samples",
        args.clusters,
        args.m,
        args.eps,
        args.max_iters,
        train_x.nrows()
    );

    let config = FcmConfig::new(args.clusters)
        .with_m(args.m)
        .with_eps(args.eps)
        .with_max_iters(args.max_iters)
        .with_seed(args.seed)
        .with_verbose(args.debug);

    let mut fcm = FuzzyCMeans::with_config(config);
    let status = fcm.train_with_labels(&train_x.view(), &train_y)?;
    if status == FcmStatus::NotConverged {
        warn!("reporting accuracy for a run that did not converge");
    }

    let centroids = fcm.centroids().ok_or("No centroids after training")?;

    let train_pred = predict(&train_x.view(), &centroids.view())?;
    let test_pred = predict(&test_x.view(), &centroids.view())?;

    println!(
        "Training accuracy: {:.2}%",
        accuracy(&train_pred, &train_y) * 100.0
    );
    println!(
        "Test accuracy: {:.2}%",
        accuracy(&test_pred, &test_y) * 100.0
    );

    if let Some(output) = &args.output {
        centroids.write_npy(File::create(output)?)?;
        info!("Saved centroids to {}", output);
    }

    Ok(())
}
