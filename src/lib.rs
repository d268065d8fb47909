//! # fastfcm-rs
//!
//! Fuzzy C-Means clustering in Rust, compatible with ndarray.
//!
//! Every point receives a graded membership in every cluster instead of a
//! single hard label. The memberships of a point always sum to one.
//!
//! ## Features
//!
//! - **Bounded iteration**: stops when the membership matrix changes by less than
//!   `eps`, or reports [`FcmStatus::NotConverged`] after `max_iters` iterations
//! - **Reproducible**: the random initial memberships come from a seeded ChaCha RNG
//! - **Parallel computation**: uses rayon for per-point and per-cluster work, with
//!   every sum evaluated in a fixed order
//! - **Label alignment**: optional majority-vote mapping of clusters onto known labels
//! - **Familiar API**: `train()`, `fit()`, `predict()`, `fit_predict()`
//!
//! ## Example
//!
//! ```rust
//! use fastfcm_rs::{FuzzyCMeans, FcmConfig, FcmStatus};
//! use ndarray::Array2;
//! use ndarray_rand::RandomExt;
//! use ndarray_rand::rand_distr::Uniform;
//!
//! let data = Array2::random((500, 8), Uniform::new(-1.0, 1.0));
//!
//! let config = FcmConfig::new(4).with_m(2.0).with_eps(1e-5).with_seed(42);
//! let mut fcm = FuzzyCMeans::with_config(config);
//! let status = fcm.train(&data.view()).unwrap();
//!
//! let membership = fcm.membership().unwrap();
//! assert_eq!(membership.shape(), &[500, 4]);
//!
//! let labels = fcm.predict(&data.view()).unwrap();
//! assert_eq!(labels.len(), 500);
//! # let _ = status == FcmStatus::Converged;
//! ```
//!
//! ## Aligning with known labels
//!
//! ```rust
//! use fastfcm_rs::{cluster, predict, FcmConfig};
//! use ndarray::array;
//!
//! let data = array![[9.0, 9.0], [0.0, 0.0], [9.2, 8.9], [0.1, 0.2]];
//! let labels: Vec<usize> = vec![1, 0, 1, 0];
//!
//! let (result, alignment) = cluster(&data.view(), Some(&labels[..]), &FcmConfig::new(2)).unwrap();
//! assert!(alignment.unwrap().conflicts.is_empty());
//!
//! let predicted = predict(&data.view(), &result.centroids.view()).unwrap();
//! assert_eq!(predicted.to_vec(), vec![1, 0, 1, 0]);
//! ```

mod algorithm;
mod alignment;
mod centroid;
mod config;
mod distance;
mod error;
mod fcm;
mod membership;

pub use algorithm::{fuzzy_cmeans, predict_labels, FcmResult, FcmStatus, DEFAULT_M};
pub use alignment::{align_clusters, LabelAlignment, LabelConflict};
pub use centroid::{compute_centroid, update_centroids, CentroidUpdate};
pub use config::{DegeneratePolicy, FcmConfig};
pub use distance::{euclidean_distances, pairwise_distances};
pub use error::FcmError;
pub use fcm::{cluster, predict, FuzzyCMeans};
pub use membership::{compute_membership, hard_assignments, initialize_membership};
