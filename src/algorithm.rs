use crate::centroid::update_centroids;
use crate::config::{DegeneratePolicy, FcmConfig};
use crate::distance::max_abs_difference;
use crate::error::FcmError;
use crate::membership::{compute_membership, hard_assignments, initialize_membership};
use ndarray::{Array1, Array2, ArrayView2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Default fuzziness coefficient used for prediction
pub const DEFAULT_M: f64 = 2.0;

/// Outcome of the convergence loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FcmStatus {
    /// The membership change dropped below `eps`
    Converged,
    /// `max_iters` was reached first; the result holds the last iterate
    NotConverged,
}

/// Result of the fuzzy c-means algorithm
#[derive(Debug, Clone)]
pub struct FcmResult {
    /// Centroids of shape (n_clusters, n_features)
    pub centroids: Array2<f64>,
    /// Membership matrix of shape (n_samples, n_clusters)
    pub membership: Array2<f64>,
    /// Whether the run stopped below `eps` or at the iteration cap
    pub status: FcmStatus,
    /// Number of iterations performed
    pub n_iterations: usize,
    /// Largest membership change of every iteration, in order
    pub deltas: Vec<f64>,
}

impl FcmResult {
    /// Largest membership change of the last iteration
    pub fn final_delta(&self) -> f64 {
        self.deltas.last().copied().unwrap_or(f64::INFINITY)
    }

    /// True when the run stopped below `eps`
    pub fn converged(&self) -> bool {
        self.status == FcmStatus::Converged
    }
}

/// Check that `data` can be clustered with `config`
pub fn validate_input(data: &ArrayView2<f64>, config: &FcmConfig) -> Result<(), FcmError> {
    config.validate()?;

    let n_samples = data.nrows();

    if data.ncols() == 0 {
        return Err(FcmError::InvalidConfiguration(
            "data must have at least one feature".to_string(),
        ));
    }

    if n_samples < config.n_clusters {
        return Err(FcmError::InvalidConfiguration(format!(
            "Number of samples ({}) is less than the number of clusters ({})",
            n_samples, config.n_clusters
        )));
    }

    if let Some(pos) = data.iter().position(|x| !x.is_finite()) {
        return Err(FcmError::InvalidConfiguration(format!(
            "data contains a non-finite value at row {}",
            pos / data.ncols()
        )));
    }

    Ok(())
}

/// Run fuzzy c-means until the membership matrix stabilizes
///
/// Each iteration recomputes the centroids from the current memberships, then
/// the memberships from the new centroids. The run converges once the largest
/// absolute change of any membership is strictly below `config.eps`, and stops
/// with [`FcmStatus::NotConverged`] after `config.max_iters` iterations.
pub fn fuzzy_cmeans(data: &ArrayView2<f64>, config: &FcmConfig) -> Result<FcmResult, FcmError> {
    validate_input(data, config)?;

    let n_samples = data.nrows();
    let n_features = data.ncols();
    let n_clusters = config.n_clusters;

    if config.verbose {
        log::info!(
            "Training fuzzy c-means: {} samples, {} features, {} clusters, m = {}",
            n_samples,
            n_features,
            n_clusters,
            config.m
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut membership = initialize_membership(n_samples, n_clusters, &mut rng);

    let mut centroids = Array2::zeros((n_clusters, n_features));
    let mut deltas = Vec::new();
    let mut status = FcmStatus::NotConverged;

    for iteration in 0..config.max_iters {
        let iter_start = Instant::now();

        let update = update_centroids(data, &membership.view(), config.m);
        centroids = update.centroids;

        if !update.degenerate.is_empty() {
            match config.degenerate_policy {
                DegeneratePolicy::Abort => {
                    return Err(FcmError::DegenerateCluster {
                        cluster: update.degenerate[0],
                        n_samples,
                        n_clusters,
                    });
                }
                DegeneratePolicy::Reseed => {
                    reseed_centroids(&mut centroids, &update.degenerate, data, &mut rng);
                    log::warn!(
                        "Iteration {}: reseeded {} degenerate clusters {:?}",
                        iteration + 1,
                        update.degenerate.len(),
                        update.degenerate
                    );
                }
            }
        }

        let new_membership = compute_membership(data, &centroids.view(), config.m);
        let delta = max_abs_difference(&new_membership.view(), &membership.view());
        if delta.is_nan() {
            return Err(FcmError::NonFiniteMembership {
                iteration: iteration + 1,
            });
        }
        membership = new_membership;
        deltas.push(delta);

        let iter_time = iter_start.elapsed().as_secs_f64();
        if config.verbose {
            log::info!(
                "  Iteration {}/{}: delta = {:.3e}, time = {:.4}s",
                iteration + 1,
                config.max_iters,
                delta,
                iter_time
            );
        } else {
            log::debug!("iteration {}: delta = {:.3e}", iteration + 1, delta);
        }

        if delta < config.eps {
            status = FcmStatus::Converged;
            if config.verbose {
                log::info!(
                    "  Converged after {} iterations (delta {:.3e} < eps {:.3e})",
                    iteration + 1,
                    delta,
                    config.eps
                );
            }
            break;
        }
    }

    if status == FcmStatus::NotConverged {
        log::warn!(
            "Fuzzy c-means did not converge within {} iterations (last delta {:.3e}, eps {:.3e})",
            config.max_iters,
            deltas.last().copied().unwrap_or(f64::NAN),
            config.eps
        );
    }

    Ok(FcmResult {
        centroids,
        membership,
        status,
        n_iterations: deltas.len(),
        deltas,
    })
}

/// Replace the given centroids with distinct randomly chosen data points
fn reseed_centroids(
    centroids: &mut Array2<f64>,
    clusters: &[usize],
    data: &ArrayView2<f64>,
    rng: &mut ChaCha8Rng,
) {
    let indices: Vec<usize> = (0..data.nrows()).collect();
    let chosen: Vec<usize> = indices
        .choose_multiple(rng, clusters.len())
        .cloned()
        .collect();

    for (&cluster, &data_idx) in clusters.iter().zip(chosen.iter()) {
        centroids.row_mut(cluster).assign(&data.row(data_idx));
    }
}

/// Hard cluster assignment of every point against fixed centroids
pub fn predict_labels(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
    m: f64,
) -> Array1<usize> {
    let membership = compute_membership(data, centroids, m);
    hard_assignments(&membership.view())
}
