use crate::algorithm::{fuzzy_cmeans, predict_labels, FcmResult, FcmStatus, DEFAULT_M};
use crate::alignment::{align_clusters, LabelAlignment};
use crate::config::FcmConfig;
use crate::error::FcmError;
use crate::membership::compute_membership;
use ndarray::{Array1, Array2, ArrayView2};

/// Cluster `data` and, when ground-truth `labels` are given, align the clusters to them.
///
/// Without labels the cluster order is arbitrary. With labels, centroid `i` and
/// membership column `i` correspond to label `i` afterwards, and the applied
/// mapping is returned next to the result.
///
/// # Errors
///
/// - [`FcmError::InvalidConfiguration`] for bad parameters, unusable data or out-of-range labels
/// - [`FcmError::DimensionMismatch`] if `labels` does not have one entry per row
/// - [`FcmError::DegenerateCluster`] if a cluster collapses under [`crate::DegeneratePolicy::Abort`]
/// - [`FcmError::NonFiniteMembership`] if distances overflow and memberships turn NaN
pub fn cluster(
    data: &ArrayView2<f64>,
    labels: Option<&[usize]>,
    config: &FcmConfig,
) -> Result<(FcmResult, Option<LabelAlignment>), FcmError> {
    if let Some(labels) = labels {
        if labels.len() != data.nrows() {
            return Err(FcmError::DimensionMismatch {
                expected: data.nrows(),
                found: labels.len(),
            });
        }

        let out_of_range = labels
            .iter()
            .enumerate()
            .find(|&(_, &l)| l >= config.n_clusters);
        if let Some((idx, &label)) = out_of_range {
            return Err(FcmError::InvalidConfiguration(format!(
                "label {} at index {} is outside 0..{}",
                label, idx, config.n_clusters
            )));
        }
    }

    let mut result = fuzzy_cmeans(data, config)?;

    let alignment = match labels {
        Some(labels) => {
            let alignment = align_clusters(&result.membership.view(), labels)?;
            let (centroids, membership) =
                alignment.apply(&result.centroids.view(), &result.membership.view());
            result.centroids = centroids;
            result.membership = membership;
            Some(alignment)
        }
        None => None,
    };

    Ok((result, alignment))
}

/// Assign every point to its highest-membership centroid (with m = 2).
///
/// # Errors
///
/// - [`FcmError::InvalidConfiguration`] if `centroids` is empty or either input
///   holds a non-finite value
/// - [`FcmError::DimensionMismatch`] if the feature counts differ
pub fn predict(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
) -> Result<Array1<usize>, FcmError> {
    if centroids.nrows() == 0 {
        return Err(FcmError::InvalidConfiguration(
            "at least one centroid is required".to_string(),
        ));
    }

    if data.ncols() != centroids.ncols() {
        return Err(FcmError::DimensionMismatch {
            expected: centroids.ncols(),
            found: data.ncols(),
        });
    }

    ensure_finite(centroids, "centroids")?;
    ensure_finite(data, "data")?;

    Ok(predict_labels(data, centroids, DEFAULT_M))
}

fn ensure_finite(values: &ArrayView2<f64>, what: &str) -> Result<(), FcmError> {
    match values.iter().position(|x| !x.is_finite()) {
        Some(pos) => Err(FcmError::InvalidConfiguration(format!(
            "{} contain a non-finite value at row {}",
            what,
            pos / values.ncols()
        ))),
        None => Ok(()),
    }
}

/// Fuzzy c-means clustering model with an ndarray-friendly API.
///
/// # Example
///
/// ```
/// use fastfcm_rs::FuzzyCMeans;
/// use ndarray::array;
///
/// let data = array![[0.0, 0.1], [0.2, 0.0], [9.9, 10.0], [10.1, 9.8]];
///
/// let mut fcm = FuzzyCMeans::new(2, 2);
/// fcm.train(&data.view()).unwrap();
///
/// let labels = fcm.predict(&data.view()).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
pub struct FuzzyCMeans {
    /// Model configuration
    config: FcmConfig,

    /// Number of features (dimensions)
    d: usize,

    /// Result of the last training run (None if not yet fitted)
    fitted: Option<FcmResult>,

    /// Label mapping applied by the last `train_with_labels` call
    alignment: Option<LabelAlignment>,
}

impl FuzzyCMeans {
    /// Create a new model with default configuration.
    ///
    /// # Arguments
    ///
    /// * `d` - Number of features (dimensions) in the data
    /// * `n_clusters` - Number of clusters
    pub fn new(d: usize, n_clusters: usize) -> Self {
        Self {
            config: FcmConfig::new(n_clusters),
            d,
            fitted: None,
            alignment: None,
        }
    }

    /// Create a new model with custom configuration.
    ///
    /// The feature count is taken from the first training call.
    pub fn with_config(config: FcmConfig) -> Self {
        Self {
            d: 0,
            config,
            fitted: None,
            alignment: None,
        }
    }

    fn check_dimensions(&mut self, data: &ArrayView2<f64>) -> Result<(), FcmError> {
        let n_features = data.ncols();

        if self.d == 0 {
            self.d = n_features;
        } else if n_features != self.d {
            return Err(FcmError::DimensionMismatch {
                expected: self.d,
                found: n_features,
            });
        }

        Ok(())
    }

    /// Train the model on unlabeled data. Cluster order is arbitrary.
    ///
    /// Returns whether the run converged; a `NotConverged` run still stores
    /// its last centroids and memberships.
    pub fn train(&mut self, data: &ArrayView2<f64>) -> Result<FcmStatus, FcmError> {
        self.check_dimensions(data)?;

        let (result, _) = cluster(data, None, &self.config)?;
        let status = result.status;

        self.fitted = Some(result);
        self.alignment = None;
        Ok(status)
    }

    /// Train the model and align cluster `i` with ground-truth label `i`.
    pub fn train_with_labels(
        &mut self,
        data: &ArrayView2<f64>,
        labels: &[usize],
    ) -> Result<FcmStatus, FcmError> {
        self.check_dimensions(data)?;

        let (result, alignment) = cluster(data, Some(labels), &self.config)?;
        let status = result.status;

        self.fitted = Some(result);
        self.alignment = alignment;
        Ok(status)
    }

    /// Fit the model to the data. Equivalent to `train()`, returns `&mut Self`
    /// for method chaining.
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&mut Self, FcmError> {
        self.train(data)?;
        Ok(self)
    }

    fn fitted_centroids(&self, data: &ArrayView2<f64>) -> Result<&Array2<f64>, FcmError> {
        let fitted = self.fitted.as_ref().ok_or(FcmError::NotFitted)?;

        if data.ncols() != self.d {
            return Err(FcmError::DimensionMismatch {
                expected: self.d,
                found: data.ncols(),
            });
        }
        ensure_finite(data, "data")?;

        Ok(&fitted.centroids)
    }

    /// Predict hard cluster assignments for new data.
    ///
    /// # Errors
    ///
    /// - [`FcmError::NotFitted`] if the model has not been trained
    /// - [`FcmError::DimensionMismatch`] if the feature count differs from training
    /// - [`FcmError::InvalidConfiguration`] if `data` holds a non-finite value
    pub fn predict(&self, data: &ArrayView2<f64>) -> Result<Array1<usize>, FcmError> {
        let centroids = self.fitted_centroids(data)?;
        Ok(predict_labels(data, &centroids.view(), self.config.m))
    }

    /// Membership matrix of new data against the trained centroids.
    pub fn predict_membership(&self, data: &ArrayView2<f64>) -> Result<Array2<f64>, FcmError> {
        let centroids = self.fitted_centroids(data)?;
        Ok(compute_membership(data, &centroids.view(), self.config.m))
    }

    /// Fit the model and predict cluster assignments in one call.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Array1<usize>, FcmError> {
        self.train(data)?;
        self.predict(data)
    }

    /// Get the centroids of the fitted model.
    pub fn centroids(&self) -> Option<&Array2<f64>> {
        self.fitted.as_ref().map(|r| &r.centroids)
    }

    /// Get the training membership matrix of the fitted model.
    pub fn membership(&self) -> Option<&Array2<f64>> {
        self.fitted.as_ref().map(|r| &r.membership)
    }

    /// Status of the last training run
    pub fn status(&self) -> Option<FcmStatus> {
        self.fitted.as_ref().map(|r| r.status)
    }

    /// Iterations performed by the last training run
    pub fn n_iterations(&self) -> Option<usize> {
        self.fitted.as_ref().map(|r| r.n_iterations)
    }

    /// Label mapping from the last `train_with_labels` call
    pub fn alignment(&self) -> Option<&LabelAlignment> {
        self.alignment.as_ref()
    }

    /// Get the number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.config.n_clusters
    }

    /// Get the number of features (dimensions).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &FcmConfig {
        &self.config
    }
}
