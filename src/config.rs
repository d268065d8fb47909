use crate::error::FcmError;

/// What to do when a cluster collapses to zero total membership weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Stop the run and return [`FcmError::DegenerateCluster`]
    #[default]
    Abort,

    /// Replace the collapsed centroid with a random data point and keep iterating
    Reseed,
}

/// Configuration for the Fuzzy C-Means algorithm
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Number of clusters
    pub n_clusters: usize,

    /// Fuzziness coefficient. Must be greater than 1; larger values give softer memberships.
    pub m: f64,

    /// Convergence threshold. The run stops once the largest per-entry change
    /// of the membership matrix between two iterations is strictly below it.
    pub eps: f64,

    /// Maximum number of iterations before giving up with a `NotConverged` status
    pub max_iters: usize,

    /// Random seed for the membership initialization (and reseeding)
    pub seed: u64,

    /// Handling of clusters that receive zero total weight
    pub degenerate_policy: DegeneratePolicy,

    /// Log every iteration at info level instead of debug
    pub verbose: bool,
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            m: 2.0,
            eps: 1e-6,
            max_iters: 300,
            seed: 0,
            degenerate_policy: DegeneratePolicy::Abort,
            verbose: false,
        }
    }
}

impl FcmConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    /// Set the fuzziness coefficient
    pub fn with_m(mut self, m: f64) -> Self {
        self.m = m;
        self
    }

    /// Set the convergence threshold
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the degenerate-cluster policy
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the parameters on their own, without looking at any data
    pub fn validate(&self) -> Result<(), FcmError> {
        if self.n_clusters == 0 {
            return Err(FcmError::InvalidConfiguration(
                "number of clusters must be greater than 0".to_string(),
            ));
        }

        if !self.m.is_finite() || self.m <= 1.0 {
            return Err(FcmError::InvalidConfiguration(format!(
                "fuzziness coefficient m must be a finite value > 1, got {}",
                self.m
            )));
        }

        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(FcmError::InvalidConfiguration(format!(
                "convergence threshold eps must be a finite value > 0, got {}",
                self.eps
            )));
        }

        if self.max_iters == 0 {
            return Err(FcmError::InvalidConfiguration(
                "max_iters must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
