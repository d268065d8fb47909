use thiserror::Error;

/// Error types for the fastfcm library
#[derive(Error, Debug)]
pub enum FcmError {
    /// A parameter (cluster count, fuzziness, threshold, iteration cap) or the
    /// input data is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Feature or label dimensionality does not match what was expected
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A cluster received zero total membership weight during the centroid update
    #[error(
        "Degenerate cluster {cluster}: zero total membership weight \
         (membership matrix {n_samples}x{n_clusters})"
    )]
    DegenerateCluster {
        cluster: usize,
        n_samples: usize,
        n_clusters: usize,
    },

    /// The membership matrix stopped being finite, usually from distances that
    /// overflow `f64`
    #[error("Membership matrix became non-finite at iteration {iteration}")]
    NonFiniteMembership { iteration: usize },

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,
}
