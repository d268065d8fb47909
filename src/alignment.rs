use crate::error::FcmError;
use crate::membership::hard_assignments;
use ndarray::{Array2, ArrayView2, Axis};

/// Two clusters voted for the same ground-truth label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConflict {
    /// The contested ground-truth label
    pub label: usize,
    /// Cluster that held the label before being overwritten
    pub displaced_cluster: usize,
    /// Cluster that claimed the label last and kept it
    pub winning_cluster: usize,
}

/// Mapping from arbitrary cluster indices to ground-truth label positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAlignment {
    /// `permutation[label]` is the original cluster index placed at `label`
    pub permutation: Vec<usize>,
    /// Majority-vote collisions encountered while building the mapping
    pub conflicts: Vec<LabelConflict>,
}

impl LabelAlignment {
    /// True when every cluster already sits at its label's position
    pub fn is_identity(&self) -> bool {
        self.permutation.iter().enumerate().all(|(i, &j)| i == j)
    }

    /// Reorder centroid rows and membership columns so that index `i` refers to label `i`
    pub fn apply(
        &self,
        centroids: &ArrayView2<f64>,
        membership: &ArrayView2<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        (
            centroids.select(Axis(0), &self.permutation),
            membership.select(Axis(1), &self.permutation),
        )
    }
}

/// Align clusters to ground-truth labels by majority vote
///
/// Every point is assigned to its highest-membership cluster. Each cluster, in
/// index order, claims the label that occurs most often among its points (ties go
/// to the lowest label). A later claim on an already taken label overwrites the
/// earlier one and is reported as a [`LabelConflict`]. Clusters left without a
/// position fill the unclaimed labels in ascending order, so the result is always a
/// permutation of `0..n_clusters`.
pub fn align_clusters(
    membership: &ArrayView2<f64>,
    labels: &[usize],
) -> Result<LabelAlignment, FcmError> {
    let n_samples = membership.nrows();
    let n_clusters = membership.ncols();

    if labels.len() != n_samples {
        return Err(FcmError::DimensionMismatch {
            expected: n_samples,
            found: labels.len(),
        });
    }

    let out_of_range = labels.iter().enumerate().find(|&(_, &l)| l >= n_clusters);
    if let Some((idx, &label)) = out_of_range {
        return Err(FcmError::InvalidConfiguration(format!(
            "label {} at index {} is outside 0..{}",
            label, idx, n_clusters
        )));
    }

    let assignments = hard_assignments(membership);

    // Per cluster: vote count for every label
    let mut counts = vec![vec![0usize; n_clusters]; n_clusters];
    for (&cluster, &label) in assignments.iter().zip(labels.iter()) {
        counts[cluster][label] += 1;
    }

    let mut slots: Vec<Option<usize>> = vec![None; n_clusters];
    let mut conflicts = Vec::new();

    for cluster in 0..n_clusters {
        let Some(label) = majority_label(&counts[cluster]) else {
            continue;
        };

        if let Some(previous) = slots[label].replace(cluster) {
            log::warn!(
                "Clusters {} and {} both map to label {}; keeping cluster {}",
                previous,
                cluster,
                label,
                cluster
            );
            conflicts.push(LabelConflict {
                label,
                displaced_cluster: previous,
                winning_cluster: cluster,
            });
        }
    }

    let mut placed = vec![false; n_clusters];
    for &cluster in slots.iter().flatten() {
        placed[cluster] = true;
    }
    let mut leftovers = (0..n_clusters).filter(|&c| !placed[c]);

    let permutation = slots
        .into_iter()
        .map(|slot| slot.or_else(|| leftovers.next()))
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| {
            FcmError::InvalidConfiguration("label alignment is not a bijection".to_string())
        })?;

    Ok(LabelAlignment {
        permutation,
        conflicts,
    })
}

/// Most frequent label, ties broken by the lowest label
fn majority_label(counts: &[usize]) -> Option<usize> {
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .min_by_key(|&(label, &count)| (std::cmp::Reverse(count), label))
        .map(|(label, _)| label)
}
