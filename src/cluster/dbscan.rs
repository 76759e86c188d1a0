//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN is a density-based clustering algorithm that groups points based on
//! neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum neighborhood size (the point itself included) for a point to be "core".
//! - **Core point**: Has at least MinPts points within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. For each unclassified point P, in index order:
//!    - Find neighbors within ε
//!    - If |neighbors| < MinPts, mark as noise (may change later)
//!    - Else P is core: start new cluster, expand from neighbors
//!
//! 2. Expansion (breadth-first, over an explicit queue):
//!    - Claim every neighbor that is unclassified or noise
//!    - If a claimed point is core, enqueue its neighbors too
//!
//! A point labeled noise early on is promoted to a border point as soon as some
//! cluster reaches it. A point already in a cluster is never relabeled, so border
//! points shared by two clusters go to whichever was discovered first.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) distance evaluations; every neighborhood is computed exactly once.
//! - **Space**: O(n) for labels and the work queue.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;

use log::{debug, trace};

use super::metric::{Distance, Metric};
use super::traits::Clustering;
use crate::error::{Error, Result};

/// Label used for noise by [`Clustering::fit_predict`].
pub const NOISE: usize = usize::MAX;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification (the point itself included).
    min_pts: usize,
    /// Distance used for neighborhood queries.
    metric: Metric,
}

/// Per-point classification during a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointState {
    /// Neighborhood not computed yet.
    Unclassified,
    /// Visited, not density-reachable so far (may be promoted later).
    Noise,
    Cluster(usize),
}

impl Dbscan {
    /// Create a new DBSCAN clusterer using the Euclidean metric.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points (including the point itself) to form a
    ///   dense region.
    ///
    /// # Typical Values
    ///
    /// - `epsilon`: Often determined by k-distance plot (k = min_pts - 1).
    /// - `min_pts`: 2 * dimension is a common heuristic.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self {
            epsilon,
            min_pts,
            metric: Metric::Euclidean,
        }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Minimum neighborhood size for a core point.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Configured distance metric.
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    fn validate(&self) -> Result<()> {
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive",
            });
        }

        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Run DBSCAN and return the full assignment.
    ///
    /// Parameters and the metric are checked before any distance is evaluated.
    /// An empty dataset yields an empty assignment.
    ///
    /// ```rust
    /// use dbscan_clusterer::{Dbscan, Metric};
    ///
    /// let data = vec![vec![0.0, 0.0], vec![0.5, 0.0], vec![9.0, 9.0]];
    /// let fit = Dbscan::new(1.0, 2)
    ///     .with_metric(Metric::Euclidean2d)
    ///     .fit(&data)
    ///     .unwrap();
    /// assert_eq!(fit.labels(), &[Some(0), Some(0), None]);
    /// ```
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<ClusterAssignment> {
        self.validate()?;
        let dist = self.metric.resolve(data)?;

        let n = data.len();
        debug!(
            "dbscan: n={} epsilon={} min_pts={} metric={}",
            n,
            self.epsilon,
            self.min_pts,
            self.metric.name()
        );

        let mut states = vec![PointState::Unclassified; n];
        let mut core = vec![false; n];
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut n_clusters = 0usize;

        for point_idx in 0..n {
            if states[point_idx] != PointState::Unclassified {
                continue;
            }

            let neighbors = self.region_query(dist, data, point_idx);
            if neighbors.len() < self.min_pts {
                // Not enough neighbors: mark as noise (might be border later)
                states[point_idx] = PointState::Noise;
                continue;
            }

            let cluster_id = n_clusters;
            n_clusters += 1;
            core[point_idx] = true;
            states[point_idx] = PointState::Cluster(cluster_id);
            let mut size = 1 + Self::claim(&neighbors, cluster_id, &mut states, &mut queue);

            while let Some(member) = queue.pop_front() {
                let member_neighbors = self.region_query(dist, data, member);
                if member_neighbors.len() >= self.min_pts {
                    core[member] = true;
                    size += Self::claim(&member_neighbors, cluster_id, &mut states, &mut queue);
                }
            }

            trace!(
                "dbscan: cluster {} seeded at point {}, {} points",
                cluster_id,
                point_idx,
                size
            );
        }

        let labels: Vec<Option<usize>> = states
            .into_iter()
            .map(|s| match s {
                PointState::Cluster(c) => Some(c),
                _ => None,
            })
            .collect();

        let assignment = ClusterAssignment {
            labels,
            core,
            n_clusters,
        };
        debug!(
            "dbscan: {} clusters, {} noise points",
            assignment.n_clusters,
            assignment.n_noise()
        );
        Ok(assignment)
    }

    /// Find all points within epsilon of `point_idx`.
    ///
    /// The point itself is always included, even when the metric cannot measure
    /// it against itself (e.g. NaN coordinates).
    fn region_query(
        &self,
        dist: &dyn Distance,
        data: &[Vec<f64>],
        point_idx: usize,
    ) -> Vec<usize> {
        let point = &data[point_idx];
        data.iter()
            .enumerate()
            .filter(|(idx, other)| {
                *idx == point_idx || dist.distance(point, other) <= self.epsilon
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Pull `neighbors` into `cluster_id`, returning how many points changed label.
    ///
    /// Noise points become border points without further expansion (their
    /// neighborhood was already found too small). Unclassified points are queued
    /// so their own neighborhoods get examined.
    fn claim(
        neighbors: &[usize],
        cluster_id: usize,
        states: &mut [PointState],
        queue: &mut VecDeque<usize>,
    ) -> usize {
        let mut claimed = 0;
        for &nn in neighbors {
            match states[nn] {
                PointState::Unclassified => queue.push_back(nn),
                PointState::Noise => {}
                PointState::Cluster(_) => continue,
            }
            states[nn] = PointState::Cluster(cluster_id);
            claimed += 1;
        }
        claimed
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.to_dense_labels())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    ///
    /// To get the actual number of clusters, use [`Dbscan::fit`] and
    /// [`ClusterAssignment::n_clusters`].
    fn n_clusters(&self) -> usize {
        0 // Unknown until fit
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f64>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: usize) -> bool {
        label == NOISE
    }
}

impl DbscanExt for Dbscan {
    fn fit_predict_with_noise(&self, data: &[Vec<f64>]) -> Result<Vec<Option<usize>>> {
        Ok(self.fit(data)?.into_labels())
    }
}

/// Outcome of a DBSCAN run: one label per input point.
///
/// Cluster ids are `0..n_clusters()`, numbered in discovery order: cluster `k`
/// is seeded at its lowest-index core point, and seeds increase with `k`.
/// Noise is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterAssignment {
    labels: Vec<Option<usize>>,
    core: Vec<bool>,
    n_clusters: usize,
}

impl ClusterAssignment {
    /// Number of points assigned (equal to the input length).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the input was empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of clusters found.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Label per point; `None` is noise.
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Label of one point.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    pub fn label(&self, idx: usize) -> Option<usize> {
        self.labels[idx]
    }

    /// Whether point `idx` is noise.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    pub fn is_noise(&self, idx: usize) -> bool {
        self.labels[idx].is_none()
    }

    /// Whether point `idx` is a core point.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    pub fn is_core(&self, idx: usize) -> bool {
        self.core[idx]
    }

    /// Number of noise points.
    pub fn n_noise(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }

    /// Indices of noise points, ascending.
    pub fn noise(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Member indices of each cluster, indexed by cluster id. Members are ascending.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_clusters];
        for (i, l) in self.labels.iter().enumerate() {
            if let Some(c) = l {
                out[*c].push(i);
            }
        }
        out
    }

    /// Labels with noise encoded as [`NOISE`].
    pub fn to_dense_labels(&self) -> Vec<usize> {
        self.labels.iter().map(|l| l.unwrap_or(NOISE)).collect()
    }

    /// Consume the assignment, returning the labels.
    pub fn into_labels(self) -> Vec<Option<usize>> {
        self.labels
    }
}

/// Cluster `points` with DBSCAN.
///
/// `min_pts` counts the point itself. The metric is resolved once, before any
/// clustering work.
///
/// ```rust
/// use dbscan_clusterer::{cluster, Metric};
///
/// let points = vec![vec![0.0, 10.0], vec![0.0, 11.0], vec![0.0, 12.0], vec![300.0, 70.0]];
/// let fit = cluster(&points, 2, 4.0, "euclidean2d".parse::<Metric>().unwrap()).unwrap();
/// assert_eq!(fit.clusters(), vec![vec![0, 1, 2]]);
/// assert_eq!(fit.noise(), vec![3]);
/// ```
pub fn cluster(
    points: &[Vec<f64>],
    min_pts: usize,
    epsilon: f64,
    metric: Metric,
) -> Result<ClusterAssignment> {
    Dbscan::new(epsilon, min_pts).with_metric(metric).fit(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbscan_two_clusters() {
        // Two well-separated clusters
        let data = vec![
            // Cluster 1: around (0, 0)
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![0.05, 0.05],
            // Cluster 2: around (5, 5)
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
            vec![5.05, 5.05],
        ];

        let dbscan = Dbscan::new(0.3, 3);
        let labels = dbscan.fit_predict(&data).unwrap();

        assert_eq!(labels, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_dbscan_with_noise() {
        let data = vec![
            // Cluster 1
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            // Outlier
            vec![100.0, 100.0],
            // Cluster 2
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
        ];

        let dbscan = Dbscan::new(0.3, 3);
        let labels = dbscan.fit_predict_with_noise(&data).unwrap();

        assert_eq!(labels.len(), 9);
        assert!(labels[4].is_none());
        for (i, label) in labels.iter().enumerate() {
            if i != 4 {
                assert!(label.is_some());
            }
        }

        let dense = dbscan.fit_predict(&data).unwrap();
        assert!(Dbscan::is_noise(dense[4]));
        assert_eq!(dense[5], 1);
    }

    #[test]
    fn test_dbscan_all_noise() {
        // Points too far apart
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ];

        let fit = Dbscan::new(0.5, 3).fit(&data).unwrap();
        assert_eq!(fit.n_clusters(), 0);
        assert_eq!(fit.noise(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_dbscan_empty() {
        let data: Vec<Vec<f64>> = vec![];
        let fit = Dbscan::new(0.5, 3).fit(&data).unwrap();
        assert!(fit.is_empty());
        assert_eq!(fit.n_clusters(), 0);
        assert!(Dbscan::new(0.5, 3).fit_predict(&data).unwrap().is_empty());
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = vec![vec![0.0, 0.0]];

        for eps in [0.0, -1.0, f64::NAN] {
            let err = Dbscan::new(eps, 3).fit(&data).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter {
                    name: "epsilon",
                    ..
                }
            ));
        }

        let err = Dbscan::new(0.5, 0).fit(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "min_pts",
                ..
            }
        ));
    }

    #[test]
    fn test_params_checked_before_empty_input() {
        let data: Vec<Vec<f64>> = vec![];
        assert!(Dbscan::new(0.5, 0).fit(&data).is_err());
    }

    #[test]
    fn test_dbscan_chain() {
        // Chain of points - DBSCAN should connect them
        let data: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 * 0.3, 0.0]).collect();

        let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();
        assert_eq!(fit.n_clusters(), 1);
        assert_eq!(fit.clusters(), vec![(0..10).collect::<Vec<_>>()]);
    }

    #[test]
    fn test_noise_promoted_to_border() {
        // Point 0 only sees point 1, so it is noise when first visited. Point 1 is
        // core and later pulls it in.
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.5, 0.0], vec![2.0, 0.0]];

        let fit = Dbscan::new(1.0, 3).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[Some(0), Some(0), Some(0), Some(0)]);
        assert!(!fit.is_core(0));
        assert!(fit.is_core(1));
        assert!(fit.is_core(2));
    }

    #[test]
    fn test_noise_promoted_by_expanded_core() {
        // Point 0 is noise on its own. The cluster is seeded at point 1, which does
        // not reach point 0; point 2 does, and it is only discovered by expansion.
        let data = vec![vec![0.0, 0.0], vec![1.8, 0.0], vec![0.9, 0.0], vec![2.5, 0.0]];

        let fit = Dbscan::new(1.0, 3).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[Some(0), Some(0), Some(0), Some(0)]);
        assert!(fit.is_core(1));
        assert!(fit.is_core(2));
        assert!(!fit.is_core(0));
    }

    #[test]
    fn test_border_point_goes_to_first_cluster() {
        // Point 4 sees exactly one core point of each square, so it is a border
        // point of both; the first cluster discovered keeps it.
        let data = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.5],
            vec![0.5, 0.0],
            vec![0.5, 0.5],
            vec![1.4, 0.0],
            vec![2.3, 0.0],
            vec![2.3, 0.5],
            vec![2.8, 0.0],
            vec![2.8, 0.5],
        ];

        let fit = Dbscan::new(1.0, 4).fit(&data).unwrap();
        assert_eq!(fit.n_clusters(), 2);
        assert_eq!(fit.label(4), Some(0));
        assert!(!fit.is_core(4));
        assert!(fit.is_core(5));
        assert_eq!(fit.clusters(), vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8]]);
    }

    #[test]
    fn test_min_pts_one_makes_every_point_core() {
        let data = vec![vec![0.0, 0.0], vec![5.0, 0.0], vec![10.0, 0.0]];
        let fit = Dbscan::new(1.0, 1).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[Some(0), Some(1), Some(2)]);
        assert!((0..3).all(|i| fit.is_core(i)));
    }

    #[test]
    fn test_point_is_its_own_neighbor_even_when_not_finite() {
        // NaN and infinity make dist(p, p) NaN; the point still counts itself.
        let data = vec![vec![f64::INFINITY, 0.0], vec![f64::NAN, 1.0], vec![5.0, 5.0]];
        let fit = cluster(&data, 1, 1.0, Metric::Euclidean2d).unwrap();

        assert_eq!(fit.labels(), &[Some(0), Some(1), Some(2)]);
        assert_eq!(fit.n_noise(), 0);
        assert!((0..3).all(|i| fit.is_core(i)));

        let fit = cluster(&data, 2, 1.0, Metric::Euclidean2d).unwrap();
        assert_eq!(fit.noise(), vec![0, 1, 2]);
    }

    #[test]
    fn test_claim_counts_promoted_noise() {
        let mut states = vec![
            PointState::Noise,
            PointState::Unclassified,
            PointState::Cluster(0),
        ];
        let mut queue = VecDeque::new();

        let claimed = Dbscan::claim(&[0, 1, 2], 1, &mut states, &mut queue);
        assert_eq!(claimed, 2);
        assert_eq!(queue, VecDeque::from(vec![1]));
        assert_eq!(
            states,
            vec![
                PointState::Cluster(1),
                PointState::Cluster(1),
                PointState::Cluster(0)
            ]
        );
    }

    #[test]
    #[should_panic]
    fn test_is_core_out_of_bounds_panics() {
        let fit = Dbscan::new(1.0, 1).fit(&[vec![0.0, 0.0]]).unwrap();
        let _ = fit.is_core(1);
    }

    #[test]
    fn test_duplicate_points() {
        let data = vec![vec![1.0, 1.0]; 4];
        let fit = Dbscan::new(0.1, 4).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[Some(0); 4]);
    }

    #[test]
    fn test_euclidean2d_rejects_other_dimensions() {
        let data = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]];
        let err = Dbscan::new(1.0, 2)
            .with_metric(Metric::Euclidean2d)
            .fit(&data)
            .unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );

        // The generic metric handles 3D fine.
        assert!(Dbscan::new(1.0, 2).fit(&data).is_ok());
    }

    #[test]
    fn test_custom_metric() {
        // Chebyshev: (0,0) and (0.9,0.9) are within 1.0, though not in Euclidean terms.
        let chebyshev = Metric::custom(|a, b| {
            a.iter()
                .zip(b)
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f64::max)
        });
        let data = vec![vec![0.0, 0.0], vec![0.9, 0.9]];

        let fit = cluster(&data, 2, 1.0, chebyshev).unwrap();
        assert_eq!(fit.labels(), &[Some(0), Some(0)]);

        let fit = cluster(&data, 2, 1.0, Metric::Euclidean).unwrap();
        assert_eq!(fit.labels(), &[None, None]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let data = vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![7.0, 7.0]];
        let before = data.clone();
        let _ = Dbscan::new(1.0, 2).fit(&data).unwrap();
        assert_eq!(data, before);
    }

    #[test]
    fn test_builder_and_default() {
        let d = Dbscan::default();
        assert_eq!(d.epsilon(), 0.5);
        assert_eq!(d.min_pts(), 5);
        assert_eq!(d.metric().name(), "euclidean");
        assert_eq!(d.n_clusters(), 0);

        let d = d
            .with_epsilon(2.0)
            .with_min_pts(3)
            .with_metric(Metric::Euclidean2d);
        assert_eq!(d.epsilon(), 2.0);
        assert_eq!(d.min_pts(), 3);
        assert_eq!(d.metric().name(), "euclidean2d");
    }
}
