//! Density-based clustering.
//!
//! ## DBSCAN
//!
//! Density-based clustering that can discover non-convex clusters and identify
//! outliers (noise points). DBSCAN does not require specifying the number of
//! clusters in advance; instead it takes a neighborhood radius (`epsilon`) and a
//! density threshold (`min_pts`).
//!
//! **When to use**: clusters of arbitrary shape, unknown cluster count, data with
//! outliers, clusters of roughly similar density.
//!
//! ## Distance metrics
//!
//! Neighborhoods are defined by a [`Metric`]: Euclidean (any dimension, the
//! default), Euclidean restricted to 2D points, or a caller-supplied function.
//!
//! ## Usage
//!
//! ```rust
//! use dbscan_clusterer::cluster::{Clustering, Dbscan, DbscanExt, Metric};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![50.0, 50.0],
//! ];
//!
//! let dbscan = Dbscan::new(0.5, 2).with_metric(Metric::Euclidean2d);
//!
//! let labels = dbscan.fit_predict_with_noise(&data).unwrap();
//! assert_eq!(labels, vec![Some(0), Some(0), Some(1), Some(1), None]);
//!
//! // Same run, noise encoded as `NOISE`.
//! let labels = dbscan.fit_predict(&data).unwrap();
//! assert_eq!(labels[4], dbscan_clusterer::NOISE);
//! ```

mod dbscan;
mod metric;
mod traits;

pub use dbscan::{cluster, ClusterAssignment, Dbscan, DbscanExt, NOISE};
pub use metric::{CustomDistance, Distance, Euclidean, Euclidean2d, Metric};
pub use traits::Clustering;
