//! DBSCAN with pluggable distance metrics.
//!
//! `dbscan_clusterer` is a small library for batch, in-memory density clustering of
//! dense points. The distance used to build epsilon-neighborhoods is selectable:
//! the default Euclidean metric, a 2D-only Euclidean metric (by value or by the name
//! `"euclidean2d"`), or any caller-supplied function.
//!
//! ```rust
//! use dbscan_clusterer::{cluster, Metric};
//!
//! let points = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![40.0, 40.0]];
//! let fit = cluster(&points, 2, 1.5, Metric::Euclidean2d).unwrap();
//! assert_eq!(fit.n_clusters(), 1);
//! assert_eq!(fit.noise(), vec![2]);
//! ```
//!
//! The primary public API is under [`mod@cluster`].

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    cluster, ClusterAssignment, Clustering, CustomDistance, Dbscan, DbscanExt, Distance,
    Euclidean, Euclidean2d, Metric, NOISE,
};
pub use error::{Error, Result};
