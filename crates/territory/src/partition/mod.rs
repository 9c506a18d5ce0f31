//! Two-way partitioning strategies.
//!
//! Purpose
//! - Split a street graph into two balanced zones with interchangeable
//!   algorithms sharing one signature (`StrategyFn`).
//! - Keep every randomized step reproducible: each call seeds its own `StdRng`
//!   from `PartitionCfg::seed` (42 by default); no RNG is shared across calls.
//!
//! Strategies
//! - `kernighan_lin` (alias `current`): local-search bisection minimizing the cut.
//! - `kmeans`: two centroids on raw coordinates, best of several restarts.
//! - `voronoi`: nearest of the two mutually farthest nodes.
//! - `random`: seeded shuffle split at the midpoint.
//! - `dbscan`: density clusters with self-tuned radius (falls back to k-means).
//! - `spectral`: RBF-affinity spectral embedding + k-means (falls back to k-means).

mod dbscan;
mod kl;
mod kmeans;
mod random;
mod registry;
mod spectral;
mod types;
mod voronoi;

pub use dbscan::dbscan;
pub use kl::kernighan_lin;
pub use kmeans::kmeans;
pub use random::random;
pub use registry::{lookup, partition, resolve, strategies, Strategy, StrategyFn};
pub use spectral::spectral;
pub use types::{Algorithm, Partition, PartitionCfg, Split};
pub use voronoi::voronoi;
