//! Partition, algorithm identifiers, and strategy configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerritoryError};
use crate::graph::NodeId;

/// Two disjoint node sets. `zone2` is empty for single-employee territories.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub zone1: Vec<NodeId>,
    pub zone2: Vec<NodeId>,
}

impl Partition {
    /// Every node in `zone1`.
    pub fn single(n: usize) -> Self {
        Self {
            zone1: (0..n).map(NodeId).collect(),
            zone2: Vec::new(),
        }
    }

    /// Index-order halves: `zone1` gets the first `n / 2` nodes.
    pub fn halves(n: usize) -> Self {
        let mid = n / 2;
        Self {
            zone1: (0..mid).map(NodeId).collect(),
            zone2: (mid..n).map(NodeId).collect(),
        }
    }

    /// Label 0 → `zone1`, anything else → `zone2`.
    pub fn from_labels(labels: &[usize]) -> Self {
        let mut p = Self::default();
        for (i, &l) in labels.iter().enumerate() {
            if l == 0 {
                p.zone1.push(NodeId(i));
            } else {
                p.zone2.push(NodeId(i));
            }
        }
        p
    }

    /// Per-node zone label: 0 (`zone1`), 1 (`zone2`), -1 (unassigned).
    pub fn labels(&self, n: usize) -> Vec<i32> {
        let mut out = vec![-1; n];
        for id in &self.zone1 {
            if id.0 < n {
                out[id.0] = 0;
            }
        }
        for id in &self.zone2 {
            if id.0 < n {
                out[id.0] = 1;
            }
        }
        out
    }

    /// Check that the zones cover `0..n` exactly once.
    pub fn check_covers(&self, n: usize) -> Result<()> {
        let total = self.zone1.len() + self.zone2.len();
        if total != n {
            return Err(TerritoryError::invariant(format!(
                "partition holds {total} nodes, graph has {n}"
            )));
        }
        let mut seen = vec![false; n];
        for id in self.zone1.iter().chain(self.zone2.iter()) {
            if id.0 >= n {
                return Err(TerritoryError::invariant(format!(
                    "partition references missing node {}",
                    id.0
                )));
            }
            if seen[id.0] {
                return Err(TerritoryError::invariant(format!(
                    "node {} assigned twice",
                    id.0
                )));
            }
            seen[id.0] = true;
        }
        Ok(())
    }

    /// Zones with node ids sorted ascending.
    pub fn sorted(mut self) -> Self {
        self.zone1.sort_unstable();
        self.zone2.sort_unstable();
        self
    }
}

/// Partitioning strategy identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    KernighanLin,
    #[serde(rename = "kmeans")]
    KMeans,
    Voronoi,
    Random,
    Dbscan,
    Spectral,
    /// Single-employee shortcut; never selectable by name.
    SingleZone,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::KernighanLin => "kernighan_lin",
            Algorithm::KMeans => "kmeans",
            Algorithm::Voronoi => "voronoi",
            Algorithm::Random => "random",
            Algorithm::Dbscan => "dbscan",
            Algorithm::Spectral => "spectral",
            Algorithm::SingleZone => "single_zone",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one strategy call: the partition plus the strategy that really
/// produced it and, if a fallback fired, why.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    pub partition: Partition,
    pub used: Algorithm,
    pub fallback: Option<String>,
}

impl Split {
    pub fn new(partition: Partition, used: Algorithm) -> Self {
        Self {
            partition,
            used,
            fallback: None,
        }
    }

    /// Same split, with a fallback reason attached (first reason wins).
    pub fn with_fallback(mut self, reason: impl Into<String>) -> Self {
        if self.fallback.is_none() {
            self.fallback = Some(reason.into());
        }
        self
    }
}

/// Strategy tuning. Every randomized step seeds its own RNG from `seed`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionCfg {
    pub seed: u64,
    /// Kernighan–Lin passes.
    pub kl_max_iter: usize,
    /// k-means restarts; the lowest inertia wins.
    pub kmeans_n_init: usize,
    pub kmeans_max_iter: usize,
    /// Convergence threshold relative to the mean per-axis variance.
    pub kmeans_tol: f64,
    /// Neighbor rank used to derive the density radius.
    pub dbscan_k: usize,
    /// Quantile of k-th neighbor distances taken as the density radius.
    pub dbscan_quantile: f64,
    /// `min_samples = max(floor, n / divisor)`.
    pub dbscan_min_samples_divisor: usize,
    pub dbscan_min_samples_floor: usize,
    /// Below this node count spectral clustering defers to k-means.
    pub spectral_min_nodes: usize,
    /// Up to this node count the embedding uses a full dense eigensolve;
    /// larger graphs use seeded subspace iteration.
    pub spectral_dense_max_nodes: usize,
    pub spectral_max_iter: usize,
    /// Residual norm at which subspace iteration stops.
    pub spectral_tol: f64,
}

impl Default for PartitionCfg {
    fn default() -> Self {
        Self {
            seed: 42,
            kl_max_iter: 10,
            kmeans_n_init: 10,
            kmeans_max_iter: 300,
            kmeans_tol: 1e-4,
            dbscan_k: 5,
            dbscan_quantile: 0.75,
            dbscan_min_samples_divisor: 20,
            dbscan_min_samples_floor: 3,
            spectral_min_nodes: 10,
            spectral_dense_max_nodes: 200,
            spectral_max_iter: 2000,
            spectral_tol: 1e-10,
        }
    }
}
