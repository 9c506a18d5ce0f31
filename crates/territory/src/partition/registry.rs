//! Name → strategy registry and the dispatch boundary.
//!
//! Unknown names resolve to Kernighan–Lin here and nowhere else; strategy-level
//! fallbacks are reported through `Split::fallback` and logged once below.

use super::dbscan::dbscan;
use super::kl::kernighan_lin;
use super::kmeans::kmeans;
use super::random::random;
use super::spectral::spectral;
use super::types::{Algorithm, Partition, PartitionCfg, Split};
use super::voronoi::voronoi;
use crate::error::{Result, TerritoryError};
use crate::graph::Graph;

/// Strategy entry point shared by all algorithms.
pub type StrategyFn = fn(&Graph, &PartitionCfg) -> Split;

/// Registered strategy.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub algorithm: Algorithm,
    /// Accepted request names (first is canonical).
    pub names: &'static [&'static str],
    pub run: StrategyFn,
}

const REGISTRY: &[Strategy] = &[
    Strategy {
        algorithm: Algorithm::KernighanLin,
        names: &["kernighan_lin", "current"],
        run: kernighan_lin,
    },
    Strategy {
        algorithm: Algorithm::KMeans,
        names: &["kmeans"],
        run: kmeans,
    },
    Strategy {
        algorithm: Algorithm::Voronoi,
        names: &["voronoi"],
        run: voronoi,
    },
    Strategy {
        algorithm: Algorithm::Random,
        names: &["random"],
        run: random,
    },
    Strategy {
        algorithm: Algorithm::Dbscan,
        names: &["dbscan"],
        run: dbscan,
    },
    Strategy {
        algorithm: Algorithm::Spectral,
        names: &["spectral"],
        run: spectral,
    },
];

/// All registered strategies in a stable order.
pub fn strategies() -> &'static [Strategy] {
    REGISTRY
}

/// Look up a strategy by request name (exact match, aliases included).
pub fn lookup(name: &str) -> Option<&'static Strategy> {
    REGISTRY.iter().find(|s| s.names.iter().any(|n| *n == name))
}

/// Resolve a request name; unknown names map to Kernighan–Lin with a reason.
pub fn resolve(name: &str) -> (&'static Strategy, Option<String>) {
    match lookup(name) {
        Some(s) => (s, None),
        None => (
            &REGISTRY[0],
            Some(format!("unknown algorithm `{name}`; used kernighan_lin")),
        ),
    }
}

/// Partition `graph` for `employees` workers using the strategy named `name`.
///
/// - `employees == 1`: every node in `zone1`, no strategy runs.
/// - `employees == 2`: dispatch by name, then verify the partition covers every
///   node exactly once (`InternalInvariant` otherwise).
/// - anything else: `Validation`.
pub fn partition(graph: &Graph, employees: u32, name: &str, cfg: &PartitionCfg) -> Result<Split> {
    let n = graph.node_count();
    match employees {
        1 => return Ok(Split::new(Partition::single(n), Algorithm::SingleZone)),
        2 => {}
        other => {
            return Err(TerritoryError::validation(format!(
                "employee count must be 1 or 2, got {other}"
            )))
        }
    }
    let (strategy, unknown) = resolve(name);
    tracing::debug!(requested = name, strategy = %strategy.algorithm, nodes = n, "dispatch");
    let mut split = (strategy.run)(graph, cfg);
    if let Some(reason) = unknown {
        split.fallback = Some(match split.fallback.take() {
            Some(inner) => format!("{reason}; {inner}"),
            None => reason,
        });
    }
    if let Some(reason) = &split.fallback {
        tracing::warn!(requested = name, used = %split.used, reason = %reason, "algorithm fallback");
    }
    split.partition.check_covers(n)?;
    Ok(split)
}
