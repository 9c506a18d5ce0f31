//! Density clustering with self-tuned radius.
//!
//! Coordinates are standardized per axis. The radius is the configured quantile
//! of every node's k-th nearest-neighbor distance; `min_samples` is
//! `max(floor, n / divisor)`. Result shapes map to zones as follows:
//! - two clusters: one zone each, noise handed one by one to the smaller zone;
//! - one (or no) cluster: index-order halves;
//! - more than two clusters: k-means on the same graph.

use nalgebra::Vector2;
use rstar::primitives::GeomWithData;
use rstar::{PointDistance, RTree};

use super::kmeans::kmeans;
use super::types::{Algorithm, Partition, PartitionCfg, Split};
use crate::graph::{Graph, NodeId};

const NOISE: i64 = -1;

pub fn dbscan(graph: &Graph, cfg: &PartitionCfg) -> Split {
    let n = graph.node_count();
    if n < 2 {
        return Split::new(Partition::halves(n), Algorithm::Dbscan)
            .with_fallback("fewer than two nodes; split by index");
    }
    let pts = standardize(&graph.positions());
    let eps = neighbor_radius(&pts, cfg.dbscan_k, cfg.dbscan_quantile);
    let min_samples = cfg
        .dbscan_min_samples_floor
        .max(n / cfg.dbscan_min_samples_divisor.max(1));
    let labels = cluster(&pts, eps, min_samples);
    let clusters = labels.iter().copied().max().map_or(0, |m| (m + 1).max(0)) as usize;
    tracing::debug!(eps, min_samples, clusters, "dbscan labels");

    match clusters {
        2 => Split::new(assign_with_noise(&labels), Algorithm::Dbscan),
        c if c > 2 => kmeans(graph, cfg)
            .with_fallback(format!("dbscan found {c} clusters; used kmeans")),
        c => Split::new(Partition::halves(n), Algorithm::Dbscan)
            .with_fallback(format!("dbscan found {c} cluster(s); split by index")),
    }
}

/// Clusters 0 and 1 become the zones; noise points, in index order, join
/// whichever zone is currently smaller (`zone1` on ties).
fn assign_with_noise(labels: &[i64]) -> Partition {
    let mut p = Partition::default();
    let mut noise = Vec::new();
    for (i, &l) in labels.iter().enumerate() {
        match l {
            0 => p.zone1.push(NodeId(i)),
            1 => p.zone2.push(NodeId(i)),
            _ => noise.push(NodeId(i)),
        }
    }
    for id in noise {
        if p.zone1.len() <= p.zone2.len() {
            p.zone1.push(id);
        } else {
            p.zone2.push(id);
        }
    }
    p.sorted()
}

/// Zero-mean, unit-variance per axis; constant axes are only centered.
pub(crate) fn standardize(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let n = points.len().max(1) as f64;
    let mean = points.iter().fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p) / n;
    let var = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| {
            let d = p - mean;
            acc + d.component_mul(&d)
        })
        / n;
    let scale = var.map(|v| if v > 0.0 { v.sqrt() } else { 1.0 });
    points
        .iter()
        .map(|p| (p - mean).component_div(&scale))
        .collect()
}

/// Point index over standardized coordinates.
type PointTree = RTree<GeomWithData<[f64; 2], usize>>;

fn index(points: &[Vector2<f64>]) -> PointTree {
    RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect(),
    )
}

/// Quantile (linear interpolation) of each point's k-th nearest-neighbor
/// distance, excluding the point itself. Never returns 0.
pub(crate) fn neighbor_radius(points: &[Vector2<f64>], k: usize, q: f64) -> f64 {
    let n = points.len();
    if n < 2 {
        return f64::EPSILON;
    }
    let k = k.clamp(1, n - 1);
    let tree = index(points);
    // k + 1 nearest includes the point itself at distance 0
    let mut kth: Vec<f64> = points
        .iter()
        .map(|p| {
            let query = [p.x, p.y];
            tree.nearest_neighbor_iter(&query)
                .nth(k)
                .map_or(0.0, |hit| hit.distance_2(&query).sqrt())
        })
        .collect();
    kth.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let eps = quantile_sorted(&kth, q);
    if eps > 0.0 && eps.is_finite() {
        eps
    } else {
        f64::EPSILON
    }
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Plain DBSCAN. Neighborhoods are closed balls and include the point itself.
/// Labels: cluster index in discovery order, or `-1` for noise.
pub(crate) fn cluster(points: &[Vector2<f64>], eps: f64, min_samples: usize) -> Vec<i64> {
    let n = points.len();
    let tree = index(points);
    let eps2 = eps * eps;
    let region = |i: usize| {
        tree.locate_within_distance([points[i].x, points[i].y], eps2)
            .map(|hit| hit.data)
    };
    let is_core: Vec<bool> = (0..n).map(|i| region(i).count() >= min_samples).collect();

    let mut labels = vec![NOISE; n];
    let mut next = 0i64;
    for start in 0..n {
        if labels[start] != NOISE || !is_core[start] {
            continue;
        }
        labels[start] = next;
        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            if !is_core[p] {
                continue;
            }
            for q in region(p) {
                if labels[q] == NOISE {
                    labels[q] = next;
                    stack.push(q);
                }
            }
        }
        next += 1;
    }
    labels
}
