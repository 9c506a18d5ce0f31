//! Two-centroid k-means (Lloyd iterations, k-means++ seeding, best of n restarts).

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Algorithm, Partition, PartitionCfg, Split};
use crate::graph::Graph;

/// Cluster node coordinates into two zones.
pub fn kmeans(graph: &Graph, cfg: &PartitionCfg) -> Split {
    let labels = kmeans2(&graph.positions(), cfg);
    Split::new(Partition::from_labels(&labels), Algorithm::KMeans)
}

/// Labels (0/1) for `points`; restarts share one RNG seeded from `cfg.seed`.
///
/// Both clusters are non-empty whenever there are at least two points: an
/// emptied cluster is re-seeded with the point farthest from its centroid.
pub(crate) fn kmeans2(points: &[Vector2<f64>], cfg: &PartitionCfg) -> Vec<usize> {
    let n = points.len();
    if n < 2 {
        return vec![0; n];
    }
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let tol = cfg.kmeans_tol * mean_axis_variance(points);

    let mut best: Option<(f64, Vec<usize>)> = None;
    for _ in 0..cfg.kmeans_n_init.max(1) {
        let centers = plus_plus_init(points, &mut rng);
        let (labels, inertia) = lloyd(points, centers, cfg.kmeans_max_iter.max(1), tol);
        if best.as_ref().is_none_or(|(b, _)| inertia < *b) {
            best = Some((inertia, labels));
        }
    }
    best.map(|(_, l)| l).unwrap_or_else(|| vec![0; n])
}

fn mean_axis_variance(points: &[Vector2<f64>]) -> f64 {
    let n = points.len() as f64;
    let mean = points.iter().fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p) / n;
    let var = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| {
            let d = p - mean;
            acc + d.component_mul(&d)
        })
        / n;
    (var.x + var.y) / 2.0
}

/// k-means++ for k = 2: first center uniform, second drawn ∝ squared distance.
fn plus_plus_init(points: &[Vector2<f64>], rng: &mut StdRng) -> [Vector2<f64>; 2] {
    let first = points[rng.gen_range(0..points.len())];
    let d2: Vec<f64> = points.iter().map(|p| (p - first).norm_squared()).collect();
    let total: f64 = d2.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return [first, points[rng.gen_range(0..points.len())]];
    }
    let mut target = rng.gen::<f64>() * total;
    for (p, w) in points.iter().zip(&d2) {
        if target < *w {
            return [first, *p];
        }
        target -= w;
    }
    // rounding: take the farthest point
    let far = d2
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);
    [first, points[far]]
}

#[inline]
fn nearest(p: &Vector2<f64>, centers: &[Vector2<f64>; 2]) -> (usize, f64) {
    let d0 = (p - centers[0]).norm_squared();
    let d1 = (p - centers[1]).norm_squared();
    if d1 < d0 {
        (1, d1)
    } else {
        (0, d0)
    }
}

/// Lloyd iterations from `centers`; returns labels and inertia.
fn lloyd(
    points: &[Vector2<f64>],
    mut centers: [Vector2<f64>; 2],
    max_iter: usize,
    tol: f64,
) -> (Vec<usize>, f64) {
    let mut labels = vec![0usize; points.len()];
    for _ in 0..max_iter {
        for (l, p) in labels.iter_mut().zip(points) {
            *l = nearest(p, &centers).0;
        }
        ensure_both_clusters(points, &centers, &mut labels);
        let mut sums = [Vector2::<f64>::zeros(); 2];
        let mut counts = [0usize; 2];
        for (l, p) in labels.iter().zip(points) {
            sums[*l] += p;
            counts[*l] += 1;
        }
        let mut shift = 0.0;
        for k in 0..2 {
            if counts[k] > 0 {
                let c = sums[k] / counts[k] as f64;
                shift += (c - centers[k]).norm_squared();
                centers[k] = c;
            }
        }
        if shift <= tol {
            break;
        }
    }
    for (l, p) in labels.iter_mut().zip(points) {
        *l = nearest(p, &centers).0;
    }
    ensure_both_clusters(points, &centers, &mut labels);
    let inertia: f64 = labels
        .iter()
        .zip(points)
        .map(|(l, p)| (p - centers[*l]).norm_squared())
        .sum();
    (labels, inertia)
}

fn ensure_both_clusters(
    points: &[Vector2<f64>],
    centers: &[Vector2<f64>; 2],
    labels: &mut [usize],
) {
    for k in 0..2 {
        if labels.iter().any(|&l| l == k) {
            continue;
        }
        let donor = 1 - k;
        let far = labels
            .iter()
            .zip(points)
            .enumerate()
            .filter(|(_, (l, _))| **l == donor)
            .map(|(i, (_, p))| (i, (p - centers[donor]).norm_squared()))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i);
        if let Some(i) = far {
            labels[i] = k;
        }
    }
}
