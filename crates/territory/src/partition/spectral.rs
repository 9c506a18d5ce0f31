//! Two-way spectral clustering on an RBF affinity of node coordinates.
//!
//! Steps
//! - Affinity `A_ij = exp(-γ‖x_i − x_j‖²)` with `γ = 1 / (var(X) · dim)`, where
//!   `var(X)` is the variance over all coordinate entries.
//! - Normalized Laplacian `L = I − D^{-1/2} A D^{-1/2}`; the eigenvectors of the
//!   two smallest eigenvalues, rescaled by `D^{-1/2}` and sign-normalized so the
//!   largest-magnitude entry is positive, embed each node in the plane.
//! - k-means (same seed) on the embedding assigns zones.
//!
//! Small graphs (`< spectral_min_nodes`) and non-finite intermediates defer to
//! k-means on raw coordinates.
//!
//! Solvers
//! - Up to `spectral_dense_max_nodes` nodes: full `SymmetricEigen` of the
//!   normalized affinity `M = D^{-1/2} A D^{-1/2}` (the smallest Laplacian
//!   eigenpairs are the largest of `M`).
//! - Larger graphs: block subspace iteration on `M + I` with Rayleigh–Ritz
//!   extraction. The block starts from `D^{1/2}` (the exact leading vector)
//!   plus columns drawn from `StdRng::seed_from_u64(seed)`, so results are
//!   reproducible. Only one dense `n × n` matrix is held.

use nalgebra::{DMatrix, DVector, SymmetricEigen, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::kmeans::{kmeans, kmeans2};
use super::types::{Algorithm, Partition, PartitionCfg, Split};
use crate::graph::Graph;

/// Block width of the subspace iteration (two wanted vectors plus oversampling).
const BLOCK: usize = 4;

pub fn spectral(graph: &Graph, cfg: &PartitionCfg) -> Split {
    let n = graph.node_count();
    if n < cfg.spectral_min_nodes {
        return kmeans(graph, cfg).with_fallback(format!(
            "spectral needs at least {} nodes, graph has {n}; used kmeans",
            cfg.spectral_min_nodes
        ));
    }
    match embedding(&graph.positions(), cfg) {
        Some(rows) => {
            let labels = kmeans2(&rows, cfg);
            Split::new(Partition::from_labels(&labels), Algorithm::Spectral)
        }
        None => kmeans(graph, cfg)
            .with_fallback("spectral embedding is degenerate; used kmeans"),
    }
}

/// RBF bandwidth `1 / (variance of all coordinate entries × 2)`.
pub(crate) fn rbf_gamma(points: &[Vector2<f64>]) -> f64 {
    let m = (points.len() * 2) as f64;
    let mean = points.iter().map(|p| p.x + p.y).sum::<f64>() / m;
    let var = points
        .iter()
        .map(|p| (p.x - mean).powi(2) + (p.y - mean).powi(2))
        .sum::<f64>()
        / m;
    1.0 / (var * 2.0)
}

/// `M = D^{-1/2} A D^{-1/2}` and the `D^{1/2}` diagonal; `None` if non-finite.
fn normalized_affinity(points: &[Vector2<f64>]) -> Option<(DMatrix<f64>, Vec<f64>)> {
    let n = points.len();
    let gamma = rbf_gamma(points);
    if !gamma.is_finite() {
        return None;
    }
    let mut m = DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            0.0
        } else {
            (-gamma * (points[i] - points[j]).norm_squared()).exp()
        }
    });
    let dd: Vec<f64> = (0..n)
        .map(|i| {
            let d = m.row(i).sum();
            if d > 0.0 {
                d.sqrt()
            } else {
                1.0
            }
        })
        .collect();
    for j in 0..n {
        for i in 0..n {
            m[(i, j)] /= dd[i] * dd[j];
        }
    }
    if m.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some((m, dd))
}

/// Spectral embedding rows, or `None` when any step is non-finite.
fn embedding(points: &[Vector2<f64>], cfg: &PartitionCfg) -> Option<Vec<Vector2<f64>>> {
    let n = points.len();
    let (m, dd) = normalized_affinity(points)?;
    let pair = if n <= cfg.spectral_dense_max_nodes || n <= BLOCK {
        dense_pair(m)
    } else {
        iterative_pair(&m, &dd, cfg)
    };

    let mut comps: [Vec<f64>; 2] = [Vec::with_capacity(n), Vec::with_capacity(n)];
    for (comp, v) in comps.iter_mut().zip(&pair) {
        comp.extend((0..n).map(|i| v[i] / dd[i]));
        sign_flip(comp);
    }
    let rows: Vec<Vector2<f64>> = (0..n).map(|i| Vector2::new(comps[0][i], comps[1][i])).collect();
    if rows.iter().any(|r| !(r.x.is_finite() && r.y.is_finite())) {
        return None;
    }
    Some(rows)
}

/// Indices of `values` by decreasing value.
fn descending(values: &DVector<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Eigenvectors of the two largest eigenvalues of `m` (full decomposition).
fn dense_pair(m: DMatrix<f64>) -> [DVector<f64>; 2] {
    let eig = SymmetricEigen::new(m);
    let order = descending(&eig.eigenvalues);
    [
        eig.eigenvectors.column(order[0]).into_owned(),
        eig.eigenvectors.column(order[1]).into_owned(),
    ]
}

/// Eigenvectors of the two largest eigenvalues of `m` by subspace iteration.
///
/// The spectrum of `m` lies in `[-1, 1]`; iterating on `m + I` keeps the
/// wanted end dominant. Stops once both Ritz residuals drop below
/// `cfg.spectral_tol` or after `cfg.spectral_max_iter` sweeps.
fn iterative_pair(m: &DMatrix<f64>, dd: &[f64], cfg: &PartitionCfg) -> [DVector<f64>; 2] {
    let n = m.nrows();
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let start = DMatrix::from_fn(n, BLOCK, |i, c| {
        if c == 0 {
            dd[i]
        } else {
            rng.gen_range(-1.0..1.0)
        }
    });
    let mut q = start.qr().q();
    let mut ritz = [DVector::zeros(n), DVector::zeros(n)];
    for sweep in 0..cfg.spectral_max_iter.max(1) {
        let y = m * &q + &q;
        let h = q.transpose() * &y;
        let eig = SymmetricEigen::new((&h + h.transpose()) * 0.5);
        let order = descending(&eig.eigenvalues);
        let mut residual: f64 = 0.0;
        for (slot, &k) in ritz.iter_mut().zip(&order) {
            let s = eig.eigenvectors.column(k);
            let u = &q * s;
            let r = &y * s - &u * eig.eigenvalues[k];
            residual = residual.max(r.norm());
            *slot = u;
        }
        if residual <= cfg.spectral_tol {
            tracing::trace!(sweep, residual, "spectral subspace converged");
            return ritz;
        }
        q = y.qr().q();
    }
    tracing::debug!(
        max_iter = cfg.spectral_max_iter,
        "spectral subspace iteration hit its sweep limit"
    );
    ritz
}

/// Make the largest-magnitude entry positive (deterministic eigenvector sign).
fn sign_flip(v: &mut [f64]) {
    let idx = v
        .iter()
        .enumerate()
        .max_by(|a, b| {
            a.1.abs()
                .partial_cmp(&b.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i);
    if let Some(i) = idx {
        if v[i] < 0.0 {
            v.iter_mut().for_each(|x| *x = -*x);
        }
    }
}
