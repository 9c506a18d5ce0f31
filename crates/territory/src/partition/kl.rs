//! Kernighan–Lin bisection (unit edge weights).
//!
//! Nodes are shuffled with the configured seed, split into halves
//! (`n / 2` on side 0), then improved by repeated swap sweeps. A sweep pops the
//! best-gain unlocked node from each side in turn, updates neighbor gains as if
//! the pair had swapped, and records the running cost; the best prefix of swaps
//! is applied. Passes stop once no prefix lowers the cut.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::types::{Algorithm, Partition, PartitionCfg, Split};
use crate::graph::{Graph, NodeId};

pub fn kernighan_lin(graph: &Graph, cfg: &PartitionCfg) -> Split {
    let n = graph.node_count();
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    // order[i] = node at shuffled position i
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);
    let mut pos = vec![0usize; n];
    for (i, &v) in order.iter().enumerate() {
        pos[v] = i;
    }
    let adj: Vec<Vec<(usize, f64)>> = order
        .iter()
        .map(|&v| {
            graph
                .neighbors(NodeId(v))
                .filter(|(u, _)| u.0 != v)
                .map(|(u, _)| (pos[u.0], 1.0))
                .collect()
        })
        .collect();

    // false = side 0 (zone1), true = side 1
    let mut side: Vec<bool> = (0..n).map(|i| i >= n / 2).collect();
    for pass in 0..cfg.kl_max_iter {
        let swaps = sweep(&adj, &side);
        let Some((best_k, &(min_cost, _))) = swaps
            .iter()
            .enumerate()
            .min_by(|a, b| a.1 .0.partial_cmp(&b.1 .0).unwrap_or(std::cmp::Ordering::Equal))
        else {
            break;
        };
        if min_cost >= 0.0 {
            tracing::trace!(pass, "kernighan-lin converged");
            break;
        }
        for &(_, (u, v)) in &swaps[..=best_k] {
            side[u] = true;
            side[v] = false;
        }
    }

    let mut p = Partition::default();
    for (i, &s) in side.iter().enumerate() {
        if s {
            p.zone2.push(NodeId(order[i]));
        } else {
            p.zone1.push(NodeId(order[i]));
        }
    }
    Split::new(p.sorted(), Algorithm::KernighanLin)
}

/// One swap sweep. Returns `(cumulative cost, (u from side 0, v from side 1))`
/// after each swap; negative cost means the cut shrank.
fn sweep(adj: &[Vec<(usize, f64)>], side: &[bool]) -> Vec<(f64, (usize, usize))> {
    // cost = internal − external weight; lower is a better move
    let mut cost: Vec<Option<f64>> = adj
        .iter()
        .enumerate()
        .map(|(u, nbrs)| {
            let c: f64 = nbrs
                .iter()
                .map(|&(v, w)| if side[v] { w } else { -w })
                .sum();
            Some(if side[u] { c } else { -c })
        })
        .collect();

    let mut out = Vec::new();
    let mut total = 0.0;
    loop {
        let Some((u, cost_u)) = pop_min(&mut cost, side, false) else {
            break;
        };
        if !has_unlocked(&cost, side, true) {
            break;
        }
        update(adj, side, &mut cost, u);
        let Some((v, cost_v)) = pop_min(&mut cost, side, true) else {
            break;
        };
        update(adj, side, &mut cost, v);
        total += cost_u + cost_v;
        out.push((total, (u, v)));
    }
    out
}

fn has_unlocked(cost: &[Option<f64>], side: &[bool], which: bool) -> bool {
    cost.iter()
        .zip(side)
        .any(|(c, &s)| s == which && c.is_some())
}

/// Lowest-cost unlocked node on `which` side (lowest index on ties); locks it.
fn pop_min(cost: &mut [Option<f64>], side: &[bool], which: bool) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in cost.iter().enumerate() {
        if side[i] != which {
            continue;
        }
        if let Some(c) = *c {
            if best.is_none_or(|(_, b)| c < b) {
                best = Some((i, c));
            }
        }
    }
    if let Some((i, _)) = best {
        cost[i] = None;
    }
    best
}

/// Moving `x` across: same-side neighbors lose an internal edge, the others gain one.
fn update(adj: &[Vec<(usize, f64)>], side: &[bool], cost: &mut [Option<f64>], x: usize) {
    for &(y, w) in &adj[x] {
        if let Some(cy) = cost[y] {
            let delta = if side[y] == side[x] { -w } else { w };
            cost[y] = Some(cy + 2.0 * delta);
        }
    }
}
