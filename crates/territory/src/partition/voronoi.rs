//! Nearest-seed split around the two mutually farthest nodes.

use super::types::{Algorithm, Partition, PartitionCfg, Split};
use crate::graph::{Graph, NodeId};

/// Seeds are the first pair (by index) attaining the maximum pairwise distance;
/// every other node joins the nearer seed, ties going to `zone1`.
pub fn voronoi(graph: &Graph, _cfg: &PartitionCfg) -> Split {
    let pts = graph.positions();
    let n = pts.len();
    if n < 2 {
        return Split::new(Partition::halves(n), Algorithm::Voronoi);
    }
    let mut seeds = (0, 1);
    let mut best = -1.0;
    for i in 0..n {
        for j in i + 1..n {
            let d = (pts[i] - pts[j]).norm_squared();
            if d > best {
                best = d;
                seeds = (i, j);
            }
        }
    }
    let (s1, s2) = (pts[seeds.0], pts[seeds.1]);
    let mut p = Partition::default();
    for (i, q) in pts.iter().enumerate() {
        let to_second = if i == seeds.0 {
            false
        } else if i == seeds.1 {
            true
        } else {
            (q - s2).norm_squared() < (q - s1).norm_squared()
        };
        if to_second {
            p.zone2.push(NodeId(i));
        } else {
            p.zone1.push(NodeId(i));
        }
    }
    tracing::trace!(seed1 = seeds.0, seed2 = seeds.1, "voronoi seeds");
    Split::new(p, Algorithm::Voronoi)
}
