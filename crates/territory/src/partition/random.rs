//! Seeded shuffle split; zone sizes differ by at most one node.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::types::{Algorithm, Partition, PartitionCfg, Split};
use crate::graph::{Graph, NodeId};

pub fn random(graph: &Graph, cfg: &PartitionCfg) -> Split {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut ids: Vec<NodeId> = graph.node_ids().collect();
    ids.shuffle(&mut rng);
    let zone2 = ids.split_off(ids.len() / 2);
    let p = Partition { zone1: ids, zone2 }.sorted();
    Split::new(p, Algorithm::Random)
}
